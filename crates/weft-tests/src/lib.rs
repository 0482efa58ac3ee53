use std::path::Path;
use std::sync::{Arc, Once};

use parking_lot::RwLock;
use rowan::GreenNode;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use weft_ast::{AstNode, Attr, Item};
use weft_expand::{
    DEFAULT_MAX_EXPANSION_DEPTH, ExpansionContext, ExpansionDb, ExpansionOffsetAllocator,
    ExpansionOverlay, FileNode, FileToken, MacroCall, MacroCallKey, MacroCallKind, MacroExpansion,
    RangeMap,
};
use weft_lexer::SyntaxKind;
use weft_parser::{EntryPoint, SyntaxNode};
use weft_source::{CrateId, FileId, InFile};

mod expander;

use expander::{Expanded, MacroDef};

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber for test output.
///
/// Safe to call from every test. Enable with `RUST_LOG=weft_expand=debug`.
pub fn init_logging() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_test_writer().with_target(true))
            .with(filter)
            .try_init();
    });
}

#[derive(Debug, Clone)]
enum FileOrigin {
    Source { krate: CrateId },
    Expansion { call: MacroCallKey },
}

#[derive(Debug, Clone)]
struct FileData {
    path: Option<String>,
    text: Arc<str>,
    green: GreenNode,
    origin: FileOrigin,
}

/// An in-memory workspace of source files and lazily computed macro
/// expansions, implementing `ExpansionDb` for tests.
///
/// Macros are small templates registered up front. Expanding a call
/// parses the output in the context the call's position demands and
/// registers it as a new file.
pub struct TestWorkspace {
    files: RwLock<Vec<FileData>>,
    macros: FxHashMap<SmolStr, MacroDef>,
    expansions: RwLock<FxHashMap<MacroCallKey, Option<Arc<MacroExpansion>>>>,
    allocator: ExpansionOffsetAllocator,
    overlay: ExpansionOverlay,
    max_depth: usize,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            files: RwLock::new(Vec::new()),
            macros: FxHashMap::default(),
            expansions: RwLock::new(FxHashMap::default()),
            allocator: ExpansionOffsetAllocator::new(),
            overlay: ExpansionOverlay::new(),
            max_depth: DEFAULT_MAX_EXPANSION_DEPTH,
        }
    }

    /// Limit how deep the expansion lookups follow nested calls.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Add a source file belonging to crate 0.
    pub fn add_file(&mut self, path: &str, text: &str) -> FileId {
        self.add_file_in_crate(path, text, CrateId(0))
    }

    pub fn add_file_in_crate(&mut self, path: &str, text: &str, krate: CrateId) -> FileId {
        self.push_file(
            Some(path.to_owned()),
            text,
            EntryPoint::SourceFile,
            FileOrigin::Source { krate },
        )
    }

    /// Build a workspace from all `.wf` files in a directory, sorted by name.
    pub fn from_dir(dir: &Path) -> Result<Self, std::io::Error> {
        let mut ws = Self::new();
        let mut entries: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(|entry| {
                let path = entry.ok()?.path();
                (path.extension().and_then(|e| e.to_str()) == Some("wf")).then_some(path)
            })
            .collect();
        entries.sort();

        for path in entries {
            let name = path.file_name().and_then(|n| n.to_str()).ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("non-UTF-8 file name: {}", path.display()),
                )
            })?;
            let text = std::fs::read_to_string(&path)?;
            ws.add_file(name, &text);
        }
        Ok(ws)
    }

    /// Register a function-like macro.
    ///
    /// `pattern` is matched token by token against the call argument:
    /// `$x` binds one token, `$x*` binds everything left, and any other
    /// token must appear as written. `template` is copied with every
    /// `$x` replaced by the bound argument text.
    pub fn define_macro(&mut self, name: &str, pattern: &str, template: &str) -> &mut Self {
        let def = MacroDef::Template {
            pattern: expander::parse_pattern(pattern),
            template: template.to_owned(),
        };
        self.macros.insert(SmolStr::new(name), def);
        self
    }

    /// Register an attribute macro that re-emits its item unchanged,
    /// minus the attribute.
    pub fn define_identity_attr(&mut self, name: &str) -> &mut Self {
        self.macros.insert(SmolStr::new(name), MacroDef::IdentityAttr);
        self
    }

    /// Register a derive macro; `$name` in `template` is the item's name.
    pub fn define_derive(&mut self, name: &str, template: &str) -> &mut Self {
        let def = MacroDef::Derive {
            template: template.to_owned(),
        };
        self.macros.insert(SmolStr::new(name), def);
        self
    }

    pub fn file_id(&self, path: &str) -> Option<FileId> {
        self.files
            .read()
            .iter()
            .position(|f| f.path.as_deref() == Some(path))
            .and_then(|idx| u32::try_from(idx).ok())
            .map(FileId)
    }

    pub fn file_text(&self, file: FileId) -> Option<Arc<str>> {
        self.file(file).map(|f| f.text)
    }

    /// The `nth` token (0-based) of `file` whose text is `text`.
    pub fn find_token(&self, file: FileId, text: &str, nth: usize) -> Option<FileToken> {
        let root = self.file_syntax(file)?;
        root.descendants_with_tokens()
            .filter_map(rowan::NodeOrToken::into_token)
            .filter(|tok| tok.text() == text)
            .nth(nth)
            .map(|tok| InFile::new(file, tok))
    }

    /// The `nth` node (0-based, preorder) of `file` with the given kind.
    pub fn find_node(&self, file: FileId, kind: SyntaxKind, nth: usize) -> Option<FileNode> {
        let root = self.file_syntax(file)?;
        root.descendants()
            .filter(|n| n.kind() == kind)
            .nth(nth)
            .map(|n| InFile::new(file, n))
    }

    /// Every macro call in `file`, in source order: function-like calls,
    /// then per item its attribute and derive calls.
    pub fn calls_in(&self, file: FileId) -> Vec<MacroCall> {
        let Some(root) = self.file_syntax(file) else {
            return Vec::new();
        };
        let mut calls: Vec<_> = root
            .descendants()
            .filter_map(weft_ast::MacroCall::cast)
            .map(|call| MacroCall::fn_like(file, &call))
            .collect();
        for item in root.descendants().filter_map(Item::cast) {
            calls.extend(MacroCall::for_item(file, &item));
        }
        calls.sort_by_key(|call| call.syntax().text_range().start());
        calls
    }

    /// The first call in `file` invoking the macro `name`.
    pub fn call_named(&self, file: FileId, name: &str) -> Option<MacroCall> {
        self.calls_in(file)
            .into_iter()
            .find(|call| call.name().is_some_and(|n| n == name))
    }

    /// Expand `call` and return the expansion file.
    pub fn expand(&self, call: &MacroCall) -> Option<FileId> {
        self.macro_expansion(call).map(|expansion| expansion.file)
    }

    fn file(&self, file: FileId) -> Option<FileData> {
        self.files.read().get(file.0 as usize).cloned()
    }

    fn push_file(
        &self,
        path: Option<String>,
        text: &str,
        entry: EntryPoint,
        origin: FileOrigin,
    ) -> FileId {
        let parse = weft_parser::parse(text, entry);
        let data = FileData {
            path,
            text: Arc::from(text),
            green: parse.green,
            origin,
        };
        let mut files = self.files.write();
        #[allow(clippy::cast_possible_truncation)]
        let file_id = FileId(files.len() as u32);
        files.push(data);
        file_id
    }

    fn call_from_key(&self, key: MacroCallKey) -> Option<MacroCall> {
        let root = self.file_syntax(key.file_id)?;
        if !root.text_range().contains_range(key.range) {
            return None;
        }
        let wanted = match key.kind {
            MacroCallKind::FnLike => SyntaxKind::MacroCall,
            MacroCallKind::Attr | MacroCallKind::Derive { .. } => SyntaxKind::Attr,
        };
        let start = match root.covering_element(key.range) {
            rowan::NodeOrToken::Node(node) => node,
            rowan::NodeOrToken::Token(token) => token.parent()?,
        };
        let node = start
            .ancestors()
            .find(|n| n.kind() == wanted && n.text_range() == key.range)?;
        match key.kind {
            MacroCallKind::FnLike => {
                weft_ast::MacroCall::cast(node).map(|call| MacroCall::fn_like(key.file_id, &call))
            }
            MacroCallKind::Attr => Attr::cast(node).and_then(|a| MacroCall::attr(key.file_id, &a)),
            MacroCallKind::Derive { index } => {
                Attr::cast(node).and_then(|a| MacroCall::derive(key.file_id, &a, index))
            }
        }
    }

    // Run the macro behind `call` over its body text.
    fn run_macro(&self, call: &MacroCall) -> Option<Expanded> {
        let name = call.name()?;
        let def = self.macros.get(&name)?;
        let text = self.file_text(call.file_id())?;
        let body_range = call.local_body_range();
        match (def, call.kind()) {
            (MacroDef::Template { pattern, template }, MacroCallKind::FnLike) => {
                let body = body_range.map_or("", |range| &text[range]);
                let bindings = expander::match_pattern(pattern, body)?;
                Some(expander::substitute(template, &bindings, body))
            }
            (MacroDef::IdentityAttr, MacroCallKind::Attr) => {
                let item_range = body_range?;
                let attr = call.syntax().text_range() - item_range.start();
                Some(expander::strip_attribute(&text[item_range], attr))
            }
            (MacroDef::Derive { template }, MacroCallKind::Derive { .. }) => {
                let item_range = body_range?;
                let owner = Item::cast(call.owner()?)?;
                let name = owner.name_token()?.text_range() - item_range.start();
                let bindings = FxHashMap::from_iter([(SmolStr::new("name"), name)]);
                Some(expander::substitute(template, &bindings, &text[item_range]))
            }
            _ => None,
        }
    }

    fn compute_expansion(&self, call: &MacroCall) -> Option<Arc<MacroExpansion>> {
        let Some(expanded) = self.run_macro(call) else {
            tracing::debug!(name = ?call.name(), "macro did not expand");
            return None;
        };
        let kind = call.expansion_context_kind();
        let base = self
            .allocator
            .allocate(rowan::TextSize::of(expanded.text.as_str()))?;
        let file = self.push_file(
            None,
            &expanded.text,
            kind.entry_point(),
            FileOrigin::Expansion { call: call.key() },
        );
        Some(Arc::new(MacroExpansion {
            file,
            context: ExpansionContext {
                kind,
                expansion_file_start_offset: base,
            },
            ranges: RangeMap::new(expanded.ranges),
        }))
    }

    // The file an `include!` call names, if it is in the workspace.
    fn include_target(&self, call: &MacroCall) -> Option<FileId> {
        if !call.is_include() {
            return None;
        }
        let text = self.file_text(call.file_id())?;
        let body = &text[call.local_body_range()?];
        let path = body.trim().strip_prefix('"')?.strip_suffix('"')?;
        self.file_id(path)
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpansionDb for TestWorkspace {
    fn file_syntax(&self, file: FileId) -> Option<SyntaxNode> {
        let files = self.files.read();
        let data = files.get(file.0 as usize)?;
        Some(SyntaxNode::new_root(data.green.clone()))
    }

    fn macro_expansion(&self, call: &MacroCall) -> Option<Arc<MacroExpansion>> {
        let key = call.key();
        if let Some(cached) = self.expansions.read().get(&key) {
            return cached.clone();
        }
        if call.is_include() {
            return None;
        }
        // Held across the computation so racing callers register the
        // expansion file once.
        let mut expansions = self.expansions.write();
        if let Some(cached) = expansions.get(&key) {
            return cached.clone();
        }
        let computed = self.compute_expansion(call);
        expansions.insert(key, computed.clone());
        computed
    }

    fn expansion_call(&self, file: FileId) -> Option<MacroCall> {
        match self.file(file)?.origin {
            FileOrigin::Source { .. } => None,
            FileOrigin::Expansion { call } => self.call_from_key(call),
        }
    }

    fn included_from(&self, file: FileId) -> Option<MacroCall> {
        let count = self.files.read().len();
        (0..count)
            .filter_map(|idx| u32::try_from(idx).ok().map(FileId))
            .flat_map(|candidate| self.calls_in(candidate))
            .find(|call| self.include_target(call) == Some(file))
    }

    fn file_crate(&self, file: FileId) -> Option<CrateId> {
        match self.file(file)?.origin {
            FileOrigin::Source { krate } => Some(krate),
            FileOrigin::Expansion { .. } => None,
        }
    }

    fn overlay(&self) -> &ExpansionOverlay {
        &self.overlay
    }

    fn max_expansion_depth(&self) -> usize {
        self.max_depth
    }
}
