use weft_parser::{SyntaxKind, SyntaxNode};
use weft_source::{CrateId, FileId, InFile};

use crate::FileNode;
use crate::db::ExpansionDb;
use crate::offsets::is_file_level;
use crate::ptr::NodePtr;

/// Whether context lookups may consult the host's indices (the
/// expansion-call and include lookups). Hosts forbid it while those
/// indices are being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexAccess {
    Allowed,
    Forbidden,
}

/// The logical parent of `node`.
///
/// For file-level nodes of an expansion or included file, in order:
/// an explicit context set with `set_context`, the context of the call
/// that produced the file, the module (item list or file root) holding
/// the `include!` call that spliced it in, and finally the structural
/// parent. The two call
/// lookups need the host's indices and are skipped under
/// `IndexAccess::Forbidden`. Every other node gets its structural parent.
pub fn get_context(db: &dyn ExpansionDb, node: &FileNode, access: IndexAccess) -> Option<FileNode> {
    if !is_file_level(&node.value) {
        return node.value.parent().map(|parent| node.with_value(parent));
    }
    if let Some(context) = explicit_context(db, node.file_id) {
        return Some(context);
    }
    if access == IndexAccess::Allowed {
        if let Some(context) = call_site_context(db, node.file_id) {
            return Some(context);
        }
    }
    node.value.parent().map(|parent| node.with_value(parent))
}

/// Make `context` the logical parent of the file-level nodes of the
/// file holding `node`, and let that file inherit its crate from the
/// file holding `context`.
pub fn set_context(db: &dyn ExpansionDb, node: &FileNode, context: &FileNode) {
    tracing::debug!(file = ?node.file_id, context_file = ?context.file_id, "setting expansion context");
    let overlay = db.overlay();
    overlay.set_explicit_context(node.file_id, NodePtr::new(context));
    overlay.clear_call_site_contexts();
    if context.file_id != node.file_id {
        overlay.set_inherited_from(node.file_id, context.file_id);
    }
}

/// The crate `file` belongs to, following inherited contexts, expansion
/// calls and includes back to a genuine file.
pub fn crate_of_file(db: &dyn ExpansionDb, file: FileId) -> Option<CrateId> {
    let limit = db.max_expansion_depth();
    let mut file = file;
    for _ in 0..=limit {
        if let Some(krate) = db.file_crate(file) {
            return Some(krate);
        }
        file = db
            .overlay()
            .inherited_from(file)
            .or_else(|| db.expansion_call(file).map(|call| call.file_id()))
            .or_else(|| db.included_from(file).map(|call| call.file_id()))?;
    }
    tracing::debug!(limit, "expansion depth limit exceeded while resolving a crate");
    None
}

fn explicit_context(db: &dyn ExpansionDb, file: FileId) -> Option<FileNode> {
    let ptr = db.overlay().explicit_context(file)?;
    let node = ptr.to_node(db);
    if node.is_none() {
        tracing::debug!(?file, "explicit context no longer resolves");
    }
    node
}

// The logical parent of the call that produced or included `file`,
// climbing out of nested expansions. Memoized for every file passed
// through; `set_context` drops the memo since any climb may have passed
// through the file it overrides.
fn call_site_context(db: &dyn ExpansionDb, file: FileId) -> Option<FileNode> {
    let overlay = db.overlay();
    if let Some(context) = overlay.call_site_context(file).and_then(|ptr| ptr.to_node(db)) {
        return Some(context);
    }

    let limit = db.max_expansion_depth();
    let mut visited = Vec::new();
    let mut current = file;
    let context = loop {
        if visited.len() > limit {
            tracing::debug!(limit, "expansion depth limit exceeded while resolving a context");
            return None;
        }
        let (call, included) = match db.expansion_call(current) {
            Some(call) => (call, false),
            None => (db.included_from(current)?, true),
        };
        visited.push(current);

        let owner = InFile::new(call.file_id(), call.owner()?);
        let anchor = if included {
            // An included file lives in the module holding the include.
            owner.with_value(containing_module(&owner.value))
        } else {
            owner
        };
        if anchor.value.kind() == SyntaxKind::ItemList {
            break anchor;
        }
        if !is_file_level(&anchor.value) {
            break anchor.value.parent().map(|p| anchor.with_value(p))?;
        }
        if let Some(context) = explicit_context(db, anchor.file_id) {
            break context;
        }
        if let Some(context) = overlay
            .call_site_context(anchor.file_id)
            .and_then(|ptr| ptr.to_node(db))
        {
            break context;
        }
        let produced = db.expansion_call(anchor.file_id).is_some()
            || db.included_from(anchor.file_id).is_some();
        if !produced {
            break file_root(&anchor);
        }
        current = anchor.file_id;
    };

    let ptr = NodePtr::new(&context);
    for file in visited {
        overlay.memoize_call_site_context(file, ptr);
    }
    Some(context)
}

// The nearest enclosing module body of `node`: an `ItemList`, or the
// root of its file.
fn containing_module(node: &SyntaxNode) -> SyntaxNode {
    node.ancestors()
        .skip(1)
        .find(|n| n.kind() == SyntaxKind::ItemList || n.parent().is_none())
        .unwrap_or_else(|| node.clone())
}

fn file_root(node: &FileNode) -> FileNode {
    let root = node.value.ancestors().last().unwrap_or_else(|| node.value.clone());
    node.with_value(root)
}

/// Iterator over the logical ancestors of a node, starting with the
/// node itself.
pub struct AncestorsWithMacros<'db> {
    db: &'db dyn ExpansionDb,
    access: IndexAccess,
    next: Option<FileNode>,
    file_changes: usize,
}

impl Iterator for AncestorsWithMacros<'_> {
    type Item = FileNode;

    fn next(&mut self) -> Option<FileNode> {
        let node = self.next.take()?;
        let parent = get_context(self.db, &node, self.access);
        if let Some(parent) = &parent {
            if parent.file_id != node.file_id {
                self.file_changes += 1;
            }
        }
        if self.file_changes > self.db.max_expansion_depth() {
            tracing::debug!("expansion depth limit exceeded while walking ancestors");
        } else {
            self.next = parent;
        }
        Some(node)
    }
}

pub fn ancestors_with_macros<'db>(
    db: &'db dyn ExpansionDb,
    node: &FileNode,
    access: IndexAccess,
) -> AncestorsWithMacros<'db> {
    AncestorsWithMacros {
        db,
        access,
        next: Some(node.clone()),
        file_changes: 0,
    }
}
