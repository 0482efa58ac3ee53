use std::sync::atomic::{AtomicU32, Ordering};

use smol_str::SmolStr;
use weft_ast::{AstNode, Attr, Item};
use weft_parser::{EntryPoint, SyntaxElement, SyntaxKind, SyntaxNode};
use weft_source::{FileId, TextRange, TextSize};

use crate::db::ExpansionDb;
use crate::offsets;
use crate::range_map::RangeMap;

/// How a macro is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MacroCallKind {
    /// `name!(..)`, `name![..]` or `name! {..}`.
    FnLike,
    /// `#[name] item`.
    Attr,
    /// The `index`-th macro named in `#[derive(..)] item`.
    Derive { index: u32 },
}

/// The syntactic position of a call, which decides how its expansion
/// is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MacroExpansionContext {
    Item,
    Stmt,
    Expr,
    Pat,
    Type,
    Lifetime,
}

impl MacroExpansionContext {
    pub fn entry_point(self) -> EntryPoint {
        match self {
            MacroExpansionContext::Item => EntryPoint::Items,
            MacroExpansionContext::Stmt => EntryPoint::Stmts,
            MacroExpansionContext::Expr => EntryPoint::Expr,
            MacroExpansionContext::Pat => EntryPoint::Pat,
            MacroExpansionContext::Type => EntryPoint::Type,
            MacroExpansionContext::Lifetime => EntryPoint::Lifetime,
        }
    }
}

/// Where an expansion lives in the virtual offset space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExpansionContext {
    pub kind: MacroExpansionContext,
    /// Virtual offset of the first byte of the expansion file.
    pub expansion_file_start_offset: TextSize,
}

/// The output of expanding one call, as produced by the expander.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroExpansion {
    pub file: FileId,
    pub context: ExpansionContext,
    pub ranges: RangeMap,
}

/// A macro invocation in a source or expansion file.
///
/// For function-like calls `node` is the `MacroCall` node; for attribute
/// and derive calls it is the `Attr` node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MacroCall {
    file_id: FileId,
    kind: MacroCallKind,
    node: SyntaxNode,
}

/// A thread-safe identity for a `MacroCall`, usable as a map key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacroCallKey {
    pub file_id: FileId,
    pub range: TextRange,
    pub kind: MacroCallKind,
}

impl MacroCall {
    pub fn fn_like(file_id: FileId, call: &weft_ast::MacroCall) -> Self {
        Self {
            file_id,
            kind: MacroCallKind::FnLike,
            node: call.syntax().clone(),
        }
    }

    /// An attribute macro. `None` for `#[derive(..)]`.
    pub fn attr(file_id: FileId, attr: &Attr) -> Option<Self> {
        if attr.is_derive() {
            return None;
        }
        Some(Self {
            file_id,
            kind: MacroCallKind::Attr,
            node: attr.syntax().clone(),
        })
    }

    pub fn derive(file_id: FileId, attr: &Attr, index: u32) -> Option<Self> {
        if !attr.is_derive() || attr.args()?.idents().nth(index as usize).is_none() {
            return None;
        }
        Some(Self {
            file_id,
            kind: MacroCallKind::Derive { index },
            node: attr.syntax().clone(),
        })
    }

    /// All calls attached to `item`: its attribute macro, if any, then
    /// one call per derived name.
    pub fn for_item(file_id: FileId, item: &Item) -> Vec<Self> {
        let mut calls = Vec::new();
        for attr in item.attrs() {
            if attr.is_derive() {
                let count = attr.args().map_or(0, |args| args.idents().count());
                for (index, _) in (0u32..).zip(0..count) {
                    calls.extend(Self::derive(file_id, &attr, index));
                }
            } else {
                calls.extend(Self::attr(file_id, &attr));
            }
        }
        calls
    }

    pub fn file_id(&self) -> FileId {
        self.file_id
    }

    pub fn kind(&self) -> MacroCallKind {
        self.kind
    }

    pub fn syntax(&self) -> &SyntaxNode {
        &self.node
    }

    pub fn key(&self) -> MacroCallKey {
        MacroCallKey {
            file_id: self.file_id,
            range: self.node.text_range(),
            kind: self.kind,
        }
    }

    pub fn is_fn_like(&self) -> bool {
        self.kind == MacroCallKind::FnLike
    }

    /// The name of the invoked macro.
    pub fn name(&self) -> Option<SmolStr> {
        match self.kind {
            MacroCallKind::FnLike => weft_ast::MacroCall::cast(self.node.clone())?.path_name(),
            MacroCallKind::Attr => Attr::cast(self.node.clone())?.path_name(),
            MacroCallKind::Derive { .. } => self
                .derive_name_token()
                .map(|tok| SmolStr::new(tok.text())),
        }
    }

    pub fn is_include(&self) -> bool {
        self.is_fn_like() && self.name().is_some_and(|name| name == "include")
    }

    /// The element naming the macro: the call's path, or the name
    /// inside `#[derive(..)]`.
    pub fn path_element(&self) -> Option<SyntaxElement> {
        match self.kind {
            MacroCallKind::FnLike => weft_ast::MacroCall::cast(self.node.clone())?
                .path()
                .map(|p| p.syntax().clone().into()),
            MacroCallKind::Attr => Attr::cast(self.node.clone())?
                .path()
                .map(|p| p.syntax().clone().into()),
            MacroCallKind::Derive { .. } => self.derive_name_token().map(Into::into),
        }
    }

    /// The node the expansion stands in for: the call itself, or the
    /// item an attribute or derive is attached to.
    pub fn owner(&self) -> Option<SyntaxNode> {
        match self.kind {
            MacroCallKind::FnLike => Some(self.node.clone()),
            MacroCallKind::Attr | MacroCallKind::Derive { .. } => {
                self.node.parent().filter(|p| Item::can_cast(p.kind()))
            }
        }
    }

    /// File-local range of the text handed to the macro.
    ///
    /// Function-like calls pass the text inside their delimiters,
    /// attribute and derive calls the whole owner item. `None` when
    /// there is no argument or it is empty.
    pub fn local_body_range(&self) -> Option<TextRange> {
        let range = match self.kind {
            MacroCallKind::FnLike => weft_ast::MacroCall::cast(self.node.clone())?
                .argument()?
                .body_range()?,
            MacroCallKind::Attr | MacroCallKind::Derive { .. } => self.owner()?.text_range(),
        };
        (!range.is_empty()).then_some(range)
    }

    /// Virtual range of the call body.
    pub fn body_text_range(&self, db: &dyn ExpansionDb) -> Option<TextRange> {
        let local = self.local_body_range()?;
        let base = offsets::file_start_offset(db, self.file_id)?;
        Some(local + base)
    }

    /// The context the expansion is parsed in, from the call's position.
    pub fn expansion_context_kind(&self) -> MacroExpansionContext {
        if self.kind != MacroCallKind::FnLike {
            return MacroExpansionContext::Item;
        }
        let Some(parent) = self.node.parent() else {
            return MacroExpansionContext::Item;
        };
        match parent.kind() {
            SyntaxKind::SourceFile | SyntaxKind::MacroItems | SyntaxKind::ItemList => {
                MacroExpansionContext::Item
            }
            SyntaxKind::Block | SyntaxKind::MacroStmts => MacroExpansionContext::Stmt,
            SyntaxKind::Pat | SyntaxKind::MacroPat => MacroExpansionContext::Pat,
            SyntaxKind::TypeRef | SyntaxKind::MacroType => MacroExpansionContext::Type,
            SyntaxKind::MacroLifetime => MacroExpansionContext::Lifetime,
            _ => MacroExpansionContext::Expr,
        }
    }

    fn derive_name_token(&self) -> Option<weft_parser::SyntaxToken> {
        let MacroCallKind::Derive { index } = self.kind else {
            return None;
        };
        Attr::cast(self.node.clone())?
            .args()?
            .idents()
            .nth(index as usize)
    }
}

/// Hands out non-overlapping start offsets for expansion files.
///
/// Each allocation reserves `len + 1` offsets so that even empty
/// expansions get distinct bases.
#[derive(Debug, Default)]
pub struct ExpansionOffsetAllocator {
    next: AtomicU32,
}

impl ExpansionOffsetAllocator {
    pub const fn new() -> Self {
        Self {
            next: AtomicU32::new(0),
        }
    }

    /// Reserve room for an expansion of `len` bytes. `None` once the
    /// offset space is exhausted.
    pub fn allocate(&self, len: TextSize) -> Option<TextSize> {
        let reserve = u32::from(len).checked_add(1)?;
        self.next
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |next| {
                next.checked_add(reserve)
            })
            .ok()
            .map(TextSize::from)
    }
}
