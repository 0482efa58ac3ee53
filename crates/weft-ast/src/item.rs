use weft_lexer::SyntaxKind;
use weft_parser::{SyntaxNode, SyntaxToken};

use crate::node::AstNode;
use crate::nodes::{Attr, MacroCall, Name};
use crate::support::{self, AstChildren};

/// Any item: a declaration or an item-position macro call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Item {
    syntax: SyntaxNode,
}

impl AstNode for Item {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::StructItem
                | SyntaxKind::FnItem
                | SyntaxKind::ModItem
                | SyntaxKind::TypeAlias
                | SyntaxKind::MacroCall
        )
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl Item {
    pub fn kind(&self) -> SyntaxKind {
        self.syntax.kind()
    }

    pub fn attrs(&self) -> AstChildren<Attr> {
        support::children(&self.syntax)
    }

    pub fn name(&self) -> Option<Name> {
        support::child(&self.syntax)
    }

    /// The identifier naming this item, used as a navigation target.
    pub fn name_token(&self) -> Option<SyntaxToken> {
        self.name().and_then(|n| n.ident_token())
    }

    pub fn as_macro_call(&self) -> Option<MacroCall> {
        MacroCall::cast(self.syntax.clone())
    }
}
