use weft_parser::SyntaxNode;
use weft_source::TextRange;

/// Trait for typed AST node wrappers.
///
/// Each wrapper corresponds to a single `SyntaxKind` node variant and provides
/// typed accessors for children and tokens.
pub trait AstNode: Sized {
    /// Returns `true` if the given `SyntaxKind` can be cast to this type.
    fn can_cast(kind: weft_lexer::SyntaxKind) -> bool;

    /// Try to cast a raw `SyntaxNode` into this typed wrapper.
    fn cast(node: SyntaxNode) -> Option<Self>;

    /// Access the underlying `SyntaxNode`.
    fn syntax(&self) -> &SyntaxNode;

    /// Range of this node. For nodes in expansion files this is the
    /// file-local range, not the virtual one.
    fn text_range(&self) -> TextRange {
        self.syntax().text_range()
    }

    /// Full source text of this node.
    fn text(&self) -> String {
        self.syntax().text().to_string()
    }
}

/// Generate typed wrappers, one per `SyntaxKind`.
macro_rules! ast_nodes {
    ($($(#[$meta:meta])* $name:ident($kind:ident);)*) => {$(
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            pub(crate) syntax: weft_parser::SyntaxNode,
        }

        impl $crate::node::AstNode for $name {
            fn can_cast(kind: weft_lexer::SyntaxKind) -> bool {
                kind == weft_lexer::SyntaxKind::$kind
            }

            fn cast(node: weft_parser::SyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self { syntax: node })
                } else {
                    None
                }
            }

            fn syntax(&self) -> &weft_parser::SyntaxNode {
                &self.syntax
            }
        }
    )*};
}

pub(crate) use ast_nodes;
