use weft_parser::{SyntaxKind, SyntaxNode};
use weft_source::{FileId, InFile, TextRange};

use crate::FileNode;
use crate::db::ExpansionDb;

/// A weak reference to a syntax node, valid across threads.
///
/// Resolving it against a tree that no longer has a node of the same
/// kind and range yields `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodePtr {
    file_id: FileId,
    kind: SyntaxKind,
    range: TextRange,
}

impl NodePtr {
    pub fn new(node: &FileNode) -> Self {
        Self {
            file_id: node.file_id,
            kind: node.value.kind(),
            range: node.value.text_range(),
        }
    }

    pub fn file_id(&self) -> FileId {
        self.file_id
    }

    pub fn kind(&self) -> SyntaxKind {
        self.kind
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn to_node(&self, db: &dyn ExpansionDb) -> Option<FileNode> {
        let root = db.file_syntax(self.file_id)?;
        self.resolve_in(&root)
            .map(|node| InFile::new(self.file_id, node))
    }

    fn resolve_in(&self, root: &SyntaxNode) -> Option<SyntaxNode> {
        if !root.text_range().contains_range(self.range) {
            return None;
        }
        let start = match root.covering_element(self.range) {
            rowan::NodeOrToken::Node(node) => node,
            rowan::NodeOrToken::Token(token) => token.parent()?,
        };
        start
            .ancestors()
            .find(|n| n.kind() == self.kind && n.text_range() == self.range)
    }
}
