use rowan::TokenAtOffset;
use weft_parser::{SyntaxElement, SyntaxNode};
use weft_source::{FileId, InFile, TextRange, TextSize};

use crate::db::ExpansionDb;
use crate::{FileElement, FileToken};

/// Whether `node` is the root of its file or a direct child of it.
///
/// Only such nodes have a logical parent different from their
/// structural one.
pub fn is_file_level(node: &SyntaxNode) -> bool {
    node.parent().is_none_or(|parent| parent.parent().is_none())
}

/// Virtual offset at which `file` starts. Zero for genuine files.
pub fn file_start_offset(db: &dyn ExpansionDb, file: FileId) -> Option<TextSize> {
    match db.expansion_call(file) {
        None => Some(TextSize::from(0)),
        Some(call) => db
            .macro_expansion(&call)
            .map(|expansion| expansion.context.expansion_file_start_offset),
    }
}

/// Virtual range of an element.
pub fn element_range(db: &dyn ExpansionDb, element: &FileElement) -> Option<TextRange> {
    let base = file_start_offset(db, element.file_id)?;
    Some(element.value.text_range() + base)
}

pub(crate) fn element_start(db: &dyn ExpansionDb, element: &FileElement) -> Option<TextSize> {
    element_range(db, element).map(TextRange::start)
}

/// The token of `file` that starts exactly at virtual `offset`.
pub fn token_starting_at(db: &dyn ExpansionDb, file: FileId, offset: TextSize) -> Option<FileToken> {
    let base = file_start_offset(db, file)?;
    let local = offset.checked_sub(base)?;
    let root = db.file_syntax(file)?;
    if local >= root.text_range().end() {
        return None;
    }
    let token = match root.token_at_offset(local) {
        TokenAtOffset::None => return None,
        TokenAtOffset::Single(token) => token,
        TokenAtOffset::Between(_, right) => right,
    };
    (token.text_range().start() == local).then(|| InFile::new(file, token))
}

/// The nearest node at or above an element.
pub(crate) fn element_node(element: &SyntaxElement) -> Option<SyntaxNode> {
    match element {
        rowan::NodeOrToken::Node(node) => Some(node.clone()),
        rowan::NodeOrToken::Token(token) => token.parent(),
    }
}
