mod fragments;
mod items;
mod macros;
mod statements;

use weft_lexer::SyntaxKind;

use crate::EntryPoint;
use crate::parser::Parser;

pub(crate) fn entry(p: &mut Parser, entry: EntryPoint) {
    let m = p.start();
    match entry {
        EntryPoint::SourceFile | EntryPoint::Items => items::items_until(p, SyntaxKind::Eof),
        EntryPoint::Stmts => statements::stmts_until(p, SyntaxKind::Eof),
        EntryPoint::Expr | EntryPoint::Pat | EntryPoint::Type | EntryPoint::Lifetime => {
            loop {
                fragments::fragment_tokens(p, &[]);
                if p.at_end() {
                    break;
                }
                p.error_bump("unbalanced delimiter");
            }
        }
    }
    // Trailing trivia must be inside the root node for a valid rowan tree.
    p.eat_trivia();
    m.complete(p, entry.root_kind());
}
