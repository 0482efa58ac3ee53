use weft_lexer::SyntaxKind;

use crate::parser::Parser;

use super::macros;

// An expression, pattern or type: a run of tokens up to one of `stop` at
// nesting depth zero, with function-like macro calls as child nodes.
// Nothing is emitted for an empty run.
pub(super) fn fragment(p: &mut Parser, kind: SyntaxKind, stop: &[SyntaxKind]) {
    if at_fragment_end(p, stop) {
        p.error("expected an expression, pattern or type");
        return;
    }
    let m = p.start();
    fragment_tokens(p, stop);
    m.complete(p, kind);
}

pub(super) fn fragment_tokens(p: &mut Parser, stop: &[SyntaxKind]) {
    while !at_fragment_end(p, stop) {
        if p.at_macro_call() {
            macros::macro_call(p);
        } else if macros::closing(p.current()).is_some() {
            macros::token_tree(p);
        } else {
            p.bump();
        }
    }
}

fn at_fragment_end(p: &Parser, stop: &[SyntaxKind]) -> bool {
    p.at_end()
        || p.at_any(stop)
        || p.at_any(&[SyntaxKind::RParen, SyntaxKind::RBracket, SyntaxKind::RBrace])
}
