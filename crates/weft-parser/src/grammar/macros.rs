use weft_lexer::SyntaxKind;

use crate::parser::Parser;

// `path ! ( .. )` without the node and without a trailing `;`.
// The caller decides which node wraps it and whether `;` belongs to it.
pub(super) fn macro_call_parts(p: &mut Parser) {
    path(p);
    p.bump(); // !
    if p.at_any(&[SyntaxKind::LParen, SyntaxKind::LBrace, SyntaxKind::LBracket]) {
        let m = p.start();
        token_tree(p);
        m.complete(p, SyntaxKind::MacroArgument);
    } else {
        p.error("expected macro argument");
    }
}

// A function-like macro call in expression, pattern or type position.
pub(super) fn macro_call(p: &mut Parser) {
    let m = p.start();
    macro_call_parts(p);
    m.complete(p, SyntaxKind::MacroCall);
}

// `# [ path [ ( .. ) ] ]`
pub(super) fn attr(p: &mut Parser) {
    let m = p.start();
    p.bump(); // #
    p.expect(SyntaxKind::LBracket);
    if p.at(SyntaxKind::Ident) {
        path(p);
    } else {
        p.error("expected attribute path");
    }
    if p.at(SyntaxKind::LParen) {
        let args = p.start();
        token_tree(p);
        args.complete(p, SyntaxKind::AttrArgs);
    }
    p.expect(SyntaxKind::RBracket);
    m.complete(p, SyntaxKind::Attr);
}

fn path(p: &mut Parser) {
    let m = p.start();
    p.bump();
    m.complete(p, SyntaxKind::Path);
}

// A delimited token tree. Nested trees are flat tokens: macro bodies are
// opaque until the expander re-parses their output.
pub(super) fn token_tree(p: &mut Parser) {
    let mut closers = Vec::new();
    loop {
        let kind = p.current();
        if let Some(close) = closing(kind) {
            closers.push(close);
            p.bump();
        } else if closers.last() == Some(&kind) {
            closers.pop();
            p.bump();
            if closers.is_empty() {
                return;
            }
        } else if kind == SyntaxKind::Eof {
            p.error("unclosed delimiter");
            return;
        } else {
            p.bump();
        }
    }
}

pub(super) fn closing(open: SyntaxKind) -> Option<SyntaxKind> {
    match open {
        SyntaxKind::LParen => Some(SyntaxKind::RParen),
        SyntaxKind::LBrace => Some(SyntaxKind::RBrace),
        SyntaxKind::LBracket => Some(SyntaxKind::RBracket),
        _ => None,
    }
}
