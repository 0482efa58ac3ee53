use weft_lexer::SyntaxKind;

use crate::parser::Parser;

use super::fragments;
use super::items;
use super::macros;

// `{ stmts }`
pub(super) fn block(p: &mut Parser) {
    let m = p.start();
    p.bump(); // {
    stmts_until(p, SyntaxKind::RBrace);
    p.expect(SyntaxKind::RBrace);
    m.complete(p, SyntaxKind::Block);
}

pub(super) fn stmts_until(p: &mut Parser, end: SyntaxKind) {
    while !p.at(end) && !p.at_end() {
        stmt(p);
    }
}

fn stmt(p: &mut Parser) {
    match p.current() {
        SyntaxKind::LetKw => let_stmt(p),
        SyntaxKind::Semicolon => p.bump(),
        // A macro call in statement position, not an item.
        _ if p.at_macro_call() => {
            let m = p.start();
            macros::macro_call_parts(p);
            p.eat(SyntaxKind::Semicolon);
            m.complete(p, SyntaxKind::MacroCall);
        }
        _ if items::at_item_start(p) => items::item(p),
        SyntaxKind::RParen | SyntaxKind::RBracket | SyntaxKind::RBrace => {
            p.error_bump("unbalanced delimiter");
        }
        _ => {
            let m = p.start();
            fragments::fragment(p, SyntaxKind::Expr, &[SyntaxKind::Semicolon]);
            p.eat(SyntaxKind::Semicolon);
            m.complete(p, SyntaxKind::ExprStmt);
        }
    }
}

// `let Pat [: Type] [= Expr] ;`
fn let_stmt(p: &mut Parser) {
    let m = p.start();
    p.bump(); // let
    fragments::fragment(
        p,
        SyntaxKind::Pat,
        &[SyntaxKind::Colon, SyntaxKind::Eq, SyntaxKind::Semicolon],
    );
    if p.eat(SyntaxKind::Colon) {
        fragments::fragment(p, SyntaxKind::TypeRef, &[SyntaxKind::Eq, SyntaxKind::Semicolon]);
    }
    if p.eat(SyntaxKind::Eq) {
        fragments::fragment(p, SyntaxKind::Expr, &[SyntaxKind::Semicolon]);
    }
    p.expect(SyntaxKind::Semicolon);
    m.complete(p, SyntaxKind::LetStmt);
}
