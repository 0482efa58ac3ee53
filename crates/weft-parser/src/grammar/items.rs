use weft_lexer::SyntaxKind;

use crate::parser::Parser;

use super::fragments;
use super::macros;
use super::statements;

pub(super) fn at_item_start(p: &Parser) -> bool {
    p.at_any(&[
        SyntaxKind::Pound,
        SyntaxKind::StructKw,
        SyntaxKind::FnKw,
        SyntaxKind::ModKw,
        SyntaxKind::TypeKw,
    ]) || p.at_macro_call()
}

// Parse items until `end` (exclusive) or EOF.
pub(super) fn items_until(p: &mut Parser, end: SyntaxKind) {
    while !p.at(end) && !p.at_end() {
        if at_item_start(p) {
            item(p);
        } else {
            p.error_bump("expected an item");
        }
    }
}

// Parse one item with its outer attributes. The attributes are children
// of the item node, so an attribute macro's owner is its parent.
pub(super) fn item(p: &mut Parser) {
    let m = p.start();
    while p.at(SyntaxKind::Pound) {
        macros::attr(p);
    }
    match p.current() {
        SyntaxKind::StructKw => {
            struct_item(p);
            m.complete(p, SyntaxKind::StructItem);
        }
        SyntaxKind::FnKw => {
            fn_item(p);
            m.complete(p, SyntaxKind::FnItem);
        }
        SyntaxKind::ModKw => {
            mod_item(p);
            m.complete(p, SyntaxKind::ModItem);
        }
        SyntaxKind::TypeKw => {
            type_alias(p);
            m.complete(p, SyntaxKind::TypeAlias);
        }
        _ if p.at_macro_call() => {
            macros::macro_call_parts(p);
            p.eat(SyntaxKind::Semicolon);
            m.complete(p, SyntaxKind::MacroCall);
        }
        _ => {
            p.error("expected an item after attributes");
            m.complete(p, SyntaxKind::ErrorNode);
        }
    }
}

// `struct Name [<..>] ( ; | { .. } | ( .. ) ; )`
fn struct_item(p: &mut Parser) {
    p.bump(); // struct
    name(p);
    generic_params(p);
    match p.current() {
        SyntaxKind::LBrace => field_list(p),
        SyntaxKind::LParen => {
            field_list(p);
            p.expect(SyntaxKind::Semicolon);
        }
        _ => p.expect(SyntaxKind::Semicolon),
    }
}

// `fn name [<..>] ( .. ) [-> Type] { .. }`
fn fn_item(p: &mut Parser) {
    p.bump(); // fn
    name(p);
    generic_params(p);
    if p.at(SyntaxKind::LParen) {
        let m = p.start();
        macros::token_tree(p);
        m.complete(p, SyntaxKind::ParamList);
    } else {
        p.error("expected parameter list");
    }
    if p.at(SyntaxKind::Minus) && p.nth(1) == SyntaxKind::Gt {
        p.bump();
        p.bump();
        fragments::fragment(p, SyntaxKind::TypeRef, &[SyntaxKind::LBrace]);
    }
    if p.at(SyntaxKind::LBrace) {
        statements::block(p);
    } else {
        p.expect(SyntaxKind::Semicolon);
    }
}

// `mod name ;` or `mod name { items }`
fn mod_item(p: &mut Parser) {
    p.bump(); // mod
    name(p);
    if p.at(SyntaxKind::LBrace) {
        let m = p.start();
        p.bump();
        items_until(p, SyntaxKind::RBrace);
        p.expect(SyntaxKind::RBrace);
        m.complete(p, SyntaxKind::ItemList);
    } else {
        p.expect(SyntaxKind::Semicolon);
    }
}

// `type Name [<..>] = Type ;`
fn type_alias(p: &mut Parser) {
    p.bump(); // type
    name(p);
    generic_params(p);
    p.expect(SyntaxKind::Eq);
    fragments::fragment(p, SyntaxKind::TypeRef, &[SyntaxKind::Semicolon]);
    p.expect(SyntaxKind::Semicolon);
}

fn name(p: &mut Parser) {
    if p.at(SyntaxKind::Ident) {
        let m = p.start();
        p.bump();
        m.complete(p, SyntaxKind::Name);
    } else {
        p.error("expected a name");
    }
}

// Generic parameters are kept as flat tokens of the owning item.
fn generic_params(p: &mut Parser) {
    if !p.eat(SyntaxKind::Lt) {
        return;
    }
    while !p.at(SyntaxKind::Gt) && !p.at_end() {
        if p.at_any(&[SyntaxKind::LBrace, SyntaxKind::Semicolon]) {
            p.error("unclosed generic parameter list");
            return;
        }
        p.bump();
    }
    p.expect(SyntaxKind::Gt);
}

fn field_list(p: &mut Parser) {
    let m = p.start();
    macros::token_tree(p);
    m.complete(p, SyntaxKind::FieldList);
}
