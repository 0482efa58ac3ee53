use pretty_assertions::assert_eq;
use weft_parser::{EntryPoint, SyntaxKind};

use super::common::{child_kinds, first, parse_ok};

#[test]
fn let_statement_parts() {
    let root = parse_ok("fn f() { let x: u32 = 1 + 2; }", EntryPoint::SourceFile);
    let (stmt, _) = first(&root, SyntaxKind::LetStmt).unwrap();
    assert_eq!(
        child_kinds(&stmt),
        vec![SyntaxKind::Pat, SyntaxKind::TypeRef, SyntaxKind::Expr]
    );
    let (_, expr) = first(&stmt, SyntaxKind::Expr).unwrap();
    assert_eq!(expr, "1 + 2");
}

#[test]
fn macro_calls_in_fragment_positions() {
    let root = parse_ok(
        "fn f() { let p!(a) = e!(1); stmt!(); }",
        EntryPoint::SourceFile,
    );
    let parents: Vec<_> = root
        .descendants()
        .filter(|n| n.kind() == SyntaxKind::MacroCall)
        .map(|n| n.parent().unwrap().kind())
        .collect();
    assert_eq!(
        parents,
        vec![SyntaxKind::Pat, SyntaxKind::Expr, SyntaxKind::Block]
    );
}

#[test]
fn type_alias_macro_in_type_position() {
    let root = parse_ok("type T = ty!(u8);", EntryPoint::SourceFile);
    let (call, _) = first(&root, SyntaxKind::MacroCall).unwrap();
    assert_eq!(call.parent().unwrap().kind(), SyntaxKind::TypeRef);
}

#[test]
fn expression_entry_point_keeps_tokens_under_root() {
    let root = parse_ok("a + m!(b)", EntryPoint::Expr);
    assert_eq!(root.kind(), SyntaxKind::MacroExpr);
    assert_eq!(child_kinds(&root), vec![SyntaxKind::MacroCall]);
}

#[test]
fn statements_entry_point() {
    let root = parse_ok("let a = 1; a;", EntryPoint::Stmts);
    assert_eq!(root.kind(), SyntaxKind::MacroStmts);
    assert_eq!(
        child_kinds(&root),
        vec![SyntaxKind::LetStmt, SyntaxKind::ExprStmt]
    );
}

#[test]
fn lifetime_entry_point() {
    let root = parse_ok("'a", EntryPoint::Lifetime);
    assert_eq!(root.kind(), SyntaxKind::MacroLifetime);
    assert_eq!(root.first_token().unwrap().kind(), SyntaxKind::Lifetime);
}
