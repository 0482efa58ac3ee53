use weft_parser::{EntryPoint, SyntaxKind, parse};

fn lossless(src: &str, entry: EntryPoint) -> usize {
    let parse = parse(src, entry);
    assert_eq!(parse.syntax().text().to_string(), src);
    parse.errors.len()
}

#[test]
fn stray_tokens_are_reported() {
    assert!(lossless("struct A; 42 struct B;", EntryPoint::SourceFile) > 0);
}

#[test]
fn unclosed_delimiters_are_reported() {
    assert!(lossless("m!(a", EntryPoint::SourceFile) > 0);
    assert!(lossless("fn f() { let x = (1", EntryPoint::SourceFile) > 0);
}

#[test]
fn unbalanced_closer_in_fragment() {
    assert!(lossless("a ) b", EntryPoint::Expr) > 0);
}

#[test]
fn attribute_without_item() {
    let parse = parse("#[identity]", EntryPoint::SourceFile);
    assert!(!parse.errors.is_empty());
    let root = parse.syntax();
    assert!(root.descendants().any(|n| n.kind() == SyntaxKind::ErrorNode));
}

#[test]
fn empty_input() {
    for entry in [EntryPoint::SourceFile, EntryPoint::Expr, EntryPoint::Stmts] {
        assert_eq!(lossless("", entry), 0);
    }
}
