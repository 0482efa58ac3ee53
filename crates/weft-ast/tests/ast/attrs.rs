use pretty_assertions::assert_eq;
use weft_ast::{AstNode, Attr, Item};
use weft_lexer::SyntaxKind;
use weft_parser::{EntryPoint, parse};

fn attrs(src: &str) -> Vec<Attr> {
    let root = parse(src, EntryPoint::SourceFile).syntax();
    root.descendants().filter_map(Attr::cast).collect()
}

#[test]
fn derive_lists_macro_names() {
    let attrs = attrs("#[derive(Clone, Debug)] struct S;");
    assert_eq!(attrs.len(), 1);
    assert!(attrs[0].is_derive());
    let names: Vec<_> = attrs[0]
        .args()
        .unwrap()
        .idents()
        .map(|tok| tok.text().to_string())
        .collect();
    assert_eq!(names, vec!["Clone", "Debug"]);
}

#[test]
fn attribute_owner_is_the_item() {
    let attrs = attrs("#[identity]\nfn f() {}");
    let owner: Item = attrs[0].owner().unwrap();
    assert_eq!(owner.kind(), SyntaxKind::FnItem);
    assert_eq!(owner.name_token().unwrap().text(), "f");
    assert_eq!(owner.attrs().count(), 1);
    assert!(!attrs[0].is_derive());
    assert_eq!(attrs[0].path_name().as_deref(), Some("identity"));
}

#[test]
fn nested_module_items_keep_attributes() {
    let root = parse("mod m { #[a] #[b] struct S; }", EntryPoint::SourceFile).syntax();
    let item = root
        .descendants()
        .filter_map(Item::cast)
        .find(|item| item.kind() == SyntaxKind::StructItem)
        .unwrap();
    let paths: Vec<_> = item
        .attrs()
        .map(|a| a.path_name().unwrap().to_string())
        .collect();
    assert_eq!(paths, vec!["a", "b"]);
}
