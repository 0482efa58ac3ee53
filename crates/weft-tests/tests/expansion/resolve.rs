use std::path::Path;

use pretty_assertions::assert_eq;
use weft_expand::{
    ExpansionDb, FileNode, IndexAccess, ancestors_with_macros, crate_of_file, get_context,
    set_context,
};
use weft_lexer::SyntaxKind;
use weft_source::{CrateId, FileId};
use weft_tests::TestWorkspace;

use super::common::{descend, expand, nested, recursive, simple};

fn node(ws: &TestWorkspace, file: FileId, kind: SyntaxKind) -> FileNode {
    ws.find_node(file, kind, 0)
        .unwrap_or_else(|| panic!("no {kind:?} in {file:?}"))
}

fn kind_and_file(node: &FileNode) -> (SyntaxKind, FileId) {
    (node.value.kind(), node.file_id)
}

#[test]
fn expansion_items_live_at_the_call_site() {
    let (ws, main) = simple();
    let expansion = expand(&ws, main, "foo");
    let item = node(&ws, expansion, SyntaxKind::StructItem);
    let main_root = node(&ws, main, SyntaxKind::SourceFile);

    assert_eq!(get_context(&ws, &item, IndexAccess::Allowed), Some(main_root.clone()));
    // The root itself has no structural parent either.
    let root = node(&ws, expansion, SyntaxKind::MacroItems);
    assert_eq!(get_context(&ws, &root, IndexAccess::Allowed), Some(main_root));
}

#[test]
fn forbidden_index_access_falls_back_to_the_tree() {
    let (ws, main) = simple();
    let expansion = expand(&ws, main, "foo");
    let item = node(&ws, expansion, SyntaxKind::StructItem);
    let root = node(&ws, expansion, SyntaxKind::MacroItems);

    assert_eq!(get_context(&ws, &item, IndexAccess::Forbidden), Some(root.clone()));
    assert_eq!(get_context(&ws, &root, IndexAccess::Forbidden), None);
}

#[test]
fn nodes_below_file_level_use_their_parent() {
    let (ws, main) = simple();
    let expansion = expand(&ws, main, "foo");
    let name = node(&ws, expansion, SyntaxKind::Name);
    let item = node(&ws, expansion, SyntaxKind::StructItem);
    assert_eq!(get_context(&ws, &name, IndexAccess::Allowed), Some(item));
}

#[test]
fn nested_expansions_climb_to_source() {
    let (ws, main) = nested();
    let inner = expand(&ws, main, "foo");
    let leaf = expand(&ws, inner, "bar");
    let item = node(&ws, leaf, SyntaxKind::StructItem);
    let main_root = node(&ws, main, SyntaxKind::SourceFile);

    assert_eq!(get_context(&ws, &item, IndexAccess::Allowed), Some(main_root.clone()));
    // Asking again hits the memoized answer for both files.
    assert_eq!(get_context(&ws, &item, IndexAccess::Allowed), Some(main_root.clone()));
    let bar_call = node(&ws, inner, SyntaxKind::MacroCall);
    assert_eq!(get_context(&ws, &bar_call, IndexAccess::Allowed), Some(main_root));
}

#[test]
fn statement_position_call_has_its_block_as_context() {
    let mut ws = TestWorkspace::new();
    ws.define_macro("foo", "$i", "struct $i;");
    let main = ws.add_file("main.wf", "fn f() { foo!(X); }");
    let expansion = expand(&ws, main, "foo");
    let item = node(&ws, expansion, SyntaxKind::StructItem);

    assert_eq!(
        get_context(&ws, &item, IndexAccess::Allowed),
        Some(node(&ws, main, SyntaxKind::Block))
    );
}

#[test]
fn explicit_context_wins() {
    let (ws, main) = simple();
    let expansion = expand(&ws, main, "foo");
    let item = node(&ws, expansion, SyntaxKind::StructItem);
    let target = node(&ws, main, SyntaxKind::MacroCall);

    set_context(&ws, &item, &target);
    assert_eq!(get_context(&ws, &item, IndexAccess::Allowed), Some(target.clone()));
    assert_eq!(get_context(&ws, &item, IndexAccess::Forbidden), Some(target.clone()));
    // The context is per file: the root shares it.
    let root = node(&ws, expansion, SyntaxKind::MacroItems);
    assert_eq!(get_context(&ws, &root, IndexAccess::Forbidden), Some(target));

    ws.overlay().forget_file(expansion);
    assert_eq!(
        get_context(&ws, &item, IndexAccess::Allowed),
        Some(node(&ws, main, SyntaxKind::SourceFile))
    );
}

#[test]
fn later_explicit_context_replaces_earlier() {
    let (ws, main) = simple();
    let expansion = expand(&ws, main, "foo");
    let item = node(&ws, expansion, SyntaxKind::StructItem);
    let first = node(&ws, main, SyntaxKind::MacroCall);
    let second = node(&ws, main, SyntaxKind::Path);

    set_context(&ws, &item, &first);
    set_context(&ws, &item, &second);
    assert_eq!(get_context(&ws, &item, IndexAccess::Allowed), Some(second));
}

#[test]
fn forgetting_the_context_file_drops_the_link() {
    let (ws, main) = simple();
    let expansion = expand(&ws, main, "foo");
    let item = node(&ws, expansion, SyntaxKind::StructItem);
    let target = node(&ws, main, SyntaxKind::MacroCall);

    set_context(&ws, &item, &target);
    ws.overlay().forget_file(main);
    assert_eq!(
        get_context(&ws, &item, IndexAccess::Forbidden),
        Some(node(&ws, expansion, SyntaxKind::MacroItems))
    );
}

#[test]
fn include_context_is_the_include_site() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata/include");
    let ws = TestWorkspace::from_dir(&dir).unwrap();
    let main = ws.file_id("main.wf").unwrap();
    let helper = ws.file_id("helper.wf").unwrap();
    let item = node(&ws, helper, SyntaxKind::StructItem);

    assert_eq!(
        get_context(&ws, &item, IndexAccess::Allowed),
        Some(node(&ws, main, SyntaxKind::SourceFile))
    );
    assert_eq!(
        get_context(&ws, &item, IndexAccess::Forbidden),
        Some(node(&ws, helper, SyntaxKind::SourceFile))
    );
}

#[test]
fn include_inside_a_function_lives_in_its_module() {
    let mut ws = TestWorkspace::new();
    let helper = ws.add_file("helper.wf", "struct Helper;\n");
    let main = ws.add_file(
        "main.wf",
        "fn top() { include!(\"helper.wf\"); }\nmod m { fn f() { include!(\"helper.wf\"); } }\n",
    );
    let item = node(&ws, helper, SyntaxKind::StructItem);

    // The first include found is the one in `top`, outside any module.
    assert_eq!(
        get_context(&ws, &item, IndexAccess::Allowed),
        Some(node(&ws, main, SyntaxKind::SourceFile))
    );

    let mut ws = TestWorkspace::new();
    let helper = ws.add_file("helper.wf", "struct Helper;\n");
    let main = ws.add_file("main.wf", "mod m { fn f() { include!(\"helper.wf\"); } }\n");
    let item = node(&ws, helper, SyntaxKind::StructItem);
    assert_eq!(
        get_context(&ws, &item, IndexAccess::Allowed),
        Some(node(&ws, main, SyntaxKind::ItemList))
    );
}

#[test]
fn context_set_after_a_lookup_replaces_the_remembered_one() {
    let mut ws = TestWorkspace::new();
    ws.define_macro("foo", "$i*", "$i")
        .define_macro("bar", "$i", "struct $i;");
    let main = ws.add_file("main.wf", "foo! { bar!(Baz); }\nstruct Other;\n");
    let inner = expand(&ws, main, "foo");
    let leaf = expand(&ws, inner, "bar");
    let item = node(&ws, leaf, SyntaxKind::StructItem);

    assert_eq!(
        get_context(&ws, &item, IndexAccess::Allowed),
        Some(node(&ws, main, SyntaxKind::SourceFile))
    );

    let other = ws
        .find_token(main, "Other", 0)
        .and_then(|tok| {
            tok.value
                .parent_ancestors()
                .find(|n| n.kind() == SyntaxKind::StructItem)
                .map(|n| tok.with_value(n))
        })
        .unwrap();
    let bar_call = node(&ws, inner, SyntaxKind::MacroCall);
    set_context(&ws, &bar_call, &other);

    assert_eq!(get_context(&ws, &item, IndexAccess::Allowed), Some(other));
}

#[test]
fn crates_follow_expansions_and_inherited_contexts() {
    let mut ws = TestWorkspace::new();
    ws.define_macro("foo", "$i", "struct $i;");
    let main = ws.add_file_in_crate("main.wf", "foo!(X);", CrateId(1));
    let other = ws.add_file_in_crate("other.wf", "struct Other;", CrateId(2));
    let expansion = expand(&ws, main, "foo");

    assert_eq!(crate_of_file(&ws, main), Some(CrateId(1)));
    assert_eq!(crate_of_file(&ws, expansion), Some(CrateId(1)));

    let item = node(&ws, expansion, SyntaxKind::StructItem);
    set_context(&ws, &item, &node(&ws, other, SyntaxKind::StructItem));
    assert_eq!(crate_of_file(&ws, expansion), Some(CrateId(2)));

    ws.overlay().forget_file(expansion);
    assert_eq!(crate_of_file(&ws, expansion), Some(CrateId(1)));
}

#[test]
fn unknown_file_has_no_crate() {
    let (ws, _) = simple();
    assert_eq!(crate_of_file(&ws, FileId(99)), None);
}

#[test]
fn ancestors_cross_into_the_call_site() {
    let (ws, main) = simple();
    let expansion = expand(&ws, main, "foo");
    let name = node(&ws, expansion, SyntaxKind::Name);

    let ancestors: Vec<_> = ancestors_with_macros(&ws, &name, IndexAccess::Allowed)
        .map(|n| kind_and_file(&n))
        .collect();
    assert_eq!(
        ancestors,
        [
            (SyntaxKind::Name, expansion),
            (SyntaxKind::StructItem, expansion),
            (SyntaxKind::SourceFile, main),
        ]
    );

    let structural: Vec<_> = ancestors_with_macros(&ws, &name, IndexAccess::Forbidden)
        .map(|n| kind_and_file(&n))
        .collect();
    assert_eq!(
        structural,
        [
            (SyntaxKind::Name, expansion),
            (SyntaxKind::StructItem, expansion),
            (SyntaxKind::MacroItems, expansion),
        ]
    );
}

#[test]
fn deep_call_site_beyond_the_limit_is_not_followed() {
    let (ws, main) = recursive(2);
    let innermost = descend(&ws, main, 4);
    let call = node(&ws, innermost, SyntaxKind::MacroCall);
    assert_eq!(
        get_context(&ws, &call, IndexAccess::Allowed),
        Some(node(&ws, innermost, SyntaxKind::MacroItems))
    );

    let (ws, main) = recursive(weft_expand::DEFAULT_MAX_EXPANSION_DEPTH);
    let innermost = descend(&ws, main, 4);
    let call = node(&ws, innermost, SyntaxKind::MacroCall);
    assert_eq!(
        get_context(&ws, &call, IndexAccess::Allowed),
        Some(node(&ws, main, SyntaxKind::SourceFile))
    );
}
