use std::path::Path;

use pretty_assertions::assert_eq;
use weft_expand::{
    came_from_macro_call, expansion_frames, find_expansion_element_or_self,
    find_navigation_target_if_macro_expansion, find_original_offset, inlay_hint_offset,
};
use weft_lexer::SyntaxKind;
use weft_source::{ExpansionFrame, ExpansionKind, FileLoc, InFile, Span, TextRange, TextSize};
use weft_tests::TestWorkspace;

use super::common::{call, element, expand, nested, simple, start, token};

fn ts(n: u32) -> TextSize {
    TextSize::from(n)
}

#[test]
fn hygiene_tells_argument_tokens_from_definition_tokens() {
    let (ws, main) = simple();
    let expansion = expand(&ws, main, "foo");
    assert!(came_from_macro_call(&ws, &element(&token(&ws, expansion, "X"))));
    assert!(!came_from_macro_call(&ws, &element(&token(&ws, expansion, "struct"))));
    assert!(!came_from_macro_call(&ws, &element(&token(&ws, main, "X"))));
}

#[test]
fn hygiene_ignores_attribute_output() {
    let mut ws = TestWorkspace::new();
    ws.define_identity_attr("wrap");
    let main = ws.add_file("main.wf", "#[wrap]\nstruct S;");
    let expansion = expand(&ws, main, "wrap");
    assert!(!came_from_macro_call(&ws, &element(&token(&ws, expansion, "S"))));
}

#[test]
fn expansion_element_or_self() {
    let (ws, main) = simple();
    let expansion = expand(&ws, main, "foo");
    let x = token(&ws, main, "X");
    assert_eq!(find_expansion_element_or_self(&ws, &x), token(&ws, expansion, "X"));
    let foo = token(&ws, main, "foo");
    assert_eq!(find_expansion_element_or_self(&ws, &foo), foo);

    let mut ws = TestWorkspace::new();
    ws.define_macro("twice", "$i", "fn $i() {} struct $i {}");
    let main = ws.add_file("main.wf", "twice!(bar);");
    let bar = token(&ws, main, "bar");
    assert_eq!(find_expansion_element_or_self(&ws, &bar), bar);
}

#[test]
fn navigation_follows_the_item_name() {
    let (ws, main) = simple();
    let expansion = expand(&ws, main, "foo");
    let item = ws.find_node(expansion, SyntaxKind::StructItem, 0).unwrap();

    let target = find_navigation_target_if_macro_expansion(&ws, &item.map(Into::into)).unwrap();
    assert_eq!(target, element(&token(&ws, main, "X")));
}

#[test]
fn navigation_falls_back_to_the_call_path() {
    let (ws, main) = simple();
    let expansion = expand(&ws, main, "foo");
    let keyword = element(&token(&ws, expansion, "struct"));

    let target = find_navigation_target_if_macro_expansion(&ws, &keyword).unwrap();
    let path = ws.find_node(main, SyntaxKind::Path, 0).unwrap();
    assert_eq!(target, InFile::new(main, path.value.into()));
}

#[test]
fn navigation_outside_expansions_is_none() {
    let (ws, main) = simple();
    let x = element(&token(&ws, main, "X"));
    assert_eq!(find_navigation_target_if_macro_expansion(&ws, &x), None);
}

#[test]
fn inlay_hint_lands_after_the_pattern() {
    let mut ws = TestWorkspace::new();
    ws.define_macro("hint", "$b*", "$b");
    let main = ws.add_file("main.wf", "fn f() { hint! { let x = 1; } }");
    let expansion = expand(&ws, main, "hint");
    assert_eq!(ws.file_text(expansion).unwrap().as_ref(), "let x = 1;");

    let x = element(&token(&ws, expansion, "x"));
    // `x` ends at 22 in the source.
    assert_eq!(inlay_hint_offset(&ws, &x, main), Some(ts(22)));

    let in_source = element(&token(&ws, main, "f"));
    assert_eq!(inlay_hint_offset(&ws, &in_source, main), Some(ts(4)));
}

#[test]
fn inlay_hint_needs_the_statement_copied_whole() {
    let mut ws = TestWorkspace::new();
    ws.define_macro("pair", "$x, $v", "let $x = $v;");
    let main = ws.add_file("main.wf", "fn f() { pair!(y, 2); }");
    let expansion = expand(&ws, main, "pair");
    assert_eq!(ws.file_text(expansion).unwrap().as_ref(), "let y = 2;");

    let y = element(&token(&ws, expansion, "y"));
    assert_eq!(inlay_hint_offset(&ws, &y, main), None);
}

#[test]
fn original_offset_rejects_ranges_outside_the_mapping() {
    let mut ws = TestWorkspace::new();
    ws.define_macro("hint", "$b*", "$b");
    let main = ws.add_file("main.wf", "fn f() { hint! { let x = 1; } }");
    let expansion = expand(&ws, main, "hint");
    let x = token(&ws, expansion, "x");
    let x_start = start(&ws, &x);
    let base = x_start - ts(4);

    let statement = TextRange::at(base, ts(10));
    assert_eq!(
        find_original_offset(&ws, &element(&x), x_start, statement, main),
        Some(ts(21))
    );
    // A range reaching past the copied text has no single source piece.
    let too_long = TextRange::at(base, ts(11));
    assert_eq!(
        find_original_offset(&ws, &element(&x), x_start, too_long, main),
        None
    );
}

#[test]
fn frames_for_nested_expansion() {
    let (ws, main) = nested();
    let inner = expand(&ws, main, "foo");
    let leaf = expand(&ws, inner, "bar");
    let baz = element(&token(&ws, leaf, "Baz"));

    let bar = call(&ws, inner, "bar");
    let foo = call(&ws, main, "foo");
    assert_eq!(
        expansion_frames(&ws, &baz),
        vec![
            ExpansionFrame {
                kind: ExpansionKind::MacroCall,
                call_site: Span::new(inner, bar.syntax().text_range()),
                origin: Some(FileLoc { file: inner, offset: ts(5) }),
            },
            ExpansionFrame {
                kind: ExpansionKind::MacroCall,
                call_site: Span::new(main, foo.syntax().text_range()),
                origin: Some(FileLoc { file: main, offset: ts(12) }),
            },
        ]
    );
}

#[test]
fn frames_past_a_definition_token_follow_the_call() {
    let mut ws = TestWorkspace::new();
    ws.define_macro("gen", "", "bar!(Baz);")
        .define_macro("bar", "$i", "struct $i;");
    let main = ws.add_file("main.wf", "gen!();\n");
    let generated = expand(&ws, main, "gen");
    let leaf = expand(&ws, generated, "bar");
    let baz = element(&token(&ws, leaf, "Baz"));

    let frames = expansion_frames(&ws, &baz);
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].origin, Some(FileLoc { file: generated, offset: ts(5) }));
    assert!(!frames[1].is_spelled_at_call_site());
    assert_eq!(
        frames[1].call_site,
        Span::new(main, call(&ws, main, "gen").syntax().text_range())
    );
}

#[test]
fn frames_for_included_file() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata/include");
    let ws = TestWorkspace::from_dir(&dir).unwrap();
    let main = ws.file_id("main.wf").unwrap();
    let helper = ws.file_id("helper.wf").unwrap();
    let include = call(&ws, main, "include");

    let frames = expansion_frames(&ws, &element(&token(&ws, helper, "Helper")));
    assert_eq!(
        frames,
        vec![ExpansionFrame {
            kind: ExpansionKind::Include,
            call_site: Span::new(main, include.syntax().text_range()),
            origin: Some(FileLoc { file: helper, offset: ts(7) }),
        }]
    );

    assert!(expansion_frames(&ws, &element(&token(&ws, main, "Main"))).is_empty());
}
