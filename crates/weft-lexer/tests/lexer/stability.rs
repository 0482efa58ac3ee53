use weft_lexer::{NODE_START, SyntaxKind, lex};

#[test]
fn token_ordinal_stability() {
    // Token ordinals must never change across releases.
    // If this test fails, a variant was inserted or reordered.
    assert_eq!(SyntaxKind::Whitespace as u16, 0);
    assert_eq!(SyntaxKind::Semicolon as u16, 3);
    assert!(NODE_START > SyntaxKind::Eof as u16);
    assert!(NODE_START == SyntaxKind::__NodeStart as u16);
    assert_eq!(SyntaxKind::SourceFile as u16, NODE_START + 1);
}

#[test]
fn node_and_root_classification() {
    assert!(SyntaxKind::MacroCall.is_node());
    assert!(!SyntaxKind::Ident.is_node());
    assert!(SyntaxKind::MacroItems.is_expansion_root());
    assert!(!SyntaxKind::SourceFile.is_expansion_root());
}

#[test]
fn roundtrip_lex_all_text() {
    let inputs = [
        "struct X;",
        "foo! { bar!(Baz); }",
        "#[keep] fn f() { let x: T = e!(1); }",
        "type A<'a> = &'a B;",
        "include!(\"b.rs\");",
        "// comment\n/* block */",
    ];
    for input in inputs {
        let tokens = lex(input);
        let mut reconstructed = String::new();
        let mut pos = 0usize;
        for tok in &tokens {
            if tok.kind == SyntaxKind::Eof {
                break;
            }
            let len: usize = tok.len.into();
            reconstructed.push_str(&input[pos..pos + len]);
            pos += len;
        }
        assert_eq!(reconstructed, input);
    }
}
