use rowan::{GreenNode, GreenNodeBuilder, Language};
use weft_lexer::Token;
use weft_source::TextRange;

mod event;
mod grammar;
mod parser;

use event::Event;

pub use weft_lexer::SyntaxKind;

/// The weft language tag for rowan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WeftLanguage {}

impl Language for WeftLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> SyntaxKind {
        assert!(
            raw.0 <= SyntaxKind::ErrorNode as u16,
            "invalid SyntaxKind value: {}",
            raw.0
        );
        // SAFETY: SyntaxKind is repr(u16) with contiguous variants.
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: SyntaxKind) -> rowan::SyntaxKind {
        rowan::SyntaxKind(kind as u16)
    }
}

pub type SyntaxNode = rowan::SyntaxNode<WeftLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<WeftLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<WeftLanguage>;

/// Where parsing starts, and therefore which root kind the tree gets.
///
/// Genuine source files use `SourceFile`. Expansion text is re-parsed
/// with the entry point matching the syntactic position of the macro
/// call that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryPoint {
    SourceFile,
    Items,
    Stmts,
    Expr,
    Pat,
    Type,
    Lifetime,
}

impl EntryPoint {
    pub fn root_kind(self) -> SyntaxKind {
        match self {
            EntryPoint::SourceFile => SyntaxKind::SourceFile,
            EntryPoint::Items => SyntaxKind::MacroItems,
            EntryPoint::Stmts => SyntaxKind::MacroStmts,
            EntryPoint::Expr => SyntaxKind::MacroExpr,
            EntryPoint::Pat => SyntaxKind::MacroPat,
            EntryPoint::Type => SyntaxKind::MacroType,
            EntryPoint::Lifetime => SyntaxKind::MacroLifetime,
        }
    }
}

/// A syntax error with its file-local range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub range: TextRange,
    pub message: String,
}

/// Result of parsing one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parse {
    pub green: GreenNode,
    pub errors: Vec<ParseError>,
}

impl Parse {
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }
}

/// Parse `text` into a lossless green tree.
///
/// Never fails: malformed input produces `ErrorNode`s and entries in
/// `errors`, and the tree text always equals `text`.
pub fn parse(text: &str, entry: EntryPoint) -> Parse {
    let tokens = weft_lexer::lex(text);
    let mut p = parser::Parser::new(&tokens);
    grammar::entry(&mut p, entry);
    let (events, errors) = p.finish();
    Parse {
        green: build_tree(events, &tokens, text),
        errors,
    }
}

// Replay parser events into a green tree.
fn build_tree(events: Vec<Event>, tokens: &[Token], text: &str) -> GreenNode {
    let mut builder = GreenNodeBuilder::new();
    let mut tok_pos = 0usize;
    let mut cursor = 0usize;

    for event in events {
        match event {
            Event::Start { kind } => builder.start_node(WeftLanguage::kind_to_raw(kind)),
            Event::Finish => builder.finish_node(),
            Event::Token { n_raw_tokens } => {
                for _ in 0..n_raw_tokens {
                    let tok = tokens[tok_pos];
                    let len: usize = tok.len.into();
                    builder.token(
                        WeftLanguage::kind_to_raw(tok.kind),
                        &text[cursor..cursor + len],
                    );
                    cursor += len;
                    tok_pos += 1;
                }
            }
        }
    }

    builder.finish()
}
