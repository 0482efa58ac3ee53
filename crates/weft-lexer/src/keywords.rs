use crate::SyntaxKind;

/// Classify an identifier string as a keyword or plain `Ident`.
///
/// Only the keywords the item grammar needs are reserved. Everything
/// else, including names such as `include` and `derive`, lexes as an
/// identifier so it can be used as a macro path.
pub(crate) fn classify_keyword(word: &str) -> SyntaxKind {
    match word {
        "struct" => SyntaxKind::StructKw,
        "fn" => SyntaxKind::FnKw,
        "let" => SyntaxKind::LetKw,
        "mod" => SyntaxKind::ModKw,
        "type" => SyntaxKind::TypeKw,
        _ => SyntaxKind::Ident,
    }
}
