use weft_source::TextSize;

mod keywords;

/// Token and node kinds for the weft item language.
///
/// Layout: tokens `0..NODE_START`, nodes `NODE_START..`.
/// **Never reorder existing variants** -- ordinal stability matters for rowan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    // Trivia
    Whitespace = 0,
    LineComment,
    BlockComment,

    // Punctuation
    Semicolon,
    Comma,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Colon,
    Dot,
    Eq,
    Bang,
    Pound,
    Dollar,
    Amp,
    Lt,
    Gt,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,

    // Literals
    IntLiteral,
    StringLiteral,
    Lifetime,

    // Identifiers
    Ident,

    // Keywords
    StructKw,
    FnKw,
    LetKw,
    ModKw,
    TypeKw,

    // Special
    Error,
    Eof,

    // Node boundary
    #[doc(hidden)]
    __NodeStart,

    // Roots, one per parse entry point
    SourceFile,
    MacroItems,
    MacroStmts,
    MacroExpr,
    MacroPat,
    MacroType,
    MacroLifetime,

    // Items
    StructItem,
    FnItem,
    ModItem,
    TypeAlias,
    ItemList,
    Name,

    // Macros
    MacroCall,
    MacroArgument,
    Path,
    Attr,
    AttrArgs,

    // Statements and fragments
    Block,
    LetStmt,
    ExprStmt,
    Expr,
    Pat,
    TypeRef,
    ParamList,
    FieldList,

    ErrorNode,
}

/// First node kind value -- tokens are `< NODE_START`, nodes `>= NODE_START`.
pub const NODE_START: u16 = SyntaxKind::__NodeStart as u16;

impl SyntaxKind {
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            SyntaxKind::Whitespace | SyntaxKind::LineComment | SyntaxKind::BlockComment
        )
    }

    pub fn is_node(self) -> bool {
        self as u16 > NODE_START
    }

    /// Root kinds produced by the expansion entry points.
    pub fn is_expansion_root(self) -> bool {
        matches!(
            self,
            SyntaxKind::MacroItems
                | SyntaxKind::MacroStmts
                | SyntaxKind::MacroExpr
                | SyntaxKind::MacroPat
                | SyntaxKind::MacroType
                | SyntaxKind::MacroLifetime
        )
    }
}

/// A lexed token (kind + length).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub len: TextSize,
}

/// Lex the full source string into a list of tokens (including trivia).
pub fn lex(src: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut rest = src;

    while !rest.is_empty() {
        let (kind, consumed) = lex_one(rest);
        tokens.push(Token {
            kind,
            #[allow(clippy::cast_possible_truncation)]
            len: TextSize::new(consumed as u32),
        });
        rest = &rest[consumed..];
    }

    tokens.push(Token {
        kind: SyntaxKind::Eof,
        len: TextSize::new(0),
    });
    tokens
}

fn lex_one(s: &str) -> (SyntaxKind, usize) {
    let bytes = s.as_bytes();
    let c = bytes[0];

    // Whitespace
    if c.is_ascii_whitespace() {
        let n = bytes.iter().take_while(|b| b.is_ascii_whitespace()).count();
        return (SyntaxKind::Whitespace, n);
    }

    // Line comment
    if bytes.len() >= 2 && c == b'/' && bytes[1] == b'/' {
        let n = bytes.iter().take_while(|&&b| b != b'\n').count();
        return (SyntaxKind::LineComment, n);
    }

    // Block comment
    if bytes.len() >= 2 && c == b'/' && bytes[1] == b'*' {
        let end = s[2..].find("*/").map_or(s.len(), |i| i + 4);
        return (SyntaxKind::BlockComment, end);
    }

    // Single-char punctuation
    let punct = match c {
        b';' => Some(SyntaxKind::Semicolon),
        b',' => Some(SyntaxKind::Comma),
        b'(' => Some(SyntaxKind::LParen),
        b')' => Some(SyntaxKind::RParen),
        b'{' => Some(SyntaxKind::LBrace),
        b'}' => Some(SyntaxKind::RBrace),
        b'[' => Some(SyntaxKind::LBracket),
        b']' => Some(SyntaxKind::RBracket),
        b':' => Some(SyntaxKind::Colon),
        b'.' => Some(SyntaxKind::Dot),
        b'=' => Some(SyntaxKind::Eq),
        b'!' => Some(SyntaxKind::Bang),
        b'#' => Some(SyntaxKind::Pound),
        b'$' => Some(SyntaxKind::Dollar),
        b'&' => Some(SyntaxKind::Amp),
        b'<' => Some(SyntaxKind::Lt),
        b'>' => Some(SyntaxKind::Gt),
        b'+' => Some(SyntaxKind::Plus),
        b'-' => Some(SyntaxKind::Minus),
        b'*' => Some(SyntaxKind::Star),
        _ => None,
    };
    if let Some(kind) = punct {
        return (kind, 1);
    }

    // Slash (when not a comment)
    if c == b'/' {
        return (SyntaxKind::Slash, 1);
    }

    // String literal
    if c == b'"' {
        let n = 1 + bytes[1..].iter().take_while(|&&b| b != b'"').count() + 1;
        let n = n.min(s.len());
        return (SyntaxKind::StringLiteral, n);
    }

    // Lifetime: `'` followed by an identifier
    if c == b'\'' {
        let n = bytes[1..]
            .iter()
            .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
            .count();
        if n == 0 {
            return (SyntaxKind::Error, 1);
        }
        return (SyntaxKind::Lifetime, 1 + n);
    }

    // Integer literal
    if c.is_ascii_digit() {
        let n = bytes
            .iter()
            .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
            .count();
        return (SyntaxKind::IntLiteral, n);
    }

    // Identifier / keyword
    if c.is_ascii_alphabetic() || c == b'_' {
        let n = bytes
            .iter()
            .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
            .count();
        return (keywords::classify_keyword(&s[..n]), n);
    }

    // Unknown -> error token, consume one char
    let n = s.chars().next().map_or(1, char::len_utf8);
    (SyntaxKind::Error, n)
}
