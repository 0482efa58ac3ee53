use smol_str::SmolStr;
use weft_lexer::SyntaxKind;
use weft_parser::SyntaxToken;
use weft_source::{TextRange, TextSize};

use crate::item::Item;
use crate::node::{AstNode, ast_nodes};
use crate::support::{self, AstChildren};

ast_nodes! {
    SourceFile(SourceFile);
    /// A function-like macro call, `path!(..)`, in any syntactic position.
    MacroCall(MacroCall);
    /// The delimited argument of a function-like call, delimiters included.
    MacroArgument(MacroArgument);
    Path(Path);
    /// `#[path]` or `#[path(args)]`, a child of the item it decorates.
    Attr(Attr);
    AttrArgs(AttrArgs);
    StructItem(StructItem);
    FnItem(FnItem);
    ModItem(ModItem);
    TypeAlias(TypeAlias);
    ItemList(ItemList);
    Name(Name);
    Block(Block);
    LetStmt(LetStmt);
}

impl SourceFile {
    pub fn items(&self) -> AstChildren<Item> {
        support::children(&self.syntax)
    }
}

impl MacroCall {
    pub fn path(&self) -> Option<Path> {
        support::child(&self.syntax)
    }

    pub fn path_name(&self) -> Option<SmolStr> {
        self.path().and_then(|p| p.name())
    }

    pub fn argument(&self) -> Option<MacroArgument> {
        support::child(&self.syntax)
    }

    pub fn semicolon_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::Semicolon)
    }
}

impl MacroArgument {
    pub fn l_delim(&self) -> Option<SyntaxToken> {
        support::significant_tokens(&self.syntax).next()
    }

    /// The closing delimiter, if the argument is terminated.
    pub fn r_delim(&self) -> Option<SyntaxToken> {
        let open = self.l_delim()?.kind();
        let close = support::significant_tokens(&self.syntax).last()?;
        let matches = matches!(
            (open, close.kind()),
            (SyntaxKind::LParen, SyntaxKind::RParen)
                | (SyntaxKind::LBrace, SyntaxKind::RBrace)
                | (SyntaxKind::LBracket, SyntaxKind::RBracket)
        );
        (matches && close.text_range().start() > self.syntax.text_range().start())
            .then_some(close)
    }

    /// The range strictly inside the delimiters.
    ///
    /// An unterminated argument extends to the end of the node.
    pub fn body_range(&self) -> Option<TextRange> {
        let start = self.l_delim()?.text_range().end();
        let end = match self.r_delim() {
            Some(close) => close.text_range().start(),
            None => self.syntax.text_range().end(),
        };
        (start <= end).then(|| TextRange::new(start, end))
    }
}

impl Path {
    pub fn ident_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::Ident)
    }

    pub fn name(&self) -> Option<SmolStr> {
        self.ident_token().map(|tok| SmolStr::new(tok.text()))
    }
}

impl Attr {
    pub fn path(&self) -> Option<Path> {
        support::child(&self.syntax)
    }

    pub fn path_name(&self) -> Option<SmolStr> {
        self.path().and_then(|p| p.name())
    }

    pub fn args(&self) -> Option<AttrArgs> {
        support::child(&self.syntax)
    }

    pub fn is_derive(&self) -> bool {
        self.path_name().is_some_and(|name| name == "derive")
    }

    /// The item this attribute decorates.
    pub fn owner(&self) -> Option<Item> {
        self.syntax.parent().and_then(Item::cast)
    }
}

impl AttrArgs {
    /// Identifiers listed in the arguments, e.g. the macro names of a derive.
    pub fn idents(&self) -> impl Iterator<Item = SyntaxToken> {
        support::significant_tokens(&self.syntax).filter(|tok| tok.kind() == SyntaxKind::Ident)
    }
}

impl ModItem {
    pub fn item_list(&self) -> Option<ItemList> {
        support::child(&self.syntax)
    }
}

impl ItemList {
    pub fn items(&self) -> AstChildren<Item> {
        support::children(&self.syntax)
    }
}

impl Name {
    pub fn ident_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::Ident)
    }

    pub fn text_value(&self) -> Option<SmolStr> {
        self.ident_token().map(|tok| SmolStr::new(tok.text()))
    }
}

impl Block {
    pub fn let_stmts(&self) -> AstChildren<LetStmt> {
        support::children(&self.syntax)
    }

    pub fn macro_calls(&self) -> AstChildren<MacroCall> {
        support::children(&self.syntax)
    }
}

impl FnItem {
    pub fn body(&self) -> Option<Block> {
        support::child(&self.syntax)
    }
}

/// Offset of the first significant token of `node`, if any.
pub fn first_significant_offset<N: AstNode>(node: &N) -> Option<TextSize> {
    node.syntax()
        .descendants_with_tokens()
        .filter_map(rowan::NodeOrToken::into_token)
        .find(|tok| !tok.kind().is_trivia())
        .map(|tok| tok.text_range().start())
}
