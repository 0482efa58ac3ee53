mod item;
mod node;
mod nodes;
mod support;

pub use item::Item;
pub use node::AstNode;
pub use nodes::{
    Attr, AttrArgs, Block, FnItem, ItemList, LetStmt, MacroArgument, MacroCall, ModItem, Name,
    Path, SourceFile, StructItem, TypeAlias, first_significant_offset,
};
pub use support::AstChildren;
