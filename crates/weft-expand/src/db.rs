use std::sync::Arc;

use weft_parser::SyntaxNode;
use weft_source::{CrateId, FileId};

use crate::call::{MacroCall, MacroExpansion};
use crate::overlay::ExpansionOverlay;

/// Depth limit used when the database does not configure one.
pub const DEFAULT_MAX_EXPANSION_DEPTH: usize = 128;

/// What the expansion overlay needs from the host.
///
/// The host owns parsing, expansion and the include index. Every
/// method is a query: answers must stay stable for as long as the
/// host's inputs do, and `None` means "not known", never an error.
pub trait ExpansionDb {
    /// The syntax tree of a source or expansion file.
    fn file_syntax(&self, file: FileId) -> Option<SyntaxNode>;

    /// The expansion of `call`, if it expanded.
    fn macro_expansion(&self, call: &MacroCall) -> Option<Arc<MacroExpansion>>;

    /// The call whose expansion is `file`. `None` for genuine files.
    fn expansion_call(&self, file: FileId) -> Option<MacroCall>;

    /// The `include!` call that spliced `file` in, if any.
    fn included_from(&self, file: FileId) -> Option<MacroCall>;

    /// The crate a genuine source file belongs to.
    fn file_crate(&self, file: FileId) -> Option<CrateId>;

    fn overlay(&self) -> &ExpansionOverlay;

    /// Longest chain of nested expansions the lookups will follow.
    fn max_expansion_depth(&self) -> usize {
        DEFAULT_MAX_EXPANSION_DEPTH
    }
}
