//! Macro-expansion overlay for syntax-tree tooling.
//!
//! Expansion files are ordinary trees that live in a shared virtual
//! offset space. This crate maps offsets, ranges and tokens between
//! call bodies and expansions, finds the call a node came from, and
//! gives expanded nodes a logical parent without touching the trees.

mod call;
mod db;
mod locate;
mod navigate;
mod offsets;
mod overlay;
mod ptr;
mod range_map;
mod resolve;
mod translate;

use weft_parser::{SyntaxElement, SyntaxNode, SyntaxToken};
use weft_source::InFile;

pub use call::{
    ExpansionContext, ExpansionOffsetAllocator, MacroCall, MacroCallKey, MacroCallKind,
    MacroExpansion, MacroExpansionContext,
};
pub use db::{DEFAULT_MAX_EXPANSION_DEPTH, ExpansionDb};
pub use locate::{
    ExpandedFromChain, calculate_macro_expansion_depth, expanded_from, expanded_from_chain,
    expanded_or_included_from, find_element_expanded_from, find_expansion_elements,
    find_macro_call_expanded_from, find_macro_call_expanded_from_non_recursive,
    find_macro_call_from_which_leaf_is_expanded, included_from, is_expanded_from_include_macro,
    is_expanded_from_macro,
};
pub use navigate::{
    came_from_macro_call, expansion_frames, find_expansion_element_or_self,
    find_navigation_target_if_macro_expansion, find_original_offset, inlay_hint_offset,
};
pub use offsets::{element_range, file_start_offset, is_file_level, token_starting_at};
pub use overlay::ExpansionOverlay;
pub use ptr::NodePtr;
pub use range_map::{MappedTextRange, MappingOutcome, RangeMap};
pub use resolve::{
    AncestorsWithMacros, IndexAccess, ancestors_with_macros, crate_of_file, get_context,
    set_context,
};
pub use translate::{
    map_offset_from_call_body_to_expansion, map_offset_from_expansion_to_call_body,
    map_range_from_expansion_to_call_body, map_range_from_expansion_to_call_body_strict,
};

pub type FileNode = InFile<SyntaxNode>;
pub type FileToken = InFile<SyntaxToken>;
pub type FileElement = InFile<SyntaxElement>;
