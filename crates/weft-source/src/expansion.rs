use crate::{FileId, Span};
use text_size::TextSize;

/// A precise location in a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileLoc {
    pub file: FileId,
    pub offset: TextSize,
}

/// The kind of expansion that produced a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpansionKind {
    /// Text substituted by a function-like, attribute or derive macro.
    MacroCall,
    /// A whole file spliced in by `include!`.
    Include,
}

/// One frame in the expansion stack, representing a single
/// expansion step (macro call or include).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpansionFrame {
    pub kind: ExpansionKind,
    /// The invocation that caused this step. Uses Span (file + range)
    /// so "expanded from here" notes can highlight the entire call,
    /// not just a point.
    pub call_site: Span,
    /// Where the element's first token is spelled in the call's file,
    /// if it was taken from the call body. `None` for text that only
    /// exists in the macro definition.
    pub origin: Option<FileLoc>,
}

impl ExpansionFrame {
    /// Whether the element's text was written at the call site rather
    /// than produced by the macro definition.
    pub fn is_spelled_at_call_site(&self) -> bool {
        self.origin.is_some()
    }
}
