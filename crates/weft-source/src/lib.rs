pub use text_size::{TextRange, TextSize};

mod expansion;
pub use expansion::{ExpansionFrame, ExpansionKind, FileLoc};

mod in_file;
pub use in_file::InFile;

/// Opaque handle to a file known to the expansion database.
///
/// Both genuine source files and synthetic expansion files are
/// identified by a `FileId`; which one a given id names is a question
/// for the database, not for the handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub u32);

/// Opaque handle to the crate a source file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CrateId(pub u32);

/// A span within a single file.
///
/// `range` is file-local: for expansion files it does not include the
/// file's virtual start offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub file: FileId,
    pub range: TextRange,
}

impl Span {
    pub fn new(file: FileId, range: TextRange) -> Self {
        Self { file, range }
    }

    /// The start of the span as a point location.
    pub fn start(self) -> FileLoc {
        FileLoc {
            file: self.file,
            offset: self.range.start(),
        }
    }
}
