use std::collections::HashSet;

use weft_source::{FileId, InFile};

#[test]
fn with_value_keeps_file() {
    let a = InFile::new(FileId(2), "node");
    let b = a.with_value(42u32);
    assert_eq!(b.file_id, FileId(2));
    assert_eq!(b.value, 42);
}

#[test]
fn map_transforms_value() {
    let a = InFile::new(FileId(1), 20u32);
    assert_eq!(a.map(|v| v + 1), InFile::new(FileId(1), 21));
}

#[test]
fn transpose_none_is_none() {
    let a: InFile<Option<u32>> = InFile::new(FileId(0), None);
    assert_eq!(a.transpose(), None);
    let b = InFile::new(FileId(0), Some(7u32));
    assert_eq!(b.transpose(), Some(InFile::new(FileId(0), 7)));
}

#[test]
fn same_value_in_different_files_differs() {
    let mut set = HashSet::new();
    set.insert(InFile::new(FileId(0), 5u32));
    set.insert(InFile::new(FileId(1), 5u32));
    assert_eq!(set.len(), 2);
}
