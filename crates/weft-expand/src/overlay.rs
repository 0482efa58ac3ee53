use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use weft_source::FileId;

use crate::ptr::NodePtr;

/// Side tables that give expanded nodes a logical parent.
///
/// Keyed by the expansion file; trees are never mutated. Entries hold
/// `NodePtr`s so the overlay is `Send + Sync`.
#[derive(Debug, Default)]
pub struct ExpansionOverlay {
    explicit: RwLock<FxHashMap<FileId, NodePtr>>,
    inherited: RwLock<FxHashMap<FileId, FileId>>,
    call_site: RwLock<FxHashMap<FileId, NodePtr>>,
}

impl ExpansionOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything recorded for `file` and every context pointing
    /// into it. Call when the file's expansion is recomputed.
    pub fn forget_file(&self, file: FileId) {
        tracing::debug!(?file, "forgetting expansion overlay entries");
        for table in [&self.explicit, &self.call_site] {
            table
                .write()
                .retain(|key, ptr| *key != file && ptr.file_id() != file);
        }
        self.inherited
            .write()
            .retain(|key, from| *key != file && *from != file);
    }

    pub(crate) fn explicit_context(&self, file: FileId) -> Option<NodePtr> {
        self.explicit.read().get(&file).copied()
    }

    pub(crate) fn set_explicit_context(&self, file: FileId, context: NodePtr) {
        self.explicit.write().insert(file, context);
    }

    pub(crate) fn inherited_from(&self, file: FileId) -> Option<FileId> {
        self.inherited.read().get(&file).copied()
    }

    pub(crate) fn set_inherited_from(&self, file: FileId, from: FileId) {
        self.inherited.write().insert(file, from);
    }

    pub(crate) fn call_site_context(&self, file: FileId) -> Option<NodePtr> {
        self.call_site.read().get(&file).copied()
    }

    pub(crate) fn memoize_call_site_context(&self, file: FileId, context: NodePtr) {
        self.call_site.write().insert(file, context);
    }

    /// Memoized call-site contexts are derived from the explicit ones
    /// along the whole climb, so any new explicit context drops them all.
    pub(crate) fn clear_call_site_contexts(&self) {
        self.call_site.write().clear();
    }
}
