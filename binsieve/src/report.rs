use serde::Serialize;
use std::path::PathBuf;

/// Outcome of one full traversal
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    /// Paths the combinator decided to report, in traversal order
    pub matched: Vec<PathBuf>,
    /// Regular files evaluated by the matcher set
    pub files_scanned: usize,
    /// Files reported
    pub files_matched: usize,
    /// Entries skipped: symlinks and unreadable directory entries
    pub files_skipped: usize,
}

impl ScanReport {
    pub fn new() -> Self {
        Default::default()
    }

    pub(crate) fn record(&mut self, path: PathBuf, reported: bool) {
        self.files_scanned += 1;
        if reported {
            self.files_matched += 1;
            self.matched.push(path);
        }
    }

    pub(crate) fn skip(&mut self) {
        self.files_skipped += 1;
    }
}
