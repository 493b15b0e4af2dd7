//! Review progress summary for a data directory.

use serde::Serialize;

use crate::model::Metadata;
use crate::session::ReviewPaths;
use crate::store::{self, StoreError};

/// Counts describing how far review of a collection has progressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewProgress {
    pub total: usize,
    pub reviewed: usize,
    pub pending: usize,
    pub with_notes: usize,
    /// Documents whose file is missing from the data directory.
    pub missing_files: usize,
    pub backup_present: bool,
    /// First unreviewed id in review order, if any.
    pub next: Option<String>,
}

impl ReviewProgress {
    /// Summarise `metadata`; `file_exists` reports whether a document's file is
    /// present.
    pub fn from_metadata(
        metadata: &Metadata,
        backup_present: bool,
        file_exists: impl Fn(&str) -> bool,
    ) -> Self {
        let mut reviewed = 0;
        let mut with_notes = 0;
        let mut missing_files = 0;
        let mut next = None;
        for doc in metadata.iter() {
            if doc.reviewed {
                reviewed += 1;
            } else if next.is_none() {
                next = Some(doc.save_id.clone());
            }
            if !doc.notes.is_empty() {
                with_notes += 1;
            }
            if !file_exists(&doc.save_id) {
                missing_files += 1;
            }
        }
        Self {
            total: metadata.len(),
            reviewed,
            pending: metadata.len() - reviewed,
            with_notes,
            missing_files,
            backup_present,
            next,
        }
    }

    /// Load the metadata at `paths` and summarise it.
    ///
    /// # Errors
    ///
    /// Propagates [`store::load`] errors.
    pub fn load(paths: &ReviewPaths) -> Result<Self, StoreError> {
        let metadata = store::load(&paths.metadata)?;
        Ok(Self::from_metadata(&metadata, paths.backup.exists(), |id| {
            paths.document(id).exists()
        }))
    }

    /// Percentage of documents reviewed, rounded down.
    #[must_use]
    pub const fn percent_reviewed(&self) -> usize {
        if self.total == 0 {
            100
        } else {
            self.reviewed * 100 / self.total
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Document;

    fn metadata() -> Metadata {
        let mut md = Metadata::new();
        let mut a = Document::new("a.pdf");
        a.reviewed = true;
        a.add_note("good");
        md.insert(a);
        md.insert(Document::new("b.pdf"));
        let mut c = Document::new("c.pdf");
        c.add_note("check later");
        md.insert(c);
        md
    }

    #[test]
    fn counts_reviewed_pending_and_notes() {
        let progress = ReviewProgress::from_metadata(&metadata(), false, |_| true);
        assert_eq!(progress.total, 3);
        assert_eq!(progress.reviewed, 1);
        assert_eq!(progress.pending, 2);
        assert_eq!(progress.with_notes, 2);
        assert_eq!(progress.missing_files, 0);
        assert_eq!(progress.next.as_deref(), Some("b.pdf"));
        assert_eq!(progress.percent_reviewed(), 33);
    }

    #[test]
    fn missing_files_are_counted() {
        let progress = ReviewProgress::from_metadata(&metadata(), true, |id| id != "c.pdf");
        assert_eq!(progress.missing_files, 1);
        assert!(progress.backup_present);
    }

    #[test]
    fn empty_collection_is_complete() {
        let progress = ReviewProgress::from_metadata(&Metadata::new(), false, |_| true);
        assert_eq!(progress.percent_reviewed(), 100);
        assert!(progress.next.is_none());
    }
}
