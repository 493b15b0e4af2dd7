//! Bounded history of recent terminal decisions for `mistake` recovery.
//!
//! Indices always refer to [`UndoLedger::list`] as displayed: oldest first,
//! `0..len`. Recovery leaves the entry in place, so recovering the same
//! document twice is harmless.

use std::collections::VecDeque;
use std::path::Path;

use crate::error::ErrorCode;
use crate::model::{Document, Metadata};
use crate::trash::{Trash, TrashError};

/// Maximum number of decisions kept for recovery.
pub const LEDGER_CAPACITY: usize = 5;

/// Errors raised while recovering a ledger entry.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The selected index is not in the displayed list.
    #[error("no ledger entry at index {index} (ledger holds {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// The entry's file could not be restored.
    #[error(transparent)]
    Trash(#[from] TrashError),
}

impl LedgerError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::IndexOutOfRange { .. } => ErrorCode::LedgerIndexOutOfRange,
            Self::Trash(err) => err.code(),
        }
    }
}

/// One recorded decision.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    /// The record as it stood when the decision was made.
    pub document: Document,
    /// Whether the decision moved the file into the trash.
    pub trashed: bool,
}

/// FIFO of the last [`LEDGER_CAPACITY`] documents that reached a terminal
/// decision, most recent last.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UndoLedger {
    entries: VecDeque<LedgerEntry>,
}

impl UndoLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `doc`, evicting the oldest entry once the ledger is full.
    /// `trashed` is true only when the decision moved the file to the trash.
    pub fn record(&mut self, doc: Document, trashed: bool) {
        if self.entries.len() == LEDGER_CAPACITY {
            if let Some(evicted) = self.entries.pop_front() {
                tracing::debug!(save_id = %evicted.document.save_id, "evicted from undo ledger");
            }
        }
        self.entries.push_back(LedgerEntry {
            document: doc,
            trashed,
        });
    }

    /// Documents in display order (oldest first).
    pub fn list(&self) -> impl ExactSizeIterator<Item = &Document> {
        self.entries.iter().map(|entry| &entry.document)
    }

    /// Entries in display order, with how each decision left the file.
    pub fn entries(&self) -> impl ExactSizeIterator<Item = &LedgerEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Document> {
        self.entries.get(index).map(|entry| &entry.document)
    }

    /// Undo the decision recorded at `index`.
    ///
    /// A file the decision moved to the trash is restored into `data_dir`
    /// first; a file the decision left alone must still be in `data_dir`, and
    /// the trash is not consulted for it. Only then is the record reinserted
    /// into `working` with `reviewed = false`. A failure leaves `working`
    /// untouched.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::IndexOutOfRange`] if `index >= self.len()`.
    /// - [`LedgerError::Trash`] if the file is in neither the trash nor
    ///   `data_dir`, or the move fails.
    pub fn recover_at(
        &self,
        index: usize,
        working: &mut Metadata,
        trash: &Trash,
        data_dir: &Path,
    ) -> Result<Document, LedgerError> {
        let entry = self.entries.get(index).ok_or(LedgerError::IndexOutOfRange {
            index,
            len: self.entries.len(),
        })?;

        let save_id = &entry.document.save_id;
        if entry.trashed {
            trash.restore(save_id, data_dir)?;
        } else if !data_dir.join(save_id).exists() {
            return Err(TrashError::NotFound {
                name: save_id.clone(),
                dest_dir: data_dir.to_path_buf(),
            }
            .into());
        }

        let mut doc = entry.document.clone();
        doc.reviewed = false;
        working.insert(doc.clone());
        tracing::info!(save_id = %doc.save_id, index, "decision undone");
        Ok(doc)
    }
}
