//! The review session: walks the document queue, dispatches reviewer
//! commands and decides when to persist.
//!
//! # Lifecycle
//!
//! ```text
//! open ─▶ for each queued id:
//!           reviewed? ─▶ skip
//!           show ─▶ AwaitingInput ─┬─ approve / reject ─▶ next id
//!                                  ├─ note / reopen / mistake / ? ─▶ AwaitingInput
//!                                  └─ quit ─▶ rotate + save ─▶ Outcome::Quit
//!         queue exhausted ─▶ save ─▶ Outcome::Completed
//! ```
//!
//! The working copy is the only thing mutated during review; the canonical
//! metadata file changes only at save points. [`ReviewSession::run_guarded`]
//! wraps [`ReviewSession::run`] with the last-chance save prompt.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use crate::command::{Command, usage_hint};
use crate::config::MetadataConfig;
use crate::console::Console;
use crate::error::ErrorCode;
use crate::ledger::{LedgerError, UndoLedger};
use crate::model::Metadata;
use crate::store::{self, StoreError};
use crate::trash::{Trash, TrashError};
use crate::viewer::Viewer;

const DECISION_PROMPT: &str = "Is this doc relevant? > ";
const NOTE_PROMPT: &str = "Enter note here > ";
const INDEX_PROMPT: &str = "> ";

/// Errors that end a session early.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Trash(#[from] TrashError),

    #[error("reviewer console failed: {0}")]
    Console(#[source] io::Error),

    #[error("reviewer input ended before the session finished")]
    InputClosed,

    /// Saving from the error boundary failed; the original failure is kept.
    #[error("{original} (saving the working copy also failed: {source})")]
    SaveFailed {
        original: Box<SessionError>,
        #[source]
        source: StoreError,
    },
}

impl SessionError {
    /// Code of the failure that ended the session. For [`Self::SaveFailed`]
    /// that is the original failure, not the save.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Store(err) => err.code(),
            Self::SaveFailed { original, .. } => original.code(),
            Self::Trash(err) => err.code(),
            Self::Console(_) => ErrorCode::InputReadFailed,
            Self::InputClosed => ErrorCode::InputClosed,
        }
    }
}

impl From<io::Error> for SessionError {
    fn from(err: io::Error) -> Self {
        Self::Console(err)
    }
}

/// How a session ended successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every queued document was handled and the working copy saved.
    Completed,
    /// The reviewer quit; the old metadata was rotated to the backup path.
    Quit,
}

/// Filesystem locations a session works against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewPaths {
    pub data_dir: PathBuf,
    pub metadata: PathBuf,
    pub backup: PathBuf,
}

impl ReviewPaths {
    #[must_use]
    pub fn new(data_dir: &Path, config: &MetadataConfig) -> Self {
        let metadata = data_dir.join(&config.file_name);
        let backup = store::backup_path_for(&metadata, &config.backup_suffix);
        Self {
            data_dir: data_dir.to_path_buf(),
            metadata,
            backup,
        }
    }

    #[must_use]
    pub fn document(&self, save_id: &str) -> PathBuf {
        self.data_dir.join(save_id)
    }
}

/// Mutable session state, separate from the collaborators that act on it.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Ids that reached a terminal decision, in this or an earlier run.
    pub reviewed: HashSet<String>,
    /// The copy of the metadata that gets persisted.
    pub working: Metadata,
    pub ledger: UndoLedger,
    /// Position in the queue of the next document to present.
    pub cursor: usize,
}

impl SessionState {
    /// Fresh state for `loaded`: records already marked reviewed are never
    /// presented again.
    #[must_use]
    pub fn from_metadata(loaded: Metadata) -> Self {
        let reviewed = loaded
            .iter()
            .filter(|doc| doc.reviewed)
            .map(|doc| doc.save_id.clone())
            .collect();
        Self {
            reviewed,
            working: loaded,
            ledger: UndoLedger::new(),
            cursor: 0,
        }
    }
}

enum Step {
    Decided,
    Quit,
}

/// Interactive review over one data directory.
pub struct ReviewSession<C, V> {
    paths: ReviewPaths,
    trash: Trash,
    queue: Vec<String>,
    state: SessionState,
    console: C,
    viewer: V,
}

impl<C: Console, V: Viewer> ReviewSession<C, V> {
    /// Load the metadata file and prepare a session.
    ///
    /// # Errors
    ///
    /// Propagates [`StoreError::NotFound`] and [`StoreError::Corrupt`]; a
    /// corrupt file is fatal and nothing is recovered from it.
    pub fn open(
        paths: ReviewPaths,
        trash: Trash,
        console: C,
        viewer: V,
    ) -> Result<Self, StoreError> {
        let loaded = store::load(&paths.metadata)?;
        Ok(Self::with_metadata(paths, trash, loaded, console, viewer))
    }

    /// Prepare a session over already-loaded metadata.
    pub fn with_metadata(
        paths: ReviewPaths,
        trash: Trash,
        loaded: Metadata,
        console: C,
        viewer: V,
    ) -> Self {
        let queue = loaded.ids().to_vec();
        let state = SessionState::from_metadata(loaded);
        tracing::info!(
            total = queue.len(),
            already_reviewed = state.reviewed.len(),
            data_dir = %paths.data_dir.display(),
            "review session opened"
        );
        Self {
            paths,
            trash,
            queue,
            state,
            console,
            viewer,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub const fn paths(&self) -> &ReviewPaths {
        &self.paths
    }

    #[must_use]
    pub const fn console(&self) -> &C {
        &self.console
    }

    #[must_use]
    pub const fn viewer(&self) -> &V {
        &self.viewer
    }

    /// Persist the working copy to the canonical path.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the write fails.
    pub fn save(&self) -> Result<(), StoreError> {
        store::save(&self.state.working, &self.paths.metadata)
    }

    /// Run [`Self::run`] inside an error boundary.
    ///
    /// On failure the reviewer is asked once whether to save the working
    /// copy. The original error is returned either way; if that save fails
    /// too, both are reported through [`SessionError::SaveFailed`].
    ///
    /// # Errors
    ///
    /// Any error from [`Self::run`].
    pub fn run_guarded(&mut self) -> Result<Outcome, SessionError> {
        let err = match self.run() {
            Ok(outcome) => return Ok(outcome),
            Err(err) => err,
        };
        tracing::error!(code = %err.code(), error = %err, "review session failed");

        if self.confirm_save_after(&err) {
            if let Err(source) = self.save() {
                return Err(SessionError::SaveFailed {
                    original: Box::new(err),
                    source,
                });
            }
            let _ = self.console.line("Progress saved.");
        } else {
            tracing::warn!("working copy discarded after failure");
        }
        Err(err)
    }

    /// Review every queued document that has not been reviewed yet.
    ///
    /// # Errors
    ///
    /// Console, trash and store failures propagate unchanged. Input ending
    /// mid-session is [`SessionError::InputClosed`].
    pub fn run(&mut self) -> Result<Outcome, SessionError> {
        let total = self.queue.len();
        while self.state.cursor < total {
            let id = self.queue[self.state.cursor].clone();
            self.state.cursor += 1;

            self.console.line("")?;
            self.console
                .line(&format!("{}/{}", self.state.cursor, total))?;

            if self.state.reviewed.contains(&id) {
                self.console.line(&format!("Skipping seen doc: {id}"))?;
                continue;
            }
            if !self.state.working.contains(&id) {
                tracing::warn!(save_id = %id, "queued document missing from working copy");
                continue;
            }

            if let Step::Quit = self.review_document(&id)? {
                self.quit()?;
                return Ok(Outcome::Quit);
            }
        }

        self.save()?;
        self.console.line(&format!(
            "Review complete. Data saved to: {}",
            self.paths.metadata.display()
        ))?;
        Ok(Outcome::Completed)
    }

    fn review_document(&mut self, id: &str) -> Result<Step, SessionError> {
        let file = self.paths.document(id);
        self.show(&file)?;

        loop {
            let raw = self.read(DECISION_PROMPT)?;
            let command = Command::parse(&raw);
            tracing::debug!(save_id = %id, %command, "reviewer command");
            match command {
                Command::Approve => {
                    self.console.line("Yes")?;
                    self.approve(id);
                    return Ok(Step::Decided);
                }
                Command::Reject => {
                    self.console.line("No")?;
                    self.reject(id, &file)?;
                    return Ok(Step::Decided);
                }
                Command::Note => self.note(id)?,
                Command::Reopen => self.show(&file)?,
                Command::Mistake => self.mistake()?,
                Command::Quit => return Ok(Step::Quit),
                Command::Unknown => self.console.line(&usage_hint())?,
            }
        }
    }

    fn approve(&mut self, id: &str) {
        if let Some(doc) = self.state.working.get_mut(id) {
            doc.reviewed = true;
            self.state.ledger.record(doc.clone(), false);
        }
        self.state.reviewed.insert(id.to_string());
        tracing::info!(save_id = %id, "approved");
    }

    fn reject(&mut self, id: &str, file: &Path) -> Result<(), SessionError> {
        let trashed = if file.exists() {
            match self.trash.soft_delete(file) {
                Ok(_) => true,
                Err(TrashError::AlreadyTrashed(existing)) => {
                    tracing::warn!(
                        save_id = %id,
                        existing = %existing.display(),
                        "trash already holds this name; file left in place"
                    );
                    false
                }
                Err(err) => return Err(err.into()),
            }
        } else {
            tracing::debug!(save_id = %id, "rejected document has no file on disk");
            false
        };

        if let Some(doc) = self.state.working.remove(id) {
            self.state.ledger.record(doc, trashed);
        }
        self.state.reviewed.insert(id.to_string());
        tracing::info!(save_id = %id, trashed, "rejected");
        Ok(())
    }

    fn note(&mut self, id: &str) -> Result<(), SessionError> {
        let text = self.read(NOTE_PROMPT)?;
        let text = text.trim();
        if text.is_empty() {
            self.console.line("Empty note discarded.")?;
            return Ok(());
        }
        if let Some(doc) = self.state.working.get_mut(id) {
            doc.add_note(text);
            tracing::debug!(save_id = %id, notes = doc.notes.len(), "note added");
        }
        Ok(())
    }

    fn mistake(&mut self) -> Result<(), SessionError> {
        if self.state.ledger.is_empty() {
            self.console.line("No recent decisions to undo.")?;
            return Ok(());
        }

        self.console
            .line("Which document did you make a mistake on? (empty to cancel)")?;
        let listing: Vec<String> = self
            .state
            .ledger
            .list()
            .enumerate()
            .map(|(i, doc)| format!("{i}: {}", doc.save_id))
            .collect();
        for entry in &listing {
            self.console.line(entry)?;
        }

        loop {
            let raw = self.read(INDEX_PROMPT)?;
            let raw = raw.trim();
            if raw.is_empty() {
                self.console.line("Cancelled.")?;
                return Ok(());
            }
            let Ok(index) = raw.parse::<usize>() else {
                self.console.line(&format!(
                    "'{raw}' is not an index; enter 0-{}",
                    self.state.ledger.len() - 1
                ))?;
                continue;
            };

            match self.state.ledger.recover_at(
                index,
                &mut self.state.working,
                &self.trash,
                &self.paths.data_dir,
            ) {
                Ok(doc) => {
                    self.console.line(&format!(
                        "Re-adding {} as unreviewed. Returning to present document.",
                        doc.save_id
                    ))?;
                    return Ok(());
                }
                Err(err @ LedgerError::IndexOutOfRange { .. }) => {
                    self.console.line(&err.to_string())?;
                }
                Err(LedgerError::Trash(err @ TrashError::NotFound { .. })) => {
                    tracing::warn!(error = %err, "cannot recover document");
                    self.console.line(&format!("Cannot recover: {err}"))?;
                    return Ok(());
                }
                Err(LedgerError::Trash(err)) => return Err(err.into()),
            }
        }
    }

    fn quit(&mut self) -> Result<(), SessionError> {
        if self.paths.metadata.exists() {
            store::rotate(&self.paths.metadata, &self.paths.backup)?;
        } else {
            tracing::warn!(
                path = %self.paths.metadata.display(),
                "no metadata file to keep as backup"
            );
        }
        self.save()?;
        self.console.line(&format!(
            "Data saved to: {} (previous version: {})",
            self.paths.metadata.display(),
            self.paths.backup.display()
        ))?;
        tracing::info!(reviewed = self.state.reviewed.len(), "session quit");
        Ok(())
    }

    fn show(&mut self, file: &Path) -> Result<(), SessionError> {
        self.console.line(&format!("Opening: {}", file.display()))?;
        if let Err(err) = self.viewer.open(file) {
            tracing::warn!(path = %file.display(), error = %err, "viewer failed");
            self.console.line(&format!("Viewer failed: {err:#}"))?;
        }
        Ok(())
    }

    fn read(&mut self, prompt: &str) -> Result<String, SessionError> {
        self.console
            .ask(prompt)?
            .ok_or(SessionError::InputClosed)
    }

    fn confirm_save_after(&mut self, err: &SessionError) -> bool {
        let prompt = format!("Error raised: {err}. Save progress before exiting? [y/N] > ");
        match self.console.ask(&prompt) {
            Ok(Some(answer)) => Command::parse(&answer) == Command::Approve,
            Ok(None) => false,
            Err(io_err) => {
                tracing::warn!(error = %io_err, "could not read save confirmation");
                false
            }
        }
    }
}
