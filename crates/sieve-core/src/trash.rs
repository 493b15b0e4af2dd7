//! Reversible soft-delete through a flat holding directory.
//!
//! Files are moved in and out by base name with plain renames, so the data
//! directory and the trash must live on the same filesystem. Nothing here
//! ever copies or deletes file content.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::ErrorCode;

/// Errors raised by [`Trash`] operations.
#[derive(Debug, thiserror::Error)]
pub enum TrashError {
    /// An entry with the same base name is already in the trash.
    #[error("already trashed: {}", .0.display())]
    AlreadyTrashed(PathBuf),

    /// The file is neither in the trash nor at the restore destination.
    #[error("'{name}' not found in trash or in {}", dest_dir.display())]
    NotFound { name: String, dest_dir: PathBuf },

    /// No trash location could be determined.
    #[error("no trash directory configured and no user data directory available")]
    Unavailable,

    /// A rename or directory operation failed.
    #[error("trash I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl TrashError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::AlreadyTrashed(_) => ErrorCode::AlreadyTrashed,
            Self::NotFound { .. } => ErrorCode::TrashEntryNotFound,
            Self::Unavailable => ErrorCode::TrashUnavailable,
            Self::Io { .. } => ErrorCode::FileMoveFailed,
        }
    }
}

/// Handle on the holding directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trash {
    dir: PathBuf,
}

impl Trash {
    /// Open the holding directory at `dir`, creating it if needed.
    ///
    /// # Errors
    ///
    /// [`TrashError::Io`] if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, TrashError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| TrashError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    /// The user's desktop trash (`<data_dir>/Trash/files`, e.g.
    /// `~/.local/share/Trash/files` on Linux).
    #[must_use]
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("Trash").join("files"))
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where a file with base name `file_name` lives while trashed.
    #[must_use]
    pub fn entry_path(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    #[must_use]
    pub fn contains(&self, file_name: &str) -> bool {
        self.entry_path(file_name).exists()
    }

    /// Move `file_path` into the trash under its base name.
    ///
    /// # Errors
    ///
    /// - [`TrashError::AlreadyTrashed`] if the trash already holds an entry
    ///   with that name. The source file is left untouched.
    /// - [`TrashError::Io`] if the path has no file name or the rename fails.
    pub fn soft_delete(&self, file_path: &Path) -> Result<PathBuf, TrashError> {
        let name = file_path.file_name().ok_or_else(|| TrashError::Io {
            path: file_path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
        })?;
        let target = self.dir.join(name);
        if target.exists() {
            return Err(TrashError::AlreadyTrashed(target));
        }

        fs::rename(file_path, &target).map_err(|source| TrashError::Io {
            path: file_path.to_path_buf(),
            source,
        })?;
        tracing::info!(
            from = %file_path.display(),
            to = %target.display(),
            "moved to trash"
        );
        Ok(target)
    }

    /// Move `file_name` back from the trash into `dest_dir`.
    ///
    /// A file already at `dest_dir` is never replaced: the restore succeeds
    /// without touching the trash, so an unrelated same-named trash entry
    /// stays where it is.
    ///
    /// # Errors
    ///
    /// - [`TrashError::NotFound`] if the file is in neither place.
    /// - [`TrashError::Io`] if the rename fails.
    pub fn restore(&self, file_name: &str, dest_dir: &Path) -> Result<PathBuf, TrashError> {
        let source = self.entry_path(file_name);
        let dest = dest_dir.join(file_name);

        if dest.exists() {
            tracing::debug!(
                file = file_name,
                trash_entry = source.exists(),
                "restore: already in place"
            );
            return Ok(dest);
        }

        if source.exists() {
            fs::rename(&source, &dest).map_err(|err| TrashError::Io {
                path: source.clone(),
                source: err,
            })?;
            tracing::info!(
                from = %source.display(),
                to = %dest.display(),
                "restored from trash"
            );
            return Ok(dest);
        }

        Err(TrashError::NotFound {
            name: file_name.to_string(),
            dest_dir: dest_dir.to_path_buf(),
        })
    }
}
