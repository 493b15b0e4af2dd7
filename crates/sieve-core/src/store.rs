//! Metadata Store: load, crash-safe save, and backup rotation.
//!
//! The canonical file is never written in place. [`save`] writes a sibling
//! temporary file and renames it over the canonical path, and [`rotate`]
//! moves the previous generation aside so a manual rollback is always
//! possible.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::ErrorCode;
use crate::model::Metadata;

/// Errors raised by the metadata store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The metadata file does not exist.
    #[error("metadata file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The metadata file exists but is not a valid metadata document.
    #[error("metadata file {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Reading, writing or renaming failed.
    #[error("metadata I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound(_) => ErrorCode::MetadataNotFound,
            Self::Corrupt { .. } => ErrorCode::MetadataCorrupt,
            Self::Io { .. } => ErrorCode::MetadataWriteFailed,
        }
    }

    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Read and parse the metadata file at `path`.
///
/// # Errors
///
/// [`StoreError::NotFound`] if the file is absent, [`StoreError::Corrupt`] if
/// it cannot be parsed, [`StoreError::Io`] for any other read failure.
pub fn load(path: &Path) -> Result<Metadata, StoreError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(StoreError::NotFound(path.to_path_buf()));
        }
        Err(err) => return Err(StoreError::io(path, err)),
    };

    let metadata: Metadata =
        serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::debug!(path = %path.display(), records = metadata.len(), "metadata loaded");
    Ok(metadata)
}

/// Write `metadata` to `path` atomically.
///
/// The content goes to a hidden sibling temp file first, is synced, and then
/// renamed over `path`; readers see either the old file or the complete new
/// one.
///
/// # Errors
///
/// [`StoreError::Io`] if the temp file cannot be written or renamed.
pub fn save(metadata: &Metadata, path: &Path) -> Result<(), StoreError> {
    let tmp = temp_path_for(path);
    let bytes = serde_json::to_vec(metadata).map_err(|err| StoreError::io(&tmp, err.into()))?;

    {
        let mut file = fs::File::create(&tmp).map_err(|err| StoreError::io(&tmp, err))?;
        file.write_all(&bytes)
            .and_then(|()| file.flush())
            .and_then(|()| file.sync_all())
            .map_err(|err| StoreError::io(&tmp, err))?;
    }

    if let Err(err) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(StoreError::io(path, err));
    }

    tracing::info!(path = %path.display(), records = metadata.len(), "metadata saved");
    Ok(())
}

/// Rename the canonical file at `path` to `backup`, replacing any older
/// backup.
///
/// # Errors
///
/// [`StoreError::Io`] if `path` is missing or the rename fails.
pub fn rotate(path: &Path, backup: &Path) -> Result<(), StoreError> {
    fs::rename(path, backup).map_err(|err| StoreError::io(path, err))?;
    tracing::info!(
        from = %path.display(),
        to = %backup.display(),
        "metadata rotated to backup"
    );
    Ok(())
}

/// Backup path for `path`: `suffix` is inserted before the extension, so
/// `metadata.json` with `-old` becomes `metadata-old.json`.
#[must_use]
pub fn backup_path_for(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}{suffix}.{}", ext.to_string_lossy()),
        None => format!("{stem}{suffix}"),
    };
    path.with_file_name(name)
}

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Document;
    use tempfile::TempDir;

    fn sample() -> Metadata {
        let mut md = Metadata::new();
        md.insert(Document::new("b.pdf"));
        let mut a = Document::new("a.pdf");
        a.add_note("keep");
        md.insert(a);
        md
    }

    #[test]
    fn save_then_load_preserves_records_and_order() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("metadata.json");
        save(&sample(), &path).expect("save");

        let loaded = load(&path).expect("load");
        assert_eq!(loaded.ids(), ["b.pdf", "a.pdf"]);
        assert_eq!(loaded.get("a.pdf").expect("a").notes, vec!["keep".to_string()]);
    }

    #[test]
    fn save_leaves_no_temp_file() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("metadata.json");
        save(&sample(), &path).expect("save");
        assert!(!temp_path_for(&path).exists());
        let entries: Vec<_> = fs::read_dir(tmp.path()).expect("read dir").collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn save_replaces_existing_file() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("metadata.json");
        fs::write(&path, "{}").expect("seed");
        save(&sample(), &path).expect("save");
        assert_eq!(load(&path).expect("load").len(), 2);
    }

    #[test]
    fn load_missing_is_not_found() {
        let tmp = TempDir::new().expect("tempdir");
        let err = load(&tmp.path().join("metadata.json")).expect_err("must fail");
        assert!(matches!(err, StoreError::NotFound(_)));
        assert_eq!(err.code(), ErrorCode::MetadataNotFound);
    }

    #[test]
    fn load_garbage_is_corrupt() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("metadata.json");
        fs::write(&path, "{\"a.pdf\": [1, 2").expect("seed");
        let err = load(&path).expect_err("must fail");
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[test]
    fn load_wrong_shape_is_corrupt() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("metadata.json");
        fs::write(&path, "[]").expect("seed");
        assert!(matches!(load(&path), Err(StoreError::Corrupt { .. })));
    }

    #[test]
    fn rotate_moves_content_byte_for_byte() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("metadata.json");
        let backup = backup_path_for(&path, "-old");
        fs::write(&path, b"{\"x\": 1}").expect("seed");

        rotate(&path, &backup).expect("rotate");
        assert!(!path.exists());
        assert_eq!(fs::read(&backup).expect("backup"), b"{\"x\": 1}");
    }

    #[test]
    fn rotate_replaces_older_backup() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("metadata.json");
        let backup = backup_path_for(&path, "-old");
        fs::write(&backup, "old generation").expect("seed backup");
        fs::write(&path, "new generation").expect("seed");

        rotate(&path, &backup).expect("rotate");
        assert_eq!(fs::read_to_string(&backup).expect("backup"), "new generation");
    }

    #[test]
    fn rotate_missing_source_is_io_error() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("metadata.json");
        let err = rotate(&path, &backup_path_for(&path, "-old")).expect_err("must fail");
        assert!(matches!(err, StoreError::Io { .. }));
    }

    #[test]
    fn backup_name_inserts_suffix_before_extension() {
        let p = Path::new("/data/metadata.json");
        assert_eq!(
            backup_path_for(p, "-old"),
            PathBuf::from("/data/metadata-old.json")
        );
        assert_eq!(
            backup_path_for(Path::new("/data/meta"), ".bak"),
            PathBuf::from("/data/meta.bak")
        );
    }
}
