//! User configuration loaded from `config.toml`.
//!
//! Every key is optional; a missing default file means all defaults. See
//! [`load_config`] for how the file is located.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};

use crate::error::ErrorCode;
use crate::trash::{Trash, TrashError};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Read { .. } | Self::Parse { .. } => ErrorCode::ConfigParseError,
            Self::Invalid(_) => ErrorCode::ConfigInvalid,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewConfig {
    #[serde(default)]
    pub viewer: ViewerConfig,
    #[serde(default)]
    pub trash: TrashConfig,
    #[serde(default)]
    pub metadata: MetadataConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default = "default_viewer_program")]
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            program: default_viewer_program(),
            args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrashConfig {
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl TrashConfig {
    /// Configured directory, else the user's desktop trash.
    ///
    /// # Errors
    ///
    /// [`TrashError::Unavailable`] when neither is known.
    pub fn resolve_dir(&self) -> Result<PathBuf, TrashError> {
        self.dir
            .clone()
            .or_else(Trash::default_dir)
            .ok_or(TrashError::Unavailable)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataConfig {
    #[serde(default = "default_metadata_file")]
    pub file_name: String,
    #[serde(default = "default_backup_suffix")]
    pub backup_suffix: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            file_name: default_metadata_file(),
            backup_suffix: default_backup_suffix(),
        }
    }
}

impl ReviewConfig {
    fn validate(self) -> Result<Self, ConfigError> {
        if self.viewer.program.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "viewer.program must not be empty".to_string(),
            ));
        }
        let name = &self.metadata.file_name;
        if name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "metadata.file_name must not be empty".to_string(),
            ));
        }
        if name.contains('/') || name.contains('\\') {
            return Err(ConfigError::Invalid(format!(
                "metadata.file_name '{name}' must be a bare file name"
            )));
        }
        if self.metadata.backup_suffix.is_empty() {
            return Err(ConfigError::Invalid(
                "metadata.backup_suffix must not be empty".to_string(),
            ));
        }
        Ok(self)
    }
}

/// Default location of the user config: `<config_dir>/sieve/config.toml`.
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sieve").join("config.toml"))
}

/// Load configuration.
///
/// With `explicit = Some(path)` the file must exist. Without it the user
/// config is read if present, and defaults are used otherwise.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or holds invalid
/// values.
pub fn load_config(explicit: Option<&Path>) -> Result<ReviewConfig, ConfigError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match user_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(ReviewConfig::default()),
        },
    };

    let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    let config = toml::from_str::<ReviewConfig>(&content)
        .map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?
        .validate()?;

    tracing::debug!(path = %path.display(), "config loaded");
    Ok(config)
}

fn default_viewer_program() -> String {
    "xdg-open".to_string()
}

fn default_metadata_file() -> String {
    "metadata.json".to_string()
}

fn default_backup_suffix() -> String {
    "-old".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(content: &str) -> (TempDir, PathBuf) {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, content).expect("write config");
        (tmp, path)
    }

    #[test]
    fn defaults_match_desktop_conventions() {
        let cfg = ReviewConfig::default();
        assert_eq!(cfg.viewer.program, "xdg-open");
        assert!(cfg.viewer.args.is_empty());
        assert_eq!(cfg.metadata.file_name, "metadata.json");
        assert_eq!(cfg.metadata.backup_suffix, "-old");
        assert!(cfg.trash.dir.is_none());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let (_tmp, path) = write_config(
            r#"
[viewer]
program = "zathura"
args = ["--fork"]

[trash]
dir = "/srv/review/trash"
"#,
        );
        let cfg = load_config(Some(path.as_path())).expect("load");
        assert_eq!(cfg.viewer.program, "zathura");
        assert_eq!(cfg.viewer.args, vec!["--fork".to_string()]);
        assert_eq!(cfg.trash.dir, Some(PathBuf::from("/srv/review/trash")));
        assert_eq!(cfg.metadata.file_name, "metadata.json");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let tmp = TempDir::new().expect("tempdir");
        let err = load_config(Some(tmp.path().join("absent.toml").as_path())).expect_err("must fail");
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn bad_syntax_is_a_parse_error() {
        let (_tmp, path) = write_config("[viewer\nprogram = ");
        let err = load_config(Some(path.as_path())).expect_err("must fail");
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert_eq!(err.code(), ErrorCode::ConfigParseError);
    }

    #[test]
    fn empty_viewer_is_invalid() {
        let (_tmp, path) = write_config("[viewer]\nprogram = \"  \"\n");
        let err = load_config(Some(path.as_path())).expect_err("must fail");
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn nested_metadata_name_is_invalid() {
        let (_tmp, path) = write_config("[metadata]\nfile_name = \"sub/metadata.json\"\n");
        assert!(matches!(
            load_config(Some(path.as_path())),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn configured_trash_dir_wins() {
        let cfg = TrashConfig {
            dir: Some(PathBuf::from("/tmp/t")),
        };
        assert_eq!(cfg.resolve_dir().expect("dir"), PathBuf::from("/tmp/t"));
    }
}
