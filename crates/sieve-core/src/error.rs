use std::fmt;

/// Machine-readable error codes shared by every sieve component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    MetadataNotFound,
    MetadataCorrupt,
    ConfigParseError,
    ConfigInvalid,
    AlreadyTrashed,
    TrashEntryNotFound,
    TrashUnavailable,
    LedgerIndexOutOfRange,
    FileMoveFailed,
    MetadataWriteFailed,
    InputClosed,
    InputReadFailed,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::MetadataNotFound => "E1001",
            Self::MetadataCorrupt => "E1002",
            Self::ConfigParseError => "E1003",
            Self::ConfigInvalid => "E1004",
            Self::AlreadyTrashed => "E2001",
            Self::TrashEntryNotFound => "E2002",
            Self::TrashUnavailable => "E2003",
            Self::LedgerIndexOutOfRange => "E3001",
            Self::FileMoveFailed => "E5001",
            Self::MetadataWriteFailed => "E5002",
            Self::InputClosed => "E6001",
            Self::InputReadFailed => "E6002",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::MetadataNotFound => "Metadata file not found",
            Self::MetadataCorrupt => "Metadata file could not be parsed",
            Self::ConfigParseError => "Config file parse error",
            Self::ConfigInvalid => "Invalid configuration value",
            Self::AlreadyTrashed => "File already present in trash",
            Self::TrashEntryNotFound => "File not found in trash or data directory",
            Self::TrashUnavailable => "Trash directory unavailable",
            Self::LedgerIndexOutOfRange => "Undo ledger index out of range",
            Self::FileMoveFailed => "File move failed",
            Self::MetadataWriteFailed => "Metadata write failed",
            Self::InputClosed => "Reviewer input closed",
            Self::InputReadFailed => "Reviewer input could not be read",
        }
    }

    /// Optional remediation hint surfaced next to the error.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::MetadataNotFound => {
                Some("Point sieve at a directory containing the metadata file.")
            }
            Self::MetadataCorrupt => Some(
                "Restore the backup generation (metadata-old.json) or repair the JSON by hand.",
            ),
            Self::ConfigParseError => Some("Fix syntax in the sieve config.toml and retry."),
            Self::ConfigInvalid => Some("Check the documented config keys and their values."),
            Self::AlreadyTrashed | Self::InputClosed => None,
            Self::TrashEntryNotFound => {
                Some("The trash may have been emptied; the file cannot be restored.")
            }
            Self::TrashUnavailable => Some("Set `[trash] dir` in config.toml."),
            Self::LedgerIndexOutOfRange => Some("Pick one of the indices shown in the list."),
            Self::FileMoveFailed => Some(
                "Data and trash directories must be on the same filesystem and writable.",
            ),
            Self::MetadataWriteFailed => Some("Check disk space and write permissions."),
            Self::InputReadFailed => Some("Run sieve from an interactive terminal."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
