//! Output helpers shared by the non-interactive modes.
//!
//! Interactive review writes through the session's console; everything else
//! (vocabulary table, status report, errors) goes through here so human and
//! JSON output stay in step.

use serde::Serialize;
use sieve_core::command::VOCABULARY;
use sieve_core::error::ErrorCode;
use sieve_core::report::ReviewProgress;
use std::io::{self, Write};

/// Shared width for human separators.
pub const PRETTY_RULE_WIDTH: usize = 72;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub const fn from_json_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Human }
    }
}

/// Write a horizontal separator used by human output.
pub fn pretty_rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{:-<width$}", "", width = PRETTY_RULE_WIDTH)
}

/// Write a section heading followed by a separator.
pub fn pretty_section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    pretty_rule(w)
}

/// Render a left-aligned key/value line in human output.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<14} {}", format!("{key}:"), value.as_ref())
}

#[derive(Debug, Serialize)]
struct VocabularyRow {
    command: &'static str,
    synonyms: &'static [&'static str],
    description: &'static str,
}

/// Write the reviewer command reference.
pub fn render_vocabulary(w: &mut dyn Write, mode: OutputMode) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            let rows: Vec<VocabularyRow> = VOCABULARY
                .iter()
                .map(|entry| VocabularyRow {
                    command: entry.command.name(),
                    synonyms: entry.synonyms,
                    description: entry.description,
                })
                .collect();
            serde_json::to_writer_pretty(&mut *w, &rows)?;
            writeln!(w)?;
        }
        OutputMode::Human => {
            pretty_section(w, "Reviewer commands")?;
            for entry in VOCABULARY {
                writeln!(
                    w,
                    "{:<10} {:<20} {}",
                    entry.command.name(),
                    entry.synonyms.join(", "),
                    entry.description
                )?;
            }
            writeln!(w, "{:<10} {:<20} {}", "(other)", "", "re-prompt")?;
        }
    }
    Ok(())
}

/// Write a progress summary for one data directory.
pub fn render_progress(
    w: &mut dyn Write,
    mode: OutputMode,
    progress: &ReviewProgress,
) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut *w, progress)?;
            writeln!(w)?;
        }
        OutputMode::Human => {
            pretty_section(w, "Review progress")?;
            pretty_kv(w, "Documents", progress.total.to_string())?;
            pretty_kv(
                w,
                "Reviewed",
                format!("{} ({}%)", progress.reviewed, progress.percent_reviewed()),
            )?;
            pretty_kv(w, "Pending", progress.pending.to_string())?;
            pretty_kv(w, "With notes", progress.with_notes.to_string())?;
            if progress.missing_files > 0 {
                pretty_kv(w, "Missing files", progress.missing_files.to_string())?;
            }
            pretty_kv(w, "Backup", if progress.backup_present { "yes" } else { "no" })?;
            pretty_kv(w, "Next", progress.next.as_deref().unwrap_or("-"))?;
        }
    }
    Ok(())
}

/// A failure ready to be shown to the user.
#[derive(Debug, Serialize)]
pub struct CliError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
}

impl CliError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.code()),
            message: message.into(),
            hint: code.hint(),
        }
    }

    /// An error with no sieve error code (e.g. a failed stdout write).
    pub fn uncoded(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            hint: None,
        }
    }
}

/// Write `error` in the requested format.
pub fn render_error(w: &mut dyn Write, mode: OutputMode, error: &CliError) -> io::Result<()> {
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({ "error": error });
            serde_json::to_writer_pretty(&mut *w, &wrapper)?;
            writeln!(w)
        }
        OutputMode::Human => {
            match error.code {
                Some(code) => writeln!(w, "error[{code}]: {}", error.message)?,
                None => writeln!(w, "error: {}", error.message)?,
            }
            if let Some(hint) = error.hint {
                writeln!(w, "  hint: {hint}")?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sieve_core::model::{Document, Metadata};

    fn render_to_string(f: impl FnOnce(&mut dyn Write) -> anyhow::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).expect("render");
        String::from_utf8(buf).expect("utf8")
    }

    #[test]
    fn vocabulary_lists_every_command() {
        let out = render_to_string(|w| render_vocabulary(w, OutputMode::Human));
        for name in ["approve", "reject", "note", "reopen", "mistake", "quit"] {
            assert!(out.contains(name), "missing {name}: {out}");
        }
        assert!(out.contains("comment"));
    }

    #[test]
    fn vocabulary_json_is_an_array() {
        let out = render_to_string(|w| render_vocabulary(w, OutputMode::Json));
        let value: serde_json::Value = serde_json::from_str(&out).expect("json");
        assert_eq!(value.as_array().map(Vec::len), Some(VOCABULARY.len()));
        assert_eq!(value[0]["synonyms"][1], "y");
    }

    #[test]
    fn progress_human_shows_percentage_and_next() {
        let mut md = Metadata::new();
        let mut a = Document::new("a.pdf");
        a.reviewed = true;
        md.insert(a);
        md.insert(Document::new("b.pdf"));
        let progress = ReviewProgress::from_metadata(&md, false, |_| true);

        let out = render_to_string(|w| render_progress(w, OutputMode::Human, &progress));
        assert!(out.contains("1 (50%)"), "{out}");
        assert!(out.contains("b.pdf"), "{out}");
        assert!(!out.contains("Missing files"));
    }

    #[test]
    fn error_human_carries_code_and_hint() {
        let err = CliError::new(ErrorCode::MetadataNotFound, "metadata file not found: /x");
        let mut buf = Vec::new();
        render_error(&mut buf, OutputMode::Human, &err).expect("render");
        let out = String::from_utf8(buf).expect("utf8");
        assert!(out.starts_with("error[E1001]: metadata file not found"));
        assert!(out.contains("hint:"));
    }

    #[test]
    fn error_json_wraps_in_error_key() {
        let err = CliError::new(ErrorCode::InputClosed, "input closed");
        let mut buf = Vec::new();
        render_error(&mut buf, OutputMode::Json, &err).expect("render");
        let value: serde_json::Value = serde_json::from_slice(&buf).expect("json");
        assert_eq!(value["error"]["code"], "E6001");
        assert!(value["error"].get("hint").is_none());
    }

    #[test]
    fn uncoded_error_has_plain_prefix() {
        let mut buf = Vec::new();
        render_error(&mut buf, OutputMode::Human, &CliError::uncoded("broken pipe"))
            .expect("render");
        assert_eq!(String::from_utf8(buf).expect("utf8"), "error: broken pipe\n");
    }
}
