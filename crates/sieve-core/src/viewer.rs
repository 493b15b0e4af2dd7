//! Viewer collaborator used to show a document to the reviewer.

use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

/// Something that can display a file to the reviewer.
///
/// The session never inspects the outcome beyond logging it; an `Err` is
/// reported and review continues.
pub trait Viewer {
    fn open(&mut self, path: &Path) -> Result<()>;
}

/// Runs an external program with the document path as its last argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandViewer {
    program: String,
    args: Vec<String>,
}

impl CommandViewer {
    #[must_use]
    pub const fn new(program: String, args: Vec<String>) -> Self {
        Self { program, args }
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Viewer for CommandViewer {
    fn open(&mut self, path: &Path) -> Result<()> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .status()
            .with_context(|| format!("failed to launch viewer '{}'", self.program))?;

        if status.success() {
            tracing::debug!(program = %self.program, path = %path.display(), "viewer exited");
        } else {
            tracing::warn!(
                program = %self.program,
                path = %path.display(),
                code = status.code().unwrap_or(-1),
                "viewer exited with failure"
            );
        }
        Ok(())
    }
}
