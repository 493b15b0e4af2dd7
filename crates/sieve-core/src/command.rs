//! Reviewer command vocabulary.

use std::fmt;

/// Action requested by one line of reviewer input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Approve,
    Reject,
    Note,
    Reopen,
    Mistake,
    Quit,
    Unknown,
}

/// One row of the vocabulary reference.
#[derive(Debug, Clone, Copy)]
pub struct CommandHelp {
    pub command: Command,
    pub synonyms: &'static [&'static str],
    pub description: &'static str,
}

/// Every recognised command with its accepted spellings.
pub const VOCABULARY: &[CommandHelp] = &[
    CommandHelp {
        command: Command::Approve,
        synonyms: &["yes", "y"],
        description: "document is relevant; keep it and mark it reviewed",
    },
    CommandHelp {
        command: Command::Reject,
        synonyms: &["no", "n"],
        description: "document is not relevant; drop it from metadata and move the file to trash",
    },
    CommandHelp {
        command: Command::Note,
        synonyms: &["note", "comment", "c"],
        description: "attach a free-text note to the open document",
    },
    CommandHelp {
        command: Command::Reopen,
        synonyms: &["reopen", "r"],
        description: "open the current document in the viewer again",
    },
    CommandHelp {
        command: Command::Mistake,
        synonyms: &["mistake", "m"],
        description: "undo the decision on one of the last five documents",
    },
    CommandHelp {
        command: Command::Quit,
        synonyms: &["quit", "q"],
        description: "keep a backup of the old metadata, save progress and exit",
    },
];

impl Command {
    /// Classify raw input. Case and surrounding whitespace are ignored;
    /// anything unrecognised is [`Command::Unknown`].
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let word = input.trim().to_lowercase();
        VOCABULARY
            .iter()
            .find(|entry| entry.synonyms.contains(&word.as_str()))
            .map_or(Self::Unknown, |entry| entry.command)
    }

    /// Approve and Reject end review of a document.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Approve | Self::Reject)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Note => "note",
            Self::Reopen => "reopen",
            Self::Mistake => "mistake",
            Self::Quit => "quit",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Short usage line printed after unrecognised input.
#[must_use]
pub fn usage_hint() -> String {
    let parts: Vec<String> = VOCABULARY
        .iter()
        .map(|entry| entry.synonyms.join("/"))
        .collect();
    format!("Please answer one of: {}", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synonyms_map_to_actions() {
        let cases = [
            ("yes", Command::Approve),
            ("y", Command::Approve),
            ("no", Command::Reject),
            ("n", Command::Reject),
            ("note", Command::Note),
            ("comment", Command::Note),
            ("c", Command::Note),
            ("r", Command::Reopen),
            ("reopen", Command::Reopen),
            ("mistake", Command::Mistake),
            ("m", Command::Mistake),
            ("q", Command::Quit),
            ("quit", Command::Quit),
        ];
        for (input, expected) in cases {
            assert_eq!(Command::parse(input), expected, "input {input:?}");
        }
    }

    #[test]
    fn parsing_ignores_case_and_padding() {
        assert_eq!(Command::parse("YES"), Command::Approve);
        assert_eq!(Command::parse("  No \n"), Command::Reject);
        assert_eq!(Command::parse("Mistake"), Command::Mistake);
    }

    #[test]
    fn anything_else_is_unknown() {
        for input in ["", "maybe", "yess", "q!", "1"] {
            assert_eq!(Command::parse(input), Command::Unknown, "input {input:?}");
        }
    }

    #[test]
    fn synonyms_are_unambiguous() {
        let mut seen = std::collections::HashSet::new();
        for entry in VOCABULARY {
            for s in entry.synonyms {
                assert!(seen.insert(*s), "synonym {s} listed twice");
            }
        }
    }

    #[test]
    fn only_approve_and_reject_are_terminal() {
        let terminal: Vec<_> = VOCABULARY
            .iter()
            .map(|e| e.command)
            .filter(|c| c.is_terminal())
            .collect();
        assert_eq!(terminal, vec![Command::Approve, Command::Reject]);
    }

    #[test]
    fn usage_hint_mentions_every_command() {
        let hint = usage_hint();
        for entry in VOCABULARY {
            assert!(hint.contains(entry.synonyms[0]), "{hint}");
        }
    }
}
