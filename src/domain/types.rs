//! # Domain Types
//!
//! Records produced by the block scanner and the review gateway.
//! Everything here lives for a single request.

use std::fmt;
use std::path::PathBuf;

use crate::domain::markers::Marker;

/// A block-form command: one that spans a start and an end marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Bash,
    Save,
    ApplyChoices,
}

impl BlockKind {
    pub fn start(self) -> Marker {
        match self {
            BlockKind::Bash => Marker::BashStart,
            BlockKind::Save => Marker::SaveStart,
            BlockKind::ApplyChoices => Marker::ApplyChoicesStart,
        }
    }

    pub fn end(self) -> Marker {
        match self {
            BlockKind::Bash => Marker::BashEnd,
            BlockKind::Save => Marker::SaveEnd,
            BlockKind::ApplyChoices => Marker::ApplyChoicesEnd,
        }
    }

    /// Lower-case name used inside error messages ("nested bash start").
    pub fn label(self) -> &'static str {
        match self {
            BlockKind::Bash => "bash",
            BlockKind::Save => "save",
            BlockKind::ApplyChoices => "apply choices",
        }
    }
}

/// A command recognised in an agent script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Bash { body: Vec<String> },
    Save { path: String, body: Vec<String> },
    ReadFile { path: String },
    ReadDir { path: String, pattern: String },
    ApplyChoices { path: String, body: Vec<String> },
}

impl Command {
    pub fn kind(&self) -> &'static str {
        match self {
            Command::Bash { .. } => "bash",
            Command::Save { .. } => "save",
            Command::ReadFile { .. } => "read_file",
            Command::ReadDir { .. } => "read_dir",
            Command::ApplyChoices { .. } => "apply_choices",
        }
    }

    pub fn path(&self) -> Option<&str> {
        match self {
            Command::Bash { .. } => None,
            Command::Save { path, .. }
            | Command::ReadFile { path }
            | Command::ReadDir { path, .. }
            | Command::ApplyChoices { path, .. } => Some(path),
        }
    }
}

/// A malformed or misordered marker. Reported inline; never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    /// 1-based line of the script that caused it.
    pub line: usize,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// One entry of the scanner's output, in script order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanItem {
    Command(Command),
    Error(ParseError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Decision {
    Yes,
    No,
    #[default]
    Unset,
}

impl Decision {
    /// Hunks without an explicit decision are kept.
    pub fn accepts(self) -> bool {
        self != Decision::No
    }
}

/// A numbered region of difference between the working and committed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hunk {
    pub number: usize,
    pub decision: Decision,
}

impl Hunk {
    pub fn new(number: usize) -> Self {
        Self {
            number,
            decision: Decision::Unset,
        }
    }
}

/// Working-tree content of a tracked file next to its committed content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub repo_root: PathBuf,
    /// Path relative to `repo_root`, `/`-separated.
    pub rel_path: String,
    pub base: String,
    pub current: String,
}

impl FileDiff {
    pub fn is_empty(&self) -> bool {
        self.base == self.current
    }
}

/// Diff text with inline hunk numbers plus the hunk list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NumberedDiff {
    pub text: String,
    pub hunks: Vec<Hunk>,
}
