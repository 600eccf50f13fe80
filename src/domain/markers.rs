//! # Marker Grammar
//!
//! The fixed set of line markers an agent script is built from.
//! Markers are literal and case-sensitive; whitespace around a marker line is ignored.
//!
//! ```txt
//! <AI_RESPONSE>
//! ### AI_BASH_START ###            ### AI_BASH_END ###
//! ### AI_SAVE_START: <path> ###    ### AI_SAVE_END ###
//! ### AI_APPLY_CHOICES: <path> ### ### AI_APPLY_CHOICES_END ###
//! ### AI_READ_DIR: <path> regex:<pattern> ###
//! ### AI_READ_FILE: <path> ###
//! ```

use crate::domain::types::BlockKind;

/// Leading marker separating agent scripts from human-typed input.
pub const RESPONSE_MARKER: &str = "<AI_RESPONSE>";

pub const BASH_START: &str = "### AI_BASH_START ###";
pub const BASH_END: &str = "### AI_BASH_END ###";
pub const SAVE_START: &str = "### AI_SAVE_START:";
pub const SAVE_END: &str = "### AI_SAVE_END ###";
pub const APPLY_CHOICES_START: &str = "### AI_APPLY_CHOICES:";
pub const APPLY_CHOICES_END: &str = "### AI_APPLY_CHOICES_END ###";
pub const READ_DIR: &str = "### AI_READ_DIR:";
pub const READ_FILE: &str = "### AI_READ_FILE:";

/// Trailing token closing a marker that carries an argument.
pub const CLOSER: &str = "###";
/// Separates the directory from the file name pattern in a read-dir marker.
pub const REGEX_TAG: &str = "regex:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    BashStart,
    BashEnd,
    SaveStart,
    SaveEnd,
    ApplyChoicesStart,
    ApplyChoicesEnd,
    ReadDir,
    ReadFile,
}

impl Marker {
    /// The block this marker opens or closes, if any.
    pub fn block(self) -> Option<BlockKind> {
        match self {
            Marker::BashStart | Marker::BashEnd => Some(BlockKind::Bash),
            Marker::SaveStart | Marker::SaveEnd => Some(BlockKind::Save),
            Marker::ApplyChoicesStart | Marker::ApplyChoicesEnd => Some(BlockKind::ApplyChoices),
            Marker::ReadDir | Marker::ReadFile => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Shape {
    /// The whole (trimmed) line is the marker.
    Exact,
    /// The marker starts the line and is followed by an argument.
    Prefix,
}

/// Tested top to bottom; the first row that matches wins.
const GRAMMAR: &[(Marker, &str, Shape)] = &[
    (Marker::BashStart, BASH_START, Shape::Exact),
    (Marker::BashEnd, BASH_END, Shape::Exact),
    (Marker::SaveStart, SAVE_START, Shape::Prefix),
    (Marker::SaveEnd, SAVE_END, Shape::Exact),
    (Marker::ApplyChoicesStart, APPLY_CHOICES_START, Shape::Prefix),
    (Marker::ApplyChoicesEnd, APPLY_CHOICES_END, Shape::Exact),
    (Marker::ReadDir, READ_DIR, Shape::Prefix),
    (Marker::ReadFile, READ_FILE, Shape::Prefix),
];

/// A recognised marker line. `argument` is the raw text after the marker's colon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerLine<'a> {
    pub marker: Marker,
    pub argument: &'a str,
}

/// Matches a script line against the grammar.
pub fn classify(line: &str) -> Option<MarkerLine<'_>> {
    let trimmed = line.trim();
    GRAMMAR.iter().find_map(|(marker, literal, shape)| match shape {
        Shape::Exact => (trimmed == *literal).then_some(MarkerLine {
            marker: *marker,
            argument: "",
        }),
        Shape::Prefix => trimmed.strip_prefix(literal).map(|argument| MarkerLine {
            marker: *marker,
            argument,
        }),
    })
}

/// Value of a `MARKER: <value> ###` argument. The closer may be glued to the value.
pub fn marker_value(argument: &str) -> &str {
    let value = argument.trim();
    value.strip_suffix(CLOSER).unwrap_or(value).trim()
}

/// Splits a read-dir argument into `(path, pattern)`.
/// Returns `None` when the `regex:` part or the path is missing.
pub fn read_dir_parts(argument: &str) -> Option<(&str, &str)> {
    let (path, pattern) = argument.split_once(REGEX_TAG)?;
    let path = path.trim();
    if path.is_empty() {
        return None;
    }
    Some((path, marker_value(pattern)))
}
