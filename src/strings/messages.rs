//! # Messages
//!
//! Text that ends up in the transcript returned to the agent.
//! Includes parse errors, file framing, and the diff/choice report of a save.

use crate::domain::markers::{APPLY_CHOICES_END, APPLY_CHOICES_START, CLOSER};
use crate::domain::types::{BlockKind, Hunk};
use std::time::Duration;

pub fn nested_start(kind: BlockKind) -> String {
    format!("Error: Nested {} start", kind.label())
}

pub fn end_without_start(kind: BlockKind) -> String {
    format!("Error: {} end without start", capitalize(kind.label()))
}

pub fn unclosed_block(kind: BlockKind) -> String {
    format!("Error: Unclosed {} block", kind.label())
}

pub const INVALID_READ_DIR: &str = "Error: Invalid read_dir format";
pub const INVALID_READ_FILE: &str = "Error: Invalid read_file format";

pub fn invalid_start(kind: BlockKind) -> String {
    format!("Error: Invalid {} start format", kind.label())
}

pub fn saved_file(path: &str) -> String {
    format!("Saved file: {path}")
}

pub fn applied_choices(path: &str) -> String {
    format!("Applied choices to {path}")
}

pub fn file_block(path: &str, content: &str) -> String {
    format!("--- File: {path} ---\n{content}\n--- End of file ---")
}

pub fn no_changes(rel_path: &str) -> String {
    format!("No changes in git diff for {rel_path} (file unchanged since last commit)")
}

pub fn git_diff_block(rel_path: &str, diff: &str) -> String {
    format!("--- Git Diff for {rel_path} ---\n{}\n--- End Git Diff ---", diff.trim_end())
}

pub fn change_label(number: usize) -> String {
    format!("Change #{number}:")
}

/// A ready-to-fill apply-choices block listing every hunk.
pub fn choice_prompt(path: &str, hunks: &[Hunk]) -> String {
    let mut lines = Vec::with_capacity(hunks.len() + 2);
    lines.push(format!("{APPLY_CHOICES_START} {path} {CLOSER}"));
    for hunk in hunks {
        lines.push(format!("Change #{}, (Yes/No)", hunk.number));
    }
    lines.push(APPLY_CHOICES_END.to_string());
    lines.join("\n")
}

pub fn command_timed_out(limit: Duration) -> String {
    format!("Command timed out after {}s", limit.as_secs_f64())
}

/// A failed read, naming the path the agent asked for.
pub fn read_failed(path: &str, err: &str) -> String {
    format!("{path}: {err}")
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
