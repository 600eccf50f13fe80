//! # Domain Traits
//!
//! Abstract interfaces for collaborators the interpreter only consumes.

use async_trait::async_trait;
use std::path::Path;

use crate::domain::error::ReviewError;
use crate::domain::types::{FileDiff, NumberedDiff};

/// Diff retrieval, hunk numbering and choice-based merge for saved files.
#[async_trait]
pub trait ReviewGateway: Send + Sync {
    /// Working-tree content of `path` against its last committed state.
    /// Fails when there is no repository or the file is not tracked.
    async fn diff(&self, path: &Path) -> Result<FileDiff, ReviewError>;

    /// Numbers each hunk top to bottom, starting at 1.
    fn number_hunks(&self, diff: &FileDiff) -> NumberedDiff;

    /// Content that keeps accepted hunks and reverts rejected ones.
    /// `decisions` is the agent's free text (`Change #<n>, Yes|No` lines).
    fn apply_choices(&self, diff: &FileDiff, decisions: &str) -> String;
}
