//! # Execution Engine
//!
//! Runs scanned commands one after another and assembles the transcript.
//! Parse errors keep their position; each command's text replaces the command.

use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::types::ScanItem;
use crate::infrastructure::tools::executor::ToolExecutor;
use crate::strings::logs;

#[derive(Clone)]
pub struct ExecutionEngine {
    tools: Arc<ToolExecutor>,
}

impl ExecutionEngine {
    pub fn new(tools: Arc<ToolExecutor>) -> Self {
        Self { tools }
    }

    /// Executes `items` in order and joins their results.
    pub async fn run(&self, items: Vec<ScanItem>) -> String {
        let mut results = Vec::with_capacity(items.len());
        for item in items {
            let result = match item {
                ScanItem::Command(command) => {
                    info!("{}", logs::dispatch(command.kind(), command.path()));
                    self.tools.execute(&command).await
                }
                ScanItem::Error(err) => {
                    warn!("{}", logs::parse_error(err.line, &err.message));
                    err.to_string()
                }
            };
            results.push(result);
        }

        let transcript = assemble(&results);
        info!("{}", logs::transcript_ready(results.len(), transcript.len()));
        transcript
    }
}

/// Joins results with single newlines, in the order given.
pub fn assemble(results: &[String]) -> String {
    results.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::parsing::scan;
    use crate::domain::types::ParseError;
    use crate::infrastructure::git::GitReviewGateway;
    use crate::infrastructure::tools::executor::ToolConfig;

    fn engine(dir: &std::path::Path) -> ExecutionEngine {
        let config = ToolConfig {
            working_dir: Some(dir.to_path_buf()),
            ..ToolConfig::default()
        };
        ExecutionEngine::new(Arc::new(ToolExecutor::new(
            config,
            Arc::new(GitReviewGateway::new()),
        )))
    }

    #[test]
    fn test_assemble() {
        assert_eq!(assemble(&[]), "");
        assert_eq!(assemble(&["a".into(), "".into(), "c".into()]), "a\n\nc");
    }

    #[tokio::test]
    async fn test_parse_error_renders_its_message() {
        let dir = tempfile::tempdir().unwrap();
        let items = vec![ScanItem::Error(ParseError {
            message: "Error: Nested save start".into(),
            line: 7,
        })];
        assert_eq!(engine(dir.path()).run(items).await, "Error: Nested save start");
    }

    #[tokio::test]
    async fn test_results_follow_script_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("note.txt"), "remember").unwrap();
        let script = "### AI_BASH_START ###\n\
                      printf first\n\
                      ### AI_BASH_END ###\n\
                      ### AI_SAVE_END ###\n\
                      ### AI_READ_FILE: note.txt ###\n\
                      ### AI_BASH_START ###\n\
                      printf never";

        let transcript = engine(dir.path()).run(scan(script.lines())).await;
        assert_eq!(
            transcript,
            "first\n\
             Error: Save end without start\n\
             --- File: note.txt ---\nremember\n--- End of file ---\n\
             Error: Unclosed bash block"
        );
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_later_commands() {
        let dir = tempfile::tempdir().unwrap();
        let script = "### AI_READ_FILE: absent.txt ###\n\
                      ### AI_BASH_START ###\n\
                      printf still-running\n\
                      ### AI_BASH_END ###";

        let transcript = engine(dir.path()).run(scan(script.lines())).await;
        assert!(transcript.ends_with("\nstill-running"));
        assert!(!transcript.starts_with("--- File:"));
    }
}
