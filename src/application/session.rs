//! # Session Entry Point
//!
//! One submission in, one transcript out. Input that starts with the response
//! marker is scanned and executed; anything else was typed by a person and is
//! echoed back trimmed.

use std::sync::Arc;
use tracing::info;

use crate::application::engine::ExecutionEngine;
use crate::application::parsing;
use crate::domain::config::AppConfig;
use crate::domain::markers::RESPONSE_MARKER;
use crate::infrastructure::git::GitReviewGateway;
use crate::infrastructure::tools::executor::{ToolConfig, ToolExecutor};
use crate::strings::logs;

#[derive(Clone)]
pub struct Session {
    engine: ExecutionEngine,
}

impl Session {
    pub fn new(engine: ExecutionEngine) -> Self {
        Self { engine }
    }

    /// Wires the git review gateway and tool executor from configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        let tools = ToolExecutor::new(ToolConfig::from(config), Arc::new(GitReviewGateway::new()));
        Self::new(ExecutionEngine::new(Arc::new(tools)))
    }

    pub async fn handle(&self, input: &str) -> String {
        let input = input.trim();
        match input.strip_prefix(RESPONSE_MARKER) {
            Some(script) => {
                let script = script.trim();
                info!("{}", logs::agent_script(script.lines().count()));
                self.engine.run(parsing::scan(script.lines())).await
            }
            None => {
                info!("{}", logs::HUMAN_PASSTHROUGH);
                input.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::CommandsConfig;

    fn session_in(dir: &std::path::Path) -> Session {
        let config = AppConfig {
            commands: CommandsConfig {
                working_dir: Some(dir.display().to_string()),
                ..CommandsConfig::default()
            },
            ..AppConfig::default()
        };
        Session::from_config(&config)
    }

    #[tokio::test]
    async fn test_human_text_is_echoed_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_in(dir.path());
        let input = "  \n### AI_BASH_START ###\ntouch should-not-exist\n### AI_BASH_END ###\n  ";

        assert_eq!(
            session.handle(input).await,
            "### AI_BASH_START ###\ntouch should-not-exist\n### AI_BASH_END ###"
        );
        assert!(!dir.path().join("should-not-exist").exists());
    }

    #[tokio::test]
    async fn test_marker_is_stripped_before_scanning() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_in(dir.path());
        let input = "\n<AI_RESPONSE>\n### AI_BASH_START ###\nprintf ran\n### AI_BASH_END ###\n";
        assert_eq!(session.handle(input).await, "ran");
    }

    #[tokio::test]
    async fn test_marker_only_gives_empty_transcript() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(session_in(dir.path()).handle("<AI_RESPONSE>").await, "");
    }

    #[tokio::test]
    async fn test_save_and_read_back_through_script() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_in(dir.path());
        let input = "<AI_RESPONSE>\n\
                     ### AI_SAVE_START: proj/hello.txt ###\n\
                     hello\n\
                     world\n\
                     ### AI_SAVE_END ###\n\
                     ### AI_READ_FILE: proj/hello.txt ###";

        let transcript = session.handle(input).await;
        assert!(transcript.starts_with("Saved file: proj/hello.txt\n"));
        assert!(transcript.ends_with("--- File: proj/hello.txt ---\nhello\nworld\n--- End of file ---"));
    }
}
