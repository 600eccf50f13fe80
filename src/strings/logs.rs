//! # Log Lines
//!
//! Wording for `tracing` output, kept apart from transcript text.

use std::time::Duration;

pub const STARTING: &str = "Starting relay...";

pub fn config_loaded(path: &str) -> String {
    format!("Loaded configuration from {path}")
}

pub fn listening(addr: &str) -> String {
    format!("Listening on http://{addr}")
}

pub fn bind_failed(addr: &str, err: &str) -> String {
    format!("Failed to bind to {addr}: {err}")
}

pub fn agent_script(lines: usize) -> String {
    format!("Received agent script ({lines} lines)")
}

pub const HUMAN_PASSTHROUGH: &str = "Input has no response marker; echoing it back";

pub fn dispatch(kind: &str, path: Option<&str>) -> String {
    match path {
        Some(path) => format!("Executing {kind}: {path}"),
        None => format!("Executing {kind}"),
    }
}

pub fn parse_error(line: usize, message: &str) -> String {
    format!("Script line {line}: {message}")
}

pub fn transcript_ready(results: usize, bytes: usize) -> String {
    format!("Transcript ready: {results} results, {bytes} bytes")
}

pub fn spawn_failed(shell: &str, err: &str) -> String {
    format!("Failed to spawn {shell}: {err}")
}

pub fn command_timed_out(limit: Duration) -> String {
    format!("Bash block exceeded {}s and was killed", limit.as_secs_f64())
}

pub fn io_failed(action: &str, path: &str, err: &str) -> String {
    format!("Failed to {action} {path}: {err}")
}

pub fn review_unavailable(path: &str, err: &str) -> String {
    format!("No review for {path}: {err}")
}
