//! # Tool Executor
//!
//! Side-effecting handlers behind each command kind: run a bash block, save a
//! file, read a file or a directory, and apply hunk choices.
//!
//! Every handler returns text. Failures are rendered as the result instead of
//! propagated, so one failing command never stops the rest of a script.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::domain::config::AppConfig;
use crate::domain::traits::ReviewGateway;
use crate::domain::types::Command;
use crate::strings::{logs, messages};

/// Configuration for the ToolExecutor
#[derive(Debug, Clone)]
pub struct ToolConfig {
    /// Shell that runs bash blocks with `-c`.
    pub shell: String,
    /// Commands run here and relative paths resolve against it. Defaults to the process cwd.
    pub working_dir: Option<PathBuf>,
    /// Upper bound on a bash block. `None` waits for the process to exit.
    pub timeout: Option<Duration>,
    /// Prefix lines of file reads with their line number.
    pub number_lines: bool,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            shell: "sh".to_string(),
            working_dir: None,
            timeout: None,
            number_lines: false,
        }
    }
}

impl From<&AppConfig> for ToolConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            shell: config.commands.shell.clone(),
            working_dir: config.commands.working_dir(),
            timeout: config.commands.timeout(),
            number_lines: config.files.number_lines,
        }
    }
}

/// Executes commands against the local machine.
pub struct ToolExecutor {
    config: ToolConfig,
    review: Arc<dyn ReviewGateway>,
}

/// Status text of a save plus the choice prompt when there are hunks.
struct ReviewReport {
    status: String,
    prompt: Option<String>,
}

impl ToolExecutor {
    pub fn new(config: ToolConfig, review: Arc<dyn ReviewGateway>) -> Self {
        Self { config, review }
    }

    /// Dispatches one command to its handler.
    pub async fn execute(&self, command: &Command) -> String {
        match command {
            Command::Bash { body } => self.run_bash(body).await,
            Command::Save { path, body } => self.save_file(path, &body.join("\n")).await,
            Command::ReadFile { path } => self.read_file(path).await,
            Command::ReadDir { path, pattern } => self.read_directory(path, pattern).await,
            Command::ApplyChoices { path, body } => {
                self.apply_choices(path, &body.join("\n")).await
            }
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        match &self.config.working_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Runs the body as one shell invocation; returns stdout followed by stderr.
    pub async fn run_bash(&self, body: &[String]) -> String {
        let script = body.join("\n");

        let mut cmd = tokio::process::Command::new(&self.config.shell);
        cmd.arg("-c")
            .arg(&script)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.config.working_dir {
            cmd.current_dir(dir);
        }

        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!("{}", logs::spawn_failed(&self.config.shell, &e.to_string()));
                return e.to_string();
            }
        };

        let output = match self.config.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(output) => output,
                Err(_) => {
                    warn!("{}", logs::command_timed_out(limit));
                    return messages::command_timed_out(limit);
                }
            },
            None => child.wait_with_output().await,
        };

        match output {
            Ok(output) => {
                debug!("bash block exited with {}", output.status);
                let mut result = String::from_utf8_lossy(&output.stdout).into_owned();
                result.push_str(&String::from_utf8_lossy(&output.stderr));
                result
            }
            Err(e) => e.to_string(),
        }
    }

    /// Writes `content` (creating parent directories) and reports the diff.
    pub async fn save_file(&self, path: &str, content: &str) -> String {
        let target = self.resolve(path);

        if let Some(parent) = target.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = tokio::fs::create_dir_all(parent).await
        {
            warn!("{}", logs::io_failed("create directories for", path, &e.to_string()));
            return e.to_string();
        }
        if let Err(e) = tokio::fs::write(&target, content).await {
            warn!("{}", logs::io_failed("write", path, &e.to_string()));
            return e.to_string();
        }

        let report = self.review_report(path, &target).await;
        let mut sections = vec![messages::saved_file(path), report.status];
        sections.extend(report.prompt);
        sections.join("\n")
    }

    async fn review_report(&self, path: &str, target: &Path) -> ReviewReport {
        match self.review.diff(target).await {
            Err(e) => {
                debug!("{}", logs::review_unavailable(path, &e.to_string()));
                ReviewReport {
                    status: e.to_string(),
                    prompt: None,
                }
            }
            Ok(diff) if diff.is_empty() => ReviewReport {
                status: messages::no_changes(&diff.rel_path),
                prompt: None,
            },
            Ok(diff) => {
                debug!("reviewing {} in {}", diff.rel_path, diff.repo_root.display());
                let numbered = self.review.number_hunks(&diff);
                let prompt = (!numbered.hunks.is_empty())
                    .then(|| messages::choice_prompt(path, &numbered.hunks));
                ReviewReport {
                    status: messages::git_diff_block(&diff.rel_path, &numbered.text),
                    prompt,
                }
            }
        }
    }

    /// Reads a whole file framed by file markers. On failure only the error text is returned.
    pub async fn read_file(&self, path: &str) -> String {
        match tokio::fs::read_to_string(self.resolve(path)).await {
            Ok(content) => messages::file_block(path, &self.render(&content)),
            Err(e) => {
                warn!("{}", logs::io_failed("read", path, &e.to_string()));
                messages::read_failed(path, &e.to_string())
            }
        }
    }

    /// Reads every file under `root` whose name matches `pattern` from its first character.
    /// Files come in directory-walk order: a directory's files, then its subdirectories.
    pub async fn read_directory(&self, root: &str, pattern: &str) -> String {
        let name_pattern = match Regex::new(&format!("^(?:{pattern})")) {
            Ok(regex) => regex,
            Err(e) => return e.to_string(),
        };

        let root_path = self.resolve(root);
        // A root that is a plain file has nothing to walk.
        if let Ok(meta) = tokio::fs::metadata(&root_path).await
            && !meta.is_dir()
        {
            debug!("read_dir root {root} is not a directory");
            return String::new();
        }
        let display_root = Path::new(root);
        let mut output = Vec::new();
        let mut pending = vec![(root_path.clone(), display_root.to_path_buf())];

        while let Some((dir, shown)) = pending.pop() {
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if dir == root_path => return messages::read_failed(root, &e.to_string()),
                Err(e) => {
                    warn!("{}", logs::io_failed("list", &shown.display().to_string(), &e.to_string()));
                    continue;
                }
            };

            let mut subdirs = Vec::new();
            loop {
                let entry = match entries.next_entry().await {
                    Ok(Some(entry)) => entry,
                    Ok(None) => break,
                    Err(e) => {
                        warn!("{}", logs::io_failed("list", &shown.display().to_string(), &e.to_string()));
                        break;
                    }
                };
                let name = entry.file_name();
                let shown_path = shown.join(&name);
                let Ok(file_type) = entry.file_type().await else {
                    continue;
                };

                if file_type.is_dir() {
                    subdirs.push((entry.path(), shown_path));
                    continue;
                }
                let is_file = file_type.is_file()
                    || (file_type.is_symlink()
                        && tokio::fs::metadata(entry.path())
                            .await
                            .map(|meta| meta.is_file())
                            .unwrap_or(false));
                if !is_file || !name_pattern.is_match(&name.to_string_lossy()) {
                    continue;
                }

                let shown_path = shown_path.display().to_string();
                output.push(match tokio::fs::read_to_string(entry.path()).await {
                    Ok(content) => messages::file_block(&shown_path, &self.render(&content)),
                    Err(e) => {
                        warn!("{}", logs::io_failed("read", &shown_path, &e.to_string()));
                        messages::read_failed(&shown_path, &e.to_string())
                    }
                });
            }
            pending.extend(subdirs.into_iter().rev());
        }

        output.join("\n")
    }

    /// Merges the agent's hunk decisions into `path`, then saves the result.
    pub async fn apply_choices(&self, path: &str, decisions: &str) -> String {
        let target = self.resolve(path);
        let diff = match self.review.diff(&target).await {
            Ok(diff) => diff,
            Err(e) => return e.to_string(),
        };
        let merged = self.review.apply_choices(&diff, decisions);
        let saved = self.save_file(path, &merged).await;
        format!("{}\n{}", messages::applied_choices(path), saved)
    }

    fn render(&self, content: &str) -> String {
        if self.config.number_lines {
            number_lines(content)
        } else {
            content.to_string()
        }
    }
}

/// Prefixes each line with its 1-based number, right-aligned to 4 columns.
pub fn number_lines(content: &str) -> String {
    content
        .lines()
        .enumerate()
        .map(|(index, line)| format!("{:>4} {}", index + 1, line))
        .collect::<Vec<_>>()
        .join("\n")
}
