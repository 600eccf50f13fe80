//! # Git Review Gateway
//!
//! Reports what a save changed relative to the repository and merges the
//! agent's per-hunk Yes/No choices back into the file.
//!
//! Git is used to locate the repository, check that the file is tracked and
//! fetch its committed (index) content. The diff itself is computed with
//! `similar`, and the same hunk grouping drives both numbering and merging so
//! the numbers an agent sees are the numbers applied.

use async_trait::async_trait;
use regex::Regex;
use similar::{DiffTag, TextDiff};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::sync::LazyLock;
use tokio::process::Command;

use crate::domain::error::ReviewError;
use crate::domain::traits::ReviewGateway;
use crate::domain::types::{Decision, FileDiff, Hunk, NumberedDiff};
use crate::strings::messages;

/// Lines of unchanged context around each hunk.
const CONTEXT_RADIUS: usize = 3;

static DECISION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)change\s*#\s*(\d+)\s*,\s*(yes|no)\b").expect("decision pattern is valid")
});

#[derive(Debug, Default, Clone)]
pub struct GitReviewGateway;

impl GitReviewGateway {
    pub fn new() -> Self {
        Self
    }
}

/// Nearest ancestor of `path`'s directory holding a `.git` entry.
pub fn find_repo_root(path: &Path) -> Option<PathBuf> {
    let absolute = std::path::absolute(path).ok()?;
    let mut current = absolute.parent()?.to_path_buf();
    loop {
        if current.join(".git").exists() {
            return Some(current);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Reads `Change #<n>, Yes|No` mentions; the last mention of a hunk wins.
pub fn parse_decisions(text: &str) -> BTreeMap<usize, Decision> {
    let mut decisions = BTreeMap::new();
    for caps in DECISION.captures_iter(text) {
        let Ok(number) = caps[1].parse::<usize>() else {
            continue;
        };
        let decision = if caps[2].eq_ignore_ascii_case("yes") {
            Decision::Yes
        } else {
            Decision::No
        };
        decisions.insert(number, decision);
    }
    decisions
}

async fn git(repo_root: &Path, args: &[&str]) -> Result<Output, ReviewError> {
    Command::new("git")
        .args(args)
        .current_dir(repo_root)
        .output()
        .await
        .map_err(|e| ReviewError::Git(e.to_string()))
}

#[async_trait]
impl ReviewGateway for GitReviewGateway {
    async fn diff(&self, path: &Path) -> Result<FileDiff, ReviewError> {
        let repo_root = find_repo_root(path)
            .ok_or_else(|| ReviewError::NoRepository(path.display().to_string()))?;
        let absolute = std::path::absolute(path)?;
        let rel_path = absolute
            .strip_prefix(&repo_root)
            .unwrap_or(&absolute)
            .to_string_lossy()
            .replace('\\', "/");

        let tracked = git(
            &repo_root,
            &["ls-files", "--error-unmatch", "--", rel_path.as_str()],
        )
        .await?;
        if !tracked.status.success() {
            return Err(ReviewError::Untracked(rel_path));
        }

        // `:<path>` is the index copy, which is what `git diff` compares against
        let index_spec = format!(":{rel_path}");
        let shown = git(&repo_root, &["show", index_spec.as_str()]).await?;
        if !shown.status.success() {
            return Err(ReviewError::Git(
                String::from_utf8_lossy(&shown.stderr).trim().to_string(),
            ));
        }

        let base = String::from_utf8_lossy(&shown.stdout).into_owned();
        let current = tokio::fs::read_to_string(&absolute).await?;
        Ok(FileDiff {
            repo_root,
            rel_path,
            base,
            current,
        })
    }

    fn number_hunks(&self, diff: &FileDiff) -> NumberedDiff {
        let text_diff = TextDiff::from_lines(diff.base.as_str(), diff.current.as_str());
        let mut unified = text_diff.unified_diff();
        unified.context_radius(CONTEXT_RADIUS);

        let mut numbered = NumberedDiff::default();
        for (index, hunk) in unified.iter_hunks().enumerate() {
            let number = index + 1;
            numbered.text.push_str(&messages::change_label(number));
            numbered.text.push('\n');
            numbered.text.push_str(&hunk.to_string());
            numbered.hunks.push(Hunk::new(number));
        }
        numbered
    }

    fn apply_choices(&self, diff: &FileDiff, decisions: &str) -> String {
        let decisions = parse_decisions(decisions);
        let text_diff = TextDiff::from_lines(diff.base.as_str(), diff.current.as_str());
        let old = text_diff.old_slices();
        let new = text_diff.new_slices();

        // Owning hunk of every non-equal op, in op order.
        let mut owners = Vec::new();
        for (index, group) in text_diff.grouped_ops(CONTEXT_RADIUS).iter().enumerate() {
            let mut hunk = Hunk::new(index + 1);
            if let Some(decision) = decisions.get(&hunk.number) {
                hunk.decision = *decision;
            }
            for op in group {
                if op.tag() != DiffTag::Equal {
                    owners.push(hunk);
                }
            }
        }
        let mut owners = owners.into_iter();

        let mut merged = String::with_capacity(diff.current.len());
        for op in text_diff.ops() {
            let (tag, old_range, new_range) = op.as_tag_tuple();
            let keep_new = match tag {
                DiffTag::Equal => false,
                _ => owners
                    .next()
                    .map_or(true, |hunk| hunk.decision.accepts()),
            };
            let lines = if keep_new {
                &new[new_range]
            } else {
                &old[old_range]
            };
            for line in lines {
                merged.push_str(line);
            }
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_lines(count: usize) -> Vec<String> {
        (1..=count).map(|n| format!("line {n}")).collect()
    }

    fn file_diff(base: &[String], current: &[String]) -> FileDiff {
        FileDiff {
            repo_root: PathBuf::from("/repo"),
            rel_path: "notes.txt".into(),
            base: base.iter().map(|l| format!("{l}\n")).collect(),
            current: current.iter().map(|l| format!("{l}\n")).collect(),
        }
    }

    /// Two edits far enough apart to form two hunks.
    fn two_hunk_diff() -> FileDiff {
        let base = numbered_lines(20);
        let mut current = base.clone();
        current[1] = "CHANGED 2".into();
        current[17] = "CHANGED 18".into();
        file_diff(&base, &current)
    }

    #[test]
    fn test_parse_decisions() {
        let decisions = parse_decisions("Change #1, Yes\nchange #2,no\n  Change # 3 , YES\nChange #2, Yes");
        assert_eq!(decisions.get(&1), Some(&Decision::Yes));
        assert_eq!(decisions.get(&2), Some(&Decision::Yes));
        assert_eq!(decisions.get(&3), Some(&Decision::Yes));
        assert!(parse_decisions("Change #4, (Yes/No)").is_empty());
    }

    #[test]
    fn test_number_hunks_top_to_bottom() {
        let numbered = GitReviewGateway::new().number_hunks(&two_hunk_diff());
        let numbers: Vec<usize> = numbered.hunks.iter().map(|h| h.number).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert!(numbered.hunks.iter().all(|h| h.decision == Decision::Unset));

        let first = numbered.text.find("Change #1:").unwrap();
        let second = numbered.text.find("Change #2:").unwrap();
        assert!(first < second);
        assert!(numbered.text.contains("-line 2\n+CHANGED 2\n"));
        assert!(numbered.text.contains("-line 18\n+CHANGED 18\n"));
    }

    #[test]
    fn test_number_hunks_empty_when_unchanged() {
        let base = numbered_lines(5);
        let numbered = GitReviewGateway::new().number_hunks(&file_diff(&base, &base));
        assert!(numbered.hunks.is_empty());
        assert!(numbered.text.is_empty());
    }

    #[test]
    fn test_apply_choices_keeps_and_reverts() {
        let diff = two_hunk_diff();
        let merged = GitReviewGateway::new().apply_choices(&diff, "Change #1, Yes\nChange #2, No");

        let mut expected = numbered_lines(20);
        expected[1] = "CHANGED 2".into();
        let expected: String = expected.iter().map(|l| format!("{l}\n")).collect();
        assert_eq!(merged, expected);
    }

    #[test]
    fn test_apply_choices_defaults_to_accept() {
        let diff = two_hunk_diff();
        let gateway = GitReviewGateway::new();
        assert_eq!(gateway.apply_choices(&diff, ""), diff.current);

        let merged = gateway.apply_choices(&diff, "Change #1, No\nChange #2, No");
        assert_eq!(merged, diff.base);
    }

    #[test]
    fn test_apply_choices_handles_inserts_and_deletes() {
        let base = numbered_lines(3);
        let current = vec!["line 1".to_string(), "line 3".to_string(), "line 4".to_string()];
        let diff = file_diff(&base, &current);
        let gateway = GitReviewGateway::new();
        assert_eq!(gateway.number_hunks(&diff).hunks.len(), 1);
        assert_eq!(gateway.apply_choices(&diff, "Change #1, No"), diff.base);
        assert_eq!(gateway.apply_choices(&diff, "Change #1, Yes"), diff.current);
    }

    #[test]
    fn test_find_repo_root_walks_upward() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();

        let root = find_repo_root(&nested.join("file.txt")).unwrap();
        assert_eq!(root, dir.path());
    }

    fn git_available() -> bool {
        std::process::Command::new("git")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn run_git(dir: &Path, args: &[&str]) {
        let status = std::process::Command::new("git")
            .args(["-c", "user.name=relay", "-c", "user.email=relay@localhost"])
            .args(args)
            .current_dir(dir)
            .output()
            .unwrap()
            .status;
        assert!(status.success(), "git {args:?} failed");
    }

    #[tokio::test]
    async fn test_diff_against_committed_content() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        run_git(dir.path(), &["init", "-q"]);
        std::fs::write(dir.path().join("tracked.txt"), "one\ntwo\n").unwrap();
        run_git(dir.path(), &["add", "tracked.txt"]);
        run_git(dir.path(), &["commit", "-q", "-m", "init"]);

        let gateway = GitReviewGateway::new();
        let path = dir.path().join("tracked.txt");
        let diff = gateway.diff(&path).await.unwrap();
        assert_eq!(diff.rel_path, "tracked.txt");
        assert!(diff.is_empty());

        std::fs::write(&path, "one\nTWO\n").unwrap();
        let diff = gateway.diff(&path).await.unwrap();
        assert_eq!(diff.base, "one\ntwo\n");
        assert_eq!(diff.current, "one\nTWO\n");

        std::fs::write(dir.path().join("loose.txt"), "x\n").unwrap();
        let err = gateway.diff(&dir.path().join("loose.txt")).await.unwrap_err();
        assert!(matches!(err, ReviewError::Untracked(rel) if rel == "loose.txt"));
    }

    #[tokio::test]
    async fn test_diff_outside_repository() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("free.txt");
        std::fs::write(&path, "x").unwrap();
        if find_repo_root(&path).is_some() {
            return;
        }
        let err = GitReviewGateway::new().diff(&path).await.unwrap_err();
        assert!(matches!(err, ReviewError::NoRepository(_)));
    }
}
