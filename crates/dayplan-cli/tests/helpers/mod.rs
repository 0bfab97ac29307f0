#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Runs the `dayplan` binary against a private database and working directory
pub struct CliTestHarness {
    temp_dir: TempDir,
    db_path: PathBuf,
}

impl CliTestHarness {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("data").join("test.db");

        Self { temp_dir, db_path }
    }

    /// A Command pinned to UTC, with no config file or API key leaking in
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("dayplan").expect("Failed to find dayplan binary");
        cmd.current_dir(self.temp_dir.path())
            .env("DAYPLAN_DATABASE_PATH", &self.db_path)
            .env("DAYPLAN_TIMEZONE", "UTC")
            .env_remove("GEMINI_API_KEY")
            .env_remove("DAYPLAN_SUGGESTIONS__API_KEY")
            .env_remove("DAYPLAN_LOG");
        cmd
    }

    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }

    /// Adds a task and returns the short ID printed for it
    pub fn add_task(&self, args: &[&str]) -> String {
        let mut full = vec!["add"];
        full.extend_from_slice(args);
        let output = self.run_success(&full).get_output().stdout.clone();
        extract_id(&String::from_utf8_lossy(&output), "Task ID:")
    }
}

/// Drops ANSI colour sequences so output can be matched as plain text
pub fn strip_ansi(text: &str) -> String {
    let mut plain = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            for next in chars.by_ref() {
                if next.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            plain.push(c);
        }
    }
    plain
}

/// The first whitespace-delimited token after `marker`
pub fn extract_id(output: &str, marker: &str) -> String {
    let plain = strip_ansi(output);
    plain
        .lines()
        .find_map(|line| line.split_once(marker))
        .and_then(|(_, rest)| rest.split_whitespace().next())
        .map(|id| id.trim_matches(|c: char| !c.is_ascii_hexdigit()).to_string())
        .unwrap_or_else(|| panic!("no '{}' in output:\n{}", marker, plain))
}

pub mod assertions {
    use predicates::prelude::*;

    pub fn has_error() -> impl Predicate<str> {
        predicate::str::contains("Error").or(predicate::str::contains("error"))
    }

    pub fn task_created_successfully() -> impl Predicate<str> {
        predicate::str::contains("✓").and(predicate::str::contains("Created"))
    }
}
