use std::path::PathBuf;
use std::process::{Command, Output};

use tracing::{debug, info};

use crate::error::{GbmError, Result};

/// Branches as reported by one `git branch` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Branch names in the order the tool printed them.
    pub branches: Vec<String>,
    /// The checked-out branch, absent on a detached HEAD or an unborn repo.
    pub current: Option<String>,
}

impl Snapshot {
    /// Names in byte order, the order `list` prints and index specs refer to.
    pub fn sorted(&self) -> Vec<String> {
        let mut names = self.branches.clone();
        names.sort();
        names
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMode {
    /// `git branch -d`: refuses branches with unmerged history.
    Safe,
    /// `git branch -D`
    Force,
}

impl DeleteMode {
    pub fn from_force(force: bool) -> Self {
        if force { Self::Force } else { Self::Safe }
    }

    fn flag(self) -> &'static str {
        match self {
            Self::Safe => "-d",
            Self::Force => "-D",
        }
    }
}

/// The two things gbm needs from version control.
pub trait Repository {
    fn enumerate(&self) -> Result<Snapshot>;

    /// Deletes one branch. The error is the tool's diagnostic text.
    fn delete_branch(&self, name: &str, mode: DeleteMode) -> std::result::Result<(), String>;
}

/// Drives the `git` command line.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
    dir: Option<PathBuf>,
}

impl GitCli {
    pub fn new(program: impl Into<String>, dir: Option<PathBuf>) -> Self {
        Self {
            program: program.into(),
            dir,
        }
    }

    fn run(&self, args: &[&str]) -> Result<Output> {
        debug!(event = "git.exec", program = %self.program, args = ?args);
        let mut cmd = Command::new(&self.program);
        cmd.args(args);
        if let Some(dir) = &self.dir {
            cmd.current_dir(dir);
        }
        cmd.output().map_err(|source| GbmError::Spawn {
            program: self.program.clone(),
            source,
        })
    }

    fn describe(&self, args: &[&str]) -> String {
        format!("{} {}", self.program, args.join(" "))
    }
}

impl Repository for GitCli {
    fn enumerate(&self) -> Result<Snapshot> {
        let args = ["branch", "--no-color"];
        let output = self.run(&args)?;

        if !output.status.success() {
            return Err(GbmError::Execution {
                command: self.describe(&args),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let snapshot = parse_branch_listing(&String::from_utf8_lossy(&output.stdout));
        debug!(
            event = "git.enumerate.done",
            count = snapshot.branches.len(),
            current = ?snapshot.current
        );
        Ok(snapshot)
    }

    fn delete_branch(&self, name: &str, mode: DeleteMode) -> std::result::Result<(), String> {
        let output = self
            .run(&["branch", mode.flag(), name])
            .map_err(|e| e.to_string())?;

        if output.status.success() {
            info!(event = "branch.delete.ok", branch = name, mode = ?mode);
            return Ok(());
        }

        let mut message = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            if !message.is_empty() {
                message.push('\n');
            }
            message.push_str(stdout.trim());
        }
        if message.is_empty() {
            message = format!("exited with {}", output.status);
        }
        info!(event = "branch.delete.failed", branch = name, error = %message);
        Err(message)
    }
}

/// Parses `git branch` output.
///
/// Each line is trimmed. `* ` marks the checked-out branch and `+ ` a branch
/// checked out in another worktree; both markers are stripped. Blank lines and
/// parenthesised pseudo-entries like `(HEAD detached at 1a2b3c)` are dropped.
pub fn parse_branch_listing(output: &str) -> Snapshot {
    let mut snapshot = Snapshot::default();

    for line in output.lines() {
        let line = line.trim();
        let (is_current, name) = match line.strip_prefix('*') {
            Some(rest) => (true, rest.trim()),
            None => (false, line.strip_prefix('+').unwrap_or(line).trim()),
        };

        if name.is_empty() || name.starts_with('(') {
            continue;
        }
        if is_current {
            snapshot.current = Some(name.to_string());
        }
        snapshot.branches.push(name.to_string());
    }

    snapshot
}
