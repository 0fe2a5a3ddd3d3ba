use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tempfile::TempDir;

struct TestRepo {
    _temp_dir: TempDir,
    work_dir: PathBuf,
}

fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run git {:?}: {}", args, e));
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

impl TestRepo {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let work_dir = temp_dir.path().join("work");
        fs::create_dir_all(&work_dir).unwrap();

        git(&work_dir, &["init", "-q"]);
        git(&work_dir, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        git(&work_dir, &["config", "user.email", "test@test.com"]);
        git(&work_dir, &["config", "user.name", "Test User"]);
        git(&work_dir, &["config", "commit.gpgsign", "false"]);

        fs::write(work_dir.join("README.md"), "# Test").unwrap();
        git(&work_dir, &["add", "."]);
        git(&work_dir, &["commit", "-q", "-m", "Initial commit"]);

        TestRepo {
            _temp_dir: temp_dir,
            work_dir,
        }
    }

    /// Creates a branch at the current commit without switching to it.
    fn create_branch(&self, name: &str) {
        git(&self.work_dir, &["branch", name]);
    }

    /// Creates a branch carrying a commit that is not merged into `main`.
    fn create_unmerged_branch(&self, name: &str) {
        git(&self.work_dir, &["checkout", "-q", "-b", name]);
        fs::write(self.work_dir.join(format!("{}.txt", name.replace('/', "_"))), name).unwrap();
        git(&self.work_dir, &["add", "."]);
        git(&self.work_dir, &["commit", "-q", "-m", "Unmerged work"]);
        git(&self.work_dir, &["checkout", "-q", "main"]);
    }

    fn local_branches(&self) -> Vec<String> {
        git(&self.work_dir, &["branch", "--format=%(refname:short)"])
            .lines()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect()
    }

    fn run_gbm(&self, args: &[&str], stdin: &str) -> (String, String, bool) {
        let binary = PathBuf::from(env!("CARGO_BIN_EXE_gbm"));

        let mut child = Command::new(&binary)
            .args(args)
            .args(["--color", "never"])
            .current_dir(&self.work_dir)
            .env_remove("RUST_LOG")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap_or_else(|e| panic!("Failed to run gbm at {:?}: {}", binary, e));

        child
            .stdin
            .take()
            .unwrap()
            .write_all(stdin.as_bytes())
            .unwrap();
        let output = child.wait_with_output().unwrap();

        (
            String::from_utf8_lossy(&output.stdout).to_string(),
            String::from_utf8_lossy(&output.stderr).to_string(),
            output.status.success(),
        )
    }
}

#[test]
fn test_list_prints_sorted_numbered_branches() {
    let repo = TestRepo::new();
    repo.create_branch("zeta");
    repo.create_branch("alpha");

    let (stdout, _stderr, success) = repo.run_gbm(&["list"], "");

    assert!(success, "Command should succeed");
    assert!(stdout.contains(" 1. alpha\n 2. main\n 3. zeta\n"), "got: {}", stdout);

    let (again, _, _) = repo.run_gbm(&["list"], "");
    assert_eq!(stdout, again, "Listing should be stable");
}

#[test]
fn test_list_json_output() {
    let repo = TestRepo::new();
    repo.create_branch("feature/json-1");

    let (stdout, _stderr, success) = repo.run_gbm(&["list", "--json"], "");

    assert!(success, "Command should succeed");
    assert_eq!(stdout.trim(), r#"["feature/json-1","main"]"#);
}

#[test]
fn test_delete_by_pattern_after_confirmation() {
    let repo = TestRepo::new();
    repo.create_branch("feature/one");
    repo.create_branch("feature/two");
    repo.create_branch("bugfix/keep");

    let (stdout, _stderr, success) = repo.run_gbm(&["delete", "feature*"], "maybe\nyes\n");

    assert!(success, "Command should succeed");
    assert_eq!(stdout.matches("Type 'yes' to confirm").count(), 2);
    assert!(stdout.contains("Deleted branch feature/one"));
    assert!(stdout.contains("2 out of 2 branches were deleted."));
    assert_eq!(repo.local_branches(), vec!["bugfix/keep", "main"]);
}

#[test]
fn test_delete_cancelled_leaves_branches() {
    let repo = TestRepo::new();
    repo.create_branch("feature/one");

    let (stdout, _stderr, success) = repo.run_gbm(&["delete", "*one"], "no\n");

    assert!(success, "Command should succeed");
    assert!(stdout.contains("Deletion cancelled"));
    assert_eq!(repo.local_branches(), vec!["feature/one", "main"]);
}

#[test]
fn test_delete_by_index_spec() {
    let repo = TestRepo::new();
    for name in ["a", "b", "c", "d"] {
        repo.create_branch(name);
    }

    // sorted listing: a b c d main
    let (stdout, _stderr, success) = repo.run_gbm(&["delete", "2,4,9"], "yes\n");

    assert!(success, "Command should succeed");
    assert!(stdout.contains("Ignoring '9'"));
    assert_eq!(repo.local_branches(), vec!["a", "c", "main"]);
}

#[test]
fn test_keep_protects_current_branch() {
    let repo = TestRepo::new();
    repo.create_branch("one");
    repo.create_branch("two");
    repo.create_branch("stay");

    let (stdout, _stderr, success) = repo.run_gbm(&["keep", "stay"], "yes\n");

    assert!(success, "Command should succeed");
    assert!(stdout.contains("Current branch (main) cannot be deleted."));
    assert_eq!(repo.local_branches(), vec!["main", "stay"]);
}

#[test]
fn test_safe_delete_reports_unmerged_and_continues() {
    let repo = TestRepo::new();
    repo.create_branch("old-a");
    repo.create_unmerged_branch("old-b");
    repo.create_branch("old-c");

    let (stdout, _stderr, success) = repo.run_gbm(&["delete", "old*"], "yes\n");

    assert!(success, "Command should succeed");
    assert!(stdout.contains("Branch: old-b - Error:"), "got: {}", stdout);
    assert!(stdout.contains("2 out of 3 branches were deleted."));
    assert!(stdout.contains("1 branch was not deleted due to errors."));
    assert_eq!(repo.local_branches(), vec!["main", "old-b"]);
}

#[test]
fn test_force_delete_removes_unmerged() {
    let repo = TestRepo::new();
    repo.create_unmerged_branch("wip");

    let (stdout, _stderr, success) = repo.run_gbm(&["Delete", "wip"], "yes\n");

    assert!(success, "Command should succeed");
    assert!(stdout.contains("1 out of 1 branch was deleted."));
    assert_eq!(repo.local_branches(), vec!["main"]);
}

#[test]
fn test_dry_run_does_not_delete() {
    let repo = TestRepo::new();
    repo.create_branch("tmp-1");
    repo.create_branch("tmp-2");

    let (stdout, _stderr, success) = repo.run_gbm(&["delete", "tmp*", "--dry-run"], "");

    assert!(success, "Command should succeed");
    assert!(stdout.contains("would be deleted"));
    assert!(!stdout.contains("Type 'yes'"));
    assert_eq!(repo.local_branches(), vec!["main", "tmp-1", "tmp-2"]);
}

#[test]
fn test_no_matching_branches() {
    let repo = TestRepo::new();

    let (stdout, _stderr, success) = repo.run_gbm(&["delete", "nonexistent*"], "");

    assert!(success, "Command should succeed");
    assert!(stdout.contains("No branches match the given pattern."));
}

#[test]
fn test_outside_repository_fails() {
    let dir = TempDir::new().unwrap();
    let binary = PathBuf::from(env!("CARGO_BIN_EXE_gbm"));

    let output = Command::new(&binary)
        .args(["list", "-C"])
        .arg(dir.path())
        .env("GIT_CEILING_DIRECTORIES", dir.path().parent().unwrap())
        .output()
        .unwrap();

    assert!(!output.status.success(), "Listing outside a repository should fail");
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error listing branches"));
}

#[test]
fn test_missing_arguments_print_usage() {
    let repo = TestRepo::new();

    let (_stdout, stderr, success) = repo.run_gbm(&["delete"], "");

    assert!(!success, "Missing pattern should be a usage error");
    assert!(stderr.contains("Usage"));
}
