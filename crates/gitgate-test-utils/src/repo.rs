//! [`TestRepo`] builder for gitgate test scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::git::{real_git_repo, real_git_repo_with_commit, run_git};

/// A temporary repository directory with helper methods for test setup and
/// assertion.
///
/// # Example
///
/// ```rust,no_run
/// use gitgate_test_utils::repo::TestRepo;
///
/// let repo = TestRepo::with_commit();
/// repo.write_file("notes.txt", "hello");
/// assert_eq!(repo.commit_count(), 1);
/// ```
pub struct TestRepo {
    temp_dir: TempDir,
    remote: Option<TempDir>,
}

impl Default for TestRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRepo {
    /// Create an empty temporary directory (not a repository).
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
            remote: None,
        }
    }

    /// Create a repository on `main` with one commit.
    pub fn with_commit() -> Self {
        let repo = Self::new();
        real_git_repo_with_commit(repo.root());
        repo
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Root path as a string, ready to drop into tool arguments.
    pub fn root_str(&self) -> String {
        self.root().to_string_lossy().into_owned()
    }

    /// Initialise the directory as a real git repository using `git2`.
    ///
    /// Realism level: REAL: valid git state, empty history.
    pub fn init_git(&self) {
        real_git_repo(self.root());
    }

    /// Write `content` to `path` (relative to the repo root), creating parents.
    pub fn write_file(&self, path: &str, content: &str) {
        let full_path = self.root().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content).unwrap();
    }

    /// Run `git <args>` in the repository and return stdout.
    pub fn git(&self, args: &[&str]) -> String {
        let output = run_git(self.root(), args);
        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    /// Commit a new file so history grows by one.
    pub fn commit_file(&self, path: &str, content: &str, message: &str) {
        self.write_file(path, content);
        self.git(&["add", path]);
        self.git(&["commit", "-m", message]);
    }

    /// Create a bare repository and register it as `origin`.
    ///
    /// Returns the remote's path. The remote lives as long as this `TestRepo`.
    pub fn add_bare_remote(&mut self) -> PathBuf {
        let remote = TempDir::new().unwrap();
        run_git(remote.path(), &["init", "--bare"]);
        let remote_path = remote.path().to_path_buf();
        self.git(&["remote", "add", "origin", &remote_path.to_string_lossy()]);
        self.remote = Some(remote);
        remote_path
    }

    fn open(&self) -> git2::Repository {
        git2::Repository::open(self.root()).unwrap_or_else(|e| {
            panic!("TestRepo: {} is not a repository: {e}", self.root().display())
        })
    }

    /// Number of commits reachable from HEAD.
    pub fn commit_count(&self) -> usize {
        let repo = self.open();
        let mut walk = repo.revwalk().unwrap();
        walk.push_head().unwrap();
        walk.count()
    }

    /// Subject line of the HEAD commit.
    pub fn head_message(&self) -> String {
        let repo = self.open();
        let commit = repo.head().unwrap().peel_to_commit().unwrap();
        commit.summary().unwrap_or_default().to_string()
    }

    /// Short name of the checked-out branch.
    pub fn current_branch(&self) -> String {
        let repo = self.open();
        let head = repo.head().unwrap();
        head.shorthand().unwrap_or("HEAD").to_string()
    }

    /// Whether a local branch called `name` exists.
    pub fn has_branch(&self, name: &str) -> bool {
        self.open()
            .find_branch(name, git2::BranchType::Local)
            .is_ok()
    }

    /// Whether `path` is staged in the index.
    pub fn is_staged(&self, path: &str) -> bool {
        let repo = self.open();
        let index = repo.index().unwrap();
        index.get_path(Path::new(path), 0).is_some()
    }

    /// Assert that `path` (relative to the repo root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }
}
