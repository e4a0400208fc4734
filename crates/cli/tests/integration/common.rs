//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Isolated test environment.
///
/// Each test gets its own temporary root directory to deduplicate.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  /// Create an empty test environment.
  pub fn empty() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  /// Five markdown files where `fileTOP_04.md` and `fileTOP_05.md` are identical.
  pub fn file_top() -> Self {
    let env = Self::empty();
    env.write_file("fileTOP_01.md", "# one\n");
    env.write_file("fileTOP_02.md", "# two\n");
    env.write_file("fileTOP_03.md", "# three\n");
    env.write_file("fileTOP_04.md", "# shared\n");
    env.write_file("fileTOP_05.md", "# shared\n");
    env
  }

  pub fn root(&self) -> &Path {
    self.temp.path()
  }

  pub fn path(&self, relative_path: &str) -> PathBuf {
    self.root().join(relative_path)
  }

  /// Write a file relative to the root.
  pub fn write_file(&self, relative_path: &str, content: &str) -> PathBuf {
    let path = self.path(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
  }

  pub fn is_symlink(&self, relative_path: &str) -> bool {
    std::fs::symlink_metadata(self.path(relative_path))
      .map(|m| m.file_type().is_symlink())
      .unwrap_or(false)
  }

  /// Sorted list of non-directory entries under the root.
  pub fn snapshot(&self) -> Vec<PathBuf> {
    fn visit(dir: &Path, out: &mut Vec<PathBuf>) {
      for entry in std::fs::read_dir(dir).unwrap() {
        let entry = entry.unwrap();
        let file_type = entry.file_type().unwrap();
        if file_type.is_dir() {
          visit(&entry.path(), out);
        } else {
          out.push(entry.path());
        }
      }
    }

    let mut entries = Vec::new();
    visit(self.root(), &mut entries);
    entries.sort();
    entries
  }

  /// Get a Command for the hoist binary with the root as its argument.
  pub fn hoist_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("hoist");
    cmd.env_remove("RUST_LOG");
    cmd.arg(self.root());
    cmd
  }
}
