//! Test utilities for hoist-lib.
//!
//! Helpers for laying out small directory trees and inspecting the result of a
//! hoist.

use std::fs;
use std::path::{Path, PathBuf};

/// Writes `content` to `relative_path` under `root`, creating parent directories.
pub fn write_file(root: &Path, relative_path: &str, content: &str) -> PathBuf {
  let path = root.join(relative_path);
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).unwrap();
  }
  fs::write(&path, content).unwrap();
  path
}

/// Lays out the five-file fixture: `fileTOP_04.md` and `fileTOP_05.md` are identical.
pub fn file_top_fixture(root: &Path) -> Vec<PathBuf> {
  vec![
    write_file(root, "fileTOP_01.md", "# one\n"),
    write_file(root, "fileTOP_02.md", "# two\n"),
    write_file(root, "fileTOP_03.md", "# three\n"),
    write_file(root, "fileTOP_04.md", "# shared\n"),
    write_file(root, "fileTOP_05.md", "# shared\n"),
  ]
}

pub fn is_symlink(path: &Path) -> bool {
  fs::symlink_metadata(path)
    .map(|m| m.file_type().is_symlink())
    .unwrap_or(false)
}

/// Lists every non-directory entry under `dir`, sorted, for before/after comparisons.
pub fn list_tree(dir: &Path) -> Vec<PathBuf> {
  let mut entries: Vec<PathBuf> = walkdir::WalkDir::new(dir)
    .into_iter()
    .filter_map(|e| e.ok())
    .filter(|e| !e.file_type().is_dir())
    .map(|e| e.path().to_path_buf())
    .collect();
  entries.sort();
  entries
}
