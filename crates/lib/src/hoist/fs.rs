//! Filesystem operations used by the hoist transaction.
//!
//! The hoister only mutates the tree through [`FileSystem`], so tests can
//! inject failures at any step of the protocol.

use std::fs;
use std::io;
use std::path::Path;

pub trait FileSystem {
  fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

  /// Create a symlink at `link` whose content is `target` (stored verbatim).
  fn symlink(&self, target: &Path, link: &Path) -> io::Result<()>;

  fn remove_file(&self, path: &Path) -> io::Result<()>;

  /// True if anything (file, directory or dangling symlink) is at `path`.
  fn exists(&self, path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
  }

  fn file_size(&self, path: &Path) -> io::Result<u64> {
    fs::symlink_metadata(path).map(|m| m.len())
  }
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
  fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
    fs::rename(from, to)
  }

  #[cfg(unix)]
  fn symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
  }

  #[cfg(windows)]
  fn symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
  }

  fn remove_file(&self, path: &Path) -> io::Result<()> {
    fs::remove_file(path)
  }
}
