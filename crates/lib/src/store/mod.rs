//! Content-addressed store for hoisted files.
//!
//! # Layout
//!
//! ```text
//! <root>/
//! └── hoisted-resources/          # store directory (name is configurable)
//!     ├── <sha256>.md             # one canonical copy per (digest, extension)
//!     └── <sha256>                # files without an extension
//! ```
//!
//! The extension is kept in the entry name so tools that look at file types
//! still work through the symlinks. Two identical files with different
//! extensions therefore get two store entries.

pub mod paths;

use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::config::HoistConfig;
use crate::util::hash::ContentHash;

pub use paths::{extension_of, relative_target};

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("failed to create store directory {path}")]
  CreateDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

#[derive(Debug, Clone)]
pub struct Store {
  root: PathBuf,
  dir: PathBuf,
}

impl Store {
  /// Describe the store under `root` without touching the filesystem.
  pub fn new(root: &Path, config: &HoistConfig) -> Self {
    Self {
      root: root.to_path_buf(),
      dir: root.join(&config.store_dir_name),
    }
  }

  /// Describe the store and make sure its directory exists.
  pub fn open(root: &Path, config: &HoistConfig) -> Result<Self, StoreError> {
    let store = Self::new(root, config);
    store.ensure_dir()?;
    Ok(store)
  }

  /// Create the store directory (and parents). Idempotent.
  pub fn ensure_dir(&self) -> Result<(), StoreError> {
    fs::create_dir_all(&self.dir).map_err(|source| StoreError::CreateDir {
      path: self.dir.clone(),
      source,
    })?;
    debug!(path = %self.dir.display(), "store directory ready");
    Ok(())
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn dir(&self) -> &Path {
    &self.dir
  }

  /// Canonical path for `digest` with extension `ext` (`".md"`, or `""`).
  pub fn entry_path(&self, digest: &ContentHash, ext: impl AsRef<OsStr>) -> PathBuf {
    let mut name = OsString::from(digest.as_str());
    name.push(ext);
    self.dir.join(name)
  }

  /// Canonical path for the content of `original`, keeping its extension.
  pub fn entry_path_for(&self, digest: &ContentHash, original: &Path) -> PathBuf {
    self.entry_path(digest, extension_of(original))
  }
}
