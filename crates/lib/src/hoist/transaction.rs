//! Per-file hoist transaction.
//!
//! Hoisting one file is a three step transaction:
//!
//! 1. `begin`: tentative move. If the store entry is missing the file itself
//!    is renamed into the store; otherwise it is renamed to a temp backup next
//!    to its original location.
//! 2. `link`: a relative symlink is created at the original path.
//! 3. `commit` removes the temp backup, or `rollback` moves the content back
//!    to the original path.
//!
//! A failed rollback is fatal and leaves the content where the tentative move
//! put it, so it can be recovered by hand.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, error, warn};

use crate::consts::BACKUP_SUFFIX;
use crate::util::hash::ContentHash;

use super::HoistError;
use super::fs::FileSystem;

/// Temp backup path for `path`: `<dir>/<basename>_<digest>.tmp`.
pub fn backup_path(path: &Path, digest: &ContentHash) -> PathBuf {
  let mut name = path.file_name().map(OsString::from).unwrap_or_default();
  name.push("_");
  name.push(digest.as_str());
  name.push(BACKUP_SUFFIX);
  path.with_file_name(name)
}

/// Where the original content sits while the transaction is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tentative {
  /// Store miss: the original was renamed into the store and is now the entry.
  MovedToStore,
  /// Store hit: the original was renamed to this temp backup.
  BackedUp(PathBuf),
}

/// Terminal state of a transaction that did not hit a fatal error.
#[derive(Debug)]
pub enum FileOutcome {
  /// The original path is now a symlink into the store.
  Linked { created_entry: bool },
  /// Linking failed and the original file was put back.
  RolledBack { error: io::Error },
}

pub struct HoistTransaction<'a, F: FileSystem> {
  fs: &'a F,
  path: PathBuf,
  store_path: PathBuf,
  link_target: PathBuf,
  tentative: Tentative,
}

impl<'a, F: FileSystem> HoistTransaction<'a, F> {
  /// Perform the tentative move of `path`.
  ///
  /// `link_target` is the symlink content that will later point at `store_path`.
  pub fn begin(
    fs: &'a F,
    path: &Path,
    digest: &ContentHash,
    store_path: &Path,
    link_target: PathBuf,
  ) -> Result<Self, HoistError> {
    let tentative = if fs.exists(store_path) {
      let backup = backup_path(path, digest);
      if fs.exists(&backup) {
        return Err(HoistError::BackupExists {
          path: path.to_path_buf(),
          backup,
        });
      }

      fs.rename(path, &backup).map_err(|source| HoistError::Backup {
        path: path.to_path_buf(),
        backup: backup.clone(),
        source,
      })?;
      debug!(path = %path.display(), backup = %backup.display(), "backed up original");
      Tentative::BackedUp(backup)
    } else {
      fs.rename(path, store_path).map_err(|source| HoistError::MoveToStore {
        path: path.to_path_buf(),
        store_path: store_path.to_path_buf(),
        source,
      })?;
      debug!(path = %path.display(), store = %store_path.display(), "moved original into store");
      Tentative::MovedToStore
    };

    Ok(Self {
      fs,
      path: path.to_path_buf(),
      store_path: store_path.to_path_buf(),
      link_target,
      tentative,
    })
  }

  pub fn tentative(&self) -> &Tentative {
    &self.tentative
  }

  /// Where the original content currently lives.
  pub fn recovery_path(&self) -> &Path {
    match &self.tentative {
      Tentative::MovedToStore => &self.store_path,
      Tentative::BackedUp(backup) => backup,
    }
  }

  /// Create the symlink at the original path.
  pub fn link(&self) -> io::Result<()> {
    self.fs.symlink(&self.link_target, &self.path)
  }

  /// Drop the temp backup after a successful link.
  pub fn commit(self) -> Result<FileOutcome, HoistError> {
    match &self.tentative {
      Tentative::MovedToStore => Ok(FileOutcome::Linked { created_entry: true }),
      Tentative::BackedUp(backup) => {
        self.fs.remove_file(backup).map_err(|source| HoistError::RemoveBackup {
          path: self.path.clone(),
          backup: backup.clone(),
          source,
        })?;
        Ok(FileOutcome::Linked { created_entry: false })
      }
    }
  }

  /// Move the original content back to its path after `link_error`.
  pub fn rollback(self, link_error: io::Error) -> Result<FileOutcome, HoistError> {
    let recovery = self.recovery_path().to_path_buf();

    match self.fs.rename(&recovery, &self.path) {
      Ok(()) => {
        warn!(
          path = %self.path.display(),
          error = %link_error,
          "failed to link file, original restored"
        );
        Ok(FileOutcome::RolledBack { error: link_error })
      }
      Err(source) => {
        error!(
          path = %self.path.display(),
          recovery = %recovery.display(),
          error = %source,
          "failed to restore original, content left at recovery path"
        );
        Err(HoistError::Restore {
          path: self.path,
          recovery,
          link_error,
          source,
        })
      }
    }
  }

  /// Link, then commit or roll back.
  pub fn run(self) -> Result<FileOutcome, HoistError> {
    match self.link() {
      Ok(()) => self.commit(),
      Err(e) => self.rollback(e),
    }
  }
}
