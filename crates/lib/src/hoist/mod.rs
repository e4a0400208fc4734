//! Hoisting duplicate files into the store.
//!
//! For every digest group with more than one member, each member is moved
//! into the store (or backed up when the store already holds its content) and
//! replaced with a relative symlink to the store entry. Every member, the
//! first one included, ends up as a symlink.
//!
//! Groups are processed in digest order and members in walk order, one at a
//! time. See [`transaction`] for the per-file protocol and its recovery path.

pub mod fs;
pub mod transaction;

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::config::HoistConfig;
use crate::report::HoistReport;
use crate::scan::{DigestGroups, ScanError, scan};
use crate::store::{Store, StoreError, relative_target};
use crate::util::hash::ContentHash;

pub use fs::{FileSystem, StdFileSystem};
pub use transaction::{FileOutcome, HoistTransaction, Tentative, backup_path};

/// Fatal hoist errors. Each one aborts the whole run.
#[derive(Debug, Error)]
pub enum HoistError {
  #[error(transparent)]
  Store(#[from] StoreError),

  #[error("failed to stat {path}")]
  Stat {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to move {path} into store at {store_path}")]
  MoveToStore {
    path: PathBuf,
    store_path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to back up {path} to {backup}")]
  Backup {
    path: PathBuf,
    backup: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("temp backup {backup} for {path} already exists; recover or remove it and run again")]
  BackupExists { path: PathBuf, backup: PathBuf },

  #[error(
    "failed to restore {path} after link error ({link_error}); the original content is at {recovery}, move it \
     back by hand"
  )]
  Restore {
    path: PathBuf,
    recovery: PathBuf,
    link_error: io::Error,
    #[source]
    source: io::Error,
  },

  #[error("{path} is linked but its temp backup {backup} could not be removed")]
  RemoveBackup {
    path: PathBuf,
    backup: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Errors from a full scan + hoist run.
#[derive(Debug, Error)]
pub enum RunError {
  #[error(transparent)]
  Scan(#[from] ScanError),

  #[error(transparent)]
  Hoist(#[from] HoistError),
}

pub struct Hoister<F: FileSystem = StdFileSystem> {
  store: Store,
  config: HoistConfig,
  fs: F,
}

impl Hoister<StdFileSystem> {
  pub fn new(root: &Path, config: &HoistConfig) -> Self {
    Self::with_file_system(root, config, StdFileSystem)
  }
}

impl<F: FileSystem> Hoister<F> {
  pub fn with_file_system(root: &Path, config: &HoistConfig, fs: F) -> Self {
    Self {
      store: Store::new(root, config),
      config: config.clone(),
      fs,
    }
  }

  pub fn store(&self) -> &Store {
    &self.store
  }

  /// Hoist every duplicate group.
  ///
  /// Non-fatal per-file failures (link failed, original restored) are recorded
  /// in the report. Changes committed before a fatal error stay on disk.
  pub fn hoist(&self, groups: &DigestGroups) -> Result<HoistReport, HoistError> {
    let mut report = HoistReport::new(self.config.dry_run);

    if groups.duplicates().next().is_none() {
      debug!("no duplicate groups");
      return Ok(report);
    }

    if self.config.dry_run {
      self.plan(groups, &mut report)?;
      return Ok(report);
    }

    self.store.ensure_dir()?;

    for (digest, paths) in groups.duplicates() {
      for path in paths {
        self.hoist_file(digest, path, &mut report)?;
      }
    }

    info!(
      files = report.files_hoisted(),
      entries = report.entries.len(),
      failures = report.failures.len(),
      bytes_saved = report.bytes_saved(),
      "hoist complete"
    );

    Ok(report)
  }

  fn size_of(&self, path: &Path) -> Result<u64, HoistError> {
    self.fs.file_size(path).map_err(|source| HoistError::Stat {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Symlink content for `path`, or `None` after recording the member as failed.
  fn link_target(&self, path: &Path, store_path: &Path, report: &mut HoistReport) -> Option<PathBuf> {
    let target = relative_target(path, store_path);
    if target.is_none() {
      report.record_failure(
        path,
        store_path,
        format!("no relative path from {} to {}", path.display(), store_path.display()),
      );
    }
    target
  }

  fn hoist_file(&self, digest: &ContentHash, path: &Path, report: &mut HoistReport) -> Result<(), HoistError> {
    let store_path = self.store.entry_path_for(digest, path);

    let Some(link_target) = self.link_target(path, &store_path, report) else {
      return Ok(());
    };

    let size = self.size_of(path)?;

    info!(path = %path.display(), store = %store_path.display(), "hoisting file");

    let tx = HoistTransaction::begin(&self.fs, path, digest, &store_path, link_target)?;
    match tx.run()? {
      FileOutcome::Linked { created_entry } => {
        report.record_linked(&store_path, digest, size, created_entry, path);
      }
      FileOutcome::RolledBack { error } => {
        report.record_failure(path, &store_path, error.to_string());
      }
    }

    Ok(())
  }

  /// Dry run: record what `hoist` would do without touching the tree.
  fn plan(&self, groups: &DigestGroups, report: &mut HoistReport) -> Result<(), HoistError> {
    for (digest, paths) in groups.duplicates() {
      for path in paths {
        let store_path = self.store.entry_path_for(digest, path);
        if self.link_target(path, &store_path, report).is_none() {
          continue;
        }
        let created = !self.fs.exists(&store_path) && !report.entries.contains_key(&store_path);
        let size = self.size_of(path)?;
        debug!(path = %path.display(), store = %store_path.display(), "would hoist file");
        report.record_linked(&store_path, digest, size, created, path);
      }
    }
    Ok(())
  }
}

/// Scan `root` and hoist its duplicates.
pub fn hoist_tree(root: &Path, config: &HoistConfig) -> Result<HoistReport, RunError> {
  let scanned = scan(root, config)?;
  let mut report = Hoister::new(root, config).hoist(&scanned.groups)?;
  report.files_scanned = scanned.files_scanned;
  Ok(report)
}
