//! Tree scanning.
//!
//! Walks a root directory and groups every regular file by content digest.
//! Symbolic links are never followed or hashed, and the store directory is
//! pruned from the walk so already-hoisted content is not picked up again.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use crate::config::HoistConfig;
use crate::util::hash::{ContentHash, HashError, hash_file};

#[derive(Debug, Error)]
pub enum ScanError {
  #[error("failed to read root {path}")]
  Root {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("root is not a directory: {0}")]
  NotADirectory(PathBuf),

  #[error("failed to walk {path}")]
  Walk {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error(transparent)]
  Hash(#[from] HashError),
}

impl From<walkdir::Error> for ScanError {
  fn from(err: walkdir::Error) -> Self {
    let path = err.path().map(Path::to_path_buf).unwrap_or_default();
    // Only symlink loops carry no I/O error, and links are never followed.
    let source = err
      .into_io_error()
      .unwrap_or_else(|| io::Error::other("filesystem loop"));
    ScanError::Walk { path, source }
  }
}

/// A scanned file and its digest. Discarded once grouped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
  pub path: PathBuf,
  pub digest: ContentHash,
}

impl FileEntry {
  pub fn compute(path: PathBuf) -> Result<Self, HashError> {
    let digest = hash_file(&path)?;
    Ok(Self { path, digest })
  }
}

/// Paths grouped by digest.
///
/// Within a group, paths keep the order in which the walk produced them.
/// Groups themselves are ordered by digest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DigestGroups {
  groups: BTreeMap<ContentHash, Vec<PathBuf>>,
}

impl DigestGroups {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, entry: FileEntry) {
    self.groups.entry(entry.digest).or_default().push(entry.path);
  }

  pub fn get(&self, digest: &ContentHash) -> Option<&[PathBuf]> {
    self.groups.get(digest).map(Vec::as_slice)
  }

  /// Number of distinct digests.
  pub fn len(&self) -> usize {
    self.groups.len()
  }

  pub fn is_empty(&self) -> bool {
    self.groups.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&ContentHash, &[PathBuf])> {
    self.groups.iter().map(|(digest, paths)| (digest, paths.as_slice()))
  }

  /// Groups with more than one member.
  pub fn duplicates(&self) -> impl Iterator<Item = (&ContentHash, &[PathBuf])> {
    self.iter().filter(|(_, paths)| paths.len() > 1)
  }
}

impl FromIterator<FileEntry> for DigestGroups {
  fn from_iter<I: IntoIterator<Item = FileEntry>>(iter: I) -> Self {
    let mut groups = Self::new();
    for entry in iter {
      groups.insert(entry);
    }
    groups
  }
}

#[derive(Debug, Clone)]
pub struct ScanResult {
  pub root: PathBuf,
  pub groups: DigestGroups,
  pub files_scanned: usize,
}

fn is_store_dir(entry: &DirEntry, store_dir_name: &str) -> bool {
  entry.depth() > 0 && entry.file_name() == store_dir_name
}

/// Lazily yields the regular files under `root`.
///
/// Entries are visited in file-name order. The store directory subtree is never
/// descended into, and symlinks (to files or directories) are skipped.
pub fn walk_files(root: &Path, store_dir_name: &str) -> impl Iterator<Item = Result<PathBuf, ScanError>> {
  let store_dir_name = store_dir_name.to_owned();

  WalkDir::new(root)
    .follow_links(false)
    .sort_by_file_name()
    .into_iter()
    .filter_entry(move |e| !is_store_dir(e, &store_dir_name))
    .filter_map(|entry| match entry {
      Ok(entry) if entry.file_type().is_file() => Some(Ok(entry.into_path())),
      Ok(_) => None,
      Err(e) => Some(Err(ScanError::from(e))),
    })
}

/// Scan `root` and group its regular files by digest.
///
/// The first I/O error aborts the scan; nothing collected so far is returned.
pub fn scan(root: &Path, config: &HoistConfig) -> Result<ScanResult, ScanError> {
  let metadata = fs::metadata(root).map_err(|source| ScanError::Root {
    path: root.to_path_buf(),
    source,
  })?;
  if !metadata.is_dir() {
    return Err(ScanError::NotADirectory(root.to_path_buf()));
  }

  let mut groups = DigestGroups::new();
  let mut files_scanned = 0;

  for path in walk_files(root, &config.store_dir_name) {
    let entry = FileEntry::compute(path?)?;
    debug!(path = %entry.path.display(), digest = %entry.digest, "hashed file");
    groups.insert(entry);
    files_scanned += 1;
  }

  info!(
    root = %root.display(),
    files = files_scanned,
    digests = groups.len(),
    duplicate_groups = groups.duplicates().count(),
    "scan complete"
  );

  Ok(ScanResult {
    root: root.to_path_buf(),
    groups,
    files_scanned,
  })
}
