//! Hoist reporting.
//!
//! Tracks, per store entry, how many original files were folded into it and
//! estimates the space reclaimed.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::util::hash::ContentHash;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreEntryReport {
  pub digest: ContentHash,
  pub size: u64,
  /// Original paths now linked to this entry.
  pub members: Vec<PathBuf>,
  pub folded: usize,
  /// The entry was created during this run rather than found in the store.
  pub created: bool,
}

impl StoreEntryReport {
  /// Bytes reclaimed by this entry. A copy created during this run is the
  /// retained canonical copy and is not counted as saved.
  pub fn bytes_saved(&self) -> u64 {
    let folded = self.size.saturating_mul(self.folded as u64);
    if self.created {
      folded.saturating_sub(self.size)
    } else {
      folded
    }
  }
}

/// A file whose link failed and whose original was restored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
  pub path: PathBuf,
  pub store_path: PathBuf,
  pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct HoistReport {
  pub dry_run: bool,
  pub files_scanned: usize,
  /// Keyed by store entry path.
  pub entries: BTreeMap<PathBuf, StoreEntryReport>,
  pub failures: Vec<FileFailure>,
}

impl HoistReport {
  pub fn new(dry_run: bool) -> Self {
    Self {
      dry_run,
      ..Default::default()
    }
  }

  pub fn record_linked(&mut self, store_path: &Path, digest: &ContentHash, size: u64, created: bool, member: &Path) {
    let entry = self
      .entries
      .entry(store_path.to_path_buf())
      .or_insert_with(|| StoreEntryReport {
        digest: digest.clone(),
        size,
        members: Vec::new(),
        folded: 0,
        created: false,
      });
    entry.created |= created;
    entry.folded += 1;
    entry.members.push(member.to_path_buf());
  }

  pub fn record_failure(&mut self, path: &Path, store_path: &Path, error: String) {
    self.failures.push(FileFailure {
      path: path.to_path_buf(),
      store_path: store_path.to_path_buf(),
      error,
    });
  }

  pub fn files_hoisted(&self) -> usize {
    self.entries.values().map(|e| e.folded).sum()
  }

  pub fn entries_created(&self) -> usize {
    self.entries.values().filter(|e| e.created).count()
  }

  pub fn bytes_saved(&self) -> u64 {
    self.entries.values().map(StoreEntryReport::bytes_saved).sum()
  }

  /// `sum(size * folded)`, counting the retained copy as saved too.
  pub fn bytes_saved_upper_bound(&self) -> u64 {
    self
      .entries
      .values()
      .map(|e| e.size.saturating_mul(e.folded as u64))
      .sum()
  }

  pub fn has_failures(&self) -> bool {
    !self.failures.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::util::hash::hash_bytes;

  fn report_with(created: bool, folded: usize, size: u64) -> HoistReport {
    let mut report = HoistReport::new(false);
    let digest = hash_bytes(b"x");
    for i in 0..folded {
      let member = PathBuf::from(format!("/r/f{}.txt", i));
      report.record_linked(Path::new("/r/store/x.txt"), &digest, size, created && i == 0, &member);
    }
    report
  }

  #[test]
  fn created_entry_excludes_canonical_copy() {
    let report = report_with(true, 3, 100);
    assert_eq!(report.files_hoisted(), 3);
    assert_eq!(report.entries_created(), 1);
    assert_eq!(report.bytes_saved(), 200);
    assert_eq!(report.bytes_saved_upper_bound(), 300);
  }

  #[test]
  fn reused_entry_counts_every_fold() {
    let report = report_with(false, 2, 50);
    assert_eq!(report.entries_created(), 0);
    assert_eq!(report.bytes_saved(), 100);
  }

  #[test]
  fn members_keep_record_order() {
    let report = report_with(true, 2, 1);
    let entry = &report.entries[Path::new("/r/store/x.txt")];
    assert_eq!(entry.members, vec![PathBuf::from("/r/f0.txt"), PathBuf::from("/r/f1.txt")]);
  }

  #[test]
  fn failures_are_tracked() {
    let mut report = HoistReport::new(true);
    assert!(!report.has_failures());
    report.record_failure(Path::new("/r/a.txt"), Path::new("/r/store/a.txt"), "denied".into());
    assert!(report.has_failures());
    assert_eq!(report.failures[0].error, "denied");
    assert_eq!(report.files_hoisted(), 0);
  }

  #[test]
  fn serializes_to_json() {
    let report = report_with(true, 2, 10);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["files_scanned"], 0);
    assert_eq!(json["entries"]["/r/store/x.txt"]["folded"], 2);
  }
}
