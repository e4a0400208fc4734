//! Run configuration.
//!
//! Settings are passed explicitly into the scanner, store and hoister so that
//! several configurations can coexist in one process (tests rely on this).

use crate::consts::STORE_DIR_NAME;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoistConfig {
  /// Base name of the store directory under the root. Directories with this
  /// name are never scanned.
  pub store_dir_name: String,

  /// Plan the hoist without touching the filesystem.
  pub dry_run: bool,
}

impl HoistConfig {
  pub fn with_store_dir(mut self, name: impl Into<String>) -> Self {
    self.store_dir_name = name.into();
    self
  }

  pub fn with_dry_run(mut self, dry_run: bool) -> Self {
    self.dry_run = dry_run;
    self
  }
}

impl Default for HoistConfig {
  fn default() -> Self {
    Self {
      store_dir_name: STORE_DIR_NAME.to_string(),
      dry_run: false,
    }
  }
}
