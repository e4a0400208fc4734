//! hoist-lib: Core types and logic for hoist
//!
//! This crate deduplicates byte-identical files under a root directory:
//! - `scan`: walks the tree and groups regular files by content digest
//! - `store`: content-addressed directory holding one copy per digest
//! - `hoist`: moves duplicates into the store and leaves relative symlinks behind
//! - `report`: counts of folded files and reclaimed bytes

pub mod config;
pub mod consts;
pub mod hoist;
pub mod report;
pub mod scan;
pub mod store;
pub mod util;

pub use config::HoistConfig;
pub use hoist::{HoistError, Hoister, RunError, hoist_tree};
pub use report::{FileFailure, HoistReport, StoreEntryReport};
pub use scan::{DigestGroups, ScanError, ScanResult, scan};
pub use store::{Store, StoreError};
