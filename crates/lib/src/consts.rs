/// Name of the content-addressed store directory created under the scanned root.
pub const STORE_DIR_NAME: &str = "hoisted-resources";

/// Suffix appended to temp backups created while a file is being hoisted.
pub const BACKUP_SUFFIX: &str = ".tmp";

/// Read buffer size used when hashing files.
pub const HASH_BUFFER_SIZE: usize = 8192;
