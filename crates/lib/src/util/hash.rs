//! Content hashing for the store.
//!
//! This module provides:
//! - `ContentHash`: a full 64-character SHA-256 digest used as the store key
//! - `hash_file()`: streaming single file hashing
//! - `hash_bytes()`: arbitrary byte hashing
//!
//! Two files with the same `ContentHash` are treated as byte-identical. No
//! byte-for-byte comparison is made after a digest match.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::consts::HASH_BUFFER_SIZE;

/// A full 64-character SHA256 hash of a file's contents.
///
/// # Format
///
/// The hash is a lowercase hexadecimal string (64 characters).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContentHash(pub String);

impl ContentHash {
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl std::fmt::Display for ContentHash {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Error while hashing a file.
#[derive(Debug, Error)]
pub enum HashError {
  #[error("failed to open {path}")]
  Open {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to read {path}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Hash a file's contents.
///
/// Returns the full 64-character SHA256 hash of the file.
pub fn hash_file(path: &Path) -> Result<ContentHash, HashError> {
  let mut file = fs::File::open(path).map_err(|source| HashError::Open {
    path: path.to_path_buf(),
    source,
  })?;

  let mut hasher = Sha256::new();
  let mut buffer = [0u8; HASH_BUFFER_SIZE];

  loop {
    let bytes_read = file.read(&mut buffer).map_err(|source| HashError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    if bytes_read == 0 {
      break;
    }
    hasher.update(&buffer[..bytes_read]);
  }

  Ok(ContentHash(hex::encode(hasher.finalize())))
}

/// Hash arbitrary bytes.
///
/// Returns the full 64-character SHA256 hash.
pub fn hash_bytes(data: &[u8]) -> ContentHash {
  let mut hasher = Sha256::new();
  hasher.update(data);
  ContentHash(hex::encode(hasher.finalize()))
}
