// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Content hashing for trigger sets (§4.2 "Hasher").
//!
//! Files are hashed with SHA-256. A zero-length file hashes to a fixed
//! sentinel rather than the (equally fixed, but easily confused with "file
//! absent") SHA-256 of zero bytes, so callers can distinguish "tracked file
//! is empty" from "tracked file could not be read" at a glance in logs.

use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::Path;

/// Hash recorded for a zero-length file.
pub const EMPTY_FILE_SENTINEL: &str = "empty";

#[derive(Debug, thiserror::Error)]
pub enum HashError {
    #[error("reading {path}: {source}")]
    Io { path: String, #[source] source: io::Error },
}

/// Hashes a file's contents, returning a lowercase hex SHA-256 digest, or
/// [`EMPTY_FILE_SENTINEL`] for a zero-length file.
pub fn hash_file(path: &Path) -> Result<String, HashError> {
    let bytes = fs::read(path).map_err(|source| HashError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(hash_bytes(&bytes))
}

/// Hashes raw bytes, returning [`EMPTY_FILE_SENTINEL`] for an empty slice.
pub fn hash_bytes(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return EMPTY_FILE_SENTINEL.to_string();
    }
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
