//! 128-bit content hashing for change detection.
//!
//! MD5 is explicitly acceptable here: the hash is used only to detect
//! content drift between scans, not for any cryptographic guarantee.

use std::path::Path;

use codetrail_domain::error::{Error, Result};
use md5::{Digest, Md5};
use rayon::prelude::*;

/// Compute the hex-encoded MD5 digest of a file's bytes.
pub fn hash_file(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .map_err(|e| Error::io_with_source(format!("failed to read {}", path.display()), e))?;
    Ok(hash_bytes(&bytes))
}

/// Compute the hex-encoded MD5 digest of a byte slice.
#[must_use]
pub fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Hash every buffer in `contents` across a bounded worker pool, preserving
/// order. Intended for `analyze`'s per-scan hashing pass, where file reads
/// are already in hand and only the CPU-bound digest remains.
#[must_use]
pub fn hash_many(contents: &[String]) -> Vec<String> {
    contents.par_iter().map(|content| hash_bytes(content.as_bytes())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_bytes_hash_identically() {
        assert_eq!(hash_bytes(b"hello"), hash_bytes(b"hello"));
    }

    #[test]
    fn different_bytes_hash_differently() {
        assert_ne!(hash_bytes(b"hello"), hash_bytes(b"world"));
    }

    #[test]
    fn hash_is_32_hex_chars() {
        let digest = hash_bytes(b"content");
        assert_eq!(digest.len(), 32);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn hash_many_matches_hash_bytes_in_order() {
        let contents = vec!["a".to_string(), "bb".to_string(), "ccc".to_string()];
        let expected: Vec<String> = contents.iter().map(|c| hash_bytes(c.as_bytes())).collect();
        assert_eq!(hash_many(&contents), expected);
    }
}
