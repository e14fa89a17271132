//! Content fingerprinting for arriving files.
//!
//! The fingerprint is a SHA-256 digest over the file's bytes, computed by
//! streaming fixed-size chunks into an incremental hasher. Contract PDFs can
//! be large, so the file is never read into memory in one piece.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const CHUNK_SIZE: usize = 4096;

/// Compute the hex content fingerprint of the file at `path`.
///
/// Read errors (missing file, permission denied, truncation mid-read)
/// propagate to the caller; a file is never tracked with a placeholder hash.
pub fn hash_file(path: &Path) -> Result<String> {
    let mut file = File::open(path)
        .with_context(|| format!("Failed to open file for hashing: {}", path.display()))?;

    let mut hasher = Sha256::new();
    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        let n = file
            .read(&mut buf)
            .with_context(|| format!("Read failed while hashing: {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn same_content_same_hash() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a.pdf");
        let b = tmp.path().join("b.pdf");
        fs::write(&a, b"contract body").unwrap();
        fs::write(&b, b"contract body").unwrap();

        assert_eq!(hash_file(&a).unwrap(), hash_file(&b).unwrap());
    }

    #[test]
    fn different_content_different_hash() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a.pdf");
        let b = tmp.path().join("b.pdf");
        fs::write(&a, b"first revision").unwrap();
        fs::write(&b, b"second revision").unwrap();

        assert_ne!(hash_file(&a).unwrap(), hash_file(&b).unwrap());
    }

    #[test]
    fn chunked_read_matches_single_shot_digest() {
        // Content larger than CHUNK_SIZE so the streaming loop runs more
        // than once.
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("big.pdf");
        let content: Vec<u8> = (0..100_000u32).map(|i| (i % 251) as u8).collect();
        fs::write(&path, &content).unwrap();

        let expected = format!("{:x}", Sha256::digest(&content));
        assert_eq!(hash_file(&path).unwrap(), expected);
    }

    #[test]
    fn empty_file_hashes() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("empty.pdf");
        fs::write(&path, b"").unwrap();

        let hash = hash_file(&path).unwrap();
        assert_eq!(hash.len(), 64);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = hash_file(Path::new("/nonexistent/contract.pdf")).unwrap_err();
        assert!(err.to_string().contains("hashing"));
    }
}
