//! Content hashing for uploaded documents
//!
//! A single canonical hash function keeps the registry, the upload path, and
//! the pipeline's integrity check in agreement about what a document's
//! identity is.

use sha2::{Digest, Sha256};

/// SHA-256 over the exact byte sequence, rendered as lowercase hex
///
/// Deterministic and byte-exact: no trimming, no encoding normalization.
/// The result is 64 hex characters.
///
/// # Examples
///
/// ```
/// use purser_domain::checksum::content_hash;
///
/// let hash = content_hash(b"hello");
/// assert_eq!(hash.len(), 64);
/// assert_eq!(content_hash(b"hello"), hash);
/// ```
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_vector() {
        assert_eq!(
            content_hash(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_known_vector() {
        assert_eq!(
            content_hash(b"hello"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_deterministic() {
        let bytes = vec![0u8, 1, 2, 3, 255];
        assert_eq!(content_hash(&bytes), content_hash(&bytes));
    }

    #[test]
    fn test_sensitive_to_single_byte() {
        assert_ne!(content_hash(b"receipt-a"), content_hash(b"receipt-b"));
    }
}
