use sha2::{Digest, Sha256};

/// Content addressing for page snapshots using SHA-256
pub struct ContentAddress;

impl ContentAddress {
    /// Generate SHA-256 hash of content, returns hash with "sha256:" prefix
    pub fn hash(content: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content);
        format!("sha256:{:x}", hasher.finalize())
    }

    /// Storage key for a page snapshot
    /// Example: "pages/sha256/abc123def456..."
    pub fn snapshot_key(hash: &str) -> String {
        format!("pages/sha256/{}", Self::extract_hash_value(hash))
    }

    /// Storage key for the ref pointing at a page's current snapshot
    /// Example: "refs/pages/home", "refs/pages/home%2Fabout"
    ///
    /// The id is percent-encoded into a single segment, dots included.
    pub fn ref_key(page_id: &str) -> String {
        let segment = urlencoding::encode(page_id).replace('.', "%2E");
        format!("refs/pages/{}", segment)
    }

    /// Short stable key for a section that arrived without one
    pub fn section_key(seed: &str) -> String {
        let hash = Self::hash(seed.as_bytes());
        format!("sec-{}", &Self::extract_hash_value(&hash)[..12])
    }

    /// Extract hash value from full hash string (removes "sha256:" prefix)
    pub fn extract_hash_value(hash: &str) -> &str {
        hash.strip_prefix("sha256:").unwrap_or(hash)
    }

    /// Validate that a hash string has the correct format
    pub fn is_valid_hash(hash: &str) -> bool {
        let Some(hash_value) = hash.strip_prefix("sha256:") else {
            return false;
        };
        hash_value.len() == 64 && hash_value.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Verify content matches expected hash
    pub fn verify(content: &[u8], expected_hash: &str) -> bool {
        Self::hash(content) == expected_hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_generation() {
        let hash = ContentAddress::hash(b"hello world");
        assert!(hash.starts_with("sha256:"));
        assert_eq!(hash.len(), 71);
        assert!(ContentAddress::is_valid_hash(&hash));
        assert_eq!(hash, ContentAddress::hash(b"hello world"));
    }

    #[test]
    fn test_keys() {
        assert_eq!(
            ContentAddress::snapshot_key("sha256:abc123"),
            "pages/sha256/abc123"
        );
        assert_eq!(ContentAddress::ref_key("home"), "refs/pages/home");
        assert_eq!(ContentAddress::ref_key("home/about"), "refs/pages/home%2Fabout");
        assert_eq!(ContentAddress::ref_key("a.tmp"), "refs/pages/a%2Etmp");
        assert_eq!(ContentAddress::ref_key(".."), "refs/pages/%2E%2E");
    }

    #[test]
    fn test_section_key_is_deterministic() {
        let a = ContentAddress::section_key("home/0/hero");
        assert_eq!(a, ContentAddress::section_key("home/0/hero"));
        assert_ne!(a, ContentAddress::section_key("home/1/hero"));
        assert_eq!(a.len(), "sec-".len() + 12);
    }

    #[test]
    fn test_verify() {
        let hash = ContentAddress::hash(b"page");
        assert!(ContentAddress::verify(b"page", &hash));
        assert!(!ContentAddress::verify(b"other", &hash));
        assert!(!ContentAddress::is_valid_hash("md5:abc"));
    }
}
