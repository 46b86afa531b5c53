//! Content hashing and hashed file names using blake3.

use crate::pipeline::{BuildError, BuildResult};

/// A 256-bit content hash (blake3 output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Hash artifact bytes.
    #[inline]
    pub fn of(bytes: &[u8]) -> Self {
        Self(*blake3::hash(bytes).as_bytes())
    }

    /// Full lowercase hex (64 characters).
    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }

    /// First `len` hex characters, clamped to the full digest.
    pub fn short(self, len: usize) -> String {
        let mut hex = self.to_hex();
        hex.truncate(len);
        hex
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", &self.to_hex()[..16])
    }
}

/// Embed a hash into a logical file name: `site.css` → `site.1a2b3c4d.css`.
///
/// The extension is whatever follows the last `.`; a name without one gets
/// the hash appended (`LICENSE` → `LICENSE.1a2b3c4d`).
pub fn hashed_name(logical: &str, hash: &ContentHash, len: usize) -> BuildResult<String> {
    let short = hash.short(len);
    if short.is_empty() {
        return Err(BuildError::Hash(format!("hash length {len} yields no digits")));
    }

    match logical.rsplit_once('.') {
        Some((base, _)) if base.is_empty() => Err(BuildError::Hash(format!(
            "`{logical}` has no base name to hash"
        ))),
        Some((base, ext)) => Ok(format!("{base}.{short}.{ext}")),
        None if logical.is_empty() => Err(BuildError::Hash("empty file name".into())),
        None => Ok(format!("{logical}.{short}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_bytes_same_hash() {
        let a = ContentHash::of(b"body{color:red}");
        let b = ContentHash::of(b"body{color:red}");
        assert_eq!(a, b);
        assert_ne!(a, ContentHash::of(b"body{color:blue}"));
    }

    #[test]
    fn test_known_digest() {
        // blake3 of the empty input
        assert_eq!(
            ContentHash::of(b"").to_hex(),
            "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262"
        );
    }

    #[test]
    fn test_short() {
        let hash = ContentHash::of(b"x");
        assert_eq!(hash.short(8).len(), 8);
        assert!(hash.to_hex().starts_with(&hash.short(8)));
        assert_eq!(hash.short(100).len(), 64);
    }

    #[test]
    fn test_hashed_name() {
        let hash = ContentHash::of(b"");
        assert_eq!(hashed_name("site.css", &hash, 8).unwrap(), "site.af1349b9.css");
        assert_eq!(
            hashed_name("app.min.js", &hash, 4).unwrap(),
            "app.min.af13.js"
        );
        assert_eq!(hashed_name("LICENSE", &hash, 8).unwrap(), "LICENSE.af1349b9");
    }

    #[test]
    fn test_hashed_name_rejects_empty_base() {
        let hash = ContentHash::of(b"");
        assert!(matches!(hashed_name(".css", &hash, 8), Err(BuildError::Hash(_))));
        assert!(matches!(hashed_name("", &hash, 8), Err(BuildError::Hash(_))));
        assert!(matches!(hashed_name("site.css", &hash, 0), Err(BuildError::Hash(_))));
    }
}
