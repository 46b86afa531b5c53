//! In-memory transform results.

/// One transformed output, not yet hashed or written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Logical file name, the manifest key (e.g. `site.css`).
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Artifact {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// A pre-built file copied verbatim next to the bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorFile {
    /// `/`-separated path relative to the output directory.
    pub name: String,
    pub bytes: Vec<u8>,
}
