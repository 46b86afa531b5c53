//! `[build.manifest]` configuration.
//!
//! ```toml
//! [build.manifest]
//! path = "data/hash.json"   # logical name -> hashed file name
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    /// Manifest file path (relative to the project root).
    pub path: PathBuf,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/hash.json"),
        }
    }
}

impl ManifestConfig {
    pub const PATH: FieldPath = FieldPath::new("build.manifest.path");

    pub fn normalize(&mut self, root: &Path) {
        self.path = crate::utils::path::normalize_path(&root.join(&self.path));
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.path.file_name().is_none() {
            diag.error(Self::PATH, "must name a file");
        } else if self.path.is_dir() {
            diag.error(
                Self::PATH,
                format!("{} is a directory", self.path.display()),
            );
        }
    }
}
