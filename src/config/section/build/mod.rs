//! `[build]` section configuration.
//!
//! Global switches for the pipeline plus one sub-section per target.
//!
//! # Example
//!
//! ```toml
//! [build]
//! layout = "current"   # source layout: current | legacy
//! minify = true        # minify CSS and the JS bundle
//! hashing = true       # embed content hashes in output file names
//! hash_length = 8      # hex characters of the hash to keep
//!
//! [build.css]
//! output = "static/css"
//!
//! [build.js]
//! output = "static/js"
//!
//! [build.manifest]
//! path = "data/hash.json"
//! ```
//!
//! See submodules for detailed options: [`css`], [`js`], [`manifest`].

mod css;
mod js;
mod layout;
mod manifest;
mod target;

pub use css::CssConfig;
pub use js::JsConfig;
pub use layout::SourceLayout;
pub use manifest::ManifestConfig;

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Shortest/longest accepted hash length (blake3 hex is 64 characters).
pub const HASH_LENGTH_RANGE: std::ops::RangeInclusive<usize> = 4..=64;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSectionConfig {
    /// Source directory layout used for unset `source`/`include` fields.
    pub layout: SourceLayout,
    /// Minify CSS and the JS bundle.
    pub minify: bool,
    /// Embed content hashes into output file names.
    pub hashing: bool,
    /// Number of hex characters of the content hash kept in file names.
    pub hash_length: usize,
    /// Style target.
    pub css: CssConfig,
    /// Script target.
    pub js: JsConfig,
    /// Hash manifest.
    pub manifest: ManifestConfig,
}

impl Default for BuildSectionConfig {
    fn default() -> Self {
        Self {
            layout: SourceLayout::default(),
            minify: true,
            hashing: true,
            hash_length: 8,
            css: CssConfig::default(),
            js: JsConfig::default(),
            manifest: ManifestConfig::default(),
        }
    }
}

impl BuildSectionConfig {
    pub const HASH_LENGTH: FieldPath = FieldPath::new("build.hash_length");

    /// Resolve layout defaults and make every path absolute.
    pub fn normalize(&mut self, root: &Path) {
        self.css.apply_layout(self.layout);
        self.js.apply_layout(self.layout);
        self.css.normalize(root);
        self.js.normalize(root);
        self.manifest.normalize(root);
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !HASH_LENGTH_RANGE.contains(&self.hash_length) {
            diag.error(
                Self::HASH_LENGTH,
                format!(
                    "{} is out of range ({}..={})",
                    self.hash_length,
                    HASH_LENGTH_RANGE.start(),
                    HASH_LENGTH_RANGE.end()
                ),
            );
        }

        self.css.validate(diag);
        self.js.validate(diag);
        self.manifest.validate(diag);

        self.validate_disjoint_targets(diag);

        for output in [&self.css.output, &self.js.output] {
            if self.manifest.path.starts_with(output) {
                diag.error_with_hint(
                    ManifestConfig::PATH,
                    format!("manifest is inside the output directory {}", output.display()),
                    "output directories are cleared before every write",
                );
            }
        }
    }

    /// A target clears its whole output directory, so that directory must
    /// not overlap the other target's output or sources.
    fn validate_disjoint_targets(&self, diag: &mut ConfigDiagnostics) {
        let (css, js) = (&self.css.output, &self.js.output);
        if css == js {
            diag.error_with_hint(
                JsConfig::FIELDS.output,
                "CSS and JS share one output directory",
                "each target clears its own output directory before writing",
            );
        } else if css.starts_with(js) || js.starts_with(css) {
            diag.error_with_hint(
                JsConfig::FIELDS.output,
                format!("output directories {} and {} are nested", css.display(), js.display()),
                "clearing one output directory would delete the other",
            );
        }

        let crossed = [
            (CssConfig::FIELDS.output, css, &self.js.source, "JS"),
            (JsConfig::FIELDS.output, js, &self.css.source, "CSS"),
        ];
        for (field, output, source, other) in crossed {
            if output.starts_with(source) || source.starts_with(output) {
                diag.error_with_hint(
                    field,
                    format!("output overlaps the {other} source directory {}", source.display()),
                    "keep outputs and sources of different targets apart",
                );
            }
        }
    }
}
