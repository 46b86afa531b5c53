//! `[build.js]` script target configuration.
//!
//! # Example
//!
//! ```toml
//! [build.js]
//! source = "src/js"
//! include = ["**/*.js"]
//! exclude = ["highlight.pack.js"]
//! vendor = ["highlight.pack.js"]   # copied verbatim, never bundled or hashed
//! output = "static/js"
//! name = "site.js"
//! ```

use super::SourceLayout;
use super::target::{TargetFields, TargetSettings, validate_target};
use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JsConfig {
    /// Script source root. Empty means "use the layout default".
    pub source: PathBuf,
    /// Bundle globs relative to `source`. Empty means "use the layout default".
    pub include: Vec<String>,
    /// Globs removed from the bundle.
    pub exclude: Vec<String>,
    /// Pre-built files (relative to `source`) copied as-is to `output`.
    /// Always excluded from the bundle.
    pub vendor: Vec<PathBuf>,
    /// Output directory for the hashed bundle and vendor copies.
    pub output: PathBuf,
    /// Logical bundle name recorded in the manifest.
    pub name: String,
}

impl Default for JsConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            include: Vec::new(),
            exclude: vec!["highlight.pack.js".into()],
            vendor: vec![PathBuf::from("highlight.pack.js")],
            output: PathBuf::from("static/js"),
            name: "site.js".into(),
        }
    }
}

impl JsConfig {
    pub const FIELDS: TargetFields = TargetFields {
        source: FieldPath::new("build.js.source"),
        include: FieldPath::new("build.js.include"),
        exclude: FieldPath::new("build.js.exclude"),
        output: FieldPath::new("build.js.output"),
        name: FieldPath::new("build.js.name"),
    };
    pub const VENDOR: FieldPath = FieldPath::new("build.js.vendor");

    /// Fill unset source settings from the layout.
    pub fn apply_layout(&mut self, layout: SourceLayout) {
        if self.source.as_os_str().is_empty() {
            self.source = PathBuf::from(layout.script_source());
        }
        if self.include.is_empty() {
            self.include = layout
                .script_include()
                .iter()
                .map(|s| s.to_string())
                .collect();
        }
    }

    /// Make directories absolute against the project root.
    pub fn normalize(&mut self, root: &Path) {
        self.source = crate::utils::path::normalize_path(&root.join(&self.source));
        self.output = crate::utils::path::normalize_path(&root.join(&self.output));
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        validate_target(
            &Self::FIELDS,
            &TargetSettings {
                source: &self.source,
                include: &self.include,
                exclude: &self.exclude,
                output: &self.output,
                name: &self.name,
            },
            diag,
        );

        for vendor in &self.vendor {
            let escapes = vendor
                .components()
                .any(|c| !matches!(c, Component::Normal(_)));
            if escapes {
                diag.error(
                    Self::VENDOR,
                    format!(
                        "`{}` must be a plain path relative to {}",
                        vendor.display(),
                        Self::FIELDS.source
                    ),
                );
            } else if vendor.file_name().and_then(|n| n.to_str()) == Some(self.name.as_str()) {
                diag.error(
                    Self::VENDOR,
                    format!("`{}` collides with the bundle name", vendor.display()),
                );
            }
        }
    }
}
