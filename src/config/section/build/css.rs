//! `[build.css]` style target configuration.
//!
//! # Example
//!
//! ```toml
//! [build.css]
//! source = "src/sass"          # Sass root, also used as load path
//! include = ["**/site.scss"]   # entry points (partials `_*.scss` are never entries)
//! output = "static/css"        # cleared before every successful write
//! name = "site.css"            # logical name recorded in the manifest
//! browsers = ["defaults"]      # browserslist queries for vendor prefixes
//! ```

use super::SourceLayout;
use super::target::{TargetFields, TargetSettings, validate_target};
use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CssConfig {
    /// Style source root. Empty means "use the layout default".
    pub source: PathBuf,
    /// Entry globs relative to `source`. Empty means "use the layout default".
    pub include: Vec<String>,
    /// Globs removed from the entry set.
    pub exclude: Vec<String>,
    /// Output directory for the hashed stylesheet.
    pub output: PathBuf,
    /// Logical output file name.
    pub name: String,
    /// Browserslist queries driving vendor prefixing.
    pub browsers: Vec<String>,
}

impl Default for CssConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            include: Vec::new(),
            exclude: Vec::new(),
            output: PathBuf::from("static/css"),
            name: "site.css".into(),
            browsers: vec!["defaults".into()],
        }
    }
}

impl CssConfig {
    pub const FIELDS: TargetFields = TargetFields {
        source: FieldPath::new("build.css.source"),
        include: FieldPath::new("build.css.include"),
        exclude: FieldPath::new("build.css.exclude"),
        output: FieldPath::new("build.css.output"),
        name: FieldPath::new("build.css.name"),
    };
    pub const BROWSERS: FieldPath = FieldPath::new("build.css.browsers");

    /// Fill unset source settings from the layout.
    pub fn apply_layout(&mut self, layout: SourceLayout) {
        if self.source.as_os_str().is_empty() {
            self.source = PathBuf::from(layout.style_source());
        }
        if self.include.is_empty() {
            self.include = layout.style_include().iter().map(|s| s.to_string()).collect();
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

        if let Err(e) = crate::asset::browser_targets(&self.browsers) {
            diag.error_with_hint(
                Self::BROWSERS,
                e,
                "see https://browsersl.ist for the query syntax",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        let css = &config.build.css;
        assert!(css.source.as_os_str().is_empty());
        assert!(css.include.is_empty());
        assert_eq!(css.output, PathBuf::from("static/css"));
        assert_eq!(css.name, "site.css");
        assert_eq!(css.browsers, vec!["defaults"]);
    }

    #[test]
    fn test_layout_fills_unset_fields() {
        let mut css = CssConfig::default();
        css.apply_layout(SourceLayout::Legacy);
        assert_eq!(css.source, PathBuf::from("sass"));
        assert_eq!(css.include, vec!["**/*.scss"]);
    }

    #[test]
    fn test_explicit_fields_win_over_layout() {
        let config = test_parse_config(
            r#"
[build.css]
source = "styles"
include = ["main.scss"]
"#,
        );
        let mut css = config.build.css;
        css.apply_layout(SourceLayout::Current);
        assert_eq!(css.source, PathBuf::from("styles"));
        assert_eq!(css.include, vec!["main.scss"]);
    }

    #[test]
    fn test_bad_browser_query() {
        let mut css = CssConfig {
            browsers: vec!["nosuchbrowser 99".into()],
            ..CssConfig::default()
        };
        css.apply_layout(SourceLayout::Current);
        css.normalize(&std::env::temp_dir());

        let mut diag = ConfigDiagnostics::new();
        css.validate(&mut diag);
        assert!(
            diag.errors()
                .iter()
                .any(|d| d.field.as_str() == "build.css.browsers")
        );
    }
}
