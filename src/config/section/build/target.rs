//! Validation shared by the `[build.css]` and `[build.js]` targets.

use crate::config::{ConfigDiagnostics, FieldPath};
use std::path::Path;

/// Field paths of one build target section.
pub struct TargetFields {
    pub source: FieldPath,
    pub include: FieldPath,
    pub exclude: FieldPath,
    pub output: FieldPath,
    pub name: FieldPath,
}

/// Borrowed view of the settings every target has.
pub struct TargetSettings<'a> {
    pub source: &'a Path,
    pub include: &'a [String],
    pub exclude: &'a [String],
    pub output: &'a Path,
    pub name: &'a str,
}

pub fn validate_target(
    fields: &TargetFields,
    target: &TargetSettings<'_>,
    diag: &mut ConfigDiagnostics,
) {
    if target.include.is_empty() {
        diag.error(fields.include, "at least one include pattern is required");
    }
    validate_globs(fields.include, target.include, diag);
    validate_globs(fields.exclude, target.exclude, diag);
    validate_name(fields.name, target.name, diag);

    if target.output == target.source || target.output.starts_with(target.source) {
        diag.error_with_hint(
            fields.output,
            format!(
                "output directory {} is inside the source directory",
                target.output.display()
            ),
            "generated files would be picked up as sources on the next run",
        );
    } else if target.source.starts_with(target.output) {
        diag.error_with_hint(
            fields.output,
            format!(
                "output directory {} contains the source directory",
                target.output.display()
            ),
            "the output directory is removed before every write",
        );
    }

    if !target.source.exists() {
        diag.hint(
            fields.source,
            format!("source directory not found: {}", target.source.display()),
        );
    }
}

fn validate_globs(field: FieldPath, patterns: &[String], diag: &mut ConfigDiagnostics) {
    for pattern in patterns {
        if let Err(e) = glob::Pattern::new(pattern) {
            diag.error(field, format!("invalid pattern `{pattern}`: {}", e.msg));
        }
    }
}

fn validate_name(field: FieldPath, name: &str, diag: &mut ConfigDiagnostics) {
    if name.contains(['/', '\\']) {
        diag.error(field, format!("`{name}` must be a file name, not a path"));
        return;
    }
    let base = name.rsplit_once('.').map_or(name, |(base, _)| base);
    if base.is_empty() {
        diag.error(field, format!("`{name}` has an empty base name"));
    }
}
