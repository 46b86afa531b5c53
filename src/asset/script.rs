//! Script bundling.

use std::fs;
use std::io::ErrorKind;

use super::{Artifact, AssetKind, SourceSet, VendorFile, minify};
use crate::config::JsConfig;
use crate::debug;
use crate::pipeline::{BuildError, BuildResult};

/// The bundle plus the vendor files that ship next to it.
#[derive(Debug, Clone)]
pub struct ScriptOutput {
    pub bundle: Artifact,
    pub vendor: Vec<VendorFile>,
}

/// Check, concatenate and (optionally) minify the configured scripts.
///
/// Files are parsed one at a time so a syntax error names its file. Vendor
/// files never enter the bundle.
pub fn build_bundle(config: &JsConfig, minify: bool) -> BuildResult<ScriptOutput> {
    let mut exclude = config.exclude.clone();
    exclude.extend(config.vendor.iter().map(|v| {
        glob::Pattern::escape(&v.to_string_lossy().replace('\\', "/"))
    }));
    let set = SourceSet::new(&config.source, &config.include, &exclude)?;
    let files = set.collect()?;

    if files.is_empty() {
        return Err(BuildError::NoSources {
            kind: AssetKind::Js,
            root: config.source.clone(),
        });
    }

    let mut sources = Vec::with_capacity(files.len());
    for file in &files {
        let source = fs::read_to_string(&file.path).map_err(|e| BuildError::io(&file.path, e))?;
        minify::check_js(&source).map_err(|message| BuildError::syntax(&file.path, message))?;
        debug!("js"; "bundling {}", file.rel);
        sources.push(source);
    }
    let joined = sources.join("\n");

    let code = if minify {
        minify::minify_js(&joined).map_err(|message| BuildError::syntax(&config.source, message))?
    } else {
        joined
    };

    Ok(ScriptOutput {
        bundle: Artifact::new(config.name.clone(), code),
        vendor: read_vendor(config)?,
    })
}

fn read_vendor(config: &JsConfig) -> BuildResult<Vec<VendorFile>> {
    let mut vendor = Vec::new();
    for rel in &config.vendor {
        let path = config.source.join(rel);
        match fs::read(&path) {
            Ok(bytes) => vendor.push(VendorFile {
                name: rel.to_string_lossy().replace('\\', "/"),
                bytes,
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("js"; "vendor file {} not found, skipping", path.display());
            }
            Err(e) => return Err(BuildError::io(&path, e)),
        }
    }
    Ok(vendor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> JsConfig {
        JsConfig {
            source: dir.path().join("js"),
            include: vec!["**/*.js".into()],
            output: dir.path().join("out"),
            ..JsConfig::default()
        }
    }

    fn write(dir: &TempDir, rel: &str, content: &str) {
        let path = dir.path().join("js").join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_concatenates_in_lexicographic_order() {
        let dir = TempDir::new().unwrap();
        write(&dir, "b.js", "var b = 2;");
        write(&dir, "a.js", "var a = 1;");

        let out = build_bundle(&config(&dir), false).unwrap();
        assert_eq!(out.bundle.name, "site.js");
        assert_eq!(out.bundle.bytes, b"var a = 1;\nvar b = 2;");
        assert!(out.vendor.is_empty());
    }

    #[test]
    fn test_minified_bundle_keeps_globals() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.js", "var alpha = 1;\n");
        write(&dir, "b.js", "var beta = alpha + 1;\n");

        let out = build_bundle(&config(&dir), true).unwrap();
        let code = String::from_utf8(out.bundle.bytes).unwrap();
        assert!(code.contains("alpha"));
        assert!(code.contains("beta"));
    }

    #[test]
    fn test_vendor_copied_verbatim_and_not_bundled() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.js", "var a = 1;");
        write(&dir, "highlight.pack.js", "/* vendor */ var hljs = {};\n");

        let mut cfg = config(&dir);
        // vendor files stay out of the bundle without an explicit exclude
        cfg.exclude.clear();
        let out = build_bundle(&cfg, false).unwrap();

        assert_eq!(out.bundle.bytes, b"var a = 1;");
        assert_eq!(
            out.vendor,
            vec![VendorFile {
                name: "highlight.pack.js".into(),
                bytes: b"/* vendor */ var hljs = {};\n".to_vec(),
            }]
        );
    }

    #[test]
    fn test_missing_vendor_skipped() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.js", "var a = 1;");

        let mut cfg = config(&dir);
        cfg.vendor.push(PathBuf::from("lib/missing.js"));
        let out = build_bundle(&cfg, true).unwrap();
        assert!(out.vendor.is_empty());
    }

    #[test]
    fn test_syntax_error_names_file() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.js", "var a = 1;");
        write(&dir, "broken.js", "function (");

        let err = build_bundle(&config(&dir), true).unwrap_err();
        match err {
            BuildError::Syntax { path, .. } => assert!(path.ends_with("broken.js")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_no_sources() {
        let dir = TempDir::new().unwrap();
        write(&dir, "highlight.pack.js", "var hljs = {};");

        let err = build_bundle(&config(&dir), true).unwrap_err();
        assert!(matches!(err, BuildError::NoSources { kind: AssetKind::Js, .. }));
    }
}
