//! Sass → CSS.
//!
//! Every non-partial entry is compiled with grass, the results are joined in
//! source order and handed to lightningcss for vendor prefixing (and
//! minification when enabled).

use std::path::Path;

use lightningcss::targets::{Browsers, Targets};

use super::{Artifact, AssetKind, SourceSet, minify};
use crate::config::CssConfig;
use crate::debug;
use crate::pipeline::{BuildError, BuildResult};

/// Resolve browserslist queries into lightningcss targets.
pub fn browser_targets(queries: &[String]) -> Result<Targets, String> {
    if queries.is_empty() {
        return Ok(Targets::default());
    }
    let browsers = Browsers::from_browserslist(queries.iter().map(String::as_str))
        .map_err(|e| e.to_string())?;
    Ok(browsers.map(Targets::from).unwrap_or_default())
}

/// Sass partials are only reachable through `@use`/`@import`.
fn is_partial(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('_'))
}

/// Compile the configured stylesheets into one artifact.
pub fn build_stylesheet(config: &CssConfig, minify: bool) -> BuildResult<Artifact> {
    let set = SourceSet::new(&config.source, &config.include, &config.exclude)?;
    let entries: Vec<_> = set
        .collect()?
        .into_iter()
        .filter(|f| !is_partial(&f.path))
        .collect();

    if entries.is_empty() {
        return Err(BuildError::NoSources {
            kind: AssetKind::Css,
            root: config.source.clone(),
        });
    }

    let options = grass::Options::default().load_path(&config.source);
    let mut merged = String::new();
    for entry in &entries {
        debug!("css"; "compiling {}", entry.rel);
        let css = grass::from_path(&entry.path, &options)
            .map_err(|e| BuildError::syntax(&entry.path, e.to_string()))?;
        if !merged.is_empty() && !merged.ends_with('\n') {
            merged.push('\n');
        }
        merged.push_str(&css);
    }

    // Already validated with the config; a failure here means the config
    // was built in code.
    let targets = browser_targets(&config.browsers).map_err(|message| BuildError::Syntax {
        path: config.source.clone(),
        message,
    })?;

    // lightningcss errors point into the merged text, so blame the first entry
    let code = minify::process_css(&merged, &config.name, targets, minify)
        .map_err(|message| BuildError::syntax(&entries[0].path, message))?;

    Ok(Artifact::new(config.name.clone(), code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> CssConfig {
        CssConfig {
            source: dir.path().join("sass"),
            include: vec!["**/*.scss".into()],
            output: dir.path().join("css"),
            ..CssConfig::default()
        }
    }

    fn write(dir: &TempDir, rel: &str, content: &str) {
        let path = dir.path().join("sass").join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_compiles_and_minifies() {
        let dir = TempDir::new().unwrap();
        write(&dir, "site.scss", "body { color: red; }");

        let artifact = build_stylesheet(&config(&dir), true).unwrap();
        assert_eq!(artifact.name, "site.css");
        assert_eq!(String::from_utf8(artifact.bytes).unwrap(), "body{color:red}");
    }

    #[test]
    fn test_partials_resolved_through_load_path() {
        let dir = TempDir::new().unwrap();
        write(&dir, "_vars.scss", "$main: #ff0000;");
        write(&dir, "site.scss", "@use 'vars';\na { color: vars.$main; }");

        let artifact = build_stylesheet(&config(&dir), true).unwrap();
        let css = String::from_utf8(artifact.bytes).unwrap();
        assert!(css.starts_with("a{color:"));
        // the partial is never compiled on its own
        assert!(!css.contains("$main"));
    }

    #[test]
    fn test_entries_concatenated_in_order() {
        let dir = TempDir::new().unwrap();
        write(&dir, "b.scss", ".b { margin: 0; }");
        write(&dir, "a.scss", ".a { margin: 0; }");

        let artifact = build_stylesheet(&config(&dir), false).unwrap();
        let css = String::from_utf8(artifact.bytes).unwrap();
        assert!(css.find(".a").unwrap() < css.find(".b").unwrap());
    }

    #[test]
    fn test_syntax_error_names_file() {
        let dir = TempDir::new().unwrap();
        write(&dir, "site.scss", "body { color: red;");

        let err = build_stylesheet(&config(&dir), true).unwrap_err();
        match err {
            BuildError::Syntax { path, .. } => assert!(path.ends_with("site.scss")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_no_sources() {
        let dir = TempDir::new().unwrap();
        write(&dir, "_only_partial.scss", "a { b: c; }");

        let err = build_stylesheet(&config(&dir), true).unwrap_err();
        assert!(matches!(err, BuildError::NoSources { kind: AssetKind::Css, .. }));
    }

    #[test]
    fn test_browser_targets() {
        assert!(browser_targets(&["defaults".into()]).is_ok());
        assert!(browser_targets(&[]).is_ok());
        assert!(browser_targets(&["nosuchbrowser 99".into()]).is_err());
    }
}
