//! End-to-end pipeline runs against a temporary project.

use super::*;
use crate::config::PipelineConfig;
use std::fs;
use tempfile::TempDir;

struct Project {
    _dir: TempDir,
    config: PipelineConfig,
}

impl Project {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src/sass")).unwrap();
        fs::create_dir_all(dir.path().join("src/js")).unwrap();
        let config = PipelineConfig::with_root(dir.path());
        Self { _dir: dir, config }
    }

    fn root(&self) -> &Path {
        self.config.get_root()
    }

    fn write(&self, rel: &str, content: &str) {
        let path = self.root().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn run(&self, kinds: &[AssetKind]) -> BuildReport {
        run_targets(&self.config.build, kinds)
    }

    fn manifest(&self) -> Manifest {
        ManifestStore::from_config(&self.config.build).load().unwrap()
    }

    fn files_in(&self, rel: &str) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(self.root().join(rel))
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        names
    }
}

fn output(report: &BuildReport, kind: AssetKind) -> &TargetOutput {
    report
        .outputs()
        .find(|o| o.kind == kind)
        .expect("target output")
}

#[test]
fn test_css_build_writes_hashed_file_and_manifest() {
    let p = Project::new();
    p.write("src/sass/site.scss", "body { color: red; }");

    let report = p.run(&[AssetKind::Css]);
    assert!(report.is_success());

    let written = &output(&report, AssetKind::Css).written;
    let hash = ContentHash::of(b"body{color:red}").short(8);
    assert_eq!(written, &format!("site.{hash}.css"));
    assert_eq!(p.files_in("static/css"), vec![written.clone()]);
    assert_eq!(p.manifest().get("site.css"), Some(written.as_str()));
}

#[test]
fn test_js_build_bundles_and_copies_vendor() {
    let p = Project::new();
    p.write("src/js/a.js", "var a=1;");
    p.write("src/js/b.js", "var b=2;");
    p.write("src/js/highlight.pack.js", "var hljs = {  };\n");

    let report = p.run(&[AssetKind::Js]);
    assert!(report.is_success());

    let out = output(&report, AssetKind::Js);
    let bundle = fs::read_to_string(&out.path).unwrap();
    assert_eq!(bundle, "var a=1,b=2;");
    assert!(!bundle.contains("hljs"));
    assert!(out.written.starts_with("site.") && out.written.ends_with(".js"));

    let vendor = fs::read_to_string(p.root().join("static/js/highlight.pack.js")).unwrap();
    assert_eq!(vendor, "var hljs = {  };\n");
    assert_eq!(p.files_in("static/js").len(), 2);
    assert_eq!(p.manifest().len(), 1);
}

#[test]
fn test_failed_css_leaves_js_output_and_entry() {
    let p = Project::new();
    p.write("src/sass/site.scss", "body { color: red; }");
    p.write("src/js/a.js", "var a=1;");
    assert!(p.run(&AssetKind::ALL).is_success());

    let js_before = p.files_in("static/js");
    let css_before = p.files_in("static/css");
    let js_entry = p.manifest().get("site.js").map(str::to_string);

    p.write("src/sass/site.scss", "body { color: red;");
    let report = p.run(&AssetKind::ALL);

    assert!(!report.is_success());
    let failed: Vec<_> = report.failures().map(|(what, _)| what).collect();
    assert_eq!(failed, vec!["css"]);
    assert!(matches!(
        report.targets[0],
        (AssetKind::Css, Err(BuildError::Syntax { .. }))
    ));

    // the failed target keeps its previous output
    assert_eq!(p.files_in("static/css"), css_before);
    assert_eq!(p.files_in("static/js"), js_before);
    assert_eq!(p.manifest().get("site.js").map(str::to_string), js_entry);
    assert!(p.manifest().get("site.css").is_some());
    assert!(report.into_result().is_err());
}

#[test]
fn test_repeated_builds_are_deterministic() {
    let p = Project::new();
    p.write("src/sass/site.scss", "$c: blue;\na { color: $c; }");
    p.write("src/js/b.js", "var b = 2;");
    p.write("src/js/a.js", "var a = 1;");

    let first = p.run(&AssetKind::ALL);
    let second = p.run(&AssetKind::ALL);

    assert_eq!(first.summary(), second.summary());
    let bytes = fs::read(&output(&second, AssetKind::Js).path).unwrap();
    assert_eq!(bytes, b"var a=1,b=2;");
    assert_eq!(
        output(&first, AssetKind::Js).written,
        hashed_name("site.js", &ContentHash::of(&bytes), 8).unwrap()
    );
}

#[test]
fn test_all_targets_on_single_thread_pool() {
    let p = Project::new();
    p.write("src/sass/site.scss", "a { color: red; }");
    p.write("src/js/a.js", "var a=1;");

    let pool = rayon::ThreadPoolBuilder::new().num_threads(1).build().unwrap();
    let report = pool.install(|| p.run(&AssetKind::ALL));

    assert!(report.is_success(), "{:?}", report.failures().collect::<Vec<_>>());
    assert_eq!(p.manifest().len(), 2);
}

#[test]
fn test_changed_content_leaves_no_stale_files() {
    let p = Project::new();
    p.write("src/sass/site.scss", "a { color: red; }");
    let old = output(&p.run(&[AssetKind::Css]), AssetKind::Css).written.clone();

    p.write("src/sass/site.scss", "a { color: green; }");
    let report = p.run(&[AssetKind::Css]);
    let new = output(&report, AssetKind::Css).written.clone();

    assert_ne!(old, new);
    assert_eq!(p.files_in("static/css"), vec![new.clone()]);
    assert_eq!(p.manifest().get("site.css"), Some(new.as_str()));
}

#[test]
fn test_manifest_values_exist_on_disk() {
    let p = Project::new();
    p.write("src/sass/site.scss", "a { color: red; }");
    p.write("src/js/a.js", "var a = 1;");
    assert!(p.run(&AssetKind::ALL).is_success());

    let manifest = p.manifest();
    assert_eq!(manifest.len(), 2);
    for (logical, written) in manifest.iter() {
        let dir = match AssetKind::from_file_name(logical).unwrap() {
            AssetKind::Css => "static/css",
            AssetKind::Js => "static/js",
        };
        assert!(p.root().join(dir).join(written).is_file(), "{written} missing");
    }
}

#[test]
fn test_hashing_disabled_writes_logical_names() {
    let mut p = Project::new();
    p.config.build.hashing = false;
    p.config.build.minify = false;
    p.write("src/js/a.js", "var a = 1;");

    let report = p.run(&[AssetKind::Js]);
    assert!(report.is_success());
    assert_eq!(p.files_in("static/js"), vec!["site.js"]);
    assert_eq!(
        fs::read_to_string(p.root().join("static/js/site.js")).unwrap(),
        "var a = 1;"
    );
    assert_eq!(p.manifest().get("site.js"), Some("site.js"));
}

#[test]
fn test_no_sources_writes_nothing() {
    let p = Project::new();
    let report = p.run(&AssetKind::ALL);

    assert!(report.manifest.is_none());
    assert_eq!(report.failures().count(), 2);
    assert!(!p.root().join("static").exists());
    assert!(!p.root().join("data/hash.json").exists());
}

#[test]
fn test_legacy_layout() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("sass")).unwrap();
    fs::write(dir.path().join("sass/main.scss"), "a { b: c; }").unwrap();

    let mut config = crate::config::test_parse_config("[build]\nlayout = \"legacy\"\n");
    config.set_root(dir.path());
    config.build.normalize(dir.path());

    let report = run_targets(&config.build, &[AssetKind::Css]);
    assert!(report.is_success(), "{:?}", report.targets);
    assert!(dir.path().join("static/css").is_dir());
}
