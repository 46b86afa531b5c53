//! `clean`: remove both output directories and the manifest.

use crate::{config::PipelineConfig, log, manifest::ManifestStore, pipeline::clear_dir};
use anyhow::Result;

pub fn clean(config: &PipelineConfig) -> Result<()> {
    for dir in [&config.build.css.output, &config.build.js.output] {
        clear_dir(dir)?;
        log!("clean"; "removed {}", config.root_relative(dir).display());
    }

    let store = ManifestStore::from_config(&config.build);
    store.remove()?;
    log!("clean"; "removed {}", config.root_relative(store.path()).display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetKind;
    use crate::pipeline::run_targets;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_clean_removes_outputs_and_manifest() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src/sass")).unwrap();
        fs::write(dir.path().join("src/sass/site.scss"), "a { color: red; }").unwrap();
        let config = PipelineConfig::with_root(dir.path());
        assert!(run_targets(&config.build, &AssetKind::ALL).manifest.is_some());

        clean(&config).unwrap();
        assert!(!config.build.css.output.exists());
        assert!(!config.build.js.output.exists());
        assert!(!config.build.manifest.path.exists());
        // sources are untouched
        assert!(dir.path().join("src/sass/site.scss").is_file());
    }

    #[test]
    fn test_clean_on_fresh_project() {
        let dir = TempDir::new().unwrap();
        clean(&PipelineConfig::with_root(dir.path())).unwrap();
    }
}
