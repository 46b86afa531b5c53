//! On-disk manifest with locked read-merge-write.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tempfile::NamedTempFile;

use super::Manifest;
use crate::asset::AssetKind;
use crate::config::BuildSectionConfig;
use crate::debug;
use crate::pipeline::{BuildError, BuildResult};

/// The manifest file plus the output directories its values live in.
#[derive(Debug, Clone)]
pub struct ManifestStore {
    path: PathBuf,
    css_dir: PathBuf,
    js_dir: PathBuf,
}

impl ManifestStore {
    pub fn new(path: impl Into<PathBuf>, css_dir: impl Into<PathBuf>, js_dir: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            css_dir: css_dir.into(),
            js_dir: js_dir.into(),
        }
    }

    pub fn from_config(build: &BuildSectionConfig) -> Self {
        Self::new(&build.manifest.path, &build.css.output, &build.js.output)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `<manifest>.lock`, next to the manifest.
    pub fn lock_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".lock");
        self.path.with_file_name(name)
    }

    /// Read the manifest. A missing file is an empty manifest.
    pub fn load(&self) -> BuildResult<Manifest> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Manifest::new()),
            Err(e) => return Err(BuildError::io(&self.path, e)),
        };
        if content.trim().is_empty() {
            return Ok(Manifest::new());
        }
        serde_json::from_str(&content).map_err(|e| self.error(format!("corrupt JSON: {e}")))
    }

    /// Fold `accumulated` into the manifest on disk and return the result.
    ///
    /// Holds an exclusive lock on [`lock_path`](Self::lock_path) for the
    /// whole read-merge-write. Entries whose file is gone from its output
    /// directory are dropped, and the new content replaces the old file by
    /// rename.
    pub fn merge(&self, accumulated: &Manifest) -> BuildResult<Manifest> {
        let parent = self.parent_dir();
        fs::create_dir_all(&parent).map_err(|e| BuildError::io(&parent, e))?;

        let lock_path = self.lock_path();
        let lock_file = File::create(&lock_path).map_err(|e| BuildError::io(&lock_path, e))?;
        lock_file
            .lock_exclusive()
            .map_err(|e| self.error(format!("failed to lock: {e}")))?;

        let result = self.merge_locked(accumulated, &parent);

        let _ = lock_file.unlock();
        result
    }

    fn merge_locked(&self, accumulated: &Manifest, parent: &Path) -> BuildResult<Manifest> {
        let mut manifest = self.load()?;
        manifest.overlay(accumulated);
        manifest.retain(|logical, written| {
            let present = self.is_present(written);
            if !present {
                debug!("manifest"; "pruning {} -> {}", logical, written);
            }
            present
        });

        let mut json = serde_json::to_string_pretty(&manifest)
            .map_err(|e| self.error(format!("failed to serialize: {e}")))?;
        json.push('\n');

        let mut tmp = NamedTempFile::new_in(parent).map_err(|e| BuildError::io(parent, e))?;
        tmp.write_all(json.as_bytes())
            .map_err(|e| BuildError::io(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| BuildError::io(&self.path, e.error))?;

        Ok(manifest)
    }

    /// Delete the manifest and its lock file. Missing files are fine.
    pub fn remove(&self) -> BuildResult<()> {
        for path in [self.path.clone(), self.lock_path()] {
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(BuildError::io(&path, e)),
            }
        }
        Ok(())
    }

    /// Whether a written file exists in the output directory of its kind.
    fn is_present(&self, written: &str) -> bool {
        match AssetKind::from_file_name(written) {
            Some(AssetKind::Css) => self.css_dir.join(written).is_file(),
            Some(AssetKind::Js) => self.js_dir.join(written).is_file(),
            None => self.css_dir.join(written).is_file() || self.js_dir.join(written).is_file(),
        }
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn error(&self, message: String) -> BuildError {
        BuildError::Manifest {
            path: self.path.clone(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> ManifestStore {
        let root = dir.path();
        fs::create_dir_all(root.join("css")).unwrap();
        fs::create_dir_all(root.join("js")).unwrap();
        ManifestStore::new(root.join("data/hash.json"), root.join("css"), root.join("js"))
    }

    fn manifest(entries: &[(&str, &str)]) -> Manifest {
        let mut m = Manifest::new();
        for (k, v) in entries {
            m.insert(*k, *v);
        }
        m
    }

    #[test]
    fn test_load_missing_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(store(&dir).load().unwrap().is_empty());
    }

    #[test]
    fn test_merge_keeps_other_target_entries() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        fs::write(dir.path().join("css/site.aaaa.css"), "").unwrap();
        fs::write(dir.path().join("js/site.bbbb.js"), "").unwrap();

        store.merge(&manifest(&[("site.css", "site.aaaa.css")])).unwrap();
        let merged = store.merge(&manifest(&[("site.js", "site.bbbb.js")])).unwrap();

        assert_eq!(merged, manifest(&[("site.css", "site.aaaa.css"), ("site.js", "site.bbbb.js")]));
        assert_eq!(store.load().unwrap(), merged);
    }

    #[test]
    fn test_merge_prunes_missing_files() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        fs::create_dir_all(dir.path().join("data")).unwrap();
        fs::write(
            store.path(),
            r#"{"site.css": "site.gone.css", "old.js": "old.1234.js"}"#,
        )
        .unwrap();
        fs::write(dir.path().join("js/site.cccc.js"), "").unwrap();

        let merged = store.merge(&manifest(&[("site.js", "site.cccc.js")])).unwrap();
        assert_eq!(merged, manifest(&[("site.js", "site.cccc.js")]));
    }

    #[test]
    fn test_value_checked_in_its_own_kind_dir() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        // a css name sitting in the js dir does not count
        fs::write(dir.path().join("js/site.aaaa.css"), "").unwrap();

        let merged = store.merge(&manifest(&[("site.css", "site.aaaa.css")])).unwrap();
        assert!(merged.is_empty());
    }

    #[test]
    fn test_written_json_format() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        fs::write(dir.path().join("css/site.aaaa.css"), "").unwrap();

        store.merge(&manifest(&[("site.css", "site.aaaa.css")])).unwrap();
        let content = fs::read_to_string(store.path()).unwrap();
        assert_eq!(content, "{\n  \"site.css\": \"site.aaaa.css\"\n}\n");
        assert!(store.lock_path().ends_with("hash.json.lock"));
    }

    #[test]
    fn test_corrupt_manifest() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        fs::create_dir_all(dir.path().join("data")).unwrap();
        fs::write(store.path(), "{not json").unwrap();

        let err = store.merge(&Manifest::new()).unwrap_err();
        assert!(matches!(err, BuildError::Manifest { .. }));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.merge(&Manifest::new()).unwrap();
        assert!(store.path().exists());

        store.remove().unwrap();
        assert!(!store.path().exists());
        assert!(!store.lock_path().exists());
        store.remove().unwrap();
    }
}
