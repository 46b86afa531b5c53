//! Source file sets.
//!
//! A [`SourceSet`] is a root directory plus include/exclude globs. Matching
//! is done on the `/`-separated path relative to the root, and results are
//! sorted by that same string so every run sees the files in one order.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use jwalk::{Parallelism, WalkDir};

use crate::pipeline::{BuildError, BuildResult};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Glob-selected files under one root.
#[derive(Debug, Clone)]
pub struct SourceSet {
    root: PathBuf,
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

/// One matched source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Absolute path.
    pub path: PathBuf,
    /// `/`-separated path relative to the set root; the sort key.
    pub rel: String,
}

impl SourceSet {
    pub fn new(root: &Path, include: &[String], exclude: &[String]) -> BuildResult<Self> {
        Ok(Self {
            root: root.to_path_buf(),
            include: compile_patterns(include)?,
            exclude: compile_patterns(exclude)?,
        })
    }

    /// Whether a root-relative path is selected by this set.
    pub fn matches(&self, rel: &str) -> bool {
        self.include
            .iter()
            .any(|p| p.matches_with(rel, MATCH_OPTIONS))
            && !self
                .exclude
                .iter()
                .any(|p| p.matches_with(rel, MATCH_OPTIONS))
    }

    /// Walk the root and return matching files sorted by relative path.
    ///
    /// A missing root yields an empty set; callers decide whether that is
    /// an error.
    pub fn collect(&self) -> BuildResult<Vec<SourceFile>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        // Hidden files and directories are skipped, like shell globs. The walk
        // runs serially: targets are already built on the rayon pool.
        let walker = WalkDir::new(&self.root).parallelism(Parallelism::Serial);
        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().map_or_else(|| self.root.clone(), Path::to_path_buf);
                BuildError::io(path, e.into())
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let Some(rel) = relative_key(&self.root, &path) else {
                continue;
            };
            if self.matches(&rel) {
                files.push(SourceFile { path, rel });
            }
        }

        files.sort_by(|a, b| a.rel.cmp(&b.rel));
        Ok(files)
    }
}

/// `/`-separated path of `path` relative to `root`.
pub fn relative_key(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    Some(parts.join("/"))
}

fn compile_patterns(patterns: &[String]) -> BuildResult<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| BuildError::Pattern {
                pattern: p.clone(),
                message: e.msg.to_string(),
            })
        })
        .collect()
}
