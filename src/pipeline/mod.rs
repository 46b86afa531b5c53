//! Build pipeline: transform → hash → write, per target.
//!
//! # Architecture
//!
//! ```text
//!               ┌─ Css: style transform  → hash → replace static/css ─┐
//! run_targets ──┤                                                     ├─ manifest merge
//!               └─ Js:  script transform → hash → replace static/js  ─┘
//! ```
//!
//! Both targets record into one [`ManifestAccumulator`], which is merged
//! into the manifest file once after every requested target finished. A
//! failing target records and writes nothing.

mod error;
mod writer;

#[cfg(test)]
mod tests;

pub use error::{BuildError, BuildResult};
pub use writer::{clear_dir, replace_output};

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

use crate::asset::{AssetKind, build_bundle, build_stylesheet};
use crate::config::BuildSectionConfig;
use crate::hash::{ContentHash, hashed_name};
use crate::manifest::{Manifest, ManifestAccumulator, ManifestStore};
use crate::{debug, log};

/// What a successful target wrote.
#[derive(Debug, Clone)]
pub struct TargetOutput {
    pub kind: AssetKind,
    /// Manifest key, e.g. `site.css`.
    pub logical: String,
    /// Written file name, e.g. `site.1a2b3c4d.css`.
    pub written: String,
    /// Absolute path of the written artifact.
    pub path: PathBuf,
    /// Absolute paths of copied vendor files.
    pub vendor: Vec<PathBuf>,
}

/// Outcome of one pipeline run.
#[derive(Debug)]
pub struct BuildReport {
    pub targets: Vec<(AssetKind, BuildResult<TargetOutput>)>,
    /// `None` when no target succeeded, so nothing was flushed.
    pub manifest: Option<BuildResult<Manifest>>,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }

    /// Failed targets, then a failed manifest flush.
    pub fn failures(&self) -> impl Iterator<Item = (&'static str, &BuildError)> {
        let targets = self
            .targets
            .iter()
            .filter_map(|(kind, r)| r.as_ref().err().map(|e| (kind.label(), e)));
        let manifest = self
            .manifest
            .iter()
            .filter_map(|r| r.as_ref().err().map(|e| ("manifest", e)));
        targets.chain(manifest)
    }

    pub fn outputs(&self) -> impl Iterator<Item = &TargetOutput> {
        self.targets.iter().filter_map(|(_, r)| r.as_ref().ok())
    }

    /// One line naming what was written, e.g. `css: site.1a2b3c4d.css`.
    pub fn summary(&self) -> String {
        self.outputs()
            .map(|o| format!("{}: {}", o.kind, o.written))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Print every result, paths shown relative to `root`.
    pub fn log(&self, root: &Path) {
        let rel = |p: &Path| p.strip_prefix(root).unwrap_or(p).display().to_string();

        for output in self.outputs() {
            log!(output.kind.label(); "{} -> {}", output.logical, rel(&output.path));
            for vendor in &output.vendor {
                log!(output.kind.label(); "copied {}", rel(vendor));
            }
        }
        if let Some(Ok(manifest)) = &self.manifest {
            let n = manifest.len();
            log!("manifest"; "{} entr{}", n, if n == 1 { "y" } else { "ies" });
            for (logical, written) in manifest.iter() {
                debug!("manifest"; "{} -> {}", logical, written);
            }
        }
        for (what, err) in self.failures() {
            log!("error"; "{} failed: {}", what, err);
        }
    }

    /// `Err` when any target or the manifest flush failed.
    pub fn into_result(self) -> Result<()> {
        if self.is_success() {
            return Ok(());
        }
        let failed = self.failures().count();
        bail!(
            "{} of {} step{} failed",
            failed,
            self.targets.len() + usize::from(self.manifest.is_some()),
            if failed == 1 { "" } else { "s" }
        );
    }
}

/// Run the requested targets and flush the manifest once.
///
/// With both targets requested they run in parallel; their output
/// directories are disjoint and the accumulator is shared.
pub fn run_targets(build: &BuildSectionConfig, kinds: &[AssetKind]) -> BuildReport {
    let acc = ManifestAccumulator::new();
    let wants = |kind| kinds.contains(&kind);

    let (css, js) = if wants(AssetKind::Css) && wants(AssetKind::Js) {
        let (css, js) = rayon::join(
            || run_target(AssetKind::Css, build, &acc),
            || run_target(AssetKind::Js, build, &acc),
        );
        (Some(css), Some(js))
    } else {
        (
            wants(AssetKind::Css).then(|| run_target(AssetKind::Css, build, &acc)),
            wants(AssetKind::Js).then(|| run_target(AssetKind::Js, build, &acc)),
        )
    };

    let targets = [
        css.map(|r| (AssetKind::Css, r)),
        js.map(|r| (AssetKind::Js, r)),
    ]
    .into_iter()
    .flatten()
    .collect();

    let manifest = (!acc.is_empty())
        .then(|| ManifestStore::from_config(build).merge(&acc.snapshot()));

    BuildReport { targets, manifest }
}

/// Transform, hash and write one target, recording it in `acc`.
pub fn run_target(
    kind: AssetKind,
    build: &BuildSectionConfig,
    acc: &ManifestAccumulator,
) -> BuildResult<TargetOutput> {
    let (artifact, vendor, dir) = match kind {
        AssetKind::Css => (
            build_stylesheet(&build.css, build.minify)?,
            Vec::new(),
            &build.css.output,
        ),
        AssetKind::Js => {
            let output = build_bundle(&build.js, build.minify)?;
            (output.bundle, output.vendor, &build.js.output)
        }
    };

    let written = if build.hashing {
        let hash = ContentHash::of(&artifact.bytes);
        hashed_name(&artifact.name, &hash, build.hash_length)?
    } else {
        artifact.name.clone()
    };

    let path = replace_output(dir, &written, &artifact.bytes, &vendor)?;
    acc.record(&artifact.name, &written);
    debug!(kind.label(); "{} bytes -> {}", artifact.bytes.len(), path.display());

    Ok(TargetOutput {
        kind,
        logical: artifact.name,
        written,
        path,
        vendor: vendor.iter().map(|v| dir.join(&v.name)).collect(),
    })
}
