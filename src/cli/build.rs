//! One-shot builds: `build-css`, `build-js` and `deploy`.

use crate::{asset::AssetKind, config::PipelineConfig, debug, pipeline::run_targets};
use anyhow::Result;
use std::time::Instant;

/// Run `kinds` once, print the results and fail if any target failed.
pub fn build_once(config: &PipelineConfig, kinds: &[AssetKind]) -> Result<()> {
    let started = Instant::now();
    let report = run_targets(&config.build, kinds);
    report.log(config.get_root());
    debug!("build"; "finished in {:.2?}", started.elapsed());
    report.into_result()
}
