//! Global config with atomic reload support.
//!
//! Uses `arc-swap` for lock-free reads and atomic config replacement,
//! so watch mode can pick up `sitepipe.toml` edits without restarting.

use crate::config::PipelineConfig;
use anyhow::{Context, Result};
use arc_swap::ArcSwap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};

/// Global config storage.
pub static CONFIG: LazyLock<ArcSwap<PipelineConfig>> =
    LazyLock::new(|| ArcSwap::from_pointee(PipelineConfig::default()));

/// Hash of the config file content currently loaded (0 = no file).
static CONFIG_HASH: AtomicU64 = AtomicU64::new(0);

#[inline]
pub fn cfg() -> Arc<PipelineConfig> {
    CONFIG.load_full()
}

/// Reload config from disk if content changed.
///
/// Returns `Ok(true)` if config was updated, `Ok(false)` if unchanged.
/// On a parse or validation error the previous config stays active.
pub fn reload_config() -> Result<bool> {
    let current = cfg();
    let Some(cli) = current.cli else {
        return Ok(false);
    };

    let content = std::fs::read_to_string(&current.config_path)
        .with_context(|| format!("failed to read {}", current.config_path.display()))?;
    let new_hash = content_hash(&content);

    if new_hash == CONFIG_HASH.load(Ordering::Relaxed) {
        return Ok(false);
    }

    let new_config = PipelineConfig::load(cli)?;
    CONFIG.store(Arc::new(new_config));
    CONFIG_HASH.store(new_hash, Ordering::Relaxed);

    Ok(true)
}

#[inline]
pub fn init_config(config: PipelineConfig) -> Arc<PipelineConfig> {
    if config.config_path.is_file()
        && let Ok(content) = std::fs::read_to_string(&config.config_path)
    {
        CONFIG_HASH.store(content_hash(&content), Ordering::Relaxed);
    }

    let arc = Arc::new(config);
    CONFIG.store(Arc::clone(&arc));
    arc
}

fn content_hash(content: &str) -> u64 {
    use std::hash::Hasher;
    let mut hasher = rustc_hash::FxHasher::default();
    hasher.write(content.as_bytes());
    hasher.finish()
}
