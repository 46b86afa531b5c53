//! Watch mode orchestrator.
//!
//! Builds everything once, then rebuilds the targets whose sources change.
//!
//! ```text
//! notify → std channel → bridge thread → tokio channel
//!        → Debouncer (timing) → router (paths → targets) → pipeline
//! ```
//!
//! The watcher is attached before the initial build, so edits made while
//! it runs are buffered and picked up by the first debounce cycle.

mod debouncer;
mod router;
mod types;
mod watch_roots;


pub use types::WatchState;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossbeam::channel::Receiver;
use notify::RecommendedWatcher;
use rustc_hash::FxHashMap;
use tokio::sync::mpsc;

use crate::asset::AssetKind;
use crate::config::{PipelineConfig, cfg, reload_config};
use crate::core::{is_shutdown, register_shutdown_signal};
use crate::pipeline::{BuildReport, run_targets};
use crate::{debug, log, logger};
use debouncer::Debouncer;
use types::ChangeKind;
use watch_roots::WatchRoots;

/// How often the loop checks for Ctrl+C.
const SHUTDOWN_POLL: Duration = Duration::from_millis(100);

/// Run the watch loop on a current-thread runtime until Ctrl+C.
pub fn run(config: Arc<PipelineConfig>) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("failed to create tokio runtime")?;

    let shutdown_rx = register_shutdown_signal();
    runtime.block_on(async move {
        let orchestrator = Orchestrator::new(config)?;
        orchestrator.run(shutdown_rx).await;
        Ok::<_, anyhow::Error>(())
    })
}

/// Watcher, debouncer and build state.
pub struct Orchestrator {
    /// Taken by the bridge thread when the loop starts.
    notify_rx: Option<std::sync::mpsc::Receiver<notify::Result<notify::Event>>>,
    /// Must be kept alive for events to flow.
    watcher: RecommendedWatcher,
    roots: WatchRoots,
    debouncer: Debouncer,
    config: Arc<PipelineConfig>,
    state: WatchState,
}

impl Orchestrator {
    pub fn new(config: Arc<PipelineConfig>) -> Result<Self> {
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })
        .context("failed to create file watcher")?;

        let mut roots = WatchRoots::new(router::watch_roots(&config));
        roots
            .attach_existing(&mut watcher)
            .context("failed to watch source directories")?;

        Ok(Self {
            notify_rx: Some(notify_rx),
            watcher,
            roots,
            debouncer: Debouncer::new(),
            config,
            state: WatchState::Idle,
        })
    }

    pub fn state(&self) -> WatchState {
        self.state
    }

    pub async fn run(mut self, shutdown_rx: Receiver<()>) {
        let (async_tx, mut async_rx) = mpsc::channel::<notify::Event>(64);

        if let Some(notify_rx) = self.notify_rx.take() {
            std::thread::spawn(move || {
                while let Ok(result) = notify_rx.recv() {
                    match result {
                        Ok(event) => {
                            if async_tx.blocking_send(event).is_err() {
                                break;
                            }
                        }
                        Err(e) => crate::log!("watch"; "notify error: {}", e),
                    }
                }
            });
        }

        for path in self.roots.paths() {
            log!("watch"; "watching {}", self.config.root_relative(path).display());
        }
        self.build(AssetKind::ALL.to_vec()).await;

        let mut shutdown_tick = tokio::time::interval(SHUTDOWN_POLL);
        loop {
            tokio::select! {
                biased;
                _ = shutdown_tick.tick() => {
                    if shutdown_rx.try_recv().is_ok() {
                        debug!("watch"; "shutdown signal received");
                        break;
                    }
                }
                Some(event) = async_rx.recv() => self.debouncer.add_event(&event),
                _ = tokio::time::sleep(self.debouncer.sleep_duration()) => {
                    self.roots.maintain(&mut self.watcher);
                    if let Some(changes) = self.debouncer.take_if_ready() {
                        self.on_changes(changes).await;
                    }
                }
            }
        }

        logger::status_detach();
        log!("watch"; "stopped");
    }

    async fn on_changes(&mut self, changes: FxHashMap<std::path::PathBuf, ChangeKind>) {
        let route = router::route(&changes, &self.config);
        if route.is_empty() || is_shutdown() {
            return;
        }
        if route.reload_config {
            self.reload();
        }
        self.build(route.kinds()).await;
    }

    /// Pick up an edited config file. A broken config keeps the old one.
    fn reload(&mut self) {
        match reload_config() {
            Ok(true) => {
                self.config = cfg();
                self.roots
                    .replace(router::watch_roots(&self.config), &mut self.watcher);
                logger::status_detach();
                log!("watch"; "config reloaded");
            }
            Ok(false) => debug!("watch"; "config unchanged"),
            Err(e) => logger::status_error("config reload failed", &format!("{e:#}")),
        }
    }

    /// Idle → Building → Idle around one pipeline run.
    async fn build(&mut self, kinds: Vec<AssetKind>) {
        self.set_state(WatchState::Building);

        let config = Arc::clone(&self.config);
        let result = tokio::task::spawn_blocking(move || run_targets(&config.build, &kinds)).await;

        match result {
            Ok(report) => show_report(&report),
            Err(e) => logger::status_error("build task failed", &e.to_string()),
        }

        self.set_state(WatchState::Idle);
    }

    fn set_state(&mut self, state: WatchState) {
        debug!("watch"; "{} -> {}", self.state, state);
        self.state = state;
    }
}

fn show_report(report: &BuildReport) {
    let failures: Vec<_> = report.failures().collect();
    if failures.is_empty() {
        logger::status_success(&report.summary());
        return;
    }

    let summary = failures
        .iter()
        .map(|(what, err)| format!("{what}: {}", err.summary()))
        .collect::<Vec<_>>()
        .join(", ");
    let detail = failures
        .iter()
        .map(|(_, err)| err.to_string())
        .collect::<Vec<_>>()
        .join("\n");
    logger::status_error(&summary, &detail);

    let written = report.summary();
    if !written.is_empty() {
        logger::status_detach();
        log!("watch"; "still wrote {}", written);
    }
}
