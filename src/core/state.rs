//! Process-wide shutdown state.
//!
//! One-shot commands have nothing to wind down, so Ctrl+C exits at once.
//! Once the watch loop registers its shutdown channel, Ctrl+C instead
//! signals the loop, which stops after the build in flight completes.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Shutdown signal sender for the watch loop
static SHUTDOWN_TX: OnceLock<crossbeam::channel::Sender<()>> = OnceLock::new();

/// Setup the global Ctrl+C handler. Call once at program start
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        SHUTDOWN.store(true, Ordering::SeqCst);

        match SHUTDOWN_TX.get() {
            Some(tx) => {
                crate::log!("watch"; "shutting down...");
                let _ = tx.send(());
            }
            None => std::process::exit(130),
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Register the watch loop's shutdown channel.
///
/// Returns the receiving end; only the first registration takes effect.
pub fn register_shutdown_signal() -> crossbeam::channel::Receiver<()> {
    let (tx, rx) = crossbeam::channel::bounded(1);
    if SHUTDOWN_TX.set(tx).is_err() {
        crate::debug!("watch"; "shutdown signal already registered");
    }
    rx
}

/// Check if shutdown has been requested
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shutdown_flag() {
        assert!(!is_shutdown());
        SHUTDOWN.store(true, Ordering::SeqCst);
        assert!(is_shutdown());
        SHUTDOWN.store(false, Ordering::SeqCst);
    }
}
