use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;

use super::types::ChangeKind;
use crate::utils::path::normalize_path;

pub(super) const DEBOUNCE_MS: u64 = 300;
pub(super) const REBUILD_COOLDOWN_MS: u64 = 800;

/// Idle sleep when nothing is pending.
const IDLE_SLEEP: Duration = Duration::from_secs(86400);

/// Collects changes until the quiet window and the rebuild cooldown have
/// both passed. Timing and dedup only; routing happens elsewhere.
pub(super) struct Debouncer {
    pub(super) changes: FxHashMap<PathBuf, ChangeKind>,
    pub(super) last_event: Option<Instant>,
    pub(super) last_build: Option<Instant>,
}

impl Debouncer {
    pub(super) fn new() -> Self {
        Self {
            changes: FxHashMap::default(),
            last_event: None,
            last_build: None,
        }
    }

    pub(super) fn add_event(&mut self, event: &notify::Event) {
        let Some(kind) = change_kind(&event.kind) else {
            return;
        };
        crate::debug!("watch"; "raw notify: {:?} {:?}", event.kind, event.paths);

        for path in &event.paths {
            if is_temp_file(path) {
                continue;
            }
            self.record(normalize_path(path), kind);
        }
    }

    fn record(&mut self, path: PathBuf, kind: ChangeKind) {
        match self.changes.get(&path).copied() {
            None => {
                self.changes.insert(path, kind);
            }
            Some(existing) => match merge(existing, kind) {
                Merge::Keep => return,
                Merge::Replace(kind) => {
                    self.changes.insert(path, kind);
                }
                Merge::Drop => {
                    self.changes.remove(&path);
                    if self.changes.is_empty() {
                        self.last_event = None;
                        return;
                    }
                }
            },
        }
        self.last_event = Some(Instant::now());
    }

    /// Take the pending changes once debounce and cooldown have elapsed.
    pub(super) fn take_if_ready(&mut self) -> Option<FxHashMap<PathBuf, ChangeKind>> {
        if !self.is_ready() {
            return None;
        }
        self.last_event = None;
        self.last_build = Some(Instant::now());
        Some(std::mem::take(&mut self.changes))
    }

    pub(super) fn is_ready(&self) -> bool {
        let Some(last_event) = self.last_event else {
            return false;
        };
        if last_event.elapsed() < Duration::from_millis(DEBOUNCE_MS) {
            return false;
        }
        if self
            .last_build
            .is_some_and(|t| t.elapsed() < Duration::from_millis(REBUILD_COOLDOWN_MS))
        {
            return false;
        }
        !self.changes.is_empty()
    }

    /// Time until the next possible ready point.
    pub(super) fn sleep_duration(&self) -> Duration {
        let Some(last_event) = self.last_event else {
            return IDLE_SLEEP;
        };
        let debounce = Duration::from_millis(DEBOUNCE_MS).saturating_sub(last_event.elapsed());
        let cooldown = self.last_build.map_or(Duration::ZERO, |t| {
            Duration::from_millis(REBUILD_COOLDOWN_MS).saturating_sub(t.elapsed())
        });
        debounce.max(cooldown).max(Duration::from_millis(1))
    }
}

enum Merge {
    Keep,
    Replace(ChangeKind),
    Drop,
}

/// Combine a second event for a path already pending.
fn merge(existing: ChangeKind, new: ChangeKind) -> Merge {
    use ChangeKind::*;
    match (existing, new) {
        // deleted then restored
        (Removed, Created | Modified) => Merge::Replace(new),
        (Modified, Removed) => Merge::Replace(Removed),
        // appeared and vanished within the window
        (Created, Removed) => Merge::Drop,
        _ => Merge::Keep,
    }
}

/// Metadata-only modifications (mtime, chmod) never trigger a build.
fn change_kind(kind: &notify::EventKind) -> Option<ChangeKind> {
    use notify::EventKind;
    use notify::event::ModifyKind;

    match kind {
        EventKind::Create(_) => Some(ChangeKind::Created),
        EventKind::Remove(_) => Some(ChangeKind::Removed),
        EventKind::Modify(ModifyKind::Metadata(_)) => None,
        EventKind::Modify(_) => Some(ChangeKind::Modified),
        _ => None,
    }
}

/// Editor swap, backup and hidden files.
pub(super) fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bak" | "swp" | "swo" | "swx" | "tmp" | "crswap")
        || name.ends_with('~')
        || name.starts_with('.')
        || name.starts_with("#")
}
