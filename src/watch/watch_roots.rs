use std::path::{Path, PathBuf};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use rustc_hash::FxHashSet;

/// One directory the watcher should be attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct WatchRoot {
    pub(super) path: PathBuf,
    pub(super) recursive: bool,
}

impl WatchRoot {
    pub(super) fn recursive(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            recursive: true,
        }
    }

    pub(super) fn shallow(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            recursive: false,
        }
    }

    fn mode(&self) -> RecursiveMode {
        if self.recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        }
    }
}

/// Keeps the watcher attached to the roots it should watch.
///
/// Roots missing at startup, or deleted and recreated later (e.g. by a
/// branch switch), are attached as soon as they exist.
pub(super) struct WatchRoots {
    desired: Vec<WatchRoot>,
    attached: FxHashSet<PathBuf>,
}

impl WatchRoots {
    pub(super) fn new(roots: Vec<WatchRoot>) -> Self {
        let mut desired: Vec<WatchRoot> = Vec::with_capacity(roots.len());
        for root in roots {
            match desired.iter_mut().find(|r| r.path == root.path) {
                Some(existing) => existing.recursive |= root.recursive,
                None => desired.push(root),
            }
        }
        Self {
            desired,
            attached: FxHashSet::default(),
        }
    }

    pub(super) fn attach_existing(&mut self, watcher: &mut RecommendedWatcher) -> notify::Result<()> {
        for root in &self.desired {
            if !root.path.exists() {
                crate::debug!("watch"; "not yet present: {}", root.path.display());
                continue;
            }
            watcher.watch(&root.path, root.mode())?;
            self.attached.insert(root.path.clone());
        }
        Ok(())
    }

    pub(super) fn maintain(&mut self, watcher: &mut RecommendedWatcher) {
        self.attached.retain(|path| path.exists());

        for root in &self.desired {
            if self.attached.contains(&root.path) || !root.path.exists() {
                continue;
            }
            if watcher.watch(&root.path, root.mode()).is_ok() {
                self.attached.insert(root.path.clone());
                crate::debug!("watch"; "re-attached watch: {}", root.path.display());
            }
        }
    }

    /// Swap in a new root list after a config reload.
    pub(super) fn replace(&mut self, roots: Vec<WatchRoot>, watcher: &mut RecommendedWatcher) {
        let next = Self::new(roots);
        for path in self.attached.drain() {
            if !next.desired.iter().any(|r| r.path == path) {
                let _ = watcher.unwatch(&path);
            }
        }
        self.desired = next.desired;
        // Re-watching an attached path just refreshes its mode.
        self.maintain(watcher);
    }

    pub(super) fn paths(&self) -> impl Iterator<Item = &Path> {
        self.desired.iter().map(|r| r.path.as_path())
    }
}
