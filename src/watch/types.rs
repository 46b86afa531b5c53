use std::collections::BTreeSet;
use std::fmt;

use crate::asset::AssetKind;

/// What happened to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ChangeKind {
    Created,
    Modified,
    Removed,
}

impl ChangeKind {
    pub(super) fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Removed => "removed",
        }
    }
}

/// Orchestrator state. Events that arrive while `Building` wait in the
/// channel and are debounced into the next build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Idle,
    Building,
}

impl fmt::Display for WatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Building => "building",
        })
    }
}

/// What a batch of changes asks for.
#[derive(Debug, Default, PartialEq, Eq)]
pub(super) struct Route {
    pub(super) targets: BTreeSet<AssetKind>,
    pub(super) reload_config: bool,
}

impl Route {
    pub(super) fn is_empty(&self) -> bool {
        self.targets.is_empty() && !self.reload_config
    }

    pub(super) fn kinds(&self) -> Vec<AssetKind> {
        self.targets.iter().copied().collect()
    }
}
