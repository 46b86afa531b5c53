use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use super::types::{ChangeKind, Route};
use super::watch_roots::WatchRoot;
use crate::asset::AssetKind;
use crate::config::PipelineConfig;
use crate::utils::path::is_within;

/// Roots to watch for `config`: both source trees plus the directory
/// holding the config file (shallow).
pub(super) fn watch_roots(config: &PipelineConfig) -> Vec<WatchRoot> {
    let mut roots = vec![
        WatchRoot::recursive(&config.build.css.source),
        WatchRoot::recursive(&config.build.js.source),
    ];
    if let Some(dir) = config.config_path.parent() {
        roots.push(WatchRoot::shallow(dir));
    }
    roots
}

/// Map changed paths onto the targets they affect.
///
/// Style tree → CSS only, script tree → JS only, config file → reload and
/// both. Anything else (output directories, the manifest) is ignored.
pub(super) fn route(changes: &FxHashMap<PathBuf, ChangeKind>, config: &PipelineConfig) -> Route {
    let mut route = Route::default();
    for (path, kind) in changes {
        match classify(path, config) {
            Some(Target::Config) => {
                route.reload_config = true;
                route.targets.extend(AssetKind::ALL);
            }
            Some(Target::Asset(asset)) => {
                route.targets.insert(asset);
            }
            None => continue,
        }
        crate::debug!("watch"; "{}: {}", kind.label(), config.root_relative(path).display());
    }
    route
}

enum Target {
    Config,
    Asset(AssetKind),
}

fn classify(path: &Path, config: &PipelineConfig) -> Option<Target> {
    if path == config.config_path {
        return Some(Target::Config);
    }
    // Source roots may nest (e.g. `source = "."`); a path can hit both.
    let css = is_within(path, &config.build.css.source);
    let js = is_within(path, &config.build.js.source);
    match (css, js) {
        (true, false) => Some(Target::Asset(AssetKind::Css)),
        (false, true) => Some(Target::Asset(AssetKind::Js)),
        (true, true) => Some(Target::Asset(deeper_root(config))),
        (false, false) => None,
    }
}

/// The target whose source root is the more specific of the two.
fn deeper_root(config: &PipelineConfig) -> AssetKind {
    let css = config.build.css.source.components().count();
    let js = config.build.js.source.components().count();
    if js > css { AssetKind::Js } else { AssetKind::Css }
}
