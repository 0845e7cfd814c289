// Change detection for channel asset files (dev builds)

use super::AssetError;
use anyhow::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A channel asset file and the channel it was loaded into
#[derive(Debug, Clone)]
struct WatchedAsset {
    channel: String,
    modified: SystemTime,
}

/// Remembers when each channel asset was last read
///
/// `poll` reports a file once per modification.
pub struct HotReloadWatcher {
    assets: HashMap<PathBuf, WatchedAsset>,
    enabled: bool,
}

impl HotReloadWatcher {
    pub fn new(enabled: bool) -> Self {
        Self {
            assets: HashMap::new(),
            enabled,
        }
    }

    /// Start tracking the file a channel was loaded from
    pub fn watch<P: AsRef<Path>>(&mut self, path: P, channel: &str) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let path = path.as_ref();
        let modified = modified_at(path)?;
        self.assets.insert(
            path.to_path_buf(),
            WatchedAsset {
                channel: channel.to_string(),
                modified,
            },
        );
        Ok(())
    }

    /// Stop tracking a file
    pub fn unwatch<P: AsRef<Path>>(&mut self, path: P) {
        self.assets.remove(path.as_ref());
    }

    /// Check if a file is tracked
    pub fn is_watching<P: AsRef<Path>>(&self, path: P) -> bool {
        self.assets.contains_key(path.as_ref())
    }

    /// Files modified since the last poll, with their channel names, sorted by path
    ///
    /// Files that can't be read right now (e.g. mid-save) are skipped and
    /// picked up by a later poll.
    pub fn poll(&mut self) -> Vec<(PathBuf, String)> {
        if !self.enabled {
            return Vec::new();
        }

        let mut changed = Vec::new();
        for (path, asset) in self.assets.iter_mut() {
            let Ok(modified) = modified_at(path) else {
                continue;
            };
            if modified > asset.modified {
                asset.modified = modified;
                changed.push((path.clone(), asset.channel.clone()));
            }
        }

        changed.sort();
        changed
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of tracked files
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn clear(&mut self) {
        self.assets.clear();
    }
}

fn modified_at(path: &Path) -> Result<SystemTime> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| AssetError::LoadError(format!("Can't watch {}: {}", path.display(), e)))?;
    Ok(metadata.modified()?)
}
