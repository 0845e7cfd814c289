// Central channel asset management

#[cfg(debug_assertions)]
use super::hot_reload::HotReloadWatcher;
use super::{
    AssetError, AssetLoader, AssetType, ChannelConfig, InputSourceRegistry, KeyboardConfig,
};
use crate::channel::ActionChannel;
use anyhow::Result;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Owns every channel of a session
///
/// Channels are shared as `Rc<ActionChannel>`; reloading reconfigures them in
/// place so existing handles stay valid.
pub struct ChannelAssets {
    /// Asset loader
    loader: AssetLoader,

    /// Hot reload watcher (only in dev mode)
    #[cfg(debug_assertions)]
    hot_reload: HotReloadWatcher,

    /// Input sources channels can bind to
    sources: InputSourceRegistry,

    /// Loaded channels by channel name
    channels: HashMap<String, Rc<ActionChannel>>,

    /// Channel asset path to channel name
    channel_paths: HashMap<PathBuf, String>,
}

impl ChannelAssets {
    /// Create an empty set of channel assets
    pub fn new<P: AsRef<Path>>(asset_path: P) -> Self {
        Self {
            loader: AssetLoader::new(asset_path),
            #[cfg(debug_assertions)]
            hot_reload: HotReloadWatcher::new(true),
            sources: InputSourceRegistry::new(),
            channels: HashMap::new(),
            channel_paths: HashMap::new(),
        }
    }

    /// Load every input asset, then every channel asset
    /// Returns the number of channels loaded
    pub fn load_all(&mut self) -> Result<usize> {
        for name in self.loader.list_assets(AssetType::Input)? {
            self.load_input(&name)?;
        }

        let names = self.loader.list_assets(AssetType::Channel)?;
        for name in &names {
            self.load_channel(name)?;
        }

        info!(
            "Loaded {} action channels and {} input sources from {}",
            self.channels.len(),
            self.sources.len(),
            self.loader.base_path().display()
        );
        Ok(names.len())
    }

    /// Load a keyboard input asset and register it
    pub fn load_input(&mut self, name: &str) -> Result<()> {
        let bytes = self.loader.load_bytes(AssetType::Input, name)?;
        let config = KeyboardConfig::from_json(name, &bytes)?;

        debug!(
            "Input source '{}' ({} bindings)",
            config.name,
            config.bindings.len()
        );
        self.sources.register_keyboard(Rc::new(config.build()));
        Ok(())
    }

    /// Load a channel asset
    ///
    /// Loading the same file twice returns the existing channel.
    pub fn load_channel(&mut self, name: &str) -> Result<Rc<ActionChannel>> {
        let path = self.loader.resolve_path(AssetType::Channel, name);

        // Check if already loaded
        if let Some(channel) = self
            .channel_paths
            .get(&path)
            .and_then(|channel| self.channels.get(channel))
        {
            return Ok(channel.clone());
        }

        let bytes = self.loader.load_bytes(AssetType::Channel, name)?;
        let config = ChannelConfig::from_json(name, &bytes)?;

        if self.channels.contains_key(&config.name) {
            return Err(AssetError::AlreadyLoaded(config.name).into());
        }

        let channel = Rc::new(ActionChannel::with_settings(
            config.name.clone(),
            config.to_settings(&self.sources)?,
        ));
        self.channels.insert(config.name.clone(), channel.clone());
        self.channel_paths.insert(path.clone(), config.name);

        // Watch for changes in dev mode
        #[cfg(debug_assertions)]
        {
            if let Err(err) = self.hot_reload.watch(&path, channel.name()) {
                warn!("Not watching {}: {:#}", path.display(), err);
            }
        }

        Ok(channel)
    }

    /// Add a channel built in code
    pub fn insert_channel(&mut self, channel: ActionChannel) -> Result<Rc<ActionChannel>> {
        let name = channel.name().to_string();
        if self.channels.contains_key(&name) {
            return Err(AssetError::AlreadyLoaded(name).into());
        }

        let channel = Rc::new(channel);
        self.channels.insert(name, channel.clone());
        Ok(channel)
    }

    /// Get a channel by name
    pub fn channel(&self, name: &str) -> Option<Rc<ActionChannel>> {
        self.channels.get(name).cloned()
    }

    /// Names of all loaded channels, sorted
    pub fn channel_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.channels.keys().cloned().collect();
        names.sort();
        names
    }

    /// Input sources available to channels
    pub fn sources(&self) -> &InputSourceRegistry {
        &self.sources
    }

    /// Mutable access to register sources built in code
    pub fn sources_mut(&mut self) -> &mut InputSourceRegistry {
        &mut self.sources
    }

    /// Re-read channel assets whose files changed (dev mode only)
    ///
    /// A reloaded channel is torn down first: receivers must add their
    /// listeners and register to input again. Returns the reloaded channel
    /// names.
    #[cfg(debug_assertions)]
    pub fn reload_changed(&mut self) -> Vec<String> {
        let mut reloaded = Vec::new();

        for (path, name) in self.hot_reload.poll() {
            let Some(channel) = self.channels.get(&name).cloned() else {
                continue;
            };

            match self.reload_channel(&path, &channel) {
                Ok(()) => {
                    info!("Reloaded action channel '{}'", name);
                    reloaded.push(name);
                }
                Err(err) => warn!("Failed to reload action channel '{}': {:#}", name, err),
            }
        }

        reloaded
    }

    #[cfg(debug_assertions)]
    fn reload_channel(&self, path: &Path, channel: &ActionChannel) -> Result<()> {
        let bytes = std::fs::read(path)?;
        let config = ChannelConfig::from_json(&path.to_string_lossy(), &bytes)?;
        if config.name != channel.name() {
            warn!(
                "Channel asset {} was renamed to '{}'; keeping '{}' until restart",
                path.display(),
                config.name,
                channel.name()
            );
        }

        let settings = config.to_settings(&self.sources)?;
        channel.clear();
        channel.configure(settings)?;
        Ok(())
    }

    /// End the session: detach and drop every listener on every channel
    pub fn shutdown(&mut self) {
        for channel in self.channels.values() {
            channel.clear();
        }
        self.channels.clear();
        self.channel_paths.clear();

        #[cfg(debug_assertions)]
        self.hot_reload.clear();
    }

    /// Get statistics about loaded assets
    pub fn stats(&self) -> AssetStats {
        AssetStats {
            channel_count: self.channels.len(),
            input_count: self.sources.len(),
            receiver_count: self.channels.values().map(|c| c.receiver_count()).sum(),
        }
    }

    /// Get the asset loader
    pub fn loader(&self) -> &AssetLoader {
        &self.loader
    }
}

/// Statistics about loaded assets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetStats {
    pub channel_count: usize,
    pub input_count: usize,
    pub receiver_count: usize,
}
