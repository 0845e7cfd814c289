// Channel asset management
//
// Channels are authored as JSON assets instead of code. This module loads
// them, resolves the input sources they reference, hot-reloads them during
// development and tears them down at the end of a session.
//
// ## Layout
//
// ```text
// <assets>/inputs/jump.json     { "name": "jump", "bindings": [{ "Keyboard": "Space" }] }
// <assets>/channels/jump.json   { "name": "Jump", "input_action": "jump", "register_started": true }
// ```

mod config;
mod hot_reload;
mod loader;
mod manager;
mod registry;

pub use config::{ChannelConfig, KeyboardConfig};
pub use loader::{AssetLoader, AssetType};
pub use manager::{AssetStats, ChannelAssets};
pub use registry::InputSourceRegistry;

#[cfg(debug_assertions)]
pub use hot_reload::HotReloadWatcher;

/// Asset loading errors
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Asset already loaded: {0}")]
    AlreadyLoaded(String),

    #[error("Failed to parse asset {asset}: {source}")]
    Parse {
        asset: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Channel '{channel}' references unknown input source '{input}'")]
    UnknownInputSource { channel: String, input: String },

    #[error("Failed to load asset: {0}")]
    LoadError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
