// Serialized asset formats

use super::registry::InputSourceRegistry;
use super::AssetError;
use crate::channel::ChannelSettings;
use crate::input::{KeyBinding, KeyboardAction};
use serde::{Deserialize, Serialize};

/// On-disk form of an action channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Channel name, used for lookups and logs
    pub name: String,

    /// Designer notes
    #[serde(default)]
    pub description: String,

    /// Name of the input source to bridge to, if any
    #[serde(default)]
    pub input_action: Option<String>,

    #[serde(default)]
    pub register_started: bool,

    #[serde(default)]
    pub register_cancelled: bool,
}

impl ChannelConfig {
    /// Parse a channel asset
    pub fn from_json(asset: &str, bytes: &[u8]) -> Result<Self, AssetError> {
        serde_json::from_slice(bytes).map_err(|source| AssetError::Parse {
            asset: asset.to_string(),
            source,
        })
    }

    /// Build runtime settings, resolving the input source by name
    pub fn to_settings(
        &self,
        sources: &InputSourceRegistry,
    ) -> Result<ChannelSettings, AssetError> {
        let mut settings = ChannelSettings::new()
            .with_description(self.description.clone())
            .with_started(self.register_started)
            .with_cancelled(self.register_cancelled);

        if let Some(input) = &self.input_action {
            let source = sources
                .get(input)
                .ok_or_else(|| AssetError::UnknownInputSource {
                    channel: self.name.clone(),
                    input: input.clone(),
                })?;
            settings = settings.with_input_source(source);
        }

        Ok(settings)
    }
}

/// On-disk form of a keyboard input source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardConfig {
    pub name: String,

    #[serde(default)]
    pub bindings: Vec<KeyBinding>,
}

impl KeyboardConfig {
    /// Parse an input asset
    pub fn from_json(asset: &str, bytes: &[u8]) -> Result<Self, AssetError> {
        serde_json::from_slice(bytes).map_err(|source| AssetError::Parse {
            asset: asset.to_string(),
            source,
        })
    }

    /// Build the input source
    pub fn build(&self) -> KeyboardAction {
        KeyboardAction::from_bindings(self.name.clone(), self.bindings.clone())
    }
}
