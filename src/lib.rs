// Action channels: data-driven, shareable input event channels
//
// - `channel`: the listener registry and its bridge to input sources
// - `input`: the input source contract plus keyboard/mouse sources
// - `assets`: JSON channel assets, hot reload and session teardown

pub mod assets;
pub mod channel;
pub mod input;

// Re-export commonly used types
pub use assets::{AssetError, ChannelAssets};
pub use channel::{
    ActionCallback, ActionChannel, ActionKind, ActionReceiver, ActionValue, ChannelError,
    ChannelSettings, RawKind, ReceiverId,
};
pub use input::{InputContext, InputEvents, InputSource};
