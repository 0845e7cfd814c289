// Action channels
//
// An action channel is a named event channel bound to one piece of player
// input. Any number of receivers subscribe callbacks to its three sub-events
// (Performed, Started, Cancelled); the channel keeps one set of callback chains
// per receiver and can forward an input source's streams into them.
//
// ## Architecture
//
// - `kind`: `ActionKind`, which sub-event an operation targets
// - `value`: `ActionValue`, the payload handed to callbacks
// - `receiver`: `ReceiverId` / `ActionReceiver`, the registry key
// - `listener`: callback handles and the per-receiver chains
// - `bridge`: subscribes a receiver's chains to an input source
// - `action_channel`: `ActionChannel`, the registry itself
//
// ## Usage Example
//
// ```rust
// use action_channels::{ActionCallback, ActionChannel, ActionKind, ReceiverId};
//
// let jump = ActionChannel::new("Jump");
// let player = ReceiverId::new();
// let on_jump = ActionCallback::new(|value| println!("jump {:?}", value));
//
// jump.add_listener(player, on_jump.clone(), ActionKind::Performed);
// jump.invoke(player, true, ActionKind::Performed);
// jump.remove_listener(player, &on_jump, ActionKind::Performed);
// ```

pub mod action_channel;
pub mod bridge;
pub mod kind;
pub mod listener;
pub mod receiver;
pub mod value;

// Re-export commonly used types
pub use action_channel::{ActionChannel, ChannelSettings};
pub use bridge::{BridgeFlags, BridgeSubscription};
pub use kind::{ActionKind, RawKind};
pub use listener::{ActionCallback, CallbackChain, ListenerSet};
pub use receiver::{ActionReceiver, ReceiverId};
pub use value::ActionValue;

/// Action channel errors
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Unknown action kind: {0}")]
    UnknownKind(String),

    #[error("No input source is bound to action channel '{channel}'")]
    NoInputSource { channel: String },

    #[error("Action channel '{channel}' can't be reconfigured while receivers are registered to input")]
    ConfigLocked { channel: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_error_display() {
        let err = ChannelError::NoInputSource {
            channel: "Jump".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "No input source is bound to action channel 'Jump'"
        );
        assert_eq!(
            ChannelError::UnknownKind("7".to_string()).to_string(),
            "Unknown action kind: 7"
        );
    }
}
