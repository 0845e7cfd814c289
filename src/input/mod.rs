// Input source contract
//
// Action channels never poll devices. They subscribe to something that
// implements `InputSource` and receive an `InputContext` whenever one of its
// three streams fires.
//
// ## Architecture
//
// - `events`: `InputEvents`, a plain multicast implementation of the three streams
// - `keyboard`: `KeyboardAction`, an input source driven by winit keyboard/mouse events
//
// ## Usage Example
//
// ```rust
// use action_channels::input::{InputContext, InputEvents, InputSource, ValueContext};
// use action_channels::{ActionKind, ActionValue};
//
// let jump = InputEvents::new("jump");
// let id = jump.subscribe(ActionKind::Performed, std::rc::Rc::new(|ctx: &dyn InputContext| {
//     println!("jump: {:?}", ctx.read_value());
// }));
//
// jump.fire(ActionKind::Performed, &ValueContext::new(ActionValue::Button(true)));
// jump.unsubscribe(ActionKind::Performed, id);
// ```

pub mod events;
pub mod keyboard;

pub use events::{InputEvents, ValueContext};
pub use keyboard::{KeyBinding, KeyboardAction};

use crate::channel::{ActionKind, ActionValue};
use std::rc::Rc;

/// Token identifying one subscription on an input source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

impl SubscriptionId {
    /// Get the raw u64 value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Event context handed to subscribers
pub trait InputContext {
    /// Read the payload; must be a pure read with no side effects
    fn read_value(&self) -> ActionValue;
}

/// Subscriber callback for one input stream
pub type InputHandler = Rc<dyn Fn(&dyn InputContext)>;

/// Something that produces Performed/Started/Cancelled streams
pub trait InputSource {
    /// Name used to reference this source from channel assets
    fn name(&self) -> &str;

    /// Subscribe a handler to the stream for `kind`
    fn subscribe(&self, kind: ActionKind, handler: InputHandler) -> SubscriptionId;

    /// Remove a subscription; returns false if it was not found on that stream
    fn unsubscribe(&self, kind: ActionKind, id: SubscriptionId) -> bool;
}
