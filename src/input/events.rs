// Multicast input streams

use super::{InputContext, InputHandler, InputSource, SubscriptionId};
use crate::channel::{ActionKind, ActionValue};
use std::cell::{Cell, RefCell};

/// Context carrying a single ready-made value
#[derive(Debug, Clone, Default)]
pub struct ValueContext {
    value: ActionValue,
}

impl ValueContext {
    pub fn new(value: impl Into<ActionValue>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl InputContext for ValueContext {
    fn read_value(&self) -> ActionValue {
        self.value.clone()
    }
}

/// Handlers subscribed to one stream
#[derive(Default)]
struct Stream {
    handlers: RefCell<Vec<(SubscriptionId, InputHandler)>>,
}

impl Stream {
    fn snapshot(&self) -> Vec<InputHandler> {
        self.handlers
            .borrow()
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect()
    }
}

/// Basic input source: three handler lists fired on demand
///
/// Whoever owns the device (or a test) calls `fire`; handlers run in
/// subscription order.
pub struct InputEvents {
    name: String,
    performed: Stream,
    started: Stream,
    cancelled: Stream,
    next_id: Cell<u64>,
}

impl InputEvents {
    /// Create a new set of streams
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            performed: Stream::default(),
            started: Stream::default(),
            cancelled: Stream::default(),
            next_id: Cell::new(0),
        }
    }

    fn stream(&self, kind: ActionKind) -> &Stream {
        match kind {
            ActionKind::Performed => &self.performed,
            ActionKind::Started => &self.started,
            ActionKind::Cancelled => &self.cancelled,
        }
    }

    /// Fire the stream for `kind`
    ///
    /// Handlers subscribed or unsubscribed while firing take effect on the
    /// next call.
    pub fn fire(&self, kind: ActionKind, context: &dyn InputContext) {
        for handler in self.stream(kind).snapshot() {
            handler(context);
        }
    }

    /// Fire the stream for `kind` with a plain value
    pub fn fire_value(&self, kind: ActionKind, value: impl Into<ActionValue>) {
        self.fire(kind, &ValueContext::new(value));
    }

    /// Number of handlers subscribed to a stream
    pub fn handler_count(&self, kind: ActionKind) -> usize {
        self.stream(kind).handlers.borrow().len()
    }

    /// Number of handlers across all three streams
    pub fn total_handlers(&self) -> usize {
        ActionKind::ALL
            .iter()
            .map(|kind| self.handler_count(*kind))
            .sum()
    }
}

impl InputSource for InputEvents {
    fn name(&self) -> &str {
        &self.name
    }

    fn subscribe(&self, kind: ActionKind, handler: InputHandler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.stream(kind).handlers.borrow_mut().push((id, handler));
        id
    }

    fn unsubscribe(&self, kind: ActionKind, id: SubscriptionId) -> bool {
        let mut handlers = self.stream(kind).handlers.borrow_mut();
        match handlers.iter().position(|(existing, _)| *existing == id) {
            Some(index) => {
                handlers.remove(index);
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for InputEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputEvents")
            .field("name", &self.name)
            .field("performed", &self.handler_count(ActionKind::Performed))
            .field("started", &self.handler_count(ActionKind::Started))
            .field("cancelled", &self.handler_count(ActionKind::Cancelled))
            .finish()
    }
}
