// Receiver identity used as the registry key

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_RECEIVER_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identity of something that listens to action channels
///
/// Ids are never reused within a process, so a stale id can't alias a newer
/// receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReceiverId(u64);

impl ReceiverId {
    /// Allocate a fresh, process-unique id
    pub fn new() -> Self {
        Self(NEXT_RECEIVER_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw u64 value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for ReceiverId {
    fn default() -> Self {
        Self::new()
    }
}

/// Marker for objects that can be registered on an action channel
///
/// The channel only ever uses the returned id as a key. Implementors must keep
/// returning the same id for their whole lifetime, and must unregister from
/// every channel before they are dropped: a bridged receiver that is dropped
/// without calling `unregister_to_input` keeps receiving input.
pub trait ActionReceiver {
    fn receiver_id(&self) -> ReceiverId;
}

impl ActionReceiver for ReceiverId {
    fn receiver_id(&self) -> ReceiverId {
        *self
    }
}

impl<T: ActionReceiver + ?Sized> ActionReceiver for &T {
    fn receiver_id(&self) -> ReceiverId {
        (**self).receiver_id()
    }
}

impl<T: ActionReceiver + ?Sized> ActionReceiver for std::rc::Rc<T> {
    fn receiver_id(&self) -> ReceiverId {
        (**self).receiver_id()
    }
}
