// Per-receiver callback chains

use super::bridge::BridgeSubscription;
use super::kind::ActionKind;
use super::value::ActionValue;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Shared handle to a listener callback
///
/// Clones of one handle are the same callback instance: removing any clone
/// removes a registration made with another. Two handles built from separate
/// `new` calls are always distinct, even when built from the same closure.
#[derive(Clone)]
pub struct ActionCallback(Rc<dyn Fn(&ActionValue)>);

impl ActionCallback {
    /// Wrap a closure
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&ActionValue) + 'static,
    {
        Self(Rc::new(callback))
    }

    /// Call the wrapped closure
    pub fn call(&self, value: &ActionValue) {
        (self.0)(value)
    }

    /// Whether both handles point at the same callback instance
    pub fn same_as(&self, other: &ActionCallback) -> bool {
        // Compare data addresses only; vtable pointers are not stable
        std::ptr::eq(
            Rc::as_ptr(&self.0) as *const (),
            Rc::as_ptr(&other.0) as *const (),
        )
    }
}

impl fmt::Debug for ActionCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ActionCallback")
            .field(&(Rc::as_ptr(&self.0) as *const ()))
            .finish()
    }
}

/// Ordered list of callbacks for one kind
///
/// An empty chain behaves exactly like a missing one.
#[derive(Debug, Default)]
pub struct CallbackChain {
    callbacks: RefCell<Vec<ActionCallback>>,
}

impl CallbackChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a callback; duplicates are kept
    pub fn push(&self, callback: ActionCallback) {
        self.callbacks.borrow_mut().push(callback);
    }

    /// Remove the most recent registration of `callback`
    /// Returns true if a registration was removed
    pub fn remove_last(&self, callback: &ActionCallback) -> bool {
        let mut callbacks = self.callbacks.borrow_mut();
        match callbacks.iter().rposition(|c| c.same_as(callback)) {
            Some(index) => {
                callbacks.remove(index);
                true
            }
            None => false,
        }
    }

    /// Call every callback in registration order
    ///
    /// Iterates over the callbacks registered when the call started, so
    /// callbacks may add or remove listeners on this chain without affecting
    /// the current pass.
    pub fn invoke(&self, value: &ActionValue) {
        let snapshot = self.callbacks.borrow().clone();
        for callback in &snapshot {
            callback.call(value);
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.callbacks.borrow_mut().clear();
    }
}

/// The three callback chains owned by one receiver on one channel
#[derive(Debug, Default)]
pub struct ListenerSet {
    performed: CallbackChain,
    started: CallbackChain,
    cancelled: CallbackChain,

    /// Input subscriptions made by `register_to_input`, if registered
    bridge: RefCell<Option<BridgeSubscription>>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the chain for a kind
    pub fn chain(&self, kind: ActionKind) -> &CallbackChain {
        match kind {
            ActionKind::Performed => &self.performed,
            ActionKind::Started => &self.started,
            ActionKind::Cancelled => &self.cancelled,
        }
    }

    /// Forward a value to the chain for `kind`
    /// Manual invocation and input dispatch both end up here
    pub fn dispatch(&self, kind: ActionKind, value: &ActionValue) {
        self.chain(kind).invoke(value);
    }

    /// Check if no callbacks are registered for any kind
    pub fn is_empty(&self) -> bool {
        ActionKind::ALL.iter().all(|kind| self.chain(*kind).is_empty())
    }

    /// Check if this receiver is currently bridged to an input source
    pub fn is_bridged(&self) -> bool {
        self.bridge.borrow().is_some()
    }

    pub(crate) fn set_bridge(&self, subscription: BridgeSubscription) {
        *self.bridge.borrow_mut() = Some(subscription);
    }

    pub(crate) fn take_bridge(&self) -> Option<BridgeSubscription> {
        self.bridge.borrow_mut().take()
    }

    /// Remove every callback (bridge state is left untouched)
    pub fn clear(&self) {
        for kind in ActionKind::ALL {
            self.chain(kind).clear();
        }
    }
}
