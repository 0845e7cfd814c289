// Action channel: a named listener registry bound to one input

use super::bridge::{self, BridgeFlags};
use super::kind::{ActionKind, RawKind};
use super::listener::{ActionCallback, ListenerSet};
use super::receiver::{ActionReceiver, ReceiverId};
use super::value::ActionValue;
use super::ChannelError;
use crate::input::InputSource;
use log::{debug, error, warn};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Configuration fields of a channel
///
/// Only read at runtime; change them through `ActionChannel::configure`
/// while no receiver is registered to input.
#[derive(Clone, Default)]
pub struct ChannelSettings {
    /// Free text for designers, never read by the channel
    pub description: String,

    /// Where `register_to_input` subscribes; without one only manual
    /// invocation is possible
    pub input_source: Option<Rc<dyn InputSource>>,

    /// Also forward the Started stream
    pub register_started: bool,

    /// Also forward the Cancelled stream
    pub register_cancelled: bool,
}

impl ChannelSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_input_source(mut self, source: Rc<dyn InputSource>) -> Self {
        self.input_source = Some(source);
        self
    }

    pub fn with_started(mut self, register_started: bool) -> Self {
        self.register_started = register_started;
        self
    }

    pub fn with_cancelled(mut self, register_cancelled: bool) -> Self {
        self.register_cancelled = register_cancelled;
        self
    }

    fn bridge_flags(&self) -> BridgeFlags {
        BridgeFlags::new(self.register_started, self.register_cancelled)
    }
}

impl fmt::Debug for ChannelSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelSettings")
            .field("description", &self.description)
            .field(
                "input_source",
                &self.input_source.as_ref().map(|source| source.name().to_string()),
            )
            .field("register_started", &self.register_started)
            .field("register_cancelled", &self.register_cancelled)
            .finish()
    }
}

/// Named event channel that any number of receivers can listen to
///
/// Each receiver gets its own Performed/Started/Cancelled callback chains.
/// Entries are created on first use and only go away with `clear`.
///
/// Receivers must call `unregister_to_input` (and remove their listeners)
/// before they are destroyed; the channel never checks whether a receiver
/// is still alive.
///
/// Every operation takes `&self`, so callbacks may call back into the channel
/// while it is dispatching.
pub struct ActionChannel {
    name: String,
    settings: RefCell<ChannelSettings>,
    listeners: RefCell<HashMap<ReceiverId, Rc<ListenerSet>>>,
}

impl ActionChannel {
    /// Create a channel with no input source
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_settings(name, ChannelSettings::default())
    }

    /// Create a channel with the given configuration
    pub fn with_settings(name: impl Into<String>, settings: ChannelSettings) -> Self {
        Self {
            name: name.into(),
            settings: RefCell::new(settings),
            listeners: RefCell::new(HashMap::new()),
        }
    }

    /// Get the channel name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the designer description
    pub fn description(&self) -> String {
        self.settings.borrow().description.clone()
    }

    /// Get a copy of the current configuration
    pub fn settings(&self) -> ChannelSettings {
        self.settings.borrow().clone()
    }

    /// Check if an input source is bound
    pub fn has_input_source(&self) -> bool {
        self.settings.borrow().input_source.is_some()
    }

    /// Replace the configuration
    ///
    /// Fails while any receiver is registered to input, since its
    /// subscriptions belong to the current source.
    pub fn configure(&self, settings: ChannelSettings) -> Result<(), ChannelError> {
        let bridged = self
            .listeners
            .borrow()
            .values()
            .any(|listeners| listeners.is_bridged());
        if bridged {
            return Err(ChannelError::ConfigLocked {
                channel: self.name.clone(),
            });
        }

        *self.settings.borrow_mut() = settings;
        Ok(())
    }

    /// Get a receiver's listener set, if it has one
    fn listeners_of(&self, receiver: ReceiverId) -> Option<Rc<ListenerSet>> {
        self.listeners.borrow().get(&receiver).cloned()
    }

    /// Get a receiver's listener set, creating it on first use
    fn listeners_or_insert(&self, receiver: ReceiverId) -> Rc<ListenerSet> {
        self.listeners
            .borrow_mut()
            .entry(receiver)
            .or_default()
            .clone()
    }

    fn input_source(&self) -> Result<Rc<dyn InputSource>, ChannelError> {
        self.settings
            .borrow()
            .input_source
            .clone()
            .ok_or_else(|| ChannelError::NoInputSource {
                channel: self.name.clone(),
            })
    }

    /// Add a callback to a receiver's chain for `kind`
    ///
    /// Adding the same callback twice registers it twice.
    pub fn add_listener(
        &self,
        receiver: impl ActionReceiver,
        callback: ActionCallback,
        kind: ActionKind,
    ) {
        self.listeners_or_insert(receiver.receiver_id())
            .chain(kind)
            .push(callback);
    }

    /// Remove the most recent registration of `callback` from a receiver's chain
    ///
    /// Unknown receivers and callbacks are ignored. Returns true if a
    /// registration was removed.
    pub fn remove_listener(
        &self,
        receiver: impl ActionReceiver,
        callback: &ActionCallback,
        kind: ActionKind,
    ) -> bool {
        match self.listeners_of(receiver.receiver_id()) {
            Some(listeners) => listeners.chain(kind).remove_last(callback),
            None => false,
        }
    }

    /// Call a receiver's callbacks for `kind` with `value`
    ///
    /// Input dispatch goes through the same path, so this can be used to
    /// simulate input. Callbacks run in registration order over the chain as it
    /// was when the call started.
    pub fn invoke(
        &self,
        receiver: impl ActionReceiver,
        value: impl Into<ActionValue>,
        kind: ActionKind,
    ) {
        // Release the registry borrow before running user code
        let Some(listeners) = self.listeners_of(receiver.receiver_id()) else {
            return;
        };
        listeners.dispatch(kind, &value.into());
    }

    /// Resolve an untyped kind, logging instead of failing
    fn resolve_kind(&self, operation: &str, raw: RawKind<'_>) -> Option<ActionKind> {
        match ActionKind::try_from(raw) {
            Ok(kind) => Some(kind),
            Err(_) => {
                error!(
                    "Action channel '{}': {} was passed an unknown action kind {}, ignoring",
                    self.name, operation, raw
                );
                None
            }
        }
    }

    /// `add_listener` with an untyped kind; unknown kinds are logged and ignored
    pub fn add_listener_raw<'a>(
        &self,
        receiver: impl ActionReceiver,
        callback: ActionCallback,
        raw: impl Into<RawKind<'a>>,
    ) {
        if let Some(kind) = self.resolve_kind("add_listener", raw.into()) {
            self.add_listener(receiver, callback, kind);
        }
    }

    /// `remove_listener` with an untyped kind; unknown kinds are logged and ignored
    pub fn remove_listener_raw<'a>(
        &self,
        receiver: impl ActionReceiver,
        callback: &ActionCallback,
        raw: impl Into<RawKind<'a>>,
    ) -> bool {
        match self.resolve_kind("remove_listener", raw.into()) {
            Some(kind) => self.remove_listener(receiver, callback, kind),
            None => false,
        }
    }

    /// `invoke` with an untyped kind; unknown kinds are logged and ignored
    pub fn invoke_raw<'a>(
        &self,
        receiver: impl ActionReceiver,
        value: impl Into<ActionValue>,
        raw: impl Into<RawKind<'a>>,
    ) {
        if let Some(kind) = self.resolve_kind("invoke", raw.into()) {
            self.invoke(receiver, value, kind);
        }
    }

    /// Forward the input source's streams to a receiver's chains
    ///
    /// Performed is always forwarded; Started and Cancelled only when enabled in
    /// the settings. Registering an already registered receiver does nothing.
    pub fn register_to_input(&self, receiver: impl ActionReceiver) -> Result<(), ChannelError> {
        let source = self.input_source()?;
        let receiver = receiver.receiver_id();
        let listeners = self.listeners_or_insert(receiver);

        if listeners.is_bridged() {
            warn!(
                "Action channel '{}': receiver {} is already registered to '{}'",
                self.name,
                receiver.as_u64(),
                source.name()
            );
            return Ok(());
        }

        let flags = self.settings.borrow().bridge_flags();
        let subscription = bridge::attach(&listeners, source.as_ref(), flags);
        listeners.set_bridge(subscription);

        debug!(
            "Action channel '{}': receiver {} registered to '{}' ({:?})",
            self.name,
            receiver.as_u64(),
            source.name(),
            flags
        );
        Ok(())
    }

    /// Undo `register_to_input`
    ///
    /// Receivers that never registered are ignored.
    pub fn unregister_to_input(&self, receiver: impl ActionReceiver) -> Result<(), ChannelError> {
        let source = self.input_source()?;
        let receiver = receiver.receiver_id();

        let Some(listeners) = self.listeners_of(receiver) else {
            return Ok(());
        };

        if let Some(subscription) = listeners.take_bridge() {
            let removed = subscription.detach(source.as_ref());
            debug!(
                "Action channel '{}': receiver {} unregistered from '{}' ({} streams)",
                self.name,
                receiver.as_u64(),
                source.name(),
                removed
            );
        }
        Ok(())
    }

    /// Check if a receiver is registered to input
    pub fn is_registered_to_input(&self, receiver: impl ActionReceiver) -> bool {
        self.listeners_of(receiver.receiver_id())
            .is_some_and(|listeners| listeners.is_bridged())
    }

    /// Check if a receiver has any callbacks
    pub fn has_listeners(&self, receiver: impl ActionReceiver) -> bool {
        self.listeners_of(receiver.receiver_id())
            .is_some_and(|listeners| !listeners.is_empty())
    }

    /// Number of registrations in a receiver's chain for `kind`
    pub fn listener_count(&self, receiver: impl ActionReceiver, kind: ActionKind) -> usize {
        self.listeners_of(receiver.receiver_id())
            .map_or(0, |listeners| listeners.chain(kind).len())
    }

    /// Number of receivers with a registry entry (including empty ones)
    pub fn receiver_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Tear down the channel: detach every input subscription and drop all entries
    pub fn clear(&self) {
        let listeners = std::mem::take(&mut *self.listeners.borrow_mut());
        let source = self.settings.borrow().input_source.clone();

        for (receiver, set) in listeners {
            let Some(subscription) = set.take_bridge() else {
                continue;
            };
            match &source {
                Some(source) => {
                    subscription.detach(source.as_ref());
                }
                None => warn!(
                    "Action channel '{}': receiver {} was registered without an input source",
                    self.name,
                    receiver.as_u64()
                ),
            }
        }
    }
}

impl Drop for ActionChannel {
    fn drop(&mut self) {
        self.clear();
    }
}

impl fmt::Debug for ActionChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionChannel")
            .field("name", &self.name)
            .field("settings", &*self.settings.borrow())
            .field("receivers", &self.receiver_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputEvents;
    use std::cell::Cell;

    fn counter() -> (Rc<Cell<u32>>, ActionCallback) {
        let count = Rc::new(Cell::new(0));
        let inner = count.clone();
        let callback = ActionCallback::new(move |_| inner.set(inner.get() + 1));
        (count, callback)
    }

    fn bridged_channel(started: bool, cancelled: bool) -> (Rc<InputEvents>, ActionChannel) {
        let events = Rc::new(InputEvents::new("jump"));
        let settings = ChannelSettings::new()
            .with_input_source(events.clone())
            .with_started(started)
            .with_cancelled(cancelled);
        (events, ActionChannel::with_settings("Jump", settings))
    }

    #[test]
    fn test_invoke_reaches_listener_with_value() {
        let channel = ActionChannel::new("Jump");
        let receiver = ReceiverId::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let inner = seen.clone();

        // Nothing registered yet
        channel.invoke(receiver, 1.0f32, ActionKind::Performed);

        channel.add_listener(
            receiver,
            ActionCallback::new(move |value| inner.borrow_mut().push(value.clone())),
            ActionKind::Performed,
        );
        channel.invoke(receiver, 1.0f32, ActionKind::Performed);

        assert_eq!(*seen.borrow(), vec![ActionValue::Axis(1.0)]);
    }

    #[test]
    fn test_remove_after_add_yields_no_calls() {
        let channel = ActionChannel::new("Jump");
        let receiver = ReceiverId::new();
        let (count, callback) = counter();

        for kind in ActionKind::ALL {
            channel.add_listener(receiver, callback.clone(), kind);
            assert!(channel.remove_listener(receiver, &callback, kind));
            channel.invoke(receiver, ActionValue::None, kind);
        }

        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_kinds_are_independent() {
        let channel = ActionChannel::new("Jump");
        let receiver = ReceiverId::new();
        let (count, callback) = counter();

        channel.add_listener(receiver, callback, ActionKind::Started);
        channel.invoke(receiver, ActionValue::None, ActionKind::Performed);
        channel.invoke(receiver, ActionValue::None, ActionKind::Cancelled);
        assert_eq!(count.get(), 0);

        channel.invoke(receiver, ActionValue::None, ActionKind::Started);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_receivers_are_independent() {
        let channel = ActionChannel::new("Jump");
        let first = ReceiverId::new();
        let second = ReceiverId::new();
        let (count, callback) = counter();

        channel.add_listener(first, callback.clone(), ActionKind::Performed);
        channel.invoke(second, ActionValue::None, ActionKind::Performed);
        assert_eq!(count.get(), 0);

        // Removing through the wrong receiver leaves the registration alone
        assert!(!channel.remove_listener(second, &callback, ActionKind::Performed));
        channel.invoke(first, ActionValue::None, ActionKind::Performed);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_duplicate_registrations() {
        let channel = ActionChannel::new("Jump");
        let receiver = ReceiverId::new();
        let (count, callback) = counter();

        channel.add_listener(receiver, callback.clone(), ActionKind::Performed);
        channel.add_listener(receiver, callback.clone(), ActionKind::Performed);
        channel.invoke(receiver, ActionValue::None, ActionKind::Performed);
        assert_eq!(count.get(), 2);

        channel.remove_listener(receiver, &callback, ActionKind::Performed);
        channel.invoke(receiver, ActionValue::None, ActionKind::Performed);
        assert_eq!(count.get(), 3);
        assert_eq!(channel.listener_count(receiver, ActionKind::Performed), 1);
    }

    #[test]
    fn test_unknown_receiver_is_noop() {
        let (events, channel) = bridged_channel(true, true);
        let receiver = ReceiverId::new();
        let (count, callback) = counter();

        assert!(!channel.remove_listener(receiver, &callback, ActionKind::Performed));
        channel.invoke(receiver, ActionValue::None, ActionKind::Performed);
        assert!(channel.unregister_to_input(receiver).is_ok());

        assert_eq!(count.get(), 0);
        assert_eq!(channel.receiver_count(), 0);
        assert_eq!(events.total_handlers(), 0);
    }

    #[test]
    fn test_raw_kind_out_of_range_is_ignored() {
        let channel = ActionChannel::new("Jump");
        let receiver = ReceiverId::new();
        let (count, callback) = counter();

        channel.add_listener_raw(receiver, callback.clone(), 9u8);
        assert!(!channel.has_listeners(receiver));

        channel.add_listener_raw(receiver, callback.clone(), 1u8);
        channel.invoke_raw(receiver, ActionValue::None, 42u8);
        assert!(!channel.remove_listener_raw(receiver, &callback, 3u8));
        assert_eq!(count.get(), 0);

        channel.invoke_raw(receiver, ActionValue::None, 1u8);
        assert_eq!(count.get(), 1);
        assert!(channel.remove_listener_raw(receiver, &callback, 1u8));
    }

    #[test]
    fn test_raw_kind_unknown_name_is_ignored() {
        let channel = ActionChannel::new("Jump");
        let receiver = ReceiverId::new();
        let (count, callback) = counter();

        channel.add_listener_raw(receiver, callback.clone(), "cancled");
        assert!(!channel.has_listeners(receiver));

        channel.add_listener_raw(receiver, callback.clone(), "cancelled");
        channel.invoke_raw(receiver, ActionValue::None, "Cancelled");
        assert!(!channel.remove_listener_raw(receiver, &callback, "canceled"));
        assert_eq!(count.get(), 0);

        channel.invoke_raw(receiver, ActionValue::None, 2u8);
        assert_eq!(count.get(), 1);
        assert!(channel.remove_listener_raw(receiver, &callback, "cancelled"));
        assert_eq!(channel.listener_count(receiver, ActionKind::Cancelled), 0);
    }

    #[test]
    fn test_register_without_input_source_fails() {
        let channel = ActionChannel::new("Jump");
        let receiver = ReceiverId::new();

        let err = channel.register_to_input(receiver).unwrap_err();
        assert!(matches!(
            err,
            ChannelError::NoInputSource { ref channel } if channel == "Jump"
        ));
        assert!(channel.unregister_to_input(receiver).is_err());
    }

    #[test]
    fn test_bridge_flags_gate_started_and_cancelled() {
        let (events, channel) = bridged_channel(false, false);
        let receiver = ReceiverId::new();
        let (performed, on_performed) = counter();
        let (others, on_other) = counter();

        channel.add_listener(receiver, on_performed, ActionKind::Performed);
        channel.add_listener(receiver, on_other.clone(), ActionKind::Started);
        channel.add_listener(receiver, on_other, ActionKind::Cancelled);
        channel.register_to_input(receiver).unwrap();

        events.fire_value(ActionKind::Started, true);
        events.fire_value(ActionKind::Cancelled, false);
        assert_eq!(others.get(), 0);

        events.fire_value(ActionKind::Performed, true);
        assert_eq!(performed.get(), 1);
    }

    #[test]
    fn test_bridge_forwards_enabled_streams() {
        let (events, channel) = bridged_channel(true, true);
        let receiver = ReceiverId::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        for kind in ActionKind::ALL {
            let inner = seen.clone();
            channel.add_listener(
                receiver,
                ActionCallback::new(move |value| {
                    inner.borrow_mut().push((kind, value.clone()))
                }),
                kind,
            );
        }
        channel.register_to_input(receiver).unwrap();

        events.fire_value(ActionKind::Started, true);
        events.fire_value(ActionKind::Performed, true);
        events.fire_value(ActionKind::Cancelled, false);

        assert_eq!(
            *seen.borrow(),
            vec![
                (ActionKind::Started, ActionValue::Button(true)),
                (ActionKind::Performed, ActionValue::Button(true)),
                (ActionKind::Cancelled, ActionValue::Button(false)),
            ]
        );
    }

    #[test]
    fn test_unregister_reverses_register() {
        let (events, channel) = bridged_channel(true, true);
        let receiver = ReceiverId::new();
        let (count, callback) = counter();

        for kind in ActionKind::ALL {
            channel.add_listener(receiver, callback.clone(), kind);
        }
        channel.register_to_input(receiver).unwrap();
        assert!(channel.is_registered_to_input(receiver));
        channel.unregister_to_input(receiver).unwrap();

        for kind in ActionKind::ALL {
            events.fire_value(kind, true);
        }
        assert_eq!(count.get(), 0);
        assert_eq!(events.total_handlers(), 0);
        assert!(!channel.is_registered_to_input(receiver));

        // Listeners survive unregistration and still answer manual invocation
        channel.invoke(receiver, ActionValue::None, ActionKind::Started);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_register_creates_entry() {
        let (_events, channel) = bridged_channel(false, false);
        let receiver = ReceiverId::new();

        channel.register_to_input(receiver).unwrap();
        assert_eq!(channel.receiver_count(), 1);
        assert!(!channel.has_listeners(receiver));
    }

    #[test]
    fn test_register_twice_is_idempotent() {
        let (events, channel) = bridged_channel(true, false);
        let receiver = ReceiverId::new();
        let (count, callback) = counter();

        channel.add_listener(receiver, callback, ActionKind::Performed);
        channel.register_to_input(receiver).unwrap();
        channel.register_to_input(receiver).unwrap();
        assert_eq!(events.total_handlers(), 2);

        events.fire_value(ActionKind::Performed, true);
        assert_eq!(count.get(), 1);

        channel.unregister_to_input(receiver).unwrap();
        assert_eq!(events.total_handlers(), 0);
    }

    #[test]
    fn test_manual_invoke_matches_input_dispatch() {
        let (events, channel) = bridged_channel(false, false);
        let receiver = ReceiverId::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let inner = seen.clone();

        channel.add_listener(
            receiver,
            ActionCallback::new(move |value| inner.borrow_mut().push(value.clone())),
            ActionKind::Performed,
        );
        channel.register_to_input(receiver).unwrap();

        events.fire_value(ActionKind::Performed, 0.5f32);
        channel.invoke(receiver, 0.5f32, ActionKind::Performed);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], seen[1]);
    }

    #[test]
    fn test_callback_removing_itself_during_invoke() {
        let channel = Rc::new(ActionChannel::new("Jump"));
        let receiver = ReceiverId::new();
        let count = Rc::new(Cell::new(0));
        let (after, trailing) = counter();

        let slot: Rc<RefCell<Option<ActionCallback>>> = Rc::new(RefCell::new(None));
        let callback = {
            let channel = Rc::downgrade(&channel);
            let slot = slot.clone();
            let count = count.clone();
            ActionCallback::new(move |_| {
                count.set(count.get() + 1);
                if let (Some(channel), Some(me)) = (channel.upgrade(), slot.borrow().as_ref()) {
                    channel.remove_listener(receiver, me, ActionKind::Performed);
                }
            })
        };
        *slot.borrow_mut() = Some(callback.clone());

        channel.add_listener(receiver, callback, ActionKind::Performed);
        channel.add_listener(receiver, trailing, ActionKind::Performed);

        // The pass in progress still reaches every callback
        channel.invoke(receiver, ActionValue::None, ActionKind::Performed);
        assert_eq!(count.get(), 1);
        assert_eq!(after.get(), 1);

        channel.invoke(receiver, ActionValue::None, ActionKind::Performed);
        assert_eq!(count.get(), 1);
        assert_eq!(after.get(), 2);
    }

    #[test]
    fn test_configure_locked_while_registered() {
        let (_events, channel) = bridged_channel(false, false);
        let receiver = ReceiverId::new();
        channel.register_to_input(receiver).unwrap();

        let err = channel.configure(ChannelSettings::new()).unwrap_err();
        assert!(matches!(err, ChannelError::ConfigLocked { .. }));

        channel.unregister_to_input(receiver).unwrap();
        channel
            .configure(ChannelSettings::new().with_description("jump button"))
            .unwrap();
        assert_eq!(channel.description(), "jump button");
        assert!(!channel.has_input_source());
    }

    #[test]
    fn test_clear_detaches_everything() {
        let (events, channel) = bridged_channel(true, true);
        let first = ReceiverId::new();
        let second = ReceiverId::new();
        let (count, callback) = counter();

        channel.add_listener(first, callback.clone(), ActionKind::Performed);
        channel.add_listener(second, callback, ActionKind::Performed);
        channel.register_to_input(first).unwrap();
        channel.register_to_input(second).unwrap();
        assert_eq!(events.total_handlers(), 6);

        channel.clear();
        assert_eq!(events.total_handlers(), 0);
        assert_eq!(channel.receiver_count(), 0);

        events.fire_value(ActionKind::Performed, true);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_drop_detaches_from_input() {
        let (events, channel) = bridged_channel(true, true);
        channel.register_to_input(ReceiverId::new()).unwrap();
        assert_eq!(events.total_handlers(), 3);

        drop(channel);
        assert_eq!(events.total_handlers(), 0);
    }
}
