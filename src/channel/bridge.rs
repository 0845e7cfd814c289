// Glue between an input source's raw streams and a receiver's callback chains

use super::kind::ActionKind;
use super::listener::ListenerSet;
use crate::input::{InputContext, InputHandler, InputSource, SubscriptionId};
use std::rc::Rc;

/// Which optional streams a channel forwards
///
/// Performed is always forwarded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BridgeFlags {
    pub started: bool,
    pub cancelled: bool,
}

impl BridgeFlags {
    pub fn new(started: bool, cancelled: bool) -> Self {
        Self { started, cancelled }
    }

    /// Check if a stream should be forwarded
    pub fn includes(&self, kind: ActionKind) -> bool {
        match kind {
            ActionKind::Performed => true,
            ActionKind::Started => self.started,
            ActionKind::Cancelled => self.cancelled,
        }
    }
}

/// Subscriptions made on behalf of one receiver
///
/// Detaching removes exactly what was attached, independent of the flags at
/// detach time.
#[derive(Debug)]
pub struct BridgeSubscription {
    subscriptions: Vec<(ActionKind, SubscriptionId)>,
}

impl BridgeSubscription {
    /// Kinds this subscription forwards
    pub fn kinds(&self) -> impl Iterator<Item = ActionKind> + '_ {
        self.subscriptions.iter().map(|(kind, _)| *kind)
    }

    /// Unsubscribe from every stream
    /// Returns the number of subscriptions the source actually removed
    pub fn detach(self, source: &dyn InputSource) -> usize {
        self.subscriptions
            .into_iter()
            .filter(|(kind, id)| source.unsubscribe(*kind, *id))
            .count()
    }
}

/// Subscribe dispatchers for `listeners` to the streams selected by `flags`
pub fn attach(
    listeners: &Rc<ListenerSet>,
    source: &dyn InputSource,
    flags: BridgeFlags,
) -> BridgeSubscription {
    let subscriptions = ActionKind::ALL
        .into_iter()
        .filter(|kind| flags.includes(*kind))
        .map(|kind| (kind, source.subscribe(kind, dispatcher(listeners, kind))))
        .collect();

    BridgeSubscription { subscriptions }
}

/// Build the handler that forwards one stream into one chain
fn dispatcher(listeners: &Rc<ListenerSet>, kind: ActionKind) -> InputHandler {
    let listeners = listeners.clone();
    Rc::new(move |context: &dyn InputContext| {
        let value = context.read_value();
        listeners.dispatch(kind, &value);
    })
}
