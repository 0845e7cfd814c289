// Keyboard/mouse driven input source

use super::events::InputEvents;
use super::{InputHandler, InputSource, SubscriptionId};
use crate::channel::{ActionKind, ActionValue};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashSet;
use winit::event::{ElementState, KeyEvent, MouseButton};
use winit::keyboard::{KeyCode, PhysicalKey};

/// A physical control that can drive a keyboard action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyBinding {
    Keyboard(KeyCode),
    Mouse(MouseButton),
}

impl KeyBinding {
    /// Create a keyboard binding
    pub fn key(code: KeyCode) -> Self {
        Self::Keyboard(code)
    }

    /// Create a mouse button binding
    pub fn mouse(button: MouseButton) -> Self {
        Self::Mouse(button)
    }
}

/// Button-style input source fed by winit events
///
/// Any number of bindings drive one logical button. The first press fires
/// Started then Performed with `Button(true)`; releasing the last held binding
/// fires Cancelled with `Button(false)`. Key repeats are ignored.
pub struct KeyboardAction {
    events: InputEvents,
    bindings: HashSet<KeyBinding>,
    held: RefCell<HashSet<KeyBinding>>,
}

impl KeyboardAction {
    /// Create an action with no bindings
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            events: InputEvents::new(name),
            bindings: HashSet::new(),
            held: RefCell::new(HashSet::new()),
        }
    }

    /// Create an action from a list of bindings
    pub fn from_bindings(name: impl Into<String>, bindings: Vec<KeyBinding>) -> Self {
        let mut action = Self::new(name);
        for binding in bindings {
            action.bind(binding);
        }
        action
    }

    /// Add a binding
    pub fn bind(&mut self, binding: KeyBinding) {
        self.bindings.insert(binding);
    }

    /// Remove a binding, releasing it if it was held
    pub fn unbind(&mut self, binding: KeyBinding) {
        self.bindings.remove(&binding);
        self.process(binding, ElementState::Released, false);
    }

    /// Check if a binding drives this action
    pub fn is_bound(&self, binding: KeyBinding) -> bool {
        self.bindings.contains(&binding)
    }

    /// Check if any binding is currently held
    pub fn is_pressed(&self) -> bool {
        !self.held.borrow().is_empty()
    }

    /// Process a keyboard event from winit
    pub fn process_keyboard_event(&self, event: &KeyEvent) {
        // Only process physical key presses
        if let PhysicalKey::Code(key_code) = event.physical_key {
            self.process(KeyBinding::key(key_code), event.state, event.repeat);
        }
    }

    /// Process a mouse button event from winit
    pub fn process_mouse_event(&self, button: MouseButton, state: ElementState) {
        self.process(KeyBinding::mouse(button), state, false);
    }

    /// Apply a press/release of one binding
    pub fn process(&self, binding: KeyBinding, state: ElementState, repeat: bool) {
        if repeat || (state == ElementState::Pressed && !self.bindings.contains(&binding)) {
            return;
        }

        // Update held state before firing so handlers observe it
        let edge = {
            let mut held = self.held.borrow_mut();
            match state {
                ElementState::Pressed => held.insert(binding) && held.len() == 1,
                ElementState::Released => held.remove(&binding) && held.is_empty(),
            }
        };

        if !edge {
            return;
        }

        match state {
            ElementState::Pressed => {
                self.events
                    .fire_value(ActionKind::Started, ActionValue::Button(true));
                self.events
                    .fire_value(ActionKind::Performed, ActionValue::Button(true));
            }
            ElementState::Released => {
                self.events
                    .fire_value(ActionKind::Cancelled, ActionValue::Button(false));
            }
        }
    }

    /// Drop held state without firing (e.g. on focus loss)
    pub fn reset(&self) {
        self.held.borrow_mut().clear();
    }

    /// Underlying streams
    pub fn events(&self) -> &InputEvents {
        &self.events
    }
}

impl InputSource for KeyboardAction {
    fn name(&self) -> &str {
        self.events.name()
    }

    fn subscribe(&self, kind: ActionKind, handler: InputHandler) -> SubscriptionId {
        self.events.subscribe(kind, handler)
    }

    fn unsubscribe(&self, kind: ActionKind, id: SubscriptionId) -> bool {
        self.events.unsubscribe(kind, id)
    }
}
