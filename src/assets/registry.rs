// Named input sources that channel assets can reference

use crate::input::{InputSource, KeyboardAction};
use std::collections::HashMap;
use std::rc::Rc;
use winit::event::{ElementState, KeyEvent, MouseButton};

/// Input sources by name
///
/// Keyboard actions are also kept in their own list so window events can be
/// forwarded to them.
#[derive(Default)]
pub struct InputSourceRegistry {
    sources: HashMap<String, Rc<dyn InputSource>>,
    keyboard: Vec<Rc<KeyboardAction>>,
}

impl InputSourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source under its own name, replacing any previous one
    pub fn register(&mut self, source: Rc<dyn InputSource>) {
        self.sources.insert(source.name().to_string(), source);
    }

    /// Register a keyboard action
    pub fn register_keyboard(&mut self, action: Rc<KeyboardAction>) {
        let name = action.name().to_string();
        self.keyboard.retain(|existing| existing.name() != name);
        self.keyboard.push(action.clone());
        self.sources.insert(name, action);
    }

    /// Look up a source by name
    pub fn get(&self, name: &str) -> Option<Rc<dyn InputSource>> {
        self.sources.get(name).cloned()
    }

    /// Check if a source is registered
    pub fn contains(&self, name: &str) -> bool {
        self.sources.contains_key(name)
    }

    /// Number of registered sources
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Registered keyboard actions
    pub fn keyboard_actions(&self) -> &[Rc<KeyboardAction>] {
        &self.keyboard
    }

    /// Forward a keyboard event to every keyboard action
    pub fn process_keyboard_event(&self, event: &KeyEvent) {
        for action in &self.keyboard {
            action.process_keyboard_event(event);
        }
    }

    /// Forward a mouse button event to every keyboard action
    pub fn process_mouse_event(&self, button: MouseButton, state: ElementState) {
        for action in &self.keyboard {
            action.process_mouse_event(button, state);
        }
    }

    /// Drop held state on every keyboard action (e.g. when the window loses focus)
    pub fn reset_keyboard(&self) {
        for action in &self.keyboard {
            action.reset();
        }
    }
}
