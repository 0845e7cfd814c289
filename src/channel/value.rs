// Payload carried from an input source to action callbacks

use glam::Vec2;
use std::any::Any;
use std::rc::Rc;

/// Value delivered to every callback of a dispatch pass
///
/// The channel never inspects the value; it only forwards it.
#[derive(Debug, Clone, Default)]
pub enum ActionValue {
    /// No payload (manual invocations default to this)
    #[default]
    None,
    /// Digital button state
    Button(bool),
    /// One-dimensional axis
    Axis(f32),
    /// Two-dimensional stick or composite
    Vector2(Vec2),
    /// Anything else the input source wants to hand over
    Custom(Rc<dyn Any>),
}

impl ActionValue {
    /// Wrap an arbitrary value
    pub fn custom<T: Any>(value: T) -> Self {
        Self::Custom(Rc::new(value))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, ActionValue::None)
    }

    pub fn as_button(&self) -> Option<bool> {
        match self {
            ActionValue::Button(pressed) => Some(*pressed),
            _ => None,
        }
    }

    pub fn as_axis(&self) -> Option<f32> {
        match self {
            ActionValue::Axis(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_vector2(&self) -> Option<Vec2> {
        match self {
            ActionValue::Vector2(value) => Some(*value),
            _ => None,
        }
    }

    /// Downcast a custom payload
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            ActionValue::Custom(value) => value.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl PartialEq for ActionValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ActionValue::None, ActionValue::None) => true,
            (ActionValue::Button(a), ActionValue::Button(b)) => a == b,
            (ActionValue::Axis(a), ActionValue::Axis(b)) => a == b,
            (ActionValue::Vector2(a), ActionValue::Vector2(b)) => a == b,
            // Custom payloads compare by identity
            (ActionValue::Custom(a), ActionValue::Custom(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for ActionValue {
    fn from(pressed: bool) -> Self {
        Self::Button(pressed)
    }
}

impl From<f32> for ActionValue {
    fn from(value: f32) -> Self {
        Self::Axis(value)
    }
}

impl From<Vec2> for ActionValue {
    fn from(value: Vec2) -> Self {
        Self::Vector2(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_is_none() {
        assert!(ActionValue::default().is_none());
    }

    #[test]
    fn test_accessors() {
        assert_eq!(ActionValue::from(true).as_button(), Some(true));
        assert_relative_eq!(ActionValue::from(0.25f32).as_axis().unwrap(), 0.25);
        assert_eq!(ActionValue::Button(false).as_axis(), None);

        let stick = ActionValue::from(Vec2::new(0.5, -1.0)).as_vector2().unwrap();
        assert_relative_eq!(stick.x, 0.5);
        assert_relative_eq!(stick.y, -1.0);
    }

    #[test]
    fn test_custom_downcast() {
        let value = ActionValue::custom(String::from("combo"));
        assert_eq!(value.downcast_ref::<String>().map(String::as_str), Some("combo"));
        assert!(value.downcast_ref::<u32>().is_none());
    }

    #[test]
    fn test_custom_equality_is_identity() {
        let a = ActionValue::custom(1u32);
        let b = ActionValue::custom(1u32);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }
}
