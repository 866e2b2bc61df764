//! Pointer state and notification payloads.

use std::fmt;

/// Which mouse button an event concerns.
///
/// `Unselected` is the neutral value carried by pointer-move notifications
/// and by a freshly created [`PointerState`].  Injection requests made with
/// `Unselected` are rejected by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ButtonKind {
    #[default]
    Unselected,
    Left,
    Right,
}

impl ButtonKind {
    /// Returns `true` for [`ButtonKind::Left`] and [`ButtonKind::Right`].
    pub fn is_selected(self) -> bool {
        !matches!(self, ButtonKind::Unselected)
    }
}

impl fmt::Display for ButtonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ButtonKind::Unselected => "unselected",
            ButtonKind::Left => "left",
            ButtonKind::Right => "right",
        };
        f.write_str(name)
    }
}

/// Last known (or last simulated) cursor position and the last button
/// involved in an injection.
///
/// One instance is owned by each `InputInjector` and only mutated while its
/// exclusivity lock is held.  Readers get copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerState {
    pub x: i32,
    pub y: i32,
    pub button: ButtonKind,
}

impl PointerState {
    pub fn new(x: i32, y: i32, button: ButtonKind) -> Self {
        Self { x, y, button }
    }

    /// Builds the notification describing this state.
    pub fn to_notification(self) -> InputNotification {
        InputNotification {
            position_x: self.x,
            position_y: self.y,
            button: self.button,
        }
    }
}

/// Payload delivered to pointer subscribers.
///
/// Constructed fresh for every event; handlers receive a reference to a
/// value nobody else can mutate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputNotification {
    pub position_x: i32,
    pub position_y: i32,
    pub button: ButtonKind,
}

impl InputNotification {
    pub fn new(position_x: i32, position_y: i32, button: ButtonKind) -> Self {
        Self {
            position_x,
            position_y,
            button,
        }
    }
}

/// Payload delivered to key-pressed subscribers (injected or observed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    /// Windows virtual-key code.
    pub key_code: u8,
}

impl KeyPress {
    pub fn new(key_code: u8) -> Self {
        Self { key_code }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_state_default_is_origin_unselected() {
        let state = PointerState::default();
        assert_eq!(state, PointerState::new(0, 0, ButtonKind::Unselected));
    }

    #[test]
    fn test_to_notification_copies_every_field() {
        // Arrange
        let state = PointerState::new(-40, 1200, ButtonKind::Right);

        // Act
        let note = state.to_notification();

        // Assert
        assert_eq!(note, InputNotification::new(-40, 1200, ButtonKind::Right));
    }

    #[test]
    fn test_only_left_and_right_are_selected() {
        assert!(ButtonKind::Left.is_selected());
        assert!(ButtonKind::Right.is_selected());
        assert!(!ButtonKind::Unselected.is_selected());
    }

    #[test]
    fn test_button_kind_display_is_lowercase() {
        assert_eq!(ButtonKind::Left.to_string(), "left");
        assert_eq!(ButtonKind::Unselected.to_string(), "unselected");
    }
}
