//! Input Injection Controller: serialized pointer and keyboard injection.
//!
//! [`InputInjector`] turns high-level requests ("click the left button",
//! "press A") into the exact sequence of low-level calls the OS expects and
//! delegates each call to a [`PlatformInjector`].  The Win32 implementation
//! lives in `infrastructure::injection::windows`.
//!
//! # Locking discipline
//!
//! Every operation holds the controller's single mutex for the whole OS call
//! sequence and the [`PointerState`] update, so a click's down/up pair can
//! never be split by another thread's injection.  The lock is released
//! *before* notifications are dispatched: handlers may call back into the
//! same controller.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cursor_core::keymap;
use cursor_core::{ButtonKind, EventChannel, InputNotification, Journal, KeyPress, PointerState};
use thiserror::Error;
use tracing::{debug, warn};

use super::PlatformError;

/// A physical mouse button the platform can press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
}

impl MouseButton {
    /// Maps a [`ButtonKind`] to a pressable button; `Unselected` has none.
    pub fn from_kind(kind: ButtonKind) -> Option<Self> {
        match kind {
            ButtonKind::Left => Some(MouseButton::Left),
            ButtonKind::Right => Some(MouseButton::Right),
            ButtonKind::Unselected => None,
        }
    }

    pub fn kind(self) -> ButtonKind {
        match self {
            MouseButton::Left => ButtonKind::Left,
            MouseButton::Right => ButtonKind::Right,
        }
    }
}

impl fmt::Display for MouseButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind().fmt(f)
    }
}

/// Direction of a button or key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Press {
    Down,
    Up,
}

impl fmt::Display for Press {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Press::Down => f.write_str("down"),
            Press::Up => f.write_str("up"),
        }
    }
}

/// Platform-agnostic input injection.
///
/// Each method performs exactly one OS call and reports whether the OS
/// accepted it.
#[cfg_attr(test, mockall::automock)]
pub trait PlatformInjector: Send + Sync {
    /// Moves the system pointer to absolute screen coordinates.
    fn set_cursor_pos(&self, x: i32, y: i32) -> Result<(), PlatformError>;

    /// Reads the current pointer position.
    fn cursor_pos(&self) -> Result<(i32, i32), PlatformError>;

    /// Injects a single button-down or button-up event.
    fn mouse_button(&self, button: MouseButton, press: Press) -> Result<(), PlatformError>;

    /// Injects a single key-down or key-up event for a virtual-key code.
    fn key(&self, key_code: u8, press: Press) -> Result<(), PlatformError>;
}

/// The pointer action that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    Move { x: i32, y: i32 },
    Button { button: MouseButton, press: Press },
}

impl fmt::Display for PointerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointerAction::Move { x, y } => write!(f, "move to X:{x}, Y:{y}"),
            PointerAction::Button { button, press } => write!(f, "{button} button {press}"),
        }
    }
}

/// Error type for injection operations.
#[derive(Debug, Error)]
pub enum InjectionError {
    #[error("pointer injection failed ({action}): {source}")]
    Pointer {
        action: PointerAction,
        #[source]
        source: PlatformError,
    },
    #[error("keyboard injection failed (key {}, {press}): {source}", key_label(.key_code))]
    Keyboard {
        key_code: u8,
        press: Press,
        #[source]
        source: PlatformError,
    },
    #[error("no mouse button selected")]
    UnselectedButton,
}

fn key_label(key_code: &u8) -> String {
    keymap::describe(*key_code)
}

/// Success/failure signal returned by every public controller operation.
///
/// The cause of a failure is written to the journal, never returned.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        matches!(self, Outcome::Success)
    }

    pub fn is_failure(self) -> bool {
        !self.is_success()
    }

    /// `1` for success, `0` for failure.
    pub fn code(self) -> i32 {
        match self {
            Outcome::Success => 1,
            Outcome::Failure => 0,
        }
    }
}

/// Notification channels raised by [`InputInjector`].
#[derive(Debug, Default)]
pub struct InjectionEvents {
    /// Pointer moved; payload carries the new position and `Unselected`.
    pub pointer_moved: EventChannel<InputNotification>,
    /// A full left click (down + up) was injected.
    pub left_clicked: EventChannel<InputNotification>,
    /// A full right click (down + up) was injected.
    pub right_clicked: EventChannel<InputNotification>,
    /// A button-down alone was injected.
    pub button_pressed: EventChannel<InputNotification>,
    /// A button-up alone was injected.
    pub button_released: EventChannel<InputNotification>,
    /// A key tap (down + up) was injected.
    pub key_pressed: EventChannel<KeyPress>,
}

/// Serialized pointer and keyboard injection.
///
/// Construct one per process at startup and share it (`Arc`) with whoever
/// needs to inject input.
pub struct InputInjector {
    platform: Arc<dyn PlatformInjector>,
    journal: Arc<dyn Journal>,
    /// Doubles as the exclusivity lock for OS calls.
    state: Mutex<PointerState>,
    events: InjectionEvents,
}

impl InputInjector {
    pub fn new(platform: Arc<dyn PlatformInjector>, journal: Arc<dyn Journal>) -> Self {
        Self {
            platform,
            journal,
            state: Mutex::new(PointerState::default()),
            events: InjectionEvents::default(),
        }
    }

    /// Subscription points for every notification this controller raises.
    pub fn events(&self) -> &InjectionEvents {
        &self.events
    }

    /// Copy of the last recorded pointer state.
    pub fn pointer_state(&self) -> PointerState {
        *self.lock_state()
    }

    /// Moves the pointer to `(x, y)` screen coordinates.
    ///
    /// No bounds checking is done beyond what the OS enforces.  On failure
    /// the recorded [`PointerState`] is left unchanged.
    pub fn set_cursor_position(&self, x: i32, y: i32) -> Outcome {
        match self.try_set_cursor_position(x, y) {
            Ok(note) => {
                self.events.pointer_moved.emit(&note);
                Outcome::Success
            }
            Err(e) => self.fail(e),
        }
    }

    /// Injects a button-down immediately followed by a button-up.
    ///
    /// Raises `left_clicked` or `right_clicked` depending on `button`.
    /// `ButtonKind::Unselected` is rejected without touching the OS.
    pub fn simulate_mouse_click(&self, button: ButtonKind) -> Outcome {
        let result = self.try_button_sequence(button, &[Press::Down, Press::Up], "click");
        match result {
            Ok((MouseButton::Left, note)) => {
                self.events.left_clicked.emit(&note);
                Outcome::Success
            }
            Ok((MouseButton::Right, note)) => {
                self.events.right_clicked.emit(&note);
                Outcome::Success
            }
            Err(e) => self.fail(e),
        }
    }

    /// Injects only a button-down, for press-and-hold gestures.
    pub fn simulate_mouse_pull_down(&self, button: ButtonKind) -> Outcome {
        match self.try_button_sequence(button, &[Press::Down], "press") {
            Ok((_, note)) => {
                self.events.button_pressed.emit(&note);
                Outcome::Success
            }
            Err(e) => self.fail(e),
        }
    }

    /// Injects only a button-up, ending a press-and-hold gesture.
    pub fn simulate_mouse_pull_up(&self, button: ButtonKind) -> Outcome {
        match self.try_button_sequence(button, &[Press::Up], "release") {
            Ok((_, note)) => {
                self.events.button_released.emit(&note);
                Outcome::Success
            }
            Err(e) => self.fail(e),
        }
    }

    /// Injects a key-down immediately followed by a key-up for `key_code`.
    ///
    /// See [`cursor_core::keymap::vk`] for the accepted codes.
    pub fn simulate_key_pressing(&self, key_code: u8) -> Outcome {
        match self.try_key_pressing(key_code) {
            Ok(press) => {
                self.events.key_pressed.emit(&press);
                Outcome::Success
            }
            Err(e) => self.fail(e),
        }
    }

    // ── Critical sections ────────────────────────────────────────────────────

    fn try_set_cursor_position(&self, x: i32, y: i32) -> Result<InputNotification, InjectionError> {
        let mut state = self.lock_state();

        self.platform
            .set_cursor_pos(x, y)
            .map_err(|source| InjectionError::Pointer {
                action: PointerAction::Move { x, y },
                source,
            })?;

        *state = PointerState::new(x, y, ButtonKind::Unselected);
        debug!(x, y, "cursor moved");
        self.journal.append(format!("cursor moved: X:{x}, Y:{y}"));
        Ok(state.to_notification())
    }

    fn try_button_sequence(
        &self,
        kind: ButtonKind,
        presses: &[Press],
        verb: &str,
    ) -> Result<(MouseButton, InputNotification), InjectionError> {
        let button = MouseButton::from_kind(kind).ok_or(InjectionError::UnselectedButton)?;
        let mut state = self.lock_state();

        for &press in presses {
            self.platform
                .mouse_button(button, press)
                .map_err(|source| InjectionError::Pointer {
                    action: PointerAction::Button { button, press },
                    source,
                })?;
        }

        self.refresh_position(&mut state);
        state.button = kind;
        debug!(%button, verb, x = state.x, y = state.y, "mouse button injected");
        self.journal
            .append(format!("simulated {button} mouse button {verb}"));
        Ok((button, state.to_notification()))
    }

    fn try_key_pressing(&self, key_code: u8) -> Result<KeyPress, InjectionError> {
        let _guard = self.lock_state();

        for press in [Press::Down, Press::Up] {
            self.platform
                .key(key_code, press)
                .map_err(|source| InjectionError::Keyboard {
                    key_code,
                    press,
                    source,
                })?;
        }

        let key = keymap::describe(key_code);
        debug!(%key, "key pressed");
        self.journal.append(format!("simulated key press: {key}"));
        Ok(KeyPress::new(key_code))
    }

    // ── Helpers ──────────────────────────────────────────────────────────────

    /// Updates the recorded position from the OS; keeps the last recorded
    /// position when the OS cannot report one.
    fn refresh_position(&self, state: &mut PointerState) {
        match self.platform.cursor_pos() {
            Ok((x, y)) => {
                state.x = x;
                state.y = y;
            }
            Err(e) => debug!("cursor position unavailable, using recorded state: {e}"),
        }
    }

    fn fail(&self, error: InjectionError) -> Outcome {
        warn!("{error}");
        self.journal.append(format!("error: {error}"));
        Outcome::Failure
    }

    fn lock_state(&self) -> MutexGuard<'_, PointerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
