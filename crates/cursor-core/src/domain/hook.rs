//! Hook identity and the raw events an installed hook delivers.
//!
//! The OS adapter does the minimum of decoding: it copies the coordinates or
//! virtual-key code out of the platform struct and passes the window message
//! identifier through untouched.  Deciding which messages matter is the
//! observation controller's job, so the filter can be tested without a
//! running hook.

use std::fmt;

/// `WM_KEYDOWN`
pub const WM_KEYDOWN: u32 = 0x0100;
/// `WM_KEYUP`
pub const WM_KEYUP: u32 = 0x0101;
/// `WM_SYSKEYDOWN`
pub const WM_SYSKEYDOWN: u32 = 0x0104;
/// `WM_MOUSEMOVE`
pub const WM_MOUSEMOVE: u32 = 0x0200;
/// `WM_LBUTTONDOWN`
pub const WM_LBUTTONDOWN: u32 = 0x0201;
/// `WM_LBUTTONUP`
pub const WM_LBUTTONUP: u32 = 0x0202;
/// `WM_RBUTTONDOWN`
pub const WM_RBUTTONDOWN: u32 = 0x0204;
/// `WM_RBUTTONUP`
pub const WM_RBUTTONUP: u32 = 0x0205;

/// The two global hook classes the observer installs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    Mouse,
    Keyboard,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookKind::Mouse => f.write_str("mouse"),
            HookKind::Keyboard => f.write_str("keyboard"),
        }
    }
}

/// Opaque OS-assigned hook handle.
///
/// "Unset" is modelled as `Option<HookHandle>::None` by the owner, so a
/// value of this type always refers to an installed hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookHandle(usize);

impl HookHandle {
    pub fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    pub fn as_raw(self) -> usize {
        self.0
    }
}

/// A raw event received by an installed hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookEvent {
    /// Payload of a low-level mouse hook (`MSLLHOOKSTRUCT`).
    Mouse {
        /// Window message identifier (`WM_LBUTTONDOWN`, `WM_MOUSEMOVE`, ...).
        message: u32,
        /// Screen X coordinate.
        x: i32,
        /// Screen Y coordinate.
        y: i32,
    },
    /// Payload of a low-level keyboard hook (`KBDLLHOOKSTRUCT`).
    Keyboard {
        /// Window message identifier (`WM_KEYDOWN`, `WM_KEYUP`, ...).
        message: u32,
        /// Virtual-key code as delivered by the OS (only the low byte is meaningful).
        vk_code: u32,
    },
}

impl HookEvent {
    /// The hook class this event belongs to.
    pub fn kind(&self) -> HookKind {
        match self {
            HookEvent::Mouse { .. } => HookKind::Mouse,
            HookEvent::Keyboard { .. } => HookKind::Keyboard,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hook_event_kind_matches_variant() {
        let mouse = HookEvent::Mouse { message: WM_LBUTTONDOWN, x: 1, y: 2 };
        let key = HookEvent::Keyboard { message: WM_KEYDOWN, vk_code: 0x41 };
        assert_eq!(mouse.kind(), HookKind::Mouse);
        assert_eq!(key.kind(), HookKind::Keyboard);
    }

    #[test]
    fn test_hook_handle_round_trips_raw_value() {
        assert_eq!(HookHandle::from_raw(0xBEEF).as_raw(), 0xBEEF);
    }
}
