//! Windows input injection via `SetCursorPos`, `GetCursorPos`, and `SendInput`.
//!
//! Pointer moves use absolute screen pixels through `SetCursorPos`, exactly
//! as supplied by the caller.  Buttons and keys are injected one `INPUT`
//! structure per call so the controller decides the down/up sequencing.
//!
//! # Safety
//!
//! This module uses `unsafe` code exclusively for Windows API FFI calls.
//! All `unsafe` blocks are annotated with `// SAFETY:` comments.

#![cfg(target_os = "windows")]

use windows::Win32::Foundation::POINT;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, INPUT_MOUSE, KEYBDINPUT, KEYBD_EVENT_FLAGS,
    KEYEVENTF_KEYUP, MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP, MOUSEEVENTF_RIGHTDOWN,
    MOUSEEVENTF_RIGHTUP, MOUSEINPUT, VIRTUAL_KEY,
};
use windows::Win32::UI::WindowsAndMessaging::{GetCursorPos, SetCursorPos};

use crate::application::inject_input::{MouseButton, PlatformInjector, Press};
use crate::application::PlatformError;

/// Windows implementation of [`PlatformInjector`].
pub struct WindowsInjector;

impl WindowsInjector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowsInjector {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformInjector for WindowsInjector {
    fn set_cursor_pos(&self, x: i32, y: i32) -> Result<(), PlatformError> {
        // SAFETY: SetCursorPos takes plain integers and has no pointer arguments.
        unsafe { SetCursorPos(x, y) }
            .map_err(|e| PlatformError::call_failed("SetCursorPos", e.to_string()))
    }

    fn cursor_pos(&self) -> Result<(i32, i32), PlatformError> {
        let mut point = POINT::default();
        // SAFETY: `point` is a valid, writable POINT on the stack.
        unsafe { GetCursorPos(&mut point) }
            .map_err(|e| PlatformError::call_failed("GetCursorPos", e.to_string()))?;
        Ok((point.x, point.y))
    }

    fn mouse_button(&self, button: MouseButton, press: Press) -> Result<(), PlatformError> {
        let flags = match (button, press) {
            (MouseButton::Left, Press::Down) => MOUSEEVENTF_LEFTDOWN,
            (MouseButton::Left, Press::Up) => MOUSEEVENTF_LEFTUP,
            (MouseButton::Right, Press::Down) => MOUSEEVENTF_RIGHTDOWN,
            (MouseButton::Right, Press::Up) => MOUSEEVENTF_RIGHTUP,
        };

        let input = INPUT {
            r#type: INPUT_MOUSE,
            Anonymous: INPUT_0 {
                mi: MOUSEINPUT {
                    dx: 0,
                    dy: 0,
                    mouseData: 0,
                    dwFlags: flags,
                    time: 0,
                    dwExtraInfo: 0,
                },
            },
        };
        send(input)
    }

    fn key(&self, key_code: u8, press: Press) -> Result<(), PlatformError> {
        let flags = match press {
            Press::Down => KEYBD_EVENT_FLAGS(0),
            Press::Up => KEYEVENTF_KEYUP,
        };

        let input = INPUT {
            r#type: INPUT_KEYBOARD,
            Anonymous: INPUT_0 {
                ki: KEYBDINPUT {
                    wVk: VIRTUAL_KEY(u16::from(key_code)),
                    wScan: 0,
                    dwFlags: flags,
                    time: 0,
                    dwExtraInfo: 0,
                },
            },
        };
        send(input)
    }
}

/// Submits one `INPUT` and checks that the OS accepted it.
///
/// `SendInput` returns the number of events inserted; 0 means the input was
/// blocked (UIPI, secure desktop) or malformed.
fn send(input: INPUT) -> Result<(), PlatformError> {
    // SAFETY: `input` is a fully initialised INPUT on the stack and the size
    // argument matches its type.
    let inserted = unsafe { SendInput(&[input], std::mem::size_of::<INPUT>() as i32) };
    if inserted != 1 {
        let detail = std::io::Error::last_os_error().to_string();
        return Err(PlatformError::call_failed("SendInput", detail));
    }
    Ok(())
}
