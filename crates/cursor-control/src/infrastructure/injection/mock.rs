//! Recording injector for tests and dry runs.
//!
//! # Why a recording injector?
//!
//! The Win32 injector really moves the cursor and really presses keys on the
//! machine running the tests.  `RecordingInjector` replaces every OS call
//! with an entry in a single ordered log, so assertions can check *which*
//! calls were made and *in what order*, including across threads.
//!
//! # Failure switches
//!
//! `fail_pointer` and `fail_keyboard` make the respective calls return a
//! [`PlatformError`] so callers' error paths can be exercised.  `call_delay`
//! sleeps inside every call, widening the window in which a missing lock
//! would let two threads interleave.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use crate::application::inject_input::{MouseButton, PlatformInjector, Press};
use crate::application::PlatformError;

/// One recorded platform call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectorCall {
    SetCursorPos { x: i32, y: i32 },
    MouseButton { button: MouseButton, press: Press },
    Key { key_code: u8, press: Press },
}

/// An injector that records calls instead of touching the OS.
#[derive(Debug, Default)]
pub struct RecordingInjector {
    /// Every successful call, in the order it was made.
    calls: Mutex<Vec<InjectorCall>>,
    /// Simulated pointer position, updated by `set_cursor_pos`.
    position: Mutex<(i32, i32)>,
    /// When `true`, pointer calls (move, button, position read) fail.
    pub fail_pointer: AtomicBool,
    /// When `true`, key calls fail.
    pub fail_keyboard: AtomicBool,
    /// Sleep applied inside every call.
    pub call_delay: Duration,
}

impl RecordingInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an injector that sleeps for `delay` inside every call.
    pub fn with_call_delay(delay: Duration) -> Self {
        Self {
            call_delay: delay,
            ..Self::default()
        }
    }

    /// Returns a copy of the recorded call log.
    pub fn calls(&self) -> Vec<InjectorCall> {
        self.calls.lock().expect("lock poisoned").clone()
    }

    pub fn set_fail_pointer(&self, fail: bool) {
        self.fail_pointer.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_keyboard(&self, fail: bool) {
        self.fail_keyboard.store(fail, Ordering::SeqCst);
    }

    fn record(&self, call: InjectorCall) {
        if !self.call_delay.is_zero() {
            thread::sleep(self.call_delay);
        }
        self.calls.lock().expect("lock poisoned").push(call);
    }

    fn check(&self, flag: &AtomicBool, api: &'static str) -> Result<(), PlatformError> {
        if flag.load(Ordering::SeqCst) {
            return Err(PlatformError::call_failed(api, "mock failure"));
        }
        Ok(())
    }
}

impl PlatformInjector for RecordingInjector {
    fn set_cursor_pos(&self, x: i32, y: i32) -> Result<(), PlatformError> {
        self.check(&self.fail_pointer, "SetCursorPos")?;
        *self.position.lock().expect("lock poisoned") = (x, y);
        self.record(InjectorCall::SetCursorPos { x, y });
        Ok(())
    }

    fn cursor_pos(&self) -> Result<(i32, i32), PlatformError> {
        self.check(&self.fail_pointer, "GetCursorPos")?;
        Ok(*self.position.lock().expect("lock poisoned"))
    }

    fn mouse_button(&self, button: MouseButton, press: Press) -> Result<(), PlatformError> {
        self.check(&self.fail_pointer, "SendInput")?;
        self.record(InjectorCall::MouseButton { button, press });
        Ok(())
    }

    fn key(&self, key_code: u8, press: Press) -> Result<(), PlatformError> {
        self.check(&self.fail_keyboard, "SendInput")?;
        self.record(InjectorCall::Key { key_code, press });
        Ok(())
    }
}
