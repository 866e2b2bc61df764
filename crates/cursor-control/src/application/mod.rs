//! Application layer: the injection and observation controllers.
//!
//! Controllers in this layer:
//!
//! - **Serialize** access to the OS input APIs behind a per-instance lock.
//! - **Depend on abstractions** (`PlatformInjector`, `HookPlatform`) rather
//!   than on `user32`, so the Win32 adapters can be swapped for fakes.
//! - **Never let an error escape**: each public operation reports an
//!   [`Outcome`](inject_input::Outcome) and writes the cause to the journal.
//!
//! # Sub-modules
//!
//! - **`inject_input`**  – pointer moves, button clicks/presses/releases, key taps.
//! - **`observe_input`** – global mouse/keyboard hooks and their notifications.

pub mod inject_input;
pub mod observe_input;

use thiserror::Error;

/// Error returned by a platform adapter call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    /// The OS call reported failure.
    #[error("{api} failed: {detail}")]
    CallFailed { api: &'static str, detail: String },

    /// The adapter cannot run on this target.
    #[error("platform not supported: {0}")]
    Unsupported(String),
}

impl PlatformError {
    pub fn call_failed(api: &'static str, detail: impl Into<String>) -> Self {
        PlatformError::CallFailed {
            api,
            detail: detail.into(),
        }
    }
}
