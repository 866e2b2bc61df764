//! cursor-control library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the demo binary in `main.rs` share the same module tree.
//!
//! # What does cursor-control do? (for beginners)
//!
//! It drives the desktop's real mouse and keyboard from code, and watches
//! what the real mouse and keyboard are doing:
//!
//! 1. [`InputInjector`] moves the cursor, presses and releases mouse
//!    buttons, and taps keys.  Every request runs under one lock so the OS
//!    never sees two half-finished gestures interleaved.
//! 2. [`InputObserver`] installs system-wide low-level hooks and republishes
//!    button presses and key presses as typed notifications.
//!
//! Both controllers talk to the OS through traits (`PlatformInjector`,
//! `HookPlatform`).  The Win32 adapters live in `infrastructure`; the
//! recording fakes next to them make every behaviour testable without a
//! desktop session.

/// Application layer: the two controllers and the platform traits they use.
pub mod application;

/// Infrastructure layer: Win32 adapters, recording fakes, and configuration.
pub mod infrastructure;

pub use application::inject_input::{InjectionEvents, InputInjector, Outcome};
pub use application::observe_input::{InputObserver, ObservationEvents};
