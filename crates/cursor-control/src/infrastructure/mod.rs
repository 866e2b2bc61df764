//! Infrastructure layer for cursor-control.
//!
//! Contains OS-facing adapters and file-system storage.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `cursor_core`, but MUST NOT be imported by the `application` layer.
//!
//! # Sub-modules
//!
//! - **`injection`** – implementations of `PlatformInjector`: the Win32
//!   `SendInput` adapter (Windows only) and the `RecordingInjector` fake.
//!
//! - **`hooks`** – implementations of `HookPlatform`: the Win32 low-level hook
//!   adapter with its own message-pump thread (Windows only) and the
//!   `FakeHookPlatform` with manual event dispatch.
//!
//! - **`storage`** – TOML configuration for the demo program.

pub mod hooks;
pub mod injection;
pub mod storage;
