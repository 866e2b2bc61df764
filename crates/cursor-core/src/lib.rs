//! # cursor-core
//!
//! Shared foundation for CursorLibrary: the input data model, the static
//! virtual-key table, the publish/subscribe channels that carry input
//! notifications, and the append-only journal the controllers write to.
//!
//! This crate has zero dependencies on OS APIs.  Everything that touches
//! `user32` lives in `cursor-control`, behind traits, so the model defined
//! here can be exercised by plain unit tests on any platform.
//!
//! # Modules
//!
//! - **`domain`** – Pointer state, button kinds, notification payloads, and
//!   the raw hook event shape delivered by the OS adapters.
//!
//! - **`keymap`** – Symbolic key names mapped to the single-byte Windows
//!   virtual-key codes the injection controller expects.
//!
//! - **`events`** – [`EventChannel`], one per notification category.
//!
//! - **`journal`** – The [`Journal`] logging collaborator and its in-memory
//!   implementation with file export.

pub mod domain;
pub mod events;
pub mod journal;
pub mod keymap;

pub use domain::hook::{HookEvent, HookHandle, HookKind};
pub use domain::pointer::{ButtonKind, InputNotification, KeyPress, PointerState};
pub use events::{EventChannel, SubscriptionId};
pub use journal::{Journal, JournalError, MemoryJournal, NullJournal};
