//! Domain model shared by the injection and observation controllers.
//!
//! - **`pointer`** – [`PointerState`](pointer::PointerState), the button
//!   enumeration, and the immutable notification payloads handed to
//!   subscribers.
//!
//! - **`hook`** – Hook identity ([`HookKind`](hook::HookKind)), the opaque
//!   OS handle, and the raw event an installed hook receives.

pub mod hook;
pub mod pointer;
