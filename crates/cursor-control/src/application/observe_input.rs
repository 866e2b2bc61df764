//! Input Observation Controller: global mouse and keyboard hooks.
//!
//! [`InputObserver`] installs one mouse hook and one keyboard hook through a
//! [`HookPlatform`] and republishes qualifying events:
//!
//! | Hook     | Message filter                      | Channel          |
//! |----------|-------------------------------------|------------------|
//! | mouse    | `WM_LBUTTONDOWN`, `WM_RBUTTONDOWN`  | `button_pressed` |
//! | keyboard | `WM_KEYDOWN`                        | `key_pressed`    |
//!
//! # Hook state machine
//!
//! Each hook is either unset (`None`) or set (`Some(InstalledHook)`).
//! `start_hooks` moves both to set, `stop_hooks` moves both to unset.  If one
//! installation fails, the hook that did install during that attempt is
//! removed again, so the observer is never left half-started.  A slot is
//! cleared whenever its removal is attempted, successful or not: platforms
//! unregister the callback either way, so a set slot always means a live hook.
//!
//! # Threads
//!
//! Hook callbacks run on whatever thread the OS delivers them on (the Win32
//! adapter's message-pump thread).  The callback only touches the shared
//! [`ObservationEvents`] and journal, never the handle table, so a callback
//! racing a concurrent `stop_hooks` is harmless.  Whatever the subscribers
//! do, including panicking, the event is forwarded down the hook chain.
//!
//! Subscribers may call back into the observer.  `hooks_active` never blocks.
//! `start_hooks`/`stop_hooks` called from inside a callback run immediately
//! when no other thread is changing the hooks, and fail with
//! [`HookError::Busy`] otherwise, since the other thread may be waiting on
//! the very thread the callback occupies.

use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError};

use cursor_core::domain::hook::{WM_KEYDOWN, WM_LBUTTONDOWN, WM_RBUTTONDOWN};
use cursor_core::keymap;
use cursor_core::{
    ButtonKind, EventChannel, HookEvent, HookHandle, HookKind, InputNotification, Journal,
    KeyPress,
};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::inject_input::Outcome;
use super::PlatformError;

/// Access to the remainder of the OS hook chain for the event being handled.
pub trait HookChain {
    /// Passes the current event on to the next hook.  Calling it more than
    /// once has no further effect.
    fn forward(&self);
}

/// Callback registered with the platform for one hook class.
pub type HookProc = Arc<dyn Fn(&HookEvent, &dyn HookChain) + Send + Sync>;

/// Platform-agnostic global hook registration.
pub trait HookPlatform: Send + Sync {
    /// Registers `proc` to receive every system-wide event of class `kind`.
    ///
    /// The platform keeps `proc` alive until [`uninstall`](Self::uninstall)
    /// is called for the returned handle.
    fn install(&self, kind: HookKind, proc: HookProc) -> Result<HookHandle, PlatformError>;

    /// Removes a hook previously returned by [`install`](Self::install).
    fn uninstall(&self, handle: HookHandle) -> Result<(), PlatformError>;
}

/// Error type for hook lifecycle operations.
#[derive(Debug, Error)]
pub enum HookError {
    #[error("failed to install mouse hook: {0}")]
    MouseInstall(PlatformError),
    #[error("failed to install keyboard hook: {0}")]
    KeyboardInstall(PlatformError),
    #[error("failed to remove hooks: {}", describe_failures(.failures))]
    Removal {
        failures: Vec<(HookKind, PlatformError)>,
    },
    #[error("hooks are being changed on another thread")]
    Busy,
}

fn describe_failures(failures: &[(HookKind, PlatformError)]) -> String {
    failures
        .iter()
        .map(|(kind, e)| format!("{kind}: {e}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Notification channels raised by [`InputObserver`].
#[derive(Debug, Default)]
pub struct ObservationEvents {
    /// A left or right button went down anywhere on the desktop.
    pub button_pressed: EventChannel<InputNotification>,
    /// A key went down anywhere on the desktop.
    pub key_pressed: EventChannel<KeyPress>,
}

thread_local! {
    /// Set while this thread is running an observer hook callback.
    static IN_CALLBACK: Cell<bool> = const { Cell::new(false) };
}

/// Marks the current thread as inside a hook callback until dropped.
struct CallbackScope {
    previous: bool,
}

impl CallbackScope {
    fn enter() -> Self {
        Self {
            previous: IN_CALLBACK.with(|flag| flag.replace(true)),
        }
    }
}

impl Drop for CallbackScope {
    fn drop(&mut self) {
        IN_CALLBACK.with(|flag| flag.set(self.previous));
    }
}

/// Decodes hook events and publishes them.  Shared with the hook callbacks.
struct Dispatcher {
    events: ObservationEvents,
    journal: Arc<dyn Journal>,
}

impl Dispatcher {
    fn dispatch(&self, event: &HookEvent) {
        match *event {
            HookEvent::Mouse { message, x, y } => {
                let button = match message {
                    WM_LBUTTONDOWN => ButtonKind::Left,
                    WM_RBUTTONDOWN => ButtonKind::Right,
                    _ => return,
                };
                debug!(%button, x, y, "mouse button observed");
                self.journal
                    .append(format!("mouse button pressed: {button}, X={x}, Y={y}"));
                self.events
                    .button_pressed
                    .emit(&InputNotification::new(x, y, button));
            }
            HookEvent::Keyboard {
                message: WM_KEYDOWN,
                vk_code,
            } => {
                // Virtual-key codes occupy the low byte.
                let key_code = (vk_code & 0xFF) as u8;
                let key = keymap::describe(key_code);
                debug!(%key, "key observed");
                self.journal.append(format!("key pressed: {key}"));
                self.events.key_pressed.emit(&KeyPress::new(key_code));
            }
            HookEvent::Keyboard { .. } => {}
        }
    }
}

/// A hook the OS currently has registered for us.
struct InstalledHook {
    handle: HookHandle,
    /// Kept alive for exactly as long as the handle is set.
    _proc: HookProc,
}

#[derive(Default)]
struct HookSlots {
    mouse: Option<InstalledHook>,
    keyboard: Option<InstalledHook>,
}

impl HookSlots {
    fn slot(&mut self, kind: HookKind) -> &mut Option<InstalledHook> {
        match kind {
            HookKind::Mouse => &mut self.mouse,
            HookKind::Keyboard => &mut self.keyboard,
        }
    }

    fn all_set(&self) -> bool {
        self.mouse.is_some() && self.keyboard.is_some()
    }

    fn any_set(&self) -> bool {
        self.mouse.is_some() || self.keyboard.is_some()
    }
}

/// Global mouse/keyboard observation.
///
/// Dropping the observer removes any hooks it still has installed.
pub struct InputObserver {
    platform: Arc<dyn HookPlatform>,
    dispatcher: Arc<Dispatcher>,
    /// Doubles as the exclusivity lock for install/remove.
    hooks: Mutex<HookSlots>,
    /// Mirrors `hooks.all_set()`; written only while `hooks` is held.
    active: AtomicBool,
}

impl InputObserver {
    pub fn new(platform: Arc<dyn HookPlatform>, journal: Arc<dyn Journal>) -> Self {
        Self {
            platform,
            dispatcher: Arc::new(Dispatcher {
                events: ObservationEvents::default(),
                journal,
            }),
            hooks: Mutex::new(HookSlots::default()),
            active: AtomicBool::new(false),
        }
    }

    /// Subscription points for observed input.
    pub fn events(&self) -> &ObservationEvents {
        &self.dispatcher.events
    }

    /// `true` while both hooks are installed.
    pub fn hooks_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Installs the mouse hook, then the keyboard hook.
    ///
    /// Idempotent: returns success without touching the OS when both hooks
    /// are already installed.  If either installation fails, any hook
    /// installed by this call is removed again and failure is returned.
    pub fn start_hooks(&self) -> Outcome {
        let Some(mut slots) = self.lock_for_change() else {
            return self.fail(HookError::Busy);
        };
        if slots.all_set() {
            debug!("hooks already running");
            self.journal().append("hooks already running".to_string());
            return Outcome::Success;
        }

        let result = self.try_start(&mut slots);
        self.publish(&slots);
        drop(slots);
        match result {
            Ok(()) => {
                info!("mouse and keyboard hooks started");
                self.journal()
                    .append("mouse and keyboard hooks started".to_string());
                Outcome::Success
            }
            Err(e) => self.fail(e),
        }
    }

    /// Removes whichever hooks are installed.
    ///
    /// Both removals are attempted even if the first fails; both handles end
    /// up unset either way.  With nothing installed this is a successful
    /// no-op.
    pub fn stop_hooks(&self) -> Outcome {
        let Some(mut slots) = self.lock_for_change() else {
            return self.fail(HookError::Busy);
        };
        if !slots.any_set() {
            debug!("stop requested with no hooks installed");
            return Outcome::Success;
        }

        let result = self.try_stop(&mut slots);
        self.publish(&slots);
        drop(slots);
        match result {
            Ok(()) => {
                info!("mouse and keyboard hooks stopped");
                self.journal()
                    .append("mouse and keyboard hooks stopped".to_string());
                Outcome::Success
            }
            Err(e) => self.fail(e),
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────────────

    fn try_start(&self, slots: &mut HookSlots) -> Result<(), HookError> {
        let mut installed_now = Vec::with_capacity(2);

        for kind in [HookKind::Mouse, HookKind::Keyboard] {
            if slots.slot(kind).is_some() {
                continue;
            }
            match self.install(kind) {
                Ok(hook) => {
                    *slots.slot(kind) = Some(hook);
                    installed_now.push(kind);
                }
                Err(e) => {
                    self.roll_back(slots, &installed_now);
                    return Err(match kind {
                        HookKind::Mouse => HookError::MouseInstall(e),
                        HookKind::Keyboard => HookError::KeyboardInstall(e),
                    });
                }
            }
        }
        Ok(())
    }

    fn install(&self, kind: HookKind) -> Result<InstalledHook, PlatformError> {
        let dispatcher = Arc::clone(&self.dispatcher);
        let proc: HookProc = Arc::new(move |event: &HookEvent, chain: &dyn HookChain| {
            let _scope = CallbackScope::enter();
            let delivered = panic::catch_unwind(AssertUnwindSafe(|| dispatcher.dispatch(event)));
            if delivered.is_err() {
                error!("input notification handler panicked; event forwarded anyway");
            }
            chain.forward();
        });

        let handle = self.platform.install(kind, Arc::clone(&proc))?;
        debug!(%kind, handle = handle.as_raw(), "hook installed");
        Ok(InstalledHook {
            handle,
            _proc: proc,
        })
    }

    fn roll_back(&self, slots: &mut HookSlots, kinds: &[HookKind]) {
        for &kind in kinds {
            let Some(hook) = slots.slot(kind).take() else {
                continue;
            };
            match self.platform.uninstall(hook.handle) {
                Ok(()) => debug!(%kind, "rolled back hook after partial start"),
                Err(e) => {
                    warn!(%kind, "rollback of hook failed: {e}");
                    self.journal()
                        .append(format!("failed to roll back {kind} hook: {e}"));
                }
            }
        }
    }

    fn try_stop(&self, slots: &mut HookSlots) -> Result<(), HookError> {
        let mut failures = Vec::new();

        for kind in [HookKind::Mouse, HookKind::Keyboard] {
            let Some(hook) = slots.slot(kind).take() else {
                continue;
            };
            if let Err(e) = self.platform.uninstall(hook.handle) {
                failures.push((kind, e));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(HookError::Removal { failures })
        }
    }

    // ── Helpers ──────────────────────────────────────────────────────────────

    fn journal(&self) -> &dyn Journal {
        self.dispatcher.journal.as_ref()
    }

    fn fail(&self, error: HookError) -> Outcome {
        warn!("{error}");
        self.journal().append(format!("error: {error}"));
        Outcome::Failure
    }

    fn lock_hooks(&self) -> MutexGuard<'_, HookSlots> {
        self.hooks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes the handle table for a start or stop.  Inside a hook callback
    /// this never waits; `None` means another thread holds the table.
    fn lock_for_change(&self) -> Option<MutexGuard<'_, HookSlots>> {
        if !IN_CALLBACK.with(Cell::get) {
            return Some(self.lock_hooks());
        }
        match self.hooks.try_lock() {
            Ok(slots) => Some(slots),
            Err(TryLockError::Poisoned(poisoned)) => Some(poisoned.into_inner()),
            Err(TryLockError::WouldBlock) => None,
        }
    }

    fn publish(&self, slots: &HookSlots) {
        self.active.store(slots.all_set(), Ordering::Release);
    }
}

impl Drop for InputObserver {
    fn drop(&mut self) {
        if self.lock_hooks().any_set() {
            let _ = self.stop_hooks();
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
