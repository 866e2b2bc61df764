//! Fake hook platform for unit testing and dry runs.
//!
//! Allows tests to push synthetic [`HookEvent`]s through whatever callbacks
//! are currently installed, without a Windows message loop or OS hooks.
//! Each dispatch reports whether the installed callback passed the event on
//! to the rest of the chain.

use std::cell::Cell;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use cursor_core::{HookEvent, HookHandle, HookKind};

use crate::application::observe_input::{HookChain, HookPlatform, HookProc};
use crate::application::PlatformError;

/// Result of pushing one event through [`FakeHookPlatform::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    /// Number of installed callbacks that received the event.
    pub delivered: usize,
    /// `true` if the event reached the end of the chain.  Always `true`
    /// when no callback is installed for the event's kind.
    pub forwarded: bool,
}

#[derive(Default)]
struct FakeState {
    next_handle: usize,
    installed: HashMap<HookHandle, (HookKind, HookProc)>,
    install_calls: Vec<HookKind>,
    uninstall_calls: Vec<HookHandle>,
    refuse_install: HashSet<HookKind>,
    refuse_uninstall: HashSet<HookKind>,
}

/// An in-process stand-in for the OS hook chain.
#[derive(Default)]
pub struct FakeHookPlatform {
    state: Mutex<FakeState>,
}

impl FakeHookPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes future `install` calls for `kind` fail (or succeed again).
    pub fn set_refuse_install(&self, kind: HookKind, refuse: bool) {
        let mut state = self.state.lock().expect("lock poisoned");
        if refuse {
            state.refuse_install.insert(kind);
        } else {
            state.refuse_install.remove(&kind);
        }
    }

    /// Makes future `uninstall` calls for hooks of `kind` fail.
    ///
    /// A refused removal still unregisters the callback, matching an OS
    /// that reports an error for a handle it no longer tracks.
    pub fn set_refuse_uninstall(&self, kind: HookKind, refuse: bool) {
        let mut state = self.state.lock().expect("lock poisoned");
        if refuse {
            state.refuse_uninstall.insert(kind);
        } else {
            state.refuse_uninstall.remove(&kind);
        }
    }

    /// Kinds passed to `install`, in call order, including refused ones.
    pub fn install_calls(&self) -> Vec<HookKind> {
        self.state.lock().expect("lock poisoned").install_calls.clone()
    }

    /// Handles passed to `uninstall`, in call order.
    pub fn uninstall_calls(&self) -> Vec<HookHandle> {
        self.state.lock().expect("lock poisoned").uninstall_calls.clone()
    }

    /// Number of callbacks currently registered.
    pub fn installed_count(&self) -> usize {
        self.state.lock().expect("lock poisoned").installed.len()
    }

    /// Delivers `event` to every callback registered for its kind.
    ///
    /// Callbacks run on the calling thread with the state lock released, so
    /// a callback may itself call `install`/`uninstall`.
    pub fn dispatch(&self, event: HookEvent) -> Dispatch {
        let procs: Vec<HookProc> = {
            let state = self.state.lock().expect("lock poisoned");
            state
                .installed
                .values()
                .filter(|(kind, _)| *kind == event.kind())
                .map(|(_, proc)| proc.clone())
                .collect()
        };

        // Each callback sits in front of the next; the event reaches the end
        // only if every callback forwards it.
        let mut forwarded = true;
        for proc in &procs {
            let chain = RecordingChain::default();
            proc(&event, &chain);
            if !chain.forwarded.get() {
                forwarded = false;
                break;
            }
        }

        Dispatch {
            delivered: procs.len(),
            forwarded,
        }
    }
}

impl HookPlatform for FakeHookPlatform {
    fn install(&self, kind: HookKind, proc: HookProc) -> Result<HookHandle, PlatformError> {
        let mut state = self.state.lock().expect("lock poisoned");
        state.install_calls.push(kind);
        if state.refuse_install.contains(&kind) {
            return Err(PlatformError::call_failed(
                "SetWindowsHookExW",
                format!("fake refused {kind} hook"),
            ));
        }

        state.next_handle += 1;
        let handle = HookHandle::from_raw(state.next_handle);
        state.installed.insert(handle, (kind, proc));
        Ok(handle)
    }

    fn uninstall(&self, handle: HookHandle) -> Result<(), PlatformError> {
        let mut state = self.state.lock().expect("lock poisoned");
        state.uninstall_calls.push(handle);

        let Some((kind, _)) = state.installed.remove(&handle) else {
            return Err(PlatformError::call_failed(
                "UnhookWindowsHookEx",
                format!("unknown hook handle {}", handle.as_raw()),
            ));
        };
        if state.refuse_uninstall.contains(&kind) {
            return Err(PlatformError::call_failed(
                "UnhookWindowsHookEx",
                format!("fake refused removal of {kind} hook"),
            ));
        }
        Ok(())
    }
}

/// Chain link that only remembers whether it was asked to forward.
#[derive(Default)]
struct RecordingChain {
    forwarded: Cell<bool>,
}

impl HookChain for RecordingChain {
    fn forward(&self) {
        self.forwarded.set(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cursor_core::domain::hook::WM_LBUTTONDOWN;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_proc(counter: Arc<AtomicUsize>, forward: bool) -> HookProc {
        Arc::new(move |_event: &HookEvent, chain: &dyn HookChain| {
            counter.fetch_add(1, Ordering::SeqCst);
            if forward {
                chain.forward();
            }
        })
    }

    #[test]
    fn test_dispatch_reaches_only_matching_kind() {
        // Arrange
        let platform = FakeHookPlatform::new();
        let mouse_hits = Arc::new(AtomicUsize::new(0));
        let key_hits = Arc::new(AtomicUsize::new(0));
        platform
            .install(HookKind::Mouse, counting_proc(Arc::clone(&mouse_hits), true))
            .unwrap();
        platform
            .install(HookKind::Keyboard, counting_proc(Arc::clone(&key_hits), true))
            .unwrap();

        // Act
        let report = platform.dispatch(HookEvent::Mouse {
            message: WM_LBUTTONDOWN,
            x: 1,
            y: 1,
        });

        // Assert
        assert_eq!(report, Dispatch { delivered: 1, forwarded: true });
        assert_eq!(mouse_hits.load(Ordering::SeqCst), 1);
        assert_eq!(key_hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_dispatch_reports_swallowed_event() {
        let platform = FakeHookPlatform::new();
        platform
            .install(HookKind::Mouse, counting_proc(Arc::new(AtomicUsize::new(0)), false))
            .unwrap();

        let report = platform.dispatch(HookEvent::Mouse { message: WM_LBUTTONDOWN, x: 0, y: 0 });

        assert!(!report.forwarded);
    }

    #[test]
    fn test_dispatch_without_hooks_passes_through() {
        let platform = FakeHookPlatform::new();
        let report = platform.dispatch(HookEvent::Keyboard { message: 0x0100, vk_code: 0x41 });
        assert_eq!(report, Dispatch { delivered: 0, forwarded: true });
    }

    #[test]
    fn test_uninstall_unknown_handle_fails() {
        let platform = FakeHookPlatform::new();
        assert!(platform.uninstall(HookHandle::from_raw(99)).is_err());
        assert_eq!(platform.uninstall_calls(), vec![HookHandle::from_raw(99)]);
    }

    #[test]
    fn test_refused_install_is_recorded_but_not_registered() {
        // Arrange
        let platform = FakeHookPlatform::new();
        platform.set_refuse_install(HookKind::Keyboard, true);

        // Act
        let result = platform.install(
            HookKind::Keyboard,
            counting_proc(Arc::new(AtomicUsize::new(0)), true),
        );

        // Assert
        assert!(result.is_err());
        assert_eq!(platform.install_calls(), vec![HookKind::Keyboard]);
        assert_eq!(platform.installed_count(), 0);
    }
}
