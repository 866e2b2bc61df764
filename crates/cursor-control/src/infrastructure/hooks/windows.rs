//! Windows low-level keyboard and mouse hook implementation.
//!
//! `WH_MOUSE_LL` and `WH_KEYBOARD_LL` hooks are delivered through the message
//! queue of the thread that installed them, so this adapter owns a dedicated
//! Win32 message-loop thread (the *pump*).  `install` and `uninstall` hand
//! their work to the pump over a channel and wake it with a thread message;
//! the pump performs the `SetWindowsHookExW` / `UnhookWindowsHookEx` call and
//! replies.  The pump is started on first use and shut down on drop.
//! Requests made on the pump itself, i.e. from inside a hook callback, run
//! inline; queueing them would wait on the thread doing the waiting.
//!
//! The OS callbacks are plain `extern "system"` functions, so the registered
//! [`HookProc`]s live in one static slot per hook class.  A process can
//! therefore hold at most one mouse hook and one keyboard hook through this
//! adapter at a time.
//!
//! # Safety
//!
//! This module uses `unsafe` code exclusively for Windows API FFI calls.
//! All `unsafe` blocks are annotated with `// SAFETY:` comments.

#![cfg(target_os = "windows")]

use std::cell::Cell;
use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};
use std::thread::{self, JoinHandle};

use cursor_core::{HookEvent, HookHandle, HookKind};
use tracing::{debug, warn};
use windows::core::PCWSTR;
use windows::Win32::Foundation::{LPARAM, LRESULT, WPARAM};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, DispatchMessageW, GetMessageW, PeekMessageW, PostThreadMessageW,
    SetWindowsHookExW, UnhookWindowsHookEx, HC_ACTION, HHOOK, KBDLLHOOKSTRUCT, MSG,
    MSLLHOOKSTRUCT, PM_NOREMOVE, WH_KEYBOARD_LL, WH_MOUSE_LL, WM_APP, WM_QUIT, WM_USER,
};

use crate::application::observe_input::{HookChain, HookPlatform, HookProc};
use crate::application::PlatformError;

/// Thread message telling the pump to drain its request channel.
const WM_PUMP_REQUEST: u32 = WM_APP + 1;

/// Callback for the installed mouse hook, if any.
static MOUSE_PROC: RwLock<Option<HookProc>> = RwLock::new(None);

/// Callback for the installed keyboard hook, if any.
static KEYBOARD_PROC: RwLock<Option<HookProc>> = RwLock::new(None);

fn proc_slot(kind: HookKind) -> &'static RwLock<Option<HookProc>> {
    match kind {
        HookKind::Mouse => &MOUSE_PROC,
        HookKind::Keyboard => &KEYBOARD_PROC,
    }
}

fn set_proc(kind: HookKind, proc: Option<HookProc>) {
    *proc_slot(kind)
        .write()
        .unwrap_or_else(PoisonError::into_inner) = proc;
}

// ── Pump thread ──────────────────────────────────────────────────────────────

enum PumpRequest {
    Install {
        kind: HookKind,
        reply: Sender<Result<HookHandle, PlatformError>>,
    },
    Uninstall {
        handle: HookHandle,
        reply: Sender<Result<(), PlatformError>>,
    },
}

struct HookPump {
    link: PumpLink,
    thread: Option<JoinHandle<()>>,
}

/// Addresses a running pump without holding the platform's pump lock.
#[derive(Clone)]
struct PumpLink {
    thread_id: u32,
    requests: Sender<PumpRequest>,
}

impl PumpLink {
    fn is_current_thread(&self) -> bool {
        // SAFETY: GetCurrentThreadId has no preconditions.
        unsafe { GetCurrentThreadId() } == self.thread_id
    }

    fn submit(&self, request: PumpRequest) -> Result<(), PlatformError> {
        self.requests
            .send(request)
            .map_err(|_| PlatformError::call_failed("PostThreadMessageW", "hook pump has exited"))?;
        // SAFETY: PostThreadMessageW takes plain values; the target thread's
        // queue exists because the pump created it before reporting its id.
        unsafe { PostThreadMessageW(self.thread_id, WM_PUMP_REQUEST, WPARAM(0), LPARAM(0)) }
            .map_err(|e| PlatformError::call_failed("PostThreadMessageW", e.to_string()))
    }
}

impl HookPump {
    fn spawn() -> Result<Self, PlatformError> {
        let (requests, inbox) = mpsc::channel::<PumpRequest>();
        let (ready_tx, ready_rx) = mpsc::channel::<u32>();

        let thread = thread::Builder::new()
            .name("cursor-hook-pump".to_string())
            .spawn(move || run_pump(ready_tx, inbox))
            .map_err(|e| PlatformError::call_failed("CreateThread", e.to_string()))?;

        let thread_id = ready_rx.recv().map_err(|_| {
            PlatformError::call_failed("GetCurrentThreadId", "hook pump exited during startup")
        })?;
        debug!(thread_id, "hook pump started");

        Ok(Self {
            link: PumpLink { thread_id, requests },
            thread: Some(thread),
        })
    }
}

impl Drop for HookPump {
    fn drop(&mut self) {
        // SAFETY: see `PumpLink::submit`.
        let posted =
            unsafe { PostThreadMessageW(self.link.thread_id, WM_QUIT, WPARAM(0), LPARAM(0)) };
        if let Err(e) = posted {
            warn!("could not stop hook pump: {e}");
            return;
        }
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
        debug!("hook pump stopped");
    }
}

/// Entry point for the dedicated Win32 message loop thread.
fn run_pump(ready: Sender<u32>, inbox: Receiver<PumpRequest>) {
    let mut msg = MSG::default();
    // SAFETY: `msg` is a valid, writable MSG.  Peeking forces the OS to
    // create this thread's message queue so PostThreadMessageW can reach it.
    unsafe {
        let _ = PeekMessageW(&mut msg, None, WM_USER, WM_USER, PM_NOREMOVE);
    }
    // SAFETY: GetCurrentThreadId has no preconditions.
    if ready.send(unsafe { GetCurrentThreadId() }).is_err() {
        return;
    }

    // Win32 message loop: blocks until WM_QUIT (0) or an error (-1).
    // SAFETY: Standard Win32 GetMessage/DispatchMessage loop pattern.
    unsafe {
        while GetMessageW(&mut msg, None, 0, 0).0 > 0 {
            if msg.message == WM_PUMP_REQUEST {
                while let Ok(request) = inbox.try_recv() {
                    handle_request(request);
                }
                continue;
            }
            DispatchMessageW(&msg);
        }
    }
}

fn handle_request(request: PumpRequest) {
    match request {
        PumpRequest::Install { kind, reply } => {
            let _ = reply.send(install_on_pump(kind));
        }
        PumpRequest::Uninstall { handle, reply } => {
            let _ = reply.send(uninstall_on_pump(handle));
        }
    }
}

fn install_on_pump(kind: HookKind) -> Result<HookHandle, PlatformError> {
    // SAFETY: GetModuleHandleW with a null name returns this executable's
    // module handle and does not retain the argument.
    let module = unsafe { GetModuleHandleW(PCWSTR::null()) }
        .map_err(|e| PlatformError::call_failed("GetModuleHandleW", e.to_string()))?;

    let hook = match kind {
        // SAFETY: Called on the pump thread, which runs a message loop for
        // the lifetime of the hook.  The callbacks are 'static functions.
        HookKind::Mouse => unsafe {
            SetWindowsHookExW(WH_MOUSE_LL, Some(mouse_hook_proc), Some(module.into()), 0)
        },
        HookKind::Keyboard => unsafe {
            SetWindowsHookExW(WH_KEYBOARD_LL, Some(keyboard_hook_proc), Some(module.into()), 0)
        },
    }
    .map_err(|e| PlatformError::call_failed("SetWindowsHookExW", e.to_string()))?;

    Ok(HookHandle::from_raw(hook.0 as usize))
}

fn uninstall_on_pump(handle: HookHandle) -> Result<(), PlatformError> {
    // SAFETY: `handle` was produced by `install_on_pump` from a live HHOOK.
    unsafe { UnhookWindowsHookEx(HHOOK(handle.as_raw() as *mut core::ffi::c_void)) }
        .map_err(|e| PlatformError::call_failed("UnhookWindowsHookEx", e.to_string()))
}

// ── Hook callbacks ───────────────────────────────────────────────────────────

/// The remainder of the OS chain for one callback invocation.
struct NextHook {
    n_code: i32,
    w_param: WPARAM,
    l_param: LPARAM,
    result: Cell<Option<LRESULT>>,
}

impl NextHook {
    fn call_next(&self) -> LRESULT {
        // SAFETY: Forwards the exact arguments this callback received.
        unsafe { CallNextHookEx(None, self.n_code, self.w_param, self.l_param) }
    }

    fn finish(self) -> LRESULT {
        match self.result.get() {
            Some(result) => result,
            None => self.call_next(),
        }
    }
}

impl HookChain for NextHook {
    fn forward(&self) {
        if self.result.get().is_none() {
            self.result.set(Some(self.call_next()));
        }
    }
}

/// Runs the registered callback for `kind`, then guarantees the chain
/// continues even if no callback is registered.
fn run_proc(kind: HookKind, event: HookEvent, chain: NextHook) -> LRESULT {
    let proc = proc_slot(kind)
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();
    if let Some(proc) = proc {
        proc(&event, &chain);
    }
    chain.finish()
}

/// Low-level mouse hook callback.
///
/// # Safety
///
/// Called by Windows from the pump thread; must return quickly.
unsafe extern "system" fn mouse_hook_proc(n_code: i32, w_param: WPARAM, l_param: LPARAM) -> LRESULT {
    if n_code != HC_ACTION as i32 {
        // SAFETY: Must call CallNextHookEx when n_code < 0.
        return CallNextHookEx(None, n_code, w_param, l_param);
    }

    // SAFETY: l_param points to a MSLLHOOKSTRUCT when n_code == HC_ACTION.
    let mhs = &*(l_param.0 as *const MSLLHOOKSTRUCT);
    let event = HookEvent::Mouse {
        message: w_param.0 as u32,
        x: mhs.pt.x,
        y: mhs.pt.y,
    };

    run_proc(
        HookKind::Mouse,
        event,
        NextHook { n_code, w_param, l_param, result: Cell::new(None) },
    )
}

/// Low-level keyboard hook callback.
///
/// # Safety
///
/// Called by Windows from the pump thread; must return quickly.
unsafe extern "system" fn keyboard_hook_proc(
    n_code: i32,
    w_param: WPARAM,
    l_param: LPARAM,
) -> LRESULT {
    if n_code != HC_ACTION as i32 {
        // SAFETY: Must call CallNextHookEx when n_code < 0.
        return CallNextHookEx(None, n_code, w_param, l_param);
    }

    // SAFETY: l_param points to a KBDLLHOOKSTRUCT when n_code == HC_ACTION.
    let kbs = &*(l_param.0 as *const KBDLLHOOKSTRUCT);
    let event = HookEvent::Keyboard {
        message: w_param.0 as u32,
        vk_code: kbs.vkCode,
    };

    run_proc(
        HookKind::Keyboard,
        event,
        NextHook { n_code, w_param, l_param, result: Cell::new(None) },
    )
}

// ── Platform ─────────────────────────────────────────────────────────────────

/// Windows implementation of [`HookPlatform`].
pub struct WindowsHookPlatform {
    pump: Mutex<Option<HookPump>>,
    kinds: Mutex<HashMap<HookHandle, HookKind>>,
}

impl WindowsHookPlatform {
    /// Creates a platform; the pump thread starts on the first `install`.
    pub fn new() -> Self {
        Self {
            pump: Mutex::new(None),
            kinds: Mutex::new(HashMap::new()),
        }
    }

    fn lock_pump(&self) -> MutexGuard<'_, Option<HookPump>> {
        self.pump.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_kinds(&self) -> MutexGuard<'_, HashMap<HookHandle, HookKind>> {
        self.kinds.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn request_install(&self, kind: HookKind) -> Result<HookHandle, PlatformError> {
        let link = {
            let mut slot = self.lock_pump();
            if slot.is_none() {
                *slot = Some(HookPump::spawn()?);
            }
            match slot.as_ref() {
                Some(pump) => pump.link.clone(),
                None => {
                    return Err(PlatformError::call_failed("CreateThread", "hook pump unavailable"))
                }
            }
        };
        if link.is_current_thread() {
            return install_on_pump(kind);
        }

        let (reply, answer) = mpsc::channel();
        link.submit(PumpRequest::Install { kind, reply })?;
        answer.recv().map_err(|_| {
            PlatformError::call_failed("SetWindowsHookExW", "hook pump dropped the request")
        })?
    }

    fn request_uninstall(&self, handle: HookHandle) -> Result<(), PlatformError> {
        let Some(link) = self.lock_pump().as_ref().map(|pump| pump.link.clone()) else {
            return Err(PlatformError::call_failed(
                "UnhookWindowsHookEx",
                "no hooks were installed by this platform",
            ));
        };
        if link.is_current_thread() {
            return uninstall_on_pump(handle);
        }

        let (reply, answer) = mpsc::channel();
        link.submit(PumpRequest::Uninstall { handle, reply })?;
        answer.recv().map_err(|_| {
            PlatformError::call_failed("UnhookWindowsHookEx", "hook pump dropped the request")
        })?
    }
}

impl Default for WindowsHookPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl HookPlatform for WindowsHookPlatform {
    fn install(&self, kind: HookKind, proc: HookProc) -> Result<HookHandle, PlatformError> {
        {
            let mut slot = proc_slot(kind)
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            if slot.is_some() {
                return Err(PlatformError::call_failed(
                    "SetWindowsHookExW",
                    format!("a {kind} hook is already installed in this process"),
                ));
            }
            *slot = Some(proc);
        }

        let result = self.request_install(kind);

        match result {
            Ok(handle) => {
                self.lock_kinds().insert(handle, kind);
                Ok(handle)
            }
            Err(e) => {
                set_proc(kind, None);
                Err(e)
            }
        }
    }

    fn uninstall(&self, handle: HookHandle) -> Result<(), PlatformError> {
        let result = self.request_uninstall(handle);

        // The callback slot is released whatever the OS said, and callers
        // treat the handle as gone; a stale hook with an empty slot only
        // forwards.
        if let Some(kind) = self.lock_kinds().remove(&handle) {
            set_proc(kind, None);
        }
        result
    }
}

impl Drop for WindowsHookPlatform {
    fn drop(&mut self) {
        // Hooks die with the thread that installed them.
        let kinds: Vec<HookKind> = self.lock_kinds().drain().map(|(_, kind)| kind).collect();
        self.lock_pump().take();
        for kind in kinds {
            set_proc(kind, None);
        }
    }
}
