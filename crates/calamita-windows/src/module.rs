//! The in-process module surface.
//!
//! When built as a cdylib and loaded into a target process, the host
//! drives the engine through these four entry points: `calamita_init`
//! once after load, `calamita_observe_dispatch` from its message-
//! dispatch path, `calamita_settings_changed` when the configuration
//! file changes, and `calamita_shutdown` once before unload.
//! `calamita_thread_detach` is optional and lets a host that tracks
//! thread exit release per-thread hooks eagerly.

use calamita_core::{log, log_info, log_warn};
use windows::Win32::Foundation::{LPARAM, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::{
    HHOOK, SMTO_ABORTIFHUNG, SendMessageTimeoutW, UnhookWindowsHookEx,
};

use crate::registry::registry;
use crate::{engine, hooks, subclass, window};

/// Initializes configuration and logging. Safe to call once per load.
#[unsafe(no_mangle)]
pub extern "system" fn calamita_init() {
    let config = engine::settings();
    log::init(&config.log);
    log_info!("module initialized");
}

/// Re-reads the configuration file and reapplies the logging settings.
#[unsafe(no_mangle)]
pub extern "system" fn calamita_settings_changed() {
    engine::reload_settings();
    let config = engine::settings();
    log::init(&config.log);
    log_info!("settings reloaded");
}

/// Observes one message dispatch on the calling thread. The first call
/// on a thread with a visible window installs that thread's message
/// hook; afterwards it is a cheap thread-local check.
#[unsafe(no_mangle)]
pub extern "system" fn calamita_observe_dispatch(hwnd: usize) {
    if hwnd == 0 {
        return;
    }
    let _scope = registry().enter();
    hooks::ensure_thread_hook(window::hwnd_from_raw(hwnd));
}

/// Releases the calling thread's message hook, if it has one.
#[unsafe(no_mangle)]
pub extern "system" fn calamita_thread_detach() {
    hooks::on_thread_detach();
}

/// How long the detach round-trip to each subclassed window may take
/// before teardown gives up on it.
const DETACH_TIMEOUT_MS: u32 = 1_000;

/// Tears the engine down so the module can be unloaded.
///
/// New installs are refused first. Then every subclassed window is sent
/// the unsubclass message synchronously, with a timeout so a hung
/// window cannot stall teardown forever: when the send returns, the
/// window's thread has run the detach and no subclass callback for
/// that window remains reachable. Every message hook is unhooked next,
/// and finally the call blocks until no interception callback is still
/// running.
#[unsafe(no_mangle)]
pub extern "system" fn calamita_shutdown() {
    registry().begin_shutdown();

    let detach_message = subclass::unsubclass_message();
    for handle in registry().drain_subclassed() {
        // SAFETY: sending to a window that died in the meantime fails
        // harmlessly; SMTO_ABORTIFHUNG bails out early on a window
        // that already stopped responding.
        let sent = unsafe {
            SendMessageTimeoutW(
                window::hwnd_from_raw(handle),
                detach_message,
                WPARAM(0),
                LPARAM(0),
                SMTO_ABORTIFHUNG,
                DETACH_TIMEOUT_MS,
                None,
            )
        };
        if sent.0 == 0 {
            log_warn!("window {handle:#x} did not confirm detach before the timeout");
        }
    }

    for raw in registry().drain_hooks() {
        // SAFETY: each handle came from SetWindowsHookExW and is
        // removed from the table before we unhook, so it is released
        // exactly once.
        unsafe {
            let _ = UnhookWindowsHookEx(HHOOK(raw as *mut _));
        }
    }

    registry().wait_for_idle();
    log_info!("module shut down");
}
