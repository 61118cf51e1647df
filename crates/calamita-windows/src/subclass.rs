//! Per-window subclassing of windows observed entering a move gesture.
//!
//! The subclass procedure is the engine's only view into a window's
//! message stream. It runs on the window's own UI thread, so everything
//! it touches in [`engine`] is thread-local; the registry is only used
//! for the install/remove bookkeeping shared with teardown.

use std::sync::OnceLock;

use calamita_core::log_debug;
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::UI::Shell::{DefSubclassProc, RemoveWindowSubclass, SetWindowSubclass};
use windows::Win32::UI::WindowsAndMessaging::{
    RegisterWindowMessageW, WINDOWPOS, WM_ENTERSIZEMOVE, WM_EXITSIZEMOVE, WM_NCDESTROY,
    WM_WINDOWPOSCHANGING,
};
use windows::core::w;

use crate::engine;
use crate::registry::registry;

const SUBCLASS_ID: usize = 0;

/// Returns the session-unique message that asks a subclassed window to
/// detach itself.
///
/// Registered once per process; teardown sends it to every subclassed
/// window so the `RemoveWindowSubclass` call runs on the window's own
/// thread, as the subclass API requires.
pub fn unsubclass_message() -> u32 {
    static MESSAGE: OnceLock<u32> = OnceLock::new();
    // SAFETY: RegisterWindowMessageW registers (or looks up) a named
    // message atom; the string literal is a valid wide string.
    *MESSAGE.get_or_init(|| unsafe { RegisterWindowMessageW(w!("Calamita_Unsubclass")) })
}

/// Subclasses a window so its move gesture can be observed.
///
/// The window is recorded in the registry first; if the reservation is
/// refused (already subclassed, or teardown has begun) or the install
/// fails, nothing is left behind. Returns whether the subclass is now
/// in place.
pub fn install(hwnd: HWND) -> bool {
    let handle = hwnd.0 as usize;
    if !registry().reserve_subclass(handle) {
        return false;
    }

    // SAFETY: called on the window's own thread (from the
    // WH_CALLWNDPROC hook), which is where SetWindowSubclass must run.
    let installed =
        unsafe { SetWindowSubclass(hwnd, Some(subclass_proc), SUBCLASS_ID, 0) }.as_bool();

    if !installed {
        registry().release_subclass(handle);
        log_debug!("subclass install failed for {handle:#x}");
    }

    installed
}

/// Removes the subclass and all per-window state. Must run on the
/// window's thread; both callers (the unsubclass message and
/// WM_NCDESTROY) arrive there.
fn detach(hwnd: HWND) {
    // SAFETY: see above; removing a subclass that is not installed is a
    // harmless no-op.
    unsafe {
        let _ = RemoveWindowSubclass(hwnd, Some(subclass_proc), SUBCLASS_ID);
    }
    registry().release_subclass(hwnd.0 as usize);
    engine::remove_session(hwnd);
}

unsafe extern "system" fn subclass_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
    _id: usize,
    _data: usize,
) -> LRESULT {
    let _scope = registry().enter();

    match msg {
        WM_ENTERSIZEMOVE => engine::on_enter_size_move(hwnd),
        WM_EXITSIZEMOVE => {
            engine::on_exit_size_move(hwnd);
            detach(hwnd);
        }
        WM_WINDOWPOSCHANGING => {
            // SAFETY: for WM_WINDOWPOSCHANGING, lparam points at the
            // mutable WINDOWPOS the window manager is proposing.
            let pos = unsafe { &mut *(lparam.0 as *mut WINDOWPOS) };
            engine::on_window_pos_changing(hwnd, pos);
        }
        WM_NCDESTROY => detach(hwnd),
        _ if msg == unsubclass_message() => detach(hwnd),
        _ => {}
    }

    // SAFETY: forwarding to the rest of the subclass chain, standard
    // for every message a subclass procedure sees.
    unsafe { DefSubclassProc(hwnd, msg, wparam, lparam) }
}
