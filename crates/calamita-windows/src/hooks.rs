//! Per-UI-thread `WH_CALLWNDPROC` hooks.
//!
//! One hook exists per thread that pumps messages for a visible window.
//! The hook watches for `WM_ENTERSIZEMOVE` to subclass the window about
//! to be dragged, and for `WM_SIZE` to track maximize/restore
//! transitions. Installation happens lazily, the first time the host
//! lets us observe a message dispatch on the thread.

use std::cell::Cell;

use calamita_core::{log_debug, log_warn};
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::WindowsAndMessaging::{
    CWPSTRUCT, CallNextHookEx, GA_ROOT, GetAncestor, HC_ACTION, HHOOK, IsWindowVisible,
    SetWindowsHookExW, UnhookWindowsHookEx, WH_CALLWNDPROC, WM_ENTERSIZEMOVE, WM_NCDESTROY,
    WM_SIZE,
};

use crate::registry::registry;
use crate::{restore, subclass, window};

thread_local! {
    // Raw HHOOK value for this thread, 0 when none is installed.
    static THREAD_HOOK: Cell<isize> = const { Cell::new(0) };
}

/// Installs this thread's message hook if it doesn't have one yet.
///
/// Threads without a visible root window are left alone; most threads
/// in a process never pump UI messages, and hooking them would be pure
/// overhead.
pub fn ensure_thread_hook(hwnd: HWND) {
    if THREAD_HOOK.get() != 0 {
        return;
    }

    // SAFETY: simple window queries.
    let visible = unsafe { IsWindowVisible(GetAncestor(hwnd, GA_ROOT)) }.as_bool();
    if !visible || registry().is_shutting_down() {
        return;
    }

    // SAFETY: installs a thread-local hook on the current thread; the
    // callback lives for the life of the module.
    let thread_id = unsafe { GetCurrentThreadId() };
    let hook = unsafe { SetWindowsHookExW(WH_CALLWNDPROC, Some(call_wnd_proc), None, thread_id) };

    match hook {
        Ok(hook) => {
            let raw = hook.0 as isize;
            if registry().register_hook(raw) {
                THREAD_HOOK.set(raw);
                log_debug!("hooked thread {thread_id}");
            } else {
                // Shutdown raced the install; undo it.
                // SAFETY: the hook was installed just above.
                unsafe {
                    let _ = UnhookWindowsHookEx(hook);
                }
            }
        }
        Err(e) => log_warn!("hook install failed for thread {thread_id}: {e}"),
    }
}

/// Removes this thread's hook, if teardown hasn't already taken it.
/// Called when the host signals that the thread is detaching.
pub fn on_thread_detach() {
    let raw = THREAD_HOOK.replace(0);
    if raw != 0 && registry().take_hook(raw) {
        // SAFETY: the handle came from SetWindowsHookExW on this thread
        // and was still registered, so nobody else has unhooked it.
        unsafe {
            let _ = UnhookWindowsHookEx(HHOOK(raw as *mut _));
        }
    }
}

unsafe extern "system" fn call_wnd_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    let _scope = registry().enter();

    if code == HC_ACTION as i32 && !registry().is_shutting_down() {
        // SAFETY: for HC_ACTION, lparam points at the CWPSTRUCT of the
        // message being delivered.
        let cwp = unsafe { &*(lparam.0 as *const CWPSTRUCT) };

        match cwp.message {
            WM_ENTERSIZEMOVE => {
                // The taskbar enters size-move for its own drag
                // handling; aligning it to window edges makes no sense.
                if !is_taskbar(cwp.hwnd) {
                    subclass::install(cwp.hwnd);
                }
            }
            WM_SIZE => restore::on_wm_size(cwp.hwnd, cwp.wParam),
            WM_NCDESTROY => restore::forget(cwp.hwnd),
            _ => {}
        }
    }

    // SAFETY: standard hook chain forwarding.
    unsafe { CallNextHookEx(None, code, wparam, lparam) }
}

fn is_taskbar(hwnd: HWND) -> bool {
    let class = window::root_class(hwnd);
    class.eq_ignore_ascii_case("Shell_TrayWnd") || class.eq_ignore_ascii_case("Shell_SecondaryTrayWnd")
}
