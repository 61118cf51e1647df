//! Default window size on restore.
//!
//! When enabled, a window coming back from maximized or minimized is
//! resized to the configured default and centered on its monitor's work
//! area. The transition is detected by remembering the previous
//! `WM_SIZE` kind per window; a plain `SIZE_RESTORED` after another
//! `SIZE_RESTORED` (a normal resize) is left alone.

use std::cell::RefCell;
use std::collections::HashMap;

use calamita_core::config::RestoreSizeConfig;
use calamita_core::{Rect, log_debug};
use windows::Win32::Foundation::{HWND, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::{
    SIZE_MAXIMIZED, SIZE_MINIMIZED, SIZE_RESTORED, SWP_NOACTIVATE, SWP_NOZORDER, SetWindowPos,
};

use crate::{engine, monitor, window};

thread_local! {
    static LAST_SIZE_KIND: RefCell<HashMap<usize, u32>> = RefCell::new(HashMap::new());
}

/// Records a `WM_SIZE` and applies the default size when the window
/// just left the maximized or minimized state.
pub fn on_wm_size(hwnd: HWND, wparam: WPARAM) {
    let kind = wparam.0 as u32;
    let handle = hwnd.0 as usize;
    let previous = LAST_SIZE_KIND.with_borrow_mut(|kinds| kinds.insert(handle, kind));

    if kind != SIZE_RESTORED {
        return;
    }
    let Some(previous) = previous else {
        return;
    };
    if previous != SIZE_MAXIMIZED && previous != SIZE_MINIMIZED {
        return;
    }

    let cfg = engine::settings().restore_size;
    if !cfg.enabled || !window::is_app_window(hwnd) {
        return;
    }

    let Ok(area) = monitor::work_area_for_window(hwnd) else {
        return;
    };
    let target = placement(&area, &cfg);
    log_debug!("restoring {handle:#x} to default size at {target:?}");

    // SAFETY: SetWindowPos moves and resizes the window; failures mean
    // the window refused the change, which is fine.
    unsafe {
        let _ = SetWindowPos(
            hwnd,
            None,
            target.x,
            target.y,
            target.width,
            target.height,
            SWP_NOZORDER | SWP_NOACTIVATE,
        );
    }
}

/// Drops the tracked state for a destroyed window.
pub fn forget(hwnd: HWND) {
    LAST_SIZE_KIND.with_borrow_mut(|kinds| {
        kinds.remove(&(hwnd.0 as usize));
    });
}

/// Computes the default-size rectangle centered in a work area, clamped
/// so it always fits.
fn placement(area: &Rect, cfg: &RestoreSizeConfig) -> Rect {
    let width = cfg.width.min(area.width);
    let height = cfg.height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
