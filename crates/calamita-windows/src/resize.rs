//! Forcing windows to a configured size in place.

use calamita_core::config::ResizeConfig;
use calamita_core::{WindowResult, log_info};
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::WindowsAndMessaging::{
    GWLP_HWNDPARENT, GetForegroundWindow, GetWindowLongPtrW, IsIconic, IsWindowVisible, IsZoomed,
    SW_RESTORE, SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOZORDER, SetWindowPos, ShowWindow,
};

use crate::{enumerate, window};

/// Resizes the active window to the configured size, keeping its
/// position. A maximized window is restored first so the size sticks.
///
/// Owned windows (dialogs, property sheets) are left alone: their size
/// usually belongs to their owner's layout, not to the user.
pub fn resize_active(config: &ResizeConfig) -> WindowResult<()> {
    // SAFETY: simple state queries on the foreground window.
    let hwnd = unsafe { GetForegroundWindow() };
    if hwnd.is_invalid() {
        return Err("no active window".into());
    }
    if !unsafe { IsWindowVisible(hwnd) }.as_bool() || unsafe { IsIconic(hwnd) }.as_bool() {
        return Err("active window is not visible".into());
    }
    if is_owned(hwnd) || !window::is_app_window(hwnd) {
        return Err("active window is not a resizable application window".into());
    }

    if unsafe { IsZoomed(hwnd) }.as_bool() {
        // SAFETY: restores the window on its own terms before resizing.
        unsafe {
            let _ = ShowWindow(hwnd, SW_RESTORE);
        }
    }

    apply_size(hwnd, config)?;
    log_info!("resized the active window to {}x{}", config.width, config.height);
    Ok(())
}

/// Resizes every restored application window to the configured size,
/// keeping each window's position. Maximized and minimized windows stay
/// put. Returns how many windows were resized.
pub fn resize_all_restored(config: &ResizeConfig) -> WindowResult<usize> {
    let mut resized = 0;
    for info in enumerate::list_candidates() {
        let hwnd = window::hwnd_from_raw(info.hwnd);
        if !window::is_app_window(hwnd) || is_owned(hwnd) {
            continue;
        }
        // SAFETY: simple state queries.
        if unsafe { IsZoomed(hwnd) }.as_bool() || unsafe { IsIconic(hwnd) }.as_bool() {
            continue;
        }
        if apply_size(hwnd, config).is_ok() {
            resized += 1;
        }
    }

    log_info!("resized {resized} restored windows to {}x{}", config.width, config.height);
    Ok(resized)
}

fn apply_size(hwnd: HWND, config: &ResizeConfig) -> WindowResult<()> {
    // SAFETY: SetWindowPos resizes the window; SWP_NOMOVE keeps its
    // position.
    unsafe {
        SetWindowPos(
            hwnd,
            None,
            0,
            0,
            config.width,
            config.height,
            SWP_NOMOVE | SWP_NOZORDER | SWP_NOACTIVATE,
        )
    }?;
    Ok(())
}

/// Returns whether the window has an owner. Top-level windows have no
/// parent, so the HWNDPARENT slot holds the owner handle.
fn is_owned(hwnd: HWND) -> bool {
    // SAFETY: GetWindowLongPtrW reads the owner slot.
    unsafe { GetWindowLongPtrW(hwnd, GWLP_HWNDPARENT) != 0 }
}
