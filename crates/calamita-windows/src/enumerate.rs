use calamita_core::Rect;
use windows::Win32::Foundation::{HWND, LPARAM};
use windows::Win32::Graphics::Dwm::{DWMWA_CLOAKED, DwmGetWindowAttribute};
use windows::Win32::UI::WindowsAndMessaging::{EnumWindows, IsIconic, IsWindowVisible};
use windows::core::BOOL;

use crate::{frame, window};

/// Collects the frame rectangles of every snap-candidate window, in
/// front-to-back z-order (the natural `EnumWindows` order).
///
/// The dragged window itself is excluded, as are invisible, cloaked,
/// and minimized windows, no-activate/tool-window surfaces, windows
/// whose frame query fails, and degenerate rectangles. A filtered-out
/// window simply contributes no edges; enumeration always continues.
pub fn snap_target_rects(exclude: HWND) -> Vec<Rect> {
    let mut state = EnumState {
        exclude,
        rects: Vec::new(),
    };

    // SAFETY: EnumWindows runs our callback synchronously for each
    // top-level window; the state outlives the call.
    unsafe {
        let _ = EnumWindows(
            Some(enum_window_callback),
            LPARAM(&mut state as *mut _ as isize),
        );
    }

    state.rects
}

/// Lists snap-candidate windows with title/class metadata, for the
/// `debug windows` command.
pub fn list_candidates() -> Vec<window::WindowInfo> {
    let mut infos: Vec<window::WindowInfo> = Vec::new();

    // SAFETY: as in snap_target_rects; the Vec outlives the call.
    unsafe {
        let _ = EnumWindows(
            Some(list_window_callback),
            LPARAM(&mut infos as *mut _ as isize),
        );
    }

    infos
}

unsafe extern "system" fn list_window_callback(hwnd: HWND, lparam: LPARAM) -> BOOL {
    // SAFETY: lparam is the Vec<WindowInfo> pointer passed by list_candidates().
    let infos = unsafe { &mut *(lparam.0 as *mut Vec<window::WindowInfo>) };

    if let Some(rect) = candidate_rect(hwnd) {
        infos.push(window::WindowInfo {
            hwnd: hwnd.0 as usize,
            title: window::title(hwnd),
            class: window::class(hwnd),
            rect,
        });
    }

    BOOL(1)
}

struct EnumState {
    exclude: HWND,
    rects: Vec<Rect>,
}

unsafe extern "system" fn enum_window_callback(hwnd: HWND, lparam: LPARAM) -> BOOL {
    // SAFETY: lparam is the EnumState pointer passed by snap_target_rects().
    let state = unsafe { &mut *(lparam.0 as *mut EnumState) };

    if hwnd != state.exclude
        && let Some(rect) = candidate_rect(hwnd)
    {
        state.rects.push(rect);
    }

    BOOL(1) // continue enumerating
}

/// Returns the window's frame rectangle if it qualifies as a snap
/// target, `None` otherwise.
fn candidate_rect(hwnd: HWND) -> Option<Rect> {
    // SAFETY: simple query functions reading window state.
    unsafe {
        if !IsWindowVisible(hwnd).as_bool() {
            return None;
        }
        if IsIconic(hwnd).as_bool() {
            return None;
        }
    }
    if is_cloaked(hwnd) {
        return None;
    }
    if window::has_excluded_style(hwnd) {
        return None;
    }

    let rc = frame::frame_bounds(hwnd).ok()?;
    let rect = Rect::from_edges(rc.left, rc.top, rc.right, rc.bottom);
    if rect.is_degenerate() {
        return None;
    }

    Some(rect)
}

/// Returns whether DWM has cloaked the window (hidden UWP surfaces,
/// windows on other virtual desktops).
pub fn is_cloaked(hwnd: HWND) -> bool {
    let mut cloaked = 0u32;
    // SAFETY: DwmGetWindowAttribute writes a DWORD for DWMWA_CLOAKED.
    let result = unsafe {
        DwmGetWindowAttribute(
            hwnd,
            DWMWA_CLOAKED,
            &mut cloaked as *mut u32 as *mut _,
            std::mem::size_of::<u32>() as u32,
        )
    };
    result.is_ok() && cloaked != 0
}
