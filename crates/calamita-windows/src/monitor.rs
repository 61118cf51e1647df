use std::mem;

use calamita_core::{Rect, WindowResult};
use windows::Win32::Foundation::{HWND, LPARAM, POINT, RECT};
use windows::Win32::Graphics::Gdi::{
    EnumDisplayMonitors, GetMonitorInfoW, HDC, HMONITOR, MONITOR_DEFAULTTONEAREST, MONITORINFO,
    MonitorFromPoint, MonitorFromWindow,
};
use windows::core::BOOL;

/// Returns the work areas of every monitor, taskbars excluded.
///
/// A monitor whose info query fails simply contributes nothing; the
/// rest of the enumeration continues.
pub fn work_areas() -> Vec<Rect> {
    let mut areas: Vec<Rect> = Vec::new();

    // SAFETY: EnumDisplayMonitors calls our callback synchronously for
    // each monitor; the Vec outlives the call.
    unsafe {
        let _ = EnumDisplayMonitors(
            None,
            None,
            Some(enum_monitor_callback),
            LPARAM(&mut areas as *mut _ as isize),
        );
    }

    areas
}

unsafe extern "system" fn enum_monitor_callback(
    monitor: HMONITOR,
    _hdc: HDC,
    _clip: *mut RECT,
    lparam: LPARAM,
) -> BOOL {
    // SAFETY: lparam is the Vec<Rect> pointer passed by work_areas().
    let areas = unsafe { &mut *(lparam.0 as *mut Vec<Rect>) };

    if let Ok(area) = query_work_area(monitor) {
        areas.push(area);
    }

    BOOL(1) // continue enumerating
}

/// Returns the work area of the monitor containing the given window.
pub fn work_area_for_window(hwnd: HWND) -> WindowResult<Rect> {
    let monitor = unsafe { MonitorFromWindow(hwnd, MONITOR_DEFAULTTONEAREST) };
    query_work_area(monitor)
}

/// Returns the work area of the monitor under the cursor position.
pub fn work_area_at(x: i32, y: i32) -> WindowResult<Rect> {
    let monitor = unsafe { MonitorFromPoint(POINT { x, y }, MONITOR_DEFAULTTONEAREST) };
    query_work_area(monitor)
}

/// Returns the monitor handle under a point, for "is this window
/// already there" checks.
pub fn monitor_at(x: i32, y: i32) -> HMONITOR {
    unsafe { MonitorFromPoint(POINT { x, y }, MONITOR_DEFAULTTONEAREST) }
}

/// Returns the monitor handle containing a window.
pub fn monitor_for_window(hwnd: HWND) -> HMONITOR {
    unsafe { MonitorFromWindow(hwnd, MONITOR_DEFAULTTONEAREST) }
}

fn query_work_area(monitor: HMONITOR) -> WindowResult<Rect> {
    let mut info = MONITORINFO {
        cbSize: mem::size_of::<MONITORINFO>() as u32,
        ..Default::default()
    };

    // SAFETY: GetMonitorInfoW fills the MONITORINFO struct with
    // monitor dimensions. We set cbSize as required by the API.
    let success = unsafe { GetMonitorInfoW(monitor, &mut info) };

    if !success.as_bool() {
        return Err("Failed to get monitor info".into());
    }

    let rc = info.rcWork;
    Ok(Rect::from_edges(rc.left, rc.top, rc.right, rc.bottom))
}
