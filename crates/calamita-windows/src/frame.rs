use std::mem;

use calamita_core::session::BorderOffset;
use calamita_core::{WindowResult, session::mul_div};
use windows::Win32::Foundation::{HWND, RECT};
use windows::Win32::Graphics::Dwm::{DWMWA_EXTENDED_FRAME_BOUNDS, DwmGetWindowAttribute};
use windows::Win32::Graphics::Gdi::{
    GetMonitorInfoW, MONITOR_DEFAULTTONEAREST, MONITORINFO, MonitorFromWindow,
};
use windows::Win32::UI::HiDpi::{
    DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2, DPI_AWARENESS_PER_MONITOR_AWARE,
    GetAwarenessFromDpiAwarenessContext, GetDpiForMonitor, GetDpiForSystem,
    GetThreadDpiAwarenessContext, MDT_EFFECTIVE_DPI, SetThreadDpiAwarenessContext,
};
use windows::Win32::UI::WindowsAndMessaging::GetWindowRect;

/// Returns the visible bounds of a window using DWM extended frame bounds.
///
/// Falls back to `GetWindowRect` if DWM is unavailable. Because the
/// engine runs on whatever UI thread delivers the window's messages,
/// the thread may not be per-monitor DPI aware — DWM then reports the
/// frame in physical pixels while everything else on the thread is
/// virtualized, so the result is rescaled into the thread's coordinate
/// space using the monitor's effective DPI and the system DPI.
pub fn frame_bounds(hwnd: HWND) -> WindowResult<RECT> {
    let mut frame = RECT::default();
    let result = unsafe {
        DwmGetWindowAttribute(
            hwnd,
            DWMWA_EXTENDED_FRAME_BOUNDS,
            &mut frame as *mut RECT as *mut _,
            mem::size_of::<RECT>() as u32,
        )
    };

    if result.is_err() {
        unsafe { GetWindowRect(hwnd, &mut frame)? };
    }

    // SAFETY: awareness-context queries read thread state only.
    let per_monitor_aware = unsafe {
        GetAwarenessFromDpiAwarenessContext(GetThreadDpiAwarenessContext())
            == DPI_AWARENESS_PER_MONITOR_AWARE
    };
    if per_monitor_aware {
        // No scaling is needed.
        return Ok(frame);
    }

    unsafe {
        // Query the physical monitor origin and DPI from a per-monitor
        // aware context, then translate the frame into the virtualized
        // coordinates the rest of this thread sees.
        let prev = SetThreadDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2);

        let monitor = MonitorFromWindow(hwnd, MONITOR_DEFAULTTONEAREST);
        let mut info = MONITORINFO {
            cbSize: mem::size_of::<MONITORINFO>() as u32,
            ..Default::default()
        };
        let _ = GetMonitorInfoW(monitor, &mut info);
        offset_rect(&mut frame, -info.rcMonitor.left, -info.rcMonitor.top);

        let (mut dpi_x, mut dpi_y) = (0u32, 0u32);
        let dpi_from = match GetDpiForMonitor(monitor, MDT_EFFECTIVE_DPI, &mut dpi_x, &mut dpi_y) {
            Ok(()) => dpi_x, // x and y are equal
            Err(_) => 0,
        };

        SetThreadDpiAwarenessContext(prev);

        let dpi_to = GetDpiForSystem();
        if dpi_from > 0 && dpi_to > 0 && dpi_from != dpi_to {
            frame.left = mul_div(frame.left, dpi_to as i32, dpi_from as i32);
            frame.top = mul_div(frame.top, dpi_to as i32, dpi_from as i32);
            frame.right = mul_div(frame.right, dpi_to as i32, dpi_from as i32);
            frame.bottom = mul_div(frame.bottom, dpi_to as i32, dpi_from as i32);
        }

        // Re-read the monitor origin in the original (virtualized)
        // context before translating back.
        let _ = GetMonitorInfoW(monitor, &mut info);
        offset_rect(&mut frame, info.rcMonitor.left, info.rcMonitor.top);
    }

    Ok(frame)
}

/// Computes the invisible border widths by comparing `GetWindowRect`
/// (includes borders) with the DWM extended frame bounds (visible area).
pub fn border_offset(hwnd: HWND) -> WindowResult<BorderOffset> {
    let mut window_rect = RECT::default();
    unsafe { GetWindowRect(hwnd, &mut window_rect)? };

    let frame_rect = frame_bounds(hwnd)?;

    Ok(BorderOffset {
        left: frame_rect.left - window_rect.left,
        top: frame_rect.top - window_rect.top,
        right: window_rect.right - frame_rect.right,
        bottom: window_rect.bottom - frame_rect.bottom,
    })
}

fn offset_rect(rc: &mut RECT, dx: i32, dy: i32) {
    rc.left += dx;
    rc.right += dx;
    rc.top += dy;
    rc.bottom += dy;
}
