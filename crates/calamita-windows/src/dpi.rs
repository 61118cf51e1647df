use windows::Win32::Foundation::HWND;
use windows::Win32::UI::HiDpi::GetDpiForWindow;

/// Returns the DPI the window is currently rendered at.
///
/// Returns 0 when the window is invalid, which callers treat as
/// "unknown — don't scale".
pub fn dpi_for_window(hwnd: HWND) -> u32 {
    // SAFETY: GetDpiForWindow is a simple query on a window handle.
    unsafe { GetDpiForWindow(hwnd) }
}
