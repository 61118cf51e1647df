use calamita_core::Rect;
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::WindowsAndMessaging::{
    GA_ROOT, GWL_EXSTYLE, GWL_STYLE, GetAncestor, GetWindowLongPtrW, GetWindowTextLengthW,
    GetWindowTextW, RealGetWindowClassW, WS_CAPTION, WS_EX_NOACTIVATE, WS_EX_TOOLWINDOW,
};

/// A snapshot of one top-level window, used by the inspection commands.
#[derive(Debug, Clone)]
pub struct WindowInfo {
    pub hwnd: usize,
    pub title: String,
    pub class: String,
    pub rect: Rect,
}

/// Constructs an `HWND` from a raw handle value.
///
/// Lets callers address windows without depending on the `windows`
/// crate directly.
pub fn hwnd_from_raw(handle: usize) -> HWND {
    HWND(handle as *mut _)
}

/// Returns the window title, or an empty string.
pub fn title(hwnd: HWND) -> String {
    // SAFETY: GetWindowTextLengthW and GetWindowTextW read window text
    // without modifying state.
    unsafe {
        let length = GetWindowTextLengthW(hwnd);
        if length == 0 {
            return String::new();
        }

        // +1 for the null terminator that Windows requires
        let mut buffer = vec![0u16; (length + 1) as usize];
        let copied = GetWindowTextW(hwnd, &mut buffer);
        String::from_utf16_lossy(&buffer[..copied as usize])
    }
}

/// Returns the window class name.
pub fn class(hwnd: HWND) -> String {
    // SAFETY: RealGetWindowClassW reads the window class name.
    // 256 is the maximum class name length in Win32.
    unsafe {
        let mut buffer = [0u16; 256];
        let length = RealGetWindowClassW(hwnd, &mut buffer);
        String::from_utf16_lossy(&buffer[..length as usize])
    }
}

/// Returns the class name of the window's root ancestor.
pub fn root_class(hwnd: HWND) -> String {
    let root = unsafe { GetAncestor(hwnd, GA_ROOT) };
    class(root)
}

/// Returns whether the window carries a style that excludes it from
/// snapping: no-activate surfaces and tool windows are not real
/// application windows a drag should align to.
pub fn has_excluded_style(hwnd: HWND) -> bool {
    // SAFETY: GetWindowLongPtrW reads window styles.
    let ex_style = unsafe { GetWindowLongPtrW(hwnd, GWL_EXSTYLE) } as u32;
    ex_style & (WS_EX_NOACTIVATE.0 | WS_EX_TOOLWINDOW.0) != 0
}

/// Returns whether this looks like a real application window: it has a
/// caption bar and is not a tool window.
pub fn is_app_window(hwnd: HWND) -> bool {
    // SAFETY: GetWindowLongPtrW reads window styles.
    unsafe {
        let style = GetWindowLongPtrW(hwnd, GWL_STYLE) as u32;
        let ex_style = GetWindowLongPtrW(hwnd, GWL_EXSTYLE) as u32;

        let has_caption = (style & WS_CAPTION.0) == WS_CAPTION.0;
        let is_tool = (ex_style & WS_EX_TOOLWINDOW.0) == WS_EX_TOOLWINDOW.0;

        has_caption && !is_tool
    }
}
