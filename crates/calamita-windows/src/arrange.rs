//! Gathering scattered windows onto the monitor under the cursor.

use calamita_core::{Rect, WindowResult, log_info};
use windows::Win32::Foundation::{POINT, RECT};
use windows::Win32::UI::WindowsAndMessaging::{
    GetCursorPos, GetWindowRect, IsIconic, IsZoomed, SWP_NOACTIVATE, SWP_NOZORDER, SetWindowPos,
};

use crate::{enumerate, monitor, window};

/// Moves every normal application window to the monitor under the
/// cursor, preserving each window's size and its position relative to
/// its previous monitor's work area. Returns how many windows moved.
///
/// Maximized and minimized windows stay put: the shell restores them to
/// their remembered monitor, and yanking that out from under it is more
/// surprising than useful.
pub fn gather_to_cursor_monitor() -> WindowResult<usize> {
    let mut cursor = POINT::default();
    // SAFETY: GetCursorPos fills the POINT.
    unsafe { GetCursorPos(&mut cursor) }?;

    let target_monitor = monitor::monitor_at(cursor.x, cursor.y);
    let target_area = monitor::work_area_at(cursor.x, cursor.y)?;

    let mut moved = 0;
    for info in enumerate::list_candidates() {
        let hwnd = window::hwnd_from_raw(info.hwnd);
        if !window::is_app_window(hwnd) {
            continue;
        }
        // SAFETY: simple state queries.
        if unsafe { IsZoomed(hwnd) }.as_bool() || unsafe { IsIconic(hwnd) }.as_bool() {
            continue;
        }
        if monitor::monitor_for_window(hwnd) == target_monitor {
            continue;
        }
        let Ok(source_area) = monitor::work_area_for_window(hwnd) else {
            continue;
        };

        let mut rc = RECT::default();
        // SAFETY: GetWindowRect fills the RECT.
        if unsafe { GetWindowRect(hwnd, &mut rc) }.is_err() {
            continue;
        }
        let rect = Rect::from_edges(rc.left, rc.top, rc.right, rc.bottom);
        let placed = translate(&rect, &source_area, &target_area);

        // SAFETY: SetWindowPos repositions the window.
        let result = unsafe {
            SetWindowPos(
                hwnd,
                None,
                placed.x,
                placed.y,
                placed.width,
                placed.height,
                SWP_NOZORDER | SWP_NOACTIVATE,
            )
        };
        if result.is_ok() {
            moved += 1;
        }
    }

    log_info!("gathered {moved} windows to the cursor monitor");
    Ok(moved)
}

/// Maps a window rectangle from one work area to another, keeping the
/// same offset from the top-left corner and clamping so the window
/// stays fully inside the destination.
fn translate(rect: &Rect, source: &Rect, target: &Rect) -> Rect {
    let width = rect.width.min(target.width);
    let height = rect.height.min(target.height);

    let x = (target.x + (rect.x - source.x))
        .min(target.right() - width)
        .max(target.x);
    let y = (target.y + (rect.y - source.y))
        .min(target.bottom() - height)
        .max(target.y);

    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_preserved_between_equal_monitors() {
        let source = Rect::new(0, 0, 1920, 1040);
        let target = Rect::new(1920, 0, 1920, 1040);
        let rect = Rect::new(100, 200, 800, 600);

        assert_eq!(
            translate(&rect, &source, &target),
            Rect::new(2020, 200, 800, 600)
        );
    }

    #[test]
    fn window_is_clamped_into_a_smaller_target() {
        let source = Rect::new(0, 0, 2560, 1400);
        let target = Rect::new(2560, 0, 1280, 720);
        let rect = Rect::new(1800, 900, 1000, 600);

        let placed = translate(&rect, &source, &target);
        assert_eq!(placed.width, 1000);
        assert_eq!(placed.height, 600);
        assert_eq!(placed.right(), target.right());
        assert_eq!(placed.bottom(), target.bottom());
    }

    #[test]
    fn oversized_window_shrinks_to_the_work_area() {
        let source = Rect::new(0, 0, 2560, 1400);
        let target = Rect::new(2560, 0, 1280, 720);
        let rect = Rect::new(0, 0, 2000, 1400);

        assert_eq!(
            translate(&rect, &source, &target),
            Rect::new(2560, 0, 1280, 720)
        );
    }
}
