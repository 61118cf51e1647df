//! Drag-session orchestration.
//!
//! Sessions live in a thread-local map keyed by window handle: every
//! message that reaches a session was delivered on the window's own UI
//! thread, so no locking is involved. Only the configuration snapshot
//! is shared across threads, behind an `RwLock` that is written solely
//! by settings reloads.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

use calamita_core::config::{self, SnapConfig};
use calamita_core::{Config, DragSession, EdgeIndex, MoveSample, log_debug};
use windows::Win32::Foundation::{HWND, RECT};
use windows::Win32::UI::WindowsAndMessaging::{
    GetMessagePos, GetWindowRect, IsIconic, IsWindowArranged, IsZoomed, SWP_NOMOVE, SWP_NOSIZE,
    WINDOWPOS,
};

use crate::{dpi, enumerate, frame, keys, monitor};

thread_local! {
    static SESSIONS: RefCell<HashMap<usize, DragSession>> = RefCell::new(HashMap::new());
}

static SETTINGS: OnceLock<RwLock<Config>> = OnceLock::new();

fn settings_cell() -> &'static RwLock<Config> {
    SETTINGS.get_or_init(|| RwLock::new(config::load()))
}

/// Returns a snapshot of the current configuration.
pub fn settings() -> Config {
    settings_cell()
        .read()
        .map(|c| c.clone())
        .unwrap_or_default()
}

/// Re-reads the configuration file and swaps in the result. Sessions
/// already in progress keep the tolerance they started with.
pub fn reload_settings() {
    let fresh = config::load();
    if let Ok(mut cfg) = settings_cell().write() {
        *cfg = fresh;
    }
}

fn snap_settings() -> SnapConfig {
    settings_cell()
        .read()
        .map(|c| c.snapping)
        .unwrap_or_default()
}

/// Begins a drag gesture: enumerates snap targets and monitor work
/// areas, builds the edge index, and opens a session for the window.
///
/// The index is built once here and stays frozen for the whole gesture,
/// so other windows moving mid-drag do not shift the targets.
pub fn on_enter_size_move(hwnd: HWND) {
    let snap = snap_settings();
    if !snap.enabled {
        return;
    }

    let handle = hwnd.0 as usize;
    let targets = enumerate::snap_target_rects(hwnd);
    let areas = monitor::work_areas();
    log_debug!(
        "drag start {handle:#x}: {} snap targets, {} work areas",
        targets.len(),
        areas.len()
    );

    let index = EdgeIndex::build(&targets, &areas);
    SESSIONS.with_borrow_mut(|sessions| {
        sessions.insert(handle, DragSession::new(index, snap.distance));
    });
}

/// Ends a drag gesture.
pub fn on_exit_size_move(hwnd: HWND) {
    remove_session(hwnd);
}

/// Drops any session for the window. Also the cleanup path for window
/// destruction and unsubclassing.
pub fn remove_session(hwnd: HWND) {
    SESSIONS.with_borrow_mut(|sessions| {
        sessions.remove(&(hwnd.0 as usize));
    });
}

/// Intercepts a proposed window-position change mid-drag.
///
/// Pure moves are drift-corrected and snapped in place by rewriting the
/// proposed coordinates. Updates that change the window size are never
/// adjusted; they clear the session's drift baseline instead, so the
/// next pure move starts fresh.
pub fn on_window_pos_changing(hwnd: HWND, pos: &mut WINDOWPOS) {
    if pos.flags.contains(SWP_NOSIZE | SWP_NOMOVE) {
        return;
    }

    let mut rc = RECT::default();
    // SAFETY: GetWindowRect fills the RECT for a valid window; on
    // failure we leave the update alone.
    if unsafe { GetWindowRect(hwnd, &mut rc) }.is_err() {
        return;
    }

    // Fill in whichever half of the update the flags say is absent.
    let (mut x, mut y) = if pos.flags.contains(SWP_NOMOVE) {
        (rc.left, rc.top)
    } else {
        (pos.x, pos.y)
    };
    let (cx, cy) = if pos.flags.contains(SWP_NOSIZE) {
        (rc.right - rc.left, rc.bottom - rc.top)
    } else {
        (pos.cx, pos.cy)
    };

    let pos_changed = rc.left != x || rc.top != y;
    let size_changed = rc.right - rc.left != cx || rc.bottom - rc.top != cy;
    if !pos_changed && !size_changed {
        return;
    }

    SESSIONS.with_borrow_mut(|sessions| {
        let Some(session) = sessions.get_mut(&(hwnd.0 as usize)) else {
            return;
        };

        if size_changed {
            session.forget_last();
            return;
        }

        session.refresh_metrics(
            dpi::dpi_for_window(hwnd),
            unsafe { IsZoomed(hwnd) }.as_bool(),
            || frame::border_offset(hwnd).unwrap_or_default(),
        );

        // SAFETY: simple queries of window and message state.
        let sample = unsafe {
            let message_pos = GetMessagePos();
            MoveSample {
                minimized: IsIconic(hwnd).as_bool(),
                maximized: IsZoomed(hwnd).as_bool(),
                arranged: IsWindowArranged(hwnd).as_bool(),
                cursor_x: i32::from(message_pos as u16 as i16),
                cursor_y: i32::from((message_pos >> 16) as u16 as i16),
                x,
                y,
            }
        };

        let snap = snap_settings();
        let snap_now = snap.enabled && !keys::disable_combo_held(&snap.disable_keys);
        (x, y) = session.propose_move(sample, cx, cy, snap_now);

        if !pos.flags.contains(SWP_NOMOVE) {
            pos.x = x;
            pos.y = y;
        }
    });
}
