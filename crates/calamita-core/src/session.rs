//! Per-gesture drag state: metrics cache, drift correction, snapping.
//!
//! One `DragSession` exists per window currently being moved, owned by
//! the UI thread that delivers that window's messages — no locking is
//! needed here. The session is created on enter-move, fed every
//! proposed-position update, and discarded on exit-move or destruction.

use crate::magnet::EdgeIndex;

/// The invisible border widths around a window.
///
/// On Windows 10/11, windows have invisible drop-shadow borders that the
/// outer window rect includes but that are not visually part of the
/// window. Typical values are ~7px left/right/bottom and 0px top.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BorderOffset {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

/// Everything sampled from the window at one proposed-position update.
///
/// `cursor_x`/`cursor_y` are the raw screen coordinates of the input
/// that produced the message; `x`/`y` are the proposed outer-rect
/// position reported by the window manager. The two drift apart under
/// DPI virtualization, which is what the correction below compensates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveSample {
    pub minimized: bool,
    pub maximized: bool,
    pub arranged: bool,
    pub cursor_x: i32,
    pub cursor_y: i32,
    pub x: i32,
    pub y: i32,
}

impl MoveSample {
    fn flags_match(&self, other: &MoveSample) -> bool {
        self.minimized == other.minimized
            && self.maximized == other.maximized
            && self.arranged == other.arranged
    }
}

/// State for one window-move gesture.
pub struct DragSession {
    index: EdgeIndex,
    last: Option<MoveSample>,
    dpi: Option<u32>,
    maximized: bool,
    border: BorderOffset,
    intrinsic_distance: i32,
    magnet_px: i32,
}

impl DragSession {
    /// Creates a session around an edge index built at drag start.
    ///
    /// `intrinsic_distance` is the configured snap tolerance before DPI
    /// scaling; the effective tolerance is computed by
    /// [`refresh_metrics`](Self::refresh_metrics).
    pub fn new(index: EdgeIndex, intrinsic_distance: i32) -> Self {
        Self {
            index,
            last: None,
            dpi: None,
            maximized: false,
            border: BorderOffset::default(),
            intrinsic_distance,
            magnet_px: intrinsic_distance,
        }
    }

    /// Recomputes the border offsets and the DPI-scaled magnet distance.
    ///
    /// The cache is invalidated only when the window's DPI or maximize
    /// state changed since the previous call; `border` is only invoked
    /// on invalidation. A DPI of zero means "unknown" and leaves the
    /// tolerance unscaled.
    pub fn refresh_metrics(&mut self, dpi: u32, maximized: bool, border: impl FnOnce() -> BorderOffset) {
        if self.dpi == Some(dpi) && self.maximized == maximized {
            return;
        }
        self.dpi = Some(dpi);
        self.maximized = maximized;
        self.border = border();
        self.magnet_px = if dpi > 0 {
            mul_div(self.intrinsic_distance, dpi as i32, 96)
        } else {
            self.intrinsic_distance
        };
    }

    /// Processes one proposed pure-position update and returns the
    /// adjusted position.
    ///
    /// When the window's minimize/maximize/arrange flags are unchanged
    /// since the previous update, the proposed position is first
    /// corrected for cursor drift introduced by DPI-context switches
    /// (the cursor-to-position delta is compared against the previous
    /// update's delta), then snapped against the edge index. When any
    /// flag changed — the window was aero-snapped mid-drag, say — the
    /// update passes through untouched and the drift baseline is
    /// cleared so a stale correction cannot apply to the next update.
    ///
    /// `snap_now` is false while the configured disable-modifier
    /// combination is held; drift correction still applies then.
    pub fn propose_move(&mut self, mut sample: MoveSample, cx: i32, cy: i32, snap_now: bool) -> (i32, i32) {
        let flags_unchanged = self.last.is_none_or(|last| last.flags_match(&sample));

        if !flags_unchanged {
            self.last = None;
            return (sample.x, sample.y);
        }

        if let Some(last) = self.last {
            let last_delta_x = last.cursor_x - last.x;
            let last_delta_y = last.cursor_y - last.y;
            let delta_x = sample.cursor_x - sample.x;
            let delta_y = sample.cursor_y - sample.y;

            sample.x -= last_delta_x - delta_x;
            sample.y -= last_delta_y - delta_y;
        }
        self.last = Some(sample);

        let (mut x, mut y) = (sample.x, sample.y);
        if snap_now {
            self.index.snap_move(&mut x, &mut y, cx, cy, &self.border, self.magnet_px);
        }
        (x, y)
    }

    /// Clears the drift-correction baseline.
    ///
    /// Called when an update includes a size change, which is never
    /// snapped and must not feed the baseline.
    pub fn forget_last(&mut self) {
        self.last = None;
    }
}

/// `value * num / den` with round-to-nearest, as Win32's `MulDiv`.
pub fn mul_div(value: i32, num: i32, den: i32) -> i32 {
    ((i64::from(value) * i64::from(num) + i64::from(den) / 2) / i64::from(den)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rect;

    fn empty_session() -> DragSession {
        DragSession::new(EdgeIndex::build(&[], &[Rect::new(0, 0, 1920, 1080)]), 25)
    }

    fn sample(x: i32, y: i32, cursor_x: i32, cursor_y: i32) -> MoveSample {
        MoveSample {
            minimized: false,
            maximized: false,
            arranged: false,
            cursor_x,
            cursor_y,
            x,
            y,
        }
    }

    #[test]
    fn first_update_is_not_drift_corrected() {
        // Away from every work-area edge so nothing snaps.
        let mut s = empty_session();
        let (x, y) = s.propose_move(sample(500, 510, 600, 600), 80, 80, true);
        assert_eq!((x, y), (500, 510));
    }

    #[test]
    fn drift_correction_tracks_delta_change() {
        let mut s = empty_session();
        // Baseline: cursor-to-position delta of (90, 90).
        s.propose_move(sample(10, 10, 100, 100), 80, 80, true);

        // Next update the reported position lags the cursor by (95, 92):
        // 5px / 2px of virtualization drift to undo.
        let (x, y) = s.propose_move(sample(55, 58, 150, 150), 80, 80, true);
        assert_eq!((x, y), (60, 60));
    }

    #[test]
    fn corrected_position_feeds_the_next_baseline() {
        let mut s = empty_session();
        s.propose_move(sample(10, 10, 100, 100), 80, 80, true);
        s.propose_move(sample(55, 58, 150, 150), 80, 80, true);

        // The stored baseline is the corrected (60, 60), so an update
        // consistent with it needs no further correction.
        let (x, y) = s.propose_move(sample(70, 70, 160, 160), 80, 80, true);
        assert_eq!((x, y), (70, 70));
    }

    #[test]
    fn flag_change_passes_through_and_clears_baseline() {
        let mut s = empty_session();
        s.propose_move(sample(10, 10, 100, 100), 80, 80, true);

        let mut maximized = sample(55, 58, 150, 150);
        maximized.maximized = true;
        assert_eq!(s.propose_move(maximized, 80, 80, true), (55, 58));

        // Baseline cleared: the next update is not corrected either.
        let (x, y) = s.propose_move(sample(57, 60, 152, 152), 80, 80, true);
        assert_eq!((x, y), (57, 60));
    }

    #[test]
    fn forget_last_clears_baseline() {
        let mut s = empty_session();
        s.propose_move(sample(10, 10, 100, 100), 80, 80, true);
        s.forget_last();

        let (x, y) = s.propose_move(sample(55, 58, 150, 150), 80, 80, true);
        assert_eq!((x, y), (55, 58));
    }

    #[test]
    fn snapping_skipped_while_disable_keys_held() {
        let stationary = Rect::from_edges(100, 100, 400, 300);
        let index = EdgeIndex::build(&[stationary], &[Rect::new(0, 0, 1920, 1080)]);
        let mut s = DragSession::new(index, 25);
        s.refresh_metrics(96, false, BorderOffset::default);

        // Right edge at 98 would snap to 100, but snapping is suspended.
        let (x, _) = s.propose_move(sample(18, 120, 58, 160), 80, 80, false);
        assert_eq!(x, 18);

        // Same position with snapping active.
        let mut s2 = DragSession::new(
            EdgeIndex::build(&[stationary], &[Rect::new(0, 0, 1920, 1080)]),
            25,
        );
        s2.refresh_metrics(96, false, BorderOffset::default);
        let (x, _) = s2.propose_move(sample(18, 120, 58, 160), 80, 80, true);
        assert_eq!(x + 80, 100);
    }

    #[test]
    fn metrics_cache_invalidates_on_dpi_or_maximize_change_only() {
        let mut s = empty_session();
        let probes = std::cell::Cell::new(0);
        let probe = || {
            probes.set(probes.get() + 1);
            BorderOffset::default()
        };

        s.refresh_metrics(96, false, &probe);
        s.refresh_metrics(96, false, &probe);
        assert_eq!(probes.get(), 1);

        s.refresh_metrics(120, false, &probe);
        assert_eq!(probes.get(), 2);

        s.refresh_metrics(120, true, &probe);
        assert_eq!(probes.get(), 3);

        s.refresh_metrics(120, true, &probe);
        assert_eq!(probes.get(), 3);
    }

    #[test]
    fn magnet_distance_scales_with_dpi() {
        let stationary = Rect::from_edges(200, 0, 500, 300);
        let index = EdgeIndex::build(&[stationary], &[Rect::new(0, 0, 1920, 1080)]);
        let mut s = DragSession::new(index, 20);

        // At 144 DPI (150%), the effective tolerance is 30px: a target
        // 28px away still attracts.
        s.refresh_metrics(144, false, BorderOffset::default);
        let (x, _) = s.propose_move(sample(92, 100, 100, 100), 80, 80, true);
        assert_eq!(x + 80, 200);
    }

    #[test]
    fn mul_div_rounds_to_nearest() {
        assert_eq!(mul_div(25, 96, 96), 25);
        assert_eq!(mul_div(25, 120, 96), 31); // 31.25
        assert_eq!(mul_div(20, 144, 96), 30);
        assert_eq!(mul_div(25, 168, 96), 44); // 43.75
    }

    // The original implementation read the minimized and maximized
    // flags through swapped queries. The flags are only ever compared
    // for equality between consecutive samples, so swapping them is
    // behavior-neutral; this pins that equality semantics.
    #[test]
    fn swapped_flag_queries_are_equivalent_under_comparison() {
        let a = MoveSample {
            minimized: true,
            maximized: false,
            ..sample(0, 0, 0, 0)
        };
        let swapped_a = MoveSample {
            minimized: false,
            maximized: true,
            ..sample(0, 0, 0, 0)
        };
        let b = a;
        let swapped_b = swapped_a;

        assert_eq!(a.flags_match(&b), swapped_a.flags_match(&swapped_b));
    }
}
