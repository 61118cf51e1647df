//! Edge index and nearest-edge search for window snapping.
//!
//! The index holds four ordered collections of *visible* edge segments,
//! one per logical axis (left/top/right/bottom). It is built once per
//! drag gesture from the current desktop layout and discarded when the
//! gesture ends. All functions here are pure; Win32 geometry is queried
//! by the platform crate and passed in as plain rectangles.

use std::collections::BTreeSet;

use crate::Rect;
use crate::session::BorderOffset;

/// A visible run of one window or work-area edge.
///
/// `position` is the coordinate along the perpendicular axis (an x
/// coordinate for a left or right edge); `[span_start, span_end)` is the
/// extent along the parallel axis over which the edge is exposed.
///
/// The derived ordering — `(position, span_start, span_end)` — is what
/// the range scans below rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct EdgeSegment {
    pub position: i32,
    pub span_start: i32,
    pub span_end: i32,
}

impl EdgeSegment {
    fn new(position: i32, span_start: i32, span_end: i32) -> Self {
        Self {
            position,
            span_start,
            span_end,
        }
    }
}

/// Per-axis collections of snap targets plus the monitor work areas
/// used by the off-screen guard.
///
/// Owned exclusively by one drag session; immutable after construction.
#[derive(Debug, Default, PartialEq)]
pub struct EdgeIndex {
    left: BTreeSet<EdgeSegment>,
    top: BTreeSet<EdgeSegment>,
    right: BTreeSet<EdgeSegment>,
    bottom: BTreeSet<EdgeSegment>,
    work_areas: Vec<Rect>,
}

impl EdgeIndex {
    /// Builds the index from the desktop layout at drag start.
    ///
    /// `windows` must be ordered front-to-back (the natural `EnumWindows`
    /// order) and must not contain the dragged window. Windows are
    /// processed back-to-front: before a window's own edges are inserted,
    /// every sub-span of existing segments that its rectangle occludes is
    /// removed or split, so surviving segments are edge material actually
    /// visible on screen.
    ///
    /// Work-area edges are inserted last, mirrored (a work area's right
    /// boundary joins the left-edge collection and so on) so that a
    /// dragged window snaps to the *inside* of the work area. They are
    /// never occluded.
    pub fn build(windows: &[Rect], work_areas: &[Rect]) -> Self {
        let mut index = Self::default();

        for rc in windows.iter().rev() {
            if rc.is_degenerate() {
                continue;
            }
            let (l, t, r, b) = (rc.x, rc.y, rc.right(), rc.bottom());

            remove_occluded(&mut index.left, l, r, t, b);
            remove_occluded(&mut index.top, t, b, l, r);
            remove_occluded(&mut index.right, l, r, t, b);
            remove_occluded(&mut index.bottom, t, b, l, r);

            index.left.insert(EdgeSegment::new(l, t, b));
            index.top.insert(EdgeSegment::new(t, l, r));
            index.right.insert(EdgeSegment::new(r, t, b));
            index.bottom.insert(EdgeSegment::new(b, l, r));
        }

        for wa in work_areas {
            if wa.is_degenerate() {
                continue;
            }
            index.left.insert(EdgeSegment::new(wa.right(), wa.y, wa.bottom()));
            index.top.insert(EdgeSegment::new(wa.bottom(), wa.x, wa.right()));
            index.right.insert(EdgeSegment::new(wa.x, wa.y, wa.bottom()));
            index.bottom.insert(EdgeSegment::new(wa.y, wa.x, wa.right()));
            index.work_areas.push(*wa);
        }

        index
    }

    /// Segments of the left-edge collection, in scan order.
    pub fn left_edges(&self) -> impl Iterator<Item = &EdgeSegment> {
        self.left.iter()
    }

    pub fn top_edges(&self) -> impl Iterator<Item = &EdgeSegment> {
        self.top.iter()
    }

    pub fn right_edges(&self) -> impl Iterator<Item = &EdgeSegment> {
        self.right.iter()
    }

    pub fn bottom_edges(&self) -> impl Iterator<Item = &EdgeSegment> {
        self.bottom.iter()
    }

    /// Adjusts a proposed window position so its edges snap to nearby
    /// targets within `magnet_px`.
    ///
    /// `x`/`y`/`cx`/`cy` are outer window-rect coordinates (including the
    /// invisible drop-shadow borders); `border` translates them to the
    /// visible frame. Both anchors are searched per axis and the
    /// numerically closer candidate wins. The adjustment is dropped
    /// entirely if it would move the window's title-bar strip outside
    /// every monitor work area, where the window would become
    /// undraggable.
    pub fn snap_move(&self, x: &mut i32, y: &mut i32, cx: i32, cy: i32, border: &BorderOffset, magnet_px: i32) {
        let src_left = *x + border.left;
        let src_top = *y + border.top;
        let src_right = *x + cx - border.right;
        let src_bottom = *y + cy - border.bottom;

        let mut new_x = *x;
        let mut new_y = *y;

        // Align our right edge to a left-facing target, or our left edge
        // to a right-facing target, whichever candidate is closer.
        let target_left = find_closest(&self.left, src_right, src_top, src_bottom, magnet_px);
        let target_right = find_closest(&self.right, src_left, src_top, src_bottom, magnet_px);
        match (target_left, target_right) {
            (Some(l), Some(r)) if (l - src_right).abs() < (r - src_left).abs() => {
                new_x = l - cx + border.right;
            }
            (_, Some(r)) => new_x = r - border.left,
            (Some(l), None) => new_x = l - cx + border.right,
            (None, None) => {}
        }

        let target_top = find_closest(&self.top, src_bottom, src_left, src_right, magnet_px);
        let target_bottom = find_closest(&self.bottom, src_top, src_left, src_right, magnet_px);
        match (target_top, target_bottom) {
            (Some(t), Some(b)) if (t - src_bottom).abs() < (b - src_top).abs() => {
                new_y = t - cy + border.bottom;
            }
            (_, Some(b)) => new_y = b - border.top,
            (Some(t), None) => new_y = t - cy + border.bottom,
            (None, None) => {}
        }

        if new_x == *x && new_y == *y {
            return;
        }

        // Title-bar strip at the adjusted position: top border, full
        // visible width, one pixel tall.
        let strip = Rect::from_edges(
            new_x + border.left,
            new_y + border.top,
            new_x + cx - border.right,
            new_y + border.top + 1,
        );

        if self.work_areas.iter().any(|wa| strip.intersects(wa)) {
            *x = new_x;
            *y = new_y;
        }
    }
}

/// Removes from `segments` every sub-span occluded by a rectangle that
/// covers positions `[start, end]` and spans `[other_start, other_end)`
/// on the parallel axis. A partially covered segment is split into up to
/// two remainders.
fn remove_occluded(segments: &mut BTreeSet<EdgeSegment>, start: i32, end: i32, other_start: i32, other_end: i32) {
    let from = EdgeSegment::new(start, i32::MIN, i32::MIN);

    let mut removed = Vec::new();
    let mut added = Vec::new();

    for seg in segments.range(from..) {
        if seg.position > end {
            break;
        }
        if other_start < seg.span_end && other_end > seg.span_start {
            removed.push(*seg);
            if other_start > seg.span_start {
                added.push(EdgeSegment::new(seg.position, seg.span_start, other_start));
            }
            if other_end < seg.span_end {
                added.push(EdgeSegment::new(seg.position, other_end, seg.span_end));
            }
        }
    }

    for seg in &removed {
        segments.remove(seg);
    }
    for seg in added {
        segments.insert(seg);
    }
}

/// Finds the closest target `position` within `[source - magnet_px,
/// source + magnet_px]` whose span overlaps `[span_start, span_end)`.
///
/// The scan walks positions in ascending order. Once a qualifying
/// position is found, segments at the same position are skipped and the
/// scan stops at the first position that is not strictly closer to
/// `source` — ties keep the first candidate found.
fn find_closest(
    segments: &BTreeSet<EdgeSegment>,
    source: i32,
    span_start: i32,
    span_end: i32,
    magnet_px: i32,
) -> Option<i32> {
    let iter_end = source + magnet_px;
    let from = EdgeSegment::new(source - magnet_px, i32::MIN, i32::MIN);

    let mut target: Option<i32> = None;

    for seg in segments.range(from..) {
        if seg.position > iter_end {
            break;
        }
        if let Some(found) = target {
            if seg.position == found {
                continue;
            }
            if (source - seg.position).abs() >= (source - found).abs() {
                break;
            }
        }
        if span_start < seg.span_end && span_end > seg.span_start {
            target = Some(seg.position);
        }
    }

    target
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_BORDER: BorderOffset = BorderOffset {
        left: 0,
        top: 0,
        right: 0,
        bottom: 0,
    };

    fn big_work_area() -> Vec<Rect> {
        vec![Rect::new(0, 0, 1920, 1080)]
    }

    // ── construction ─────────────────────────────────────────────

    #[test]
    fn single_window_contributes_four_edges() {
        let index = EdgeIndex::build(&[Rect::from_edges(100, 100, 400, 300)], &[]);

        assert_eq!(
            index.left_edges().copied().collect::<Vec<_>>(),
            vec![EdgeSegment::new(100, 100, 300)]
        );
        assert_eq!(
            index.right_edges().copied().collect::<Vec<_>>(),
            vec![EdgeSegment::new(400, 100, 300)]
        );
        assert_eq!(
            index.top_edges().copied().collect::<Vec<_>>(),
            vec![EdgeSegment::new(100, 100, 400)]
        );
    }

    #[test]
    fn degenerate_window_contributes_nothing() {
        let index = EdgeIndex::build(&[Rect::new(10, 10, 0, 50)], &[]);
        assert_eq!(index.left_edges().count(), 0);
    }

    #[test]
    fn work_area_edges_are_mirrored_inward() {
        let index = EdgeIndex::build(&[], &big_work_area());

        // The work area's right boundary is a target for the dragged
        // window's right edge, so it lives in the left collection.
        assert_eq!(
            index.left_edges().copied().collect::<Vec<_>>(),
            vec![EdgeSegment::new(1920, 0, 1080)]
        );
        assert_eq!(
            index.right_edges().copied().collect::<Vec<_>>(),
            vec![EdgeSegment::new(0, 0, 1080)]
        );
        assert_eq!(
            index.top_edges().copied().collect::<Vec<_>>(),
            vec![EdgeSegment::new(1080, 0, 1920)]
        );
        assert_eq!(
            index.bottom_edges().copied().collect::<Vec<_>>(),
            vec![EdgeSegment::new(0, 0, 1920)]
        );
    }

    // ── occlusion ────────────────────────────────────────────────

    #[test]
    fn front_window_splits_occluded_edge() {
        // Back window's left edge at x=100 spans y 0..200; the front
        // window covers x 80..280, y 50..150.
        let back = Rect::from_edges(100, 0, 200, 200);
        let front = Rect::from_edges(80, 50, 280, 150);

        // Front-to-back order: front first.
        let index = EdgeIndex::build(&[front, back], &[]);

        let left: Vec<_> = index.left_edges().copied().collect();
        assert!(left.contains(&EdgeSegment::new(100, 0, 50)));
        assert!(left.contains(&EdgeSegment::new(100, 150, 200)));
        assert!(!left.contains(&EdgeSegment::new(100, 0, 200)));
        // The front window's own left edge survives untouched.
        assert!(left.contains(&EdgeSegment::new(80, 50, 150)));
    }

    #[test]
    fn fully_covered_edge_is_removed() {
        let back = Rect::from_edges(100, 0, 200, 100);
        let front = Rect::from_edges(50, 0, 250, 100);
        let index = EdgeIndex::build(&[front, back], &[]);

        // Every one of the back window's edges lies inside the front
        // window's rectangle.
        for seg in index.left_edges() {
            assert_ne!(seg.position, 100);
        }
        for seg in index.right_edges() {
            assert_ne!(seg.position, 200);
        }
    }

    #[test]
    fn no_surviving_segment_overlaps_a_fronter_window() {
        // Occlusion correctness over a small stack of rectangles.
        let stack = vec![
            Rect::from_edges(50, 50, 300, 250),  // frontmost
            Rect::from_edges(200, 0, 500, 400),
            Rect::from_edges(0, 0, 400, 300),    // backmost
        ];
        let index = EdgeIndex::build(&stack, &[]);

        // The backmost window's left edge at x=0 is outside both fronter
        // rects, so it must survive whole; its right edge at x=400 lies
        // inside the middle window for y 0..300 and must be gone.
        assert!(index.left_edges().any(|s| *s == EdgeSegment::new(0, 0, 300)));
        assert!(!index.right_edges().any(|s| s.position == 400 && s.span_start < 300));
    }

    #[test]
    fn disjoint_windows_build_order_independent() {
        let a = Rect::from_edges(0, 0, 100, 100);
        let b = Rect::from_edges(500, 500, 700, 700);

        assert_eq!(EdgeIndex::build(&[a, b], &[]), EdgeIndex::build(&[b, a], &[]));
    }

    // ── snap search ──────────────────────────────────────────────

    #[test]
    fn right_edge_snaps_to_nearby_left_edge() {
        // Stationary window [100,100]-[400,300]; dragging so our right
        // edge lands at x=98 must snap it to exactly x=100.
        let stationary = Rect::from_edges(100, 100, 400, 300);
        let index = EdgeIndex::build(&[stationary], &big_work_area());

        let (mut x, mut y) = (18, 120); // 80 wide -> right edge at 98
        index.snap_move(&mut x, &mut y, 80, 80, &NO_BORDER, 20);

        assert_eq!(x + 80, 100);
        assert_eq!(y, 120);
    }

    #[test]
    fn snap_is_idempotent_at_distance_zero() {
        let stationary = Rect::from_edges(100, 100, 400, 300);
        let index = EdgeIndex::build(&[stationary], &big_work_area());

        let (mut x, mut y) = (20, 120); // right edge exactly at 100
        index.snap_move(&mut x, &mut y, 80, 80, &NO_BORDER, 20);

        assert_eq!((x, y), (20, 120));
    }

    #[test]
    fn tolerance_boundary_is_inclusive() {
        // Stationary window well inside the work area, so its own left
        // edge at 500 is the only candidate within reach.
        let stationary = Rect::from_edges(500, 100, 800, 300);
        let index = EdgeIndex::build(&[stationary], &big_work_area());

        // Exactly magnet_px away: eligible.
        let (mut x, mut y) = (400, 120); // right edge at 480, 20 away
        index.snap_move(&mut x, &mut y, 80, 80, &NO_BORDER, 20);
        assert_eq!(x + 80, 500);

        // One pixel past the tolerance: not eligible.
        let (mut x, mut y) = (399, 120); // right edge at 479, 21 away
        index.snap_move(&mut x, &mut y, 80, 80, &NO_BORDER, 20);
        assert_eq!(x, 399);
    }

    #[test]
    fn disjoint_spans_do_not_snap() {
        // The stationary window is 2px away on the x axis but shares no
        // vertical space with the dragged window, and nothing else is
        // within reach.
        let stationary = Rect::from_edges(500, 100, 800, 300);
        let index = EdgeIndex::build(&[stationary], &big_work_area());

        let (mut x, mut y) = (418, 500); // right edge at 498, spans 500..580
        index.snap_move(&mut x, &mut y, 80, 80, &NO_BORDER, 20);

        assert_eq!((x, y), (418, 500));
    }

    #[test]
    fn closer_candidate_wins_between_anchors() {
        // A left-facing target at 100 (3px from our right edge) and a
        // right-facing target at 20 (5px from our left edge): the right
        // edge alignment wins.
        let left_target = Rect::from_edges(100, 0, 400, 300);
        let right_target = Rect::from_edges(-300, 0, 20, 300);
        let index = EdgeIndex::build(&[left_target, right_target], &big_work_area());

        let (mut x, mut y) = (25, 50); // left edge 25, right edge 97
        index.snap_move(&mut x, &mut y, 72, 80, &NO_BORDER, 20);

        assert_eq!(x + 72, 100);
        assert_eq!(y, 50);
    }

    #[test]
    fn vertical_axis_is_symmetric() {
        let stationary = Rect::from_edges(100, 300, 400, 500);
        let index = EdgeIndex::build(&[stationary], &big_work_area());

        let (mut x, mut y) = (150, 204); // 94 tall -> bottom edge at 298
        index.snap_move(&mut x, &mut y, 80, 94, &NO_BORDER, 20);

        // Bottom edge 298 -> snaps to the stationary top at 300.
        assert_eq!(y + 94, 300);
        assert_eq!(x, 150);
    }

    #[test]
    fn border_offsets_align_visible_frame_not_outer_rect() {
        // 7px invisible borders left/right: the visible right edge is
        // x + cx - 7 and that is what must land on the target.
        let border = BorderOffset {
            left: 7,
            top: 0,
            right: 7,
            bottom: 7,
        };
        let stationary = Rect::from_edges(100, 100, 400, 300);
        let index = EdgeIndex::build(&[stationary], &big_work_area());

        let (mut x, mut y) = (10, 120);
        index.snap_move(&mut x, &mut y, 94, 80, &NO_BORDER, 20);
        // sanity: without borders the outer right edge lands on the target
        assert_eq!(x + 94, 100);

        let (mut x2, mut y2) = (10, 120);
        index.snap_move(&mut x2, &mut y2, 94, 80, &border, 20);
        assert_eq!(x2 + 94 - 7, 100);
        assert_eq!((y, y2), (120, 120));
    }

    #[test]
    fn off_screen_adjustment_is_rejected() {
        // The only work area ends at x=500; a snap target at x=700 would
        // pull the title strip fully outside it.
        let work_areas = vec![Rect::from_edges(0, 0, 500, 500)];
        let outside = Rect::from_edges(600, 0, 700, 500);
        let index = EdgeIndex::build(&[outside], &work_areas);

        let (mut x, mut y) = (705, 100);
        index.snap_move(&mut x, &mut y, 100, 100, &NO_BORDER, 20);

        // Candidate found (700 is 5px away) but the guard rejects it.
        assert_eq!((x, y), (705, 100));
    }

    #[test]
    fn dedup_keeps_first_candidate_on_tie() {
        // Two targets at the same distance on opposite sides of the
        // source: the scan keeps the first (lower) position.
        let mut set = BTreeSet::new();
        set.insert(EdgeSegment::new(90, 0, 100));
        set.insert(EdgeSegment::new(110, 0, 100));

        assert_eq!(find_closest(&set, 100, 0, 100, 20), Some(90));
    }

    #[test]
    fn non_overlapping_candidate_is_passed_over() {
        // The nearest position has no span overlap; a farther one does.
        let mut set = BTreeSet::new();
        set.insert(EdgeSegment::new(98, 500, 600));
        set.insert(EdgeSegment::new(110, 0, 100));

        assert_eq!(find_closest(&set, 100, 0, 100, 20), Some(110));
    }
}
