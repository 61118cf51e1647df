use clap::Args;

use calamita_core::session::BorderOffset;
use calamita_core::{EdgeIndex, config};
use calamita_windows::{monitor, snap_target_rects, window};

/// Arguments for the `debug snap` subcommand.
#[derive(Args)]
pub struct SnapArgs {
    /// X position in pixels
    #[arg(long)]
    x: i32,
    /// Y position in pixels
    #[arg(long)]
    y: i32,
    /// Width in pixels
    #[arg(long, name = "width")]
    w: i32,
    /// Height in pixels
    #[arg(long, name = "height")]
    h: i32,
}

/// Runs one snap query against the live desktop: where would a window
/// at the given rectangle land, using the configured tolerance?
pub fn execute(args: &SnapArgs) {
    let distance = config::load().snapping.distance;
    let targets = snap_target_rects(window::hwnd_from_raw(0));
    let areas = monitor::work_areas();
    let index = EdgeIndex::build(&targets, &areas);

    let (mut x, mut y) = (args.x, args.y);
    index.snap_move(
        &mut x,
        &mut y,
        args.w,
        args.h,
        &BorderOffset::default(),
        distance,
    );

    if (x, y) == (args.x, args.y) {
        println!(
            "({}, {}) {}x{}: no edge within {distance}px",
            args.x, args.y, args.w, args.h
        );
    } else {
        println!(
            "({}, {}) {}x{} snaps to ({x}, {y})",
            args.x, args.y, args.w, args.h
        );
    }
}
