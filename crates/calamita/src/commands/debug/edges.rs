use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use calamita_core::{EdgeIndex, EdgeSegment};
use calamita_windows::{monitor, snap_target_rects, window};

/// Builds an edge index from the current desktop and prints every
/// surviving segment, exactly as a drag starting now would see them.
pub fn execute() {
    let targets = snap_target_rects(window::hwnd_from_raw(0));
    let areas = monitor::work_areas();
    let index = EdgeIndex::build(&targets, &areas);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Side"),
            Cell::new("Position").set_alignment(CellAlignment::Right),
            Cell::new("Span start").set_alignment(CellAlignment::Right),
            Cell::new("Span end").set_alignment(CellAlignment::Right),
        ]);

    let sides: [(&str, Vec<EdgeSegment>); 4] = [
        ("left", index.left_edges().copied().collect()),
        ("top", index.top_edges().copied().collect()),
        ("right", index.right_edges().copied().collect()),
        ("bottom", index.bottom_edges().copied().collect()),
    ];

    let mut total = 0;
    for (side, segments) in &sides {
        for seg in segments {
            table.add_row(vec![
                Cell::new(*side),
                Cell::new(seg.position).set_alignment(CellAlignment::Right),
                Cell::new(seg.span_start).set_alignment(CellAlignment::Right),
                Cell::new(seg.span_end).set_alignment(CellAlignment::Right),
            ]);
            total += 1;
        }
    }

    println!("{table}");
    println!(
        "\n{total} edge segments from {} windows and {} work areas",
        targets.len(),
        areas.len()
    );
}
