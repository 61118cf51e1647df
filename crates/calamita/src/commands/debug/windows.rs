use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

/// Lists every window that would contribute edges to a snap index.
pub fn execute() {
    let candidates = calamita_windows::list_candidates();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("HWND"),
            Cell::new("Title"),
            Cell::new("Class"),
            Cell::new("X").set_alignment(CellAlignment::Right),
            Cell::new("Y").set_alignment(CellAlignment::Right),
            Cell::new("Width").set_alignment(CellAlignment::Right),
            Cell::new("Height").set_alignment(CellAlignment::Right),
        ]);

    for info in &candidates {
        table.add_row(vec![
            Cell::new(format!("0x{:X}", info.hwnd)),
            Cell::new(&info.title),
            Cell::new(&info.class),
            Cell::new(info.rect.x).set_alignment(CellAlignment::Right),
            Cell::new(info.rect.y).set_alignment(CellAlignment::Right),
            Cell::new(info.rect.width).set_alignment(CellAlignment::Right),
            Cell::new(info.rect.height).set_alignment(CellAlignment::Right),
        ]);
    }

    println!("{table}");
    println!("\n{} snap targets found", candidates.len());
}
