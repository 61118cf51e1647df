use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

use calamita_core::config;

/// Prints the configuration as resolved from disk plus defaults.
pub fn execute() {
    match config::config_path() {
        Some(path) if path.exists() => println!("Config file: {}", path.display()),
        Some(path) => println!("Config file: {} (not found, using defaults)", path.display()),
        None => println!("Config file: <could not determine home directory>"),
    }

    let cfg = config::load();
    let keys = cfg.snapping.disable_keys;
    let disable_combo = [
        keys.ctrl.then_some("Ctrl"),
        keys.alt.then_some("Alt"),
        keys.shift.then_some("Shift"),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join("+");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Setting", "Value"]);

    table.add_row(vec!["snapping.enabled", &cfg.snapping.enabled.to_string()]);
    table.add_row(vec!["snapping.distance", &cfg.snapping.distance.to_string()]);
    table.add_row(vec![
        "snapping.disable_keys",
        if disable_combo.is_empty() {
            "(none)"
        } else {
            &disable_combo
        },
    ]);
    table.add_row(vec!["gather.hotkey", &cfg.gather.hotkey]);
    table.add_row(vec![
        "resize",
        &format!("{}x{}", cfg.resize.width, cfg.resize.height),
    ]);
    table.add_row(vec!["resize.active_hotkey", &cfg.resize.active_hotkey]);
    table.add_row(vec!["resize.all_hotkey", &cfg.resize.all_hotkey]);
    table.add_row(vec![
        "restore_size.enabled",
        &cfg.restore_size.enabled.to_string(),
    ]);
    table.add_row(vec![
        "restore_size",
        &format!("{}x{}", cfg.restore_size.width, cfg.restore_size.height),
    ]);
    table.add_row(vec!["log.enabled", &cfg.log.enabled.to_string()]);
    table.add_row(vec!["log.level", &cfg.log.level]);

    println!("{table}");
}
