use calamita_core::log;
use calamita_windows::{engine, hotkey};

/// Runs in the foreground, listening for the configured hotkeys until
/// interrupted.
pub fn execute() {
    let config = engine::settings();
    log::init(&config.log);

    let bound = [
        ("gather", &config.gather.hotkey),
        ("resize active", &config.resize.active_hotkey),
        ("resize all", &config.resize.all_hotkey),
    ];
    for (what, key) in bound {
        if !key.is_empty() {
            println!("{key}  ->  {what}");
        }
    }
    println!("Listening (Ctrl+C to quit)...");

    if let Err(e) = hotkey::run_hotkey_loop() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
