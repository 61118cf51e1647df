use calamita_windows::arrange;

/// Moves every application window to the monitor under the cursor.
pub fn execute() {
    match arrange::gather_to_cursor_monitor() {
        Ok(moved) => println!("{moved} windows moved"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
