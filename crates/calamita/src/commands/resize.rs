use clap::Args;

use calamita_core::config;
use calamita_windows::resize;

#[derive(Args)]
pub struct ResizeArgs {
    /// Resize every restored window instead of just the active one
    #[arg(long)]
    pub all: bool,

    /// Width in pixels (defaults to the configured resize width)
    #[arg(long)]
    pub width: Option<i32>,

    /// Height in pixels (defaults to the configured resize height)
    #[arg(long)]
    pub height: Option<i32>,
}

/// Resizes the active window, or every restored window, to the
/// configured size.
pub fn execute(args: &ResizeArgs) {
    let mut cfg = config::load().resize;
    if let Some(width) = args.width {
        cfg.width = width;
    }
    if let Some(height) = args.height {
        cfg.height = height;
    }

    let result = if args.all {
        resize::resize_all_restored(&cfg).map(|resized| println!("{resized} windows resized"))
    } else {
        resize::resize_active(&cfg)
            .map(|()| println!("active window resized to {}x{}", cfg.width, cfg.height))
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
