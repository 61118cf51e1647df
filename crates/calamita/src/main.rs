mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "calamita",
    version,
    about = "A magnetic window-snapping assistant for Windows"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the default configuration file
    Init,
    /// Show the resolved configuration
    Config,
    /// Move all windows to the monitor under the cursor
    Gather,
    /// Resize the active window (or all restored windows) in place
    Resize(commands::resize::ResizeArgs),
    /// Run in the foreground, listening for the configured hotkeys
    Watch,
    /// Debugging and inspection tools
    Debug {
        #[command(subcommand)]
        command: DebugCommands,
    },
}

#[derive(Subcommand)]
enum DebugCommands {
    /// List the windows that would act as snap targets
    Windows,
    /// Show the edge index built from the current desktop
    Edges,
    /// Show where a window rectangle would snap to
    Snap(commands::debug::snap::SnapArgs),
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Config => commands::config::execute(),
        Commands::Gather => commands::gather::execute(),
        Commands::Resize(args) => commands::resize::execute(&args),
        Commands::Watch => commands::watch::execute(),
        Commands::Debug { command } => match command {
            DebugCommands::Windows => commands::debug::windows::execute(),
            DebugCommands::Edges => commands::debug::edges::execute(),
            DebugCommands::Snap(args) => commands::debug::snap::execute(&args),
        },
    }
}
