/// Moving windows between monitors (gather).
pub mod arrange;

/// Per-window DPI queries.
pub mod dpi;

/// Drag-session orchestration and shared settings.
pub mod engine;

/// Win32 window enumeration.
pub mod enumerate;

/// Visible frame bounds and invisible border offsets.
pub mod frame;

/// Per-UI-thread message hooks.
pub mod hooks;

/// The global hotkeys and their message pump.
pub mod hotkey;

/// Key names, hotkey parsing, and modifier state.
pub mod keys;

/// The exported in-process module surface.
pub mod module;

/// Monitor and work-area queries.
pub mod monitor;

/// Cross-thread hook and subclass bookkeeping.
pub mod registry;

/// Hotkey-driven window resizing.
pub mod resize;

/// Default window size on restore.
pub mod restore;

/// Per-window message subclassing.
pub mod subclass;

/// Window metadata queries.
pub mod window;

pub use enumerate::{list_candidates, snap_target_rects};
pub use window::WindowInfo;
