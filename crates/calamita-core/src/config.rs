use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::log::LogConfig;

/// Top-level configuration for Calamita.
///
/// Loaded from `~/.config/calamita/config.toml`. Missing sections
/// fall back to defaults thanks to `#[serde(default)]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Drag-snapping behavior.
    pub snapping: SnapConfig,
    /// The gather-to-cursor-monitor hotkey.
    pub gather: GatherConfig,
    /// Hotkey-driven resizing of restored windows.
    pub resize: ResizeConfig,
    /// Default window size applied on restore from maximized/minimized.
    pub restore_size: RestoreSizeConfig,
    /// File logging.
    pub log: LogConfig,
}

/// Drag-snapping settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    /// Whether windows snap while being dragged.
    pub enabled: bool,
    /// Snap tolerance in pixels at 96 DPI; scaled by the window's DPI
    /// at use time.
    pub distance: i32,
    /// Modifier keys that, held together, temporarily suspend snapping.
    pub disable_keys: DisableKeys,
}

/// A combination of modifier keys. All `true` members must be held at
/// once for the combination to count as pressed; an empty combination
/// never counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisableKeys {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl DisableKeys {
    pub fn is_empty(&self) -> bool {
        !self.ctrl && !self.alt && !self.shift
    }
}

/// Gather-to-cursor-monitor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatherConfig {
    /// Hotkey combination, e.g. `"Ctrl+Shift+Alt+F5"`.
    pub hotkey: String,
}

/// Hotkey-driven resize settings.
///
/// Both hotkeys force a window to `width`×`height` in place: one acts
/// on the active window, the other on every restored window on the
/// desktop. An empty hotkey string leaves that action unbound.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeConfig {
    pub width: i32,
    pub height: i32,
    /// Hotkey that resizes the active window.
    pub active_hotkey: String,
    /// Hotkey that resizes every restored window.
    pub all_hotkey: String,
}

/// Default-size-on-restore settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RestoreSizeConfig {
    /// Whether restored windows are forced to the default size. Off by
    /// default.
    pub enabled: bool,
    pub width: i32,
    pub height: i32,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            distance: 25,
            disable_keys: DisableKeys {
                ctrl: false,
                alt: true,
                shift: false,
            },
        }
    }
}

impl Default for GatherConfig {
    fn default() -> Self {
        Self {
            hotkey: "Ctrl+Shift+Alt+F5".into(),
        }
    }
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            width: 1440,
            height: 800,
            active_hotkey: "Ctrl+Shift+Alt+F6".into(),
            all_hotkey: "Ctrl+Shift+Alt+F7".into(),
        }
    }
}

impl Default for RestoreSizeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            width: 1280,
            height: 800,
        }
    }
}

/// Returns the config directory: `~/.config/calamita/`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".config").join("calamita"))
}

/// Returns the config file path: `~/.config/calamita/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Loads the configuration from disk, falling back to defaults.
///
/// If the file doesn't exist, returns defaults silently.
/// If the file exists but can't be parsed, logs a warning and returns defaults.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };

    let content = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(_) => return Config::default(),
    };

    match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            crate::log_warn!("failed to parse {}: {e}", path.display());
            eprintln!("Warning: failed to parse {}: {e}", path.display());
            Config::default()
        }
    }
}

/// Returns the commented default `config.toml` written by `init`.
pub fn template() -> String {
    let defaults = SnapConfig::default();
    let gather = GatherConfig::default();
    let resize = ResizeConfig::default();
    let restore = RestoreSizeConfig::default();
    format!(
        r#"# Calamita configuration.
# Delete any line to fall back to its default.

[snapping]
# Snap windows to each other and to screen edges while dragging.
enabled = {enabled}
# Snap tolerance in pixels at 96 DPI. Scaled with the window's DPI.
distance = {distance}

[snapping.disable_keys]
# Hold these modifier keys together to temporarily disable snapping
# mid-drag. With all three false, snapping can't be suspended.
ctrl = {ctrl}
alt = {alt}
shift = {shift}

[gather]
# Hotkey that moves all windows to the monitor under the cursor.
hotkey = "{hotkey}"

[resize]
# Size applied by the resize hotkeys. An empty hotkey string leaves
# that action unbound.
width = {resize_width}
height = {resize_height}
# Resizes the active window.
active_hotkey = "{resize_active}"
# Resizes every restored window on the desktop.
all_hotkey = "{resize_all}"

[restore_size]
# Resize windows to a default size when restored from maximized or
# minimized.
enabled = {restore_enabled}
width = {width}
height = {height}

[log]
# File logging to ~/.config/calamita/logs/calamita.log.
enabled = false
# One of "debug", "info", "warn", "error".
level = "info"
max_file_mb = 10
"#,
        enabled = defaults.enabled,
        distance = defaults.distance,
        ctrl = defaults.disable_keys.ctrl,
        alt = defaults.disable_keys.alt,
        shift = defaults.disable_keys.shift,
        hotkey = gather.hotkey,
        resize_width = resize.width,
        resize_height = resize.height,
        resize_active = resize.active_hotkey,
        resize_all = resize.all_hotkey,
        restore_enabled = restore.enabled,
        width = restore.width,
        height = restore.height,
    )
}
