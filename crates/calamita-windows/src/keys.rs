use calamita_core::config::DisableKeys;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    GetKeyState, HOT_KEY_MODIFIERS, MOD_ALT, MOD_CONTROL, MOD_NOREPEAT, MOD_SHIFT, MOD_WIN,
    VK_CONTROL, VK_MENU, VK_SHIFT,
};

/// Converts a key name string to a Windows virtual key code.
///
/// Supports letters (A–Z), digits (0–9), function keys (F1–F24),
/// and a handful of named keys. Matching is case-insensitive.
pub fn vk_from_name(name: &str) -> Option<u32> {
    let upper = name.to_ascii_uppercase();

    // Single letter or digit
    if upper.len() == 1 {
        let ch = upper.as_bytes()[0];
        if ch.is_ascii_uppercase() || ch.is_ascii_digit() {
            return Some(u32::from(ch));
        }
    }

    // Function keys F1–F24
    if let Some(rest) = upper.strip_prefix('F')
        && let Ok(n) = rest.parse::<u32>()
        && (1..=24).contains(&n)
    {
        return Some(0x70 + n - 1); // VK_F1 = 0x70
    }

    match upper.as_str() {
        "ENTER" | "RETURN" => Some(0x0D),
        "TAB" => Some(0x09),
        "ESCAPE" | "ESC" => Some(0x1B),
        "SPACE" => Some(0x20),
        "HOME" => Some(0x24),
        "END" => Some(0x23),
        "PAGEUP" | "PGUP" => Some(0x21),
        "PAGEDOWN" | "PGDN" => Some(0x22),
        "LEFT" => Some(0x25),
        "UP" => Some(0x26),
        "RIGHT" => Some(0x27),
        "DOWN" => Some(0x28),
        _ => None,
    }
}

/// Parses a hotkey description like `Ctrl+Shift+Alt+F5` into Win32
/// modifier flags and a virtual key code.
///
/// The last `+`-separated token is the key; everything before it must
/// be a modifier name. Returns `None` on any unknown token or when no
/// key is present.
pub fn parse_hotkey(spec: &str) -> Option<(HOT_KEY_MODIFIERS, u32)> {
    let mut modifiers = MOD_NOREPEAT;
    let mut vk = None;

    let tokens: Vec<&str> = spec.split('+').map(str::trim).collect();
    let (&key, mods) = tokens.split_last()?;

    for token in mods {
        match token.to_ascii_uppercase().as_str() {
            "CTRL" | "CONTROL" => modifiers |= MOD_CONTROL,
            "ALT" => modifiers |= MOD_ALT,
            "SHIFT" => modifiers |= MOD_SHIFT,
            "WIN" | "SUPER" => modifiers |= MOD_WIN,
            _ => return None,
        }
    }

    if !key.is_empty() {
        vk = vk_from_name(key);
    }

    vk.map(|vk| (modifiers, vk))
}

/// Returns whether every configured disable key is currently held.
///
/// With an empty combination the answer is always false: releasing the
/// user from an accidental "snapping permanently off" configuration.
pub fn disable_combo_held(keys: &DisableKeys) -> bool {
    if keys.is_empty() {
        return false;
    }

    // SAFETY: GetKeyState reads the calling thread's key state. The
    // high bit is set while the key is down, so a negative SHORT means
    // "held".
    let held = |vk: u16| unsafe { GetKeyState(i32::from(vk)) } < 0;

    (!keys.ctrl || held(VK_CONTROL.0))
        && (!keys.alt || held(VK_MENU.0))
        && (!keys.shift || held(VK_SHIFT.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_and_digits() {
        assert_eq!(vk_from_name("j"), Some(0x4A));
        assert_eq!(vk_from_name("J"), Some(0x4A));
        assert_eq!(vk_from_name("0"), Some(0x30));
        assert_eq!(vk_from_name("9"), Some(0x39));
    }

    #[test]
    fn function_keys() {
        assert_eq!(vk_from_name("F1"), Some(0x70));
        assert_eq!(vk_from_name("f5"), Some(0x74));
        assert_eq!(vk_from_name("F24"), Some(0x87));
        assert_eq!(vk_from_name("F25"), None);
    }

    #[test]
    fn unknown_returns_none() {
        assert_eq!(vk_from_name("INVALID"), None);
        assert_eq!(vk_from_name(""), None);
    }

    #[test]
    fn hotkey_with_all_modifiers() {
        let (mods, vk) = parse_hotkey("Ctrl+Shift+Alt+F5").unwrap();
        assert_eq!(mods, MOD_NOREPEAT | MOD_CONTROL | MOD_SHIFT | MOD_ALT);
        assert_eq!(vk, 0x74);
    }

    #[test]
    fn hotkey_bare_key() {
        let (mods, vk) = parse_hotkey("F9").unwrap();
        assert_eq!(mods, MOD_NOREPEAT);
        assert_eq!(vk, 0x78);
    }

    #[test]
    fn hotkey_tolerates_spaces_and_case() {
        let (mods, vk) = parse_hotkey("ctrl + win + Home").unwrap();
        assert_eq!(mods, MOD_NOREPEAT | MOD_CONTROL | MOD_WIN);
        assert_eq!(vk, 0x24);
    }

    #[test]
    fn hotkey_rejects_bad_tokens() {
        assert!(parse_hotkey("Hyper+F5").is_none());
        assert!(parse_hotkey("Ctrl+").is_none());
        assert!(parse_hotkey("").is_none());
    }
}
