//! The global hotkeys and their message pump.

use calamita_core::config::Config;
use calamita_core::{WindowResult, log_error, log_info, log_warn};
use windows::Win32::UI::Input::KeyboardAndMouse::{RegisterHotKey, UnregisterHotKey};
use windows::Win32::UI::WindowsAndMessaging::{
    DispatchMessageW, GetMessageW, MSG, TranslateMessage, WM_HOTKEY,
};

use crate::{arrange, engine, keys, resize};

/// What a registered hotkey does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Gather,
    ResizeActive,
    ResizeAllRestored,
}

/// The configured hotkey actions, paired with stable registration ids.
/// An empty hotkey string leaves that action unbound.
fn bindings(config: &Config) -> Vec<(i32, String, Action)> {
    [
        (1, config.gather.hotkey.clone(), Action::Gather),
        (2, config.resize.active_hotkey.clone(), Action::ResizeActive),
        (3, config.resize.all_hotkey.clone(), Action::ResizeAllRestored),
    ]
    .into_iter()
    .filter(|(_, spec, _)| !spec.is_empty())
    .collect()
}

/// Registers the configured hotkeys and pumps messages until the
/// thread's queue receives `WM_QUIT`.
///
/// A hotkey that fails to parse or register is skipped with a warning;
/// the loop only errors out when nothing at all could be registered.
/// The registrations are bound to this thread's message queue, so the
/// pump must run here too.
pub fn run_hotkey_loop() -> WindowResult<()> {
    let config = engine::settings();
    let mut registered = Vec::new();

    for (id, spec, action) in bindings(&config) {
        let Some((modifiers, vk)) = keys::parse_hotkey(&spec) else {
            log_warn!("invalid hotkey {spec:?}, skipping");
            eprintln!("Warning: invalid hotkey {spec:?}, skipping");
            continue;
        };
        // SAFETY: RegisterHotKey binds a system-wide hotkey to the
        // current thread's message queue.
        if unsafe { RegisterHotKey(None, id, modifiers, vk) }.is_err() {
            log_warn!("hotkey {spec:?} is taken by another application, skipping");
            eprintln!("Warning: hotkey {spec:?} is taken by another application, skipping");
            continue;
        }
        log_info!("hotkey {spec:?} registered for {action:?}");
        registered.push((id, action));
    }

    if registered.is_empty() {
        return Err("no hotkey could be registered".into());
    }

    let mut msg = MSG::default();
    while unsafe { GetMessageW(&mut msg, None, 0, 0).as_bool() } {
        if msg.message == WM_HOTKEY {
            let fired = msg.wParam.0 as i32;
            if let Some(&(_, action)) = registered.iter().find(|(id, _)| *id == fired) {
                if let Err(e) = run_action(action) {
                    log_error!("{action:?} failed: {e}");
                    eprintln!("Error: {e}");
                }
                continue;
            }
        }

        unsafe {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }

    for (id, _) in registered {
        // SAFETY: removes a registration made above.
        unsafe {
            let _ = UnregisterHotKey(None, id);
        }
    }

    Ok(())
}

fn run_action(action: Action) -> WindowResult<()> {
    let config = engine::settings();
    match action {
        Action::Gather => arrange::gather_to_cursor_monitor().map(|_| ()),
        Action::ResizeActive => resize::resize_active(&config.resize),
        Action::ResizeAllRestored => resize::resize_all_restored(&config.resize).map(|_| ()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bindings_parse_and_have_unique_ids() {
        let all = bindings(&Config::default());
        assert_eq!(all.len(), 3);

        let mut ids: Vec<i32> = all.iter().map(|(id, _, _)| *id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 3);

        for (_, spec, _) in &all {
            assert!(keys::parse_hotkey(spec).is_some(), "unparseable: {spec:?}");
        }
    }

    #[test]
    fn empty_hotkey_strings_are_unbound() {
        let mut config = Config::default();
        config.resize.active_hotkey.clear();
        config.resize.all_hotkey.clear();

        let all = bindings(&config);
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].2, Action::Gather);
    }
}
