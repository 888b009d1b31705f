//! Process-wide global hotkey listener
//!
//! A single background thread polls the keyboard and raises a pending flag for
//! every binding of a pressed key. Panels own their flags and clear them when
//! they consume the trigger on their next refresh, so several presses between
//! two refreshes coalesce into one trigger.

use crate::config::HotkeyConfig;
use device_query::{DeviceQuery, DeviceState, Keycode};
use log::{debug, error, info, warn};
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::thread;
use std::time::Duration;

static GLOBAL_REGISTRY: OnceCell<HotkeyRegistry> = OnceCell::new();

/// Pending-trigger flag shared between the listener and one panel binding
pub type PendingFlag = Arc<AtomicBool>;

/// Registry of key bindings fed by the keyboard listener
#[derive(Debug, Clone)]
pub struct HotkeyRegistry {
    inner: Arc<RegistryInner>,
}

#[derive(Debug)]
struct RegistryInner {
    bindings: Mutex<HashMap<char, Vec<Weak<AtomicBool>>>>,
    listen: bool,
    poll_interval: Duration,
    listener_started: AtomicBool,
}

impl HotkeyRegistry {
    fn new(listen: bool, poll_interval: Duration) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                bindings: Mutex::new(HashMap::new()),
                listen,
                poll_interval,
                listener_started: AtomicBool::new(false),
            }),
        }
    }

    /// Process-wide registry, created with default settings on first use
    pub fn global() -> Self {
        GLOBAL_REGISTRY
            .get_or_init(|| Self::from_config(&HotkeyConfig::default()))
            .clone()
    }

    /// Configure the process-wide registry. Has no effect once `global()` has
    /// been called; returns the registry actually in use.
    pub fn init_global(config: &HotkeyConfig) -> Self {
        GLOBAL_REGISTRY
            .get_or_init(|| Self::from_config(config))
            .clone()
    }

    fn from_config(config: &HotkeyConfig) -> Self {
        Self::new(
            config.enabled,
            Duration::from_millis(config.poll_interval_ms),
        )
    }

    /// Registry without a keyboard listener; presses only arrive through
    /// [`HotkeyRegistry::notify_key`]
    pub fn detached() -> Self {
        Self::new(false, Duration::from_millis(crate::constants::intervals::HOTKEY_POLL))
    }

    /// Register interest in `key` and get the flag the listener will raise
    pub fn bind(&self, key: char) -> PendingFlag {
        let key = normalize_key(key);
        let flag = Arc::new(AtomicBool::new(false));

        if let Ok(mut bindings) = self.inner.bindings.lock() {
            bindings
                .entry(key)
                .or_default()
                .push(Arc::downgrade(&flag));
        } else {
            warn!("Hotkey bindings lock poisoned, '{}' will never trigger", key);
        }

        debug!("Bound hotkey '{}'", key);
        self.ensure_listener();
        flag
    }

    /// Raise every live binding of `key`, returns how many were flagged
    pub fn notify_key(&self, key: char) -> usize {
        let key = normalize_key(key);
        let Ok(mut bindings) = self.inner.bindings.lock() else {
            warn!("Hotkey bindings lock poisoned, dropping '{}'", key);
            return 0;
        };

        let Some(flags) = bindings.get_mut(&key) else {
            return 0;
        };

        let mut raised = 0;
        flags.retain(|weak| match weak.upgrade() {
            Some(flag) => {
                flag.store(true, Ordering::Release);
                raised += 1;
                true
            }
            None => false,
        });

        if flags.is_empty() {
            bindings.remove(&key);
        }

        if raised > 0 {
            debug!("Hotkey '{}' pressed, {} binding(s) pending", key, raised);
        }
        raised
    }

    /// Number of keys with at least one live binding
    pub fn bound_keys(&self) -> usize {
        self.inner
            .bindings
            .lock()
            .map(|bindings| {
                bindings
                    .values()
                    .filter(|flags| flags.iter().any(|w| w.strong_count() > 0))
                    .count()
            })
            .unwrap_or(0)
    }

    pub fn is_listening(&self) -> bool {
        self.inner.listener_started.load(Ordering::Acquire)
    }

    fn ensure_listener(&self) {
        if !self.inner.listen {
            return;
        }
        if self
            .inner
            .listener_started
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        let registry = self.clone();
        let spawned = thread::Builder::new()
            .name("miniwidg-hotkeys".to_string())
            .spawn(move || registry.listen_loop());

        if let Err(e) = spawned {
            error!("Failed to start hotkey listener thread: {}", e);
            self.inner.listener_started.store(false, Ordering::Release);
        }
    }

    fn listen_loop(&self) {
        info!("Starting hotkey listener thread");

        let Some(device_state) = DeviceState::checked_new() else {
            warn!("Keyboard state unavailable, global hotkeys disabled");
            return;
        };

        let mut previous: Vec<Keycode> = Vec::new();
        loop {
            let keys = device_state.get_keys();
            for key in keys.iter().filter(|k| !previous.contains(k)) {
                if let Some(c) = keycode_char(key) {
                    self.notify_key(c);
                }
            }
            previous = keys;
            thread::sleep(self.inner.poll_interval);
        }
    }
}

fn normalize_key(key: char) -> char {
    key.to_ascii_lowercase()
}

/// Character produced by a key, `None` for keys without one (modifiers,
/// arrows, function keys, ...)
pub fn keycode_char(key: &Keycode) -> Option<char> {
    let c = match key {
        Keycode::A => 'a',
        Keycode::B => 'b',
        Keycode::C => 'c',
        Keycode::D => 'd',
        Keycode::E => 'e',
        Keycode::F => 'f',
        Keycode::G => 'g',
        Keycode::H => 'h',
        Keycode::I => 'i',
        Keycode::J => 'j',
        Keycode::K => 'k',
        Keycode::L => 'l',
        Keycode::M => 'm',
        Keycode::N => 'n',
        Keycode::O => 'o',
        Keycode::P => 'p',
        Keycode::Q => 'q',
        Keycode::R => 'r',
        Keycode::S => 's',
        Keycode::T => 't',
        Keycode::U => 'u',
        Keycode::V => 'v',
        Keycode::W => 'w',
        Keycode::X => 'x',
        Keycode::Y => 'y',
        Keycode::Z => 'z',
        Keycode::Key0 | Keycode::Numpad0 => '0',
        Keycode::Key1 | Keycode::Numpad1 => '1',
        Keycode::Key2 | Keycode::Numpad2 => '2',
        Keycode::Key3 | Keycode::Numpad3 => '3',
        Keycode::Key4 | Keycode::Numpad4 => '4',
        Keycode::Key5 | Keycode::Numpad5 => '5',
        Keycode::Key6 | Keycode::Numpad6 => '6',
        Keycode::Key7 | Keycode::Numpad7 => '7',
        Keycode::Key8 | Keycode::Numpad8 => '8',
        Keycode::Key9 | Keycode::Numpad9 => '9',
        Keycode::Grave => '`',
        Keycode::Minus => '-',
        Keycode::Equal => '=',
        Keycode::LeftBracket => '[',
        Keycode::RightBracket => ']',
        Keycode::BackSlash => '\\',
        Keycode::Semicolon => ';',
        Keycode::Apostrophe => '\'',
        Keycode::Comma => ',',
        Keycode::Dot => '.',
        Keycode::Slash => '/',
        _ => return None,
    };
    Some(c)
}
