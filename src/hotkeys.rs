use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use device_query::{DeviceQuery, DeviceState, Keycode};

use crate::config::KeyBindings;
use crate::runtime::AppEvent;

/// How often the keyboard is sampled
pub const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Snapshot of the keys currently held down, system-wide
pub trait KeyboardState {
    fn pressed(&self) -> Vec<Keycode>;
}

impl KeyboardState for DeviceState {
    fn pressed(&self) -> Vec<Keycode> {
        self.get_keys()
    }
}

/// Open the system keyboard. None when no display server is reachable.
pub fn system_keyboard() -> Option<DeviceState> {
    #[cfg(target_os = "linux")]
    {
        DeviceState::checked_new()
    }
    #[cfg(not(target_os = "linux"))]
    {
        Some(DeviceState::new())
    }
}

/// Focus-independent key producer for the labeling keys and Enter.
///
/// Key presses are sampled on a background thread and posted onto the app
/// queue as ordinary `AppEvent::Key`s. Quit keys stay terminal-only.
#[derive(Debug, Clone)]
pub struct GlobalKeys {
    bound: Vec<char>,
}

impl GlobalKeys {
    pub fn new(bindings: &KeyBindings) -> Self {
        Self {
            bound: vec![
                bindings.early,
                bindings.strike,
                bindings.ball,
                bindings.fastball,
                bindings.offspeed,
                bindings.breaking,
            ],
        }
    }

    /// True if this producer delivers `key`, so the terminal reader must drop it
    pub fn covers(&self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Enter => true,
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.bound.contains(&c.to_ascii_lowercase())
            }
            _ => false,
        }
    }

    pub fn translate(&self, code: &Keycode) -> Option<KeyEvent> {
        let code = match code {
            Keycode::Enter => KeyCode::Enter,
            other => KeyCode::Char(key_char(other).filter(|c| self.bound.contains(c))?),
        };
        Some(KeyEvent::new(code, KeyModifiers::NONE))
    }

    /// Start sampling on a background thread. `open` runs on that thread
    /// because the platform handle is not `Send`. Returns false if the
    /// keyboard could not be opened; nothing is posted in that case.
    pub fn spawn<S, F>(self, open: F, events: Sender<AppEvent>, poll: Duration) -> bool
    where
        S: KeyboardState,
        F: FnOnce() -> Option<S> + Send + 'static,
    {
        let (ready_tx, ready_rx) = mpsc::sync_channel(1);

        thread::spawn(move || {
            let Some(keyboard) = open() else {
                let _ = ready_tx.send(false);
                return;
            };
            let _ = ready_tx.send(true);

            let mut held: Vec<Keycode> = Vec::new();
            loop {
                let now = keyboard.pressed();
                for code in newly_pressed(&held, &now) {
                    if let Some(key) = self.translate(&code) {
                        if events.send(AppEvent::Key(key)).is_err() {
                            return;
                        }
                    }
                }
                held = now;
                thread::sleep(poll);
            }
        });

        let started = ready_rx.recv().unwrap_or(false);
        if started {
            tracing::info!("global key listener active");
        } else {
            tracing::warn!("global key listener unavailable, keys only work in the terminal");
        }
        started
    }
}

/// Keys down in `now` that were not down in `held`
pub fn newly_pressed(held: &[Keycode], now: &[Keycode]) -> Vec<Keycode> {
    now.iter().filter(|k| !held.contains(k)).cloned().collect()
}

fn key_char(code: &Keycode) -> Option<char> {
    let c = match code {
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
        _ => return None,
    };
    Some(c)
}
