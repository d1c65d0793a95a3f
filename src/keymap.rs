use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::config::KeyBindings;
use crate::session::{PitchResult, PitchType};

/// What a key press asks the app to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MarkEarly,
    SelectResult(PitchResult),
    SelectPitch(PitchType),
    Confirm,
    Quit,
}

/// Translates raw key events into actions using the configured bindings
#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: KeyBindings,
}

impl KeyMap {
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn action_for(&self, key: &KeyEvent) -> Option<Action> {
        // Windows reports releases too
        if key.kind == KeyEventKind::Release {
            return None;
        }

        match key.code {
            KeyCode::Enter => Some(Action::Confirm),
            KeyCode::Esc => Some(Action::Quit),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::Quit)
            }
            KeyCode::Char(c) => self.char_action(c),
            _ => None,
        }
    }

    fn char_action(&self, c: char) -> Option<Action> {
        let b = &self.bindings;
        let c = c.to_ascii_lowercase();

        // Bound keys win over the fixed quit key
        if c == b.early {
            Some(Action::MarkEarly)
        } else if c == b.strike {
            Some(Action::SelectResult(PitchResult::Strike))
        } else if c == b.ball {
            Some(Action::SelectResult(PitchResult::Ball))
        } else if c == b.fastball {
            Some(Action::SelectPitch(PitchType::Fastball))
        } else if c == b.offspeed {
            Some(Action::SelectPitch(PitchType::Offspeed))
        } else if c == b.breaking {
            Some(Action::SelectPitch(PitchType::Breaking))
        } else if c == 'q' {
            Some(Action::Quit)
        } else {
            None
        }
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::new(KeyBindings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn default_bindings() {
        let map = KeyMap::default();
        let cases = [
            ('s', Action::MarkEarly),
            ('9', Action::SelectResult(PitchResult::Strike)),
            ('0', Action::SelectResult(PitchResult::Ball)),
            ('1', Action::SelectPitch(PitchType::Fastball)),
            ('2', Action::SelectPitch(PitchType::Offspeed)),
            ('3', Action::SelectPitch(PitchType::Breaking)),
            ('q', Action::Quit),
        ];
        for (c, expected) in cases {
            assert_eq!(map.action_for(&press(KeyCode::Char(c))), Some(expected), "key {c}");
        }
    }

    #[test]
    fn enter_confirms_and_esc_quits() {
        let map = KeyMap::default();
        assert_eq!(map.action_for(&press(KeyCode::Enter)), Some(Action::Confirm));
        assert_eq!(map.action_for(&press(KeyCode::Esc)), Some(Action::Quit));
    }

    #[test]
    fn ctrl_c_quits() {
        let map = KeyMap::default();
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map.action_for(&key), Some(Action::Quit));
        assert_eq!(map.action_for(&press(KeyCode::Char('c'))), None);
    }

    #[test]
    fn uppercase_marker_still_marks() {
        let map = KeyMap::default();
        let key = KeyEvent::new(KeyCode::Char('S'), KeyModifiers::SHIFT);
        assert_eq!(map.action_for(&key), Some(Action::MarkEarly));
    }

    #[test]
    fn releases_and_unbound_keys_are_ignored() {
        let map = KeyMap::default();
        let release = KeyEvent {
            code: KeyCode::Enter,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(map.action_for(&release), None);
        assert_eq!(map.action_for(&press(KeyCode::Char('x'))), None);
        assert_eq!(map.action_for(&press(KeyCode::Left)), None);
    }

    #[test]
    fn custom_bindings_override_defaults() {
        let map = KeyMap::new(KeyBindings {
            early: 'q',
            fastball: 'f',
            ..KeyBindings::default()
        });
        assert_eq!(map.action_for(&press(KeyCode::Char('q'))), Some(Action::MarkEarly));
        assert_eq!(
            map.action_for(&press(KeyCode::Char('f'))),
            Some(Action::SelectPitch(PitchType::Fastball))
        );
        assert_eq!(map.action_for(&press(KeyCode::Char('s'))), None);
    }
}
