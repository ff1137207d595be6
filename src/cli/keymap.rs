//! Vi-style navigation aliases.
//!
//! `h`, `j`, `k` and `l` are rewritten to the arrow keys before any action is
//! looked up. Every other key passes through untouched.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub const ALIASES: [(char, KeyCode); 4] = [
    ('h', KeyCode::Left),
    ('j', KeyCode::Down),
    ('k', KeyCode::Up),
    ('l', KeyCode::Right),
];

pub fn alias_for(ch: char) -> Option<KeyCode> {
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == ch)
        .map(|(_, code)| *code)
}

/// Rewrite an aliased key to its arrow-key equivalent
pub fn remap(key: KeyEvent) -> KeyEvent {
    match key.code {
        KeyCode::Char(ch) if key.modifiers == KeyModifiers::NONE => match alias_for(ch) {
            Some(code) => KeyEvent { code, ..key },
            None => key,
        },
        _ => key,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_aliases_map_to_arrows() {
        assert_eq!(remap(press(KeyCode::Char('h'))).code, KeyCode::Left);
        assert_eq!(remap(press(KeyCode::Char('j'))).code, KeyCode::Down);
        assert_eq!(remap(press(KeyCode::Char('k'))).code, KeyCode::Up);
        assert_eq!(remap(press(KeyCode::Char('l'))).code, KeyCode::Right);
    }

    #[test]
    fn test_other_keys_pass_through() {
        for code in [
            KeyCode::Char('f'),
            KeyCode::Char('.'),
            KeyCode::Char('q'),
            KeyCode::Char('H'),
            KeyCode::Left,
            KeyCode::Enter,
            KeyCode::Tab,
        ] {
            assert_eq!(remap(press(code)), press(code));
        }

        let ctrl_h = KeyEvent::new(KeyCode::Char('h'), KeyModifiers::CONTROL);
        assert_eq!(remap(ctrl_h), ctrl_h);
    }

    #[test]
    fn test_remap_keeps_event_kind() {
        let release = KeyEvent {
            code: KeyCode::Char('j'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        let remapped = remap(release);
        assert_eq!(remapped.code, KeyCode::Down);
        assert_eq!(remapped.kind, KeyEventKind::Release);
    }
}
