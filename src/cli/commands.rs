//! Browser Actions Module
//!
//! Actions reachable from the keyboard while browsing, and the key hints shown
//! in the footer. Keys are resolved after the vi-style remap, so `h` and
//! `Left` always produce the same action.

use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Actions dispatched by the browser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ToggleFiles,
    ToggleHidden,
    Quit,
    Compose,
    SwitchFocus,
    Up,
    Down,
    Left,
    Right,
    Select,
    PageUp,
    PageDown,
    Top,
}

impl Action {
    /// Resolve a (remapped) key into an action
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => Some(Self::Quit),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Char('f') => Some(Self::ToggleFiles),
            KeyCode::Char('.') => Some(Self::ToggleHidden),
            KeyCode::Char('q') => Some(Self::Quit),
            KeyCode::Char('a') => Some(Self::Compose),
            KeyCode::Tab => Some(Self::SwitchFocus),
            KeyCode::Up => Some(Self::Up),
            KeyCode::Down => Some(Self::Down),
            KeyCode::Left => Some(Self::Left),
            KeyCode::Right => Some(Self::Right),
            KeyCode::Enter => Some(Self::Select),
            KeyCode::PageUp => Some(Self::PageUp),
            KeyCode::PageDown => Some(Self::PageDown),
            KeyCode::Home => Some(Self::Top),
            _ => None,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::ToggleFiles => "Toggle Files",
            Self::ToggleHidden => "Toggle Hidden",
            Self::Quit => "Quit",
            Self::Compose => "Ask",
            Self::SwitchFocus => "Switch Pane",
            Self::Up => "Up",
            Self::Down => "Down",
            Self::Left => "Collapse",
            Self::Right => "Expand",
            Self::Select => "Open",
            Self::PageUp => "Page Up",
            Self::PageDown => "Page Down",
            Self::Top => "Top",
        }
    }

    pub fn key_hint(&self) -> &'static str {
        match self {
            Self::ToggleFiles => "f",
            Self::ToggleHidden => ".",
            Self::Quit => "q",
            Self::Compose => "a",
            Self::SwitchFocus => "tab",
            Self::Up => "k/↑",
            Self::Down => "j/↓",
            Self::Left => "h/←",
            Self::Right => "l/→",
            Self::Select => "enter",
            Self::PageUp => "pgup",
            Self::PageDown => "pgdn",
            Self::Top => "home",
        }
    }

    /// Actions listed in the footer, in display order
    pub fn footer() -> &'static [Action] {
        &[
            Self::ToggleFiles,
            Self::ToggleHidden,
            Self::Compose,
            Self::SwitchFocus,
            Self::Quit,
        ]
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.key_hint(), self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::keymap::remap;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_command_keys() {
        assert_eq!(Action::from_key(&press(KeyCode::Char('f'))), Some(Action::ToggleFiles));
        assert_eq!(Action::from_key(&press(KeyCode::Char('.'))), Some(Action::ToggleHidden));
        assert_eq!(Action::from_key(&press(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(
            Action::from_key(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
        assert_eq!(Action::from_key(&press(KeyCode::Char('z'))), None);
    }

    #[test]
    fn test_aliases_dispatch_like_arrows() {
        let pairs = [
            ('h', KeyCode::Left),
            ('j', KeyCode::Down),
            ('k', KeyCode::Up),
            ('l', KeyCode::Right),
        ];
        for (alias, arrow) in pairs {
            let via_alias = Action::from_key(&remap(press(KeyCode::Char(alias))));
            let via_arrow = Action::from_key(&remap(press(arrow)));
            assert!(via_alias.is_some());
            assert_eq!(via_alias, via_arrow, "{alias}");
        }
    }

    #[test]
    fn test_footer_hints() {
        let footer: Vec<String> = Action::footer().iter().map(ToString::to_string).collect();
        assert_eq!(footer[0], "f Toggle Files");
        assert_eq!(footer.last().map(String::as_str), Some("q Quit"));
    }
}
