//! Engine key codes and the default host-key translation.
//!
//! The engine reads printable keys as their lowercase ASCII code and uses
//! codes above `0x80` for arrows, function keys and modifiers.

use crate::event::KeyCode;

/// Right arrow.
pub const RIGHT_ARROW: KeyCode = KeyCode(0xae);
/// Left arrow.
pub const LEFT_ARROW: KeyCode = KeyCode(0xac);
/// Up arrow.
pub const UP_ARROW: KeyCode = KeyCode(0xad);
/// Down arrow.
pub const DOWN_ARROW: KeyCode = KeyCode(0xaf);
/// Escape.
pub const ESCAPE: KeyCode = KeyCode(27);
/// Enter / return.
pub const ENTER: KeyCode = KeyCode(13);
/// Tab.
pub const TAB: KeyCode = KeyCode(9);
/// Backspace.
pub const BACKSPACE: KeyCode = KeyCode(127);
/// Pause.
pub const PAUSE: KeyCode = KeyCode(0xff);
/// `=`.
pub const EQUALS: KeyCode = KeyCode(0x3d);
/// `-`.
pub const MINUS: KeyCode = KeyCode(0x2d);
/// Shift (run).
pub const RSHIFT: KeyCode = KeyCode(0x80 + 0x36);
/// Control (fire).
pub const RCTRL: KeyCode = KeyCode(0x80 + 0x1d);
/// Alt (strafe).
pub const RALT: KeyCode = KeyCode(0x80 + 0x38);

/// Function key `F1`..=`F12`, or `None` outside that range.
pub fn function_key(n: u8) -> Option<KeyCode> {
    match n {
        1..=10 => Some(KeyCode(0x80 + 0x3b + i32::from(n) - 1)),
        11 => Some(KeyCode(0x80 + 0x57)),
        12 => Some(KeyCode(0x80 + 0x58)),
        _ => None,
    }
}

/// A physical key as reported by a windowing backend, before translation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostKey {
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Enter / return.
    Enter,
    /// Escape.
    Escape,
    /// Tab.
    Tab,
    /// Backspace.
    Backspace,
    /// Pause / break.
    Pause,
    /// Either shift key.
    Shift,
    /// Either control key.
    Control,
    /// Either alt / option key.
    Alt,
    /// Function key `F1`..=`F12`.
    Function(u8),
    /// A printable character key.
    Char(char),
}

/// Map a host key into the engine's code space.
///
/// `Z` doubles as fire alongside Control, for keyboards where Control is
/// awkward to reach. Returns `None` for keys the engine has no code for.
pub fn translate(key: HostKey) -> Option<KeyCode> {
    let code = match key {
        HostKey::Left => LEFT_ARROW,
        HostKey::Right => RIGHT_ARROW,
        HostKey::Up => UP_ARROW,
        HostKey::Down => DOWN_ARROW,
        HostKey::Enter => ENTER,
        HostKey::Escape => ESCAPE,
        HostKey::Tab => TAB,
        HostKey::Backspace => BACKSPACE,
        HostKey::Pause => PAUSE,
        HostKey::Shift => RSHIFT,
        HostKey::Control | HostKey::Char('z' | 'Z') => RCTRL,
        HostKey::Alt => RALT,
        HostKey::Function(n) => return function_key(n),
        HostKey::Char(c) if c.is_ascii_graphic() || c == ' ' => {
            KeyCode(i32::from(c.to_ascii_lowercase() as u8))
        }
        HostKey::Char(_) => return None,
    };
    Some(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_and_modifiers() {
        assert_eq!(translate(HostKey::Left), Some(KeyCode(0xac)));
        assert_eq!(translate(HostKey::Right), Some(KeyCode(0xae)));
        assert_eq!(translate(HostKey::Up), Some(KeyCode(0xad)));
        assert_eq!(translate(HostKey::Down), Some(KeyCode(0xaf)));
        assert_eq!(translate(HostKey::Shift), Some(KeyCode(0xb6)));
        assert_eq!(translate(HostKey::Control), Some(KeyCode(0x9d)));
        assert_eq!(translate(HostKey::Alt), Some(KeyCode(0xb8)));
    }

    #[test]
    fn z_fires_like_control() {
        assert_eq!(translate(HostKey::Char('z')), translate(HostKey::Control));
        assert_eq!(translate(HostKey::Char('Z')), Some(RCTRL));
    }

    #[test]
    fn printable_keys_lowercase() {
        assert_eq!(translate(HostKey::Char('Y')), Some(KeyCode(i32::from(b'y'))));
        assert_eq!(translate(HostKey::Char(' ')), Some(KeyCode(32)));
        assert_eq!(translate(HostKey::Char('é')), None);
    }

    #[test]
    fn function_keys() {
        assert_eq!(translate(HostKey::Function(1)), Some(KeyCode(0xbb)));
        assert_eq!(translate(HostKey::Function(10)), Some(KeyCode(0xc4)));
        assert_eq!(translate(HostKey::Function(11)), Some(KeyCode(0xd7)));
        assert_eq!(translate(HostKey::Function(12)), Some(KeyCode(0xd8)));
        assert_eq!(translate(HostKey::Function(13)), None);
        assert_eq!(translate(HostKey::Function(0)), None);
    }
}
