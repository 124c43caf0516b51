//! Discrete key transition events.

use std::fmt;

/// Whether a key went down or up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyDirection {
    /// The key was pressed.
    Pressed,
    /// The key was released.
    Released,
}

/// A key code in the engine's own code space.
///
/// Translation from a physical backend's codes happens before an event is
/// queued; see [`keys::translate`](crate::keys::translate).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyCode(pub i32);

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

impl From<i32> for KeyCode {
    fn from(v: i32) -> Self {
        Self(v)
    }
}

/// One edge-triggered key transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// Press or release.
    pub direction: KeyDirection,
    /// Engine-domain key code.
    pub code: KeyCode,
}

impl KeyEvent {
    /// A key-down event.
    pub fn pressed(code: impl Into<KeyCode>) -> Self {
        Self {
            direction: KeyDirection::Pressed,
            code: code.into(),
        }
    }

    /// A key-up event.
    pub fn released(code: impl Into<KeyCode>) -> Self {
        Self {
            direction: KeyDirection::Released,
            code: code.into(),
        }
    }
}
