//! Semantic key descriptors consumed from the host.
//!
//! The host decodes its own key events into a `KeyDescriptor`: an optional
//! single character (for "simple" keys) and a named key for everything the
//! router treats specially.

/// Keys the router distinguishes by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NamedKey {
    Tab,
    Return,
    Space,
    Escape,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    /// Anything else, including plain character keys
    #[default]
    Other,
}

/// A decoded key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyDescriptor {
    /// True for key-up events, which the engine never handles
    pub is_release: bool,
    /// The key's text when it produces exactly one character
    pub text: Option<char>,
    pub name: NamedKey,
}

impl KeyDescriptor {
    /// A plain character key press. `' '` is reported as `NamedKey::Space`.
    pub fn char(ch: char) -> Self {
        let name = if ch == ' ' {
            NamedKey::Space
        } else {
            NamedKey::Other
        };
        Self {
            is_release: false,
            text: Some(ch),
            name,
        }
    }

    /// A named key press without text.
    pub fn named(name: NamedKey) -> Self {
        Self {
            is_release: false,
            text: None,
            name,
        }
    }

    /// The same key, released.
    pub fn release(self) -> Self {
        Self {
            is_release: true,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_char_is_named_space() {
        let key = KeyDescriptor::char(' ');
        assert_eq!(key.name, NamedKey::Space);
        assert_eq!(key.text, Some(' '));
    }

    #[test]
    fn release_keeps_key_identity() {
        let key = KeyDescriptor::named(NamedKey::Left).release();
        assert!(key.is_release);
        assert_eq!(key.name, NamedKey::Left);
        assert_eq!(key.text, None);
    }
}
