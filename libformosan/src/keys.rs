//! Key scripts for the command line driver.
//!
//! A script is a line of plain characters, each typed as-is, mixed with
//! bracketed key names such as `<Left>` or `<BS>`. A literal `<` is written
//! `<lt>`.

use anyhow::{anyhow, bail};
use libfox_core::{KeyDescriptor, NamedKey};

fn named_key(token: &str) -> Option<NamedKey> {
    let key = match token.to_ascii_lowercase().as_str() {
        "tab" => NamedKey::Tab,
        "return" | "enter" | "cr" => NamedKey::Return,
        "space" => NamedKey::Space,
        "esc" | "escape" => NamedKey::Escape,
        "bs" | "backspace" => NamedKey::Backspace,
        "del" | "delete" => NamedKey::Delete,
        "left" => NamedKey::Left,
        "right" => NamedKey::Right,
        "up" => NamedKey::Up,
        "down" => NamedKey::Down,
        "pageup" | "pgup" => NamedKey::PageUp,
        "pagedown" | "pgdn" => NamedKey::PageDown,
        "home" => NamedKey::Home,
        "end" => NamedKey::End,
        _ => return None,
    };
    Some(key)
}

/// Parse a key script into key presses.
pub fn parse_keys(script: &str) -> anyhow::Result<Vec<KeyDescriptor>> {
    let mut keys = Vec::new();
    let mut chars = script.chars();
    while let Some(ch) = chars.next() {
        if ch != '<' {
            keys.push(KeyDescriptor::char(ch));
            continue;
        }
        let mut token = String::new();
        loop {
            match chars.next() {
                Some('>') => break,
                Some(c) => token.push(c),
                None => bail!("unterminated key name <{}", token),
            }
        }
        if token.eq_ignore_ascii_case("lt") {
            keys.push(KeyDescriptor::char('<'));
            continue;
        }
        if token.eq_ignore_ascii_case("space") {
            keys.push(KeyDescriptor::char(' '));
            continue;
        }
        let name = named_key(&token).ok_or_else(|| anyhow!("unknown key name <{}>", token))?;
        keys.push(KeyDescriptor::named(name));
    }
    Ok(keys)
}
