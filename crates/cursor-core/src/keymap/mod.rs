//! Static virtual-key table.
//!
//! The constants in [`vk`] are what callers pass to
//! `InputInjector::simulate_key_pressing`.  [`lookup`] and [`name_of`] turn
//! the table into something a CLI flag or a log line can use.

mod virtual_keys;

/// Virtual-key constants, e.g. `vk::A`, `vk::F5`, `vk::LEFT_ARROW`.
pub mod vk {
    pub use super::virtual_keys::*;
}

use virtual_keys::{ALIASES, NAMED_KEYS};

/// Resolves a symbolic key name to its virtual-key code.
///
/// Matching is ASCII case-insensitive and accepts both canonical names
/// (`"Esc"`, `"LeftArrow"`, `"D7"`) and common aliases (`"Escape"`, `"Left"`,
/// `"7"`).  A `0x`-prefixed hex literal is accepted as a raw code.
pub fn lookup(name: &str) -> Option<u8> {
    let name = name.trim();
    if let Some(hex) = name.strip_prefix("0x").or_else(|| name.strip_prefix("0X")) {
        if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        return u8::from_str_radix(hex, 16).ok();
    }
    NAMED_KEYS
        .iter()
        .chain(ALIASES.iter())
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
        .map(|&(_, code)| code)
}

/// Returns the canonical name for `code`, or `None` if the table has no entry.
pub fn name_of(code: u8) -> Option<&'static str> {
    NAMED_KEYS
        .iter()
        .find(|&&(_, candidate)| candidate == code)
        .map(|&(name, _)| name)
}

/// Formats `code` for log lines: `"A (0x41)"`, or just the hex for unnamed codes.
pub fn describe(code: u8) -> String {
    match name_of(code) {
        Some(name) => format!("{name} (0x{code:02X})"),
        None => format!("0x{code:02X}"),
    }
}
