//! Windows Virtual-Key (VK) codes accepted by the injection controller.
//!
//! Reference: Windows Virtual-Key Codes (winuser.h).
//!
//! # What is a virtual-key code? (for beginners)
//!
//! Windows names each logical key with a single byte, `VK_*` in `<winuser.h>`
//! (e.g. `VK_RETURN = 0x0D`).  The code identifies the key, not the character
//! it produces: pressing the key labelled A yields `0x41` whatever the active
//! layout or shift state.
//!
//! Letters and digits reuse their ASCII upper-case values, which is why the
//! constants `A`..`Z` and `D0`..`D9` line up with `b'A'`..`b'Z'` and
//! `b'0'`..`b'9'`.

// ── Letters (VK_A=0x41 … VK_Z=0x5A) ──────────────────────────────────────────
pub const A: u8 = 0x41;
pub const B: u8 = 0x42;
pub const C: u8 = 0x43;
pub const D: u8 = 0x44;
pub const E: u8 = 0x45;
pub const F: u8 = 0x46;
pub const G: u8 = 0x47;
pub const H: u8 = 0x48;
pub const I: u8 = 0x49;
pub const J: u8 = 0x4A;
pub const K: u8 = 0x4B;
pub const L: u8 = 0x4C;
pub const M: u8 = 0x4D;
pub const N: u8 = 0x4E;
pub const O: u8 = 0x4F;
pub const P: u8 = 0x50;
pub const Q: u8 = 0x51;
pub const R: u8 = 0x52;
pub const S: u8 = 0x53;
pub const T: u8 = 0x54;
pub const U: u8 = 0x55;
pub const V: u8 = 0x56;
pub const W: u8 = 0x57;
pub const X: u8 = 0x58;
pub const Y: u8 = 0x59;
pub const Z: u8 = 0x5A;

// ── Digit row (VK_0=0x30 … VK_9=0x39) ────────────────────────────────────────
pub const D0: u8 = 0x30;
pub const D1: u8 = 0x31;
pub const D2: u8 = 0x32;
pub const D3: u8 = 0x33;
pub const D4: u8 = 0x34;
pub const D5: u8 = 0x35;
pub const D6: u8 = 0x36;
pub const D7: u8 = 0x37;
pub const D8: u8 = 0x38;
pub const D9: u8 = 0x39;

// ── Function keys ────────────────────────────────────────────────────────────
pub const F1: u8 = 0x70;
pub const F2: u8 = 0x71;
pub const F3: u8 = 0x72;
pub const F4: u8 = 0x73;
pub const F5: u8 = 0x74;
pub const F6: u8 = 0x75;
pub const F7: u8 = 0x76;
pub const F8: u8 = 0x77;
pub const F9: u8 = 0x78;
pub const F10: u8 = 0x79;
pub const F11: u8 = 0x7A;
pub const F12: u8 = 0x7B;

// ── Control keys ─────────────────────────────────────────────────────────────
pub const BACKSPACE: u8 = 0x08; // VK_BACK
pub const TAB: u8 = 0x09;
pub const ENTER: u8 = 0x0D; // VK_RETURN
pub const SHIFT: u8 = 0x10;
pub const CTRL: u8 = 0x11; // VK_CONTROL
pub const ALT: u8 = 0x12; // VK_MENU
pub const CAPS_LOCK: u8 = 0x14; // VK_CAPITAL
pub const ESC: u8 = 0x1B;
pub const SPACE: u8 = 0x20;

// ── Navigation keys ──────────────────────────────────────────────────────────
pub const PAGE_UP: u8 = 0x21; // VK_PRIOR
pub const PAGE_DOWN: u8 = 0x22; // VK_NEXT
pub const END: u8 = 0x23;
pub const HOME: u8 = 0x24;
pub const LEFT_ARROW: u8 = 0x25;
pub const UP_ARROW: u8 = 0x26;
pub const RIGHT_ARROW: u8 = 0x27;
pub const DOWN_ARROW: u8 = 0x28;
pub const INSERT: u8 = 0x2D;
pub const DELETE: u8 = 0x2E;

// ── Numpad ───────────────────────────────────────────────────────────────────
pub const NUMPAD0: u8 = 0x60;
pub const NUMPAD1: u8 = 0x61;
pub const NUMPAD2: u8 = 0x62;
pub const NUMPAD3: u8 = 0x63;
pub const NUMPAD4: u8 = 0x64;
pub const NUMPAD5: u8 = 0x65;
pub const NUMPAD6: u8 = 0x66;
pub const NUMPAD7: u8 = 0x67;
pub const NUMPAD8: u8 = 0x68;
pub const NUMPAD9: u8 = 0x69;
pub const MULTIPLY: u8 = 0x6A;
pub const ADD: u8 = 0x6B;
pub const SUBTRACT: u8 = 0x6D;
pub const DECIMAL: u8 = 0x6E;
pub const DIVIDE: u8 = 0x6F;
pub const NUM_LOCK: u8 = 0x90;

// ── Punctuation (US layout OEM keys) ─────────────────────────────────────────
pub const SEMICOLON: u8 = 0xBA; // ;
pub const PLUS: u8 = 0xBB; // =
pub const COMMA: u8 = 0xBC; // ,
pub const MINUS: u8 = 0xBD; // -
pub const PERIOD: u8 = 0xBE; // .
pub const SLASH: u8 = 0xBF; // /
pub const BACKTICK: u8 = 0xC0; // `
pub const LEFT_BRACKET: u8 = 0xDB; // [
pub const BACKSLASH: u8 = 0xDC; // \
pub const RIGHT_BRACKET: u8 = 0xDD; // ]
pub const APOSTROPHE: u8 = 0xDE; // '

// ── Left/right modifiers ─────────────────────────────────────────────────────
pub const LSHIFT: u8 = 0xA0;
pub const RSHIFT: u8 = 0xA1;
pub const LCTRL: u8 = 0xA2;
pub const RCTRL: u8 = 0xA3;
pub const LALT: u8 = 0xA4;
pub const RALT: u8 = 0xA5;

/// Canonical name for every constant above, in declaration order.
///
/// The first entry for a code is its canonical name; [`ALIASES`] adds extra
/// spellings accepted by lookup only.
pub(super) const NAMED_KEYS: &[(&str, u8)] = &[
    ("A", A), ("B", B), ("C", C), ("D", D), ("E", E), ("F", F), ("G", G),
    ("H", H), ("I", I), ("J", J), ("K", K), ("L", L), ("M", M), ("N", N),
    ("O", O), ("P", P), ("Q", Q), ("R", R), ("S", S), ("T", T), ("U", U),
    ("V", V), ("W", W), ("X", X), ("Y", Y), ("Z", Z),
    ("D0", D0), ("D1", D1), ("D2", D2), ("D3", D3), ("D4", D4),
    ("D5", D5), ("D6", D6), ("D7", D7), ("D8", D8), ("D9", D9),
    ("F1", F1), ("F2", F2), ("F3", F3), ("F4", F4), ("F5", F5), ("F6", F6),
    ("F7", F7), ("F8", F8), ("F9", F9), ("F10", F10), ("F11", F11), ("F12", F12),
    ("Backspace", BACKSPACE), ("Tab", TAB), ("Enter", ENTER), ("Shift", SHIFT),
    ("Ctrl", CTRL), ("Alt", ALT), ("CapsLock", CAPS_LOCK), ("Esc", ESC),
    ("Space", SPACE),
    ("PageUp", PAGE_UP), ("PageDown", PAGE_DOWN), ("End", END), ("Home", HOME),
    ("LeftArrow", LEFT_ARROW), ("UpArrow", UP_ARROW), ("RightArrow", RIGHT_ARROW),
    ("DownArrow", DOWN_ARROW), ("Insert", INSERT), ("Delete", DELETE),
    ("NumPad0", NUMPAD0), ("NumPad1", NUMPAD1), ("NumPad2", NUMPAD2),
    ("NumPad3", NUMPAD3), ("NumPad4", NUMPAD4), ("NumPad5", NUMPAD5),
    ("NumPad6", NUMPAD6), ("NumPad7", NUMPAD7), ("NumPad8", NUMPAD8),
    ("NumPad9", NUMPAD9), ("Multiply", MULTIPLY), ("Add", ADD),
    ("Subtract", SUBTRACT), ("Decimal", DECIMAL), ("Divide", DIVIDE),
    ("NumLock", NUM_LOCK),
    ("Semicolon", SEMICOLON), ("Plus", PLUS), ("Comma", COMMA), ("Minus", MINUS),
    ("Period", PERIOD), ("Slash", SLASH), ("Backtick", BACKTICK),
    ("LeftBracket", LEFT_BRACKET), ("Backslash", BACKSLASH),
    ("RightBracket", RIGHT_BRACKET), ("Apostrophe", APOSTROPHE),
    ("LShift", LSHIFT), ("RShift", RSHIFT), ("LCtrl", LCTRL), ("RCtrl", RCTRL),
    ("LAlt", LALT), ("RAlt", RALT),
];

/// Alternative spellings accepted by [`lookup`](super::lookup).
pub(super) const ALIASES: &[(&str, u8)] = &[
    ("0", D0), ("1", D1), ("2", D2), ("3", D3), ("4", D4),
    ("5", D5), ("6", D6), ("7", D7), ("8", D8), ("9", D9),
    ("Escape", ESC), ("Return", ENTER), ("Control", CTRL), ("Menu", ALT),
    ("Left", LEFT_ARROW), ("Up", UP_ARROW), ("Right", RIGHT_ARROW),
    ("Down", DOWN_ARROW), ("Del", DELETE), ("Ins", INSERT),
    ("Prior", PAGE_UP), ("Next", PAGE_DOWN), ("Back", BACKSPACE),
];
