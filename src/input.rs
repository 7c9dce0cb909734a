//! Keyboard input
//!
//! Three layers:
//! - [`RawEvent`]: what an input source delivers (key down/up, optional
//!   literal character, optional raw virtual key)
//! - [`translate`]: raw event to logical [`Key`], honoring keypad mode
//! - [`InputParser`]: terminal byte stream to raw events, for sources
//!   that read an ANSI terminal

/// Raw key identifiers as delivered by an input source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VirtualKey {
    Backspace,
    Tab,
    Clear,
    Return,
    Shift,
    Control,
    Alt,
    Pause,
    CapsLock,
    Escape,
    Space,
    PageUp,
    PageDown,
    End,
    Home,
    Left,
    Up,
    Right,
    Down,
    Select,
    Print,
    Insert,
    Delete,
    Help,
    Cancel,
    /// Numeric keypad digit 0-9
    Numpad(u8),
    /// Function key F1-F24
    F(u8),
}

/// One event from an input source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEvent {
    pub key_down: bool,
    pub ch: Option<char>,
    pub vk: Option<VirtualKey>,
}

impl RawEvent {
    /// Key-down event with a literal character and no virtual key
    pub fn char(ch: char) -> Self {
        Self {
            key_down: true,
            ch: Some(ch),
            vk: None,
        }
    }

    /// Key-down event for a virtual key, with an optional literal character
    pub fn key(vk: VirtualKey, ch: Option<char>) -> Self {
        Self {
            key_down: true,
            ch,
            vk: Some(vk),
        }
    }

    /// The matching key-up event
    pub fn released(self) -> Self {
        Self {
            key_down: false,
            ..self
        }
    }
}

/// Value of the first symbolic key code; smaller values are characters.
pub const KEY_CODE_YES: i32 = 256;

/// Code of function key F0; `F(n)` is `KEY_F0 + n`.
pub const KEY_F0: i32 = 264;

/// Number of function key codes reserved after F0.
pub const NUM_FUNCTION_KEYS: u8 = 64;

/// Symbolic key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Break,
    Down,
    Up,
    Left,
    Right,
    Home,
    Backspace,
    /// Function key 0-63. Larger numbers name no key; see
    /// [`KeyCode::function`].
    F(u8),
    /// Delete line
    Dl,
    /// Insert line
    Il,
    /// Delete character
    Dc,
    /// Insert character
    Ic,
    /// Exit insert char mode
    Eic,
    Clear,
    /// Clear to end of screen
    Eos,
    /// Clear to end of line
    Eol,
    /// Scroll one line forward
    Sf,
    /// Scroll one line backward
    Sr,
    NPage,
    PPage,
    STab,
    CTab,
    CATab,
    Enter,
    SReset,
    Reset,
    Print,
    /// Home down or bottom
    Ll,
    // Keypad corners and center:
    //   A1  UP   A3
    //  LEFT B2 RIGHT
    //   C1 DOWN  C3
    A1,
    A3,
    B2,
    C1,
    C3,
    BTab,
    Beg,
    Cancel,
    Close,
    Command,
    Copy,
    Create,
    End,
    Exit,
    Find,
    Help,
    Mark,
    Message,
    Move,
    Next,
    Open,
    Options,
    Previous,
    Redo,
    Reference,
    Refresh,
    Replace,
    Restart,
    Resume,
    Save,
    SBeg,
    SCancel,
    SCommand,
    SCopy,
    SCreate,
    SDc,
    SDl,
    Select,
    SEnd,
    SEol,
    SExit,
    SFind,
    SHelp,
    SHome,
    SIc,
    SLeft,
    SMessage,
    SMove,
    SNext,
    SOptions,
    SPrevious,
    SPrint,
    SRedo,
    SReplace,
    SRight,
    SResume,
    SSave,
    SSuspend,
    SUndo,
    Suspend,
    Undo,
}

/// Codes before the function key block, starting at `KEY_CODE_YES + 1`.
const LEADING_KEYS: [KeyCode; 7] = [
    KeyCode::Break,
    KeyCode::Down,
    KeyCode::Up,
    KeyCode::Left,
    KeyCode::Right,
    KeyCode::Home,
    KeyCode::Backspace,
];

/// Codes after the function key block, starting at `KEY_F0 + 64`.
const TRAILING_KEYS: [KeyCode; 81] = [
    KeyCode::Dl,
    KeyCode::Il,
    KeyCode::Dc,
    KeyCode::Ic,
    KeyCode::Eic,
    KeyCode::Clear,
    KeyCode::Eos,
    KeyCode::Eol,
    KeyCode::Sf,
    KeyCode::Sr,
    KeyCode::NPage,
    KeyCode::PPage,
    KeyCode::STab,
    KeyCode::CTab,
    KeyCode::CATab,
    KeyCode::Enter,
    KeyCode::SReset,
    KeyCode::Reset,
    KeyCode::Print,
    KeyCode::Ll,
    KeyCode::A1,
    KeyCode::A3,
    KeyCode::B2,
    KeyCode::C1,
    KeyCode::C3,
    KeyCode::BTab,
    KeyCode::Beg,
    KeyCode::Cancel,
    KeyCode::Close,
    KeyCode::Command,
    KeyCode::Copy,
    KeyCode::Create,
    KeyCode::End,
    KeyCode::Exit,
    KeyCode::Find,
    KeyCode::Help,
    KeyCode::Mark,
    KeyCode::Message,
    KeyCode::Move,
    KeyCode::Next,
    KeyCode::Open,
    KeyCode::Options,
    KeyCode::Previous,
    KeyCode::Redo,
    KeyCode::Reference,
    KeyCode::Refresh,
    KeyCode::Replace,
    KeyCode::Restart,
    KeyCode::Resume,
    KeyCode::Save,
    KeyCode::SBeg,
    KeyCode::SCancel,
    KeyCode::SCommand,
    KeyCode::SCopy,
    KeyCode::SCreate,
    KeyCode::SDc,
    KeyCode::SDl,
    KeyCode::Select,
    KeyCode::SEnd,
    KeyCode::SEol,
    KeyCode::SExit,
    KeyCode::SFind,
    KeyCode::SHelp,
    KeyCode::SHome,
    KeyCode::SIc,
    KeyCode::SLeft,
    KeyCode::SMessage,
    KeyCode::SMove,
    KeyCode::SNext,
    KeyCode::SOptions,
    KeyCode::SPrevious,
    KeyCode::SPrint,
    KeyCode::SRedo,
    KeyCode::SReplace,
    KeyCode::SRight,
    KeyCode::SResume,
    KeyCode::SSave,
    KeyCode::SSuspend,
    KeyCode::SUndo,
    KeyCode::Suspend,
    KeyCode::Undo,
];

const TRAILING_START: i32 = KEY_F0 + NUM_FUNCTION_KEYS as i32;

/// Code reported for a function key number outside the reserved block
pub const KEY_ERR: i32 = -1;

impl KeyCode {
    /// Function key `n`, if `n` is inside the reserved block
    pub fn function(n: u8) -> Option<KeyCode> {
        (n < NUM_FUNCTION_KEYS).then_some(KeyCode::F(n))
    }

    /// Numeric value of this key code, or [`KEY_ERR`] for a function key
    /// past F63.
    pub fn code(self) -> i32 {
        if let KeyCode::F(n) = self {
            if n >= NUM_FUNCTION_KEYS {
                return KEY_ERR;
            }
            return KEY_F0 + i32::from(n);
        }
        if let Some(pos) = LEADING_KEYS.iter().position(|&k| k == self) {
            return KEY_CODE_YES + 1 + pos as i32;
        }
        let pos = TRAILING_KEYS.iter().position(|&k| k == self).unwrap_or(0);
        TRAILING_START + pos as i32
    }

    /// Key code for a numeric value, if it names one
    pub fn from_code(code: i32) -> Option<KeyCode> {
        if (KEY_F0..TRAILING_START).contains(&code) {
            return u8::try_from(code - KEY_F0).ok().map(KeyCode::F);
        }
        if code > KEY_CODE_YES && code < KEY_F0 {
            return usize::try_from(code - KEY_CODE_YES - 1)
                .ok()
                .and_then(|i| LEADING_KEYS.get(i).copied());
        }
        usize::try_from(code - TRAILING_START)
            .ok()
            .and_then(|i| TRAILING_KEYS.get(i).copied())
    }
}

/// What a read returns: a literal character or a symbolic key code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Code(KeyCode),
}

impl Key {
    /// Numeric value: the character's scalar value or the key code
    pub fn code(self) -> i32 {
        match self {
            Key::Char(ch) => ch as i32,
            Key::Code(code) => code.code(),
        }
    }
}

/// Keypad-mode translation of a raw virtual key.
///
/// Keys not listed here are not translated.
pub fn keypad_code(vk: VirtualKey) -> Option<KeyCode> {
    let code = match vk {
        VirtualKey::Escape => KeyCode::Exit,
        VirtualKey::Cancel => KeyCode::Cancel,
        VirtualKey::Backspace => KeyCode::Backspace,
        VirtualKey::Clear => KeyCode::Clear,
        VirtualKey::Return => KeyCode::Enter,
        VirtualKey::Control => KeyCode::Command,
        VirtualKey::PageUp => KeyCode::PPage,
        VirtualKey::PageDown => KeyCode::NPage,
        VirtualKey::End => KeyCode::End,
        VirtualKey::Home => KeyCode::Home,
        VirtualKey::Left => KeyCode::Left,
        VirtualKey::Up => KeyCode::Up,
        VirtualKey::Right => KeyCode::Right,
        VirtualKey::Down => KeyCode::Down,
        VirtualKey::Select => KeyCode::Select,
        VirtualKey::Print => KeyCode::Print,
        VirtualKey::Delete => KeyCode::Dc,
        VirtualKey::Help => KeyCode::Help,
        VirtualKey::Numpad(1) => KeyCode::C1,
        VirtualKey::Numpad(2) => KeyCode::Down,
        VirtualKey::Numpad(3) => KeyCode::C3,
        VirtualKey::Numpad(4) => KeyCode::Left,
        VirtualKey::Numpad(5) => KeyCode::B2,
        VirtualKey::Numpad(6) => KeyCode::Right,
        VirtualKey::Numpad(7) => KeyCode::A1,
        VirtualKey::Numpad(8) => KeyCode::Up,
        VirtualKey::Numpad(9) => KeyCode::A3,
        VirtualKey::F(n @ 1..=24) => KeyCode::F(n),
        _ => return None,
    };
    Some(code)
}

/// Translate a key-down event.
///
/// With keypad mode on, mapped virtual keys become key codes. Everything
/// else returns the literal character; keys without one read as NUL.
pub fn translate(event: &RawEvent, keypad: bool) -> Key {
    if keypad {
        if let Some(code) = event.vk.and_then(keypad_code) {
            return Key::Code(code);
        }
    }
    Key::Char(event.ch.unwrap_or('\0'))
}

/// Terminal byte stream to raw events
pub struct InputParser {
    /// Buffer for incomplete escape sequences
    buffer: Vec<u8>,
}

impl InputParser {
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(32),
        }
    }

    /// Parse input bytes into events. Incomplete sequences are kept for
    /// the next call.
    pub fn parse(&mut self, data: &[u8]) -> Vec<RawEvent> {
        let mut events = Vec::new();
        self.buffer.extend_from_slice(data);
        self.drain_into(&mut events);
        events
    }

    /// Whether a partial sequence is waiting for more bytes
    pub fn has_pending(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// Give up waiting on a partial sequence: a leading ESC becomes the
    /// Escape key and the rest is parsed as ordinary input.
    pub fn flush(&mut self) -> Vec<RawEvent> {
        let mut events = Vec::new();
        while !self.buffer.is_empty() {
            if self.buffer[0] == 0x1b {
                self.buffer.remove(0);
                events.push(RawEvent::key(VirtualKey::Escape, Some('\x1b')));
            } else {
                // Truncated UTF-8; nothing more is coming.
                self.buffer.clear();
                break;
            }
            self.drain_into(&mut events);
        }
        events
    }

    fn drain_into(&mut self, events: &mut Vec<RawEvent>) {
        while !self.buffer.is_empty() {
            match self.try_parse_one() {
                ParseResult::Event(event) => events.push(event),
                ParseResult::Incomplete => break,
                ParseResult::Invalid(skip) => {
                    self.buffer.drain(0..skip);
                }
            }
        }
    }

    /// Try to parse one event from the buffer
    fn try_parse_one(&mut self) -> ParseResult {
        let first = self.buffer[0];

        if first == 0x1b {
            return self.parse_escape();
        }

        // Control characters (< 32) and DEL (0x7f)
        if first < 32 || first == 0x7f {
            let event = match first {
                0x0d => RawEvent::key(VirtualKey::Return, Some('\r')),
                0x09 => RawEvent::key(VirtualKey::Tab, Some('\t')),
                0x7f | 0x08 => RawEvent::key(VirtualKey::Backspace, Some('\x08')),
                _ => RawEvent::char(first as char),
            };
            self.buffer.remove(0);
            return ParseResult::Event(event);
        }

        match self.decode_utf8() {
            Utf8::Char(ch, len) => {
                self.buffer.drain(0..len);
                let event = if ch == ' ' {
                    RawEvent::key(VirtualKey::Space, Some(' '))
                } else {
                    RawEvent::char(ch)
                };
                ParseResult::Event(event)
            }
            Utf8::Incomplete => ParseResult::Incomplete,
            Utf8::Invalid => ParseResult::Invalid(1),
        }
    }

    /// Parse an escape sequence
    fn parse_escape(&mut self) -> ParseResult {
        // A lone ESC waits for `flush`
        if self.buffer.len() < 2 {
            return ParseResult::Incomplete;
        }

        match self.buffer[1] {
            b'[' => self.parse_csi(),
            b'O' => self.parse_ss3(),
            // ESC ESC: the first one is the Escape key
            0x1b => {
                self.buffer.remove(0);
                ParseResult::Event(RawEvent::key(VirtualKey::Escape, Some('\x1b')))
            }
            // Alt+key: pass the key through
            c if c >= 32 && c < 0x7f => {
                self.buffer.drain(0..2);
                ParseResult::Event(RawEvent::char(c as char))
            }
            _ => {
                self.buffer.remove(0);
                ParseResult::Event(RawEvent::key(VirtualKey::Escape, Some('\x1b')))
            }
        }
    }

    /// Parse CSI (Control Sequence Introducer) sequence: ESC [
    fn parse_csi(&mut self) -> ParseResult {
        if self.buffer.len() < 3 {
            return ParseResult::Incomplete;
        }

        let end = self.buffer[2..]
            .iter()
            .position(|&b| b.is_ascii_alphabetic() || b == b'~');

        match end {
            None => ParseResult::Incomplete,
            Some(pos) => {
                let end_idx = 2 + pos;
                let final_byte = self.buffer[end_idx];
                let params = parse_params(&self.buffer[2..end_idx]);
                self.buffer.drain(0..=end_idx);

                match decode_csi(&params, final_byte) {
                    Some(vk) => ParseResult::Event(RawEvent::key(vk, None)),
                    None => ParseResult::Invalid(0),
                }
            }
        }
    }

    /// Parse SS3 sequence: ESC O
    fn parse_ss3(&mut self) -> ParseResult {
        if self.buffer.len() < 3 {
            return ParseResult::Incomplete;
        }

        let event = match self.buffer[2] {
            b'P' => Some(RawEvent::key(VirtualKey::F(1), None)),
            b'Q' => Some(RawEvent::key(VirtualKey::F(2), None)),
            b'R' => Some(RawEvent::key(VirtualKey::F(3), None)),
            b'S' => Some(RawEvent::key(VirtualKey::F(4), None)),
            b'A' => Some(RawEvent::key(VirtualKey::Up, None)),
            b'B' => Some(RawEvent::key(VirtualKey::Down, None)),
            b'C' => Some(RawEvent::key(VirtualKey::Right, None)),
            b'D' => Some(RawEvent::key(VirtualKey::Left, None)),
            b'E' => Some(RawEvent::key(VirtualKey::Clear, None)),
            b'H' => Some(RawEvent::key(VirtualKey::Home, None)),
            b'F' => Some(RawEvent::key(VirtualKey::End, None)),
            b'M' => Some(RawEvent::key(VirtualKey::Return, Some('\r'))),
            // Application keypad digits
            d @ b'p'..=b'y' => {
                let digit = d - b'p';
                Some(RawEvent::key(VirtualKey::Numpad(digit), Some((b'0' + digit) as char)))
            }
            _ => None,
        };

        self.buffer.drain(0..3);
        event.map(ParseResult::Event).unwrap_or(ParseResult::Invalid(0))
    }

    /// Decode a UTF-8 character from the buffer
    fn decode_utf8(&self) -> Utf8 {
        let first = self.buffer[0];

        if first < 128 {
            return Utf8::Char(first as char, 1);
        }

        let len = if first & 0xE0 == 0xC0 {
            2
        } else if first & 0xF0 == 0xE0 {
            3
        } else if first & 0xF8 == 0xF0 {
            4
        } else {
            return Utf8::Invalid;
        };

        if self.buffer.len() < len {
            return Utf8::Incomplete;
        }

        match std::str::from_utf8(&self.buffer[0..len]).ok().and_then(|s| s.chars().next()) {
            Some(ch) => Utf8::Char(ch, len),
            None => Utf8::Invalid,
        }
    }
}

impl Default for InputParser {
    fn default() -> Self {
        Self::new()
    }
}

enum ParseResult {
    Event(RawEvent),
    Incomplete,
    Invalid(usize),
}

enum Utf8 {
    Char(char, usize),
    Incomplete,
    Invalid,
}

/// Split `1;2` style CSI parameters. Missing numbers read as 0.
fn parse_params(raw: &[u8]) -> Vec<u32> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(|&b| b == b';')
        .map(|part| {
            part.iter()
                .take_while(|b| b.is_ascii_digit())
                .fold(0u32, |acc, &b| acc.saturating_mul(10).saturating_add(u32::from(b - b'0')))
        })
        .collect()
}

/// Function key number for a `~` sequence parameter
fn tilde_function_key(num: u32) -> Option<u8> {
    let n = match num {
        11..=15 => num - 10,
        17..=21 => num - 11,
        23..=26 => num - 12,
        28 | 29 => num - 13,
        31..=34 => num - 14,
        _ => return None,
    };
    u8::try_from(n).ok()
}

/// Decode CSI parameters into a virtual key
fn decode_csi(params: &[u32], final_byte: u8) -> Option<VirtualKey> {
    // Shift (modifier 2) moves F1-F12 up to F13-F24
    let shifted = params.get(1) == Some(&2);
    let function = |n: u8| {
        let n = if shifted && n <= 12 { n + 12 } else { n };
        VirtualKey::F(n)
    };

    match final_byte {
        b'A' => Some(VirtualKey::Up),
        b'B' => Some(VirtualKey::Down),
        b'C' => Some(VirtualKey::Right),
        b'D' => Some(VirtualKey::Left),
        b'E' => Some(VirtualKey::Clear),
        b'H' => Some(VirtualKey::Home),
        b'F' => Some(VirtualKey::End),
        b'Z' => Some(VirtualKey::Tab),
        b'P' => Some(function(1)),
        b'Q' => Some(function(2)),
        b'R' => Some(function(3)),
        b'S' => Some(function(4)),
        b'~' => match params.first().copied().unwrap_or(0) {
            1 | 7 => Some(VirtualKey::Home),
            2 => Some(VirtualKey::Insert),
            3 => Some(VirtualKey::Delete),
            4 | 8 => Some(VirtualKey::End),
            5 => Some(VirtualKey::PageUp),
            6 => Some(VirtualKey::PageDown),
            num => tilde_function_key(num).map(function),
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_code_numbering() {
        assert_eq!(KeyCode::Break.code(), 257);
        assert_eq!(KeyCode::Down.code(), 258);
        assert_eq!(KeyCode::Backspace.code(), 263);
        assert_eq!(KeyCode::F(0).code(), 264);
        assert_eq!(KeyCode::F(12).code(), 276);
        assert_eq!(KeyCode::Dl.code(), 328);
        assert_eq!(KeyCode::Enter.code(), 343);
        assert_eq!(KeyCode::Undo.code(), 408);
    }

    #[test]
    fn test_key_code_lookup() {
        for code in 257..=408 {
            let key = KeyCode::from_code(code).unwrap();
            assert_eq!(key.code(), code);
        }
        assert_eq!(KeyCode::from_code(256), None);
        assert_eq!(KeyCode::from_code(409), None);
    }

    #[test]
    fn test_function_keys_past_block() {
        assert_eq!(KeyCode::function(63), Some(KeyCode::F(63)));
        assert_eq!(KeyCode::F(63).code(), 327);
        assert_eq!(KeyCode::function(64), None);
        assert_eq!(KeyCode::F(64).code(), KEY_ERR);
        assert_eq!(KeyCode::F(255).code(), KEY_ERR);
        assert_eq!(KeyCode::from_code(328), Some(KeyCode::Dl));
        assert_eq!(KeyCode::from_code(KEY_ERR), None);
    }

    #[test]
    fn test_keypad_table() {
        assert_eq!(keypad_code(VirtualKey::Escape), Some(KeyCode::Exit));
        assert_eq!(keypad_code(VirtualKey::Delete), Some(KeyCode::Dc));
        assert_eq!(keypad_code(VirtualKey::Numpad(7)), Some(KeyCode::A1));
        assert_eq!(keypad_code(VirtualKey::Numpad(8)), Some(KeyCode::Up));
        assert_eq!(keypad_code(VirtualKey::F(24)), Some(KeyCode::F(24)));
        assert_eq!(keypad_code(VirtualKey::F(25)), None);
        assert_eq!(keypad_code(VirtualKey::Numpad(0)), None);
        assert_eq!(keypad_code(VirtualKey::Insert), None);
    }

    #[test]
    fn test_translate_respects_keypad() {
        let left = RawEvent::key(VirtualKey::Left, None);
        assert_eq!(translate(&left, false), Key::Char('\0'));
        assert_eq!(translate(&left, true), Key::Code(KeyCode::Left));

        let enter = RawEvent::key(VirtualKey::Return, Some('\r'));
        assert_eq!(translate(&enter, false), Key::Char('\r'));
        assert_eq!(translate(&enter, true), Key::Code(KeyCode::Enter));

        // Unmapped keys fall through to the literal character
        let insert = RawEvent::key(VirtualKey::Insert, Some('i'));
        assert_eq!(translate(&insert, true), Key::Char('i'));
    }

    #[test]
    fn test_parse_char() {
        let mut parser = InputParser::new();
        let events = parser.parse(b"a");
        assert_eq!(events, vec![RawEvent::char('a')]);
    }

    #[test]
    fn test_parse_arrow_keys() {
        let mut parser = InputParser::new();

        let events = parser.parse(b"\x1b[A");
        assert_eq!(events, vec![RawEvent::key(VirtualKey::Up, None)]);

        let events = parser.parse(b"\x1bOB");
        assert_eq!(events, vec![RawEvent::key(VirtualKey::Down, None)]);
    }

    #[test]
    fn test_parse_function_keys() {
        let mut parser = InputParser::new();
        let events = parser.parse(b"\x1bOP\x1b[15~\x1b[24~\x1b[1;2P\x1b[24;2~");
        let keys: Vec<_> = events.iter().map(|e| e.vk).collect();
        assert_eq!(
            keys,
            vec![
                Some(VirtualKey::F(1)),
                Some(VirtualKey::F(5)),
                Some(VirtualKey::F(12)),
                Some(VirtualKey::F(13)),
                Some(VirtualKey::F(24)),
            ]
        );
    }

    #[test]
    fn test_parse_multiple() {
        let mut parser = InputParser::new();
        let events = parser.parse(b"ab\r\x1b[3~");
        assert_eq!(events.len(), 4);
        assert_eq!(events[0], RawEvent::char('a'));
        assert_eq!(events[2], RawEvent::key(VirtualKey::Return, Some('\r')));
        assert_eq!(events[3], RawEvent::key(VirtualKey::Delete, None));
    }

    #[test]
    fn test_lone_escape_needs_flush() {
        let mut parser = InputParser::new();
        assert!(parser.parse(b"\x1b").is_empty());
        assert!(parser.has_pending());
        let events = parser.flush();
        assert_eq!(events, vec![RawEvent::key(VirtualKey::Escape, Some('\x1b'))]);
        assert!(!parser.has_pending());
    }

    #[test]
    fn test_split_sequence() {
        let mut parser = InputParser::new();
        assert!(parser.parse(b"\x1b[").is_empty());
        let events = parser.parse(b"D");
        assert_eq!(events, vec![RawEvent::key(VirtualKey::Left, None)]);
    }

    #[test]
    fn test_parse_utf8() {
        let mut parser = InputParser::new();
        let bytes = "é".as_bytes();
        assert!(parser.parse(&bytes[..1]).is_empty());
        assert_eq!(parser.parse(&bytes[1..]), vec![RawEvent::char('é')]);
    }
}
