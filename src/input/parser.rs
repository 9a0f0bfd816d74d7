//! Escape sequence parser for terminal input.
//!
//! Turns raw stdin bytes into typed events:
//! - C0 control bytes (Ctrl+letter, Tab, Enter, Backspace)
//! - CSI sequences (arrows, Home/End, Insert/Delete, PageUp/Down, F-keys,
//!   modifier parameters, focus reporting, bracketed paste)
//! - SS3 sequences (F1-F4, application-mode arrows)
//! - SGR mouse reports (button, action, coordinates, modifiers)
//! - UTF-8 runes
//!
//! Unrecognized sequences are dropped without terminating the stream;
//! partial sequences stay buffered until more bytes arrive. A lone ESC
//! resolves to the Escape key when the buffer is flushed.

use super::events::{
    Event, KeyCode, KeyEvent, Modifiers, MouseAction, MouseButton, MouseEvent,
};

/// Outcome of one parse attempt against the front of the buffer.
enum Parsed {
    /// An event, consuming `n` bytes.
    Ev(Event, usize),
    /// The buffer holds the prefix of a sequence; wait for more bytes.
    Need,
    /// Drop `n` unrecognized bytes and continue.
    Drop(usize),
}

/// Input parser state machine.
///
/// Feed it byte chunks as they arrive; it yields complete events and
/// buffers partial sequences across chunk boundaries.
pub struct InputParser {
    buf: Vec<u8>,
}

impl Default for InputParser {
    fn default() -> Self {
        Self::new()
    }
}

impl InputParser {
    /// Create an empty parser.
    pub fn new() -> Self {
        Self { buf: Vec::with_capacity(64) }
    }

    /// Parse a byte chunk into events.
    pub fn feed(&mut self, data: &[u8]) -> Vec<Event> {
        self.buf.extend_from_slice(data);
        let mut events = Vec::new();
        while !self.buf.is_empty() {
            match self.try_parse_one() {
                Parsed::Ev(ev, n) => {
                    self.buf.drain(..n);
                    events.push(ev);
                }
                Parsed::Need => break,
                Parsed::Drop(n) => {
                    self.buf.drain(..n.max(1));
                }
            }
        }
        events
    }

    /// Check whether a partial sequence is buffered.
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Check whether the buffered bytes are exactly a bare ESC.
    ///
    /// The reader uses this to tell the Escape key apart from the prefix
    /// of a sequence still in flight.
    pub fn pending_escape(&self) -> bool {
        self.buf == [0x1b]
    }

    /// Resolve buffered bytes that will never complete.
    ///
    /// A lone ESC becomes the Escape key; any other partial sequence is
    /// dropped. Afterwards the buffer is empty.
    pub fn flush(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if self.buf == [0x1b] {
            events.push(Event::Key(KeyEvent::plain(KeyCode::Escape)));
        }
        self.buf.clear();
        events
    }

    fn try_parse_one(&mut self) -> Parsed {
        let Some(&first) = self.buf.first() else {
            return Parsed::Need;
        };

        match first {
            0x1b => self.parse_escape(),
            0x00 => key_ev(KeyCode::Null, Modifiers::CTRL, 1),
            0x09 => key_ev(KeyCode::Tab, Modifiers::empty(), 1),
            0x0a | 0x0d => key_ev(KeyCode::Enter, Modifiers::empty(), 1),
            0x08 | 0x7f => key_ev(KeyCode::Backspace, Modifiers::empty(), 1),
            // Remaining C0 bytes are Ctrl+letter
            0x01..=0x1a => key_ev(
                KeyCode::Char((first + 0x60) as char),
                Modifiers::CTRL,
                1,
            ),
            0x20..=0x7e => key_ev(KeyCode::Char(first as char), Modifiers::empty(), 1),
            0x80.. => self.parse_utf8(),
            // Unmapped C0/C1 bytes
            _ => Parsed::Drop(1),
        }
    }

    /// Decode one UTF-8 rune at the front of the buffer.
    fn parse_utf8(&self) -> Parsed {
        let len = match self.buf[0] {
            0xc2..=0xdf => 2,
            0xe0..=0xef => 3,
            0xf0..=0xf4 => 4,
            _ => return Parsed::Drop(1),
        };
        if self.buf.len() < len {
            return Parsed::Need;
        }
        match std::str::from_utf8(&self.buf[..len]) {
            Ok(s) => match s.chars().next() {
                Some(c) => key_ev(KeyCode::Char(c), Modifiers::empty(), len),
                None => Parsed::Drop(len),
            },
            Err(_) => Parsed::Drop(1),
        }
    }

    fn parse_escape(&self) -> Parsed {
        if self.buf.len() < 2 {
            return Parsed::Need;
        }
        match self.buf[1] {
            b'[' => self.parse_csi(),
            b'O' => self.parse_ss3(),
            // ESC ESC: Alt+Escape
            0x1b => key_ev(KeyCode::Escape, Modifiers::ALT, 2),
            // Alt+printable
            0x20..=0x7e => key_ev(KeyCode::Char(self.buf[1] as char), Modifiers::ALT, 2),
            // ESC followed by something else: standalone Escape
            _ => key_ev(KeyCode::Escape, Modifiers::empty(), 1),
        }
    }

    fn parse_ss3(&self) -> Parsed {
        if self.buf.len() < 3 {
            return Parsed::Need;
        }
        let code = match self.buf[2] {
            b'A' => KeyCode::Up,
            b'B' => KeyCode::Down,
            b'C' => KeyCode::Right,
            b'D' => KeyCode::Left,
            b'H' => KeyCode::Home,
            b'F' => KeyCode::End,
            b'P' => KeyCode::F(1),
            b'Q' => KeyCode::F(2),
            b'R' => KeyCode::F(3),
            b'S' => KeyCode::F(4),
            _ => return Parsed::Drop(3),
        };
        key_ev(code, Modifiers::empty(), 3)
    }

    fn parse_csi(&self) -> Parsed {
        // Minimum: ESC [ X
        if self.buf.len() < 3 {
            return Parsed::Need;
        }

        // SGR mouse: ESC [ <
        if self.buf[2] == b'<' {
            return self.parse_sgr_mouse();
        }
        // Focus reporting
        if self.buf[2] == b'I' {
            return Parsed::Ev(Event::FocusGained, 3);
        }
        if self.buf[2] == b'O' {
            return Parsed::Ev(Event::FocusLost, 3);
        }

        // Find the final byte (0x40-0x7E)
        let mut end = 2;
        while end < self.buf.len() && !(0x40..=0x7e).contains(&self.buf[end]) {
            end += 1;
        }
        if end >= self.buf.len() {
            return Parsed::Need;
        }

        let final_byte = self.buf[end];
        let params: Vec<u16> = self.buf[2..end]
            .split(|&b| b == b';')
            .map(|p| {
                std::str::from_utf8(p)
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(0)
            })
            .collect();
        let consumed = end + 1;
        let modifiers = csi_modifiers(params.get(1).copied());

        let code = match final_byte {
            b'A' => KeyCode::Up,
            b'B' => KeyCode::Down,
            b'C' => KeyCode::Right,
            b'D' => KeyCode::Left,
            b'H' => KeyCode::Home,
            b'F' => KeyCode::End,
            b'Z' => KeyCode::BackTab,
            b'~' => {
                if params.first() == Some(&200) {
                    return self.parse_paste(consumed);
                }
                match tilde_key(params.first().copied().unwrap_or(0)) {
                    Some(code) => code,
                    None => return Parsed::Drop(consumed),
                }
            }
            _ => return Parsed::Drop(consumed),
        };
        key_ev(code, modifiers, consumed)
    }

    /// Bracketed paste: everything until ESC [ 2 0 1 ~ is content.
    fn parse_paste(&self, start: usize) -> Parsed {
        const TERMINATOR: &[u8] = b"\x1b[201~";
        let rest = &self.buf[start..];
        match rest.windows(TERMINATOR.len()).position(|w| w == TERMINATOR) {
            Some(pos) => {
                let content = String::from_utf8_lossy(&rest[..pos]).into_owned();
                Parsed::Ev(Event::Paste(content), start + pos + TERMINATOR.len())
            }
            None => Parsed::Need,
        }
    }

    /// SGR mouse: ESC [ < Cb ; Cx ; Cy (M = press/motion, m = release).
    fn parse_sgr_mouse(&self) -> Parsed {
        let mut end = 3;
        while end < self.buf.len() && self.buf[end] != b'M' && self.buf[end] != b'm' {
            end += 1;
        }
        if end >= self.buf.len() {
            return Parsed::Need;
        }

        let release = self.buf[end] == b'm';
        let consumed = end + 1;
        let params: Vec<u16> = self.buf[3..end]
            .split(|&b| b == b';')
            .map(|p| {
                std::str::from_utf8(p)
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(0)
            })
            .collect();
        if params.len() != 3 {
            return Parsed::Drop(consumed);
        }
        let (cb, cx, cy) = (params[0], params[1], params[2]);

        let mut modifiers = Modifiers::empty();
        if cb & 4 != 0 {
            modifiers |= Modifiers::SHIFT;
        }
        if cb & 8 != 0 {
            modifiers |= Modifiers::ALT;
        }
        if cb & 16 != 0 {
            modifiers |= Modifiers::CTRL;
        }

        let (button, action) = if cb & 64 != 0 {
            let action = if cb & 1 == 0 {
                MouseAction::ScrollUp
            } else {
                MouseAction::ScrollDown
            };
            (None, action)
        } else {
            let button = match cb & 3 {
                0 => Some(MouseButton::Left),
                1 => Some(MouseButton::Middle),
                2 => Some(MouseButton::Right),
                _ => None,
            };
            let action = if cb & 32 != 0 {
                MouseAction::Moved
            } else if release {
                MouseAction::Release
            } else {
                MouseAction::Press
            };
            (button, action)
        };

        Parsed::Ev(
            Event::Mouse(MouseEvent {
                x: cx.saturating_sub(1),
                y: cy.saturating_sub(1),
                button,
                action,
                modifiers,
            }),
            consumed,
        )
    }
}

/// Encode a typed event back into the byte sequence that produces it.
///
/// The inverse of parsing, used to prove round-trip fidelity and to
/// synthesize input in tests. Returns `None` for events with no byte
/// representation (ticks, resizes).
pub fn encode_event(event: &Event) -> Option<Vec<u8>> {
    match event {
        Event::Key(key) => encode_key(key),
        Event::Mouse(m) => {
            let mut cb: u16 = match m.action {
                MouseAction::ScrollUp => 64,
                MouseAction::ScrollDown => 65,
                _ => match m.button {
                    Some(MouseButton::Left) | None => 0,
                    Some(MouseButton::Middle) => 1,
                    Some(MouseButton::Right) => 2,
                },
            };
            if m.action == MouseAction::Moved {
                cb |= 32;
            }
            if m.modifiers.contains(Modifiers::SHIFT) {
                cb |= 4;
            }
            if m.modifiers.contains(Modifiers::ALT) {
                cb |= 8;
            }
            if m.modifiers.contains(Modifiers::CTRL) {
                cb |= 16;
            }
            let tail = if m.action == MouseAction::Release { 'm' } else { 'M' };
            Some(format!("\x1b[<{};{};{}{}", cb, m.x + 1, m.y + 1, tail).into_bytes())
        }
        Event::Paste(content) => {
            let mut out = b"\x1b[200~".to_vec();
            out.extend_from_slice(content.as_bytes());
            out.extend_from_slice(b"\x1b[201~");
            Some(out)
        }
        Event::FocusGained => Some(b"\x1b[I".to_vec()),
        Event::FocusLost => Some(b"\x1b[O".to_vec()),
        Event::Resize { .. } | Event::Tick(_) => None,
    }
}

fn encode_key(key: &KeyEvent) -> Option<Vec<u8>> {
    let mods = key.modifiers;
    match key.code {
        KeyCode::Char(c) => {
            if mods.contains(Modifiers::CTRL) && c.is_ascii_lowercase() {
                Some(vec![c as u8 - 0x60])
            } else if mods.contains(Modifiers::ALT) && c.is_ascii() {
                Some(vec![0x1b, c as u8])
            } else if mods.is_empty() || mods == Modifiers::SHIFT {
                let mut buf = [0u8; 4];
                Some(c.encode_utf8(&mut buf).as_bytes().to_vec())
            } else {
                None
            }
        }
        KeyCode::Escape => Some(vec![0x1b]),
        KeyCode::Tab => Some(vec![0x09]),
        KeyCode::BackTab => Some(b"\x1b[Z".to_vec()),
        KeyCode::Enter => Some(vec![0x0d]),
        KeyCode::Backspace => Some(vec![0x7f]),
        KeyCode::Null => Some(vec![0x00]),
        KeyCode::Up => Some(csi_arrow(b'A', mods)),
        KeyCode::Down => Some(csi_arrow(b'B', mods)),
        KeyCode::Right => Some(csi_arrow(b'C', mods)),
        KeyCode::Left => Some(csi_arrow(b'D', mods)),
        KeyCode::Home => Some(csi_arrow(b'H', mods)),
        KeyCode::End => Some(csi_arrow(b'F', mods)),
        KeyCode::Insert => Some(b"\x1b[2~".to_vec()),
        KeyCode::Delete => Some(b"\x1b[3~".to_vec()),
        KeyCode::PageUp => Some(b"\x1b[5~".to_vec()),
        KeyCode::PageDown => Some(b"\x1b[6~".to_vec()),
        KeyCode::F(n @ 1..=4) => Some(vec![0x1b, b'O', b'P' + n - 1]),
        KeyCode::F(n @ 5..=12) => {
            let param = match n {
                5 => 15,
                6..=10 => n as u16 + 11,
                _ => n as u16 + 12,
            };
            Some(format!("\x1b[{param}~").into_bytes())
        }
        KeyCode::F(_) => None,
    }
}

fn csi_arrow(final_byte: u8, mods: Modifiers) -> Vec<u8> {
    if mods.is_empty() {
        vec![0x1b, b'[', final_byte]
    } else {
        let mut param = 1u16;
        if mods.contains(Modifiers::SHIFT) {
            param += 1;
        }
        if mods.contains(Modifiers::ALT) {
            param += 2;
        }
        if mods.contains(Modifiers::CTRL) {
            param += 4;
        }
        if mods.contains(Modifiers::SUPER) {
            param += 8;
        }
        format!("\x1b[1;{param}{}", final_byte as char).into_bytes()
    }
}

/// Decode a CSI modifier parameter ("1;5A" style).
fn csi_modifiers(param: Option<u16>) -> Modifiers {
    let Some(p) = param else {
        return Modifiers::empty();
    };
    let bits = p.saturating_sub(1);
    let mut mods = Modifiers::empty();
    if bits & 1 != 0 {
        mods |= Modifiers::SHIFT;
    }
    if bits & 2 != 0 {
        mods |= Modifiers::ALT;
    }
    if bits & 4 != 0 {
        mods |= Modifiers::CTRL;
    }
    if bits & 8 != 0 {
        mods |= Modifiers::SUPER;
    }
    mods
}

fn tilde_key(param: u16) -> Option<KeyCode> {
    Some(match param {
        1 | 7 => KeyCode::Home,
        2 => KeyCode::Insert,
        3 => KeyCode::Delete,
        4 | 8 => KeyCode::End,
        5 => KeyCode::PageUp,
        6 => KeyCode::PageDown,
        11..=15 => KeyCode::F((param - 10) as u8),
        17..=21 => KeyCode::F((param - 11) as u8),
        23 | 24 => KeyCode::F((param - 12) as u8),
        _ => return None,
    })
}

fn key_ev(code: KeyCode, modifiers: Modifiers, consumed: usize) -> Parsed {
    Parsed::Ev(Event::Key(KeyEvent { code, modifiers }), consumed)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Feed then flush, the way the reader resolves a quiet line.
    fn decode_all(parser: &mut InputParser, bytes: &[u8]) -> Vec<Event> {
        let mut events = parser.feed(bytes);
        events.extend(parser.flush());
        events
    }

    #[test]
    fn test_printable_rune() {
        let mut p = InputParser::new();
        let events = p.feed(b"q");
        assert_eq!(
            events,
            vec![Event::Key(KeyEvent::plain(KeyCode::Char('q')))]
        );
        assert!(!p.has_pending());
    }

    #[test]
    fn test_ctrl_c() {
        let mut p = InputParser::new();
        let events = p.feed(&[0x03]);
        assert_eq!(
            events,
            vec![Event::Key(KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: Modifiers::CTRL,
            })]
        );
    }

    #[test]
    fn test_arrow_keys() {
        let mut p = InputParser::new();
        let events = p.feed(b"\x1b[A\x1b[B\x1b[C\x1b[D");
        let codes: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                Event::Key(k) => Some(k.code),
                _ => None,
            })
            .collect();
        assert_eq!(
            codes,
            vec![KeyCode::Up, KeyCode::Down, KeyCode::Right, KeyCode::Left]
        );
    }

    #[test]
    fn test_csi_modifier_param() {
        let mut p = InputParser::new();
        let events = p.feed(b"\x1b[1;5A");
        assert_eq!(
            events,
            vec![Event::Key(KeyEvent {
                code: KeyCode::Up,
                modifiers: Modifiers::CTRL,
            })]
        );
    }

    #[test]
    fn test_lone_escape_via_flush() {
        let mut p = InputParser::new();
        assert!(p.feed(&[0x1b]).is_empty());
        assert!(p.has_pending());
        let events = p.flush();
        assert_eq!(events, vec![Event::Key(KeyEvent::plain(KeyCode::Escape))]);
        assert!(!p.has_pending());
    }

    #[test]
    fn test_alt_char() {
        let mut p = InputParser::new();
        let events = p.feed(b"\x1bx");
        assert_eq!(
            events,
            vec![Event::Key(KeyEvent {
                code: KeyCode::Char('x'),
                modifiers: Modifiers::ALT,
            })]
        );
    }

    #[test]
    fn test_sequence_split_across_chunks() {
        let mut p = InputParser::new();
        assert!(p.feed(b"\x1b[").is_empty());
        let events = p.feed(b"A");
        assert_eq!(events, vec![Event::Key(KeyEvent::plain(KeyCode::Up))]);
    }

    #[test]
    fn test_unrecognized_sequence_dropped() {
        let mut p = InputParser::new();
        // CSI with an unknown final byte, followed by a normal key.
        let events = p.feed(b"\x1b[9999yq");
        assert_eq!(
            events,
            vec![Event::Key(KeyEvent::plain(KeyCode::Char('q')))]
        );
        assert!(!p.has_pending());
    }

    #[test]
    fn test_utf8_rune() {
        let mut p = InputParser::new();
        let events = p.feed("é".as_bytes());
        assert_eq!(
            events,
            vec![Event::Key(KeyEvent::plain(KeyCode::Char('é')))]
        );
    }

    #[test]
    fn test_utf8_split_across_chunks() {
        let bytes = "日".as_bytes();
        let mut p = InputParser::new();
        assert!(p.feed(&bytes[..1]).is_empty());
        let events = p.feed(&bytes[1..]);
        assert_eq!(
            events,
            vec![Event::Key(KeyEvent::plain(KeyCode::Char('日')))]
        );
    }

    #[test]
    fn test_sgr_mouse_press_release() {
        let mut p = InputParser::new();
        let events = p.feed(b"\x1b[<0;10;5M\x1b[<0;10;5m");
        assert_eq!(
            events,
            vec![
                Event::Mouse(MouseEvent {
                    x: 9,
                    y: 4,
                    button: Some(MouseButton::Left),
                    action: MouseAction::Press,
                    modifiers: Modifiers::empty(),
                }),
                Event::Mouse(MouseEvent {
                    x: 9,
                    y: 4,
                    button: Some(MouseButton::Left),
                    action: MouseAction::Release,
                    modifiers: Modifiers::empty(),
                }),
            ]
        );
    }

    #[test]
    fn test_sgr_mouse_scroll() {
        let mut p = InputParser::new();
        let events = p.feed(b"\x1b[<64;3;4M");
        assert_eq!(
            events,
            vec![Event::Mouse(MouseEvent {
                x: 2,
                y: 3,
                button: None,
                action: MouseAction::ScrollUp,
                modifiers: Modifiers::empty(),
            })]
        );
    }

    #[test]
    fn test_bracketed_paste() {
        let mut p = InputParser::new();
        let events = p.feed(b"\x1b[200~hello\x1b[201~");
        assert_eq!(events, vec![Event::Paste("hello".to_string())]);
    }

    #[test]
    fn test_focus_reporting() {
        let mut p = InputParser::new();
        let events = p.feed(b"\x1b[I\x1b[O");
        assert_eq!(events, vec![Event::FocusGained, Event::FocusLost]);
    }

    #[test]
    fn test_round_trip_fixed_set() {
        let fixed: Vec<Event> = vec![
            Event::Key(KeyEvent::plain(KeyCode::Escape)),
            Event::Key(KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: Modifiers::CTRL,
            }),
            Event::Key(KeyEvent::plain(KeyCode::Up)),
            Event::Key(KeyEvent::plain(KeyCode::Enter)),
            Event::Key(KeyEvent::plain(KeyCode::Tab)),
            Event::Key(KeyEvent::plain(KeyCode::Char('q'))),
        ];
        for event in fixed {
            let bytes = encode_event(&event).expect("fixed set must encode");
            let mut p = InputParser::new();
            let decoded = decode_all(&mut p, &bytes);
            assert_eq!(decoded, vec![event], "bytes {bytes:?}");
            assert!(!p.has_pending(), "residual bytes after {bytes:?}");
        }
    }

    #[test]
    fn test_round_trip_mouse() {
        let event = Event::Mouse(MouseEvent {
            x: 12,
            y: 7,
            button: Some(MouseButton::Left),
            action: MouseAction::Press,
            modifiers: Modifiers::empty(),
        });
        let bytes = encode_event(&event).unwrap();
        let mut p = InputParser::new();
        assert_eq!(decode_all(&mut p, &bytes), vec![event]);
    }
}
