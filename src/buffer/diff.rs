//! Diffing engine: generate minimal terminal update sequences.
//!
//! Compares the previous and current frame buffers cell by cell.
//! Contiguous runs of changed cells in a row coalesce into a single
//! positioned styled write; unchanged rows emit nothing. Emitted style
//! state is tracked across calls so runs with an unchanged style produce
//! no redundant SGR sequences.

use super::cell::{Attrs, Cell, Color, Style};
use super::frame::FrameBuffer;
use std::io::Write;

/// State tracker for the diff emitter.
///
/// Tracks the terminal's last known cursor position and emitted style to
/// minimize the number of escape sequences.
#[derive(Debug, Clone)]
pub struct DiffState {
    /// Last known cursor X position (0-indexed).
    cursor_x: u16,
    /// Last known cursor Y position (0-indexed).
    cursor_y: u16,
    /// Last emitted style, if known.
    style: Option<Style>,
}

impl Default for DiffState {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffState {
    /// Create a new diff state with unknown terminal state.
    pub const fn new() -> Self {
        Self {
            cursor_x: u16::MAX,
            cursor_y: u16::MAX,
            style: None,
        }
    }

    /// Reset the state (e.g., after a full screen repaint or raw output).
    pub fn reset(&mut self) {
        self.style = None;
        self.cursor_x = u16::MAX;
        self.cursor_y = u16::MAX;
    }
}

/// Result of a diff operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffResult {
    /// Number of cells that differed.
    pub cells_changed: usize,
    /// Number of coalesced runs emitted.
    pub runs: usize,
    /// Number of style change sequences emitted.
    pub style_changes: usize,
}

/// Render the difference between two buffers into a byte stream.
///
/// The buffers must have identical dimensions. Only changed cells are
/// written; a row with no changes contributes zero bytes.
pub fn render_diff(
    prev: &FrameBuffer,
    cur: &FrameBuffer,
    output: &mut Vec<u8>,
    state: &mut DiffState,
) -> DiffResult {
    debug_assert_eq!(prev.width(), cur.width());
    debug_assert_eq!(prev.height(), cur.height());

    let mut result = DiffResult::default();
    let width = cur.width();

    for y in 0..cur.height() {
        let mut x = 0u16;
        while x < width {
            let idx = (y as usize) * (width as usize) + (x as usize);
            let prev_cell = &prev.cells()[idx];
            let cur_cell = &cur.cells()[idx];

            if prev_cell == cur_cell || cur_cell.is_continuation() {
                x += 1;
                continue;
            }

            // Start of a changed run: position once, then stream cells
            // until the next unchanged cell. Skip the move when the
            // cursor already sits there from the previous run.
            if state.cursor_x != x || state.cursor_y != y {
                emit_cursor_move(output, x, y);
            }
            state.cursor_x = x;
            state.cursor_y = y;
            result.runs += 1;

            while x < width {
                let idx = (y as usize) * (width as usize) + (x as usize);
                let prev_cell = &prev.cells()[idx];
                let cur_cell = &cur.cells()[idx];

                if cur_cell.is_continuation() {
                    // Covered by the lead wide glyph.
                    x += 1;
                    continue;
                }
                if prev_cell == cur_cell {
                    break;
                }

                result.cells_changed += 1;
                if emit_style(output, cur_cell.style, &mut state.style) {
                    result.style_changes += 1;
                }
                emit_glyph(output, cur_cell);
                x += cur_cell.width.max(1) as u16;
                state.cursor_x = x;
            }
        }
    }

    result
}

/// Generate a full repaint sequence (no diffing).
///
/// Used for the initial frame and after a resize, when the previous
/// buffer no longer describes what is on screen.
pub fn render_full(cur: &FrameBuffer, output: &mut Vec<u8>, state: &mut DiffState) {
    state.reset();
    output.extend_from_slice(b"\x1b[H");

    let width = cur.width();
    for y in 0..cur.height() {
        if y > 0 {
            output.extend_from_slice(b"\r\n");
        }
        for x in 0..width {
            let idx = (y as usize) * (width as usize) + (x as usize);
            let cell = &cur.cells()[idx];
            if cell.is_continuation() {
                continue;
            }
            emit_style(output, cell.style, &mut state.style);
            emit_glyph(output, cell);
        }
    }

    output.extend_from_slice(b"\x1b[0m");
    state.style = None;
    state.cursor_x = u16::MAX;
    state.cursor_y = u16::MAX;
}

/// Emit the cells of one row with style tracking, no positioning.
///
/// Used by the inline live-region writer, which positions with relative
/// cursor movement instead of absolute addressing.
pub(crate) fn emit_row(output: &mut Vec<u8>, cells: &[Cell], style: &mut Option<Style>) {
    for cell in cells {
        if cell.is_continuation() {
            continue;
        }
        emit_style(output, cell.style, style);
        emit_glyph(output, cell);
    }
}

/// Emit a cursor move sequence, using the most compact representation.
#[inline]
fn emit_cursor_move(output: &mut Vec<u8>, x: u16, y: u16) {
    // ANSI positions are 1-indexed
    let row = y + 1;
    let col = x + 1;
    if row == 1 && col == 1 {
        output.extend_from_slice(b"\x1b[H");
    } else if col == 1 {
        let _ = write!(output, "\x1b[{row}H");
    } else {
        let _ = write!(output, "\x1b[{row};{col}H");
    }
}

/// Emit the SGR transition from `last` to `style`, updating `last`.
///
/// Removing an attribute requires a full reset, which also clears colors;
/// in that case everything is re-emitted.
pub(crate) fn emit_style(output: &mut Vec<u8>, style: Style, last: &mut Option<Style>) -> bool {
    match *last {
        Some(prev) if prev == style => false,
        Some(prev) if prev.attrs.difference(style.attrs).is_empty() => {
            // Only additions: emit deltas.
            if prev.fg != style.fg {
                emit_color(output, style.fg, true);
            }
            if prev.bg != style.bg {
                emit_color(output, style.bg, false);
            }
            emit_attrs(output, style.attrs.difference(prev.attrs));
            *last = Some(style);
            true
        }
        _ => {
            output.extend_from_slice(b"\x1b[0m");
            if style.fg != Color::Default {
                emit_color(output, style.fg, true);
            }
            if style.bg != Color::Default {
                emit_color(output, style.bg, false);
            }
            emit_attrs(output, style.attrs);
            *last = Some(style);
            true
        }
    }
}

/// Emit a foreground or background color sequence.
#[inline]
fn emit_color(output: &mut Vec<u8>, color: Color, foreground: bool) {
    match (color, foreground) {
        (Color::Default, true) => output.extend_from_slice(b"\x1b[39m"),
        (Color::Default, false) => output.extend_from_slice(b"\x1b[49m"),
        (Color::Named(n), true) => {
            let _ = write!(output, "\x1b[38;5;{n}m");
        }
        (Color::Named(n), false) => {
            let _ = write!(output, "\x1b[48;5;{n}m");
        }
        (Color::Rgb(r, g, b), true) => {
            let _ = write!(output, "\x1b[38;2;{r};{g};{b}m");
        }
        (Color::Rgb(r, g, b), false) => {
            let _ = write!(output, "\x1b[48;2;{r};{g};{b}m");
        }
    }
}

/// Emit SGR set sequences for a set of attributes.
fn emit_attrs(output: &mut Vec<u8>, attrs: Attrs) {
    if attrs.contains(Attrs::BOLD) {
        output.extend_from_slice(b"\x1b[1m");
    }
    if attrs.contains(Attrs::DIM) {
        output.extend_from_slice(b"\x1b[2m");
    }
    if attrs.contains(Attrs::UNDERLINE) {
        output.extend_from_slice(b"\x1b[4m");
    }
    if attrs.contains(Attrs::BLINK) {
        output.extend_from_slice(b"\x1b[5m");
    }
    if attrs.contains(Attrs::REVERSED) {
        output.extend_from_slice(b"\x1b[7m");
    }
}

/// Emit a glyph to the output buffer.
#[inline]
fn emit_glyph(output: &mut Vec<u8>, cell: &Cell) {
    let mut utf8 = [0u8; 4];
    output.extend_from_slice(cell.glyph.encode_utf8(&mut utf8).as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_identical_buffers() {
        let a = FrameBuffer::new(10, 5);
        let b = FrameBuffer::new(10, 5);
        let mut output = Vec::new();
        let mut state = DiffState::new();

        let result = render_diff(&a, &b, &mut output, &mut state);

        assert_eq!(result.cells_changed, 0);
        assert!(output.is_empty());
    }

    #[test]
    fn test_diff_single_cell_change() {
        let a = FrameBuffer::new(10, 5);
        let mut b = FrameBuffer::new(10, 5);
        b.set(5, 2, Cell::new('X'));

        let mut output = Vec::new();
        let mut state = DiffState::new();
        let result = render_diff(&a, &b, &mut output, &mut state);

        assert_eq!(result.cells_changed, 1);
        assert_eq!(result.runs, 1);
        assert!(String::from_utf8_lossy(&output).contains('X'));
    }

    #[test]
    fn test_diff_adjacent_cells_single_run() {
        let a = FrameBuffer::new(10, 5);
        let mut b = FrameBuffer::new(10, 5);
        b.set(0, 0, Cell::new('A'));
        b.set(1, 0, Cell::new('B'));
        b.set(2, 0, Cell::new('C'));

        let mut output = Vec::new();
        let mut state = DiffState::new();
        let result = render_diff(&a, &b, &mut output, &mut state);

        assert_eq!(result.cells_changed, 3);
        assert_eq!(result.runs, 1);
    }

    #[test]
    fn test_diff_split_runs() {
        let a = FrameBuffer::new(10, 1);
        let mut b = FrameBuffer::new(10, 1);
        b.set(0, 0, Cell::new('A'));
        b.set(5, 0, Cell::new('B'));

        let mut output = Vec::new();
        let mut state = DiffState::new();
        let result = render_diff(&a, &b, &mut output, &mut state);

        assert_eq!(result.runs, 2);
    }

    #[test]
    fn test_diff_output_independent_of_viewport() {
        // The same one-cell change on a small and a large viewport must
        // produce output of comparable size.
        let small_len = {
            let a = FrameBuffer::new(10, 4);
            let mut b = FrameBuffer::new(10, 4);
            b.set(1, 1, Cell::new('X'));
            let mut output = Vec::new();
            render_diff(&a, &b, &mut output, &mut DiffState::new());
            output.len()
        };
        let large_len = {
            let a = FrameBuffer::new(200, 60);
            let mut b = FrameBuffer::new(200, 60);
            b.set(1, 1, Cell::new('X'));
            let mut output = Vec::new();
            render_diff(&a, &b, &mut output, &mut DiffState::new());
            output.len()
        };
        assert_eq!(small_len, large_len);
    }

    #[test]
    fn test_diff_style_tracking() {
        let a = FrameBuffer::new(10, 1);
        let mut b = FrameBuffer::new(10, 1);
        let red = Style::fg(Color::RED);
        b.set(0, 0, Cell::styled('A', red));
        b.set(1, 0, Cell::styled('B', red));

        let mut output = Vec::new();
        let mut state = DiffState::new();
        let result = render_diff(&a, &b, &mut output, &mut state);

        // One style change covers the whole run.
        assert_eq!(result.style_changes, 1);
    }

    #[test]
    fn test_emit_style_attr_removal_resets() {
        let mut output = Vec::new();
        let mut last = Some(Style::DEFAULT.with_attrs(Attrs::BOLD));
        emit_style(&mut output, Style::DEFAULT, &mut last);
        assert!(output.starts_with(b"\x1b[0m"));
    }

    #[test]
    fn test_emit_color_variants() {
        let mut output = Vec::new();
        emit_color(&mut output, Color::Named(42), true);
        assert_eq!(output, b"\x1b[38;5;42m");
        output.clear();
        emit_color(&mut output, Color::Rgb(1, 2, 3), false);
        assert_eq!(output, b"\x1b[48;2;1;2;3m");
        output.clear();
        emit_color(&mut output, Color::Default, true);
        assert_eq!(output, b"\x1b[39m");
    }

    #[test]
    fn test_render_full() {
        let mut buffer = FrameBuffer::new(3, 2);
        buffer.set(0, 0, Cell::new('A'));
        buffer.set(1, 0, Cell::new('B'));

        let mut output = Vec::new();
        let mut state = DiffState::new();
        render_full(&buffer, &mut output, &mut state);

        let s = String::from_utf8_lossy(&output);
        assert!(s.starts_with("\x1b[H"));
        assert!(s.contains('A'));
        assert!(s.contains('B'));
        assert!(s.ends_with("\x1b[0m"));
    }

    #[test]
    fn test_diff_second_pass_emits_nothing() {
        let mut a = FrameBuffer::new(10, 5);
        let mut b = FrameBuffer::new(10, 5);
        b.set(3, 3, Cell::new('Z'));

        let mut state = DiffState::new();
        let mut output = Vec::new();
        render_diff(&a, &b, &mut output, &mut state);
        assert!(!output.is_empty());

        // Promote current to previous, repaint the identical frame.
        a.copy_from(&b);
        output.clear();
        let result = render_diff(&a, &b, &mut output, &mut state);
        assert_eq!(result.cells_changed, 0);
        assert!(output.is_empty());
    }
}
