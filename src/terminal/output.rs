//! `OutputBuffer`: single-syscall output buffer for terminal sequences.

use crate::buffer::Color;
use std::io::{self, Write};

/// Pre-allocated buffer for building terminal control sequences.
///
/// All output for one frame accumulates here and flushes in a single
/// `write()` syscall to prevent flickering.
pub struct OutputBuffer {
    data: Vec<u8>,
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputBuffer {
    /// Create a new output buffer with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Create a buffer sized for a typical terminal (4KB).
    pub fn new() -> Self {
        Self::with_capacity(4096)
    }

    /// Clear the buffer for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Get the buffer contents.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Get a mutable reference to the underlying bytes.
    #[inline]
    pub fn bytes_mut(&mut self) -> &mut Vec<u8> {
        &mut self.data
    }

    /// Get the buffer length.
    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the buffer is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Write raw bytes.
    #[inline]
    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Write a string.
    #[inline]
    pub fn write_str(&mut self, s: &str) {
        self.data.extend_from_slice(s.as_bytes());
    }

    /// Move cursor to an absolute (x, y) position (0-indexed).
    #[inline]
    pub fn cursor_move(&mut self, x: u16, y: u16) {
        let _ = write!(self.data, "\x1b[{};{}H", y + 1, x + 1);
    }

    /// Move cursor up `n` rows.
    #[inline]
    pub fn cursor_up(&mut self, n: u16) {
        if n > 0 {
            let _ = write!(self.data, "\x1b[{n}A");
        }
    }

    /// Move cursor down `n` rows.
    #[inline]
    pub fn cursor_down(&mut self, n: u16) {
        if n > 0 {
            let _ = write!(self.data, "\x1b[{n}B");
        }
    }

    /// Move cursor to column 0 of the current row.
    #[inline]
    pub fn carriage_return(&mut self) {
        self.data.push(b'\r');
    }

    /// Hide the cursor.
    #[inline]
    pub fn cursor_hide(&mut self) {
        self.data.extend_from_slice(b"\x1b[?25l");
    }

    /// Show the cursor.
    #[inline]
    pub fn cursor_show(&mut self) {
        self.data.extend_from_slice(b"\x1b[?25h");
    }

    /// Erase the current line.
    #[inline]
    pub fn erase_line(&mut self) {
        self.data.extend_from_slice(b"\x1b[2K");
    }

    /// Erase from the cursor to the end of the screen.
    #[inline]
    pub fn erase_down(&mut self) {
        self.data.extend_from_slice(b"\x1b[J");
    }

    /// Set the foreground color.
    #[inline]
    pub fn set_fg(&mut self, color: Color) {
        match color {
            Color::Default => self.data.extend_from_slice(b"\x1b[39m"),
            Color::Named(n) => {
                let _ = write!(self.data, "\x1b[38;5;{n}m");
            }
            Color::Rgb(r, g, b) => {
                let _ = write!(self.data, "\x1b[38;2;{r};{g};{b}m");
            }
        }
    }

    /// Set the background color.
    #[inline]
    pub fn set_bg(&mut self, color: Color) {
        match color {
            Color::Default => self.data.extend_from_slice(b"\x1b[49m"),
            Color::Named(n) => {
                let _ = write!(self.data, "\x1b[48;5;{n}m");
            }
            Color::Rgb(r, g, b) => {
                let _ = write!(self.data, "\x1b[48;2;{r};{g};{b}m");
            }
        }
    }

    /// Reset all attributes.
    #[inline]
    pub fn reset_attrs(&mut self) {
        self.data.extend_from_slice(b"\x1b[0m");
    }

    /// Flush the buffer to stdout in one write, then clear it.
    pub fn flush_stdout(&mut self) -> io::Result<()> {
        if self.data.is_empty() {
            return Ok(());
        }
        let mut stdout = io::stdout().lock();
        stdout.write_all(&self.data)?;
        stdout.flush()?;
        self.data.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_move_is_one_indexed() {
        let mut out = OutputBuffer::new();
        out.cursor_move(0, 0);
        assert_eq!(out.as_bytes(), b"\x1b[1;1H");
    }

    #[test]
    fn test_cursor_up_zero_is_noop() {
        let mut out = OutputBuffer::new();
        out.cursor_up(0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_color_sequences() {
        let mut out = OutputBuffer::new();
        out.set_fg(Color::Named(15));
        out.set_bg(Color::Rgb(0, 0, 0));
        out.set_fg(Color::Default);
        assert_eq!(
            out.as_bytes(),
            b"\x1b[38;5;15m\x1b[48;2;0;0;0m\x1b[39m"
        );
    }
}
