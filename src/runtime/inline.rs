//! Inline live region: a bounded area repainted above the shell prompt.
//!
//! Instead of the alternate screen, inline mode owns the last N rows of
//! the normal buffer. Rows reposition with relative cursor movement, so
//! the region rides the scrollback naturally. Only changed rows rewrite;
//! a separate append-only print pushes lines into the scrollback above
//! the region, exempt from diffing.

use crate::buffer::{diff, FrameBuffer, Style};
use crate::terminal::OutputBuffer;
use std::io;

/// Writer for the inline live region.
///
/// Tracks the region's current height; the cursor parks at the region's
/// bottom-left between repaints.
pub(crate) struct InlineWriter {
    out: OutputBuffer,
    height: u16,
}

impl InlineWriter {
    pub fn new() -> Self {
        Self {
            out: OutputBuffer::new(),
            height: 0,
        }
    }

    /// The region height after the last repaint.
    #[cfg(test)]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Repaint the region, rewriting only changed rows.
    ///
    /// Returns the number of bytes flushed.
    pub fn repaint(
        &mut self,
        prev: &FrameBuffer,
        cur: &FrameBuffer,
        mut force: bool,
    ) -> io::Result<usize> {
        let target = cur.height();
        let width = cur.width() as usize;
        self.out.clear();
        self.out.reset_attrs();
        let mut style: Option<Style> = None;
        let mut row: u16; // cursor row within the region

        if target > self.height {
            // Grow: emit newlines so the terminal scrolls room in.
            for _ in self.height..target {
                self.out.write_raw(b"\n");
            }
            row = target.saturating_sub(1);
            force = true;
        } else if target < self.height {
            // Shrink: wipe the old region and repaint from its new top.
            self.out.cursor_up(self.height - 1);
            self.out.carriage_return();
            self.out.erase_down();
            row = 0;
            force = true;
        } else {
            row = self.height.saturating_sub(1);
        }
        self.height = target;

        if target == 0 {
            let written = self.out.len();
            self.out.flush_stdout()?;
            return Ok(written);
        }

        let same_dims = prev.width() == cur.width() && prev.height() == cur.height();
        for y in 0..target {
            let cur_row = &cur.cells()[y as usize * width..(y as usize + 1) * width];
            if !force && same_dims {
                let prev_row = &prev.cells()[y as usize * width..(y as usize + 1) * width];
                if prev_row == cur_row {
                    continue;
                }
            }
            if y < row {
                self.out.cursor_up(row - y);
            } else if y > row {
                self.out.cursor_down(y - row);
            }
            row = y;
            self.out.carriage_return();
            self.out.erase_line();
            diff::emit_row(self.out.bytes_mut(), cur_row, &mut style);
            self.out.carriage_return();
        }

        // Park at the bottom-left of the region.
        self.out.cursor_down(target - 1 - row);
        self.out.carriage_return();
        self.out.reset_attrs();

        let written = self.out.len();
        self.out.flush_stdout()?;
        Ok(written)
    }

    /// Append lines to the scrollback above the region.
    ///
    /// The region is wiped and its height reset; the caller must follow
    /// with a forced repaint to redraw it below the printed lines.
    pub fn print_above(&mut self, text: &str) -> io::Result<()> {
        self.out.clear();
        if self.height > 0 {
            self.out.cursor_up(self.height - 1);
            self.out.carriage_return();
            self.out.erase_down();
        }
        for line in text.split('\n') {
            self.out.write_str(line);
            self.out.write_raw(b"\r\n");
        }
        self.height = 0;
        self.out.flush_stdout()
    }

    /// Leave the final frame in place and move the shell prompt below it.
    pub fn release(&mut self) -> io::Result<()> {
        self.out.clear();
        self.out.reset_attrs();
        self.out.carriage_return();
        self.out.write_raw(b"\n");
        self.out.flush_stdout()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // flush_stdout writes to the real stdout, so tests only exercise the
    // height bookkeeping driven by buffer dimensions.

    #[test]
    fn test_height_tracks_buffer() {
        let mut writer = InlineWriter::new();
        assert_eq!(writer.height(), 0);
        let prev = FrameBuffer::new(10, 3);
        let cur = FrameBuffer::new(10, 3);
        writer.repaint(&prev, &cur, true).unwrap();
        assert_eq!(writer.height(), 3);
    }

    #[test]
    fn test_print_above_resets_height() {
        let mut writer = InlineWriter::new();
        let prev = FrameBuffer::new(10, 2);
        let cur = FrameBuffer::new(10, 2);
        writer.repaint(&prev, &cur, true).unwrap();
        writer.print_above("logged").unwrap();
        assert_eq!(writer.height(), 0);
    }
}
