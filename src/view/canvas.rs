//! `RenderContext`: the escape hatch for direct cell drawing.
//!
//! A canvas node's draw callback receives a context bound to the node's
//! layout box and the global frame counter. Writes outside the box are
//! clipped silently. The context is only valid for the duration of one
//! paint call; coordinates are local to the region.

use crate::buffer::{Cell, FrameBuffer, Style};
use crate::layout::Rect;

/// Transient handle for painting one canvas region.
pub struct RenderContext<'a> {
    area: Rect,
    frame: u64,
    buffer: &'a mut FrameBuffer,
}

impl<'a> RenderContext<'a> {
    pub(crate) fn new(area: Rect, frame: u64, buffer: &'a mut FrameBuffer) -> Self {
        Self { area, frame, buffer }
    }

    /// Width of the region in columns.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.area.width
    }

    /// Height of the region in rows.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.area.height
    }

    /// The monotonic frame counter, advancing once per render cycle.
    ///
    /// Deterministic under injected tick sequences; use it instead of
    /// wall-clock time for animation.
    #[inline]
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    /// Write one glyph at region-local coordinates.
    ///
    /// Out-of-region writes are dropped.
    pub fn set(&mut self, x: u16, y: u16, glyph: char, style: Style) {
        if x >= self.area.width || y >= self.area.height {
            return;
        }
        self.buffer
            .set(self.area.x + x, self.area.y + y, Cell::styled(glyph, style));
    }

    /// Write a text run at region-local coordinates, clipped to the region.
    pub fn print(&mut self, x: u16, y: u16, text: &str, style: Style) {
        if x >= self.area.width || y >= self.area.height {
            return;
        }
        self.buffer.set_text(
            self.area.x + x,
            self.area.y + y,
            text,
            style,
            self.area.right(),
        );
    }

    /// Fill the whole region with a glyph.
    pub fn fill(&mut self, glyph: char, style: Style) {
        self.buffer.fill_rect(
            self.area.x,
            self.area.y,
            self.area.width,
            self.area.height,
            Cell::styled(glyph, style),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Color;

    #[test]
    fn test_context_local_coords() {
        let mut buffer = FrameBuffer::new(10, 10);
        let mut ctx = RenderContext::new(Rect::new(2, 3, 4, 4), 0, &mut buffer);
        ctx.set(0, 0, 'X', Style::DEFAULT);
        drop(ctx);
        assert_eq!(buffer.get(2, 3).unwrap().glyph, 'X');
    }

    #[test]
    fn test_context_clips_silently() {
        let mut buffer = FrameBuffer::new(10, 10);
        let mut ctx = RenderContext::new(Rect::new(2, 3, 4, 4), 0, &mut buffer);
        ctx.set(4, 0, 'X', Style::DEFAULT); // one past the region edge
        ctx.set(0, 4, 'Y', Style::DEFAULT);
        drop(ctx);
        for y in 0..10 {
            for x in 0..10 {
                assert_eq!(buffer.get(x, y).unwrap().glyph, ' ');
            }
        }
    }

    #[test]
    fn test_context_print_clips_at_edge() {
        let mut buffer = FrameBuffer::new(10, 10);
        let mut ctx = RenderContext::new(Rect::new(6, 0, 4, 1), 7, &mut buffer);
        assert_eq!(ctx.frame(), 7);
        ctx.print(0, 0, "abcdef", Style::fg(Color::CYAN));
        drop(ctx);
        assert_eq!(buffer.get(9, 0).unwrap().glyph, 'd');
        // Nothing leaks past the region.
        assert_eq!(buffer.row_text(0), "      abcd");
    }
}
