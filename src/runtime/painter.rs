//! Painter: walks the positioned tree and writes cells.
//!
//! Paint receives the view tree and its layout in lockstep, fills the
//! current frame buffer, and rebuilds the focus index in structural
//! order. Canvas regions get a clipped [`RenderContext`] carrying the
//! global frame counter.

use super::focus::{FocusIndex, FocusKey, Interactive};
use crate::buffer::{Attrs, Cell, Color, FrameBuffer, Style};
use crate::layout::{wrap_lines, Layout};
use crate::view::{CursorShape, Edges, InputNode, RenderContext, ViewNode};
use std::collections::HashMap;

/// Frames per blink phase of an input cursor.
const BLINK_PERIOD: u64 = 30;

/// Read-only inputs to one paint pass.
pub(crate) struct PaintContext<'a> {
    /// The monotonic frame counter for this cycle.
    pub frame: u64,
    /// The currently focused node, if any.
    pub focused: Option<&'a FocusKey>,
    /// Editing cursors (char index) keyed by input binding.
    pub input_cursors: &'a HashMap<&'static str, usize>,
}

/// Paint a laid-out tree into the buffer, rebuilding the focus index.
pub(crate) fn paint<A>(
    node: &ViewNode<A>,
    layout: &Layout,
    ctx: &PaintContext<'_>,
    buffer: &mut FrameBuffer,
    focus: &mut FocusIndex,
) {
    focus.clear();
    let mut ordinal = 0u32;
    paint_node(node, layout, ctx, buffer, focus, &mut ordinal);
}

fn paint_node<A>(
    node: &ViewNode<A>,
    layout: &Layout,
    ctx: &PaintContext<'_>,
    buffer: &mut FrameBuffer,
    focus: &mut FocusIndex,
    ordinal: &mut u32,
) {
    let node = node.resolved();
    let rect = layout.rect;
    match node {
        ViewNode::Text(t) => {
            let lines = wrap_lines(&t.content, rect.width);
            for (i, line) in lines.iter().take(rect.height as usize).enumerate() {
                buffer.set_text(rect.x, rect.y + i as u16, line, t.style, rect.right());
            }
        }
        ViewNode::Stack(st) => {
            for (child, child_layout) in st.children.iter().zip(&layout.children) {
                paint_node(child, child_layout, ctx, buffer, focus, ordinal);
            }
        }
        ViewNode::Spacer(_) => {}
        ViewNode::Border(b) => {
            paint_border(buffer, layout, b.style, b.edges, b.line_style);
            if let Some(child_layout) = layout.children.first() {
                paint_node(&b.child, child_layout, ctx, buffer, focus, ordinal);
            }
        }
        ViewNode::Padding(p) => {
            if let Some(child_layout) = layout.children.first() {
                paint_node(&p.child, child_layout, ctx, buffer, focus, ordinal);
            }
        }
        ViewNode::Input(i) => {
            let key = FocusKey::Binding(i.id);
            focus.push(key.clone(), rect, Interactive::Input);
            if rect.is_empty() {
                return;
            }
            paint_input(buffer, layout, i, ctx.focused == Some(&key), ctx);
        }
        ViewNode::Clickable(c) => {
            let key = FocusKey::Ordinal(*ordinal);
            *ordinal += 1;
            focus.push(key.clone(), rect, Interactive::Clickable);
            let style = if ctx.focused == Some(&key) {
                c.style.with_attrs(Attrs::REVERSED)
            } else {
                c.style
            };
            buffer.set_text(rect.x, rect.y, &c.label, style, rect.right());
        }
        ViewNode::Canvas(c) => {
            let mut render_ctx = RenderContext::new(rect, ctx.frame, buffer);
            (c.draw)(&mut render_ctx);
        }
        // resolved() never returns a conditional
        ViewNode::Conditional(_) => {}
    }
}

fn paint_border(
    buffer: &mut FrameBuffer,
    layout: &Layout,
    style: crate::view::BorderStyle,
    edges: Edges,
    line_style: Style,
) {
    let r = layout.rect;
    if r.is_empty() {
        return;
    }
    let g = style.glyphs();
    let right = r.right() - 1;
    let bottom = r.bottom() - 1;

    if edges.contains(Edges::TOP) {
        for x in r.x..r.right() {
            buffer.set(x, r.y, Cell::styled(g.horizontal, line_style));
        }
    }
    if edges.contains(Edges::BOTTOM) && r.height > 1 {
        for x in r.x..r.right() {
            buffer.set(x, bottom, Cell::styled(g.horizontal, line_style));
        }
    }
    if edges.contains(Edges::LEFT) {
        for y in r.y..r.bottom() {
            buffer.set(r.x, y, Cell::styled(g.vertical, line_style));
        }
    }
    if edges.contains(Edges::RIGHT) && r.width > 1 {
        for y in r.y..r.bottom() {
            buffer.set(right, y, Cell::styled(g.vertical, line_style));
        }
    }

    // Corners overwrite the meeting edges.
    if edges.contains(Edges::TOP) && edges.contains(Edges::LEFT) {
        buffer.set(r.x, r.y, Cell::styled(g.top_left, line_style));
    }
    if edges.contains(Edges::TOP) && edges.contains(Edges::RIGHT) {
        buffer.set(right, r.y, Cell::styled(g.top_right, line_style));
    }
    if edges.contains(Edges::BOTTOM) && edges.contains(Edges::LEFT) {
        buffer.set(r.x, bottom, Cell::styled(g.bottom_left, line_style));
    }
    if edges.contains(Edges::BOTTOM) && edges.contains(Edges::RIGHT) {
        buffer.set(right, bottom, Cell::styled(g.bottom_right, line_style));
    }
}

fn paint_input<A>(
    buffer: &mut FrameBuffer,
    layout: &Layout,
    node: &InputNode<A>,
    is_focused: bool,
    ctx: &PaintContext<'_>,
) {
    let rect = layout.rect;
    buffer.fill_rect(rect.x, rect.y, rect.width, rect.height, Cell::styled(' ', node.style));

    if node.value.is_empty() && !node.placeholder.is_empty() {
        let style = node.style.with_attrs(Attrs::DIM);
        buffer.set_text(rect.x, rect.y, &node.placeholder, style, rect.right());
    } else {
        buffer.set_text(rect.x, rect.y, &node.value, node.style, rect.right());
    }

    if !is_focused {
        return;
    }
    let blink_hidden = node.cursor.blink && (ctx.frame / BLINK_PERIOD) % 2 == 1;
    if blink_hidden || rect.width == 0 {
        return;
    }

    let char_index = ctx
        .input_cursors
        .get(node.id)
        .copied()
        .unwrap_or_else(|| node.value.chars().count());
    let col: u16 = node
        .value
        .chars()
        .take(char_index)
        .map(|c| unicode_width::UnicodeWidthChar::width(c).unwrap_or(0) as u16)
        .sum();
    let cx = rect.x + col.min(rect.width - 1);

    let mut cell = buffer.get(cx, rect.y).copied().unwrap_or(Cell::EMPTY);
    match node.cursor.shape {
        CursorShape::Block => {
            if node.cursor.color == Color::Default {
                cell.style.attrs |= Attrs::REVERSED;
            } else {
                cell.style.bg = node.cursor.color;
            }
        }
        CursorShape::Underline => {
            cell.style.attrs |= Attrs::UNDERLINE;
            if node.cursor.color != Color::Default {
                cell.style.fg = node.cursor.color;
            }
        }
        CursorShape::Bar => {
            cell = Cell::styled('│', node.style.with_fg(node.cursor.color));
        }
    }
    buffer.set(cx, rect.y, cell);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{solve, Rect};
    use crate::runtime::Cmd;
    use crate::view::{clickable, hstack, input, text, vstack, BorderStyle};

    struct Nil;

    fn paint_view(view: &ViewNode<Nil>, width: u16, height: u16) -> (FrameBuffer, FocusIndex) {
        let layout = solve(view, Rect::from_size(width, height));
        let mut buffer = FrameBuffer::new(width, height);
        let mut focus = FocusIndex::new();
        let cursors = HashMap::new();
        let ctx = PaintContext { frame: 0, focused: None, input_cursors: &cursors };
        paint(view, &layout, &ctx, &mut buffer, &mut focus);
        (buffer, focus)
    }

    #[test]
    fn test_paint_text() {
        let view: ViewNode<Nil> = text("hello");
        let (buffer, _) = paint_view(&view, 10, 2);
        assert_eq!(buffer.row_text(0), "hello");
    }

    #[test]
    fn test_paint_wrapped_text() {
        let view: ViewNode<Nil> = text("abcdef").width(3);
        let (buffer, _) = paint_view(&view, 10, 3);
        assert_eq!(buffer.row_text(0), "abc");
        assert_eq!(buffer.row_text(1), "def");
    }

    #[test]
    fn test_paint_border() {
        let view: ViewNode<Nil> = text("ab").bordered(BorderStyle::Plain);
        let (buffer, _) = paint_view(&view, 4, 3);
        assert_eq!(buffer.row_text(0), "┌──┐");
        assert_eq!(buffer.row_text(1), "│ab│");
        assert_eq!(buffer.row_text(2), "└──┘");
    }

    #[test]
    fn test_paint_horizontal_border_only() {
        let view: ViewNode<Nil> =
            text("ab").bordered_edges(BorderStyle::Plain, Edges::HORIZONTAL);
        let (buffer, _) = paint_view(&view, 2, 3);
        assert_eq!(buffer.row_text(0), "──");
        assert_eq!(buffer.row_text(1), "ab");
        assert_eq!(buffer.row_text(2), "──");
    }

    #[test]
    fn test_paint_stack_with_gap() {
        let view: ViewNode<Nil> = hstack(vec![text("ab"), text("cd")]).gap(2);
        let (buffer, _) = paint_view(&view, 10, 1);
        assert_eq!(buffer.row_text(0), "ab  cd");
    }

    #[test]
    fn test_focus_entries_in_structural_order() {
        let view: ViewNode<Nil> = vstack(vec![
            clickable("first", || Cmd::Quit),
            input("name", "x"),
            clickable("second", || Cmd::Quit),
        ]);
        let (_, focus) = paint_view(&view, 20, 5);
        let keys: Vec<_> = focus.entries().iter().map(|e| e.key.clone()).collect();
        assert_eq!(
            keys,
            vec![
                FocusKey::Ordinal(0),
                FocusKey::Binding("name"),
                FocusKey::Ordinal(1),
            ]
        );
    }

    #[test]
    fn test_input_placeholder_dimmed() {
        let view: ViewNode<Nil> = input("q", "").placeholder("type here");
        let (buffer, _) = paint_view(&view, 20, 1);
        assert_eq!(buffer.row_text(0), "type here");
        assert!(buffer.get(0, 0).unwrap().style.attrs.contains(Attrs::DIM));
    }

    #[test]
    fn test_focused_input_cursor_cell() {
        let view: ViewNode<Nil> = input("q", "ab").cursor_blink(false);
        let layout = solve(&view, Rect::from_size(20, 1));
        let mut buffer = FrameBuffer::new(20, 1);
        let mut focus = FocusIndex::new();
        let cursors = HashMap::new();
        let focused = FocusKey::Binding("q");
        let ctx = PaintContext { frame: 0, focused: Some(&focused), input_cursors: &cursors };
        paint(&view, &layout, &ctx, &mut buffer, &mut focus);
        // Cursor sits after the text, drawn reversed.
        assert!(buffer.get(2, 0).unwrap().style.attrs.contains(Attrs::REVERSED));
    }
}
