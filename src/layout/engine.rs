//! Layout engine: measure and arrange passes over the view tree.
//!
//! *Measure* walks bottom-up computing intrinsic extents; *arrange* walks
//! top-down assigning positioned boxes. Leftover main-axis space in a
//! stack goes to spacer children by weight; over-demand shrinks every
//! child proportionally instead of failing. Zero available space yields
//! zero-size boxes, never an error.
//!
//! Inter-child gap is inserted between adjacent non-spacer children; a
//! spacer is itself spacing and never has gap next to it.

use super::rect::{Axis, Rect, Size};
use crate::view::ViewNode;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// A per-axis sizing constraint derived from node kind and modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeConstraint {
    /// Minimum extent.
    pub min: u16,
    /// Maximum extent.
    pub max: u16,
    /// Exact extent override, still clamped to `[min, max]`.
    pub fixed: Option<u16>,
}

impl SizeConstraint {
    /// No constraint.
    pub const fn unbounded() -> Self {
        Self { min: 0, max: u16::MAX, fixed: None }
    }

    /// An exact-extent constraint.
    pub const fn exact(n: u16) -> Self {
        Self { min: 0, max: u16::MAX, fixed: Some(n) }
    }

    /// Resolve a natural extent against this constraint.
    pub fn resolve(&self, natural: u16) -> u16 {
        self.fixed.unwrap_or(natural).clamp(self.min, self.max)
    }
}

impl Default for SizeConstraint {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// The positioned box tree for one frame.
///
/// Mirrors the view tree (with conditionals resolved) and lives only
/// until the next frame is laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// The box assigned to this node.
    pub rect: Rect,
    /// Boxes of the node's children, in structural order.
    pub children: Vec<Layout>,
}

impl Layout {
    /// A zero-size leaf layout.
    pub const fn leaf(rect: Rect) -> Self {
        Self { rect, children: Vec::new() }
    }
}

/// Lay out a view tree within a viewport.
pub fn solve<A>(node: &ViewNode<A>, viewport: Rect) -> Layout {
    arrange(node, viewport)
}

/// The width constraint a node's modifiers impose.
fn width_constraint<A>(node: &ViewNode<A>) -> SizeConstraint {
    let fixed = match node {
        ViewNode::Text(n) => n.fixed_width,
        ViewNode::Stack(n) => n.fixed_width,
        ViewNode::Input(n) => n.fixed_width,
        ViewNode::Canvas(n) => n.fixed_width,
        _ => None,
    };
    fixed.map_or_else(SizeConstraint::unbounded, SizeConstraint::exact)
}

/// The height constraint a node's modifiers impose.
fn height_constraint<A>(node: &ViewNode<A>) -> SizeConstraint {
    let fixed = match node {
        ViewNode::Stack(n) => n.fixed_height,
        ViewNode::Canvas(n) => n.fixed_height,
        _ => None,
    };
    fixed.map_or_else(SizeConstraint::unbounded, SizeConstraint::exact)
}

/// Display width of a string in terminal columns.
pub(crate) fn text_width(s: &str) -> u16 {
    UnicodeWidthStr::width(s).min(u16::MAX as usize) as u16
}

/// Greedy-wrap text at grapheme boundaries.
///
/// Logical lines (split on `\n`) wrap independently. A zero-width limit
/// produces no lines at all.
pub(crate) fn wrap_lines(text: &str, max_width: u16) -> Vec<String> {
    if max_width == 0 {
        return Vec::new();
    }
    let mut lines = Vec::new();
    for logical in text.split('\n') {
        let mut line = String::new();
        let mut width = 0u16;
        for grapheme in logical.graphemes(true) {
            let gw = text_width(grapheme);
            if gw == 0 {
                line.push_str(grapheme);
                continue;
            }
            if width + gw > max_width {
                lines.push(std::mem::take(&mut line));
                width = 0;
            }
            line.push_str(grapheme);
            width += gw;
        }
        lines.push(line);
    }
    lines
}

/// Measure a node's intrinsic extent given available space.
///
/// Widths respect the available extent (text wraps); heights report the
/// natural demand and are reconciled by `arrange`.
pub(crate) fn measure<A>(node: &ViewNode<A>, avail: Size) -> Size {
    let node = node.resolved();
    match node {
        ViewNode::Text(t) => {
            let limit = width_constraint(node).resolve(avail.width).min(avail.width);
            let lines = wrap_lines(&t.content, limit);
            let natural = lines.iter().map(|l| text_width(l)).max().unwrap_or(0);
            Size::new(
                width_constraint(node).resolve(natural).min(avail.width),
                lines.len().min(u16::MAX as usize) as u16,
            )
        }
        ViewNode::Stack(st) => {
            let mut main = 0u32;
            let mut cross = 0u16;
            let mut prev_spacer = true;
            for child in &st.children {
                let child = child.resolved();
                let is_spacer = matches!(child, ViewNode::Spacer(_));
                if !is_spacer && !prev_spacer {
                    main += u32::from(st.gap);
                }
                let sz = if let ViewNode::Spacer(s) = child {
                    match st.axis {
                        Axis::Horizontal => Size::new(s.min, 0),
                        Axis::Vertical => Size::new(0, s.min),
                    }
                } else {
                    measure(child, avail)
                };
                main += u32::from(sz.main(st.axis));
                cross = cross.max(sz.cross(st.axis));
                prev_spacer = is_spacer;
            }
            let main = main.min(u32::from(u16::MAX)) as u16;
            let (w, h) = match st.axis {
                Axis::Horizontal => (main, cross),
                Axis::Vertical => (cross, main),
            };
            Size::new(
                width_constraint(node).resolve(w).min(avail.width),
                height_constraint(node).resolve(h),
            )
        }
        ViewNode::Spacer(s) => Size::new(s.min.min(avail.width), s.min.min(avail.height)),
        ViewNode::Border(b) => {
            let insets = border_insets(b.edges);
            let inner = Size::new(
                avail.width.saturating_sub(insets.0),
                avail.height.saturating_sub(insets.1),
            );
            let child = measure(&b.child, inner);
            Size::new(
                child.width.saturating_add(insets.0).min(avail.width),
                child.height.saturating_add(insets.1),
            )
        }
        ViewNode::Padding(p) => {
            let inner = Size::new(
                avail.width.saturating_sub(p.insets.horizontal()),
                avail.height.saturating_sub(p.insets.vertical()),
            );
            let child = measure(&p.child, inner);
            Size::new(
                child.width.saturating_add(p.insets.horizontal()).min(avail.width),
                child.height.saturating_add(p.insets.vertical()),
            )
        }
        ViewNode::Input(i) => {
            let natural = text_width(&i.value)
                .saturating_add(1) // trailing cursor column
                .max(text_width(&i.placeholder))
                .max(1);
            Size::new(width_constraint(node).resolve(natural).min(avail.width), 1)
        }
        ViewNode::Clickable(c) => Size::new(text_width(&c.label).min(avail.width), 1),
        ViewNode::Canvas(_) => Size::new(
            width_constraint(node).resolve(avail.width).min(avail.width),
            height_constraint(node).resolve(avail.height).min(avail.height),
        ),
        // resolved() never returns a conditional
        ViewNode::Conditional(_) => Size::ZERO,
    }
}

/// The (horizontal, vertical) cell thickness of a border's edges.
fn border_insets(edges: crate::view::Edges) -> (u16, u16) {
    use crate::view::Edges;
    let h = u16::from(edges.contains(Edges::LEFT)) + u16::from(edges.contains(Edges::RIGHT));
    let v = u16::from(edges.contains(Edges::TOP)) + u16::from(edges.contains(Edges::BOTTOM));
    (h, v)
}

/// Arrange a node within an assigned box, producing the positioned tree.
pub(crate) fn arrange<A>(node: &ViewNode<A>, rect: Rect) -> Layout {
    let node = node.resolved();
    match node {
        ViewNode::Stack(st) => arrange_stack(st, rect),
        ViewNode::Border(b) => {
            use crate::view::Edges;
            let mut inner = rect;
            if b.edges.contains(Edges::LEFT) {
                inner.x = inner.x.saturating_add(1);
                inner.width = inner.width.saturating_sub(1);
            }
            if b.edges.contains(Edges::RIGHT) {
                inner.width = inner.width.saturating_sub(1);
            }
            if b.edges.contains(Edges::TOP) {
                inner.y = inner.y.saturating_add(1);
                inner.height = inner.height.saturating_sub(1);
            }
            if b.edges.contains(Edges::BOTTOM) {
                inner.height = inner.height.saturating_sub(1);
            }
            Layout { rect, children: vec![arrange(&b.child, inner)] }
        }
        ViewNode::Padding(p) => {
            let inner = Rect::new(
                rect.x.saturating_add(p.insets.left),
                rect.y.saturating_add(p.insets.top),
                rect.width.saturating_sub(p.insets.horizontal()),
                rect.height.saturating_sub(p.insets.vertical()),
            );
            Layout { rect, children: vec![arrange(&p.child, inner)] }
        }
        ViewNode::Text(_) | ViewNode::Input(_) | ViewNode::Clickable(_) => {
            let m = measure(node, rect.size());
            Layout::leaf(Rect::new(
                rect.x,
                rect.y,
                m.width.min(rect.width),
                m.height.min(rect.height),
            ))
        }
        ViewNode::Spacer(_) | ViewNode::Canvas(_) => Layout::leaf(rect),
        ViewNode::Conditional(_) => Layout::leaf(Rect::ZERO),
    }
}

struct Slot {
    main: u16,
    cross: u16,
    flex: u16,
    gap_before: bool,
}

fn arrange_stack<A>(st: &crate::view::StackNode<A>, rect: Rect) -> Layout {
    let axis = st.axis;
    let inner = rect;

    // Collect natural extents; gap only between adjacent non-spacer children.
    let mut slots: Vec<Slot> = Vec::with_capacity(st.children.len());
    let mut prev_spacer = true;
    for child in &st.children {
        let child = child.resolved();
        if let ViewNode::Spacer(s) = child {
            slots.push(Slot { main: s.min, cross: 0, flex: s.weight.max(1), gap_before: false });
            prev_spacer = true;
        } else {
            let sz = measure(child, inner.size());
            slots.push(Slot {
                main: sz.main(axis),
                cross: sz.cross(axis),
                flex: 0,
                gap_before: !prev_spacer && !slots.is_empty(),
            });
            prev_spacer = false;
        }
    }

    let gap_total: u32 = slots.iter().filter(|s| s.gap_before).count() as u32 * u32::from(st.gap);
    let avail_main = u32::from(inner.size().main(axis)).saturating_sub(gap_total);
    let total_min: u32 = slots.iter().map(|s| u32::from(s.main)).sum();

    if total_min <= avail_main {
        // Distribute leftover among spacers by weight, exact to the cell.
        let leftover = avail_main - total_min;
        let weights: u32 = slots.iter().map(|s| u32::from(s.flex)).sum();
        if weights > 0 && leftover > 0 {
            let mut acc = 0u32;
            let mut given = 0u32;
            for slot in &mut slots {
                if slot.flex == 0 {
                    continue;
                }
                acc += u32::from(slot.flex);
                let end = leftover * acc / weights;
                slot.main = slot.main.saturating_add((end - given) as u16);
                given = end;
            }
        }
    } else if total_min > 0 {
        // Over-demand: shrink every child proportionally, exact to the cell.
        let mut acc = 0u32;
        let mut placed = 0u32;
        for slot in &mut slots {
            acc += u32::from(slot.main);
            let end = acc * avail_main / total_min;
            slot.main = (end - placed) as u16;
            placed = end;
        }
    }

    // Place sequentially along the main axis.
    let mut children = Vec::with_capacity(st.children.len());
    let mut pos = match axis {
        Axis::Horizontal => inner.x,
        Axis::Vertical => inner.y,
    };
    for (child, slot) in st.children.iter().zip(&slots) {
        if slot.gap_before {
            pos = pos.saturating_add(st.gap);
        }
        let child_rect = match axis {
            Axis::Horizontal => {
                Rect::new(pos, inner.y, slot.main, slot.cross.min(inner.height))
            }
            Axis::Vertical => Rect::new(inner.x, pos, slot.cross.min(inner.width), slot.main),
        };
        let child_rect = if matches!(child.resolved(), ViewNode::Spacer(_)) {
            // A spacer's box is pure extent along the main axis.
            match axis {
                Axis::Horizontal => Rect::new(pos, inner.y, slot.main, 0),
                Axis::Vertical => Rect::new(inner.x, pos, 0, slot.main),
            }
        } else {
            child_rect.intersection(&inner)
        };
        children.push(arrange(child, child_rect));
        pos = pos.saturating_add(slot.main);
    }

    Layout { rect, children }
}
