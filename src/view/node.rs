//! View nodes: the immutable per-frame description of the interface.
//!
//! Applications rebuild the whole tree from state on every frame; nodes
//! value-own their children and are never mutated after construction.
//! Fluent modifiers consume the node and return a new one.

use super::canvas::RenderContext;
use crate::buffer::{Attrs, Color, Style};
use crate::layout::Axis;
use crate::runtime::Cmd;
use bitflags::bitflags;

/// A formatted text leaf.
pub struct TextNode {
    /// The text content. May contain newlines; wraps when width-constrained.
    pub content: String,
    /// Style applied to every glyph.
    pub style: Style,
    /// Fixed width override.
    pub fixed_width: Option<u16>,
}

/// An ordered sequence of children along one axis.
pub struct StackNode<A> {
    /// The main axis children flow along.
    pub axis: Axis,
    /// Cells of space between adjacent children.
    pub gap: u16,
    /// Children in paint and focus order.
    pub children: Vec<ViewNode<A>>,
    /// Fixed width override.
    pub fixed_width: Option<u16>,
    /// Fixed height override.
    pub fixed_height: Option<u16>,
}

/// Flexible empty space inside a stack.
pub struct SpacerNode {
    /// Minimum main-axis extent.
    pub min: u16,
    /// Share of leftover space relative to sibling spacers.
    pub weight: u16,
}

bitflags! {
    /// Which edges of a border are drawn.
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Edges: u8 {
        /// Top edge.
        const TOP = 0b0001;
        /// Bottom edge.
        const BOTTOM = 0b0010;
        /// Left edge.
        const LEFT = 0b0100;
        /// Right edge.
        const RIGHT = 0b1000;
        /// All four edges.
        const ALL = 0b1111;
        /// Top and bottom only.
        const HORIZONTAL = 0b0011;
    }
}

impl std::fmt::Debug for Edges {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

/// The glyph set a border is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderStyle {
    /// Single light lines.
    #[default]
    Plain,
    /// Rounded corners.
    Rounded,
    /// Double lines.
    Double,
    /// Heavy lines.
    Thick,
}

/// The glyphs one border style draws with.
#[derive(Debug, Clone, Copy)]
pub struct BorderGlyphs {
    /// Top-left corner.
    pub top_left: char,
    /// Top-right corner.
    pub top_right: char,
    /// Bottom-left corner.
    pub bottom_left: char,
    /// Bottom-right corner.
    pub bottom_right: char,
    /// Horizontal line.
    pub horizontal: char,
    /// Vertical line.
    pub vertical: char,
}

impl BorderStyle {
    /// The glyph set for this style.
    pub const fn glyphs(self) -> BorderGlyphs {
        match self {
            Self::Plain => BorderGlyphs {
                top_left: '┌',
                top_right: '┐',
                bottom_left: '└',
                bottom_right: '┘',
                horizontal: '─',
                vertical: '│',
            },
            Self::Rounded => BorderGlyphs {
                top_left: '╭',
                top_right: '╮',
                bottom_left: '╰',
                bottom_right: '╯',
                horizontal: '─',
                vertical: '│',
            },
            Self::Double => BorderGlyphs {
                top_left: '╔',
                top_right: '╗',
                bottom_left: '╚',
                bottom_right: '╝',
                horizontal: '═',
                vertical: '║',
            },
            Self::Thick => BorderGlyphs {
                top_left: '┏',
                top_right: '┓',
                bottom_left: '┗',
                bottom_right: '┛',
                horizontal: '━',
                vertical: '┃',
            },
        }
    }
}

/// A border drawn around a single child.
pub struct BorderNode<A> {
    /// Glyph set.
    pub style: BorderStyle,
    /// Which edges are present. Each present edge insets the child by one cell.
    pub edges: Edges,
    /// Style the border lines are drawn with.
    pub line_style: Style,
    /// The wrapped child.
    pub child: Box<ViewNode<A>>,
}

/// Per-edge insets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Insets {
    /// Rows above.
    pub top: u16,
    /// Columns to the right.
    pub right: u16,
    /// Rows below.
    pub bottom: u16,
    /// Columns to the left.
    pub left: u16,
}

impl Insets {
    /// Uniform insets on all edges.
    pub const fn uniform(n: u16) -> Self {
        Self { top: n, right: n, bottom: n, left: n }
    }

    /// Total horizontal inset.
    pub const fn horizontal(&self) -> u16 {
        self.left.saturating_add(self.right)
    }

    /// Total vertical inset.
    pub const fn vertical(&self) -> u16 {
        self.top.saturating_add(self.bottom)
    }
}

/// Empty space around a single child.
pub struct PaddingNode<A> {
    /// The insets applied before arranging the child.
    pub insets: Insets,
    /// The wrapped child.
    pub child: Box<ViewNode<A>>,
}

/// The shape of an input cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorShape {
    /// Full-cell block.
    #[default]
    Block,
    /// Vertical bar.
    Bar,
    /// Underline.
    Underline,
}

/// Cursor presentation for an input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorStyle {
    /// Cursor shape.
    pub shape: CursorShape,
    /// Cursor color.
    pub color: Color,
    /// Whether the cursor blinks with the animation clock.
    pub blink: bool,
}

impl Default for CursorStyle {
    fn default() -> Self {
        Self {
            shape: CursorShape::Block,
            color: Color::Default,
            blink: true,
        }
    }
}

/// A single-line editable text field bound to application state.
///
/// The displayed value is a snapshot the view function echoes from state;
/// edits flow back through the on-change effect, keyed by the stable `id`.
pub struct InputNode<A> {
    /// Stable identity used for focus tracking and editing state.
    pub id: &'static str,
    /// Current value snapshot.
    pub value: String,
    /// Placeholder shown dimmed while the value is empty.
    pub placeholder: String,
    /// Text style.
    pub style: Style,
    /// Cursor presentation.
    pub cursor: CursorStyle,
    /// Fixed width override.
    pub fixed_width: Option<u16>,
    /// Effect applied with the edited value after a consumed keystroke.
    pub on_change: Option<Box<dyn Fn(String) -> Cmd<A>>>,
}

/// A click target with a text label.
pub struct ClickableNode<A> {
    /// The label text.
    pub label: String,
    /// Label style.
    pub style: Style,
    /// Effect produced when the node is clicked or activated.
    pub on_click: Box<dyn Fn() -> Cmd<A>>,
}

/// A branch chosen by a predicate; the unchosen side contributes nothing.
pub struct ConditionalNode<A> {
    /// The predicate value, evaluated by the view function.
    pub when: bool,
    /// Branch used when the predicate holds.
    pub then: Box<ViewNode<A>>,
    /// Branch used otherwise.
    pub otherwise: Box<ViewNode<A>>,
}

/// A region painted by application code through a [`RenderContext`].
pub struct CanvasNode {
    /// Fixed width override; fills available width when absent.
    pub fixed_width: Option<u16>,
    /// Fixed height override; fills available height when absent.
    pub fixed_height: Option<u16>,
    /// The draw callback, invoked once per render cycle.
    #[allow(clippy::type_complexity)]
    pub draw: Box<dyn Fn(&mut RenderContext<'_>)>,
}

/// One node of the view tree.
///
/// A closed set of variants; layout, paint, and dispatch all match
/// exhaustively so a new kind of node cannot be silently ignored.
pub enum ViewNode<A> {
    /// A text leaf.
    Text(TextNode),
    /// An axis-ordered sequence of children.
    Stack(StackNode<A>),
    /// Flexible empty space.
    Spacer(SpacerNode),
    /// A border around one child.
    Border(BorderNode<A>),
    /// Insets around one child.
    Padding(PaddingNode<A>),
    /// An editable text field.
    Input(InputNode<A>),
    /// A click target.
    Clickable(ClickableNode<A>),
    /// A predicate-chosen branch.
    Conditional(ConditionalNode<A>),
    /// An application-painted region.
    Canvas(CanvasNode),
}

// ---------------------------------------------------------------------------
// Constructors
// ---------------------------------------------------------------------------

/// A text leaf with the default style.
pub fn text<A>(content: impl Into<String>) -> ViewNode<A> {
    ViewNode::Text(TextNode {
        content: content.into(),
        style: Style::DEFAULT,
        fixed_width: None,
    })
}

/// A horizontal stack of children.
pub fn hstack<A>(children: Vec<ViewNode<A>>) -> ViewNode<A> {
    stack(Axis::Horizontal, children)
}

/// A vertical stack of children.
pub fn vstack<A>(children: Vec<ViewNode<A>>) -> ViewNode<A> {
    stack(Axis::Vertical, children)
}

fn stack<A>(axis: Axis, children: Vec<ViewNode<A>>) -> ViewNode<A> {
    ViewNode::Stack(StackNode {
        axis,
        gap: 0,
        children,
        fixed_width: None,
        fixed_height: None,
    })
}

/// Flexible space that absorbs leftover extent inside a stack.
pub fn spacer<A>() -> ViewNode<A> {
    ViewNode::Spacer(SpacerNode { min: 0, weight: 1 })
}

/// An editable text field.
///
/// `id` is the stable identity; `value` is the state snapshot to display.
pub fn input<A>(id: &'static str, value: impl Into<String>) -> ViewNode<A> {
    ViewNode::Input(InputNode {
        id,
        value: value.into(),
        placeholder: String::new(),
        style: Style::DEFAULT,
        cursor: CursorStyle::default(),
        fixed_width: None,
        on_change: None,
    })
}

/// A click target producing the given command.
pub fn clickable<A>(
    label: impl Into<String>,
    on_click: impl Fn() -> Cmd<A> + 'static,
) -> ViewNode<A> {
    ViewNode::Clickable(ClickableNode {
        label: label.into(),
        style: Style::DEFAULT,
        on_click: Box::new(on_click),
    })
}

/// One of two branches chosen by a predicate.
pub fn when<A>(cond: bool, then: ViewNode<A>, otherwise: ViewNode<A>) -> ViewNode<A> {
    ViewNode::Conditional(ConditionalNode {
        when: cond,
        then: Box::new(then),
        otherwise: Box::new(otherwise),
    })
}

/// A region painted directly by the given callback.
pub fn canvas<A>(draw: impl Fn(&mut RenderContext<'_>) + 'static) -> ViewNode<A> {
    ViewNode::Canvas(CanvasNode {
        fixed_width: None,
        fixed_height: None,
        draw: Box::new(draw),
    })
}

// ---------------------------------------------------------------------------
// Fluent modifiers
// ---------------------------------------------------------------------------

impl<A> ViewNode<A> {
    /// Resolve conditionals to the chosen branch.
    pub(crate) fn resolved(&self) -> &Self {
        let mut node = self;
        while let Self::Conditional(c) = node {
            node = if c.when { c.then.as_ref() } else { c.otherwise.as_ref() };
        }
        node
    }

    fn map_style(mut self, f: impl FnOnce(Style) -> Style) -> Self {
        match &mut self {
            Self::Text(n) => n.style = f(n.style),
            Self::Input(n) => n.style = f(n.style),
            Self::Clickable(n) => n.style = f(n.style),
            Self::Border(n) => n.line_style = f(n.line_style),
            _ => {}
        }
        self
    }

    /// Draw this node's text in bold.
    #[must_use]
    pub fn bold(self) -> Self {
        self.map_style(|s| s.with_attrs(Attrs::BOLD))
    }

    /// Draw this node's text dimmed.
    #[must_use]
    pub fn dim(self) -> Self {
        self.map_style(|s| s.with_attrs(Attrs::DIM))
    }

    /// Underline this node's text.
    #[must_use]
    pub fn underline(self) -> Self {
        self.map_style(|s| s.with_attrs(Attrs::UNDERLINE))
    }

    /// Blink this node's text.
    #[must_use]
    pub fn blink(self) -> Self {
        self.map_style(|s| s.with_attrs(Attrs::BLINK))
    }

    /// Set the foreground color.
    #[must_use]
    pub fn fg(self, color: Color) -> Self {
        self.map_style(|s| s.with_fg(color))
    }

    /// Set the background color.
    #[must_use]
    pub fn bg(self, color: Color) -> Self {
        self.map_style(|s| s.with_bg(color))
    }

    /// Wrap this node in a border on all edges.
    #[must_use]
    pub fn bordered(self, style: BorderStyle) -> Self {
        self.bordered_edges(style, Edges::ALL)
    }

    /// Wrap this node in a border on the given edges.
    #[must_use]
    pub fn bordered_edges(self, style: BorderStyle, edges: Edges) -> Self {
        Self::Border(BorderNode {
            style,
            edges,
            line_style: Style::DEFAULT,
            child: Box::new(self),
        })
    }

    /// Wrap this node in uniform padding.
    #[must_use]
    pub fn padding(self, n: u16) -> Self {
        self.padding_insets(Insets::uniform(n))
    }

    /// Wrap this node in per-edge padding.
    #[must_use]
    pub fn padding_insets(self, insets: Insets) -> Self {
        Self::Padding(PaddingNode {
            insets,
            child: Box::new(self),
        })
    }

    /// Set the space between stack children. No effect on other nodes.
    #[must_use]
    pub fn gap(mut self, gap: u16) -> Self {
        if let Self::Stack(n) = &mut self {
            n.gap = gap;
        }
        self
    }

    /// Fix this node's width.
    #[must_use]
    pub fn width(mut self, width: u16) -> Self {
        match &mut self {
            Self::Text(n) => n.fixed_width = Some(width),
            Self::Stack(n) => n.fixed_width = Some(width),
            Self::Input(n) => n.fixed_width = Some(width),
            Self::Canvas(n) => n.fixed_width = Some(width),
            _ => {}
        }
        self
    }

    /// Fix this node's height.
    #[must_use]
    pub fn height(mut self, height: u16) -> Self {
        match &mut self {
            Self::Stack(n) => n.fixed_height = Some(height),
            Self::Canvas(n) => n.fixed_height = Some(height),
            _ => {}
        }
        self
    }

    /// Set an input's placeholder text. No effect on other nodes.
    #[must_use]
    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        if let Self::Input(n) = &mut self {
            n.placeholder = text.into();
        }
        self
    }

    /// Set an input's cursor shape.
    #[must_use]
    pub fn cursor_shape(mut self, shape: CursorShape) -> Self {
        if let Self::Input(n) = &mut self {
            n.cursor.shape = shape;
        }
        self
    }

    /// Set an input's cursor color.
    #[must_use]
    pub fn cursor_color(mut self, color: Color) -> Self {
        if let Self::Input(n) = &mut self {
            n.cursor.color = color;
        }
        self
    }

    /// Enable or disable cursor blinking.
    #[must_use]
    pub fn cursor_blink(mut self, blink: bool) -> Self {
        if let Self::Input(n) = &mut self {
            n.cursor.blink = blink;
        }
        self
    }

    /// Set an input's on-change effect.
    #[must_use]
    pub fn on_change(mut self, f: impl Fn(String) -> Cmd<A> + 'static) -> Self {
        if let Self::Input(n) = &mut self {
            n.on_change = Some(Box::new(f));
        }
        self
    }

    /// Set a spacer's minimum extent. No effect on other nodes.
    #[must_use]
    pub fn min_extent(mut self, min: u16) -> Self {
        if let Self::Spacer(n) = &mut self {
            n.min = min;
        }
        self
    }

    /// Set a spacer's share of leftover space. No effect on other nodes.
    #[must_use]
    pub fn weight(mut self, weight: u16) -> Self {
        if let Self::Spacer(n) = &mut self {
            n.weight = weight.max(1);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Nil;

    #[test]
    fn test_text_modifiers() {
        let node: ViewNode<Nil> = text("hi").bold().fg(Color::RED);
        match node {
            ViewNode::Text(t) => {
                assert!(t.style.attrs.contains(Attrs::BOLD));
                assert_eq!(t.style.fg, Color::RED);
            }
            _ => panic!("expected text node"),
        }
    }

    #[test]
    fn test_bordered_wraps() {
        let node: ViewNode<Nil> = text("hi").bordered(BorderStyle::Rounded);
        match node {
            ViewNode::Border(b) => {
                assert_eq!(b.edges, Edges::ALL);
                assert!(matches!(*b.child, ViewNode::Text(_)));
            }
            _ => panic!("expected border node"),
        }
    }

    #[test]
    fn test_conditional_resolves() {
        let node: ViewNode<Nil> = when(false, text("a"), text("b"));
        match node.resolved() {
            ViewNode::Text(t) => assert_eq!(t.content, "b"),
            _ => panic!("expected text node"),
        }
    }

    #[test]
    fn test_gap_applies_to_stack_only() {
        let node: ViewNode<Nil> = hstack(vec![]).gap(3);
        match node {
            ViewNode::Stack(s) => assert_eq!(s.gap, 3),
            _ => panic!("expected stack node"),
        }
        // Modifier on a non-stack is a no-op, not an error.
        let _: ViewNode<Nil> = text("x").gap(3);
    }
}
