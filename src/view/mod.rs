//! View module: the declarative description of the interface.
//!
//! A view is an immutable tree of [`ViewNode`]s, rebuilt from application
//! state on every frame by a pure function. Free constructors ([`text`],
//! [`hstack`], [`vstack`], [`spacer`], [`input`], [`clickable`], [`when`],
//! [`canvas`]) build nodes; fluent modifiers configure them.

mod canvas;
mod node;

pub use canvas::RenderContext;
pub use node::{
    canvas, clickable, hstack, input, spacer, text, vstack, when, BorderGlyphs, BorderNode,
    BorderStyle, CanvasNode, ClickableNode, ConditionalNode, CursorShape, CursorStyle, Edges,
    InputNode, Insets, PaddingNode, SpacerNode, StackNode, TextNode, ViewNode,
};
