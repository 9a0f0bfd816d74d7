//! Layout module: from view tree to positioned boxes.
//!
//! Layout runs twice per frame: a bottom-up *measure* pass computing
//! intrinsic extents, then a top-down *arrange* pass assigning each node
//! its box for the frame. Boxes are ephemeral; nothing is retained
//! between frames.

mod engine;
mod rect;

pub(crate) use engine::{measure, wrap_lines};
pub use engine::{solve, Layout, SizeConstraint};
pub use rect::{Axis, Rect, Size};
