//! # Weft
//!
//! A declarative terminal UI runtime with diff-based rendering.
//!
//! Applications describe their interface as an immutable tree of view nodes,
//! rebuilt from current state on every frame. The runtime measures and
//! arranges the tree, paints it into a cell buffer, diffs against the
//! previous frame, and flushes a minimal byte stream to the terminal.
//!
//! ## Core Concepts
//!
//! - **Declarative views**: `view()` is a pure function of application state
//! - **Double-buffered rendering**: previous and current buffers with minimal diff
//! - **Deferred effects**: event handlers return commands, executed after dispatch
//! - **Single consumer loop**: input, ticks, and resizes merge into one ordered queue
//!
//! ## Example
//!
//! ```rust,ignore
//! use weft::{run, text, vstack, App, Cmd, Event, KeyCode, RunConfig, ViewNode};
//!
//! struct Hello;
//!
//! impl App for Hello {
//!     fn view(&self) -> ViewNode<Self> {
//!         vstack(vec![text("Hello, terminal!").bold()])
//!     }
//!
//!     fn update(&mut self, event: Event) -> Vec<Cmd<Self>> {
//!         match event {
//!             Event::Key(key) if key.code == KeyCode::Char('q') => vec![Cmd::Quit],
//!             _ => Vec::new(),
//!         }
//!     }
//! }
//!
//! run(Hello, RunConfig::default())?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod buffer;
pub mod input;
pub mod layout;
pub mod runtime;
pub mod terminal;
pub mod view;

// Re-exports for convenience
pub use buffer::{Attrs, Cell, Color, FrameBuffer, Style};
pub use input::{Event, KeyCode, KeyEvent, Modifiers, MouseAction, MouseButton, MouseEvent};
pub use layout::{Axis, Layout, Rect, Size, SizeConstraint};
pub use runtime::{run, App, Cmd, Notifier, RenderStats, RunConfig, Runtime};
pub use view::{
    canvas, clickable, hstack, input, spacer, text, vstack, when, BorderStyle, CursorShape,
    Insets, RenderContext, ViewNode,
};
