//! Input module: from raw bytes to typed events.
//!
//! Three producer threads feed the runtime's single ordered queue:
//!
//! - **Stdin reader**: blocks on `stdin.read()`, decodes escape sequences
//! - **Ticker**: emits fixed-rate tick events when an animation rate is set
//! - **Resize watcher**: publishes terminal size changes
//!
//! ```text
//! ┌──────────────┐
//! │ Stdin Reader │ ──┐
//! └──────────────┘   │   ordered queue   ┌──────────────┐
//! ┌──────────────┐   ├─────────────────▶ │  Main Loop   │
//! │    Ticker    │ ──┤                   └──────────────┘
//! └──────────────┘   │
//! ┌──────────────┐   │
//! │Resize Watcher│ ──┘
//! └──────────────┘
//! ```
//!
//! Events dispatch strictly in queue-arrival order; ticks and input are
//! never reordered relative to each other.

mod events;
mod parser;
mod reader;
mod resize;
mod ticker;

pub use events::{
    Event, EventSink, KeyCode, KeyEvent, Modifiers, MouseAction, MouseButton, MouseEvent,
};
pub use parser::{encode_event, InputParser};
pub use reader::StdinReader;
pub use resize::ResizeWatcher;
pub use ticker::Ticker;
