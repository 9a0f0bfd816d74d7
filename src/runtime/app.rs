//! The application contract and deferred commands.
//!
//! An application supplies an optional initializer, a pure view function,
//! and an event handler returning commands. Commands execute strictly
//! after the handler call that produced them, never during it.

use crate::input::Event;
use crate::view::ViewNode;
use crossbeam_channel::Sender;

/// What the runtime drives.
///
/// `view` must be a pure function of `&self`: building the tree has no
/// observable side effect. State changes happen only in `update` and in
/// command effects, both of which get `&mut self`.
pub trait App: Sized + 'static {
    /// Commands to run before the first frame.
    fn init(&mut self) -> Vec<Cmd<Self>> {
        Vec::new()
    }

    /// Build the view tree for the current state.
    fn view(&self) -> ViewNode<Self>;

    /// Handle one event, returning deferred commands.
    fn update(&mut self, event: Event) -> Vec<Cmd<Self>>;
}

/// A deferred side effect returned from event handling.
pub enum Cmd<A> {
    /// Terminate the loop and restore the terminal.
    Quit,
    /// Run application logic after dispatch returns.
    ///
    /// The effect receives the application state and a [`Notifier`] for
    /// enqueueing follow-up work (possibly from a background thread).
    #[allow(clippy::type_complexity)]
    Custom(Box<dyn FnOnce(&mut A, &Notifier<A>)>),
}

impl<A> Cmd<A> {
    /// A custom effect with access to the notifier.
    pub fn custom(f: impl FnOnce(&mut A, &Notifier<A>) + 'static) -> Self {
        Self::Custom(Box::new(f))
    }

    /// A custom effect that only mutates application state.
    pub fn apply(f: impl FnOnce(&mut A) + 'static) -> Self {
        Self::custom(move |app, _| f(app))
    }
}

impl<A> std::fmt::Debug for Cmd<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Quit => write!(f, "Cmd::Quit"),
            Self::Custom(_) => write!(f, "Cmd::Custom(..)"),
        }
    }
}

/// A message on the runtime's ordered queue.
pub(crate) enum Envelope<A> {
    /// A typed event from a producer thread.
    Event(Event),
    /// A state mutation posted by a background effect.
    Apply(Box<dyn FnOnce(&mut A) + Send>),
    /// Append a line to the scrollback (inline mode only).
    Print(String),
    /// Terminate the loop.
    Shutdown,
}

/// Handle for pushing work into the runtime from outside the main loop.
///
/// Long-running effects run on their own threads and report back through
/// a notifier instead of blocking dispatch. Everything posted here joins
/// the same ordered queue as input and ticks.
pub struct Notifier<A> {
    tx: Sender<Envelope<A>>,
}

impl<A> Clone for Notifier<A> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone() }
    }
}

impl<A> Notifier<A> {
    pub(crate) const fn new(tx: Sender<Envelope<A>>) -> Self {
        Self { tx }
    }

    /// Queue a state mutation; it renders like any other event.
    ///
    /// Returns `false` when the runtime has shut down.
    pub fn apply(&self, f: impl FnOnce(&mut A) + Send + 'static) -> bool {
        self.tx.send(Envelope::Apply(Box::new(f))).is_ok()
    }

    /// Queue a typed event, as if it had arrived from the terminal.
    pub fn post(&self, event: Event) -> bool {
        self.tx.send(Envelope::Event(event)).is_ok()
    }

    /// Append a line above the live region (inline mode); no-op otherwise.
    pub fn print(&self, line: impl Into<String>) -> bool {
        self.tx.send(Envelope::Print(line.into())).is_ok()
    }

    /// Ask the runtime to shut down.
    pub fn quit(&self) -> bool {
        self.tx.send(Envelope::Shutdown).is_ok()
    }
}

/// Configuration for the runtime entry point.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunConfig {
    /// Enable mouse decoding and reporting.
    pub mouse_tracking: bool,
    /// Animation clock rate; `None` renders only on state-changing events.
    pub fps: Option<u32>,
    /// Inline live-region mode with the given column width, instead of
    /// the alternate screen.
    pub inline_width: Option<u16>,
}

impl RunConfig {
    /// Create a default configuration (full screen, no mouse, no clock).
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable mouse tracking (builder).
    #[must_use]
    pub const fn with_mouse_tracking(mut self) -> Self {
        self.mouse_tracking = true;
        self
    }

    /// Enable the animation clock at the given rate (builder).
    #[must_use]
    pub const fn with_fps(mut self, fps: u32) -> Self {
        self.fps = Some(fps);
        self
    }

    /// Select inline live-region mode (builder).
    #[must_use]
    pub const fn with_inline_width(mut self, width: u16) -> Self {
        self.inline_width = Some(width);
        self
    }
}
