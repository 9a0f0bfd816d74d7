//! Runtime module: the single-consumer event loop.
//!
//! One logical thread owns the render cycle and all application state.
//! Producer threads push typed messages into one ordered queue; the loop
//! waits on that queue, then runs View → Layout → Paint → Diff → Flush →
//! Dispatch for each message.
//!
//! Displayed output always reflects state as of the previously completed
//! dispatch: a cycle renders first, then dispatches its triggering event,
//! so a mutation becomes visible on the very next cycle.

mod app;
mod focus;
mod inline;
mod painter;

pub use app::{App, Cmd, Notifier, RunConfig};
pub(crate) use app::Envelope;
pub use focus::{FocusEntry, FocusIndex, FocusKey};

use crate::buffer::diff::{render_diff, render_full, DiffState};
use crate::buffer::FrameBuffer;
use crate::input::{
    Event, EventSink, KeyCode, KeyEvent, Modifiers, MouseAction, ResizeWatcher, StdinReader,
    Ticker,
};
use crate::layout::{measure, solve, Rect, Size};
use crate::terminal::{SessionOptions, TerminalSession};
use crate::view::{ClickableNode, InputNode, ViewNode};
use crossbeam_channel::{unbounded, Receiver, Sender};
use focus::Interactive;
use inline::InlineWriter;
use painter::PaintContext;
use std::collections::HashMap;
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Render statistics for debugging and tests.
#[derive(Debug, Clone, Default)]
pub struct RenderStats {
    /// Total frames rendered.
    pub frames: u64,
    /// Total cells changed across all diffed frames.
    pub cells_changed: u64,
    /// Total bytes written to the terminal.
    pub bytes_written: u64,
    /// Last render time in microseconds.
    pub last_render_us: u64,
    /// Smoothed average render time in microseconds.
    pub avg_render_us: u64,
}

/// Adapts the runtime queue to the producer threads' event sink.
struct QueueSink<A>(Sender<Envelope<A>>);

impl<A: 'static> EventSink for QueueSink<A> {
    fn send(&self, event: Event) -> bool {
        self.0.send(Envelope::Event(event)).is_ok()
    }
}

/// Run an application until it quits.
///
/// Returns `Ok(())` on graceful quit. Setup failures (not a terminal,
/// raw mode refused) are reported before any mode change is committed.
pub fn run<A: App>(app: A, config: RunConfig) -> io::Result<()> {
    Runtime::new(app, config)?.run_loop()
}

/// The runtime: owns application state, buffers, and the event queue.
pub struct Runtime<A: App> {
    app: A,
    config: RunConfig,
    tx: Sender<Envelope<A>>,
    rx: Receiver<Envelope<A>>,
    prev: FrameBuffer,
    cur: FrameBuffer,
    diff_state: DiffState,
    frame: u64,
    focused: Option<FocusKey>,
    input_cursors: HashMap<&'static str, usize>,
    focus: FocusIndex,
    stats: RenderStats,
    session: Option<TerminalSession>,
    inline_writer: Option<InlineWriter>,
    term_size: (u16, u16),
    needs_full: bool,
    running: bool,
    restored: bool,
    headless_out: Option<Vec<u8>>,
    reader: Option<StdinReader>,
    ticker: Option<Ticker>,
    resize_watcher: Option<ResizeWatcher>,
}

impl<A: App> Runtime<A> {
    /// Set up the terminal and producer threads.
    pub fn new(app: A, config: RunConfig) -> io::Result<Self> {
        let (tx, rx) = unbounded();

        let session = TerminalSession::enter(SessionOptions {
            alternate_screen: config.inline_width.is_none(),
            mouse_capture: config.mouse_tracking,
            hide_cursor: true,
        })?;
        let term_size = TerminalSession::size()?;
        let (width, height) = match config.inline_width {
            // Inline region height follows the view; it starts empty.
            Some(w) => (w.min(term_size.0), 0),
            None => term_size,
        };

        let reader = StdinReader::spawn(QueueSink(tx.clone()))?;
        let ticker = match config.fps {
            Some(fps) if fps > 0 => Some(Ticker::spawn(
                Duration::from_secs(1) / fps,
                QueueSink(tx.clone()),
            )?),
            _ => None,
        };
        let resize_watcher = ResizeWatcher::spawn(term_size, QueueSink(tx.clone()))?;

        Ok(Self {
            app,
            config,
            tx,
            rx,
            prev: FrameBuffer::new(width, height),
            cur: FrameBuffer::new(width, height),
            diff_state: DiffState::new(),
            frame: 0,
            focused: None,
            input_cursors: HashMap::new(),
            focus: FocusIndex::new(),
            stats: RenderStats::default(),
            session: Some(session),
            inline_writer: config.inline_width.map(|_| InlineWriter::new()),
            term_size,
            needs_full: true,
            running: true,
            restored: false,
            headless_out: None,
            reader: Some(reader),
            ticker,
            resize_watcher: Some(resize_watcher),
        })
    }

    /// Create a runtime with no terminal and no producer threads.
    ///
    /// Drives the identical cycle against in-memory buffers; tests feed
    /// events through [`Runtime::step`] and read frames back.
    pub fn headless(app: A, width: u16, height: u16) -> Self {
        let (tx, rx) = unbounded();
        Self {
            app,
            config: RunConfig::default(),
            tx,
            rx,
            prev: FrameBuffer::new(width, height),
            cur: FrameBuffer::new(width, height),
            diff_state: DiffState::new(),
            frame: 0,
            focused: None,
            input_cursors: HashMap::new(),
            focus: FocusIndex::new(),
            stats: RenderStats::default(),
            session: None,
            inline_writer: None,
            term_size: (width, height),
            needs_full: true,
            running: true,
            restored: false,
            headless_out: Some(Vec::new()),
            reader: None,
            ticker: None,
            resize_watcher: None,
        }
    }

    /// Run until quit, a fatal I/O error, or queue disconnection.
    pub fn run_loop(&mut self) -> io::Result<()> {
        let init_cmds = self.app.init();
        self.execute(init_cmds);
        if self.running {
            if let Err(e) = self.render() {
                self.shutdown();
                return Err(e);
            }
        }
        while self.running {
            match self.rx.recv() {
                Ok(envelope) => {
                    if let Err(e) = self.process(envelope) {
                        self.shutdown();
                        return Err(e);
                    }
                }
                Err(_) => break,
            }
        }
        self.shutdown();
        Ok(())
    }

    /// A handle for pushing work into the queue from background threads.
    pub fn notifier(&self) -> Notifier<A> {
        Notifier::new(self.tx.clone())
    }

    /// Whether the loop is still live.
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Whether terminal modes have been restored to their pre-run values.
    pub fn terminal_restored(&self) -> bool {
        self.restored && self.session.as_ref().map_or(true, TerminalSession::is_restored)
    }

    /// Render statistics so far.
    pub const fn stats(&self) -> &RenderStats {
        &self.stats
    }

    /// The currently focused node.
    pub const fn focused(&self) -> Option<&FocusKey> {
        self.focused.as_ref()
    }

    /// One row of the last rendered frame, trailing spaces trimmed.
    pub fn screen_row(&self, y: u16) -> String {
        self.prev.row_text(y)
    }

    /// Bytes emitted by the last render (headless only).
    pub fn last_output(&self) -> &[u8] {
        self.headless_out.as_deref().unwrap_or(&[])
    }

    /// Drive one cycle with an injected event (headless tests).
    pub fn step(&mut self, event: Event) -> io::Result<()> {
        self.cycle(event)?;
        if !self.running {
            self.shutdown();
        }
        Ok(())
    }

    /// Drain envelopes already in the queue without blocking (headless).
    pub fn pump(&mut self) -> io::Result<()> {
        while self.running {
            match self.rx.try_recv() {
                Ok(envelope) => self.process(envelope)?,
                Err(_) => break,
            }
        }
        if !self.running {
            self.shutdown();
        }
        Ok(())
    }

    fn process(&mut self, envelope: Envelope<A>) -> io::Result<()> {
        match envelope {
            Envelope::Event(event) => self.cycle(event),
            Envelope::Apply(f) => {
                let view = self.app.view();
                self.render_with(&view)?;
                f(&mut self.app);
                Ok(())
            }
            Envelope::Print(line) => self.print_line(&line),
            Envelope::Shutdown => {
                self.running = false;
                Ok(())
            }
        }
    }

    /// One full cycle: render current state, then dispatch the event.
    fn cycle(&mut self, event: Event) -> io::Result<()> {
        if let Event::Resize { width, height } = event {
            self.term_size = (width, height);
            let (w, h) = match self.config.inline_width {
                Some(iw) => (iw.min(width), self.cur.height()),
                None => (width, height),
            };
            // Both buffers reallocate together before the next paint.
            self.prev.resize(w, h);
            self.cur.resize(w, h);
            self.diff_state.reset();
            self.needs_full = true;
        }

        let view = self.app.view();
        self.render_with(&view)?;
        let cmds = self.dispatch(&view, event);
        self.execute(cmds);
        Ok(())
    }

    /// Render the current state once (initial frame).
    fn render(&mut self) -> io::Result<()> {
        let view = self.app.view();
        self.render_with(&view)
    }

    fn render_with(&mut self, view: &ViewNode<A>) -> io::Result<()> {
        let start = Instant::now();

        // Inline mode: the live region's height follows the view.
        if self.inline_writer.is_some() {
            let width = self.cur.width();
            let max_h = self.term_size.1.saturating_sub(1);
            let wanted = measure(view, Size::new(width, max_h)).height.min(max_h);
            if wanted != self.cur.height() {
                self.prev.resize(width, wanted);
                self.cur.resize(width, wanted);
                self.needs_full = true;
            }
        }

        let viewport = Rect::from_size(self.cur.width(), self.cur.height());
        let layout = solve(view, viewport);
        self.cur.clear();
        let ctx = PaintContext {
            frame: self.frame,
            focused: self.focused.as_ref(),
            input_cursors: &self.input_cursors,
        };
        painter::paint(view, &layout, &ctx, &mut self.cur, &mut self.focus);

        // A focus target that vanished this frame drops the focus.
        let stale = self
            .focused
            .as_ref()
            .is_some_and(|key| !self.focus.contains(key));
        if stale {
            self.focused = None;
        }

        // The counter advances every cycle, content change or not.
        self.frame += 1;

        let bytes = if let Some(writer) = &mut self.inline_writer {
            writer.repaint(&self.prev, &self.cur, self.needs_full)?
        } else {
            let mut out = Vec::new();
            if self.needs_full {
                render_full(&self.cur, &mut out, &mut self.diff_state);
            } else {
                let result = render_diff(&self.prev, &self.cur, &mut out, &mut self.diff_state);
                self.stats.cells_changed += result.cells_changed as u64;
            }
            self.write_output(&out)?;
            out.len()
        };

        self.prev.copy_from(&self.cur);
        self.needs_full = false;

        self.stats.frames += 1;
        self.stats.bytes_written += bytes as u64;
        self.stats.last_render_us =
            u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);
        if self.stats.avg_render_us == 0 {
            self.stats.avg_render_us = self.stats.last_render_us;
        } else {
            self.stats.avg_render_us =
                (self.stats.avg_render_us * 15 + self.stats.last_render_us) / 16;
        }
        Ok(())
    }

    fn write_output(&mut self, bytes: &[u8]) -> io::Result<()> {
        if let Some(sink) = &mut self.headless_out {
            sink.clear();
            sink.extend_from_slice(bytes);
            return Ok(());
        }
        if bytes.is_empty() {
            return Ok(());
        }
        let mut stdout = io::stdout().lock();
        stdout.write_all(bytes)?;
        stdout.flush()
    }

    /// Route one event: focus navigation and interactive nodes first,
    /// then the application handler for whatever remains.
    fn dispatch(&mut self, view: &ViewNode<A>, event: Event) -> Vec<Cmd<A>> {
        match event {
            Event::Key(key) => self.dispatch_key(view, key),
            Event::Mouse(m) if m.action == MouseAction::Press => {
                let hit = self.focus.hit_test(m.x, m.y).cloned();
                match hit {
                    Some(entry) => {
                        match (entry.kind, &entry.key) {
                            (Interactive::Clickable, FocusKey::Ordinal(n)) => {
                                self.focused = Some(entry.key.clone());
                                match find_clickable(view, *n) {
                                    Some(node) => vec![(node.on_click)()],
                                    None => Vec::new(),
                                }
                            }
                            (Interactive::Input, FocusKey::Binding(id)) => {
                                self.focused = Some(entry.key.clone());
                                if let Some(node) = find_input(view, id) {
                                    let rel = usize::from(m.x.saturating_sub(entry.rect.x));
                                    let len = node.value.chars().count();
                                    self.input_cursors.insert(node.id, rel.min(len));
                                }
                                Vec::new()
                            }
                            _ => Vec::new(),
                        }
                    }
                    None => self.app.update(Event::Mouse(m)),
                }
            }
            other => self.app.update(other),
        }
    }

    fn dispatch_key(&mut self, view: &ViewNode<A>, key: KeyEvent) -> Vec<Cmd<A>> {
        // Tab order comes from the focus index, wrapping at both ends.
        if !self.focus.is_empty() {
            let shifted = key.modifiers.contains(Modifiers::SHIFT);
            match key.code {
                KeyCode::Tab if !shifted => {
                    self.focused = self.focus.next(self.focused.as_ref());
                    return Vec::new();
                }
                KeyCode::BackTab => {
                    self.focused = self.focus.prev(self.focused.as_ref());
                    return Vec::new();
                }
                KeyCode::Tab => {
                    self.focused = self.focus.prev(self.focused.as_ref());
                    return Vec::new();
                }
                _ => {}
            }
        }

        // A focused input consumes printable and editing keys.
        let focused_binding = match &self.focused {
            Some(FocusKey::Binding(id)) => Some(*id),
            _ => None,
        };
        if let Some(id) = focused_binding {
            if let Some(node) = find_input(view, id) {
                if let Some(cmds) = self.edit_input(node, key) {
                    return cmds;
                }
            }
        }

        // Enter activates a focused click target.
        if key.code == KeyCode::Enter {
            if let Some(FocusKey::Ordinal(n)) = &self.focused {
                if let Some(node) = find_clickable(view, *n) {
                    return vec![(node.on_click)()];
                }
            }
        }

        self.app.update(Event::Key(key))
    }

    /// Apply one keystroke to a focused input.
    ///
    /// Returns `None` when the key is not an editing key and should reach
    /// the application handler instead.
    fn edit_input(&mut self, node: &InputNode<A>, key: KeyEvent) -> Option<Vec<Cmd<A>>> {
        let chars: Vec<char> = node.value.chars().collect();
        let mut cursor = self
            .input_cursors
            .get(node.id)
            .copied()
            .unwrap_or(chars.len())
            .min(chars.len());
        let mut edited: Option<String> = None;

        match key.code {
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(Modifiers::CTRL | Modifiers::ALT | Modifiers::SUPER) =>
            {
                let mut next: Vec<char> = chars;
                next.insert(cursor, c);
                cursor += 1;
                edited = Some(next.into_iter().collect());
            }
            KeyCode::Backspace => {
                if cursor > 0 {
                    let mut next: Vec<char> = chars;
                    next.remove(cursor - 1);
                    cursor -= 1;
                    edited = Some(next.into_iter().collect());
                }
            }
            KeyCode::Delete => {
                if cursor < chars.len() {
                    let mut next: Vec<char> = chars;
                    next.remove(cursor);
                    edited = Some(next.into_iter().collect());
                }
            }
            KeyCode::Left => cursor = cursor.saturating_sub(1),
            KeyCode::Right => cursor = (cursor + 1).min(chars.len()),
            KeyCode::Home => cursor = 0,
            KeyCode::End => cursor = chars.len(),
            _ => return None,
        }

        self.input_cursors.insert(node.id, cursor);
        match edited {
            Some(value) => match &node.on_change {
                Some(f) => Some(vec![f(value)]),
                None => Some(Vec::new()),
            },
            None => Some(Vec::new()),
        }
    }

    /// Execute commands strictly after dispatch has returned.
    fn execute(&mut self, cmds: Vec<Cmd<A>>) {
        let notifier = Notifier::new(self.tx.clone());
        for cmd in cmds {
            match cmd {
                Cmd::Quit => self.running = false,
                Cmd::Custom(f) => f(&mut self.app, &notifier),
            }
        }
    }

    fn print_line(&mut self, line: &str) -> io::Result<()> {
        if self.inline_writer.is_none() {
            return Ok(());
        }
        if let Some(writer) = self.inline_writer.as_mut() {
            writer.print_above(line)?;
        }
        self.needs_full = true;
        let view = self.app.view();
        self.render_with(&view)
    }

    /// The single shutdown path: quit, fatal error, and interrupt all
    /// converge here. Idempotent.
    fn shutdown(&mut self) {
        self.running = false;
        if self.restored {
            return;
        }
        self.restored = true;

        if let Some(writer) = self.inline_writer.as_mut() {
            let _ = writer.release();
        }
        if let Some(session) = self.session.as_mut() {
            session.restore();
        }
        if let Some(reader) = &self.reader {
            reader.shutdown();
        }
        if let Some(ticker) = self.ticker.take() {
            ticker.join();
        }
        if let Some(watcher) = self.resize_watcher.take() {
            watcher.join();
        }
    }
}

impl<A: App> Drop for Runtime<A> {
    fn drop(&mut self) {
        // Covers panics out of view() and update(); the terminal comes
        // back even when the application faults.
        self.shutdown();
    }
}

/// Find an input node by binding id, conditionals resolved.
fn find_input<'a, A>(node: &'a ViewNode<A>, id: &str) -> Option<&'a InputNode<A>> {
    match node.resolved() {
        ViewNode::Input(i) if i.id == id => Some(i),
        ViewNode::Stack(st) => st.children.iter().find_map(|c| find_input(c, id)),
        ViewNode::Border(b) => find_input(&b.child, id),
        ViewNode::Padding(p) => find_input(&p.child, id),
        _ => None,
    }
}

/// Find the nth click target in traversal order (the painter's order).
fn find_clickable<A>(node: &ViewNode<A>, target: u32) -> Option<&ClickableNode<A>> {
    fn walk<'a, A>(
        node: &'a ViewNode<A>,
        target: u32,
        counter: &mut u32,
    ) -> Option<&'a ClickableNode<A>> {
        match node.resolved() {
            ViewNode::Clickable(c) => {
                let n = *counter;
                *counter += 1;
                if n == target {
                    Some(c)
                } else {
                    None
                }
            }
            ViewNode::Stack(st) => st.children.iter().find_map(|ch| walk(ch, target, counter)),
            ViewNode::Border(b) => walk(&b.child, target, counter),
            ViewNode::Padding(p) => walk(&p.child, target, counter),
            _ => None,
        }
    }
    walk(node, target, &mut 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{MouseButton, MouseEvent};
    use crate::view::{clickable, hstack, input, spacer, text, vstack};

    /// The counter application from the examples, reduced to its state.
    struct Counter {
        count: i32,
    }

    impl App for Counter {
        fn view(&self) -> ViewNode<Self> {
            vstack(vec![
                text(format!("Counter: {}", self.count)),
                hstack(vec![
                    clickable("[ + ]", || Cmd::apply(|app: &mut Self| app.count += 1)),
                    clickable("[ - ]", || Cmd::apply(|app: &mut Self| app.count -= 1)),
                ])
                .gap(1),
            ])
        }

        fn update(&mut self, event: Event) -> Vec<Cmd<Self>> {
            match event {
                Event::Key(key) if key.code == KeyCode::Char('q') => vec![Cmd::Quit],
                _ => Vec::new(),
            }
        }
    }

    fn click(x: u16, y: u16) -> Event {
        Event::Mouse(MouseEvent {
            x,
            y,
            button: Some(MouseButton::Left),
            action: MouseAction::Press,
            modifiers: Modifiers::empty(),
        })
    }

    #[test]
    fn test_click_increments_and_next_frame_shows_it() {
        let mut rt = Runtime::headless(Counter { count: 0 }, 40, 5);
        // Cycle 1 renders "Counter: 0" and dispatches the click on [ + ].
        rt.step(click(1, 1)).unwrap();
        assert_eq!(rt.screen_row(0), "Counter: 0");
        // The mutation is visible on the very next frame.
        rt.step(Event::Tick(0)).unwrap();
        assert_eq!(rt.screen_row(0), "Counter: 1");
    }

    #[test]
    fn test_quit_key_stops_loop_and_restores() {
        let mut rt = Runtime::headless(Counter { count: 0 }, 40, 5);
        rt.step(Event::Key(KeyEvent::plain(KeyCode::Char('q'))))
            .unwrap();
        assert!(!rt.is_running());
        assert!(rt.terminal_restored());
    }

    #[test]
    fn test_unchanged_frame_emits_nothing() {
        let mut rt = Runtime::headless(Counter { count: 0 }, 40, 5);
        rt.step(Event::Tick(0)).unwrap();
        rt.step(Event::Tick(1)).unwrap();
        assert!(rt.last_output().is_empty());
    }

    #[test]
    fn test_tab_cycles_focus_with_wraparound() {
        let mut rt = Runtime::headless(Counter { count: 0 }, 40, 5);
        rt.step(Event::Tick(0)).unwrap(); // build the focus index
        rt.step(Event::Key(KeyEvent::plain(KeyCode::Tab))).unwrap();
        assert_eq!(rt.focused(), Some(&FocusKey::Ordinal(0)));
        rt.step(Event::Key(KeyEvent::plain(KeyCode::Tab))).unwrap();
        assert_eq!(rt.focused(), Some(&FocusKey::Ordinal(1)));
        // Wraps back to the first.
        rt.step(Event::Key(KeyEvent::plain(KeyCode::Tab))).unwrap();
        assert_eq!(rt.focused(), Some(&FocusKey::Ordinal(0)));
        // Shift+Tab from the first wraps to the last.
        rt.step(Event::Key(KeyEvent::plain(KeyCode::BackTab)))
            .unwrap();
        assert_eq!(rt.focused(), Some(&FocusKey::Ordinal(1)));
    }

    #[test]
    fn test_enter_activates_focused_clickable() {
        let mut rt = Runtime::headless(Counter { count: 0 }, 40, 5);
        rt.step(Event::Tick(0)).unwrap();
        rt.step(Event::Key(KeyEvent::plain(KeyCode::Tab))).unwrap();
        rt.step(Event::Key(KeyEvent::plain(KeyCode::Enter)))
            .unwrap();
        rt.step(Event::Tick(1)).unwrap();
        assert_eq!(rt.screen_row(0), "Counter: 1");
    }

    #[test]
    fn test_resize_reallocates_and_repaints_fully() {
        let mut rt = Runtime::headless(Counter { count: 0 }, 40, 5);
        rt.step(Event::Tick(0)).unwrap();
        rt.step(Event::Resize { width: 30, height: 4 }).unwrap();
        assert_eq!(rt.screen_row(0), "Counter: 0");
        // A full repaint addresses the home position.
        assert!(rt.last_output().starts_with(b"\x1b[H"));
    }

    /// A form with an input field bound through on-change.
    struct Form {
        name: String,
        submitted: bool,
    }

    impl App for Form {
        fn view(&self) -> ViewNode<Self> {
            hstack(vec![
                text("Name: "),
                input("name", self.name.clone())
                    .placeholder("who?")
                    .cursor_blink(false)
                    .on_change(|value| Cmd::apply(move |app: &mut Self| app.name = value)),
                spacer(),
            ])
            .gap(1)
        }

        fn update(&mut self, event: Event) -> Vec<Cmd<Self>> {
            match event {
                Event::Key(key) if key.code == KeyCode::Enter => {
                    self.submitted = true;
                    Vec::new()
                }
                _ => Vec::new(),
            }
        }
    }

    #[test]
    fn test_focused_input_consumes_printable_keys() {
        let mut rt = Runtime::headless(Form { name: String::new(), submitted: false }, 40, 3);
        rt.step(Event::Tick(0)).unwrap();
        rt.step(Event::Key(KeyEvent::plain(KeyCode::Tab))).unwrap();
        assert_eq!(rt.focused(), Some(&FocusKey::Binding("name")));

        rt.step(Event::Key(KeyEvent::plain(KeyCode::Char('h'))))
            .unwrap();
        rt.step(Event::Key(KeyEvent::plain(KeyCode::Char('i'))))
            .unwrap();
        rt.step(Event::Tick(1)).unwrap();
        assert_eq!(rt.screen_row(0), "Name:  hi");
    }

    #[test]
    fn test_focused_input_forwards_unconsumed_keys() {
        let mut rt = Runtime::headless(Form { name: String::new(), submitted: false }, 40, 3);
        rt.step(Event::Tick(0)).unwrap();
        rt.step(Event::Key(KeyEvent::plain(KeyCode::Tab))).unwrap();
        // Enter is not an editing key; it reaches the handler.
        rt.step(Event::Key(KeyEvent::plain(KeyCode::Enter)))
            .unwrap();
        rt.step(Event::Tick(1)).unwrap();
        // Typed keys were consumed, Enter was not.
        assert!(rt.screen_row(0).starts_with("Name:"));
    }

    #[test]
    fn test_backspace_edits_bound_value() {
        let mut rt = Runtime::headless(
            Form { name: "abc".to_string(), submitted: false },
            40,
            3,
        );
        rt.step(Event::Tick(0)).unwrap();
        rt.step(Event::Key(KeyEvent::plain(KeyCode::Tab))).unwrap();
        rt.step(Event::Key(KeyEvent::plain(KeyCode::Backspace)))
            .unwrap();
        rt.step(Event::Tick(1)).unwrap();
        assert_eq!(rt.screen_row(0), "Name:  ab");
    }

    #[test]
    fn test_notifier_apply_renders_on_next_cycle() {
        let mut rt = Runtime::headless(Counter { count: 0 }, 40, 5);
        let notifier = rt.notifier();
        notifier.apply(|app: &mut Counter| app.count = 42);
        rt.pump().unwrap();
        rt.step(Event::Tick(0)).unwrap();
        assert_eq!(rt.screen_row(0), "Counter: 42");
    }

    #[test]
    fn test_command_executes_after_dispatch() {
        // The handler mutates state inside the command, not inline; the
        // frame rendered during the same cycle still shows the old state.
        let mut rt = Runtime::headless(Counter { count: 0 }, 40, 5);
        rt.step(click(1, 1)).unwrap();
        // Click dispatched after render: frame still shows 0, state is 1.
        assert_eq!(rt.screen_row(0), "Counter: 0");
        rt.step(Event::Tick(0)).unwrap();
        assert_eq!(rt.screen_row(0), "Counter: 1");
    }
}
