//! Stdin reader: dedicated thread for raw terminal input.
//!
//! Blocks on `stdin.read()`, feeds raw bytes through the escape-sequence
//! parser, and pushes typed events into the runtime's queue. Decoding
//! happens here so the main loop never touches raw bytes.

use super::events::EventSink;
use super::parser::InputParser;
use std::io::{self, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Dedicated stdin reader thread.
pub struct StdinReader {
    handle: Option<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

impl StdinReader {
    /// Spawn the reader thread.
    ///
    /// Events go to `sink`; the thread exits when stdin closes, the sink
    /// reports a gone consumer, or shutdown is signalled.
    pub fn spawn<S: EventSink + 'static>(sink: S) -> io::Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let handle = thread::Builder::new()
            .name("weft-stdin".to_string())
            .spawn(move || {
                Self::read_loop(&sink, &shutdown_clone);
            })?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
        })
    }

    fn read_loop<S: EventSink>(sink: &S, shutdown: &Arc<AtomicBool>) {
        let stdin = io::stdin();
        let mut parser = InputParser::new();
        let mut buf = [0u8; 256];

        while !shutdown.load(Ordering::Relaxed) {
            match stdin.lock().read(&mut buf) {
                Ok(0) => break, // EOF
                Ok(n) => {
                    let mut events = parser.feed(&buf[..n]);
                    // In raw mode a full escape sequence arrives within one
                    // read; a chunk ending in a bare ESC is the Escape key.
                    // Longer partials stay buffered for the next chunk.
                    if parser.pending_escape() {
                        events.extend(parser.flush());
                    }
                    for event in events {
                        if !sink.send(event) {
                            return;
                        }
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(_) => break,
            }
        }
    }

    /// Signal the reader to stop at its next wakeup.
    ///
    /// The thread may stay blocked in `read()` until one more byte or EOF
    /// arrives; it is detached rather than joined for that reason.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}

impl Drop for StdinReader {
    fn drop(&mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            drop(handle);
        }
    }
}
