//! Resize watcher: publishes terminal size changes as events.
//!
//! Polls the terminal size query at a low rate and pushes a
//! [`Event::Resize`] when it changes. This watches a cheap ioctl, not the
//! render path; rendering itself stays event-driven.

use super::events::{Event, EventSink};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Resize watcher thread handle.
pub struct ResizeWatcher {
    handle: Option<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

impl ResizeWatcher {
    /// Spawn the watcher with the currently known size.
    pub fn spawn<S: EventSink + 'static>(
        initial: (u16, u16),
        sink: S,
    ) -> io::Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let handle = thread::Builder::new()
            .name("weft-resize".to_string())
            .spawn(move || {
                Self::run_loop(&sink, &shutdown_clone, initial);
            })?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
        })
    }

    fn run_loop<S: EventSink>(sink: &S, shutdown: &Arc<AtomicBool>, initial: (u16, u16)) {
        let mut last = initial;
        while !shutdown.load(Ordering::Relaxed) {
            thread::sleep(POLL_INTERVAL);
            let Ok(size) = crossterm::terminal::size() else {
                continue;
            };
            if size != last {
                last = size;
                if !sink.send(Event::Resize {
                    width: size.0,
                    height: size.1,
                }) {
                    break;
                }
            }
        }
    }

    /// Signal the watcher to stop.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the watcher thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ResizeWatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}
