//! Ticker: dedicated thread for the fixed-rate animation clock.
//!
//! When an animation rate is configured, the ticker pushes [`Event::Tick`]
//! into the runtime's queue at that rate, forcing a render even absent
//! input. Without a configured rate no ticker exists and the loop stays
//! fully event-driven.

use super::events::{Event, EventSink};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Ticker thread handle.
pub struct Ticker {
    handle: Option<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

impl Ticker {
    /// Spawn a ticker emitting at the given interval.
    pub fn spawn<S: EventSink + 'static>(interval: Duration, sink: S) -> io::Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let handle = thread::Builder::new()
            .name("weft-ticker".to_string())
            .spawn(move || {
                Self::run_loop(&sink, &shutdown_clone, interval);
            })?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
        })
    }

    fn run_loop<S: EventSink>(sink: &S, shutdown: &Arc<AtomicBool>, interval: Duration) {
        let start = Instant::now();
        let mut tick = 0u64;
        let mut next_tick = start + interval;

        while !shutdown.load(Ordering::Relaxed) {
            let now = Instant::now();
            if now >= next_tick {
                if !sink.send(Event::Tick(tick)) {
                    break;
                }
                tick += 1;
                next_tick += interval;
                // Behind schedule: skip missed ticks instead of queueing them.
                if next_tick < now {
                    next_tick = now + interval;
                }
            } else {
                let sleep = next_tick - now;
                thread::sleep(sleep.min(Duration::from_millis(1)));
            }
        }
    }

    /// Signal the ticker to stop.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the ticker thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
