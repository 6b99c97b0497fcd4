//! Recurring timer that drives preview polling.
//!
//! A [`Ticker`] runs its callback on a dedicated thread, one tick at a time,
//! until the returned [`TickerHandle`] stops it or the callback breaks.
use std::ops::ControlFlow;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, error};

/// Interval between ticks when none is configured.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1000);

const MIN_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Wake,
    Stop,
}

/// Fires a callback at a fixed interval.
#[derive(Debug, Clone, Copy)]
pub struct Ticker {
    interval: Duration,
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}

impl Ticker {
    /// Create a ticker. Intervals below one millisecond are clamped.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(MIN_INTERVAL),
        }
    }

    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Start ticking on a background thread.
    ///
    /// The first tick fires one interval after the call.
    ///
    /// # Errors
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn<F>(self, on_tick: F) -> std::io::Result<TickerHandle>
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let interval = self.interval;
        let thread = thread::Builder::new()
            .name("preview-ticker".to_string())
            .spawn(move || tick_loop(interval, &rx, on_tick))?;
        Ok(TickerHandle {
            tx,
            thread: Some(thread),
        })
    }
}

fn tick_loop<F>(interval: Duration, rx: &Receiver<Command>, mut on_tick: F) -> u64
where
    F: FnMut() -> ControlFlow<()>,
{
    let mut ticks = 0u64;
    let mut next = Instant::now() + interval;
    loop {
        let wait = next.saturating_duration_since(Instant::now());
        match rx.recv_timeout(wait) {
            Ok(Command::Stop) | Err(RecvTimeoutError::Disconnected) => break,
            Ok(Command::Wake) => {}
            Err(RecvTimeoutError::Timeout) => {
                next += interval;
                // Fell behind (slow render or suspended host): skip missed ticks.
                let now = Instant::now();
                if next <= now {
                    next = now + interval;
                }
            }
        }
        ticks += 1;
        if on_tick().is_break() {
            break;
        }
    }
    debug!(ticks, "ticker stopped");
    ticks
}

/// Control handle for a running [`Ticker`].
///
/// Dropping the handle stops the ticker and waits for the in-flight tick.
#[derive(Debug)]
pub struct TickerHandle {
    tx: Sender<Command>,
    thread: Option<JoinHandle<u64>>,
}

impl TickerHandle {
    /// Fire a tick now, without waiting for the interval.
    pub fn wake(&self) {
        let _ = self.tx.send(Command::Wake);
    }

    /// Returns true once the ticker thread has exited.
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Stop ticking and return how many ticks fired.
    pub fn stop(mut self) -> u64 {
        let _ = self.tx.send(Command::Stop);
        self.join_thread()
    }

    /// Wait for the ticker to end on its own and return how many ticks fired.
    pub fn join(mut self) -> u64 {
        self.join_thread()
    }

    fn join_thread(&mut self) -> u64 {
        let Some(thread) = self.thread.take() else {
            return 0;
        };
        thread.join().unwrap_or_else(|_| {
            error!("ticker thread panicked");
            0
        })
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        let _ = self.tx.send(Command::Stop);
        self.join_thread();
    }
}
