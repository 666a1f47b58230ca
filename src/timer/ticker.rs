//! Scheduled one-second ticks.
//!
//! The engine arms one tick source per phase and holds its handle. Every tick
//! carries the generation it was armed with, so the engine can discard ticks
//! from a handle it has already cancelled.

use std::cell::RefCell;
use std::rc::Rc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::debug;

/// Period between two ticks.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// An armed tick source.
pub trait TickHandle {
    /// Disarms the source. No further ticks are produced.
    fn cancel(self);
}

/// Something that can schedule repeating ticks.
pub trait TickSource {
    type Handle: TickHandle;

    /// Starts producing ticks tagged with `generation`, one per period.
    /// The first tick arrives one period after arming.
    fn arm(&mut self, generation: u64) -> Self::Handle;
}

// ============================================================================
// TokioTickSource
// ============================================================================

/// Produces ticks from a task on a tokio runtime.
///
/// Each tick is handed to `sink`; when the sink returns false (the receiving
/// loop is gone) the task ends.
pub struct TokioTickSource<F> {
    runtime: Handle,
    sink: F,
    period: Duration,
}

impl<F> TokioTickSource<F>
where
    F: Fn(u64) -> bool + Clone + Send + 'static,
{
    pub fn new(runtime: Handle, sink: F) -> Self {
        Self {
            runtime,
            sink,
            period: TICK_PERIOD,
        }
    }

    /// Overrides the tick period.
    #[must_use]
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }
}

impl<F> TickSource for TokioTickSource<F>
where
    F: Fn(u64) -> bool + Clone + Send + 'static,
{
    type Handle = TokioTickHandle;

    fn arm(&mut self, generation: u64) -> TokioTickHandle {
        let sink = self.sink.clone();
        let period = self.period;

        let task = self.runtime.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                if !sink(generation) {
                    debug!(generation, "ティック送信先が閉じられました");
                    break;
                }
            }
        });

        TokioTickHandle { task }
    }
}

impl<F> std::fmt::Debug for TokioTickSource<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokioTickSource")
            .field("period", &self.period)
            .finish_non_exhaustive()
    }
}

/// Handle to a tick task. Dropping it also aborts the task.
#[derive(Debug)]
pub struct TokioTickHandle {
    task: JoinHandle<()>,
}

impl TickHandle for TokioTickHandle {
    fn cancel(self) {
        self.task.abort();
    }
}

impl Drop for TokioTickHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

// ============================================================================
// ManualTickSource
// ============================================================================

#[derive(Debug, Default)]
struct ManualTickLog {
    armed: Vec<u64>,
    cancelled: Vec<u64>,
}

/// A tick source that never fires on its own; tests deliver ticks by hand.
///
/// Clones share the same record, so a test can keep one clone for inspection
/// while the engine owns the other.
#[derive(Debug, Clone, Default)]
pub struct ManualTickSource {
    log: Rc<RefCell<ManualTickLog>>,
}

impl ManualTickSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generations armed so far, in order.
    pub fn armed(&self) -> Vec<u64> {
        self.log.borrow().armed.clone()
    }

    /// Generations cancelled so far, in order.
    pub fn cancelled(&self) -> Vec<u64> {
        self.log.borrow().cancelled.clone()
    }

    /// Number of handles armed and not yet cancelled.
    pub fn active_count(&self) -> usize {
        let log = self.log.borrow();
        log.armed.len() - log.cancelled.len()
    }

    /// The most recently armed generation, if it is still active.
    pub fn current(&self) -> Option<u64> {
        let log = self.log.borrow();
        log.armed
            .last()
            .copied()
            .filter(|generation| !log.cancelled.contains(generation))
    }
}

impl TickSource for ManualTickSource {
    type Handle = ManualTickHandle;

    fn arm(&mut self, generation: u64) -> ManualTickHandle {
        self.log.borrow_mut().armed.push(generation);
        ManualTickHandle {
            generation,
            log: Rc::clone(&self.log),
            cancelled: false,
        }
    }
}

/// Handle returned by `ManualTickSource`.
#[derive(Debug)]
pub struct ManualTickHandle {
    generation: u64,
    log: Rc<RefCell<ManualTickLog>>,
    cancelled: bool,
}

impl ManualTickHandle {
    fn record_cancel(&mut self) {
        if !self.cancelled {
            self.cancelled = true;
            self.log.borrow_mut().cancelled.push(self.generation);
        }
    }
}

impl TickHandle for ManualTickHandle {
    fn cancel(mut self) {
        self.record_cancel();
    }
}

impl Drop for ManualTickHandle {
    fn drop(&mut self) {
        self.record_cancel();
    }
}

// ============================================================================
// Tests
// ============================================================================
