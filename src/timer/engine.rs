//! Timer engine for the Interval Timer.
//!
//! This module provides the work/pause state machine:
//! - State transitions (Idle → Working → Pausing → Working ...)
//! - One armed tick source per phase, cancelled on every transition
//! - Overlay visibility and countdown broadcasts
//! - Event firing for the tray and diagnostics

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::ticker::{TickHandle, TickSource};
use crate::config::IntervalStore;
use crate::overlay::{OverlaySurface, OverlayWindows};
use crate::types::{TimerPhase, TimerState, WorkInterval, PAUSE_DURATION_SECS};

// ============================================================================
// TimerEvent
// ============================================================================

/// Timer events for the tray and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// Work period started
    WorkStarted {
        /// Length of the work period in seconds
        interval_seconds: u32,
    },
    /// One second elapsed without completing the phase
    Tick {
        /// Phase the tick belongs to
        phase: TimerPhase,
        /// Remaining seconds
        remaining_seconds: u32,
    },
    /// Pause period started
    PauseStarted {
        /// Length of the pause in seconds
        pause_seconds: u32,
    },
    /// Pause period finished
    PauseCompleted,
    /// Timer stopped by request
    Stopped,
    /// Work interval changed
    IntervalChanged {
        /// New interval in seconds
        interval_seconds: u32,
    },
}

// ============================================================================
// TimerError
// ============================================================================

/// Errors returned by timer commands.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimerError {
    /// `start` was called while a countdown is active.
    #[error("タイマーは既に実行中です")]
    AlreadyRunning,

    /// The requested interval is not a positive number of seconds.
    #[error("無効なインターバルです: {0}秒")]
    InvalidInterval(i64),
}

// ============================================================================
// TimerEngine
// ============================================================================

struct ArmedTick<H> {
    generation: u64,
    handle: H,
}

/// Work/pause state machine.
///
/// The engine owns the tick handle for the current phase. Overlays and the
/// config store belong to the application state and are passed in per call.
pub struct TimerEngine<T: TickSource> {
    /// Current timer state
    state: TimerState,
    /// Configured work period
    work_interval: WorkInterval,
    /// Pause length in seconds
    pause_duration: u32,
    /// Scheduler for phase ticks
    ticks: T,
    /// Tick source for the current phase
    armed: Option<ArmedTick<T::Handle>>,
    /// Generation assigned to the next armed tick
    next_generation: u64,
    /// Event sender channel
    event_tx: mpsc::UnboundedSender<TimerEvent>,
}

impl<T: TickSource> TimerEngine<T> {
    /// Creates an idle engine.
    pub fn new(
        work_interval: WorkInterval,
        ticks: T,
        event_tx: mpsc::UnboundedSender<TimerEvent>,
    ) -> Self {
        Self {
            state: TimerState::new(),
            work_interval,
            pause_duration: PAUSE_DURATION_SECS,
            ticks,
            armed: None,
            next_generation: 1,
            event_tx,
        }
    }

    /// Overrides the pause length.
    ///
    /// The pause is fixed for users; this exists so tests can run short cycles.
    #[must_use]
    pub fn with_pause_duration(mut self, seconds: u32) -> Self {
        self.pause_duration = seconds.max(1);
        self
    }

    /// Returns the current timer state.
    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Returns the configured work interval.
    pub fn work_interval(&self) -> WorkInterval {
        self.work_interval
    }

    /// Returns the pause length in seconds.
    pub fn pause_duration(&self) -> u32 {
        self.pause_duration
    }

    /// Returns the generation of the armed tick, if any.
    pub fn armed_generation(&self) -> Option<u64> {
        self.armed.as_ref().map(|armed| armed.generation)
    }

    /// Starts a work period.
    ///
    /// Shows the small overlays, pushes the full interval to them and arms the
    /// work tick.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::AlreadyRunning` if a countdown is active.
    pub fn start<S: OverlaySurface>(
        &mut self,
        overlays: &mut OverlayWindows<S>,
    ) -> Result<(), TimerError> {
        if self.state.is_running() {
            return Err(TimerError::AlreadyRunning);
        }

        self.state.start_working(self.work_interval);
        overlays.small.show_all();
        overlays.small.broadcast(self.state.remaining_seconds);
        self.arm();

        info!(interval = self.work_interval.as_secs(), "作業タイマーを開始しました");
        self.emit(TimerEvent::WorkStarted {
            interval_seconds: self.work_interval.as_secs(),
        });
        Ok(())
    }

    /// Handles one tick.
    ///
    /// Ticks whose generation does not match the armed tick are ignored.
    /// Returns true if the tick was applied.
    pub fn tick<S: OverlaySurface>(
        &mut self,
        generation: u64,
        overlays: &mut OverlayWindows<S>,
    ) -> bool {
        if self.armed_generation() != Some(generation) {
            debug!(generation, armed = ?self.armed_generation(), "古いティックを無視しました");
            return false;
        }

        match self.state.phase {
            TimerPhase::Working => {
                if self.state.tick() {
                    self.begin_pause(overlays);
                } else {
                    overlays.small.broadcast(self.state.remaining_seconds);
                    self.emit_tick();
                }
            }
            TimerPhase::Pausing => {
                if self.state.tick() {
                    self.finish_pause(overlays);
                } else {
                    overlays.large.broadcast(self.state.remaining_seconds);
                    self.emit_tick();
                }
            }
            TimerPhase::Idle => return false,
        }
        true
    }

    /// Stops the countdown.
    ///
    /// Overlay visibility is left as it is. Returns true if a countdown was
    /// active.
    pub fn stop(&mut self) -> bool {
        self.disarm();
        let was_running = self.state.is_running();
        self.state.stop();

        if was_running {
            info!("タイマーを停止しました");
            self.emit(TimerEvent::Stopped);
        }
        was_running
    }

    /// Changes the work interval and restarts the work period.
    ///
    /// The new value is persisted through `store`. A failed write is logged and
    /// the new interval still takes effect for this session.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::InvalidInterval` if `seconds` is not positive or
    /// does not fit; the current state is left untouched.
    pub fn change_interval<S: OverlaySurface>(
        &mut self,
        seconds: i64,
        store: &IntervalStore,
        overlays: &mut OverlayWindows<S>,
    ) -> Result<WorkInterval, TimerError> {
        let interval =
            WorkInterval::from_signed_secs(seconds).ok_or(TimerError::InvalidInterval(seconds))?;

        self.work_interval = interval;
        if let Err(e) = store.save(interval) {
            warn!(error = %e, "インターバルを保存できませんでした");
        }
        info!(interval = interval.as_secs(), "インターバルを変更しました");
        self.emit(TimerEvent::IntervalChanged {
            interval_seconds: interval.as_secs(),
        });

        self.stop();
        self.start(overlays)?;
        Ok(interval)
    }

    /// Work countdown reached zero: swap overlays and arm the pause tick.
    fn begin_pause<S: OverlaySurface>(&mut self, overlays: &mut OverlayWindows<S>) {
        self.disarm();
        overlays.small.hide_all();
        overlays.large.show_all();

        self.state.start_pausing(self.pause_duration);
        overlays.large.broadcast(self.state.remaining_seconds);
        self.arm();

        info!(pause = self.pause_duration, "休憩を開始しました");
        self.emit(TimerEvent::PauseStarted {
            pause_seconds: self.pause_duration,
        });
    }

    /// Pause countdown reached zero: hide the pause overlays and resume work.
    fn finish_pause<S: OverlaySurface>(&mut self, overlays: &mut OverlayWindows<S>) {
        self.disarm();
        self.state.stop();
        overlays.large.hide_all();

        info!("休憩が終了しました");
        self.emit(TimerEvent::PauseCompleted);

        if let Err(e) = self.start(overlays) {
            warn!(error = %e, "作業タイマーを再開できませんでした");
        }
    }

    /// Arms a new tick source, cancelling any previous one first.
    fn arm(&mut self) {
        self.disarm();
        let generation = self.next_generation;
        self.next_generation += 1;
        let handle = self.ticks.arm(generation);
        self.armed = Some(ArmedTick { generation, handle });
        debug!(generation, "ティックを開始しました");
    }

    fn disarm(&mut self) {
        if let Some(armed) = self.armed.take() {
            armed.handle.cancel();
            debug!(generation = armed.generation, "ティックを停止しました");
        }
    }

    fn emit_tick(&self) {
        self.emit(TimerEvent::Tick {
            phase: self.state.phase,
            remaining_seconds: self.state.remaining_seconds,
        });
    }

    fn emit(&self, event: TimerEvent) {
        if self.event_tx.send(event).is_err() {
            debug!("タイマーイベントの受信側が閉じられています");
        }
    }
}

impl<T: TickSource> std::fmt::Debug for TimerEngine<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerEngine")
            .field("state", &self.state)
            .field("work_interval", &self.work_interval)
            .field("pause_duration", &self.pause_duration)
            .field("armed_generation", &self.armed_generation())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
