//! Core data types for the Interval Timer.
//!
//! This module defines the data structures used for:
//! - Timer phase and countdown state
//! - The work interval setting with its validation rules

use std::fmt;

// ============================================================================
// Constants
// ============================================================================

/// Work interval used when nothing valid has been stored (5 minutes).
pub const DEFAULT_WORK_INTERVAL_SECS: u32 = 300;

/// Fixed length of every pause (5 minutes).
pub const PAUSE_DURATION_SECS: u32 = 300;

// ============================================================================
// TimerPhase
// ============================================================================

/// Represents the current phase of the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimerPhase {
    /// No countdown is armed
    #[default]
    Idle,
    /// Counting down toward the next pause
    Working,
    /// Full-screen pause in progress
    Pausing,
}

impl TimerPhase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerPhase::Idle => "idle",
            TimerPhase::Working => "working",
            TimerPhase::Pausing => "pausing",
        }
    }

    /// Returns true if the timer is actively counting down.
    pub fn is_active(&self) -> bool {
        matches!(self, TimerPhase::Working | TimerPhase::Pausing)
    }
}

impl fmt::Display for TimerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// WorkInterval
// ============================================================================

/// Length of a work period in seconds. Always greater than zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkInterval(u32);

impl WorkInterval {
    /// Creates an interval from seconds, rejecting zero.
    pub fn from_secs(secs: u32) -> Option<Self> {
        (secs > 0).then_some(Self(secs))
    }

    /// Creates an interval from an arbitrary signed value.
    ///
    /// Returns `None` for zero, negative values, and values that do not fit.
    pub fn from_signed_secs(secs: i64) -> Option<Self> {
        u32::try_from(secs).ok().and_then(Self::from_secs)
    }

    /// Creates an interval from whole minutes.
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        minutes.checked_mul(60).and_then(Self::from_secs)
    }

    /// Returns the interval in seconds.
    pub fn as_secs(&self) -> u32 {
        self.0
    }

    /// Returns the interval in whole minutes, rounded down.
    pub fn as_minutes(&self) -> u32 {
        self.0 / 60
    }
}

impl Default for WorkInterval {
    fn default() -> Self {
        Self(DEFAULT_WORK_INTERVAL_SECS)
    }
}

impl fmt::Display for WorkInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

// ============================================================================
// TimerState
// ============================================================================

/// Represents the current state of the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimerState {
    /// Current phase of the timer
    pub phase: TimerPhase,
    /// Remaining seconds in the current phase (0 when idle)
    pub remaining_seconds: u32,
}

impl TimerState {
    /// Creates a new TimerState in idle state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a work period.
    pub fn start_working(&mut self, interval: WorkInterval) {
        self.phase = TimerPhase::Working;
        self.remaining_seconds = interval.as_secs();
    }

    /// Starts a pause period.
    pub fn start_pausing(&mut self, duration_secs: u32) {
        self.phase = TimerPhase::Pausing;
        self.remaining_seconds = duration_secs;
    }

    /// Stops the timer and discards the remaining count.
    pub fn stop(&mut self) {
        self.phase = TimerPhase::Idle;
        self.remaining_seconds = 0;
    }

    /// Decrements the timer by one second.
    ///
    /// Returns true if the phase has completed (reached 0).
    pub fn tick(&mut self) -> bool {
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        self.remaining_seconds == 0
    }

    /// Returns true if a countdown is active.
    pub fn is_running(&self) -> bool {
        self.phase.is_active()
    }
}

// ============================================================================
// Tests
// ============================================================================
