//! Timer module for the Interval Timer.
//!
//! This module contains the countdown machinery:
//! - `engine`: work/pause state machine driving the overlays
//! - `ticker`: scheduled one-second tick sources

pub mod engine;
pub mod ticker;

pub use engine::{TimerEngine, TimerError, TimerEvent};
pub use ticker::{
    ManualTickHandle, ManualTickSource, TickHandle, TickSource, TokioTickHandle, TokioTickSource,
    TICK_PERIOD,
};
