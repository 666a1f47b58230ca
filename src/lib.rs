//! Interval Timer Library
//!
//! This library provides the core functionality for the Interval Timer.
//! It includes:
//! - Timer engine cycling between work and pause periods
//! - Tick sources driving the countdown
//! - Per-screen overlay windows (corner countdown and full-screen break)
//! - Persistent storage of the work interval
//! - Tray icon, menu and interval dialog
//! - The application event loop and CLI parsing

pub mod app;
pub mod cli;
pub mod config;
pub mod display;
pub mod menubar;
pub mod overlay;
pub mod timer;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{TimerPhase, TimerState, WorkInterval, DEFAULT_WORK_INTERVAL_SECS, PAUSE_DURATION_SECS};

pub use app::{ActionOutcome, AppEvent, AppOptions, AppState};

pub use config::{ConfigError, IntervalStore};

pub use display::{DisplayDescriptor, DisplayEnumerator, Rect, StaticDisplays};

pub use overlay::{
    MockOverlayFactory, MockOverlaySurface, OverlayError, OverlayFactory, OverlayKind,
    OverlaySet, OverlaySurface, OverlayWindows,
};

pub use timer::{
    ManualTickSource, TickHandle, TickSource, TimerEngine, TimerError, TimerEvent,
    TokioTickSource,
};

// Re-export menubar types
pub use menubar::{
    parse_minutes, DialogOutcome, EventHandler, IconManager, InputError, MenuAction, MenuBuilder,
    MenuConfig, MenuItemConfig, MenuItemId, TrayIconManager,
};
