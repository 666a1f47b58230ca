//! Menu building and item state for the tray.
//!
//! The configuration logic is platform-independent and fully testable.
//! The native menu is built from a `MenuConfig` in `mod.rs`.

use crate::types::{TimerPhase, WorkInterval};

// ============================================================================
// MenuItemConfig
// ============================================================================

/// Configuration for a menu item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItemConfig {
    /// Display text for the menu item
    pub text: String,
    /// Whether the menu item is enabled (clickable)
    pub enabled: bool,
}

impl MenuItemConfig {
    /// Creates a new menu item configuration.
    pub fn new(text: impl Into<String>, enabled: bool) -> Self {
        Self {
            text: text.into(),
            enabled,
        }
    }
}

// ============================================================================
// MenuConfig
// ============================================================================

/// Complete menu configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuConfig {
    /// Current interval in minutes (always disabled)
    pub interval_label: MenuItemConfig,
    /// Start button
    pub start: MenuItemConfig,
    /// Stop button
    pub stop: MenuItemConfig,
    /// Change interval button
    pub change_interval: MenuItemConfig,
    /// Quit button (always enabled)
    pub quit: MenuItemConfig,
}

// ============================================================================
// MenuBuilder
// ============================================================================

/// Builds the menu configuration from the interval and timer phase.
#[derive(Debug, Default)]
pub struct MenuBuilder;

impl MenuBuilder {
    /// Creates a new MenuBuilder.
    pub fn new() -> Self {
        Self
    }

    /// Builds a complete menu configuration.
    pub fn build(&self, interval: WorkInterval, phase: TimerPhase) -> MenuConfig {
        MenuConfig {
            interval_label: MenuItemConfig::new(Self::interval_label(interval), false),
            start: MenuItemConfig::new("▶ タイマー開始", Self::is_start_enabled(&phase)),
            stop: MenuItemConfig::new("⏹ タイマー停止", Self::is_stop_enabled(&phase)),
            change_interval: MenuItemConfig::new("インターバル変更…", true),
            quit: MenuItemConfig::new("終了", true),
        }
    }

    /// Text of the informational interval item.
    pub fn interval_label(interval: WorkInterval) -> String {
        format!("タイマー: {}分", interval.as_minutes())
    }

    /// Start is enabled when: Idle
    pub fn is_start_enabled(phase: &TimerPhase) -> bool {
        *phase == TimerPhase::Idle
    }

    /// Stop is enabled when: Working or Pausing
    pub fn is_stop_enabled(phase: &TimerPhase) -> bool {
        phase.is_active()
    }
}

// ============================================================================
// Tests
// ============================================================================
