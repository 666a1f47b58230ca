//! Icon and tooltip management for the tray.
//!
//! This module handles:
//! - Generating the tooltip text (e.g., "作業中 04:59")
//! - Drawing the tray icon image for the current phase
//!
//! Text and pixel generation are platform-independent and fully testable.

use crate::overlay::content::format_countdown;
use crate::types::{TimerPhase, TimerState};

// ============================================================================
// Constants
// ============================================================================

/// Application name shown in the tooltip
const APP_NAME: &str = "インターバルタイマー";

/// Edge length of the generated icon in pixels
pub const ICON_SIZE: u32 = 32;

const WORKING_RGBA: [u8; 4] = [76, 175, 80, 255];
const PAUSING_RGBA: [u8; 4] = [255, 152, 0, 255];
const IDLE_RGBA: [u8; 4] = [128, 128, 128, 255];

// ============================================================================
// IconManager
// ============================================================================

/// Manages icon and tooltip generation for the tray.
#[derive(Debug, Default)]
pub struct IconManager {
    /// Last phase an icon was produced for
    last_phase: Option<TimerPhase>,
}

impl IconManager {
    /// Creates a new IconManager.
    pub fn new() -> Self {
        Self { last_phase: None }
    }

    /// Generates the tooltip text.
    ///
    /// Format:
    /// - Working: "インターバルタイマー - 作業中 MM:SS"
    /// - Pausing: "インターバルタイマー - 休憩中 MM:SS"
    /// - Idle: "インターバルタイマー - 停止中"
    pub fn tooltip(&self, state: &TimerState) -> String {
        match state.phase {
            TimerPhase::Working => format!(
                "{} - 作業中 {}",
                APP_NAME,
                format_countdown(state.remaining_seconds)
            ),
            TimerPhase::Pausing => format!(
                "{} - 休憩中 {}",
                APP_NAME,
                format_countdown(state.remaining_seconds)
            ),
            TimerPhase::Idle => format!("{} - 停止中", APP_NAME),
        }
    }

    /// Checks if the phase has changed since last update.
    ///
    /// Only a phase change needs a new icon image.
    pub fn phase_changed(&mut self, phase: &TimerPhase) -> bool {
        let changed = self.last_phase.as_ref() != Some(phase);
        if changed {
            self.last_phase = Some(*phase);
        }
        changed
    }

    /// Draws the icon for a phase as RGBA pixels: a ring with a center dot.
    pub fn icon_rgba(phase: &TimerPhase) -> Vec<u8> {
        let color = match phase {
            TimerPhase::Working => WORKING_RGBA,
            TimerPhase::Pausing => PAUSING_RGBA,
            TimerPhase::Idle => IDLE_RGBA,
        };

        let size = ICON_SIZE;
        let center = size as f32 / 2.0;
        let outer_radius = center - 1.0;
        let inner_radius = outer_radius - 4.0;
        let mut rgba = vec![0u8; (size * size * 4) as usize];

        for y in 0..size {
            for x in 0..size {
                let dx = x as f32 + 0.5 - center;
                let dy = y as f32 + 0.5 - center;
                let dist = (dx * dx + dy * dy).sqrt();

                let on_ring = dist <= outer_radius && dist >= inner_radius;
                let on_dot = dist <= 4.0;
                if on_ring || on_dot {
                    let idx = ((y * size + x) * 4) as usize;
                    rgba[idx..idx + 4].copy_from_slice(&color);
                }
            }
        }

        rgba
    }

    /// Builds the native tray icon for a phase.
    ///
    /// # Errors
    ///
    /// Returns an error if the pixel buffer is rejected by the tray library.
    pub fn build_icon(phase: &TimerPhase) -> Result<tray_icon::Icon, tray_icon::BadIcon> {
        tray_icon::Icon::from_rgba(Self::icon_rgba(phase), ICON_SIZE, ICON_SIZE)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn state(phase: TimerPhase, remaining_seconds: u32) -> TimerState {
        TimerState {
            phase,
            remaining_seconds,
        }
    }

    mod tooltip_tests {
        use super::*;

        #[test]
        fn test_working_tooltip() {
            let manager = IconManager::new();
            assert_eq!(
                manager.tooltip(&state(TimerPhase::Working, 299)),
                "インターバルタイマー - 作業中 04:59"
            );
        }

        #[test]
        fn test_pausing_tooltip() {
            let manager = IconManager::new();
            assert_eq!(
                manager.tooltip(&state(TimerPhase::Pausing, 130)),
                "インターバルタイマー - 休憩中 02:10"
            );
        }

        #[test]
        fn test_idle_tooltip() {
            let manager = IconManager::default();
            assert_eq!(
                manager.tooltip(&TimerState::new()),
                "インターバルタイマー - 停止中"
            );
        }
    }

    mod phase_change_tests {
        use super::*;

        #[test]
        fn test_first_call_reports_change() {
            let mut manager = IconManager::new();
            assert!(manager.phase_changed(&TimerPhase::Working));
            assert!(!manager.phase_changed(&TimerPhase::Working));
        }

        #[test]
        fn test_transition_reports_change() {
            let mut manager = IconManager::new();
            manager.phase_changed(&TimerPhase::Working);
            assert!(manager.phase_changed(&TimerPhase::Pausing));
            assert!(manager.phase_changed(&TimerPhase::Working));
        }
    }

    mod icon_tests {
        use super::*;

        fn pixel(rgba: &[u8], x: u32, y: u32) -> &[u8] {
            let idx = ((y * ICON_SIZE + x) * 4) as usize;
            &rgba[idx..idx + 4]
        }

        #[test]
        fn test_buffer_size() {
            let rgba = IconManager::icon_rgba(&TimerPhase::Idle);
            assert_eq!(rgba.len(), (ICON_SIZE * ICON_SIZE * 4) as usize);
        }

        #[test]
        fn test_center_and_corner() {
            let rgba = IconManager::icon_rgba(&TimerPhase::Working);
            assert_eq!(pixel(&rgba, ICON_SIZE / 2, ICON_SIZE / 2), &WORKING_RGBA);
            assert_eq!(pixel(&rgba, 0, 0), &[0, 0, 0, 0]);
        }

        #[test]
        fn test_phase_colors_differ() {
            let working = IconManager::icon_rgba(&TimerPhase::Working);
            let pausing = IconManager::icon_rgba(&TimerPhase::Pausing);
            assert_ne!(working, pausing);
        }

        #[test]
        fn test_build_icon() {
            assert!(IconManager::build_icon(&TimerPhase::Idle).is_ok());
        }
    }
}
