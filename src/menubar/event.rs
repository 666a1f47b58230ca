//! Event handling for tray menu interactions.
//!
//! This module handles:
//! - Mapping tray menu ids to actions
//! - Logging of dispatched actions
//!
//! The event types and mapping are platform-independent.

use std::fmt;

// ============================================================================
// MenuAction
// ============================================================================

/// Actions that can be triggered from the tray menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Start the timer
    Start,
    /// Stop the timer
    Stop,
    /// Ask for a new work interval
    ChangeInterval,
    /// Exit the application
    Quit,
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuAction::Start => write!(f, "start"),
            MenuAction::Stop => write!(f, "stop"),
            MenuAction::ChangeInterval => write!(f, "change_interval"),
            MenuAction::Quit => write!(f, "quit"),
        }
    }
}

impl MenuAction {
    /// Returns true if the action is blocked while the interval dialog is open.
    pub fn blocked_by_dialog(&self) -> bool {
        !matches!(self, MenuAction::Quit)
    }
}

// ============================================================================
// MenuItemId
// ============================================================================

/// Identifiers for tray menu items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuItemId {
    /// Informational interval label
    IntervalLabel,
    /// Start menu item
    Start,
    /// Stop menu item
    Stop,
    /// Change interval menu item
    ChangeInterval,
    /// Quit menu item
    Quit,
    /// Unknown or unhandled menu item
    Unknown,
}

impl MenuItemId {
    /// Returns the id string registered with the tray menu.
    pub fn as_str(&self) -> &'static str {
        match self {
            MenuItemId::IntervalLabel => "interval_label",
            MenuItemId::Start => "start",
            MenuItemId::Stop => "stop",
            MenuItemId::ChangeInterval => "change_interval",
            MenuItemId::Quit => "quit",
            MenuItemId::Unknown => "unknown",
        }
    }

    /// Resolves a tray menu id string.
    pub fn from_id(id: &str) -> Self {
        match id {
            "interval_label" => MenuItemId::IntervalLabel,
            "start" => MenuItemId::Start,
            "stop" => MenuItemId::Stop,
            "change_interval" => MenuItemId::ChangeInterval,
            "quit" => MenuItemId::Quit,
            _ => MenuItemId::Unknown,
        }
    }

    /// Converts a menu item ID to the corresponding action.
    ///
    /// Returns `None` for informational items.
    pub fn to_action(&self) -> Option<MenuAction> {
        match self {
            MenuItemId::Start => Some(MenuAction::Start),
            MenuItemId::Stop => Some(MenuAction::Stop),
            MenuItemId::ChangeInterval => Some(MenuAction::ChangeInterval),
            MenuItemId::Quit => Some(MenuAction::Quit),
            MenuItemId::IntervalLabel | MenuItemId::Unknown => None,
        }
    }
}

// ============================================================================
// EventHandler
// ============================================================================

/// Handles menu events and converts them to actions.
#[derive(Debug, Default)]
pub struct EventHandler;

impl EventHandler {
    /// Creates a new EventHandler.
    pub fn new() -> Self {
        Self
    }

    /// Processes a menu item click and returns the corresponding action.
    pub fn handle_click(&self, item_id: MenuItemId) -> Option<MenuAction> {
        let action = item_id.to_action();

        match action {
            Some(ref action) => tracing::info!(action = %action, "メニューからアクションを受信"),
            None => tracing::debug!(item = item_id.as_str(), "アクションのないメニュー項目"),
        }

        action
    }

    /// Processes a raw tray menu id.
    pub fn handle_menu_id(&self, id: &str) -> Option<MenuAction> {
        self.handle_click(MenuItemId::from_id(id))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod menu_action_tests {
        use super::*;

        #[test]
        fn test_display() {
            assert_eq!(format!("{}", MenuAction::Start), "start");
            assert_eq!(format!("{}", MenuAction::Stop), "stop");
            assert_eq!(format!("{}", MenuAction::ChangeInterval), "change_interval");
            assert_eq!(format!("{}", MenuAction::Quit), "quit");
        }

        #[test]
        fn test_blocked_by_dialog() {
            assert!(MenuAction::Start.blocked_by_dialog());
            assert!(MenuAction::Stop.blocked_by_dialog());
            assert!(MenuAction::ChangeInterval.blocked_by_dialog());
            assert!(!MenuAction::Quit.blocked_by_dialog());
        }
    }

    mod menu_item_id_tests {
        use super::*;

        #[test]
        fn test_id_round_trip() {
            for id in [
                MenuItemId::IntervalLabel,
                MenuItemId::Start,
                MenuItemId::Stop,
                MenuItemId::ChangeInterval,
                MenuItemId::Quit,
            ] {
                assert_eq!(MenuItemId::from_id(id.as_str()), id);
            }
        }

        #[test]
        fn test_unknown_id() {
            assert_eq!(MenuItemId::from_id("settings"), MenuItemId::Unknown);
        }

        #[test]
        fn test_to_action() {
            assert_eq!(MenuItemId::Start.to_action(), Some(MenuAction::Start));
            assert_eq!(
                MenuItemId::ChangeInterval.to_action(),
                Some(MenuAction::ChangeInterval)
            );
            assert_eq!(MenuItemId::IntervalLabel.to_action(), None);
            assert_eq!(MenuItemId::Unknown.to_action(), None);
        }
    }

    mod event_handler_tests {
        use super::*;

        #[test]
        fn test_handle_click() {
            let handler = EventHandler::new();
            assert_eq!(handler.handle_click(MenuItemId::Stop), Some(MenuAction::Stop));
            assert_eq!(handler.handle_click(MenuItemId::IntervalLabel), None);
        }

        #[test]
        fn test_handle_menu_id() {
            let handler = EventHandler::default();
            assert_eq!(handler.handle_menu_id("quit"), Some(MenuAction::Quit));
            assert_eq!(handler.handle_menu_id("bogus"), None);
        }
    }
}
