//! Tray UI module for the Interval Timer.
//!
//! This module provides:
//! - Tray icon management with a phase tooltip (e.g., "作業中 04:59")
//! - Dropdown menu with start/stop/change interval/quit actions
//! - The modal interval input dialog
//! - Event handling for menu interactions
//!
//! # Architecture
//!
//! The module is split into platform-independent and platform-specific parts:
//!
//! - `icon.rs`: Tooltip text and icon pixels (platform-independent, fully testable)
//! - `menu.rs`: Menu configuration (platform-independent, fully testable)
//! - `event.rs`: Event types and handling (platform-independent, fully testable)
//! - `dialog.rs`: Input parsing (testable) and the dialog window
//! - `mod.rs`: TrayIconManager (native tray)
//!
//! # Usage
//!
//! The tray is created on the main thread once the event loop is running.
//! Menu clicks arrive as `tray_icon::menu::MenuEvent`s forwarded to the event
//! loop; their ids are resolved with `EventHandler::handle_menu_id`.

pub mod dialog;
pub mod event;
pub mod icon;
pub mod menu;

// Re-export main types
pub use dialog::{parse_minutes, DialogOutcome, InputError, IntervalDialog};
pub use event::{EventHandler, MenuAction, MenuItemId};
pub use icon::IconManager;
pub use menu::{MenuBuilder, MenuConfig, MenuItemConfig};

use tray_icon::menu::{Menu, MenuItem, PredefinedMenuItem};
use tray_icon::TrayIcon;

use crate::types::TimerState;

// ============================================================================
// TrayIconManager
// ============================================================================

/// Native menu items that change at runtime.
struct MenuItems {
    interval_label: MenuItem,
    start: MenuItem,
    stop: MenuItem,
    change_interval: MenuItem,
}

/// Manages the tray icon and its menu.
///
/// This struct coordinates between:
/// - IconManager: Generates tooltip text and icon images
/// - EventHandler: Processes menu clicks
///
/// Without a native tray (creation failed or not yet initialized) every
/// update is a no-op.
pub struct TrayIconManager {
    /// Icon manager for tooltip generation
    icon_manager: IconManager,
    /// Event handler for menu clicks
    event_handler: EventHandler,
    /// Last applied menu configuration
    applied_menu: Option<MenuConfig>,
    /// Last applied tooltip
    applied_tooltip: Option<String>,
    /// Native tray icon
    tray_icon: Option<TrayIcon>,
    /// Native menu items
    items: Option<MenuItems>,
}

impl TrayIconManager {
    /// Creates a manager without a native tray.
    pub fn new() -> Self {
        Self {
            icon_manager: IconManager::new(),
            event_handler: EventHandler::new(),
            applied_menu: None,
            applied_tooltip: None,
            tray_icon: None,
            items: None,
        }
    }

    /// Returns whether the native tray exists.
    pub fn is_initialized(&self) -> bool {
        self.tray_icon.is_some()
    }

    /// Returns a reference to the event handler.
    pub fn event_handler(&self) -> &EventHandler {
        &self.event_handler
    }

    /// Creates the tray icon.
    ///
    /// This must be called from the main thread after the event loop is running.
    ///
    /// # Errors
    ///
    /// Returns an error if the icon image or the tray icon cannot be created.
    pub fn initialize(&mut self, state: &TimerState) -> anyhow::Result<()> {
        use anyhow::Context;
        use tray_icon::TrayIconBuilder;

        self.icon_manager.phase_changed(&state.phase);
        let icon = IconManager::build_icon(&state.phase).context("アイコン画像の作成に失敗しました")?;
        let tooltip = self.icon_manager.tooltip(state);

        let tray_icon = TrayIconBuilder::new()
            .with_icon(icon)
            .with_tooltip(&tooltip)
            .build()
            .context("トレイアイコンの作成に失敗しました")?;

        self.tray_icon = Some(tray_icon);
        self.applied_tooltip = Some(tooltip);

        tracing::info!("トレイアイコンを初期化しました");
        Ok(())
    }

    /// Builds the native menu and attaches it to the tray icon.
    ///
    /// # Errors
    ///
    /// Returns an error if a menu item cannot be appended.
    pub fn install_menu(&mut self, config: &MenuConfig) -> anyhow::Result<()> {
        let Some(tray_icon) = self.tray_icon.as_ref() else {
            tracing::debug!("トレイアイコンがないためメニューを作成しません");
            return Ok(());
        };

        let (menu, items) = Self::build_native_menu(config)?;
        tray_icon.set_menu(Some(Box::new(menu)));
        self.items = Some(items);
        self.applied_menu = Some(config.clone());

        tracing::debug!("メニューを作成しました");
        Ok(())
    }

    /// Applies a new menu configuration to the native items.
    ///
    /// Unchanged configurations are skipped.
    pub fn refresh_menu(&mut self, config: &MenuConfig) {
        if self.applied_menu.as_ref() == Some(config) {
            return;
        }
        let Some(items) = self.items.as_ref() else {
            return;
        };

        for (item, item_config) in [
            (&items.interval_label, &config.interval_label),
            (&items.start, &config.start),
            (&items.stop, &config.stop),
            (&items.change_interval, &config.change_interval),
        ] {
            item.set_text(&item_config.text);
            item.set_enabled(item_config.enabled);
        }
        self.applied_menu = Some(config.clone());
        tracing::debug!("メニューを更新しました");
    }

    /// Updates the tooltip and, on a phase change, the icon image.
    pub fn refresh_status(&mut self, state: &TimerState) {
        let Some(tray_icon) = self.tray_icon.as_ref() else {
            return;
        };

        let tooltip = self.icon_manager.tooltip(state);
        if self.applied_tooltip.as_deref() != Some(tooltip.as_str()) {
            if let Err(e) = tray_icon.set_tooltip(Some(&tooltip)) {
                tracing::debug!(error = %e, "ツールチップを更新できませんでした");
            }
            self.applied_tooltip = Some(tooltip);
        }

        if self.icon_manager.phase_changed(&state.phase) {
            match IconManager::build_icon(&state.phase) {
                Ok(icon) => {
                    if let Err(e) = tray_icon.set_icon(Some(icon)) {
                        tracing::warn!(error = %e, "トレイアイコンを更新できませんでした");
                    }
                }
                Err(e) => tracing::warn!(error = %e, "アイコン画像の作成に失敗しました"),
            }
        }
    }

    /// Removes the tray icon.
    pub fn shutdown(&mut self) {
        self.items = None;
        self.tray_icon = None;
        self.applied_menu = None;
        self.applied_tooltip = None;
        tracing::info!("トレイアイコンを削除しました");
    }

    fn build_native_menu(config: &MenuConfig) -> anyhow::Result<(Menu, MenuItems)> {
        let item = |id: MenuItemId, item_config: &MenuItemConfig| {
            MenuItem::with_id(id.as_str(), &item_config.text, item_config.enabled, None)
        };

        let items = MenuItems {
            interval_label: item(MenuItemId::IntervalLabel, &config.interval_label),
            start: item(MenuItemId::Start, &config.start),
            stop: item(MenuItemId::Stop, &config.stop),
            change_interval: item(MenuItemId::ChangeInterval, &config.change_interval),
        };
        let quit = item(MenuItemId::Quit, &config.quit);

        let menu = Menu::new();
        menu.append(&items.interval_label)?;
        menu.append(&PredefinedMenuItem::separator())?;
        menu.append(&items.start)?;
        menu.append(&items.stop)?;
        menu.append(&items.change_interval)?;
        menu.append(&PredefinedMenuItem::separator())?;
        menu.append(&quit)?;

        Ok((menu, items))
    }
}

impl Default for TrayIconManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TrayIconManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrayIconManager")
            .field("initialized", &self.is_initialized())
            .field("icon_manager", &self.icon_manager)
            .field("applied_menu", &self.applied_menu)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TimerPhase, WorkInterval};

    mod manager_tests {
        use super::*;

        #[test]
        fn test_new() {
            let manager = TrayIconManager::new();
            assert!(!manager.is_initialized());
        }

        #[test]
        fn test_install_menu_without_tray() {
            let mut manager = TrayIconManager::default();
            let config = MenuBuilder::new().build(WorkInterval::default(), TimerPhase::Working);

            assert!(manager.install_menu(&config).is_ok());
            assert!(manager.applied_menu.is_none());
        }

        #[test]
        fn test_refresh_without_tray_is_noop() {
            let mut manager = TrayIconManager::new();
            let config = MenuBuilder::new().build(WorkInterval::default(), TimerPhase::Idle);

            manager.refresh_menu(&config);
            manager.refresh_status(&TimerState::new());
            assert!(manager.applied_tooltip.is_none());
        }

        #[test]
        fn test_event_handler() {
            let manager = TrayIconManager::new();
            assert_eq!(
                manager.event_handler().handle_menu_id("start"),
                Some(MenuAction::Start)
            );
        }

        #[test]
        fn test_debug() {
            let manager = TrayIconManager::new();
            let debug = format!("{:?}", manager);
            assert!(debug.contains("TrayIconManager"));
            assert!(debug.contains("initialized"));
        }
    }
}
