//! Application state record.
//!
//! `AppState` owns everything the control loop mutates: the timer engine, the
//! overlay windows, the interval store and the engine's event receiver. All of
//! its methods run on the event-loop thread.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::IntervalStore;
use crate::display::DisplayEnumerator;
use crate::menubar::{DialogOutcome, MenuAction, MenuBuilder, MenuConfig};
use crate::overlay::{OverlayFactory, OverlaySurface, OverlayWindows};
use crate::timer::{TickSource, TimerEngine, TimerError, TimerEvent};
use crate::types::{TimerState, WorkInterval};

// ============================================================================
// ActionOutcome
// ============================================================================

/// What the control loop has to do after a menu action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The action was applied to the state
    Handled,
    /// The action was ignored because the interval dialog is open
    Ignored,
    /// Open the interval dialog pre-filled with this interval
    OpenDialog(WorkInterval),
    /// The dialog is already open; bring it to the front
    FocusDialog,
    /// Exit the application
    Quit,
}

// ============================================================================
// AppState
// ============================================================================

/// The application's mutable state.
pub struct AppState<S: OverlaySurface, T: TickSource> {
    engine: TimerEngine<T>,
    overlays: OverlayWindows<S>,
    store: IntervalStore,
    events: mpsc::UnboundedReceiver<TimerEvent>,
    dialog_open: bool,
}

impl<S: OverlaySurface, T: TickSource> AppState<S, T> {
    /// Creates the state with an idle engine.
    pub fn new(
        store: IntervalStore,
        interval: WorkInterval,
        ticks: T,
        overlays: OverlayWindows<S>,
    ) -> Self {
        let (event_tx, events) = mpsc::unbounded_channel();
        Self {
            engine: TimerEngine::new(interval, ticks, event_tx),
            overlays,
            store,
            events,
            dialog_open: false,
        }
    }

    /// Creates the state with overlays for every screen `displays` reports.
    pub fn build<F>(
        store: IntervalStore,
        interval: WorkInterval,
        ticks: T,
        displays: &dyn DisplayEnumerator,
        factory: &mut F,
    ) -> Self
    where
        F: OverlayFactory<Surface = S>,
    {
        let overlays = OverlayWindows::build(&displays.displays(), factory);
        Self::new(store, interval, ticks, overlays)
    }

    /// Overrides the pause length.
    #[must_use]
    pub fn with_pause_duration(mut self, seconds: u32) -> Self {
        self.engine = self.engine.with_pause_duration(seconds);
        self
    }

    /// Returns the current timer state.
    pub fn timer_state(&self) -> TimerState {
        self.engine.state()
    }

    /// Returns the configured work interval.
    pub fn work_interval(&self) -> WorkInterval {
        self.engine.work_interval()
    }

    /// Returns the engine.
    pub fn engine(&self) -> &TimerEngine<T> {
        &self.engine
    }

    /// Returns the overlay windows.
    pub fn overlays(&self) -> &OverlayWindows<S> {
        &self.overlays
    }

    /// Returns the interval store.
    pub fn store(&self) -> &IntervalStore {
        &self.store
    }

    /// Returns true while the interval dialog is open.
    pub fn is_dialog_open(&self) -> bool {
        self.dialog_open
    }

    /// Starts the first work period.
    pub fn launch(&mut self) {
        match self.engine.start(&mut self.overlays) {
            Ok(()) => info!(interval = %self.engine.work_interval(), "タイマーを起動しました"),
            Err(e) => warn!(error = %e, "タイマーを起動できませんでした"),
        }
    }

    /// Forwards a tick to the engine. Returns true if it was applied.
    pub fn on_tick(&mut self, generation: u64) -> bool {
        self.engine.tick(generation, &mut self.overlays)
    }

    /// Applies a menu action.
    pub fn handle_action(&mut self, action: MenuAction) -> ActionOutcome {
        if self.dialog_open && action.blocked_by_dialog() {
            if action == MenuAction::ChangeInterval {
                debug!("インターバルダイアログは既に開いています");
                return ActionOutcome::FocusDialog;
            }
            info!(action = %action, "ダイアログ表示中のため操作を無視しました");
            return ActionOutcome::Ignored;
        }

        match action {
            MenuAction::Start => {
                match self.engine.start(&mut self.overlays) {
                    Ok(()) => {}
                    Err(TimerError::AlreadyRunning) => debug!("タイマーは既に実行中です"),
                    Err(e) => warn!(error = %e, "タイマーを開始できませんでした"),
                }
                ActionOutcome::Handled
            }
            MenuAction::Stop => {
                self.engine.stop();
                ActionOutcome::Handled
            }
            MenuAction::ChangeInterval => {
                self.dialog_open = true;
                ActionOutcome::OpenDialog(self.engine.work_interval())
            }
            MenuAction::Quit => {
                self.engine.stop();
                info!("アプリケーションを終了します");
                ActionOutcome::Quit
            }
        }
    }

    /// Applies the result of the interval dialog.
    ///
    /// Returns true if the interval was changed.
    pub fn apply_dialog_outcome(&mut self, outcome: DialogOutcome) -> bool {
        self.dialog_open = false;

        let minutes = match outcome.into_minutes() {
            Ok(Some(minutes)) => minutes,
            Ok(None) => {
                debug!("インターバル変更がキャンセルされました");
                return false;
            }
            Err(e) => {
                warn!(error = %e, "入力されたインターバルを無視しました");
                return false;
            }
        };

        let Some(seconds) = minutes.checked_mul(60) else {
            warn!(minutes, "インターバルが大きすぎます");
            return false;
        };

        match self
            .engine
            .change_interval(seconds, &self.store, &mut self.overlays)
        {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "インターバルを変更できませんでした");
                false
            }
        }
    }

    /// Builds the menu configuration for the current state.
    pub fn menu_config(&self) -> MenuConfig {
        MenuBuilder::new().build(self.engine.work_interval(), self.engine.state().phase)
    }

    /// Takes all pending engine events.
    pub fn drain_events(&mut self) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }

    /// Pushes the current countdown to one overlay whose page has just loaded.
    ///
    /// Returns true if the id belonged to an overlay.
    pub fn refresh_overlay(&mut self, id: S::Id) -> bool {
        let remaining = self.engine.state().remaining_seconds;
        self.overlays.send_to(id, remaining)
    }

    /// Releases an overlay window the platform has closed.
    ///
    /// Returns true if the id belonged to an overlay.
    pub fn close_overlay(&mut self, id: S::Id) -> bool {
        let closed = self.overlays.close(id);
        if closed {
            info!(window = ?id, "オーバーレイウィンドウが閉じられました");
        }
        closed
    }
}

impl<S: OverlaySurface, T: TickSource> std::fmt::Debug for AppState<S, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("engine", &self.engine)
            .field("store", &self.store)
            .field("dialog_open", &self.dialog_open)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
