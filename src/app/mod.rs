//! Application lifecycle.
//!
//! `run` owns the process for its whole lifetime:
//!
//! - a tokio runtime with one worker that only produces ticks
//! - the tao event loop on the main thread, where every state change happens
//!
//! Ticks, menu clicks, overlay page loads and dialog replies are posted to the
//! event loop as `AppEvent`s through its proxy.
//!
//! Startup order once the loop is running: tray icon, stored interval, tray
//! menu, overlay windows for every connected display, then the first work
//! period. Closing a window never exits; only the Quit menu item does.

mod state;

pub use state::{ActionOutcome, AppState};

use std::path::PathBuf;

use anyhow::Context;
use tao::event::{Event, StartCause, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoopBuilder, EventLoopWindowTarget};
use tao::window::WindowId;
use tray_icon::menu::MenuEvent;
use tracing::{debug, info, warn};

use crate::config::IntervalStore;
use crate::display::{DisplayEnumerator, MonitorEnumerator};
use crate::menubar::{DialogOutcome, IntervalDialog, MenuBuilder, TrayIconManager};
use crate::overlay::{WebviewOverlay, WebviewOverlayFactory};
use crate::timer::{TickSource, TokioTickSource};
use crate::types::TimerState;

// ============================================================================
// AppEvent
// ============================================================================

/// Events posted to the event loop from outside the main thread.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// One second elapsed for the tick armed with this generation
    Tick { generation: u64 },
    /// A tray menu item was clicked
    Menu(MenuEvent),
    /// An overlay page finished loading and can take countdown updates
    OverlayReady(WindowId),
    /// The interval dialog has a reply
    DialogReply,
}

// ============================================================================
// AppOptions
// ============================================================================

/// Startup options from the command line.
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    /// Overrides the interval store location
    pub config_path: Option<PathBuf>,
}

impl AppOptions {
    /// Resolves the interval store.
    ///
    /// # Errors
    ///
    /// Returns an error if no path was given and the platform has no per-user
    /// configuration directory.
    pub fn store(&self) -> anyhow::Result<IntervalStore> {
        match &self.config_path {
            Some(path) => Ok(IntervalStore::new(path)),
            None => IntervalStore::open_default().context("設定ファイルの場所を決定できません"),
        }
    }
}

// ============================================================================
// run
// ============================================================================

/// Runs the application until Quit is chosen.
///
/// # Errors
///
/// Returns an error if the tick runtime or the interval store cannot be set
/// up. Once the event loop runs, failures are logged and never end the process.
pub fn run(options: AppOptions) -> anyhow::Result<()> {
    let store = options.store()?;
    info!(path = %store.path().display(), "設定ファイル");

    // Lives until the process exits: tao's `run` never returns.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("interval-timer-tick")
        .enable_time()
        .build()
        .context("ティック用ランタイムの作成に失敗しました")?;

    #[allow(unused_mut)]
    let mut event_loop = EventLoopBuilder::<AppEvent>::with_user_event().build();

    #[cfg(target_os = "macos")]
    {
        use tao::platform::macos::{ActivationPolicy, EventLoopExtMacOS};
        event_loop.set_activation_policy(ActivationPolicy::Accessory);
    }

    let menu_proxy = event_loop.create_proxy();
    MenuEvent::set_event_handler(Some(move |event: MenuEvent| {
        if menu_proxy.send_event(AppEvent::Menu(event)).is_err() {
            debug!("イベントループが終了しています");
        }
    }));

    let tick_proxy = event_loop.create_proxy();
    let ticks = TokioTickSource::new(runtime.handle().clone(), move |generation: u64| {
        tick_proxy.send_event(AppEvent::Tick { generation }).is_ok()
    });
    let dialog_proxy = event_loop.create_proxy();
    let ready_proxy = event_loop.create_proxy();

    let mut pending = Some((store, ticks));
    let mut app: Option<AppState<WebviewOverlay, _>> = None;
    let mut tray = TrayIconManager::new();
    let mut dialog: Option<IntervalDialog> = None;

    event_loop.run(move |event, target, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::NewEvents(StartCause::Init) => {
                if let Some((store, ticks)) = pending.take() {
                    let proxy = ready_proxy.clone();
                    let on_ready = move |window_id: WindowId| {
                        if proxy.send_event(AppEvent::OverlayReady(window_id)).is_err() {
                            debug!("イベントループが終了しています");
                        }
                    };
                    let displays = MonitorEnumerator::new(target);
                    app = Some(launch(target, store, ticks, &displays, on_ready, &mut tray));
                }
            }

            Event::UserEvent(AppEvent::Tick { generation }) => {
                if let Some(app) = app.as_mut() {
                    app.on_tick(generation);
                }
            }

            Event::UserEvent(AppEvent::OverlayReady(window_id)) => {
                if let Some(app) = app.as_mut() {
                    app.refresh_overlay(window_id);
                }
            }

            Event::UserEvent(AppEvent::Menu(menu_event)) => {
                let Some(app) = app.as_mut() else {
                    return;
                };
                let Some(action) = tray.event_handler().handle_menu_id(&menu_event.id.0) else {
                    return;
                };

                match app.handle_action(action) {
                    ActionOutcome::Handled | ActionOutcome::Ignored => {}
                    ActionOutcome::OpenDialog(interval) => {
                        let proxy = dialog_proxy.clone();
                        let notify = move || {
                            if proxy.send_event(AppEvent::DialogReply).is_err() {
                                debug!("イベントループが終了しています");
                            }
                        };
                        match IntervalDialog::open(target, interval, notify) {
                            Ok(opened) => dialog = Some(opened),
                            Err(e) => {
                                warn!(error = %e, "インターバルダイアログを開けませんでした");
                                app.apply_dialog_outcome(DialogOutcome::Cancelled);
                            }
                        }
                    }
                    ActionOutcome::FocusDialog => {
                        if let Some(open) = dialog.as_ref() {
                            open.focus();
                        }
                    }
                    ActionOutcome::Quit => {
                        dialog = None;
                        tray.shutdown();
                        *control_flow = ControlFlow::Exit;
                    }
                }
            }

            Event::UserEvent(AppEvent::DialogReply) => {
                if let (Some(app), Some(open)) = (app.as_mut(), dialog.take()) {
                    app.apply_dialog_outcome(open.finish());
                }
            }

            Event::WindowEvent {
                window_id,
                event: WindowEvent::CloseRequested,
                ..
            } => {
                if dialog.as_ref().map(IntervalDialog::window_id) == Some(window_id) {
                    if let (Some(app), Some(open)) = (app.as_mut(), dialog.take()) {
                        app.apply_dialog_outcome(open.finish());
                    }
                } else if let Some(app) = app.as_mut() {
                    app.close_overlay(window_id);
                }
            }

            Event::LoopDestroyed => {
                info!("イベントループを終了しました");
            }

            _ => {}
        }

        if let Some(app) = app.as_mut() {
            sync_tray(app, &mut tray);
        }
    })
}

/// Performs the startup sequence on the running event loop.
fn launch<T, K>(
    target: &EventLoopWindowTarget<T>,
    store: IntervalStore,
    ticks: K,
    displays: &dyn DisplayEnumerator,
    on_ready: impl Fn(WindowId) + 'static,
    tray: &mut TrayIconManager,
) -> AppState<WebviewOverlay, K>
where
    T: 'static,
    K: TickSource,
{
    let initial = TimerState::new();
    if let Err(e) = tray.initialize(&initial) {
        warn!(error = %e, "トレイアイコンなしで続行します");
    }

    let interval = store.load();

    let config = MenuBuilder::new().build(interval, initial.phase);
    if let Err(e) = tray.install_menu(&config) {
        warn!(error = %e, "メニューを作成できませんでした");
    }

    let mut factory = WebviewOverlayFactory::new(target, on_ready);
    let mut app = AppState::build(store, interval, ticks, displays, &mut factory);
    app.launch();
    app
}

/// Pushes pending engine changes to the tray.
fn sync_tray<K: TickSource>(app: &mut AppState<WebviewOverlay, K>, tray: &mut TrayIconManager) {
    let events = app.drain_events();
    if events.is_empty() {
        return;
    }
    debug!(count = events.len(), "タイマーイベントを反映します");

    tray.refresh_status(&app.timer_state());
    tray.refresh_menu(&app.menu_config());
}
