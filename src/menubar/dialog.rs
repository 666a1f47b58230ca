//! Interval input dialog.
//!
//! A small decorated window with one numeric field, pre-filled with the
//! current interval in minutes. The page posts the entered text over the
//! webview IPC channel; the reply is delivered through a single-shot
//! `oneshot` channel and read back when the application handles the dialog.
//!
//! Parsing of the reply is platform-independent and fully testable.

use std::num::IntErrorKind;
use std::sync::Mutex;

use tao::dpi::LogicalSize;
use tao::event_loop::EventLoopWindowTarget;
use tao::window::{Window, WindowBuilder, WindowId};
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{debug, warn};
use wry::{WebView, WebViewBuilder};

use crate::overlay::webview::attach_webview;
use crate::overlay::OverlayError;
use crate::types::WorkInterval;

/// Dialog window width in logical pixels
pub const DIALOG_WIDTH: f64 = 400.0;

/// Dialog window height in logical pixels
pub const DIALOG_HEIGHT: f64 = 250.0;

/// Largest accepted minute value; the interval is stored in `u32` seconds.
pub const MAX_MINUTES: i64 = (u32::MAX / 60) as i64;

// ============================================================================
// InputError
// ============================================================================

/// Errors in the text entered into the interval dialog.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("インターバルが入力されていません")]
    Empty,

    #[error("数値ではありません: {0}")]
    NotANumber(String),

    #[error("インターバルは1分以上で指定してください: {0}")]
    NotPositive(i64),

    #[error("インターバルが大きすぎます: {0}")]
    TooLarge(String),
}

/// Minutes shown in the input field when the dialog opens.
///
/// Rounds up so an interval shorter than a minute still pre-fills a value
/// the field accepts.
pub fn prefill_minutes(interval: WorkInterval) -> u32 {
    interval.as_secs().div_ceil(60).max(1)
}

/// Parses the dialog text as a positive number of minutes.
///
/// # Errors
///
/// Returns an `InputError` for empty, non-integer, non-positive or
/// overflowing input.
pub fn parse_minutes(text: &str) -> Result<i64, InputError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(InputError::Empty);
    }

    let minutes = text.parse::<i64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            InputError::TooLarge(text.to_string())
        }
        _ => InputError::NotANumber(text.to_string()),
    })?;

    if minutes <= 0 {
        return Err(InputError::NotPositive(minutes));
    }
    if minutes > MAX_MINUTES {
        return Err(InputError::TooLarge(text.to_string()));
    }
    Ok(minutes)
}

// ============================================================================
// DialogOutcome
// ============================================================================

/// How the interval dialog ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogOutcome {
    /// The user confirmed with this text
    Submitted(String),
    /// The window closed without confirmation
    Cancelled,
}

impl DialogOutcome {
    /// Resolves the outcome to a minute value.
    ///
    /// Returns `Ok(None)` when the dialog was cancelled.
    ///
    /// # Errors
    ///
    /// Returns an `InputError` if the submitted text is not a valid interval.
    pub fn into_minutes(self) -> Result<Option<i64>, InputError> {
        match self {
            DialogOutcome::Submitted(text) => parse_minutes(&text).map(Some),
            DialogOutcome::Cancelled => Ok(None),
        }
    }
}

// ============================================================================
// Page
// ============================================================================

/// Builds the dialog page with the field pre-filled.
pub fn dialog_html(current_minutes: u32) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="ja">
<head>
<meta charset="utf-8">
<style>
  body {{ font-family: sans-serif; margin: 0; padding: 24px; background: #f5f5f5; }}
  h1 {{ font-size: 16px; margin: 0 0 16px; }}
  input {{ font-size: 18px; width: 120px; padding: 4px; }}
  button {{ font-size: 16px; margin-left: 8px; padding: 4px 16px; }}
</style>
</head>
<body>
  <h1>作業インターバル（分）</h1>
  <form id="form">
    <input id="minutes" type="number" min="1" value="{current_minutes}" autofocus>
    <button type="submit">OK</button>
  </form>
  <script>
    document.getElementById('form').addEventListener('submit', function (e) {{
      e.preventDefault();
      window.ipc.postMessage(document.getElementById('minutes').value);
    }});
  </script>
</body>
</html>"#
    )
}

// ============================================================================
// IntervalDialog
// ============================================================================

/// The open interval dialog window.
pub struct IntervalDialog {
    id: WindowId,
    reply_rx: oneshot::Receiver<String>,
    // Field order matters: the webview drops before its window.
    _webview: WebView,
    window: Window,
}

impl IntervalDialog {
    /// Opens the dialog.
    ///
    /// `notify` is called once the user confirms; the reply is then read with
    /// [`IntervalDialog::finish`].
    ///
    /// # Errors
    ///
    /// Returns an error if the window or its webview cannot be created.
    pub fn open<T: 'static>(
        target: &EventLoopWindowTarget<T>,
        current: WorkInterval,
        notify: impl Fn() + 'static,
    ) -> Result<Self, OverlayError> {
        let window = WindowBuilder::new()
            .with_title("インターバル変更")
            .with_inner_size(LogicalSize::new(DIALOG_WIDTH, DIALOG_HEIGHT))
            .with_resizable(false)
            .with_always_on_top(true)
            .build(target)
            .map_err(|e| OverlayError::WindowCreation(e.to_string()))?;

        let (reply_tx, reply_rx) = oneshot::channel::<String>();
        let reply_tx = Mutex::new(Some(reply_tx));

        let builder = WebViewBuilder::new()
            .with_html(dialog_html(prefill_minutes(current)))
            .with_ipc_handler(move |request: wry::http::Request<String>| {
                let sender = match reply_tx.lock() {
                    Ok(mut guard) => guard.take(),
                    Err(_) => None,
                };
                match sender {
                    Some(sender) => {
                        if sender.send(request.body().clone()).is_ok() {
                            notify();
                        }
                    }
                    None => debug!("ダイアログの応答は既に送信されています"),
                }
            });
        let webview = attach_webview(&window, builder)?;

        debug!(seconds = current.as_secs(), "インターバルダイアログを開きました");
        Ok(Self {
            id: window.id(),
            reply_rx,
            _webview: webview,
            window,
        })
    }

    /// Returns the dialog's window id.
    pub fn window_id(&self) -> WindowId {
        self.id
    }

    /// Brings the dialog to the front.
    pub fn focus(&self) {
        self.window.set_focus();
    }

    /// Closes the dialog and returns how it ended.
    pub fn finish(mut self) -> DialogOutcome {
        match self.reply_rx.try_recv() {
            Ok(text) => DialogOutcome::Submitted(text),
            Err(oneshot::error::TryRecvError::Empty) => DialogOutcome::Cancelled,
            Err(oneshot::error::TryRecvError::Closed) => {
                warn!("ダイアログの応答チャネルが閉じられました");
                DialogOutcome::Cancelled
            }
        }
    }
}

impl std::fmt::Debug for IntervalDialog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntervalDialog")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
