//! HTML content for the overlay windows.
//!
//! Each page exposes `window.updateTimer(text)`, which the native side calls
//! with the formatted countdown. Once loaded, a page posts [`READY_MESSAGE`]
//! over the webview IPC channel; values pushed before that are lost.

use super::OverlayKind;

/// IPC message a page posts once `window.updateTimer` is defined.
pub const READY_MESSAGE: &str = "ready";

/// Page shown in the small corner overlay.
pub const SMALL_OVERLAY_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<style>
  html, body { margin: 0; height: 100%; background: transparent; overflow: hidden; }
  body {
    display: flex; align-items: center; justify-content: center;
    font-family: -apple-system, "Segoe UI", sans-serif;
    user-select: none; cursor: default;
  }
  #timer {
    padding: 4px 10px; border-radius: 8px;
    background: rgba(0, 0, 0, 0.55); color: #fff;
    font-size: 20px; font-variant-numeric: tabular-nums;
  }
</style>
</head>
<body>
<div id="timer">--:--</div>
<script>
  window.updateTimer = function (text) {
    document.getElementById('timer').textContent = text;
  };
  window.ipc.postMessage('ready');
</script>
</body>
</html>
"#;

/// Page shown in the full-screen pause overlay.
pub const LARGE_OVERLAY_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<style>
  html, body { margin: 0; height: 100%; overflow: hidden; }
  body {
    display: flex; flex-direction: column; align-items: center; justify-content: center;
    background: rgba(10, 20, 30, 0.92); color: #fff;
    font-family: -apple-system, "Segoe UI", sans-serif;
    user-select: none; cursor: default;
  }
  h1 { font-size: 48px; font-weight: 300; margin: 0 0 24px; }
  #timer { font-size: 120px; font-variant-numeric: tabular-nums; }
</style>
</head>
<body>
<h1>休憩時間です</h1>
<div id="timer">--:--</div>
<script>
  window.updateTimer = function (text) {
    document.getElementById('timer').textContent = text;
  };
  window.ipc.postMessage('ready');
</script>
</body>
</html>
"#;

/// Returns the page for the given overlay kind.
pub fn html_for(kind: OverlayKind) -> &'static str {
    match kind {
        OverlayKind::Small => SMALL_OVERLAY_HTML,
        OverlayKind::Large => LARGE_OVERLAY_HTML,
    }
}

/// Formats remaining seconds as `MM:SS`.
///
/// Minutes are not wrapped, so 75 minutes renders as `75:00`.
pub fn format_countdown(remaining_seconds: u32) -> String {
    let minutes = remaining_seconds / 60;
    let seconds = remaining_seconds % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

/// Builds the script that pushes a countdown value into an overlay page.
pub fn update_script(remaining_seconds: u32) -> String {
    format!(
        "window.updateTimer && window.updateTimer('{}');",
        format_countdown(remaining_seconds)
    )
}
