//! Overlay window error types.

use thiserror::Error;

/// Errors that can occur while creating or driving an overlay window.
#[derive(Debug, Error)]
pub enum OverlayError {
    /// The native window could not be created.
    #[error("オーバーレイウィンドウの作成に失敗しました: {0}")]
    WindowCreation(String),

    /// The webview hosting the overlay content could not be created.
    #[error("Webビューの作成に失敗しました: {0}")]
    WebView(String),

    /// Pushing a countdown value into the content failed.
    #[error("カウントダウンの更新に失敗しました: {0}")]
    Script(String),

    /// The window has already been closed.
    #[error("ウィンドウは既に閉じられています")]
    Closed,
}

impl OverlayError {
    /// Returns true if the error comes from a window that no longer exists.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OverlayError::WindowCreation("no display".to_string());
        assert!(err.to_string().contains("no display"));

        let err = OverlayError::Script("eval failed".to_string());
        assert!(err.to_string().contains("eval failed"));
    }

    #[test]
    fn test_is_closed() {
        assert!(OverlayError::Closed.is_closed());
        assert!(!OverlayError::WebView("x".into()).is_closed());
    }
}
