//! Overlay windows backed by tao windows hosting a wry webview.

use std::rc::Rc;

use tao::dpi::{PhysicalPosition, PhysicalSize};
use tao::event_loop::EventLoopWindowTarget;
use tao::window::{Window, WindowBuilder, WindowId};
use tracing::{debug, warn};
use wry::{WebView, WebViewBuilder};

use super::content::{html_for, update_script, READY_MESSAGE};
use super::{OverlayError, OverlayFactory, OverlayKind, OverlaySurface};
use crate::display::DisplayDescriptor;

/// Attaches a webview to a window.
///
/// On Linux the webview is packed into the window's GTK container; elsewhere
/// it is attached to the native window handle.
pub(crate) fn attach_webview(
    window: &Window,
    builder: WebViewBuilder<'_>,
) -> Result<WebView, OverlayError> {
    #[cfg(target_os = "linux")]
    let webview = {
        use tao::platform::unix::WindowExtUnix;
        use wry::WebViewBuilderExtUnix;

        let vbox = window
            .default_vbox()
            .ok_or_else(|| OverlayError::WebView("GTKコンテナがありません".to_string()))?;
        builder.build_gtk(vbox)
    };

    #[cfg(not(target_os = "linux"))]
    let webview = builder.build(window);

    webview.map_err(|e| OverlayError::WebView(e.to_string()))
}

/// Native resources of an open overlay. The webview drops before its window.
struct Native {
    webview: WebView,
    window: Window,
}

/// An overlay window rendered by a webview.
pub struct WebviewOverlay {
    kind: OverlayKind,
    id: WindowId,
    visible: bool,
    native: Option<Native>,
}

impl WebviewOverlay {
    pub fn kind(&self) -> OverlayKind {
        self.kind
    }

    fn native(&self) -> Result<&Native, OverlayError> {
        self.native.as_ref().ok_or(OverlayError::Closed)
    }
}

impl OverlaySurface for WebviewOverlay {
    type Id = WindowId;

    fn id(&self) -> Option<WindowId> {
        self.native.as_ref().map(|_| self.id)
    }

    fn show(&mut self) -> Result<(), OverlayError> {
        self.native()?.window.set_visible(true);
        self.visible = true;
        Ok(())
    }

    fn hide(&mut self) -> Result<(), OverlayError> {
        self.native()?.window.set_visible(false);
        self.visible = false;
        Ok(())
    }

    fn set_remaining(&mut self, remaining_seconds: u32) -> Result<(), OverlayError> {
        self.native()?
            .webview
            .evaluate_script(&update_script(remaining_seconds))
            .map_err(|e| OverlayError::Script(e.to_string()))
    }

    fn is_visible(&self) -> bool {
        self.visible && self.native.is_some()
    }

    fn close(&mut self) {
        self.native = None;
        self.visible = false;
    }
}

impl std::fmt::Debug for WebviewOverlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebviewOverlay")
            .field("kind", &self.kind)
            .field("id", &self.id)
            .field("visible", &self.visible)
            .field("closed", &self.native.is_none())
            .finish()
    }
}

/// Creates `WebviewOverlay`s on a running event loop.
///
/// `on_ready` is called with the window id each time an overlay page has
/// loaded, so the current countdown can be pushed to it.
pub struct WebviewOverlayFactory<'a, T: 'static> {
    target: &'a EventLoopWindowTarget<T>,
    on_ready: Rc<dyn Fn(WindowId)>,
}

impl<'a, T: 'static> WebviewOverlayFactory<'a, T> {
    pub fn new(target: &'a EventLoopWindowTarget<T>, on_ready: impl Fn(WindowId) + 'static) -> Self {
        Self {
            target,
            on_ready: Rc::new(on_ready),
        }
    }

    fn window_builder(kind: OverlayKind, display_index: usize, display: &DisplayDescriptor) -> WindowBuilder {
        let rect = kind.rect_for(display);
        let builder = WindowBuilder::new()
            .with_title(format!("interval-timer-{}-{}", kind, display_index))
            .with_position(PhysicalPosition::new(rect.x, rect.y))
            .with_inner_size(PhysicalSize::new(rect.width, rect.height))
            .with_decorations(false)
            .with_transparent(true)
            .with_always_on_top(true)
            .with_resizable(false)
            .with_focused(false)
            .with_visible(false);

        if kind == OverlayKind::Large {
            return Self::skip_taskbar(builder);
        }
        builder
    }

    #[cfg(target_os = "windows")]
    fn skip_taskbar(builder: WindowBuilder) -> WindowBuilder {
        use tao::platform::windows::WindowBuilderExtWindows;
        builder.with_skip_taskbar(true)
    }

    #[cfg(target_os = "linux")]
    fn skip_taskbar(builder: WindowBuilder) -> WindowBuilder {
        use tao::platform::unix::WindowBuilderExtUnix;
        builder.with_skip_taskbar(true)
    }

    // The accessory activation policy already keeps windows out of the switcher.
    #[cfg(not(any(target_os = "windows", target_os = "linux")))]
    fn skip_taskbar(builder: WindowBuilder) -> WindowBuilder {
        builder
    }
}

impl<T: 'static> OverlayFactory for WebviewOverlayFactory<'_, T> {
    type Surface = WebviewOverlay;

    fn create(
        &mut self,
        kind: OverlayKind,
        display_index: usize,
        display: &DisplayDescriptor,
    ) -> Result<WebviewOverlay, OverlayError> {
        let window = Self::window_builder(kind, display_index, display)
            .build(self.target)
            .map_err(|e| OverlayError::WindowCreation(e.to_string()))?;

        if kind == OverlayKind::Small {
            if let Err(e) = window.set_ignore_cursor_events(true) {
                warn!(display = display_index, error = %e, "クリック透過を設定できませんでした");
            }
        }

        let id = window.id();
        let on_ready = Rc::clone(&self.on_ready);
        let builder = WebViewBuilder::new()
            .with_html(html_for(kind))
            .with_transparent(true)
            .with_ipc_handler(move |request: wry::http::Request<String>| {
                if request.body() == READY_MESSAGE {
                    on_ready(id);
                } else {
                    debug!(window = ?id, "不明なオーバーレイメッセージを無視しました");
                }
            });
        let webview = attach_webview(&window, builder)?;

        Ok(WebviewOverlay {
            kind,
            id,
            visible: false,
            native: Some(Native { webview, window }),
        })
    }
}
