//! Per-screen overlay windows.
//!
//! Two parallel sets of windows are built once at startup, one window per
//! screen in each set:
//!
//! - **small**: a 100x50 (logical) countdown in the top-right corner of the
//!   usable area, shown while working
//! - **large**: a full-screen break overlay, shown while pausing
//!
//! # Architecture
//!
//! - `mod.rs`: `OverlaySurface`/`OverlayFactory` traits and the set logic
//!   (platform-independent, fully testable)
//! - `content.rs`: HTML pages and countdown formatting
//! - `webview.rs`: tao window + wry webview implementation
//! - `mock.rs`: recording doubles for tests
//!
//! Every set operation tolerates individual failures: a window that errors
//! (for instance one the platform has already closed) is logged and skipped,
//! and the rest of the set is still updated.

pub mod content;
mod error;
pub mod mock;
pub mod webview;

pub use error::OverlayError;
pub use mock::{BroadcastJournal, MockOverlayFactory, MockOverlaySurface};
pub use webview::{WebviewOverlay, WebviewOverlayFactory};

use std::fmt;

use tracing::{debug, warn};

use crate::display::{DisplayDescriptor, Rect};

// ============================================================================
// OverlayKind
// ============================================================================

/// Which of the two overlay sets a window belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    /// Corner countdown shown during work
    Small,
    /// Full-screen overlay shown during pause
    Large,
}

impl OverlayKind {
    /// Returns where a window of this kind goes on the given screen.
    pub fn rect_for(&self, display: &DisplayDescriptor) -> Rect {
        match self {
            OverlayKind::Small => display.small_overlay_rect(),
            OverlayKind::Large => display.large_overlay_rect(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OverlayKind::Small => "small",
            OverlayKind::Large => "large",
        }
    }
}

impl fmt::Display for OverlayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Traits
// ============================================================================

/// A single on-screen overlay window.
pub trait OverlaySurface {
    /// Identifier used to match platform window events.
    type Id: Copy + Eq + fmt::Debug;

    /// Returns the window identifier, or `None` once closed.
    fn id(&self) -> Option<Self::Id>;

    /// Makes the window visible.
    fn show(&mut self) -> Result<(), OverlayError>;

    /// Hides the window.
    fn hide(&mut self) -> Result<(), OverlayError>;

    /// Pushes a countdown value for the window to render.
    fn set_remaining(&mut self, remaining_seconds: u32) -> Result<(), OverlayError>;

    /// Returns true if the window is currently shown.
    fn is_visible(&self) -> bool;

    /// Releases the native window. Later operations return `OverlayError::Closed`.
    fn close(&mut self);
}

/// Creates overlay windows for screens.
pub trait OverlayFactory {
    type Surface: OverlaySurface;

    /// Creates one window of `kind` placed on `display`.
    ///
    /// # Errors
    ///
    /// Returns an error if the window or its content cannot be created.
    fn create(
        &mut self,
        kind: OverlayKind,
        display_index: usize,
        display: &DisplayDescriptor,
    ) -> Result<Self::Surface, OverlayError>;
}

// ============================================================================
// OverlaySet
// ============================================================================

/// All windows of one kind, one per screen.
#[derive(Debug)]
pub struct OverlaySet<S> {
    kind: OverlayKind,
    surfaces: Vec<S>,
}

impl<S: OverlaySurface> OverlaySet<S> {
    /// Creates an empty set.
    pub fn empty(kind: OverlayKind) -> Self {
        Self {
            kind,
            surfaces: Vec::new(),
        }
    }

    /// Builds one window per screen.
    ///
    /// Screens whose window cannot be created are logged and left without an
    /// overlay.
    pub fn build<F>(kind: OverlayKind, displays: &[DisplayDescriptor], factory: &mut F) -> Self
    where
        F: OverlayFactory<Surface = S>,
    {
        let mut set = Self::empty(kind);
        for (index, display) in displays.iter().enumerate() {
            match factory.create(kind, index, display) {
                Ok(surface) => {
                    debug!(kind = %kind, display = index, "オーバーレイを作成しました");
                    set.surfaces.push(surface);
                }
                Err(e) => {
                    warn!(kind = %kind, display = index, error = %e, "オーバーレイを作成できませんでした");
                }
            }
        }
        set
    }

    /// Returns which overlay kind this set holds.
    pub fn kind(&self) -> OverlayKind {
        self.kind
    }

    /// Number of windows in the set.
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    /// Returns true if the set has no windows.
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Iterates over the windows.
    pub fn iter(&self) -> impl Iterator<Item = &S> {
        self.surfaces.iter()
    }

    /// Number of windows currently shown.
    pub fn visible_count(&self) -> usize {
        self.surfaces.iter().filter(|s| s.is_visible()).count()
    }

    /// Shows every window. Returns the number of windows that failed.
    pub fn show_all(&mut self) -> usize {
        self.for_each("show", |surface| surface.show())
    }

    /// Hides every window. Returns the number of windows that failed.
    pub fn hide_all(&mut self) -> usize {
        self.for_each("hide", |surface| surface.hide())
    }

    /// Pushes a countdown value to every window. Returns the number of
    /// windows that failed.
    pub fn broadcast(&mut self, remaining_seconds: u32) -> usize {
        self.for_each("broadcast", |surface| surface.set_remaining(remaining_seconds))
    }

    /// Pushes a countdown value to the window with the given id.
    ///
    /// Returns true if a window in this set matched, even if the update failed.
    pub fn send_to(&mut self, id: S::Id, remaining_seconds: u32) -> bool {
        let kind = self.kind;
        let Some(surface) = self.surfaces.iter_mut().find(|s| s.id() == Some(id)) else {
            return false;
        };
        if let Err(e) = surface.set_remaining(remaining_seconds) {
            warn!(kind = %kind, window = ?id, error = %e, "オーバーレイを更新できませんでした");
        }
        true
    }

    /// Closes the window with the given id, keeping its slot.
    ///
    /// Returns true if a window in this set matched.
    pub fn close(&mut self, id: S::Id) -> bool {
        match self.surfaces.iter_mut().find(|s| s.id() == Some(id)) {
            Some(surface) => {
                surface.close();
                true
            }
            None => false,
        }
    }

    fn for_each<F>(&mut self, operation: &'static str, mut f: F) -> usize
    where
        F: FnMut(&mut S) -> Result<(), OverlayError>,
    {
        let kind = self.kind;
        let mut failures = 0;
        for (index, surface) in self.surfaces.iter_mut().enumerate() {
            if let Err(e) = f(surface) {
                failures += 1;
                if e.is_closed() {
                    debug!(kind = %kind, index, operation, "閉じられたウィンドウをスキップしました");
                } else {
                    warn!(kind = %kind, index, operation, error = %e, "オーバーレイ操作に失敗しました");
                }
            }
        }
        failures
    }
}

// ============================================================================
// OverlayWindows
// ============================================================================

/// The small and large overlay sets together.
#[derive(Debug)]
pub struct OverlayWindows<S> {
    pub small: OverlaySet<S>,
    pub large: OverlaySet<S>,
}

impl<S: OverlaySurface> OverlayWindows<S> {
    /// Builds both sets for the given screens.
    pub fn build<F>(displays: &[DisplayDescriptor], factory: &mut F) -> Self
    where
        F: OverlayFactory<Surface = S>,
    {
        let small = OverlaySet::build(OverlayKind::Small, displays, factory);
        let large = OverlaySet::build(OverlayKind::Large, displays, factory);
        tracing::info!(
            displays = displays.len(),
            small = small.len(),
            large = large.len(),
            "オーバーレイウィンドウを構築しました"
        );
        Self { small, large }
    }

    /// Pushes a countdown value to one window in either set.
    ///
    /// Returns true if the id belonged to an overlay.
    pub fn send_to(&mut self, id: S::Id, remaining_seconds: u32) -> bool {
        self.small.send_to(id, remaining_seconds) || self.large.send_to(id, remaining_seconds)
    }

    /// Releases a window the platform has closed.
    ///
    /// Returns true if the id belonged to an overlay.
    pub fn close(&mut self, id: S::Id) -> bool {
        self.small.close(id) || self.large.close(id)
    }
}

// ============================================================================
// Tests
// ============================================================================
