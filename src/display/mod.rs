//! Screen geometry for overlay placement.
//!
//! The windowing toolkit supplies the list of connected screens; this module
//! turns each one into a `DisplayDescriptor` and derives where the overlays go.
//!
//! All geometry is in physical pixels of the virtual screen, so screens with
//! different scale factors share one coordinate space.

mod monitor;

pub use monitor::{descriptor_from_physical, MonitorEnumerator};

/// Width of the small countdown overlay in logical pixels.
pub const SMALL_OVERLAY_WIDTH: u32 = 100;

/// Height of the small countdown overlay in logical pixels.
pub const SMALL_OVERLAY_HEIGHT: u32 = 50;

/// An axis-aligned rectangle in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// X coordinate of the right edge.
    pub fn right(&self) -> i32 {
        self.x.saturating_add_unsigned(self.width)
    }

    /// Check if a rectangle lies entirely within this one
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.y.saturating_add_unsigned(other.height)
                <= self.y.saturating_add_unsigned(self.height)
    }
}

/// Geometry of one physical screen.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayDescriptor {
    /// Full bounds of the screen
    pub bounds: Rect,
    /// Usable area (excluding panels and docks)
    pub work_area: Rect,
    /// Ratio of physical to logical pixels on this screen
    pub scale_factor: f64,
    /// Monitor name reported by the platform, if any
    pub name: Option<String>,
}

impl DisplayDescriptor {
    /// Creates an unscaled descriptor whose usable area equals its bounds.
    pub fn from_bounds(bounds: Rect) -> Self {
        Self {
            bounds,
            work_area: bounds,
            scale_factor: 1.0,
            name: None,
        }
    }

    /// Sets the usable area.
    #[must_use]
    pub fn with_work_area(mut self, work_area: Rect) -> Self {
        self.work_area = work_area;
        self
    }

    /// Sets the scale factor. Non-positive values are treated as 1.0.
    #[must_use]
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = if scale_factor > 0.0 { scale_factor } else { 1.0 };
        self
    }

    /// Sets the monitor name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Converts a logical length on this screen to physical pixels.
    pub fn to_physical(&self, logical: u32) -> u32 {
        (f64::from(logical) * self.scale_factor).round() as u32
    }

    /// Placement of the small overlay: top-right corner of the usable area.
    pub fn small_overlay_rect(&self) -> Rect {
        let width = self.to_physical(SMALL_OVERLAY_WIDTH);
        let height = self.to_physical(SMALL_OVERLAY_HEIGHT);
        Rect::new(
            self.work_area.right().saturating_sub_unsigned(width),
            self.work_area.y,
            width,
            height,
        )
    }

    /// Placement of the large overlay: the whole screen.
    pub fn large_overlay_rect(&self) -> Rect {
        self.bounds
    }
}

/// Source of the currently connected screens.
pub trait DisplayEnumerator {
    /// Returns one descriptor per connected screen.
    fn displays(&self) -> Vec<DisplayDescriptor>;
}

/// A fixed list of screens, for headless runs and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticDisplays(pub Vec<DisplayDescriptor>);

impl DisplayEnumerator for StaticDisplays {
    fn displays(&self) -> Vec<DisplayDescriptor> {
        self.0.clone()
    }
}

// ============================================================================
// Tests
// ============================================================================
