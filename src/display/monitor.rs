//! Screen enumeration through tao's monitor list.

use tao::dpi::{PhysicalPosition, PhysicalSize};
use tao::event_loop::EventLoopWindowTarget;
use tracing::debug;

use super::{DisplayDescriptor, DisplayEnumerator, Rect};

/// Lists the monitors known to a running tao event loop.
///
/// tao does not report a separate usable area, so `work_area` equals the
/// monitor bounds.
pub struct MonitorEnumerator<'a, T: 'static> {
    target: &'a EventLoopWindowTarget<T>,
}

impl<'a, T: 'static> MonitorEnumerator<'a, T> {
    pub fn new(target: &'a EventLoopWindowTarget<T>) -> Self {
        Self { target }
    }
}

impl<T: 'static> DisplayEnumerator for MonitorEnumerator<'_, T> {
    fn displays(&self) -> Vec<DisplayDescriptor> {
        let displays: Vec<_> = self
            .target
            .available_monitors()
            .map(|monitor| {
                let position = monitor.position();
                let size = monitor.size();
                let mut descriptor =
                    descriptor_from_physical(position, size, monitor.scale_factor());
                descriptor.name = monitor.name();
                descriptor
            })
            .collect();

        debug!(count = displays.len(), "ディスプレイを列挙しました");
        displays
    }
}

/// Builds a descriptor from a monitor's physical geometry.
///
/// Position and size stay in physical pixels; the scale factor is kept so
/// logical sizes can be converted per screen.
pub fn descriptor_from_physical(
    position: PhysicalPosition<i32>,
    size: PhysicalSize<u32>,
    scale_factor: f64,
) -> DisplayDescriptor {
    DisplayDescriptor::from_bounds(Rect::new(position.x, position.y, size.width, size.height))
        .with_scale_factor(scale_factor)
}
