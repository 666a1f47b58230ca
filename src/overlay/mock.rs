//! Recording overlay doubles for tests.

use std::cell::RefCell;
use std::rc::Rc;

use super::{OverlayError, OverlayFactory, OverlayKind, OverlaySurface};
use crate::display::{DisplayDescriptor, Rect};

/// Shared, ordered record of every countdown value pushed to mock overlays.
///
/// All surfaces created by one `MockOverlayFactory` write into the same
/// journal, so the interleaving between the small and large sets is visible.
#[derive(Debug, Clone, Default)]
pub struct BroadcastJournal(Rc<RefCell<Vec<(OverlayKind, u32)>>>);

impl BroadcastJournal {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, kind: OverlayKind, remaining_seconds: u32) {
        self.0.borrow_mut().push((kind, remaining_seconds));
    }

    /// Returns every recorded value in order.
    pub fn entries(&self) -> Vec<(OverlayKind, u32)> {
        self.0.borrow().clone()
    }

    /// Returns the values pushed to the given kind, with consecutive
    /// per-window duplicates collapsed into one entry per broadcast.
    pub fn broadcasts(&self, kind: OverlayKind, windows_per_set: usize) -> Vec<u32> {
        let values: Vec<u32> = self
            .0
            .borrow()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, v)| *v)
            .collect();
        values
            .chunks(windows_per_set.max(1))
            .map(|chunk| chunk[0])
            .collect()
    }
}

/// An in-memory overlay window.
#[derive(Debug)]
pub struct MockOverlaySurface {
    id: usize,
    kind: OverlayKind,
    rect: Rect,
    visible: bool,
    closed: bool,
    fail_updates: bool,
    received: Vec<u32>,
    journal: BroadcastJournal,
}

impl MockOverlaySurface {
    pub fn kind(&self) -> OverlayKind {
        self.kind
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Values this window has received, in order.
    pub fn received(&self) -> &[u32] {
        &self.received
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn ensure_open(&self) -> Result<(), OverlayError> {
        if self.closed {
            Err(OverlayError::Closed)
        } else {
            Ok(())
        }
    }
}

impl OverlaySurface for MockOverlaySurface {
    type Id = usize;

    fn id(&self) -> Option<usize> {
        (!self.closed).then_some(self.id)
    }

    fn show(&mut self) -> Result<(), OverlayError> {
        self.ensure_open()?;
        self.visible = true;
        Ok(())
    }

    fn hide(&mut self) -> Result<(), OverlayError> {
        self.ensure_open()?;
        self.visible = false;
        Ok(())
    }

    fn set_remaining(&mut self, remaining_seconds: u32) -> Result<(), OverlayError> {
        self.ensure_open()?;
        if self.fail_updates {
            return Err(OverlayError::Script("Mock failure".to_string()));
        }
        self.received.push(remaining_seconds);
        self.journal.record(self.kind, remaining_seconds);
        Ok(())
    }

    fn is_visible(&self) -> bool {
        self.visible && !self.closed
    }

    fn close(&mut self) {
        self.closed = true;
        self.visible = false;
    }
}

/// Creates `MockOverlaySurface`s that share one journal.
#[derive(Debug, Default)]
pub struct MockOverlayFactory {
    next_id: usize,
    journal: BroadcastJournal,
    fail_create_on: Option<usize>,
    fail_updates_on: Option<usize>,
}

impl MockOverlayFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes window creation fail for the screen at `index`.
    #[must_use]
    pub fn failing_on_display(mut self, index: usize) -> Self {
        self.fail_create_on = Some(index);
        self
    }

    /// Makes countdown updates fail for windows on the screen at `index`.
    #[must_use]
    pub fn failing_updates_on_display(mut self, index: usize) -> Self {
        self.fail_updates_on = Some(index);
        self
    }

    /// Returns the journal shared by every surface this factory creates.
    pub fn journal(&self) -> BroadcastJournal {
        self.journal.clone()
    }
}

impl OverlayFactory for MockOverlayFactory {
    type Surface = MockOverlaySurface;

    fn create(
        &mut self,
        kind: OverlayKind,
        display_index: usize,
        display: &DisplayDescriptor,
    ) -> Result<MockOverlaySurface, OverlayError> {
        if self.fail_create_on == Some(display_index) {
            return Err(OverlayError::WindowCreation("Mock failure".to_string()));
        }

        let id = self.next_id;
        self.next_id += 1;

        Ok(MockOverlaySurface {
            id,
            kind,
            rect: kind.rect_for(display),
            visible: false,
            closed: false,
            fail_updates: self.fail_updates_on == Some(display_index),
            received: Vec::new(),
            journal: self.journal.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn display() -> DisplayDescriptor {
        DisplayDescriptor::from_bounds(Rect::new(0, 0, 800, 600))
    }

    #[test]
    fn test_ids_are_unique() {
        let mut factory = MockOverlayFactory::new();
        let a = factory.create(OverlayKind::Small, 0, &display()).unwrap();
        let b = factory.create(OverlayKind::Large, 0, &display()).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_closed_surface_rejects_operations() {
        let mut factory = MockOverlayFactory::new();
        let mut surface = factory.create(OverlayKind::Small, 0, &display()).unwrap();
        surface.close();

        assert!(surface.id().is_none());
        assert!(surface.show().unwrap_err().is_closed());
        assert!(surface.set_remaining(1).unwrap_err().is_closed());
        assert!(!surface.is_visible());
    }

    #[test]
    fn test_failing_updates() {
        let mut factory = MockOverlayFactory::new().failing_updates_on_display(0);
        let mut surface = factory.create(OverlayKind::Small, 0, &display()).unwrap();

        assert!(surface.show().is_ok());
        assert!(matches!(surface.set_remaining(5), Err(OverlayError::Script(_))));
        assert!(surface.received().is_empty());
    }

    #[test]
    fn test_journal_collapses_per_window_duplicates() {
        let journal = BroadcastJournal::new();
        journal.record(OverlayKind::Small, 3);
        journal.record(OverlayKind::Small, 3);
        journal.record(OverlayKind::Large, 2);
        journal.record(OverlayKind::Large, 2);
        journal.record(OverlayKind::Small, 2);
        journal.record(OverlayKind::Small, 2);

        assert_eq!(journal.broadcasts(OverlayKind::Small, 2), vec![3, 2]);
        assert_eq!(journal.broadcasts(OverlayKind::Large, 2), vec![2]);
    }
}
