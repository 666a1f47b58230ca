//! Work/pause cycle tests.
//!
//! These tests drive the timer engine through full cycles against in-memory
//! overlays:
//! - Countdown values seen by the small and large overlays
//! - Overlay visibility at each transition
//! - Cancellation and stale ticks
//! - Zero displays and failing windows
//! - Real tokio ticks with paused time

use tokio::sync::mpsc;

use interval_timer::config::IntervalStore;
use interval_timer::display::{DisplayDescriptor, Rect};
use interval_timer::overlay::{MockOverlayFactory, MockOverlaySurface, OverlayKind, OverlayWindows};
use interval_timer::timer::{ManualTickSource, TimerEngine, TimerEvent, TokioTickSource};
use interval_timer::types::{TimerPhase, WorkInterval};

// ============================================================================
// Test Helpers
// ============================================================================

fn displays(count: usize) -> Vec<DisplayDescriptor> {
    (0..count)
        .map(|i| {
            DisplayDescriptor::from_bounds(Rect::new(i as i32 * 1920, 0, 1920, 1080))
        })
        .collect()
}

struct Cycle {
    engine: TimerEngine<ManualTickSource>,
    ticks: ManualTickSource,
    overlays: OverlayWindows<MockOverlaySurface>,
    factory: MockOverlayFactory,
    _events: mpsc::UnboundedReceiver<TimerEvent>,
}

impl Cycle {
    fn new(work_secs: u32, pause_secs: u32, display_count: usize) -> Self {
        Self::with_factory(work_secs, pause_secs, display_count, MockOverlayFactory::new())
    }

    fn with_factory(
        work_secs: u32,
        pause_secs: u32,
        display_count: usize,
        mut factory: MockOverlayFactory,
    ) -> Self {
        let overlays = OverlayWindows::build(&displays(display_count), &mut factory);
        let ticks = ManualTickSource::new();
        let (tx, rx) = mpsc::unbounded_channel();
        let engine = TimerEngine::new(WorkInterval::from_secs(work_secs).unwrap(), ticks.clone(), tx)
            .with_pause_duration(pause_secs);
        Self {
            engine,
            ticks,
            overlays,
            factory,
            _events: rx,
        }
    }

    fn tick(&mut self) {
        let generation = self.ticks.current().expect("no tick armed");
        self.engine.tick(generation, &mut self.overlays);
    }

    fn ticks(&mut self, count: usize) {
        for _ in 0..count {
            self.tick();
        }
    }
}

// ============================================================================
// Cycle Scenarios
// ============================================================================

#[test]
fn test_short_cycle_broadcast_sequence() {
    let mut cycle = Cycle::new(3, 2, 1);
    cycle.engine.start(&mut cycle.overlays).unwrap();
    cycle.ticks(5);

    let journal = cycle.factory.journal();
    assert_eq!(
        journal.entries(),
        vec![
            (OverlayKind::Small, 3),
            (OverlayKind::Small, 2),
            (OverlayKind::Small, 1),
            (OverlayKind::Large, 2),
            (OverlayKind::Large, 1),
            (OverlayKind::Small, 3),
        ]
    );
}

#[test]
fn test_work_completion_swaps_overlays() {
    let mut cycle = Cycle::new(3, 300, 2);
    cycle.engine.start(&mut cycle.overlays).unwrap();
    cycle.ticks(3);

    let state = cycle.engine.state();
    assert_eq!(state.phase, TimerPhase::Pausing);
    assert_eq!(state.remaining_seconds, 300);
    assert_eq!(cycle.overlays.small.visible_count(), 0);
    assert_eq!(cycle.overlays.large.visible_count(), 2);
}

#[test]
fn test_pause_completion_resumes_with_current_interval() {
    let mut cycle = Cycle::new(4, 2, 2);
    cycle.engine.start(&mut cycle.overlays).unwrap();
    cycle.ticks(4 + 2);

    let state = cycle.engine.state();
    assert_eq!(state.phase, TimerPhase::Working);
    assert_eq!(state.remaining_seconds, 4);
    assert_eq!(cycle.overlays.small.visible_count(), 2);
    assert_eq!(cycle.overlays.large.visible_count(), 0);
}

#[test]
fn test_many_cycles_keep_one_tick_armed() {
    let mut cycle = Cycle::new(2, 1, 1);
    cycle.engine.start(&mut cycle.overlays).unwrap();
    for _ in 0..30 {
        cycle.tick();
        assert_eq!(cycle.ticks.active_count(), 1);
    }
}

#[test]
fn test_stop_prevents_queued_tick() {
    let mut cycle = Cycle::new(10, 5, 1);
    cycle.engine.start(&mut cycle.overlays).unwrap();
    cycle.tick();
    let queued = cycle.ticks.current().unwrap();

    cycle.engine.stop();
    let before = cycle.factory.journal().entries().len();
    assert!(!cycle.engine.tick(queued, &mut cycle.overlays));

    assert_eq!(cycle.factory.journal().entries().len(), before);
    assert_eq!(cycle.engine.state().phase, TimerPhase::Idle);
}

#[test]
fn test_restart_after_stop_uses_full_interval() {
    let mut cycle = Cycle::new(10, 5, 1);
    cycle.engine.start(&mut cycle.overlays).unwrap();
    cycle.ticks(4);
    cycle.engine.stop();
    cycle.engine.start(&mut cycle.overlays).unwrap();

    assert_eq!(cycle.engine.state().remaining_seconds, 10);
}

#[test]
fn test_change_interval_mid_pause() {
    let dir = tempfile::tempdir().unwrap();
    let store = IntervalStore::new(dir.path().join("timer-config.json"));
    let mut cycle = Cycle::new(1, 300, 1);
    cycle.engine.start(&mut cycle.overlays).unwrap();
    cycle.tick();

    cycle
        .engine
        .change_interval(120, &store, &mut cycle.overlays)
        .unwrap();

    let state = cycle.engine.state();
    assert_eq!(state.phase, TimerPhase::Working);
    assert_eq!(state.remaining_seconds, 120);
    assert_eq!(cycle.overlays.small.visible_count(), 1);
}

// ============================================================================
// Degraded Displays
// ============================================================================

#[test]
fn test_zero_displays() {
    let mut cycle = Cycle::new(2, 1, 0);
    assert!(cycle.overlays.small.is_empty());
    assert!(cycle.overlays.large.is_empty());

    cycle.engine.start(&mut cycle.overlays).unwrap();
    cycle.ticks(3);

    assert_eq!(cycle.engine.state().phase, TimerPhase::Working);
    assert!(cycle.factory.journal().entries().is_empty());
}

#[test]
fn test_failed_window_creation_skips_display() {
    let factory = MockOverlayFactory::new().failing_on_display(1);
    let mut cycle = Cycle::with_factory(2, 1, 3, factory);

    assert_eq!(cycle.overlays.small.len(), 2);
    assert_eq!(cycle.overlays.large.len(), 2);

    cycle.engine.start(&mut cycle.overlays).unwrap();
    assert_eq!(cycle.overlays.small.visible_count(), 2);
}

#[test]
fn test_failing_overlay_does_not_block_others() {
    let factory = MockOverlayFactory::new().failing_updates_on_display(0);
    let mut cycle = Cycle::with_factory(3, 2, 2, factory);
    cycle.engine.start(&mut cycle.overlays).unwrap();
    cycle.ticks(2);

    let received: Vec<Vec<u32>> = cycle
        .overlays
        .small
        .iter()
        .map(|s| s.received().to_vec())
        .collect();
    assert_eq!(received, vec![vec![], vec![3, 2, 1]]);
}

// ============================================================================
// Tokio Ticks
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_tokio_ticks_drive_full_cycle() {
    let (tick_tx, mut tick_rx) = mpsc::unbounded_channel::<u64>();
    let ticks = TokioTickSource::new(tokio::runtime::Handle::current(), move |generation: u64| {
        tick_tx.send(generation).is_ok()
    });

    let mut factory = MockOverlayFactory::new();
    let mut overlays = OverlayWindows::build(&displays(1), &mut factory);
    let (event_tx, _event_rx) = mpsc::unbounded_channel();
    let mut engine = TimerEngine::new(WorkInterval::from_secs(3).unwrap(), ticks, event_tx)
        .with_pause_duration(2);

    engine.start(&mut overlays).unwrap();

    let mut applied = 0;
    while applied < 5 {
        let generation = tick_rx.recv().await.unwrap();
        if engine.tick(generation, &mut overlays) {
            applied += 1;
        }
    }

    assert_eq!(
        factory.journal().broadcasts(OverlayKind::Small, 1),
        vec![3, 2, 1, 3]
    );
    assert_eq!(factory.journal().broadcasts(OverlayKind::Large, 1), vec![2, 1]);
    assert_eq!(engine.state().phase, TimerPhase::Working);

    engine.stop();
}
