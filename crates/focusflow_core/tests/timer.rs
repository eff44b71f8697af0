use focusflow_core::{PomodoroTimer, TickOutcome, TimerMode, TimerSink, TimerSnapshot};
use std::time::Instant;

#[derive(Default)]
struct RecordingSink {
    snapshots: Vec<TimerSnapshot>,
    expired: Vec<TimerMode>,
}

impl TimerSink for RecordingSink {
    fn render_timer(&mut self, snapshot: &TimerSnapshot) {
        self.snapshots.push(snapshot.clone());
    }

    fn timer_expired(&mut self, mode: TimerMode) {
        self.expired.push(mode);
    }
}

fn advance<S: TimerSink>(timer: &mut PomodoroTimer<S>, ticks: u32) {
    for _ in 0..ticks {
        timer.tick();
    }
}

#[test]
fn new_timer_is_idle_pomodoro() {
    let timer = PomodoroTimer::new(RecordingSink::default());

    assert_eq!(timer.mode(), TimerMode::Pomodoro);
    assert_eq!(timer.remaining(), 1500);
    assert!(!timer.is_running());
    assert_eq!(timer.format_remaining(), "25:00");

    let first = &timer.sink().snapshots[0];
    assert_eq!(first.remaining_formatted, "25:00");
    assert_eq!(first.progress, 0.0);
    assert!(!first.running);
}

#[test]
fn short_mode_runs_out_then_resets_on_next_tick() {
    let mut timer = PomodoroTimer::new(RecordingSink::default());
    timer.set_mode(TimerMode::Short);
    timer.start();

    advance(&mut timer, 300);
    assert_eq!(timer.remaining(), 0);
    assert!(timer.is_running());
    assert!(timer.sink().expired.is_empty());

    assert_eq!(timer.tick(), TickOutcome::Expired);
    assert!(!timer.is_running());
    assert_eq!(timer.remaining(), 300);
    assert_eq!(timer.mode(), TimerMode::Short);
    assert_eq!(timer.sink().expired, vec![TimerMode::Short]);

    let last = timer.sink().snapshots.last().unwrap();
    assert_eq!(last.remaining_seconds, 300);
    assert!(!last.running);
}

#[test]
fn stop_then_start_resumes_from_same_remaining() {
    let mut timer = PomodoroTimer::new(RecordingSink::default());
    timer.start();
    advance(&mut timer, 10);
    assert_eq!(timer.remaining(), 1490);

    timer.stop();
    assert!(!timer.is_running());
    assert_eq!(timer.tick(), TickOutcome::Idle);
    assert_eq!(timer.remaining(), 1490);

    timer.start();
    assert_eq!(timer.tick(), TickOutcome::Advanced { remaining: 1489 });
}

#[test]
fn start_is_idempotent_and_keeps_single_tick() {
    let mut timer = PomodoroTimer::new(RecordingSink::default());
    let t0 = Instant::now();
    timer.start_at(t0);
    let due = timer.next_due();
    let renders = timer.sink().snapshots.len();

    timer.start_at(t0 + std::time::Duration::from_millis(400));

    assert_eq!(timer.next_due(), due);
    assert_eq!(timer.sink().snapshots.len(), renders);
}

#[test]
fn stop_when_idle_is_noop() {
    let mut timer = PomodoroTimer::new(RecordingSink::default());
    let renders = timer.sink().snapshots.len();
    timer.stop();
    assert_eq!(timer.sink().snapshots.len(), renders);
}

#[test]
fn toggle_alternates_running_state() {
    let mut timer = PomodoroTimer::new(RecordingSink::default());
    timer.toggle();
    assert!(timer.is_running());
    advance(&mut timer, 3);
    timer.toggle();
    assert!(!timer.is_running());
    assert_eq!(timer.remaining(), 1497);
}

#[test]
fn reset_restores_full_duration_from_any_state() {
    let mut timer = PomodoroTimer::new(RecordingSink::default());

    timer.reset();
    assert_eq!(timer.remaining(), 1500);
    assert!(!timer.is_running());

    timer.set_mode(TimerMode::Long);
    timer.start();
    advance(&mut timer, 42);
    timer.reset();
    assert_eq!(timer.remaining(), 900);
    assert!(!timer.is_running());
    assert_eq!(timer.next_due(), None);

    timer.start();
    advance(&mut timer, 5);
    timer.stop();
    timer.reset();
    assert_eq!(timer.remaining(), 900);
}

#[test]
fn set_mode_stops_and_resets() {
    let mut timer = PomodoroTimer::new(RecordingSink::default());
    timer.start();
    advance(&mut timer, 60);

    timer.set_mode(TimerMode::Short);

    assert!(!timer.is_running());
    assert_eq!(timer.remaining(), 300);
    let last = timer.sink().snapshots.last().unwrap();
    assert_eq!(last.mode, TimerMode::Short);
    assert_eq!(last.remaining_formatted, "05:00");
}

#[test]
fn each_tick_renders_remaining_and_progress() {
    let mut timer = PomodoroTimer::new(RecordingSink::default());
    timer.set_mode(TimerMode::Short);
    timer.start();
    let before = timer.sink().snapshots.len();

    advance(&mut timer, 30);

    let snapshots = &timer.sink().snapshots[before..];
    assert_eq!(snapshots.len(), 30);
    let last = snapshots.last().unwrap();
    assert_eq!(last.remaining_seconds, 270);
    assert_eq!(last.remaining_formatted, "04:30");
    assert!((last.progress - 0.1).abs() < 1e-9);
    assert!(last.running);
}

#[test]
fn remaining_never_leaves_mode_bounds() {
    let mut timer = PomodoroTimer::new(RecordingSink::default());
    for mode in TimerMode::ALL {
        timer.set_mode(mode);
        timer.start();
        for _ in 0..mode.total_seconds() + 5 {
            timer.tick();
            assert!(timer.remaining() <= mode.total_seconds());
        }
    }
    assert!(timer
        .sink()
        .snapshots
        .iter()
        .all(|snapshot| (0.0..=1.0).contains(&snapshot.progress)));
}
