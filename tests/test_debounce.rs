//! Integration tests for the event debouncer.
//!
//! Tests cover:
//! - Minimum consecutive frames before an episode is confirmed
//! - Minimum spacing between confirmed episodes
//! - Suppressed ticks not counting towards the next episode
//! - Rejection of invalid configuration

mod common;

use common::*;
use time::Duration;

/// Feed `(motion, ms)` pairs, returning the emitted events
fn feed(debouncer: &mut EventDebouncer, ticks: &[(bool, i64)]) -> Vec<MotionEvent> {
    ticks
        .iter()
        .filter_map(|&(motion, ms)| debouncer.update(motion, at_millis(ms)))
        .collect()
}

/// `len` positive ticks starting at `start_ms`, `step_ms` apart
fn positive_run(start_ms: i64, step_ms: i64, len: usize) -> Vec<(bool, i64)> {
    (0..len).map(|i| (true, start_ms + i as i64 * step_ms)).collect()
}

#[test]
fn test_short_run_emits_nothing() -> anyhow::Result<()> {
    let mut debouncer = EventDebouncer::new(5, Duration::seconds(3))?;

    let events = feed(&mut debouncer, &positive_run(0, 100, 4));

    assert!(events.is_empty());
    assert_eq!(debouncer.consecutive_motion_count(), 4);
    assert_eq!(debouncer.state(), DebounceState::Pending);
    Ok(())
}

#[test]
fn test_full_run_emits_once_at_threshold() -> anyhow::Result<()> {
    let mut debouncer = EventDebouncer::new(5, Duration::seconds(3))?;

    let mut emitted_at = Vec::new();
    for (i, (motion, ms)) in positive_run(0, 100, 12).into_iter().enumerate() {
        if debouncer.update(motion, at_millis(ms)).is_some() {
            emitted_at.push(i + 1);
        }
    }

    assert_eq!(emitted_at, vec![5]);
    assert_eq!(debouncer.last_event_timestamp(), Some(at_millis(400)));
    assert_eq!(debouncer.state(), DebounceState::Active);
    Ok(())
}

#[test]
fn test_event_is_active_and_carries_tick_timestamp() -> anyhow::Result<()> {
    let mut debouncer = EventDebouncer::new(1, Duration::ZERO)?;

    let event = debouncer.update(true, at_millis(1234));

    assert_eq!(
        event,
        Some(MotionEvent {
            timestamp: at_millis(1234),
            status: MotionStatus::Active,
        })
    );
    Ok(())
}

#[test]
fn test_negative_tick_resets_the_run() -> anyhow::Result<()> {
    let mut debouncer = EventDebouncer::new(4, Duration::seconds(3))?;

    let mut ticks = positive_run(0, 100, 3);
    ticks.push((false, 300));
    ticks.extend(positive_run(400, 100, 3));

    let events = feed(&mut debouncer, &ticks);

    assert!(events.is_empty(), "interrupted runs must not add up");
    assert_eq!(debouncer.consecutive_motion_count(), 3);
    Ok(())
}

#[test]
fn test_quiescent_after_negative_tick() -> anyhow::Result<()> {
    let mut debouncer = EventDebouncer::new(2, Duration::ZERO)?;

    assert_eq!(debouncer.state(), DebounceState::Quiescent);
    debouncer.update(true, at_millis(0));
    assert_eq!(debouncer.state(), DebounceState::Pending);
    assert!(debouncer.update(true, at_millis(100)).is_some());
    assert_eq!(debouncer.state(), DebounceState::Active);

    // leaving an episode does not emit anything
    assert!(debouncer.update(false, at_millis(200)).is_none());
    assert_eq!(debouncer.state(), DebounceState::Quiescent);
    assert_eq!(debouncer.consecutive_motion_count(), 0);
    Ok(())
}

#[test]
fn test_active_episode_stays_active_while_reaffirming() -> anyhow::Result<()> {
    let mut debouncer = EventDebouncer::new(3, Duration::ZERO)?;

    let events = feed(&mut debouncer, &positive_run(0, 100, 4));

    assert_eq!(events.len(), 1);
    assert_eq!(debouncer.consecutive_motion_count(), 1);
    assert_eq!(debouncer.state(), DebounceState::Active);
    assert_eq!(debouncer.state().status(), MotionStatus::Active);
    Ok(())
}

#[test]
fn test_events_respect_minimum_spacing() -> anyhow::Result<()> {
    let interval = Duration::seconds(3);
    let mut debouncer = EventDebouncer::new(2, interval)?;

    // 20 seconds of continuous motion at 10 fps
    let events = feed(&mut debouncer, &positive_run(0, 100, 200));

    assert!(events.len() >= 5, "expected repeated episodes, got {}", events.len());
    for pair in events.windows(2) {
        assert!(pair[1].timestamp - pair[0].timestamp >= interval);
    }
    Ok(())
}

#[test]
fn test_suppressed_ticks_do_not_count() -> anyhow::Result<()> {
    let mut debouncer = EventDebouncer::new(3, Duration::seconds(1))?;

    let events = feed(&mut debouncer, &positive_run(0, 100, 20));

    // first episode at 200ms; ticks before 1200ms are ignored, so the
    // second needs three fresh ticks: 1200, 1300, 1400
    let timestamps: Vec<_> = events.iter().map(|e| e.timestamp).collect();
    assert_eq!(timestamps, vec![at_millis(200), at_millis(1400)]);
    Ok(())
}

#[test]
fn test_suppression_keeps_state() -> anyhow::Result<()> {
    let mut debouncer = EventDebouncer::new(1, Duration::seconds(10))?;

    assert!(debouncer.update(true, at_millis(0)).is_some());
    assert!(debouncer.update(true, at_millis(500)).is_none());

    assert_eq!(debouncer.state(), DebounceState::Active);
    assert_eq!(debouncer.consecutive_motion_count(), 0);
    Ok(())
}

#[test]
fn test_zero_spacing_allows_back_to_back_episodes() -> anyhow::Result<()> {
    let mut debouncer = EventDebouncer::new(2, Duration::ZERO)?;

    let events = feed(&mut debouncer, &positive_run(0, 100, 6));

    assert_eq!(events.len(), 3);
    Ok(())
}

#[test]
fn test_reference_scenario_motion_sequence() -> anyhow::Result<()> {
    let mut debouncer = EventDebouncer::from_config(&scenario_config())?;

    // warm-up tick, 10 positive ticks, 5 quiet ticks
    let mut flags = vec![false];
    flags.extend([true; 10]);
    flags.extend([false; 5]);

    let mut emitted_at = Vec::new();
    for (i, motion) in flags.into_iter().enumerate() {
        let tick = i + 1;
        if let Some(event) = debouncer.update(motion, at_millis(i as i64 * 100)) {
            assert_eq!(event.status, MotionStatus::Active);
            emitted_at.push(tick);
        }
        if tick > 11 {
            assert_eq!(debouncer.consecutive_motion_count(), 0);
        }
    }

    assert_eq!(emitted_at, vec![9]);
    Ok(())
}

#[test]
fn test_invalid_configuration_is_rejected() {
    let err = EventDebouncer::new(0, Duration::seconds(1)).unwrap_err();
    assert!(matches!(err, MotionError::Configuration(_)));

    let err = EventDebouncer::new(3, Duration::seconds(-1)).unwrap_err();
    assert!(matches!(err, MotionError::Configuration(_)));
    assert!(!err.is_recoverable());
}
