// ABOUTME: Integration tests for the workout recorder lifecycle and fix handling
// ABOUTME: Covers noise filtering, start recalibration, pause accounting and save semantics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, clippy::float_cmp)]

mod common;

use async_trait::async_trait;
use common::{north_of_origin, Harness, T0};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use workout_recorder::config::RecorderConfig;
use workout_recorder::errors::{AppError, AppResult, RecordingError};
use workout_recorder::models::{RecordingState, Workout, WorkoutSample, WorkoutType};
use workout_recorder::recording::{FixOutcome, RecorderContext, WatchdogAction, WorkoutRecorder};
use workout_recorder::storage::{InMemoryWorkoutStore, WorkoutStore};

#[tokio::test]
async fn test_end_to_end_run_through_location_hub() {
    let h = Harness::manual();
    let recorder = h.recorder(WorkoutType::Running);
    recorder.start().unwrap();
    assert_eq!(h.hub.listener_count(), 1);

    h.hub.publish(&north_of_origin(0.0, 0));
    h.at(2_000);
    h.hub.publish(&north_of_origin(20.0, 2_000));
    h.at(12_000);
    h.hub.publish(&north_of_origin(120.001, 12_000));

    recorder.stop().unwrap();
    assert_eq!(h.hub.listener_count(), 0);

    let workout = recorder.save().await.unwrap();
    assert_eq!(workout.id, T0 + 12_000);
    assert_eq!(workout.start, T0 + 2_000);
    assert_eq!(workout.end, T0 + 12_000);
    assert_eq!(workout.length, 100);
    assert_eq!(workout.duration, 10_000);
    assert_eq!(workout.pause_duration, 0);
    assert!((workout.avg_speed - 10.0).abs() < 1e-9);
    assert!((workout.avg_pace - 10.0 / 6.0).abs() < 1e-9);
    assert!((workout.top_speed - 10.0).abs() < 1e-3);
    assert_eq!(workout.calorie, 8);

    let samples = h.store.get_samples(workout.id).await.unwrap();
    assert_eq!(samples.len(), 2);
    assert_eq!(samples[0].relative_time, 0);
    assert_eq!(samples[1].relative_time, 10_000);
    assert_eq!(samples[0].id, workout.id + 1);
    assert_eq!(samples[1].id, workout.id + 2);
    assert!(samples.iter().all(|s| s.workout_id == workout.id));
}

#[test]
fn test_noise_filter_requires_both_short_gap_and_short_distance() {
    let h = Harness::manual();
    let recorder = h.recorder(WorkoutType::Running);
    recorder.start().unwrap();

    assert_eq!(
        recorder.on_location_change(&north_of_origin(0.0, 0)),
        FixOutcome::Appended
    );
    h.at(1_000);
    assert_eq!(
        recorder.on_location_change(&north_of_origin(10.0, 1_000)),
        FixOutcome::Appended
    );

    // 5 m in 200 ms
    h.at(1_200);
    assert_eq!(
        recorder.on_location_change(&north_of_origin(15.0, 1_200)),
        FixOutcome::Rejected
    );

    // 5 m but the gap reaches the gate
    h.at(1_500);
    assert_eq!(
        recorder.on_location_change(&north_of_origin(15.0, 1_500)),
        FixOutcome::Appended
    );

    // 100 ms but 10 m
    h.at(1_600);
    assert_eq!(
        recorder.on_location_change(&north_of_origin(25.0, 1_600)),
        FixOutcome::Appended
    );

    assert_eq!(recorder.sample_count(), 3);
}

#[test]
fn test_minimum_distance_depends_on_workout_type() {
    for (workout_type, expected) in [
        (WorkoutType::Running, FixOutcome::Appended),
        (WorkoutType::Hiking, FixOutcome::Appended),
        (WorkoutType::Other, FixOutcome::Appended),
        (WorkoutType::Cycling, FixOutcome::Rejected),
    ] {
        let h = Harness::manual();
        let recorder = h.recorder(workout_type);
        recorder.start().unwrap();
        recorder.on_location_change(&north_of_origin(0.0, 0));
        h.at(1_000);
        recorder.on_location_change(&north_of_origin(50.0, 1_000));

        h.at(1_100);
        let outcome = recorder.on_location_change(&north_of_origin(62.0, 1_100));
        assert_eq!(outcome, expected, "{workout_type}");
    }
}

#[test]
fn test_out_of_order_fixes_are_dropped() {
    let h = Harness::manual();
    let recorder = h.recorder(WorkoutType::Running);
    recorder.start().unwrap();
    recorder.on_location_change(&north_of_origin(0.0, 0));
    h.at(1_000);
    recorder.on_location_change(&north_of_origin(50.0, 1_000));

    assert_eq!(
        recorder.on_location_change(&north_of_origin(90.0, 1_000)),
        FixOutcome::Stale
    );
    assert_eq!(
        recorder.on_location_change(&north_of_origin(90.0, 400)),
        FixOutcome::Stale
    );
    assert_eq!(recorder.sample_count(), 1);
}

#[test]
fn test_fix_before_start_only_refreshes_liveness() {
    let h = Harness::manual();
    let recorder = h.recorder(WorkoutType::Running);
    recorder.start().unwrap();

    let outcome = recorder.on_location_change(&north_of_origin(0.0, -5_000));
    assert_eq!(outcome, FixOutcome::Refreshed);
    assert_eq!(recorder.sample_count(), 0);
}

#[test]
fn test_second_fix_recalibrates_start() {
    let h = Harness::manual();
    let recorder = h.recorder(WorkoutType::Hiking);
    recorder.start().unwrap();
    assert_eq!(recorder.workout().start, T0);

    recorder.on_location_change(&north_of_origin(0.0, 300));
    assert_eq!(recorder.sample_count(), 1);

    h.at(4_000);
    recorder.on_location_change(&north_of_origin(30.0, 3_500));
    assert_eq!(recorder.sample_count(), 1);
    assert_eq!(recorder.distance(), 0);
    assert_eq!(recorder.duration_ms(), 0);
    assert_eq!(recorder.workout().start, T0 + 3_500);

    let samples = recorder.samples();
    assert_eq!(samples[0].relative_time, 0);
    assert_eq!(samples[0].absolute_time, T0 + 3_500);

    // Later fixes are timed against the recalibrated start
    h.at(6_000);
    recorder.on_location_change(&north_of_origin(60.0, 5_500));
    assert_eq!(recorder.samples()[1].relative_time, 2_000);
    assert_eq!(recorder.duration_ms(), 2_000);
}

#[test]
fn test_manual_pause_excludes_time_and_fixes() {
    let h = Harness::manual();
    let recorder = h.recorder(WorkoutType::Running);
    recorder.start().unwrap();
    recorder.on_location_change(&north_of_origin(0.0, 0));
    h.at(1_000);
    recorder.on_location_change(&north_of_origin(20.0, 1_000));
    h.at(3_000);
    recorder.on_location_change(&north_of_origin(40.0, 3_000));

    recorder.pause();
    assert_eq!(recorder.state(), RecordingState::Paused);

    h.at(5_000);
    assert_eq!(
        recorder.on_location_change(&north_of_origin(60.0, 5_000)),
        FixOutcome::Refreshed
    );
    assert_eq!(recorder.sample_count(), 2);
    assert_eq!(recorder.pause_duration_ms(), 2_000);

    h.at(8_000);
    recorder.start().unwrap();
    assert_eq!(recorder.state(), RecordingState::Running);

    h.at(9_000);
    recorder.on_location_change(&north_of_origin(80.0, 9_000));
    let samples = recorder.samples();
    assert_eq!(samples.last().unwrap().relative_time, 3_000);

    let live = recorder.live_metrics();
    assert_eq!(live.duration_ms, 3_000);
    assert_eq!(live.pause_duration_ms, 5_000);
    assert!((59..=60).contains(&live.distance), "{}", live.distance);

    recorder.stop().unwrap();
    let workout = recorder.workout();
    assert_eq!(workout.duration, 3_000);
    assert_eq!(workout.pause_duration, 5_000);
    assert_eq!(
        workout.end - workout.start,
        workout.duration + workout.pause_duration
    );
}

#[test]
fn test_auto_pause_and_resume() {
    let h = Harness::manual();
    let recorder = h.recorder(WorkoutType::Running);
    recorder.start().unwrap();
    assert_eq!(recorder.check_auto_pause().unwrap(), WatchdogAction::Idle);

    for (i, meters) in [0.0, 20.0, 40.0, 60.0].into_iter().enumerate() {
        let offset = i as i64 * 1_000;
        h.at(offset);
        recorder.on_location_change(&north_of_origin(meters, offset));
    }
    assert_eq!(recorder.sample_count(), 3);

    // Exactly at the threshold nothing happens
    h.at(13_000);
    assert_eq!(
        recorder.check_auto_pause().unwrap(),
        WatchdogAction::Unchanged
    );

    h.at(13_001);
    assert_eq!(
        recorder.check_auto_pause().unwrap(),
        WatchdogAction::AutoPaused
    );
    assert_eq!(recorder.state(), RecordingState::Paused);
    assert_eq!(
        recorder.check_auto_pause().unwrap(),
        WatchdogAction::Unchanged
    );

    h.at(20_000);
    recorder.on_location_change(&north_of_origin(80.0, 20_000));
    assert_eq!(
        recorder.check_auto_pause().unwrap(),
        WatchdogAction::AutoResumed
    );
    assert_eq!(recorder.state(), RecordingState::Running);
    assert_eq!(recorder.pause_duration_ms(), 6_999);
}

#[test]
fn test_rejected_fix_does_not_refresh_liveness() {
    let h = Harness::manual();
    let recorder = h.recorder(WorkoutType::Running);
    recorder.start().unwrap();
    for (i, meters) in [0.0, 20.0, 40.0, 60.0].into_iter().enumerate() {
        let offset = i as i64 * 1_000;
        h.at(offset);
        recorder.on_location_change(&north_of_origin(meters, offset));
    }

    h.at(12_000);
    assert_eq!(
        recorder.on_location_change(&north_of_origin(61.0, 3_100)),
        FixOutcome::Rejected
    );
    h.at(13_001);
    assert_eq!(
        recorder.check_auto_pause().unwrap(),
        WatchdogAction::AutoPaused
    );
}

#[test]
fn test_fixes_are_ignored_outside_active_states() {
    let h = Harness::manual();
    let recorder = h.recorder(WorkoutType::Running);
    assert_eq!(
        recorder.on_location_change(&north_of_origin(0.0, 0)),
        FixOutcome::Ignored
    );

    recorder.start().unwrap();
    recorder.stop().unwrap();
    assert_eq!(
        recorder.on_location_change(&north_of_origin(0.0, 0)),
        FixOutcome::Ignored
    );
    assert_eq!(recorder.check_auto_pause().unwrap(), WatchdogAction::Idle);
}

#[test]
fn test_invalid_lifecycle_calls_leave_state_untouched() {
    let h = Harness::manual();
    let recorder = h.recorder(WorkoutType::Running);

    let err = recorder.stop().unwrap_err();
    assert!(matches!(
        err,
        RecordingError::InvalidState {
            operation: "stop",
            state: RecordingState::Idle
        }
    ));
    assert_eq!(recorder.state(), RecordingState::Idle);

    recorder.pause();
    assert_eq!(recorder.state(), RecordingState::Idle);

    recorder.start().unwrap();
    recorder.start().unwrap();
    assert_eq!(recorder.state(), RecordingState::Running);

    recorder.stop().unwrap();
    assert!(recorder.start().is_err());
    assert!(recorder.stop().is_err());
    assert_eq!(recorder.state(), RecordingState::Stopped);
}

#[tokio::test]
async fn test_save_requires_stopped_state() {
    let h = Harness::manual();
    let recorder = h.recorder(WorkoutType::Running);

    assert!(matches!(
        recorder.save().await,
        Err(RecordingError::InvalidState { .. })
    ));
    recorder.start().unwrap();
    recorder.on_location_change(&north_of_origin(0.0, 0));
    assert!(recorder.save().await.is_err());
    assert!(h.store.is_empty().await);
    assert_eq!(recorder.sample_count(), 1);
}

#[tokio::test]
async fn test_second_save_is_rejected() {
    let h = Harness::manual();
    let recorder = h.recorder(WorkoutType::Cycling);
    recorder.start().unwrap();
    h.at(1_000);
    recorder.stop().unwrap();

    let workout = recorder.save().await.unwrap();
    assert_eq!(workout.length, 0);
    assert!(matches!(recorder.save().await, Err(RecordingError::AlreadySaved)));
    assert_eq!(h.store.len().await, 1);
}

/// Store that fails until told otherwise
#[derive(Default)]
struct FlakyStore {
    healthy: AtomicBool,
    inner: InMemoryWorkoutStore,
}

#[async_trait]
impl WorkoutStore for FlakyStore {
    async fn insert_workout_and_samples(
        &self,
        workout: &Workout,
        samples: &[WorkoutSample],
    ) -> AppResult<()> {
        if !self.healthy.load(Ordering::SeqCst) {
            return Err(AppError::storage("disk full"));
        }
        self.inner
            .insert_workout_and_samples(workout, samples)
            .await
    }

    async fn get_workout(&self, id: i64) -> AppResult<Option<Workout>> {
        self.inner.get_workout(id).await
    }

    async fn get_samples(&self, workout_id: i64) -> AppResult<Vec<WorkoutSample>> {
        self.inner.get_samples(workout_id).await
    }

    async fn list_workouts(&self) -> AppResult<Vec<Workout>> {
        self.inner.list_workouts().await
    }
}

#[tokio::test]
async fn test_failed_save_can_be_retried() {
    let h = Harness::manual();
    let store = Arc::new(FlakyStore::default());
    let context = RecorderContext {
        store: store.clone(),
        ..h.context.clone()
    };
    let recorder = WorkoutRecorder::new(WorkoutType::Running, &context);
    recorder.start().unwrap();
    recorder.on_location_change(&north_of_origin(0.0, 0));
    h.at(1_000);
    recorder.on_location_change(&north_of_origin(20.0, 1_000));
    h.at(2_000);
    recorder.on_location_change(&north_of_origin(40.0, 2_000));
    recorder.stop().unwrap();

    assert!(matches!(recorder.save().await, Err(RecordingError::Storage(_))));
    assert_eq!(recorder.sample_count(), 2);

    store.healthy.store(true, Ordering::SeqCst);
    let workout = recorder.save().await.unwrap();
    assert_eq!(store.get_samples(workout.id).await.unwrap().len(), 2);
}

#[test]
fn test_weight_change_applies_to_live_calories() {
    let h = Harness::manual();
    let recorder = h.recorder(WorkoutType::Hiking);
    recorder.start().unwrap();
    h.at(3_600_000);

    // 6 MET x 3.5 x 80 / 200 x 60 min
    assert_eq!(recorder.calories(), 504);
    h.settings.set_weight_kg(100.0);
    assert_eq!(recorder.calories(), 630);
}

#[test]
fn test_readers_observe_consistent_samples_while_recording() {
    let h = Harness::with_config(RecorderConfig::default().without_watchdog());
    let recorder = Arc::new(h.recorder(WorkoutType::Running));
    recorder.start().unwrap();

    let producer = {
        let hub = Arc::clone(&h.hub);
        let clock = Arc::clone(&h.clock);
        thread::spawn(move || {
            for i in 0..200_i64 {
                clock.set(T0 + i * 1_000);
                hub.publish(&north_of_origin(i as f64 * 20.0, i * 1_000));
            }
        })
    };

    let readers: Vec<_> = (0..3)
        .map(|_| {
            let recorder = Arc::clone(&recorder);
            thread::spawn(move || {
                for _ in 0..200 {
                    let samples = recorder.samples();
                    assert!(samples
                        .windows(2)
                        .all(|pair| pair[0].relative_time < pair[1].relative_time));
                    let live = recorder.live_metrics();
                    assert!(live.duration_ms >= 0);
                }
            })
        })
        .collect();

    producer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    assert_eq!(recorder.sample_count(), 199);
    assert!((3_959..=3_960).contains(&recorder.distance()));
}
