// ABOUTME: Offline replay of a recorded location track through a workout recorder
// ABOUTME: Drives a manual clock from fix timestamps so auto-pause behaves as it would live
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Track replay
//!
//! Loads a JSON array of location fixes and feeds it through a
//! [`WorkoutRecorder`] wired to an in-memory store. The clock follows the fix
//! timestamps and the pause watchdog is polled at every interval boundary
//! between two fixes, so gaps in the track produce the same auto-pauses a
//! live recording would.

use serde::Serialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};
use workout_core::errors::{AppError, AppResult};
use workout_core::models::{LocationFix, Workout, WorkoutSample, WorkoutType};

use crate::aggregation::load_smoothed_samples;
use crate::clock::{Clock, ManualClock};
use crate::config::{RecorderConfig, UserSettings};
use crate::location::LocationHub;
use crate::recording::{FixOutcome, RecorderContext, WatchdogAction, WorkoutRecorder};
use crate::storage::{InMemoryWorkoutStore, WorkoutStore};

/// How a track is replayed
#[derive(Debug, Clone)]
pub struct ReplayOptions {
    /// Activity of the track
    pub workout_type: WorkoutType,
    /// Fill `smoothed_speed` on the stored samples
    pub smooth: bool,
    /// Recorder thresholds; the background watchdog is always disabled
    pub config: RecorderConfig,
}

impl ReplayOptions {
    /// Options for `workout_type` with default thresholds and no smoothing
    #[must_use]
    pub fn new(workout_type: WorkoutType) -> Self {
        Self {
            workout_type,
            smooth: false,
            config: RecorderConfig::default(),
        }
    }
}

/// Per-fix and per-poll counters of one replay
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplayCounters {
    /// Fixes read from the track
    pub fixes: usize,
    /// Fixes recorded as samples
    pub appended: usize,
    /// Fixes dropped by the noise filter
    pub rejected: usize,
    /// Fixes older than the last sample
    pub stale: usize,
    /// Fixes that only refreshed liveness
    pub refreshed: usize,
    /// Watchdog polls that paused the recording
    pub auto_pauses: usize,
    /// Watchdog polls that resumed the recording
    pub auto_resumes: usize,
}

impl ReplayCounters {
    fn record_fix(&mut self, outcome: FixOutcome) {
        self.fixes += 1;
        match outcome {
            FixOutcome::Appended => self.appended += 1,
            FixOutcome::Rejected => self.rejected += 1,
            FixOutcome::Stale => self.stale += 1,
            FixOutcome::Refreshed => self.refreshed += 1,
            FixOutcome::Ignored => {}
        }
    }

    fn record_poll(&mut self, action: WatchdogAction) {
        match action {
            WatchdogAction::AutoPaused => self.auto_pauses += 1,
            WatchdogAction::AutoResumed => self.auto_resumes += 1,
            WatchdogAction::Idle | WatchdogAction::Unchanged => {}
        }
    }
}

/// Saved workout and its stored samples
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    /// Finalized workout envelope
    pub workout: Workout,
    /// Samples as read back from the store
    pub samples: Vec<WorkoutSample>,
    /// What happened along the way
    pub counters: ReplayCounters,
}

/// Read a track file holding a JSON array of location fixes
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a fix array
pub fn load_track(path: &Path) -> AppResult<Vec<LocationFix>> {
    let raw = fs::read_to_string(path).map_err(|e| {
        AppError::invalid_input(format!("Cannot read track {}", path.display())).with_source(e)
    })?;
    let fixes: Vec<LocationFix> = serde_json::from_str(&raw).map_err(|e| {
        AppError::invalid_input(format!("Malformed track {}", path.display())).with_source(e)
    })?;
    debug!(path = %path.display(), fixes = fixes.len(), "Track loaded");
    Ok(fixes)
}

/// Replay `fixes` in order and save the resulting workout
///
/// # Errors
///
/// Returns an error if the track is empty or the recorder rejects a
/// lifecycle step
pub async fn replay_track(
    fixes: &[LocationFix],
    options: &ReplayOptions,
    settings: Arc<dyn UserSettings>,
) -> AppResult<ReplayReport> {
    let (Some(first), Some(last)) = (fixes.first(), fixes.last()) else {
        return Err(AppError::invalid_input("Track contains no location fixes"));
    };

    let clock = Arc::new(ManualClock::new(first.time));
    let store = Arc::new(InMemoryWorkoutStore::new());
    let context = RecorderContext::new(Arc::new(LocationHub::new()), store.clone())
        .with_clock(clock.clone())
        .with_settings(settings)
        .with_config(options.config.clone().without_watchdog());

    let recorder = WorkoutRecorder::new(options.workout_type, &context);
    recorder.start()?;

    let poll_every = (options.config.watchdog_interval.as_millis() as i64).max(1);
    let mut next_poll = first.time + poll_every;
    let mut counters = ReplayCounters::default();

    for fix in fixes {
        while next_poll <= fix.time {
            clock.set(next_poll);
            counters.record_poll(recorder.check_auto_pause()?);
            next_poll += poll_every;
        }
        if fix.time > clock.now_millis() {
            clock.set(fix.time);
        }
        counters.record_fix(recorder.on_location_change(fix));
    }

    if last.time > clock.now_millis() {
        clock.set(last.time);
    }
    recorder.stop()?;
    let workout = recorder.save().await?;

    let samples = if options.smooth {
        load_smoothed_samples(store.as_ref(), workout.id).await?
    } else {
        store.get_samples(workout.id).await?
    };

    info!(
        workout.id = workout.id,
        workout.kind = %workout.workout_type,
        workout.length = workout.length,
        fixes = counters.fixes,
        appended = counters.appended,
        auto_pauses = counters.auto_pauses,
        "Track replayed"
    );
    Ok(ReplayReport {
        workout,
        samples,
        counters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StaticUserSettings;

    #[tokio::test]
    async fn test_empty_track_is_rejected() {
        let result = replay_track(
            &[],
            &ReplayOptions::new(WorkoutType::Running),
            Arc::new(StaticUserSettings::default()),
        )
        .await;
        assert!(result.is_err());
    }
}
