// ABOUTME: Live workout recorder consuming location fixes under a lifecycle state machine
// ABOUTME: Noise filtering, start recalibration, auto-pause and save to the workout store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};
use uuid::Uuid;
use workout_core::constants::recording;
use workout_core::errors::RecordingError;
use workout_core::models::{
    LocationFix, RecorderCommand, RecordingState, Transition, Workout, WorkoutSample, WorkoutType,
};

use super::samples::SampleBuffer;
use super::timeline::Timeline;
use super::watchdog;
use crate::aggregation::{average_speed, CalorieFormula, MetCalorieFormula, WorkoutAggregator};
use crate::clock::{Clock, SystemClock};
use crate::config::{EnvUserSettings, RecorderConfig, UserSettings};
use crate::location::{LocationListener, LocationSource};
use crate::storage::WorkoutStore;

/// Collaborators shared by every recorder of an application
#[derive(Clone)]
pub struct RecorderContext {
    /// Wall clock for lifecycle and watchdog timing
    pub clock: Arc<dyn Clock>,
    /// Producer of location fixes
    pub location_source: Arc<dyn LocationSource>,
    /// Destination of saved workouts
    pub store: Arc<dyn WorkoutStore>,
    /// Body weight source for calorie estimates
    pub settings: Arc<dyn UserSettings>,
    /// Calorie estimate used live and at finalization
    pub calorie_formula: Arc<dyn CalorieFormula>,
    /// Thresholds and watchdog timing
    pub config: RecorderConfig,
}

impl RecorderContext {
    /// Context with the system clock, environment-backed settings, the MET
    /// calorie formula and default thresholds
    #[must_use]
    pub fn new(location_source: Arc<dyn LocationSource>, store: Arc<dyn WorkoutStore>) -> Self {
        Self {
            clock: Arc::new(SystemClock),
            location_source,
            store,
            settings: Arc::new(EnvUserSettings),
            calorie_formula: Arc::new(MetCalorieFormula),
            config: RecorderConfig::default(),
        }
    }

    /// Replace the clock
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the user settings source
    #[must_use]
    pub fn with_settings(mut self, settings: Arc<dyn UserSettings>) -> Self {
        self.settings = settings;
        self
    }

    /// Replace the calorie formula
    #[must_use]
    pub fn with_calorie_formula(mut self, calorie_formula: Arc<dyn CalorieFormula>) -> Self {
        self.calorie_formula = calorie_formula;
        self
    }

    /// Replace the recorder configuration
    #[must_use]
    pub fn with_config(mut self, config: RecorderConfig) -> Self {
        self.config = config;
        self
    }

    /// Aggregator built from this context's collaborators
    #[must_use]
    pub fn aggregator(&self) -> WorkoutAggregator {
        WorkoutAggregator::new(
            Arc::clone(&self.calorie_formula),
            Arc::clone(&self.settings),
            Arc::clone(&self.clock),
        )
    }
}

/// What the recorder did with one location fix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixOutcome {
    /// Recorder is not running or paused
    Ignored,
    /// Fix is not newer than the last recorded sample
    Stale,
    /// Fix is too close in both time and distance to the last sample
    Rejected,
    /// Fix refreshed liveness but was not recorded (paused, or before start)
    Refreshed,
    /// Fix became a new sample
    Appended,
}

/// Result of one pause watchdog poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchdogAction {
    /// Too few samples to judge liveness
    Idle,
    /// Nothing to do
    Unchanged,
    /// Fixes stopped arriving, the recording was paused
    AutoPaused,
    /// Fixes arrive again, the recording was resumed
    AutoResumed,
}

/// Point-in-time view of a recording in progress
#[derive(Debug, Clone, PartialEq)]
pub struct LiveMetrics {
    /// Lifecycle state
    pub state: RecordingState,
    /// Number of recorded samples
    pub samples: usize,
    /// Accumulated distance in whole meters
    pub distance: u32,
    /// Active milliseconds
    pub duration_ms: i64,
    /// Paused milliseconds
    pub pause_duration_ms: i64,
    /// Average speed in m/s over active time
    pub avg_speed: f64,
    /// Calorie estimate so far
    pub calories: u32,
}

/// State shared between the recorder handle, the location source and the
/// watchdog task
pub struct RecorderInner {
    pub id: Uuid,
    workout_type: WorkoutType,
    config: RecorderConfig,
    clock: Arc<dyn Clock>,
    // Lock order: timeline, then samples
    timeline: Mutex<Timeline>,
    samples: SampleBuffer,
}

impl RecorderInner {
    fn lock_timeline(&self) -> MutexGuard<'_, Timeline> {
        self.timeline.lock().unwrap_or_else(|poisoned| {
            warn!(recorder.id = %self.id, "Recorder timeline lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Apply a lifecycle command; the clock is read under the timeline lock
    fn apply(&self, command: RecorderCommand) -> Result<Transition, RecordingError> {
        let mut timeline = self.lock_timeline();
        let now = self.clock.now_millis();
        timeline.apply(command, now)
    }

    pub fn is_active(&self) -> bool {
        self.lock_timeline().state.is_active()
    }

    fn handle_fix(&self, fix: &LocationFix) -> FixOutcome {
        let mut timeline = self.lock_timeline();
        let now = self.clock.now_millis();
        if !timeline.state.is_active() {
            return FixOutcome::Ignored;
        }
        let min_distance = self.workout_type.min_distance_m();
        let noise_gate = self.config.noise_time_gate_ms();

        self.samples.with_samples(|samples| {
            let mut increment = 0.0;
            if let Some(last) = samples.last() {
                let gap = fix.time - last.absolute_time;
                if gap <= 0 {
                    debug!(
                        recorder.id = %self.id,
                        fix_time = fix.time,
                        "Dropping out-of-order location fix"
                    );
                    return FixOutcome::Stale;
                }
                increment = fix.distance_to(last.lat, last.lon);
                if increment < min_distance && gap < noise_gate {
                    trace!(
                        recorder.id = %self.id,
                        increment,
                        gap,
                        "Location fix filtered as noise"
                    );
                    return FixOutcome::Rejected;
                }
            }

            timeline.last_fix_accepted = now;
            if timeline.state != RecordingState::Running || fix.time < timeline.workout.start {
                return FixOutcome::Refreshed;
            }

            timeline.appended_fixes += 1;
            if timeline.appended_fixes == recording::RECALIBRATION_FIX {
                debug!(
                    recorder.id = %self.id,
                    start = fix.time,
                    "Recalibrating workout start on the location timebase"
                );
                timeline.recalibrate(fix.time, now);
                samples.clear();
                increment = 0.0;
            }

            timeline.distance += increment;
            let relative_time = timeline.relative_time(fix.time);
            samples.push(WorkoutSample::from_fix(fix, relative_time));
            FixOutcome::Appended
        })
    }

    pub fn check_auto_pause(&self) -> Result<WatchdogAction, RecordingError> {
        if self.samples.len() < self.config.watchdog_min_samples {
            return Ok(WatchdogAction::Idle);
        }
        let threshold = self.config.pause_threshold_ms();
        let mut timeline = self.lock_timeline();
        let now = self.clock.now_millis();
        let silent_for = now - timeline.last_fix_accepted;
        let state = timeline.state;
        let action = match state {
            RecordingState::Running if silent_for > threshold => {
                timeline.apply(RecorderCommand::Pause, now)?;
                WatchdogAction::AutoPaused
            }
            RecordingState::Paused if silent_for <= threshold => {
                timeline.apply(RecorderCommand::Resume, now)?;
                WatchdogAction::AutoResumed
            }
            _ => WatchdogAction::Unchanged,
        };
        drop(timeline);

        match action {
            WatchdogAction::AutoPaused => {
                info!(
                    recorder.id = %self.id,
                    silent_for,
                    "No location fix received, recording auto-paused"
                );
            }
            WatchdogAction::AutoResumed => {
                info!(recorder.id = %self.id, "Location fixes resumed, recording auto-resumed");
            }
            WatchdogAction::Idle | WatchdogAction::Unchanged => {}
        }
        Ok(action)
    }
}

impl LocationListener for RecorderInner {
    fn on_location_change(&self, fix: &LocationFix) {
        let outcome = self.handle_fix(fix);
        trace!(recorder.id = %self.id, ?outcome, "Location fix handled");
    }
}

/// Records one workout from a stream of location fixes
///
/// Lifecycle: `Idle -> Running <-> Paused -> Stopped`, then a single
/// [`save`](Self::save). Fixes are accepted from any thread while the
/// recording is active; readers may query live metrics concurrently.
pub struct WorkoutRecorder {
    inner: Arc<RecorderInner>,
    location_source: Arc<dyn LocationSource>,
    store: Arc<dyn WorkoutStore>,
    aggregator: WorkoutAggregator,
    shutdown: Arc<Notify>,
    watchdog: Mutex<Option<JoinHandle<()>>>,
}

impl WorkoutRecorder {
    /// Create an idle recorder for `workout_type`
    #[must_use]
    pub fn new(workout_type: WorkoutType, context: &RecorderContext) -> Self {
        let inner = RecorderInner {
            id: Uuid::new_v4(),
            workout_type,
            config: context.config.clone(),
            clock: Arc::clone(&context.clock),
            timeline: Mutex::new(Timeline::new(workout_type)),
            samples: SampleBuffer::new(),
        };
        Self {
            inner: Arc::new(inner),
            location_source: Arc::clone(&context.location_source),
            store: Arc::clone(&context.store),
            aggregator: context.aggregator(),
            shutdown: Arc::new(Notify::new()),
            watchdog: Mutex::new(None),
        }
    }

    /// Identifier used to register with the location source
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// Activity being recorded
    #[must_use]
    pub fn workout_type(&self) -> WorkoutType {
        self.inner.workout_type
    }

    /// Current lifecycle state
    #[must_use]
    pub fn state(&self) -> RecordingState {
        self.inner.lock_timeline().state
    }

    /// True while running or paused
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.inner.is_active()
    }

    /// Start a new recording, or resume a paused one.
    ///
    /// Starting from idle registers with the location source and launches the
    /// pause watchdog. Starting while running is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`RecordingError::InvalidState`] once the recording is stopped
    pub fn start(&self) -> Result<(), RecordingError> {
        let transition = self.inner.apply(RecorderCommand::Start)?;
        match transition {
            Transition::Begin => {
                info!(
                    recorder.id = %self.inner.id,
                    workout.kind = %self.inner.workout_type,
                    "Recording started"
                );
                let listener: Arc<dyn LocationListener> = self.inner.clone();
                self.location_source.register(self.inner.id, listener);
                if self.inner.config.spawn_watchdog {
                    self.spawn_watchdog();
                }
            }
            Transition::Resume => info!(recorder.id = %self.inner.id, "Recording resumed"),
            Transition::Pause | Transition::Stop | Transition::Unchanged => {}
        }
        Ok(())
    }

    /// Pause a running recording; a no-op in any other state
    pub fn pause(&self) {
        if let Ok(Transition::Pause) = self.inner.apply(RecorderCommand::Pause) {
            info!(recorder.id = %self.inner.id, "Recording paused");
        }
    }

    /// Stop the recording, closing the open running or paused interval.
    ///
    /// Unregisters from the location source and ends the watchdog.
    ///
    /// # Errors
    ///
    /// Returns [`RecordingError::InvalidState`] if the recording never
    /// started or is already stopped
    pub fn stop(&self) -> Result<(), RecordingError> {
        let (duration, pause_duration) = {
            let mut timeline = self.inner.lock_timeline();
            timeline.apply(RecorderCommand::Stop, self.inner.clock.now_millis())?;
            (timeline.workout.duration, timeline.workout.pause_duration)
        };
        self.location_source.unregister(self.inner.id);
        self.shutdown.notify_one();
        info!(
            recorder.id = %self.inner.id,
            duration_ms = duration,
            pause_duration_ms = pause_duration,
            samples = self.inner.samples.len(),
            "Recording stopped"
        );
        Ok(())
    }

    /// Finalize the stopped recording and hand it to the workout store.
    ///
    /// The sample buffer is moved out, so a successful save can happen only
    /// once. A store failure puts the samples back and the save may be retried.
    ///
    /// # Errors
    ///
    /// - [`RecordingError::InvalidState`] if the recording is not stopped
    /// - [`RecordingError::AlreadySaved`] on a second save
    /// - [`RecordingError::Storage`] if the store rejects the workout
    pub async fn save(&self) -> Result<Workout, RecordingError> {
        let (mut workout, mut samples) = {
            let mut timeline = self.inner.lock_timeline();
            timeline.state.ensure_saveable()?;
            if timeline.saved {
                return Err(RecordingError::AlreadySaved);
            }
            timeline.saved = true;
            (timeline.workout.clone(), self.inner.samples.take())
        };

        self.aggregator.finalize(&mut workout, &mut samples);

        if let Err(e) = self
            .store
            .insert_workout_and_samples(&workout, &samples)
            .await
        {
            warn!(
                recorder.id = %self.inner.id,
                workout.id = workout.id,
                error = %e,
                "Failed to store workout"
            );
            self.inner.samples.restore(samples);
            self.inner.lock_timeline().saved = false;
            return Err(RecordingError::Storage(e));
        }

        info!(
            recorder.id = %self.inner.id,
            workout.id = workout.id,
            workout.length = workout.length,
            samples = samples.len(),
            "Workout saved"
        );
        Ok(workout)
    }

    /// Feed one location fix directly, bypassing the location source
    pub fn on_location_change(&self, fix: &LocationFix) -> FixOutcome {
        self.inner.handle_fix(fix)
    }

    /// Run one pause watchdog poll.
    ///
    /// Pauses a running recording when no fix was accepted within the pause
    /// threshold, and resumes a paused one once fixes arrive again.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting transition is rejected
    pub fn check_auto_pause(&self) -> Result<WatchdogAction, RecordingError> {
        self.inner.check_auto_pause()
    }

    /// Number of recorded samples
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.inner.samples.len()
    }

    /// Accumulated distance in whole meters
    #[must_use]
    pub fn distance(&self) -> u32 {
        self.inner.lock_timeline().distance as u32
    }

    /// Active milliseconds, including the running interval in progress
    #[must_use]
    pub fn duration_ms(&self) -> i64 {
        let timeline = self.inner.lock_timeline();
        timeline.duration_ms(self.inner.clock.now_millis())
    }

    /// Paused milliseconds, including the pause in progress
    #[must_use]
    pub fn pause_duration_ms(&self) -> i64 {
        let timeline = self.inner.lock_timeline();
        timeline.pause_duration_ms(self.inner.clock.now_millis())
    }

    /// Average speed so far in m/s
    #[must_use]
    pub fn avg_speed(&self) -> f64 {
        self.live_metrics().avg_speed
    }

    /// Calorie estimate so far
    #[must_use]
    pub fn calories(&self) -> u32 {
        self.live_metrics().calories
    }

    /// Consistent snapshot of the live metrics
    #[must_use]
    pub fn live_metrics(&self) -> LiveMetrics {
        let timeline = self.inner.lock_timeline();
        let now = self.inner.clock.now_millis();
        let state = timeline.state;
        let distance = timeline.distance;
        let duration_ms = timeline.duration_ms(now);
        let pause_duration_ms = timeline.pause_duration_ms(now);
        let samples = self.inner.samples.len();
        drop(timeline);

        LiveMetrics {
            state,
            samples,
            distance: distance as u32,
            duration_ms,
            pause_duration_ms,
            avg_speed: average_speed(distance, duration_ms),
            calories: self.aggregator.estimate_calories(
                self.inner.workout_type,
                duration_ms,
                distance,
            ),
        }
    }

    /// Copy of the workout envelope
    #[must_use]
    pub fn workout(&self) -> Workout {
        self.inner.lock_timeline().workout.clone()
    }

    /// Copy of the recorded samples
    #[must_use]
    pub fn samples(&self) -> Vec<WorkoutSample> {
        self.inner.samples.snapshot()
    }

    /// Wait for the watchdog task to finish, if one was spawned
    pub async fn join_watchdog(&self) {
        let handle = self
            .watchdog
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!(recorder.id = %self.inner.id, error = %e, "Pause watchdog ended abnormally");
            }
        }
    }

    fn spawn_watchdog(&self) {
        let handle = watchdog::spawn(
            Arc::downgrade(&self.inner),
            Arc::clone(&self.shutdown),
            self.inner.config.watchdog_interval,
        );
        *self.watchdog.lock().unwrap_or_else(PoisonError::into_inner) = handle;
    }
}

impl Drop for WorkoutRecorder {
    fn drop(&mut self) {
        self.location_source.unregister(self.inner.id);
        self.shutdown.notify_one();
    }
}
