// ABOUTME: Recorder state plus the active-time, pause-time and distance accumulators
// ABOUTME: Applies lifecycle transitions so no wall-clock interval is counted twice
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use workout_core::errors::RecordingError;
use workout_core::models::{RecorderCommand, RecordingState, Transition, Workout, WorkoutType};

/// Timing accumulators of one recording session
///
/// `active_ms` grows only while running and `pause_ms` only while paused.
/// All times are wall-clock epoch milliseconds from the recorder's clock,
/// except `workout.start` after recalibration, which is the fix time.
#[derive(Debug, Clone)]
pub struct Timeline {
    pub state: RecordingState,
    pub workout: Workout,
    active_ms: i64,
    pause_ms: i64,
    last_resume: i64,
    last_pause: Option<i64>,
    pub last_fix_accepted: i64,
    pub distance: f64,
    pub appended_fixes: u64,
    pub saved: bool,
}

impl Timeline {
    pub const fn new(workout_type: WorkoutType) -> Self {
        Self {
            state: RecordingState::Idle,
            workout: Workout::new(workout_type),
            active_ms: 0,
            pause_ms: 0,
            last_resume: 0,
            last_pause: None,
            last_fix_accepted: 0,
            distance: 0.0,
            appended_fixes: 0,
            saved: false,
        }
    }

    /// Apply a lifecycle command at wall-clock time `now`
    pub fn apply(
        &mut self,
        command: RecorderCommand,
        now: i64,
    ) -> Result<Transition, RecordingError> {
        let transition = self.state.apply(command)?;
        match transition {
            Transition::Begin => {
                self.workout.start = now;
                self.resume(now);
            }
            Transition::Resume => self.resume(now),
            Transition::Pause => self.pause(now),
            Transition::Stop => {
                // Resume-then-pause closes whichever interval is open
                if self.state == RecordingState::Paused {
                    self.resume(now);
                }
                self.pause(now);
                self.workout.end = now;
                self.workout.duration = self.active_ms;
                self.workout.pause_duration = self.pause_ms;
                self.state = RecordingState::Stopped;
            }
            Transition::Unchanged => {}
        }
        Ok(transition)
    }

    fn resume(&mut self, now: i64) {
        self.state = RecordingState::Running;
        self.last_resume = now;
        if let Some(paused_at) = self.last_pause {
            self.pause_ms += now - paused_at;
        }
        self.last_pause = None;
    }

    fn pause(&mut self, now: i64) {
        if self.state == RecordingState::Running {
            self.state = RecordingState::Paused;
            self.active_ms += now - self.last_resume;
            self.last_pause = Some(now);
        }
    }

    /// Forget everything accumulated so far and treat `fix_time` as the
    /// logical start of the workout
    pub fn recalibrate(&mut self, fix_time: i64, now: i64) {
        self.workout.start = fix_time;
        self.last_resume = now;
        self.last_pause = None;
        self.active_ms = 0;
        self.pause_ms = 0;
        self.distance = 0.0;
    }

    /// Pause-adjusted time of a fix relative to the logical start
    pub const fn relative_time(&self, fix_time: i64) -> i64 {
        fix_time - self.workout.start - self.pause_ms
    }

    /// Active milliseconds, including the running interval in progress
    pub const fn duration_ms(&self, now: i64) -> i64 {
        match self.state {
            RecordingState::Running => self.active_ms + (now - self.last_resume),
            _ => self.active_ms,
        }
    }

    /// Paused milliseconds, including the pause in progress
    pub fn pause_duration_ms(&self, now: i64) -> i64 {
        match (self.state, self.last_pause) {
            (RecordingState::Paused, Some(paused_at)) => self.pause_ms + (now - paused_at),
            _ => self.pause_ms,
        }
    }
}
