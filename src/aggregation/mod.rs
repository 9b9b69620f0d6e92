// ABOUTME: Workout finalization computing per-segment speed and summary metrics
// ABOUTME: Assigns sample identities and applies metrics to the workout envelope
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Aggregation
//!
//! Runs once a recording is stopped. Given the ordered samples and the
//! workout envelope with its final duration, the aggregator derives:
//!
//! - per-sample speed from adjacent coordinates and relative times
//! - relative elevation per sample plus total ascent and descent
//! - length, average speed, average pace, top speed and calories
//! - workout and sample identifiers
//!
//! Finalizing the same input twice yields identical metrics.

/// Calorie formula interface and default implementation
pub mod calories;
/// Three-point speed smoothing finishing pass
pub mod smoothing;

pub use calories::{CalorieFormula, MetCalorieFormula};
pub use smoothing::{load_smoothed_samples, smooth_speeds};

use std::sync::Arc;
use tracing::debug;
use workout_core::constants::units;
use workout_core::models::{Workout, WorkoutSample, WorkoutType};

use crate::clock::Clock;
use crate::config::UserSettings;

/// Summary metrics of a finalized workout
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutMetrics {
    /// Track length in whole meters
    pub length: u32,
    /// Average speed in m/s
    pub avg_speed: f64,
    /// Average pace in minutes per kilometer
    pub avg_pace: f64,
    /// Highest per-sample speed in m/s
    pub top_speed: f64,
    /// Estimated energy expenditure in kcal
    pub calorie: u32,
    /// Accumulated elevation gain in meters
    pub ascent: f64,
    /// Accumulated elevation loss in meters
    pub descent: f64,
}

impl WorkoutMetrics {
    /// Copy the metrics into the workout envelope
    pub fn apply_to(&self, workout: &mut Workout) {
        workout.length = self.length;
        workout.avg_speed = self.avg_speed;
        workout.avg_pace = self.avg_pace;
        workout.top_speed = self.top_speed;
        workout.calorie = self.calorie;
        workout.ascent = self.ascent;
        workout.descent = self.descent;
    }
}

/// Speed over one segment, in m/s
///
/// A zero time delta has no defined speed; it is reported as `0.0` so a
/// duplicated timestamp can never produce an infinite top speed.
#[must_use]
pub fn segment_speed(distance_m: f64, delta_ms: i64) -> f64 {
    if delta_ms == 0 {
        return 0.0;
    }
    (distance_m / (delta_ms as f64 / units::MS_PER_SECOND)).abs()
}

/// Average speed in m/s, `0.0` when no active time elapsed
#[must_use]
pub fn average_speed(length_m: f64, duration_ms: i64) -> f64 {
    if duration_ms <= 0 {
        return 0.0;
    }
    length_m / (duration_ms as f64 / units::MS_PER_SECOND)
}

/// Average pace in minutes per kilometer, `0.0` when no distance was covered
#[must_use]
pub fn average_pace(length_m: f64, duration_ms: i64) -> f64 {
    if length_m <= 0.0 {
        return 0.0;
    }
    (duration_ms as f64 / units::MS_PER_MINUTE) / (length_m / units::METERS_PER_KM)
}

/// Tag every sample with the workout id and a unique id derived from its
/// 1-based position
pub fn assign_identifiers(workout_id: i64, workout: &mut Workout, samples: &mut [WorkoutSample]) {
    workout.id = workout_id;
    for (position, sample) in (1_i64..).zip(samples.iter_mut()) {
        sample.id = workout_id + position;
        sample.workout_id = workout_id;
    }
}

/// Finalization step turning a stopped recording into a stored workout
#[derive(Clone)]
pub struct WorkoutAggregator {
    calorie_formula: Arc<dyn CalorieFormula>,
    settings: Arc<dyn UserSettings>,
    clock: Arc<dyn Clock>,
}

impl WorkoutAggregator {
    /// Create an aggregator
    #[must_use]
    pub fn new(
        calorie_formula: Arc<dyn CalorieFormula>,
        settings: Arc<dyn UserSettings>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            calorie_formula,
            settings,
            clock,
        }
    }

    /// Calorie estimate using the weight configured right now
    #[must_use]
    pub fn estimate_calories(
        &self,
        workout_type: WorkoutType,
        duration_ms: i64,
        length_m: f64,
    ) -> u32 {
        let weight_kg = self.settings.weight_kg();
        self.calorie_formula
            .calories(workout_type, duration_ms, length_m, weight_kg)
    }

    /// Compute per-sample speeds and elevation deltas, and the summary
    /// metrics, without touching identifiers
    pub fn compute_metrics(
        &self,
        workout: &Workout,
        samples: &mut [WorkoutSample],
    ) -> WorkoutMetrics {
        let mut length = 0.0;
        let mut ascent = 0.0;
        let mut descent = 0.0;

        for i in 1..samples.len() {
            let (head, tail) = samples.split_at_mut(i);
            let previous = &head[i - 1];
            let current = &mut tail[0];

            let distance = previous.distance_to(current);
            length += distance;
            current.speed = segment_speed(distance, current.relative_time - previous.relative_time);

            let climb = current.elevation - previous.elevation;
            current.relative_elevation = climb;
            if climb > 0.0 {
                ascent += climb;
            } else {
                descent -= climb;
            }
        }
        if let Some(first) = samples.first_mut() {
            first.relative_elevation = 0.0;
        }

        let length = length as u32;
        let length_m = f64::from(length);
        let top_speed = samples.iter().map(|s| s.speed).fold(0.0, f64::max);

        WorkoutMetrics {
            length,
            avg_speed: average_speed(length_m, workout.duration),
            avg_pace: average_pace(length_m, workout.duration),
            top_speed,
            calorie: self.estimate_calories(workout.workout_type, workout.duration, length_m),
            ascent,
            descent,
        }
    }

    /// Compute metrics, apply them to the envelope and assign identifiers.
    ///
    /// The workout id is the clock's current epoch millisecond.
    pub fn finalize(&self, workout: &mut Workout, samples: &mut [WorkoutSample]) -> WorkoutMetrics {
        let metrics = self.compute_metrics(workout, samples);
        metrics.apply_to(workout);
        assign_identifiers(self.clock.now_millis(), workout, samples);
        debug!(
            workout.id = workout.id,
            workout.length = metrics.length,
            workout.top_speed = metrics.top_speed,
            samples = samples.len(),
            "Workout finalized"
        );
        metrics
    }
}
