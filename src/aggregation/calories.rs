// ABOUTME: Calorie formula interface and a MET-based default implementation
// ABOUTME: Pure function of workout type, active duration, distance and body weight
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use workout_core::constants::{physiology, units};
use workout_core::models::WorkoutType;

/// Energy expenditure estimate for a workout
pub trait CalorieFormula: Send + Sync {
    /// Estimated kcal for `duration_ms` of active time covering `length_m`
    fn calories(
        &self,
        workout_type: WorkoutType,
        duration_ms: i64,
        length_m: f64,
        weight_kg: f64,
    ) -> u32;
}

/// MET based estimate: `kcal = MET x 3.5 x weight / 200 x minutes`
///
/// Running MET scales with average speed (about one MET per km/h), cycling
/// follows a linear model above 10 km/h, hiking and other activities use a
/// flat MET.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetCalorieFormula;

impl MetCalorieFormula {
    /// MET for the given activity at `speed_kmh`
    #[must_use]
    pub fn met(workout_type: WorkoutType, speed_kmh: f64) -> f64 {
        match workout_type {
            WorkoutType::Running => {
                (speed_kmh * physiology::RUNNING_MET_PER_KMH).max(physiology::MIN_ACTIVE_MET)
            }
            WorkoutType::Cycling => ((speed_kmh - physiology::CYCLING_MET_BASE_KMH)
                / physiology::CYCLING_KMH_PER_MET)
                .max(physiology::MIN_CYCLING_MET),
            WorkoutType::Hiking => physiology::HIKING_MET,
            WorkoutType::Other => physiology::OTHER_MET,
        }
    }
}

impl CalorieFormula for MetCalorieFormula {
    fn calories(
        &self,
        workout_type: WorkoutType,
        duration_ms: i64,
        length_m: f64,
        weight_kg: f64,
    ) -> u32 {
        if duration_ms <= 0 || !weight_kg.is_finite() || weight_kg <= 0.0 {
            return 0;
        }
        let duration_ms = duration_ms as f64;
        let speed_kmh =
            length_m.max(0.0) / (duration_ms / units::MS_PER_SECOND) * units::MPS_TO_KMH;
        let met = Self::met(workout_type, speed_kmh);
        let kcal_per_minute =
            met * physiology::ML_O2_PER_KG_MIN_PER_MET * weight_kg / physiology::KCAL_DIVISOR;
        (kcal_per_minute * duration_ms / units::MS_PER_MINUTE) as u32
    }
}
