// ABOUTME: Workout envelope, workout type enumeration and finalized summary metrics
// ABOUTME: Mutated by the recorder while live, completed once by the aggregator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::recording::{
    MIN_DISTANCE_CYCLING_M, MIN_DISTANCE_HIKING_M, MIN_DISTANCE_OTHER_M, MIN_DISTANCE_RUNNING_M,
};
use crate::errors::AppError;

/// Kind of physical activity being recorded
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutType {
    /// Running activity
    #[default]
    Running,
    /// Cycling activity
    Cycling,
    /// Hiking activity
    Hiking,
    /// Any other activity
    Other,
}

impl WorkoutType {
    /// Minimum spacing between two fixes before the noise filter lets a
    /// closely-timed fix through, in meters
    #[must_use]
    pub const fn min_distance_m(self) -> f64 {
        match self {
            Self::Running => MIN_DISTANCE_RUNNING_M,
            Self::Hiking => MIN_DISTANCE_HIKING_M,
            Self::Cycling => MIN_DISTANCE_CYCLING_M,
            Self::Other => MIN_DISTANCE_OTHER_M,
        }
    }

    /// Stable lowercase identifier
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Cycling => "cycling",
            Self::Hiking => "hiking",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for WorkoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkoutType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "running" | "run" => Ok(Self::Running),
            "cycling" | "ride" | "bike" => Ok(Self::Cycling),
            "hiking" | "hike" => Ok(Self::Hiking),
            "other" => Ok(Self::Other),
            other => Err(AppError::invalid_input(format!(
                "Unknown workout type: '{other}'. Valid options: running, cycling, hiking, other"
            ))),
        }
    }
}

/// Workout envelope plus the summary metrics computed at finalization.
///
/// Times are epoch milliseconds; `duration` counts active time only and
/// `pause_duration` counts paused time only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    /// Identifier assigned by the aggregator (0 until finalized)
    pub id: i64,
    /// Kind of activity
    pub workout_type: WorkoutType,
    /// Logical start in epoch milliseconds
    pub start: i64,
    /// End in epoch milliseconds (0 until stopped)
    pub end: i64,
    /// Active time in milliseconds
    pub duration: i64,
    /// Paused time in milliseconds
    pub pause_duration: i64,
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

impl Workout {
    /// Create an empty envelope for the given activity
    #[must_use]
    pub const fn new(workout_type: WorkoutType) -> Self {
        Self {
            id: 0,
            workout_type,
            start: 0,
            end: 0,
            duration: 0,
            pause_duration: 0,
            length: 0,
            avg_speed: 0.0,
            avg_pace: 0.0,
            top_speed: 0.0,
            calorie: 0,
            ascent: 0.0,
            descent: 0.0,
        }
    }

    /// Logical start as a UTC timestamp
    #[must_use]
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.start)
    }

    /// End as a UTC timestamp, once the workout has been stopped
    #[must_use]
    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        (self.end > 0)
            .then(|| DateTime::from_timestamp_millis(self.end))
            .flatten()
    }
}
