// ABOUTME: Recorded workout sample with absolute and pause-adjusted timestamps
// ABOUTME: Built from accepted location fixes, annotated once during finalization
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use super::LocationFix;
use crate::geo::spherical_distance_m;

/// One accepted point of a workout track.
///
/// Samples are never mutated after they are appended, except for the fields
/// the aggregator fills in (`id`, `workout_id`, `speed`, `relative_elevation`)
/// and the one-time `smoothed_speed` annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSample {
    /// Unique identifier, assigned at finalization
    pub id: i64,
    /// Owning workout identifier, assigned at finalization
    pub workout_id: i64,
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
    /// Elevation in meters
    pub elevation: f64,
    /// Elevation delta against the previous sample, in meters
    pub relative_elevation: f64,
    /// Speed in m/s
    pub speed: f64,
    /// Milliseconds since the logical workout start, pauses excluded
    pub relative_time: i64,
    /// Device/GPS clock time in epoch milliseconds
    pub absolute_time: i64,
    /// Three-point neighbour average of `speed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smoothed_speed: Option<f64>,
}

impl WorkoutSample {
    /// Build a sample from an accepted fix
    #[must_use]
    pub const fn from_fix(fix: &LocationFix, relative_time: i64) -> Self {
        Self {
            id: 0,
            workout_id: 0,
            lat: fix.latitude,
            lon: fix.longitude,
            elevation: fix.altitude,
            relative_elevation: 0.0,
            speed: fix.speed,
            relative_time,
            absolute_time: fix.time,
            smoothed_speed: None,
        }
    }

    /// Great-circle distance to another sample, in meters
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        spherical_distance_m(self.lat, self.lon, other.lat, other.lon)
    }
}
