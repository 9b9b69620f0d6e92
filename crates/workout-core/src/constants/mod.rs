// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Recording thresholds, unit conversions, defaults and environment variable names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single
//! flat namespace.

/// Live recording thresholds
pub mod recording {
    /// Minimum fix spacing for running workouts, in meters
    pub const MIN_DISTANCE_RUNNING_M: f64 = 8.0;
    /// Minimum fix spacing for hiking workouts, in meters
    pub const MIN_DISTANCE_HIKING_M: f64 = 8.0;
    /// Minimum fix spacing for cycling workouts, in meters
    pub const MIN_DISTANCE_CYCLING_M: f64 = 15.0;
    /// Minimum fix spacing for any other workout type, in meters
    pub const MIN_DISTANCE_OTHER_M: f64 = 10.0;

    /// Fixes closer in time than this to the last sample are subject to the distance filter
    pub const NOISE_TIME_GATE_MS: u64 = 500;

    /// Silence after the last accepted fix that triggers an automatic pause
    pub const PAUSE_THRESHOLD_MS: u64 = 10_000;

    /// Interval between two pause watchdog polls
    pub const WATCHDOG_INTERVAL_MS: u64 = 5_000;

    /// The watchdog only acts once this many samples are recorded
    pub const WATCHDOG_MIN_SAMPLES: usize = 3;

    /// Ordinal of the accepted fix that triggers start-up recalibration
    pub const RECALIBRATION_FIX: u64 = 2;
}

/// Unit conversion and measurement constants
pub mod units {
    /// Mean Earth radius used for great-circle distances, in meters
    pub const EARTH_RADIUS_M: f64 = 6_371_000.0;
    /// Milliseconds per second
    pub const MS_PER_SECOND: f64 = 1_000.0;
    /// Milliseconds per minute
    pub const MS_PER_MINUTE: f64 = 60_000.0;
    /// Meters per kilometer
    pub const METERS_PER_KM: f64 = 1_000.0;
    /// Conversion factor from m/s to km/h
    pub const MPS_TO_KMH: f64 = 3.6;
}

/// Physiological constants for energy expenditure
pub mod physiology {
    /// Oxygen uptake of one MET, in ml/kg/min
    pub const ML_O2_PER_KG_MIN_PER_MET: f64 = 3.5;
    /// Divisor converting ml O2/min to kcal/min (5 kcal per liter, /1000 ml)
    pub const KCAL_DIVISOR: f64 = 200.0;
    /// Lowest MET value reported for any moving activity
    pub const MIN_ACTIVE_MET: f64 = 1.5;
    /// Lowest MET value reported for cycling
    pub const MIN_CYCLING_MET: f64 = 3.5;
    /// Cycling speed at which the linear MET model crosses zero, in km/h
    pub const CYCLING_MET_BASE_KMH: f64 = 10.0;
    /// Cycling speed gain per additional MET, in km/h
    pub const CYCLING_KMH_PER_MET: f64 = 1.5;
    /// Running MET per km/h of average speed
    pub const RUNNING_MET_PER_KMH: f64 = 1.0;
    /// Flat MET for hiking on mixed terrain
    pub const HIKING_MET: f64 = 6.0;
    /// Flat MET for unclassified workouts
    pub const OTHER_MET: f64 = 5.0;
}

/// Default values for user settings
pub mod defaults {
    /// Body weight assumed when the user has not configured one, in kilograms
    pub const USER_WEIGHT_KG: f64 = 80.0;
}

/// Environment variable names read by the configuration layer
pub mod env_config {
    /// User body weight in kilograms
    pub const USER_WEIGHT_KG: &str = "WORKOUT_USER_WEIGHT_KG";
    /// Auto-pause threshold in seconds
    pub const PAUSE_THRESHOLD_SECS: &str = "WORKOUT_PAUSE_THRESHOLD_SECS";
    /// Watchdog polling interval in seconds
    pub const WATCHDOG_INTERVAL_SECS: &str = "WORKOUT_WATCHDOG_INTERVAL_SECS";
    /// Noise filter time gate in milliseconds
    pub const NOISE_GATE_MS: &str = "WORKOUT_NOISE_GATE_MS";
    /// Log output format: `json`, `pretty` or `compact`
    pub const LOG_FORMAT: &str = "WORKOUT_LOG_FORMAT";
    /// Include source file and line in log events
    pub const LOG_LOCATION: &str = "WORKOUT_LOG_LOCATION";
    /// Include thread ids and names in log events
    pub const LOG_THREADS: &str = "WORKOUT_LOG_THREADS";
    /// Keep the per-fix and per-poll trace events
    pub const LOG_FIXES: &str = "WORKOUT_LOG_FIXES";
}

/// Service identifiers used in structured logs
pub mod service_names {
    /// Name of the recorder service
    pub const WORKOUT_RECORDER: &str = "workout-recorder";
}
