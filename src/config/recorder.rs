// ABOUTME: Recorder configuration for noise filtering, auto-pause and watchdog timing
// ABOUTME: Defaults mirror the recording constants, overridable through environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::env;
use std::time::Duration;
use tracing::warn;
use workout_core::constants::{env_config, recording};

/// Timing thresholds used by a workout recorder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecorderConfig {
    /// Silence after the last accepted fix before the watchdog auto-pauses
    pub pause_threshold: Duration,
    /// Interval between two watchdog polls
    pub watchdog_interval: Duration,
    /// Closely-timed fixes inside this window go through the distance filter
    pub noise_time_gate: Duration,
    /// Sample count below which the watchdog stays idle
    pub watchdog_min_samples: usize,
    /// Spawn the background watchdog task on start
    ///
    /// The replay tool turns this off and polls `check_auto_pause` itself.
    pub spawn_watchdog: bool,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            pause_threshold: Duration::from_millis(recording::PAUSE_THRESHOLD_MS),
            watchdog_interval: Duration::from_millis(recording::WATCHDOG_INTERVAL_MS),
            noise_time_gate: Duration::from_millis(recording::NOISE_TIME_GATE_MS),
            watchdog_min_samples: recording::WATCHDOG_MIN_SAMPLES,
            spawn_watchdog: true,
        }
    }
}

impl RecorderConfig {
    /// Create configuration from environment variables
    ///
    /// Unset variables keep their defaults; unparseable or zero values are
    /// ignored with a warning.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            pause_threshold: env_duration(
                env_config::PAUSE_THRESHOLD_SECS,
                Duration::from_secs,
                defaults.pause_threshold,
            ),
            watchdog_interval: env_duration(
                env_config::WATCHDOG_INTERVAL_SECS,
                Duration::from_secs,
                defaults.watchdog_interval,
            ),
            noise_time_gate: env_duration(
                env_config::NOISE_GATE_MS,
                Duration::from_millis,
                defaults.noise_time_gate,
            ),
            ..defaults
        }
    }

    /// Disable the background watchdog task
    #[must_use]
    pub const fn without_watchdog(mut self) -> Self {
        self.spawn_watchdog = false;
        self
    }

    /// Pause threshold in milliseconds
    #[must_use]
    pub fn pause_threshold_ms(&self) -> i64 {
        self.pause_threshold.as_millis() as i64
    }

    /// Noise gate in milliseconds
    #[must_use]
    pub fn noise_time_gate_ms(&self) -> i64 {
        self.noise_time_gate.as_millis() as i64
    }
}

fn env_duration(name: &str, unit: fn(u64) -> Duration, default: Duration) -> Duration {
    env::var(name).map_or(default, |raw| match raw.trim().parse::<u64>() {
        Ok(value) if value > 0 => unit(value),
        _ => {
            warn!(
                variable = name,
                value = %raw,
                "Ignoring invalid recorder setting, using default"
            );
            default
        }
    })
}
