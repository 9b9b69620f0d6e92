// ABOUTME: Shared test utilities and fixture builders for integration tests
// ABOUTME: Provides logging setup, manual-clock recorders and location fix helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `workout_recorder`

use std::sync::{Arc, Once};
use workout_recorder::clock::ManualClock;
use workout_recorder::config::{RecorderConfig, StaticUserSettings};
use workout_recorder::geo::meters_to_latitude_degrees;
use workout_recorder::location::LocationHub;
use workout_recorder::models::{LocationFix, WorkoutType};
use workout_recorder::recording::{RecorderContext, WorkoutRecorder};
use workout_recorder::storage::InMemoryWorkoutStore;

/// Epoch millisecond all test recordings start from
pub const T0: i64 = 1_700_000_000_000;

/// Latitude and longitude of the first fix of every test track
pub const ORIGIN: (f64, f64) = (45.0, 6.0);

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Collaborators of a recorder under test, all observable
pub struct Harness {
    pub clock: Arc<ManualClock>,
    pub hub: Arc<LocationHub>,
    pub store: Arc<InMemoryWorkoutStore>,
    pub settings: Arc<StaticUserSettings>,
    pub context: RecorderContext,
}

impl Harness {
    /// Harness with the clock at [`T0`] and the given configuration
    pub fn with_config(config: RecorderConfig) -> Self {
        init_test_logging();
        let clock = Arc::new(ManualClock::new(T0));
        let hub = Arc::new(LocationHub::new());
        let store = Arc::new(InMemoryWorkoutStore::new());
        let settings = Arc::new(StaticUserSettings::default());
        let context = RecorderContext::new(hub.clone(), store.clone())
            .with_clock(clock.clone())
            .with_settings(settings.clone())
            .with_config(config);
        Self {
            clock,
            hub,
            store,
            settings,
            context,
        }
    }

    /// Harness without a background watchdog; tests poll it by hand
    pub fn manual() -> Self {
        Self::with_config(RecorderConfig::default().without_watchdog())
    }

    pub fn recorder(&self, workout_type: WorkoutType) -> WorkoutRecorder {
        WorkoutRecorder::new(workout_type, &self.context)
    }

    /// Move the clock to `T0 + offset_ms`
    pub fn at(&self, offset_ms: i64) {
        self.clock.set(T0 + offset_ms);
    }
}

/// Fix `meters` north of [`ORIGIN`] at `T0 + offset_ms`
pub fn north_of_origin(meters: f64, offset_ms: i64) -> LocationFix {
    LocationFix::new(
        ORIGIN.0 + meters_to_latitude_degrees(meters),
        ORIGIN.1,
        T0 + offset_ms,
    )
}
