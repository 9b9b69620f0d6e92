// ABOUTME: Main library entry point for the live GPS workout recorder
// ABOUTME: Records workouts from location fixes and finalizes them into stored summaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Workout Recorder
//!
//! Live recording of GPS workouts (running, cycling, hiking) from a stream of
//! location fixes, and the aggregation that turns a finished recording into a
//! stored workout with summary metrics.
//!
//! ## Features
//!
//! - **Lifecycle state machine**: idle, running, paused and stopped, with
//!   active and paused time tracked separately
//! - **Noise filtering**: closely-timed fixes that barely moved are dropped
//! - **Auto-pause**: a background watchdog pauses the recording when fixes
//!   stop arriving and resumes it when they return
//! - **Aggregation**: per-sample speed, length, average speed and pace, top
//!   speed, ascent and descent, calories
//! - **Replay**: feed a recorded track through the recorder offline
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use workout_recorder::location::LocationHub;
//! use workout_recorder::models::{LocationFix, WorkoutType};
//! use workout_recorder::recording::{RecorderContext, WorkoutRecorder};
//! use workout_recorder::storage::InMemoryWorkoutStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let hub = Arc::new(LocationHub::new());
//!     let store = Arc::new(InMemoryWorkoutStore::new());
//!     let context = RecorderContext::new(hub.clone(), store);
//!
//!     let recorder = WorkoutRecorder::new(WorkoutType::Running, &context);
//!     recorder.start()?;
//!     hub.publish(&LocationFix::new(48.8566, 2.3522, chrono::Utc::now().timestamp_millis()));
//!     recorder.stop()?;
//!     let workout = recorder.save().await?;
//!     println!("Saved workout {} ({} m)", workout.id, workout.length);
//!     Ok(())
//! }
//! ```

/// Finalization of stopped recordings into summary metrics
pub mod aggregation;

/// Wall-clock abstraction
pub mod clock;

/// Recorder thresholds and user settings
pub mod config;

/// Location producer and listener interfaces
pub mod location;

/// Structured logging setup
pub mod logging;

/// Live workout recording
pub mod recording;

/// Offline track replay
pub mod replay;

/// Persistence of finalized workouts
pub mod storage;

// Re-export the foundation crate under stable paths
pub use workout_core::constants;
pub use workout_core::errors;
pub use workout_core::geo;
pub use workout_core::models;
