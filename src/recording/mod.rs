// ABOUTME: Live recording of a workout from location fixes
// ABOUTME: Lifecycle state machine, sample buffer, timing accumulators and pause watchdog
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Recording
//!
//! A [`WorkoutRecorder`] registers with a location source when started and
//! turns accepted fixes into [`WorkoutSample`](workout_core::models::WorkoutSample)s.
//! A background watchdog pauses the recording when fixes stop arriving and
//! resumes it when they come back.

mod recorder;
mod samples;
mod timeline;
mod watchdog;

pub use recorder::{FixOutcome, LiveMetrics, RecorderContext, WatchdogAction, WorkoutRecorder};
