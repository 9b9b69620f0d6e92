// ABOUTME: Core data models for live workout recording
// ABOUTME: Re-exports the workout envelope, samples, raw fixes and recorder states
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Raw location fixes delivered by a location source
pub mod location;
/// Recorder states and the transition function between them
pub mod recording;
/// Recorded samples
pub mod sample;
/// Workout envelope, type and summary metrics
pub mod workout;

pub use location::LocationFix;
pub use recording::{RecorderCommand, RecordingState, Transition};
pub use sample::WorkoutSample;
pub use workout::{Workout, WorkoutType};
