// ABOUTME: Configuration module for recorder thresholds and user settings
// ABOUTME: Environment-driven configuration passed explicitly into recorders and aggregators
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Configuration
//!
//! Configuration is never looked up from ambient global state by the
//! recorder; it is built here (usually from the environment) and handed to
//! the components at construction.

/// Recorder thresholds and watchdog timing
pub mod recorder;
/// User profile settings read during calorie calculations
pub mod user;

pub use recorder::RecorderConfig;
pub use user::{EnvUserSettings, StaticUserSettings, UserSettings};
