// ABOUTME: Core types and constants for the workout recorder
// ABOUTME: Foundation crate with error handling, workout models, geometry, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Workout Core
//!
//! Foundation crate providing shared types and constants for live workout
//! recording. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and recording errors
//! - **constants**: Recording thresholds and unit constants organized by domain
//! - **models**: Workout envelope, samples, and raw location fixes
//! - **geo**: Great-circle distance on a spherical Earth model

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (Workout, `WorkoutSample`, `LocationFix`, `WorkoutType`)
pub mod models;

/// Spherical geometry helpers
pub mod geo;
