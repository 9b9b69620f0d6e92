// ABOUTME: Persistence boundary for finalized workouts and their samples
// ABOUTME: Async store trait plus an in-memory implementation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// In-memory store implementation
pub mod memory;

pub use memory::InMemoryWorkoutStore;

use async_trait::async_trait;
use workout_core::errors::AppResult;
use workout_core::models::{Workout, WorkoutSample};

/// Storage for finalized workouts
///
/// Stores never assign identifiers; the aggregator has already set the
/// workout id and every sample's id and workout id before the insert.
#[async_trait]
pub trait WorkoutStore: Send + Sync {
    /// Store a workout and all of its samples atomically
    async fn insert_workout_and_samples(
        &self,
        workout: &Workout,
        samples: &[WorkoutSample],
    ) -> AppResult<()>;

    /// Fetch a workout by id
    async fn get_workout(&self, id: i64) -> AppResult<Option<Workout>>;

    /// Fetch the samples of a workout, ordered by relative time
    async fn get_samples(&self, workout_id: i64) -> AppResult<Vec<WorkoutSample>>;

    /// All stored workouts, oldest first
    async fn list_workouts(&self) -> AppResult<Vec<Workout>>;
}
