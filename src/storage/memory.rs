// ABOUTME: In-memory workout store keyed by workout id
// ABOUTME: Single write lock per insert makes workout and samples land together
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::debug;
use workout_core::errors::{AppError, AppResult};
use workout_core::models::{Workout, WorkoutSample};

use super::WorkoutStore;

#[derive(Debug, Clone)]
struct StoredWorkout {
    workout: Workout,
    samples: Vec<WorkoutSample>,
}

/// Workout store that keeps everything in process memory
#[derive(Debug, Default)]
pub struct InMemoryWorkoutStore {
    workouts: RwLock<BTreeMap<i64, StoredWorkout>>,
}

impl InMemoryWorkoutStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored workouts
    pub async fn len(&self) -> usize {
        self.workouts.read().await.len()
    }

    /// True when nothing has been stored
    pub async fn is_empty(&self) -> bool {
        self.workouts.read().await.is_empty()
    }
}

fn validate(workout: &Workout, samples: &[WorkoutSample]) -> AppResult<()> {
    if workout.id == 0 {
        return Err(AppError::invalid_input(
            "Workout has no identifier; finalize it before storing",
        ));
    }
    if let Some(orphan) = samples.iter().find(|s| s.workout_id != workout.id) {
        return Err(AppError::invalid_input(format!(
            "Sample {} belongs to workout {}, not {}",
            orphan.id, orphan.workout_id, workout.id
        )));
    }
    Ok(())
}

#[async_trait]
impl WorkoutStore for InMemoryWorkoutStore {
    async fn insert_workout_and_samples(
        &self,
        workout: &Workout,
        samples: &[WorkoutSample],
    ) -> AppResult<()> {
        validate(workout, samples)?;

        let mut workouts = self.workouts.write().await;
        if workouts.contains_key(&workout.id) {
            return Err(AppError::already_exists(format!("Workout {}", workout.id)));
        }
        workouts.insert(
            workout.id,
            StoredWorkout {
                workout: workout.clone(),
                samples: samples.to_vec(),
            },
        );
        drop(workouts);

        debug!(
            workout.id = workout.id,
            workout.kind = %workout.workout_type,
            samples = samples.len(),
            "Workout stored"
        );
        Ok(())
    }

    async fn get_workout(&self, id: i64) -> AppResult<Option<Workout>> {
        Ok(self
            .workouts
            .read()
            .await
            .get(&id)
            .map(|stored| stored.workout.clone()))
    }

    async fn get_samples(&self, workout_id: i64) -> AppResult<Vec<WorkoutSample>> {
        self.workouts
            .read()
            .await
            .get(&workout_id)
            .map(|stored| stored.samples.clone())
            .ok_or_else(|| AppError::not_found(format!("Workout {workout_id}")))
    }

    async fn list_workouts(&self) -> AppResult<Vec<Workout>> {
        Ok(self
            .workouts
            .read()
            .await
            .values()
            .map(|stored| stored.workout.clone())
            .collect())
    }
}
