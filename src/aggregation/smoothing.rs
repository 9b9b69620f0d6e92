// ABOUTME: Non-causal three-point speed smoothing over a finished sample sequence
// ABOUTME: Finishing pass for in-memory or persisted samples, not usable while recording
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use workout_core::errors::AppResult;
use workout_core::models::WorkoutSample;

use crate::storage::WorkoutStore;

/// Fill `smoothed_speed` with the mean of each sample's speed and its
/// immediate neighbours.
///
/// The first sample averages with its successor only, the last with its
/// predecessor only. A lone sample keeps its own speed.
pub fn smooth_speeds(samples: &mut [WorkoutSample]) {
    let speeds: Vec<f64> = samples.iter().map(|s| s.speed).collect();
    let last = speeds.len().saturating_sub(1);
    for (i, sample) in samples.iter_mut().enumerate() {
        let lo = i.saturating_sub(1);
        let hi = (i + 1).min(last);
        let window = &speeds[lo..=hi];
        sample.smoothed_speed = Some(window.iter().sum::<f64>() / window.len() as f64);
    }
}

/// Load a persisted workout's samples and smooth them
///
/// # Errors
///
/// Returns the store's error if the samples cannot be loaded
pub async fn load_smoothed_samples(
    store: &dyn WorkoutStore,
    workout_id: i64,
) -> AppResult<Vec<WorkoutSample>> {
    let mut samples = store.get_samples(workout_id).await?;
    smooth_speeds(&mut samples);
    Ok(samples)
}
