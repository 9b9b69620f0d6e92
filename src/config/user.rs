// ABOUTME: User settings consumed by calorie estimates, read at call time
// ABOUTME: Environment-backed and in-memory implementations of the settings source
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::env;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;
use workout_core::constants::{defaults, env_config};

/// Source of user profile values
///
/// Implementations are queried every time a value is needed; callers must not
/// cache the result across a workout.
pub trait UserSettings: Send + Sync {
    /// Body weight in kilograms
    fn weight_kg(&self) -> f64;
}

/// Reads the user's weight from `WORKOUT_USER_WEIGHT_KG` on every call
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvUserSettings;

impl UserSettings for EnvUserSettings {
    fn weight_kg(&self) -> f64 {
        env::var(env_config::USER_WEIGHT_KG).map_or(defaults::USER_WEIGHT_KG, |raw| {
            match raw.trim().parse::<f64>() {
                Ok(weight) if weight.is_finite() && weight > 0.0 => weight,
                _ => {
                    warn!(value = %raw, "Invalid user weight, using default");
                    defaults::USER_WEIGHT_KG
                }
            }
        })
    }
}

/// In-memory settings that can be updated while a workout is running
#[derive(Debug)]
pub struct StaticUserSettings {
    weight_bits: AtomicU64,
}

impl StaticUserSettings {
    /// Create settings with the given weight
    #[must_use]
    pub fn new(weight_kg: f64) -> Self {
        Self {
            weight_bits: AtomicU64::new(weight_kg.to_bits()),
        }
    }

    /// Replace the stored weight
    pub fn set_weight_kg(&self, weight_kg: f64) {
        self.weight_bits
            .store(weight_kg.to_bits(), Ordering::SeqCst);
    }
}

impl Default for StaticUserSettings {
    fn default() -> Self {
        Self::new(defaults::USER_WEIGHT_KG)
    }
}

impl UserSettings for StaticUserSettings {
    fn weight_kg(&self) -> f64 {
        f64::from_bits(self.weight_bits.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_settings_update_is_visible() {
        let settings = StaticUserSettings::new(70.0);
        assert!((settings.weight_kg() - 70.0).abs() < f64::EPSILON);
        settings.set_weight_kg(72.5);
        assert!((settings.weight_kg() - 72.5).abs() < f64::EPSILON);
    }
}
