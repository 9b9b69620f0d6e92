// ABOUTME: Location producer interface and an in-process fan-out hub
// ABOUTME: Recorders register as listeners on start and unregister on stop
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;
use workout_core::models::LocationFix;

/// Receiver of location fixes
///
/// Called from the producer's delivery thread at arbitrary rate.
pub trait LocationListener: Send + Sync {
    /// Handle one fix
    fn on_location_change(&self, fix: &LocationFix);
}

/// Producer of location fixes
pub trait LocationSource: Send + Sync {
    /// Start delivering fixes to `listener` under `id`
    fn register(&self, id: Uuid, listener: Arc<dyn LocationListener>);

    /// Stop delivering fixes to the listener registered under `id`
    fn unregister(&self, id: Uuid);
}

/// In-process location source that forwards every published fix to all
/// registered listeners
#[derive(Default)]
pub struct LocationHub {
    listeners: DashMap<Uuid, Arc<dyn LocationListener>>,
}

impl LocationHub {
    /// Create an empty hub
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a fix to every registered listener
    ///
    /// Listeners are collected first so no map shard is locked while a
    /// listener runs.
    pub fn publish(&self, fix: &LocationFix) {
        let listeners: Vec<Arc<dyn LocationListener>> = self
            .listeners
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        for listener in listeners {
            listener.on_location_change(fix);
        }
    }

    /// Number of registered listeners
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl LocationSource for LocationHub {
    fn register(&self, id: Uuid, listener: Arc<dyn LocationListener>) {
        debug!(listener.id = %id, "Location listener registered");
        self.listeners.insert(id, listener);
    }

    fn unregister(&self, id: Uuid) {
        if self.listeners.remove(&id).is_some() {
            debug!(listener.id = %id, "Location listener unregistered");
        }
    }
}
