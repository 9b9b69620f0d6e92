// ABOUTME: Lock-guarded ordered sample sequence shared between producer and readers
// ABOUTME: Compound read-then-append, snapshot and take operations under one guard
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::{Mutex, MutexGuard};
use tracing::warn;
use workout_core::models::WorkoutSample;

/// Ordered sample sequence guarded by a single mutex
///
/// Every read or mutation holds the lock for the duration of the operation;
/// nothing outside this type can iterate the samples without the guard.
#[derive(Debug, Default)]
pub struct SampleBuffer {
    samples: Mutex<Vec<WorkoutSample>>,
}

impl SampleBuffer {
    /// Create an empty buffer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, Vec<WorkoutSample>> {
        self.samples.lock().unwrap_or_else(|poisoned| {
            warn!("Sample buffer lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Number of samples
    #[must_use]
    pub fn len(&self) -> usize {
        self.guard().len()
    }

    /// Copy of the whole sequence
    #[must_use]
    pub fn snapshot(&self) -> Vec<WorkoutSample> {
        self.guard().clone()
    }

    /// Move the whole sequence out, leaving the buffer empty
    pub fn take(&self) -> Vec<WorkoutSample> {
        std::mem::take(&mut *self.guard())
    }

    /// Put back a sequence previously moved out with [`Self::take`]
    pub fn restore(&self, samples: Vec<WorkoutSample>) {
        *self.guard() = samples;
    }

    /// Run a compound read-then-act operation under one guard
    pub fn with_samples<R>(&self, f: impl FnOnce(&mut Vec<WorkoutSample>) -> R) -> R {
        f(&mut self.guard())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use workout_core::models::LocationFix;

    fn sample(time: i64) -> WorkoutSample {
        WorkoutSample::from_fix(&LocationFix::new(0.0, 0.0, time), time)
    }

    fn push(buffer: &SampleBuffer, time: i64) {
        buffer.with_samples(|samples| samples.push(sample(time)));
    }

    #[test]
    fn test_push_and_snapshot_preserve_order() {
        let buffer = SampleBuffer::new();
        assert_eq!(buffer.len(), 0);
        push(&buffer, 1);
        push(&buffer, 2);
        let times: Vec<i64> = buffer.snapshot().iter().map(|s| s.absolute_time).collect();
        assert_eq!(times, vec![1, 2]);
    }

    #[test]
    fn test_take_leaves_buffer_empty() {
        let buffer = SampleBuffer::new();
        push(&buffer, 1);
        let taken = buffer.take();
        assert_eq!(taken.len(), 1);
        assert_eq!(buffer.len(), 0);
        buffer.restore(taken);
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_concurrent_appends_are_not_lost() {
        let buffer = Arc::new(SampleBuffer::new());
        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let buffer = Arc::clone(&buffer);
                thread::spawn(move || {
                    for i in 0..250 {
                        push(&buffer, worker * 1_000 + i);
                        let _ = buffer.len();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(buffer.len(), 1_000);
    }
}
