// ABOUTME: Recorder lifecycle error types for invalid transitions and failed saves
// ABOUTME: Provides typed errors that convert into the unified AppError
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use thiserror::Error;

use super::{AppError, ErrorCode};
use crate::models::RecordingState;

/// Errors raised by the workout recorder lifecycle.
///
/// An invalid transition never mutates recorder state; the caller's intent is
/// rejected as a whole.
#[derive(Debug, Error)]
pub enum RecordingError {
    /// Operation is not permitted from the current state
    #[error("Cannot {operation} recording. state = {state}")]
    InvalidState {
        /// Operation that was attempted (start, stop, save)
        operation: &'static str,
        /// State the recorder was in
        state: RecordingState,
    },
    /// The recorder already handed its workout to the store
    #[error("Recording was already saved")]
    AlreadySaved,
    /// Finalization or persistence failed
    #[error("Failed to store workout: {0}")]
    Storage(#[from] AppError),
}

impl RecordingError {
    /// Create an invalid state error
    #[must_use]
    pub const fn invalid_state(operation: &'static str, state: RecordingState) -> Self {
        Self::InvalidState { operation, state }
    }
}

impl From<RecordingError> for AppError {
    fn from(error: RecordingError) -> Self {
        match error {
            RecordingError::Storage(inner) => inner,
            other @ (RecordingError::InvalidState { .. } | RecordingError::AlreadySaved) => {
                Self::new(ErrorCode::InvalidState, other.to_string())
            }
        }
    }
}
