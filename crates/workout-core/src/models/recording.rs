// ABOUTME: Recorder state enumeration and the pure transition function between states
// ABOUTME: Enumerates every legal lifecycle transition so it can be tested without timing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::RecordingError;

/// Lifecycle state of a workout recorder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecordingState {
    /// Created, not yet started
    #[default]
    Idle,
    /// Accumulating active time and samples
    Running,
    /// Accumulating pause time, samples are not appended
    Paused,
    /// Terminal; timing is frozen and the workout can be saved
    Stopped,
}

/// Lifecycle request issued to a recorder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderCommand {
    /// User start, or user resume while paused
    Start,
    /// Manual or automatic pause
    Pause,
    /// Automatic resume from the pause watchdog
    Resume,
    /// End the recording
    Stop,
}

impl RecorderCommand {
    /// Verb used in error messages
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Start => "start or resume",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Stop => "stop",
        }
    }
}

/// Effect a command has on the recorder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// `Idle -> Running`: first start of the session
    Begin,
    /// `Paused -> Running`
    Resume,
    /// `Running -> Paused`
    Pause,
    /// `Running|Paused -> Stopped`
    Stop,
    /// Command accepted but the state stays as it is
    Unchanged,
}

impl Transition {
    /// State reached after the transition, `None` when nothing changes
    #[must_use]
    pub const fn target(self) -> Option<RecordingState> {
        match self {
            Self::Begin | Self::Resume => Some(RecordingState::Running),
            Self::Pause => Some(RecordingState::Paused),
            Self::Stop => Some(RecordingState::Stopped),
            Self::Unchanged => None,
        }
    }
}

impl RecordingState {
    /// Running or paused
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Running | Self::Paused)
    }

    /// Resolve a command against this state.
    ///
    /// # Errors
    ///
    /// Returns `RecordingError::InvalidState` when the command is not legal
    /// from this state: start from `Stopped`, or stop from `Idle`/`Stopped`.
    pub fn apply(self, command: RecorderCommand) -> Result<Transition, RecordingError> {
        match (self, command) {
            (Self::Idle, RecorderCommand::Start) => Ok(Transition::Begin),
            (Self::Paused, RecorderCommand::Start | RecorderCommand::Resume) => {
                Ok(Transition::Resume)
            }
            (Self::Running, RecorderCommand::Pause) => Ok(Transition::Pause),
            (Self::Running | Self::Paused, RecorderCommand::Stop) => Ok(Transition::Stop),
            (Self::Running, RecorderCommand::Start | RecorderCommand::Resume)
            | (Self::Idle | Self::Paused | Self::Stopped, RecorderCommand::Pause)
            | (Self::Idle, RecorderCommand::Resume) => Ok(Transition::Unchanged),
            (Self::Stopped, RecorderCommand::Start | RecorderCommand::Resume)
            | (Self::Idle | Self::Stopped, RecorderCommand::Stop) => {
                Err(RecordingError::invalid_state(command.verb(), self))
            }
        }
    }

    /// Check that a stopped recording may be handed to the store.
    ///
    /// # Errors
    ///
    /// Returns `RecordingError::InvalidState` unless the state is `Stopped`.
    pub fn ensure_saveable(self) -> Result<(), RecordingError> {
        if self == Self::Stopped {
            Ok(())
        } else {
            Err(RecordingError::invalid_state("save", self))
        }
    }
}

impl fmt::Display for RecordingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Paused => write!(f, "paused"),
            Self::Stopped => write!(f, "stopped"),
        }
    }
}
