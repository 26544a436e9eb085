// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Defines the error types for datablock lifecycle operations.

use crate::datablock::IdCode;
use crate::library::LibraryId;
use thiserror::Error;

/// An error raised by a registry or by a lifecycle algorithm running against it.
///
/// "Already local", "no owners" and "no sub-asset" are valid states, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// The user count and the owner set of a datablock disagree, or an
    /// operation was given input the registry cannot have produced.
    #[error("Precondition violated: {reason}")]
    PreconditionViolation {
        /// Description of the violated precondition.
        reason: String,
    },
    /// The registry could not produce a new datablock.
    #[error("Cannot allocate {kind} datablock: capacity of {capacity} reached")]
    AllocationFailure {
        /// The kind that was being allocated.
        kind: IdCode,
        /// The configured capacity.
        capacity: usize,
    },
    /// A handle did not resolve to a live datablock.
    #[error("{kind} datablock at slot {index} not found")]
    NotFound {
        /// The kind of the missing datablock.
        kind: IdCode,
        /// The slot index of the stale handle.
        index: u32,
    },
    /// A scope tag names a library the registry does not know.
    #[error("Library {0} is not registered")]
    UnknownLibrary(LibraryId),
}

impl LifecycleError {
    /// Convenience constructor for a precondition violation.
    pub fn precondition(reason: impl Into<String>) -> Self {
        LifecycleError::PreconditionViolation {
            reason: reason.into(),
        }
    }
}

/// An error raised while loading a [`LifecycleConfig`](crate::LifecycleConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The RON source could not be parsed.
    #[error("Invalid RON configuration: {0}")]
    Ron(#[from] ron::error::SpannedError),
    /// The JSON source could not be parsed.
    #[error("Invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),
    /// The configuration parsed but holds an unusable value.
    #[error("Invalid configuration value: {0}")]
    Invalid(String),
}
