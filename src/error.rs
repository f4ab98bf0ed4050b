// SPDX-License-Identifier: Apache-2.0
// Copyright 2024, 2026 Joe Pearson
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

use std::fmt;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the few fallible, caller-facing constructors.
///
/// Most of the engine never fails: mutation APIs return `bool`, scans return
/// sentinels, and validation is surfaced as a flattened set of
/// [`TaskValidationError`]. This enum only covers construction of values from
/// caller-supplied parameters that can be outright malformed.
#[derive(Clone, PartialEq, Debug)]
pub enum Error {
    /// An observation zone radius was zero or negative.
    InvalidRadius(f32),
    /// A custom observation zone polygon had fewer than 3 vertices.
    InvalidPolygon { vertices: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRadius(r) => write!(f, "invalid observation zone radius: {r}"),
            Self::InvalidPolygon { vertices } => {
                write!(f, "custom observation zone polygon needs >= 3 vertices, got {vertices}")
            }
        }
    }
}

impl std::error::Error for Error {}

/// A single reason a task failed factory validation.
///
/// Accumulated into a `Vec<TaskValidationError>` by [`crate::task::OrderedTask::check_task`];
/// `stats.task_valid` is `true` iff that vector is empty.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TaskValidationError {
    /// The task has no task points at all.
    NoTaskPoints,
    /// More than one point is marked as a start.
    MultipleStarts,
    /// No point is marked as a start.
    NoStart,
    /// More than one point is marked as a finish.
    MultipleFinishes,
    /// No point is marked as a finish.
    NoFinish,
    /// An intermediate point uses an AAT zone while other points in the task
    /// use racing (non-area) zones, or vice versa.
    MixedIntermediateKinds,
}

impl fmt::Display for TaskValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTaskPoints => write!(f, "task has no task points"),
            Self::MultipleStarts => write!(f, "task has more than one start point"),
            Self::NoStart => write!(f, "task has no start point"),
            Self::MultipleFinishes => write!(f, "task has more than one finish point"),
            Self::NoFinish => write!(f, "task has no finish point"),
            Self::MixedIntermediateKinds => {
                write!(f, "task mixes AAT and racing intermediate points")
            }
        }
    }
}
