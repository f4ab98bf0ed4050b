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

//! The read-only flight-progress snapshot (component F, §3) a collaborator
//! reads after [`OrderedTask::check_transitions`](crate::task::OrderedTask::check_transitions)
//! or a distance scan.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::aircraft::AircraftState;
use crate::geom::{GeoBox, SearchPoint};
use crate::measurements::{Length, Speed};

/// The scored state captured when the aircraft exits the start point (§3).
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StartStats {
    #[cfg_attr(feature = "serde", serde(with = "crate::aircraft::time_opt"))]
    pub time: Option<time::Time>,
    pub altitude: Length,
    pub ground_speed: Speed,
    /// Whether the start advanced via the pilot-event rules (§4.F) rather
    /// than an ordinary OZ exit.
    pub advanced_by_pev: bool,
}

impl StartStats {
    pub fn has_started(&self) -> bool {
        self.time.is_some()
    }

    /// Captures the start point's exit state, per §4.E's "populate
    /// `stats.start` from the start point's exited state".
    pub(crate) fn from_exit(state: AircraftState, advanced_by_pev: bool) -> Self {
        Self {
            time: state.time,
            altitude: state.altitude,
            ground_speed: state.ground_speed,
            advanced_by_pev,
        }
    }
}

/// One leg's distance accounting (§3a): either the whole task (`Stats::total`)
/// or just the leg the aircraft is currently flying (`Stats::current_leg`).
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LegStat {
    /// The `DistanceMin` remaining distance from the aircraft.
    pub dist_remaining: Length,
    /// The `DistanceMax` scored distance (area-task rules applied).
    pub dist_planned: Length,
    /// The chosen boundary vertex per remaining task point, written back by
    /// the solver that last populated this leg stat.
    pub solution_remaining: Vec<SearchPoint>,
}

/// The flight-progress snapshot published after every transition check or
/// distance scan (§3).
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Stats {
    /// The task's bounding box, `None` for an empty task.
    pub bounds: Option<GeoBox>,
    /// `true` iff [`check_task`](crate::task::OrderedTask::check_task) found
    /// no [`TaskValidationError`](crate::error::TaskValidationError)s.
    pub task_valid: bool,
    /// Whether any intermediate point in the task is an AAT area rather than
    /// a racing turnpoint.
    pub has_targets: bool,
    /// Whether the task is a Modified Area Task (multiple choice of
    /// intermediates) rather than a fixed Racing/AAT sequence.
    pub is_mat: bool,
    pub task_finished: bool,
    pub start: StartStats,
    pub total: LegStat,
    pub current_leg: LegStat,
    pub pev_based_advance_ready: bool,
    /// Whether the active point is waiting to be armed before its satisfied
    /// transition can advance the task (§4.E step 5).
    pub need_to_arm: bool,
    /// The index of the task point whose observation zone currently contains
    /// the aircraft, if any.
    pub inside_oz: Option<usize>,
}

impl Stats {
    /// Whether the task has started: the start point has exited (§3a).
    pub fn has_started(&self) -> bool {
        self.start.has_started()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_stats_report_not_started_and_not_finished() {
        let stats = Stats::default();
        assert!(!stats.has_started());
        assert!(!stats.task_finished);
        assert!(!stats.task_valid);
    }

    #[test]
    fn start_stats_from_exit_captures_pev_flag() {
        let state = AircraftState {
            time: Some(time::Time::MIDNIGHT),
            ..AircraftState::default()
        };
        let start = StartStats::from_exit(state, true);
        assert!(start.has_started());
        assert!(start.advanced_by_pev);
    }
}
