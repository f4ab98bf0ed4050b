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

//! The configuration surface (§6, ambient component L): two plain,
//! `Default`-able config bags rather than a scattering of global constants.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::measurements::Duration;

/// The pilot's configured reaction to a task point's transition becoming
/// satisfiable (§4.E).
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TaskAdvanceMode {
    /// The active index never advances on its own; a collaborator must call
    /// the facade's manual-advance entry point.
    Manual,
    /// Advances the moment the transition fires.
    #[default]
    Auto,
    /// Requires the point to be armed (`RequestArm` fired, then a caller
    /// arms it) before a transition is allowed to advance the active index.
    Arm,
}

/// Per-task settings governing start-gate rules and solver behaviour (§4.F,
/// §4.D, §9).
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderedTaskSettings {
    /// FAI Annex A §6.3: shave one cylinder radius off each end of the
    /// scored distance. A field rather than the source's global constant, so
    /// the rule can be turned off for task types that don't use it.
    pub subtract_start_finish_cylinder_radius: bool,

    /// Preserves the source's observed (possibly off-by-one) `Remove`
    /// behaviour around the active index — see §9 / REDESIGN FLAGS. `false`
    /// gives the corrected behaviour.
    pub emulate_legacy_remove: bool,

    /// Whether the start gate is scored by a pilot-event rather than a fixed
    /// window (§4.F).
    pub score_pev: bool,

    /// How long after a pilot event the start window opens.
    pub pev_start_wait_time: Duration,

    /// Width of the start window opened by a pilot event, when `score_pev`
    /// is `false`.
    pub pev_start_window: Duration,

    /// Minimum time an AAT task must be flown for before it is scored at
    /// full value; `None` for racing tasks.
    pub aat_min_time: Option<Duration>,

    /// The pilot's configured advance policy (§4.E).
    pub advance_mode: TaskAdvanceMode,
}

impl Default for OrderedTaskSettings {
    fn default() -> Self {
        Self {
            subtract_start_finish_cylinder_radius: true,
            emulate_legacy_remove: false,
            score_pev: false,
            pev_start_wait_time: Duration::min(0.0),
            pev_start_window: Duration::min(0.0),
            aat_min_time: None,
            advance_mode: TaskAdvanceMode::default(),
        }
    }
}

/// Target-optimisation and glide-solution knobs (§6); consumed by stats
/// aggregation, never stored by the engine beyond the call that needs it.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GlideSettings {
    /// Whether leg-wise MacCready solutions assume still air or the
    /// configured wind. The wind model itself is out of scope (§1); this
    /// only flags whether stats should ask the glide polar's interface to
    /// account for it.
    pub predict_wind_drift: bool,
}

/// The default task type new tasks are created with.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TaskKind {
    #[default]
    Racing,
    Aat,
    Mat,
}

/// The wider flight-computer configuration bag (§6), of which only a slice
/// is relevant to this engine.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TaskBehaviour {
    pub task_type_default: TaskKind,
    pub ordered_defaults: OrderedTaskSettings,
    pub optimise_targets_range: bool,
    pub optimise_targets_margin: Duration,
    pub optimise_targets_bearing: bool,
    pub glide: GlideSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_subtract_cylinder_radius() {
        assert!(OrderedTaskSettings::default().subtract_start_finish_cylinder_radius);
    }

    #[test]
    fn default_advance_mode_is_auto() {
        assert_eq!(OrderedTaskSettings::default().advance_mode, TaskAdvanceMode::Auto);
    }
}
