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

//! The auto/arm/manual advance policy consulted by the transition engine
//! (§4.E, §4.G) to decide whether a satisfied transition is allowed to move
//! the active index forward.

use crate::settings::TaskAdvanceMode;

/// Tracks whether the active task point is armed to advance, on top of the
/// pilot's configured [`TaskAdvanceMode`].
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct TaskAdvance {
    mode: TaskAdvanceMode,
    armed: bool,
}

impl TaskAdvance {
    pub fn new(mode: TaskAdvanceMode) -> Self {
        Self { mode, armed: false }
    }

    pub fn mode(&self) -> TaskAdvanceMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: TaskAdvanceMode) {
        self.mode = mode;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn arm(&mut self) {
        self.armed = true;
    }

    pub fn disarm(&mut self) {
        self.armed = false;
    }

    /// Whether a transition that just fired (`transition_enter` or
    /// `transition_exit`) is allowed to advance the active index, given the
    /// pilot's advance mode and whether the start gate considers itself open
    /// (`gate_ready`; always `true` for non-start points).
    pub fn check_ready_to_advance(&mut self, transition_enter: bool, transition_exit: bool, gate_ready: bool) -> bool {
        if !gate_ready || !(transition_enter || transition_exit) {
            return false;
        }

        match self.mode {
            TaskAdvanceMode::Manual => false,
            TaskAdvanceMode::Auto => true,
            TaskAdvanceMode::Arm => self.armed,
        }
    }

    /// Whether the active point requires arming and a transition is pending
    /// it (used by the transition engine to emit `RequestArm`, §4.E step 5).
    pub fn needs_arm(&self, transition_enter: bool, transition_exit: bool) -> bool {
        self.mode == TaskAdvanceMode::Arm && !self.armed && (transition_enter || transition_exit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_mode_never_advances() {
        let mut advance = TaskAdvance::new(TaskAdvanceMode::Manual);
        assert!(!advance.check_ready_to_advance(true, false, true));
    }

    #[test]
    fn auto_mode_advances_on_exit() {
        let mut advance = TaskAdvance::new(TaskAdvanceMode::Auto);
        assert!(advance.check_ready_to_advance(false, true, true));
    }

    #[test]
    fn auto_mode_is_gated_by_start_window() {
        let mut advance = TaskAdvance::new(TaskAdvanceMode::Auto);
        assert!(!advance.check_ready_to_advance(false, true, false));
    }

    #[test]
    fn arm_mode_requires_arming_first() {
        let mut advance = TaskAdvance::new(TaskAdvanceMode::Arm);
        assert!(advance.needs_arm(false, true));
        assert!(!advance.check_ready_to_advance(false, true, true));
        advance.arm();
        assert!(advance.check_ready_to_advance(false, true, true));
        assert!(!advance.needs_arm(false, true));
    }

    #[test]
    fn disarm_resets_arm_state() {
        let mut advance = TaskAdvance::new(TaskAdvanceMode::Arm);
        advance.arm();
        advance.disarm();
        assert!(!advance.is_armed());
    }
}
