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

//! The callback sink collaborator (§6) that `CheckTransitions` fires into,
//! synchronously, in the order listed in §4.E.

use crate::task_point::TaskPoint;

/// Receives task-progress notifications fired synchronously from
/// [`OrderedTask::check_transitions`](crate::task::OrderedTask::check_transitions).
///
/// A no-op default is provided for every method, so a collaborator only
/// needs to implement the events it cares about.
pub trait TaskEvents {
    /// The aircraft entered `point`'s observation zone.
    fn enter_transition(&mut self, point: &TaskPoint) {
        let _ = point;
    }

    /// The aircraft exited `point`'s observation zone.
    fn exit_transition(&mut self, point: &TaskPoint) {
        let _ = point;
    }

    /// The active index advanced to `index`, now pointing at `point`.
    fn active_advanced(&mut self, point: &TaskPoint, index: usize) {
        let _ = (point, index);
    }

    /// `point` is the active point and its advance mode requires arming
    /// before the transition it just satisfied can advance the task.
    fn request_arm(&mut self, point: &TaskPoint) {
        let _ = point;
    }

    /// The task has just started (start point exited for the first time).
    fn task_start(&mut self) {}

    /// The task has just finished (finish point entered for the first
    /// time).
    fn task_finish(&mut self) {}
}

/// A [`TaskEvents`] sink that does nothing; the default when a caller has no
/// collaborator wired up yet.
#[derive(Copy, Clone, Default, Debug)]
pub struct NullTaskEvents;

impl TaskEvents for NullTaskEvents {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oz::ObservationZone;
    use crate::task_point::{TaskPoint, TaskPointKind};
    use crate::waypoint::Waypoint;
    use crate::{geopoint, measurements::Length};

    #[derive(Default)]
    struct Recorder {
        starts: u32,
        finishes: u32,
    }

    impl TaskEvents for Recorder {
        fn task_start(&mut self) {
            self.starts += 1;
        }

        fn task_finish(&mut self) {
            self.finishes += 1;
        }
    }

    #[test]
    fn recorder_counts_lifecycle_events() {
        let mut events = Recorder::default();
        events.task_start();
        events.task_finish();
        assert_eq!(events.starts, 1);
        assert_eq!(events.finishes, 1);
    }

    #[test]
    fn null_events_ignores_everything() {
        let mut events = NullTaskEvents;
        let wp = Waypoint::new("A", geopoint!(0.0, 0.0));
        let point = TaskPoint::new(wp, ObservationZone::cylinder(Length::m(1000.0)).unwrap(), TaskPointKind::Start);
        events.enter_transition(&point);
        events.task_start();
    }
}
