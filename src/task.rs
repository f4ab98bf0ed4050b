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

//! The ordered-task facade (component D, §4.G): owns the task point
//! sequence, wires the transition engine, solvers and start gate together,
//! and publishes [`Stats`] for a collaborator to read.

use log::{debug, warn};

use crate::aircraft::AircraftState;
use crate::advance::TaskAdvance;
use crate::error::TaskValidationError;
use crate::events::TaskEvents;
use crate::geom::{FlatProjection, GeoBox, GeoPoint};
use crate::measurements::Length;
use crate::settings::{OrderedTaskSettings, TaskBehaviour, TaskKind};
use crate::solver::{MaxDistanceSolver, MinDistanceSolver};
use crate::start::StartGate;
use crate::stats::{LegStat, StartStats, Stats};
use crate::task_point::{IntermediateKind, TaskPoint, TaskPointKind};
use crate::time::RoughTime;
use crate::waypoint::Waypoints;

fn intermediate_kind(tp: &TaskPoint) -> Option<IntermediateKind> {
    match tp.kind() {
        TaskPointKind::Intermediate(kind) => Some(kind),
        _ => None,
    }
}

/// Whether `kind` may occupy `index` in a task of `new_len` points, given the
/// `existing` points (excluding `exclude`, for a Replace check against the
/// slot being overwritten) — the factory validity check of §4.G.
fn kind_allowed(existing: &[TaskPoint], kind: TaskPointKind, index: usize, new_len: usize, exclude: Option<usize>) -> bool {
    match kind {
        TaskPointKind::Start => index == 0,
        TaskPointKind::Finish => index + 1 == new_len,
        TaskPointKind::Intermediate(wanted) => {
            index > 0
                && index + 1 < new_len
                && existing
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| Some(*i) != exclude)
                    .filter_map(|(_, tp)| intermediate_kind(tp))
                    .all(|have| have == wanted)
        }
    }
}

/// The legacy `Remove` active-index adjustment, preserved verbatim under
/// [`OrderedTaskSettings::emulate_legacy_remove`] (§9 REDESIGN FLAGS): decrements
/// whenever `active` was strictly past the removed `position`, or (seemingly
/// by accident) whenever `active` was the last index.
fn legacy_remove_decrements(active: usize, position: usize, len_before: usize) -> bool {
    active > position || (active > 0 && active == len_before - 1)
}

/// A complete ordered task: the sequence of task points a glider flies, plus
/// every collaborator the transition engine and solvers need (§3 `OrderedTask`).
pub struct OrderedTask {
    task_points: Vec<TaskPoint>,
    optional_starts: Vec<TaskPoint>,
    projection: FlatProjection,
    behaviour: TaskBehaviour,
    advance: TaskAdvance,
    start_gate: StartGate,
    min_solver: MinDistanceSolver,
    max_solver: MaxDistanceSolver,
    stats: Stats,
    active: usize,
    force_full_update: bool,
    fai_finish_height: Option<Length>,
}

impl OrderedTask {
    pub fn new(behaviour: TaskBehaviour) -> Self {
        let settings = behaviour.ordered_defaults;
        Self {
            task_points: Vec::new(),
            optional_starts: Vec::new(),
            projection: FlatProjection::new(GeoPoint::new(0.0, 0.0)),
            behaviour,
            advance: TaskAdvance::new(settings.advance_mode),
            start_gate: StartGate::new(settings.score_pev, settings.pev_start_wait_time, settings.pev_start_window),
            min_solver: MinDistanceSolver::new(),
            max_solver: MaxDistanceSolver::new(),
            stats: Stats::default(),
            active: 0,
            force_full_update: true,
            fai_finish_height: None,
        }
    }

    pub fn task_points(&self) -> &[TaskPoint] {
        &self.task_points
    }

    pub fn optional_starts(&self) -> &[TaskPoint] {
        &self.optional_starts
    }

    pub fn active_task_point(&self) -> usize {
        self.active
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn settings(&self) -> &OrderedTaskSettings {
        &self.behaviour.ordered_defaults
    }

    pub fn behaviour(&self) -> &TaskBehaviour {
        &self.behaviour
    }

    /// The FAI finish-height floor recomputed from the start point's altitude
    /// when the task started (§4.E, §9 `SetFaiFinishHeight`).
    ///
    /// Computed once, at the tick the start exits; a settings change mid-task
    /// does not recompute it — the upstream behaviour here is ambiguous (§9),
    /// so this pins the simpler of the two readings rather than guessing at
    /// reactivity the distilled spec doesn't describe.
    pub fn fai_finish_height(&self) -> Option<Length> {
        self.fai_finish_height
    }

    pub fn has_started(&self) -> bool {
        self.task_points.first().is_some_and(TaskPoint::has_exited)
    }

    pub fn arm(&mut self) {
        self.advance.arm();
    }

    pub fn set_settings(&mut self, settings: OrderedTaskSettings) {
        self.behaviour.ordered_defaults = settings;
        self.start_gate.score_pev = settings.score_pev;
        self.start_gate.pev_start_wait_time = settings.pev_start_wait_time;
        self.start_gate.pev_start_window = settings.pev_start_window;
        self.advance.set_mode(settings.advance_mode);
        self.min_solver.invalidate();
        self.force_full_update = true;
    }

    pub fn set_start_window(&mut self, window: Option<crate::time::OpenTimeSpan>) {
        self.start_gate.set_fixed_window(window);
    }

    /// Latches a pilot event (§4.F); see [`StartGate::set_pev`].
    pub fn set_pev(&mut self, at: RoughTime, last_state_time: RoughTime) -> bool {
        self.start_gate.set_pev(at, last_state_time)
    }

    /// Resolves any pending PEV into an open start window (§4.F).
    pub fn update_after_pev(&mut self) {
        self.start_gate.update_after_pev();
        self.stats.pev_based_advance_ready = self.start_gate.pev_based_advance_ready();
    }

    /// Validates the task's overall shape (§7a), independent of any single
    /// mutation's local factory check.
    pub fn check_task(&self) -> Vec<TaskValidationError> {
        let mut errors = Vec::new();
        if self.task_points.is_empty() {
            errors.push(TaskValidationError::NoTaskPoints);
            return errors;
        }

        let starts = self.task_points.iter().filter(|tp| tp.is_start()).count();
        if starts == 0 {
            errors.push(TaskValidationError::NoStart);
        } else if starts > 1 {
            errors.push(TaskValidationError::MultipleStarts);
        }

        let finishes = self.task_points.iter().filter(|tp| tp.is_finish()).count();
        if finishes == 0 {
            errors.push(TaskValidationError::NoFinish);
        } else if finishes > 1 {
            errors.push(TaskValidationError::MultipleFinishes);
        }

        let mut kinds = self.task_points.iter().filter_map(intermediate_kind);
        if let Some(first) = kinds.next() {
            if kinds.any(|kind| kind != first) {
                errors.push(TaskValidationError::MixedIntermediateKinds);
            }
        }

        errors
    }

    pub fn append(&mut self, tp: TaskPoint) -> bool {
        let index = self.task_points.len();
        if !kind_allowed(&self.task_points, tp.kind(), index, index + 1, None) {
            warn!("append rejected: {:?} not allowed at index {index}", tp.kind());
            return false;
        }
        self.task_points.push(tp);
        self.after_structural_change();
        true
    }

    pub fn insert(&mut self, index: usize, tp: TaskPoint) -> bool {
        if index > self.task_points.len() {
            return false;
        }
        let new_len = self.task_points.len() + 1;
        if !kind_allowed(&self.task_points, tp.kind(), index, new_len, None) {
            warn!("insert rejected: {:?} not allowed at index {index}", tp.kind());
            return false;
        }
        self.task_points.insert(index, tp);
        if self.active >= index {
            self.active += 1;
        }
        self.after_structural_change();
        true
    }

    pub fn replace(&mut self, index: usize, tp: TaskPoint) -> bool {
        if index >= self.task_points.len() {
            return false;
        }
        let new_len = self.task_points.len();
        if !kind_allowed(&self.task_points, tp.kind(), index, new_len, Some(index)) {
            warn!("replace rejected: {:?} not allowed at index {index}", tp.kind());
            return false;
        }
        self.task_points[index] = tp;
        self.after_structural_change();
        true
    }

    /// Removes the point at `index` (§4.G, §9 `Remove`).
    ///
    /// Active-index adjustment follows [`OrderedTaskSettings::emulate_legacy_remove`]:
    /// the legacy flag preserves the source's observed boolean expression
    /// verbatim; the corrected default decrements whenever the removed
    /// position was at or before the active index.
    pub fn remove(&mut self, index: usize) -> bool {
        if index >= self.task_points.len() {
            return false;
        }
        let len_before = self.task_points.len();
        self.task_points.remove(index);

        let decrement = if self.behaviour.ordered_defaults.emulate_legacy_remove {
            legacy_remove_decrements(self.active, index, len_before)
        } else {
            index <= self.active && self.active > 0
        };
        if decrement {
            self.active -= 1;
        }
        self.active = self.active.min(self.task_points.len().saturating_sub(1));

        self.after_structural_change();
        true
    }

    pub fn append_optional_start(&mut self, tp: TaskPoint) -> bool {
        if !matches!(tp.kind(), TaskPointKind::Start) {
            warn!("optional start rejected: not a Start-kind point");
            return false;
        }
        self.optional_starts.push(tp);
        self.rewire_neighbours();
        true
    }

    /// Applies `other`'s shape onto `self`: shrinks/grows to match length,
    /// then replaces any structurally inequal slot (§4.G `Commit`).
    ///
    /// Unaffected slots keep their accumulated flight-progress state, and a
    /// second `commit` of the same `other` is a no-op — the idempotence
    /// tested in §8 invariant 7.
    pub fn commit(&mut self, other: &OrderedTask, waypoints: &mut impl Waypoints) -> bool {
        let mut modified = self.task_points.len() != other.task_points.len();
        self.task_points.truncate(other.task_points.len());

        for (i, other_tp) in other.task_points.iter().enumerate() {
            match self.task_points.get(i) {
                Some(existing) if existing.structurally_equal(other_tp) => {}
                _ => {
                    let mut replacement = other_tp.clone();
                    let deduped = waypoints.check_exists_or_append(replacement.waypoint().clone());
                    replacement.set_waypoint(deduped);
                    if i < self.task_points.len() {
                        self.task_points[i] = replacement;
                    } else {
                        self.task_points.push(replacement);
                    }
                    modified = true;
                }
            }
        }

        if self.optional_starts != other.optional_starts {
            self.optional_starts = other.optional_starts.clone();
            modified = true;
        }

        if modified {
            self.active = self.active.min(self.task_points.len().saturating_sub(1));
            self.after_structural_change();
            debug!("task committed: {} point(s)", self.task_points.len());
        }
        modified
    }

    /// Deep-copies the task under a (possibly different) [`TaskBehaviour`]
    /// (§4.G `Clone`).
    pub fn clone_with(&self, behaviour: TaskBehaviour) -> Self {
        let settings = behaviour.ordered_defaults;
        let mut cloned = Self {
            task_points: self.task_points.clone(),
            optional_starts: self.optional_starts.clone(),
            projection: self.projection,
            behaviour,
            advance: TaskAdvance::new(settings.advance_mode),
            start_gate: StartGate::new(settings.score_pev, settings.pev_start_wait_time, settings.pev_start_window),
            min_solver: MinDistanceSolver::new(),
            max_solver: MaxDistanceSolver::new(),
            stats: self.stats.clone(),
            active: self.active,
            force_full_update: true,
            fai_finish_height: self.fai_finish_height,
        };
        cloned.after_structural_change();
        cloned
    }

    /// Resets every point's sample/transition state and the task back to its
    /// pre-flight condition (§4.G `Reset`).
    pub fn reset(&mut self) {
        for tp in self.task_points.iter_mut().chain(self.optional_starts.iter_mut()) {
            tp.reset();
        }
        self.stats.start = StartStats::default();
        self.stats.task_finished = false;
        self.stats.pev_based_advance_ready = false;
        self.stats.need_to_arm = false;
        self.stats.inside_oz = None;
        self.advance = TaskAdvance::new(self.behaviour.ordered_defaults.advance_mode);
        self.start_gate.reset();
        self.active = 0;
        self.fai_finish_height = None;
        self.min_solver.invalidate();
        self.rescan_active_state();
        self.force_full_update = true;
        debug!("task reset");
    }

    /// Accepts fixes into every task point's sample state (§4.C), forcing a
    /// full solver resolve if any boundary shape changed.
    pub fn update_samples(&mut self, state: AircraftState) {
        if self.task_points.is_empty() {
            return;
        }

        if let Some(active_point) = self.task_points.get_mut(self.active) {
            if active_point.update_sample_near(state) {
                self.force_full_update = true;
            }
        }

        let projection = self.projection;
        let active = self.active;
        for (i, tp) in self.task_points.iter_mut().enumerate() {
            if i == active || !matches!(tp.kind(), TaskPointKind::Intermediate(IntermediateKind::Aat)) {
                continue;
            }
            if tp.update_sample_far(state, &projection) {
                self.force_full_update = true;
            }
        }
    }

    /// Runs the transition engine for one navigation tick (§4.E): evaluates
    /// the two-point window around the active index, advances the active
    /// index when the pilot's advance policy is satisfied, and fires
    /// lifecycle events on the start/finish edges.
    pub fn check_transitions(&mut self, state: AircraftState, state_last: AircraftState, events: &mut impl TaskEvents) {
        let n = self.task_points.len();
        if n == 0 {
            return;
        }

        let was_started = self.has_started();
        let was_finished = self.stats.task_finished;

        let active = self.active;
        let lo = active.saturating_sub(1);
        let hi = active.min(n - 1);
        let proj_now = self.projection.project_integer(state.location);
        let proj_last = self.projection.project_integer(state_last.location);

        for i in lo..=hi {
            if i == 0 {
                // Optional starts sit at their own physical locations,
                // independent of the primary start's bounding box, so they
                // get their own nearby test rather than being gated on
                // `task_points[0]` being nearby. Selection already applies
                // the triggering transition to the promoted point, so this
                // tick is done with index 0 once it fires: re-deriving
                // enter/exit below would replay the same crossing twice.
                if let Some((enter, exit)) = self.check_optional_starts(state, state_last, events) {
                    if i == active {
                        self.apply_advance(i, enter, exit, state, events);
                    }
                    continue;
                }
            }

            let nearby = self.task_points[i].nearby(proj_now) || self.task_points[i].nearby(proj_last);
            if !nearby {
                continue;
            }

            let enter = self.task_points[i].transition_enter(state.location, state_last.location);
            let exit = self.task_points[i].transition_exit(
                state.location,
                state_last.location,
                self.start_gate.pev_based_advance_ready(),
                self.behaviour.ordered_defaults.score_pev,
            );

            if enter {
                self.task_points[i].mark_entered(state);
                events.enter_transition(&self.task_points[i]);
            }
            if exit {
                self.task_points[i].mark_exited(state);
                events.exit_transition(&self.task_points[i]);
            }

            if i == active {
                self.apply_advance(i, enter, exit, state, events);
            }
        }

        let now_started = self.has_started();
        if now_started && !was_started {
            let exit_state = self.task_points[0].scored_state().unwrap_or(state);
            self.stats.start = StartStats::from_exit(exit_state, self.start_gate.pev_based_advance_ready());
            self.stats.pev_based_advance_ready = false;
            self.fai_finish_height = Some(exit_state.altitude);
            debug!("task started at {:?}", exit_state.time);
            events.task_start();
        }

        let now_finished = self.finish_point().is_some_and(TaskPoint::has_entered);
        self.stats.task_finished = now_finished;
        if now_finished && !was_finished {
            debug!("task finished");
            events.task_finish();
        }

        self.stats.inside_oz = self.task_points.iter().position(|tp| tp.contains(state.location));
    }

    /// The advance-policy check for the active task point, shared between
    /// the ordinary per-point path and the optional-start selection path in
    /// [`Self::check_transitions`].
    fn apply_advance(&mut self, i: usize, enter: bool, exit: bool, state: AircraftState, events: &mut impl TaskEvents) {
        let n = self.task_points.len();
        let gate_ready = if self.task_points[i].is_start() {
            state.time.map_or(true, |t| self.start_gate.is_open(RoughTime::from_time(t)))
        } else {
            true
        };

        if self.advance.check_ready_to_advance(enter, exit, gate_ready) {
            self.advance.disarm();
            if self.active + 1 < n {
                self.active += 1;
                self.force_full_update = true;
                debug!("active task point advanced to {}", self.active);
                events.active_advanced(&self.task_points[self.active], self.active);
                self.rescan_active_state();
            }
        } else if self.advance.needs_arm(enter, exit) {
            self.stats.need_to_arm = true;
            events.request_arm(&self.task_points[i]);
        } else {
            self.stats.need_to_arm = false;
        }
    }

    /// The minimum remaining task distance from `location` (§4.D `DistanceMin`).
    pub fn scan_distance_min(&mut self, location: GeoPoint) -> Length {
        let full = std::mem::take(&mut self.force_full_update);
        let active = self.active;
        let settings = self.behaviour.ordered_defaults;
        let dist = self.min_solver.scan(location, active, &mut self.task_points, &self.projection, &settings, full);
        self.stats.current_leg.dist_remaining = dist;
        self.stats.total.dist_remaining = dist;
        if let Some(result) = self.min_solver.result() {
            self.stats.current_leg.solution_remaining = result.points.clone();
        }
        dist
    }

    /// The maximum achievable task distance (§4.D `DistanceMax`). `pruned`
    /// selects the sampled-history boundary; `false` scans the full nominal
    /// shape for a planned total.
    pub fn scan_distance_max(&mut self, pruned: bool) -> Length {
        let settings = self.behaviour.ordered_defaults;
        let dist = self.max_solver.scan(&mut self.task_points, &self.projection, &settings, pruned);
        if pruned {
            self.stats.total.dist_planned = dist;
        }
        dist
    }

    /// Checks whether an optional start point should be swapped into slot 0
    /// (§3/§4.E step 3). On selection, applies the triggering transition to
    /// the newly promoted point and returns it so the caller can run the
    /// advance-policy check without re-deriving (and re-firing) it.
    fn check_optional_starts(&mut self, state: AircraftState, state_last: AircraftState, events: &mut impl TaskEvents) -> Option<(bool, bool)> {
        if self.task_points.is_empty() || self.optional_starts.is_empty() {
            return None;
        }
        let proj_now = self.projection.project_integer(state.location);
        let proj_last = self.projection.project_integer(state_last.location);

        let selected = self.optional_starts.iter().enumerate().find_map(|(idx, opt)| {
            if !(opt.nearby(proj_now) || opt.nearby(proj_last)) {
                return None;
            }
            let enter = opt.transition_enter(state.location, state_last.location);
            let exit = opt.transition_exit(state.location, state_last.location, false, false);
            (enter || exit).then_some((idx, enter, exit))
        });

        let (idx, enter, exit) = selected?;
        std::mem::swap(&mut self.task_points[0], &mut self.optional_starts[idx]);

        // Replay the transition that triggered selection onto the newly
        // promoted point: it already happened relative to the previous
        // fix, and no future tick will re-cross it, so it must be
        // recorded here or `TaskStart` can never fire via this path.
        if enter {
            self.task_points[0].mark_entered(state);
            events.enter_transition(&self.task_points[0]);
        }
        if exit {
            self.task_points[0].mark_exited(state);
            events.exit_transition(&self.task_points[0]);
        }

        self.rewire_neighbours();
        self.force_full_update = true;
        debug!("optional start {idx} selected, swapped into slot 0");
        Some((enter, exit))
    }

    fn finish_point(&self) -> Option<&TaskPoint> {
        self.task_points.last().filter(|tp| tp.is_finish())
    }

    fn after_structural_change(&mut self) {
        self.active = self.active.min(self.task_points.len().saturating_sub(1));
        self.recompute_projection();
        self.rewire_neighbours();
        self.rescan_active_state();
        self.stats.task_valid = self.check_task().is_empty();
        self.stats.has_targets = self.task_points.iter().any(|tp| tp.as_aat().is_some());
        self.stats.is_mat = self.behaviour.task_type_default == TaskKind::Mat;
        self.min_solver.invalidate();
        self.force_full_update = true;
    }

    fn recompute_projection(&mut self) {
        self.projection = FlatProjection::from_points(self.task_points.iter().map(TaskPoint::location));
        self.stats.bounds = GeoBox::bounding(self.task_points.iter().map(TaskPoint::location));
    }

    fn rewire_neighbours(&mut self) {
        let locations: Vec<GeoPoint> = self.task_points.iter().map(TaskPoint::location).collect();
        let projection = self.projection;
        for (i, tp) in self.task_points.iter_mut().enumerate() {
            let prev = i.checked_sub(1).map(|j| locations[j]);
            let next = locations.get(i + 1).copied();
            tp.set_neighbours(prev, next);
            tp.update_oz(&projection);
        }

        let next_after_start = locations.get(1).copied();
        for opt in &mut self.optional_starts {
            opt.set_neighbours(None, next_after_start);
            opt.update_oz(&projection);
        }
    }

    fn rescan_active_state(&mut self) {
        let active = self.active;
        for (i, tp) in self.task_points.iter_mut().enumerate() {
            tp.scan_active(i, active);
        }
    }
}
