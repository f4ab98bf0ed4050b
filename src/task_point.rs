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

//! One node in an ordered task (component C): a waypoint, an observation
//! zone, and the sample/transition state the task point accumulates as the
//! flight progresses.

use log::trace;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::aircraft::AircraftState;
use crate::geom::{FlatBoundingBox, FlatProjection, GeoPoint, SearchPoint};
use crate::measurements::Angle;
use crate::oz::ObservationZone;
use crate::waypoint::Waypoint;

/// Which kind of intermediate point this is: a single fix to round (racing)
/// or an area the pilot may fly anywhere inside (assigned area task).
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum IntermediateKind {
    Racing,
    Aat,
}

/// A task point's position in the ordered sequence (§3).
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TaskPointKind {
    Start,
    Intermediate(IntermediateKind),
    Finish,
}

/// A task point's state relative to the active index, recomputed by
/// [`TaskPoint::scan_active`] each time the active index changes (§4.C).
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub enum ActiveState {
    BeforeActive,
    #[default]
    CurrentActive,
    AfterActive,
}

/// One node in the ordered task.
///
/// Owns its waypoint and observation zone; `bisector`/`prev_location`/
/// `next_location` are cached, non-owning results of
/// [`set_neighbours`](Self::set_neighbours) rather than back-references to
/// the neighbouring `TaskPoint`s themselves (§9, "cyclic neighbour
/// pointers"). Both neighbour locations feed [`prune_boundary`](Self::prune_boundary),
/// which needs a fix's distance to each side of the leg to prune an AAT
/// sector's boundary (§4.B.1).
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TaskPoint {
    waypoint: Waypoint,
    oz: ObservationZone,
    kind: TaskPointKind,

    bisector: Angle,
    prev_location: Option<GeoPoint>,
    next_location: Option<GeoPoint>,

    has_entered: bool,
    has_exited: bool,
    scored_state: Option<AircraftState>,

    boundary_points: Vec<SearchPoint>,
    sample_near_points: Vec<SearchPoint>,
    achieved_depth_prev: Option<f32>,
    achieved_depth_next: Option<f32>,

    #[cfg_attr(feature = "serde", serde(skip))]
    bb: Option<FlatBoundingBox>,
    active_state: ActiveState,

    search_min: Option<SearchPoint>,
    search_max: Option<SearchPoint>,
    search_max_total: Option<SearchPoint>,
}

/// How many vertices a task point's observation zone boundary is sampled
/// into for the path solver (§5: bounded at 24 in the cost analysis).
pub const BOUNDARY_SAMPLE_COUNT: usize = 24;

impl TaskPoint {
    pub fn new(waypoint: Waypoint, oz: ObservationZone, kind: TaskPointKind) -> Self {
        Self {
            waypoint,
            oz,
            kind,
            bisector: Angle::t(0.0),
            prev_location: None,
            next_location: None,
            has_entered: false,
            has_exited: false,
            scored_state: None,
            boundary_points: Vec::new(),
            sample_near_points: Vec::new(),
            achieved_depth_prev: None,
            achieved_depth_next: None,
            bb: None,
            active_state: ActiveState::default(),
            search_min: None,
            search_max: None,
            search_max_total: None,
        }
    }

    pub fn waypoint(&self) -> &Waypoint {
        &self.waypoint
    }

    pub fn location(&self) -> GeoPoint {
        self.waypoint.location()
    }

    pub fn oz(&self) -> &ObservationZone {
        &self.oz
    }

    pub fn kind(&self) -> TaskPointKind {
        self.kind
    }

    pub fn is_start(&self) -> bool {
        matches!(self.kind, TaskPointKind::Start)
    }

    pub fn is_finish(&self) -> bool {
        matches!(self.kind, TaskPointKind::Finish)
    }

    /// Replaces a C-style downcast to an AAT-specific subtype (§9) with a
    /// capability check: `Some(self)` iff this point is an AAT intermediate.
    pub fn as_aat(&self) -> Option<&Self> {
        matches!(self.kind, TaskPointKind::Intermediate(IntermediateKind::Aat)).then_some(self)
    }

    /// Whether this point's scored state is captured on exit (Start) or
    /// entry (Intermediate, Finish) (§3, "scored state").
    pub fn scores_on_exit(&self) -> bool {
        self.is_start()
    }

    pub fn has_entered(&self) -> bool {
        self.has_entered
    }

    pub fn has_exited(&self) -> bool {
        self.has_exited
    }

    pub fn scored_state(&self) -> Option<AircraftState> {
        self.scored_state
    }

    pub fn bisector(&self) -> Angle {
        self.bisector
    }

    pub fn active_state(&self) -> ActiveState {
        self.active_state
    }

    pub fn boundary_points(&self) -> &[SearchPoint] {
        &self.boundary_points
    }

    pub fn bounding_box(&self) -> Option<FlatBoundingBox> {
        self.bb
    }

    pub fn search_min(&self) -> Option<SearchPoint> {
        self.search_min
    }

    pub fn search_max(&self) -> Option<SearchPoint> {
        self.search_max
    }

    pub fn search_max_total(&self) -> Option<SearchPoint> {
        self.search_max_total
    }

    pub fn set_search_min(&mut self, sp: SearchPoint) {
        self.search_min = Some(sp);
    }

    pub fn set_search_max(&mut self, sp: SearchPoint) {
        self.search_max = Some(sp);
    }

    pub fn set_search_max_total(&mut self, sp: SearchPoint) {
        self.search_max_total = Some(sp);
    }

    /// Overwrites this point's waypoint, e.g. with a database's deduplicated
    /// copy during [`OrderedTask::commit`](crate::task::OrderedTask::commit).
    pub fn set_waypoint(&mut self, waypoint: Waypoint) {
        self.waypoint = waypoint;
    }

    /// Whether `self` and `other` describe the same task point structurally
    /// (waypoint, zone, kind), ignoring the flight-progress state each has
    /// accumulated — what [`OrderedTask::commit`](crate::task::OrderedTask::commit)
    /// checks to decide whether a slot needs replacing.
    pub fn structurally_equal(&self, other: &Self) -> bool {
        self.waypoint == other.waypoint && self.oz == other.oz && self.kind == other.kind
    }

    /// Recomputes this point's state relative to `active` (§4.C).
    pub fn scan_active(&mut self, my_index: usize, active: usize) {
        self.active_state = match my_index.cmp(&active) {
            std::cmp::Ordering::Less => ActiveState::BeforeActive,
            std::cmp::Ordering::Equal => ActiveState::CurrentActive,
            std::cmp::Ordering::Greater => ActiveState::AfterActive,
        };
    }

    /// Caches the bisector angle and previous-point location this point's
    /// sector-shaped zones need (§4.C).
    ///
    /// An intermediate point's sector opens away from the turn (bisecting
    /// the reciprocal of the incoming leg and the outgoing leg); a start
    /// point with no previous leg opens toward the next point; a finish
    /// point with no next leg opens back toward the previous one. This
    /// convention is a design decision (the source's bisector is derived
    /// the same way but through neighbour object pointers) — see DESIGN.md.
    pub fn set_neighbours(&mut self, prev: Option<GeoPoint>, next: Option<GeoPoint>) {
        self.prev_location = prev;
        self.next_location = next;
        self.bisector = match (prev, next) {
            (Some(prev), Some(next)) => {
                Angle::bisect(self.location().bearing(&prev).reciprocal(), self.location().bearing(&next))
            }
            (None, Some(next)) => self.location().bearing(&next),
            (Some(prev), None) => self.location().bearing(&prev).reciprocal(),
            (None, None) => Angle::t(0.0),
        };
    }

    /// Recomputes cached observation-zone geometry under `projection`:
    /// the full nominal boundary (the starting point for the reachable
    /// boundary a flight prunes down) and the projected bounding box.
    ///
    /// Called after every structural change and after the task's projection
    /// is refreshed (§4.C).
    pub fn update_oz(&mut self, projection: &FlatProjection) {
        self.boundary_points = self.oz.nominal_boundary(self.location(), self.bisector, BOUNDARY_SAMPLE_COUNT, projection);
        self.bb = FlatBoundingBox::bounding(self.boundary_points.iter().map(SearchPoint::projected));
        self.achieved_depth_prev = None;
        self.achieved_depth_next = None;
    }

    /// The full, unmodified zone boundary (§3 `NominalBoundary`), ignoring
    /// any pruning from sampled flight history — used for planned-total
    /// solves (`DistanceMax` without sampled pruning, §4.D).
    pub fn nominal_boundary(&self, projection: &FlatProjection) -> Vec<SearchPoint> {
        self.oz.nominal_boundary(self.location(), self.bisector, BOUNDARY_SAMPLE_COUNT, projection)
    }

    /// Whether `p` lies within this point's observation zone.
    pub fn contains(&self, p: GeoPoint) -> bool {
        self.oz.contains(self.location(), self.bisector, p)
    }

    /// Whether `p` falls within this point's cached bounding box, inflated
    /// by `radius` projected units — the "nearby" test the transition engine
    /// uses to decide whether a point needs evaluating at all (§4.E).
    pub fn nearby(&self, p: (i32, i32)) -> bool {
        self.bb.is_some_and(|bb| bb.contains_point(p))
    }

    /// `!Contains(state_last) && Contains(state)` (§4.B). Shapes with no
    /// interior (`Line`) have no containment to toggle, so the crossing
    /// itself — detected by segment intersection against the zone's
    /// boundary — stands in for both the enter and exit edge, latched so a
    /// line is only ever crossed once per [`reset`](Self::reset).
    pub fn transition_enter(&self, state: GeoPoint, state_last: GeoPoint) -> bool {
        if self.oz.needs_segment_intersection() {
            return !self.has_entered && self.oz.crossed(self.location(), self.bisector, state_last, state);
        }
        !self.contains(state_last) && self.contains(state)
    }

    /// `Contains(state_last) && !Contains(state)`, additionally gated for a
    /// PEV-scored start by `pev_ready` (§4.B).
    pub fn transition_exit(&self, state: GeoPoint, state_last: GeoPoint, pev_ready: bool, score_pev: bool) -> bool {
        let crossed = if self.oz.needs_segment_intersection() {
            !self.has_exited && self.oz.crossed(self.location(), self.bisector, state_last, state)
        } else {
            self.contains(state_last) && !self.contains(state)
        };
        if crossed && self.is_start() && score_pev {
            return pev_ready;
        }
        crossed
    }

    /// Marks the point entered, latching the scored state if this kind
    /// scores on entry.
    pub fn mark_entered(&mut self, state: AircraftState) {
        self.has_entered = true;
        if !self.scores_on_exit() {
            self.scored_state = Some(state);
        }
        trace!("task point {} entered", self.waypoint.ident());
    }

    /// Marks the point exited, latching the scored state if this kind
    /// scores on exit (the Start point).
    pub fn mark_exited(&mut self, state: AircraftState) {
        self.has_exited = true;
        if self.scores_on_exit() {
            self.scored_state = Some(state);
        }
        trace!("task point {} exited", self.waypoint.ident());
    }

    /// Appends `state` to the achieved polygon when it is inside the zone,
    /// pruning `boundary_points` down to the still-reachable remainder.
    /// Returns `true` if the boundary changed shape, so callers know to
    /// force a full solver resolve (§4.C).
    ///
    /// A no-op for any point that isn't an AAT intermediate: area pruning is
    /// scoped to assigned-area sectors (§3/§4.B.1), so flying into a
    /// Start/Finish/racing cylinder never deforms its boundary.
    pub fn update_sample_near(&mut self, state: AircraftState) -> bool {
        if !self.contains(state.location) {
            return false;
        }
        self.prune_boundary(state)
    }

    /// As [`update_sample_near`](Self::update_sample_near), for fixes just
    /// outside the zone but within its bounding box — lets a flight that
    /// skims an AAT sector's edge without crossing it still prune the
    /// boundary (§4.C).
    pub fn update_sample_far(&mut self, state: AircraftState, projection: &FlatProjection) -> bool {
        if self.contains(state.location) {
            return false;
        }
        if !self.nearby(projection.project_integer(state.location)) {
            return false;
        }
        self.prune_boundary(state)
    }

    /// Discards boundary vertices that are farther than the fix from *both*
    /// neighbours — the dual condition in §4.B.1 ("farther from the next
    /// task point than the fix is from next, and farther from the previous
    /// task point than the fix is from prev"). A vertex that would let an
    /// optimizer gain on only one side is not actually dominated, so either
    /// condition alone would over-prune a reachable vertex.
    fn prune_boundary(&mut self, state: AircraftState) -> bool {
        if self.as_aat().is_none() {
            return false;
        }
        if self.boundary_points.is_empty() {
            return false;
        }

        self.sample_near_points.push(SearchPoint::new(state.location, &Self::projection_of(&self.boundary_points)));

        let prev_ref = self.prev_location.unwrap_or_else(|| self.location());
        let next_ref = self.next_location.unwrap_or_else(|| self.location());
        let depth_prev = prev_ref.distance(&state.location).to_si();
        let depth_next = next_ref.distance(&state.location).to_si();

        let achieved_prev = self.achieved_depth_prev.map_or(depth_prev, |d| d.max(depth_prev));
        let achieved_next = self.achieved_depth_next.map_or(depth_next, |d| d.max(depth_next));
        if achieved_prev <= self.achieved_depth_prev.unwrap_or(f32::NEG_INFINITY)
            && achieved_next <= self.achieved_depth_next.unwrap_or(f32::NEG_INFINITY)
        {
            return false;
        }
        self.achieved_depth_prev = Some(achieved_prev);
        self.achieved_depth_next = Some(achieved_next);

        let before = self.boundary_points.len();
        self.boundary_points.retain(|bp| {
            let farther_from_prev = prev_ref.distance(&bp.location()).to_si() > achieved_prev;
            let farther_from_next = next_ref.distance(&bp.location()).to_si() > achieved_next;
            !(farther_from_prev && farther_from_next)
        });
        let changed = self.boundary_points.len() != before;
        if changed {
            trace!(
                "task point {} boundary pruned to {} of {} vertices",
                self.waypoint.ident(),
                self.boundary_points.len(),
                before
            );
        }
        changed
    }

    /// Placeholder projection recovery for [`sample_near_points`]: the
    /// engine never re-derives geometry from a `SearchPoint`, it only needs
    /// *a* projection to keep the accumulated sample's projected coordinate
    /// consistent with the boundary it was pruned against.
    fn projection_of(boundary: &[SearchPoint]) -> FlatProjection {
        FlatProjection::from_points(boundary.first().map(|sp| sp.location()))
    }

    /// Resets all per-flight sample/transition state (§4.G `Reset`).
    pub fn reset(&mut self) {
        self.has_entered = false;
        self.has_exited = false;
        self.scored_state = None;
        self.sample_near_points.clear();
        self.achieved_depth_prev = None;
        self.achieved_depth_next = None;
        self.search_min = None;
        self.search_max = None;
        self.search_max_total = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geopoint;
    use crate::measurements::{Length, Speed};

    fn wp(ident: &str, lat: f64, lon: f64) -> Waypoint {
        Waypoint::new(ident, geopoint!(lat, lon))
    }

    fn state_at(lat: f64, lon: f64) -> AircraftState {
        AircraftState {
            location: geopoint!(lat, lon),
            altitude: Length::m(1000.0),
            ground_speed: Speed::mps(30.0),
            time: None,
            flying: true,
        }
    }

    fn projection() -> FlatProjection {
        FlatProjection::new(geopoint!(0.0, 0.0))
    }

    #[test]
    fn enter_marks_entered_and_scores_intermediate() {
        let mut tp = TaskPoint::new(wp("A", 0.0, 0.0), ObservationZone::cylinder(Length::m(1000.0)).unwrap(), TaskPointKind::Intermediate(IntermediateKind::Racing));
        tp.update_oz(&projection());
        let s = state_at(0.0, 0.0);
        assert!(tp.transition_enter(s.location, geopoint!(1.0, 0.0)));
        tp.mark_entered(s);
        assert!(tp.has_entered());
        assert_eq!(tp.scored_state(), Some(s));
    }

    #[test]
    fn start_scores_on_exit_not_entry() {
        let mut tp = TaskPoint::new(wp("S", 0.0, 0.0), ObservationZone::cylinder(Length::m(1000.0)).unwrap(), TaskPointKind::Start);
        tp.update_oz(&projection());
        tp.mark_entered(state_at(0.0, 0.0));
        assert!(tp.scored_state().is_none());
        let exit_state = state_at(1.0, 0.0);
        tp.mark_exited(exit_state);
        assert_eq!(tp.scored_state(), Some(exit_state));
    }

    #[test]
    fn aat_boundary_prunes_as_aircraft_flies_deeper() {
        let mut tp = TaskPoint::new(
            wp("T", 0.0, 0.0),
            ObservationZone::cylinder(Length::m(5000.0)).unwrap(),
            TaskPointKind::Intermediate(IntermediateKind::Aat),
        );
        tp.set_neighbours(Some(geopoint!(-1.0, 0.0)), Some(geopoint!(1.0, 0.0)));
        tp.update_oz(&projection());
        let before = tp.boundary_points().len();

        // A fix east of the turn point, well inside its cylinder, is farther
        // from both the south prev and the north next neighbour than the
        // symmetric far-east boundary vertex — pruning it requires both
        // halves of the dual condition to agree.
        let deep_fix = geopoint!(0.0, 0.0).destination(Angle::t(90.0), Length::m(4000.0));
        let changed = tp.update_sample_near(state_at(deep_fix.latitude(), deep_fix.longitude()));
        assert!(changed);
        assert!(tp.boundary_points().len() < before);
    }

    #[test]
    fn non_aat_boundary_is_not_pruned_by_entering_the_zone() {
        let mut tp = TaskPoint::new(wp("T", 0.0, 0.0), ObservationZone::cylinder(Length::m(5000.0)).unwrap(), TaskPointKind::Intermediate(IntermediateKind::Racing));
        tp.set_neighbours(Some(geopoint!(-1.0, 0.0)), Some(geopoint!(1.0, 0.0)));
        tp.update_oz(&projection());
        let before = tp.boundary_points().len();

        let deep_fix = geopoint!(-1.0, 0.0).destination(Angle::t(90.0), Length::m(4000.0));
        let changed = tp.update_sample_near(state_at(deep_fix.latitude(), deep_fix.longitude()));
        assert!(!changed);
        assert_eq!(tp.boundary_points().len(), before);
    }

    #[test]
    fn start_point_boundary_is_not_pruned_by_entering_the_zone() {
        let mut tp = TaskPoint::new(wp("S", 0.0, 0.0), ObservationZone::cylinder(Length::m(1000.0)).unwrap(), TaskPointKind::Start);
        tp.update_oz(&projection());
        let before = tp.boundary_points().len();

        let changed = tp.update_sample_near(state_at(0.0, 0.0));
        assert!(!changed);
        assert_eq!(tp.boundary_points().len(), before);
    }

    #[test]
    fn line_task_point_transitions_by_segment_crossing_not_containment() {
        let mut tp = TaskPoint::new(wp("L", 0.0, 0.0), ObservationZone::line(Length::m(2000.0)).unwrap(), TaskPointKind::Finish);
        tp.set_neighbours(Some(geopoint!(-1.0, 0.0)), None);
        tp.update_oz(&projection());

        let before = geopoint!(-0.01, 0.0);
        let after = geopoint!(0.01, 0.0);
        assert!(tp.transition_enter(after, before));
        assert!(tp.transition_exit(after, before, false, false));

        tp.mark_entered(state_at(after.latitude(), after.longitude()));
        tp.mark_exited(state_at(after.latitude(), after.longitude()));
        assert!(!tp.transition_enter(after, before));
        assert!(!tp.transition_exit(after, before, false, false));
    }

    #[test]
    fn as_aat_only_matches_aat_intermediates() {
        let racing = TaskPoint::new(wp("R", 0.0, 0.0), ObservationZone::cylinder(Length::m(1000.0)).unwrap(), TaskPointKind::Intermediate(IntermediateKind::Racing));
        assert!(racing.as_aat().is_none());

        let aat = TaskPoint::new(wp("A", 0.0, 0.0), ObservationZone::cylinder(Length::m(1000.0)).unwrap(), TaskPointKind::Intermediate(IntermediateKind::Aat));
        assert!(aat.as_aat().is_some());
    }

    #[test]
    fn reset_clears_sample_state_but_not_geometry() {
        let mut tp = TaskPoint::new(wp("A", 0.0, 0.0), ObservationZone::cylinder(Length::m(1000.0)).unwrap(), TaskPointKind::Start);
        tp.update_oz(&projection());
        tp.mark_entered(state_at(0.0, 0.0));
        tp.mark_exited(state_at(0.0, 0.0));
        tp.reset();
        assert!(!tp.has_entered());
        assert!(!tp.has_exited());
        assert!(tp.scored_state().is_none());
        assert!(!tp.boundary_points().is_empty());
    }
}
