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

//! The path solver (component E, §4.D): the hardest subsystem in the
//! engine.
//!
//! Both variants share [`solve_layers`], a layered shortest/longest-path
//! sweep over a DAG whose layers are task points (or the aircraft) and
//! whose edges are Euclidean distances between adjacent layers' boundary
//! candidates. Because every edge points strictly from layer `i` to layer
//! `i + 1`, settling each layer in order visits vertices in exactly the
//! order Dijkstra would have settled them — the layering makes the priority
//! queue unnecessary without changing the result.

use log::debug;

use crate::geom::{FlatProjection, GeoPoint, SearchPoint};
use crate::measurements::Length;
use crate::oz::ObservationZone;
use crate::settings::OrderedTaskSettings;
use crate::task_point::TaskPoint;

/// The outcome of one layered solve: the chosen boundary vertex per layer
/// and the resulting path length.
#[derive(Clone, Debug)]
pub struct SolverResult {
    pub points: Vec<SearchPoint>,
    pub distance: Length,
}

/// Runs the layered min/max-path sweep over `layers`.
///
/// `maximize = false` gives the shortest path (`DistanceMin`); `true` gives
/// the longest (`DistanceMax`). Returns `None` if any layer is empty (an
/// empty task point never contributes a usable boundary). Cost is
/// `O(layers.len() * B^2)` where `B` is the widest layer — the bound named
/// in §5.
pub fn solve_layers(layers: &[Vec<SearchPoint>], maximize: bool) -> Option<SolverResult> {
    if layers.is_empty() || layers.iter().any(Vec::is_empty) {
        return None;
    }

    let mut cum = vec![0.0_f64; layers[0].len()];
    let mut parents: Vec<Vec<usize>> = vec![vec![usize::MAX; layers[0].len()]];

    for window in layers.windows(2) {
        let (prev, cur) = (&window[0], &window[1]);
        let worst = if maximize { f64::NEG_INFINITY } else { f64::INFINITY };
        let mut next_cum = vec![worst; cur.len()];
        let mut next_parent = vec![0usize; cur.len()];

        for (ci, cur_point) in cur.iter().enumerate() {
            for (pi, prev_point) in prev.iter().enumerate() {
                let candidate = cum[pi] + prev_point.dist_to(cur_point);
                let better = if maximize { candidate > next_cum[ci] } else { candidate < next_cum[ci] };
                if better {
                    next_cum[ci] = candidate;
                    next_parent[ci] = pi;
                }
            }
        }

        cum = next_cum;
        parents.push(next_parent);
    }

    let last = if maximize {
        cum.iter().enumerate().max_by(|a, b| a.1.total_cmp(b.1))
    } else {
        cum.iter().enumerate().min_by(|a, b| a.1.total_cmp(b.1))
    }
    .map(|(i, _)| i)?;

    let mut chosen = vec![0usize; layers.len()];
    let mut idx = last;
    for li in (0..layers.len()).rev() {
        chosen[li] = idx;
        if li > 0 {
            idx = parents[li][idx];
        }
    }

    let points = chosen.iter().enumerate().map(|(li, &i)| layers[li][i]).collect();
    Some(SolverResult {
        points,
        distance: Length::m(cum[last] as f32),
    })
}

/// The cylinder radius of a task point's observation zone, or `None` for
/// any other shape — start/finish radius subtraction (§4.D) only applies to
/// cylinders.
fn cylinder_radius(tp: &TaskPoint) -> Option<Length> {
    match tp.oz() {
        ObservationZone::Cylinder { radius } => Some(*radius),
        _ => None,
    }
}

fn layer_for(tp: &TaskPoint, projection: &FlatProjection, pruned: bool, use_center: bool) -> Vec<SearchPoint> {
    if use_center {
        return vec![SearchPoint::new(tp.location(), projection)];
    }
    if pruned {
        tp.boundary_points().to_vec()
    } else {
        tp.nominal_boundary(projection)
    }
}

/// After solving, shifts the reported start/finish point from the cylinder
/// center onto the cylinder boundary, toward the chosen neighbour, and
/// shortens the total by exactly that radius (FAI Annex A §6.3).
fn subtract_cylinder_radii(result: &mut SolverResult, task_points: &[TaskPoint], projection: &FlatProjection) {
    let n = task_points.len();
    if result.points.len() < 2 || n == 0 {
        return;
    }

    if let Some(radius) = cylinder_radius(&task_points[0]) {
        let shifted = result.points[0].location().intermediate_point(&result.points[1].location(), radius);
        result.points[0] = SearchPoint::new(shifted, projection);
        result.distance = result.distance - radius;
    }

    if let Some(radius) = cylinder_radius(&task_points[n - 1]) {
        let last = result.points.len() - 1;
        let shifted = result.points[last].location().intermediate_point(&result.points[last - 1].location(), radius);
        result.points[last] = SearchPoint::new(shifted, projection);
        result.distance = result.distance - radius;
    }
}

/// Computes the minimum remaining task distance: the shortest polyline from
/// the aircraft's current position through one boundary point of every
/// remaining task point, in order (§4.D).
///
/// Caches the last full solve and reuses it under the 5%/2000m rule (§4.D)
/// unless `full` forces a resolve. [`resolve_count`](Self::resolve_count)
/// lets callers (and tests, §8 scenario S5) observe whether the solver was
/// actually invoked.
#[derive(Default)]
pub struct MinDistanceSolver {
    last_min_location: Option<GeoPoint>,
    last_active_distance: Option<Length>,
    cached: Option<SolverResult>,
    resolves: u32,
}

impl MinDistanceSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve_count(&self) -> u32 {
        self.resolves
    }

    pub fn result(&self) -> Option<&SolverResult> {
        self.cached.as_ref()
    }

    /// Discards the cached solve, forcing the next `scan` to resolve
    /// regardless of `full` (used after a structural mutation, §4.G).
    pub fn invalidate(&mut self) {
        self.last_min_location = None;
        self.last_active_distance = None;
        self.cached = None;
    }

    pub fn scan(
        &mut self,
        location: GeoPoint,
        active: usize,
        task_points: &mut [TaskPoint],
        projection: &FlatProjection,
        settings: &OrderedTaskSettings,
        full: bool,
    ) -> Length {
        if !full {
            if let Some(skip) = self.try_skip(location, active, task_points, projection) {
                return skip;
            }
        }

        let n = task_points.len();
        let active = active.min(n);
        let active_location = SearchPoint::new(location, projection);
        let mut layers = vec![vec![active_location]];
        layers.extend(task_points[active..].iter().enumerate().map(|(i, tp)| {
            let is_last = active + i == n.saturating_sub(1);
            let use_center = settings.subtract_start_finish_cylinder_radius && is_last && cylinder_radius(tp).is_some();
            layer_for(tp, projection, true, use_center)
        }));

        let Some(mut result) = solve_layers(&layers, false) else {
            return Length::zero();
        };

        // The start end is never center-substituted here: the first layer
        // is the aircraft's live position, not the start cylinder, so only
        // the finish end (already center-substituted above if applicable)
        // needs the post-solve shift.
        if settings.subtract_start_finish_cylinder_radius {
            if let Some(radius) = task_points.get(n.saturating_sub(1)).and_then(cylinder_radius) {
                if result.points.len() >= 2 {
                    let last = result.points.len() - 1;
                    let shifted = result.points[last].location().intermediate_point(&result.points[last - 1].location(), radius);
                    result.points[last] = SearchPoint::new(shifted, projection);
                    result.distance = result.distance - radius;
                }
            }
        }

        for (tp, sp) in task_points[active..].iter_mut().zip(result.points.iter().skip(1)) {
            tp.set_search_min(*sp);
        }

        self.last_min_location = Some(location);
        self.last_active_distance = task_points.get(active).map(|tp| location.distance(&tp.location()));
        self.resolves += 1;
        debug!("min distance resolved: {:.0} m over {} layer(s)", result.distance.to_si(), layers.len());
        self.cached = Some(result.clone());
        result.distance
    }

    fn try_skip(&self, location: GeoPoint, active: usize, task_points: &[TaskPoint], projection: &FlatProjection) -> Option<Length> {
        let cached = self.cached.as_ref()?;
        let last_loc = self.last_min_location?;

        let (x, y) = projection.project_integer(location);
        let (lx, ly) = projection.project_integer(last_loc);
        let (dx, dy) = ((x - lx) as i64, (y - ly) as i64);
        if dx * dx + dy * dy <= 1 {
            return Some(cached.distance);
        }

        let last_active_distance = self.last_active_distance?;
        let active_point = task_points.get(active)?;
        let new_active_distance = location.distance(&active_point.location());
        if last_active_distance.to_si() > 2000.0 && new_active_distance.to_si() > 2000.0 {
            let ratio: f32 = new_active_distance / last_active_distance;
            if (ratio - 1.0).abs() < 0.05 {
                return Some(cached.distance);
            }
        }
        None
    }
}

/// Computes the maximum achievable task distance: the scored distance for
/// area tasks (§4.D).
///
/// `pruned = true` uses each point's current `boundary_points` (what the
/// aircraft can still reach, given past samples); `pruned = false` uses the
/// full nominal boundary, for a planned total.
#[derive(Default)]
pub struct MaxDistanceSolver {
    cached: Option<SolverResult>,
}

impl MaxDistanceSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn result(&self) -> Option<&SolverResult> {
        self.cached.as_ref()
    }

    pub fn scan(&mut self, task_points: &mut [TaskPoint], projection: &FlatProjection, settings: &OrderedTaskSettings, pruned: bool) -> Length {
        if task_points.is_empty() {
            return Length::zero();
        }
        let n = task_points.len();
        let subtract = settings.subtract_start_finish_cylinder_radius;

        let layers: Vec<Vec<SearchPoint>> = task_points
            .iter()
            .enumerate()
            .map(|(i, tp)| {
                let use_center = subtract && (i == 0 || i == n - 1) && cylinder_radius(tp).is_some();
                layer_for(tp, projection, pruned, use_center)
            })
            .collect();

        let Some(mut result) = solve_layers(&layers, true) else {
            return Length::zero();
        };

        if subtract {
            subtract_cylinder_radii(&mut result, task_points, projection);
        }

        for (tp, sp) in task_points.iter_mut().zip(result.points.iter()) {
            if pruned {
                tp.set_search_max(*sp);
            } else {
                tp.set_search_max_total(*sp);
            }
        }

        debug!(
            "max distance resolved ({}): {:.0} m over {} point(s)",
            if pruned { "pruned" } else { "nominal" },
            result.distance.to_si(),
            n
        );
        self.cached = Some(result.clone());
        result.distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geopoint;
    use crate::measurements::Length as L;
    use crate::oz::ObservationZone;
    use crate::task_point::{IntermediateKind, TaskPointKind};
    use crate::waypoint::Waypoint;

    fn projection() -> FlatProjection {
        FlatProjection::new(geopoint!(0.5, 0.0))
    }

    fn two_point_task(start_r: f32, finish_r: f32) -> Vec<TaskPoint> {
        let mut start = TaskPoint::new(Waypoint::new("S", geopoint!(0.0, 0.0)), ObservationZone::cylinder(L::m(start_r)).unwrap(), TaskPointKind::Start);
        let mut finish = TaskPoint::new(
            Waypoint::new("F", geopoint!(1.0, 0.0)),
            ObservationZone::cylinder(L::m(finish_r)).unwrap(),
            TaskPointKind::Finish,
        );
        start.set_neighbours(None, Some(geopoint!(1.0, 0.0)));
        finish.set_neighbours(Some(geopoint!(0.0, 0.0)), None);
        start.update_oz(&projection());
        finish.update_oz(&projection());
        vec![start, finish]
    }

    #[test]
    fn max_distance_subtracts_both_cylinder_radii() {
        let mut points = two_point_task(1000.0, 1000.0);
        let settings = OrderedTaskSettings::default();
        let proj = projection();
        let d = MaxDistanceSolver::new().scan(&mut points, &proj, &settings, false);

        let center_dist = geopoint!(0.0, 0.0).distance(&geopoint!(1.0, 0.0)).to_si();
        assert!((d.to_si() - (center_dist - 2000.0)).abs() < 50.0);
    }

    #[test]
    fn max_distance_without_subtraction_is_longer() {
        let mut points = two_point_task(1000.0, 1000.0);
        let mut settings = OrderedTaskSettings::default();
        settings.subtract_start_finish_cylinder_radius = false;
        let proj = projection();
        let d = MaxDistanceSolver::new().scan(&mut points, &proj, &settings, false);

        let center_dist = geopoint!(0.0, 0.0).distance(&geopoint!(1.0, 0.0)).to_si();
        assert!(d.to_si() >= center_dist);
    }

    #[test]
    fn min_distance_reuses_cache_for_tiny_moves() {
        let mut points = two_point_task(1000.0, 1000.0);
        let proj = projection();
        let settings = OrderedTaskSettings::default();
        let mut solver = MinDistanceSolver::new();

        // ~10 km from the active (start) point, matching §8 scenario S5.
        let far = geopoint!(0.0, 0.0).destination(crate::measurements::Angle::t(270.0), L::m(10_000.0));
        let d1 = solver.scan(far, 0, &mut points, &proj, &settings, true);
        assert_eq!(solver.resolve_count(), 1);

        // Move ~100 m (1% of 10 km) -> must not resolve again.
        let near = far.destination(crate::measurements::Angle::t(270.0), L::m(100.0));
        let d2 = solver.scan(near, 0, &mut points, &proj, &settings, false);
        assert_eq!(solver.resolve_count(), 1);
        assert_eq!(d1, d2);
    }

    #[test]
    fn min_distance_resolves_after_a_large_move() {
        let mut points = two_point_task(1000.0, 1000.0);
        let proj = projection();
        let settings = OrderedTaskSettings::default();
        let mut solver = MinDistanceSolver::new();

        let far = geopoint!(0.0, 0.0).destination(crate::measurements::Angle::t(270.0), L::m(10_000.0));
        solver.scan(far, 0, &mut points, &proj, &settings, true);
        assert_eq!(solver.resolve_count(), 1);

        // 1.5 km further out (15% of 10 km) -> must resolve.
        let moved = far.destination(crate::measurements::Angle::t(270.0), L::m(1500.0));
        solver.scan(moved, 0, &mut points, &proj, &settings, false);
        assert_eq!(solver.resolve_count(), 2);
    }

    #[test]
    fn min_path_never_exceeds_max_path() {
        let mut points = two_point_task(1000.0, 1000.0);
        let proj = projection();
        let settings = OrderedTaskSettings::default();

        let min_d = MinDistanceSolver::new().scan(geopoint!(-0.5, 0.0), 0, &mut points, &proj, &settings, true);
        let max_d = MaxDistanceSolver::new().scan(&mut points, &proj, &settings, false);
        assert!(min_d.to_si() <= max_d.to_si());
    }
}
