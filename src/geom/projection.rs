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

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::GeoPoint;

/// Mean earth radius, in meters, used for the flat-earth projection below.
///
/// The projection only needs to preserve relative distances over a task's
/// extent (at most a few hundred kilometers), so a single mean radius is
/// accurate enough; it is not used for the geodesic distance/bearing
/// calculations in [`GeoPoint`], which go through `geo`'s `Geodesic` on the
/// WGS84 ellipsoid instead.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A bounding box in geographic coordinates.
///
/// Used to derive a task's [`FlatProjection`] once, when the task's shape
/// changes, rather than on every fix.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeoBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl GeoBox {
    /// The smallest box containing every point in `points`.
    ///
    /// Returns `None` if `points` is empty.
    pub fn bounding(points: impl IntoIterator<Item = GeoPoint>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bb = Self {
            min_lat: first.latitude(),
            max_lat: first.latitude(),
            min_lon: first.longitude(),
            max_lon: first.longitude(),
        };
        for p in iter {
            bb.min_lat = bb.min_lat.min(p.latitude());
            bb.max_lat = bb.max_lat.max(p.latitude());
            bb.min_lon = bb.min_lon.min(p.longitude());
            bb.max_lon = bb.max_lon.max(p.longitude());
        }
        Some(bb)
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }
}

/// Maps [`GeoPoint`]s onto a signed integer Cartesian plane, centered on a
/// task's bounding box, for cheap bounding-box overlap tests and Euclidean
/// edge weights in the path solver.
///
/// One projected unit is one centimeter: fine enough that rounding never
/// affects a solver decision at the scales (meters to low hundreds of
/// kilometers) this engine operates at, while keeping every coordinate well
/// within `i32::MAX`.
#[derive(Copy, Clone, Debug)]
pub struct FlatProjection {
    center: GeoPoint,
    cos_center_lat: f64,
}

const UNITS_PER_METER: f64 = 100.0;

impl FlatProjection {
    pub fn new(center: GeoPoint) -> Self {
        Self {
            center,
            cos_center_lat: center.latitude_rad().cos(),
        }
    }

    /// Derives a projection centered on the bounding box of `points`.
    pub fn from_points(points: impl IntoIterator<Item = GeoPoint>) -> Self {
        match GeoBox::bounding(points) {
            Some(bb) => Self::new(bb.center()),
            None => Self::new(GeoPoint::new(0.0, 0.0)),
        }
    }

    pub fn center(&self) -> GeoPoint {
        self.center
    }

    /// Projects `p` onto the integer plane.
    pub fn project_integer(&self, p: GeoPoint) -> (i32, i32) {
        let dx = (p.longitude_rad() - self.center.longitude_rad()) * self.cos_center_lat * EARTH_RADIUS_M;
        let dy = (p.latitude_rad() - self.center.latitude_rad()) * EARTH_RADIUS_M;
        (
            (dx * UNITS_PER_METER).round() as i32,
            (dy * UNITS_PER_METER).round() as i32,
        )
    }
}

/// A sampled boundary vertex: a [`GeoPoint`] plus its projected coordinate.
///
/// Equality and the solver's edge weights both operate on the projected
/// coordinate (§3) — two search points at the "same" geographic position
/// after projection rounding are treated as identical, which is what lets
/// boundary deduplication work without floating-point tolerance games.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchPoint {
    location: GeoPoint,
    projected: (i32, i32),
}

impl SearchPoint {
    pub fn new(location: GeoPoint, projection: &FlatProjection) -> Self {
        let projected = projection.project_integer(location);
        Self { location, projected }
    }

    pub fn location(&self) -> GeoPoint {
        self.location
    }

    pub fn projected(&self) -> (i32, i32) {
        self.projected
    }

    /// The Euclidean distance to `other` in the projected plane, converted
    /// back to meters.
    pub fn dist_to(&self, other: &SearchPoint) -> f64 {
        let dx = (self.projected.0 - other.projected.0) as f64;
        let dy = (self.projected.1 - other.projected.1) as f64;
        (dx * dx + dy * dy).sqrt() / UNITS_PER_METER
    }
}

impl PartialEq for SearchPoint {
    fn eq(&self, other: &Self) -> bool {
        self.projected == other.projected
    }
}

/// An axis-aligned bounding box in projected coordinates, inflated by one
/// unit so that two boxes that merely touch still report as overlapping.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct FlatBoundingBox {
    min: (i32, i32),
    max: (i32, i32),
}

impl FlatBoundingBox {
    pub fn new(center: (i32, i32), radius: i32) -> Self {
        let radius = radius.max(0) + 1;
        Self {
            min: (center.0 - radius, center.1 - radius),
            max: (center.0 + radius, center.1 + radius),
        }
    }

    /// The box bounding every projected point in `points`.
    pub fn bounding(points: impl IntoIterator<Item = (i32, i32)>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut min = first;
        let mut max = first;
        for p in iter {
            min = (min.0.min(p.0), min.1.min(p.1));
            max = (max.0.max(p.0), max.1.max(p.1));
        }
        Some(Self { min, max })
    }

    pub fn overlaps(&self, other: &FlatBoundingBox) -> bool {
        self.min.0 <= other.max.0
            && self.max.0 >= other.min.0
            && self.min.1 <= other.max.1
            && self.max.1 >= other.min.1
    }

    pub fn contains_point(&self, p: (i32, i32)) -> bool {
        p.0 >= self.min.0 && p.0 <= self.max.0 && p.1 >= self.min.1 && p.1 <= self.max.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projecting_center_yields_origin() {
        let center = GeoPoint::new(52.0, 10.0);
        let proj = FlatProjection::new(center);
        assert_eq!(proj.project_integer(center), (0, 0));
    }

    #[test]
    fn projection_preserves_relative_distance() {
        let center = GeoPoint::new(52.0, 10.0);
        let north = GeoPoint::new(52.01, 10.0);
        let proj = FlatProjection::new(center);

        let (_, y) = proj.project_integer(north);
        let expected_m = center.distance(&north).to_si() as f64;
        let got_m = y as f64 / UNITS_PER_METER;
        assert!((got_m - expected_m).abs() < 1.0, "got {got_m}, expected ~{expected_m}");
    }

    #[test]
    fn search_point_equality_is_by_projected_coordinate() {
        let proj = FlatProjection::new(GeoPoint::new(0.0, 0.0));
        let a = SearchPoint::new(GeoPoint::new(0.000001, 0.0), &proj);
        let b = SearchPoint::new(GeoPoint::new(0.000001, 0.0), &proj);
        assert_eq!(a, b);
    }

    #[test]
    fn bounding_boxes_inflated_by_one_touch_as_overlap() {
        let a = FlatBoundingBox::new((0, 0), 10);
        let b = FlatBoundingBox::new((21, 0), 10);
        assert!(a.overlaps(&b));
    }

    #[test]
    fn distant_bounding_boxes_do_not_overlap() {
        let a = FlatBoundingBox::new((0, 0), 10);
        let b = FlatBoundingBox::new((1000, 0), 10);
        assert!(!a.overlaps(&b));
    }
}
