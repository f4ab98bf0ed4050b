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

//! Observation zones (component B): the geometric shape around a waypoint
//! that counts as "rounding" it.
//!
//! Re-architected per the teacher's design note as one tagged variant rather
//! than a shape class hierarchy — every shape answers to the same small
//! capability set (`contains`, `nominal_boundary`, `kind`), so a `match` on
//! the variant replaces virtual dispatch.

use geo::Contains as _;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geom::{FlatProjection, GeoPoint, SearchPoint};
use crate::measurements::{Angle, Length};

/// The shape family of an [`ObservationZone`], for callers that only need the
/// tag (e.g. to decide whether start/finish radius subtraction applies).
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ObservationZoneKind {
    Cylinder,
    Line,
    FaiSector,
    Keyhole,
    Custom,
}

/// The geometric region around a waypoint that a task point's state machine
/// tests fixes against.
///
/// `FaiSector` and `Keyhole` are directional: their sector is centered on a
/// bisector angle which is meaningless without the task point's neighbours,
/// so the bisector is threaded through every call rather than stored here —
/// see [`TaskPoint::set_neighbours`](crate::task_point::TaskPoint::set_neighbours).
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ObservationZone {
    Cylinder { radius: Length },
    Line { length: Length },
    FaiSector { radius: Length },
    Keyhole { inner_radius: Length, outer_radius: Length },
    Custom { polygon: geo::Polygon<f64> },
}

impl ObservationZone {
    pub fn cylinder(radius: Length) -> Result<Self> {
        Self::check_radius(radius)?;
        Ok(Self::Cylinder { radius })
    }

    pub fn line(length: Length) -> Result<Self> {
        Self::check_radius(length)?;
        Ok(Self::Line { length })
    }

    pub fn fai_sector(radius: Length) -> Result<Self> {
        Self::check_radius(radius)?;
        Ok(Self::FaiSector { radius })
    }

    pub fn keyhole(inner_radius: Length, outer_radius: Length) -> Result<Self> {
        Self::check_radius(inner_radius)?;
        Self::check_radius(outer_radius)?;
        Ok(Self::Keyhole { inner_radius, outer_radius })
    }

    pub fn custom(polygon: geo::Polygon<f64>) -> Result<Self> {
        let vertices = polygon.exterior().0.len();
        if vertices < 4 {
            // A closed ring repeats its first point, so "triangle" is 4 coords.
            return Err(Error::InvalidPolygon { vertices });
        }
        Ok(Self::Custom { polygon })
    }

    fn check_radius(l: Length) -> Result<()> {
        if l.to_si() <= 0.0 {
            return Err(Error::InvalidRadius(l.to_si()));
        }
        Ok(())
    }

    pub fn kind(&self) -> ObservationZoneKind {
        match self {
            Self::Cylinder { .. } => ObservationZoneKind::Cylinder,
            Self::Line { .. } => ObservationZoneKind::Line,
            Self::FaiSector { .. } => ObservationZoneKind::FaiSector,
            Self::Keyhole { .. } => ObservationZoneKind::Keyhole,
            Self::Custom { .. } => ObservationZoneKind::Custom,
        }
    }

    /// `true` for shapes whose membership test is precise only up to a fix's
    /// resolution and which the transition engine should instead evaluate via
    /// segment intersection against the previous fix (§4.B).
    pub fn needs_segment_intersection(&self) -> bool {
        matches!(self, Self::Line { .. })
    }

    /// Whether `p` lies within the zone centered at `center`, oriented along
    /// `bisector` for sector-shaped zones.
    pub fn contains(&self, center: GeoPoint, bisector: Angle, p: GeoPoint) -> bool {
        match self {
            Self::Cylinder { radius } => center.distance(&p) <= *radius,
            Self::Line { .. } => false, // see `needs_segment_intersection`
            Self::FaiSector { radius } => sector_contains(center, *radius, bisector, 45.0, p),
            Self::Keyhole { inner_radius, outer_radius } => {
                center.distance(&p) <= *inner_radius || sector_contains(center, *outer_radius, bisector, 45.0, p)
            }
            Self::Custom { polygon } => polygon.contains(&geo::Point::from(p)),
        }
    }

    /// `true` if the fix-to-fix segment `from -> to` crosses the zone's
    /// boundary, for shapes evaluated by segment intersection (currently only
    /// `Line`).
    pub fn crossed(&self, center: GeoPoint, bisector: Angle, from: GeoPoint, to: GeoPoint) -> bool {
        let Self::Line { length } = self else {
            return false;
        };

        let half = *length * 0.5;
        let perp = bisector + Angle::t(90.0);
        let a = center.destination(perp, half);
        let b = center.destination(perp + Angle::t(180.0), half);

        segments_intersect(a, b, from, to)
    }

    /// The evenly-sampled full zone boundary, ignoring any sampled flight
    /// history — used for planned-total solves and as the initial value of a
    /// task point's pruned `boundary_points` (§3, §4.D).
    pub fn nominal_boundary(
        &self,
        center: GeoPoint,
        bisector: Angle,
        n: usize,
        projection: &FlatProjection,
    ) -> Vec<SearchPoint> {
        if n == 0 {
            return Vec::new();
        }

        match self {
            Self::Cylinder { radius } => sample_arc(center, *radius, Angle::t(0.0), 360.0, n, projection),
            Self::Line { length } => {
                let half = *length * 0.5;
                let perp = bisector + Angle::t(90.0);
                vec![
                    SearchPoint::new(center.destination(perp, half), projection),
                    SearchPoint::new(center.destination(perp + Angle::t(180.0), half), projection),
                ]
            }
            Self::FaiSector { radius } => {
                sample_arc(center, *radius, bisector - Angle::t(45.0), 90.0, n, projection)
            }
            Self::Keyhole { inner_radius, outer_radius } => {
                let inner_n = (n / 3).max(2);
                let outer_n = n.saturating_sub(inner_n).max(2);
                let mut points = sample_arc(center, *inner_radius, Angle::t(0.0), 360.0, inner_n, projection);
                points.extend(sample_arc(center, *outer_radius, bisector - Angle::t(45.0), 90.0, outer_n, projection));
                points
            }
            Self::Custom { polygon } => polygon
                .exterior()
                .points()
                .map(|p| SearchPoint::new(GeoPoint::from(p), projection))
                .collect(),
        }
    }
}

fn sector_contains(center: GeoPoint, radius: Length, bisector: Angle, half_angle_deg: f32, p: GeoPoint) -> bool {
    if center.distance(&p) > radius {
        return false;
    }
    let bearing = center.bearing(&p);
    bearing.signed_diff(&bisector).value().abs() <= half_angle_deg
}

fn sample_arc(center: GeoPoint, radius: Length, start: Angle, span_deg: f32, n: usize, projection: &FlatProjection) -> Vec<SearchPoint> {
    let n = n.max(1);
    let step = if n == 1 { 0.0 } else { span_deg / (n - 1) as f32 };
    (0..n)
        .map(|i| {
            let bearing = start + Angle::t(step * i as f32);
            let p = center.destination(bearing, radius);
            SearchPoint::new(p, projection)
        })
        .collect()
}

/// Whether segments `a-b` and `c-d` cross, treating each `GeoPoint` pair as a
/// locally-flat line segment in projected-degree space. Good enough at OZ
/// line-length scales (hundreds of meters to a few kilometers).
fn segments_intersect(a: GeoPoint, b: GeoPoint, c: GeoPoint, d: GeoPoint) -> bool {
    fn cross(o: (f64, f64), p: (f64, f64), q: (f64, f64)) -> f64 {
        (p.0 - o.0) * (q.1 - o.1) - (p.1 - o.1) * (q.0 - o.0)
    }

    let (a, b, c, d) = (
        (a.longitude(), a.latitude()),
        (b.longitude(), b.latitude()),
        (c.longitude(), c.latitude()),
        (d.longitude(), d.latitude()),
    );

    let d1 = cross(c, d, a);
    let d2 = cross(c, d, b);
    let d3 = cross(a, b, c);
    let d4 = cross(a, b, d);

    (d1 > 0.0) != (d2 > 0.0) && (d3 > 0.0) != (d4 > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projection() -> FlatProjection {
        FlatProjection::new(GeoPoint::new(0.0, 0.0))
    }

    #[test]
    fn cylinder_contains_point_within_radius() {
        let oz = ObservationZone::cylinder(Length::m(1000.0)).unwrap();
        let center = GeoPoint::new(0.0, 0.0);
        let near = center.destination(Angle::t(0.0), Length::m(500.0));
        let far = center.destination(Angle::t(0.0), Length::m(1500.0));
        assert!(oz.contains(center, Angle::t(0.0), near));
        assert!(!oz.contains(center, Angle::t(0.0), far));
    }

    #[test]
    fn cylinder_boundary_equals_nominal_boundary() {
        let oz = ObservationZone::cylinder(Length::m(1000.0)).unwrap();
        let center = GeoPoint::new(0.0, 0.0);
        let points = oz.nominal_boundary(center, Angle::t(0.0), 12, &projection());
        assert_eq!(points.len(), 12);
        for p in &points {
            let dist = center.distance(&p.location());
            assert!((dist.to_si() - 1000.0).abs() < 2.0);
        }
    }

    #[test]
    fn fai_sector_excludes_point_outside_bisector_cone() {
        let oz = ObservationZone::fai_sector(Length::m(2000.0)).unwrap();
        let center = GeoPoint::new(0.0, 0.0);
        let bisector = Angle::t(0.0);
        let inside = center.destination(Angle::t(10.0), Length::m(1000.0));
        let outside = center.destination(Angle::t(90.0), Length::m(1000.0));
        assert!(oz.contains(center, bisector, inside));
        assert!(!oz.contains(center, bisector, outside));
    }

    #[test]
    fn keyhole_contains_inner_cylinder_regardless_of_bearing() {
        let oz = ObservationZone::keyhole(Length::m(500.0), Length::m(10_000.0)).unwrap();
        let center = GeoPoint::new(0.0, 0.0);
        let behind = center.destination(Angle::t(180.0), Length::m(400.0));
        assert!(oz.contains(center, Angle::t(0.0), behind));
    }

    #[test]
    fn zero_radius_is_rejected() {
        assert!(ObservationZone::cylinder(Length::m(0.0)).is_err());
    }

    #[test]
    fn line_crossing_is_detected_by_segment_intersection() {
        let oz = ObservationZone::line(Length::m(2000.0)).unwrap();
        let center = GeoPoint::new(0.0, 0.0);
        let bisector = Angle::t(0.0); // line runs east-west, perpendicular to north bisector
        let before = center.destination(Angle::t(180.0), Length::m(500.0));
        let after = center.destination(Angle::t(0.0), Length::m(500.0));
        assert!(oz.crossed(center, bisector, before, after));
    }

    #[test]
    fn line_not_crossed_when_segment_stays_on_one_side() {
        let oz = ObservationZone::line(Length::m(2000.0)).unwrap();
        let center = GeoPoint::new(0.0, 0.0);
        let bisector = Angle::t(0.0);
        let a = center.destination(Angle::t(180.0), Length::m(500.0));
        let b = center.destination(Angle::t(180.0), Length::m(100.0));
        assert!(!oz.crossed(center, bisector, a, b));
    }
}
