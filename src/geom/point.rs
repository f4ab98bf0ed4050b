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

use std::fmt::{Display, Formatter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use geo::{Bearing, Destination, Distance, Geodesic};

use crate::measurements::{Angle, Length};

/// A geographic position.
///
/// Latitude and longitude are stored in radians (per the flight-computer
/// convention of doing trigonometry in radians and only converting to
/// degrees at the edges), but the public constructor and accessors work in
/// degrees since that's what fixes arrive as.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeoPoint {
    lat_rad: f64,
    lon_rad: f64,
    valid: bool,
}

impl GeoPoint {
    /// Creates a point from a latitude/longitude pair in degrees.
    ///
    /// Latitude is clamped to `[-90, 90]` and longitude to `[-180, 180]`;
    /// inputs outside of that range produce an invalid point (see
    /// [`is_valid`](Self::is_valid)).
    pub fn new(latitude_deg: f64, longitude_deg: f64) -> Self {
        let valid = (-90.0..=90.0).contains(&latitude_deg) && (-180.0..=180.0).contains(&longitude_deg);
        Self {
            lat_rad: latitude_deg.to_radians(),
            lon_rad: longitude_deg.to_radians(),
            valid,
        }
    }

    /// The invalid, non-geographic point.
    ///
    /// Used as a sentinel for "no previous fix yet" — never treated as a
    /// real position.
    pub fn invalid() -> Self {
        Self {
            lat_rad: 0.0,
            lon_rad: 0.0,
            valid: false,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn latitude(&self) -> f64 {
        self.lat_rad.to_degrees()
    }

    pub fn longitude(&self) -> f64 {
        self.lon_rad.to_degrees()
    }

    pub fn latitude_rad(&self) -> f64 {
        self.lat_rad
    }

    pub fn longitude_rad(&self) -> f64 {
        self.lon_rad
    }

    fn as_geo(&self) -> geo::Point<f64> {
        geo::Point::new(self.longitude(), self.latitude())
    }

    /// The great-circle distance to `other`, on the WGS84 ellipsoid.
    pub fn distance(&self, other: &GeoPoint) -> Length {
        let m = Geodesic.distance(self.as_geo(), other.as_geo());
        Length::m(m as f32)
    }

    /// The initial true bearing from this point to `other`.
    pub fn bearing(&self, other: &GeoPoint) -> Angle {
        Angle::t(Geodesic.bearing(self.as_geo(), other.as_geo()) as f32)
    }

    /// The point at distance `d` along the great circle bearing toward
    /// `other`.
    ///
    /// Used to shave a cylinder's radius off a scored start/finish point by
    /// moving it from the cylinder center onto the cylinder boundary, toward
    /// the neighbouring task point (§4.D).
    pub fn intermediate_point(&self, other: &GeoPoint, d: Length) -> GeoPoint {
        self.destination(self.bearing(other), d)
    }

    /// The point at distance `d` along true bearing `bearing` from this
    /// point.
    ///
    /// Used to sample observation zone boundaries (§4.B), which are defined
    /// by a radius and a direction rather than by a second waypoint.
    pub fn destination(&self, bearing: Angle, d: Length) -> GeoPoint {
        let dest = Geodesic.destination(self.as_geo(), bearing.value() as f64, d.to_si() as f64);
        GeoPoint::from(dest)
    }
}

impl From<geo::Point<f64>> for GeoPoint {
    fn from(p: geo::Point<f64>) -> Self {
        Self::new(p.y(), p.x())
    }
}

impl From<GeoPoint> for geo::Point<f64> {
    fn from(p: GeoPoint) -> Self {
        p.as_geo()
    }
}

impl Display for GeoPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude(), self.longitude())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Helgoland VOR and Itzehoe Hungriger Wolf, the same benchmark pair the
    // measurements module's predecessor used: ~60 NM apart, bearing ~100°T.
    const DHE: GeoPoint = GeoPoint {
        lat_rad: 0.9455398,
        lon_rad: 0.1380971,
        valid: true,
    };

    fn edhf() -> GeoPoint {
        GeoPoint::new(53.99250000, 9.57666667)
    }

    #[test]
    fn distance_matches_published_benchmark() {
        use crate::measurements::LengthUnit;
        let nm = DHE.distance(&edhf()).convert_to(LengthUnit::NauticalMiles);
        assert_eq!(nm.value().round(), 60.0);
    }

    #[test]
    fn bearing_matches_published_benchmark() {
        assert_eq!(DHE.bearing(&edhf()).value().round(), 100.0);
    }

    #[test]
    fn intermediate_point_is_closer_to_destination() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(1.0, 0.0);
        let mid = a.intermediate_point(&b, a.distance(&b) * 0.5);
        assert!(mid.distance(&b).to_si() < a.distance(&b).to_si());
        assert!(mid.distance(&a).to_si() < a.distance(&b).to_si());
    }

    #[test]
    fn out_of_range_latitude_is_invalid() {
        assert!(!GeoPoint::new(120.0, 0.0).is_valid());
    }

    #[test]
    fn invalid_sentinel_is_invalid() {
        assert!(!GeoPoint::invalid().is_valid());
    }
}
