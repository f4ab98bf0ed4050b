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

/// Creates a [`GeoPoint`](crate::geom::GeoPoint) from latitude and longitude
/// in degrees.
///
/// ```
/// use ordered_task::geopoint;
///
/// let p = geopoint!(54.18568611, 7.91070000);
/// ```
#[macro_export]
macro_rules! geopoint {
    ($latitude:expr, $longitude:expr) => {
        $crate::geom::GeoPoint::new($latitude, $longitude)
    };
}

/// Creates a [`geo::Polygon<f64>`] from `(latitude, longitude)` pairs in
/// degrees, for a [custom observation zone].
///
/// ```
/// use ordered_task::polygon;
///
/// let p = polygon![(0.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)];
/// ```
///
/// Note: coordinates are specified as (latitude, longitude) but internally
/// converted to `geo`'s (longitude, latitude) coordinate order.
///
/// [custom observation zone]: crate::oz::ObservationZone::Custom
#[macro_export]
macro_rules! polygon {
    ( $( ($lat:expr, $lon:expr) ),* $(,)? ) => {{
        geo::Polygon::new(
            geo::LineString::from(vec![ $( geo::Coord { x: $lon, y: $lat }, )* ]),
            vec![]
        )
    }};
}
