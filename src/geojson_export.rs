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

//! Optional GeoJSON export (§6a), for the out-of-scope map-rendering
//! collaborator.

use geo::BoundingRect;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};

use crate::geom::{GeoPoint, SearchPoint};
use crate::oz::ObservationZoneKind;
use crate::task::OrderedTask;
use crate::task_point::TaskPoint;

fn coord(p: GeoPoint) -> geo::Coord<f64> {
    geo::Coord { x: p.longitude(), y: p.latitude() }
}

fn line_string(points: &[SearchPoint]) -> geo::LineString<f64> {
    geo::LineString::from(points.iter().map(|sp| coord(sp.location())).collect::<Vec<_>>())
}

fn ring(points: &[SearchPoint]) -> geo::LineString<f64> {
    let mut coords: Vec<geo::Coord<f64>> = points.iter().map(|sp| coord(sp.location())).collect();
    if let (Some(&first), Some(&last)) = (coords.first(), coords.last()) {
        if first != last {
            coords.push(first);
        }
    }
    geo::LineString::from(coords)
}

fn properties(ident: &str, kind: &str) -> Option<JsonObject> {
    let mut props = JsonObject::new();
    props.insert("ident".to_string(), JsonValue::from(ident));
    props.insert("kind".to_string(), JsonValue::from(kind));
    Some(props)
}

fn task_point_feature(tp: &TaskPoint) -> Feature {
    let boundary = ring(tp.boundary_points());
    let geometry = match tp.oz().kind() {
        ObservationZoneKind::Line => Geometry::new(Value::from(&line_string(tp.boundary_points()))),
        _ => Geometry::new(Value::from(&geo::Polygon::new(boundary, vec![]))),
    };

    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: properties(tp.waypoint().ident(), oz_kind_label(tp.oz().kind())),
        foreign_members: None,
    }
}

fn oz_kind_label(kind: ObservationZoneKind) -> &'static str {
    match kind {
        ObservationZoneKind::Cylinder => "cylinder",
        ObservationZoneKind::Line => "line",
        ObservationZoneKind::FaiSector => "fai_sector",
        ObservationZoneKind::Keyhole => "keyhole",
        ObservationZoneKind::Custom => "custom",
    }
}

fn solution_feature(points: &[SearchPoint], label: &str) -> Option<Feature> {
    if points.len() < 2 {
        return None;
    }
    let line = line_string(points);
    Some(Feature {
        bbox: line.bounding_rect().map(|r| vec![r.min().x, r.min().y, r.max().x, r.max().y]),
        geometry: Some(Geometry::new(Value::from(&line))),
        id: None,
        properties: properties(label, "solution"),
        foreign_members: None,
    })
}

impl OrderedTask {
    /// Renders every task point's observation-zone boundary, plus the
    /// solver's last solved min/max paths if any, as a
    /// [`geojson::FeatureCollection`].
    #[cfg_attr(docsrs, doc(cfg(feature = "geojson")))]
    pub fn to_geojson(&self) -> FeatureCollection {
        let mut features: Vec<Feature> = self.task_points().iter().map(task_point_feature).collect();

        if let Some(remaining) = solution_feature(&self.stats().current_leg.solution_remaining, "distance_min") {
            features.push(remaining);
        }

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geopoint;
    use crate::measurements::Length;
    use crate::oz::ObservationZone;
    use crate::settings::TaskBehaviour;
    use crate::task_point::TaskPointKind;
    use crate::waypoint::Waypoint;

    #[test]
    fn to_geojson_emits_one_feature_per_task_point() {
        let mut task = OrderedTask::new(TaskBehaviour::default());
        task.append(TaskPoint::new(
            Waypoint::new("S", geopoint!(0.0, 0.0)),
            ObservationZone::cylinder(Length::m(1000.0)).unwrap(),
            TaskPointKind::Start,
        ));
        task.append(TaskPoint::new(
            Waypoint::new("F", geopoint!(1.0, 0.0)),
            ObservationZone::cylinder(Length::m(1000.0)).unwrap(),
            TaskPointKind::Finish,
        ));

        let collection = task.to_geojson();
        assert_eq!(collection.features.len(), 2);
    }
}
