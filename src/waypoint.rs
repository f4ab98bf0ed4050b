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

//! The waypoint a task point is built around.
//!
//! The waypoint database itself (lookup, deduplication on commit, storage)
//! is an external collaborator (§6) — `Waypoint` here is only the slice of
//! data a [`TaskPoint`](crate::task_point::TaskPoint) needs a reference to.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geom::GeoPoint;

/// A named point on the earth that a task point is built around.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Waypoint {
    ident: String,
    location: GeoPoint,
}

impl Waypoint {
    pub fn new(ident: impl Into<String>, location: GeoPoint) -> Self {
        Self {
            ident: ident.into(),
            location,
        }
    }

    pub fn ident(&self) -> &str {
        &self.ident
    }

    pub fn location(&self) -> GeoPoint {
        self.location
    }
}

/// The waypoint database boundary interface (§6): a read-only collaborator
/// that [`OrderedTask::commit`](crate::task::OrderedTask::commit) asks to
/// deduplicate waypoints pulled in from a planned task.
pub trait Waypoints {
    /// Returns the database's own copy of `waypoint`, appending it first if
    /// the database doesn't already hold an equal one.
    fn check_exists_or_append(&mut self, waypoint: Waypoint) -> Waypoint;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct VecWaypoints(Vec<Waypoint>);

    impl Waypoints for VecWaypoints {
        fn check_exists_or_append(&mut self, waypoint: Waypoint) -> Waypoint {
            if let Some(existing) = self.0.iter().find(|w| **w == waypoint) {
                return existing.clone();
            }
            self.0.push(waypoint.clone());
            waypoint
        }
    }

    #[test]
    fn check_exists_or_append_deduplicates() {
        let mut db = VecWaypoints(Vec::new());
        let a = db.check_exists_or_append(Waypoint::new("EDHF", GeoPoint::new(53.99, 9.57)));
        let b = db.check_exists_or_append(Waypoint::new("EDHF", GeoPoint::new(53.99, 9.57)));
        assert_eq!(a, b);
        assert_eq!(db.0.len(), 1);
    }
}
