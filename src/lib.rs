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

//! An ordered-task engine for competition soaring flight computers.
//!
//! Given a sequence of [`task_point::TaskPoint`]s wrapped in an
//! [`task::OrderedTask`], this crate tracks which observation zones the
//! aircraft has rounded, applies start-gate and pilot-event rules, and
//! solves the shortest remaining distance and the longest achievable
//! distance (assigned-area tasks) through the task's boundaries.
//!
//! ```
//! use ordered_task::aircraft::AircraftState;
//! use ordered_task::events::NullTaskEvents;
//! use ordered_task::geopoint;
//! use ordered_task::measurements::{Length, Speed};
//! use ordered_task::oz::ObservationZone;
//! use ordered_task::settings::TaskBehaviour;
//! use ordered_task::task::OrderedTask;
//! use ordered_task::task_point::{TaskPoint, TaskPointKind};
//!
//! let mut task = OrderedTask::new(TaskBehaviour::default());
//! task.append(TaskPoint::new(
//!     ordered_task::waypoint::Waypoint::new("EDHF", geopoint!(53.99, 9.57)),
//!     ObservationZone::cylinder(Length::m(1000.0)).unwrap(),
//!     TaskPointKind::Start,
//! ));
//! task.append(TaskPoint::new(
//!     ordered_task::waypoint::Waypoint::new("EDVM", geopoint!(52.13, 9.0)),
//!     ObservationZone::cylinder(Length::m(1000.0)).unwrap(),
//!     TaskPointKind::Finish,
//! ));
//! assert!(task.check_task().is_empty());
//!
//! let state = AircraftState {
//!     location: geopoint!(53.99, 9.57),
//!     altitude: Length::m(1000.0),
//!     ground_speed: Speed::mps(30.0),
//!     time: None,
//!     flying: true,
//! };
//! task.check_transitions(state, state, &mut NullTaskEvents);
//! ```

pub mod advance;
pub mod aircraft;
pub mod error;
pub mod events;
pub mod geom;
pub mod macros;
pub mod measurements;
pub mod oz;
pub mod settings;
pub mod solver;
pub mod start;
pub mod stats;
pub mod task;
pub mod task_point;
pub mod time;
pub mod waypoint;

#[cfg(feature = "geojson")]
pub mod geojson_export;

pub use error::{Error, Result};
