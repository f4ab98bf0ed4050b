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

use super::{constants, Measurement, PhysicalQuantity, UnitOfMeasure};

/// Speed unit with _m/s_ as SI unit.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SpeedUnit {
    MetersPerSecond,
    Knots,
}

impl UnitOfMeasure<f32> for SpeedUnit {
    fn quantity() -> PhysicalQuantity {
        PhysicalQuantity::Speed
    }

    fn si() -> Self {
        Self::MetersPerSecond
    }

    fn symbol(&self) -> &'static str {
        match self {
            Self::MetersPerSecond => "m/s",
            Self::Knots => "kt",
        }
    }

    fn from_si(value: f32, to: &Self) -> f32 {
        match to {
            Self::MetersPerSecond => value,
            Self::Knots => value * constants::METER_PER_SECONDS_IN_KNOTS,
        }
    }

    fn to_si(&self, value: &f32) -> f32 {
        match self {
            Self::MetersPerSecond => *value,
            Self::Knots => value / constants::METER_PER_SECONDS_IN_KNOTS,
        }
    }
}

/// A ground speed, e.g. the speed recorded in [`StartStats`] when the
/// aircraft exits the start point.
///
/// [`StartStats`]: crate::stats::StartStats
pub type Speed = Measurement<f32, SpeedUnit>;

impl Speed {
    /// Creates a speed in meters per second.
    pub fn mps(value: f32) -> Self {
        Self {
            value,
            unit: SpeedUnit::MetersPerSecond,
        }
    }

    /// Creates a speed in knots.
    pub fn kt(value: f32) -> Self {
        Self {
            value,
            unit: SpeedUnit::Knots,
        }
    }
}
