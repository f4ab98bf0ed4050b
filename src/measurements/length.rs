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

/// Length unit with _m_ as SI unit.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LengthUnit {
    Meters,
    Kilometers,
    NauticalMiles,
    StatuteMiles,
}

impl UnitOfMeasure<f32> for LengthUnit {
    fn quantity() -> PhysicalQuantity {
        PhysicalQuantity::Length
    }

    fn si() -> Self {
        Self::Meters
    }

    fn symbol(&self) -> &'static str {
        match self {
            Self::Meters => "m",
            Self::Kilometers => "km",
            Self::NauticalMiles => "NM",
            Self::StatuteMiles => "SM",
        }
    }

    fn from_si(value: f32, to: &Self) -> f32 {
        match to {
            Self::Meters => value,
            Self::Kilometers => value / 1000.0,
            Self::NauticalMiles => value / constants::NAUTICAL_MILE_IN_METER,
            Self::StatuteMiles => value / constants::STATUTE_MILE_IN_METER,
        }
    }

    fn to_si(&self, value: &f32) -> f32 {
        match self {
            Self::Meters => *value,
            Self::Kilometers => value * 1000.0,
            Self::NauticalMiles => value * constants::NAUTICAL_MILE_IN_METER,
            Self::StatuteMiles => value * constants::STATUTE_MILE_IN_METER,
        }
    }
}

/// A distance, e.g. between two [`GeoPoint`]s or along a task leg.
///
/// [`GeoPoint`]: crate::geom::GeoPoint
pub type Length = Measurement<f32, LengthUnit>;

impl Length {
    /// Creates a length in meters.
    pub fn m(value: f32) -> Self {
        Self {
            value,
            unit: LengthUnit::Meters,
        }
    }

    /// Creates a length in kilometers.
    pub fn km(value: f32) -> Self {
        Self {
            value,
            unit: LengthUnit::Kilometers,
        }
    }

    /// Creates a length in nautical miles.
    pub fn nm(value: f32) -> Self {
        Self {
            value,
            unit: LengthUnit::NauticalMiles,
        }
    }

    /// The zero length, in meters.
    pub fn zero() -> Self {
        Self::m(0.0)
    }
}

impl std::iter::Sum for Length {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, l| acc + l)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nm_round_trips_through_meters() {
        assert_eq!(Length::nm(1.0).to_si(), constants::NAUTICAL_MILE_IN_METER);
    }

    #[test]
    fn sum_accumulates_in_meters() {
        let total: Length = vec![Length::m(1000.0), Length::m(2000.0)].into_iter().sum();
        assert_eq!(total.to_si(), 3000.0);
    }
}
