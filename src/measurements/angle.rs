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

use super::{Measurement, PhysicalQuantity, UnitOfMeasure};

/// Angle unit with _rad_ as SI unit.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AngleUnit {
    Radians,
    Degrees,
}

impl UnitOfMeasure<f32> for AngleUnit {
    fn quantity() -> PhysicalQuantity {
        PhysicalQuantity::Angle
    }

    fn si() -> Self {
        Self::Radians
    }

    fn symbol(&self) -> &'static str {
        match self {
            Self::Radians => "rad",
            Self::Degrees => "deg",
        }
    }

    fn from_si(value: f32, to: &Self) -> f32 {
        match to {
            Self::Radians => value,
            Self::Degrees => value.to_degrees(),
        }
    }

    fn to_si(&self, value: &f32) -> f32 {
        match self {
            Self::Radians => *value,
            Self::Degrees => value.to_radians(),
        }
    }
}

/// A true bearing, heading or sector angle.
pub type Angle = Measurement<f32, AngleUnit>;

impl Angle {
    /// Creates a true-north angle in degrees, normalised to `[0, 360)`.
    ///
    /// `t` is short for "true", mirroring how bearings are usually quoted in
    /// flight-computer code.
    pub fn t(degrees: f32) -> Self {
        Self {
            value: degrees.rem_euclid(360.0),
            unit: AngleUnit::Degrees,
        }
    }

    /// Creates an angle in radians.
    pub fn rad(value: f32) -> Self {
        Self {
            value,
            unit: AngleUnit::Radians,
        }
    }

    /// The angle bisecting true bearings `a` and `b`.
    ///
    /// Averages the two bearings as unit vectors rather than their degree
    /// values directly, so a pair like 350° and 10° bisects to 0° instead of
    /// 180°. Used to orient a task point's FAI sector / keyhole sector from
    /// its neighbours' bearings (§4.C).
    pub fn bisect(a: Self, b: Self) -> Self {
        let (a, b) = (a.convert_to(AngleUnit::Radians).value, b.convert_to(AngleUnit::Radians).value);
        let (sa, ca) = a.sin_cos();
        let (sb, cb) = b.sin_cos();
        Self::t((sa + sb).atan2(ca + cb).to_degrees())
    }

    /// The reciprocal (opposite) bearing, wrapped to `[0, 360)`.
    pub fn reciprocal(&self) -> Self {
        Self::t(self.convert_to(AngleUnit::Degrees).value + 180.0)
    }

    /// The signed difference `self - other`, wrapped to `(-180, 180]` degrees.
    ///
    /// Used to test whether a bearing falls within an FAI sector's half
    /// angle of its bisector.
    pub fn signed_diff(&self, other: &Self) -> Self {
        let a = self.convert_to(AngleUnit::Degrees).value;
        let b = other.convert_to(AngleUnit::Degrees).value;
        let mut diff = (a - b) % 360.0;
        if diff > 180.0 {
            diff -= 360.0;
        } else if diff <= -180.0 {
            diff += 360.0;
        }
        Self {
            value: diff,
            unit: AngleUnit::Degrees,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_normalises_negative_degrees() {
        assert_eq!(Angle::t(-10.0).value(), 350.0);
    }

    #[test]
    fn signed_diff_wraps_around_north() {
        let diff = Angle::t(350.0).signed_diff(&Angle::t(10.0));
        assert!((diff.value() - (-20.0)).abs() < 1e-3);
    }

    #[test]
    fn signed_diff_is_zero_for_equal_bearings() {
        let diff = Angle::t(90.0).signed_diff(&Angle::t(90.0));
        assert_eq!(diff.value(), 0.0);
    }

    #[test]
    fn bisect_wraps_around_north() {
        let bisector = Angle::bisect(Angle::t(350.0), Angle::t(10.0));
        assert!(bisector.value() < 1.0 || bisector.value() > 359.0);
    }

    #[test]
    fn bisect_of_perpendicular_bearings() {
        let bisector = Angle::bisect(Angle::t(0.0), Angle::t(90.0));
        assert!((bisector.value() - 45.0).abs() < 1e-3);
    }

    #[test]
    fn reciprocal_is_180_degrees_apart() {
        assert_eq!(Angle::t(30.0).reciprocal().value(), 210.0);
        assert_eq!(Angle::t(200.0).reciprocal().value(), 20.0);
    }
}
