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

//! Typed units of measure.
//!
//! A [`Measurement<T, Unit>`] pairs a raw value with the unit it was recorded
//! in, so the solver and the start-gate arithmetic never silently mix meters
//! with nautical miles, or seconds with minutes. Every [`UnitOfMeasure`]
//! knows how to round-trip through its physical quantity's SI unit, which is
//! the common currency `Add`/`Sub`/`Div` convert through.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod constants;

mod angle;
mod duration;
mod length;
mod speed;

pub use angle::{Angle, AngleUnit};
pub use duration::{Duration, DurationUnit};
pub use length::{Length, LengthUnit};
pub use speed::{Speed, SpeedUnit};

/// The physical quantity a [`UnitOfMeasure`] belongs to.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum PhysicalQuantity {
    Length,
    Angle,
    Duration,
    Speed,
}

/// A unit belonging to a single [`PhysicalQuantity`], convertible to and from
/// that quantity's SI unit.
pub trait UnitOfMeasure<T>: Copy + Clone + PartialEq + fmt::Debug {
    fn quantity() -> PhysicalQuantity;
    fn si() -> Self;
    fn symbol(&self) -> &'static str;
    fn from_si(value: T, to: &Self) -> T;
    fn to_si(&self, value: &T) -> T;
}

/// A value tagged with the unit it is expressed in.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Measurement<T, U> {
    pub value: T,
    pub unit: U,
}

impl<U: UnitOfMeasure<f32>> Measurement<f32, U> {
    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn unit(&self) -> &U {
        &self.unit
    }

    /// The value expressed in this quantity's SI unit.
    pub fn to_si(&self) -> f32 {
        self.unit.to_si(&self.value)
    }

    /// Builds a measurement from an SI value, recording it in `unit`.
    pub fn from_si(value: f32, unit: U) -> Self {
        Self {
            value: U::from_si(value, &unit),
            unit,
        }
    }

    /// Returns the same physical value re-expressed in `unit`.
    pub fn convert_to(&self, unit: U) -> Self {
        Self::from_si(self.to_si(), unit)
    }
}

impl<U: UnitOfMeasure<f32>> PartialEq for Measurement<f32, U> {
    fn eq(&self, other: &Self) -> bool {
        self.to_si() == other.to_si()
    }
}

impl<U: UnitOfMeasure<f32>> PartialOrd for Measurement<f32, U> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.to_si().partial_cmp(&other.to_si())
    }
}

impl<U: UnitOfMeasure<f32>> Add for Measurement<f32, U> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::from_si(self.to_si() + rhs.to_si(), self.unit)
    }
}

impl<U: UnitOfMeasure<f32>> Sub for Measurement<f32, U> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::from_si(self.to_si() - rhs.to_si(), self.unit)
    }
}

impl<U: UnitOfMeasure<f32>> Neg for Measurement<f32, U> {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            value: -self.value,
            unit: self.unit,
        }
    }
}

impl<U: UnitOfMeasure<f32>> Mul<f32> for Measurement<f32, U> {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self {
            value: self.value * rhs,
            unit: self.unit,
        }
    }
}

impl<U: UnitOfMeasure<f32>> Div<f32> for Measurement<f32, U> {
    type Output = Self;

    fn div(self, rhs: f32) -> Self {
        Self {
            value: self.value / rhs,
            unit: self.unit,
        }
    }
}

/// Dividing two measurements of the same quantity yields their SI ratio, not
/// a `Measurement` — this is what lets the incremental-rescan rule (§4.D)
/// read as `(new_dist / old_dist - 1.0).abs() < 0.05` instead of manually
/// unwrapping `to_si()` on both sides.
impl<U: UnitOfMeasure<f32>> Div for Measurement<f32, U> {
    type Output = f32;

    fn div(self, rhs: Self) -> f32 {
        self.to_si() / rhs.to_si()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_round_trips() {
        let l = Length::m(1852.0);
        let nm = l.convert_to(LengthUnit::NauticalMiles);
        assert!((nm.value() - 1.0).abs() < 1e-4);
        assert_eq!(l.to_si(), nm.to_si());
    }

    #[test]
    fn ratio_of_same_quantity_is_dimensionless() {
        let a = Length::m(1000.0);
        let b = Length::m(1100.0);
        let ratio: f32 = b / a;
        assert!((ratio - 1.1).abs() < 1e-6);
    }
}
