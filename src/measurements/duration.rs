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

/// Duration unit with _s_ as SI unit.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DurationUnit {
    Seconds,
    Minutes,
}

impl UnitOfMeasure<f32> for DurationUnit {
    fn quantity() -> PhysicalQuantity {
        PhysicalQuantity::Duration
    }

    fn si() -> Self {
        Self::Seconds
    }

    fn symbol(&self) -> &'static str {
        match self {
            Self::Seconds => "s",
            Self::Minutes => "min",
        }
    }

    fn from_si(value: f32, to: &Self) -> f32 {
        match to {
            Self::Seconds => value,
            Self::Minutes => value / constants::SECONDS_PER_MINUTE,
        }
    }

    fn to_si(&self, value: &f32) -> f32 {
        match self {
            Self::Seconds => *value,
            Self::Minutes => value * constants::SECONDS_PER_MINUTE,
        }
    }
}

/// An elapsed time, e.g. a wait time or a start window's width.
pub type Duration = Measurement<f32, DurationUnit>;

impl Duration {
    /// Creates a duration in seconds.
    pub fn s(value: f32) -> Self {
        Self {
            value,
            unit: DurationUnit::Seconds,
        }
    }

    /// Creates a duration in minutes.
    pub fn min(value: f32) -> Self {
        Self {
            value,
            unit: DurationUnit::Minutes,
        }
    }

    /// Rounds up to the next whole minute.
    ///
    /// Used by [`UpdateAfterPEV`] (§4.F) to turn a pilot-event timestamp with
    /// a non-zero second component into a start time resolved to the minute.
    ///
    /// [`UpdateAfterPEV`]: crate::start::StartGate::update_after_pev
    pub fn ceil_to_minute(&self) -> Self {
        let minutes = self.convert_to(DurationUnit::Minutes).value;
        Self::min(minutes.ceil())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ceil_to_minute_rounds_up_partial_minutes() {
        assert_eq!(Duration::s(301.0).ceil_to_minute(), Duration::min(6.0));
    }

    #[test]
    fn ceil_to_minute_leaves_exact_minutes_unchanged() {
        assert_eq!(Duration::s(300.0).ceil_to_minute(), Duration::min(5.0));
    }
}
