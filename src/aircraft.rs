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

//! The one snapshot consumed per navigation tick, and the glide polar
//! boundary interface (§6).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geom::GeoPoint;
use crate::measurements::{Length, Speed};

/// A single fix, as handed to the engine once per navigation tick.
///
/// `time` is `None` before the first fix with a valid GPS time arrives;
/// nothing in the engine treats the zero time-of-day as a sentinel, so the
/// option is explicit rather than encoded as a magic value.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AircraftState {
    pub location: GeoPoint,
    pub altitude: Length,
    pub ground_speed: Speed,
    #[cfg_attr(feature = "serde", serde(with = "time_opt"))]
    pub time: Option<time::Time>,
    pub flying: bool,
}

impl AircraftState {
    pub fn has_time(&self) -> bool {
        self.time.is_some()
    }
}

impl Default for AircraftState {
    fn default() -> Self {
        Self {
            location: GeoPoint::invalid(),
            altitude: Length::m(0.0),
            ground_speed: Speed::mps(0.0),
            time: None,
            flying: false,
        }
    }
}

#[cfg(feature = "serde")]
pub(crate) mod time_opt {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(t: &Option<time::Time>, s: S) -> Result<S::Ok, S::Error> {
        t.map(|t| t.as_hms_nano()).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<time::Time>, D::Error> {
        let raw = Option::<(u8, u8, u8, u32)>::deserialize(d)?;
        raw.map(|(h, m, s, n)| time::Time::from_hms_nano(h, m, s, n).map_err(serde::de::Error::custom))
            .transpose()
    }
}

/// The glide polar boundary interface (§6a): the physical performance model
/// lives entirely outside this crate, so the engine only ever asks for the
/// MacCready speed-to-fly, never the polar curve itself.
pub trait GlidePolar {
    /// The current MacCready setting, as a speed-to-fly input to stats.
    fn mc(&self) -> Speed;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedPolar(Speed);
    impl GlidePolar for FixedPolar {
        fn mc(&self) -> Speed {
            self.0
        }
    }

    #[test]
    fn state_without_time_reports_no_time() {
        let state = AircraftState::default();
        assert!(!state.has_time());
    }

    #[test]
    fn state_with_time_reports_has_time() {
        let mut state = AircraftState::default();
        state.time = Some(time::Time::MIDNIGHT);
        assert!(state.has_time());
    }

    #[test]
    fn glide_polar_trait_object_is_usable() {
        let polar: Box<dyn GlidePolar> = Box::new(FixedPolar(Speed::kt(60.0)));
        assert_eq!(polar.mc().convert_to(crate::measurements::SpeedUnit::Knots).value(), 60.0);
    }
}
