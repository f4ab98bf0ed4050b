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

//! Time-of-day arithmetic for the start gate (§4.F).
//!
//! A competition day never needs more than a time-of-day and an elapsed
//! duration since it; modelling it as seconds since midnight (rather than
//! reaching for a full date-time) keeps the PEV wait/window arithmetic in
//! §4.F a simple integer addition, the same way the source's `RoughTime`
//! does.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::measurements::Duration;

/// A time of day, as seconds since midnight.
///
/// Does not track which day it belongs to — a task's start/finish window
/// never spans midnight in the source rules this models.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoughTime {
    since_midnight: Duration,
}

impl RoughTime {
    pub fn from_since_midnight(since_midnight: Duration) -> Self {
        Self { since_midnight }
    }

    pub fn from_time(t: time::Time) -> Self {
        let secs = t.hour() as f32 * 3600.0 + t.minute() as f32 * 60.0 + t.second() as f32;
        Self::from_since_midnight(Duration::s(secs))
    }

    pub fn since_midnight(&self) -> Duration {
        self.since_midnight
    }

    pub fn add(&self, d: Duration) -> Self {
        Self::from_since_midnight(self.since_midnight + d)
    }
}

/// An open/close window over [`RoughTime`], as used by the start gate.
///
/// `close` is `None` for a PEV-scored gate (§4.F): once the pilot's personal
/// window opens it never closes, since the grant is scored from the crossing
/// itself rather than against a shared close time.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OpenTimeSpan {
    pub open: RoughTime,
    pub close: Option<RoughTime>,
}

impl OpenTimeSpan {
    pub fn new(open: RoughTime, close: Option<RoughTime>) -> Self {
        Self { open, close }
    }

    /// Whether `now` falls within `[open, close)`, or `[open, ∞)` when
    /// `close` is `None`.
    pub fn has_begun(&self, now: RoughTime) -> bool {
        now >= self.open && self.close.map_or(true, |close| now < close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_begun_is_false_before_open() {
        let span = OpenTimeSpan::new(RoughTime::from_since_midnight(Duration::min(10.0)), None);
        assert!(!span.has_begun(RoughTime::from_since_midnight(Duration::min(5.0))));
    }

    #[test]
    fn has_begun_is_true_with_no_close() {
        let span = OpenTimeSpan::new(RoughTime::from_since_midnight(Duration::min(10.0)), None);
        assert!(span.has_begun(RoughTime::from_since_midnight(Duration::min(1000.0))));
    }

    #[test]
    fn has_begun_respects_close() {
        let span = OpenTimeSpan::new(
            RoughTime::from_since_midnight(Duration::min(10.0)),
            Some(RoughTime::from_since_midnight(Duration::min(20.0))),
        );
        assert!(span.has_begun(RoughTime::from_since_midnight(Duration::min(15.0))));
        assert!(!span.has_begun(RoughTime::from_since_midnight(Duration::min(25.0))));
    }
}
