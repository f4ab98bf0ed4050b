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

//! Start-gate rules (component G, §4.F): pilot-event-triggered start
//! windows, on top of a fixed open/close window.

use log::{debug, warn};

use crate::measurements::Duration;
use crate::time::{OpenTimeSpan, RoughTime};

/// A latched pilot event, waiting for [`StartGate::update_after_pev`] to
/// turn it into an open time span.
#[derive(Copy, Clone, PartialEq, Debug)]
struct PendingPev {
    at: RoughTime,
}

/// Tracks the start window and the pilot-event rules that can open one.
///
/// The source derives whether to ceiling the PEV time from a separately
/// passed `BrokenTime`, which must correspond to the same instant as
/// `state.time` — a footgun the source comment calls out. Here the rough
/// time (and its whole-second remainder) is derived internally from the
/// single timestamp `set_pev` is given, removing the possibility of passing
/// a mismatched pair (§9).
#[derive(Clone, Debug, Default)]
pub struct StartGate {
    pub score_pev: bool,
    pub pev_start_wait_time: Duration,
    pub pev_start_window: Duration,

    /// Fixed open/close window, always in effect unless PEV scoring
    /// replaces it with a personal window.
    fixed_window: Option<OpenTimeSpan>,

    open_time_span: Option<OpenTimeSpan>,
    pending_pev: Option<PendingPev>,
    pev_based_advance_ready: bool,
}

impl StartGate {
    pub fn new(score_pev: bool, pev_start_wait_time: Duration, pev_start_window: Duration) -> Self {
        Self {
            score_pev,
            pev_start_wait_time,
            pev_start_window,
            ..Default::default()
        }
    }

    pub fn set_fixed_window(&mut self, window: Option<OpenTimeSpan>) {
        self.fixed_window = window;
    }

    /// The window currently in effect: a PEV-opened window once one has
    /// fired, otherwise the fixed configured window.
    pub fn open_time_span(&self) -> Option<OpenTimeSpan> {
        self.open_time_span.or(self.fixed_window)
    }

    pub fn pev_based_advance_ready(&self) -> bool {
        self.pev_based_advance_ready
    }

    /// Whether the start gate currently considers itself open at `now`.
    pub fn is_open(&self, now: RoughTime) -> bool {
        self.open_time_span().map_or(true, |span| span.has_begun(now))
    }

    /// Latches a pilot event at broken time `bt`, for [`update_after_pev`]
    /// to resolve on the next call (§4.F).
    ///
    /// Returns `false` (the event is ignored) if the gate is PEV-scored and
    /// the fixed window hasn't yet begun at `last_state_time` — a pilot
    /// can't open their personal window before the day's start gate is even
    /// live.
    pub fn set_pev(&mut self, at: RoughTime, last_state_time: RoughTime) -> bool {
        if self.score_pev {
            if !self.fixed_window.map_or(true, |w| w.has_begun(last_state_time)) {
                warn!("PEV ignored: fixed start window has not begun yet");
                return false;
            }
        }
        debug!("PEV latched at {:?}", at.since_midnight());
        self.pending_pev = Some(PendingPev { at });
        true
    }

    /// Resolves any pending PEV latched by [`set_pev`] into an open time
    /// span (§4.F).
    pub fn update_after_pev(&mut self) {
        let Some(pending) = self.pending_pev.take() else {
            return;
        };

        let new_start = RoughTime::from_since_midnight((pending.at.since_midnight() + self.pev_start_wait_time).ceil_to_minute());

        self.open_time_span = Some(if self.score_pev {
            self.pev_based_advance_ready = true;
            OpenTimeSpan::new(new_start, None)
        } else {
            OpenTimeSpan::new(new_start, Some(new_start.add(self.pev_start_window)))
        });

        debug!("PEV resolved: open span now {:?}", self.open_time_span);
    }

    /// Clears PEV state, e.g. on [`OrderedTask::reset`](crate::task::OrderedTask::reset).
    pub fn reset(&mut self) {
        self.open_time_span = None;
        self.pending_pev = None;
        self.pev_based_advance_ready = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rt(minutes: f32) -> RoughTime {
        RoughTime::from_since_midnight(Duration::min(minutes))
    }

    #[test]
    fn pev_window_ceils_wait_time_to_the_minute() {
        // S4: SetPEV(bt = 12:03:20) with a 5 minute wait and 10 minute
        // window -> open span [12:09, 12:19].
        let mut gate = StartGate::new(false, Duration::min(5.0), Duration::min(10.0));
        let at = rt(12.0 * 60.0 + 3.0 + 20.0 / 60.0);
        assert!(gate.set_pev(at, rt(0.0)));
        gate.update_after_pev();

        let span = gate.open_time_span().unwrap();
        assert_eq!(span.open.since_midnight(), Duration::min(12.0 * 60.0 + 9.0));
        assert_eq!(span.close.unwrap().since_midnight(), Duration::min(12.0 * 60.0 + 19.0));
    }

    #[test]
    fn pev_scored_gate_never_closes_and_sets_advance_ready() {
        let mut gate = StartGate::new(true, Duration::min(5.0), Duration::min(10.0));
        gate.set_fixed_window(Some(OpenTimeSpan::new(rt(0.0), None)));
        gate.set_pev(rt(60.0), rt(30.0));
        gate.update_after_pev();

        assert!(gate.pev_based_advance_ready());
        assert!(gate.open_time_span().unwrap().close.is_none());
    }

    #[test]
    fn pev_scored_gate_ignores_event_before_fixed_window_opens() {
        let mut gate = StartGate::new(true, Duration::min(5.0), Duration::min(10.0));
        gate.set_fixed_window(Some(OpenTimeSpan::new(rt(60.0), None)));
        assert!(!gate.set_pev(rt(5.0), rt(5.0)));
    }

    #[test]
    fn reset_clears_pev_state() {
        let mut gate = StartGate::new(true, Duration::min(5.0), Duration::min(10.0));
        gate.set_pev(rt(60.0), rt(0.0));
        gate.update_after_pev();
        gate.reset();
        assert!(!gate.pev_based_advance_ready());
        assert!(gate.open_time_span().is_none());
    }
}
