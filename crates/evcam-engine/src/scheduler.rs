// Copyright 2025 evcam contributors
// SPDX-License-Identifier: Apache-2.0

//! Drift-correcting periodic schedule.

use std::time::{Duration, Instant};

/// Computes absolute wake-up targets for a fixed-period loop.
///
/// The target for cycle N is always `start + N * period`, recomputed from the
/// captured start time rather than from the previous wake-up. A cycle that
/// overruns its slot proceeds immediately and the next target stays on the
/// original grid, so the long-term phase error stays bounded instead of
/// accumulating.
///
/// All queries take an explicit `now` so callers (and tests) control the
/// clock.
#[derive(Clone, Debug)]
pub struct PeriodicSchedule {
    start: Instant,
    period: Duration,
    step: u64,
}

impl PeriodicSchedule {
    /// Creates a schedule whose first target is `start + period`.
    pub fn new(start: Instant, period: Duration) -> Self {
        Self {
            start,
            period: period.max(Duration::from_micros(1)),
            step: 1,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Index of the upcoming deadline (1-based).
    pub fn step(&self) -> u64 {
        self.step
    }

    /// Absolute time of the upcoming deadline.
    pub fn target(&self) -> Instant {
        let offset_ns = self
            .period
            .as_nanos()
            .saturating_mul(self.step as u128)
            .min(u64::MAX as u128) as u64;
        self.start + Duration::from_nanos(offset_ns)
    }

    /// Remaining time until the upcoming deadline, or `None` when the
    /// deadline has already passed (the caller should proceed immediately).
    pub fn time_until_target(&self, now: Instant) -> Option<Duration> {
        let target = self.target();
        if now < target {
            Some(target - now)
        } else {
            None
        }
    }

    /// Moves on to the next deadline.
    pub fn advance(&mut self) {
        self.step += 1;
    }
}
