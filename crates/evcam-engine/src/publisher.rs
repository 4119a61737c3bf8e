// Copyright 2025 evcam contributors
// SPDX-License-Identifier: Apache-2.0

//! Periodic frame publication loop.

use crate::accumulator::AccumulationEngine;
use crate::scheduler::PeriodicSchedule;
use evcam_structures::Frame;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Trait for frame publishing (abstraction over the transport/display layer).
/// Any component that can hand a frame off for encoding/publication
/// implements this trait.
pub trait FramePublisher: Send + Sync {
    fn publish_frame(&self, frame: &Frame) -> Result<(), String>;
}

/// Publisher loop lifecycle. No transition leads back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PublisherState {
    /// Waiting for the sensor geometry handshake to initialize the engine
    WaitingForInit,
    /// Emitting frames at the configured cadence
    Running,
    /// Shutdown observed; the loop has exited
    Stopped,
}

/// Sleep chunk between shutdown-flag polls.
const POLL_INTERVAL: Duration = Duration::from_millis(10);
/// Cadence statistics are logged this often.
const STATS_INTERVAL: Duration = Duration::from_secs(5);

/// Drives snapshot/publish cycles at the accumulation-window cadence.
///
/// Each cycle snapshots the engine, hands the frame to the publisher, then
/// waits until the next absolute target time of its [`PeriodicSchedule`]. A
/// cycle whose processing overran its slot proceeds immediately without
/// shifting the schedule, so the long-run emission rate matches the
/// configured period exactly.
pub struct PeriodicPublisher {
    engine: Arc<AccumulationEngine>,
    publisher: Arc<dyn FramePublisher>,
    period: Duration,
    shutdown: Arc<AtomicBool>,
    state: PublisherState,
}

impl PeriodicPublisher {
    pub fn new(
        engine: Arc<AccumulationEngine>,
        publisher: Arc<dyn FramePublisher>,
        period_us: u64,
    ) -> Self {
        Self {
            engine,
            publisher,
            period: Duration::from_micros(period_us.max(1)),
            shutdown: Arc::new(AtomicBool::new(false)),
            state: PublisherState::WaitingForInit,
        }
    }

    /// Flag observed between cycles; store `true` to make [`run`](Self::run)
    /// return.
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    pub fn state(&self) -> PublisherState {
        self.state
    }

    /// Runs the publish loop on the calling thread until shutdown.
    ///
    /// Blocks in `WaitingForInit` until the engine reports its geometry
    /// (the external camera-info handshake), then emits one frame per period.
    pub fn run(&mut self) {
        while self.engine.geometry().is_none() {
            if self.shutdown.load(Ordering::Acquire) {
                self.state = PublisherState::Stopped;
                return;
            }
            thread::sleep(POLL_INTERVAL.min(self.period));
        }

        self.state = PublisherState::Running;
        info!(
            period_us = self.period.as_micros() as u64,
            "periodic publisher running"
        );

        let mut schedule = PeriodicSchedule::new(Instant::now(), self.period);
        let mut cycles = 0u64;
        let mut overruns = 0u64;
        let mut last_stats = Instant::now();
        let mut cycles_at_stats = 0u64;

        while !self.shutdown.load(Ordering::Acquire) {
            let frame = self.engine.snapshot();
            if let Err(e) = self.publisher.publish_frame(&frame) {
                warn!(sequence_id = frame.sequence_id(), error = %e, "frame publish failed");
            }
            cycles += 1;

            // Wait for the absolute target; an overrun proceeds immediately.
            let mut overran = true;
            while let Some(remaining) = schedule.time_until_target(Instant::now()) {
                overran = false;
                if self.shutdown.load(Ordering::Acquire) {
                    break;
                }
                thread::sleep(remaining.min(POLL_INTERVAL));
            }
            if overran {
                overruns += 1;
            }
            schedule.advance();

            let now = Instant::now();
            if now.duration_since(last_stats) >= STATS_INTERVAL {
                let window_cycles = cycles - cycles_at_stats;
                let actual_hz =
                    window_cycles as f64 / now.duration_since(last_stats).as_secs_f64();
                let desired_hz = 1.0 / self.period.as_secs_f64();
                debug!(cycles, overruns, desired_hz, actual_hz, "publisher cadence");
                last_stats = now;
                cycles_at_stats = cycles;
            }
        }

        self.state = PublisherState::Stopped;
        info!(cycles, overruns, "periodic publisher stopped");
    }
}
