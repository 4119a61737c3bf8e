// Copyright 2025 evcam contributors
// SPDX-License-Identifier: Apache-2.0

//! The event-to-frame accumulation engine.
//!
//! One background thread rolls the accumulation window at the configured
//! cadence; any number of producer threads ingest event batches; consumers
//! take owned frame snapshots. All canvas mutation (event application,
//! periodic decay, shutdown) goes through the engine's single internal lock,
//! so a snapshot never observes a partially-applied batch.

use crate::scheduler::PeriodicSchedule;
use crate::{EngineError, Result};
use evcam_structures::{EventBatch, Frame, FrameCanvas, SensorGeometry, BACKGROUND_LEVEL};
use ndarray::Array2;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tracing::{debug, info, trace, warn};

/// Default accumulation window in microseconds.
pub const DEFAULT_ACCUMULATION_WINDOW_US: u64 = 5_000;

/// Sleep chunk while waiting for the next window boundary, so stop() stays
/// responsive even with long windows.
const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(20);

struct Shared {
    /// The single internal lock guarding the live canvas. `None` until init.
    canvas: Mutex<Option<FrameCanvas>>,
    /// Handoff buffer for snapshots: the canvas lock is held only for a
    /// bounded memcpy into this buffer, the owned Frame is built afterwards.
    handoff: Mutex<Array2<u8>>,
    window_us: AtomicU64,
    running: AtomicBool,
    shutting_down: AtomicBool,
    sequence: AtomicU64,
    dropped_events: AtomicU64,
}

/// Thread-safe accumulator turning event batches into a displayable raster.
///
/// Lifecycle: [`init`](Self::init) once with the sensor geometry, optionally
/// [`set_accumulation_window`](Self::set_accumulation_window), then
/// [`start`](Self::start). Producers call
/// [`ingest_events`](Self::ingest_events) concurrently; the consumer calls
/// [`snapshot`](Self::snapshot) whenever a frame is due.
/// [`stop`](Self::stop) shuts down cooperatively and leaves the canvas
/// quiescent.
pub struct AccumulationEngine {
    shared: Arc<Shared>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl AccumulationEngine {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                canvas: Mutex::new(None),
                handoff: Mutex::new(Array2::from_elem((0, 0), 0u8)),
                window_us: AtomicU64::new(DEFAULT_ACCUMULATION_WINDOW_US),
                running: AtomicBool::new(false),
                shutting_down: AtomicBool::new(false),
                sequence: AtomicU64::new(0),
                dropped_events: AtomicU64::new(0),
            }),
            worker: Mutex::new(None),
        }
    }

    /// Allocates the canvas for the given sensor geometry.
    ///
    /// Must be called exactly once before any other operation; a second call
    /// fails with [`EngineError::Configuration`] and leaves the existing
    /// canvas untouched. Zero dimensions are rejected by
    /// [`SensorGeometry::new`] before this is reachable.
    pub fn init(&self, geometry: SensorGeometry) -> Result<()> {
        // Lock order matches snapshot(): handoff before canvas.
        let mut handoff = self.shared.handoff.lock();
        let mut canvas = self.shared.canvas.lock();
        if canvas.is_some() {
            return Err(EngineError::Configuration(
                "engine already initialized".to_string(),
            ));
        }
        *canvas = Some(FrameCanvas::new(geometry));

        let shape = (geometry.height() as usize, geometry.width() as usize);
        *handoff = Array2::from_elem(shape, BACKGROUND_LEVEL);

        info!(
            width = geometry.width(),
            height = geometry.height(),
            "accumulation engine initialized"
        );
        Ok(())
    }

    /// Sets the accumulation window used for pixel decay.
    ///
    /// Must be called before [`start`](Self::start): the rollover loop
    /// samples the window once when its thread spawns, so the cadence is
    /// fixed while running. Already-emitted frames are unaffected.
    pub fn set_accumulation_window(&self, duration_us: u64) -> Result<()> {
        if duration_us == 0 {
            return Err(EngineError::Configuration(
                "accumulation window must be > 0 us".to_string(),
            ));
        }
        if self.shared.running.load(Ordering::Acquire) {
            return Err(EngineError::Configuration(
                "accumulation window cannot change while running".to_string(),
            ));
        }
        self.shared.window_us.store(duration_us, Ordering::Release);
        debug!(duration_us, "accumulation window set");
        Ok(())
    }

    pub fn accumulation_window_us(&self) -> u64 {
        self.shared.window_us.load(Ordering::Acquire)
    }

    /// Starts the background window-rollover thread.
    ///
    /// Idempotent no-op when already running.
    pub fn start(&self) -> Result<()> {
        if self.shared.canvas.lock().is_none() {
            return Err(EngineError::NotInitialized);
        }
        if self
            .shared
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(());
        }

        let shared = Arc::clone(&self.shared);
        let handle = thread::Builder::new()
            .name("evcam-accumulator".to_string())
            .spawn(move || accumulation_loop(shared))
            .map_err(|e| {
                self.shared.running.store(false, Ordering::Release);
                EngineError::Thread(format!("failed to spawn accumulation thread: {}", e))
            })?;

        *self.worker.lock() = Some(handle);
        info!("accumulation loop started");
        Ok(())
    }

    /// Signals the background thread to terminate and blocks until it has
    /// exited cleanly.
    ///
    /// New batches are rejected from the moment stop begins; any ingest
    /// already holding the canvas lock completes before stop returns. Safe
    /// to call multiple times.
    pub fn stop(&self) {
        self.shared.shutting_down.store(true, Ordering::Release);
        self.shared.running.store(false, Ordering::Release);

        if let Some(handle) = self.worker.lock().take() {
            if handle.join().is_err() {
                warn!("accumulation thread panicked during shutdown");
            } else {
                info!("accumulation loop stopped cleanly");
            }
        }

        // Barrier: an ingest that passed the shutdown check before we set the
        // flag may still hold the canvas lock. Taking it once guarantees no
        // mutation is in flight when stop() returns.
        drop(self.shared.canvas.lock());
    }

    /// Applies a batch of events to the live canvas.
    ///
    /// The whole batch is applied inside one bounded critical section, in
    /// delivery order, atomically with respect to snapshots and other
    /// producers. Late or out-of-order events land in whichever window is
    /// currently active; out-of-range events are dropped individually
    /// without failing the batch.
    pub fn ingest_events(&self, batch: EventBatch) -> Result<()> {
        if self.shared.shutting_down.load(Ordering::Acquire) {
            return Err(EngineError::ShutdownInProgress);
        }

        let mut guard = self.shared.canvas.lock();
        // Re-check under the lock: a producer preempted between the check
        // above and the lock acquisition may only resume after stop()'s
        // barrier has passed, and must not mutate the canvas then.
        if self.shared.shutting_down.load(Ordering::Acquire) {
            return Err(EngineError::ShutdownInProgress);
        }
        let canvas = guard.as_mut().ok_or(EngineError::NotInitialized)?;

        let mut dropped = 0u64;
        for event in batch.iter() {
            if !canvas.apply_event(event) {
                dropped += 1;
            }
        }
        drop(guard);

        if dropped > 0 {
            self.shared
                .dropped_events
                .fetch_add(dropped, Ordering::Relaxed);
            trace!(
                dropped,
                batch_len = batch.len(),
                "dropped out-of-range events"
            );
        }
        Ok(())
    }

    /// Takes an owned snapshot of the current canvas state.
    ///
    /// Sequence ids increase strictly on every call, including calls made
    /// before init (which yield the well-defined blank frame) and calls
    /// covering an empty window. The canvas lock is held only for a bounded
    /// copy into the handoff buffer.
    pub fn snapshot(&self) -> Frame {
        let sequence_id = self.shared.sequence.fetch_add(1, Ordering::AcqRel) + 1;
        let capture_t_us = unix_micros();

        let mut handoff = self.shared.handoff.lock();
        {
            let guard = self.shared.canvas.lock();
            match guard.as_ref() {
                Some(canvas) => canvas.copy_pixels_into(&mut handoff),
                None => return Frame::empty(sequence_id, capture_t_us),
            }
        }
        Frame::new(handoff.clone(), sequence_id, capture_t_us)
    }

    pub fn geometry(&self) -> Option<SensorGeometry> {
        self.shared.canvas.lock().as_ref().map(|c| c.geometry())
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    /// Total out-of-range events dropped since creation.
    pub fn dropped_event_count(&self) -> u64 {
        self.shared.dropped_events.load(Ordering::Relaxed)
    }
}

impl Default for AccumulationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AccumulationEngine {
    fn drop(&mut self) {
        self.stop();
    }
}

impl crate::EventSink for AccumulationEngine {
    fn ingest(&self, batch: EventBatch) -> Result<()> {
        self.ingest_events(batch)
    }
}

fn unix_micros() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or(0)
}

/// Background window-rollover loop (runs in the dedicated thread).
///
/// Wakes at `window_us` cadence on a drift-correcting schedule; at each
/// boundary, pixels untouched during the closing window fade back to
/// background. Sleeps in small chunks so the shutdown flag is observed
/// promptly.
fn accumulation_loop(shared: Arc<Shared>) {
    let window = Duration::from_micros(shared.window_us.load(Ordering::Acquire).max(1));
    let mut schedule = PeriodicSchedule::new(Instant::now(), window);
    debug!(window_us = window.as_micros() as u64, "accumulation loop running");

    while shared.running.load(Ordering::Acquire) {
        match schedule.time_until_target(Instant::now()) {
            Some(remaining) => {
                thread::sleep(remaining.min(SHUTDOWN_POLL_INTERVAL));
            }
            None => {
                if let Some(canvas) = shared.canvas.lock().as_mut() {
                    canvas.roll_window();
                }
                schedule.advance();
            }
        }
    }

    debug!(windows = schedule.step(), "accumulation loop exited");
}

#[cfg(test)]
mod tests {
    use super::*;
    use evcam_structures::{Event, Polarity, ON_LEVEL};

    fn geometry() -> SensorGeometry {
        SensorGeometry::new(32, 24).unwrap()
    }

    #[test]
    fn snapshot_before_init_is_blank_but_sequenced() {
        let engine = AccumulationEngine::new();
        let frame = engine.snapshot();
        assert!(frame.is_blank());
        assert_eq!(frame.sequence_id(), 1);
        assert_eq!(engine.snapshot().sequence_id(), 2);
    }

    #[test]
    fn ingest_before_init_fails() {
        let engine = AccumulationEngine::new();
        let batch = EventBatch::new(0, vec![Event::new(0, 0, Polarity::On, 0)]);
        assert!(matches!(
            engine.ingest_events(batch),
            Err(EngineError::NotInitialized)
        ));
    }

    #[test]
    fn double_init_rejected_and_canvas_untouched() {
        let engine = AccumulationEngine::new();
        engine.init(geometry()).unwrap();
        engine
            .ingest_events(EventBatch::new(0, vec![Event::new(5, 5, Polarity::On, 0)]))
            .unwrap();

        assert!(matches!(
            engine.init(SensorGeometry::new(8, 8).unwrap()),
            Err(EngineError::Configuration(_))
        ));

        let frame = engine.snapshot();
        assert_eq!(frame.width(), 32);
        assert_eq!(frame.pixel(5, 5), Some(ON_LEVEL));
    }

    #[test]
    fn zero_window_rejected() {
        let engine = AccumulationEngine::new();
        assert!(matches!(
            engine.set_accumulation_window(0),
            Err(EngineError::Configuration(_))
        ));
        assert_eq!(
            engine.accumulation_window_us(),
            DEFAULT_ACCUMULATION_WINDOW_US
        );
    }

    #[test]
    fn window_is_fixed_while_running() {
        let engine = AccumulationEngine::new();
        engine.init(geometry()).unwrap();
        engine.set_accumulation_window(2_000).unwrap();
        engine.start().unwrap();

        assert!(matches!(
            engine.set_accumulation_window(10_000),
            Err(EngineError::Configuration(_))
        ));
        assert_eq!(engine.accumulation_window_us(), 2_000);

        engine.stop();
    }

    #[test]
    fn start_requires_init() {
        let engine = AccumulationEngine::new();
        assert!(matches!(engine.start(), Err(EngineError::NotInitialized)));
    }

    #[test]
    fn out_of_range_events_dropped_silently() {
        let engine = AccumulationEngine::new();
        engine.init(SensorGeometry::new(4, 4).unwrap()).unwrap();

        let batch = EventBatch::new(
            0,
            vec![
                Event::new(1, 1, Polarity::On, 0),
                Event::new(100, 100, Polarity::On, 0),
            ],
        );
        engine.ingest_events(batch).unwrap();

        assert_eq!(engine.dropped_event_count(), 1);
        assert_eq!(engine.snapshot().pixel(1, 1), Some(ON_LEVEL));
    }
}
