// Copyright 2025 evcam contributors
// SPDX-License-Identifier: Apache-2.0

//! # evcam accumulation engine
//!
//! Converts an asynchronous stream of change-detection event batches into
//! periodic raster frames.
//!
//! ## Design
//! - [`AccumulationEngine`] owns the live canvas behind one internal lock;
//!   producers ingest batches through the [`EventSink`] capability and a
//!   background thread rolls the accumulation window at a fixed cadence.
//! - [`snapshot`](AccumulationEngine::snapshot) hands out owned [`Frame`]s
//!   via a double-buffered copy, so readers never alias the live canvas.
//! - [`PeriodicPublisher`] drives snapshot/publish cycles on a
//!   [`PeriodicSchedule`] that recomputes absolute target times every cycle,
//!   so per-cycle delays never accumulate into long-term drift.

mod accumulator;
mod error;
mod publisher;
mod scheduler;
mod sink;

pub use accumulator::{AccumulationEngine, DEFAULT_ACCUMULATION_WINDOW_US};
pub use error::{EngineError, Result};
pub use publisher::{FramePublisher, PeriodicPublisher, PublisherState};
pub use scheduler::PeriodicSchedule;
pub use sink::EventSink;

pub use evcam_structures::Frame;
