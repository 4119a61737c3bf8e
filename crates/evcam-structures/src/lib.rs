// Copyright 2025 evcam contributors
// SPDX-License-Identifier: Apache-2.0

//! Core data structures for evcam.
//!
//! Defines the event-stream data model (events, batches), the live
//! accumulation canvas, and the owned frame snapshots handed to publishers.

mod canvas;
mod error;
mod events;
mod frame;
mod geometry;

pub use canvas::{FrameCanvas, BACKGROUND_LEVEL, OFF_LEVEL, ON_LEVEL};
pub use error::DataError;
pub use events::{Event, EventBatch, Polarity};
pub use frame::Frame;
pub use geometry::SensorGeometry;

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
