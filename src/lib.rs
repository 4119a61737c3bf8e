// Copyright 2025 evcam contributors
// SPDX-License-Identifier: Apache-2.0

//! # evcam
//!
//! Event-camera change-detection viewer core: converts asynchronous sparse
//! pixel-change events into periodic raster frames.
//!
//! This umbrella crate re-exports the workspace members:
//! - [`structures`]: events, canvas, frames, sensor geometry
//! - [`config`]: TOML configuration with environment/CLI overrides
//! - [`engine`]: the accumulation engine and the periodic publisher
//! - [`viewer`]: transport-facing wiring (handshake, publishers, captions)

pub use evcam_config as config;
pub use evcam_engine as engine;
pub use evcam_structures as structures;
pub use evcam_viewer as viewer;

// Common entry points at the crate root.
pub use evcam_config::{load_config, ViewerConfig};
pub use evcam_engine::{AccumulationEngine, EventSink, FramePublisher, PeriodicPublisher};
pub use evcam_structures::{Event, EventBatch, Frame, Polarity, SensorGeometry};
pub use evcam_viewer::ViewerNode;
