// Copyright 2025 evcam contributors
// SPDX-License-Identifier: Apache-2.0

//! # evcam viewer
//!
//! Wiring layer around the accumulation engine: consumes the camera-info
//! handshake and event buffers from the transport layer, emits periodic CD
//! frames through a [`FramePublisher`](evcam_engine::FramePublisher), and
//! forwards the optional gray-level side channel to an independent display
//! sink.

mod caption;
mod node;
mod publishers;

pub use caption::caption_text;
pub use node::{GraylevelSink, ViewerNode};
pub use publishers::PngDirPublisher;
