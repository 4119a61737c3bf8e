// Copyright 2025 evcam contributors
// SPDX-License-Identifier: Apache-2.0

use crate::Result;
use evcam_structures::EventBatch;

/// Capability for delivering event batches into the accumulation pipeline.
///
/// The transport layer holds an `Arc<dyn EventSink>` and forwards each
/// received buffer through it, decoupling wiring from the engine. Implemented
/// by [`AccumulationEngine`](crate::AccumulationEngine).
pub trait EventSink: Send + Sync {
    /// Ingest one batch; the batch is consumed.
    fn ingest(&self, batch: EventBatch) -> Result<()>;
}
