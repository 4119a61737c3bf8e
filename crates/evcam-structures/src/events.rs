// Copyright 2025 evcam contributors
// SPDX-License-Identifier: Apache-2.0

//! Change-detection event types.
//!
//! An event camera reports per-pixel brightness changes asynchronously. Each
//! notification carries the pixel coordinate, a polarity (brightness went up
//! or down) and a sensor-side timestamp in microseconds. The transport layer
//! delivers events grouped into batches sharing one arrival timestamp.

/// Direction of the brightness change at a pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Polarity {
    /// Brightness decreased
    Off = 0,
    /// Brightness increased
    On = 1,
}

/// A single pixel-level change-detection notification.
///
/// Immutable once created. Coordinates are sensor coordinates with (0, 0) in
/// the top-left corner; `t_us` is the sensor timestamp in microseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Event {
    pub x: u16,
    pub y: u16,
    pub polarity: Polarity,
    pub t_us: u64,
}

impl Event {
    pub fn new(x: u16, y: u16, polarity: Polarity, t_us: u64) -> Self {
        Self { x, y, polarity, t_us }
    }
}

/// An ordered batch of events delivered together by the transport layer.
///
/// Events within a batch are applied in the order given. The batch is not
/// necessarily sorted by event timestamp, and event timestamps may predate
/// the currently active accumulation window; such late events are still
/// applied to the active window (no re-bucketing).
#[derive(Clone, Debug)]
pub struct EventBatch {
    /// Arrival timestamp shared by the whole batch, microseconds
    arrival_t_us: u64,
    events: Vec<Event>,
}

impl EventBatch {
    pub fn new(arrival_t_us: u64, events: Vec<Event>) -> Self {
        Self { arrival_t_us, events }
    }

    pub fn arrival_t_us(&self) -> u64 {
        self.arrival_t_us
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterate events in delivery order.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }
}
