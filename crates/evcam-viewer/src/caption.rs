// Copyright 2025 evcam contributors
// SPDX-License-Identifier: Apache-2.0

use chrono::{TimeZone, Utc};
use evcam_structures::Frame;

/// Formats the human-readable caption for a published frame.
///
/// Rendering the text into pixels is a cosmetic step left to the display
/// layer; the engine only supplies the sequence id and capture time.
pub fn caption_text(frame: &Frame) -> String {
    let secs = (frame.capture_t_us() / 1_000_000) as i64;
    let micros = (frame.capture_t_us() % 1_000_000) as u32;
    let stamp = match Utc.timestamp_opt(secs, micros * 1_000).single() {
        Some(dt) => dt.format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        None => frame.capture_t_us().to_string(),
    };
    format!("seq:{} time_stamp:{}", frame.sequence_id(), stamp)
}
