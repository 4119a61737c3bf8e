// Copyright 2025 evcam contributors
// SPDX-License-Identifier: Apache-2.0

//! Owned frame snapshots.

use image::GrayImage;
use ndarray::Array2;

/// A point-in-time copy of the accumulation canvas.
///
/// Frames are created by the engine's snapshot operation and exclusively
/// owned by the caller; they never alias the live canvas. `sequence_id` is a
/// strictly increasing counter across all snapshots of one engine instance,
/// `capture_t_us` is the wall-clock capture time in microseconds since the
/// Unix epoch.
#[derive(Clone, Debug)]
pub struct Frame {
    pixels: Array2<u8>,
    sequence_id: u64,
    capture_t_us: u64,
}

impl Frame {
    pub fn new(pixels: Array2<u8>, sequence_id: u64, capture_t_us: u64) -> Self {
        Self { pixels, sequence_id, capture_t_us }
    }

    /// The well-defined zero-sized frame returned when no canvas exists yet.
    ///
    /// Lets callers poll for frames during startup races without having to
    /// handle an error path.
    pub fn empty(sequence_id: u64, capture_t_us: u64) -> Self {
        Self {
            pixels: Array2::from_elem((0, 0), 0u8),
            sequence_id,
            capture_t_us,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.shape()[1] as u32
    }

    pub fn height(&self) -> u32 {
        self.pixels.shape()[0] as u32
    }

    /// True for the pre-initialization placeholder frame.
    pub fn is_blank(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn sequence_id(&self) -> u64 {
        self.sequence_id
    }

    pub fn capture_t_us(&self) -> u64 {
        self.capture_t_us
    }

    pub fn pixels(&self) -> &Array2<u8> {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<u8> {
        self.pixels.get((y as usize, x as usize)).copied()
    }

    /// Converts the raster to a grayscale image for encoding/publication.
    ///
    /// Returns `None` for the blank pre-initialization frame.
    pub fn to_gray_image(&self) -> Option<GrayImage> {
        if self.is_blank() {
            return None;
        }
        let (width, height) = (self.width(), self.height());
        // Row-major (height, width) layout matches GrayImage's raw buffer.
        let raw = self.pixels.iter().copied().collect();
        GrayImage::from_raw(width, height, raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_frame_is_blank() {
        let frame = Frame::empty(7, 123);
        assert!(frame.is_blank());
        assert_eq!(frame.width(), 0);
        assert_eq!(frame.height(), 0);
        assert_eq!(frame.sequence_id(), 7);
        assert!(frame.to_gray_image().is_none());
    }

    #[test]
    fn gray_image_round_trip() {
        let mut pixels = Array2::from_elem((2, 3), 128u8);
        pixels[(1, 2)] = 255;
        let frame = Frame::new(pixels, 1, 0);

        let img = frame.to_gray_image().unwrap();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(2, 1).0[0], 255);
        assert_eq!(img.get_pixel(0, 0).0[0], 128);
    }
}
