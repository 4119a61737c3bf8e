// Copyright 2025 evcam contributors
// SPDX-License-Identifier: Apache-2.0

//! Live accumulation canvas.

use crate::{Event, Polarity, SensorGeometry};
use ndarray::{Array2, Zip};

/// Intensity written for background (no recent activity) pixels.
pub const BACKGROUND_LEVEL: u8 = 128;
/// Intensity written by an ON (brightness increase) event.
pub const ON_LEVEL: u8 = 255;
/// Intensity written by an OFF (brightness decrease) event.
pub const OFF_LEVEL: u8 = 0;

/// The mutable raster that incoming events are accumulated into.
///
/// Stores one `u8` intensity per pixel in row-major (height, width) layout,
/// plus a per-pixel touch mark for the active accumulation window. Pixels
/// untouched during a window decay back to [`BACKGROUND_LEVEL`] when the
/// window rolls over. Dimensions are fixed at construction.
///
/// The canvas itself is not synchronized; the owning engine serializes all
/// access behind its internal lock.
#[derive(Debug)]
pub struct FrameCanvas {
    geometry: SensorGeometry,
    pixels: Array2<u8>,
    touched: Array2<bool>,
}

// NOTE -> (0,0) is in the top left corner, array index order is (row, col)

impl FrameCanvas {
    /// Creates a canvas of the given geometry, filled with the background level.
    pub fn new(geometry: SensorGeometry) -> Self {
        let shape = (geometry.height() as usize, geometry.width() as usize);
        Self {
            geometry,
            pixels: Array2::from_elem(shape, BACKGROUND_LEVEL),
            touched: Array2::from_elem(shape, false),
        }
    }

    pub fn geometry(&self) -> SensorGeometry {
        self.geometry
    }

    /// Applies a single event, marking the pixel as touched for the active
    /// window.
    ///
    /// Returns `false` (and leaves the canvas unchanged) when the event
    /// coordinate lies outside the raster. Malformed events are tolerated
    /// per-event so one bad coordinate never rejects a whole batch.
    pub fn apply_event(&mut self, event: &Event) -> bool {
        let (x, y) = (event.x as u32, event.y as u32);
        if x >= self.geometry.width() || y >= self.geometry.height() {
            return false;
        }
        let index = (y as usize, x as usize);
        self.pixels[index] = match event.polarity {
            Polarity::On => ON_LEVEL,
            Polarity::Off => OFF_LEVEL,
        };
        self.touched[index] = true;
        true
    }

    /// Rolls the accumulation window: pixels untouched during the closing
    /// window fade back to the background level, and all touch marks clear
    /// so the next window starts fresh.
    pub fn roll_window(&mut self) {
        Zip::from(&mut self.pixels)
            .and(&mut self.touched)
            .for_each(|pixel, touched| {
                if !*touched {
                    *pixel = BACKGROUND_LEVEL;
                }
                *touched = false;
            });
    }

    /// Copies the intensity raster into `target` (a bounded memcpy).
    ///
    /// `target` must have been allocated with the same shape.
    pub fn copy_pixels_into(&self, target: &mut Array2<u8>) {
        target.assign(&self.pixels);
    }

    /// Intensity at a pixel, if in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<u8> {
        self.pixels.get((y as usize, x as usize)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas_4x3() -> FrameCanvas {
        FrameCanvas::new(SensorGeometry::new(4, 3).unwrap())
    }

    #[test]
    fn new_canvas_is_background() {
        let canvas = canvas_4x3();
        assert_eq!(canvas.pixel(0, 0), Some(BACKGROUND_LEVEL));
        assert_eq!(canvas.pixel(3, 2), Some(BACKGROUND_LEVEL));
        assert_eq!(canvas.pixel(4, 0), None);
    }

    #[test]
    fn events_set_polarity_levels() {
        let mut canvas = canvas_4x3();
        assert!(canvas.apply_event(&Event::new(1, 2, Polarity::On, 10)));
        assert!(canvas.apply_event(&Event::new(2, 0, Polarity::Off, 11)));
        assert_eq!(canvas.pixel(1, 2), Some(ON_LEVEL));
        assert_eq!(canvas.pixel(2, 0), Some(OFF_LEVEL));
    }

    #[test]
    fn out_of_range_event_is_dropped() {
        let mut canvas = canvas_4x3();
        assert!(!canvas.apply_event(&Event::new(4, 0, Polarity::On, 10)));
        assert!(!canvas.apply_event(&Event::new(0, 3, Polarity::On, 10)));
        assert_eq!(canvas.pixel(0, 0), Some(BACKGROUND_LEVEL));
    }

    #[test]
    fn roll_window_fades_untouched_pixels_only() {
        let mut canvas = canvas_4x3();
        canvas.apply_event(&Event::new(1, 1, Polarity::On, 10));
        canvas.apply_event(&Event::new(2, 2, Polarity::Off, 11));

        canvas.roll_window();
        // Touched pixels keep their level through the rollover...
        assert_eq!(canvas.pixel(1, 1), Some(ON_LEVEL));
        assert_eq!(canvas.pixel(2, 2), Some(OFF_LEVEL));

        // ...but fade on the next rollover if nothing touches them again.
        canvas.roll_window();
        assert_eq!(canvas.pixel(1, 1), Some(BACKGROUND_LEVEL));
        assert_eq!(canvas.pixel(2, 2), Some(BACKGROUND_LEVEL));
    }

    #[test]
    fn copy_pixels_matches_canvas() {
        let mut canvas = canvas_4x3();
        canvas.apply_event(&Event::new(0, 0, Polarity::On, 1));

        let mut target = Array2::from_elem((3, 4), 0u8);
        canvas.copy_pixels_into(&mut target);
        assert_eq!(target[(0, 0)], ON_LEVEL);
        assert_eq!(target[(2, 3)], BACKGROUND_LEVEL);
    }
}
