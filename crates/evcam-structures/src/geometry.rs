// Copyright 2025 evcam contributors
// SPDX-License-Identifier: Apache-2.0

use crate::DataError;
use serde::{Deserialize, Serialize};

/// Sensor raster dimensions, reported once by the camera-info handshake.
///
/// Both dimensions must be non-zero; the geometry is fixed for the lifetime
/// of an engine instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorGeometry {
    width: u32,
    height: u32,
}

impl SensorGeometry {
    pub fn new(width: u32, height: u32) -> Result<Self, DataError> {
        if width == 0 || height == 0 {
            return Err(DataError::InvalidParameters(format!(
                "sensor geometry must be non-zero, got {}x{}",
                width, height
            )));
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_dimensions() {
        assert!(SensorGeometry::new(0, 480).is_err());
        assert!(SensorGeometry::new(640, 0).is_err());
        assert!(SensorGeometry::new(0, 0).is_err());
    }

    #[test]
    fn accepts_valid_dimensions() {
        let geometry = SensorGeometry::new(640, 480).unwrap();
        assert_eq!(geometry.width(), 640);
        assert_eq!(geometry.height(), 480);
        assert_eq!(geometry.pixel_count(), 640 * 480);
    }
}
