// Copyright 2025 evcam contributors
// SPDX-License-Identifier: Apache-2.0

//! Concrete frame publishers.

use evcam_engine::FramePublisher;
use evcam_structures::Frame;
use std::path::PathBuf;
use tracing::trace;

/// Writes each published frame as a numbered PNG into a directory.
///
/// Stands in for the external image transport in demos and tests. Blank
/// pre-initialization frames are skipped, matching the original viewer which
/// only publishes once the CD frame is non-empty.
pub struct PngDirPublisher {
    directory: PathBuf,
}

impl PngDirPublisher {
    pub fn new(directory: impl Into<PathBuf>) -> std::io::Result<Self> {
        let directory = directory.into();
        std::fs::create_dir_all(&directory)?;
        Ok(Self { directory })
    }

    pub fn directory(&self) -> &PathBuf {
        &self.directory
    }
}

impl FramePublisher for PngDirPublisher {
    fn publish_frame(&self, frame: &Frame) -> Result<(), String> {
        let Some(image) = frame.to_gray_image() else {
            return Ok(());
        };
        let path = self
            .directory
            .join(format!("cd_frame_{:06}.png", frame.sequence_id()));
        image
            .save(&path)
            .map_err(|e| format!("failed to write {}: {}", path.display(), e))?;
        trace!(sequence_id = frame.sequence_id(), path = %path.display(), "frame written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn writes_numbered_png_files() {
        let dir = tempfile::tempdir().unwrap();
        let publisher = PngDirPublisher::new(dir.path()).unwrap();

        let frame = Frame::new(Array2::from_elem((4, 6), 128u8), 3, 0);
        publisher.publish_frame(&frame).unwrap();

        let path = dir.path().join("cd_frame_000003.png");
        assert!(path.exists());
        let reloaded = image::open(&path).unwrap().to_luma8();
        assert_eq!(reloaded.dimensions(), (6, 4));
    }

    #[test]
    fn blank_frames_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let publisher = PngDirPublisher::new(dir.path()).unwrap();

        publisher.publish_frame(&Frame::empty(1, 0)).unwrap();
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
