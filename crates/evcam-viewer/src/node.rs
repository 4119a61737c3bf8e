// Copyright 2025 evcam contributors
// SPDX-License-Identifier: Apache-2.0

//! Viewer node: handshake and stream wiring.

use evcam_config::ViewerConfig;
use evcam_engine::{
    AccumulationEngine, EngineError, EventSink, FramePublisher, PeriodicPublisher,
};
use evcam_structures::SensorGeometry;
use image::GrayImage;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Display sink for the optional gray-level image stream.
///
/// The gray-level channel is a sibling of the CD pipeline and never touches
/// the accumulation engine.
pub trait GraylevelSink: Send + Sync {
    fn show(&self, image: &GrayImage) -> Result<(), String>;
}

/// Connects the transport-layer callbacks to the accumulation engine.
///
/// Owns the engine through its whole lifecycle: waits for the first non-zero
/// camera geometry report, initializes exactly once, exposes the ingest
/// capability for event delivery, and builds the periodic publisher for the
/// main loop.
pub struct ViewerNode {
    config: ViewerConfig,
    engine: Arc<AccumulationEngine>,
    graylevel: Option<Arc<dyn GraylevelSink>>,
}

impl ViewerNode {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            engine: Arc::new(AccumulationEngine::new()),
            graylevel: None,
        }
    }

    /// Attaches the optional gray-level display sink.
    pub fn with_graylevel_sink(mut self, sink: Arc<dyn GraylevelSink>) -> Self {
        self.graylevel = Some(sink);
        self
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn engine(&self) -> Arc<AccumulationEngine> {
        Arc::clone(&self.engine)
    }

    /// The capability handed to the transport layer for event delivery.
    pub fn event_sink(&self) -> Arc<dyn EventSink> {
        self.engine.clone()
    }

    pub fn is_initialized(&self) -> bool {
        self.engine.geometry().is_some()
    }

    /// Camera-info handshake callback.
    ///
    /// The first non-zero geometry report initializes and starts the engine;
    /// zero-sized and repeated reports are ignored.
    pub fn on_camera_geometry(&self, width: u32, height: u32) -> Result<(), EngineError> {
        if self.is_initialized() {
            debug!(width, height, "geometry already known, report ignored");
            return Ok(());
        }
        if width == 0 || height == 0 {
            debug!("ignoring zero-sized geometry report");
            return Ok(());
        }

        let geometry = SensorGeometry::new(width, height)
            .map_err(|e| EngineError::Configuration(e.to_string()))?;
        self.engine.init(geometry)?;
        self.engine
            .set_accumulation_window(self.config.accumulation_window_us)?;

        if self.config.enable_cd_display {
            self.engine.start()?;
        }

        info!(
            sensor = %self.config.sensor_name,
            width,
            height,
            window_us = self.config.accumulation_window_us,
            "viewer initialized from camera geometry"
        );
        Ok(())
    }

    /// Gray-level image callback; independent of the CD pipeline.
    pub fn on_graylevel_image(&self, image: &GrayImage) {
        if !self.config.enable_graylevel_display {
            return;
        }
        if let Some(sink) = &self.graylevel {
            if let Err(e) = sink.show(image) {
                warn!(error = %e, "gray-level display failed");
            }
        }
    }

    /// Builds the periodic publisher driving the main loop at the
    /// accumulation-window cadence.
    pub fn make_publisher(&self, publisher: Arc<dyn FramePublisher>) -> PeriodicPublisher {
        PeriodicPublisher::new(
            self.engine(),
            publisher,
            self.config.accumulation_window_us,
        )
    }

    /// Stops the engine; the publisher is stopped through its shutdown flag.
    pub fn shutdown(&self) {
        self.engine.stop();
    }
}
