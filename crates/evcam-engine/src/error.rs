// Copyright 2025 evcam contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types for the accumulation engine

/// Result type alias using EngineError
pub type Result<T> = std::result::Result<T, EngineError>;

/// Error types for engine operations.
///
/// All variants are local and non-fatal to the hosting process; the engine
/// never terminates the process on its own.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Bad or duplicate configuration (double init, zero window, ...)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Operation attempted before init()
    #[error("Engine not initialized - call init() first")]
    NotInitialized,

    /// Ingest attempted after stop() began; the batch is rejected, not queued
    #[error("Engine is shutting down - batch rejected")]
    ShutdownInProgress,

    /// Background thread could not be spawned or joined
    #[error("Thread error: {0}")]
    Thread(String),
}
