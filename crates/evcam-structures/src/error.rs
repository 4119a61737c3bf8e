// Copyright 2025 evcam contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types for evcam data structures

/// Common error type for evcam data operations.
///
/// # Examples
/// ```
/// use evcam_structures::DataError;
///
/// fn validate_count(count: u32) -> Result<(), DataError> {
///     if count == 0 {
///         return Err(DataError::InvalidParameters("count must be > 0".into()));
///     }
///     Ok(())
/// }
///
/// assert!(validate_count(0).is_err());
/// assert!(validate_count(5).is_ok());
/// ```
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// Invalid parameters provided to a constructor or function
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
}
