//! Error handling for PackView
//!
//! Provides error types for the layers of the visualizer:
//! - Layout errors (box/container placement, label inputs)
//! - I/O errors (configuration and output files)
//!
//! All error types use `thiserror` for ergonomic error handling.

use crate::types::Axis;
use thiserror::Error;

/// Layout error type
///
/// Raised before any rendering is attempted for the offending box.
/// A layout error never aborts the rest of the scene.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// A box or container dimension is zero, negative or not finite
    #[error("Invalid {axis} dimension for '{subject}': {value}")]
    InvalidDimension {
        /// Name of the box or container being placed.
        subject: String,
        /// The offending axis.
        axis: Axis,
        /// The rejected value.
        value: f64,
    },

    /// Label text is empty
    #[error("Label text must not be empty")]
    EmptyLabel,

    /// Measured text width is negative or not finite
    #[error("Invalid measured text width: {value}")]
    InvalidMeasurement {
        /// The rejected width.
        value: f64,
    },
}

impl LayoutError {
    /// Shorthand for [`LayoutError::InvalidDimension`]
    pub fn invalid_dimension(subject: impl Into<String>, axis: Axis, value: f64) -> Self {
        LayoutError::InvalidDimension {
            subject: subject.into(),
            axis,
            value,
        }
    }
}

/// Main error type for PackView
#[derive(Error, Debug)]
pub enum Error {
    /// Layout error
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
