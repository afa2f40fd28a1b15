//! Error types for zerotouch.

use std::io;
use thiserror::Error;

/// Main error type for zerotouch operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Serial transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Device record source errors
    #[error("Record error: {0}")]
    Record(#[from] RecordError),
}

/// Transport layer errors (port open, serial I/O).
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failed to open the serial port
    #[error("Failed to open {port} at {baud} baud: {source}")]
    OpenFailed {
        port: String,
        baud: u32,
        #[source]
        source: tokio_serial::Error,
    },

    /// Serial driver error
    #[error("Serial error: {0}")]
    Serial(#[from] tokio_serial::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Record source errors (schema validation, row parsing).
///
/// A schema error is the one fatal, pre-flight failure of a run: it is
/// raised before any device is touched.
#[derive(Error, Debug)]
pub enum RecordError {
    /// The source does not provide every required column
    #[error("Record source is missing required columns: {}", missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    /// Malformed source content or row
    #[error("Failed to read record source: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error opening the source
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias using zerotouch's Error.
pub type Result<T> = std::result::Result<T, Error>;
