//! Serial transport layer.
//!
//! This module provides the byte-level console connection: the [`Transport`]
//! seam the rest of the crate is generic over, the real serial-port
//! implementation, and a scripted in-memory implementation for tests.

pub mod config;
mod mock;
mod serial;

pub use config::SerialConfig;
pub use mock::{ScriptedTransport, WriteLog};
pub use serial::SerialTransport;

use std::future::Future;

use crate::error::Result;

/// Byte-oriented, timeout-bounded console connection.
///
/// Reads are best-effort: `read_chunk` returns whatever arrived within the
/// connection's read timeout, and an empty chunk means the line has gone
/// quiet. There is no framing and no completion signal at this layer.
pub trait Transport: Send {
    /// Read up to `max` bytes. An empty vector means no bytes arrived
    /// within the read timeout.
    fn read_chunk(&mut self, max: usize) -> impl Future<Output = Result<Vec<u8>>> + Send;

    /// Write raw bytes to the device.
    fn write_all(&mut self, data: &[u8]) -> impl Future<Output = Result<()>> + Send;

    /// Number of bytes the driver has already buffered for reading.
    fn bytes_buffered(&mut self) -> Result<usize>;
}
