//! Serial connection configuration.

use std::time::Duration;

/// Default bounded read timeout for a console line.
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(2);

/// Serial connection configuration.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    /// Port name or path (e.g., "/dev/ttyUSB0", "COM3").
    pub port: String,

    /// Baud rate (e.g., 9600, 115200).
    pub baud_rate: u32,

    /// Bounded read timeout. A read that sees no data within this window
    /// reports quiescence rather than an error.
    pub read_timeout: Duration,
}

impl SerialConfig {
    /// Create a configuration with the default read timeout.
    pub fn new(port: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            port: port.into(),
            baud_rate,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }

    /// Override the read timeout.
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }
}
