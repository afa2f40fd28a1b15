//! Serial transport implementation using tokio-serial.

use log::debug;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_serial::{SerialPort, SerialPortBuilderExt, SerialStream};

use super::Transport;
use super::config::SerialConfig;
use crate::error::{Result, TransportError};

/// Console transport over a local serial port.
///
/// Opened exclusively for one device session; the port is released when
/// the transport is dropped, on every exit path.
pub struct SerialTransport {
    stream: SerialStream,
    config: SerialConfig,
}

impl SerialTransport {
    /// Open the serial port described by `config`.
    pub fn open(config: SerialConfig) -> Result<Self> {
        let stream = tokio_serial::new(&config.port, config.baud_rate)
            .timeout(config.read_timeout)
            .open_native_async()
            .map_err(|source| TransportError::OpenFailed {
                port: config.port.clone(),
                baud: config.baud_rate,
                source,
            })?;

        debug!(
            "Serial port '{}' opened at {} baud",
            config.port, config.baud_rate
        );
        Ok(Self { stream, config })
    }

    /// The port name this transport is bound to.
    pub fn port_name(&self) -> &str {
        &self.config.port
    }
}

impl Transport for SerialTransport {
    async fn read_chunk(&mut self, max: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; max];
        match tokio::time::timeout(self.config.read_timeout, self.stream.read(&mut buf)).await {
            Ok(Ok(n)) => {
                buf.truncate(n);
                Ok(buf)
            }
            Ok(Err(e)) => Err(TransportError::Io(e).into()),
            // No bytes within the read timeout: the line is quiet.
            Err(_) => Ok(Vec::new()),
        }
    }

    async fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.stream
            .write_all(data)
            .await
            .map_err(TransportError::Io)?;
        self.stream.flush().await.map_err(TransportError::Io)?;
        Ok(())
    }

    fn bytes_buffered(&mut self) -> Result<usize> {
        let n = self.stream.bytes_to_read().map_err(TransportError::Serial)?;
        Ok(n as usize)
    }
}

impl Drop for SerialTransport {
    fn drop(&mut self) {
        debug!("Serial port '{}' closed", self.config.port);
    }
}
