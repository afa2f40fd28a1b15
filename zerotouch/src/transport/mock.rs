//! Scripted transport for exercising console logic without hardware.
//!
//! Reads come from a prepared script of steps, writes are recorded for
//! inspection. Test code keeps a [`WriteLog`] handle so assertions can run
//! after the transport has been handed off to the code under test.

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

use super::Transport;
use crate::error::{Result, TransportError};

/// One scripted read step.
#[derive(Debug)]
enum ReadStep {
    /// Bytes the device "sends" in one read.
    Data(Vec<u8>),
    /// A read that sees no data within the timeout.
    Quiet,
    /// A read that fails at the I/O layer.
    Error,
}

/// Shared handle to everything a [`ScriptedTransport`] was asked to write.
#[derive(Debug, Clone, Default)]
pub struct WriteLog(Arc<Mutex<Vec<Vec<u8>>>>);

impl WriteLog {
    /// Raw writes, in order.
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.0.lock().unwrap().clone()
    }

    /// Writes decoded as UTF-8, for assertions on command text.
    pub fn written_commands(&self) -> Vec<String> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .map(|w| String::from_utf8_lossy(w).into_owned())
            .collect()
    }

    fn push(&self, data: &[u8]) {
        self.0.lock().unwrap().push(data.to_vec());
    }
}

/// In-memory transport driven by a prepared read script.
///
/// Each `read_chunk` call consumes the next step; once the script is
/// exhausted, reads report quiescence. `bytes_buffered` reports the size
/// of the next data step, emulating a driver-side receive buffer.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    steps: VecDeque<ReadStep>,
    log: WriteLog,
}

impl ScriptedTransport {
    /// Create an empty transport: every read reports quiescence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes to be returned by the next unanswered read.
    pub fn reply(mut self, data: &[u8]) -> Self {
        self.steps.push_back(ReadStep::Data(data.to_vec()));
        self
    }

    /// Queue one quiet read.
    pub fn quiet(mut self) -> Self {
        self.steps.push_back(ReadStep::Quiet);
        self
    }

    /// Queue one failing read.
    pub fn fail(mut self) -> Self {
        self.steps.push_back(ReadStep::Error);
        self
    }

    /// Handle to the write log, usable after the transport moves away.
    pub fn write_log(&self) -> WriteLog {
        self.log.clone()
    }

    /// Raw writes so far, in order.
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.log.writes()
    }

    /// Writes decoded as UTF-8.
    pub fn written_commands(&self) -> Vec<String> {
        self.log.written_commands()
    }
}

impl Transport for ScriptedTransport {
    async fn read_chunk(&mut self, max: usize) -> Result<Vec<u8>> {
        match self.steps.pop_front() {
            Some(ReadStep::Data(mut data)) => {
                if data.len() > max {
                    let rest = data.split_off(max);
                    self.steps.push_front(ReadStep::Data(rest));
                }
                Ok(data)
            }
            Some(ReadStep::Quiet) | None => Ok(Vec::new()),
            Some(ReadStep::Error) => Err(TransportError::Io(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "scripted read failure",
            ))
            .into()),
        }
    }

    async fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.log.push(data);
        Ok(())
    }

    fn bytes_buffered(&mut self) -> Result<usize> {
        match self.steps.front() {
            Some(ReadStep::Data(data)) => Ok(data.len()),
            _ => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_follow_the_script() {
        let mut transport = ScriptedTransport::new().reply(b"one").quiet().reply(b"two");

        assert_eq!(transport.read_chunk(1024).await.unwrap(), b"one");
        assert!(transport.read_chunk(1024).await.unwrap().is_empty());
        assert_eq!(transport.read_chunk(1024).await.unwrap(), b"two");
        // Script exhausted: quiescence from here on.
        assert!(transport.read_chunk(1024).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_chunk_is_split() {
        let mut transport = ScriptedTransport::new().reply(b"abcdef");

        assert_eq!(transport.bytes_buffered().unwrap(), 6);
        assert_eq!(transport.read_chunk(4).await.unwrap(), b"abcd");
        assert_eq!(transport.bytes_buffered().unwrap(), 2);
        assert_eq!(transport.read_chunk(4).await.unwrap(), b"ef");
    }

    #[tokio::test]
    async fn test_writes_are_recorded() {
        let mut transport = ScriptedTransport::new();
        let log = transport.write_log();

        transport.write_all(b"show inventory\n").await.unwrap();
        assert_eq!(log.written_commands(), vec!["show inventory\n"]);
    }
}
