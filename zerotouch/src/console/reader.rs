//! Quiescence-based console reading.
//!
//! The console protocol has no end-of-output marker. The reader treats a
//! read attempt that yields no bytes as "the device has gone quiet" and
//! stops there. Mid-stream pagination prompts are answered with a single
//! space, emulating an operator paging through output.

use std::time::Duration;

use log::trace;
use memchr::memmem;
use tokio::time::sleep;

use super::buffer::TranscriptBuffer;
use super::{PAGINATION_CONTINUE, PAGINATION_MARKER};
use crate::error::Result;
use crate::timing::ConsoleTiming;
use crate::transport::Transport;

/// Bytes requested per read attempt.
const READ_CHUNK_SIZE: usize = 1024;

/// Reader that drains console output until the line goes quiet.
#[derive(Debug, Clone)]
pub struct ConsoleReader {
    chunk_size: usize,
    pagination_pause: Duration,
}

impl ConsoleReader {
    /// Create a reader using the workflow's delay table.
    pub fn new(timing: &ConsoleTiming) -> Self {
        Self {
            chunk_size: READ_CHUNK_SIZE,
            pagination_pause: timing.pagination_pause,
        }
    }

    /// Drain the transport until a read yields no data.
    ///
    /// Waits `initial_delay` before the first read so the device's command
    /// echo and processing can begin. A chunk containing the pagination
    /// marker is answered with exactly one continuation byte, followed by a
    /// short pause. After the loop, whatever the driver has already
    /// buffered is drained once and appended. Decoding is best-effort and
    /// never fails; transport errors propagate.
    pub async fn read_until_quiet<T: Transport>(
        &self,
        transport: &mut T,
        initial_delay: Duration,
    ) -> Result<String> {
        sleep(initial_delay).await;

        let mut transcript = TranscriptBuffer::new();
        loop {
            let chunk = transport.read_chunk(self.chunk_size).await?;
            if chunk.is_empty() {
                break;
            }

            let paginated = memmem::find(&chunk, PAGINATION_MARKER).is_some();
            transcript.push(&chunk);

            if paginated {
                trace!("Pagination prompt seen, sending continuation");
                transport.write_all(PAGINATION_CONTINUE).await?;
                sleep(self.pagination_pause).await;
            }
        }

        // One opportunistic drain of bytes the driver buffered after the
        // last read came back empty.
        let buffered = transport.bytes_buffered()?;
        if buffered > 0 {
            let chunk = transport.read_chunk(buffered).await?;
            transcript.push(&chunk);
        }

        Ok(transcript.into_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::ScriptedTransport;

    fn reader() -> ConsoleReader {
        ConsoleReader::new(&ConsoleTiming::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_reads_until_quiet() {
        let mut transport = ScriptedTransport::new()
            .reply(b"Interface status\n")
            .reply(b"more output\n");

        let transcript = reader()
            .read_until_quiet(&mut transport, Duration::from_secs(2))
            .await
            .unwrap();

        assert_eq!(transcript, "Interface status\nmore output\n");
        assert!(transport.writes().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_continuation_byte_per_pagination_prompt() {
        let mut transport = ScriptedTransport::new()
            .reply(b"page one\n --More-- ")
            .reply(b"page two\n --More-- ")
            .reply(b"tail\n");

        let transcript = reader()
            .read_until_quiet(&mut transport, Duration::from_secs(2))
            .await
            .unwrap();

        assert!(transcript.contains("page one"));
        assert!(transcript.contains("page two"));
        assert!(transcript.contains("tail"));
        assert_eq!(transport.writes(), vec![b" ".to_vec(), b" ".to_vec()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_final_drain_appends_buffered_bytes() {
        let mut transport = ScriptedTransport::new()
            .reply(b"body")
            .quiet()
            .reply(b" leftover");

        let transcript = reader()
            .read_until_quiet(&mut transport, Duration::from_secs(2))
            .await
            .unwrap();

        assert_eq!(transcript, "body leftover");
    }

    #[tokio::test(start_paused = true)]
    async fn test_undecodable_bytes_are_dropped() {
        let mut transport = ScriptedTransport::new().reply(b"ok\xff\xfe then");

        let transcript = reader()
            .read_until_quiet(&mut transport, Duration::from_secs(2))
            .await
            .unwrap();

        assert_eq!(transcript, "ok then");
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_error_propagates() {
        let mut transport = ScriptedTransport::new().reply(b"partial").fail();

        let result = reader()
            .read_until_quiet(&mut transport, Duration::from_secs(2))
            .await;

        assert!(result.is_err());
    }
}
