//! Transcript accumulation with lenient decoding.

use std::str;

/// Accumulates console output as text.
///
/// Console lines are noisy: chunks may split multi-byte sequences or carry
/// line garbage. Undecodable bytes are dropped rather than replaced, so the
/// transcript stays matchable with plain-text patterns. Decoding never
/// fails.
#[derive(Debug, Default)]
pub struct TranscriptBuffer {
    text: String,
}

impl TranscriptBuffer {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw chunk, dropping undecodable bytes.
    ///
    /// Each chunk is decoded independently; a multi-byte sequence split
    /// across chunk boundaries is dropped, not stitched back together.
    pub fn push(&mut self, chunk: &[u8]) {
        let mut rest = chunk;
        while !rest.is_empty() {
            match str::from_utf8(rest) {
                Ok(valid) => {
                    self.text.push_str(valid);
                    break;
                }
                Err(e) => {
                    let (valid, bad) = rest.split_at(e.valid_up_to());
                    self.text.push_str(str::from_utf8(valid).unwrap_or(""));
                    let skip = e.error_len().unwrap_or(bad.len());
                    rest = &bad[skip..];
                }
            }
        }
    }

    /// The transcript so far.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in bytes of the decoded transcript.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Check if the transcript is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Take ownership of the accumulated transcript.
    pub fn into_string(self) -> String {
        self.text
    }
}
