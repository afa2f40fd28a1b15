//! Console output capture.
//!
//! This module handles draining a device's console output: quiescence-based
//! reading, mid-stream pagination handling, and lenient transcript decoding.

mod buffer;
mod reader;

pub use buffer::TranscriptBuffer;
pub use reader::ConsoleReader;

/// Literal prompt a console emits to hold long output.
pub const PAGINATION_MARKER: &[u8] = b"--More--";

/// Byte sent to resume paginated output, as an operator pressing space.
pub const PAGINATION_CONTINUE: &[u8] = b" ";
