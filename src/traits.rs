//! Core traits connecting the stream codecs to the transcode loop.

use crate::error::Result;
use crate::record::DynamicRecord;

/// A stream that yields records one at a time.
///
/// Reading is split in two so the loop can tell a framing problem (or a clean
/// end of input) apart from a payload that does not match the schema.
pub trait RecordSource {
    /// Advances to the next record.
    ///
    /// Returns `Ok(false)` on clean end-of-stream.
    fn next_frame(&mut self) -> Result<bool>;

    /// Decodes the record located by the last successful `next_frame` into
    /// `record`, which the caller has already cleared.
    fn decode_into(&mut self, record: &mut DynamicRecord) -> Result<()>;
}

/// A stream that accepts records one at a time.
pub trait RecordSink {
    /// Encodes `record` and writes it out.
    fn encode_from(&mut self, record: &DynamicRecord) -> Result<()>;

    /// Flushes anything buffered. Called once after the last record.
    fn finish(&mut self) -> Result<()>;
}
