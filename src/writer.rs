//! A generic, composable writer for framed protobuf records.

use crate::error::Result;
use crate::framing::Framer;
use crate::record::DynamicRecord;
use crate::traits::RecordSink;
use std::io::Write;
use tracing::debug;

/// A writer for streaming binary records.
///
/// This writer is generic over a `Framer` strategy, which defines how each
/// encoded record is delimited in the byte stream. The encode buffer is kept
/// between records so steady-state writes do not allocate.
pub struct StreamWriter<W: Write, F: Framer> {
    writer: W,
    framer: F,
    buffer: Vec<u8>,
}

impl<W: Write, F: Framer> StreamWriter<W, F> {
    /// Creates a new `StreamWriter`.
    pub fn new(writer: W, framer: F) -> Self {
        Self {
            writer,
            framer,
            buffer: Vec::new(),
        }
    }

    /// Writes an already-encoded payload.
    pub fn write_payload(&mut self, payload: &[u8]) -> Result<()> {
        self.framer.frame_and_write(&mut self.writer, payload)
    }

    /// Flushes the underlying writer.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Consumes the writer, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write, F: Framer> RecordSink for StreamWriter<W, F> {
    fn encode_from(&mut self, record: &DynamicRecord) -> Result<()> {
        record.encode_wire(&mut self.buffer)?;
        debug!(bytes = self.buffer.len(), "writing frame");
        self.framer.frame_and_write(&mut self.writer, &self.buffer)
    }

    fn finish(&mut self) -> Result<()> {
        self.flush()
    }
}
