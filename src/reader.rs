//! A generic, composable reader for framed protobuf records.

use crate::error::Result;
use crate::framing::Deframer;
use crate::record::DynamicRecord;
use crate::traits::RecordSource;
use std::io::Read;
use tracing::debug;

/// A reader for streaming binary records.
///
/// This reader is generic over a `Deframer` strategy, which defines how
/// each payload is delimited in the byte stream. The reader owns one payload
/// buffer and reuses it for every frame.
///
/// ```rust
/// # use pbstream::{StreamReader, DelimitedDeframer, Result};
/// # use std::io::Cursor;
/// let input = Cursor::new(vec![0x02, 0x08, 0x01]);
/// let mut reader = StreamReader::new(input, DelimitedDeframer::new(64));
/// while let Some(payload) = reader.read_message()? {
///     println!("frame: {} bytes", payload.len());
/// }
/// # Ok::<(), pbstream::Error>(())
/// ```
pub struct StreamReader<R: Read, D: Deframer> {
    reader: R,
    deframer: D,
    buffer: Vec<u8>,
}

impl<R: Read, D: Deframer> StreamReader<R, D> {
    /// Creates a new `StreamReader` with the given reader and deframing strategy.
    pub fn new(reader: R, deframer: D) -> Self {
        Self {
            reader,
            deframer,
            buffer: Vec::new(),
        }
    }

    /// Reads the next payload into the internal buffer.
    /// Returns Ok(Some(payload)) on success, Ok(None) on clean EOF.
    pub fn read_message(&mut self) -> Result<Option<&[u8]>> {
        match self
            .deframer
            .read_and_deframe(&mut self.reader, &mut self.buffer)?
        {
            Some(()) => Ok(Some(&self.buffer)),
            None => Ok(None),
        }
    }

    /// Consumes the reader, returning the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read, D: Deframer> RecordSource for StreamReader<R, D> {
    fn next_frame(&mut self) -> Result<bool> {
        match self.read_message()? {
            Some(payload) => {
                let bytes = payload.len();
                debug!(bytes, limit = self.deframer.max_len(), "read frame");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn decode_into(&mut self, record: &mut DynamicRecord) -> Result<()> {
        record.merge_wire(&self.buffer)
    }
}
