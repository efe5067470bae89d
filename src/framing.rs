//! Defines the framing and deframing strategies for the binary byte stream.

use crate::error::{Error, Result};
use std::io::{ErrorKind, Read, Write};

/// Longest valid length prefix: a base-128 varint of a `u64`.
pub const MAX_PREFIX_LEN: usize = 10;

/// Upper bound on the buffer space reserved from a declared length alone.
/// The buffer grows past this only as body bytes actually arrive.
const MAX_UPFRONT_RESERVE: usize = 64 * 1024;

//--- Length prefix ---

/// Reads one length prefix from `reader`, a byte at a time so nothing past
/// the prefix is consumed.
///
/// Returns Ok(None) when the stream ends before the first byte (clean EOF).
pub fn read_length_prefix<R: Read>(reader: &mut R) -> Result<Option<usize>> {
    let mut prefix = [0u8; MAX_PREFIX_LEN];
    let mut len = 0;
    while len < MAX_PREFIX_LEN {
        let byte = match read_byte(reader)? {
            Some(b) => b,
            None if len == 0 => return Ok(None),
            None => return Err(Error::invalid_frame("truncated length prefix")),
        };
        prefix[len] = byte;
        len += 1;
        if byte & 0x80 == 0 {
            break;
        }
    }
    prost::decode_length_delimiter(&prefix[..len])
        .map(Some)
        .map_err(|e| Error::invalid_frame(format!("bad length prefix: {e}")))
}

fn read_byte<R: Read>(reader: &mut R) -> Result<Option<u8>> {
    let mut byte = [0u8; 1];
    loop {
        match reader.read(&mut byte) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(byte[0])),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
}

//--- Framer Trait and Implementations ---

/// A trait that defines how an encoded record is framed and written to a stream.
pub trait Framer {
    fn frame_and_write<W: Write>(&self, writer: &mut W, payload: &[u8]) -> Result<()>;
}

/// Length-delimited framing: `[varint length | payload]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DelimitedFramer;

impl Framer for DelimitedFramer {
    fn frame_and_write<W: Write>(&self, writer: &mut W, payload: &[u8]) -> Result<()> {
        let mut prefix = Vec::with_capacity(prost::length_delimiter_len(payload.len()));
        prost::encode_length_delimiter(payload.len(), &mut prefix)?;
        writer.write_all(&prefix)?;
        writer.write_all(payload)?;
        Ok(())
    }
}

/// Whole-stream framing: the payload is written as-is with no delimiter.
#[derive(Debug, Clone, Copy, Default)]
pub struct WholeStreamFramer;

impl Framer for WholeStreamFramer {
    fn frame_and_write<W: Write>(&self, writer: &mut W, payload: &[u8]) -> Result<()> {
        writer.write_all(payload)?;
        Ok(())
    }
}

//--- Deframer Trait and Implementations ---

/// A trait that defines how one encoded record is read from a stream.
pub trait Deframer {
    /// Fills `buffer` with the next payload.
    /// Returns Ok(Some(())) on success, Ok(None) on clean EOF.
    fn read_and_deframe<R: Read>(&self, reader: &mut R, buffer: &mut Vec<u8>)
        -> Result<Option<()>>;

    /// Largest payload this deframer accepts, in bytes.
    fn max_len(&self) -> usize;
}

/// Reads `[varint length | payload]` frames, rejecting any declared length
/// above `max` before touching the body.
#[derive(Debug, Clone, Copy)]
pub struct DelimitedDeframer {
    max: usize,
}

impl DelimitedDeframer {
    pub fn new(max: usize) -> Self {
        Self { max }
    }
}

impl Deframer for DelimitedDeframer {
    fn read_and_deframe<R: Read>(
        &self,
        reader: &mut R,
        buffer: &mut Vec<u8>,
    ) -> Result<Option<()>> {
        let payload_len = match read_length_prefix(reader)? {
            Some(len) => len,
            None => return Ok(None), // Clean EOF
        };
        if payload_len > self.max {
            return Err(Error::frame_too_large(payload_len, self.max));
        }

        buffer.clear();
        buffer.reserve(payload_len.min(MAX_UPFRONT_RESERVE));
        reader.take(payload_len as u64).read_to_end(buffer)?;
        if buffer.len() != payload_len {
            return Err(Error::UnexpectedEof);
        }
        Ok(Some(()))
    }

    fn max_len(&self) -> usize {
        self.max
    }
}

/// Reads everything up to EOF as one payload.
///
/// An empty remainder is a clean EOF, so once the first payload has been
/// consumed every later call returns Ok(None).
#[derive(Debug, Clone, Copy)]
pub struct WholeStreamDeframer {
    max: usize,
}

impl WholeStreamDeframer {
    pub fn new(max: usize) -> Self {
        Self { max }
    }
}

impl Deframer for WholeStreamDeframer {
    fn read_and_deframe<R: Read>(
        &self,
        reader: &mut R,
        buffer: &mut Vec<u8>,
    ) -> Result<Option<()>> {
        buffer.clear();
        // One byte past the limit is enough to tell an oversized stream apart.
        let probe = (self.max as u64).saturating_add(1);
        reader.take(probe).read_to_end(buffer)?;
        if buffer.is_empty() {
            return Ok(None);
        }
        if buffer.len() > self.max {
            return Err(Error::frame_too_large(buffer.len(), self.max));
        }
        Ok(Some(()))
    }

    fn max_len(&self) -> usize {
        self.max
    }
}
