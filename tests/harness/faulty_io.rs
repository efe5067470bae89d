#![allow(dead_code)]

use std::io::{self, Read, Write};

/// Wraps a reader and misbehaves in a controlled way.
pub struct FaultyReader<R: Read> {
    inner: R,
    mode: FaultMode,
    calls: usize,
    delivered: usize,
}

pub enum FaultMode {
    /// Never hand out more than one byte per call.
    OneByteChunks,
    /// Every nth call fails with `ErrorKind::Interrupted`.
    InterruptedEvery(usize),
    /// Fail with `ErrorKind::ConnectionReset` once this many bytes were delivered.
    FailAfter(usize),
}

impl<R: Read> FaultyReader<R> {
    pub fn new(inner: R, mode: FaultMode) -> Self {
        Self {
            inner,
            mode,
            calls: 0,
            delivered: 0,
        }
    }
}

impl<R: Read> Read for FaultyReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.calls += 1;
        if buf.is_empty() {
            return Ok(0);
        }
        let n = match self.mode {
            FaultMode::OneByteChunks => self.inner.read(&mut buf[..1])?,
            FaultMode::InterruptedEvery(n) if n != 0 && self.calls % n == 0 => {
                return Err(io::Error::from(io::ErrorKind::Interrupted))
            }
            FaultMode::FailAfter(limit) => {
                if self.delivered >= limit {
                    return Err(io::Error::new(
                        io::ErrorKind::ConnectionReset,
                        "simulated read failure",
                    ));
                }
                let room = (limit - self.delivered).min(buf.len());
                self.inner.read(&mut buf[..room])?
            }
            FaultMode::InterruptedEvery(_) => self.inner.read(buf)?,
        };
        self.delivered += n;
        Ok(n)
    }
}

/// Accepts `fail_after` bytes, then reports a broken pipe.
pub struct FailingWriter {
    pub written: Vec<u8>,
    pub fail_after: usize,
}

impl Write for FailingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written.len() >= self.fail_after {
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "Simulated I/O error",
            ));
        }
        let n = (self.fail_after - self.written.len()).min(buf.len());
        self.written.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
