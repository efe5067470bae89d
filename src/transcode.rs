//! The transcode loop, modelled as an explicit state machine.
//!
//! ```text
//! AwaitInput --frame--> DecodeOne --> EncodeOne --> Reset --> AwaitInput
//!     |                     |             |
//!     +--clean EOF--> Done  +--error--> Failed <--+
//! ```
//!
//! One record is fully decoded and encoded before the next is read. Any
//! error is terminal; there is no partial-record recovery.

use crate::config::{Config, Direction, FramingMode};
use crate::error::Result;
use crate::framing::{DelimitedDeframer, DelimitedFramer, WholeStreamDeframer, WholeStreamFramer};
use crate::json::{JsonReader, JsonWriter};
use crate::reader::StreamReader;
use crate::record::{DynamicRecord, Record};
use crate::traits::{RecordSink, RecordSource};
use crate::writer::StreamWriter;
use prost_reflect::MessageDescriptor;
use std::io::{Read, Write};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    AwaitInput,
    DecodeOne,
    EncodeOne,
    Reset,
    Done,
    Failed,
}

impl State {
    pub fn is_terminal(self) -> bool {
        matches!(self, State::Done | State::Failed)
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub records: u64,
}

/// Drives records from a [`RecordSource`] to a [`RecordSink`] through one
/// reused [`DynamicRecord`].
pub struct Transcoder<S: RecordSource, K: RecordSink> {
    source: S,
    sink: K,
    record: DynamicRecord,
    state: State,
    records: u64,
}

impl<S: RecordSource, K: RecordSink> Transcoder<S, K> {
    pub fn new(source: S, sink: K, descriptor: MessageDescriptor) -> Self {
        Self {
            source,
            sink,
            record: DynamicRecord::new(descriptor),
            state: State::AwaitInput,
            records: 0,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn record(&self) -> &DynamicRecord {
        &self.record
    }

    /// Records fully written so far.
    pub fn records(&self) -> u64 {
        self.records
    }

    /// Performs one transition and returns the new state.
    ///
    /// On error the machine moves to [`State::Failed`] and the error is
    /// returned with the index of the record being processed. Stepping a
    /// terminal machine is a no-op.
    pub fn step(&mut self) -> Result<State> {
        let next = match self.transition() {
            Ok(next) => next,
            Err(e) => {
                self.state = State::Failed;
                return Err(e.at_record(self.records + 1));
            }
        };
        self.state = next;
        Ok(next)
    }

    fn transition(&mut self) -> Result<State> {
        match self.state {
            State::AwaitInput => {
                if self.source.next_frame()? {
                    Ok(State::DecodeOne)
                } else {
                    self.sink.finish()?;
                    Ok(State::Done)
                }
            }
            State::DecodeOne => {
                self.source.decode_into(&mut self.record)?;
                Ok(State::EncodeOne)
            }
            State::EncodeOne => {
                self.sink.encode_from(&self.record)?;
                self.records += 1;
                debug!(record = self.records, "transcoded record");
                Ok(State::Reset)
            }
            State::Reset => {
                self.record.clear();
                Ok(State::AwaitInput)
            }
            terminal @ (State::Done | State::Failed) => Ok(terminal),
        }
    }

    /// Steps until a terminal state is reached.
    pub fn run(mut self) -> Result<Summary> {
        while !self.state.is_terminal() {
            self.step()?;
        }
        Ok(Summary {
            records: self.records,
        })
    }

    /// Consumes the transcoder, returning the source and sink.
    pub fn into_parts(self) -> (S, K) {
        (self.source, self.sink)
    }
}

/// Transcodes every record on `input` to `output` according to `config`.
pub fn transcode<R, W>(
    config: &Config,
    descriptor: MessageDescriptor,
    input: R,
    output: W,
) -> Result<Summary>
where
    R: Read,
    W: Write,
{
    let limit = config.max_record_size;
    info!(
        type_name = descriptor.full_name(),
        direction = ?config.direction,
        framing = ?config.framing,
        max_record_size = limit,
        "starting transcode"
    );
    let summary = match (config.direction, config.framing) {
        (Direction::Decode, FramingMode::Delimited) => Transcoder::new(
            StreamReader::new(input, DelimitedDeframer::new(limit)),
            JsonWriter::new(output),
            descriptor,
        )
        .run()?,
        (Direction::Decode, FramingMode::WholeStream) => Transcoder::new(
            StreamReader::new(input, WholeStreamDeframer::new(limit)),
            JsonWriter::new(output),
            descriptor,
        )
        .run()?,
        (Direction::Encode, FramingMode::Delimited) => Transcoder::new(
            JsonReader::new(input, descriptor.clone()),
            StreamWriter::new(output, DelimitedFramer),
            descriptor,
        )
        .run()?,
        (Direction::Encode, FramingMode::WholeStream) => Transcoder::new(
            JsonReader::new(input, descriptor.clone()),
            StreamWriter::new(output, WholeStreamFramer),
            descriptor,
        )
        .run()?,
    };
    info!(records = summary.records, "transcode complete");
    Ok(summary)
}
