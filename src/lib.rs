//! # pbstream
//!
//! Streams protobuf records between the binary wire format and JSON, using a
//! message schema that is resolved from `.proto` sources at runtime.
//!
//! ## Overview
//!
//! `pbstream` is a pipe filter: it reads records in one representation and
//! writes the same records in the other. Nothing about the schema is known at
//! build time; a [`Resolver`] compiles the sources and returns a
//! `MessageDescriptor`, and a single [`DynamicRecord`] built from it is reused
//! for every record in the stream.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pbstream::*;
//! use std::io::{stdin, stdout};
//!
//! fn main() -> Result<()> {
//!     let resolver = Resolver::new(SearchPath::from_env());
//!     let descriptor = resolver.resolve(&Sources::from_paths(["demo.proto"]), "demo.Person")?;
//!
//!     // JSON values on stdin -> length-delimited protobuf on stdout
//!     let config = Config::new(Direction::Encode, FramingMode::Delimited);
//!     let summary = transcode(&config, descriptor, stdin().lock(), stdout().lock())?;
//!     eprintln!("{} records", summary.records);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! * **`Framer` / `Deframer`**: how binary records are delimited (varint
//!   length prefix, or the whole stream as one record)
//! * **`RecordSource` / `RecordSink`**: one record in, one record out; the
//!   binary reader/writer and the JSON reader/writer implement these
//! * **`Transcoder`**: the explicit state machine that moves records from a
//!   source to a sink, resetting the shared record between iterations

pub mod config;
pub mod descriptor;
pub mod error;
pub mod framing;
pub mod json;
pub mod reader;
pub mod record;
pub mod traits;
pub mod transcode;
pub mod writer;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export the main public API for user convenience.
pub use config::{Config, Direction, FramingMode, DEFAULT_MAX_RECORD_KIB};
pub use descriptor::{Resolver, SearchPath, Sources};
pub use error::{Error, ErrorKind, Result};
pub use framing::{
    Deframer, DelimitedDeframer, DelimitedFramer, Framer, WholeStreamDeframer, WholeStreamFramer,
};
pub use json::{JsonReader, JsonWriter};
pub use reader::StreamReader;
pub use record::{DynamicRecord, Record};
pub use traits::{RecordSink, RecordSource};
pub use transcode::{transcode, State, Summary, Transcoder};
pub use writer::StreamWriter;

pub use prost_reflect;
