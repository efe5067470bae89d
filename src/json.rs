//! JSON side of the pipe: a streaming reader over concatenated JSON values
//! and a pretty-printing writer, both using the proto3 JSON mapping.

use crate::error::Result;
use crate::record::DynamicRecord;
use crate::traits::{RecordSink, RecordSource};
use prost_reflect::{DeserializeOptions, DynamicMessage, MessageDescriptor, SerializeOptions};
use serde_json::de::IoRead;
use serde_json::ser::PrettyFormatter;
use std::io::{Read, Write};

const INDENT: &[u8] = b"  ";

/// Reads successive JSON objects from one text stream.
///
/// Values may be concatenated with or without whitespace between them; the
/// tokenizer consumes exactly one value per record. Field names are the
/// declared proto names (JSON camelCase names are also accepted) and unknown
/// fields are rejected.
pub struct JsonReader<R: Read> {
    de: serde_json::Deserializer<IoRead<R>>,
    descriptor: MessageDescriptor,
    options: DeserializeOptions,
}

impl<R: Read> JsonReader<R> {
    pub fn new(reader: R, descriptor: MessageDescriptor) -> Self {
        Self {
            de: serde_json::Deserializer::from_reader(reader),
            descriptor,
            options: DeserializeOptions::new().deny_unknown_fields(true),
        }
    }
}

impl<R: Read> RecordSource for JsonReader<R> {
    fn next_frame(&mut self) -> Result<bool> {
        // `end` only skips whitespace; it fails with a syntax error when
        // another token is waiting and succeeds at end of input.
        match self.de.end() {
            Ok(()) => Ok(false),
            Err(e) if e.is_syntax() => Ok(true),
            Err(e) => Err(e.into()),
        }
    }

    fn decode_into(&mut self, record: &mut DynamicRecord) -> Result<()> {
        let parsed = DynamicMessage::deserialize_with_options(
            self.descriptor.clone(),
            &mut self.de,
            &self.options,
        )?;
        record.absorb(parsed)
    }
}

/// Writes each record as an indented JSON object followed by a newline.
pub struct JsonWriter<W: Write> {
    writer: W,
    options: SerializeOptions,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            options: SerializeOptions::new()
                .use_proto_field_name(true)
                .skip_default_fields(true),
        }
    }

    /// Consumes the writer, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RecordSink for JsonWriter<W> {
    fn encode_from(&mut self, record: &DynamicRecord) -> Result<()> {
        let formatter = PrettyFormatter::with_indent(INDENT);
        let mut serializer = serde_json::Serializer::with_formatter(&mut self.writer, formatter);
        record
            .message()
            .serialize_with_options(&mut serializer, &self.options)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
