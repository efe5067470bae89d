//! The reusable, schema-driven record instance.
//!
//! A process allocates exactly one [`DynamicRecord`] after the descriptor is
//! resolved. It is filled by a source, drained by a sink, and cleared before
//! the next iteration; it is never reallocated mid-stream.

use crate::error::Result;
use prost::Message;
use prost_reflect::{DynamicMessage, MessageDescriptor, ReflectMessage, Value};
use std::borrow::Cow;

/// Field-level access to a record whose shape is only known at runtime.
pub trait Record {
    /// The schema this record is bound to.
    fn descriptor(&self) -> MessageDescriptor;

    /// Returns the value of a field by number, or its default when unset.
    /// `None` means the schema has no such field.
    fn get(&self, field: u32) -> Option<Cow<'_, Value>>;

    /// Assigns a field by number. Fails if the field is unknown or the value
    /// has the wrong type.
    fn set(&mut self, field: u32, value: Value) -> Result<()>;

    /// Returns every field to its zero value. Repeated and map fields are
    /// emptied, not overwritten.
    fn clear(&mut self);

    /// True when no field holds a value.
    fn is_empty(&self) -> bool;
}

/// A [`Record`] backed by a `prost_reflect::DynamicMessage`.
#[derive(Debug, Clone)]
pub struct DynamicRecord {
    message: DynamicMessage,
}

impl DynamicRecord {
    /// Creates a zero-valued record for `descriptor`.
    pub fn new(descriptor: MessageDescriptor) -> Self {
        Self {
            message: DynamicMessage::new(descriptor),
        }
    }

    pub fn message(&self) -> &DynamicMessage {
        &self.message
    }

    /// Decodes wire-format bytes into the record.
    ///
    /// Protobuf merge semantics apply, so callers clear the record first.
    pub fn merge_wire(&mut self, payload: &[u8]) -> Result<()> {
        self.message.merge(payload)?;
        Ok(())
    }

    /// Encodes the record into `buf`, replacing its contents.
    pub fn encode_wire(&self, buf: &mut Vec<u8>) -> Result<()> {
        buf.clear();
        buf.reserve(self.message.encoded_len());
        self.message.encode(buf)?;
        Ok(())
    }

    /// Moves every populated field and extension of `parsed` into this record.
    pub fn absorb(&mut self, mut parsed: DynamicMessage) -> Result<()> {
        for (field, value) in parsed.take_fields() {
            self.message.try_set_field(&field, value)?;
        }
        // Extension values were already checked against their descriptors
        // when `parsed` was built.
        for (extension, value) in parsed.take_extensions() {
            self.message.set_extension(&extension, value);
        }
        Ok(())
    }
}

impl Record for DynamicRecord {
    fn descriptor(&self) -> MessageDescriptor {
        self.message.descriptor()
    }

    fn get(&self, field: u32) -> Option<Cow<'_, Value>> {
        self.message.get_field_by_number(field)
    }

    fn set(&mut self, field: u32, value: Value) -> Result<()> {
        self.message.try_set_field_by_number(field, value)?;
        Ok(())
    }

    fn clear(&mut self) {
        Message::clear(&mut self.message);
    }

    fn is_empty(&self) -> bool {
        self.message.fields().next().is_none()
    }
}
