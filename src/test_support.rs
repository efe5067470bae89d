//! Schema fixtures for unit tests.

use crate::descriptor::{Resolver, SearchPath, Sources};
use prost_reflect::MessageDescriptor;
use std::sync::OnceLock;

pub const PERSON_PROTO: &str = r#"
syntax = "proto3";
package demo;

message Person {
  int32 id = 1;
  string name = 2;
  repeated string tags = 3;
  int64 display_score = 4;
}
"#;

pub const NOTED_PROTO: &str = r#"
syntax = "proto2";
package ext;

message Noted {
  optional int32 id = 1;
  extensions 100 to 199;
}

extend Noted {
  optional string note = 100;
}
"#;

fn compile(file: &str, source: &str, type_name: &str) -> MessageDescriptor {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(file);
    std::fs::write(&path, source).unwrap();
    Resolver::new(SearchPath::new([dir.path()]))
        .resolve(&Sources::Files(vec![path]), type_name)
        .unwrap()
}

/// `demo.Person`, compiled once per test binary.
pub fn person_descriptor() -> MessageDescriptor {
    static DESCRIPTOR: OnceLock<MessageDescriptor> = OnceLock::new();
    DESCRIPTOR
        .get_or_init(|| compile("demo.proto", PERSON_PROTO, "demo.Person"))
        .clone()
}

/// `ext.Noted`, a proto2 message carrying the `ext.note` extension.
pub fn noted_descriptor() -> MessageDescriptor {
    static DESCRIPTOR: OnceLock<MessageDescriptor> = OnceLock::new();
    DESCRIPTOR
        .get_or_init(|| compile("ext.proto", NOTED_PROTO, "ext.Noted"))
        .clone()
}
