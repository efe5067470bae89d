#![allow(dead_code)]

use pbstream::prost_reflect::MessageDescriptor;
use pbstream::{Resolver, SearchPath, Sources};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tempfile::TempDir;

pub const PERSON_PROTO: &str = r#"
syntax = "proto3";
package demo;

message Person {
  int32 id = 1;
  string name = 2;
  repeated string tags = 3;
  map<string, int64> scores = 4;
  Address address = 5;
}

message Address {
  string city = 1;
  uint32 zip = 2;
}
"#;

/// A temporary include directory holding `.proto` files.
pub struct SchemaDir {
    dir: TempDir,
}

impl SchemaDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `source` at `name` (relative, may contain directories).
    pub fn add(&self, name: &str, source: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, source).unwrap();
        path
    }

    pub fn resolver(&self) -> Resolver {
        Resolver::new(SearchPath::new([self.dir.path()]))
    }

    pub fn resolve(&self, files: &[&str], type_name: &str) -> pbstream::Result<MessageDescriptor> {
        let files = files.iter().map(|f| self.dir.path().join(f)).collect();
        self.resolver().resolve(&Sources::Files(files), type_name)
    }
}

/// `demo.Person`, compiled once per test binary.
pub fn person() -> MessageDescriptor {
    static PERSON: OnceLock<MessageDescriptor> = OnceLock::new();
    PERSON
        .get_or_init(|| {
            let schema = SchemaDir::new();
            schema.add("demo.proto", PERSON_PROTO);
            schema.resolve(&["demo.proto"], "demo.Person").unwrap()
        })
        .clone()
}
