//! Run configuration, fixed for the lifetime of a process.

/// Default maximum record size, in KiB.
pub const DEFAULT_MAX_RECORD_KIB: usize = 8 * 1024;

/// Which way records flow through the pipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// JSON in, protobuf wire format out.
    #[default]
    Encode,
    /// Protobuf wire format in, JSON out.
    Decode,
}

/// How binary records are delimited in the byte stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FramingMode {
    /// The remaining stream is one record: `[payload]`.
    #[default]
    WholeStream,
    /// Each record is prefixed with its length: `[varint length | payload]`.
    Delimited,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub direction: Direction,
    pub framing: FramingMode,
    /// Maximum size of one encoded record in bytes.
    pub max_record_size: usize,
    pub verbose: bool,
}

impl Config {
    pub fn new(direction: Direction, framing: FramingMode) -> Self {
        Self {
            direction,
            framing,
            ..Self::default()
        }
    }

    /// Sets the record size limit from a KiB count, saturating on overflow.
    pub fn with_max_record_kib(mut self, kib: usize) -> Self {
        self.max_record_size = kib.saturating_mul(1024);
        self
    }

    pub fn with_max_record_size(mut self, bytes: usize) -> Self {
        self.max_record_size = bytes;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            direction: Direction::default(),
            framing: FramingMode::default(),
            max_record_size: DEFAULT_MAX_RECORD_KIB * 1024,
            verbose: false,
        }
    }
}
