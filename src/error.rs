use std::path::PathBuf;
use thiserror::Error;

/// Custom error types for the pbstream library.
#[derive(Error, Debug)]
pub enum Error {
    /// Underlying I/O errors from std::io operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Neither explicit sources nor a conventional source could be determined.
    #[error("no IDL sources given")]
    NoSources,

    /// An IDL source (or one of its imports) failed to parse or link.
    #[error("failed to compile {}: {source}", .path.display())]
    Compile {
        path: PathBuf,
        #[source]
        source: Box<protox::Error>,
    },

    /// The requested message type is not defined by any of the sources.
    #[error("message {type_name} not defined in given sources")]
    TypeNotFound { type_name: String },

    /// Name-qualified resolution needs a package separator in the type name.
    #[error("type name `{0}` is not package-qualified")]
    UnqualifiedTypeName(String),

    /// The declared (or observed) frame length exceeds the configured maximum.
    #[error("frame length {declared} exceeds configured limit of {limit} bytes")]
    FrameTooLarge { declared: usize, limit: usize },

    /// Invalid frame error for malformed frames (e.g., truncated length prefix).
    #[error("Invalid frame: {message}")]
    InvalidFrame { message: String },

    /// Unexpected end of file while reading a frame body.
    #[error("Unexpected end of file while reading stream")]
    UnexpectedEof,

    /// Wire bytes inconsistent with the message schema.
    #[error("protobuf decode error: {0}")]
    Decode(#[from] prost::DecodeError),

    /// Failure encoding a record to the wire format.
    #[error("protobuf encode error: {0}")]
    Encode(#[from] prost::EncodeError),

    /// JSON syntax errors or values inconsistent with the schema (including unknown fields).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A value does not match the field it was assigned to.
    #[error("cannot set field: {0}")]
    SetField(#[from] prost_reflect::SetFieldError),

    /// Attaches the 1-based record index to an error raised while processing it.
    #[error("record #{index}: {source}")]
    Record {
        index: u64,
        #[source]
        source: Box<Error>,
    },
}

/// Broad classification used by callers that only care about the failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Resolution,
    Framing,
    Codec,
    Io,
}

impl Error {
    /// Create a new `InvalidFrame` error with a descriptive message.
    pub fn invalid_frame(message: impl Into<String>) -> Self {
        Self::InvalidFrame {
            message: message.into(),
        }
    }

    /// Create a new `FrameTooLarge` error.
    pub fn frame_too_large(declared: usize, limit: usize) -> Self {
        Self::FrameTooLarge { declared, limit }
    }

    pub(crate) fn compile(path: impl Into<PathBuf>, source: protox::Error) -> Self {
        Self::Compile {
            path: path.into(),
            source: Box::new(source),
        }
    }

    pub(crate) fn at_record(self, index: u64) -> Self {
        match self {
            already @ Self::Record { .. } => already,
            other => Self::Record {
                index,
                source: Box::new(other),
            },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoSources
            | Self::Compile { .. }
            | Self::TypeNotFound { .. }
            | Self::UnqualifiedTypeName(_) => ErrorKind::Resolution,
            Self::FrameTooLarge { .. } | Self::InvalidFrame { .. } | Self::UnexpectedEof => {
                ErrorKind::Framing
            }
            Self::Decode(_) | Self::Encode(_) | Self::SetField(_) => ErrorKind::Codec,
            Self::Json(e) if e.is_io() => ErrorKind::Io,
            Self::Json(_) => ErrorKind::Codec,
            Self::Io(_) => ErrorKind::Io,
            Self::Record { source, .. } => source.kind(),
        }
    }

    /// Strips any record context and returns the underlying error.
    pub fn root(&self) -> &Error {
        match self {
            Self::Record { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Result type alias for the library operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_context_is_not_nested() {
        let err = Error::UnexpectedEof.at_record(3).at_record(4);
        match &err {
            Error::Record { index, source } => {
                assert_eq!(*index, 3);
                assert!(matches!(**source, Error::UnexpectedEof));
            }
            e => panic!("expected Record, got {e:?}"),
        }
        assert_eq!(err.kind(), ErrorKind::Framing);
        assert!(matches!(err.root(), Error::UnexpectedEof));
    }

    #[test]
    fn frame_too_large_message() {
        let err = Error::frame_too_large(1025, 1024);
        assert_eq!(
            err.to_string(),
            "frame length 1025 exceeds configured limit of 1024 bytes"
        );
    }
}
