use pbstream::prost_reflect::Value;
use pbstream::*;
use std::io::{self, Cursor};

mod harness {
    pub mod faulty_io;
    pub mod schema;
}
use harness::faulty_io::{FailingWriter, FaultMode, FaultyReader};
use harness::schema::person;

fn decode(config: &Config, input: Vec<u8>) -> (Result<Summary>, String) {
    let mut out = Vec::new();
    let result = transcode(config, person(), Cursor::new(input), &mut out);
    (result, String::from_utf8(out).unwrap())
}

fn delimited() -> Config {
    Config::new(Direction::Decode, FramingMode::Delimited)
}

#[test]
fn declared_length_one_over_limit_is_rejected() {
    // Purpose: a prefix declaring max + 1 bytes fails with FrameTooLarge and the
    // bytes after it are never treated as a new record.
    let limit = 16;
    let mut input = Vec::new();
    prost::encode_length_delimiter(limit + 1, &mut input).unwrap();
    // A body that, read as frames, would be a valid record `{"id": 1}`.
    let mut body = vec![0x02, 0x08, 0x01];
    body.resize(limit + 1, 0);
    input.extend_from_slice(&body);

    let (result, out) = decode(&delimited().with_max_record_size(limit), input);
    match result {
        Err(Error::Record { index, source }) => {
            assert_eq!(index, 1);
            match *source {
                Error::FrameTooLarge { declared, limit: l } => {
                    assert_eq!((declared, l), (limit + 1, limit));
                }
                e => panic!("expected FrameTooLarge, got {e:?}"),
            }
        }
        other => panic!("expected record error, got {other:?}"),
    }
    assert!(out.is_empty());
}

#[test]
fn declared_length_at_limit_is_accepted() {
    let mut record = DynamicRecord::new(person());
    record.set(2, Value::String("abcdefghijklmn".into())).unwrap();
    let mut writer = StreamWriter::new(Vec::new(), DelimitedFramer);
    writer.encode_from(&record).unwrap();
    let input = writer.into_inner();
    let body_len = input.len() - 1;

    let (result, out) = decode(&delimited().with_max_record_size(body_len), input);
    assert_eq!(result.unwrap().records, 1);
    assert!(out.contains("abcdefghijklmn"));
}

#[test]
fn truncated_length_prefix_is_framing_error() {
    let (result, _) = decode(&delimited(), vec![0x02, 0x08, 0x01, 0x80]);
    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Framing);
    assert!(matches!(err.root(), Error::InvalidFrame { .. }));
}

#[test]
fn truncated_body_is_unexpected_eof() {
    let (result, out) = decode(&delimited(), vec![0x02, 0x08, 0x01, 0x05, 0x08]);
    let err = result.unwrap_err();
    assert!(matches!(err.root(), Error::UnexpectedEof));
    match err {
        Error::Record { index, .. } => assert_eq!(index, 2),
        e => panic!("expected record error, got {e:?}"),
    }
    // The complete first record made it out.
    assert!(out.contains("\"id\": 1"));
}

#[test]
fn schema_mismatch_is_codec_error_not_framing() {
    // Field 1 (int32) sent with the length-delimited wire type and a bad length.
    let (result, _) = decode(&delimited(), vec![0x02, 0x0A, 0x09]);
    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Codec);
    assert!(matches!(err.root(), Error::Decode(_)));
}

#[test]
fn whole_stream_over_limit_is_rejected() {
    let config = Config::new(Direction::Decode, FramingMode::WholeStream).with_max_record_size(4);
    let (result, out) = decode(&config, vec![0x08, 0x01, 0x12, 0x01, b'a']);
    match result.unwrap_err().root() {
        Error::FrameTooLarge { declared, limit } => assert_eq!((*declared, *limit), (5, 4)),
        e => panic!("expected FrameTooLarge, got {e:?}"),
    }
    assert!(out.is_empty());
}

#[test]
fn output_write_failure_is_io_error() {
    let config = Config::new(Direction::Encode, FramingMode::Delimited);
    let writer = FailingWriter {
        written: Vec::new(),
        fail_after: 2,
    };
    let err = transcode(
        &config,
        person(),
        Cursor::new(r#"{"id":1,"name":"abc"}"#),
        writer,
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    match err.root() {
        Error::Io(e) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
        e => panic!("expected Io error, got {e:?}"),
    }
}

#[test]
fn input_read_failure_is_io_error() {
    let mut input = Vec::new();
    DelimitedFramer.frame_and_write(&mut input, &[0x08, 0x01]).unwrap();
    DelimitedFramer.frame_and_write(&mut input, &[0x08, 0x02]).unwrap();
    let faulty = FaultyReader::new(Cursor::new(input), FaultMode::FailAfter(4));

    let mut out = Vec::new();
    let err = transcode(&delimited(), person(), faulty, &mut out).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(matches!(err.root(), Error::Io(e) if e.kind() == io::ErrorKind::ConnectionReset));
}

#[test]
fn json_read_failure_is_io_error() {
    let config = Config::new(Direction::Encode, FramingMode::Delimited);
    let faulty = FaultyReader::new(
        Cursor::new(br#"{"id":1} {"id":2}"#.to_vec()),
        FaultMode::FailAfter(10),
    );
    let err = transcode(&config, person(), faulty, Vec::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}
