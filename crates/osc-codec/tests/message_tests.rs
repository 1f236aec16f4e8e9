//! Message encoding and decoding tests

use osc_codec::{
    OscColor, OscMessage, OscMidiMessage, OscPacket, OscReader, OscTimeTag, OscToken, OscValue,
    OscWriter, WriterState,
};

const MESSAGE_BODY_INT: &[u8] = b"/test\0\0\0,i\0\0\0\0\0\x2a";

fn body(type_tag: &[u8], payload: &[u8]) -> Vec<u8> {
    let mut bytes = b"/test\0\0\0".to_vec();
    bytes.extend_from_slice(type_tag);
    bytes.extend_from_slice(payload);
    bytes
}

#[test]
fn test_read_int() {
    let message = OscMessage::read(MESSAGE_BODY_INT).unwrap();
    assert_eq!(message.address(), "/test");
    assert_eq!(message.arguments(), &[OscValue::Int(42)]);
}

#[test]
fn test_write_int() {
    let message = OscMessage::new("/test", vec![OscValue::Int(42)]).unwrap();
    assert_eq!(message.to_bytes().unwrap().as_ref(), MESSAGE_BODY_INT);
}

#[test]
fn test_read_long() {
    let bytes = body(b",h\0\0", &[0xA1, 0xC2, 0xE3, 0xF4, 0xA5, 0xC6, 0xE7, 0xF8]);
    let message = OscMessage::read(&bytes).unwrap();
    assert_eq!(
        message.arguments(),
        &[OscValue::Long(0xA1C2E3F4A5C6E7F8u64 as i64)]
    );
}

#[test]
fn test_read_float() {
    let bytes = body(b",f\0\0", &[0x41, 0xCA, 0x00, 0x00]);
    let message = OscMessage::read(&bytes).unwrap();
    assert_eq!(message.arguments(), &[OscValue::Float(25.25)]);
}

#[test]
fn test_read_string_and_blob() {
    let bytes = body(b",sb\0", b"hi\0\0\0\0\0\x03\x01\x02\x03\0");
    let message = OscMessage::read(&bytes).unwrap();
    assert_eq!(
        message.arguments(),
        &[OscValue::from("hi"), OscValue::Blob(vec![1, 2, 3])]
    );
}

#[test]
fn test_address_only() {
    let message = OscMessage::read(b"/test\0\0\0").unwrap();
    assert!(message.is_empty());

    let bytes = OscMessage::new("/test", vec![]).unwrap().to_bytes().unwrap();
    assert_eq!(bytes.as_ref(), b"/test\0\0\0,\0\0\0");
    assert!(OscMessage::read(&bytes).unwrap().is_empty());
}

#[test]
fn test_all_types_roundtrip() {
    let arguments = vec![
        OscValue::Int(-7),
        OscValue::Long(i64::MIN),
        OscValue::Float(f32::NAN),
        OscValue::Double(std::f64::consts::PI),
        OscValue::Bool(true),
        OscValue::Bool(false),
        OscValue::from("string"),
        OscValue::Symbol("symbol".to_string()),
        OscValue::Blob(vec![]),
        OscValue::Blob(vec![9; 5]),
        OscValue::Char(b'x'),
        OscValue::Color(OscColor::new(255, 128, 0, 64)),
        OscValue::Midi(OscMidiMessage::new(1, 0x90, 60, 127)),
        OscValue::TimeTag(OscTimeTag::IMMEDIATE),
        OscValue::Impulse,
        OscValue::Null,
        OscValue::Array(vec![
            OscValue::Int(1),
            OscValue::Array(vec![OscValue::from("nested")]),
        ]),
    ];

    let message = OscMessage::new("/all/types", arguments).unwrap();
    let bytes = message.to_bytes().unwrap();

    assert_eq!(bytes.len() % 4, 0);
    assert_eq!(bytes.len(), message.size_in_bytes());
    assert_eq!(OscMessage::read(&bytes).unwrap(), message);
}

#[test]
fn test_char_layout() {
    let message = OscMessage::new("/c", vec![OscValue::Char(b'p')]).unwrap();
    let bytes = message.to_bytes().unwrap();
    assert_eq!(&bytes[bytes.len() - 4..], b"p\0\0\0");
}

#[test]
fn test_string_padding_exact_multiple() {
    let message = OscMessage::new("/abc", vec![OscValue::from("abc")]).unwrap();
    let bytes = message.to_bytes().unwrap();
    assert_eq!(bytes.as_ref(), b"/abc\0\0\0\0,s\0\0abc\0");
}

#[test]
fn test_reader_walk() {
    let bytes = body(b",i[ff]T\0", &[0, 0, 0, 1, 0x41, 0xCA, 0, 0, 0x3F, 0x80, 0, 0]);
    let mut reader = OscReader::new(&bytes).unwrap();
    reader.begin_message(bytes.len());

    assert_eq!(reader.read_address().unwrap(), "/test");
    reader.read_type_tag().unwrap();
    assert_eq!(reader.argument_count().unwrap().0, 3);
    assert_eq!(reader.read_int().unwrap(), 1);

    let (length, element_type) = reader.start_array().unwrap();
    assert_eq!((length, element_type), (2, OscToken::Float));
    assert_eq!(reader.read_float().unwrap(), 25.25);
    assert_eq!(reader.read_float().unwrap(), 1.0);
    reader.end_array().unwrap();

    assert!(reader.read_bool().unwrap());
    assert_eq!(reader.peek_token(), OscToken::End);
}

#[test]
fn test_reader_null_string() {
    let bytes = body(b",N\0\0", &[]);
    let mut reader = OscReader::new(&bytes).unwrap();
    reader.begin_message(bytes.len());
    reader.read_address().unwrap();
    reader.read_type_tag().unwrap();
    assert_eq!(reader.read_string().unwrap(), None);
}

#[test]
fn test_writer_sequence() {
    let mut writer = OscWriter::new();
    assert_eq!(writer.state(), WriterState::NotStarted);

    writer.start_message();
    writer.write_address("/test").unwrap();
    writer.write_type_tag(OscToken::Int).unwrap();
    writer.write_type_tag_end().unwrap();
    assert_eq!(writer.state(), WriterState::Arguments);
    writer.write_int(42).unwrap();

    assert_eq!(writer.as_bytes(), MESSAGE_BODY_INT);
}

#[test]
fn test_message_packet_dispatch() {
    let packet = OscPacket::read(MESSAGE_BODY_INT).unwrap();
    assert!(!packet.is_bundle());
    assert_eq!(packet.as_message().unwrap().address(), "/test");
}

#[test]
fn test_origin_recorded() {
    let packet = OscPacket::read_with_origin(MESSAGE_BODY_INT, "udp://10.0.0.2:8000").unwrap();
    assert_eq!(packet.origin(), Some("udp://10.0.0.2:8000"));
}

#[test]
fn test_typed_accessors() {
    let message = OscMessage::new(
        "/values",
        vec![OscValue::Int(3), OscValue::Double(0.25), OscValue::from("x")],
    )
    .unwrap();

    assert_eq!(message.get(0).and_then(OscValue::as_i32), Some(3));
    assert_eq!(message.get(1).and_then(OscValue::as_f64), Some(0.25));
    assert_eq!(message.get(2).and_then(OscValue::as_str), Some("x"));
    assert_eq!(message.iter().count(), 3);
}

#[test]
fn test_deeply_nested_arrays() {
    let message = OscMessage::new(
        "/nested",
        vec![OscValue::Array(vec![
            OscValue::Int(1),
            OscValue::Array(vec![
                OscValue::from("two"),
                OscValue::Array(vec![OscValue::Double(3.0), OscValue::Array(vec![])]),
            ]),
        ])],
    )
    .unwrap();

    let bytes = message.to_bytes().unwrap();
    assert_eq!(bytes.len(), message.size_in_bytes());
    assert_eq!(OscMessage::read(&bytes).unwrap(), message);
}

#[test]
fn test_write_into_caller_buffer_at_offset() {
    let message = OscMessage::new(
        "/mixer/3/fader",
        vec![OscValue::Float(0.5), OscValue::from("main")],
    )
    .unwrap();

    let mut data = [0xFFu8; 64];
    let written = {
        let mut dst = &mut data[12..];
        message.write_into(&mut dst).unwrap()
    };

    assert_eq!(written, message.size_in_bytes());
    assert_eq!(&data[12..12 + written], message.to_bytes().unwrap().as_ref());
    assert!(data[..12].iter().all(|b| *b == 0xFF));
    assert!(data[12 + written..].iter().all(|b| *b == 0xFF));
    assert_eq!(
        OscMessage::read(&data[12..12 + written]).unwrap(),
        message
    );
}

#[test]
fn test_write_into_too_small() {
    let message = OscMessage::new("/a", vec![OscValue::Int(1)]).unwrap();
    let mut data = [0u8; 8];
    let mut dst = &mut data[..];
    assert!(matches!(
        message.write_into(&mut dst),
        Err(osc_codec::Error::InvalidSegmentLength(_))
    ));
}
