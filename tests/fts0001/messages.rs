//! FTS-0001 packed messages, FTS-4000 kludges and the echomail trailer

use super::fixtures;
use ftngate::PacketError;
use ftngate::bridge::Charset;
use ftngate::packet::{self, Field, LineBreak, MAX_NAME_LEN};

#[test]
fn test_echomail_message_views() {
    let bytes = fixtures::echomail_packet();
    let (header, messages) = packet::parse(&bytes).unwrap();
    assert_eq!(header.origin().to_string(), "1:1/1");
    assert_eq!(messages.len(), 1);

    let message = &messages[0];
    assert_eq!(message.area, "TEST.AREA");
    assert!(message.is_echomail());
    assert_eq!((message.orig_net, message.orig_node), (1, 1));
    assert_eq!((message.dest_net, message.dest_node), (1, 2));
    assert_eq!(message.to, "All");
    assert_eq!(message.from, "Sysop");
    assert_eq!(message.subject, "Greetings");
    assert_eq!(message.date, "01 Mar 24  12:30:00");
    assert_eq!(message.kludges.msgid.as_deref(), Some("1:1/1 12345678"));
    assert_eq!(message.kludges.tzutc.as_deref(), Some("0100"));
    assert_eq!(message.seen_by, ["1/1", "1/2"]);
    assert_eq!(message.path, ["1/1"]);
    assert_eq!(message.tear_line.as_deref(), Some("ftngate"));
    assert_eq!(message.origin.as_deref(), Some("Test system (1:1/1)"));
    assert_eq!(message.charset, Charset::Cp437);
}

#[test]
fn test_body_excludes_control_lines() {
    let (_, messages) = packet::parse(&fixtures::echomail_packet()).unwrap();
    let body = messages[0].body_text();
    assert_eq!(body, "Hello from the test area.\nSecond line.");
    for marker in ["AREA:", "SEEN-BY", "---", "Origin", "MSGID", "PATH"] {
        assert!(!body.contains(marker), "{marker} leaked into body");
    }
}

#[test]
fn test_write_reproduces_cr_packet() {
    let bytes = fixtures::echomail_packet();
    let (header, messages) = packet::parse(&bytes).unwrap();
    let encoded = packet::write(&messages, &header);
    assert!(encoded.truncations.is_empty());
    assert_eq!(encoded.bytes, bytes);
}

#[test]
fn test_indented_markers_are_body_text() {
    let text = b"AREA:TEST\r  SEEN-BY: not a trailer\r --- nor a tear line\rreal\r";
    let bytes = fixtures::packet(
        fixtures::header((1, 1, 1), (1, 1, 2), b""),
        &[fixtures::message((1, 1), (1, 2), [b"a", b"b", b"c"], text)],
    );
    let (_, messages) = packet::parse(&bytes).unwrap();
    assert!(messages[0].seen_by.is_empty());
    assert!(messages[0].tear_line.is_none());
    assert_eq!(messages[0].body.len(), 3);
}

#[test]
fn test_netmail_has_no_area() {
    let text = b"\x01INTL 1:1/2 1:1/1\r\x01MSGID: 1:1/1 abcdef01\rPrivate note\r";
    let bytes = fixtures::packet(
        fixtures::header((1, 1, 1), (1, 1, 2), b""),
        &[fixtures::message((1, 1), (1, 2), [b"Sysop", b"User", b"Hi"], text)],
    );
    let (_, messages) = packet::parse(&bytes).unwrap();
    let message = &messages[0];
    assert!(!message.is_echomail());
    assert_eq!(message.kludges.get("INTL"), Some("1:1/2 1:1/1"));
    assert_eq!(message.body_text(), "Private note");
}

#[test]
fn test_lf_and_crlf_line_endings() {
    let text = b"AREA:TEST\r\nfirst\nsecond\r\nthird";
    let bytes = fixtures::packet(
        fixtures::header((1, 1, 1), (1, 1, 2), b""),
        &[fixtures::message((1, 1), (1, 2), [b"a", b"b", b"c"], text)],
    );
    let (_, messages) = packet::parse(&bytes).unwrap();
    assert_eq!(messages[0].area, "TEST");
    assert_eq!(messages[0].body_text(), "first\nsecond\nthird");
}

fn rewrite(text: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let bytes = fixtures::packet(
        fixtures::header((1, 1, 1), (1, 1, 2), b""),
        &[
            fixtures::message((1, 1), (1, 2), [b"a", b"b", b"c"], text),
            fixtures::message((1, 1), (1, 2), [b"d", b"e", b"f"], b"next\r"),
        ],
    );
    let (header, messages) = packet::parse(&bytes).unwrap();
    assert_eq!(messages.len(), 2);
    (bytes, packet::write(&messages, &header).bytes)
}

#[test]
fn test_write_reproduces_crlf_text() {
    let (original, written) = rewrite(b"AREA:RU.TEST\r\nhello\r\n");
    assert_eq!(written, original);
}

#[test]
fn test_write_reproduces_lf_text() {
    let (original, written) = rewrite(b"hello\nworld\n");
    assert_eq!(written, original);
}

#[test]
fn test_write_reproduces_mixed_text() {
    let (original, written) = rewrite(b"AREA:TEST\r\nfirst\nsecond\r\n\n\rthird");
    assert_eq!(written, original);
}

#[test]
fn test_composed_text_is_written_with_cr() {
    let bytes = fixtures::packet(
        fixtures::header((1, 1, 1), (1, 1, 2), b""),
        &[fixtures::message((1, 1), (1, 2), [b"a", b"b", b"c"], b"one\r\ntwo\n")],
    );
    let (header, mut messages) = packet::parse(&bytes).unwrap();
    let lines = messages[0].lines.clone();
    messages[0].set_text(lines, true);

    let (_, reparsed) = packet::parse(&packet::write(&messages, &header).bytes).unwrap();
    assert_eq!(reparsed[0].line_breaks, [LineBreak::Cr, LineBreak::Cr]);
    assert_eq!(reparsed[0].body_text(), "one\ntwo");
}

#[test]
fn test_chrs_selects_decoding() {
    // "Привет" in CP866
    let text = b"AREA:RU.TEST\r\x01CHRS: CP866 2\r\x8f\xe0\xa8\xa2\xa5\xe2\r";
    let bytes = fixtures::packet(
        fixtures::header((2, 5020, 52), (2, 5020, 1042), b""),
        &[fixtures::message((5020, 52), (5020, 1042), [b"All", b"\x88\xa2\xa0\xad", b"Hi"], text)],
    );
    let (header, messages) = packet::parse(&bytes).unwrap();
    assert_eq!(messages[0].charset, Charset::Cp866);
    assert_eq!(messages[0].from, "Иван");
    assert_eq!(messages[0].body_text(), "Привет");

    let encoded = packet::write(&messages, &header);
    assert_eq!(encoded.bytes, bytes);
}

#[test]
fn test_codepage_overrides_chrs() {
    let text = b"\x01CHRS: LATIN-1 2\r\x01CODEPAGE: 866\r\x8f\r";
    let bytes = fixtures::packet(
        fixtures::header((1, 1, 1), (1, 1, 2), b""),
        &[fixtures::message((1, 1), (1, 2), [b"a", b"b", b"c"], text)],
    );
    let (_, messages) = packet::parse(&bytes).unwrap();
    assert_eq!(messages[0].charset, Charset::Cp866);
    assert_eq!(messages[0].body_text(), "П");
}

#[test]
fn test_long_names_are_truncated_on_write() {
    let (header, mut messages) = packet::parse(&fixtures::echomail_packet()).unwrap();
    messages[0].from = "A".repeat(40);
    messages[0].subject = "S".repeat(80);

    let encoded = packet::write(&messages, &header);
    assert_eq!(encoded.truncations.len(), 2);
    assert_eq!(encoded.truncations[0].field, Field::From);
    assert_eq!(encoded.truncations[0].original_len, 40);
    assert_eq!(encoded.truncations[0].kept_len, MAX_NAME_LEN);
    assert_eq!(encoded.truncations[1].field, Field::Subject);

    let (_, reparsed) = packet::parse(&encoded.bytes).unwrap();
    assert_eq!(reparsed[0].from.len(), 35);
    assert_eq!(reparsed[0].subject.len(), 71);
}

#[test]
fn test_unknown_marker_is_corrupt() {
    let mut bytes = fixtures::header((1, 1, 1), (1, 1, 2), b"");
    bytes.extend_from_slice(&[3, 0]);
    assert_eq!(
        packet::parse(&bytes),
        Err(PacketError::Corrupt {
            offset: 58,
            marker: 3
        })
    );
}

#[test]
fn test_second_message_corrupt_stops_parse() {
    let good = fixtures::message((1, 1), (1, 2), [b"a", b"b", b"c"], b"one\r");
    let mut bytes = fixtures::header((1, 1, 1), (1, 1, 2), b"");
    bytes.extend_from_slice(&good);
    let marker_offset = bytes.len();
    // A zero low byte keeps the text NUL a terminator
    bytes.extend_from_slice(&[0x00, 0x01]);
    assert_eq!(
        packet::parse(&bytes),
        Err(PacketError::Corrupt {
            offset: marker_offset,
            marker: 0x0100
        })
    );
}

#[test]
fn test_unterminated_text_is_truncated() {
    let mut message = fixtures::message((1, 1), (1, 2), [b"a", b"b", b"c"], b"never ends");
    message.pop();
    let mut bytes = fixtures::header((1, 1, 1), (1, 1, 2), b"");
    bytes.extend_from_slice(&message);
    assert!(matches!(
        packet::parse(&bytes),
        Err(PacketError::Truncated { .. })
    ));
}

#[test]
fn test_embedded_nul_kept_by_parse() {
    let bytes = fixtures::packet(
        fixtures::header((1, 1, 1), (1, 1, 2), b""),
        &[fixtures::message((1, 1), (1, 2), [b"a", b"b", b"c"], b"abc\0def")],
    );
    let (_, messages) = packet::parse(&bytes).unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].body_text(), "abc\0def");
}
