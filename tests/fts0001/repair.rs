//! Embedded NUL analysis and repair
//!
//! Some tossers leave NUL bytes inside message text. A NUL only ends the
//! text when followed by another NUL or by the value 2.

use super::fixtures;
use ftngate::PacketError;
use ftngate::packet::{self, analyze, repair};

fn damaged() -> Vec<u8> {
    fixtures::packet(
        fixtures::header((1, 1, 1), (1, 1, 2), b""),
        &[
            fixtures::message((1, 1), (1, 2), [b"a", b"b", b"c"], b"one\0two\r"),
            fixtures::message((1, 1), (1, 2), [b"d", b"e", b"f"], b"clean\r"),
            fixtures::message((1, 1), (1, 2), [b"g", b"h", b"i"], b"x\0y\0z\r"),
        ],
    )
}

#[test]
fn test_analyze_reports_offsets() {
    let bytes = damaged();
    let analysis = analyze(&bytes);
    assert_eq!(analysis.messages, 3);
    assert!(analysis.error.is_none());

    let found: Vec<usize> = analysis.embedded_nulls.iter().map(|n| n.message).collect();
    assert_eq!(found, [0, 2, 2]);
    for null in &analysis.embedded_nulls {
        assert_eq!(bytes[null.offset], 0);
    }
}

#[test]
fn test_repair_removes_embedded_nulls() {
    let bytes = damaged();
    let outcome = repair(&bytes).unwrap();

    assert_eq!(outcome.messages, 3);
    assert_eq!(outcome.removed.len(), 3);
    assert_eq!(outcome.bytes.len(), bytes.len() - 3);
    assert!(analyze(&outcome.bytes).embedded_nulls.is_empty());

    let (_, messages) = packet::parse(&outcome.bytes).unwrap();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0].body_text(), "onetwo");
    assert_eq!(messages[1].body_text(), "clean");
    assert_eq!(messages[2].body_text(), "xyz");
}

#[test]
fn test_clean_packet_unchanged() {
    let bytes = fixtures::echomail_packet();
    let outcome = repair(&bytes).unwrap();
    assert_eq!(outcome.bytes, bytes);
    assert!(outcome.removed.is_empty());
}

#[test]
fn test_repair_reports_structure_errors_like_parse() {
    let mut bytes = fixtures::header((1, 1, 1), (1, 1, 2), b"");
    bytes.extend_from_slice(&[7, 0]);
    assert_eq!(repair(&bytes).unwrap_err(), packet::parse(&bytes).unwrap_err());
    assert!(matches!(
        repair(&bytes[..30]),
        Err(PacketError::Truncated { offset: 0, .. })
    ));
}

#[test]
fn test_analyze_keeps_partial_result() {
    let mut bytes = damaged();
    bytes.truncate(bytes.len() - 2);
    let analysis = analyze(&bytes);
    assert_eq!(analysis.messages, 3);
    assert!(matches!(analysis.error, Some(PacketError::Truncated { .. })));
}
