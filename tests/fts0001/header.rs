//! FSC-0048 - Type 2+ packet header

use super::fixtures;
use chrono::NaiveDate;
use ftngate::packet::{self, HEADER_SIZE, PacketHeader};
use ftngate::{Address, PacketError};

#[test]
fn test_header_fields() {
    let bytes = fixtures::packet(fixtures::header((2, 5020, 52), (2, 5020, 1042), b"secret"), &[]);
    let (header, messages) = packet::parse(&bytes).unwrap();

    assert!(messages.is_empty());
    assert_eq!(header.origin(), Address::new(2, 5020, 52, 0));
    assert_eq!(header.destination(), Address::new(2, 5020, 1042, 0));
    assert_eq!(header.packet_type, 2);
    assert_eq!(header.password(), "secret");
    assert_eq!(header.product_code_lo, 0xfe);
    assert_eq!(header.capability_word, 0x0001);
    assert_eq!(header.capability_validate, 0x0100);
    assert_eq!((header.qm_orig_zone, header.qm_dest_zone), (2, 2));
}

#[test]
fn test_month_is_zero_based() {
    let bytes = fixtures::packet(fixtures::header((1, 1, 1), (1, 1, 2), b""), &[]);
    let (header, _) = packet::parse(&bytes).unwrap();
    assert_eq!(header.month, 2);
    let expected = NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(12, 30, 5)
        .unwrap();
    assert_eq!(header.created(), Some(expected));
}

#[test]
fn test_header_bytes_round_trip() {
    let raw = fixtures::header((2, 5020, 52), (2, 5020, 1042), b"pw");
    let header = PacketHeader::from_bytes(&raw).unwrap();
    assert_eq!(header.to_bytes().to_vec(), raw);
}

#[test]
fn test_new_header() {
    let created = NaiveDate::from_ymd_opt(2024, 12, 31)
        .unwrap()
        .and_hms_opt(23, 59, 58)
        .unwrap();
    let header = PacketHeader::new(
        Address::new(2, 5020, 1042, 0),
        Address::new(2, 5020, 52, 3),
        "toolongpassword",
        created,
    );
    assert_eq!(header.month, 11);
    assert_eq!(header.password(), "toolongp");
    assert_eq!(header.destination(), Address::new(2, 5020, 52, 3));
    assert_eq!(header.created(), Some(created));
}

#[test]
fn test_empty_packet_written() {
    let header = PacketHeader::new(
        Address::new(1, 1, 1, 0),
        Address::new(1, 1, 2, 0),
        "",
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap(),
    );
    let encoded = packet::write(&[], &header);
    assert_eq!(encoded.bytes.len(), HEADER_SIZE + 2);
    assert_eq!(&encoded.bytes[HEADER_SIZE..], &[0, 0]);
    let (parsed, messages) = packet::parse(&encoded.bytes).unwrap();
    assert_eq!(parsed, header);
    assert!(messages.is_empty());
}

#[test]
fn test_short_header_is_truncated() {
    let raw = fixtures::header((1, 1, 1), (1, 1, 2), b"");
    assert_eq!(
        packet::parse(&raw[..40]),
        Err(PacketError::Truncated {
            offset: 0,
            needed: 18
        })
    );
    assert!(matches!(
        packet::parse(&[]),
        Err(PacketError::Truncated { offset: 0, .. })
    ));
}

#[test]
fn test_missing_end_marker_is_truncated() {
    let raw = fixtures::header((1, 1, 1), (1, 1, 2), b"");
    assert!(matches!(
        packet::parse(&raw),
        Err(PacketError::Truncated { offset: 58, .. })
    ));
}
