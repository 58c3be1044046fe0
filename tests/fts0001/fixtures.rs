//! Hand-assembled packet bytes

/// 58-byte type 2+ header from `orig` to `dest`, each (zone, net, node)
pub fn header(orig: (u16, u16, u16), dest: (u16, u16, u16), password: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(58);
    for value in [
        orig.2, // orig_node
        dest.2, // dest_node
        2024,   // year
        2,      // month, 0-based: March
        1,      // day
        12,     // hour
        30,     // minute
        5,      // second
        0,      // baud
        2,      // packet type
        orig.1, // orig_net
        dest.1, // dest_net
    ] {
        out.extend_from_slice(&value.to_le_bytes());
    }
    out.push(0xfe); // product code low
    out.push(1); // product revision
    let mut pw = [0u8; 8];
    pw[..password.len()].copy_from_slice(password);
    out.extend_from_slice(&pw);
    for value in [orig.0, dest.0, 0] {
        out.extend_from_slice(&value.to_le_bytes());
    }
    out.extend_from_slice(&0x0100u16.to_le_bytes()); // capability validate
    out.push(0); // product code high
    out.push(0); // revision minor
    out.extend_from_slice(&0x0001u16.to_le_bytes()); // capability word
    for value in [orig.0, dest.0, 0, 0] {
        out.extend_from_slice(&value.to_le_bytes());
    }
    out.extend_from_slice(&0u32.to_le_bytes());
    assert_eq!(out.len(), 58);
    out
}

/// One packed message: version marker, record, date, names, text, NUL
///
/// `orig` and `dest` are (net, node).
pub fn message(orig: (u16, u16), dest: (u16, u16), names: [&[u8]; 3], text: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    for value in [2, orig.1, dest.1, orig.0, dest.0, 0, 0] {
        out.extend_from_slice(&value.to_le_bytes());
    }
    let mut date = [0u8; 20];
    date[..19].copy_from_slice(b"01 Mar 24  12:30:00");
    out.extend_from_slice(&date);
    for name in names {
        out.extend_from_slice(name);
        out.push(0);
    }
    out.extend_from_slice(text);
    out.push(0);
    out
}

/// Header, messages and the closing zero marker
pub fn packet(header: Vec<u8>, messages: &[Vec<u8>]) -> Vec<u8> {
    let mut out = header;
    for message in messages {
        out.extend_from_slice(message);
    }
    out.extend_from_slice(&[0, 0]);
    out
}

/// Scenario packet: 1:1/1 -> 1:1/2, one echomail message in TEST.AREA
pub fn echomail_packet() -> Vec<u8> {
    let text: Vec<u8> = [
        &b"AREA:TEST.AREA\r"[..],
        b"\x01MSGID: 1:1/1 12345678\r",
        b"\x01TZUTC: 0100\r",
        b"Hello from the test area.\r",
        b"Second line.\r",
        b"\r",
        b"--- ftngate\r",
        b" * Origin: Test system (1:1/1)\r",
        b"SEEN-BY: 1/1 2\r",
        b"\x01PATH: 1/1\r",
    ]
    .concat();
    packet(
        header((1, 1, 1), (1, 1, 2), b"pw"),
        &[message((1, 1), (1, 2), [b"All", b"Sysop", b"Greetings"], &text)],
    )
}
