//! RFC 3977 Section 6.1.1 - GROUP Command

use ftngate::{GroupInfo, NntpError, NntpResponse, commands};

fn response(code: u16, message: &str) -> NntpResponse {
    NntpResponse {
        code,
        message: message.to_string(),
        lines: vec![],
    }
}

#[test]
fn test_parse_group_response() {
    let info = commands::parse_group_response(response(211, "42 1 50 test.group")).unwrap();
    assert_eq!(
        info,
        GroupInfo {
            count: 42,
            first: 1,
            last: 50,
            name: "test.group".into(),
        }
    );
}

#[test]
fn test_empty_group() {
    let info = commands::parse_group_response(response(211, "0 0 0 empty.group")).unwrap();
    assert_eq!(info.count, 0);
    assert!(info.first == 0 && info.last == 0);
}

#[test]
fn test_no_such_group() {
    let result = commands::parse_group_response(response(411, "No such newsgroup"));
    assert!(matches!(result, Err(NntpError::Temporary { code: 411, .. })));
}

#[test]
fn test_malformed_counts() {
    assert!(matches!(
        commands::parse_group_response(response(211, "42 x 50 g")),
        Err(NntpError::InvalidResponse(_))
    ));
    assert!(matches!(
        commands::parse_group_response(response(211, "42")),
        Err(NntpError::InvalidResponse(_))
    ));
}
