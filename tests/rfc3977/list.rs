//! RFC 3977 Section 7.6.3 - LIST ACTIVE

use ftngate::{NntpError, NntpResponse, commands};

#[test]
fn test_parse_active_lines() {
    let response = NntpResponse {
        code: 215,
        message: "list of newsgroups follows".into(),
        lines: vec![
            "fido7.ru.test 0000003000 0000000001 y".into(),
            "fido7.ru.moderated 12 3 m".into(),
            "broken line".into(),
        ],
    };
    let groups = commands::parse_list_response(response).unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].name, "fido7.ru.test");
    assert_eq!(groups[0].high, 3000);
    assert_eq!(groups[0].low, 1);
    assert_eq!(groups[0].status, "y");
    assert_eq!(groups[1].status, "m");
}

#[test]
fn test_list_refused() {
    let response = NntpResponse {
        code: 502,
        message: "permission denied".into(),
        lines: vec![],
    };
    assert!(matches!(
        commands::parse_list_response(response),
        Err(NntpError::Permanent { code: 502, .. })
    ));
}
