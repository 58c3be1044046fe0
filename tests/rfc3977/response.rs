//! RFC 3977 Section 3.2 - Response status lines

use ftngate::{NntpError, NntpResponse, codes, commands};

#[test]
fn test_parse_status_line() {
    let (code, message) = commands::parse_response_line("211 42 1 50 test.group").unwrap();
    assert_eq!(code, codes::GROUP_SELECTED);
    assert_eq!(message, "42 1 50 test.group");
}

#[test]
fn test_parse_code_without_message() {
    let (code, message) = commands::parse_response_line("205").unwrap();
    assert_eq!(code, 205);
    assert_eq!(message, "");
}

#[test]
fn test_reject_non_numeric_and_long_codes() {
    assert!(commands::parse_response_line("abc hello").is_err());
    assert!(commands::parse_response_line("20").is_err());
    assert!(commands::parse_response_line("2000 too long").is_err());
    assert!(commands::parse_response_line("").is_err());
}

#[test]
fn test_bom_is_ignored() {
    let (code, _) = commands::parse_response_line("\u{FEFF}200 ready").unwrap();
    assert_eq!(code, 200);
}

#[test]
fn test_response_classes() {
    let ok = NntpResponse {
        code: 240,
        message: "posted".into(),
        lines: vec![],
    };
    assert!(ok.is_success());
    assert!(!ok.is_error());

    let cont = commands::parse_single_response("340 send article").unwrap();
    assert!(cont.is_continuation());

    let err = commands::parse_single_response("441 posting failed").unwrap();
    assert!(err.is_error());
}

#[test]
fn test_expect_code_classifies_mismatch() {
    let response = commands::parse_single_response("440 posting not permitted").unwrap();
    match commands::expect_code(response, codes::SEND_ARTICLE) {
        Err(NntpError::Temporary { code, message }) => {
            assert_eq!(code, 440);
            assert_eq!(message, "posting not permitted");
        }
        other => panic!("unexpected {other:?}"),
    }
}
