//! RFC 3977 Section 3.2.1 - Reply code classes
//!
//! 4xx replies are temporary, 5xx replies are permanent.

use ftngate::NntpError;

#[test]
fn test_4xx_is_temporary_and_retryable() {
    let error = NntpError::from_reply(411, "no such group");
    assert!(matches!(error, NntpError::Temporary { code: 411, .. }));
    assert!(error.is_retryable());
    assert_eq!(error.code(), Some(411));
}

#[test]
fn test_5xx_is_permanent() {
    let error = NntpError::from_reply(502, "access denied");
    assert!(matches!(error, NntpError::Permanent { code: 502, .. }));
    assert!(!error.is_retryable());
}

#[test]
fn test_other_codes_are_protocol_errors() {
    let error = NntpError::from_reply(223, "unexpected");
    assert!(matches!(error, NntpError::Protocol { code: 223, .. }));
    assert!(!error.is_retryable());
}

#[test]
fn test_timeout_and_auth_failure() {
    assert!(NntpError::Timeout.is_retryable());
    assert!(!NntpError::AuthFailed("481 rejected".into()).is_retryable());
    assert_eq!(NntpError::Timeout.code(), None);
}

#[test]
fn test_error_display() {
    let error = NntpError::from_reply(441, "posting failed");
    assert_eq!(error.to_string(), "NNTP temporary error 441: posting failed");
}
