//! RFC 3977 Section 3.1 - Command line formats
//!
//! Every command is a single line terminated by CRLF.

use ftngate::commands;

#[test]
fn test_group_command_format() {
    assert_eq!(commands::group("fido7.ru.test"), "GROUP fido7.ru.test\r\n");
}

#[test]
fn test_article_and_head_format() {
    assert_eq!(commands::article("3000"), "ARTICLE 3000\r\n");
    assert_eq!(commands::article("<abc@example.com>"), "ARTICLE <abc@example.com>\r\n");
    assert_eq!(commands::head("17"), "HEAD 17\r\n");
}

#[test]
fn test_over_and_xover_format() {
    assert_eq!(commands::over("1-100"), "OVER 1-100\r\n");
    assert_eq!(commands::xover("1-"), "XOVER 1-\r\n");
}

#[test]
fn test_fixed_commands() {
    assert_eq!(commands::post(), "POST\r\n");
    assert_eq!(commands::quit(), "QUIT\r\n");
    assert_eq!(commands::list(), "LIST\r\n");
}

#[test]
fn test_authinfo_format() {
    assert_eq!(commands::authinfo_user("fido"), "AUTHINFO USER fido\r\n");
    assert_eq!(commands::authinfo_pass("s3cret"), "AUTHINFO PASS s3cret\r\n");
}

#[test]
fn test_every_command_ends_with_single_crlf() {
    for command in [
        commands::group("g"),
        commands::article("1"),
        commands::over("1-2"),
        commands::authinfo_user("u"),
    ] {
        assert!(command.ends_with("\r\n"));
        assert_eq!(command.matches("\r\n").count(), 1);
    }
}

#[test]
fn test_password_redacted_for_logging() {
    assert_eq!(
        commands::redact(&commands::authinfo_pass("s3cret")),
        "AUTHINFO PASS ****"
    );
    assert_eq!(commands::redact("authinfo pass x\r\n"), "AUTHINFO PASS ****");
    assert_eq!(
        commands::redact(&commands::authinfo_user("fido")),
        "AUTHINFO USER fido"
    );
}
