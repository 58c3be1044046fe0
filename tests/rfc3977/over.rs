//! RFC 3977 Section 8.3 - OVER Command
//!
//! Overview lines are tab separated: number, subject, from, date,
//! message-id, references, bytes, lines, then optional extra fields.

use ftngate::commands;

#[test]
fn test_parse_overview_line() {
    let entry = commands::parse_overview_line(
        "3000\tRe: test\tJoe <joe@example.com>\tFri, 1 Mar 2024 12:00:00 +0000\t<b@x>\t<a@x>\t1234\t20",
    )
    .unwrap();
    assert_eq!(entry.article_number, 3000);
    assert_eq!(entry.subject, "Re: test");
    assert_eq!(entry.author, "Joe <joe@example.com>");
    assert_eq!(entry.message_id, "<b@x>");
    assert_eq!(entry.references, "<a@x>");
    assert_eq!(entry.bytes, 1234);
    assert_eq!(entry.lines, 20);
}

#[test]
fn test_extra_fields_ignored() {
    let entry =
        commands::parse_overview_line("1\ts\ta\td\t<m@x>\t\t10\t1\tXref: host g:1").unwrap();
    assert_eq!(entry.article_number, 1);
    assert_eq!(entry.references, "");
}

#[test]
fn test_bad_sizes_default_to_zero() {
    let entry = commands::parse_overview_line("7\ts\ta\td\t<m@x>\t\t\t").unwrap();
    assert_eq!(entry.bytes, 0);
    assert_eq!(entry.lines, 0);
}

#[test]
fn test_short_or_unnumbered_lines_rejected() {
    assert!(commands::parse_overview_line("1\tsubject\tauthor").is_err());
    assert!(commands::parse_overview_line("x\ts\ta\td\t<m@x>\t\t10\t1").is_err());
}
