//! Complete client sessions against a scripted server
//!
//! Covers the greeting, AUTHINFO USER/PASS (RFC 4643 §2.3), GROUP,
//! ARTICLE/HEAD with dot-unstuffing, OVER with XOVER fallback, LIST and
//! QUIT.

use super::mock::{cmd, connect, start};
use ftngate::{ConnectionState, NntpError};

#[tokio::test]
async fn test_greeting_sets_posting_flag() {
    let (client, server) = start("201 read only\r\n", vec![]).await;
    let client = client.unwrap();
    assert!(!client.posting_allowed());
    assert_eq!(client.state(), ConnectionState::Connected);
    drop(client);
    server.await.unwrap();

    let (client, server) = connect(vec![]).await;
    assert!(client.posting_allowed());
    drop(client);
    server.await.unwrap();
}

#[tokio::test]
async fn test_greeting_refusal() {
    let (client, server) = start("400 service unavailable\r\n", vec![]).await;
    assert!(matches!(client, Err(NntpError::Temporary { code: 400, .. })));
    server.await.unwrap();

    let (client, server) = start("502 go away\r\n", vec![]).await;
    assert!(matches!(client, Err(NntpError::Permanent { code: 502, .. })));
    server.await.unwrap();
}

#[tokio::test]
async fn test_login_user_then_pass() {
    let (mut client, server) = connect(vec![
        cmd("381 password required\r\n"),
        cmd("281 authentication accepted\r\n"),
    ])
    .await;

    client.login("fido", "s3cret").await.unwrap();
    assert!(client.is_authenticated());
    assert_eq!(client.state(), ConnectionState::Authenticated);

    // Already authenticated: nothing is sent
    client.login("fido", "s3cret").await.unwrap();

    drop(client);
    let received = server.await.unwrap();
    assert_eq!(received, ["AUTHINFO USER fido\r\n", "AUTHINFO PASS s3cret\r\n"]);
}

#[tokio::test]
async fn test_login_accepted_after_user() {
    let (mut client, server) = connect(vec![cmd("281 ok\r\n")]).await;
    client.login("trusted", "").await.unwrap();
    assert!(client.is_authenticated());
    drop(client);
    assert_eq!(server.await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_login_rejected() {
    let (mut client, server) = connect(vec![
        cmd("381 password required\r\n"),
        cmd("481 authentication failed\r\n"),
    ])
    .await;

    match client.login("fido", "wrong").await {
        Err(NntpError::AuthFailed(message)) => assert!(message.starts_with("481")),
        other => panic!("unexpected {other:?}"),
    }
    assert!(!client.is_authenticated());
    drop(client);
    server.await.unwrap();
}

#[tokio::test]
async fn test_authenticate_uses_configured_credentials() {
    let (mut client, server) = connect(vec![
        cmd("381 more\r\n"),
        cmd("281 welcome\r\n"),
    ])
    .await;
    client.authenticate().await.unwrap();
    drop(client);
    let received = server.await.unwrap();
    assert_eq!(received[0], "AUTHINFO USER user\r\n");
    assert_eq!(received[1], "AUTHINFO PASS secret\r\n");
}

#[tokio::test]
async fn test_select_group() {
    let (mut client, server) = connect(vec![cmd("211 42 1 50 test.group\r\n")]).await;

    let info = client.select_group("test.group").await.unwrap();
    assert_eq!((info.count, info.first, info.last), (42, 1, 50));
    assert_eq!(client.current_group(), Some("test.group"));

    drop(client);
    assert_eq!(server.await.unwrap(), ["GROUP test.group\r\n"]);
}

#[tokio::test]
async fn test_select_missing_group() {
    let (mut client, server) = connect(vec![cmd("411 no such group\r\n")]).await;
    let error = client.select_group("nowhere").await.unwrap_err();
    assert!(error.is_retryable());
    assert_eq!(client.current_group(), None);
    drop(client);
    server.await.unwrap();
}

#[tokio::test]
async fn test_fetch_article_unstuffs_body() {
    let (mut client, server) = connect(vec![
        cmd("211 1 3000 3000 fido7.ru.test\r\n"),
        cmd(concat!(
            "220 3000 <abc@example.com> article follows\r\n",
            "From: Joe User <joe@example.com>\r\n",
            "Subject: Dots\r\n",
            "Message-ID: <abc@example.com>\r\n",
            "\r\n",
            "first\r\n",
            "..\r\n",
            "..hidden\r\n",
            ".\r\n",
        )),
    ])
    .await;

    client.select_group("fido7.ru.test").await.unwrap();
    let article = client.fetch_article("3000").await.unwrap();

    assert_eq!(article.number, Some(3000));
    assert_eq!(article.newsgroup, "fido7.ru.test");
    assert_eq!(article.subject(), "Dots");
    assert_eq!(article.message_id(), Some("<abc@example.com>"));
    let lines: Vec<&str> = article.body.lines().collect();
    assert_eq!(lines, ["first", ".", ".hidden"]);

    drop(client);
    let received = server.await.unwrap();
    assert_eq!(received[1], "ARTICLE 3000\r\n");
}

#[tokio::test]
async fn test_fetch_missing_article() {
    let (mut client, server) = connect(vec![cmd("423 no such article\r\n")]).await;
    let result = client.fetch_article("99").await;
    assert!(matches!(result, Err(NntpError::Temporary { code: 423, .. })));
    drop(client);
    server.await.unwrap();
}

#[tokio::test]
async fn test_fetch_headers() {
    let (mut client, server) = connect(vec![cmd(concat!(
        "221 5 <h@x>\r\n",
        "Subject: =?UTF-8?B?0J/RgNC40LLQtdGC?=\r\n",
        "Newsgroups: fido7.ru.test\r\n",
        ".\r\n",
    ))])
    .await;

    let headers = client.fetch_headers("5").await.unwrap();
    assert_eq!(headers.get("newsgroups"), Some("fido7.ru.test"));
    assert!(headers.get("Subject").is_some());

    drop(client);
    assert_eq!(server.await.unwrap(), ["HEAD 5\r\n"]);
}

#[tokio::test]
async fn test_overview() {
    let (mut client, server) = connect(vec![cmd(concat!(
        "224 overview follows\r\n",
        "1\tFirst\ta@x\tdate\t<1@x>\t\t100\t3\r\n",
        "2\tSecond\tb@x\tdate\t<2@x>\t<1@x>\t200\t4\r\n",
        ".\r\n",
    ))])
    .await;

    let entries = client.overview("1-2").await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].references, "<1@x>");

    drop(client);
    assert_eq!(server.await.unwrap(), ["OVER 1-2\r\n"]);
}

#[tokio::test]
async fn test_overview_falls_back_to_xover() {
    let (mut client, server) = connect(vec![
        cmd("500 unknown command\r\n"),
        cmd(concat!(
            "224 overview follows\r\n",
            "9\tOld server\ta@x\tdate\t<9@x>\t\t10\t1\r\n",
            ".\r\n",
        )),
    ])
    .await;

    let entries = client.overview("9").await.unwrap();
    assert_eq!(entries[0].article_number, 9);

    drop(client);
    assert_eq!(server.await.unwrap(), ["OVER 9\r\n", "XOVER 9\r\n"]);
}

#[tokio::test]
async fn test_overview_fails_when_both_refused() {
    let (mut client, server) = connect(vec![
        cmd("500 unknown command\r\n"),
        cmd("502 not allowed\r\n"),
    ])
    .await;
    let result = client.overview("1-").await;
    assert!(matches!(result, Err(NntpError::Permanent { code: 502, .. })));
    drop(client);
    server.await.unwrap();
}

#[tokio::test]
async fn test_list() {
    let (mut client, server) = connect(vec![cmd(concat!(
        "215 list follows\r\n",
        "fido7.ru.test 3000 1 y\r\n",
        "fido7.su.general 10 2 n\r\n",
        ".\r\n",
    ))])
    .await;

    let groups = client.list().await.unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[1].name, "fido7.su.general");

    drop(client);
    server.await.unwrap();
}

#[tokio::test]
async fn test_quit_closes_and_rejects_further_commands() {
    let (mut client, server) = connect(vec![cmd("205 bye\r\n")]).await;

    client.quit().await.unwrap();
    assert_eq!(client.state(), ConnectionState::Closed);
    client.quit().await.unwrap();

    let result = client.select_group("g").await;
    assert!(matches!(result, Err(NntpError::ConnectionClosed)));

    drop(client);
    assert_eq!(server.await.unwrap(), ["QUIT\r\n"]);
}

#[tokio::test]
async fn test_quit_tolerates_dropped_connection() {
    let (mut client, server) = connect(vec![]).await;
    server.await.unwrap();
    client.quit().await.unwrap();
    assert_eq!(client.state(), ConnectionState::Closed);
}
