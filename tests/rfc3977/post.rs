//! RFC 3977 Section 6.3.1 - POST Command
//!
//! The article is sent after a 340 reply, with every line starting with
//! "." doubled, and ends with a lone "." line.

use super::mock::{cmd, connect, data};
use ftngate::{NntpError, WireArticleBuilder};

#[tokio::test]
async fn test_post_dot_stuffs_and_terminates() {
    let (mut client, server) = connect(vec![
        cmd("340 send article\r\n"),
        data("240 article posted\r\n"),
    ])
    .await;

    client
        .post(b"Subject: dots\r\n\r\nfirst\n.\n.hidden\nlast\n")
        .await
        .unwrap();

    drop(client);
    let received = server.await.unwrap();
    assert_eq!(received[0], "POST\r\n");
    assert_eq!(
        received[1],
        "Subject: dots\r\n\r\nfirst\r\n..\r\n..hidden\r\nlast\r\n.\r\n"
    );
}

#[tokio::test]
async fn test_post_article() {
    let article = WireArticleBuilder::new()
        .from("Ivan Petrov <gate@fido.example.org>")
        .newsgroups(["fido7.ru.test"])
        .subject("Hello")
        .message_id("<1a2b3c4d.2.5020.52@fido.example.org>")
        .body(".\n")
        .build()
        .unwrap();

    let (mut client, server) = connect(vec![
        cmd("340 send article\r\n"),
        data("240 article posted\r\n"),
    ])
    .await;
    client.post_article(&article).await.unwrap();

    drop(client);
    let received = server.await.unwrap();
    assert!(received[1].contains("Newsgroups: fido7.ru.test\r\n"));
    assert!(received[1].ends_with("\r\n..\r\n.\r\n"));
}

#[tokio::test]
async fn test_posting_not_permitted() {
    let (mut client, server) = connect(vec![cmd("440 posting not permitted\r\n")]).await;
    let result = client.post(b"Subject: x\r\n\r\nbody\r\n").await;
    assert!(matches!(result, Err(NntpError::Temporary { code: 440, .. })));
    drop(client);
    assert_eq!(server.await.unwrap(), ["POST\r\n"]);
}

#[tokio::test]
async fn test_posting_failed_after_transfer() {
    let (mut client, server) = connect(vec![
        cmd("340 send article\r\n"),
        data("441 duplicate message-id\r\n"),
    ])
    .await;
    let error = client.post(b"Subject: x\r\n\r\nbody\r\n").await.unwrap_err();
    assert_eq!(error.code(), Some(441));
    assert!(error.is_retryable());
    drop(client);
    server.await.unwrap();
}
