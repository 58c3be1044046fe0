//! Scripted in-memory NNTP server

use ftngate::{NntpClient, ServerConfig};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream};
use tokio::task::JoinHandle;

/// One exchange: what the server reads, then the reply it writes
pub struct Exchange {
    /// Read a dot-terminated data block instead of a single command line
    data: bool,
    reply: &'static str,
}

/// Read one command line, then answer
pub fn cmd(reply: &'static str) -> Exchange {
    Exchange { data: false, reply }
}

/// Read a data block up to the "." line, then answer
pub fn data(reply: &'static str) -> Exchange {
    Exchange { data: true, reply }
}

async fn serve(stream: DuplexStream, greeting: &'static str, script: Vec<Exchange>) -> Vec<String> {
    let (read, mut write) = tokio::io::split(stream);
    let mut reader = BufReader::new(read);
    write.write_all(greeting.as_bytes()).await.unwrap();

    let mut received = Vec::new();
    for step in script {
        let mut got = String::new();
        if step.data {
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).await.unwrap() == 0 {
                    break;
                }
                let end = line == ".\r\n";
                got.push_str(&line);
                if end {
                    break;
                }
            }
        } else if reader.read_line(&mut got).await.unwrap() == 0 {
            break;
        }
        received.push(got);
        write.write_all(step.reply.as_bytes()).await.unwrap();
    }
    received
}

pub fn config() -> Arc<ServerConfig> {
    Arc::new(ServerConfig::plain("mock.example", "user", "secret"))
}

/// Start a server with the given greeting and script, and connect to it
///
/// The join handle yields everything the server read, one entry per
/// exchange.
pub async fn start(
    greeting: &'static str,
    script: Vec<Exchange>,
) -> (ftngate::Result<NntpClient>, JoinHandle<Vec<String>>) {
    let (client_end, server_end) = tokio::io::duplex(64 * 1024);
    let server = tokio::spawn(serve(server_end, greeting, script));
    let client = NntpClient::from_stream(client_end, config()).await;
    (client, server)
}

/// Connected client behind a "200" greeting
pub async fn connect(script: Vec<Exchange>) -> (NntpClient, JoinHandle<Vec<String>>) {
    let (client, server) = start("200 mock server ready\r\n", script).await;
    (client.unwrap(), server)
}
