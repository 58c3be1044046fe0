//! Gate one newsgroup into FidoNet and post inbound packets to Usenet
//!
//! Run with: cargo run --example gate
//!
//! Environment:
//! - NNTP_HOST, NNTP_PORT, NNTP_USER, NNTP_PASS: news server
//! - FTN_GATEWAY, FTN_UPLINK: addresses, e.g. 2:5020/1042 and 2:5020/52
//! - GATE_EMAIL: address used in From and Sender
//! - AREA_TAG, NNTP_GROUP: the area and newsgroup to gate
//! - INBOUND, OUTBOUND: packet directories (default ./inbound, ./outbound)
//! - AREAS_FILE: ledger path (default ./areas.cfg)

use chrono::Local;
use ftngate::gateway::{AreaConfig, AreaMap, Gateway, TranslationContext, pack};
use ftngate::{GatewayConfig, NntpClient, ServerConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const FETCH_LIMIT: u64 = 100;

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "ftngate=info".into()))
        .init();

    let server = ServerConfig::new(
        env_or("NNTP_HOST", "news.example.com"),
        env_or("NNTP_PORT", "119").parse()?,
        std::env::var("NNTP_TLS").is_ok(),
        env_or("NNTP_USER", ""),
        env_or("NNTP_PASS", ""),
    );
    let gateway_config = GatewayConfig::new(
        env_or("FTN_GATEWAY", "2:5020/1042"),
        env_or("FTN_UPLINK", "2:5020/52"),
        env_or("GATE_EMAIL", "gate@fido.example.org"),
    )
    .with_origin("ftngate demo");
    let ctx = TranslationContext::from_config(&gateway_config)?;

    let area_tag = env_or("AREA_TAG", "RU.TEST");
    let newsgroup = env_or("NNTP_GROUP", "fido7.ru.test");
    let areas_file = PathBuf::from(env_or("AREAS_FILE", "areas.cfg"));
    let inbound = PathBuf::from(env_or("INBOUND", "inbound"));
    let outbound = PathBuf::from(env_or("OUTBOUND", "outbound"));

    let mut areas = AreaMap::new()
        .with_remap(area_tag.as_str(), newsgroup.as_str())
        .load(&areas_file)?;
    if areas.get(&area_tag).is_none() {
        areas.insert(area_tag.as_str(), AreaConfig::new(newsgroup.as_str()));
    }
    let mut gateway = Gateway::new(ctx, areas);

    let mut client = NntpClient::connect(Arc::new(server)).await?;
    client.authenticate().await?;

    // FidoNet -> Usenet
    if let Ok(entries) = std::fs::read_dir(&inbound) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_none_or(|ext| !ext.eq_ignore_ascii_case("pkt")) {
                continue;
            }
            let bytes = std::fs::read(&path)?;
            match gateway.gate_packet(&bytes) {
                Ok(report) => {
                    for article in &report.outputs {
                        if let Err(e) = client.post_article(article).await {
                            eprintln!("post failed: {e}");
                        }
                    }
                }
                Err(e) => eprintln!("{}: {e}", path.display()),
            }
        }
    }

    // Usenet -> FidoNet
    let info = client.select_group(&newsgroup).await?;
    let range = gateway
        .areas()
        .get(&area_tag)
        .and_then(|area| area.next_batch(&info, FETCH_LIMIT));
    let mut articles = Vec::new();
    if let Some((first, last)) = range {
        for number in first..=last {
            match client.fetch_article(&number.to_string()).await {
                Ok(article) => articles.push(article),
                Err(e) if e.is_retryable() => eprintln!("article {number}: {e}"),
                Err(e) => return Err(e.into()),
            }
        }
    }
    client.quit().await?;

    let report = gateway.gate_articles(&area_tag, &articles);
    if !report.outputs.is_empty() {
        std::fs::create_dir_all(&outbound)?;
        let files = pack(&report.outputs, gateway.context(), Local::now(), |name| {
            outbound.join(name).exists()
        })?;
        for file in &files {
            let path = file.write_to_dir(&outbound)?;
            println!("wrote {} ({} messages)", path.display(), file.message_count);
        }
    }

    gateway.areas().save(&areas_file)?;
    Ok(())
}
