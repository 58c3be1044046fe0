//! Grouping outbound messages into packet files

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{debug, warn};

use super::context::TranslationContext;

/// Names tried per packet before giving up
const MAX_NAME_ATTEMPTS: u32 = 0x1_0000;
use crate::address::Address;
use crate::error::GatewayError;
use crate::packet::{self, FidoMessage, PacketHeader, Truncation};

/// One packet ready to be written to the outbound directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketFile {
    /// File name, `{unix_time:08x}.pkt` or a later free number
    pub name: String,
    pub destination: Address,
    /// Complete packet contents
    pub bytes: Vec<u8>,
    pub message_count: usize,
    /// Fields shortened while encoding
    pub truncations: Vec<Truncation>,
}

impl PacketFile {
    /// Write the packet into `dir` under its name
    ///
    /// The contents go to a temporary file first and are renamed into
    /// place, so a reader never sees a partial packet.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> io::Result<PathBuf> {
        let path = dir.as_ref().join(&self.name);
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, &self.bytes)?;
        fs::rename(&tmp, &path)?;
        debug!("Wrote {} ({} bytes)", path.display(), self.bytes.len());
        Ok(path)
    }
}

/// Group pending messages by destination and encode one packet per group
///
/// Groups keep the order in which their destination first appears. The
/// zone of each destination is the uplink's; a destination equal to the
/// uplink's net/node is the uplink itself, point included. Names start at
/// the hex Unix time of `now` and count up past any name for which
/// `is_taken` returns true or that this call already issued.
///
/// # Errors
///
/// [`GatewayError::NoFreePacketName`] when 65536 consecutive names are
/// taken.
///
/// ```
/// use chrono::Local;
/// use ftngate::config::GatewayConfig;
/// use ftngate::gateway::{pack, TranslationContext};
/// use ftngate::packet::MessageBuilder;
///
/// let ctx = TranslationContext::from_config(
///     &GatewayConfig::new("2:5020/1042", "2:5020/52", "gate@fido.example.org"),
/// ).unwrap();
/// let message = MessageBuilder::new(ctx.gateway, ctx.linked)
///     .area("RU.TEST")
///     .subject("Hi")
///     .build();
///
/// let files = pack(&[message], &ctx, Local::now(), |_| false).unwrap();
/// assert_eq!(files.len(), 1);
/// assert!(files[0].name.ends_with(".pkt"));
/// ```
pub fn pack(
    pending: &[FidoMessage],
    ctx: &TranslationContext,
    now: DateTime<Local>,
    is_taken: impl Fn(&str) -> bool,
) -> Result<Vec<PacketFile>, GatewayError> {
    let mut groups: Vec<((u16, u16), Vec<FidoMessage>)> = Vec::new();
    for message in pending {
        let key = (message.dest_net, message.dest_node);
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, messages)) => messages.push(message.clone()),
            None => groups.push((key, vec![message.clone()])),
        }
    }

    let mut issued = HashSet::new();
    let mut serial = now.timestamp() as u32;
    let mut files = Vec::with_capacity(groups.len());

    for ((net, node), messages) in groups {
        let destination = if (net, node) == (ctx.linked.net, ctx.linked.node) {
            ctx.linked
        } else {
            Address::new(ctx.linked.zone, net, node, 0)
        };

        let name = (0..MAX_NAME_ATTEMPTS)
            .map(|_| {
                let candidate = format!("{serial:08x}.pkt");
                serial = serial.wrapping_add(1);
                candidate
            })
            .find(|candidate| !issued.contains(candidate) && !is_taken(candidate))
            .ok_or(GatewayError::NoFreePacketName(MAX_NAME_ATTEMPTS))?;
        issued.insert(name.clone());

        let header = PacketHeader::new(
            ctx.gateway,
            destination,
            &ctx.packet_password,
            now.naive_local(),
        );
        let encoded = packet::write(&messages, &header);
        if !encoded.truncations.is_empty() {
            warn!(
                "Packet {} for {}: {} field(s) truncated",
                name,
                destination,
                encoded.truncations.len()
            );
        }

        files.push(PacketFile {
            name,
            destination,
            bytes: encoded.bytes,
            message_count: messages.len(),
            truncations: encoded.truncations,
        });
    }

    Ok(files)
}
