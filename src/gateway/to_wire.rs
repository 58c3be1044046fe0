//! FidoNet message to Usenet article

use chrono::{DateTime, FixedOffset, Local, TimeZone, Utc};
use uuid::Uuid;

use super::areas::AreaConfig;
use super::context::TranslationContext;
use crate::article::{WireArticle, WireArticleBuilder};
use crate::bridge::{apply_tz_offset, parse_fido_date, wire_id_for, wire_reply_for};
use crate::encoded_words::encode_header_value;
use crate::error::GatewayError;
use crate::packet::FidoMessage;

/// Characters that force a display name into a quoted string
const SPECIALS: &[char] = &['(', ')', '<', '>', '@', ',', ';', ':', '\\', '"', '.', '[', ']'];

/// Convert a parsed FidoNet message into an article for `area.newsgroup`
///
/// The text was already decoded from its CHRS charset by the packet
/// reader; non-ASCII output is declared as UTF-8. The message's origin
/// line is appended to the body. Dot-stuffing is left to
/// [`NntpClient::post`](crate::NntpClient::post).
///
/// # Errors
///
/// [`GatewayError::MissingHeader`] when the area has no newsgroup.
pub fn to_outbound_wire(
    fido: &FidoMessage,
    area: &AreaConfig,
    ctx: &TranslationContext,
) -> Result<WireArticle, GatewayError> {
    if area.newsgroup.trim().is_empty() {
        return Err(GatewayError::MissingHeader("Newsgroups"));
    }

    let author = if fido.from.trim().is_empty() {
        "Unknown"
    } else {
        fido.from.trim()
    };
    let subject = fido.subject.as_str();

    let mut body = fido.body_text();
    if let Some(origin) = &fido.origin {
        body.push_str("\n\n * Origin: ");
        body.push_str(origin);
    }
    body.push('\n');

    let message_id = match fido.kludges.msgid.as_deref().map(str::trim) {
        Some(msgid) if !msgid.is_empty() => wire_id_for(msgid, &ctx.domain),
        _ => format!("<{}@{}>", Uuid::new_v4(), ctx.domain),
    };

    let mut builder = WireArticleBuilder::new()
        .from(format!("{} <{}>", display_name(author), ctx.gate_email))
        .newsgroups([area.newsgroup.as_str()])
        .subject(encode_header_value(subject))
        .date(message_date(fido).to_rfc2822())
        .message_id(message_id)
        .header("Organization", encode_header_value(&ctx.origin_line))
        .header("Sender", ctx.gate_email.as_str());

    if let Some(references) = fido
        .kludges
        .reply
        .as_deref()
        .and_then(|reply| wire_reply_for(reply, &ctx.domain))
    {
        builder = builder.header("References", references);
    }

    builder = builder.header("X-Gateway", format!("{} FidoNet-NNTP Gateway", ctx.software));
    if fido.is_echomail() {
        builder = builder.header("X-FidoNet-Area", fido.area.as_str());
    }
    if let Some(msgid) = fido.kludges.msgid.as_deref().filter(|m| !m.trim().is_empty()) {
        builder = builder.header("X-FTN-MSGID", msgid.trim());
    }
    builder = builder.header("X-FTN-From", encode_header_value(author));
    if let Some(chrs) = &fido.kludges.chrs {
        builder = builder.header("X-FTN-CHRS", chrs.as_str());
    }

    let needs_mime = !(body.is_ascii() && subject.is_ascii() && author.is_ascii());
    if needs_mime {
        builder = builder
            .header("MIME-Version", "1.0")
            .header("Content-Type", "text/plain; charset=utf-8")
            .header("Content-Transfer-Encoding", "8bit");
    }

    Ok(builder.body(body).build()?)
}

/// Message date with its TZUTC offset, local time when there is none
///
/// An unreadable date field yields the current time.
fn message_date(fido: &FidoMessage) -> DateTime<FixedOffset> {
    let Some(naive) = parse_fido_date(&fido.date) else {
        return Utc::now().fixed_offset();
    };
    fido.kludges
        .tzutc
        .as_deref()
        .and_then(|tz| apply_tz_offset(tz, naive))
        .or_else(|| {
            Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.fixed_offset())
        })
        .unwrap_or_else(|| naive.and_utc().fixed_offset())
}

/// Display name for a From header: encoded words when non-ASCII, quoted
/// when it contains specials
fn display_name(name: &str) -> String {
    if !name.is_ascii() {
        return encode_header_value(name);
    }
    if name.contains(SPECIALS) {
        format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        name.to_string()
    }
}
