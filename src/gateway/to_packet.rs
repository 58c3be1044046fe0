//! Usenet article to FidoNet message

use chrono::{DateTime, FixedOffset, Local};

use super::areas::AreaConfig;
use super::context::TranslationContext;
use crate::article::NntpArticle;
use crate::bridge::{best_charset, fido_msgid_for, reply_for, tz_offset_string};
use crate::error::GatewayError;
use crate::packet::{FidoMessage, MessageBuilder};

/// Convert a fetched article into a message from the gateway to its uplink
///
/// With a non-empty `area_tag` the result is echomail carrying the
/// tear line, origin, `SEEN-BY: <gateway> <uplink>` and `PATH: <gateway>`
/// trailer. An empty tag produces netmail, which carries an INTL kludge
/// and no trailer.
///
/// The charset is the narrowest one that represents subject and body.
/// MSGID anchors the article's Message-ID; REPLY anchors the last entry of
/// References. The date keeps the article's wall-clock time, and its
/// offset goes into TZUTC.
///
/// # Errors
///
/// [`GatewayError::MissingHeader`] when the article has no From header.
pub fn to_outbound_packet(
    article: &NntpArticle,
    area_tag: &str,
    area: &AreaConfig,
    ctx: &TranslationContext,
) -> Result<FidoMessage, GatewayError> {
    if article.header("From").is_none_or(|from| from.trim().is_empty()) {
        return Err(GatewayError::MissingHeader("From"));
    }

    let date: DateTime<FixedOffset> = article
        .date()
        .unwrap_or_else(|| Local::now().fixed_offset());
    let subject = article.subject();
    let (charset, _) = best_charset(&format!("{} {}", subject, article.body));

    let mut builder = MessageBuilder::new(ctx.gateway, ctx.linked)
        .to(area.default_to.as_str())
        .from(article.from_name())
        .subject(subject)
        .date(date.naive_local())
        .charset(charset)
        .msgid(fido_msgid_for(article.message_id(), &ctx.hostname))
        .pid(ctx.pid())
        .tid(ctx.tid())
        .tzutc(tz_offset_string(&date))
        .body(article.body.as_str());

    if let Some(reply) = article.references().and_then(reply_for) {
        builder = builder.reply(reply);
    }
    if let Some(email) = article.from_email() {
        builder = builder.kludge("REPLYADDR", email);
    }
    builder = builder.kludge("REPLYTO", format!("{} UUCP", ctx.gateway));

    if !area_tag.is_empty() {
        builder = builder
            .area(area_tag)
            .tear_line(ctx.tear_line())
            .origin(ctx.origin_text())
            .seen_by([
                ctx.gateway.format_for_seenby(),
                ctx.linked.format_for_seenby(),
            ])
            .path([ctx.gateway.format_for_seenby()]);
    }

    Ok(builder.build())
}
