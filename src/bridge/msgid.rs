//! Message identifiers between FidoNet MSGID/REPLY and RFC 5322 Message-ID
//!
//! Outbound FidoNet identifiers carry the source Message-ID followed by a
//! CRC32 anchor (`<id@host> 1a2b3c4d`), so the original identifier can be
//! recovered when the message comes back through the gateway.

use md5::{Digest, Md5};
use tracing::trace;
use uuid::Uuid;

use crate::address::Address;

/// Message-ID domain used when none can be derived from configuration
pub const DEFAULT_DOMAIN: &str = "ftngate.local";

/// Wrap an identifier as `<id> crc32hex`
///
/// Angle brackets around `id` are stripped before hashing, so
/// `<a@b>` and `a@b` anchor identically.
pub fn anchor(id: &str) -> String {
    let stripped = id.trim().trim_start_matches('<').trim_end_matches('>');
    format!("<{stripped}> {:08x}", crc32fast::hash(stripped.as_bytes()))
}

/// FidoNet MSGID for an article
///
/// With a source Message-ID the result is deterministic. Without one a
/// fresh identifier is synthesized from a random token, the current time
/// and `hostname`.
///
/// ```
/// use ftngate::bridge::fido_msgid_for;
///
/// let msgid = fido_msgid_for(Some("<abc@example.com>"), "gate.example.org");
/// assert_eq!(msgid, fido_msgid_for(Some("abc@example.com"), "other.host"));
/// assert!(msgid.starts_with("<abc@example.com> "));
/// assert_eq!(msgid.len(), "<abc@example.com> ".len() + 8);
/// ```
pub fn fido_msgid_for(source_id: Option<&str>, hostname: &str) -> String {
    match source_id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => anchor(id),
        None => {
            let token = Uuid::new_v4().simple().to_string();
            let stamp = chrono::Utc::now().timestamp() as u32;
            let synthesized = format!("{}{stamp:08x}@{hostname}", &token[..16]);
            trace!("Synthesized MSGID serial {}", synthesized);
            anchor(&synthesized)
        }
    }
}

/// FidoNet REPLY for an article's References header
///
/// Only the most recent (last) reference is kept.
///
/// ```
/// use ftngate::bridge::reply_for;
///
/// let reply = reply_for("<a@x> <b@y>").unwrap();
/// assert!(reply.starts_with("<b@y> "));
/// assert_eq!(reply_for("   "), None);
/// ```
pub fn reply_for(references: &str) -> Option<String> {
    references.split_whitespace().last().map(anchor)
}

/// Message-ID for a FidoNet MSGID
///
/// - `<local@host>` passes through unchanged.
/// - An anchored id (`<local@host> crc`) yields its bracketed part.
/// - An FTN id (`zone:net/node[.point][@domain] serial`) becomes
///   `<serial.zone.net.node[.point]@domain>`.
/// - Anything else becomes `<md5hex@domain>`.
///
/// ```
/// use ftngate::bridge::wire_id_for;
///
/// assert_eq!(wire_id_for("<x@y>", "gw.example"), "<x@y>");
/// assert_eq!(wire_id_for("<x@y> 0badf00d", "gw.example"), "<x@y>");
/// assert_eq!(
///     wire_id_for("2:5020/1042.3 6b1d2c7a", "gw.example"),
///     "<6b1d2c7a.2.5020.1042.3@gw.example>"
/// );
/// ```
pub fn wire_id_for(native_id: &str, domain: &str) -> String {
    let native = native_id.trim();
    if is_bracketed_id(native) {
        return native.to_string();
    }

    let tokens: Vec<&str> = native.split_whitespace().collect();
    if let [first, serial] = tokens.as_slice() {
        if is_bracketed_id(first) {
            return (*first).to_string();
        }
        if let Some(addr) = ftn_address_part(first) {
            if serial.bytes().all(|b| b.is_ascii_alphanumeric()) {
                let safe = addr.replace([':', '/'], ".");
                return format!("<{serial}.{safe}@{domain}>");
            }
        }
    }

    let digest = Md5::digest(native.as_bytes());
    format!("<{digest:x}@{domain}>")
}

/// Message-ID for a REPLY kludge, `None` when the kludge is empty
pub fn wire_reply_for(reply: &str, domain: &str) -> Option<String> {
    let reply = reply.trim();
    (!reply.is_empty()).then(|| wire_id_for(reply, domain))
}

/// Domain part of the gateway's mail address
pub fn domain_from_email(email: &str) -> &str {
    email
        .rsplit_once('@')
        .map(|(_, domain)| domain.trim_end_matches('>').trim())
        .filter(|domain| !domain.is_empty())
        .unwrap_or(DEFAULT_DOMAIN)
}

fn is_bracketed_id(text: &str) -> bool {
    text.len() > 2 && text.starts_with('<') && text.ends_with('>') && text.contains('@')
}

/// The `zone:net/node[.point]` part of an FTN MSGID origin, domain removed
fn ftn_address_part(text: &str) -> Option<&str> {
    let addr = text.split_once('@').map_or(text, |(addr, _)| addr);
    Address::parse(addr, 0).ok()?;
    Some(addr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_strips_brackets() {
        assert_eq!(anchor("<a@b>"), anchor("a@b"));
        let anchored = anchor("a@b");
        let (id, crc) = anchored.split_once(' ').unwrap();
        assert_eq!(id, "<a@b>");
        assert_eq!(crc, format!("{:08x}", crc32fast::hash(b"a@b")));
    }

    #[test]
    fn test_fido_msgid_deterministic() {
        let a = fido_msgid_for(Some("<x1@news.example>"), "h");
        let b = fido_msgid_for(Some("<x1@news.example>"), "h");
        assert_eq!(a, b);
    }

    #[test]
    fn test_fido_msgid_synthesized() {
        let msgid = fido_msgid_for(None, "gate.example.org");
        let (id, crc) = msgid.split_once(' ').unwrap();
        assert!(id.starts_with('<') && id.ends_with("@gate.example.org>"));
        // 16 random hex + 8 timestamp hex
        assert_eq!(id.find('@'), Some(25));
        assert_eq!(crc.len(), 8);
        assert_ne!(msgid, fido_msgid_for(None, "gate.example.org"));
    }

    #[test]
    fn test_empty_source_is_synthesized() {
        assert!(fido_msgid_for(Some("  "), "host").contains("@host>"));
    }

    #[test]
    fn test_reply_for_last_reference_only() {
        let reply = reply_for("<a@x>   <b@y>").unwrap();
        assert_eq!(reply, anchor("<b@y>"));
        assert!(!reply.contains("a@x"));
    }

    #[test]
    fn test_wire_id_ftn_with_domain_suffix() {
        assert_eq!(
            wire_id_for("1:2/3@fidonet abcdef01", "gw.test"),
            "<abcdef01.1.2.3@gw.test>"
        );
    }

    #[test]
    fn test_wire_id_md5_fallback() {
        let id = wire_id_for("not an id at all", "gw.test");
        assert!(id.starts_with('<') && id.ends_with("@gw.test>"));
        assert_eq!(id.len(), 1 + 32 + "@gw.test>".len());
        assert_eq!(id, wire_id_for("not an id at all", "gw.test"));
    }

    #[test]
    fn test_wire_id_roundtrips_anchor() {
        let anchored = fido_msgid_for(Some("<orig@news.example>"), "h");
        assert_eq!(wire_id_for(&anchored, "gw.test"), "<orig@news.example>");
    }

    #[test]
    fn test_wire_reply_for() {
        assert_eq!(wire_reply_for("", "d"), None);
        assert_eq!(wire_reply_for("<p@q>", "d").as_deref(), Some("<p@q>"));
    }

    #[test]
    fn test_domain_from_email() {
        assert_eq!(domain_from_email("gate@fido.example.org"), "fido.example.org");
        assert_eq!(domain_from_email("nobody"), DEFAULT_DOMAIN);
        assert_eq!(domain_from_email("x@"), DEFAULT_DOMAIN);
    }
}
