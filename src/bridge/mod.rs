//! Identifier, charset and timezone translation between FidoNet and Usenet
//!
//! Everything here is stateless; configuration (hostnames, domains) is
//! passed in by the caller.

mod charset;
mod msgid;
mod time;

pub use self::charset::{Charset, best_charset};
pub use self::msgid::{
    DEFAULT_DOMAIN, anchor, domain_from_email, fido_msgid_for, reply_for, wire_id_for,
    wire_reply_for,
};
pub use self::time::{
    apply_tz_offset, format_fido_date, parse_fido_date, parse_tz_offset, tz_offset_string,
};
