//! FidoNet addresses: `zone:net/node[.point][@domain]`
//!
//! Also holds the SEEN-BY / PATH list form, where consecutive entries on the
//! same net drop the `net/` prefix (`1/1 2 3 2/5`).

use std::fmt;
use std::str::FromStr;

use crate::error::AddressError;

/// A 4D FidoNet address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Address {
    /// Zone number
    pub zone: u16,
    /// Net number
    pub net: u16,
    /// Node number
    pub node: u16,
    /// Point number, 0 for the node itself
    pub point: u16,
}

impl Address {
    /// Build an address from its four parts
    pub const fn new(zone: u16, net: u16, node: u16, point: u16) -> Self {
        Self {
            zone,
            net,
            node,
            point,
        }
    }

    /// Parse `zone:net/node[.point][@domain]`
    ///
    /// The domain suffix is accepted and ignored. When `zone:` is absent the
    /// address lands in `default_zone`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ftngate::Address;
    ///
    /// let addr = Address::parse("2:5020/1042.7@fidonet", 1).unwrap();
    /// assert_eq!((addr.zone, addr.net, addr.node, addr.point), (2, 5020, 1042, 7));
    ///
    /// let local = Address::parse("5020/1042", 2).unwrap();
    /// assert_eq!(local.zone, 2);
    ///
    /// assert!(Address::parse("fidonet", 1).is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// [`AddressError::Malformed`] for empty input, a missing `/`, or any
    /// component that is not a number in `0..=65535`.
    pub fn parse(text: &str, default_zone: u16) -> Result<Self, AddressError> {
        let malformed = || AddressError::Malformed(text.to_string());

        let trimmed = text.trim();
        let without_domain = match trimmed.split_once('@') {
            Some((addr, _domain)) => addr,
            None => trimmed,
        };
        if without_domain.is_empty() {
            return Err(malformed());
        }

        let (zone, rest) = match without_domain.split_once(':') {
            Some((zone, rest)) => (parse_component(zone).ok_or_else(malformed)?, rest),
            None => (default_zone, without_domain),
        };

        let (net, rest) = rest.split_once('/').ok_or_else(malformed)?;
        let net = parse_component(net).ok_or_else(malformed)?;

        let (node, point) = match rest.split_once('.') {
            Some((node, point)) => (node, parse_component(point).ok_or_else(malformed)?),
            None => (rest, 0),
        };
        let node = parse_component(node).ok_or_else(malformed)?;

        Ok(Self::new(zone, net, node, point))
    }

    /// `net/node`, the form used inside SEEN-BY and PATH lines
    pub fn format_for_seenby(&self) -> String {
        format!("{}/{}", self.net, self.node)
    }

    /// `zone:net/node` without the point
    pub fn node_address(&self) -> String {
        format!("{}:{}/{}", self.zone, self.net, self.node)
    }
}

fn parse_component(text: &str) -> Option<u16> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}/{}", self.zone, self.net, self.node)?;
        if self.point != 0 {
            write!(f, ".{}", self.point)?;
        }
        Ok(())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    /// Parses with zone 1 as the default zone
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::parse(s, 1)
    }
}

/// Compress `net/node` entries into SEEN-BY / PATH form
///
/// An entry on the same net as its predecessor is written as the bare node
/// number. Entries that are not `net/node` are passed through verbatim and
/// reset the running net.
///
/// ```
/// use ftngate::address::format_net_list;
///
/// let list = ["1/1", "1/2", "1/3", "2/5", "2/6"];
/// assert_eq!(format_net_list(&list), "1/1 2 3 2/5 6");
/// ```
pub fn format_net_list<S: AsRef<str>>(entries: &[S]) -> String {
    let mut out = Vec::with_capacity(entries.len());
    let mut last_net: Option<&str> = None;

    for entry in entries {
        let entry = entry.as_ref().trim();
        match entry.split_once('/') {
            Some((net, node)) if last_net == Some(net) => {
                out.push(node.to_string());
            }
            Some((net, _)) => {
                last_net = Some(net);
                out.push(entry.to_string());
            }
            None => {
                last_net = None;
                out.push(entry.to_string());
            }
        }
    }

    out.join(" ")
}

/// Expand SEEN-BY / PATH text into full `net/node` entries
///
/// Bare node numbers inherit the most recent net. A bare node with no
/// preceding net is kept as-is.
///
/// ```
/// use ftngate::address::expand_net_list;
///
/// assert_eq!(expand_net_list("1/1 2 3 2/5"), vec!["1/1", "1/2", "1/3", "2/5"]);
/// ```
pub fn expand_net_list(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut net: Option<&str> = None;

    for token in text.split_whitespace() {
        match token.split_once('/') {
            Some((n, _)) => {
                net = Some(n);
                out.push(token.to_string());
            }
            None => match net {
                Some(n) => out.push(format!("{n}/{token}")),
                None => out.push(token.to_string()),
            },
        }
    }

    out
}
