//! ARTICLE and HEAD commands

/// Build ARTICLE command
///
/// `spec` is an article number or a message-id.
pub fn article(spec: &str) -> String {
    format!("ARTICLE {}\r\n", spec)
}

/// Build HEAD command
pub fn head(spec: &str) -> String {
    format!("HEAD {}\r\n", spec)
}

/// Article number from a 220/221 status message ("n message-id")
///
/// Servers answer 0 when the article was requested by message-id.
pub fn article_number(message: &str) -> Option<u64> {
    message
        .split_whitespace()
        .next()?
        .parse()
        .ok()
        .filter(|&n| n != 0)
}
