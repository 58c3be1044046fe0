//! Batch gating in both directions

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use super::areas::AreaMap;
use super::collab::{Candidate, Direction, HeldRecord, HoldQueue, Released, SpamFilter};
use super::context::TranslationContext;
use super::to_packet::to_outbound_packet;
use super::to_wire::to_outbound_wire;
use crate::article::{NntpArticle, WireArticle};
use crate::error::PacketError;
use crate::packet::{self, FidoMessage};

/// Area key used for netmail in reports and the area map
pub const NETMAIL_AREA: &str = "NETMAIL";

/// Per-area counters for one batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AreaStats {
    /// Converted and returned for delivery
    pub gated: usize,
    /// Dropped as spam or held for review
    pub filtered: usize,
    /// Of `filtered`, the messages handed to the hold queue
    pub held: usize,
    /// Translation errors
    pub failed: usize,
}

impl AreaStats {
    fn is_empty(&self) -> bool {
        self.gated == 0 && self.filtered == 0 && self.failed == 0
    }
}

/// Converted messages plus per-area statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateReport<T> {
    /// Messages ready for delivery, in input order
    pub outputs: Vec<T>,
    /// Counters keyed by area tag
    pub stats: BTreeMap<String, AreaStats>,
}

impl<T> Default for GateReport<T> {
    fn default() -> Self {
        Self {
            outputs: Vec::new(),
            stats: BTreeMap::new(),
        }
    }
}

impl<T> GateReport<T> {
    fn area(&mut self, tag: &str) -> &mut AreaStats {
        self.stats.entry(tag.to_string()).or_default()
    }

    fn log_summary(&self) {
        for (area, stats) in &self.stats {
            if !stats.is_empty() {
                info!(
                    "Area {}: {} gated, {} filtered, {} failed",
                    area, stats.gated, stats.filtered, stats.failed
                );
            }
        }
    }
}

/// Approved held messages, translated for each direction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApprovedReport {
    /// Released FidoNet messages as articles to post
    pub to_nntp: GateReport<WireArticle>,
    /// Released articles as outbound FidoNet messages
    pub to_fido: GateReport<FidoMessage>,
}

/// Gateway state for one run: settings, areas and collaborators
///
/// Every message is checked against the spam filter first and the hold
/// queue second; only messages passing both are translated. A message that
/// fails translation is logged and skipped without affecting the others.
pub struct Gateway {
    ctx: TranslationContext,
    areas: AreaMap,
    spam_filter: Option<Box<dyn SpamFilter>>,
    hold_queue: Option<Box<dyn HoldQueue>>,
}

impl Gateway {
    pub fn new(ctx: TranslationContext, areas: AreaMap) -> Self {
        Self {
            ctx,
            areas,
            spam_filter: None,
            hold_queue: None,
        }
    }

    pub fn with_spam_filter(mut self, filter: impl SpamFilter + 'static) -> Self {
        self.spam_filter = Some(Box::new(filter));
        self
    }

    pub fn with_hold_queue(mut self, queue: impl HoldQueue + 'static) -> Self {
        self.hold_queue = Some(Box::new(queue));
        self
    }

    pub fn context(&self) -> &TranslationContext {
        &self.ctx
    }

    pub fn areas(&self) -> &AreaMap {
        &self.areas
    }

    /// Mutable area map, for adding areas or saving the ledger
    pub fn areas_mut(&mut self) -> &mut AreaMap {
        &mut self.areas
    }

    /// Returns true when the message was dropped or held
    fn screen(&mut self, candidate: Candidate<'_>, area: &str, stats: &mut AreaStats) -> bool {
        if self
            .spam_filter
            .as_ref()
            .is_some_and(|filter| filter.is_spam(candidate))
        {
            debug!("Spam dropped in {}: {:?}", area, candidate.subject());
            stats.filtered += 1;
            return true;
        }

        if let Some(queue) = self.hold_queue.as_mut()
            && queue.should_hold(candidate, area)
        {
            match queue.hold(candidate, area, candidate.direction()) {
                Some(id) => info!("Message held for review: {}", id),
                None => warn!("Hold queue refused message in {}", area),
            }
            stats.filtered += 1;
            stats.held += 1;
            return true;
        }

        false
    }

    /// Convert every message of an inbound packet into an article
    ///
    /// Netmail is reported under [`NETMAIL_AREA`]. Areas missing from the
    /// map go to the lowercased area tag as newsgroup.
    ///
    /// # Errors
    ///
    /// Only a packet that cannot be parsed fails the batch.
    pub fn gate_packet(&mut self, bytes: &[u8]) -> Result<GateReport<WireArticle>, PacketError> {
        let (header, messages) = packet::parse(bytes)?;
        debug!(
            "Gating packet {} -> {}: {} message(s)",
            header.origin(),
            header.destination(),
            messages.len()
        );

        let mut report = GateReport::default();
        for message in &messages {
            let area = if message.is_echomail() {
                message.area.as_str()
            } else {
                NETMAIL_AREA
            };

            let mut stats = *report.area(area);
            let screened = self.screen(Candidate::Fido(message), area, &mut stats);
            if !screened {
                let config = self.areas.config_for_area(area);
                match to_outbound_wire(message, &config, &self.ctx) {
                    Ok(article) => {
                        report.outputs.push(article);
                        stats.gated += 1;
                    }
                    Err(e) => {
                        warn!("Skipping message in {} from {:?}: {}", area, message.from, e);
                        stats.failed += 1;
                    }
                }
            }
            *report.area(area) = stats;
        }

        report.log_summary();
        Ok(report)
    }

    /// Convert articles fetched for `area_tag` into outbound messages
    ///
    /// The area's high-water mark is raised to the highest article number
    /// seen, whether the article was gated, filtered or failed.
    pub fn gate_articles(
        &mut self,
        area_tag: &str,
        articles: &[NntpArticle],
    ) -> GateReport<FidoMessage> {
        let config = self.areas.config_for_area(area_tag);
        let mut report = GateReport::default();
        let mut stats = AreaStats::default();
        let mut highest = None;

        for article in articles {
            highest = highest.max(article.number);
            if self.screen(Candidate::Article(article), area_tag, &mut stats) {
                continue;
            }
            match to_outbound_packet(article, area_tag, &config, &self.ctx) {
                Ok(message) => {
                    report.outputs.push(message);
                    stats.gated += 1;
                }
                Err(e) => {
                    warn!(
                        "Skipping article {:?} in {}: {}",
                        article.message_id(),
                        area_tag,
                        e
                    );
                    stats.failed += 1;
                }
            }
        }

        if let Some(high) = highest {
            self.areas.update_high(area_tag, high);
        }
        report.stats.insert(area_tag.to_string(), stats);
        report.log_summary();
        report
    }

    /// Release every approved message from the hold queue and translate it
    ///
    /// Messages bypass the spam filter and the hold check. An entry that
    /// cannot be released, whose content does not match its recorded
    /// direction, or that fails translation is counted as failed. The area
    /// ledger is not touched.
    pub fn gate_approved(&mut self) -> ApprovedReport {
        let mut report = ApprovedReport::default();
        let Some(queue) = self.hold_queue.as_mut() else {
            return report;
        };

        let approved = queue.approved();
        debug!("{} approved message(s) to release", approved.len());

        for HeldRecord {
            id,
            area,
            direction,
        } in approved
        {
            let released = queue.release(&id);
            let config = self.areas.config_for_area(&area);
            match (direction, released) {
                (Direction::ToNntp, Some(Released::Fido(message))) => {
                    match to_outbound_wire(&message, &config, &self.ctx) {
                        Ok(article) => {
                            info!("Released held message {} to {}", id, config.newsgroup);
                            report.to_nntp.outputs.push(article);
                            report.to_nntp.area(&area).gated += 1;
                        }
                        Err(e) => {
                            warn!("Skipping released message {}: {}", id, e);
                            report.to_nntp.area(&area).failed += 1;
                        }
                    }
                }
                (Direction::ToFido, Some(Released::Article(article))) => {
                    match to_outbound_packet(&article, &area, &config, &self.ctx) {
                        Ok(message) => {
                            info!("Released held article {} to {}", id, area);
                            report.to_fido.outputs.push(message);
                            report.to_fido.area(&area).gated += 1;
                        }
                        Err(e) => {
                            warn!("Skipping released article {}: {}", id, e);
                            report.to_fido.area(&area).failed += 1;
                        }
                    }
                }
                (direction, released) => {
                    warn!(
                        "Held message {} could not be released for {:?}: {}",
                        id,
                        direction,
                        if released.is_some() { "wrong direction" } else { "missing" }
                    );
                    match direction {
                        Direction::ToNntp => report.to_nntp.area(&area).failed += 1,
                        Direction::ToFido => report.to_fido.area(&area).failed += 1,
                    }
                }
            }
        }

        report.to_nntp.log_summary();
        report.to_fido.log_summary();
        report
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("ctx", &self.ctx)
            .field("areas", &self.areas.len())
            .field("spam_filter", &self.spam_filter.is_some())
            .field("hold_queue", &self.hold_queue.is_some())
            .finish()
    }
}
