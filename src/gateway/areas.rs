//! Area to newsgroup ledger
//!
//! One line per gated area in the form `newsgroup: low-high`, where `high`
//! is the last article number already processed. Blank lines and `#`
//! comments are ignored.

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, warn};

use crate::commands::GroupInfo;

/// Recipient name for echomail created from articles
pub const DEFAULT_RECIPIENT: &str = "All";

/// Settings and progress of one gated area
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaConfig {
    pub newsgroup: String,
    /// To field of messages created from this newsgroup
    pub default_to: String,
    pub low: u64,
    /// Last article number processed
    pub high: u64,
}

impl AreaConfig {
    pub fn new(newsgroup: impl Into<String>) -> Self {
        Self {
            newsgroup: newsgroup.into(),
            default_to: DEFAULT_RECIPIENT.to_string(),
            low: 0,
            high: 0,
        }
    }

    /// The next article range to fetch, given the group's current bounds
    ///
    /// Starts after the last processed article (or at the group's first
    /// article if that is later) and covers at most `limit` numbers.
    /// `None` when there is nothing new.
    ///
    /// ```
    /// use ftngate::commands::GroupInfo;
    /// use ftngate::gateway::AreaConfig;
    ///
    /// let mut area = AreaConfig::new("fido.test");
    /// area.high = 40;
    /// let info = GroupInfo { count: 50, first: 1, last: 50, name: "fido.test".into() };
    /// assert_eq!(area.next_batch(&info, 100), Some((41, 50)));
    /// assert_eq!(area.next_batch(&info, 5), Some((41, 45)));
    /// ```
    pub fn next_batch(&self, info: &GroupInfo, limit: u64) -> Option<(u64, u64)> {
        let start = (self.high + 1).max(info.first);
        if start > info.last || limit == 0 {
            return None;
        }
        let end = start.saturating_add(limit - 1).min(info.last);
        Some((start, end))
    }
}

/// The area ledger plus explicit area/newsgroup remaps
///
/// Areas are keyed by their FidoNet tag. Without a remap the tag for a
/// newsgroup is the newsgroup name itself, and the newsgroup for an area
/// is the lowercased tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AreaMap {
    areas: Vec<(String, AreaConfig)>,
    remaps: Vec<(String, String)>,
}

impl AreaMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an explicit area tag to newsgroup mapping
    ///
    /// Remaps must be added before the ledger is parsed for them to affect
    /// the area tags of ledger entries.
    pub fn with_remap(mut self, area: impl Into<String>, newsgroup: impl Into<String>) -> Self {
        self.remaps.push((area.into().to_uppercase(), newsgroup.into()));
        self
    }

    /// Parse ledger text into this map
    ///
    /// Malformed lines are logged and skipped.
    ///
    /// ```
    /// use ftngate::gateway::AreaMap;
    ///
    /// let map = AreaMap::new()
    ///     .with_remap("RU.TEST", "fido7.ru.test")
    ///     .load_ledger("# comment\nfido7.ru.test: 1-17\ncomp.misc: 0-0\nbroken\n");
    ///
    /// assert_eq!(map.len(), 2);
    /// assert_eq!(map.get("RU.TEST").unwrap().high, 17);
    /// assert_eq!(map.area_for_newsgroup("comp.misc"), "comp.misc");
    /// ```
    pub fn load_ledger(mut self, text: &str) -> Self {
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match parse_ledger_line(line) {
                Some((newsgroup, low, high)) => {
                    let tag = self.area_for_newsgroup(newsgroup);
                    let mut area = AreaConfig::new(newsgroup);
                    area.low = low;
                    area.high = high;
                    self.insert(tag, area);
                }
                None => warn!("Invalid area ledger line {}: {:?}", index + 1, line),
            }
        }
        debug!("Loaded {} areas", self.areas.len());
        self
    }

    /// Read a ledger file; a missing file yields an empty ledger
    pub fn load(self, path: impl AsRef<Path>) -> io::Result<Self> {
        match fs::read_to_string(path.as_ref()) {
            Ok(text) => Ok(self.load_ledger(&text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("Area ledger {} not found", path.as_ref().display());
                Ok(self)
            }
            Err(e) => Err(e),
        }
    }

    /// Ledger text for the current state
    pub fn to_ledger(&self) -> String {
        let mut out = String::from("# Format: newsgroup: low-high\n\n");
        for (_, area) in &self.areas {
            out.push_str(&format!("{}: {}-{}\n", area.newsgroup, area.low, area.high));
        }
        out
    }

    /// Write the ledger, replacing the file atomically
    pub fn save(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, self.to_ledger())?;
        fs::rename(&tmp, path)
    }

    /// Add or replace an area
    pub fn insert(&mut self, tag: impl Into<String>, area: AreaConfig) {
        let tag = tag.into();
        match self.areas.iter_mut().find(|(t, _)| t.eq_ignore_ascii_case(&tag)) {
            Some(slot) => slot.1 = area,
            None => self.areas.push((tag, area)),
        }
    }

    pub fn get(&self, tag: &str) -> Option<&AreaConfig> {
        self.areas
            .iter()
            .find(|(t, _)| t.eq_ignore_ascii_case(tag))
            .map(|(_, a)| a)
    }

    pub fn get_mut(&mut self, tag: &str) -> Option<&mut AreaConfig> {
        self.areas
            .iter_mut()
            .find(|(t, _)| t.eq_ignore_ascii_case(tag))
            .map(|(_, a)| a)
    }

    /// Area tag for a newsgroup
    pub fn area_for_newsgroup(&self, newsgroup: &str) -> String {
        self.remaps
            .iter()
            .find(|(_, group)| group == newsgroup)
            .map_or_else(|| newsgroup.to_string(), |(area, _)| area.clone())
    }

    /// Newsgroup for an area tag
    pub fn newsgroup_for_area(&self, area: &str) -> String {
        if let Some(config) = self.get(area) {
            return config.newsgroup.clone();
        }
        self.remaps
            .iter()
            .find(|(tag, _)| tag.eq_ignore_ascii_case(area))
            .map_or_else(|| area.to_lowercase(), |(_, group)| group.clone())
    }

    /// Configuration for an area, or a default one for an unlisted area
    pub fn config_for_area(&self, area: &str) -> AreaConfig {
        self.get(area)
            .cloned()
            .unwrap_or_else(|| AreaConfig::new(self.newsgroup_for_area(area)))
    }

    /// Raise an area's high-water mark; lower values are ignored
    pub fn update_high(&mut self, tag: &str, high: u64) {
        if let Some(area) = self.get_mut(tag) {
            area.high = area.high.max(high);
        }
    }

    /// Areas in ledger order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AreaConfig)> {
        self.areas.iter().map(|(t, a)| (t.as_str(), a))
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }
}

fn parse_ledger_line(line: &str) -> Option<(&str, u64, u64)> {
    let (newsgroup, range) = line.split_once(':')?;
    let (low, high) = range.split_once('-')?;
    let newsgroup = newsgroup.trim();
    if newsgroup.is_empty() {
        return None;
    }
    Some((newsgroup, low.trim().parse().ok()?, high.trim().parse().ok()?))
}
