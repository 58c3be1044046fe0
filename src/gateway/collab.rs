//! Interfaces to collaborators supplied by the orchestrating program
//!
//! The gateway asks a [`SpamFilter`] and a [`HoldQueue`] about every
//! message before translating it, and takes approved messages back out of
//! the hold queue later. Implementations live outside this crate.

use crate::article::NntpArticle;
use crate::packet::FidoMessage;

/// A message on its way through the gateway, in its source form
#[derive(Debug, Clone, Copy)]
pub enum Candidate<'a> {
    /// Read from an inbound packet, headed for Usenet
    Fido(&'a FidoMessage),
    /// Fetched from a newsgroup, headed for FidoNet
    Article(&'a NntpArticle),
}

impl Candidate<'_> {
    /// Direction the message is travelling
    pub fn direction(&self) -> Direction {
        match self {
            Candidate::Fido(_) => Direction::ToNntp,
            Candidate::Article(_) => Direction::ToFido,
        }
    }

    pub fn subject(&self) -> String {
        match self {
            Candidate::Fido(message) => message.subject.clone(),
            Candidate::Article(article) => article.subject(),
        }
    }

    /// Author display name
    pub fn author(&self) -> String {
        match self {
            Candidate::Fido(message) => message.from.clone(),
            Candidate::Article(article) => article.from_name(),
        }
    }

    /// Body text with `\n` line endings
    pub fn body(&self) -> String {
        match self {
            Candidate::Fido(message) => message.body_text(),
            Candidate::Article(article) => article.body.clone(),
        }
    }
}

/// Which way a message crosses the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    ToNntp,
    ToFido,
}

/// Decides whether a message is spam and must be dropped
pub trait SpamFilter {
    fn is_spam(&self, message: Candidate<'_>) -> bool;
}

/// A held message as it comes back out of a [`HoldQueue`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Released {
    Fido(FidoMessage),
    Article(NntpArticle),
}

impl Released {
    pub fn candidate(&self) -> Candidate<'_> {
        match self {
            Released::Fido(message) => Candidate::Fido(message),
            Released::Article(article) => Candidate::Article(article),
        }
    }
}

/// Queue entry a reviewer has approved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeldRecord {
    /// Identifier returned by [`HoldQueue::hold`]
    pub id: String,
    /// Area tag the message was held in
    pub area: String,
    pub direction: Direction,
}

/// Review queue for messages that need a human decision before gating
///
/// Approved messages are collected with [`approved`](HoldQueue::approved)
/// and handed back by [`release`](HoldQueue::release), after which the
/// queue no longer returns them.
pub trait HoldQueue {
    /// Whether the message should wait for review instead of being gated
    fn should_hold(&self, message: Candidate<'_>, area: &str) -> bool;

    /// Store the message for review, returning its hold identifier
    fn hold(&mut self, message: Candidate<'_>, area: &str, direction: Direction) -> Option<String>;

    /// Approved entries not yet released
    fn approved(&self) -> Vec<HeldRecord>;

    /// Take an approved message out of the queue
    fn release(&mut self, id: &str) -> Option<Released>;
}
