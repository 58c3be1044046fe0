//! Translation between FidoNet messages and Usenet articles
//!
//! Every conversion takes an immutable [`TranslationContext`] built once
//! from a [`GatewayConfig`](crate::config::GatewayConfig).
//!
//! This module is organized into:
//! - `context`: [`TranslationContext`]
//! - `areas`: the area/newsgroup ledger, [`AreaMap`]
//! - `to_wire`: [`to_outbound_wire`], FidoNet to Usenet
//! - `to_packet`: [`to_outbound_packet`], Usenet to FidoNet
//! - `pack`: [`pack`], grouping outbound messages into packet files
//! - `collab`: [`SpamFilter`] and [`HoldQueue`] interfaces
//! - `batch`: [`Gateway`], batch conversion with per-area statistics

mod areas;
mod batch;
mod collab;
mod context;
mod pack;
mod to_packet;
mod to_wire;

pub use self::areas::{AreaConfig, AreaMap, DEFAULT_RECIPIENT};
pub use self::batch::{ApprovedReport, AreaStats, GateReport, Gateway, NETMAIL_AREA};
pub use self::collab::{Candidate, Direction, HeldRecord, HoldQueue, Released, SpamFilter};
pub use self::context::TranslationContext;
pub use self::pack::{PacketFile, pack};
pub use self::to_packet::to_outbound_packet;
pub use self::to_wire::to_outbound_wire;
