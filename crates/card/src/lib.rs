//! Stock card ledger engine.
//!
//! Given the movements of one stock-keeping unit in any order, a
//! [`StockCard`] puts them in chronological order, derives the running
//! stock on hand after each movement and answers point-in-time queries.
//! Pure domain logic: no IO, no persistence, no reference-data lookups.

pub mod card;
pub mod line_item;
pub mod ordering;
pub mod reason;

pub use card::{StockCard, StockCardKey};
pub use line_item::{LineItemDraft, SharedLineItem, StockCardLineItem};
pub use reason::{Direction, ReasonCategory, ReasonType, StockCardLineItemReason};
