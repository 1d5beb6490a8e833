//! Cost accounting for AI requests.
//!
//! A [`PriceTable`] maps model names to per-million-token prices, and a
//! [`CostTracker`] keeps a bounded ledger of [`CostRecord`]s for successful
//! provider calls. Cost tracking is advisory and never fails a request.

#![warn(missing_docs)]

mod pricing;
mod tracker;

pub use pricing::{DEFAULT_PRICED_MODEL, ModelPrice, PriceTable};
pub use tracker::{CostRecord, CostTracker, LEDGER_CAPACITY};
