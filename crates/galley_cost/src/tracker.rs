//! Rolling cost ledger.

use crate::PriceTable;
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use galley_core::Usage;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use uuid::Uuid;

/// Maximum number of records kept; older ones are evicted first.
pub const LEDGER_CAPACITY: usize = 1000;

/// Cost of one successful provider call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct CostRecord {
    request_id: Uuid,
    endpoint: String,
    model: String,
    tokens: Usage,
    cost: f64,
    timestamp: DateTime<Utc>,
}

impl CostRecord {
    /// Price a call with `prices` and stamp it at `timestamp`.
    pub fn new(
        prices: &PriceTable,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        tokens: Usage,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let model = model.into();
        let cost = prices.calculate_cost(&model, tokens.prompt_tokens, tokens.completion_tokens);
        Self {
            request_id: Uuid::new_v4(),
            endpoint: endpoint.into(),
            model,
            tokens,
            cost,
            timestamp,
        }
    }
}

/// Append-only, bounded ledger of [`CostRecord`]s.
///
/// # Example
///
/// ```
/// use galley_core::Usage;
/// use galley_cost::CostTracker;
/// use std::time::Duration;
///
/// let tracker = CostTracker::default();
/// tracker.track_cost("chat", "gpt-4o-mini", Usage::new(1_000_000, 0));
/// assert_eq!(tracker.get_total_cost(Duration::from_secs(60)), 0.15);
/// ```
#[derive(Debug)]
pub struct CostTracker {
    prices: PriceTable,
    capacity: usize,
    records: Mutex<VecDeque<CostRecord>>,
}

impl Default for CostTracker {
    fn default() -> Self {
        Self::new(PriceTable::default())
    }
}

impl CostTracker {
    /// Tracker pricing calls with `prices`.
    pub fn new(prices: PriceTable) -> Self {
        Self::with_capacity(prices, LEDGER_CAPACITY)
    }

    /// Tracker keeping at most `capacity` records.
    pub fn with_capacity(prices: PriceTable, capacity: usize) -> Self {
        Self {
            prices,
            capacity,
            records: Mutex::new(VecDeque::with_capacity(capacity.min(LEDGER_CAPACITY))),
        }
    }

    /// Price table in use.
    pub fn prices(&self) -> &PriceTable {
        &self.prices
    }

    /// Deterministic USD cost of a call.
    pub fn calculate_cost(&self, model: &str, prompt_tokens: u32, completion_tokens: u32) -> f64 {
        self.prices
            .calculate_cost(model, prompt_tokens, completion_tokens)
    }

    /// Build a record for a successful call and append it to the ledger.
    #[tracing::instrument(skip(self, usage), fields(total_tokens = usage.total_tokens))]
    pub fn track_cost(&self, endpoint: &str, model: &str, usage: Usage) -> CostRecord {
        let record = CostRecord::new(&self.prices, endpoint, model, usage, Utc::now());
        tracing::debug!(cost = record.cost, "Tracked request cost");
        self.store_cost_tracking(record.clone());
        record
    }

    /// Append `record`, evicting the oldest entries beyond capacity.
    pub fn store_cost_tracking(&self, record: CostRecord) {
        let mut records = self.lock();
        records.push_back(record);
        while records.len() > self.capacity {
            records.pop_front();
        }
    }

    /// Sum of costs recorded within the last `period`.
    pub fn get_total_cost(&self, period: Duration) -> f64 {
        self.get_total_cost_at(period, Utc::now())
    }

    /// Sum of costs recorded after `now - period`.
    pub fn get_total_cost_at(&self, period: Duration, now: DateTime<Utc>) -> f64 {
        let since = window_start(period, now);
        self.lock()
            .iter()
            .filter(|record| record.timestamp > since)
            .map(|record| record.cost)
            .sum()
    }

    /// Costs within the last `period`, summed per endpoint.
    pub fn cost_by_endpoint(&self, period: Duration) -> BTreeMap<String, f64> {
        self.cost_by_endpoint_at(period, Utc::now())
    }

    /// Costs recorded after `now - period`, summed per endpoint.
    pub fn cost_by_endpoint_at(&self, period: Duration, now: DateTime<Utc>) -> BTreeMap<String, f64> {
        let since = window_start(period, now);
        self.lock()
            .iter()
            .filter(|record| record.timestamp > since)
            .fold(BTreeMap::new(), |mut totals, record| {
                *totals.entry(record.endpoint.clone()).or_insert(0.0) += record.cost;
                totals
            })
    }

    /// Snapshot of the ledger, oldest first.
    pub fn records(&self) -> Vec<CostRecord> {
        self.lock().iter().cloned().collect()
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<CostRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn window_start(period: Duration, now: DateTime<Utc>) -> DateTime<Utc> {
    chrono::Duration::from_std(period)
        .ok()
        .and_then(|period| now.checked_sub_signed(period))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
