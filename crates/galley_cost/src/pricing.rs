//! Per-model token prices.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Model whose price row is used for unknown models.
pub const DEFAULT_PRICED_MODEL: &str = "gpt-4o-mini";

const DEFAULT_PRICE: ModelPrice = ModelPrice::new(0.15, 0.60);

/// Price of one model in USD per million tokens.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelPrice {
    /// USD per 1M prompt tokens
    pub input_per_million: f64,
    /// USD per 1M completion tokens
    pub output_per_million: f64,
}

impl ModelPrice {
    /// Create a price row.
    pub const fn new(input_per_million: f64, output_per_million: f64) -> Self {
        Self {
            input_per_million,
            output_per_million,
        }
    }

    /// Cost of a call with the given token counts.
    pub fn cost(&self, prompt_tokens: u32, completion_tokens: u32) -> f64 {
        (prompt_tokens as f64 / 1_000_000.0) * self.input_per_million
            + (completion_tokens as f64 / 1_000_000.0) * self.output_per_million
    }
}

/// Lookup table from model name to [`ModelPrice`].
///
/// Lookups try an exact match first, then the longest known name that
/// prefixes the requested model (so dated snapshots such as
/// `gpt-4o-mini-2024-07-18` price like their family), then the default row.
///
/// # Example
///
/// ```
/// use galley_cost::PriceTable;
///
/// let prices = PriceTable::default();
/// assert_eq!(prices.calculate_cost("gpt-4o-mini", 1_000_000, 0), 0.15);
/// assert_eq!(
///     prices.calculate_cost("some-unknown-model", 1_000_000, 0),
///     prices.calculate_cost("gpt-4o-mini", 1_000_000, 0),
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTable {
    prices: HashMap<String, ModelPrice>,
    default_price: ModelPrice,
}

impl Default for PriceTable {
    fn default() -> Self {
        let prices = [
            (DEFAULT_PRICED_MODEL, DEFAULT_PRICE),
            ("gpt-4o", ModelPrice::new(2.50, 10.0)),
            ("gpt-4-turbo", ModelPrice::new(10.0, 30.0)),
            ("gpt-3.5-turbo", ModelPrice::new(0.50, 1.50)),
            ("llama-3.1-8b-instant", ModelPrice::new(0.05, 0.08)),
            ("llama-3.3-70b-versatile", ModelPrice::new(0.59, 0.79)),
        ]
        .into_iter()
        .map(|(model, price)| (model.to_string(), price))
        .collect::<HashMap<_, _>>();

        Self {
            prices,
            default_price: DEFAULT_PRICE,
        }
    }
}

impl PriceTable {
    /// Table with only a default row.
    pub fn empty(default_price: ModelPrice) -> Self {
        Self {
            prices: HashMap::new(),
            default_price,
        }
    }

    /// Add or replace the price row for `model`.
    ///
    /// Overriding [`DEFAULT_PRICED_MODEL`] also moves the default row.
    pub fn insert(&mut self, model: impl Into<String>, price: ModelPrice) {
        let model = model.into();
        if model == DEFAULT_PRICED_MODEL {
            self.default_price = price;
        }
        self.prices.insert(model, price);
    }

    /// Apply every override from `overrides`.
    pub fn with_overrides<I, S>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (S, ModelPrice)>,
        S: Into<String>,
    {
        for (model, price) in overrides {
            self.insert(model, price);
        }
        self
    }

    /// Price row used for `model`.
    pub fn price_for(&self, model: &str) -> ModelPrice {
        if let Some(price) = self.prices.get(model) {
            return *price;
        }

        self.prices
            .iter()
            .filter(|(known, _)| model.starts_with(known.as_str()))
            .max_by_key(|(known, _)| known.len())
            .map(|(_, price)| *price)
            .unwrap_or(self.default_price)
    }

    /// True when `model` has its own row (exact or prefix).
    pub fn is_known(&self, model: &str) -> bool {
        self.prices.keys().any(|known| model.starts_with(known.as_str()))
    }

    /// Deterministic USD cost of a call.
    pub fn calculate_cost(&self, model: &str, prompt_tokens: u32, completion_tokens: u32) -> f64 {
        self.price_for(model).cost(prompt_tokens, completion_tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longest_prefix_wins() {
        let prices = PriceTable::default();
        assert_eq!(
            prices.price_for("gpt-4o-mini-2024-07-18"),
            ModelPrice::new(0.15, 0.60)
        );
        assert_eq!(
            prices.price_for("gpt-4o-2024-08-06"),
            ModelPrice::new(2.50, 10.0)
        );
    }

    #[test]
    fn overriding_default_model_moves_default_row() {
        let mut prices = PriceTable::default();
        prices.insert(DEFAULT_PRICED_MODEL, ModelPrice::new(1.0, 2.0));
        assert_eq!(prices.price_for("mystery"), ModelPrice::new(1.0, 2.0));
        assert!(!prices.is_known("mystery"));
    }
}
