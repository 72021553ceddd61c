use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Local};

use crate::diagnostics::Diagnostic;

/// Placeholder used for optional sale fields that are absent or null
pub const NOT_AVAILABLE: &str = "N/A";

/// Product title to unit price lookup, built once per run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceCatalogue {
    prices: BTreeMap<String, f64>,
}

impl PriceCatalogue {
    /// Later inserts for the same title overwrite earlier ones
    pub(crate) fn insert(&mut self, title: String, price: f64) {
        self.prices.insert(title, price);
    }

    /// Exact, case-sensitive lookup
    pub fn price_of(&self, title: &str) -> Option<f64> {
        self.prices.get(title).copied()
    }

    pub fn contains(&self, title: &str) -> bool {
        self.prices.contains_key(title)
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.prices.keys().map(String::as_str)
    }
}

/// One validated sale joined with its catalogue price
#[derive(Debug, Clone, PartialEq)]
pub struct SaleLineItem {
    pub sale_id: String,
    pub date: String,
    pub product: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub line_cost: f64,
}

impl SaleLineItem {
    pub fn new(sale_id: String, date: String, product: String, quantity: i64, unit_price: f64) -> Self {
        Self {
            sale_id,
            date,
            product,
            quantity,
            unit_price,
            line_cost: unit_price * quantity as f64,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregationResult {
    pub total_cost: f64,
    pub line_items: Vec<SaleLineItem>,
}

impl AggregationResult {
    /// Folds one accepted line item into the running total
    pub fn accept(mut self, item: SaleLineItem) -> Self {
        self.total_cost += item.line_cost;
        self.line_items.push(item);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }
}

/// A pipeline stage output together with the records it rejected
#[derive(Debug, Clone, PartialEq)]
pub struct Validated<T> {
    pub value: T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Validated<T> {
    pub fn new(value: T, diagnostics: Vec<Diagnostic>) -> Self {
        Self { value, diagnostics }
    }

    pub fn into_parts(self) -> (T, Vec<Diagnostic>) {
        (self.value, self.diagnostics)
    }
}

/// Identifiers of everything a run read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSources {
    pub program: String,
    pub catalogue: String,
    pub sales: String,
}

/// Everything the reporting side needs to render one run
#[derive(Debug, Clone)]
pub struct SalesReport {
    pub generated_at: DateTime<Local>,
    pub sources: RunSources,
    pub catalogue_size: usize,
    pub result: AggregationResult,
    pub elapsed: Duration,
}
