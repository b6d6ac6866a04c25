//! Product matcher
//!
//! Decides whether a supplier can plausibly fulfil a free-text product
//! request, either against its coverage categories or against its per-product
//! stock table. Pure: no I/O, no state beyond the rule table it was built with.

use std::collections::BTreeMap;

use crate::entities::StockRecord;
use crate::matching::rules::{CategoryRule, DEFAULT_RULES};

/// Trimmed, lowercased product name
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Bidirectional substring containment between two lowercased strings
fn contains_either(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a))
}

/// Stock lookup result for one requested product
#[derive(Debug, Clone, PartialEq)]
pub struct StockMatch {
    /// Supplier product key that matched
    pub product: String,
    pub available: bool,
    pub price: f64,
    pub quantity: u32,
}

/// Rule-driven matcher over an ordered rule table
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'r> {
    rules: &'r [CategoryRule],
}

impl Default for Matcher<'static> {
    fn default() -> Self {
        Self {
            rules: DEFAULT_RULES,
        }
    }
}

impl<'r> Matcher<'r> {
    /// Matcher over a custom rule table (evaluated in slice order)
    pub fn with_rules(rules: &'r [CategoryRule]) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &'r [CategoryRule] {
        self.rules
    }

    /// The first rule triggered by `name`, if any
    pub fn classify(&self, name: &str) -> Option<&'r CategoryRule> {
        let normalized = normalize(name);
        self.rules.iter().find(|rule| rule.triggered_by(&normalized))
    }

    /// Whether any coverage entry accepts the requested product
    pub fn matches_coverage<S: AsRef<str>>(&self, name: &str, coverage: &[S]) -> bool {
        self.matched_coverage(name, coverage).is_some()
    }

    /// The first coverage entry accepting the requested product
    pub fn matched_coverage<'c, S: AsRef<str>>(
        &self,
        name: &str,
        coverage: &'c [S],
    ) -> Option<&'c str> {
        let normalized = normalize(name);
        let found = match self.rules.iter().find(|rule| rule.triggered_by(&normalized)) {
            Some(rule) => {
                tracing::trace!(product = %normalized, category = rule.category, "rule fired");
                coverage
                    .iter()
                    .map(AsRef::as_ref)
                    .find(|entry| rule.accepts_coverage(&entry.to_lowercase()))
            }
            None => {
                tracing::trace!(product = %normalized, "no rule fired, substring fallback");
                coverage
                    .iter()
                    .map(AsRef::as_ref)
                    .find(|entry| contains_either(&normalized, &entry.to_lowercase()))
            }
        };
        found
    }

    /// Look the requested product up in a supplier's stock table
    ///
    /// When a rule fires, only product keys of that rule's category are
    /// candidates, and one directly containing (or contained in) the request
    /// wins over the first candidate in key order. Without a rule only direct
    /// containment matches.
    pub fn match_stock(
        &self,
        name: &str,
        stock: &BTreeMap<String, StockRecord>,
    ) -> Option<StockMatch> {
        let normalized = normalize(name);
        let to_match = |(key, record): (&String, &StockRecord)| StockMatch {
            product: key.clone(),
            available: record.available,
            price: record.price,
            quantity: record.quantity,
        };

        let direct = |key: &String| contains_either(&normalized, &key.to_lowercase());

        let found = match self.rules.iter().find(|rule| rule.triggered_by(&normalized)) {
            Some(rule) => {
                let candidates: Vec<(&String, &StockRecord)> = stock
                    .iter()
                    .filter(|(key, _)| rule.covers_product(&key.to_lowercase()))
                    .collect();
                candidates
                    .iter()
                    .find(|(key, _)| direct(key))
                    .or_else(|| candidates.first())
                    .map(|&(key, record)| to_match((key, record)))
            }
            None => stock.iter().find(|(key, _)| direct(key)).map(to_match),
        };

        tracing::trace!(
            product = %normalized,
            matched = found.as_ref().map_or("-", |m| m.product.as_str()),
            "stock lookup"
        );
        found
    }
}

/// Coverage match with the default rule table
pub fn matches_coverage<S: AsRef<str>>(name: &str, coverage: &[S]) -> bool {
    Matcher::default().matches_coverage(name, coverage)
}
