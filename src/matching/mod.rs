//! Keyword-based product matching

pub mod matcher;
pub mod rules;

pub use matcher::{matches_coverage, normalize, Matcher, StockMatch};
pub use rules::{CategoryRule, DEFAULT_RULES};
