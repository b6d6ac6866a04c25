//! Baskit: procurement marketplace toolkit
//!
//! Matches free-text procurement needs against a supplier catalog, ranks
//! suppliers, drafts purchase orders and the links used to send them, and
//! carries the loyalty and partner-risk modules of the marketplace.

pub mod cli;
pub mod core;
pub mod entities;
pub mod loyalty;
pub mod matching;
pub mod messaging;
pub mod orders;
pub mod ranking;
pub mod risk;
pub mod yaml;
