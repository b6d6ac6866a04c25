//! CLI command implementations

pub mod utils;

pub mod completions;
pub mod config;
pub mod demand;
pub mod init;
pub mod loyalty;
pub mod matching;
pub mod partner;
pub mod po;
pub mod so;
pub mod sup;
pub mod transfer;
