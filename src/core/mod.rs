//! Core module - project layout, configuration, ids and catalog loading

pub mod catalog;
pub mod config;
pub mod entity;
pub mod identity;
pub mod loader;
pub mod logging;
pub mod project;

pub use catalog::{Catalog, CatalogError, DanglingRef, StockTable};
pub use config::Config;
pub use entity::Entity;
pub use identity::{EntityId, EntityPrefix, IdParseError};
pub use project::{Project, ProjectError};
