//! Entity type definitions
//!
//! **Procurement:**
//! - [`ProcurementItem`] - A requested product line
//! - [`Supplier`] - Catalog suppliers with coverage, price and lead time
//! - [`DistributorDemand`] / [`SupplierQuote`] - Posted needs and responses
//! - [`SalesOrder`] - Predefined item lists importable by id
//! - [`PurchaseOrder`] - Mock POs written into a project
//!
//! **Loyalty marketplace:**
//! - [`Campaign`], [`Member`], [`Receipt`]
//!
//! **Partner portal:**
//! - [`Partner`], [`Transaction`]

pub mod demand;
pub mod item;
pub mod loyalty;
pub mod order;
pub mod partner;
pub mod quote;
pub mod sales_order;
pub mod supplier;

pub use demand::{DemandStatus, DistributorDemand};
pub use item::{ItemParseError, ProcurementItem};
pub use loyalty::{Campaign, Member, Receipt, ReceiptStatus};
pub use order::{OrderLine, PoStatus, PurchaseOrder, TransferSource};
pub use partner::{Partner, PartnerTier, Transaction};
pub use quote::{QuoteStatus, SupplierQuote};
pub use sales_order::SalesOrder;
pub use supplier::{Contact, StockRecord, Supplier};
