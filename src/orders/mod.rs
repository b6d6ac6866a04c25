//! Order flows: sales-order import, transfer payloads and purchase orders

pub mod purchase;
pub mod sales_order;
pub mod transfer;

pub use purchase::PurchaseError;
pub use sales_order::SalesOrderError;
pub use transfer::{OrderTransfer, TransferError, TRANSFER_VERSION};
