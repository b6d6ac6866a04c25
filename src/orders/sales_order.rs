//! Sales-order import

use miette::Diagnostic;
use thiserror::Error;

use crate::core::catalog::Catalog;
use crate::entities::{SalesOrder, TransferSource};
use crate::orders::transfer::OrderTransfer;

/// Errors importing a sales order
#[derive(Debug, Error, Diagnostic)]
pub enum SalesOrderError {
    #[error("sales order '{id}' not found")]
    #[diagnostic(code(baskit::orders::sales_order_not_found), help("known sales orders: {known}"))]
    NotFound { id: String, known: String },
}

/// Find a sales order by id, ignoring case and surrounding whitespace
pub fn find<'a>(catalog: &'a Catalog, id: &str) -> Result<&'a SalesOrder, SalesOrderError> {
    catalog
        .sales_orders
        .iter()
        .find(|so| so.matches_id(id))
        .ok_or_else(|| {
            tracing::debug!(id, "unknown sales order");
            SalesOrderError::NotFound {
                id: id.trim().to_string(),
                known: catalog
                    .sales_orders
                    .iter()
                    .map(|so| so.id.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            }
        })
}

/// Import a sales order as a transfer payload tagged with its source
pub fn import(catalog: &Catalog, id: &str) -> Result<OrderTransfer, SalesOrderError> {
    let so = find(catalog, id)?;
    tracing::info!(id = %so.id, items = so.items.len(), "sales order imported");
    Ok(OrderTransfer::new(
        TransferSource::SalesOrder { id: so.id.clone() },
        so.items.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_known_order() {
        let catalog = Catalog::embedded().unwrap();
        let transfer = import(&catalog, " so-2024-001 ").unwrap();
        assert_eq!(
            transfer.source,
            TransferSource::SalesOrder {
                id: "SO-2024-001".into()
            }
        );
        assert_eq!(transfer.items[0].product, "Indomie Goreng");
    }

    #[test]
    fn test_unknown_order_lists_known_ids() {
        let catalog = Catalog::embedded().unwrap();
        let err = import(&catalog, "SO-9999").unwrap_err();
        let SalesOrderError::NotFound { id, known } = err;
        assert_eq!(id, "SO-9999");
        assert!(known.contains("SO-2024-001"));
    }
}
