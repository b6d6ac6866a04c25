//! Purchase order construction from a supplier evaluation

use chrono::Utc;
use miette::Diagnostic;
use thiserror::Error;

use crate::core::catalog::Catalog;
use crate::core::identity::{EntityId, EntityPrefix};
use crate::entities::{OrderLine, PoStatus, ProcurementItem, PurchaseOrder, Supplier, TransferSource};
use crate::matching::Matcher;
use crate::ranking::SupplierEvaluation;

/// Errors building a purchase order
#[derive(Debug, Error, Diagnostic)]
pub enum PurchaseError {
    #[error("supplier '{id}' not found")]
    #[diagnostic(code(baskit::orders::supplier_not_found), help("known suppliers: {known}"))]
    UnknownSupplier { id: String, known: String },

    #[error("{supplier} has none of the requested items available")]
    #[diagnostic(
        code(baskit::orders::nothing_matched),
        help("run `baskit match` with the same items to see which suppliers can fill them")
    )]
    NothingMatched { supplier: String },

    #[error("no items to order")]
    #[diagnostic(code(baskit::orders::no_items), help("pass --item NAME:QTY, --items-csv, --so or --transfer"))]
    NoItems,
}

/// Look up a supplier by id for ordering
pub fn find_supplier<'a>(catalog: &'a Catalog, id: &str) -> Result<&'a Supplier, PurchaseError> {
    catalog.supplier(id).ok_or_else(|| PurchaseError::UnknownSupplier {
        id: id.trim().to_string(),
        known: catalog
            .suppliers
            .iter()
            .map(|s| s.id.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    })
}

/// Build a draft PO from an evaluation, keeping only available lines
pub fn from_evaluation(
    evaluation: &SupplierEvaluation<'_>,
    source: TransferSource,
    author: impl Into<String>,
) -> Result<PurchaseOrder, PurchaseError> {
    let lines: Vec<OrderLine> = evaluation
        .lines
        .iter()
        .filter(|line| line.available)
        .filter_map(|line| {
            Some(OrderLine {
                product: line.product.clone(),
                matched_product: line.matched.clone()?,
                quantity: line.quantity,
                unit: line.unit.clone(),
                unit_price: line.unit_price?,
                line_total: line.line_total,
            })
        })
        .collect();

    if lines.is_empty() {
        return Err(PurchaseError::NothingMatched {
            supplier: evaluation.supplier.name.clone(),
        });
    }

    let unmatched = evaluation.missing().map(|line| line.product.clone()).collect();
    let total = lines.iter().map(|line| line.line_total).sum();

    let po = PurchaseOrder {
        id: EntityId::new(EntityPrefix::Po),
        supplier_id: evaluation.supplier.id.clone(),
        supplier_name: evaluation.supplier.name.clone(),
        lines,
        total,
        unmatched,
        source,
        status: PoStatus::Draft,
        author: author.into(),
        created: Utc::now(),
    };
    tracing::info!(id = %po.id, supplier = %po.supplier_id, total = po.total, "purchase order drafted");
    Ok(po)
}

/// Evaluate `items` at supplier `supplier_id` and draft a PO
pub fn create(
    catalog: &Catalog,
    supplier_id: &str,
    items: &[ProcurementItem],
    source: TransferSource,
    author: impl Into<String>,
) -> Result<PurchaseOrder, PurchaseError> {
    if items.is_empty() {
        return Err(PurchaseError::NoItems);
    }
    let supplier = find_supplier(catalog, supplier_id)?;
    let evaluation = SupplierEvaluation::new(&Matcher::default(), catalog, supplier, items);
    from_evaluation(&evaluation, source, author)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_keeps_available_lines() {
        let catalog = Catalog::embedded().unwrap();
        let items = vec![
            ProcurementItem::new("Indomie Goreng", 100).with_unit("carton"),
            ProcurementItem::new("Chitato", 10),
            ProcurementItem::new("Honda Beat", 1),
        ];
        let po = create(&catalog, "sup-001", &items, TransferSource::Manual, "Dewi").unwrap();

        assert_eq!(po.supplier_id, "SUP-001");
        assert_eq!(po.lines.len(), 1);
        assert_eq!(po.lines[0].matched_product, "Indomie Goreng");
        assert_eq!(po.lines[0].unit.as_deref(), Some("carton"));
        assert_eq!(po.total, 310_000.0);
        assert_eq!(po.unmatched, vec!["Chitato".to_string(), "Honda Beat".to_string()]);
        assert_eq!(po.status, PoStatus::Draft);
        assert_eq!(po.id.prefix(), EntityPrefix::Po);
    }

    #[test]
    fn test_coverage_supplier_priced_at_list_price() {
        let catalog = Catalog::embedded().unwrap();
        let items = vec![ProcurementItem::new("Honda Vario 125", 2)];
        let po = create(&catalog, "SUP-003", &items, TransferSource::Manual, "Dewi").unwrap();
        assert_eq!(po.lines[0].unit_price, 18_500_000.0);
        assert_eq!(po.total, 37_000_000.0);
    }

    #[test]
    fn test_nothing_matched() {
        let catalog = Catalog::embedded().unwrap();
        let items = vec![ProcurementItem::new("Honda Beat", 1)];
        let err = create(&catalog, "SUP-002", &items, TransferSource::Manual, "Dewi").unwrap_err();
        assert!(matches!(err, PurchaseError::NothingMatched { .. }));
    }

    #[test]
    fn test_unknown_supplier_and_empty_items() {
        let catalog = Catalog::embedded().unwrap();
        let items = vec![ProcurementItem::new("Indomie", 1)];
        assert!(matches!(
            create(&catalog, "SUP-999", &items, TransferSource::Manual, "Dewi"),
            Err(PurchaseError::UnknownSupplier { .. })
        ));
        assert!(matches!(
            create(&catalog, "SUP-001", &[], TransferSource::Manual, "Dewi"),
            Err(PurchaseError::NoItems)
        ));
    }
}
