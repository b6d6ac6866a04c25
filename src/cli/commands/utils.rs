//! Shared utilities for CLI commands

use miette::{Context, IntoDiagnostic, Result};
use std::fs;
use std::path::PathBuf;

use crate::cli::helpers::Session;
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::OutputFormat;
use crate::core::Catalog;
use crate::entities::{ProcurementItem, TransferSource};
use crate::orders::{sales_order, OrderTransfer};

/// Where a command takes its item list from
///
/// `--item` may be combined with `--items-csv`; `--so` and `--transfer`
/// each supply a complete list on their own.
#[derive(clap::Args, Debug, Default)]
pub struct ItemSourceArgs {
    /// Item as NAME:QTY[:PRICE[:UNIT]] (repeatable)
    #[arg(long = "item", short = 'i', value_name = "SPEC")]
    pub items: Vec<String>,

    /// CSV file with product,quantity[,target_price][,unit] columns
    #[arg(long, value_name = "FILE")]
    pub items_csv: Option<PathBuf>,

    /// Import the items of a sales order
    #[arg(long = "so", value_name = "ID", conflicts_with_all = ["items", "items_csv", "transfer"])]
    pub sales_order: Option<String>,

    /// Decode items from a transfer link, query string or JSON
    #[arg(long, value_name = "LINK", conflicts_with_all = ["items", "items_csv"])]
    pub transfer: Option<String>,
}

impl ItemSourceArgs {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
            && self.items_csv.is_none()
            && self.sales_order.is_none()
            && self.transfer.is_none()
    }

    /// Resolve the item list and where it came from
    pub fn collect(&self, catalog: &Catalog) -> Result<(TransferSource, Vec<ProcurementItem>)> {
        if let Some(id) = &self.sales_order {
            let transfer = sales_order::import(catalog, id)?;
            return Ok((transfer.source, transfer.items));
        }

        if let Some(link) = &self.transfer {
            let transfer = OrderTransfer::decode(link)?;
            return Ok((transfer.source, transfer.items));
        }

        let mut items = Vec::new();
        for spec in &self.items {
            items.push(ProcurementItem::parse_spec(spec)?);
        }
        if let Some(path) = &self.items_csv {
            let file = fs::File::open(path)
                .into_diagnostic()
                .wrap_err_with(|| format!("cannot open {}", path.display()))?;
            items.extend(ProcurementItem::read_csv(file)?);
        }

        tracing::debug!(count = items.len(), "items collected");
        Ok((TransferSource::Manual, items))
    }
}

const ITEM_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("product", "PRODUCT", 30),
    ColumnDef::new("quantity", "QTY", 7),
    ColumnDef::new("unit", "UNIT", 8),
    ColumnDef::new("target_price", "TARGET PRICE", 14),
];

/// Print an item list as a table
pub fn print_items(session: &Session, items: &[ProcurementItem], format: OutputFormat) {
    let rows = items.iter().map(|item| {
        let target = item
            .target_price
            .map(|p| CellValue::Money(session.money(p)))
            .unwrap_or(CellValue::Empty);
        TableRow::new(&item.product)
            .cell("product", CellValue::Text(item.product.clone()))
            .cell("quantity", CellValue::Number(i64::from(item.quantity)))
            .cell("unit", CellValue::Text(item.unit_label().to_string()))
            .cell("target_price", target)
    });
    TableFormatter::new(ITEM_COLUMNS, "item").output(rows, format);
}
