//! `baskit demand` command - Distributor demands and their quotes

use clap::Subcommand;
use console::style;
use miette::Result;
use serde::Serialize;
use std::cmp::Ordering;

use crate::cli::helpers::{print_structured, Session};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::entities::{DemandStatus, DistributorDemand, SupplierQuote};

#[derive(Subcommand, Debug)]
pub enum DemandCommands {
    /// List distributor demands
    List(ListArgs),

    /// Show a demand with the quotes it received
    Show(ShowArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by status (open, quoted, awarded, closed)
    #[arg(long, short = 's')]
    pub status: Option<DemandStatus>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Demand ID (e.g. DMD-001)
    pub id: String,
}

const LIST_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 9),
    ColumnDef::new("distributor", "DISTRIBUTOR", 24),
    ColumnDef::new("product", "PRODUCT", 24),
    ColumnDef::new("quantity", "QTY", 14),
    ColumnDef::new("target", "TARGET", 14),
    ColumnDef::new("deadline", "DEADLINE", 11),
    ColumnDef::new("quotes", "QUOTES", 7),
    ColumnDef::new("status", "STATUS", 8),
];

const QUOTE_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "QUOTE", 8),
    ColumnDef::new("supplier", "SUPPLIER", 28),
    ColumnDef::new("unit_price", "UNIT PRICE", 14),
    ColumnDef::new("total", "TOTAL", 16),
    ColumnDef::new("lead", "LEAD TIME", 12),
    ColumnDef::new("status", "STATUS", 9),
    ColumnDef::new("notes", "NOTES", 30),
];

/// Run a demand subcommand
pub fn run(cmd: DemandCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        DemandCommands::List(args) => run_list(args, global),
        DemandCommands::Show(args) => run_show(args, global),
    }
}

fn quantity_label(demand: &DistributorDemand) -> String {
    match &demand.unit {
        Some(unit) => format!("{} {}", demand.quantity, unit),
        None => demand.quantity.to_string(),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let catalog = &session.catalog;

    let demands: Vec<&DistributorDemand> = catalog
        .demands
        .iter()
        .filter(|d| args.status.map_or(true, |status| d.status == status))
        .collect();

    let format = session.format(global, OutputFormat::Tsv);
    if print_structured(&demands, format)? {
        return Ok(());
    }
    if demands.is_empty() {
        println!("No demands found.");
        return Ok(());
    }

    let rows = demands.iter().map(|d| {
        let target = d
            .target_price
            .map(|p| CellValue::Money(session.money(p)))
            .unwrap_or(CellValue::Empty);
        let deadline = d.deadline.map(CellValue::Day).unwrap_or(CellValue::Empty);
        TableRow::new(&d.id)
            .cell("id", CellValue::Id(d.id.clone()))
            .cell("distributor", CellValue::Text(d.distributor.clone()))
            .cell("product", CellValue::Text(d.product.clone()))
            .cell("quantity", CellValue::Text(quantity_label(d)))
            .cell("target", target)
            .cell("deadline", deadline)
            .cell("quotes", CellValue::Number(catalog.quotes_for(&d.id).len() as i64))
            .cell("status", CellValue::Status(d.status.to_string()))
    });
    TableFormatter::new(LIST_COLUMNS, "demand").output(rows, format);

    if format == OutputFormat::Tsv && !global.quiet {
        for quote in &catalog.quotes {
            for dangling in catalog.dangling_refs(quote) {
                println!("{} quote {}: {}", style("!").yellow(), quote.id, dangling);
            }
        }
    }
    Ok(())
}

/// Quotes by unit price, lowest first; ties keep catalog order
fn sorted_quotes<'a>(mut quotes: Vec<&'a SupplierQuote>) -> Vec<&'a SupplierQuote> {
    quotes.sort_by(|a, b| {
        a.unit_price
            .partial_cmp(&b.unit_price)
            .unwrap_or(Ordering::Equal)
    });
    quotes
}

#[derive(Serialize)]
struct DemandDetail<'a> {
    #[serde(flatten)]
    demand: &'a DistributorDemand,
    quotes: Vec<&'a SupplierQuote>,
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let catalog = &session.catalog;

    let demand = catalog.demand(&args.id).ok_or_else(|| {
        miette::miette!(
            help = "run `baskit demand list` to see known demands",
            "demand '{}' not found",
            args.id.trim()
        )
    })?;
    let quotes = sorted_quotes(catalog.quotes_for(&demand.id));

    let format = session.format(global, OutputFormat::Tsv);
    let detail = DemandDetail {
        demand,
        quotes: quotes.clone(),
    };
    if print_structured(&detail, format)? {
        return Ok(());
    }
    if format == OutputFormat::Id {
        println!("{}", demand.id);
        return Ok(());
    }

    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("ID").bold(), style(&demand.id).cyan());
    println!("{}: {}", style("Distributor").bold(), style(&demand.distributor).yellow());
    println!("{}: {}", style("Status").bold(), demand.status);
    println!("{}", style("─".repeat(60)).dim());
    println!();
    println!("{}: {}", style("Product").bold(), demand.product);
    println!("{}: {}", style("Quantity").bold(), quantity_label(demand));
    if let Some(target) = demand.target_price {
        println!("{}: {}", style("Target price").bold(), session.money(target));
    }
    println!("{}: {}", style("Location").bold(), demand.location);
    if let Some(deadline) = demand.deadline {
        println!("{}: {}", style("Deadline").bold(), deadline.format("%Y-%m-%d"));
    }

    println!();
    if quotes.is_empty() {
        println!("{}", style("No quotes yet.").dim());
        return Ok(());
    }

    println!("{} ({}):", style("Quotes").bold(), quotes.len());
    let lowest = quotes.first().map(|q| q.id.clone());
    let rows = quotes.iter().map(|q| {
        let supplier = catalog
            .supplier(&q.supplier_id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| format!("{} (unknown)", q.supplier_id));
        let unit_price = if lowest.as_deref() == Some(q.id.as_str()) {
            format!("{} *", session.money(q.unit_price))
        } else {
            session.money(q.unit_price)
        };
        TableRow::new(&q.id)
            .cell("id", CellValue::Id(q.id.clone()))
            .cell("supplier", CellValue::Text(supplier))
            .cell("unit_price", CellValue::Money(unit_price))
            .cell("total", CellValue::Money(session.money(q.total_for(demand.quantity))))
            .cell("lead", CellValue::Text(q.lead_time.clone()))
            .cell("status", CellValue::Status(q.status.to_string()))
            .cell(
                "notes",
                q.notes
                    .clone()
                    .map(CellValue::Text)
                    .unwrap_or(CellValue::Empty),
            )
    });
    TableFormatter::new(QUOTE_COLUMNS, "quote")
        .without_summary()
        .output(rows, format);
    if format == OutputFormat::Tsv {
        println!("{}", style("* lowest unit price").dim());
    }

    let dangling: Vec<String> = quotes
        .iter()
        .flat_map(|q| {
            catalog
                .dangling_refs(q)
                .into_iter()
                .map(move |r| format!("{}: {}", q.id, r))
        })
        .collect();
    if !dangling.is_empty() {
        println!();
        for warning in dangling {
            println!("{} {}", style("!").yellow(), warning);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Catalog;

    #[test]
    fn test_quotes_sorted_by_unit_price() {
        let catalog = Catalog::embedded().unwrap();
        let quotes = sorted_quotes(catalog.quotes_for("DMD-001"));
        let ids: Vec<&str> = quotes.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["QT-001", "QT-002"]);
    }
}
