//! `baskit sup` command - Supplier catalog

use clap::Subcommand;
use console::style;
use miette::Result;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::cli::helpers::{print_structured, Session};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::entities::{StockRecord, Supplier};
use crate::matching::matches_coverage;
use crate::orders::purchase::find_supplier;
use crate::ranking::{sort_evaluations, SortMode, SupplierEvaluation};

#[derive(Subcommand, Debug)]
pub enum SupCommands {
    /// List suppliers
    List(ListArgs),

    /// Show a supplier's details, distance and stock
    Show(ShowArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Sort mode (recommended, cheapest, closest, fastest, top-rated, best-match)
    #[arg(long, short = 's')]
    pub sort: Option<SortMode>,

    /// Only suppliers whose coverage accepts this product or category
    #[arg(long, short = 'c')]
    pub coverage: Option<String>,

    /// Search in id, name and location
    #[arg(long)]
    pub search: Option<String>,

    /// Reverse sort order
    #[arg(long, short = 'r')]
    pub reverse: bool,

    /// Limit number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Supplier ID (e.g. SUP-001)
    pub id: String,
}

const LIST_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 9),
    ColumnDef::new("name", "NAME", 28),
    ColumnDef::new("rating", "RATING", 7),
    ColumnDef::new("price", "PRICE", 14),
    ColumnDef::new("lead", "LEAD TIME", 12),
    ColumnDef::new("location", "LOCATION", 18),
    ColumnDef::new("km", "KM", 6),
    ColumnDef::new("ai", "AI", 4),
];

const STOCK_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("product", "PRODUCT", 30),
    ColumnDef::new("available", "AVAILABLE", 10),
    ColumnDef::new("price", "PRICE", 14),
    ColumnDef::new("quantity", "ON HAND", 8),
];

/// Run a supplier subcommand
pub fn run(cmd: SupCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        SupCommands::List(args) => run_list(args, global),
        SupCommands::Show(args) => run_show(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let catalog = &session.catalog;
    let sort = session.sort_mode(args.sort);

    let mut evaluations: Vec<SupplierEvaluation<'_>> = catalog
        .suppliers
        .iter()
        .filter(|s| {
            args.coverage
                .as_ref()
                .map_or(true, |wanted| matches_coverage(wanted, &s.coverage))
        })
        .filter(|s| {
            args.search.as_ref().map_or(true, |search| {
                let search = search.to_lowercase();
                s.id.to_lowercase().contains(&search)
                    || s.name.to_lowercase().contains(&search)
                    || s.location.to_lowercase().contains(&search)
            })
        })
        .map(|s| SupplierEvaluation::listing(catalog, s))
        .collect();

    sort_evaluations(&mut evaluations, sort);
    if args.reverse {
        evaluations.reverse();
    }
    if let Some(limit) = args.limit {
        evaluations.truncate(limit);
    }

    if args.count {
        println!("{}", evaluations.len());
        return Ok(());
    }

    let format = session.format(global, OutputFormat::Tsv);
    let suppliers: Vec<&Supplier> = evaluations.iter().map(|e| e.supplier).collect();
    if print_structured(&suppliers, format)? {
        return Ok(());
    }

    if evaluations.is_empty() {
        println!("No suppliers found.");
        return Ok(());
    }

    let rows = evaluations.iter().map(|e| {
        let s = e.supplier;
        TableRow::new(&s.id)
            .cell("id", CellValue::Id(s.id.clone()))
            .cell("name", CellValue::Text(s.name.clone()))
            .cell("rating", CellValue::Rating(s.rating))
            .cell("price", CellValue::Money(session.money(s.price)))
            .cell("lead", CellValue::Text(s.lead_time.clone()))
            .cell("location", CellValue::Text(s.location.clone()))
            .cell("km", CellValue::Float(e.distance.km, 1))
            .cell("ai", CellValue::Flag(s.ai_recommended))
    });
    TableFormatter::new(LIST_COLUMNS, "supplier").output(rows, format);

    if format == OutputFormat::Tsv && !global.quiet {
        println!("{} {}", style("Sorted by").dim(), style(sort).dim());
    }
    Ok(())
}

/// Supplier plus the derived values `show` prints
#[derive(Serialize)]
struct SupplierDetail<'a> {
    #[serde(flatten)]
    supplier: &'a Supplier,
    distance_km: f64,
    eta: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    stock: Option<&'a BTreeMap<String, StockRecord>>,
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let catalog = &session.catalog;
    let supplier = find_supplier(catalog, &args.id)?;
    let distance = catalog.distances.lookup(&supplier.location);
    let stock = catalog.stock_for(&supplier.id);

    let format = session.format(global, OutputFormat::Tsv);
    let detail = SupplierDetail {
        supplier,
        distance_km: distance.km,
        eta: &distance.eta,
        stock,
    };
    if print_structured(&detail, format)? {
        return Ok(());
    }
    if format == OutputFormat::Id {
        println!("{}", supplier.id);
        return Ok(());
    }

    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("ID").bold(), style(&supplier.id).cyan());
    println!("{}: {}", style("Name").bold(), style(&supplier.name).yellow());
    println!("{}: {:.1} / 5", style("Rating").bold(), supplier.rating);
    if supplier.ai_recommended {
        println!("{}: {}", style("AI recommended").bold(), style("yes").green());
    }
    println!("{}", style("─".repeat(60)).dim());

    println!();
    println!("{}: {}", style("Coverage").bold(), supplier.coverage_display());
    println!("{}: {}", style("Unit price").bold(), session.money(supplier.price));
    println!("{}: {}", style("Lead time").bold(), supplier.lead_time);
    println!(
        "{}: {} ({:.1} km, {})",
        style("Location").bold(),
        supplier.location,
        distance.km,
        distance.eta
    );

    let contact = &supplier.contact;
    println!();
    println!("{}:", style("Contact").bold());
    println!("  • {}", contact.name);
    if let Some(ref phone) = contact.phone {
        println!("    Phone: {}", phone);
    }
    if let Some(ref email) = contact.email {
        println!("    Email: {}", email);
    }

    println!();
    match stock {
        Some(stock) if !stock.is_empty() => {
            println!("{} ({}):", style("Stock").bold(), stock.len());
            let rows = stock.iter().map(|(product, record)| {
                TableRow::new(product)
                    .cell("product", CellValue::Text(product.clone()))
                    .cell("available", CellValue::Flag(record.available))
                    .cell("price", CellValue::Money(session.money(record.price)))
                    .cell("quantity", CellValue::Number(i64::from(record.quantity)))
            });
            TableFormatter::new(STOCK_COLUMNS, "product")
                .without_summary()
                .output(rows, format);
        }
        _ => println!(
            "{}",
            style("No stock table; orders are priced at the unit price above.").dim()
        ),
    }
    Ok(())
}
