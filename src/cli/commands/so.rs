//! `baskit so` command - Predefined sales orders

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::commands::utils::print_items;
use crate::cli::helpers::{print_structured, Session};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::orders::sales_order;

#[derive(Subcommand, Debug)]
pub enum SoCommands {
    /// List sales orders
    List,

    /// Import a sales order's items
    Import(ImportArgs),
}

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    /// Sales order ID (e.g. SO-2024-001), case-insensitive
    pub id: String,

    /// Print a transfer link instead of the item list
    #[arg(long)]
    pub link: bool,
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 13),
    ColumnDef::new("customer", "CUSTOMER", 28),
    ColumnDef::new("items", "ITEMS", 6),
    ColumnDef::new("products", "PRODUCTS", 44),
];

/// Run a sales order subcommand
pub fn run(cmd: SoCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        SoCommands::List => run_list(global),
        SoCommands::Import(args) => run_import(args, global),
    }
}

fn run_list(global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let orders = &session.catalog.sales_orders;

    let format = session.format(global, OutputFormat::Tsv);
    if print_structured(orders, format)? {
        return Ok(());
    }
    if orders.is_empty() {
        println!("No sales orders found.");
        return Ok(());
    }

    let rows = orders.iter().map(|so| {
        let products: Vec<&str> = so.items.iter().map(|i| i.product.as_str()).collect();
        TableRow::new(&so.id)
            .cell("id", CellValue::Id(so.id.clone()))
            .cell("customer", CellValue::Text(so.customer.clone()))
            .cell("items", CellValue::Number(so.items.len() as i64))
            .cell("products", CellValue::Text(products.join(", ")))
    });
    TableFormatter::new(COLUMNS, "sales order").output(rows, format);
    Ok(())
}

fn run_import(args: ImportArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let transfer = sales_order::import(&session.catalog, &args.id)?;

    if args.link {
        println!("{}", transfer.to_link().into_diagnostic()?);
        return Ok(());
    }

    let format = session.format(global, OutputFormat::Tsv);
    if print_structured(&transfer, format)? {
        return Ok(());
    }
    if format == OutputFormat::Tsv && !global.quiet {
        println!(
            "{} {} ({} item(s))",
            style("✓ Imported").green(),
            style(&transfer.source).cyan(),
            transfer.items.len()
        );
        println!();
    }
    print_items(&session, &transfer.items, format);
    Ok(())
}
