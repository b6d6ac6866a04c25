//! `baskit match` command - Evaluate and rank suppliers for an item list

use console::style;
use miette::Result;
use serde::Serialize;

use crate::cli::commands::utils::ItemSourceArgs;
use crate::cli::helpers::{print_structured, Session};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::entities::TransferSource;
use crate::orders::PurchaseError;
use crate::ranking::{evaluate_all, sort_evaluations, LineEvaluation, SortMode, SupplierEvaluation};

#[derive(clap::Args, Debug)]
pub struct MatchArgs {
    #[command(flatten)]
    pub source: ItemSourceArgs,

    /// Sort mode (recommended, cheapest, closest, fastest, top-rated, best-match)
    #[arg(long, short = 's')]
    pub sort: Option<SortMode>,

    /// Hide suppliers that cannot fill any requested item
    #[arg(long)]
    pub only_matched: bool,

    /// Print per-line details for each supplier
    #[arg(long, short = 'd')]
    pub details: bool,
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 9),
    ColumnDef::new("name", "SUPPLIER", 28),
    ColumnDef::new("rating", "RATING", 7),
    ColumnDef::new("match", "MATCH", 6),
    ColumnDef::new("total", "TOTAL", 16),
    ColumnDef::new("km", "KM", 6),
    ColumnDef::new("eta", "ETA", 12),
    ColumnDef::new("lead", "LEAD TIME", 12),
];

/// One ranked supplier as written by --format json/yaml
#[derive(Serialize)]
struct RankedSupplier<'a> {
    rank: usize,
    supplier_id: &'a str,
    supplier_name: &'a str,
    rating: f64,
    match_percentage: u8,
    total: f64,
    distance_km: f64,
    eta: &'a str,
    lead_time: &'a str,
    lines: &'a [LineEvaluation],
}

pub fn run(args: MatchArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    if args.source.is_empty() {
        return Err(PurchaseError::NoItems.into());
    }
    let (source, items) = args.source.collect(&session.catalog)?;
    if items.is_empty() {
        return Err(PurchaseError::NoItems.into());
    }

    let sort = session.sort_mode(args.sort);
    let mut evaluations = evaluate_all(&session.catalog, &items);
    sort_evaluations(&mut evaluations, sort);
    if args.only_matched {
        evaluations.retain(|e| e.found() > 0);
    }
    tracing::debug!(items = items.len(), suppliers = evaluations.len(), %sort, "suppliers ranked");

    let format = session.format(global, OutputFormat::Tsv);
    let ranked: Vec<RankedSupplier<'_>> = evaluations
        .iter()
        .enumerate()
        .map(|(i, e)| RankedSupplier {
            rank: i + 1,
            supplier_id: &e.supplier.id,
            supplier_name: &e.supplier.name,
            rating: e.supplier.rating,
            match_percentage: e.match_percentage,
            total: e.total,
            distance_km: e.distance.km,
            eta: &e.distance.eta,
            lead_time: &e.supplier.lead_time,
            lines: &e.lines,
        })
        .collect();
    if print_structured(&ranked, format)? {
        return Ok(());
    }

    if format == OutputFormat::Tsv && !global.quiet {
        let origin = match &source {
            TransferSource::Manual => String::new(),
            other => format!(" from {}", other),
        };
        println!(
            "{} {} item(s){}, sorted by {}",
            style("Evaluating").bold(),
            items.len(),
            origin,
            style(sort).cyan()
        );
        println!();
    }

    if evaluations.is_empty() {
        println!("No supplier can fill any of the requested items.");
        return Ok(());
    }

    let rows = evaluations.iter().map(|e| {
        let s = e.supplier;
        TableRow::new(&s.id)
            .cell("id", CellValue::Id(s.id.clone()))
            .cell("name", CellValue::Text(s.name.clone()))
            .cell("rating", CellValue::Rating(s.rating))
            .cell("match", CellValue::Percent(e.match_percentage))
            .cell("total", CellValue::Money(session.money(e.total)))
            .cell("km", CellValue::Float(e.distance.km, 1))
            .cell("eta", CellValue::Text(e.distance.eta.clone()))
            .cell("lead", CellValue::Text(s.lead_time.clone()))
    });
    TableFormatter::new(COLUMNS, "supplier").output(rows, format);

    if args.details && format == OutputFormat::Tsv {
        for evaluation in &evaluations {
            print_details(&session, evaluation);
        }
    }
    Ok(())
}

fn print_details(session: &Session, evaluation: &SupplierEvaluation<'_>) {
    println!();
    println!(
        "{} {} ({}/{} found)",
        style(&evaluation.supplier.id).cyan(),
        style(&evaluation.supplier.name).bold(),
        evaluation.found(),
        evaluation.lines.len()
    );
    for line in &evaluation.lines {
        let unit = line.unit.as_deref().unwrap_or("pcs");
        match (&line.matched, line.available, line.unit_price) {
            (Some(matched), true, Some(price)) => println!(
                "  {} {} x{} {} -> {} @ {} = {}",
                style("✓").green(),
                line.product,
                line.quantity,
                unit,
                matched,
                session.money(price),
                session.money(line.line_total)
            ),
            (Some(matched), false, _) => println!(
                "  {} {} -> {} {}",
                style("!").yellow(),
                line.product,
                matched,
                style("(out of stock)").dim()
            ),
            _ => println!(
                "  {} {} {}",
                style("✗").red(),
                line.product,
                style("(not offered)").dim()
            ),
        }
    }
}
