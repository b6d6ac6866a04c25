//! `baskit partner` command - Partner portal and transaction risk scoring

use clap::Subcommand;
use console::style;
use miette::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::cli::helpers::{print_structured, Session};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::risk::{assess, RiskAssessment, RiskLevel, BASE_SCORE};

#[derive(Subcommand, Debug)]
pub enum PartnerCommands {
    /// List partners and their credit position
    List,

    /// List transactions awaiting review
    Transactions,

    /// Score the risk of one transaction
    Assess(AssessArgs),
}

#[derive(clap::Args, Debug)]
pub struct AssessArgs {
    /// Transaction ID (e.g. TXN-001)
    pub transaction: String,

    /// Seed the jitter for a reproducible score
    #[arg(long)]
    pub seed: Option<u64>,
}

const PARTNER_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 9),
    ColumnDef::new("name", "NAME", 26),
    ColumnDef::new("tier", "TIER", 7),
    ColumnDef::new("verified", "VERIFIED", 9),
    ColumnDef::new("years", "YEARS", 6),
    ColumnDef::new("limit", "CREDIT LIMIT", 16),
    ColumnDef::new("remaining", "REMAINING", 16),
    ColumnDef::new("late", "LATE", 5),
];

const TXN_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 9),
    ColumnDef::new("partner", "PARTNER", 26),
    ColumnDef::new("amount", "AMOUNT", 16),
    ColumnDef::new("cross_border", "CROSS-BORDER", 13),
    ColumnDef::new("new_device", "NEW DEVICE", 11),
];

/// Run a partner subcommand
pub fn run(cmd: PartnerCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        PartnerCommands::List => run_list(global),
        PartnerCommands::Transactions => run_transactions(global),
        PartnerCommands::Assess(args) => run_assess(args, global),
    }
}

fn run_list(global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let partners = &session.catalog.partners.partners;

    let format = session.format(global, OutputFormat::Tsv);
    if print_structured(partners, format)? {
        return Ok(());
    }
    if partners.is_empty() {
        println!("No partners found.");
        return Ok(());
    }

    let rows = partners.iter().map(|p| {
        TableRow::new(&p.id)
            .cell("id", CellValue::Id(p.id.clone()))
            .cell("name", CellValue::Text(p.name.clone()))
            .cell("tier", CellValue::Text(p.tier.to_string()))
            .cell("verified", CellValue::Flag(p.verified))
            .cell("years", CellValue::Float(p.years_active, 1))
            .cell("limit", CellValue::Money(session.money(p.credit_limit)))
            .cell("remaining", CellValue::Money(session.money(p.remaining_credit())))
            .cell("late", CellValue::Number(i64::from(p.late_payments)))
    });
    TableFormatter::new(PARTNER_COLUMNS, "partner").output(rows, format);
    Ok(())
}

fn run_transactions(global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let transactions = &session.catalog.partners.transactions;

    let format = session.format(global, OutputFormat::Tsv);
    if print_structured(transactions, format)? {
        return Ok(());
    }
    if transactions.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }

    let rows = transactions.iter().map(|t| {
        let partner = session
            .catalog
            .partner(&t.partner_id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| format!("{} (unknown)", t.partner_id));
        TableRow::new(&t.id)
            .cell("id", CellValue::Id(t.id.clone()))
            .cell("partner", CellValue::Text(partner))
            .cell("amount", CellValue::Money(session.money(t.amount)))
            .cell("cross_border", CellValue::Flag(t.cross_border))
            .cell("new_device", CellValue::Flag(t.new_device))
    });
    TableFormatter::new(TXN_COLUMNS, "transaction").output(rows, format);
    Ok(())
}

fn run_assess(args: AssessArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let catalog = &session.catalog;

    let txn = catalog.transaction(&args.transaction).ok_or_else(|| {
        miette::miette!(
            help = "run `baskit partner transactions` to list transactions",
            "transaction '{}' not found",
            args.transaction.trim()
        )
    })?;
    let partner = catalog.partner(&txn.partner_id).ok_or_else(|| {
        miette::miette!(
            "transaction {} references unknown partner {}",
            txn.id,
            txn.partner_id
        )
    })?;

    let assessment = match args.seed {
        Some(seed) => assess(partner, txn, &mut StdRng::seed_from_u64(seed)),
        None => assess(partner, txn, &mut rand::rng()),
    };

    let format = session.format(global, OutputFormat::Tsv);
    if print_structured(&assessment, format)? {
        return Ok(());
    }
    if format == OutputFormat::Id {
        println!("{}", assessment.score);
        return Ok(());
    }

    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("Transaction").bold(), style(&txn.id).cyan());
    println!(
        "{}: {} ({}, {})",
        style("Partner").bold(),
        style(&partner.name).yellow(),
        partner.id,
        partner.tier
    );
    println!("{}: {}", style("Amount").bold(), session.money(txn.amount));
    println!("{}", style("─".repeat(60)).dim());
    print_breakdown(&assessment);
    Ok(())
}

fn print_breakdown(assessment: &RiskAssessment) {
    println!();
    println!("  {:<40} {:>5}", "Base score", BASE_SCORE);
    for factor in &assessment.factors {
        println!(
            "  {:<40} {:>5}",
            factor.label,
            style(format!("-{}", factor.deduction)).red()
        );
    }
    println!("  {:<40} {:>+5}", "Jitter", assessment.jitter);
    println!();

    let level = match assessment.level {
        RiskLevel::Low => style(assessment.level.to_string()).green(),
        RiskLevel::Medium => style(assessment.level.to_string()).yellow(),
        RiskLevel::High => style(assessment.level.to_string()).red().bold(),
    };
    println!(
        "{}: {} / 100 ({} risk)",
        style("Score").bold(),
        assessment.score,
        level
    );
}
