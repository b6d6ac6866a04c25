//! `baskit transfer` command - Versioned item-list transfer links

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::commands::utils::{print_items, ItemSourceArgs};
use crate::cli::helpers::{print_structured, Session};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::orders::{OrderTransfer, PurchaseError};

#[derive(Subcommand, Debug)]
pub enum TransferCommands {
    /// Encode an item list as a transfer link
    Encode(EncodeArgs),

    /// Decode and validate a transfer link, query string or JSON payload
    Decode(DecodeArgs),
}

#[derive(clap::Args, Debug)]
pub struct EncodeArgs {
    #[command(flatten)]
    pub source: ItemSourceArgs,

    /// Print the JSON payload instead of a link
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Debug)]
pub struct DecodeArgs {
    /// Link, query string (order=...) or raw JSON
    pub link: String,
}

/// Run a transfer subcommand
pub fn run(cmd: TransferCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        TransferCommands::Encode(args) => run_encode(args, global),
        TransferCommands::Decode(args) => run_decode(args, global),
    }
}

fn run_encode(args: EncodeArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    if args.source.is_empty() {
        return Err(PurchaseError::NoItems.into());
    }
    let (source, items) = args.source.collect(&session.catalog)?;
    if items.is_empty() {
        return Err(PurchaseError::NoItems.into());
    }

    let transfer = OrderTransfer::new(source, items);
    if args.json {
        println!("{}", transfer.to_json().into_diagnostic()?);
    } else {
        println!("{}", transfer.to_link().into_diagnostic()?);
    }
    Ok(())
}

fn run_decode(args: DecodeArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let transfer = OrderTransfer::decode(&args.link)?;

    let format = session.format(global, OutputFormat::Tsv);
    if print_structured(&transfer, format)? {
        return Ok(());
    }
    if format == OutputFormat::Tsv && !global.quiet {
        println!(
            "{} version {} from {}, created {}",
            style("✓ Valid transfer").green(),
            transfer.version,
            style(&transfer.source).cyan(),
            transfer.created.format("%Y-%m-%d %H:%M")
        );
        println!();
    }
    print_items(&session, &transfer.items, format);
    Ok(())
}
