//! `baskit po` command - Mock purchase orders

use clap::Subcommand;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use miette::{IntoDiagnostic, Result};

use crate::cli::commands::utils::ItemSourceArgs;
use crate::cli::helpers::{print_structured, Session};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::loader;
use crate::core::{Entity, EntityPrefix};
use crate::entities::{PoStatus, PurchaseOrder, Supplier};
use crate::messaging::templates::{MessageContext, MessageRenderer};
use crate::messaging::{mailto_link, whatsapp_link};
use crate::orders::purchase::{self, find_supplier};
use crate::orders::PurchaseError;

#[derive(Subcommand, Debug)]
pub enum PoCommands {
    /// Draft a purchase order for one supplier
    New(NewArgs),

    /// List purchase orders in the project
    List(ListArgs),

    /// Show a purchase order
    Show(ShowArgs),

    /// Print the send link for a PO and mark it sent
    Send(SendArgs),
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Supplier ID (e.g. SUP-001)
    #[arg(long, short = 's')]
    pub supplier: String,

    #[command(flatten)]
    pub source: ItemSourceArgs,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Print a WhatsApp link instead of an email link
    #[arg(long, short = 'w')]
    pub whatsapp: bool,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by supplier ID
    #[arg(long, short = 's')]
    pub supplier: Option<String>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// PO ID (full or partial ULID)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct SendArgs {
    /// PO ID (full or partial ULID)
    pub id: String,

    /// Print a WhatsApp link instead of an email link
    #[arg(long, short = 'w')]
    pub whatsapp: bool,
}

const LIST_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 32),
    ColumnDef::new("supplier", "SUPPLIER", 28),
    ColumnDef::new("lines", "LINES", 6),
    ColumnDef::new("total", "TOTAL", 16),
    ColumnDef::new("status", "STATUS", 7),
    ColumnDef::new("created", "CREATED", 17),
];

const LINE_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("product", "PRODUCT", 26),
    ColumnDef::new("matched", "MATCHED", 26),
    ColumnDef::new("quantity", "QTY", 7),
    ColumnDef::new("unit", "UNIT", 8),
    ColumnDef::new("unit_price", "UNIT PRICE", 14),
    ColumnDef::new("total", "TOTAL", 16),
];

/// Run a purchase order subcommand
pub fn run(cmd: PoCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        PoCommands::New(args) => run_new(args, global),
        PoCommands::List(args) => run_list(args, global),
        PoCommands::Show(args) => run_show(args, global),
        PoCommands::Send(args) => run_send(args, global),
    }
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let project = session.require_project()?;
    if args.source.is_empty() {
        return Err(PurchaseError::NoItems.into());
    }

    let (source, items) = args.source.collect(&session.catalog)?;
    let po = purchase::create(
        &session.catalog,
        &args.supplier,
        &items,
        source,
        session.config.author(),
    )?;

    print_po(&session, &po);

    if !args.yes {
        let proceed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Create this purchase order for {}?", po.supplier_name))
            .default(true)
            .interact()
            .into_diagnostic()?;
        if !proceed {
            println!("Aborted.");
            return Ok(());
        }
    }

    let path = po.save(project)?;
    println!();
    println!(
        "{} Created purchase order {}",
        style("✓").green(),
        style(&po.id).cyan()
    );
    println!("   {}", style(path.display()).dim());

    let supplier = find_supplier(&session.catalog, &po.supplier_id)?;
    let link = send_link(&session, &po, supplier, args.whatsapp)?;
    println!();
    println!("{}", link);
    Ok(())
}

/// mailto: or wa.me link carrying the rendered PO message
fn send_link(
    session: &Session,
    po: &PurchaseOrder,
    supplier: &Supplier,
    whatsapp: bool,
) -> Result<String> {
    let renderer = MessageRenderer::new()?;
    let ctx = MessageContext {
        author: session.config.author(),
        currency: session.config.currency().to_string(),
        buyer_email: session.config.buyer_email.clone(),
    };
    let contact = &supplier.contact;

    let use_whatsapp = whatsapp || contact.email.is_none();
    if use_whatsapp {
        let phone = contact.phone.as_deref().ok_or_else(|| {
            miette::miette!(
                help = "add a phone number or email to the supplier in .baskit/catalog.yaml",
                "{} has no contact phone number",
                supplier.name
            )
        })?;
        if !whatsapp {
            tracing::warn!(supplier = %supplier.id, "no contact email, falling back to WhatsApp");
        }
        let text = renderer.po_whatsapp(po, contact, &ctx)?;
        return Ok(whatsapp_link(phone, session.config.country_code(), &text));
    }

    let email = contact.email.as_deref().unwrap_or_default();
    let (subject, body) = renderer.po_email(po, contact, &ctx)?;
    Ok(mailto_link(email, &subject, &body))
}

fn print_po(session: &Session, po: &PurchaseOrder) {
    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("PO").bold(), style(&po.id).cyan());
    println!(
        "{}: {} ({})",
        style("Supplier").bold(),
        style(&po.supplier_name).yellow(),
        po.supplier_id
    );
    println!("{}: {}", style("Source").bold(), po.source);
    println!("{}: {}", style("Status").bold(), po.status);
    println!("{}", style("─".repeat(60)).dim());
    println!();

    let rows = po.lines.iter().map(|line| {
        TableRow::new(&line.product)
            .cell("product", CellValue::Text(line.product.clone()))
            .cell("matched", CellValue::Text(line.matched_product.clone()))
            .cell("quantity", CellValue::Number(i64::from(line.quantity)))
            .cell(
                "unit",
                CellValue::Text(line.unit.clone().unwrap_or_else(|| "pcs".to_string())),
            )
            .cell("unit_price", CellValue::Money(session.money(line.unit_price)))
            .cell("total", CellValue::Money(session.money(line.line_total)))
    });
    TableFormatter::new(LINE_COLUMNS, "line")
        .without_summary()
        .output(rows, OutputFormat::Tsv);

    println!();
    println!("{}: {}", style("Total").bold(), style(session.money(po.total)).green());
    if !po.unmatched.is_empty() {
        println!(
            "{}: {}",
            style("Not available").yellow(),
            po.unmatched.join(", ")
        );
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let project = session.require_project()?;

    let mut orders = PurchaseOrder::load_all(project)?;
    if let Some(supplier) = &args.supplier {
        orders.retain(|po| po.supplier_id.eq_ignore_ascii_case(supplier.trim()));
    }

    if args.count {
        println!("{}", orders.len());
        return Ok(());
    }

    let format = session.format(global, OutputFormat::Tsv);
    if print_structured(&orders, format)? {
        return Ok(());
    }
    if orders.is_empty() {
        println!("No purchase orders found.");
        return Ok(());
    }

    let rows = orders.iter().map(|po| {
        TableRow::new(po.id.to_string())
            .cell("id", CellValue::Id(po.id.to_string()))
            .cell("supplier", CellValue::Text(po.supplier_name.clone()))
            .cell("lines", CellValue::Number(po.lines.len() as i64))
            .cell("total", CellValue::Money(session.money(po.total)))
            .cell("status", CellValue::Status(po.status.to_string()))
            .cell("created", CellValue::DateTime(po.created))
    });
    TableFormatter::new(LIST_COLUMNS, "purchase order").output(rows, format);
    Ok(())
}

fn load_po(session: &Session, id: &str) -> Result<(std::path::PathBuf, PurchaseOrder)> {
    let project = session.require_project()?;
    loader::load_entity(&project.entity_dir(EntityPrefix::Po), id)?
        .ok_or_else(|| miette::miette!("No purchase order found matching '{}'", id))
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let (path, po) = load_po(&session, &args.id)?;

    let format = session.format(global, OutputFormat::Tsv);
    match format {
        OutputFormat::Yaml => {
            print!("{}", std::fs::read_to_string(&path).into_diagnostic()?);
        }
        OutputFormat::Json => {
            print_structured(&po, format)?;
        }
        OutputFormat::Id => println!("{}", po.id),
        _ => {
            print_po(&session, &po);
            println!();
            println!(
                "{}: {} by {}",
                style("Created").dim(),
                po.created.format("%Y-%m-%d %H:%M"),
                po.author
            );
        }
    }
    Ok(())
}

fn run_send(args: SendArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let project = session.require_project()?;
    let (_, mut po) = load_po(&session, &args.id)?;

    let supplier = find_supplier(&session.catalog, &po.supplier_id)?;
    let link = send_link(&session, &po, supplier, args.whatsapp)?;

    if po.status != PoStatus::Sent {
        po.status = PoStatus::Sent;
        po.save(project)?;
        tracing::info!(id = %po.id, "purchase order marked sent");
    }
    println!("{}", link);
    Ok(())
}
