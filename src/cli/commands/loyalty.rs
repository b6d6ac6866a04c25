//! `baskit loyalty` command - Campaigns, receipts and leaderboards

use chrono::Utc;
use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::{print_structured, Session};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Entity;
use crate::entities::{Receipt, ReceiptStatus};
use crate::loyalty::{
    campaign_progress, leaderboard, notice_for, submit_receipt, LoyaltyError, ReceiptSubmission,
};
use crate::messaging::templates::MessageRenderer;
use crate::messaging::whatsapp_link;

#[derive(Subcommand, Debug)]
pub enum LoyaltyCommands {
    /// List brand campaigns with their progress
    Campaigns(CampaignsArgs),

    /// Upload a purchase receipt for review
    Submit(SubmitArgs),

    /// List receipts (catalog fixtures plus uploads)
    Receipts(ReceiptsArgs),

    /// Points leaderboard
    Leaderboard(LeaderboardArgs),

    /// WhatsApp link telling a member their leaderboard standing
    Notify(NotifyArgs),
}

#[derive(clap::Args, Debug)]
pub struct CampaignsArgs {
    /// Only campaigns running today
    #[arg(long)]
    pub active: bool,
}

#[derive(clap::Args, Debug)]
pub struct SubmitArgs {
    /// Campaign ID (e.g. CPG-001)
    #[arg(long, short = 'c')]
    pub campaign: String,

    /// Member ID (e.g. MBR-001)
    #[arg(long, short = 'm')]
    pub member: String,

    /// Purchase amount on the receipt
    #[arg(long, short = 'a')]
    pub amount: f64,

    /// Path or URL of the receipt photo
    #[arg(long)]
    pub image: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ReceiptsArgs {
    /// Filter by member ID
    #[arg(long, short = 'm')]
    pub member: Option<String>,

    /// Filter by campaign ID
    #[arg(long, short = 'c')]
    pub campaign: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct LeaderboardArgs {
    /// Restrict to one campaign
    #[arg(long, short = 'c')]
    pub campaign: Option<String>,

    /// Limit number of rows
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

#[derive(clap::Args, Debug)]
pub struct NotifyArgs {
    /// Member ID (e.g. MBR-001)
    pub member: String,

    /// Rank on one campaign's board instead of the overall board
    #[arg(long, short = 'c')]
    pub campaign: Option<String>,
}

const CAMPAIGN_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 9),
    ColumnDef::new("brand", "BRAND", 14),
    ColumnDef::new("title", "TITLE", 30),
    ColumnDef::new("points", "POINTS", 7),
    ColumnDef::new("min_purchase", "MIN PURCHASE", 14),
    ColumnDef::new("ends", "ENDS", 11),
    ColumnDef::new("active", "ACTIVE", 7),
    ColumnDef::new("progress", "PROGRESS", 16),
];

const RECEIPT_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 32),
    ColumnDef::new("member", "MEMBER", 20),
    ColumnDef::new("campaign", "CAMPAIGN", 9),
    ColumnDef::new("amount", "AMOUNT", 14),
    ColumnDef::new("status", "STATUS", 9),
    ColumnDef::new("points", "POINTS", 7),
    ColumnDef::new("submitted", "SUBMITTED", 17),
];

const BOARD_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("rank", "RANK", 5),
    ColumnDef::new("member_id", "MEMBER", 9),
    ColumnDef::new("name", "NAME", 24),
    ColumnDef::new("points", "POINTS", 8),
    ColumnDef::new("receipts", "RECEIPTS", 9),
];

/// Run a loyalty subcommand
pub fn run(cmd: LoyaltyCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        LoyaltyCommands::Campaigns(args) => run_campaigns(args, global),
        LoyaltyCommands::Submit(args) => run_submit(args, global),
        LoyaltyCommands::Receipts(args) => run_receipts(args, global),
        LoyaltyCommands::Leaderboard(args) => run_leaderboard(args, global),
        LoyaltyCommands::Notify(args) => run_notify(args, global),
    }
}

/// Fixture receipts followed by the project's uploads
fn all_receipts(session: &Session) -> Result<Vec<Receipt>> {
    let mut receipts = session.catalog.loyalty.receipts.clone();
    if let Some(project) = &session.project {
        receipts.extend(Receipt::load_all(project)?);
    }
    Ok(receipts)
}

fn run_campaigns(args: CampaignsArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let receipts = all_receipts(&session)?;
    let today = Utc::now().date_naive();

    let campaigns: Vec<_> = session
        .catalog
        .loyalty
        .campaigns
        .iter()
        .filter(|c| !args.active || c.is_active_on(today))
        .collect();

    let format = session.format(global, OutputFormat::Tsv);
    if print_structured(&campaigns, format)? {
        return Ok(());
    }
    if campaigns.is_empty() {
        println!("No campaigns found.");
        return Ok(());
    }

    let rows = campaigns.iter().map(|c| {
        let progress = campaign_progress(c, &receipts);
        TableRow::new(&c.id)
            .cell("id", CellValue::Id(c.id.clone()))
            .cell("brand", CellValue::Text(c.brand.clone()))
            .cell("title", CellValue::Text(c.title.clone()))
            .cell("points", CellValue::Number(i64::from(c.points_per_receipt)))
            .cell("min_purchase", CellValue::Money(session.money(c.min_purchase)))
            .cell("ends", CellValue::Day(c.ends))
            .cell("active", CellValue::Flag(c.is_active_on(today)))
            .cell(
                "progress",
                CellValue::Text(format!(
                    "{}/{} ({:.0}%)",
                    progress.approved, progress.target, progress.percent
                )),
            )
    });
    TableFormatter::new(CAMPAIGN_COLUMNS, "campaign").output(rows, format);
    Ok(())
}

fn run_submit(args: SubmitArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let project = session.require_project()?;

    let receipt = submit_receipt(
        &session.catalog,
        ReceiptSubmission {
            campaign_id: args.campaign,
            member_id: args.member,
            amount: args.amount,
            image: args.image,
        },
        Utc::now(),
    )?;
    let path = receipt.save(project)?;

    let format = session.format(global, OutputFormat::Tsv);
    if print_structured(&receipt, format)? {
        return Ok(());
    }
    if format == OutputFormat::Id {
        println!("{}", receipt.id);
        return Ok(());
    }

    match receipt.status {
        ReceiptStatus::Approved => println!(
            "{} Receipt {} approved: {} point(s)",
            style("✓").green(),
            style(&receipt.id).cyan(),
            receipt.points
        ),
        _ => println!(
            "{} Receipt {} {}: {}",
            style("✗").red(),
            style(&receipt.id).cyan(),
            receipt.status,
            receipt.reason.as_deref().unwrap_or("no reason given")
        ),
    }
    println!("   {}", style(path.display()).dim());
    Ok(())
}

fn run_receipts(args: ReceiptsArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let mut receipts = all_receipts(&session)?;
    if let Some(member) = &args.member {
        receipts.retain(|r| r.member_id.eq_ignore_ascii_case(member.trim()));
    }
    if let Some(campaign) = &args.campaign {
        receipts.retain(|r| r.campaign_id.eq_ignore_ascii_case(campaign.trim()));
    }

    let format = session.format(global, OutputFormat::Tsv);
    if print_structured(&receipts, format)? {
        return Ok(());
    }
    if receipts.is_empty() {
        println!("No receipts found.");
        return Ok(());
    }

    let rows = receipts.iter().map(|r| {
        let member = session
            .catalog
            .member(&r.member_id)
            .map(|m| m.name.clone())
            .unwrap_or_else(|| r.member_id.clone());
        TableRow::new(&r.id)
            .cell("id", CellValue::Id(r.id.clone()))
            .cell("member", CellValue::Text(member))
            .cell("campaign", CellValue::Text(r.campaign_id.clone()))
            .cell("amount", CellValue::Money(session.money(r.amount)))
            .cell("status", CellValue::Status(r.status.to_string()))
            .cell("points", CellValue::Number(i64::from(r.points)))
            .cell("submitted", CellValue::DateTime(r.submitted))
    });
    TableFormatter::new(RECEIPT_COLUMNS, "receipt").output(rows, format);
    Ok(())
}

/// Campaign id checked against the catalog, or the overall board
fn board_for<'a>(session: &'a Session, campaign: Option<&str>) -> Result<(Option<&'a str>, String)> {
    match campaign {
        Some(id) => {
            let campaign = session
                .catalog
                .campaign(id)
                .ok_or_else(|| LoyaltyError::UnknownCampaign(id.trim().to_string()))?;
            Ok((Some(campaign.id.as_str()), campaign.title.clone()))
        }
        None => Ok((None, "Baskit".to_string())),
    }
}

fn run_leaderboard(args: LeaderboardArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let receipts = all_receipts(&session)?;
    let (campaign_id, title) = board_for(&session, args.campaign.as_deref())?;

    let mut entries = leaderboard(&session.catalog, &receipts, campaign_id);
    if let Some(limit) = args.limit {
        entries.truncate(limit);
    }

    let format = session.format(global, OutputFormat::Tsv);
    if print_structured(&entries, format)? {
        return Ok(());
    }
    if format == OutputFormat::Tsv && !global.quiet {
        println!("{} {}", style("Leaderboard:").bold(), style(&title).cyan());
        println!();
    }
    if entries.is_empty() {
        println!("No approved receipts yet.");
        return Ok(());
    }

    let rows = entries.iter().map(|e| {
        TableRow::new(&e.member_id)
            .cell("rank", CellValue::Number(e.rank as i64))
            .cell("member_id", CellValue::Id(e.member_id.clone()))
            .cell("name", CellValue::Text(e.member_name.clone()))
            .cell("points", CellValue::Number(i64::from(e.points)))
            .cell("receipts", CellValue::Number(e.receipts as i64))
    });
    TableFormatter::new(BOARD_COLUMNS, "member").output(rows, format);
    Ok(())
}

fn run_notify(args: NotifyArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let member = session
        .catalog
        .member(&args.member)
        .ok_or_else(|| LoyaltyError::UnknownMember(args.member.trim().to_string()))?;
    let receipts = all_receipts(&session)?;
    let (campaign_id, title) = board_for(&session, args.campaign.as_deref())?;

    let entries = leaderboard(&session.catalog, &receipts, campaign_id);
    let notice = notice_for(&entries, &member.id, &title).ok_or_else(|| {
        miette::miette!(
            help = "members appear on the board once a receipt is approved",
            "{} is not on the {} leaderboard",
            member.name,
            title
        )
    })?;

    let text = MessageRenderer::new()?.leaderboard_whatsapp(&notice)?;
    if !global.quiet {
        println!("{}", text);
        println!();
    }
    println!(
        "{}",
        whatsapp_link(&member.phone, session.config.country_code(), &text)
    );
    Ok(())
}
