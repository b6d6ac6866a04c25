//! Loyalty marketplace: receipt review, leaderboards and campaign progress

use chrono::{DateTime, NaiveDate, Utc};
use miette::Diagnostic;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

use crate::core::catalog::Catalog;
use crate::core::identity::{EntityId, EntityPrefix};
use crate::entities::{Campaign, Receipt, ReceiptStatus};
use crate::messaging::templates::LeaderboardNotice;

/// Errors submitting a receipt
#[derive(Debug, Error, Diagnostic)]
pub enum LoyaltyError {
    #[error("member '{0}' not found")]
    #[diagnostic(code(baskit::loyalty::unknown_member))]
    UnknownMember(String),

    #[error("campaign '{0}' not found")]
    #[diagnostic(
        code(baskit::loyalty::unknown_campaign),
        help("run `baskit loyalty campaigns` to list campaigns")
    )]
    UnknownCampaign(String),

    #[error("campaign '{id}' is not running on {today} (runs {starts} to {ends})")]
    #[diagnostic(code(baskit::loyalty::campaign_inactive))]
    CampaignInactive {
        id: String,
        today: NaiveDate,
        starts: NaiveDate,
        ends: NaiveDate,
    },

    #[error("receipt amount must be a non-negative number, got {0}")]
    #[diagnostic(code(baskit::loyalty::invalid_amount))]
    InvalidAmount(f64),
}

/// A receipt as uploaded, before review
#[derive(Debug, Clone)]
pub struct ReceiptSubmission {
    pub campaign_id: String,
    pub member_id: String,
    pub amount: f64,
    pub image: Option<String>,
}

/// Review an uploaded receipt
///
/// Unknown member or campaign and inactive campaigns are errors. Amounts
/// under the campaign minimum produce a rejected receipt worth no points.
pub fn submit_receipt(
    catalog: &Catalog,
    submission: ReceiptSubmission,
    now: DateTime<Utc>,
) -> Result<Receipt, LoyaltyError> {
    if !submission.amount.is_finite() || submission.amount < 0.0 {
        return Err(LoyaltyError::InvalidAmount(submission.amount));
    }

    let member = catalog
        .member(&submission.member_id)
        .ok_or_else(|| LoyaltyError::UnknownMember(submission.member_id.clone()))?;
    let campaign = catalog
        .campaign(&submission.campaign_id)
        .ok_or_else(|| LoyaltyError::UnknownCampaign(submission.campaign_id.clone()))?;

    let today = now.date_naive();
    if !campaign.is_active_on(today) {
        return Err(LoyaltyError::CampaignInactive {
            id: campaign.id.clone(),
            today,
            starts: campaign.starts,
            ends: campaign.ends,
        });
    }

    let (status, reason, points) = if submission.amount < campaign.min_purchase {
        (
            ReceiptStatus::Rejected,
            Some(format!(
                "amount {} is below the campaign minimum of {}",
                submission.amount, campaign.min_purchase
            )),
            0,
        )
    } else {
        (ReceiptStatus::Approved, None, campaign.points_per_receipt)
    };

    let receipt = Receipt {
        id: EntityId::new(EntityPrefix::Rcpt).to_string(),
        campaign_id: campaign.id.clone(),
        member_id: member.id.clone(),
        amount: submission.amount,
        image: submission.image,
        submitted: now,
        status,
        reason,
        points,
    };
    tracing::info!(
        id = %receipt.id,
        member = %receipt.member_id,
        campaign = %receipt.campaign_id,
        status = %receipt.status,
        "receipt reviewed"
    );
    Ok(receipt)
}

/// One leaderboard row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    /// Competition rank: ties share a rank and the next rank is skipped
    pub rank: usize,
    pub member_id: String,
    pub member_name: String,
    pub points: u32,
    pub receipts: usize,
}

/// Rank members by points from approved receipts
///
/// Ordered by points, then receipt count (both descending), then member
/// name. Members with equal points and receipt count share a rank.
pub fn leaderboard(
    catalog: &Catalog,
    receipts: &[Receipt],
    campaign_id: Option<&str>,
) -> Vec<LeaderboardEntry> {
    let mut totals: HashMap<String, (u32, usize)> = HashMap::new();

    for receipt in receipts
        .iter()
        .filter(|r| r.status == ReceiptStatus::Approved)
        .filter(|r| campaign_id.map_or(true, |id| r.campaign_id.eq_ignore_ascii_case(id.trim())))
    {
        let entry = totals.entry(receipt.member_id.clone()).or_default();
        entry.0 += receipt.points;
        entry.1 += 1;
    }

    let mut entries: Vec<LeaderboardEntry> = totals
        .into_iter()
        .map(|(member_id, (points, count))| LeaderboardEntry {
            rank: 0,
            member_name: catalog
                .member(&member_id)
                .map(|m| m.name.clone())
                .unwrap_or_else(|| member_id.clone()),
            member_id,
            points,
            receipts: count,
        })
        .collect();

    entries.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then_with(|| b.receipts.cmp(&a.receipts))
            .then_with(|| a.member_name.cmp(&b.member_name))
            .then_with(|| a.member_id.cmp(&b.member_id))
    });

    for i in 0..entries.len() {
        entries[i].rank = if i > 0
            && entries[i].points == entries[i - 1].points
            && entries[i].receipts == entries[i - 1].receipts
        {
            entries[i - 1].rank
        } else {
            i + 1
        };
    }

    entries
}

/// Standing message data for one member, `None` if they are not ranked
pub fn notice_for(
    entries: &[LeaderboardEntry],
    member_id: &str,
    board_title: &str,
) -> Option<LeaderboardNotice> {
    let entry = entries
        .iter()
        .find(|e| e.member_id.eq_ignore_ascii_case(member_id.trim()))?;
    let gap = entries
        .iter()
        .rev()
        .find(|e| e.rank < entry.rank)
        .map_or(0, |ahead| ahead.points.saturating_sub(entry.points));

    Some(LeaderboardNotice {
        member_name: entry.member_name.clone(),
        board_title: board_title.to_string(),
        rank: entry.rank,
        points: entry.points,
        receipts: entry.receipts,
        gap,
    })
}

/// Approved receipts against a campaign's target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignProgress {
    pub approved: usize,
    pub target: u32,

    /// Share of the target reached, clamped to 0..=100
    pub percent: f64,
}

pub fn campaign_progress(campaign: &Campaign, receipts: &[Receipt]) -> CampaignProgress {
    let approved = receipts
        .iter()
        .filter(|r| r.status == ReceiptStatus::Approved)
        .filter(|r| r.campaign_id.eq_ignore_ascii_case(&campaign.id))
        .count();

    let percent = if campaign.target_receipts == 0 {
        100.0
    } else {
        (approved as f64 / f64::from(campaign.target_receipts) * 100.0).clamp(0.0, 100.0)
    };

    CampaignProgress {
        approved,
        target: campaign.target_receipts,
        percent,
    }
}
