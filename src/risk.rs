//! Transaction risk scoring for the partner portal
//!
//! A score starts at 100, loses a flat deduction per risk factor, gains one
//! jitter term and is clamped into `0..=100`. The random source is passed in
//! so scores are reproducible under a seeded generator.

use rand::Rng;
use serde::Serialize;

use crate::entities::{Partner, Transaction};

pub const BASE_SCORE: i32 = 100;

pub const UNVERIFIED_DEDUCTION: u32 = 20;
pub const OVER_CREDIT_DEDUCTION: u32 = 25;
pub const NEW_PARTNER_DEDUCTION: u32 = 10;
pub const CROSS_BORDER_DEDUCTION: u32 = 15;
pub const NEW_DEVICE_DEDUCTION: u32 = 10;
pub const LATE_PAYMENT_DEDUCTION: u32 = 5;
pub const LATE_PAYMENT_CAP: u32 = 20;

/// Jitter is drawn uniformly from `-JITTER..=JITTER`
pub const JITTER: i32 = 3;

/// Risk level thresholds
pub const LOW_RISK_MIN: u8 = 70;
pub const MEDIUM_RISK_MIN: u8 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_score(score: u8) -> Self {
        if score >= LOW_RISK_MIN {
            RiskLevel::Low
        } else if score >= MEDIUM_RISK_MIN {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}

/// One applied deduction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskFactor {
    pub label: String,
    pub deduction: u32,
}

impl RiskFactor {
    fn new(label: impl Into<String>, deduction: u32) -> Self {
        Self {
            label: label.into(),
            deduction,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub transaction_id: String,
    pub partner_id: String,
    pub factors: Vec<RiskFactor>,
    pub jitter: i32,
    pub score: u8,
    pub level: RiskLevel,
}

impl RiskAssessment {
    pub fn total_deduction(&self) -> u32 {
        self.factors.iter().map(|f| f.deduction).sum()
    }
}

/// Deductions that apply to `txn` from `partner`, in a fixed order
pub fn risk_factors(partner: &Partner, txn: &Transaction) -> Vec<RiskFactor> {
    let mut factors = Vec::new();

    if !partner.verified {
        factors.push(RiskFactor::new("unverified partner", UNVERIFIED_DEDUCTION));
    }
    if txn.amount > partner.remaining_credit() {
        factors.push(RiskFactor::new("amount exceeds remaining credit", OVER_CREDIT_DEDUCTION));
    }
    if partner.years_active < 1.0 {
        factors.push(RiskFactor::new("active less than one year", NEW_PARTNER_DEDUCTION));
    }
    if txn.cross_border {
        factors.push(RiskFactor::new("cross-border transaction", CROSS_BORDER_DEDUCTION));
    }
    if txn.new_device {
        factors.push(RiskFactor::new("new device", NEW_DEVICE_DEDUCTION));
    }
    if partner.late_payments > 0 {
        let deduction = partner
            .late_payments
            .saturating_mul(LATE_PAYMENT_DEDUCTION)
            .min(LATE_PAYMENT_CAP);
        factors.push(RiskFactor::new(
            format!("{} late payment(s)", partner.late_payments),
            deduction,
        ));
    }

    factors
}

/// Score `txn` with one jitter draw from `rng`
pub fn assess<R: Rng>(partner: &Partner, txn: &Transaction, rng: &mut R) -> RiskAssessment {
    let factors = risk_factors(partner, txn);
    let deducted: u32 = factors.iter().map(|f| f.deduction).sum();
    let jitter = rng.random_range(-JITTER..=JITTER);

    let raw = BASE_SCORE - deducted as i32 + jitter;
    let score = raw.clamp(0, 100) as u8;
    let level = RiskLevel::from_score(score);

    tracing::debug!(
        txn = %txn.id,
        partner = %partner.id,
        deducted,
        jitter,
        score,
        %level,
        "transaction scored"
    );

    RiskAssessment {
        transaction_id: txn.id.clone(),
        partner_id: partner.id.clone(),
        factors,
        jitter,
        score,
        level,
    }
}
