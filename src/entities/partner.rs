//! Partner portal entities - trading partners and their transactions

use serde::{Deserialize, Serialize};

/// Partner tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartnerTier {
    Gold,
    Silver,
    #[default]
    Bronze,
}

impl std::fmt::Display for PartnerTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartnerTier::Gold => write!(f, "gold"),
            PartnerTier::Silver => write!(f, "silver"),
            PartnerTier::Bronze => write!(f, "bronze"),
        }
    }
}

/// A trading partner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partner {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub tier: PartnerTier,

    #[serde(default)]
    pub verified: bool,

    /// Years since onboarding (fractional)
    pub years_active: f64,

    pub credit_limit: f64,

    #[serde(default)]
    pub outstanding: f64,

    #[serde(default)]
    pub late_payments: u32,
}

impl Partner {
    /// Credit left before the limit, never negative
    pub fn remaining_credit(&self) -> f64 {
        (self.credit_limit - self.outstanding).max(0.0)
    }
}

/// A partner transaction awaiting a risk decision
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub partner_id: String,
    pub amount: f64,

    #[serde(default)]
    pub cross_border: bool,

    #[serde(default)]
    pub new_device: bool,
}
