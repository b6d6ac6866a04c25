//! Loyalty marketplace entities - brand campaigns, members and receipts

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::EntityPrefix;

/// A brand campaign rewarding receipt uploads with points
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: String,
    pub brand: String,
    pub title: String,

    /// Products that qualify, for display
    #[serde(default)]
    pub product_keywords: Vec<String>,

    pub points_per_receipt: u32,

    /// Minimum receipt amount to earn points
    pub min_purchase: f64,

    pub starts: NaiveDate,
    pub ends: NaiveDate,

    /// Approved receipts the brand aims for
    pub target_receipts: u32,
}

impl Campaign {
    /// Active on `day` when `starts <= day <= ends`
    pub fn is_active_on(&self, day: NaiveDate) -> bool {
        self.starts <= day && day <= self.ends
    }
}

/// A loyalty member (store owner)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: String,
    pub phone: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<String>,
}

/// Receipt review status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for ReceiptStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReceiptStatus::Pending => write!(f, "pending"),
            ReceiptStatus::Approved => write!(f, "approved"),
            ReceiptStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// An uploaded purchase receipt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    pub id: String,
    pub campaign_id: String,
    pub member_id: String,
    pub amount: f64,

    /// Path of the uploaded image, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    pub submitted: DateTime<Utc>,

    #[serde(default)]
    pub status: ReceiptStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(default)]
    pub points: u32,
}

impl Entity for Receipt {
    const PREFIX: EntityPrefix = EntityPrefix::Rcpt;

    fn record_id(&self) -> String {
        self.id.clone()
    }

    fn created(&self) -> DateTime<Utc> {
        self.submitted
    }
}
