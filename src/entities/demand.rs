//! Distributor demand - a posted procurement need

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Demand lifecycle status (fixed at fixture time)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemandStatus {
    #[default]
    Open,
    Quoted,
    Awarded,
    Closed,
}

impl std::fmt::Display for DemandStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DemandStatus::Open => write!(f, "open"),
            DemandStatus::Quoted => write!(f, "quoted"),
            DemandStatus::Awarded => write!(f, "awarded"),
            DemandStatus::Closed => write!(f, "closed"),
        }
    }
}

impl std::str::FromStr for DemandStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(DemandStatus::Open),
            "quoted" => Ok(DemandStatus::Quoted),
            "awarded" => Ok(DemandStatus::Awarded),
            "closed" => Ok(DemandStatus::Closed),
            _ => Err(format!(
                "Invalid demand status: {}. Use open, quoted, awarded or closed",
                s
            )),
        }
    }
}

/// A distributor's posted need
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributorDemand {
    pub id: String,
    pub distributor: String,
    pub product: String,
    pub quantity: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_price: Option<f64>,

    pub location: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,

    #[serde(default)]
    pub status: DemandStatus,
}
