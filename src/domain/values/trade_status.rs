use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeStatus {
    #[default]
    New,
    Confirmed,
    Cancelled,
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeStatus::New => write!(f, "NEW"),
            TradeStatus::Confirmed => write!(f, "CONFIRMED"),
            TradeStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

impl FromStr for TradeStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "NEW" => Ok(TradeStatus::New),
            "CONFIRMED" => Ok(TradeStatus::Confirmed),
            "CANCELLED" => Ok(TradeStatus::Cancelled),
            _ => Err(format!("Unknown trade status: {s}")),
        }
    }
}
