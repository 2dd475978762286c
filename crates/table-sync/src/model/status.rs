//! Order status of a table.

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Where a table's order currently stands.
///
/// The set is closed; no transition graph is enforced, so any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableStatus {
    #[default]
    Idle,
    Placed,
    Processing,
    Delivered,
}

impl TableStatus {
    pub const ALL: [TableStatus; 4] = [
        TableStatus::Idle,
        TableStatus::Placed,
        TableStatus::Processing,
        TableStatus::Delivered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TableStatus::Idle => "idle",
            TableStatus::Placed => "placed",
            TableStatus::Processing => "processing",
            TableStatus::Delivered => "delivered",
        }
    }

    /// Numeric code the signalling device understands (one indicator per status).
    pub fn signal_code(&self) -> u8 {
        match self {
            TableStatus::Idle => 0,
            TableStatus::Placed => 1,
            TableStatus::Processing => 2,
            TableStatus::Delivered => 3,
        }
    }
}

impl Display for TableStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the four status names.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unknown status '{0}' (expected idle, placed, processing or delivered)")]
pub struct UnknownStatus(pub String);

impl FromStr for TableStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TableStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}
