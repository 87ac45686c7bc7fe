// Leave module
// A recorded absence on a single day

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::PlannerError;

/// Portion of the day taken as leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveKind {
    Full,
    Morning,
    Afternoon,
}

impl LeaveKind {
    /// Contribution to the yearly leave count.
    pub fn weight(self) -> f64 {
        match self {
            LeaveKind::Full => 1.0,
            LeaveKind::Morning | LeaveKind::Afternoon => 0.5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LeaveKind::Full => "full",
            LeaveKind::Morning => "morning",
            LeaveKind::Afternoon => "afternoon",
        }
    }
}

impl fmt::Display for LeaveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeaveKind {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "full" => Ok(LeaveKind::Full),
            "morning" => Ok(LeaveKind::Morning),
            "afternoon" => Ok(LeaveKind::Afternoon),
            other => Err(PlannerError::validation(format!(
                "type must be full, morning, or afternoon (got '{}')",
                other
            ))),
        }
    }
}

/// At most one leave exists per date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leave {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: LeaveKind,
}
