use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(format!("Unknown sort direction: {}", s)),
        }
    }
}

/// One (column, direction, priority) triple contributing to a multi-column
/// ordering. Lower priority compares first.
///
/// At most one key per column is active at a time; pushing a key for a
/// column that already has one replaces it in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortKey {
    pub column_id: String,
    pub direction: SortDirection,
    #[serde(default)]
    pub priority: u32,
}

impl SortKey {
    pub fn asc(column_id: impl Into<String>) -> Self {
        Self {
            column_id: column_id.into(),
            direction: SortDirection::Asc,
            priority: 0,
        }
    }

    pub fn desc(column_id: impl Into<String>) -> Self {
        Self {
            column_id: column_id.into(),
            direction: SortDirection::Desc,
            priority: 0,
        }
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }
}
