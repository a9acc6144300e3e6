use crate::value::CellValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Predicate operator of a filter condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    Equals,
    Contains,
    StartsWith,
    EndsWith,
    Gt,
    Lt,
    Gte,
    Lte,
    Between,
    In,
    NotIn,
}

impl FromStr for FilterOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "equals" => Ok(FilterOperator::Equals),
            "contains" => Ok(FilterOperator::Contains),
            "startsWith" => Ok(FilterOperator::StartsWith),
            "endsWith" => Ok(FilterOperator::EndsWith),
            "gt" => Ok(FilterOperator::Gt),
            "lt" => Ok(FilterOperator::Lt),
            "gte" => Ok(FilterOperator::Gte),
            "lte" => Ok(FilterOperator::Lte),
            "between" => Ok(FilterOperator::Between),
            "in" => Ok(FilterOperator::In),
            "notIn" => Ok(FilterOperator::NotIn),
            _ => Err(format!("Unknown filter operator: {}", s)),
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterOperator::Equals => "equals",
            FilterOperator::Contains => "contains",
            FilterOperator::StartsWith => "startsWith",
            FilterOperator::EndsWith => "endsWith",
            FilterOperator::Gt => "gt",
            FilterOperator::Lt => "lt",
            FilterOperator::Gte => "gte",
            FilterOperator::Lte => "lte",
            FilterOperator::Between => "between",
            FilterOperator::In => "in",
            FilterOperator::NotIn => "notIn",
        };
        write!(f, "{}", name)
    }
}

/// Primary operand of a condition: a single value, or a value list for the
/// membership operators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operand {
    One(CellValue),
    Many(Vec<CellValue>),
}

impl Operand {
    /// An empty operand deactivates its condition (the "clear one filter"
    /// interaction relies on this).
    pub fn is_empty(&self) -> bool {
        match self {
            Operand::One(CellValue::Null) => true,
            Operand::One(CellValue::Text(s)) => s.is_empty(),
            Operand::One(_) => false,
            Operand::Many(values) => values.is_empty(),
        }
    }

    pub fn as_one(&self) -> Option<&CellValue> {
        match self {
            Operand::One(v) => Some(v),
            Operand::Many(_) => None,
        }
    }

    pub fn as_many(&self) -> Option<&[CellValue]> {
        match self {
            Operand::Many(values) => Some(values),
            Operand::One(_) => None,
        }
    }
}

impl From<CellValue> for Operand {
    fn from(v: CellValue) -> Self {
        Operand::One(v)
    }
}

impl From<&str> for Operand {
    fn from(s: &str) -> Self {
        Operand::One(s.into())
    }
}

impl From<String> for Operand {
    fn from(s: String) -> Self {
        Operand::One(s.into())
    }
}

impl From<f64> for Operand {
    fn from(n: f64) -> Self {
        Operand::One(n.into())
    }
}

impl From<i64> for Operand {
    fn from(n: i64) -> Self {
        Operand::One(n.into())
    }
}

impl From<i32> for Operand {
    fn from(n: i32) -> Self {
        Operand::One(n.into())
    }
}

impl From<bool> for Operand {
    fn from(b: bool) -> Self {
        Operand::One(b.into())
    }
}

impl From<Vec<CellValue>> for Operand {
    fn from(values: Vec<CellValue>) -> Self {
        Operand::Many(values)
    }
}

/// One predicate rule narrowing the visible rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub column_id: String,
    pub operator: FilterOperator,
    pub operand: Operand,
    /// Upper bound for `between`; unused by every other operator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<CellValue>,
}

impl FilterCondition {
    pub fn new(
        column_id: impl Into<String>,
        operator: FilterOperator,
        operand: impl Into<Operand>,
    ) -> Self {
        Self {
            column_id: column_id.into(),
            operator,
            operand: operand.into(),
            upper: None,
        }
    }

    /// Inclusive range condition: `lo <= value <= hi`.
    pub fn between(
        column_id: impl Into<String>,
        lo: impl Into<CellValue>,
        hi: impl Into<CellValue>,
    ) -> Self {
        Self {
            column_id: column_id.into(),
            operator: FilterOperator::Between,
            operand: Operand::One(lo.into()),
            upper: Some(hi.into()),
        }
    }

    /// Membership condition: value must be one of `values`.
    pub fn any_of(
        column_id: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<CellValue>>,
    ) -> Self {
        Self {
            column_id: column_id.into(),
            operator: FilterOperator::In,
            operand: Operand::Many(values.into_iter().map(Into::into).collect()),
            upper: None,
        }
    }

    /// Exclusion condition: value must not be one of `values`.
    pub fn none_of(
        column_id: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<CellValue>>,
    ) -> Self {
        Self {
            column_id: column_id.into(),
            operator: FilterOperator::NotIn,
            operand: Operand::Many(values.into_iter().map(Into::into).collect()),
            upper: None,
        }
    }

    /// A condition with an empty primary operand constrains nothing.
    pub fn is_active(&self) -> bool {
        !self.operand.is_empty()
    }
}
