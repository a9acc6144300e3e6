use crate::filter::{FilterCondition, FilterOperator};
use crate::row::Row;
use crate::value::CellValue;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Declared value type of a column. Drives operator support checking and
/// coercion for `equals`-style comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Text,
    Number,
    Date,
    Bool,
    Select,
}

impl ValueKind {
    /// Whether a filter operator makes sense for this column kind.
    ///
    /// Conditions using an unsupported operator are ignored by the filter
    /// stage and reported as a configuration issue, never raised.
    pub fn supports(&self, op: FilterOperator) -> bool {
        use FilterOperator::*;
        match self {
            ValueKind::Text => true,
            ValueKind::Number | ValueKind::Date => {
                matches!(op, Equals | Gt | Lt | Gte | Lte | Between | In | NotIn)
            }
            ValueKind::Bool => matches!(op, Equals | In | NotIn),
            ValueKind::Select => {
                matches!(op, Equals | Contains | StartsWith | EndsWith | In | NotIn)
            }
        }
    }
}

impl FromStr for ValueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(ValueKind::Text),
            "number" => Ok(ValueKind::Number),
            "date" => Ok(ValueKind::Date),
            "bool" | "boolean" => Ok(ValueKind::Bool),
            "select" => Ok(ValueKind::Select),
            _ => Err(format!("Unknown value kind: {}", s)),
        }
    }
}

/// Custom field accessor, for rows whose display value is derived rather
/// than stored under a single field.
pub type AccessorFn = Arc<dyn Fn(&Row) -> CellValue + Send + Sync>;

/// Custom comparator override for the sort stage. Only consulted for pairs
/// of non-null values; the nulls-last policy is fixed.
pub type CompareFn = Arc<dyn Fn(&CellValue, &CellValue) -> Ordering + Send + Sync>;

/// Custom filter predicate override, the escape hatch for value types the
/// built-in operator set cannot express.
pub type PredicateFn = Arc<dyn Fn(&CellValue, &FilterCondition) -> bool + Send + Sync>;

/// Metadata describing one field of a row and the capabilities it supports.
#[derive(Clone)]
pub struct ColumnDescriptor {
    pub id: String,
    pub field: String,
    pub kind: ValueKind,
    pub sortable: bool,
    pub filterable: bool,
    pub searchable: bool,
    pub editable: bool,
    accessor: Option<AccessorFn>,
    comparator: Option<CompareFn>,
    predicate: Option<PredicateFn>,
}

impl ColumnDescriptor {
    /// New column reading the field named by `id`, with sort/filter/search
    /// enabled and editing disabled.
    pub fn new(id: impl Into<String>, kind: ValueKind) -> Self {
        let id = id.into();
        Self {
            field: id.clone(),
            id,
            kind,
            sortable: true,
            filterable: true,
            searchable: true,
            editable: false,
            accessor: None,
            comparator: None,
            predicate: None,
        }
    }

    /// Read from a field whose name differs from the column id.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    pub fn sortable(mut self, yes: bool) -> Self {
        self.sortable = yes;
        self
    }

    pub fn filterable(mut self, yes: bool) -> Self {
        self.filterable = yes;
        self
    }

    pub fn searchable(mut self, yes: bool) -> Self {
        self.searchable = yes;
        self
    }

    pub fn editable(mut self, yes: bool) -> Self {
        self.editable = yes;
        self
    }

    pub fn with_accessor(mut self, accessor: AccessorFn) -> Self {
        self.accessor = Some(accessor);
        self
    }

    pub fn with_comparator(mut self, comparator: CompareFn) -> Self {
        self.comparator = Some(comparator);
        self
    }

    pub fn with_predicate(mut self, predicate: PredicateFn) -> Self {
        self.predicate = Some(predicate);
        self
    }

    /// Evaluate this column on a row.
    pub fn value(&self, row: &Row) -> CellValue {
        match &self.accessor {
            Some(accessor) => accessor(row),
            None => row.get(&self.field).clone(),
        }
    }

    pub fn comparator(&self) -> Option<&CompareFn> {
        self.comparator.as_ref()
    }

    pub fn predicate(&self) -> Option<&PredicateFn> {
        self.predicate.as_ref()
    }
}

impl fmt::Debug for ColumnDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("id", &self.id)
            .field("field", &self.field)
            .field("kind", &self.kind)
            .field("sortable", &self.sortable)
            .field("filterable", &self.filterable)
            .field("searchable", &self.searchable)
            .field("editable", &self.editable)
            .field("accessor", &self.accessor.is_some())
            .field("comparator", &self.comparator.is_some())
            .field("predicate", &self.predicate.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_column_reads_its_id_field() {
        let col = ColumnDescriptor::new("name", ValueKind::Text);
        let row = Row::new().with("name", "Ada");
        assert_eq!(col.value(&row), CellValue::from("Ada"));
    }

    #[test]
    fn custom_accessor_wins_over_field_lookup() {
        let col = ColumnDescriptor::new("full_name", ValueKind::Text).with_accessor(Arc::new(
            |row: &Row| {
                CellValue::Text(format!(
                    "{} {}",
                    row.get("first").display_text(),
                    row.get("last").display_text()
                ))
            },
        ));
        let row = Row::new().with("first", "Ada").with("last", "Lovelace");
        assert_eq!(col.value(&row), CellValue::from("Ada Lovelace"));
    }

    #[test]
    fn bool_columns_reject_range_operators() {
        assert!(ValueKind::Bool.supports(FilterOperator::Equals));
        assert!(!ValueKind::Bool.supports(FilterOperator::Gt));
        assert!(!ValueKind::Bool.supports(FilterOperator::Contains));
    }

    #[test]
    fn number_columns_reject_string_operators() {
        assert!(ValueKind::Number.supports(FilterOperator::Between));
        assert!(!ValueKind::Number.supports(FilterOperator::StartsWith));
    }
}
