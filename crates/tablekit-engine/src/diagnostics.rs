// Diagnostics module - categorized configuration problems
// A malformed rule degrades to "ignore this one rule"; it never raises.

use serde::Serialize;
use std::fmt;

/// Category of configuration problem detected during a pipeline recompute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// A condition or sort key references a column id that does not exist.
    UnknownColumn,
    /// A condition targets a column not flagged filterable.
    NotFilterable,
    /// A sort key targets a column not flagged sortable.
    NotSortable,
    /// A condition's operator is not supported by the column's value kind.
    OperatorMismatch,
    /// Page size of zero; pagination degrades to a single page.
    ZeroPageSize,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::UnknownColumn => write!(f, "unknown_column"),
            IssueKind::NotFilterable => write!(f, "not_filterable"),
            IssueKind::NotSortable => write!(f, "not_sortable"),
            IssueKind::OperatorMismatch => write!(f, "operator_mismatch"),
            IssueKind::ZeroPageSize => write!(f, "zero_page_size"),
        }
    }
}

/// One ignored configuration rule, with enough context to investigate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigIssue {
    pub kind: IssueKind,
    /// Column id the rule referenced, when one was involved.
    pub column_id: Option<String>,
    /// Human-readable description of what was ignored and why.
    pub detail: String,
}

impl ConfigIssue {
    pub fn new(kind: IssueKind, column_id: Option<&str>, detail: impl Into<String>) -> Self {
        Self {
            kind,
            column_id: column_id.map(str::to_string),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.column_id {
            Some(col) => write!(f, "{} ({}): {}", self.kind, col, self.detail),
            None => write!(f, "{}: {}", self.kind, self.detail),
        }
    }
}

/// Host-side receiver for configuration issues.
///
/// The orchestrator forwards every issue from the latest recompute, letting
/// the host route them into its own logging without the engine depending on
/// a logging facade.
pub trait DiagnosticsSink {
    fn report(&mut self, issue: &ConfigIssue);
}

/// Sink that keeps every reported issue, mostly useful in tests.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub issues: Vec<ConfigIssue>,
}

impl DiagnosticsSink for CollectingSink {
    fn report(&mut self, issue: &ConfigIssue) {
        self.issues.push(issue.clone());
    }
}
