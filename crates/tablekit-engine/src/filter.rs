use crate::diagnostics::{ConfigIssue, IssueKind};
use chrono::{DateTime, Utc};
use tablekit_types::{CellValue, ColumnDescriptor, FilterCondition, FilterOperator, Row, ValueKind};

/// Reduce `rows` by applying every active condition, combined with AND.
///
/// Inactive conditions (empty primary operand) constrain nothing. Malformed
/// conditions - unknown column, non-filterable column, operator the column
/// kind does not support - are ignored and recorded in `issues`, so one bad
/// rule cannot stall an otherwise valid table.
pub fn filter_rows(
    rows: &[Row],
    conditions: &[FilterCondition],
    columns: &[ColumnDescriptor],
    issues: &mut Vec<ConfigIssue>,
) -> Vec<Row> {
    let active = resolve_conditions(conditions, columns, issues);
    if active.is_empty() {
        return rows.to_vec();
    }

    rows.iter()
        .filter(|row| active.iter().all(|(cond, col)| matches(col, cond, row)))
        .cloned()
        .collect()
}

fn resolve_conditions<'a>(
    conditions: &'a [FilterCondition],
    columns: &'a [ColumnDescriptor],
    issues: &mut Vec<ConfigIssue>,
) -> Vec<(&'a FilterCondition, &'a ColumnDescriptor)> {
    let mut active = Vec::new();
    for cond in conditions {
        if !cond.is_active() {
            continue;
        }
        let Some(col) = columns.iter().find(|c| c.id == cond.column_id) else {
            issues.push(ConfigIssue::new(
                IssueKind::UnknownColumn,
                Some(&cond.column_id),
                format!("filter condition references unknown column {}", cond.column_id),
            ));
            continue;
        };
        if !col.filterable {
            issues.push(ConfigIssue::new(
                IssueKind::NotFilterable,
                Some(&col.id),
                format!("column {} is not filterable", col.id),
            ));
            continue;
        }
        if !col.kind.supports(cond.operator) {
            issues.push(ConfigIssue::new(
                IssueKind::OperatorMismatch,
                Some(&col.id),
                format!(
                    "operator {} is not supported by {:?} column {}",
                    cond.operator, col.kind, col.id
                ),
            ));
            continue;
        }
        if cond.operator == FilterOperator::Between && cond.upper.is_none() {
            issues.push(ConfigIssue::new(
                IssueKind::OperatorMismatch,
                Some(&col.id),
                "between condition is missing its upper bound".to_string(),
            ));
            continue;
        }
        active.push((cond, col));
    }
    active
}

fn matches(col: &ColumnDescriptor, cond: &FilterCondition, row: &Row) -> bool {
    let value = col.value(row);

    // Escape hatch for value types the built-in operators cannot express.
    if let Some(predicate) = col.predicate() {
        return predicate(&value, cond);
    }

    match cond.operator {
        FilterOperator::Equals => cond
            .operand
            .as_one()
            .is_some_and(|operand| equals_coerced(&value, operand, col.kind)),
        FilterOperator::Contains | FilterOperator::StartsWith | FilterOperator::EndsWith => {
            let Some(operand) = cond.operand.as_one() else {
                return false;
            };
            let haystack = value.display_text().to_lowercase();
            let needle = operand.display_text().to_lowercase();
            match cond.operator {
                FilterOperator::Contains => haystack.contains(&needle),
                FilterOperator::StartsWith => haystack.starts_with(&needle),
                _ => haystack.ends_with(&needle),
            }
        }
        FilterOperator::Gt | FilterOperator::Lt | FilterOperator::Gte | FilterOperator::Lte => {
            // Non-numeric cell values fail the predicate rather than raising.
            let (Some(v), Some(a)) = (
                value.to_number(),
                cond.operand.as_one().and_then(CellValue::to_number),
            ) else {
                return false;
            };
            match cond.operator {
                FilterOperator::Gt => v > a,
                FilterOperator::Lt => v < a,
                FilterOperator::Gte => v >= a,
                _ => v <= a,
            }
        }
        FilterOperator::Between => {
            let (Some(v), Some(lo), Some(hi)) = (
                value.to_number(),
                cond.operand.as_one().and_then(CellValue::to_number),
                cond.upper.as_ref().and_then(CellValue::to_number),
            ) else {
                return false;
            };
            lo <= v && v <= hi
        }
        FilterOperator::In => in_list(&value, cond, col.kind),
        FilterOperator::NotIn => !in_list(&value, cond, col.kind),
    }
}

fn in_list(value: &CellValue, cond: &FilterCondition, kind: ValueKind) -> bool {
    match &cond.operand {
        tablekit_types::Operand::Many(list) => {
            list.iter().any(|item| equals_coerced(value, item, kind))
        }
        // A single operand reads as a one-element list.
        tablekit_types::Operand::One(item) => equals_coerced(value, item, kind),
    }
}

/// Strict equality after coercion appropriate to the column's declared kind.
fn equals_coerced(value: &CellValue, operand: &CellValue, kind: ValueKind) -> bool {
    match kind {
        ValueKind::Number => match (value.to_number(), operand.to_number()) {
            (Some(v), Some(a)) => v == a,
            _ => false,
        },
        ValueKind::Date => match (coerce_date(value), coerce_date(operand)) {
            (Some(v), Some(a)) => v == a,
            _ => false,
        },
        ValueKind::Bool => match (coerce_bool(value), coerce_bool(operand)) {
            (Some(v), Some(a)) => v == a,
            _ => false,
        },
        ValueKind::Text | ValueKind::Select => {
            !value.is_null() && value.display_text() == operand.display_text()
        }
    }
}

fn coerce_date(value: &CellValue) -> Option<DateTime<Utc>> {
    match value {
        CellValue::Date(d) => Some(*d),
        CellValue::Text(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|d| d.with_timezone(&Utc)),
        _ => None,
    }
}

fn coerce_bool(value: &CellValue) -> Option<bool> {
    match value {
        CellValue::Bool(b) => Some(*b),
        CellValue::Text(s) => match s.as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tablekit_types::Operand;

    fn columns() -> Vec<ColumnDescriptor> {
        vec![
            ColumnDescriptor::new("name", ValueKind::Text),
            ColumnDescriptor::new("department", ValueKind::Select),
            ColumnDescriptor::new("salary", ValueKind::Number),
            ColumnDescriptor::new("active", ValueKind::Bool),
        ]
    }

    fn staff() -> Vec<Row> {
        vec![
            Row::new()
                .with("name", "Ada")
                .with("department", "Engineering")
                .with("salary", 55000)
                .with("active", true),
            Row::new()
                .with("name", "Brian")
                .with("department", "Engineering")
                .with("salary", 62000)
                .with("active", false),
            Row::new()
                .with("name", "Carol")
                .with("department", "Sales")
                .with("salary", 75000)
                .with("active", true),
            Row::new()
                .with("name", "Dave")
                .with("department", "Sales")
                .with("salary", 90000)
                .with("active", true),
        ]
    }

    #[test]
    fn conditions_combine_with_and() {
        let conds = vec![
            FilterCondition::new("department", FilterOperator::Equals, "Sales"),
            FilterCondition::new("active", FilterOperator::Equals, true),
        ];
        let mut issues = Vec::new();
        let out = filter_rows(&staff(), &conds, &columns(), &mut issues);
        assert_eq!(out.len(), 2);
        assert!(issues.is_empty());
    }

    #[test]
    fn empty_operand_is_a_no_op() {
        let conds = vec![FilterCondition::new("name", FilterOperator::Contains, "")];
        let mut issues = Vec::new();
        let out = filter_rows(&staff(), &conds, &columns(), &mut issues);
        assert_eq!(out.len(), 4);
        assert!(issues.is_empty());
    }

    #[test]
    fn between_is_inclusive_on_both_ends() {
        let conds = vec![FilterCondition::between("salary", 62000, 75000)];
        let mut issues = Vec::new();
        let out = filter_rows(&staff(), &conds, &columns(), &mut issues);
        let names: Vec<String> = out.iter().map(|r| r.get("name").display_text()).collect();
        assert_eq!(names, vec!["Brian", "Carol"]);
    }

    #[test]
    fn numeric_operator_on_non_numeric_value_excludes_the_row() {
        let mut rows = staff();
        rows.push(
            Row::new()
                .with("name", "Eve")
                .with("department", "Sales")
                .with("salary", "confidential"),
        );
        let conds = vec![FilterCondition::new("salary", FilterOperator::Gt, 0)];
        let mut issues = Vec::new();
        let out = filter_rows(&rows, &conds, &columns(), &mut issues);
        assert_eq!(out.len(), 4);
        assert!(!out.iter().any(|r| r.get("name").display_text() == "Eve"));
    }

    #[test]
    fn membership_operators() {
        let conds = vec![FilterCondition::any_of("name", ["Ada", "Dave"])];
        let mut issues = Vec::new();
        let out = filter_rows(&staff(), &conds, &columns(), &mut issues);
        assert_eq!(out.len(), 2);

        let conds = vec![FilterCondition::none_of("name", ["Ada", "Dave"])];
        let out = filter_rows(&staff(), &conds, &columns(), &mut issues);
        let names: Vec<String> = out.iter().map(|r| r.get("name").display_text()).collect();
        assert_eq!(names, vec!["Brian", "Carol"]);
    }

    #[test]
    fn unknown_column_is_ignored_and_reported() {
        let conds = vec![FilterCondition::new("salry", FilterOperator::Gt, 0)];
        let mut issues = Vec::new();
        let out = filter_rows(&staff(), &conds, &columns(), &mut issues);
        assert_eq!(out.len(), 4);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::UnknownColumn);
    }

    #[test]
    fn kind_incompatible_operator_is_ignored_and_reported() {
        let conds = vec![FilterCondition::new(
            "active",
            FilterOperator::Contains,
            "tru",
        )];
        let mut issues = Vec::new();
        let out = filter_rows(&staff(), &conds, &columns(), &mut issues);
        assert_eq!(out.len(), 4);
        assert_eq!(issues[0].kind, IssueKind::OperatorMismatch);
    }

    #[test]
    fn adding_a_condition_never_grows_the_result() {
        let base = vec![FilterCondition::new(
            "department",
            FilterOperator::Equals,
            "Sales",
        )];
        let mut more = base.clone();
        more.push(FilterCondition::new("salary", FilterOperator::Gte, 80000));
        let mut issues = Vec::new();
        let with_base = filter_rows(&staff(), &base, &columns(), &mut issues);
        let with_more = filter_rows(&staff(), &more, &columns(), &mut issues);
        assert!(with_more.len() <= with_base.len());
    }

    #[test]
    fn predicate_override_takes_precedence() {
        let mut cols = columns();
        cols[0] = ColumnDescriptor::new("name", ValueKind::Text).with_predicate(Arc::new(
            |value: &CellValue, _cond: &FilterCondition| value.display_text().len() > 4,
        ));
        let conds = vec![FilterCondition::new("name", FilterOperator::Equals, "x")];
        let mut issues = Vec::new();
        let out = filter_rows(&staff(), &conds, &cols, &mut issues);
        let names: Vec<String> = out.iter().map(|r| r.get("name").display_text()).collect();
        assert_eq!(names, vec!["Brian", "Carol"]);
    }

    #[test]
    fn single_operand_in_reads_as_singleton_list() {
        let conds = vec![FilterCondition {
            column_id: "name".to_string(),
            operator: FilterOperator::In,
            operand: Operand::One(CellValue::from("Carol")),
            upper: None,
        }];
        let mut issues = Vec::new();
        let out = filter_rows(&staff(), &conds, &columns(), &mut issues);
        assert_eq!(out.len(), 1);
    }
}
