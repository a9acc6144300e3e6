use crate::diagnostics::{ConfigIssue, IssueKind};
use std::cmp::Ordering;
use tablekit_types::{CellValue, ColumnDescriptor, Row, SortDirection, SortKey};

/// Order `rows` by zero or more sort keys.
///
/// Keys compare in ascending priority order; the first differing key decides,
/// scaled by its direction. Null values sort after defined values under both
/// directions. Rows equal under every key keep their input order (the
/// underlying sort is stable). Keys referencing unknown or non-sortable
/// columns are ignored and recorded in `issues`.
pub fn sort_rows(
    rows: &[Row],
    keys: &[SortKey],
    columns: &[ColumnDescriptor],
    issues: &mut Vec<ConfigIssue>,
) -> Vec<Row> {
    let resolved = resolve_keys(keys, columns, issues);
    let mut out = rows.to_vec();
    if resolved.is_empty() {
        return out;
    }

    // Vec::sort_by is stable, which the tie-break contract relies on.
    out.sort_by(|a, b| {
        for (key, col) in &resolved {
            let ord = compare_by_key(col, key.direction, a, b);
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });
    out
}

/// Surface pinned rows before all others, preserving relative order inside
/// both groups. Applied after the key-based sort, never interleaved with it.
pub fn hoist_pinned(rows: Vec<Row>, is_pinned: impl Fn(&Row) -> bool) -> Vec<Row> {
    let (pinned, rest): (Vec<Row>, Vec<Row>) = rows.into_iter().partition(|r| is_pinned(r));
    let mut out = pinned;
    out.extend(rest);
    out
}

fn resolve_keys<'a>(
    keys: &'a [SortKey],
    columns: &'a [ColumnDescriptor],
    issues: &mut Vec<ConfigIssue>,
) -> Vec<(&'a SortKey, &'a ColumnDescriptor)> {
    let mut resolved = Vec::new();
    for key in keys {
        let Some(col) = columns.iter().find(|c| c.id == key.column_id) else {
            issues.push(ConfigIssue::new(
                IssueKind::UnknownColumn,
                Some(&key.column_id),
                format!("sort key references unknown column {}", key.column_id),
            ));
            continue;
        };
        if !col.sortable {
            issues.push(ConfigIssue::new(
                IssueKind::NotSortable,
                Some(&col.id),
                format!("column {} is not sortable", col.id),
            ));
            continue;
        }
        resolved.push((key, col));
    }
    resolved.sort_by_key(|(key, _)| key.priority);
    resolved
}

fn compare_by_key(
    col: &ColumnDescriptor,
    direction: SortDirection,
    a: &Row,
    b: &Row,
) -> Ordering {
    let va = col.value(a);
    let vb = col.value(b);

    // Nulls-last is fixed policy: not scaled by direction, not delegated to
    // comparator overrides.
    match (va.is_null(), vb.is_null()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }

    let ord = match col.comparator() {
        Some(comparator) => comparator(&va, &vb),
        None => compare_values(&va, &vb),
    };

    match direction {
        SortDirection::Asc => ord,
        SortDirection::Desc => ord.reverse(),
    }
}

/// Total ordering over heterogeneous defined values: numbers numerically,
/// dates by instant, text as case-insensitive strings with a case-sensitive
/// tiebreak. Values of different variants order by a fixed variant rank, so
/// the relation stays transitive on columns holding mixed shapes.
fn compare_values(a: &CellValue, b: &CellValue) -> Ordering {
    match (a, b) {
        (CellValue::Number(x), CellValue::Number(y)) => x.total_cmp(y),
        (CellValue::Date(x), CellValue::Date(y)) => x.cmp(y),
        (CellValue::Bool(x), CellValue::Bool(y)) => x.cmp(y),
        (CellValue::Text(x), CellValue::Text(y)) => x
            .to_lowercase()
            .cmp(&y.to_lowercase())
            .then_with(|| x.cmp(y)),
        _ => variant_rank(a).cmp(&variant_rank(b)),
    }
}

fn variant_rank(value: &CellValue) -> u8 {
    match value {
        CellValue::Number(_) => 0,
        CellValue::Date(_) => 1,
        CellValue::Bool(_) => 2,
        CellValue::Text(_) => 3,
        CellValue::Null => 4,
    }
}
