//! Fixtures for sample data generation.
//!
//! The employee dataset is 23 rows across three departments (12 Engineering,
//! 6 Sales, 5 Marketing) with distinct salaries, two of them null, so sort
//! and pagination assertions stay deterministic.

use anyhow::{Context, Result, bail};
use chrono::{TimeZone, Utc};
use std::sync::Arc;
use tablekit_types::{
    CellValue, ColumnDescriptor, Row, RowId, RowKeyFn, TableConfig, ValueKind,
};

/// (id, name, department, salary, hire year, active)
const EMPLOYEES: &[(i64, &str, &str, Option<i64>, i32, bool)] = &[
    (1, "Grace", "Engineering", Some(98000), 2012, true),
    (2, "Alan", "Engineering", Some(95000), 2013, false),
    (3, "Ada", "Engineering", Some(93000), 2014, true),
    (4, "Edsger", "Engineering", Some(91000), 2015, true),
    (5, "Barbara", "Engineering", Some(89000), 2016, false),
    (6, "Linus", "Engineering", Some(87000), 2017, true),
    (7, "Dennis", "Engineering", Some(85000), 2018, true),
    (8, "Ken", "Engineering", Some(83000), 2019, false),
    (9, "Bjarne", "Engineering", Some(81000), 2020, true),
    (10, "Guido", "Engineering", Some(79000), 2021, true),
    (11, "James", "Engineering", Some(77000), 2022, false),
    (12, "Brendan", "Engineering", Some(75000), 2023, true),
    (13, "Mary", "Sales", Some(72000), 2014, true),
    (14, "Steve", "Sales", Some(70000), 2016, false),
    (15, "Sheryl", "Sales", Some(68000), 2018, true),
    (16, "Marc", "Sales", Some(66000), 2020, true),
    (17, "Reed", "Sales", None, 2021, false),
    (18, "Jack", "Sales", Some(62000), 2022, true),
    (19, "Seth", "Marketing", Some(60000), 2015, true),
    (20, "Ann", "Marketing", Some(58000), 2017, false),
    (21, "Gary", "Marketing", Some(56000), 2019, true),
    (22, "Sue", "Marketing", None, 2021, true),
    (23, "Phil", "Marketing", Some(52000), 2023, false),
];

/// The 23-employee dataset.
pub fn employees() -> Vec<Row> {
    EMPLOYEES
        .iter()
        .map(|(id, name, department, salary, year, active)| {
            Row::new()
                .with("id", *id)
                .with("name", *name)
                .with("email", format!("{}@corp.io", name.to_lowercase()))
                .with("department", *department)
                .with("salary", salary.map(CellValue::from).unwrap_or(CellValue::Null))
                .with("hired", Utc.with_ymd_and_hms(*year, 3, 1, 9, 0, 0).unwrap())
                .with("active", *active)
        })
        .collect()
}

/// Column set matching the employee dataset. Name and salary are editable;
/// only the text-ish columns are searchable.
pub fn employee_columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::new("id", ValueKind::Number).searchable(false),
        ColumnDescriptor::new("name", ValueKind::Text).editable(true),
        ColumnDescriptor::new("email", ValueKind::Text),
        ColumnDescriptor::new("department", ValueKind::Select),
        ColumnDescriptor::new("salary", ValueKind::Number)
            .searchable(false)
            .editable(true),
        ColumnDescriptor::new("hired", ValueKind::Date).searchable(false),
        ColumnDescriptor::new("active", ValueKind::Bool).searchable(false),
    ]
}

/// Identity function keyed on the numeric `id` field.
pub fn employee_key() -> RowKeyFn {
    Arc::new(|row: &Row| match row.get("id") {
        CellValue::Number(n) => RowId::Int(*n as i64),
        other => RowId::Text(other.display_text()),
    })
}

/// Default configuration for the employee dataset: multi-select, page-scoped
/// select-all, ten rows per page.
pub fn employee_config() -> TableConfig {
    TableConfig::new(employee_columns(), employee_key()).page_size(10)
}

/// Parse a JSON array of flat objects into rows, mapping JSON scalars onto
/// the cell value variants. Useful for loading datasets from fixture files.
pub fn rows_from_json(json: &str) -> Result<Vec<Row>> {
    let parsed: serde_json::Value =
        serde_json::from_str(json).context("fixture is not valid JSON")?;
    let Some(items) = parsed.as_array() else {
        bail!("fixture must be a JSON array of objects");
    };

    let mut rows = Vec::with_capacity(items.len());
    for item in items {
        let Some(object) = item.as_object() else {
            bail!("fixture entries must be JSON objects");
        };
        let mut row = Row::new();
        for (field, value) in object {
            let cell = match value {
                serde_json::Value::Null => CellValue::Null,
                serde_json::Value::Bool(b) => CellValue::Bool(*b),
                serde_json::Value::Number(n) => CellValue::Number(
                    n.as_f64().context("numeric field out of f64 range")?,
                ),
                serde_json::Value::String(s) => CellValue::Text(s.clone()),
                other => bail!("unsupported fixture value for {}: {}", field, other),
            };
            row.insert(field.clone(), cell);
        }
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_shape_is_stable() {
        let rows = employees();
        assert_eq!(rows.len(), 23);
        let engineering = rows
            .iter()
            .filter(|r| r.get("department").display_text() == "Engineering")
            .count();
        assert_eq!(engineering, 12);
        let nulls = rows.iter().filter(|r| r.get("salary").is_null()).count();
        assert_eq!(nulls, 2);
    }

    #[test]
    fn json_rows_parse_scalars() {
        let rows = rows_from_json(r#"[{"name":"Ada","salary":93000,"active":true,"note":null}]"#)
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("salary"), &CellValue::Number(93000.0));
        assert_eq!(rows[0].get("note"), &CellValue::Null);
    }

    #[test]
    fn nested_json_is_rejected() {
        assert!(rows_from_json(r#"[{"tags":["a","b"]}]"#).is_err());
    }
}
