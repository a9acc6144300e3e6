use tablekit_types::{ColumnDescriptor, Row};

/// Reduce `rows` to those matching a free-text query.
///
/// A row survives iff at least one searchable column's value, coerced to a
/// string and lower-cased, contains the lower-cased query as a substring.
/// The empty query matches everything; relative order is preserved. Null
/// cells coerce to the empty string and never match a non-empty query.
pub fn search_rows(rows: &[Row], query: &str, columns: &[ColumnDescriptor]) -> Vec<Row> {
    if query.is_empty() {
        return rows.to_vec();
    }

    let needle = query.to_lowercase();
    let searchable: Vec<&ColumnDescriptor> = columns.iter().filter(|c| c.searchable).collect();

    rows.iter()
        .filter(|row| {
            searchable
                .iter()
                .any(|col| col.value(row).display_text().to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablekit_types::{CellValue, ValueKind};

    fn columns() -> Vec<ColumnDescriptor> {
        vec![
            ColumnDescriptor::new("name", ValueKind::Text),
            ColumnDescriptor::new("email", ValueKind::Text),
        ]
    }

    fn rows() -> Vec<Row> {
        vec![
            Row::new().with("name", "John").with("email", "j@x.com"),
            Row::new().with("name", "Amy").with("email", "amy@jo.io"),
            Row::new().with("name", "Zoe").with("email", CellValue::Null),
        ]
    }

    #[test]
    fn empty_query_is_identity() {
        let rows = rows();
        assert_eq!(search_rows(&rows, "", &columns()), rows);
    }

    #[test]
    fn matches_substring_across_fields_case_insensitive() {
        // "jo" hits John by name and Amy by email domain
        let out = search_rows(&rows(), "JO", &columns());
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].get("name"), &CellValue::from("John"));
        assert_eq!(out[1].get("name"), &CellValue::from("Amy"));
    }

    #[test]
    fn null_fields_never_match() {
        let out = search_rows(&rows(), "zoe@", &columns());
        assert!(out.is_empty());
    }

    #[test]
    fn non_searchable_columns_are_skipped() {
        let cols = vec![
            ColumnDescriptor::new("name", ValueKind::Text),
            ColumnDescriptor::new("email", ValueKind::Text).searchable(false),
        ];
        let out = search_rows(&rows(), "jo.io", &cols);
        assert!(out.is_empty());
    }

    #[test]
    fn search_is_idempotent() {
        let once = search_rows(&rows(), "o", &columns());
        let twice = search_rows(&once, "o", &columns());
        assert_eq!(once, twice);
    }
}
