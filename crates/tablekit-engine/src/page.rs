use serde::Serialize;
use tablekit_types::Row;

/// One page slice plus the page count of the whole collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub rows: Vec<Row>,
    pub total_pages: usize,
}

/// Slice an ordered collection into a single 1-based page.
///
/// A pure slice: the stage does not clamp an out-of-range `page_index`, the
/// orchestrator does that before calling. A `page_size` of zero degrades to
/// one page holding everything (the orchestrator reports the issue).
pub fn paginate(rows: &[Row], page_index: usize, page_size: usize) -> Page {
    if page_size == 0 {
        return Page {
            rows: rows.to_vec(),
            total_pages: 1,
        };
    }

    let total_pages = rows.len().div_ceil(page_size).max(1);
    let start = page_index.saturating_sub(1).saturating_mul(page_size).min(rows.len());
    let end = start.saturating_add(page_size).min(rows.len());

    Page {
        rows: rows[start..end].to_vec(),
        total_pages,
    }
}
