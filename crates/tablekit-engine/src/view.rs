use serde::Serialize;
use tablekit_types::Row;

/// Resolved snapshot handed to the presentation layer after each recompute.
///
/// Carries the current page plus the counts a host needs to render "x of y"
/// chrome without re-deriving the pipeline.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TableView {
    /// Rows of the current page, in display order.
    pub rows: Vec<Row>,
    /// 1-based page index, already clamped to the valid range.
    pub page_index: usize,
    pub page_size: usize,
    pub total_pages: usize,
    /// Size of the unfiltered source collection.
    pub total_count: usize,
    /// Size of the collection after search and filters.
    pub filtered_count: usize,
    pub selected_count: usize,
}
