use crate::column::ColumnDescriptor;
use crate::row::{RowId, RowKeyFn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether at most one (`Single`) or any number (`Multi`) of rows may be
/// selected simultaneously.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    Single,
    Multi,
}

/// What "select all" operates on.
///
/// The source behaviors differ between table-style and grid-style hosts, so
/// the scope is explicit configuration rather than a guess: `Page` covers
/// the rows on the current page, `Filtered` the entire filtered/sorted set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectAllScope {
    Page,
    Filtered,
}

const DEFAULT_PAGE_SIZE: usize = 25;

/// Initial configuration for a table: columns, identity, selection behavior
/// and page size.
#[derive(Clone)]
pub struct TableConfig {
    pub columns: Vec<ColumnDescriptor>,
    pub key_fn: Option<RowKeyFn>,
    pub selection_mode: SelectionMode,
    pub select_all_scope: SelectAllScope,
    pub page_size: usize,
    pub pinned: Vec<RowId>,
}

impl TableConfig {
    /// Configuration with a row identity function, the primary constructor.
    pub fn new(columns: Vec<ColumnDescriptor>, key_fn: RowKeyFn) -> Self {
        Self {
            columns,
            key_fn: Some(key_fn),
            selection_mode: SelectionMode::Multi,
            select_all_scope: SelectAllScope::Page,
            page_size: DEFAULT_PAGE_SIZE,
            pinned: Vec::new(),
        }
    }

    /// Configuration without an identity function.
    ///
    /// Selection membership then falls back to structural (deep value)
    /// equality, which costs O(n*m) per membership check and breaks if a row
    /// is rebuilt with different contents between renders. Prefer
    /// [`TableConfig::new`] whenever a stable key exists.
    pub fn with_structural_identity(columns: Vec<ColumnDescriptor>) -> Self {
        Self {
            columns,
            key_fn: None,
            selection_mode: SelectionMode::Multi,
            select_all_scope: SelectAllScope::Page,
            page_size: DEFAULT_PAGE_SIZE,
            pinned: Vec::new(),
        }
    }

    pub fn selection_mode(mut self, mode: SelectionMode) -> Self {
        self.selection_mode = mode;
        self
    }

    pub fn select_all_scope(mut self, scope: SelectAllScope) -> Self {
        self.select_all_scope = scope;
        self
    }

    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    pub fn pinned(mut self, pinned: Vec<RowId>) -> Self {
        self.pinned = pinned;
        self
    }

    pub fn column(&self, column_id: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.id == column_id)
    }
}

impl fmt::Debug for TableConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableConfig")
            .field("columns", &self.columns)
            .field("key_fn", &self.key_fn.is_some())
            .field("selection_mode", &self.selection_mode)
            .field("select_all_scope", &self.select_all_scope)
            .field("page_size", &self.page_size)
            .field("pinned", &self.pinned)
            .finish()
    }
}
