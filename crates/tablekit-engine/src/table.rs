use crate::diagnostics::{ConfigIssue, DiagnosticsSink, IssueKind};
use crate::filter::filter_rows;
use crate::page::paginate;
use crate::search::search_rows;
use crate::selection::SelectionCoordinator;
use crate::sort::{hoist_pinned, sort_rows};
use crate::view::TableView;
use tablekit_types::{
    CellValue, Error, FilterCondition, Result, Row, RowId, SelectAllScope, SortDirection, SortKey,
    TableConfig,
};

/// Callbacks fired synchronously after each corresponding state mutation,
/// carrying the new resolved state so the host can re-render without
/// re-deriving the pipeline. All methods default to no-ops.
pub trait TableListener {
    fn selection_changed(&mut self, _selected: &[Row]) {}
    fn sort_changed(&mut self, _keys: &[SortKey]) {}
    fn filter_changed(&mut self, _conditions: &[FilterCondition]) {}
    fn page_changed(&mut self, _page_index: usize, _page_size: usize) {}
    fn edit_committed(&mut self, _row: &Row, _column_id: &str, _value: &CellValue) {}
}

enum RowTarget {
    Id(RowId),
    Snapshot(Row),
}

/// Cell currently in editing state.
pub struct EditingCell {
    pub column_id: String,
    target: RowTarget,
}

impl EditingCell {
    pub fn row_id(&self) -> Option<&RowId> {
        match &self.target {
            RowTarget::Id(id) => Some(id),
            RowTarget::Snapshot(_) => None,
        }
    }
}

/// Stateful coordinator tying the pipeline stages together.
///
/// Owns the source collection plus all view state (query, conditions, sort
/// keys, page, selection, editing cell) and recomputes
/// search -> filter -> sort -> pinned pass -> paginate into a cached
/// [`TableView`] on every mutation. Everything runs synchronously within the
/// mutating call; a host wanting debounce applies it before calling in.
pub struct TableState {
    rows: Vec<Row>,
    config: TableConfig,
    query: String,
    conditions: Vec<FilterCondition>,
    sort_keys: Vec<SortKey>,
    page_index: usize,
    pinned: Vec<RowId>,
    selection: SelectionCoordinator,
    editing: Option<EditingCell>,
    listener: Option<Box<dyn TableListener>>,
    sink: Option<Box<dyn DiagnosticsSink>>,
    issues: Vec<ConfigIssue>,
    /// Filtered and sorted collection backing the current view; also the
    /// "all filtered rows" scope for select-all and distinct values.
    filtered: Vec<Row>,
    view: TableView,
}

impl TableState {
    pub fn new(rows: Vec<Row>, config: TableConfig) -> Self {
        let selection = SelectionCoordinator::new(config.selection_mode, config.key_fn.clone());
        let pinned = config.pinned.clone();
        let mut state = Self {
            rows,
            config,
            query: String::new(),
            conditions: Vec::new(),
            sort_keys: Vec::new(),
            page_index: 1,
            pinned,
            selection,
            editing: None,
            listener: None,
            sink: None,
            issues: Vec::new(),
            filtered: Vec::new(),
            view: TableView::default(),
        };
        state.recompute();
        state.forward_issues();
        state
    }

    pub fn set_listener(&mut self, listener: Box<dyn TableListener>) {
        self.listener = Some(listener);
    }

    pub fn set_diagnostics_sink(&mut self, sink: Box<dyn DiagnosticsSink>) {
        self.sink = Some(sink);
    }

    // --- Queries ---

    /// The resolved snapshot for the current state.
    pub fn view(&self) -> &TableView {
        &self.view
    }

    /// Configuration issues from the latest recompute.
    pub fn issues(&self) -> &[ConfigIssue] {
        &self.issues
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn conditions(&self) -> &[FilterCondition] {
        &self.conditions
    }

    pub fn sort_keys(&self) -> &[SortKey] {
        &self.sort_keys
    }

    pub fn editing(&self) -> Option<&EditingCell> {
        self.editing.as_ref()
    }

    pub fn is_selected(&self, row: &Row) -> bool {
        self.selection.is_selected(row)
    }

    pub fn selected_rows(&self) -> Vec<Row> {
        self.selection.selected_rows(&self.rows)
    }

    /// Distinct values of a column over the filtered set, first-seen order.
    /// Feeds select-style filter dropdowns.
    pub fn distinct_values(&self, column_id: &str) -> Result<Vec<CellValue>> {
        let col = self
            .config
            .column(column_id)
            .ok_or_else(|| Error::UnknownColumn(column_id.to_string()))?;
        let mut seen: Vec<CellValue> = Vec::new();
        for row in &self.filtered {
            let value = col.value(row);
            if !seen.contains(&value) {
                seen.push(value);
            }
        }
        Ok(seen)
    }

    // --- Source collection ---

    /// Replace the source collection, reconciling selection against the new
    /// rows' identities.
    pub fn set_rows(&mut self, rows: Vec<Row>) {
        self.rows = rows;
        let pruned = self.selection.retain_present(&self.rows);
        self.recompute();
        self.forward_issues();
        if pruned {
            self.fire_selection_changed();
        }
    }

    // --- Search ---

    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query == self.query {
            return;
        }
        self.query = query;
        self.refresh_after_narrowing_change();
    }

    // --- Filters ---

    /// Add a condition, replacing any existing condition on the same column.
    pub fn set_condition(&mut self, condition: FilterCondition) {
        match self
            .conditions
            .iter_mut()
            .find(|c| c.column_id == condition.column_id)
        {
            Some(existing) => *existing = condition,
            None => self.conditions.push(condition),
        }
        self.refresh_after_narrowing_change();
        self.fire_filter_changed();
    }

    /// Drop the condition on one column; the "clear one filter" interaction.
    pub fn remove_condition(&mut self, column_id: &str) {
        let before = self.conditions.len();
        self.conditions.retain(|c| c.column_id != column_id);
        if self.conditions.len() != before {
            self.refresh_after_narrowing_change();
            self.fire_filter_changed();
        }
    }

    pub fn set_conditions(&mut self, conditions: Vec<FilterCondition>) {
        self.conditions = conditions;
        self.refresh_after_narrowing_change();
        self.fire_filter_changed();
    }

    pub fn clear_conditions(&mut self) {
        if self.conditions.is_empty() {
            return;
        }
        self.conditions.clear();
        self.refresh_after_narrowing_change();
        self.fire_filter_changed();
    }

    // --- Sort ---

    /// Replace the whole key set. Page index is left untouched; a pure sort
    /// change never moves the user off their page.
    pub fn set_sort(&mut self, keys: Vec<SortKey>) {
        self.sort_keys = keys;
        self.recompute();
        self.forward_issues();
        self.fire_sort_changed();
    }

    /// Add one key, replacing in place any key already on that column.
    pub fn push_sort_key(&mut self, key: SortKey) {
        match self
            .sort_keys
            .iter_mut()
            .find(|k| k.column_id == key.column_id)
        {
            Some(existing) => *existing = key,
            None => self.sort_keys.push(key),
        }
        self.recompute();
        self.forward_issues();
        self.fire_sort_changed();
    }

    /// Click-on-header cycling: none -> asc -> desc -> none.
    pub fn toggle_sort(&mut self, column_id: &str) {
        let next_priority = self
            .sort_keys
            .iter()
            .map(|k| k.priority + 1)
            .max()
            .unwrap_or(0);
        match self.sort_keys.iter().position(|k| k.column_id == column_id) {
            None => self
                .sort_keys
                .push(SortKey::asc(column_id).with_priority(next_priority)),
            Some(index) => match self.sort_keys[index].direction {
                SortDirection::Asc => self.sort_keys[index].direction = SortDirection::Desc,
                SortDirection::Desc => {
                    self.sort_keys.remove(index);
                }
            },
        }
        self.recompute();
        self.forward_issues();
        self.fire_sort_changed();
    }

    pub fn clear_sort(&mut self) {
        if self.sort_keys.is_empty() {
            return;
        }
        self.sort_keys.clear();
        self.recompute();
        self.forward_issues();
        self.fire_sort_changed();
    }

    // --- Pagination ---

    /// Move to a page, clamped into `1..=total_pages`.
    pub fn set_page(&mut self, page_index: usize) {
        let clamped = page_index.clamp(1, self.view.total_pages.max(1));
        if clamped == self.page_index {
            return;
        }
        self.page_index = clamped;
        self.recompute();
        self.forward_issues();
        self.fire_page_changed();
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        if page_size == self.config.page_size {
            return;
        }
        self.config.page_size = page_size;
        self.recompute();
        self.forward_issues();
        self.fire_page_changed();
    }

    // --- Pinning ---

    /// Force a row to the top of the display regardless of sort order.
    /// Requires an identity function; without one pin requests are ignored.
    pub fn pin(&mut self, row_id: RowId) {
        if !self.pinned.contains(&row_id) {
            self.pinned.push(row_id);
            self.recompute();
            self.forward_issues();
        }
    }

    pub fn unpin(&mut self, row_id: &RowId) {
        let before = self.pinned.len();
        self.pinned.retain(|id| id != row_id);
        if self.pinned.len() != before {
            self.recompute();
            self.forward_issues();
        }
    }

    // --- Selection ---

    pub fn toggle_selection(&mut self, row: &Row) {
        self.selection.toggle(row);
        self.recompute();
        self.fire_selection_changed();
    }

    /// Select (or deselect) everything in the configured scope: the current
    /// page, or the whole filtered set.
    pub fn select_all(&mut self) {
        let visible = match self.config.select_all_scope {
            SelectAllScope::Page => self.view.rows.clone(),
            SelectAllScope::Filtered => self.filtered.clone(),
        };
        self.selection.select_all(&visible);
        self.recompute();
        self.fire_selection_changed();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.recompute();
        self.fire_selection_changed();
    }

    // --- Inline editing ---

    /// Mark one cell as being edited. The engine only tracks the state; the
    /// host renders the editor.
    pub fn begin_edit(&mut self, row: &Row, column_id: &str) -> Result<()> {
        let col = self
            .config
            .column(column_id)
            .ok_or_else(|| Error::UnknownColumn(column_id.to_string()))?;
        if !col.editable {
            return Err(Error::NotEditable(column_id.to_string()));
        }
        let target = match &self.config.key_fn {
            Some(key_fn) => RowTarget::Id(key_fn(row)),
            None => RowTarget::Snapshot(row.clone()),
        };
        self.editing = Some(EditingCell {
            column_id: column_id.to_string(),
            target,
        });
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Confirm the pending edit with `value`.
    ///
    /// Applies the value to the engine's transient in-memory copy of the row
    /// and relays it through [`TableListener::edit_committed`]; validation
    /// and persistence are the host's concern. If the row vanished from the
    /// collection since the edit began, the commit is a no-op.
    pub fn commit_edit(&mut self, value: CellValue) -> Result<()> {
        let cell = self.editing.take().ok_or(Error::NoActiveEdit)?;
        let field = self
            .config
            .column(&cell.column_id)
            .ok_or_else(|| Error::UnknownColumn(cell.column_id.clone()))?
            .field
            .clone();

        let index = match &cell.target {
            RowTarget::Id(id) => {
                let key_fn = self.config.key_fn.clone();
                key_fn.and_then(|key_fn| self.rows.iter().position(|r| &key_fn(r) == id))
            }
            RowTarget::Snapshot(snapshot) => self.rows.iter().position(|r| r == snapshot),
        };

        let Some(index) = index else {
            // Row removed between render and commit: no-op, nothing corrupted.
            return Ok(());
        };

        self.rows[index].insert(field, value.clone());
        let updated = self.rows[index].clone();
        self.recompute();
        self.forward_issues();
        if let Some(listener) = self.listener.as_mut() {
            listener.edit_committed(&updated, &cell.column_id, &value);
        }
        Ok(())
    }

    // --- Internals ---

    /// Recompute the pipeline and reset to page 1 when the change altered
    /// the filtered result set, so the user never lands on an out-of-range
    /// empty page.
    fn refresh_after_narrowing_change(&mut self) {
        let before = std::mem::take(&mut self.filtered);
        self.recompute();
        if self.filtered != before && self.page_index != 1 {
            self.page_index = 1;
            self.recompute();
        }
        self.forward_issues();
    }

    fn recompute(&mut self) {
        self.issues.clear();

        let searched = search_rows(&self.rows, &self.query, &self.config.columns);
        let filtered = filter_rows(
            &searched,
            &self.conditions,
            &self.config.columns,
            &mut self.issues,
        );
        let sorted = sort_rows(
            &filtered,
            &self.sort_keys,
            &self.config.columns,
            &mut self.issues,
        );

        let ordered = match (&self.config.key_fn, self.pinned.is_empty()) {
            (Some(key_fn), false) => {
                let key_fn = key_fn.clone();
                let pinned = self.pinned.clone();
                hoist_pinned(sorted, move |row| pinned.contains(&key_fn(row)))
            }
            _ => sorted,
        };

        if self.config.page_size == 0 {
            self.issues.push(ConfigIssue::new(
                IssueKind::ZeroPageSize,
                None,
                "page size is zero; serving the whole collection as one page",
            ));
        }

        let mut page = paginate(&ordered, self.page_index, self.config.page_size);
        if self.page_index > page.total_pages {
            self.page_index = page.total_pages;
            page = paginate(&ordered, self.page_index, self.config.page_size);
        }
        if self.page_index == 0 {
            self.page_index = 1;
        }

        self.filtered = ordered;
        self.view = TableView {
            rows: page.rows,
            page_index: self.page_index,
            page_size: self.config.page_size,
            total_pages: page.total_pages,
            total_count: self.rows.len(),
            filtered_count: self.filtered.len(),
            // Counted against the live collection so identities orphaned by
            // row rewrites or removals never inflate the count
            selected_count: self.selection.count_present(&self.rows),
        };
    }

    fn forward_issues(&mut self) {
        if let Some(sink) = self.sink.as_mut() {
            for issue in &self.issues {
                sink.report(issue);
            }
        }
    }

    fn fire_selection_changed(&mut self) {
        let selected = self.selection.selected_rows(&self.rows);
        if let Some(listener) = self.listener.as_mut() {
            listener.selection_changed(&selected);
        }
    }

    fn fire_sort_changed(&mut self) {
        if let Some(listener) = self.listener.as_mut() {
            let keys = self.sort_keys.clone();
            listener.sort_changed(&keys);
        }
    }

    fn fire_filter_changed(&mut self) {
        if let Some(listener) = self.listener.as_mut() {
            let conditions = self.conditions.clone();
            listener.filter_changed(&conditions);
        }
    }

    fn fire_page_changed(&mut self) {
        if let Some(listener) = self.listener.as_mut() {
            listener.page_changed(self.view.page_index, self.view.page_size);
        }
    }
}
