use std::collections::HashSet;
use tablekit_types::{Row, RowId, RowKeyFn, SelectionMode};

/// Stateful tracker of which row identities are currently selected.
///
/// With an identity function, membership is keyed by [`RowId`]. Without one,
/// membership falls back to structural (deep value) equality over row
/// snapshots, which costs O(n*m) per check and breaks when a row is rebuilt
/// with different contents between renders.
pub struct SelectionCoordinator {
    mode: SelectionMode,
    inner: SelectedSet,
}

enum SelectedSet {
    Keyed { key_fn: RowKeyFn, ids: HashSet<RowId> },
    Structural { rows: Vec<Row> },
}

impl SelectionCoordinator {
    pub fn new(mode: SelectionMode, key_fn: Option<RowKeyFn>) -> Self {
        let inner = match key_fn {
            Some(key_fn) => SelectedSet::Keyed {
                key_fn,
                ids: HashSet::new(),
            },
            None => SelectedSet::Structural { rows: Vec::new() },
        };
        Self { mode, inner }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        match &self.inner {
            SelectedSet::Keyed { ids, .. } => ids.len(),
            SelectedSet::Structural { rows } => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_selected(&self, row: &Row) -> bool {
        match &self.inner {
            SelectedSet::Keyed { key_fn, ids } => ids.contains(&key_fn(row)),
            SelectedSet::Structural { rows } => rows.contains(row),
        }
    }

    /// Flip one row's selected state.
    ///
    /// Single mode replaces the selection with this row, or clears it when
    /// the row is already the sole selection (click-to-deselect). Multi mode
    /// adds or removes the row.
    pub fn toggle(&mut self, row: &Row) {
        let selected = self.is_selected(row);
        match self.mode {
            SelectionMode::Single => {
                self.clear();
                if !selected {
                    self.insert(row);
                }
            }
            SelectionMode::Multi => {
                if selected {
                    self.remove(row);
                } else {
                    self.insert(row);
                }
            }
        }
    }

    /// Select every row in `visible`, or clear when all of them are already
    /// selected (acts as "deselect all" relative to what is visible).
    ///
    /// No-op in single mode; the cardinality invariant wins over the bulk
    /// gesture.
    pub fn select_all(&mut self, visible: &[Row]) {
        if self.mode == SelectionMode::Single {
            return;
        }
        let all_selected = !visible.is_empty() && visible.iter().all(|r| self.is_selected(r));
        self.clear();
        if !all_selected {
            for row in visible {
                self.insert(row);
            }
        }
    }

    pub fn clear(&mut self) {
        match &mut self.inner {
            SelectedSet::Keyed { ids, .. } => ids.clear(),
            SelectedSet::Structural { rows } => rows.clear(),
        }
    }

    /// Materialize the current selection in collection order.
    ///
    /// Identities that no longer resolve against `collection` are skipped,
    /// never surfaced as dangling entries.
    pub fn selected_rows(&self, collection: &[Row]) -> Vec<Row> {
        collection
            .iter()
            .filter(|row| self.is_selected(row))
            .cloned()
            .collect()
    }

    /// Number of selected identities that still resolve against
    /// `collection`. Unlike [`SelectionCoordinator::len`], stale entries do
    /// not count.
    pub fn count_present(&self, collection: &[Row]) -> usize {
        collection.iter().filter(|row| self.is_selected(row)).count()
    }

    /// Drop identities that no longer resolve to a row in `collection`.
    /// Returns true when anything was pruned.
    pub fn retain_present(&mut self, collection: &[Row]) -> bool {
        match &mut self.inner {
            SelectedSet::Keyed { key_fn, ids } => {
                let live: HashSet<RowId> = collection.iter().map(|r| key_fn(r)).collect();
                let before = ids.len();
                ids.retain(|id| live.contains(id));
                ids.len() != before
            }
            SelectedSet::Structural { rows } => {
                let before = rows.len();
                rows.retain(|r| collection.contains(r));
                rows.len() != before
            }
        }
    }

    fn insert(&mut self, row: &Row) {
        match &mut self.inner {
            SelectedSet::Keyed { key_fn, ids } => {
                ids.insert(key_fn(row));
            }
            SelectedSet::Structural { rows } => {
                if !rows.contains(row) {
                    rows.push(row.clone());
                }
            }
        }
    }

    fn remove(&mut self, row: &Row) {
        match &mut self.inner {
            SelectedSet::Keyed { key_fn, ids } => {
                ids.remove(&key_fn(row));
            }
            SelectedSet::Structural { rows } => {
                rows.retain(|r| r != row);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tablekit_types::CellValue;

    fn key_fn() -> RowKeyFn {
        Arc::new(|row: &Row| match row.get("id") {
            CellValue::Number(n) => RowId::Int(*n as i64),
            other => RowId::Text(other.display_text()),
        })
    }

    fn rows(n: i64) -> Vec<Row> {
        (1..=n).map(|i| Row::new().with("id", i)).collect()
    }

    #[test]
    fn multi_mode_toggle_adds_and_removes() {
        let rows = rows(3);
        let mut sel = SelectionCoordinator::new(SelectionMode::Multi, Some(key_fn()));
        sel.toggle(&rows[0]);
        sel.toggle(&rows[2]);
        assert_eq!(sel.len(), 2);
        sel.toggle(&rows[0]);
        assert_eq!(sel.len(), 1);
        assert!(sel.is_selected(&rows[2]));
    }

    #[test]
    fn single_mode_replaces_and_click_deselects() {
        let rows = rows(3);
        let mut sel = SelectionCoordinator::new(SelectionMode::Single, Some(key_fn()));
        sel.toggle(&rows[0]);
        sel.toggle(&rows[1]);
        assert_eq!(sel.len(), 1);
        assert!(sel.is_selected(&rows[1]));
        sel.toggle(&rows[1]);
        assert!(sel.is_empty());
    }

    #[test]
    fn single_mode_cardinality_never_exceeds_one() {
        let rows = rows(5);
        let mut sel = SelectionCoordinator::new(SelectionMode::Single, Some(key_fn()));
        for row in &rows {
            sel.toggle(row);
            assert!(sel.len() <= 1);
        }
        sel.select_all(&rows);
        assert!(sel.len() <= 1);
        sel.clear();
        assert!(sel.is_empty());
    }

    #[test]
    fn select_all_toggles_relative_to_visible() {
        let rows = rows(5);
        let mut sel = SelectionCoordinator::new(SelectionMode::Multi, Some(key_fn()));
        sel.select_all(&rows);
        assert_eq!(sel.len(), 5);
        // Everything visible already selected: acts as deselect-all
        sel.select_all(&rows);
        assert!(sel.is_empty());
        // Partial selection: select-all completes it
        sel.toggle(&rows[0]);
        sel.select_all(&rows);
        assert_eq!(sel.len(), 5);
    }

    #[test]
    fn select_all_on_empty_visible_set_selects_nothing() {
        let mut sel = SelectionCoordinator::new(SelectionMode::Multi, Some(key_fn()));
        sel.select_all(&[]);
        assert!(sel.is_empty());
    }

    #[test]
    fn retain_present_prunes_dangling_identities() {
        let all = rows(4);
        let mut sel = SelectionCoordinator::new(SelectionMode::Multi, Some(key_fn()));
        sel.select_all(&all);
        let shrunk = rows(2);
        assert!(sel.retain_present(&shrunk));
        assert_eq!(sel.len(), 2);
        assert!(!sel.retain_present(&shrunk));
    }

    #[test]
    fn selected_rows_skip_unresolvable_identities() {
        let all = rows(3);
        let mut sel = SelectionCoordinator::new(SelectionMode::Multi, Some(key_fn()));
        sel.select_all(&all);
        let shrunk = rows(1);
        let materialized = sel.selected_rows(&shrunk);
        assert_eq!(materialized, shrunk);
    }

    #[test]
    fn count_present_ignores_stale_entries() {
        let all = rows(4);
        let mut sel = SelectionCoordinator::new(SelectionMode::Multi, Some(key_fn()));
        sel.select_all(&all);
        assert_eq!(sel.len(), 4);
        let shrunk = rows(2);
        assert_eq!(sel.count_present(&shrunk), 2);
        // len still reports the unreconciled set
        assert_eq!(sel.len(), 4);
    }

    #[test]
    fn structural_fallback_matches_by_deep_equality() {
        let rows = vec![
            Row::new().with("name", "Ada"),
            Row::new().with("name", "Brian"),
        ];
        let mut sel = SelectionCoordinator::new(SelectionMode::Multi, None);
        sel.toggle(&rows[0]);
        // An equal-but-recreated row counts as selected
        let recreated = Row::new().with("name", "Ada");
        assert!(sel.is_selected(&recreated));
        sel.toggle(&recreated);
        assert!(sel.is_empty());
    }
}
