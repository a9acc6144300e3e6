//! Recording listener: captures every event a [`TableState`] fires so tests
//! can assert on the exact callback sequence.
//!
//! [`TableState`]: tablekit_engine::TableState

use std::cell::RefCell;
use std::rc::Rc;
use tablekit_engine::TableListener;
use tablekit_types::{CellValue, FilterCondition, Row, SortKey};

/// One captured callback invocation.
#[derive(Debug, Clone)]
pub enum TableEvent {
    Selection(Vec<Row>),
    Sort(Vec<SortKey>),
    Filter(Vec<FilterCondition>),
    Page {
        page_index: usize,
        page_size: usize,
    },
    Edit {
        row: Row,
        column_id: String,
        value: CellValue,
    },
}

/// Shared handle onto the captured event sequence. Clone it before handing
/// the listener to the table; both sides see the same log.
#[derive(Clone, Default)]
pub struct EventLog(Rc<RefCell<Vec<TableEvent>>>);

impl EventLog {
    pub fn events(&self) -> Vec<TableEvent> {
        self.0.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// Rows carried by the most recent selection event, if any selection
    /// event was fired at all.
    pub fn last_selection(&self) -> Option<Vec<Row>> {
        self.0.borrow().iter().rev().find_map(|e| match e {
            TableEvent::Selection(rows) => Some(rows.clone()),
            _ => None,
        })
    }

    pub fn selection_event_count(&self) -> usize {
        self.0
            .borrow()
            .iter()
            .filter(|e| matches!(e, TableEvent::Selection(_)))
            .count()
    }

    fn push(&self, event: TableEvent) {
        self.0.borrow_mut().push(event);
    }
}

/// [`TableListener`] implementation that appends every callback to an
/// [`EventLog`].
#[derive(Default)]
pub struct RecordingListener {
    log: EventLog,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> EventLog {
        self.log.clone()
    }
}

impl TableListener for RecordingListener {
    fn selection_changed(&mut self, selected: &[Row]) {
        self.log.push(TableEvent::Selection(selected.to_vec()));
    }

    fn sort_changed(&mut self, keys: &[SortKey]) {
        self.log.push(TableEvent::Sort(keys.to_vec()));
    }

    fn filter_changed(&mut self, conditions: &[FilterCondition]) {
        self.log.push(TableEvent::Filter(conditions.to_vec()));
    }

    fn page_changed(&mut self, page_index: usize, page_size: usize) {
        self.log.push(TableEvent::Page {
            page_index,
            page_size,
        });
    }

    fn edit_committed(&mut self, row: &Row, column_id: &str, value: &CellValue) {
        self.log.push(TableEvent::Edit {
            row: row.clone(),
            column_id: column_id.to_string(),
            value: value.clone(),
        });
    }
}
