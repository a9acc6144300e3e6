//! Testing infrastructure for tablekit tests.
//!
//! This crate provides utilities for writing pipeline and orchestration
//! tests:
//! - `fixtures`: the employee dataset and column/config builders
//! - `listener`: a recording [`TableListener`] that captures emitted events
//!
//! [`TableListener`]: tablekit_engine::TableListener

pub mod fixtures;
pub mod listener;

pub use fixtures::{employee_columns, employee_config, employee_key, employees, rows_from_json};
pub use listener::{EventLog, RecordingListener, TableEvent};
