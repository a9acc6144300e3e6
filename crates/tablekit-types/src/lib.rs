pub mod column;
pub mod config;
pub mod error;
pub mod filter;
pub mod row;
pub mod sort;
pub mod value;

pub use column::{AccessorFn, ColumnDescriptor, CompareFn, PredicateFn, ValueKind};
pub use config::{SelectAllScope, SelectionMode, TableConfig};
pub use error::{Error, Result};
pub use filter::{FilterCondition, FilterOperator, Operand};
pub use row::{Row, RowId, RowKeyFn};
pub use sort::{SortDirection, SortKey};
pub use value::CellValue;
