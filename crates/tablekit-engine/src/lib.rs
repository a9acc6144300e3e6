// Engine module - the tabular data pipeline and its orchestrator
// This layer sits between the raw row collection (types) and the rendering host

pub mod diagnostics;
pub mod filter;
pub mod page;
pub mod search;
pub mod selection;
pub mod sort;
pub mod table;
pub mod view;

pub use diagnostics::{ConfigIssue, DiagnosticsSink, IssueKind};
pub use filter::filter_rows;
pub use page::{Page, paginate};
pub use search::search_rows;
pub use selection::SelectionCoordinator;
pub use sort::{hoist_pinned, sort_rows};
pub use table::{EditingCell, TableListener, TableState};
pub use view::TableView;
