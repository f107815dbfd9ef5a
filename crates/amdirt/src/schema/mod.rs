//! Table schemas: declared columns, their scalar types and requiredness.

mod loader;
mod table;
mod types;

pub use loader::{SchemaLoadError, SchemaLoader};
pub use table::TableSchema;
pub use types::{ColumnSpec, ScalarType};
