//! Input parsing and data source handling.

mod location;
mod parser;
mod source;
mod value;

pub use location::Location;
pub use parser::{Parser, ParserConfig};
pub use source::{line_number, split_multi_value, DataTable, SourceMetadata, LINE_OFFSET};
pub use value::CellValue;
