//! Dataset validation: structural checks, JSON-Schema validation, and the
//! validator that accumulates their findings.

mod doi;
mod json_schema;
mod record;
mod structural;
mod validator;

pub use doi::DoiCheck;
pub use json_schema::SchemaValidator;
pub use record::{display_value, ErrorKind, ValidationError};
pub use structural::{Check, ColumnCheck, DuplicateRowCheck, MultiValueCheck};
pub(crate) use structural::missing_column;
pub use validator::DatasetValidator;
