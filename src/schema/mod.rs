//! Pure tree-mutation library behind the schema editor.
//!
//! No DOM or network code lives here; everything is plain data so the whole
//! module is testable with `cargo test --lib` on the host.

pub mod document;
pub mod edit;
pub mod path;

pub use document::{
    normalize, normalize_root, to_value, SchemaKind, SchemaMeta, SchemaNode, SchemaType,
};
pub use edit::{EditError, EditOutcome};
pub use path::FieldPath;
