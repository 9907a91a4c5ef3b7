//! Column store: one record per column of the uploaded data table.
//!
//! Columns are created in bulk from a parsed table and afterwards changed only
//! through the transition functions in [`crate::annotation`], applied with
//! [`ColumnStore::update`].

pub mod model;
pub mod store;
pub mod tabular;

pub use model::{CollectionMembership, Column, ColumnId, DataType, Level, Levels};
pub use store::{ColumnField, ColumnStore, changed_fields};
pub use tabular::{DataTable, initialize_columns};
