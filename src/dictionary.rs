//! Data dictionary codec.
//!
//! The data dictionary is the JSON artifact a user downloads at the end of an
//! annotation session and can upload again later to resume. This module
//! converts between it and the [`ColumnStore`](crate::columns::ColumnStore):
//!
//! - [`encode`]: columns -> dictionary
//! - [`decode`]: dictionary -> columns, matched by column name
//! - [`schema`]: validation against the bundled JSON schema, which gates export
//! - [`storage`]: reading and writing dictionary files
//!
//! ## Usage
//!
//! ```no_run
//! use annotator::columns::ColumnStore;
//! use annotator::dictionary::{encode, schema, storage};
//! use annotator::vocabulary::VocabularyRegistry;
//! use std::path::Path;
//!
//! # fn example(store: &ColumnStore, registry: &VocabularyRegistry) -> anyhow::Result<()> {
//! let dictionary = encode(store.iter(), registry);
//! let report = schema::validate(&dictionary)?;
//! if report.valid {
//!     storage::save_dictionary(&dictionary, Path::new("out"), "participants.tsv")?;
//! } else {
//!     println!("Incomplete columns: {:?}", report.errors);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Unresolvable vocabulary references are never written and never read back:
//! a term or variable id the registry does not know is treated as absent on
//! both sides.

pub mod decode;
pub mod encode;
pub mod model;
pub mod schema;
pub mod storage;

pub use decode::{decode, decode_column};
pub use encode::{encode, encode_column};
pub use model::{Annotations, DataDictionary, DictionaryEntry, DictionaryLevel, TermRef};
pub use schema::{DictionarySchema, ValidationReport};
