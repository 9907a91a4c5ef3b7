//! # Annotator - phenotypic data annotation library
//!
//! Annotator maps the columns of a tabular dataset (typically a BIDS
//! `participants.tsv`) to a controlled vocabulary of standardized variables,
//! terms and formats, and writes the result as a JSON data dictionary that
//! harmonization tools can read.
//!
//! ## Quick Start
//!
//! ```no_run
//! use annotator::columns::DataTable;
//! use annotator::dictionary::{encode, schema};
//! use annotator::vocabulary::VocabularyRegistry;
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let registry = VocabularyRegistry::load_dir(Path::new("vocabularies/Neurobagel"))?;
//! let store = DataTable::from_path(Path::new("participants.tsv"))?.to_columns();
//!
//! let store = store
//!     .set_standardized_variable("1", Some("nb:ParticipantID"), &registry)
//!     .set_standardized_variable("2", Some("nb:Age"), &registry);
//!
//! let dictionary = encode(store.iter(), &registry);
//! println!("valid: {}", schema::validate(&dictionary)?.valid);
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Modules
//!
//! - [`vocabulary`]: standardized variables, terms and formats, loaded from a
//!   configuration directory
//! - [`columns`]: the column store and TSV parsing
//! - [`annotation`]: pure transition functions that keep a column's
//!   annotation consistent
//! - [`dictionary`]: encoding, decoding and validating data dictionaries
//! - [`session`]: a saved annotation session
//! - [`config`], [`logging`], [`error`]: settings, log setup and error types
//!
//! ## Key Concepts
//!
//! ### Snapshots, not mutation
//!
//! A [`columns::ColumnStore`] is never changed in place. Each update returns
//! the next snapshot and bumps the touched column's revision, so a caller can
//! hold on to older snapshots or reject writes based on a stale one.
//!
//! ### Unknown ids are absent
//!
//! A variable, term or format id the registry does not know is not an error.
//! It is kept out of the encoded dictionary and ignored when decoding.

#![warn(clippy::all, rust_2018_idioms)]

pub mod annotation;
pub mod columns;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod logging;
pub mod session;
pub mod vocabulary;
