//! Vocabulary registry: standardized variables, terms and formats.
//!
//! A vocabulary configuration is read from a directory (see [`raw`]) and
//! normalised into a [`VocabularyRegistry`], which is the only form the rest
//! of the crate works with.
//!
//! ```no_run
//! use annotator::vocabulary::VocabularyRegistry;
//! use std::path::Path;
//!
//! # fn example() -> annotator::error::Result<()> {
//! let registry = VocabularyRegistry::load_dir(Path::new("vocabularies/Neurobagel"))?;
//! for term in registry.terms_for("nb:Sex") {
//!     println!("{} -> {}", term.id, term.label);
//! }
//! # Ok(())
//! # }
//! ```

pub mod model;
pub mod raw;
pub mod registry;

pub use model::{StandardizedFormat, StandardizedTerm, StandardizedVariable, VariableType};
pub use registry::VocabularyRegistry;
