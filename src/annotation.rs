//! Annotation transition functions.
//!
//! Every function here takes a column (or a set of columns) by reference and
//! returns a new value; inputs are never modified. They keep the column's
//! fields consistent with each other:
//!
//! - `levels` exists only on categorical columns, `units` only on continuous ones
//! - `is_part_of` exists only when the mapped variable is a multi-column measure
//! - level keys are the observed values minus those flagged missing
//! - `format` exists only on continuous columns
//!
//! None of them fail. References that do not resolve in the vocabulary are
//! treated as absent.
//!
//! The [`ColumnStore`] helpers at the bottom apply a transition to one column
//! and return the next store snapshot:
//!
//! ```no_run
//! use annotator::columns::{ColumnStore, DataType};
//! use annotator::vocabulary::VocabularyRegistry;
//!
//! # fn example(store: ColumnStore, registry: VocabularyRegistry) {
//! let store = store
//!     .set_standardized_variable("3", Some("nb:Sex"), &registry)
//!     .set_level_missing("3", "N/A", true)
//!     .set_level_term("3", "M", Some("snomed:248153007"), &registry);
//! assert_eq!(store.column("3").data_type, Some(DataType::Categorical));
//! # }
//! ```

pub mod availability;
pub mod collections;
pub mod data_type;
pub mod fields;
pub mod missing;
pub mod progress;
pub mod variable;

pub use availability::{VariableOption, is_single_column_variable_available, variable_options};
pub use collections::{CollectionGroup, group_multi_column_measure_columns};
pub use data_type::{apply_data_type, initial_levels};
pub use fields::{
    set_description, set_format, set_is_part_of, set_level_description, set_level_term, set_units,
};
pub use missing::set_level_missing;
pub use progress::{AnnotationProgress, LevelRef, annotation_progress};
pub use variable::{annotated_variable_type, apply_standardized_variable, derived_data_type};

use crate::columns::{ColumnStore, DataType};
use crate::vocabulary::VocabularyRegistry;

impl ColumnStore {
    pub fn set_data_type(&self, id: &str, data_type: Option<DataType>) -> Self {
        self.update(id, |c| apply_data_type(c, data_type))
    }

    pub fn set_standardized_variable(
        &self,
        id: &str,
        variable_id: Option<&str>,
        registry: &VocabularyRegistry,
    ) -> Self {
        self.update(id, |c| apply_standardized_variable(c, variable_id, registry))
    }

    pub fn set_level_missing(&self, id: &str, value: &str, is_missing: bool) -> Self {
        self.update(id, |c| set_level_missing(c, value, is_missing))
    }

    pub fn set_description(&self, id: &str, description: &str) -> Self {
        self.update(id, |c| set_description(c, description))
    }

    pub fn set_level_description(&self, id: &str, value: &str, description: &str) -> Self {
        self.update(id, |c| set_level_description(c, value, description))
    }

    pub fn set_level_term(
        &self,
        id: &str,
        value: &str,
        term_id: Option<&str>,
        registry: &VocabularyRegistry,
    ) -> Self {
        self.update(id, |c| set_level_term(c, value, term_id, registry))
    }

    pub fn set_units(&self, id: &str, units: &str) -> Self {
        self.update(id, |c| set_units(c, units))
    }

    pub fn set_format(
        &self,
        id: &str,
        format_id: Option<&str>,
        registry: &VocabularyRegistry,
    ) -> Self {
        self.update(id, |c| set_format(c, format_id, registry))
    }

    pub fn set_is_part_of(
        &self,
        id: &str,
        term_id: Option<&str>,
        registry: &VocabularyRegistry,
    ) -> Self {
        self.update(id, |c| set_is_part_of(c, term_id, registry))
    }

    /// Groups for one multi-column measure variable; see
    /// [`group_multi_column_measure_columns`].
    pub fn collection_groups(
        &self,
        variable_id: &str,
        registry: &VocabularyRegistry,
    ) -> Vec<CollectionGroup> {
        group_multi_column_measure_columns(self.iter(), variable_id, registry)
    }
}
