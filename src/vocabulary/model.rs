//! Strongly-typed vocabulary entries.
//!
//! These are produced only by [`super::VocabularyRegistry`] after the raw
//! configuration has been normalised; nothing downstream sees the raw shapes.

use serde::{Deserialize, Serialize};

/// The kind of values a standardized variable describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    Categorical,
    Continuous,
    Identifier,
    Collection,
}

impl VariableType {
    /// Label used for `Annotations.VariableType` in a data dictionary.
    pub fn dictionary_label(self) -> &'static str {
        match self {
            Self::Categorical => "Categorical",
            Self::Continuous => "Continuous",
            Self::Identifier => "Identifier",
            Self::Collection => "Collection",
        }
    }

    /// Inverse of [`Self::dictionary_label`], case-insensitive.
    pub fn from_dictionary_label(label: &str) -> Option<Self> {
        match label.to_ascii_lowercase().as_str() {
            "categorical" => Some(Self::Categorical),
            "continuous" => Some(Self::Continuous),
            "identifier" => Some(Self::Identifier),
            "collection" => Some(Self::Collection),
            _ => None,
        }
    }
}

/// A vocabulary concept a column can be mapped to (e.g. `nb:Age`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardizedVariable {
    /// Namespaced identifier, e.g. `nb:Age`
    pub id: String,
    pub name: String,
    pub variable_type: Option<VariableType>,
    pub required: bool,
    pub description: Option<String>,
    /// Instances are assembled from several columns grouped by a collection term
    pub is_multi_column_measure: bool,
    /// Several columns may be mapped to this variable without grouping
    pub can_have_multiple_columns: bool,
    pub same_as: Option<String>,
}

impl StandardizedVariable {
    /// Whether at most one column may be mapped to this variable.
    pub fn is_single_column(&self) -> bool {
        !self.is_multi_column_measure && !self.can_have_multiple_columns
    }
}

/// A controlled value within a categorical or collection variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardizedTerm {
    /// Namespaced identifier, e.g. `snomed:248153007`
    pub id: String,
    pub standardized_variable_id: String,
    pub label: String,
    pub abbreviation: Option<String>,
    pub description: Option<String>,
    pub same_as: Option<String>,
    pub status: Option<String>,
    /// Can serve as the grouping target of a multi-column measure
    pub is_collection: bool,
}

/// A value format for continuous variables (e.g. float, ISO 8601 duration).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardizedFormat {
    pub id: String,
    pub standardized_variable_id: String,
    pub label: String,
    pub examples: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_column_requires_both_flags_off() {
        let mut variable = StandardizedVariable {
            id: "nb:ParticipantID".to_owned(),
            name: "Participant ID".to_owned(),
            variable_type: Some(VariableType::Identifier),
            required: true,
            description: None,
            is_multi_column_measure: false,
            can_have_multiple_columns: false,
            same_as: None,
        };
        assert!(variable.is_single_column());

        variable.can_have_multiple_columns = true;
        assert!(!variable.is_single_column());
    }

    #[test]
    fn test_dictionary_labels_are_case_insensitive() {
        assert_eq!(
            VariableType::from_dictionary_label("CATEGORICAL"),
            Some(VariableType::Categorical)
        );
        assert_eq!(VariableType::from_dictionary_label("ordinal"), None);
    }
}
