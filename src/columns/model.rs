//! Column records and their annotation fields.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Column identifier: the 1-based position of the header, as a string.
pub type ColumnId = String;

/// Annotated data type of a column.
///
/// Identifier and collection variables leave a column without a data type,
/// which is represented by `Option<DataType>::None` on [`Column`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Categorical,
    Continuous,
}

impl std::str::FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "categorical" => Ok(Self::Categorical),
            "continuous" => Ok(Self::Continuous),
            other => Err(format!("unknown data type '{other}'")),
        }
    }
}

/// Annotation of a single categorical value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub description: String,
    /// Id of the standardized term this value maps to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standardized_term: Option<String>,
}

/// Raw value -> annotation, in first-seen order.
pub type Levels = IndexMap<String, Level>;

/// Membership of a column in a multi-column measure.
///
/// Only present on columns whose variable is a multi-column measure; a fresh
/// mapping starts out [`CollectionMembership::Ungrouped`] until the user picks
/// a collection term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionMembership {
    Ungrouped,
    Term(String),
}

impl CollectionMembership {
    pub fn term(&self) -> Option<&str> {
        match self {
            Self::Ungrouped => None,
            Self::Term(id) => Some(id),
        }
    }
}

/// One field of the uploaded table plus its accumulated annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    /// Source header
    pub name: String,
    /// Raw observed values, never modified after loading
    pub all_values: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standardized_variable: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_part_of: Option<CollectionMembership>,

    /// Present iff `data_type` is categorical
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub levels: Option<Levels>,

    /// Present iff `data_type` is continuous
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,

    /// Raw values flagged as non-responses
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_values: Vec<String>,

    /// Id of a standardized format, continuous columns only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl Column {
    /// A column with no annotation.
    pub fn new(id: impl Into<ColumnId>, name: impl Into<String>, all_values: Vec<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            all_values,
            description: None,
            data_type: None,
            standardized_variable: None,
            is_part_of: None,
            levels: None,
            units: None,
            missing_values: Vec::new(),
            format: None,
        }
    }

    /// Distinct raw values in first-seen order.
    pub fn unique_values(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.all_values
            .iter()
            .map(String::as_str)
            .filter(|v| seen.insert(*v))
            .collect()
    }

    pub fn is_missing(&self, value: &str) -> bool {
        self.missing_values.iter().any(|v| v == value)
    }

    /// The same column with every annotation field cleared.
    pub fn without_annotation(&self) -> Self {
        Self::new(self.id.clone(), self.name.clone(), self.all_values.clone())
    }
}
