//! Typed shape of a data dictionary.
//!
//! The dictionary is a JSON object keyed by column name. Entries follow the
//! BIDS sidecar conventions (`Description`, `Levels`, `Units`) with an
//! `Annotations` block carrying the vocabulary mapping. Every field is
//! optional when reading so that partially annotated or hand-written
//! dictionaries can still be imported.

use crate::error::{AnnotatorError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Column name -> entry, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataDictionary {
    pub entries: IndexMap<String, DictionaryEntry>,
}

impl DataDictionary {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(AnnotatorError::from)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(AnnotatorError::from)
    }

    pub fn to_value(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).map_err(AnnotatorError::from)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(AnnotatorError::from)
    }

    pub fn get(&self, column_name: &str) -> Option<&DictionaryEntry> {
        self.entries.get(column_name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DictionaryEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub levels: Option<IndexMap<String, DictionaryLevel>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Annotations>,
}

/// A level in the BIDS part of an entry.
///
/// Plain BIDS sidecars write levels as `"value": "description"`; both that and
/// the object form are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LevelRepr")]
pub struct DictionaryLevel {
    #[serde(rename = "Description")]
    pub description: String,

    #[serde(rename = "TermURL", default, skip_serializing_if = "Option::is_none")]
    pub term_url: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LevelRepr {
    Text(String),
    Object {
        #[serde(rename = "Description", default)]
        description: Option<String>,
        #[serde(rename = "TermURL", default)]
        term_url: Option<String>,
    },
}

impl From<LevelRepr> for DictionaryLevel {
    fn from(repr: LevelRepr) -> Self {
        match repr {
            LevelRepr::Text(description) => Self {
                description,
                term_url: None,
            },
            LevelRepr::Object {
                description,
                term_url,
            } => Self {
                description: description.unwrap_or_default(),
                term_url,
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Annotations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_about: Option<TermRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable_type: Option<String>,

    /// An empty object marks a level that still needs a term
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub levels: Option<IndexMap<String, TermRef>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_part_of: Option<TermRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_values: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<TermRef>,
}

/// `{ "TermURL": ..., "Label": ... }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermRef {
    #[serde(rename = "TermURL", default, skip_serializing_if = "Option::is_none")]
    pub term_url: Option<String>,

    #[serde(rename = "Label", default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl TermRef {
    pub fn new(term_url: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            term_url: Some(term_url.into()),
            label: Some(label.into()),
        }
    }
}
