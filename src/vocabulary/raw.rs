//! Raw vocabulary configuration as it appears on disk.
//!
//! A configuration directory holds a `config.json` describing one or more
//! namespaces of standardized variables. Categorical and collection variables
//! point at a terms file (or list their terms inline); continuous variables may
//! list formats. Ids in these files are local; the registry namespaces them.

use super::model::VariableType;
use serde::{Deserialize, Serialize};

/// Name of the configuration file inside a vocabulary directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Root of `config.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawConfig {
    /// Display name of the configuration (e.g. "Neurobagel")
    #[serde(default)]
    pub name: String,

    pub namespaces: Vec<RawNamespace>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawNamespace {
    pub namespace_prefix: String,

    #[serde(default)]
    pub namespace_url: Option<String>,

    #[serde(default)]
    pub standardized_variables: Vec<RawVariable>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawVariable {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub data_type: Option<VariableType>,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub is_multi_column_measure: bool,

    #[serde(default)]
    pub can_have_multiple_columns: bool,

    #[serde(default)]
    pub same_as: Option<String>,

    /// File (relative to the configuration directory) holding this variable's terms
    #[serde(default)]
    pub terms_file: Option<String>,

    /// Terms listed inline, namespaced with the variable's prefix
    #[serde(default)]
    pub terms: Vec<RawTerm>,

    #[serde(default)]
    pub formats: Vec<RawFormat>,
}

/// One namespace block of a terms file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTermNamespace {
    pub namespace_prefix: String,

    #[serde(default)]
    pub namespace_url: Option<String>,

    #[serde(default)]
    pub vocabulary_name: Option<String>,

    #[serde(default)]
    pub terms: Vec<RawTerm>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTerm {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub abbreviation: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub same_as: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    /// Defaults to `true` for terms of collection variables
    #[serde(default)]
    pub is_collection: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawFormat {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub examples: Vec<String>,
}

/// Build a namespaced identifier, e.g. `("nb", "Age")` -> `nb:Age`.
pub fn namespaced_id(prefix: &str, local_id: &str) -> String {
    format!("{prefix}:{local_id}")
}
