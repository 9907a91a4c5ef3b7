//! Read-only catalog of standardized variables, terms and formats.

use super::model::{StandardizedFormat, StandardizedTerm, StandardizedVariable, VariableType};
use super::raw::{CONFIG_FILE_NAME, RawConfig, RawTerm, RawTermNamespace, namespaced_id};
use crate::error::{AnnotatorError, Result, ResultExt as _};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::path::Path;

/// Lookup tables for one vocabulary configuration.
///
/// Populated once per configuration selection and never mutated afterwards.
/// Selecting another configuration builds a new registry; columns that still
/// reference ids from the old one are left alone.
#[derive(Debug, Clone, Default)]
pub struct VocabularyRegistry {
    name: String,
    variables: IndexMap<String, StandardizedVariable>,
    terms: IndexMap<String, StandardizedTerm>,
    formats: IndexMap<String, StandardizedFormat>,
}

impl VocabularyRegistry {
    /// Normalise a raw configuration into a registry.
    ///
    /// `term_files` maps a variable's `terms_file` name to the parsed file. A
    /// referenced file that is missing from the map is a configuration error.
    pub fn from_raw(
        config: &RawConfig,
        term_files: &HashMap<String, Vec<RawTermNamespace>>,
    ) -> Result<Self> {
        let mut registry = Self {
            name: config.name.clone(),
            ..Self::default()
        };

        for namespace in &config.namespaces {
            let prefix = namespace.namespace_prefix.as_str();
            if prefix.is_empty() {
                return Err(AnnotatorError::Vocabulary(
                    "namespace_prefix must not be empty".to_owned(),
                ));
            }

            for raw in &namespace.standardized_variables {
                let variable = StandardizedVariable {
                    id: namespaced_id(prefix, &raw.id),
                    name: raw.name.clone(),
                    variable_type: raw.data_type,
                    required: raw.required,
                    description: raw.description.clone(),
                    is_multi_column_measure: raw.is_multi_column_measure,
                    can_have_multiple_columns: raw.can_have_multiple_columns,
                    same_as: raw.same_as.clone(),
                };
                let collection_terms = variable.variable_type == Some(VariableType::Collection);

                for term in &raw.terms {
                    registry.insert_term(prefix, term, &variable.id, collection_terms);
                }

                if let Some(file) = &raw.terms_file {
                    let blocks = term_files.get(file).ok_or_else(|| {
                        AnnotatorError::Vocabulary(format!(
                            "terms file '{file}' referenced by {} was not supplied",
                            variable.id
                        ))
                    })?;
                    for block in blocks {
                        for term in &block.terms {
                            registry.insert_term(
                                &block.namespace_prefix,
                                term,
                                &variable.id,
                                collection_terms,
                            );
                        }
                    }
                }

                for format in &raw.formats {
                    let id = namespaced_id(prefix, &format.id);
                    registry.formats.insert(
                        id.clone(),
                        StandardizedFormat {
                            id,
                            standardized_variable_id: variable.id.clone(),
                            label: format.name.clone(),
                            examples: format.examples.clone(),
                        },
                    );
                }

                if registry.variables.contains_key(&variable.id) {
                    tracing::warn!("Duplicate standardized variable {}, keeping the last", variable.id);
                }
                registry.variables.insert(variable.id.clone(), variable);
            }
        }

        tracing::info!(
            "Loaded vocabulary '{}': {} variables, {} terms, {} formats",
            registry.name,
            registry.variables.len(),
            registry.terms.len(),
            registry.formats.len()
        );

        Ok(registry)
    }

    /// Load `config.json` and every terms file it references from `dir`.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let config: RawConfig = serde_json::from_str(&content)
            .map_err(|e| AnnotatorError::Vocabulary(format!("{}: {e}", config_path.display())))?;

        let mut term_files = HashMap::new();
        for file in config
            .namespaces
            .iter()
            .flat_map(|ns| &ns.standardized_variables)
            .filter_map(|v| v.terms_file.as_ref())
        {
            if term_files.contains_key(file) {
                continue;
            }
            let path = dir.join(file);
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read terms file {}", path.display()))?;
            let blocks: Vec<RawTermNamespace> = serde_json::from_str(&content)
                .map_err(|e| AnnotatorError::Vocabulary(format!("{}: {e}", path.display())))?;
            term_files.insert(file.clone(), blocks);
        }

        Self::from_raw(&config, &term_files)
    }

    fn insert_term(
        &mut self,
        prefix: &str,
        raw: &RawTerm,
        variable_id: &str,
        collection_terms: bool,
    ) {
        let id = namespaced_id(prefix, &raw.id);
        if let Some(existing) = self.terms.get(&id)
            && existing.standardized_variable_id != variable_id
        {
            tracing::warn!(
                "Term {id} is listed under {} and {variable_id}, keeping the last",
                existing.standardized_variable_id
            );
        }
        self.terms.insert(
            id.clone(),
            StandardizedTerm {
                id,
                standardized_variable_id: variable_id.to_owned(),
                label: raw.name.clone(),
                abbreviation: raw.abbreviation.clone(),
                description: raw.description.clone(),
                same_as: raw.same_as.clone(),
                status: raw.status.clone(),
                is_collection: raw.is_collection.unwrap_or(collection_terms),
            },
        );
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get_variable(&self, id: &str) -> Option<&StandardizedVariable> {
        self.variables.get(id)
    }

    pub fn term(&self, id: &str) -> Option<&StandardizedTerm> {
        self.terms.get(id)
    }

    pub fn format(&self, id: &str) -> Option<&StandardizedFormat> {
        self.formats.get(id)
    }

    /// All variables in configuration order.
    pub fn variables(&self) -> impl Iterator<Item = &StandardizedVariable> {
        self.variables.values()
    }

    /// Terms belonging to `variable_id`, in vocabulary order.
    pub fn terms_for(&self, variable_id: &str) -> Vec<&StandardizedTerm> {
        self.terms
            .values()
            .filter(|t| t.standardized_variable_id == variable_id)
            .collect()
    }

    /// Formats belonging to `variable_id`, in vocabulary order.
    pub fn formats_for(&self, variable_id: &str) -> Vec<&StandardizedFormat> {
        self.formats
            .values()
            .filter(|f| f.standardized_variable_id == variable_id)
            .collect()
    }

    /// `false` for unknown ids.
    pub fn is_multi_column_measure(&self, variable_id: &str) -> bool {
        self.variables
            .get(variable_id)
            .is_some_and(|v| v.is_multi_column_measure)
    }

    /// Ids of every multi-column measure variable.
    pub fn multi_column_measure_ids(&self) -> Vec<&str> {
        self.variables
            .values()
            .filter(|v| v.is_multi_column_measure)
            .map(|v| v.id.as_str())
            .collect()
    }

    pub fn required_variables(&self) -> impl Iterator<Item = &StandardizedVariable> {
        self.variables.values().filter(|v| v.required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::raw::{RawFormat, RawNamespace, RawVariable};

    fn raw_variable(id: &str, data_type: Option<VariableType>) -> RawVariable {
        RawVariable {
            id: id.to_owned(),
            name: id.to_owned(),
            data_type,
            required: false,
            description: None,
            is_multi_column_measure: false,
            can_have_multiple_columns: false,
            same_as: None,
            terms_file: None,
            terms: Vec::new(),
            formats: Vec::new(),
        }
    }

    fn raw_term(id: &str, name: &str) -> RawTerm {
        RawTerm {
            id: id.to_owned(),
            name: name.to_owned(),
            abbreviation: None,
            description: None,
            same_as: None,
            status: None,
            is_collection: None,
        }
    }

    fn sample_config() -> (RawConfig, HashMap<String, Vec<RawTermNamespace>>) {
        let mut age = raw_variable("Age", Some(VariableType::Continuous));
        age.formats.push(RawFormat {
            id: "FromFloat".to_owned(),
            name: "float".to_owned(),
            examples: vec!["31.5".to_owned()],
        });

        let mut sex = raw_variable("Sex", Some(VariableType::Categorical));
        sex.terms_file = Some("sex.json".to_owned());

        let mut assessment = raw_variable("Assessment", Some(VariableType::Collection));
        assessment.is_multi_column_measure = true;
        assessment.terms.push(raw_term("cogatlas-tsk1", "Stroop"));

        let config = RawConfig {
            name: "Test".to_owned(),
            namespaces: vec![RawNamespace {
                namespace_prefix: "nb".to_owned(),
                namespace_url: None,
                standardized_variables: vec![age, sex, assessment],
            }],
        };

        let mut term_files = HashMap::new();
        term_files.insert(
            "sex.json".to_owned(),
            vec![RawTermNamespace {
                namespace_prefix: "snomed".to_owned(),
                namespace_url: None,
                vocabulary_name: None,
                terms: vec![raw_term("248153007", "Male"), raw_term("248152002", "Female")],
            }],
        );
        (config, term_files)
    }

    #[test]
    fn test_ids_are_namespaced() {
        let (config, files) = sample_config();
        let registry = VocabularyRegistry::from_raw(&config, &files).expect("valid config");

        assert!(registry.get_variable("nb:Age").is_some());
        assert!(registry.get_variable("Age").is_none());
        assert_eq!(
            registry.term("snomed:248153007").map(|t| t.label.as_str()),
            Some("Male")
        );
        assert_eq!(
            registry.format("nb:FromFloat").map(|f| f.standardized_variable_id.as_str()),
            Some("nb:Age")
        );
    }

    #[test]
    fn test_derived_views() {
        let (config, files) = sample_config();
        let registry = VocabularyRegistry::from_raw(&config, &files).expect("valid config");

        assert_eq!(registry.terms_for("nb:Sex").len(), 2);
        assert_eq!(registry.formats_for("nb:Age").len(), 1);
        assert!(registry.formats_for("nb:Sex").is_empty());
        assert_eq!(registry.multi_column_measure_ids(), vec!["nb:Assessment"]);
        assert!(registry.is_multi_column_measure("nb:Assessment"));
        assert!(!registry.is_multi_column_measure("nb:Unknown"));
    }

    #[test]
    fn test_collection_terms_default_to_collection() {
        let (config, files) = sample_config();
        let registry = VocabularyRegistry::from_raw(&config, &files).expect("valid config");

        assert!(registry.term("nb:cogatlas-tsk1").is_some_and(|t| t.is_collection));
        assert!(registry.term("snomed:248152002").is_some_and(|t| !t.is_collection));
    }

    #[test]
    fn test_missing_terms_file_is_an_error() {
        let (config, _) = sample_config();
        let err = VocabularyRegistry::from_raw(&config, &HashMap::new())
            .expect_err("terms file is required");
        assert!(err.to_string().contains("sex.json"));
    }
}
