//! Schema validation of data dictionaries.
//!
//! The bundled schema (`schema/data_dictionary.schema.json`, Draft-07) is the
//! contract downstream harmonization tools read dictionaries against. A
//! dictionary that fails it can still be exported, but only on explicit
//! request.

use super::model::DataDictionary;
use crate::error::{AnnotatorError, Result};
use jsonschema::{Draft, JSONSchema};
use serde::Serialize;
use serde_json::Value;

const BUNDLED_SCHEMA: &str = include_str!("../../schema/data_dictionary.schema.json");

/// Outcome of a validation run.
///
/// `errors` holds the top-level key (the column name) of every failing
/// location, deduplicated and in first-reported order. Failures at the root
/// of the document are reported as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

pub struct DictionarySchema {
    compiled: JSONSchema,
}

impl DictionarySchema {
    pub fn bundled() -> Result<Self> {
        let schema: Value = serde_json::from_str(BUNDLED_SCHEMA)?;
        Self::from_value(&schema)
    }

    pub fn from_value(schema: &Value) -> Result<Self> {
        let compiled = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(schema)
            .map_err(|e| AnnotatorError::Schema(e.to_string()))?;
        Ok(Self { compiled })
    }

    /// Validate raw JSON, e.g. an uploaded file that has not been decoded.
    pub fn validate(&self, instance: &Value) -> ValidationReport {
        let Err(failures) = self.compiled.validate(instance) else {
            return ValidationReport {
                valid: true,
                errors: Vec::new(),
            };
        };

        let mut errors: Vec<String> = Vec::new();
        for failure in failures {
            tracing::debug!("Schema violation at {}: {failure}", failure.instance_path);
            let field = failure
                .instance_path
                .clone()
                .into_vec()
                .into_iter()
                .next()
                .unwrap_or_default();
            if !errors.contains(&field) {
                errors.push(field);
            }
        }

        ValidationReport {
            valid: false,
            errors,
        }
    }

    pub fn validate_dictionary(&self, dictionary: &DataDictionary) -> Result<ValidationReport> {
        Ok(self.validate(&dictionary.to_value()?))
    }
}

/// Validate against the bundled schema.
pub fn validate(dictionary: &DataDictionary) -> Result<ValidationReport> {
    DictionarySchema::bundled()?.validate_dictionary(dictionary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> DictionarySchema {
        DictionarySchema::bundled().expect("bundled schema compiles")
    }

    #[test]
    fn test_complete_dictionary_is_valid() {
        let report = schema().validate(&json!({
            "participant_id": {
                "Description": "Participant",
                "Annotations": {
                    "IsAbout": {"TermURL": "nb:ParticipantID", "Label": "Subject Unique Identifier"},
                    "VariableType": "Identifier"
                }
            },
            "sex": {
                "Description": "",
                "Levels": {"M": {"Description": "Male", "TermURL": "snomed:248153007"}},
                "Annotations": {
                    "IsAbout": {"TermURL": "nb:Sex", "Label": "Sex"},
                    "VariableType": "Categorical",
                    "Levels": {"M": {"TermURL": "snomed:248153007", "Label": "Male"}}
                }
            },
            "notes": {"Description": "Free text"}
        }));
        assert_eq!(report, ValidationReport { valid: true, errors: vec![] });
    }

    #[test]
    fn test_unmapped_level_reports_column() {
        let report = schema().validate(&json!({
            "sex": {
                "Description": "",
                "Levels": {"M": {"Description": ""}, "F": {"Description": ""}},
                "Annotations": {
                    "IsAbout": {"TermURL": "nb:Sex", "Label": "Sex"},
                    "VariableType": "Categorical",
                    "Levels": {"M": {}, "F": {}}
                }
            },
            "age": {"Description": ""}
        }));
        assert!(!report.valid);
        assert_eq!(report.errors, vec!["sex"]);
    }

    #[test]
    fn test_errors_are_deduplicated_per_column() {
        let report = schema().validate(&json!({
            "age": {
                "Units": 3,
                "Annotations": {
                    "IsAbout": {"TermURL": "nb:Age", "Label": "Age"},
                    "VariableType": "Continuous"
                }
            },
            "item": {
                "Description": "",
                "Annotations": {"IsAbout": {"TermURL": "nb:Assessment", "Label": "Assessment"}, "VariableType": "Collection"}
            }
        }));
        assert!(!report.valid);
        assert_eq!(report.errors, vec!["age", "item"]);
    }

    #[test]
    fn test_root_errors_use_empty_path() {
        let report = schema().validate(&json!([1, 2, 3]));
        assert!(!report.valid);
        assert_eq!(report.errors, vec![""]);
    }

    #[test]
    fn test_invalid_schema_is_an_error() {
        let result = DictionarySchema::from_value(&json!({"type": "not-a-type"}));
        assert!(matches!(result, Err(AnnotatorError::Schema(_))));
    }
}
