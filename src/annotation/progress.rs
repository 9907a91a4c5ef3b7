//! How far along an annotation is.

use super::variable::annotated_variable_type;
use crate::columns::{Column, ColumnId, DataType};
use crate::vocabulary::{VariableType, VocabularyRegistry};
use serde::Serialize;

/// A categorical level of a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelRef {
    pub column: ColumnId,
    pub value: String,
}

/// Summary of what is still missing before the dictionary is complete.
///
/// Every column the dictionary schema would reject shows up in one of the
/// lists, so a complete annotation always encodes to a valid dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnnotationProgress {
    pub total_columns: usize,
    pub mapped_columns: usize,
    /// Required variables no column is mapped to
    pub unmapped_required_variables: Vec<String>,
    /// Mapped columns whose variable declares no type and that have no data type
    pub untyped_columns: Vec<ColumnId>,
    /// Levels of mapped categorical columns without a resolvable term
    pub levels_without_terms: Vec<LevelRef>,
    /// Columns annotated as categorical that carry no categorical levels
    pub categorical_without_levels: Vec<ColumnId>,
    /// Columns annotated as continuous without a resolvable format
    pub continuous_without_format: Vec<ColumnId>,
    /// Collection columns not assigned to a collection
    pub ungrouped_columns: Vec<ColumnId>,
}

impl AnnotationProgress {
    pub fn is_complete(&self) -> bool {
        self.unmapped_required_variables.is_empty()
            && self.untyped_columns.is_empty()
            && self.levels_without_terms.is_empty()
            && self.categorical_without_levels.is_empty()
            && self.continuous_without_format.is_empty()
            && self.ungrouped_columns.is_empty()
    }
}

pub fn annotation_progress(columns: &[Column], registry: &VocabularyRegistry) -> AnnotationProgress {
    let mut progress = AnnotationProgress {
        total_columns: columns.len(),
        ..AnnotationProgress::default()
    };

    for column in columns {
        let Some(variable) = column
            .standardized_variable
            .as_deref()
            .and_then(|id| registry.get_variable(id))
        else {
            continue;
        };
        progress.mapped_columns += 1;

        let categorical_levels = column
            .levels
            .as_ref()
            .filter(|_| column.data_type == Some(DataType::Categorical));

        if variable.variable_type != Some(VariableType::Collection)
            && let Some(levels) = categorical_levels
        {
            let incomplete = levels.iter().filter(|(_, level)| {
                level
                    .standardized_term
                    .as_deref()
                    .and_then(|id| registry.term(id))
                    .is_none()
            });
            progress
                .levels_without_terms
                .extend(incomplete.map(|(value, _)| LevelRef {
                    column: column.id.clone(),
                    value: value.clone(),
                }));
        }

        match annotated_variable_type(column, variable) {
            None => progress.untyped_columns.push(column.id.clone()),
            Some(VariableType::Categorical) => {
                if categorical_levels.is_none() {
                    progress.categorical_without_levels.push(column.id.clone());
                }
            }
            Some(VariableType::Continuous) => {
                let has_format = column.data_type == Some(DataType::Continuous)
                    && column.format.as_deref().and_then(|id| registry.format(id)).is_some();
                if !has_format {
                    progress.continuous_without_format.push(column.id.clone());
                }
            }
            Some(VariableType::Collection) => {
                let grouped = column
                    .is_part_of
                    .as_ref()
                    .and_then(|membership| membership.term())
                    .is_some_and(|id| registry.term(id).is_some());
                if !grouped {
                    progress.ungrouped_columns.push(column.id.clone());
                }
            }
            Some(VariableType::Identifier) => {}
        }
    }

    progress.unmapped_required_variables = registry
        .required_variables()
        .filter(|variable| {
            !columns
                .iter()
                .any(|c| c.standardized_variable.as_deref() == Some(variable.id.as_str()))
        })
        .map(|variable| variable.id.clone())
        .collect();

    progress
}
