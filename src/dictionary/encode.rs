//! Columns -> data dictionary.

use super::model::{Annotations, DataDictionary, DictionaryEntry, DictionaryLevel, TermRef};
use crate::annotation::annotated_variable_type;
use crate::columns::{Column, DataType};
use crate::vocabulary::{VariableType, VocabularyRegistry};
use indexmap::IndexMap;

/// Build the data dictionary for a set of columns.
///
/// Columns with an empty name are skipped. Only references that resolve in
/// the registry are written; a categorical level whose term does not resolve
/// becomes `{}` in `Annotations.Levels`, which schema validation reports as an
/// incomplete annotation.
pub fn encode<'a, I>(columns: I, registry: &VocabularyRegistry) -> DataDictionary
where
    I: IntoIterator<Item = &'a Column>,
{
    let entries = columns
        .into_iter()
        .filter(|c| !c.name.is_empty())
        .map(|c| (c.name.clone(), encode_column(c, registry)))
        .collect();
    DataDictionary { entries }
}

pub fn encode_column(column: &Column, registry: &VocabularyRegistry) -> DictionaryEntry {
    let categorical_levels = column
        .levels
        .as_ref()
        .filter(|_| column.data_type == Some(DataType::Categorical));

    let levels = categorical_levels.map(|levels| {
        levels
            .iter()
            .map(|(value, level)| {
                let term_url = level
                    .standardized_term
                    .as_deref()
                    .and_then(|id| registry.term(id))
                    .map(|term| term.id.clone());
                (
                    value.clone(),
                    DictionaryLevel {
                        description: level.description.clone(),
                        term_url,
                    },
                )
            })
            .collect()
    });

    let units = column
        .units
        .clone()
        .filter(|_| column.data_type == Some(DataType::Continuous));

    DictionaryEntry {
        description: Some(column.description.clone().unwrap_or_default()),
        levels,
        units,
        annotations: encode_annotations(column, registry),
    }
}

fn encode_annotations(column: &Column, registry: &VocabularyRegistry) -> Option<Annotations> {
    let variable = column
        .standardized_variable
        .as_deref()
        .and_then(|id| registry.get_variable(id))?;

    let variable_type = annotated_variable_type(column, variable);

    let mut annotations = Annotations {
        is_about: Some(TermRef::new(&variable.id, &variable.name)),
        variable_type: variable_type.map(|t| t.dictionary_label().to_owned()),
        ..Annotations::default()
    };

    if variable.variable_type != Some(VariableType::Collection)
        && column.data_type == Some(DataType::Categorical)
        && let Some(levels) = &column.levels
    {
        let annotated: IndexMap<String, TermRef> = levels
            .iter()
            .map(|(value, level)| {
                let term = level
                    .standardized_term
                    .as_deref()
                    .and_then(|id| registry.term(id));
                let term_ref = term
                    .map(|t| TermRef::new(&t.id, &t.label))
                    .unwrap_or_default();
                (value.clone(), term_ref)
            })
            .collect();
        annotations.levels = Some(annotated);
    }

    annotations.is_part_of = column
        .is_part_of
        .as_ref()
        .and_then(|membership| membership.term())
        .and_then(|id| registry.term(id))
        .map(|term| TermRef::new(&term.id, &term.label));

    if !column.missing_values.is_empty() {
        annotations.missing_values = Some(column.missing_values.clone());
    }

    if column.data_type == Some(DataType::Continuous) {
        annotations.format = column
            .format
            .as_deref()
            .and_then(|id| registry.format(id))
            .map(|format| TermRef::new(&format.id, &format.label));
    }

    Some(annotations)
}
