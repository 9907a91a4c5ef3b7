//! Data dictionary -> columns.

use super::model::{DataDictionary, DictionaryEntry};
use crate::annotation::{apply_data_type, derived_data_type};
use crate::columns::{CollectionMembership, Column, ColumnStore, DataType};
use crate::vocabulary::{VariableType, VocabularyRegistry};

/// Apply an uploaded dictionary to the store.
///
/// Entries are matched to columns by name; keys without a column are ignored.
/// A matched column's annotation is rebuilt from the entry alone, so anything
/// the dictionary does not say is cleared.
pub fn decode(
    dictionary: &DataDictionary,
    store: &ColumnStore,
    registry: &VocabularyRegistry,
) -> ColumnStore {
    let columns = store
        .iter()
        .map(|column| match dictionary.get(&column.name) {
            Some(entry) => decode_column(entry, column, registry),
            None => column.clone(),
        })
        .collect();

    let ignored = dictionary
        .entries
        .keys()
        .filter(|name| store.find_by_name(name).is_none())
        .count();
    if ignored > 0 {
        tracing::info!("Ignored {ignored} dictionary entries without a matching column");
    }
    store.replace_all(columns)
}

pub fn decode_column(entry: &DictionaryEntry, column: &Column, registry: &VocabularyRegistry) -> Column {
    let annotations = entry.annotations.as_ref();

    let mut next = column.without_annotation();
    next.description = entry.description.clone().filter(|d| !d.is_empty());
    if let Some(missing) = annotations.and_then(|a| a.missing_values.as_ref()) {
        next.missing_values = missing.clone();
    }

    let about = annotations
        .and_then(|a| a.is_about.as_ref())
        .and_then(|t| t.term_url.as_deref());
    let variable = about.and_then(|id| registry.get_variable(id));
    if let (Some(id), None) = (about, variable) {
        tracing::warn!("Dictionary entry {} refers to unknown variable {id}", column.name);
    }

    let data_type = match variable.and_then(|v| v.variable_type) {
        Some(variable_type) => derived_data_type(Some(variable_type), None),
        None => inferred_data_type(entry),
    };

    if let Some(variable) = variable {
        next.standardized_variable = Some(variable.id.clone());
        if variable.is_multi_column_measure {
            let term = annotations
                .and_then(|a| a.is_part_of.as_ref())
                .and_then(|t| t.term_url.as_deref())
                .and_then(|id| registry.term(id))
                .filter(|t| t.standardized_variable_id == variable.id);
            next.is_part_of = Some(match term {
                Some(term) => CollectionMembership::Term(term.id.clone()),
                None => CollectionMembership::Ungrouped,
            });
        }
    }

    // Seeds levels from the observed values minus the incoming missing values.
    let mut next = apply_data_type(&next, data_type);

    match data_type {
        Some(DataType::Categorical) => overlay_levels(&mut next, entry, registry),
        Some(DataType::Continuous) => {
            next.units = Some(entry.units.clone().unwrap_or_default());
            next.format = annotations
                .and_then(|a| a.format.as_ref())
                .and_then(|t| t.term_url.as_deref())
                .and_then(|id| registry.format(id))
                .map(|format| format.id.clone());
        }
        None => {}
    }

    next
}

/// Type for entries whose variable does not say: the `VariableType` label
/// first, then the shape of the entry.
fn inferred_data_type(entry: &DictionaryEntry) -> Option<DataType> {
    let labelled = entry
        .annotations
        .as_ref()
        .and_then(|a| a.variable_type.as_deref())
        .and_then(VariableType::from_dictionary_label);
    match labelled {
        Some(variable_type) => derived_data_type(Some(variable_type), None),
        None if entry.levels.is_some() => Some(DataType::Categorical),
        None if entry.units.is_some() => Some(DataType::Continuous),
        None => None,
    }
}

fn overlay_levels(column: &mut Column, entry: &DictionaryEntry, registry: &VocabularyRegistry) {
    let annotated = entry.annotations.as_ref().and_then(|a| a.levels.as_ref());
    let Some(levels) = column.levels.as_mut() else {
        return;
    };

    for (value, level) in levels.iter_mut() {
        let bids = entry.levels.as_ref().and_then(|l| l.get(value));
        if let Some(bids) = bids {
            level.description = bids.description.clone();
        }
        let term_url = annotated
            .and_then(|l| l.get(value))
            .and_then(|t| t.term_url.as_deref())
            .or_else(|| bids.and_then(|b| b.term_url.as_deref()));
        level.standardized_term = term_url
            .and_then(|id| registry.term(id))
            .map(|term| term.id.clone());
    }
}
