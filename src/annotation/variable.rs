//! Mapping columns to standardized variables.

use super::data_type::apply_data_type;
use crate::columns::{CollectionMembership, Column, DataType};
use crate::vocabulary::{StandardizedVariable, VariableType, VocabularyRegistry};

/// Map a column to a standardized variable, or un-map it with `None`.
///
/// The variable and its collection membership are set first, then the data
/// type is derived from the variable and applied through [`apply_data_type`].
/// Un-mapping keeps whatever data type the user chose by hand; an unknown id
/// is stored as-is and otherwise treated like no variable.
pub fn apply_standardized_variable(
    column: &Column,
    variable_id: Option<&str>,
    registry: &VocabularyRegistry,
) -> Column {
    let mut next = column.clone();
    next.standardized_variable = variable_id.map(str::to_owned);

    let Some(variable) = variable_id.and_then(|id| registry.get_variable(id)) else {
        if let Some(id) = variable_id {
            tracing::warn!("Column {} mapped to unknown variable {id}", column.id);
        }
        next.is_part_of = None;
        return next;
    };

    next.is_part_of = if variable.is_multi_column_measure {
        // A collection picked for another variable does not carry over.
        match next.is_part_of.take() {
            Some(CollectionMembership::Term(term))
                if registry
                    .term(&term)
                    .is_some_and(|t| t.standardized_variable_id == variable.id) =>
            {
                Some(CollectionMembership::Term(term))
            }
            _ => Some(CollectionMembership::Ungrouped),
        }
    } else {
        None
    };

    let data_type = derived_data_type(variable.variable_type, next.data_type);
    apply_data_type(&next, data_type)
}

/// Data type implied by a variable type; `current` when the variable declares none.
pub fn derived_data_type(
    variable_type: Option<VariableType>,
    current: Option<DataType>,
) -> Option<DataType> {
    match variable_type {
        Some(VariableType::Categorical) => Some(DataType::Categorical),
        Some(VariableType::Continuous) => Some(DataType::Continuous),
        Some(VariableType::Identifier | VariableType::Collection) => None,
        None => current,
    }
}

/// Variable type written to a mapped column's annotations: the variable's own
/// type, or the column's data type when the variable declares none.
pub fn annotated_variable_type(
    column: &Column,
    variable: &StandardizedVariable,
) -> Option<VariableType> {
    variable.variable_type.or(match column.data_type {
        Some(DataType::Categorical) => Some(VariableType::Categorical),
        Some(DataType::Continuous) => Some(VariableType::Continuous),
        None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_registry;

    fn column() -> Column {
        Column::new("2", "age", ["30", "41", "N/A"].map(str::to_owned).to_vec())
    }

    #[test]
    fn test_continuous_variable_sets_units() {
        let registry = sample_registry();
        let next = apply_standardized_variable(&column(), Some("nb:Age"), &registry);
        assert_eq!(next.standardized_variable.as_deref(), Some("nb:Age"));
        assert_eq!(next.data_type, Some(DataType::Continuous));
        assert_eq!(next.units.as_deref(), Some(""));
        assert_eq!(next.is_part_of, None);
    }

    #[test]
    fn test_collection_variable_clears_data_type() {
        let registry = sample_registry();
        let categorical = apply_data_type(&column(), Some(DataType::Categorical));
        let next = apply_standardized_variable(&categorical, Some("nb:Assessment"), &registry);

        assert_eq!(next.data_type, None);
        assert_eq!(next.levels, None);
        assert_eq!(next.units, None);
        assert_eq!(next.is_part_of, Some(CollectionMembership::Ungrouped));
    }

    #[test]
    fn test_identifier_variable_clears_data_type() {
        let registry = sample_registry();
        let continuous = apply_data_type(&column(), Some(DataType::Continuous));
        let next = apply_standardized_variable(&continuous, Some("nb:ParticipantID"), &registry);
        assert_eq!(next.data_type, None);
        assert_eq!(next.units, None);
    }

    #[test]
    fn test_unmapping_keeps_manual_data_type() {
        let registry = sample_registry();
        let mapped = apply_standardized_variable(&column(), Some("nb:Assessment"), &registry);
        let manual = apply_data_type(&mapped, Some(DataType::Categorical));
        let unmapped = apply_standardized_variable(&manual, None, &registry);

        assert_eq!(unmapped.standardized_variable, None);
        assert_eq!(unmapped.is_part_of, None);
        assert_eq!(unmapped.data_type, Some(DataType::Categorical));
        assert!(unmapped.levels.is_some());
    }

    #[test]
    fn test_untyped_variable_keeps_current_data_type() {
        let registry = sample_registry();
        let categorical = apply_data_type(&column(), Some(DataType::Categorical));
        let next = apply_standardized_variable(&categorical, Some("nb:Diagnosis"), &registry);
        assert_eq!(next.data_type, Some(DataType::Categorical));
        assert_eq!(next.levels, categorical.levels);
    }

    #[test]
    fn test_unknown_variable_is_stored_but_not_resolved() {
        let registry = sample_registry();
        let next = apply_standardized_variable(&column(), Some("nb:Nope"), &registry);
        assert_eq!(next.standardized_variable.as_deref(), Some("nb:Nope"));
        assert_eq!(next.data_type, None);
        assert_eq!(next.is_part_of, None);
    }

    #[test]
    fn test_collection_term_kept_when_remapping_same_variable() {
        let registry = sample_registry();
        let mut mapped = apply_standardized_variable(&column(), Some("nb:Assessment"), &registry);
        mapped.is_part_of = Some(CollectionMembership::Term("nb:cogatlas-stroop".to_owned()));
        let again = apply_standardized_variable(&mapped, Some("nb:Assessment"), &registry);
        assert_eq!(
            again.is_part_of,
            Some(CollectionMembership::Term("nb:cogatlas-stroop".to_owned()))
        );
    }
}
