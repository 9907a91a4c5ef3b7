//! Single-field edits: descriptions, level annotations, units, formats and
//! collection membership.
//!
//! Edits that do not fit the column's current shape (a level that does not
//! exist, units on a categorical column) leave the column unchanged. Ids that
//! do not resolve in the registry are stored as absent.

use crate::columns::{CollectionMembership, Column, DataType};
use crate::vocabulary::VocabularyRegistry;

/// Set the free-text description; an empty string clears it.
pub fn set_description(column: &Column, description: &str) -> Column {
    let mut next = column.clone();
    next.description = (!description.is_empty()).then(|| description.to_owned());
    next
}

pub fn set_level_description(column: &Column, value: &str, description: &str) -> Column {
    let mut next = column.clone();
    if let Some(level) = next.levels.as_mut().and_then(|l| l.get_mut(value)) {
        level.description = description.to_owned();
    }
    next
}

/// Map a level to a standardized term.
///
/// The term must exist and, when the column is mapped, belong to the column's
/// variable; anything else clears the mapping.
pub fn set_level_term(
    column: &Column,
    value: &str,
    term_id: Option<&str>,
    registry: &VocabularyRegistry,
) -> Column {
    let resolved = term_id.and_then(|id| {
        let term = registry.term(id)?;
        let belongs = column
            .standardized_variable
            .as_deref()
            .is_none_or(|variable| term.standardized_variable_id == variable);
        if !belongs {
            tracing::warn!(
                "Term {id} does not belong to {}, clearing level {value} of column {}",
                term.standardized_variable_id,
                column.id
            );
        }
        belongs.then(|| term.id.clone())
    });

    let mut next = column.clone();
    if let Some(level) = next.levels.as_mut().and_then(|l| l.get_mut(value)) {
        level.standardized_term = resolved;
    }
    next
}

pub fn set_units(column: &Column, units: &str) -> Column {
    let mut next = column.clone();
    if next.data_type == Some(DataType::Continuous) {
        next.units = Some(units.to_owned());
    }
    next
}

/// Pick a format for a mapped continuous column. Unknown formats, or formats
/// of another variable, clear it.
///
/// Formats are only exported as part of a column's annotations, so unmapped
/// columns are left unchanged.
pub fn set_format(
    column: &Column,
    format_id: Option<&str>,
    registry: &VocabularyRegistry,
) -> Column {
    let mut next = column.clone();
    let Some(variable) = column.standardized_variable.as_deref() else {
        return next;
    };
    if next.data_type != Some(DataType::Continuous) {
        return next;
    }
    next.format = format_id
        .and_then(|id| registry.format(id))
        .filter(|format| format.standardized_variable_id == variable)
        .map(|format| format.id.clone());
    next
}

/// Assign a multi-column measure column to a collection term, or back to the
/// ungrouped bucket with `None`.
pub fn set_is_part_of(
    column: &Column,
    term_id: Option<&str>,
    registry: &VocabularyRegistry,
) -> Column {
    let mut next = column.clone();
    if next.is_part_of.is_none() {
        return next;
    }
    let term = term_id.and_then(|id| registry.term(id)).filter(|term| {
        column.standardized_variable.as_deref() == Some(term.standardized_variable_id.as_str())
    });
    next.is_part_of = Some(match term {
        Some(term) => CollectionMembership::Term(term.id.clone()),
        None => CollectionMembership::Ungrouped,
    });
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{apply_data_type, apply_standardized_variable};
    use crate::test_support::sample_registry;

    fn sex_column() -> Column {
        let registry = sample_registry();
        let column = Column::new("3", "sex", ["M", "F"].map(str::to_owned).to_vec());
        apply_standardized_variable(&column, Some("nb:Sex"), &registry)
    }

    #[test]
    fn test_empty_description_is_absent() {
        let described = set_description(&sex_column(), "Participant sex");
        assert_eq!(described.description.as_deref(), Some("Participant sex"));
        assert_eq!(set_description(&described, "").description, None);
    }

    #[test]
    fn test_level_term_must_belong_to_variable() {
        let registry = sample_registry();
        let mapped = set_level_term(&sex_column(), "M", Some("snomed:248153007"), &registry);
        let level = mapped.levels.as_ref().and_then(|l| l.get("M"));
        assert_eq!(
            level.and_then(|l| l.standardized_term.as_deref()),
            Some("snomed:248153007")
        );

        let wrong = set_level_term(&mapped, "M", Some("nb:cogatlas-stroop"), &registry);
        let level = wrong.levels.as_ref().and_then(|l| l.get("M"));
        assert_eq!(level.and_then(|l| l.standardized_term.as_deref()), None);
    }

    #[test]
    fn test_level_description_on_unknown_level_is_ignored() {
        let column = sex_column();
        assert_eq!(set_level_description(&column, "X", "Unknown"), column);
    }

    #[test]
    fn test_units_only_on_continuous_columns() {
        let column = sex_column();
        assert_eq!(set_units(&column, "years").units, None);

        let continuous = apply_data_type(&column, Some(DataType::Continuous));
        assert_eq!(
            set_units(&continuous, "years").units.as_deref(),
            Some("years")
        );
    }

    #[test]
    fn test_format_must_resolve_for_the_variable() {
        let registry = sample_registry();
        let age = apply_standardized_variable(
            &Column::new("2", "age", vec!["30".to_owned()]),
            Some("nb:Age"),
            &registry,
        );
        let with_format = set_format(&age, Some("nb:FromFloat"), &registry);
        assert_eq!(with_format.format.as_deref(), Some("nb:FromFloat"));
        assert_eq!(set_format(&with_format, Some("nb:Nope"), &registry).format, None);
    }

    #[test]
    fn test_format_needs_a_mapped_column() {
        let registry = sample_registry();
        let column = Column::new("2", "age", vec!["30".to_owned()]);
        let continuous = apply_data_type(&column, Some(DataType::Continuous));
        assert_eq!(
            set_format(&continuous, Some("nb:FromFloat"), &registry),
            continuous
        );
    }

    #[test]
    fn test_is_part_of_only_on_multi_column_columns() {
        let registry = sample_registry();
        let sex = sex_column();
        assert_eq!(set_is_part_of(&sex, Some("nb:cogatlas-stroop"), &registry), sex);

        let item = apply_standardized_variable(
            &Column::new("4", "stroop_1", vec!["12".to_owned()]),
            Some("nb:Assessment"),
            &registry,
        );
        let grouped = set_is_part_of(&item, Some("nb:cogatlas-stroop"), &registry);
        assert_eq!(
            grouped.is_part_of,
            Some(CollectionMembership::Term("nb:cogatlas-stroop".to_owned()))
        );
        let ungrouped = set_is_part_of(&grouped, None, &registry);
        assert_eq!(ungrouped.is_part_of, Some(CollectionMembership::Ungrouped));
    }
}
