//! Data types and the data-type resolver.
//!
//! A rule's data type is not a property of its field alone: it depends on the
//! operator too. `resolve_data_type` applies the two context-dependent
//! overrides before falling back on the field's declared type.

use serde::{Deserialize, Serialize};

use super::field::Field;
use super::operator::OperatorType;

/// Semantic kind of a rule, governing its operators and its validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataType {
    String,
    Number,
    Boolean,
    Enum,
    /// Free-form key/value properties (`propertyName` + `propertyValues`)
    Property,
    /// Boolean groups and composite rules
    Combinator,
    /// Reference to other filters by UUID
    FilterUuid,
}

impl DataType {
    /// The wire spelling, as written in the `dataType` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::String => "STRING",
            DataType::Number => "NUMBER",
            DataType::Boolean => "BOOLEAN",
            DataType::Enum => "ENUM",
            DataType::Property => "PROPERTY",
            DataType::Combinator => "COMBINATOR",
            DataType::FilterUuid => "FILTER_UUID",
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve the effective data type of a `(field, operator)` pair.
///
/// - `IS_PART_OF` / `IS_NOT_PART_OF` always yield `FILTER_UUID`.
/// - `regulatingTerminal` with `EXISTS` / `NOT_EXISTS` yields `STRING`.
/// - Otherwise the field's declared type.
///
/// Returns `None` for an unknown field; callers treat that as "unsupported"
/// and neither render nor export anything for it.
pub fn resolve_data_type(field: &str, operator: Option<OperatorType>) -> Option<DataType> {
    if matches!(
        operator,
        Some(OperatorType::IsPartOf) | Some(OperatorType::IsNotPartOf)
    ) {
        return Some(DataType::FilterUuid);
    }

    let field = Field::from_name(field)?;

    if field == Field::RegulatingTerminal
        && matches!(
            operator,
            Some(OperatorType::Exists) | Some(OperatorType::NotExists)
        )
    {
        return Some(DataType::String);
    }

    Some(field.descriptor().data_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_type_is_used_by_default() {
        assert_eq!(
            resolve_data_type("nominalVoltage", Some(OperatorType::Equals)),
            Some(DataType::Number)
        );
        assert_eq!(
            resolve_data_type("name", Some(OperatorType::Contains)),
            Some(DataType::String)
        );
        assert_eq!(
            resolve_data_type("freeProperties", Some(OperatorType::Is)),
            Some(DataType::Property)
        );
    }

    #[test]
    fn part_of_operators_force_filter_uuid() {
        assert_eq!(
            resolve_data_type("id", Some(OperatorType::IsPartOf)),
            Some(DataType::FilterUuid)
        );
        assert_eq!(
            resolve_data_type("voltageLevelId", Some(OperatorType::IsNotPartOf)),
            Some(DataType::FilterUuid)
        );
    }

    #[test]
    fn part_of_wins_even_for_unknown_field() {
        assert_eq!(
            resolve_data_type("", Some(OperatorType::IsPartOf)),
            Some(DataType::FilterUuid)
        );
    }

    #[test]
    fn regulating_terminal_existence_is_string() {
        assert_eq!(
            resolve_data_type("regulatingTerminal", Some(OperatorType::Exists)),
            Some(DataType::String)
        );
        assert_eq!(
            resolve_data_type("regulatingTerminal", Some(OperatorType::NotExists)),
            Some(DataType::String)
        );
        assert_eq!(
            resolve_data_type("regulatingTerminal", Some(OperatorType::Is)),
            Some(DataType::Combinator)
        );
    }

    #[test]
    fn unknown_field_is_unsupported() {
        assert_eq!(resolve_data_type("bogus", Some(OperatorType::Equals)), None);
        assert_eq!(resolve_data_type("", None), None);
    }

    #[test]
    fn wire_spelling() {
        assert_eq!(DataType::FilterUuid.as_str(), "FILTER_UUID");
        assert_eq!(
            serde_json::to_string(&DataType::FilterUuid).unwrap(),
            "\"FILTER_UUID\""
        );
    }
}
