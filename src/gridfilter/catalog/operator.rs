//! Operator catalog.
//!
//! Every operator has two spellings: the internal token used by the editable
//! tree and the wire token (`custom_name`) used in persisted filters. The
//! operators a field offers start from a base set per data type and are then
//! adjusted by the explicit [`OPERATOR_OVERRIDES`] rules.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::data_type::DataType;
use super::field::Field;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperatorType {
    #[serde(rename = "=")]
    Equals,
    #[serde(rename = "!=")]
    NotEquals,
    #[serde(rename = "<")]
    Lower,
    #[serde(rename = "<=")]
    LowerOrEquals,
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = ">=")]
    GreaterOrEquals,
    #[serde(rename = "between")]
    Between,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "notIn")]
    NotIn,
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "is")]
    Is,
    #[serde(rename = "beginsWith")]
    BeginsWith,
    #[serde(rename = "endsWith")]
    EndsWith,
    #[serde(rename = "exists")]
    Exists,
    #[serde(rename = "notExists")]
    NotExists,
    #[serde(rename = "isPartOf")]
    IsPartOf,
    #[serde(rename = "isNotPartOf")]
    IsNotPartOf,
}

/// Static description of an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorDescriptor {
    pub operator: OperatorType,
    /// Internal token, used by the editable tree
    pub name: &'static str,
    /// Wire token, used by persisted filters
    pub custom_name: &'static str,
    pub label: &'static str,
}

impl OperatorDescriptor {
    const fn new(
        operator: OperatorType,
        name: &'static str,
        custom_name: &'static str,
        label: &'static str,
    ) -> Self {
        Self {
            operator,
            name,
            custom_name,
            label,
        }
    }
}

const EQUALS: OperatorDescriptor =
    OperatorDescriptor::new(OperatorType::Equals, "=", "EQUALS", "equals");
const NOT_EQUALS: OperatorDescriptor =
    OperatorDescriptor::new(OperatorType::NotEquals, "!=", "NOT_EQUALS", "not equals");
const LOWER: OperatorDescriptor =
    OperatorDescriptor::new(OperatorType::Lower, "<", "LOWER", "lower than");
const LOWER_OR_EQUALS: OperatorDescriptor = OperatorDescriptor::new(
    OperatorType::LowerOrEquals,
    "<=",
    "LOWER_OR_EQUALS",
    "lower or equals",
);
const GREATER: OperatorDescriptor =
    OperatorDescriptor::new(OperatorType::Greater, ">", "GREATER", "greater than");
const GREATER_OR_EQUALS: OperatorDescriptor = OperatorDescriptor::new(
    OperatorType::GreaterOrEquals,
    ">=",
    "GREATER_OR_EQUALS",
    "greater or equals",
);
const BETWEEN: OperatorDescriptor =
    OperatorDescriptor::new(OperatorType::Between, "between", "BETWEEN", "between");
const IN: OperatorDescriptor = OperatorDescriptor::new(OperatorType::In, "in", "IN", "in");
const NOT_IN: OperatorDescriptor =
    OperatorDescriptor::new(OperatorType::NotIn, "notIn", "NOT_IN", "not in");
const CONTAINS: OperatorDescriptor =
    OperatorDescriptor::new(OperatorType::Contains, "contains", "CONTAINS", "contains");
const IS: OperatorDescriptor = OperatorDescriptor::new(OperatorType::Is, "is", "IS", "is");
const BEGINS_WITH: OperatorDescriptor = OperatorDescriptor::new(
    OperatorType::BeginsWith,
    "beginsWith",
    "BEGINS_WITH",
    "begins with",
);
const ENDS_WITH: OperatorDescriptor =
    OperatorDescriptor::new(OperatorType::EndsWith, "endsWith", "ENDS_WITH", "ends with");
const EXISTS: OperatorDescriptor =
    OperatorDescriptor::new(OperatorType::Exists, "exists", "EXISTS", "exists");
const NOT_EXISTS: OperatorDescriptor = OperatorDescriptor::new(
    OperatorType::NotExists,
    "notExists",
    "NOT_EXISTS",
    "does not exist",
);
const IS_PART_OF: OperatorDescriptor =
    OperatorDescriptor::new(OperatorType::IsPartOf, "isPartOf", "IS_PART_OF", "is part of");
const IS_NOT_PART_OF: OperatorDescriptor = OperatorDescriptor::new(
    OperatorType::IsNotPartOf,
    "isNotPartOf",
    "IS_NOT_PART_OF",
    "is not part of",
);

/// Registry of all operators.
pub const OPERATORS: &[OperatorDescriptor] = &[
    EQUALS,
    NOT_EQUALS,
    LOWER,
    LOWER_OR_EQUALS,
    GREATER,
    GREATER_OR_EQUALS,
    BETWEEN,
    IN,
    NOT_IN,
    CONTAINS,
    IS,
    BEGINS_WITH,
    ENDS_WITH,
    EXISTS,
    NOT_EXISTS,
    IS_PART_OF,
    IS_NOT_PART_OF,
];

// First registration wins when two operators share a token.
static BY_NAME: Lazy<HashMap<&'static str, OperatorType>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for desc in OPERATORS {
        map.entry(desc.name).or_insert(desc.operator);
    }
    map
});

static BY_CUSTOM_NAME: Lazy<HashMap<&'static str, OperatorType>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for desc in OPERATORS {
        map.entry(desc.custom_name).or_insert(desc.operator);
    }
    map
});

impl OperatorType {
    pub fn descriptor(self) -> &'static OperatorDescriptor {
        match self {
            OperatorType::Equals => &EQUALS,
            OperatorType::NotEquals => &NOT_EQUALS,
            OperatorType::Lower => &LOWER,
            OperatorType::LowerOrEquals => &LOWER_OR_EQUALS,
            OperatorType::Greater => &GREATER,
            OperatorType::GreaterOrEquals => &GREATER_OR_EQUALS,
            OperatorType::Between => &BETWEEN,
            OperatorType::In => &IN,
            OperatorType::NotIn => &NOT_IN,
            OperatorType::Contains => &CONTAINS,
            OperatorType::Is => &IS,
            OperatorType::BeginsWith => &BEGINS_WITH,
            OperatorType::EndsWith => &ENDS_WITH,
            OperatorType::Exists => &EXISTS,
            OperatorType::NotExists => &NOT_EXISTS,
            OperatorType::IsPartOf => &IS_PART_OF,
            OperatorType::IsNotPartOf => &IS_NOT_PART_OF,
        }
    }

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    pub fn custom_name(self) -> &'static str {
        self.descriptor().custom_name
    }

    pub fn label(self) -> &'static str {
        self.descriptor().label
    }

    /// Look up an operator by its internal token.
    pub fn from_name(name: &str) -> Option<Self> {
        BY_NAME.get(name).copied()
    }

    /// Reverse lookup from a wire token.
    pub fn from_custom_name(custom_name: &str) -> Option<Self> {
        BY_CUSTOM_NAME.get(custom_name).copied()
    }

    /// `EXISTS` / `NOT_EXISTS`: rules that carry no value.
    pub fn is_existence(self) -> bool {
        matches!(self, OperatorType::Exists | OperatorType::NotExists)
    }

    /// Operators whose value is a set rather than a scalar.
    pub fn is_multi_valued(self) -> bool {
        matches!(
            self,
            OperatorType::In
                | OperatorType::NotIn
                | OperatorType::Between
                | OperatorType::IsPartOf
                | OperatorType::IsNotPartOf
        )
    }
}

impl std::fmt::Display for OperatorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.custom_name())
    }
}

/// Base operator set of a data type, before per-field overrides.
pub fn base_operators(data_type: DataType) -> &'static [OperatorType] {
    use OperatorType::*;
    match data_type {
        DataType::String => &[
            Contains, Is, BeginsWith, EndsWith, Exists, NotExists, In, NotIn,
        ],
        DataType::Number => &[
            Equals,
            Greater,
            GreaterOrEquals,
            Lower,
            LowerOrEquals,
            Between,
            In,
            NotIn,
            Exists,
            NotExists,
        ],
        DataType::Boolean => &[Equals, NotEquals],
        DataType::Enum => &[Equals, NotEquals, In, NotIn],
        DataType::Property => &[Is],
        DataType::Combinator => &[Is],
        DataType::FilterUuid => &[IsPartOf, IsNotPartOf],
    }
}

/// Operators a property rule may store as its `propertyOperator`.
pub const PROPERTY_VALUE_OPERATORS: &[OperatorType] = &[OperatorType::In, OperatorType::NotIn];

/// How an override reshapes a base operator set.
#[derive(Debug, Clone, Copy)]
pub enum OverrideEffect {
    Add(&'static [OperatorType]),
    Remove(&'static [OperatorType]),
    Replace(&'static [OperatorType]),
}

/// A per-field carve-out applied after the base lookup.
#[derive(Debug, Clone, Copy)]
pub struct OperatorOverride {
    pub fields: &'static [Field],
    pub data_type: DataType,
    pub effect: OverrideEffect,
}

impl OperatorOverride {
    fn applies_to(&self, field: Field, data_type: DataType) -> bool {
        self.data_type == data_type && self.fields.contains(&field)
    }

    fn apply(&self, operators: &mut Vec<OperatorType>) {
        match self.effect {
            OverrideEffect::Add(added) => {
                for op in added {
                    if !operators.contains(op) {
                        operators.push(*op);
                    }
                }
            }
            OverrideEffect::Remove(removed) => operators.retain(|op| !removed.contains(op)),
            OverrideEffect::Replace(replacement) => *operators = replacement.to_vec(),
        }
    }
}

/// Ordered override rules; later rules see the result of earlier ones.
pub const OPERATOR_OVERRIDES: &[OperatorOverride] = &[
    OperatorOverride {
        fields: &[
            Field::Id,
            Field::VoltageLevelId,
            Field::VoltageLevelId1,
            Field::VoltageLevelId2,
        ],
        data_type: DataType::String,
        effect: OverrideEffect::Add(&[OperatorType::IsPartOf, OperatorType::IsNotPartOf]),
    },
    OperatorOverride {
        fields: &[Field::Id],
        data_type: DataType::String,
        effect: OverrideEffect::Remove(&[OperatorType::Exists, OperatorType::NotExists]),
    },
    OperatorOverride {
        fields: &[Field::Automate],
        data_type: DataType::Number,
        effect: OverrideEffect::Replace(&[OperatorType::Exists, OperatorType::NotExists]),
    },
    OperatorOverride {
        fields: &[
            Field::ShuntCompensatorType,
            Field::RegulationType,
            Field::SvarRegulationMode,
        ],
        data_type: DataType::Enum,
        effect: OverrideEffect::Remove(&[OperatorType::In]),
    },
    OperatorOverride {
        fields: &[Field::RegulatingTerminal],
        data_type: DataType::Combinator,
        effect: OverrideEffect::Add(&[OperatorType::Exists, OperatorType::NotExists]),
    },
];

/// Operators offered for a field: the base set of its declared data type with
/// every matching override applied in order.
pub fn operators_for(field: Field) -> Vec<OperatorType> {
    let data_type = field.descriptor().data_type;
    let mut operators = base_operators(data_type).to_vec();
    for rule in OPERATOR_OVERRIDES {
        if rule.applies_to(field, data_type) {
            rule.apply(&mut operators);
        }
    }
    operators
}

/// The operator a freshly added rule on `field` starts with.
pub fn default_operator(field: Field) -> Option<OperatorType> {
    operators_for(field).first().copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn wire_tokens_are_unique() {
        let tokens: HashSet<_> = OPERATORS.iter().map(|d| d.custom_name).collect();
        assert_eq!(tokens.len(), OPERATORS.len());
    }

    #[test]
    fn internal_tokens_are_unique() {
        let tokens: HashSet<_> = OPERATORS.iter().map(|d| d.name).collect();
        assert_eq!(tokens.len(), OPERATORS.len());
    }

    #[test]
    fn descriptor_matches_registry() {
        for desc in OPERATORS {
            assert_eq!(desc.operator.descriptor(), desc);
        }
    }

    #[test]
    fn reverse_lookup_by_wire_token() {
        assert_eq!(
            OperatorType::from_custom_name("EQUALS"),
            Some(OperatorType::Equals)
        );
        assert_eq!(
            OperatorType::from_custom_name("IS_NOT_PART_OF"),
            Some(OperatorType::IsNotPartOf)
        );
        assert_eq!(OperatorType::from_custom_name("="), None);
        assert_eq!(OperatorType::from_custom_name("LIKE"), None);
    }

    #[test]
    fn lookup_by_internal_token() {
        assert_eq!(OperatorType::from_name(">="), Some(OperatorType::GreaterOrEquals));
        assert_eq!(OperatorType::from_name("notIn"), Some(OperatorType::NotIn));
        assert_eq!(OperatorType::from_name("NOT_IN"), None);
    }

    #[test]
    fn serde_uses_internal_token() {
        assert_eq!(
            serde_json::to_string(&OperatorType::LowerOrEquals).unwrap(),
            "\"<=\""
        );
        let op: OperatorType = serde_json::from_str("\"isPartOf\"").unwrap();
        assert_eq!(op, OperatorType::IsPartOf);
    }

    #[test]
    fn id_gains_part_of_and_loses_existence() {
        let ops = operators_for(Field::Id);
        assert!(ops.contains(&OperatorType::IsPartOf));
        assert!(ops.contains(&OperatorType::IsNotPartOf));
        assert!(!ops.contains(&OperatorType::Exists));
        assert!(!ops.contains(&OperatorType::NotExists));
        assert!(ops.contains(&OperatorType::Contains));
    }

    #[test]
    fn voltage_level_ids_gain_part_of_but_keep_existence() {
        for field in [
            Field::VoltageLevelId,
            Field::VoltageLevelId1,
            Field::VoltageLevelId2,
        ] {
            let ops = operators_for(field);
            assert!(ops.contains(&OperatorType::IsPartOf));
            assert!(ops.contains(&OperatorType::IsNotPartOf));
            assert!(ops.contains(&OperatorType::Exists));
        }
    }

    #[test]
    fn name_has_no_part_of() {
        let ops = operators_for(Field::Name);
        assert!(!ops.contains(&OperatorType::IsPartOf));
        assert!(ops.contains(&OperatorType::Exists));
    }

    #[test]
    fn automate_collapses_to_existence() {
        assert_eq!(
            operators_for(Field::Automate),
            vec![OperatorType::Exists, OperatorType::NotExists]
        );
    }

    #[test]
    fn some_enums_lose_in() {
        for field in [
            Field::ShuntCompensatorType,
            Field::RegulationType,
            Field::SvarRegulationMode,
        ] {
            let ops = operators_for(field);
            assert!(!ops.contains(&OperatorType::In));
            assert!(ops.contains(&OperatorType::NotIn));
            assert!(ops.contains(&OperatorType::Equals));
        }
        assert!(operators_for(Field::EnergySource).contains(&OperatorType::In));
    }

    #[test]
    fn regulating_terminal_gains_existence() {
        assert_eq!(
            operators_for(Field::RegulatingTerminal),
            vec![
                OperatorType::Is,
                OperatorType::Exists,
                OperatorType::NotExists
            ]
        );
    }

    #[test]
    fn default_operator_is_first_offered() {
        assert_eq!(default_operator(Field::NominalVoltage), Some(OperatorType::Equals));
        assert_eq!(default_operator(Field::Automate), Some(OperatorType::Exists));
        assert_eq!(default_operator(Field::FreeProperties), Some(OperatorType::Is));
    }
}
