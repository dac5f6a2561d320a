//! Field catalog.
//!
//! The single source of truth for the equipment attributes a rule can target.
//! Adding an attribute means adding a [`Field`] variant and its entry in
//! [`FIELDS`], at the same position.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::data_type::DataType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Id,
    Name,
    Country,
    Country1,
    Country2,
    NominalVoltage,
    NominalVoltage1,
    NominalVoltage2,
    VoltageLevelId,
    VoltageLevelId1,
    VoltageLevelId2,
    Connected,
    Connected1,
    Connected2,
    EnergySource,
    MinP,
    MaxP,
    TargetP,
    TargetQ,
    TargetV,
    RatedS,
    VoltageRegulatorOn,
    MarginalCost,
    PlannedOutageRate,
    ForcedOutageRate,
    P0,
    Q0,
    LoadType,
    LowVoltageLimit,
    HighVoltageLimit,
    ShuntCompensatorType,
    MaxQAtNominalV,
    MaxSusceptance,
    SectionCount,
    MaximumSectionCount,
    SeriesResistance,
    SeriesReactance,
    ShuntConductance1,
    ShuntConductance2,
    ShuntSusceptance1,
    ShuntSusceptance2,
    MagnetizingConductance,
    MagnetizingSusceptance,
    RatedVoltage1,
    RatedVoltage2,
    HasRatioTapChanger,
    LoadTapChangingCapabilities,
    RatioTargetV,
    HasPhaseTapChanger,
    PhaseRegulationMode,
    PhaseRegulationValue,
    FreeProperties,
    SubstationProperties,
    SubstationProperties1,
    SubstationProperties2,
    Automate,
    SvarRegulationMode,
    VoltageSetPoint,
    ReactivePowerSetPoint,
    RemoteRegulatedTerminal,
    RegulationType,
    RegulatingTerminal,
    RegulatingTerminalVlId,
    RegulatingTerminalConnectableId,
    RegulatingTerminalSide,
}

/// Static description of a rule-able attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub field: Field,
    /// Attribute name used on the wire (e.g. `nominalVoltage`)
    pub name: &'static str,
    pub label: &'static str,
    pub data_type: DataType,
    /// Sub-attributes of a composite (COMBINATOR) field
    pub children: Option<&'static [Field]>,
    /// Displayed in micro-units, exported in units
    pub micro_unit: bool,
}

impl FieldDescriptor {
    const fn new(field: Field, name: &'static str, label: &'static str, data_type: DataType) -> Self {
        Self {
            field,
            name,
            label,
            data_type,
            children: None,
            micro_unit: false,
        }
    }

    const fn micro_unit(mut self) -> Self {
        self.micro_unit = true;
        self
    }

    const fn with_children(mut self, children: &'static [Field]) -> Self {
        self.children = Some(children);
        self
    }

    pub fn is_composite(&self) -> bool {
        self.data_type == DataType::Combinator
    }

    /// Descriptors of the composite's sub-attributes; empty for plain fields.
    pub fn children(&self) -> impl Iterator<Item = &'static FieldDescriptor> {
        self.children
            .unwrap_or(&[])
            .iter()
            .map(|child| child.descriptor())
    }
}

use DataType::{Boolean, Combinator, Enum, Number, Property, String as Text};

/// Registry of all fields, in [`Field`] declaration order.
pub const FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new(Field::Id, "id", "ID", Text),
    FieldDescriptor::new(Field::Name, "name", "Name", Text),
    FieldDescriptor::new(Field::Country, "country", "Country", Enum),
    FieldDescriptor::new(Field::Country1, "country1", "Country 1", Enum),
    FieldDescriptor::new(Field::Country2, "country2", "Country 2", Enum),
    FieldDescriptor::new(Field::NominalVoltage, "nominalVoltage", "Nominal voltage", Number),
    FieldDescriptor::new(Field::NominalVoltage1, "nominalVoltage1", "Nominal voltage 1", Number),
    FieldDescriptor::new(Field::NominalVoltage2, "nominalVoltage2", "Nominal voltage 2", Number),
    FieldDescriptor::new(Field::VoltageLevelId, "voltageLevelId", "Voltage level ID", Text),
    FieldDescriptor::new(Field::VoltageLevelId1, "voltageLevelId1", "Voltage level ID 1", Text),
    FieldDescriptor::new(Field::VoltageLevelId2, "voltageLevelId2", "Voltage level ID 2", Text),
    FieldDescriptor::new(Field::Connected, "connected", "Connected", Boolean),
    FieldDescriptor::new(Field::Connected1, "connected1", "Connected 1", Boolean),
    FieldDescriptor::new(Field::Connected2, "connected2", "Connected 2", Boolean),
    FieldDescriptor::new(Field::EnergySource, "energySource", "Energy source", Enum),
    FieldDescriptor::new(Field::MinP, "minP", "Min P", Number),
    FieldDescriptor::new(Field::MaxP, "maxP", "Max P", Number),
    FieldDescriptor::new(Field::TargetP, "targetP", "Target P", Number),
    FieldDescriptor::new(Field::TargetQ, "targetQ", "Target Q", Number),
    FieldDescriptor::new(Field::TargetV, "targetV", "Target V", Number),
    FieldDescriptor::new(Field::RatedS, "ratedS", "Rated S", Number),
    FieldDescriptor::new(Field::VoltageRegulatorOn, "voltageRegulatorOn", "Voltage regulation on", Boolean),
    FieldDescriptor::new(Field::MarginalCost, "marginalCost", "Marginal cost", Number),
    FieldDescriptor::new(Field::PlannedOutageRate, "plannedOutageRate", "Planned outage rate", Number),
    FieldDescriptor::new(Field::ForcedOutageRate, "forcedOutageRate", "Forced outage rate", Number),
    FieldDescriptor::new(Field::P0, "p0", "Active power P0", Number),
    FieldDescriptor::new(Field::Q0, "q0", "Reactive power Q0", Number),
    FieldDescriptor::new(Field::LoadType, "loadType", "Load type", Enum),
    FieldDescriptor::new(Field::LowVoltageLimit, "lowVoltageLimit", "Low voltage limit", Number),
    FieldDescriptor::new(Field::HighVoltageLimit, "highVoltageLimit", "High voltage limit", Number),
    FieldDescriptor::new(Field::ShuntCompensatorType, "shuntCompensatorType", "Shunt compensator type", Enum),
    FieldDescriptor::new(Field::MaxQAtNominalV, "maxQAtNominalV", "Max Q at nominal voltage", Number),
    FieldDescriptor::new(Field::MaxSusceptance, "maxSusceptance", "Max susceptance", Number).micro_unit(),
    FieldDescriptor::new(Field::SectionCount, "sectionCount", "Section count", Number),
    FieldDescriptor::new(Field::MaximumSectionCount, "maximumSectionCount", "Maximum section count", Number),
    FieldDescriptor::new(Field::SeriesResistance, "serieResistance", "Series resistance", Number),
    FieldDescriptor::new(Field::SeriesReactance, "serieReactance", "Series reactance", Number),
    FieldDescriptor::new(Field::ShuntConductance1, "shuntConductance1", "Shunt conductance 1", Number).micro_unit(),
    FieldDescriptor::new(Field::ShuntConductance2, "shuntConductance2", "Shunt conductance 2", Number).micro_unit(),
    FieldDescriptor::new(Field::ShuntSusceptance1, "shuntSusceptance1", "Shunt susceptance 1", Number).micro_unit(),
    FieldDescriptor::new(Field::ShuntSusceptance2, "shuntSusceptance2", "Shunt susceptance 2", Number).micro_unit(),
    FieldDescriptor::new(Field::MagnetizingConductance, "magnetizingConductance", "Magnetizing conductance", Number).micro_unit(),
    FieldDescriptor::new(Field::MagnetizingSusceptance, "magnetizingSusceptance", "Magnetizing susceptance", Number).micro_unit(),
    FieldDescriptor::new(Field::RatedVoltage1, "ratedVoltage1", "Rated voltage 1", Number),
    FieldDescriptor::new(Field::RatedVoltage2, "ratedVoltage2", "Rated voltage 2", Number),
    FieldDescriptor::new(Field::HasRatioTapChanger, "hasRatioTapChanger", "Has ratio tap changer", Boolean),
    FieldDescriptor::new(Field::LoadTapChangingCapabilities, "loadTapChangingCapabilities", "On-load tap changing", Boolean),
    FieldDescriptor::new(Field::RatioTargetV, "ratioTargetV", "Ratio target voltage", Number),
    FieldDescriptor::new(Field::HasPhaseTapChanger, "hasPhaseTapChanger", "Has phase tap changer", Boolean),
    FieldDescriptor::new(Field::PhaseRegulationMode, "phaseRegulationMode", "Phase regulation mode", Enum),
    FieldDescriptor::new(Field::PhaseRegulationValue, "phaseRegulationValue", "Phase regulation value", Number),
    FieldDescriptor::new(Field::FreeProperties, "freeProperties", "Properties", Property),
    FieldDescriptor::new(Field::SubstationProperties, "substationProperties", "Substation properties", Property),
    FieldDescriptor::new(Field::SubstationProperties1, "substationProperties1", "Substation properties 1", Property),
    FieldDescriptor::new(Field::SubstationProperties2, "substationProperties2", "Substation properties 2", Property),
    FieldDescriptor::new(Field::Automate, "automate", "Automaton", Number),
    FieldDescriptor::new(Field::SvarRegulationMode, "svarRegulationMode", "Regulation mode", Enum),
    FieldDescriptor::new(Field::VoltageSetPoint, "voltageSetpoint", "Voltage set point", Number),
    FieldDescriptor::new(Field::ReactivePowerSetPoint, "reactivePowerSetpoint", "Reactive power set point", Number),
    FieldDescriptor::new(Field::RemoteRegulatedTerminal, "remoteRegulatedTerminal", "Remote regulation", Boolean),
    FieldDescriptor::new(Field::RegulationType, "regulationType", "Regulation type", Enum),
    FieldDescriptor::new(Field::RegulatingTerminal, "regulatingTerminal", "Regulating terminal", Combinator)
        .with_children(&[
            Field::RegulatingTerminalVlId,
            Field::RegulatingTerminalConnectableId,
            Field::RegulatingTerminalSide,
        ]),
    FieldDescriptor::new(Field::RegulatingTerminalVlId, "regulatingTerminalVLId", "Voltage level ID", Text),
    FieldDescriptor::new(Field::RegulatingTerminalConnectableId, "regulatingTerminalConnectableId", "Equipment ID", Text),
    FieldDescriptor::new(Field::RegulatingTerminalSide, "side", "Side", Enum),
];

static BY_NAME: Lazy<HashMap<&'static str, Field>> =
    Lazy::new(|| FIELDS.iter().map(|desc| (desc.name, desc.field)).collect());

impl Field {
    pub fn descriptor(self) -> &'static FieldDescriptor {
        &FIELDS[self as usize]
    }

    /// The wire name (e.g. `nominalVoltage`).
    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    pub fn from_name(name: &str) -> Option<Self> {
        BY_NAME.get(name).copied()
    }

    pub fn data_type(self) -> DataType {
        self.descriptor().data_type
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Look up a field descriptor by wire name.
pub fn get_field(name: &str) -> Option<&'static FieldDescriptor> {
    Field::from_name(name).map(Field::descriptor)
}

/// Whether `name` is a field stored in micro-units.
pub fn is_micro_unit_field(name: &str) -> bool {
    get_field(name).is_some_and(|desc| desc.micro_unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn registry_order_matches_enum() {
        for (i, desc) in FIELDS.iter().enumerate() {
            assert_eq!(desc.field as usize, i, "{} is out of place", desc.name);
        }
    }

    #[test]
    fn names_are_unique() {
        let names: HashSet<_> = FIELDS.iter().map(|d| d.name).collect();
        assert_eq!(names.len(), FIELDS.len());
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(Field::from_name("nominalVoltage"), Some(Field::NominalVoltage));
        assert_eq!(Field::from_name("side"), Some(Field::RegulatingTerminalSide));
        assert_eq!(Field::from_name("NOMINAL_VOLTAGE"), None);
        assert!(get_field("unknown").is_none());
    }

    #[test]
    fn only_combinator_fields_have_children() {
        for desc in FIELDS {
            assert_eq!(desc.children.is_some(), desc.is_composite(), "{}", desc.name);
        }
    }

    #[test]
    fn regulating_terminal_children() {
        let desc = Field::RegulatingTerminal.descriptor();
        let children: Vec<_> = desc.children().map(|c| c.name).collect();
        assert_eq!(
            children,
            vec!["regulatingTerminalVLId", "regulatingTerminalConnectableId", "side"]
        );
    }

    #[test]
    fn micro_unit_fields_are_numeric() {
        for desc in FIELDS.iter().filter(|d| d.micro_unit) {
            assert_eq!(desc.data_type, DataType::Number, "{}", desc.name);
        }
        assert!(is_micro_unit_field("shuntSusceptance1"));
        assert!(is_micro_unit_field("magnetizingConductance"));
        assert!(!is_micro_unit_field("nominalVoltage"));
        assert!(!is_micro_unit_field("bogus"));
    }
}
