//! Equipment types and the fields each one offers.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::field::Field;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EquipmentType {
    Substation,
    VoltageLevel,
    Line,
    TwoWindingsTransformer,
    Generator,
    Load,
    Battery,
    ShuntCompensator,
    StaticVarCompensator,
    Bus,
    BusbarSection,
}

pub const EQUIPMENT_TYPES: &[EquipmentType] = &[
    EquipmentType::Substation,
    EquipmentType::VoltageLevel,
    EquipmentType::Line,
    EquipmentType::TwoWindingsTransformer,
    EquipmentType::Generator,
    EquipmentType::Load,
    EquipmentType::Battery,
    EquipmentType::ShuntCompensator,
    EquipmentType::StaticVarCompensator,
    EquipmentType::Bus,
    EquipmentType::BusbarSection,
];

impl EquipmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentType::Substation => "SUBSTATION",
            EquipmentType::VoltageLevel => "VOLTAGE_LEVEL",
            EquipmentType::Line => "LINE",
            EquipmentType::TwoWindingsTransformer => "TWO_WINDINGS_TRANSFORMER",
            EquipmentType::Generator => "GENERATOR",
            EquipmentType::Load => "LOAD",
            EquipmentType::Battery => "BATTERY",
            EquipmentType::ShuntCompensator => "SHUNT_COMPENSATOR",
            EquipmentType::StaticVarCompensator => "STATIC_VAR_COMPENSATOR",
            EquipmentType::Bus => "BUS",
            EquipmentType::BusbarSection => "BUSBAR_SECTION",
        }
    }

    /// Fields a rule may target for this equipment type, in display order.
    pub fn fields(&self) -> &'static [Field] {
        use Field::*;
        match self {
            EquipmentType::Substation => &[Id, Name, Country, FreeProperties],
            EquipmentType::VoltageLevel => &[
                Id,
                Name,
                Country,
                NominalVoltage,
                LowVoltageLimit,
                HighVoltageLimit,
                FreeProperties,
                SubstationProperties,
            ],
            EquipmentType::Line => &[
                Id,
                Name,
                Country1,
                Country2,
                NominalVoltage1,
                NominalVoltage2,
                VoltageLevelId1,
                VoltageLevelId2,
                Connected1,
                Connected2,
                SeriesResistance,
                SeriesReactance,
                ShuntConductance1,
                ShuntConductance2,
                ShuntSusceptance1,
                ShuntSusceptance2,
                FreeProperties,
                SubstationProperties1,
                SubstationProperties2,
            ],
            EquipmentType::TwoWindingsTransformer => &[
                Id,
                Name,
                Country,
                NominalVoltage1,
                NominalVoltage2,
                VoltageLevelId1,
                VoltageLevelId2,
                Connected1,
                Connected2,
                RatedVoltage1,
                RatedVoltage2,
                RatedS,
                SeriesResistance,
                SeriesReactance,
                MagnetizingConductance,
                MagnetizingSusceptance,
                HasRatioTapChanger,
                LoadTapChangingCapabilities,
                RatioTargetV,
                HasPhaseTapChanger,
                PhaseRegulationMode,
                PhaseRegulationValue,
                FreeProperties,
                SubstationProperties,
            ],
            EquipmentType::Generator => &[
                Id,
                Name,
                Country,
                EnergySource,
                NominalVoltage,
                VoltageLevelId,
                Connected,
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
                RegulationType,
                RegulatingTerminal,
                FreeProperties,
                SubstationProperties,
            ],
            EquipmentType::Load => &[
                Id,
                Name,
                Country,
                LoadType,
                NominalVoltage,
                VoltageLevelId,
                Connected,
                P0,
                Q0,
                FreeProperties,
                SubstationProperties,
            ],
            EquipmentType::Battery => &[
                Id,
                Name,
                Country,
                NominalVoltage,
                VoltageLevelId,
                Connected,
                MinP,
                MaxP,
                TargetP,
                TargetQ,
                FreeProperties,
                SubstationProperties,
            ],
            EquipmentType::ShuntCompensator => &[
                Id,
                Name,
                Country,
                NominalVoltage,
                VoltageLevelId,
                Connected,
                ShuntCompensatorType,
                MaxQAtNominalV,
                MaxSusceptance,
                SectionCount,
                MaximumSectionCount,
                FreeProperties,
                SubstationProperties,
            ],
            EquipmentType::StaticVarCompensator => &[
                Id,
                Name,
                Country,
                NominalVoltage,
                VoltageLevelId,
                Connected,
                SvarRegulationMode,
                VoltageSetPoint,
                ReactivePowerSetPoint,
                RemoteRegulatedTerminal,
                RegulationType,
                RegulatingTerminal,
                Automate,
                FreeProperties,
                SubstationProperties,
            ],
            EquipmentType::Bus => &[Id, Country, NominalVoltage, VoltageLevelId],
            EquipmentType::BusbarSection => &[Id, Name, Country, NominalVoltage, VoltageLevelId],
        }
    }

    pub fn offers(&self, field: Field) -> bool {
        self.fields().contains(&field)
    }
}

impl std::fmt::Display for EquipmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EquipmentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase().replace('-', "_");
        EQUIPMENT_TYPES
            .iter()
            .find(|eq| eq.as_str() == wanted)
            .copied()
            .ok_or_else(|| format!("Unknown equipment type: {}", s))
    }
}
