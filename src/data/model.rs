use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// MachineType – the L/M/H product quality variant
// ---------------------------------------------------------------------------

/// Machine quality variant, stored as `"L"`/`"M"`/`"H"` in the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MachineType {
    Low,
    Medium,
    High,
}

impl MachineType {
    pub const ALL: [MachineType; 3] = [MachineType::Low, MachineType::Medium, MachineType::High];

    /// Single-letter code used in the dataset's `Type` column.
    pub fn code(self) -> &'static str {
        match self {
            MachineType::Low => "L",
            MachineType::Medium => "M",
            MachineType::High => "H",
        }
    }

    /// Ordinal encoding expected by the classifier (Low=0, Medium=1, High=2).
    pub fn ordinal(self) -> f64 {
        match self {
            MachineType::Low => 0.0,
            MachineType::Medium => 1.0,
            MachineType::High => 2.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MachineType::Low => "Low",
            MachineType::Medium => "Medium",
            MachineType::High => "High",
        }
    }
}

impl FromStr for MachineType {
    type Err = String;

    /// Accepts both the dataset code and the full label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "L" | "Low" => Ok(MachineType::Low),
            "M" | "Medium" => Ok(MachineType::Medium),
            "H" | "High" => Ok(MachineType::High),
            other => Err(format!("unknown machine type '{other}'")),
        }
    }
}

impl fmt::Display for MachineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// FailureType – the closed label set of the Failure Type column
// ---------------------------------------------------------------------------

/// Failure mode label. The dataset uses a closed set of six labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FailureType {
    NoFailure,
    HeatDissipation,
    Power,
    Overstrain,
    ToolWear,
    Random,
}

impl FailureType {
    pub fn label(self) -> &'static str {
        match self {
            FailureType::NoFailure => "No Failure",
            FailureType::HeatDissipation => "Heat Dissipation Failure",
            FailureType::Power => "Power Failure",
            FailureType::Overstrain => "Overstrain Failure",
            FailureType::ToolWear => "Tool Wear Failure",
            FailureType::Random => "Random Failures",
        }
    }
}

impl FromStr for FailureType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "No Failure" => Ok(FailureType::NoFailure),
            "Heat Dissipation Failure" => Ok(FailureType::HeatDissipation),
            "Power Failure" => Ok(FailureType::Power),
            "Overstrain Failure" => Ok(FailureType::Overstrain),
            "Tool Wear Failure" => Ok(FailureType::ToolWear),
            "Random Failures" => Ok(FailureType::Random),
            other => Err(format!("unknown failure type '{other}'")),
        }
    }
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Observation – one row of the historical dataset
// ---------------------------------------------------------------------------

/// A single historical maintenance record (one row of the source table).
/// Immutable after loading.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Row identifier (`UDI` column).
    pub udi: u32,
    pub machine_type: MachineType,
    pub air_temperature: f64,
    pub process_temperature: f64,
    pub rotational_speed: f64,
    pub torque: f64,
    pub tool_wear: f64,
    /// Binary failure flag (`Target` column).
    pub target: bool,
    pub failure_type: FailureType,
}

// ---------------------------------------------------------------------------
// NumericColumn – accessor enum for the numeric dataset columns
// ---------------------------------------------------------------------------

/// The numeric columns of the dataset, in source order. Used to drive the
/// correlation matrix and the per-sensor aggregates without stringly-typed
/// column lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericColumn {
    Udi,
    AirTemperature,
    ProcessTemperature,
    RotationalSpeed,
    Torque,
    ToolWear,
    Target,
}

/// Every numeric column, for the correlation matrix.
pub const NUMERIC_COLUMNS: [NumericColumn; 7] = [
    NumericColumn::Udi,
    NumericColumn::AirTemperature,
    NumericColumn::ProcessTemperature,
    NumericColumn::RotationalSpeed,
    NumericColumn::Torque,
    NumericColumn::ToolWear,
    NumericColumn::Target,
];

/// The five sensor columns, for distributions and grouped means.
pub const SENSOR_COLUMNS: [NumericColumn; 5] = [
    NumericColumn::AirTemperature,
    NumericColumn::ProcessTemperature,
    NumericColumn::RotationalSpeed,
    NumericColumn::Torque,
    NumericColumn::ToolWear,
];

impl NumericColumn {
    pub fn label(self) -> &'static str {
        match self {
            NumericColumn::Udi => "UDI",
            NumericColumn::AirTemperature => "Air temperature [K]",
            NumericColumn::ProcessTemperature => "Process temperature [K]",
            NumericColumn::RotationalSpeed => "Rotational speed [rpm]",
            NumericColumn::Torque => "Torque [Nm]",
            NumericColumn::ToolWear => "Tool wear [min]",
            NumericColumn::Target => "Target",
        }
    }

    /// Compact label for heatmap axes where the full one doesn't fit.
    pub fn short_label(self) -> &'static str {
        match self {
            NumericColumn::Udi => "UDI",
            NumericColumn::AirTemperature => "Air",
            NumericColumn::ProcessTemperature => "Proc",
            NumericColumn::RotationalSpeed => "Speed",
            NumericColumn::Torque => "Torque",
            NumericColumn::ToolWear => "Wear",
            NumericColumn::Target => "Target",
        }
    }

    pub fn value(self, obs: &Observation) -> f64 {
        match self {
            NumericColumn::Udi => obs.udi as f64,
            NumericColumn::AirTemperature => obs.air_temperature,
            NumericColumn::ProcessTemperature => obs.process_temperature,
            NumericColumn::RotationalSpeed => obs.rotational_speed,
            NumericColumn::Torque => obs.torque,
            NumericColumn::ToolWear => obs.tool_wear,
            NumericColumn::Target => {
                if obs.target {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Sensor domains – shared by the input widgets and FilterCriteria
// ---------------------------------------------------------------------------

pub const AIR_TEMPERATURE_BOUNDS: RangeInclusive<f64> = 290.0..=310.0;
pub const PROCESS_TEMPERATURE_BOUNDS: RangeInclusive<f64> = 300.0..=320.0;
pub const ROTATIONAL_SPEED_BOUNDS: RangeInclusive<f64> = 1000.0..=3000.0;
pub const TORQUE_BOUNDS: RangeInclusive<f64> = 3.5..=77.0;
pub const TOOL_WEAR_BOUNDS: RangeInclusive<f64> = 0.0..=250.0;

// ---------------------------------------------------------------------------
// MaintenanceDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full loaded dataset plus the sorted set of failure types it contains.
#[derive(Debug, Clone)]
pub struct MaintenanceDataset {
    /// All observations (rows). Read-only after construction.
    pub observations: Vec<Observation>,
    /// Unique failure types present, sorted by label.
    pub failure_types: Vec<FailureType>,
}

impl MaintenanceDataset {
    /// Build the failure-type index from the loaded observations.
    pub fn from_observations(observations: Vec<Observation>) -> Self {
        let mut failure_types: Vec<FailureType> = Vec::new();
        for obs in &observations {
            if !failure_types.contains(&obs.failure_type) {
                failure_types.push(obs.failure_type);
            }
        }
        failure_types.sort_by_key(|ft| ft.label());

        MaintenanceDataset {
            observations,
            failure_types,
        }
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(machine_type: MachineType, failure_type: FailureType) -> Observation {
        Observation {
            udi: 1,
            machine_type,
            air_temperature: 300.0,
            process_temperature: 310.0,
            rotational_speed: 1500.0,
            torque: 40.0,
            tool_wear: 100.0,
            target: failure_type != FailureType::NoFailure,
            failure_type,
        }
    }

    #[test]
    fn machine_type_codes_and_ordinals() {
        assert_eq!(MachineType::Low.code(), "L");
        assert_eq!(MachineType::Medium.code(), "M");
        assert_eq!(MachineType::High.code(), "H");
        assert_eq!(MachineType::Low.ordinal(), 0.0);
        assert_eq!(MachineType::Medium.ordinal(), 1.0);
        assert_eq!(MachineType::High.ordinal(), 2.0);
    }

    #[test]
    fn machine_type_parses_code_and_label() {
        assert_eq!("M".parse::<MachineType>().unwrap(), MachineType::Medium);
        assert_eq!("High".parse::<MachineType>().unwrap(), MachineType::High);
        assert!("X".parse::<MachineType>().is_err());
    }

    #[test]
    fn failure_type_label_round_trip() {
        for ft in [
            FailureType::NoFailure,
            FailureType::HeatDissipation,
            FailureType::Power,
            FailureType::Overstrain,
            FailureType::ToolWear,
            FailureType::Random,
        ] {
            assert_eq!(ft.label().parse::<FailureType>().unwrap(), ft);
        }
        assert!("Gremlins".parse::<FailureType>().is_err());
    }

    #[test]
    fn dataset_indexes_failure_types_sorted_by_label() {
        let ds = MaintenanceDataset::from_observations(vec![
            obs(MachineType::Low, FailureType::Power),
            obs(MachineType::Medium, FailureType::HeatDissipation),
            obs(MachineType::Medium, FailureType::NoFailure),
            obs(MachineType::High, FailureType::Power),
        ]);
        assert_eq!(ds.len(), 4);
        assert_eq!(
            ds.failure_types,
            vec![
                FailureType::HeatDissipation,
                FailureType::NoFailure,
                FailureType::Power,
            ]
        );
    }

    #[test]
    fn numeric_column_accessors() {
        let o = obs(MachineType::Low, FailureType::Overstrain);
        assert_eq!(NumericColumn::Udi.value(&o), 1.0);
        assert_eq!(NumericColumn::Torque.value(&o), 40.0);
        assert_eq!(NumericColumn::Target.value(&o), 1.0);
    }
}
