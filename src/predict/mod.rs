/// Prediction layer: feature encoding, the classifier artifact, and the
/// session-scoped history log.

pub mod classifier;

use std::fmt;

use crate::data::model::MachineType;

// ---------------------------------------------------------------------------
// PredictionRequest – one set of user-supplied operating parameters
// ---------------------------------------------------------------------------

/// Transient user input for one prediction. Values are constrained upstream
/// by the input widgets, so no validation happens here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionRequest {
    pub machine_type: MachineType,
    pub air_temperature: f64,
    pub process_temperature: f64,
    pub rotational_speed: f64,
    pub torque: f64,
    pub tool_wear: f64,
}

impl PredictionRequest {
    /// Encode the request as the classifier's feature vector: the machine
    /// type ordinal followed by the five sensors in fixed order.
    pub fn features(&self) -> [f64; 6] {
        [
            self.machine_type.ordinal(),
            self.air_temperature,
            self.process_temperature,
            self.rotational_speed,
            self.torque,
            self.tool_wear,
        ]
    }
}

// ---------------------------------------------------------------------------
// Outcome – the binary prediction label
// ---------------------------------------------------------------------------

/// Binary prediction label as returned by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    NoFailure,
    Failure,
}

impl Outcome {
    pub fn from_class(class: u8) -> Outcome {
        if class == 1 {
            Outcome::Failure
        } else {
            Outcome::NoFailure
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Outcome::NoFailure => "No Failure",
            Outcome::Failure => "Failure",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// PredictionLog – session-scoped, ordered, append-only history
// ---------------------------------------------------------------------------

/// A logged (input, predicted label) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRecord {
    pub request: PredictionRequest,
    pub outcome: Outcome,
}

/// Ordered append-only prediction history, owned by the application state
/// for the lifetime of the session. Grows without bound and is never
/// persisted.
#[derive(Debug, Default)]
pub struct PredictionLog {
    records: Vec<PredictionRecord>,
}

impl PredictionLog {
    pub fn push(&mut self, record: PredictionRecord) {
        self.records.push(record);
    }

    pub fn iter(&self) -> impl Iterator<Item = &PredictionRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
