use crate::color::ColorMap;
use crate::data::filter::{filtered_indices, FilterCriteria};
use crate::data::model::{MachineType, MaintenanceDataset};
use crate::predict::classifier::ForestClassifier;
use crate::predict::{Outcome, PredictionLog, PredictionRecord, PredictionRequest};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which dashboard tab is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Prediction,
    Exploration,
    About,
}

/// Current values of the prediction input widgets. Bounded by the sliders,
/// so they are always well-formed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionInputs {
    pub machine_type: MachineType,
    pub air_temperature: f64,
    pub process_temperature: f64,
    pub rotational_speed: f64,
    pub torque: f64,
    pub tool_wear: f64,
}

impl Default for PredictionInputs {
    fn default() -> Self {
        Self {
            machine_type: MachineType::Low,
            air_temperature: 299.5,
            process_temperature: 308.7,
            rotational_speed: 2134.0,
            torque: 45.33,
            tool_wear: 127.0,
        }
    }
}

impl PredictionInputs {
    pub fn to_request(self) -> PredictionRequest {
        PredictionRequest {
            machine_type: self.machine_type,
            air_temperature: self.air_temperature,
            process_temperature: self.process_temperature,
            rotational_speed: self.rotational_speed,
            torque: self.torque,
            tool_wear: self.tool_wear,
        }
    }
}

/// The full UI state, independent of rendering. The dataset and classifier
/// are loaded at startup and read-only from then on; the prediction log is
/// the only thing that grows over the session.
pub struct AppState {
    pub dataset: MaintenanceDataset,
    pub classifier: ForestClassifier,

    pub active_tab: Tab,

    /// Exploration filter.
    pub criteria: FilterCriteria,

    /// Indices of observations passing the current criteria (cached).
    pub visible_indices: Vec<usize>,

    /// Failure-type colours for the exploration charts.
    pub color_map: ColorMap,

    /// Prediction input widget values.
    pub inputs: PredictionInputs,

    /// Result of the most recent prediction.
    pub last_outcome: Option<Outcome>,

    /// Session-scoped, append-only prediction history.
    pub prediction_log: PredictionLog,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(dataset: MaintenanceDataset, classifier: ForestClassifier) -> Self {
        let criteria = FilterCriteria::full_domain(MachineType::Low);
        let visible_indices = filtered_indices(&dataset, &criteria);
        let color_map = ColorMap::new(&dataset.failure_types);

        Self {
            dataset,
            classifier,
            active_tab: Tab::Prediction,
            criteria,
            visible_indices,
            color_map,
            inputs: PredictionInputs::default(),
            last_outcome: None,
            prediction_log: PredictionLog::default(),
            status_message: None,
        }
    }

    /// Swap in a newly opened dataset; filters reset to the full domain of
    /// the currently selected machine type.
    pub fn set_dataset(&mut self, dataset: MaintenanceDataset) {
        self.criteria = FilterCriteria::full_domain(self.criteria.machine_type);
        self.color_map = ColorMap::new(&dataset.failure_types);
        self.dataset = dataset;
        self.refilter();
        self.status_message = None;
    }

    /// Recompute `visible_indices` after a criteria change.
    pub fn refilter(&mut self) {
        self.visible_indices = filtered_indices(&self.dataset, &self.criteria);
    }

    /// Run one prediction from the current inputs and append it to the
    /// session log.
    pub fn run_prediction(&mut self) {
        let request = self.inputs.to_request();
        let outcome = self.classifier.predict(&request.features());
        log::info!(
            "predicted {} for {} machine (torque {:.2} Nm, wear {:.0} min)",
            outcome,
            request.machine_type,
            request.torque,
            request.tool_wear
        );
        self.last_outcome = Some(outcome);
        self.prediction_log.push(PredictionRecord { request, outcome });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{FailureType, Observation};

    fn dataset() -> MaintenanceDataset {
        let obs = |udi: u32, machine_type: MachineType, tool_wear: f64| Observation {
            udi,
            machine_type,
            air_temperature: 300.0,
            process_temperature: 310.0,
            rotational_speed: 1500.0,
            torque: 40.0,
            tool_wear,
            target: false,
            failure_type: FailureType::NoFailure,
        };
        MaintenanceDataset::from_observations(vec![
            obs(1, MachineType::Low, 10.0),
            obs(2, MachineType::Medium, 20.0),
            obs(3, MachineType::Low, 240.0),
        ])
    }

    fn classifier() -> ForestClassifier {
        // single stump: failure iff tool wear > 200
        ForestClassifier::from_json(
            r#"{
                "n_features": 6,
                "trees": [
                    { "nodes": [
                        { "feature": 5, "threshold": 200.0, "left": 1, "right": 2 },
                        { "class": 0 },
                        { "class": 1 }
                    ]}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn new_state_starts_filtered_to_low_machines() {
        let state = AppState::new(dataset(), classifier());
        assert_eq!(state.visible_indices, vec![0, 2]);
        assert!(state.prediction_log.is_empty());
    }

    #[test]
    fn refilter_updates_the_cached_view() {
        let mut state = AppState::new(dataset(), classifier());
        state.criteria.machine_type = MachineType::Medium;
        state.refilter();
        assert_eq!(state.visible_indices, vec![1]);
    }

    #[test]
    fn run_prediction_appends_to_the_session_log() {
        let mut state = AppState::new(dataset(), classifier());

        state.inputs.tool_wear = 250.0;
        state.run_prediction();
        assert_eq!(state.last_outcome, Some(Outcome::Failure));

        state.inputs.tool_wear = 5.0;
        state.run_prediction();
        assert_eq!(state.last_outcome, Some(Outcome::NoFailure));

        let outcomes: Vec<Outcome> = state.prediction_log.iter().map(|r| r.outcome).collect();
        assert_eq!(outcomes, vec![Outcome::Failure, Outcome::NoFailure]);
    }
}
