use std::ops::RangeInclusive;

use super::model::{
    MachineType, MaintenanceDataset, Observation, AIR_TEMPERATURE_BOUNDS,
    PROCESS_TEMPERATURE_BOUNDS, ROTATIONAL_SPEED_BOUNDS, TOOL_WEAR_BOUNDS, TORQUE_BOUNDS,
};

// ---------------------------------------------------------------------------
// Filter predicate: machine-type equality + five inclusive sensor ranges
// ---------------------------------------------------------------------------

/// User-chosen exploration filter. The machine type must match exactly and
/// every sensor value must lie within its range, inclusive on both ends.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    pub machine_type: MachineType,
    pub air_temperature: RangeInclusive<f64>,
    pub process_temperature: RangeInclusive<f64>,
    pub rotational_speed: RangeInclusive<f64>,
    pub torque: RangeInclusive<f64>,
    pub tool_wear: RangeInclusive<f64>,
}

impl FilterCriteria {
    /// Criteria spanning the full domain of every sensor, i.e. only the
    /// machine type constrains the result.
    pub fn full_domain(machine_type: MachineType) -> Self {
        FilterCriteria {
            machine_type,
            air_temperature: AIR_TEMPERATURE_BOUNDS,
            process_temperature: PROCESS_TEMPERATURE_BOUNDS,
            rotational_speed: ROTATIONAL_SPEED_BOUNDS,
            torque: TORQUE_BOUNDS,
            tool_wear: TOOL_WEAR_BOUNDS,
        }
    }

    /// Whether a single observation passes every predicate.
    pub fn matches(&self, obs: &Observation) -> bool {
        obs.machine_type == self.machine_type
            && self.air_temperature.contains(&obs.air_temperature)
            && self.process_temperature.contains(&obs.process_temperature)
            && self.rotational_speed.contains(&obs.rotational_speed)
            && self.torque.contains(&obs.torque)
            && self.tool_wear.contains(&obs.tool_wear)
    }
}

/// Return indices of observations that pass the criteria.
///
/// This is a view over the dataset: the observation set itself is never
/// touched, and the result is recomputed from scratch on every call.
pub fn filtered_indices(dataset: &MaintenanceDataset, criteria: &FilterCriteria) -> Vec<usize> {
    dataset
        .observations
        .iter()
        .enumerate()
        .filter(|(_, obs)| criteria.matches(obs))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::FailureType;

    fn obs(udi: u32, machine_type: MachineType, torque: f64) -> Observation {
        Observation {
            udi,
            machine_type,
            air_temperature: 300.0,
            process_temperature: 310.0,
            rotational_speed: 1500.0,
            torque,
            tool_wear: 100.0,
            target: false,
            failure_type: FailureType::NoFailure,
        }
    }

    fn sample_dataset() -> MaintenanceDataset {
        MaintenanceDataset::from_observations(vec![
            obs(1, MachineType::Medium, 40.0),
            obs(2, MachineType::Low, 40.0),
            obs(3, MachineType::Medium, 76.0),
            obs(4, MachineType::High, 10.0),
            obs(5, MachineType::Medium, 3.5),
        ])
    }

    #[test]
    fn full_domain_keeps_every_row_of_the_selected_type() {
        let ds = sample_dataset();
        let idx = filtered_indices(&ds, &FilterCriteria::full_domain(MachineType::Medium));
        assert_eq!(idx, vec![0, 2, 4]);
        for &i in &idx {
            assert_eq!(ds.observations[i].machine_type, MachineType::Medium);
        }
    }

    #[test]
    fn full_domain_is_the_identity_on_a_single_type_dataset() {
        let ds = MaintenanceDataset::from_observations(vec![
            obs(1, MachineType::High, 10.0),
            obs(2, MachineType::High, 40.0),
            obs(3, MachineType::High, 77.0),
        ]);
        let idx = filtered_indices(&ds, &FilterCriteria::full_domain(MachineType::High));
        assert_eq!(idx, vec![0, 1, 2]);
    }

    #[test]
    fn non_matching_machine_type_is_excluded() {
        let ds = sample_dataset();
        let idx = filtered_indices(&ds, &FilterCriteria::full_domain(MachineType::High));
        assert_eq!(idx, vec![3]);
    }

    #[test]
    fn range_bounds_are_inclusive_on_both_ends() {
        let ds = sample_dataset();
        let mut criteria = FilterCriteria::full_domain(MachineType::Medium);
        criteria.torque = 3.5..=76.0;
        // Rows with torque exactly at either bound stay in.
        assert_eq!(filtered_indices(&ds, &criteria), vec![0, 2, 4]);

        criteria.torque = 3.6..=75.9;
        assert_eq!(filtered_indices(&ds, &criteria), vec![0]);
    }

    #[test]
    fn empty_result_is_valid() {
        let ds = sample_dataset();
        let mut criteria = FilterCriteria::full_domain(MachineType::Medium);
        criteria.tool_wear = 200.0..=250.0;
        assert!(filtered_indices(&ds, &criteria).is_empty());
    }

    #[test]
    fn filtering_does_not_mutate_the_dataset() {
        let ds = sample_dataset();
        let before = ds.observations.clone();
        let _ = filtered_indices(&ds, &FilterCriteria::full_domain(MachineType::Low));
        assert_eq!(ds.observations, before);
    }
}
