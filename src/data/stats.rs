use super::model::{
    FailureType, MaintenanceDataset, NumericColumn, NUMERIC_COLUMNS, SENSOR_COLUMNS,
};

// ---------------------------------------------------------------------------
// Aggregates over a filtered view of the dataset
// ---------------------------------------------------------------------------
//
// Every function here takes the dataset plus the index view produced by
// `filter::filtered_indices`. An empty view yields empty outputs, never an
// error. Grouped outputs are sorted by failure-type label so the order is
// deterministic.

/// Count of failure records for one failure type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureCount {
    pub failure_type: FailureType,
    pub count: usize,
}

/// Count records with `target` set and a real failure mode, grouped by
/// failure type. "No Failure" rows never contribute, even with `target` set.
pub fn failure_counts(dataset: &MaintenanceDataset, indices: &[usize]) -> Vec<FailureCount> {
    let mut counts: Vec<FailureCount> = Vec::new();

    for &i in indices {
        let obs = &dataset.observations[i];
        if !obs.target || obs.failure_type == FailureType::NoFailure {
            continue;
        }
        match counts.iter_mut().find(|c| c.failure_type == obs.failure_type) {
            Some(c) => c.count += 1,
            None => counts.push(FailureCount {
                failure_type: obs.failure_type,
                count: 1,
            }),
        }
    }

    counts.sort_by_key(|c| c.failure_type.label());
    counts
}

// ---------------------------------------------------------------------------
// Pearson correlation matrix
// ---------------------------------------------------------------------------

/// Pairwise Pearson correlation over the numeric columns of a view.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<NumericColumn>,
    /// `values[i][j]` is the correlation between `columns[i]` and
    /// `columns[j]`. Symmetric; `NaN` where a column has zero variance.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Compute the correlation matrix over all numeric columns. An empty view
/// produces an empty matrix.
pub fn correlation_matrix(dataset: &MaintenanceDataset, indices: &[usize]) -> CorrelationMatrix {
    if indices.is_empty() {
        return CorrelationMatrix {
            columns: Vec::new(),
            values: Vec::new(),
        };
    }

    let columns: Vec<NumericColumn> = NUMERIC_COLUMNS.to_vec();
    let series: Vec<Vec<f64>> = columns
        .iter()
        .map(|col| {
            indices
                .iter()
                .map(|&i| col.value(&dataset.observations[i]))
                .collect()
        })
        .collect();

    let n = columns.len();
    let mut values = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in i..n {
            let r = pearson(&series[i], &series[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix { columns, values }
}

/// Pearson correlation coefficient. `NaN` when either series has zero
/// variance (matches dataframe `corr` semantics for constant columns).
fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        f64::NAN
    } else {
        cov / denom
    }
}

// ---------------------------------------------------------------------------
// Per-failure-type sensor distributions (boxplot summaries)
// ---------------------------------------------------------------------------

/// Five-number summary plus mean of one group's sensor values.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
}

impl BoxSummary {
    /// Summarize a non-empty slice of values.
    fn from_values(values: &mut [f64]) -> BoxSummary {
        values.sort_by(f64::total_cmp);
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        BoxSummary {
            min: values[0],
            q1: quantile(values, 0.25),
            median: quantile(values, 0.5),
            q3: quantile(values, 0.75),
            max: values[values.len() - 1],
            mean,
        }
    }
}

/// Quantile of a sorted slice with linear interpolation between ranks.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let frac = pos - lo as f64;
        sorted[lo] + (sorted[hi] - sorted[lo]) * frac
    }
}

/// Partition one sensor column's values by failure type and summarize each
/// group. Every failure type present in the view gets a group, including
/// "No Failure". Groups are sorted by label.
pub fn sensor_distributions(
    dataset: &MaintenanceDataset,
    indices: &[usize],
    column: NumericColumn,
) -> Vec<(FailureType, BoxSummary)> {
    let mut groups: Vec<(FailureType, Vec<f64>)> = Vec::new();

    for &i in indices {
        let obs = &dataset.observations[i];
        let value = column.value(obs);
        match groups.iter_mut().find(|(ft, _)| *ft == obs.failure_type) {
            Some((_, values)) => values.push(value),
            None => groups.push((obs.failure_type, vec![value])),
        }
    }

    groups.sort_by_key(|(ft, _)| ft.label());
    groups
        .into_iter()
        .map(|(ft, mut values)| (ft, BoxSummary::from_values(&mut values)))
        .collect()
}

// ---------------------------------------------------------------------------
// Mean features per failure type
// ---------------------------------------------------------------------------

/// Per-failure-type means of the five sensor columns.
#[derive(Debug, Clone, PartialEq)]
pub struct MeanFeatures {
    pub failure_type: FailureType,
    /// Means aligned with [`SENSOR_COLUMNS`].
    pub means: [f64; 5],
}

/// Column-wise sensor means grouped by failure type, excluding the
/// "No Failure" group and the non-sensor columns (Target, UDI). Rows are
/// sorted by label.
pub fn mean_features(dataset: &MaintenanceDataset, indices: &[usize]) -> Vec<MeanFeatures> {
    let mut groups: Vec<(FailureType, [f64; 5], usize)> = Vec::new();

    for &i in indices {
        let obs = &dataset.observations[i];
        if obs.failure_type == FailureType::NoFailure {
            continue;
        }
        let idx = match groups.iter().position(|(ft, _, _)| *ft == obs.failure_type) {
            Some(idx) => idx,
            None => {
                groups.push((obs.failure_type, [0.0; 5], 0));
                groups.len() - 1
            }
        };
        let (_, sums, count) = &mut groups[idx];
        for (slot, col) in sums.iter_mut().zip(SENSOR_COLUMNS) {
            *slot += col.value(obs);
        }
        *count += 1;
    }

    groups.sort_by_key(|(ft, _, _)| ft.label());
    groups
        .into_iter()
        .map(|(failure_type, sums, count)| MeanFeatures {
            failure_type,
            means: sums.map(|s| s / count as f64),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filtered_indices, FilterCriteria};
    use crate::data::model::{MachineType, Observation};

    fn obs(
        udi: u32,
        torque: f64,
        tool_wear: f64,
        target: bool,
        failure_type: FailureType,
    ) -> Observation {
        Observation {
            udi,
            machine_type: MachineType::Medium,
            air_temperature: 298.0 + udi as f64 * 0.5,
            process_temperature: 308.0 + udi as f64 * 0.5,
            rotational_speed: 1400.0 + udi as f64 * 10.0,
            torque,
            tool_wear,
            target,
            failure_type,
        }
    }

    fn sample_dataset() -> MaintenanceDataset {
        MaintenanceDataset::from_observations(vec![
            obs(1, 40.0, 10.0, false, FailureType::NoFailure),
            obs(2, 65.0, 220.0, true, FailureType::Overstrain),
            obs(3, 42.0, 30.0, false, FailureType::NoFailure),
            obs(4, 70.0, 230.0, true, FailureType::Overstrain),
            obs(5, 20.0, 210.0, true, FailureType::ToolWear),
            obs(6, 55.0, 60.0, true, FailureType::Power),
            // Inconsistent row as found in the source data: a failure label
            // without the target flag. Must not be counted.
            obs(7, 30.0, 40.0, false, FailureType::Random),
        ])
    }

    fn all_indices(ds: &MaintenanceDataset) -> Vec<usize> {
        (0..ds.len()).collect()
    }

    #[test]
    fn failure_counts_group_and_sort_by_label() {
        let ds = sample_dataset();
        let counts = failure_counts(&ds, &all_indices(&ds));
        assert_eq!(
            counts,
            vec![
                FailureCount {
                    failure_type: FailureType::Overstrain,
                    count: 2
                },
                FailureCount {
                    failure_type: FailureType::Power,
                    count: 1
                },
                FailureCount {
                    failure_type: FailureType::ToolWear,
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn failure_counts_sum_matches_qualifying_rows() {
        let ds = sample_dataset();
        let indices = all_indices(&ds);
        let total: usize = failure_counts(&ds, &indices).iter().map(|c| c.count).sum();
        let qualifying = indices
            .iter()
            .filter(|&&i| {
                let o = &ds.observations[i];
                o.target && o.failure_type != FailureType::NoFailure
            })
            .count();
        assert_eq!(total, qualifying);
    }

    #[test]
    fn correlation_matrix_is_symmetric_with_unit_diagonal() {
        let ds = sample_dataset();
        let m = correlation_matrix(&ds, &all_indices(&ds));
        assert_eq!(m.columns.len(), NUMERIC_COLUMNS.len());
        for i in 0..m.columns.len() {
            assert!((m.values[i][i] - 1.0).abs() < 1e-12);
            for j in 0..m.columns.len() {
                assert_eq!(m.values[i][j].to_bits(), m.values[j][i].to_bits());
            }
        }
    }

    #[test]
    fn perfectly_linear_columns_correlate_to_one() {
        let ds = sample_dataset();
        let m = correlation_matrix(&ds, &all_indices(&ds));
        // air and process temperature are both affine in udi in the fixture.
        let i = m
            .columns
            .iter()
            .position(|c| *c == NumericColumn::AirTemperature)
            .unwrap();
        let j = m
            .columns
            .iter()
            .position(|c| *c == NumericColumn::ProcessTemperature)
            .unwrap();
        assert!((m.values[i][j] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn constant_column_yields_nan() {
        let ds = sample_dataset();
        // A single-row view makes every column constant.
        let m = correlation_matrix(&ds, &[0]);
        assert!(m.values[0][1].is_nan());
    }

    #[test]
    fn empty_view_degrades_to_empty_aggregates() {
        let ds = sample_dataset();
        let empty: Vec<usize> = Vec::new();
        assert!(failure_counts(&ds, &empty).is_empty());
        assert!(correlation_matrix(&ds, &empty).is_empty());
        assert!(sensor_distributions(&ds, &empty, NumericColumn::Torque).is_empty());
        assert!(mean_features(&ds, &empty).is_empty());
    }

    #[test]
    fn quantiles_interpolate_linearly() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&sorted, 0.0), 1.0);
        assert_eq!(quantile(&sorted, 0.25), 1.75);
        assert_eq!(quantile(&sorted, 0.5), 2.5);
        assert_eq!(quantile(&sorted, 1.0), 4.0);
    }

    #[test]
    fn sensor_distributions_cover_every_group_in_view() {
        let ds = sample_dataset();
        let groups = sensor_distributions(&ds, &all_indices(&ds), NumericColumn::Torque);
        let labels: Vec<&str> = groups.iter().map(|(ft, _)| ft.label()).collect();
        assert_eq!(
            labels,
            vec![
                "No Failure",
                "Overstrain Failure",
                "Power Failure",
                "Random Failures",
                "Tool Wear Failure",
            ]
        );

        let (_, overstrain) = &groups[1];
        assert_eq!(overstrain.min, 65.0);
        assert_eq!(overstrain.max, 70.0);
        assert_eq!(overstrain.median, 67.5);
        assert_eq!(overstrain.mean, 67.5);
    }

    #[test]
    fn mean_features_excludes_no_failure_group() {
        let ds = sample_dataset();
        let rows = mean_features(&ds, &all_indices(&ds));
        assert!(rows
            .iter()
            .all(|r| r.failure_type != FailureType::NoFailure));

        let overstrain = rows
            .iter()
            .find(|r| r.failure_type == FailureType::Overstrain)
            .unwrap();
        // torque mean over rows 2 and 4
        assert_eq!(overstrain.means[3], 67.5);
        // tool wear mean over rows 2 and 4
        assert_eq!(overstrain.means[4], 225.0);
    }

    #[test]
    fn aggregates_compose_with_the_filter_view() {
        let ds = sample_dataset();
        let mut criteria = FilterCriteria::full_domain(MachineType::Medium);
        criteria.tool_wear = 200.0..=250.0;
        let view = filtered_indices(&ds, &criteria);
        assert_eq!(view.len(), 3);

        let counts = failure_counts(&ds, &view);
        let total: usize = counts.iter().map(|c| c.count).sum();
        assert_eq!(total, 3);
    }
}
