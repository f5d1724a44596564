use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{FailureType, MachineType, MaintenanceDataset, Observation};

// ---------------------------------------------------------------------------
// Canonical column names
// ---------------------------------------------------------------------------

const COL_UDI: &str = "UDI";
const COL_TYPE: &str = "Type";
const COL_AIR: &str = "Air temperature [K]";
const COL_PROCESS: &str = "Process temperature [K]";
const COL_SPEED: &str = "Rotational speed [rpm]";
const COL_TORQUE: &str = "Torque [Nm]";
const COL_WEAR: &str = "Tool wear [min]";
const COL_TARGET: &str = "Target";
const COL_FAILURE: &str = "Failure Type";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the historical maintenance dataset from a file.  Dispatch by
/// extension.
///
/// Supported formats:
/// * `.csv`     – header row with the canonical column names (recommended)
/// * `.json`    – records-oriented array of objects with the same keys
/// * `.parquet` – Parquet file with the same columns
///
/// Columns are located by name; unknown extra columns (e.g. `Product ID`)
/// are ignored.
pub fn load_file(path: &Path) -> Result<MaintenanceDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<MaintenanceDataset> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let col = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .with_context(|| format!("CSV missing '{name}' column"))
    };

    let udi_idx = col(COL_UDI)?;
    let type_idx = col(COL_TYPE)?;
    let air_idx = col(COL_AIR)?;
    let process_idx = col(COL_PROCESS)?;
    let speed_idx = col(COL_SPEED)?;
    let torque_idx = col(COL_TORQUE)?;
    let wear_idx = col(COL_WEAR)?;
    let target_idx = col(COL_TARGET)?;
    let failure_idx = col(COL_FAILURE)?;

    let mut observations = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let field = |idx: usize| record.get(idx).unwrap_or("");

        let observation = Observation {
            udi: parse_u32(field(udi_idx), row_no, COL_UDI)?,
            machine_type: parse_machine_type(field(type_idx), row_no)?,
            air_temperature: parse_f64(field(air_idx), row_no, COL_AIR)?,
            process_temperature: parse_f64(field(process_idx), row_no, COL_PROCESS)?,
            rotational_speed: parse_f64(field(speed_idx), row_no, COL_SPEED)?,
            torque: parse_f64(field(torque_idx), row_no, COL_TORQUE)?,
            tool_wear: parse_f64(field(wear_idx), row_no, COL_WEAR)?,
            target: parse_target(field(target_idx), row_no)?,
            failure_type: parse_failure_type(field(failure_idx), row_no)?,
        };
        observations.push(observation);
    }

    Ok(MaintenanceDataset::from_observations(observations))
}

fn parse_u32(s: &str, row: usize, col: &str) -> Result<u32> {
    s.trim()
        .parse::<u32>()
        .with_context(|| format!("Row {row}, {col}: '{s}' is not an integer"))
}

fn parse_f64(s: &str, row: usize, col: &str) -> Result<f64> {
    s.trim()
        .parse::<f64>()
        .with_context(|| format!("Row {row}, {col}: '{s}' is not a number"))
}

fn parse_target(s: &str, row: usize) -> Result<bool> {
    match s.trim() {
        "0" | "false" => Ok(false),
        "1" | "true" => Ok(true),
        other => bail!("Row {row}, {COL_TARGET}: '{other}' is not a binary flag"),
    }
}

fn parse_machine_type(s: &str, row: usize) -> Result<MachineType> {
    s.parse::<MachineType>()
        .map_err(|e| anyhow::anyhow!("Row {row}, {COL_TYPE}: {e}"))
}

fn parse_failure_type(s: &str, row: usize) -> Result<FailureType> {
    s.parse::<FailureType>()
        .map_err(|e| anyhow::anyhow!("Row {row}, {COL_FAILURE}: {e}"))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default
/// `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "UDI": 1,
///     "Type": "M",
///     "Air temperature [K]": 298.1,
///     "Process temperature [K]": 308.6,
///     "Rotational speed [rpm]": 1551,
///     "Torque [Nm]": 42.8,
///     "Tool wear [min]": 0,
///     "Target": 0,
///     "Failure Type": "No Failure"
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<MaintenanceDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut observations = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let num = |name: &str| -> Result<f64> {
            obj.get(name)
                .and_then(|v| v.as_f64())
                .with_context(|| format!("Row {i}: missing or non-numeric '{name}'"))
        };
        let string = |name: &str| -> Result<&str> {
            obj.get(name)
                .and_then(|v| v.as_str())
                .with_context(|| format!("Row {i}: missing or non-string '{name}'"))
        };

        let target = match obj.get(COL_TARGET) {
            Some(JsonValue::Bool(b)) => *b,
            Some(JsonValue::Number(n)) => match n.as_i64() {
                Some(0) => false,
                Some(1) => true,
                _ => bail!("Row {i}: '{COL_TARGET}' is not a binary flag"),
            },
            _ => bail!("Row {i}: missing or invalid '{COL_TARGET}'"),
        };

        observations.push(Observation {
            udi: num(COL_UDI)? as u32,
            machine_type: parse_machine_type(string(COL_TYPE)?, i)?,
            air_temperature: num(COL_AIR)?,
            process_temperature: num(COL_PROCESS)?,
            rotational_speed: num(COL_SPEED)?,
            torque: num(COL_TORQUE)?,
            tool_wear: num(COL_WEAR)?,
            target,
            failure_type: parse_failure_type(string(COL_FAILURE)?, i)?,
        });
    }

    Ok(MaintenanceDataset::from_observations(observations))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with the canonical maintenance columns.
///
/// Numeric columns are accepted as Int32/Int64/Float32/Float64, `Type` and
/// `Failure Type` as strings, `Target` as integer or boolean.  Works with
/// files written by both **Pandas** (`df.to_parquet()`) and **Polars**
/// (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<MaintenanceDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut observations = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let index_of = |name: &str| -> Result<usize> {
            schema
                .index_of(name)
                .map_err(|_| anyhow::anyhow!("Parquet file missing '{name}' column"))
        };

        let udi_col = batch.column(index_of(COL_UDI)?);
        let type_col = batch.column(index_of(COL_TYPE)?);
        let air_col = batch.column(index_of(COL_AIR)?);
        let process_col = batch.column(index_of(COL_PROCESS)?);
        let speed_col = batch.column(index_of(COL_SPEED)?);
        let torque_col = batch.column(index_of(COL_TORQUE)?);
        let wear_col = batch.column(index_of(COL_WEAR)?);
        let target_col = batch.column(index_of(COL_TARGET)?);
        let failure_col = batch.column(index_of(COL_FAILURE)?);

        for row in 0..batch.num_rows() {
            let machine_type = extract_string(type_col, row)
                .with_context(|| format!("Row {row}: failed to read '{COL_TYPE}'"))?;
            let failure_type = extract_string(failure_col, row)
                .with_context(|| format!("Row {row}: failed to read '{COL_FAILURE}'"))?;

            observations.push(Observation {
                udi: extract_f64(udi_col, row)
                    .with_context(|| format!("Row {row}: failed to read '{COL_UDI}'"))?
                    as u32,
                machine_type: parse_machine_type(&machine_type, row)?,
                air_temperature: extract_f64(air_col, row)
                    .with_context(|| format!("Row {row}: failed to read '{COL_AIR}'"))?,
                process_temperature: extract_f64(process_col, row)
                    .with_context(|| format!("Row {row}: failed to read '{COL_PROCESS}'"))?,
                rotational_speed: extract_f64(speed_col, row)
                    .with_context(|| format!("Row {row}: failed to read '{COL_SPEED}'"))?,
                torque: extract_f64(torque_col, row)
                    .with_context(|| format!("Row {row}: failed to read '{COL_TORQUE}'"))?,
                tool_wear: extract_f64(wear_col, row)
                    .with_context(|| format!("Row {row}: failed to read '{COL_WEAR}'"))?,
                target: extract_target(target_col, row)
                    .with_context(|| format!("Row {row}: failed to read '{COL_TARGET}'"))?,
                failure_type: parse_failure_type(&failure_type, row)?,
            });
        }
    }

    Ok(MaintenanceDataset::from_observations(observations))
}

// -- Parquet / Arrow helpers --

/// Extract a numeric cell as `f64` from an Int32/Int64/Float32/Float64
/// column.
fn extract_f64(col: &Arc<dyn Array>, row: usize) -> Result<f64> {
    if col.is_null(row) {
        bail!("null value in numeric column");
    }
    match col.data_type() {
        DataType::Int32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int32Array>()
                .context("expected Int32Array")?;
            Ok(arr.value(row) as f64)
        }
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .context("expected Int64Array")?;
            Ok(arr.value(row) as f64)
        }
        DataType::Float32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float32Array>()
                .context("expected Float32Array")?;
            Ok(arr.value(row) as f64)
        }
        DataType::Float64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float64Array>()
                .context("expected Float64Array")?;
            Ok(arr.value(row))
        }
        other => bail!("Expected numeric column, got {other:?}"),
    }
}

/// Extract a string cell from a Utf8 or LargeUtf8 column.
fn extract_string(col: &Arc<dyn Array>, row: usize) -> Result<String> {
    if col.is_null(row) {
        bail!("null value in string column");
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            Ok(arr.value(row).to_string())
        }
        DataType::LargeUtf8 => {
            let arr = col.as_string::<i64>();
            Ok(arr.value(row).to_string())
        }
        other => bail!("Expected string column, got {other:?}"),
    }
}

/// Extract the binary target flag from an integer or boolean column.
fn extract_target(col: &Arc<dyn Array>, row: usize) -> Result<bool> {
    if let DataType::Boolean = col.data_type() {
        let arr = col
            .as_any()
            .downcast_ref::<BooleanArray>()
            .context("expected BooleanArray")?;
        return Ok(arr.value(row));
    }
    match extract_f64(col, row)? {
        v if v == 0.0 => Ok(false),
        v if v == 1.0 => Ok(true),
        v => bail!("'{v}' is not a binary flag"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CSV_HEADER: &str = "UDI,Product ID,Type,Air temperature [K],Process temperature [K],\
Rotational speed [rpm],Torque [Nm],Tool wear [min],Target,Failure Type";

    fn write_csv(rows: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .unwrap();
        writeln!(file, "{CSV_HEADER}").unwrap();
        for row in rows {
            writeln!(file, "{row}").unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn csv_round_trips_the_canonical_schema() {
        let file = write_csv(&[
            "1,M14860,M,298.1,308.6,1551,42.8,0,0,No Failure",
            "2,L47181,L,298.2,308.7,1408,46.3,3,1,Power Failure",
        ]);
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 2);

        let first = &ds.observations[0];
        assert_eq!(first.udi, 1);
        assert_eq!(first.machine_type, MachineType::Medium);
        assert_eq!(first.air_temperature, 298.1);
        assert_eq!(first.rotational_speed, 1551.0);
        assert!(!first.target);
        assert_eq!(first.failure_type, FailureType::NoFailure);

        let second = &ds.observations[1];
        assert!(second.target);
        assert_eq!(second.failure_type, FailureType::Power);
    }

    #[test]
    fn csv_ignores_unknown_columns() {
        // `Product ID` is present in the header above but nowhere in the
        // Observation type.
        let file = write_csv(&["1,H29424,H,300.0,310.0,2000,50.0,100,0,No Failure"]);
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.observations[0].machine_type, MachineType::High);
    }

    #[test]
    fn csv_rejects_unknown_labels() {
        let file = write_csv(&["1,M1,Q,298.1,308.6,1551,42.8,0,0,No Failure"]);
        let err = load_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("unknown machine type"));

        let file = write_csv(&["1,M1,M,298.1,308.6,1551,42.8,0,0,Exploded"]);
        let err = load_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("unknown failure type"));
    }

    #[test]
    fn csv_missing_column_is_an_error() {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .unwrap();
        writeln!(file, "UDI,Type").unwrap();
        writeln!(file, "1,M").unwrap();
        file.flush().unwrap();

        let err = load_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn json_records_load() {
        let mut file = tempfile::Builder::new()
            .suffix(".json")
            .tempfile()
            .unwrap();
        write!(
            file,
            r#"[{{
                "UDI": 7,
                "Type": "L",
                "Air temperature [K]": 295.4,
                "Process temperature [K]": 306.1,
                "Rotational speed [rpm]": 1412,
                "Torque [Nm]": 52.3,
                "Tool wear [min]": 218,
                "Target": 1,
                "Failure Type": "Tool Wear Failure"
            }}]"#
        )
        .unwrap();
        file.flush().unwrap();

        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 1);
        let obs = &ds.observations[0];
        assert_eq!(obs.udi, 7);
        assert_eq!(obs.machine_type, MachineType::Low);
        assert!(obs.target);
        assert_eq!(obs.failure_type, FailureType::ToolWear);
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_file(Path::new("dataset.xlsx")).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"));
    }
}
