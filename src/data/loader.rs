use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use thiserror::Error;

use super::model::{LaunchDataset, LaunchRecord};

pub const SITE_COLUMN: &str = "Launch Site";
pub const PAYLOAD_COLUMN: &str = "Payload Mass (kg)";
pub const BOOSTER_COLUMN: &str = "Booster Version Category";
pub const CLASS_COLUMN: &str = "class";

const REQUIRED_COLUMNS: [&str; 4] = [SITE_COLUMN, PAYLOAD_COLUMN, BOOSTER_COLUMN, CLASS_COLUMN];

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a dataset could not be loaded. Every variant is fatal to startup.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("malformed parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("malformed arrow data: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    /// `row` is the 1-based data row, not counting the header.
    #[error("data row {row}: {message}")]
    InvalidRow { row: usize, message: String },
    #[error("dataset contains no launch records")]
    Empty,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the launch table from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row naming at least the four required columns;
///   any other columns are ignored
/// * `.parquet` – the same column names, string and numeric arrow types
pub fn load_file(path: &Path) -> Result<LaunchDataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => {
            let file = open(path)?;
            read_csv(file)?
        }
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string())),
    };

    LaunchDataset::from_records(records).ok_or(LoadError::Empty)
}

fn open(path: &Path) -> Result<std::fs::File, LoadError> {
    std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Validate the raw outcome value; only exact 0 or 1 is a class.
fn parse_class(value: f64, row: usize) -> Result<u8, LoadError> {
    if value == 0.0 {
        Ok(0)
    } else if value == 1.0 {
        Ok(1)
    } else {
        Err(LoadError::InvalidRow {
            row,
            message: format!("class must be 0 or 1, got {value}"),
        })
    }
}

/// Fail on the first required column `has_column` does not find.
fn check_columns(has_column: impl Fn(&str) -> bool) -> Result<(), LoadError> {
    match REQUIRED_COLUMNS.into_iter().find(|name| !has_column(name)) {
        Some(missing) => Err(LoadError::MissingColumn(missing)),
        None => Ok(()),
    }
}

fn check_payload(value: f64, row: usize) -> Result<f64, LoadError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(LoadError::InvalidRow {
            row,
            message: format!("payload mass is not a finite number: {value}"),
        })
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Launch Site")]
    launch_site: String,
    #[serde(rename = "Payload Mass (kg)")]
    payload_mass_kg: f64,
    #[serde(rename = "Booster Version Category")]
    booster_version_category: String,
    class: f64,
}

/// Parse launch records from any CSV source with a header row.
pub fn read_csv<R: Read>(source: R) -> Result<Vec<LaunchRecord>, LoadError> {
    let mut reader = csv::Reader::from_reader(source);
    let headers = reader.headers()?.clone();
    check_columns(|name| headers.iter().any(|h| h == name))?;

    let mut records = Vec::new();
    for (i, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row_no = i + 1;
        let row = result?;
        records.push(LaunchRecord {
            launch_site: row.launch_site,
            payload_mass_kg: check_payload(row.payload_mass_kg, row_no)?,
            booster_version_category: row.booster_version_category,
            class: parse_class(row.class, row_no)?,
        });
    }

    Ok(records)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load launch records from a Parquet file whose columns carry the same
/// names as the CSV header.
fn load_parquet(path: &Path) -> Result<Vec<LaunchRecord>, LoadError> {
    let file = open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    // Checked against the file schema so a file without rows still reports
    // its missing columns.
    let schema = builder.schema().clone();
    check_columns(|name| schema.index_of(name).is_ok())?;
    let reader = builder.build()?;

    let mut records = Vec::new();
    let mut row_offset = 0usize;

    for batch_result in reader {
        let batch = batch_result?;

        let site_col = column(&batch, SITE_COLUMN)?;
        let payload_col = column(&batch, PAYLOAD_COLUMN)?;
        let booster_col = column(&batch, BOOSTER_COLUMN)?;
        let class_col = column(&batch, CLASS_COLUMN)?;

        for row in 0..batch.num_rows() {
            let row_no = row_offset + row + 1;
            records.push(LaunchRecord {
                launch_site: string_at(site_col, row, row_no)?,
                payload_mass_kg: check_payload(f64_at(payload_col, row, row_no)?, row_no)?,
                booster_version_category: string_at(booster_col, row, row_no)?,
                class: parse_class(f64_at(class_col, row, row_no)?, row_no)?,
            });
        }
        row_offset += batch.num_rows();
    }

    Ok(records)
}

// -- Arrow helpers --

fn column<'a>(batch: &'a RecordBatch, name: &'static str) -> Result<&'a ArrayRef, LoadError> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| LoadError::MissingColumn(name))?;
    Ok(batch.column(idx))
}

fn null_cell(row_no: usize) -> LoadError {
    LoadError::InvalidRow {
        row: row_no,
        message: "unexpected null value".to_string(),
    }
}

fn wrong_type(row_no: usize, data_type: &DataType, expected: &str) -> LoadError {
    LoadError::InvalidRow {
        row: row_no,
        message: format!("column type {data_type:?}, expected {expected}"),
    }
}

/// Read a string cell from a Utf8 or LargeUtf8 column.
fn string_at(col: &Arc<dyn Array>, row: usize, row_no: usize) -> Result<String, LoadError> {
    if col.is_null(row) {
        return Err(null_cell(row_no));
    }
    match col.data_type() {
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .map(|s| s.value(row).to_string())
            .ok_or_else(|| wrong_type(row_no, col.data_type(), "Utf8")),
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(row).to_string()),
        other => Err(wrong_type(row_no, other, "Utf8")),
    }
}

/// Read a numeric cell from any float or integer column as `f64`.
fn f64_at(col: &Arc<dyn Array>, row: usize, row_no: usize) -> Result<f64, LoadError> {
    if col.is_null(row) {
        return Err(null_cell(row_no));
    }
    let any = col.as_any();
    let value = match col.data_type() {
        DataType::Float64 => any.downcast_ref::<Float64Array>().map(|a| a.value(row)),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int64 => any.downcast_ref::<Int64Array>().map(|a| a.value(row) as f64),
        DataType::Int32 => any.downcast_ref::<Int32Array>().map(|a| a.value(row) as f64),
        other => return Err(wrong_type(row_no, other, "a numeric type")),
    };
    value.ok_or_else(|| wrong_type(row_no, col.data_type(), "a numeric type"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use parquet::arrow::ArrowWriter;

    const SAMPLE: &str = "\
,Flight Number,Launch Site,class,Payload Mass (kg),Booster Version,Booster Version Category
0,1,CCAFS LC-40,0,0.0,F9 v1.0  B0003,v1.0
1,2,CCAFS LC-40,0,0.0,F9 v1.0  B0004,v1.0
2,3,VAFB SLC-4E,1,500.0,F9 v1.1  B1003,v1.1
3,4,KSC LC-39A,1,5300.0,F9 FT B1031.1,FT
";

    #[test]
    fn reads_required_columns_and_ignores_the_rest() {
        let records = read_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[2].launch_site, "VAFB SLC-4E");
        assert_eq!(records[2].payload_mass_kg, 500.0);
        assert_eq!(records[2].booster_version_category, "v1.1");
        assert!(records[3].is_success());
        assert!(!records[0].is_success());
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let csv = "Launch Site,class,Payload Mass (kg)\nA,1,10\n";
        match read_csv(csv.as_bytes()) {
            Err(LoadError::MissingColumn(name)) => assert_eq!(name, BOOSTER_COLUMN),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn unparsable_payload_is_fatal() {
        let csv = "Launch Site,class,Payload Mass (kg),Booster Version Category\nA,1,heavy,FT\n";
        assert!(matches!(read_csv(csv.as_bytes()), Err(LoadError::Csv(_))));
    }

    #[test]
    fn class_outside_zero_one_is_rejected() {
        let csv = "Launch Site,class,Payload Mass (kg),Booster Version Category\nA,1,10,FT\nB,2,10,FT\n";
        match read_csv(csv.as_bytes()) {
            Err(LoadError::InvalidRow { row, .. }) => assert_eq!(row, 2),
            other => panic!("expected InvalidRow, got {other:?}"),
        }
    }

    #[test]
    fn float_encoded_class_is_accepted() {
        let csv = "Launch Site,class,Payload Mass (kg),Booster Version Category\nA,1.0,10,FT\n";
        let records = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(records[0].class, 1);
    }

    #[test]
    fn unknown_extension_and_missing_file_fail() {
        assert!(matches!(
            load_file(Path::new("launches.xlsx")),
            Err(LoadError::UnsupportedExtension(ext)) if ext == "xlsx"
        ));
        assert!(matches!(
            load_file(Path::new("definitely/not/here.csv")),
            Err(LoadError::Io { .. })
        ));
    }

    #[test]
    fn header_only_file_has_no_records() {
        let csv = "Launch Site,class,Payload Mass (kg),Booster Version Category\n";
        let records = read_csv(csv.as_bytes()).unwrap();
        assert!(records.is_empty());
        assert!(LaunchDataset::from_records(records).is_none());
    }

    // -- Parquet --

    fn parquet_file(name: &str, columns: Vec<(&str, ArrayRef)>) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "launch-dash-{}-{name}.parquet",
            std::process::id()
        ));
        let batch = RecordBatch::try_from_iter(columns).unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, batch.schema(), None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
        path
    }

    fn strings(values: &[&str]) -> ArrayRef {
        Arc::new(StringArray::from(values.to_vec()))
    }

    #[test]
    fn parquet_loads_typed_columns() {
        let path = parquet_file(
            "ok",
            vec![
                (SITE_COLUMN, strings(&["A", "B", "A", "C"])),
                (PAYLOAD_COLUMN, Arc::new(Float64Array::from(vec![0.0, 100.0, 300.0, 50.0])) as ArrayRef),
                (BOOSTER_COLUMN, strings(&["v1.0", "FT", "FT", "B5"])),
                (CLASS_COLUMN, Arc::new(Int64Array::from(vec![0, 1, 1, 0])) as ArrayRef),
            ],
        );
        let ds = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(ds.len(), 4);
        assert_eq!(ds.min_payload(), 0.0);
        assert_eq!(ds.max_payload(), 300.0);
        assert_eq!(ds.sites().collect::<Vec<_>>(), vec!["A", "B", "C"]);
        assert_eq!(ds.records()[2].booster_version_category, "FT");
        assert_eq!(ds.records()[1].class, 1);
    }

    #[test]
    fn parquet_missing_column_is_reported_even_without_rows() {
        for (name, sites) in [("missing-rows", vec!["A", "B", "C"]), ("missing-empty", vec![])] {
            let n = sites.len();
            let path = parquet_file(
                name,
                vec![
                    (SITE_COLUMN, strings(&sites)),
                    (PAYLOAD_COLUMN, Arc::new(Float64Array::from(vec![1.0; n])) as ArrayRef),
                    (CLASS_COLUMN, Arc::new(Int64Array::from(vec![1; n])) as ArrayRef),
                ],
            );
            let result = load_file(&path);
            std::fs::remove_file(&path).ok();
            match result {
                Err(LoadError::MissingColumn(column)) => assert_eq!(column, BOOSTER_COLUMN),
                other => panic!("{name}: expected MissingColumn, got {other:?}"),
            }
        }
    }

    #[test]
    fn parquet_null_cell_is_rejected_with_its_row() {
        let path = parquet_file(
            "null",
            vec![
                (SITE_COLUMN, Arc::new(StringArray::from(vec![Some("A"), None])) as ArrayRef),
                (PAYLOAD_COLUMN, Arc::new(Float64Array::from(vec![1.0, 2.0])) as ArrayRef),
                (BOOSTER_COLUMN, strings(&["FT", "FT"])),
                (CLASS_COLUMN, Arc::new(Int64Array::from(vec![1, 0])) as ArrayRef),
            ],
        );
        let result = load_file(&path);
        std::fs::remove_file(&path).ok();
        match result {
            Err(LoadError::InvalidRow { row, message }) => {
                assert_eq!(row, 2);
                assert!(message.contains("null"), "{message}");
            }
            other => panic!("expected InvalidRow, got {other:?}"),
        }
    }

    #[test]
    fn parquet_integer_class_outside_zero_one_is_rejected() {
        let path = parquet_file(
            "class",
            vec![
                (SITE_COLUMN, strings(&["A"])),
                (PAYLOAD_COLUMN, Arc::new(Int32Array::from(vec![500])) as ArrayRef),
                (BOOSTER_COLUMN, strings(&["FT"])),
                (CLASS_COLUMN, Arc::new(Int64Array::from(vec![2])) as ArrayRef),
            ],
        );
        let result = load_file(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(LoadError::InvalidRow { row: 1, .. })));
    }

    #[test]
    fn parquet_string_payload_is_wrong_type() {
        let path = parquet_file(
            "type",
            vec![
                (SITE_COLUMN, strings(&["A"])),
                (PAYLOAD_COLUMN, strings(&["heavy"])),
                (BOOSTER_COLUMN, strings(&["FT"])),
                (CLASS_COLUMN, Arc::new(Int64Array::from(vec![1])) as ArrayRef),
            ],
        );
        let result = load_file(&path);
        std::fs::remove_file(&path).ok();
        match result {
            Err(LoadError::InvalidRow { message, .. }) => assert!(message.contains("Utf8"), "{message}"),
            other => panic!("expected InvalidRow, got {other:?}"),
        }
    }
}
