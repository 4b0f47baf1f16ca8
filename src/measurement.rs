use crate::error::{Error, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;
use std::{collections::HashSet, fs::File, io, path::Path};

/// Canonical name of the implementation label column
pub const LABEL: &str = "label";
/// Canonical name of the execution time column (seconds)
pub const TIME: &str = "time";
/// Canonical name of the execution unit count column
pub const WORKERS: &str = "workers";
/// Canonical name of the throughput column (million elements / second)
pub const THROUGHPUT: &str = "throughput";

/// One observed data point.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementRow {
    /// Implementation or configuration, e.g. `"OpenMP (8 threads)"`. Not unique.
    pub label: String,
    /// Execution time in seconds. Zero is legal.
    pub time: f64,
    /// Threads, processes or blocks used. Only an efficiency divisor.
    pub workers: Option<u32>,
    pub throughput: Option<f64>,
}

impl MeasurementRow {
    pub fn new(label: impl Into<String>, time: f64) -> Self {
        MeasurementRow {
            label: label.into(),
            time,
            workers: None,
            throughput: None,
        }
    }

    pub fn with_workers(mut self, workers: u32) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn with_throughput(mut self, throughput: f64) -> Self {
        self.throughput = Some(throughput);
        self
    }
}

/// Ordered table of measurements. Order is the category order of every chart,
/// except that the baseline is moved to the front once it has been resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementSet {
    rows: Vec<MeasurementRow>,
}

impl MeasurementSet {
    pub fn new(rows: Vec<MeasurementRow>) -> Self {
        MeasurementSet { rows }
    }

    /// Built-in dataset used when no input file is given.
    pub fn default_set() -> Self {
        MeasurementSet::new(vec![
            MeasurementRow::new("Serial", 1.589532),
            MeasurementRow::new("OpenMP (8 threads)", 0.208704),
            MeasurementRow::new("MPI (8 processes)", 0.220486),
            MeasurementRow::new("CUDA (256 blocks)", 1.228265),
        ])
    }

    /// Load a CSV file. Fails with [`Error::InputNotFound`] when `path` does not exist.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::InputNotFound(path.to_path_buf()));
        }
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Parse CSV from any reader.
    ///
    /// Requires `label` and `time` columns (or their aliases, see
    /// [`canonical_column`]); other columns are ignored. `workers` and
    /// `throughput` are read when present. Any field that does not coerce
    /// aborts the whole load.
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

        let headers = canonical_headers(rdr.headers()?);
        let missing: Vec<String> = [LABEL, TIME]
            .iter()
            .filter(|required| !headers.iter().any(|h| h == **required))
            .map(|required| required.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(Error::Schema { missing });
        }
        rdr.set_headers(headers);

        let mut rows = Vec::new();
        for (index, record) in rdr.deserialize::<RawRow>().enumerate() {
            let row = index + 1;
            let record = record.map_err(|e| record_error(row, e))?;
            rows.push(record.coerce(row)?);
        }
        Ok(MeasurementSet { rows })
    }

    pub fn rows(&self) -> &[MeasurementRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<MeasurementRow> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Move the row at `index` to position 0, keeping the relative order of the rest.
    pub(crate) fn move_to_front(&mut self, index: usize) {
        if index < self.rows.len() {
            self.rows[..=index].rotate_right(1);
        }
    }
}

impl FromIterator<MeasurementRow> for MeasurementSet {
    fn from_iter<I: IntoIterator<Item = MeasurementRow>>(iter: I) -> Self {
        MeasurementSet::new(iter.into_iter().collect())
    }
}

/// Map a header to its canonical column name.
///
/// Matching is case-insensitive. Besides the canonical names this accepts
/// `Implementation`, `ExecutionTimeSeconds`, and `threads`/`processes`/`blocks`
/// for the worker count.
pub fn canonical_column(header: &str) -> Option<&'static str> {
    match header.trim().to_lowercase().as_str() {
        "label" | "implementation" => Some(LABEL),
        "time" | "executiontimeseconds" => Some(TIME),
        "workers" | "threads" | "processes" | "blocks" => Some(WORKERS),
        "throughput" => Some(THROUGHPUT),
        _ => None,
    }
}

fn canonical_headers(headers: &StringRecord) -> StringRecord {
    let mut seen = HashSet::new();
    headers
        .iter()
        .map(|header| match canonical_column(header) {
            Some(name) if seen.insert(name) => name.to_string(),
            // Aliased twice or unknown: keep it out of the way of the known fields.
            _ => format!("_{header}"),
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct RawRow {
    label: String,
    time: String,
    #[serde(default)]
    workers: Option<String>,
    #[serde(default)]
    throughput: Option<String>,
}

impl RawRow {
    fn coerce(self, row: usize) -> Result<MeasurementRow> {
        let time = parse_field(row, TIME, &self.time)?;

        let workers = match self.workers.filter(|w| !w.is_empty()) {
            Some(raw) => match raw.parse::<u32>() {
                Ok(workers) if workers > 0 => Some(workers),
                _ => {
                    return Err(Error::Data {
                        row,
                        column: WORKERS,
                        value: raw,
                    })
                }
            },
            None => None,
        };

        let throughput = match self.throughput.filter(|t| !t.is_empty()) {
            Some(raw) => Some(parse_field(row, THROUGHPUT, &raw)?),
            None => None,
        };

        Ok(MeasurementRow {
            label: self.label,
            time,
            workers,
            throughput,
        })
    }
}

/// Malformed data rows (wrong field count, invalid UTF-8, ...) are data
/// errors of that row; only I/O failures stay CSV errors.
fn record_error(row: usize, err: csv::Error) -> Error {
    if matches!(err.kind(), csv::ErrorKind::Io(_)) {
        return Error::Csv(err);
    }
    Error::Data {
        row,
        column: "record",
        value: err.to_string(),
    }
}

fn parse_field(row: usize, column: &'static str, raw: &str) -> Result<f64> {
    raw.parse::<f64>().map_err(|_| Error::Data {
        row,
        column,
        value: raw.to_string(),
    })
}
