use crate::baseline::Baseline;
use crate::measurement::{MeasurementRow, MeasurementSet};

/// A measurement plus the metrics derived from the baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedRow {
    pub label: String,
    pub time: f64,
    pub workers: Option<u32>,
    pub throughput: Option<f64>,
    /// `baseline_time / time`, `+inf` when `time` is zero
    pub speedup: f64,
    /// `speedup / workers * 100`. Values above 100 are super-linear and kept as is.
    pub efficiency: Option<f64>,
}

/// Ratio of the baseline time to `time`. A zero time is infinitely fast
/// rather than an error.
pub fn speedup(baseline_time: f64, time: f64) -> f64 {
    if time == 0.0 {
        f64::INFINITY
    } else {
        baseline_time / time
    }
}

/// Speedup per execution unit, as a percentage.
pub fn efficiency(speedup: f64, workers: u32) -> f64 {
    speedup / f64::from(workers) * 100.0
}

impl DerivedRow {
    pub fn from_measurement(row: &MeasurementRow, baseline_time: f64) -> Self {
        let speedup = speedup(baseline_time, row.time);
        DerivedRow {
            label: row.label.clone(),
            time: row.time,
            workers: row.workers,
            throughput: row.throughput,
            speedup,
            efficiency: row.workers.map(|w| efficiency(speedup, w)),
        }
    }
}

/// One [`DerivedRow`] per measurement, in set order.
pub fn derive(set: &MeasurementSet, baseline: &Baseline) -> Vec<DerivedRow> {
    set.rows()
        .iter()
        .map(|row| DerivedRow::from_measurement(row, baseline.time))
        .collect()
}

/// Whether any row carries an efficiency value.
pub fn has_efficiency(rows: &[DerivedRow]) -> bool {
    rows.iter().any(|r| r.efficiency.is_some())
}

/// Whether any row carries a throughput value.
pub fn has_throughput(rows: &[DerivedRow]) -> bool {
    rows.iter().any(|r| r.throughput.is_some())
}
