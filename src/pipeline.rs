use crate::baseline::{resolve_baseline, Baseline, BaselineNotice};
use crate::chart::{compose, ChartConfig};
use crate::error::Result;
use crate::measurement::MeasurementSet;
use crate::metrics::{derive, DerivedRow};
use crate::report::{emit, Summary};
use crate::style::StylePolicy;
use std::path::{Path, PathBuf};

/// Measurements after baseline resolution and metric derivation.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub baseline: Baseline,
    /// Set when the baseline had to be inferred
    pub notice: Option<BaselineNotice>,
    /// Baseline first, everything else in input order
    pub rows: Vec<DerivedRow>,
}

/// Resolve the baseline and derive speedup and efficiency for every row.
pub fn analyze(mut set: MeasurementSet) -> Result<Analysis> {
    let resolution = resolve_baseline(&mut set)?;
    let rows = derive(&set, &resolution.baseline);
    Ok(Analysis {
        baseline: resolution.baseline,
        notice: resolution.notice,
        rows,
    })
}

#[derive(Debug)]
pub struct Outcome {
    pub analysis: Analysis,
    pub summary: Summary,
    /// Artifacts published to the output directory
    pub written: Vec<PathBuf>,
}

/// Load, analyze, chart and write one run.
///
/// `input` of `None` uses [`MeasurementSet::default_set`]. Loading and
/// validation happen before the output directory is touched, so schema and
/// data errors leave it as it was.
pub fn run(input: Option<&Path>, config: &ChartConfig, policy: &StylePolicy) -> Result<Outcome> {
    let set = match input {
        Some(path) => MeasurementSet::from_csv_path(path)?,
        None => MeasurementSet::default_set(),
    };

    let analysis = analyze(set)?;
    let charts = compose(&analysis.rows, policy, config);
    let written = emit(&charts, &analysis.rows, config)?;
    let summary = Summary::new(&analysis.rows);

    Ok(Outcome {
        analysis,
        summary,
        written,
    })
}
