pub mod baseline;
pub mod chart;
pub mod error;
pub mod format;
mod macros;
pub mod measurement;
pub mod metrics;
pub mod pipeline;
pub mod report;
pub mod style;

pub use error::{Error, Result};
pub use pipeline::{analyze, run, Analysis, Outcome};

/// Progress output is printed only with the `verbose` feature (on by default).
pub(crate) const VERBOSE: bool = cfg!(feature = "verbose");

#[allow(unused)]
pub mod prelude {
    pub use crate::baseline::{resolve_baseline, Baseline, BaselineNotice, Resolution};
    pub use crate::chart::{compose, ChartConfig, ChartConfigBuilder, ChartKind, ChartSpec, Charts};
    pub use crate::measurement::{MeasurementRow, MeasurementSet};
    pub use crate::metrics::{derive, efficiency, speedup, DerivedRow};
    pub use crate::report::{emit, write_table, Summary};
    pub use crate::style::{Color, StylePolicy};
    pub use crate::{analyze, run, Analysis, Error, Outcome, Result};
}
