use crate::error::{Error, Result};
use crate::format;
use crate::measurement::{MeasurementRow, MeasurementSet};
use std::fmt;

/// Label (compared case-insensitively) that marks the explicit baseline.
pub const BASELINE_LABEL: &str = "serial";

/// The reference measurement all relative metrics are computed against.
#[derive(Debug, Clone, PartialEq)]
pub struct Baseline {
    pub label: String,
    pub time: f64,
    /// Position of the baseline in the set before it was moved to the front
    pub source_index: usize,
    /// `false` when no label matched and the first row was used instead
    pub explicit: bool,
}

/// Non-fatal notice: the baseline was inferred rather than found by label.
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineNotice {
    pub label: String,
    pub time: f64,
}

impl fmt::Display for BaselineNotice {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "'Serial' not found; using '{}' as baseline ({}).",
            self.label,
            format::seconds(self.time)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub baseline: Baseline,
    pub notice: Option<BaselineNotice>,
}

/// Index of the first row whose label is `serial` in any case.
pub fn find_baseline(rows: &[MeasurementRow]) -> Option<usize> {
    rows.iter()
        .position(|row| row.label.eq_ignore_ascii_case(BASELINE_LABEL))
}

/// Pick the baseline and move it to the front of `set`.
///
/// Only the first matching row is the baseline; later `serial` rows stay
/// where they are and are treated like any other row. Without a match the
/// first row is used and a [`BaselineNotice`] is returned with it.
pub fn resolve_baseline(set: &mut MeasurementSet) -> Result<Resolution> {
    if set.is_empty() {
        return Err(Error::Empty);
    }

    let (index, explicit) = match find_baseline(set.rows()) {
        Some(index) => (index, true),
        None => (0, false),
    };

    let row = &set.rows()[index];
    let baseline = Baseline {
        label: row.label.clone(),
        time: row.time,
        source_index: index,
        explicit,
    };
    let notice = (!explicit).then(|| BaselineNotice {
        label: baseline.label.clone(),
        time: baseline.time,
    });

    set.move_to_front(index);
    Ok(Resolution { baseline, notice })
}
