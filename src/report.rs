use crate::chart::{self, ChartConfig, ChartKind, Charts};
use crate::error::Result;
use crate::format;
use crate::measurement::{LABEL, THROUGHPUT, TIME, WORKERS};
use crate::metrics::{has_efficiency, has_throughput, DerivedRow};
use crate::{print_if, VERBOSE};
use prettytable::{Cell, Row, Table};
use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;

/// File name of the derived table
pub const TABLE_FILE: &str = "results_with_speedup.csv";

/// File name of the side-by-side chart
pub const COMBINED_FILE: &str = "combined.png";

/// Write the derived rows as CSV: the input columns present in the data,
/// then `speedup` and, when computed, `efficiency`.
pub fn write_table<W: io::Write>(rows: &[DerivedRow], writer: W) -> Result<()> {
    let workers = rows.iter().any(|r| r.workers.is_some());
    let throughput = has_throughput(rows);
    let efficiency = has_efficiency(rows);

    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec![LABEL, TIME];
    if workers {
        header.push(WORKERS);
    }
    if throughput {
        header.push(THROUGHPUT);
    }
    header.push("speedup");
    if efficiency {
        header.push("efficiency");
    }
    wtr.write_record(&header)?;

    for row in rows {
        let mut record = vec![row.label.clone(), format::raw(row.time)];
        if workers {
            record.push(row.workers.map(|w| w.to_string()).unwrap_or_default());
        }
        if throughput {
            record.push(row.throughput.map(format::raw).unwrap_or_default());
        }
        record.push(format::raw(row.speedup));
        if efficiency {
            record.push(row.efficiency.map(format::raw).unwrap_or_default());
        }
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Headline numbers of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub rows: Vec<DerivedRow>,
    /// Label and value of the highest speedup, first one on ties
    pub best_speedup: Option<(String, f64)>,
    pub best_efficiency: Option<(String, f64)>,
    pub peak_throughput: Option<f64>,
    /// `(first - last) / first * 100` over the final row order
    pub time_reduction: Option<f64>,
}

fn best_by<F>(rows: &[DerivedRow], value: F) -> Option<(String, f64)>
where
    F: Fn(&DerivedRow) -> Option<f64>,
{
    rows.iter()
        .filter_map(|r| value(r).filter(|v| !v.is_nan()).map(|v| (r, v)))
        .fold(None, |best: Option<(&DerivedRow, f64)>, (r, v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((r, v)),
        })
        .map(|(r, v)| (r.label.clone(), v))
}

impl Summary {
    pub fn new(rows: &[DerivedRow]) -> Self {
        let time_reduction = match (rows.first(), rows.last()) {
            (Some(first), Some(last)) if first.time != 0.0 => {
                Some((first.time - last.time) / first.time * 100.0)
            }
            _ => None,
        };

        Summary {
            rows: rows.to_vec(),
            best_speedup: best_by(rows, |r| Some(r.speedup)),
            best_efficiency: best_by(rows, |r| r.efficiency),
            peak_throughput: best_by(rows, |r| r.throughput).map(|(_, v)| v),
            time_reduction,
        }
    }

    /// Per-row table of the derived metrics
    pub fn table(&self) -> Table {
        let efficiency = has_efficiency(&self.rows);
        let throughput = has_throughput(&self.rows);

        let mut table = Table::new();
        let mut titles = vec!["Implementation", "Time (s)", "Speedup"];
        if efficiency {
            titles.push("Efficiency");
        }
        if throughput {
            titles.push("Throughput (M/s)");
        }
        table.set_titles(Row::new(titles.into_iter().map(Cell::new).collect()));

        for row in &self.rows {
            let mut cells = vec![
                Cell::new(&row.label),
                Cell::new(&format::fixed(row.time, format::TIME_PRECISION)),
                Cell::new(&format::times(row.speedup)),
            ];
            if efficiency {
                cells.push(Cell::new(
                    &row.efficiency.map(format::percent).unwrap_or_default(),
                ));
            }
            if throughput {
                cells.push(Cell::new(
                    &row.throughput
                        .map(|t| format::fixed(t, format::RATIO_PRECISION))
                        .unwrap_or_default(),
                ));
            }
            table.add_row(Row::new(cells));
        }
        table
    }

    pub fn print(&self) {
        println!("PERFORMANCE SUMMARY");
        self.table().printstd();
        print!("{}", self.headlines());
    }

    fn headlines(&self) -> String {
        let mut out = String::new();
        if let Some((label, v)) = &self.best_speedup {
            out.push_str(&format!("Best Speedup: {} with {label}\n", format::times(*v)));
        }
        if let Some((label, v)) = &self.best_efficiency {
            out.push_str(&format!(
                "Best Efficiency: {} with {label}\n",
                format::percent(*v)
            ));
        }
        if let Some(v) = self.peak_throughput {
            out.push_str(&format!(
                "Peak Throughput: {} million elements/second\n",
                format::fixed(v, format::RATIO_PRECISION)
            ));
        }
        match self.time_reduction {
            Some(v) => out.push_str(&format!("Time Reduction: {}\n", format::percent(v))),
            None => out.push_str("Time Reduction: n/a\n"),
        }
        out
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "PERFORMANCE SUMMARY")?;
        write!(f, "{}", self.table())?;
        write!(f, "{}", self.headlines())
    }
}

/// A fully written artifact waiting to be renamed into place.
struct Staged {
    file: NamedTempFile,
    target: PathBuf,
    what: &'static str,
}

fn stage(dir: &Path, name: &str, what: &'static str) -> Result<Staged> {
    let (stem, ext) = name.rsplit_once('.').unwrap_or((name, ""));
    let file = tempfile::Builder::new()
        .prefix(&format!(".{stem}-"))
        .suffix(&format!(".{ext}"))
        .tempfile_in(dir)?;
    Ok(Staged {
        file,
        target: dir.join(name),
        what,
    })
}

/// Write every artifact of a run into `config.output_dir`.
///
/// Artifacts are first written to temporary files in the output directory
/// and only renamed over their final names once all of them succeeded. On
/// error the temporaries are removed and previous outputs stay untouched.
/// An efficiency chart left over from an earlier run is removed when this
/// run has no worker counts, so the directory only holds one run's charts.
pub fn emit(charts: &Charts, rows: &[DerivedRow], config: &ChartConfig) -> Result<Vec<PathBuf>> {
    let dir = config.output_dir.as_path();
    fs::create_dir_all(dir)?;

    let mut staged = Vec::new();

    for spec in charts.singles() {
        let file = stage(dir, &format!("{}.png", spec.kind.file_stem()), spec.kind.artifact_name())?;
        chart::render_chart(spec, file.file.path(), config)?;
        staged.push(file);
    }

    let combined = stage(dir, COMBINED_FILE, "combined chart")?;
    chart::render_combined(&charts.combined, combined.file.path(), config)?;
    staged.push(combined);

    let mut table = stage(dir, TABLE_FILE, "results CSV")?;
    write_table(rows, table.file.as_file_mut())?;
    staged.push(table);

    let mut written = Vec::with_capacity(staged.len());
    for Staged { file, target, what } in staged {
        file.persist(&target)?;
        print_if!(VERBOSE, "Saved {what}: {}", target.display());
        written.push(target);
    }

    if charts.efficiency.is_none() {
        let stale = dir.join(format!("{}.png", ChartKind::Efficiency.file_stem()));
        match fs::remove_file(&stale) {
            Ok(()) => print_if!(VERBOSE, "Removed stale efficiency chart: {}", stale.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(written)
}
