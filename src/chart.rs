use crate::error::Result;
use crate::format;
use crate::metrics::DerivedRow;
use crate::style::{Color, StylePolicy};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::Color as _;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::{Path, PathBuf};

/// The default caption for the combined chart
const CAPTION: &str = "Parallel Sort Performance Comparison";

/// The default directory the charts are written to
const OUTPUT_DIR: &str = "charts";

const WIDTH: u32 = 1000;
const HEIGHT: u32 = 500;
const FONT: &str = "sans-serif";

/// Efficiency axis ceiling. Large enough that super-linear results stay visible.
const EFFICIENCY_CEILING: f64 = 250.0;

/// Headroom above the tallest bar
const HEADROOM: f64 = 1.15;

/// Lowest upper bound of the speedup axis, so a chart of slowdowns still shows the 1x line
const MIN_SPEEDUP_BOUND: f64 = 1.5;

/// Configuration structure for the charts, including caption, output directory, panel size and font
#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub caption: String,
    pub output_dir: PathBuf,
    /// Width of a single panel; the combined image is this times the panel count
    pub width: u32,
    pub height: u32,
    pub font: String,
    pub efficiency_ceiling: f64,
}

impl ChartConfig {
    /// Builder pattern for configuring the charts
    pub fn builder() -> ChartConfigBuilder {
        ChartConfigBuilder::default()
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig::builder().build()
    }
}

/// Builder pattern for `ChartConfig` struct to allow flexible configuration
#[derive(Default)]
pub struct ChartConfigBuilder {
    caption: Option<String>,
    output_dir: Option<PathBuf>,
    width: Option<u32>,
    height: Option<u32>,
    font: Option<String>,
    efficiency_ceiling: Option<f64>,
}

impl ChartConfigBuilder {
    /// Set the caption of the combined chart
    pub fn caption(mut self, caption: &str) -> Self {
        self.caption = Some(caption.to_string());
        self
    }

    /// Set the directory all artifacts are written to
    pub fn output_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.output_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Set the width of one panel
    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the height of the charts
    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    /// Set the font family used for captions, labels and annotations
    pub fn font(mut self, font: &str) -> Self {
        self.font = Some(font.to_string());
        self
    }

    /// Set the minimum upper bound of the efficiency axis, in percent
    pub fn efficiency_ceiling(mut self, ceiling: f64) -> Self {
        self.efficiency_ceiling = Some(ceiling);
        self
    }

    /// Build and return the final `ChartConfig`
    pub fn build(self) -> ChartConfig {
        ChartConfig {
            caption: self.caption.unwrap_or_else(|| CAPTION.to_string()),
            output_dir: self.output_dir.unwrap_or_else(|| PathBuf::from(OUTPUT_DIR)),
            width: self.width.unwrap_or(WIDTH),
            height: self.height.unwrap_or(HEIGHT),
            font: self.font.unwrap_or_else(|| FONT.to_string()),
            efficiency_ceiling: self.efficiency_ceiling.unwrap_or(EFFICIENCY_CEILING),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    ExecutionTime,
    Speedup,
    Efficiency,
}

impl ChartKind {
    pub fn title(self) -> &'static str {
        match self {
            ChartKind::ExecutionTime => "Comparative Execution Time",
            ChartKind::Speedup => "Comparative Speedup vs Serial",
            ChartKind::Efficiency => "Parallel Efficiency",
        }
    }

    pub fn y_desc(self) -> &'static str {
        match self {
            ChartKind::ExecutionTime => "Execution Time (seconds)",
            ChartKind::Speedup => "Speedup",
            ChartKind::Efficiency => "Efficiency (%)",
        }
    }

    /// Name used in progress output, e.g. "speedup chart"
    pub fn artifact_name(self) -> &'static str {
        match self {
            ChartKind::ExecutionTime => "execution time chart",
            ChartKind::Speedup => "speedup chart",
            ChartKind::Efficiency => "efficiency chart",
        }
    }

    /// File stem of the standalone image
    pub fn file_stem(self) -> &'static str {
        match self {
            ChartKind::ExecutionTime => "execution_time",
            ChartKind::Speedup => "speedup",
            ChartKind::Efficiency => "efficiency",
        }
    }
}

/// One category on the x axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    pub color: Color,
    pub annotation: String,
}

/// Everything needed to draw one panel, independent of any backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub bars: Vec<Bar>,
    pub y_max: f64,
    /// Horizontal dashed line, e.g. "no speedup" at 1.0
    pub reference_line: Option<f64>,
    /// Ideal linear speedup per category, when worker counts are known
    pub ideal: Option<Vec<f64>>,
}

impl ChartSpec {
    pub fn labels(&self) -> Vec<&str> {
        self.bars.iter().map(|b| b.label.as_str()).collect()
    }
}

/// Side-by-side panels sharing colors and category order.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedSpec {
    pub caption: String,
    pub panels: Vec<ChartSpec>,
}

/// All chart specifications of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Charts {
    pub execution_time: ChartSpec,
    pub speedup: ChartSpec,
    pub efficiency: Option<ChartSpec>,
    pub combined: CombinedSpec,
}

impl Charts {
    /// The standalone charts, in output order
    pub fn singles(&self) -> Vec<&ChartSpec> {
        let mut singles = vec![&self.execution_time, &self.speedup];
        singles.extend(self.efficiency.as_ref());
        singles
    }
}

fn max_finite<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
}

fn bars<F, A>(rows: &[DerivedRow], colors: &[Color], value: F, annotate: A) -> Vec<Bar>
where
    F: Fn(&DerivedRow) -> f64,
    A: Fn(f64) -> String,
{
    rows.iter()
        .zip(colors)
        .map(|(row, color)| {
            let v = value(row);
            Bar {
                label: row.label.clone(),
                value: v,
                color: *color,
                annotation: annotate(v),
            }
        })
        .collect()
}

pub fn execution_time_chart(rows: &[DerivedRow], colors: &[Color]) -> ChartSpec {
    let y_max = match max_finite(rows.iter().map(|r| r.time)) {
        Some(max) if max > 0.0 => max * HEADROOM,
        _ => 1.0,
    };
    ChartSpec {
        kind: ChartKind::ExecutionTime,
        bars: bars(rows, colors, |r| r.time, format::seconds),
        y_max,
        reference_line: None,
        ideal: None,
    }
}

/// Speedup bars with a dashed line at 1x. The axis tops out at
/// `max(1.5, 1.15 * tallest)`, where tallest also covers the ideal line.
pub fn speedup_chart(rows: &[DerivedRow], colors: &[Color]) -> ChartSpec {
    let ideal: Option<Vec<f64>> = if rows.iter().all(|r| r.workers.is_some()) {
        Some(
            rows.iter()
                .map(|r| r.workers.map_or(0.0, f64::from))
                .collect(),
        )
    } else {
        None
    };

    let tallest = max_finite(
        rows.iter()
            .map(|r| r.speedup)
            .chain(ideal.iter().flatten().copied()),
    )
    .unwrap_or(0.0);

    ChartSpec {
        kind: ChartKind::Speedup,
        bars: bars(rows, colors, |r| r.speedup, format::times),
        y_max: MIN_SPEEDUP_BOUND.max(tallest * HEADROOM),
        reference_line: Some(1.0),
        ideal,
    }
}

/// `None` unless at least one row has a worker count. Rows without one are
/// drawn as empty categories so the axis still lines up with the other charts.
pub fn efficiency_chart(
    rows: &[DerivedRow],
    colors: &[Color],
    config: &ChartConfig,
) -> Option<ChartSpec> {
    if !crate::metrics::has_efficiency(rows) {
        return None;
    }
    let tallest = max_finite(rows.iter().filter_map(|r| r.efficiency)).unwrap_or(0.0);
    Some(ChartSpec {
        kind: ChartKind::Efficiency,
        bars: rows
            .iter()
            .zip(colors)
            .map(|(row, color)| Bar {
                label: row.label.clone(),
                value: row.efficiency.unwrap_or(0.0),
                color: *color,
                annotation: row.efficiency.map(format::percent).unwrap_or_default(),
            })
            .collect(),
        y_max: config.efficiency_ceiling.max(tallest * HEADROOM),
        reference_line: Some(100.0),
        ideal: None,
    })
}

/// Compose every chart of a run. Colors are resolved once, so all panels agree.
pub fn compose(rows: &[DerivedRow], policy: &StylePolicy, config: &ChartConfig) -> Charts {
    let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
    let colors = policy.resolve_all(&labels);

    let execution_time = execution_time_chart(rows, &colors);
    let speedup = speedup_chart(rows, &colors);
    let efficiency = efficiency_chart(rows, &colors, config);

    let mut panels = vec![execution_time.clone(), speedup.clone()];
    panels.extend(efficiency.clone());

    Charts {
        execution_time,
        speedup,
        efficiency,
        combined: CombinedSpec {
            caption: config.caption.clone(),
            panels,
        },
    }
}

// ─── Rendering ────────────────────────────────────────────────────────────────

/// Render one chart to a PNG at `path`.
pub fn render_chart(spec: &ChartSpec, path: &Path, config: &ChartConfig) -> Result<()> {
    let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE)?;
    draw_panel(&root, spec, config, 24)?;
    root.present()?;
    Ok(())
}

/// Render the combined panels side by side to a PNG at `path`.
pub fn render_combined(spec: &CombinedSpec, path: &Path, config: &ChartConfig) -> Result<()> {
    let panels = spec.panels.len().max(1);
    let size = (config.width * panels as u32, config.height);
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let caption = (config.font.as_str(), 28).into_font().style(FontStyle::Bold);
    let root = root.titled(&spec.caption, caption)?;

    for (area, panel) in root.split_evenly((1, panels)).iter().zip(&spec.panels) {
        draw_panel(area, panel, config, 20)?;
    }
    root.present()?;
    Ok(())
}

fn category_label(labels: &[&str], x: f64) -> String {
    let idx = x.round();
    if idx < 0.0 || (x - idx).abs() > 0.3 {
        return String::new();
    }
    labels
        .get(idx as usize)
        .map(|l| l.to_string())
        .unwrap_or_default()
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    spec: &ChartSpec,
    config: &ChartConfig,
    title_size: u32,
) -> Result<()> {
    let font = config.font.as_str();
    let n = spec.bars.len();
    let labels = spec.labels();

    let mut chart = ChartBuilder::on(area)
        .caption(
            spec.kind.title(),
            (font, title_size).into_font().style(FontStyle::Bold),
        )
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5..(n as f64 - 0.5), 0.0..spec.y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n.max(1))
        .x_label_formatter(&|x: &f64| category_label(&labels, *x))
        .y_desc(spec.kind.y_desc())
        .label_style((font, 13))
        .axis_desc_style((font, 15))
        .light_line_style(RGBColor(0xe0, 0xe0, 0xe0))
        .draw()?;

    // Non-finite bars (zero time) run to the top of the axis.
    let height = |v: f64| if v.is_finite() { v.min(spec.y_max) } else { spec.y_max };

    chart.draw_series(spec.bars.iter().enumerate().map(|(i, bar)| {
        let x = i as f64;
        Rectangle::new(
            [(x - 0.35, 0.0), (x + 0.35, height(bar.value))],
            RGBColor::from(bar.color).filled(),
        )
    }))?;
    chart.draw_series(spec.bars.iter().enumerate().map(|(i, bar)| {
        let x = i as f64;
        Rectangle::new(
            [(x - 0.35, 0.0), (x + 0.35, height(bar.value))],
            BLACK.stroke_width(1),
        )
    }))?;

    if let Some(y) = spec.reference_line {
        let gray = RGBColor(0x66, 0x66, 0x66);
        chart
            .draw_series(DashedLineSeries::new(
                vec![(-0.5, y), (n as f64 - 0.5, y)],
                8,
                5,
                gray.stroke_width(1),
            ))?
            .label(match spec.kind {
                ChartKind::Speedup => "No speedup (1x)",
                _ => "Linear scaling (100%)",
            })
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], gray));
    }

    if let Some(ideal) = &spec.ideal {
        let orange = RGBColor(0xF1, 0x8F, 0x01);
        chart
            .draw_series(LineSeries::new(
                ideal
                    .iter()
                    .enumerate()
                    .map(|(i, v)| (i as f64, v.min(spec.y_max))),
                orange.stroke_width(2),
            ))?
            .label("Ideal linear")
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], orange.stroke_width(2))
            });
    }

    let text = TextStyle::from((font, 13).into_font().style(FontStyle::Bold))
        .pos(Pos::new(HPos::Center, VPos::Center));
    chart.draw_series(
        spec.bars
            .iter()
            .enumerate()
            .filter(|(_, bar)| !bar.annotation.is_empty())
            .map(|(i, bar)| {
                let half = (bar.annotation.chars().count() as i32 * 4) + 6;
                let tint = RGBColor::from(bar.color.lighten(0.6));
                EmptyElement::at((i as f64, height(bar.value)))
                    + Rectangle::new([(-half, -30), (half, -8)], tint.filled())
                    + Rectangle::new([(-half, -30), (half, -8)], BLACK.stroke_width(1))
                    + Text::new(bar.annotation.clone(), (0, -19), text.clone())
            }),
    )?;

    if spec.reference_line.is_some() || spec.ideal.is_some() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font((font, 12))
            .draw()?;
    }

    Ok(())
}
