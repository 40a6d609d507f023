//! Visualisation: plot selection, chart construction and rendering.
//!
//! ```text
//!  PlotSelection ──request()──► PlotRequest ──build_chart()──► Chart ──► ChartRenderer
//! ```
//!
//! A [`Chart`] is plain data (bins, box spreads, point positions, matrix), so
//! everything up to drawing is testable without a UI.

pub mod build;
pub mod request;

use crate::stats::correlation::CorrelationMatrix;
use crate::stats::histogram::Histogram;

pub use build::build_chart;
pub use request::{PlotKind, PlotRequest, PlotSelection};

/// Draws charts. The egui implementation lives in `ui::plot`.
pub trait ChartRenderer {
    fn histogram(&mut self, chart: &HistogramChart);
    fn boxplot(&mut self, chart: &BoxplotChart);
    fn swarmplot(&mut self, chart: &SwarmChart);
    fn scatterplot(&mut self, chart: &ScatterChart);
    fn heatmap(&mut self, chart: &HeatmapChart);
}

#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    Histogram(HistogramChart),
    Boxplot(BoxplotChart),
    Swarmplot(SwarmChart),
    Scatterplot(ScatterChart),
    Heatmap(HeatmapChart),
}

impl Chart {
    pub fn title(&self) -> &str {
        match self {
            Chart::Histogram(c) => &c.title,
            Chart::Boxplot(c) => &c.title,
            Chart::Swarmplot(c) => &c.title,
            Chart::Scatterplot(c) => &c.title,
            Chart::Heatmap(c) => &c.title,
        }
    }

    pub fn render_with<R: ChartRenderer + ?Sized>(&self, renderer: &mut R) {
        match self {
            Chart::Histogram(c) => renderer.histogram(c),
            Chart::Boxplot(c) => renderer.boxplot(c),
            Chart::Swarmplot(c) => renderer.swarmplot(c),
            Chart::Scatterplot(c) => renderer.scatterplot(c),
            Chart::Heatmap(c) => renderer.heatmap(c),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramChart {
    pub title: String,
    pub column: String,
    /// `None` when the column has no values.
    pub histogram: Option<Histogram>,
}

/// Box statistics for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxGroup {
    pub category: String,
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxplotChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub groups: Vec<BoxGroup>,
}

/// One point of a swarm: `x` is the category index plus its lane offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwarmPoint {
    pub category: usize,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwarmChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub categories: Vec<String>,
    pub points: Vec<SwarmPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    /// Colour category, `None` when the chart is not coloured.
    pub name: Option<String>,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub color_label: Option<String>,
    pub series: Vec<ScatterSeries>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapChart {
    pub title: String,
    pub matrix: CorrelationMatrix,
}
