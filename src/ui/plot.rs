use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Plot, PlotPoint, PlotPoints, Points,
    Polygon, Text,
};

use crate::chart::{
    BoxplotChart, ChartRenderer, HeatmapChart, HistogramChart, ScatterChart, SwarmChart,
};
use crate::color::{diverging, generate_palette, text_color_on, ColorMap};
use crate::state::Session;
use crate::stats::correlation::CorrelationMatrix;

const PLOT_HEIGHT: f32 = 380.0;

// ---------------------------------------------------------------------------
// Visualisation section (central panel)
// ---------------------------------------------------------------------------

/// Render the chart for the current plot selection.
pub fn chart_section(ui: &mut Ui, session: &mut Session) {
    match session.chart() {
        Some(chart) => {
            ui.label(RichText::new(chart.title()).strong());
            chart.render_with(&mut EguiChartRenderer { ui });
        }
        None => {
            ui.label("No plot available: the table has no numeric columns.");
        }
    }
}

/// [`ChartRenderer`] drawing into an egui `Ui` with `egui_plot`.
pub struct EguiChartRenderer<'a> {
    pub ui: &'a mut Ui,
}

impl ChartRenderer for EguiChartRenderer<'_> {
    fn histogram(&mut self, chart: &HistogramChart) {
        let Some(hist) = &chart.histogram else {
            self.ui.label(format!("{} has no values to plot.", chart.column));
            return;
        };
        let bars: Vec<Bar> = hist
            .counts
            .iter()
            .enumerate()
            .map(|(i, &n)| Bar::new(hist.bin_center(i), n as f64).width(hist.width))
            .collect();

        Plot::new("histogram_plot")
            .height(PLOT_HEIGHT)
            .x_axis_label(chart.column.clone())
            .y_axis_label("count")
            .show(self.ui, |plot_ui| {
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .color(Color32::LIGHT_BLUE)
                        .name(&chart.column),
                );
            });
    }

    fn boxplot(&mut self, chart: &BoxplotChart) {
        let palette = generate_palette(chart.groups.len());
        let categories: Vec<String> = chart.groups.iter().map(|g| g.category.clone()).collect();

        Plot::new("box_plot")
            .height(PLOT_HEIGHT)
            .legend(Legend::default())
            .x_axis_label(chart.x_label.clone())
            .y_axis_label(chart.y_label.clone())
            .x_axis_formatter(category_formatter(categories))
            .show(self.ui, |plot_ui| {
                for (idx, (group, color)) in chart.groups.iter().zip(&palette).enumerate() {
                    let x = idx as f64;
                    let elem = BoxElem::new(
                        x,
                        BoxSpread::new(
                            group.lower_whisker,
                            group.q1,
                            group.median,
                            group.q3,
                            group.upper_whisker,
                        ),
                    )
                    .name(&group.category)
                    .box_width(0.5)
                    .whisker_width(0.3)
                    .fill(color.gamma_multiply(0.4))
                    .stroke(Stroke::new(1.5, *color));
                    plot_ui.box_plot(BoxPlot::new(vec![elem]).name(&group.category));

                    if !group.outliers.is_empty() {
                        let points: Vec<[f64; 2]> =
                            group.outliers.iter().map(|&y| [x, y]).collect();
                        plot_ui.points(
                            Points::new(PlotPoints::new(points))
                                .radius(2.5)
                                .color(*color)
                                .name(&group.category),
                        );
                    }
                }
            });
    }

    fn swarmplot(&mut self, chart: &SwarmChart) {
        let colors = ColorMap::new(chart.categories.iter().map(String::as_str));
        let categories = chart.categories.clone();

        Plot::new("swarm_plot")
            .height(PLOT_HEIGHT)
            .x_axis_label(chart.x_label.clone())
            .y_axis_label(chart.y_label.clone())
            .x_axis_formatter(category_formatter(categories))
            .show(self.ui, |plot_ui| {
                for (idx, category) in chart.categories.iter().enumerate() {
                    let points: Vec<[f64; 2]> = chart
                        .points
                        .iter()
                        .filter(|p| p.category == idx)
                        .map(|p| [p.x, p.y])
                        .collect();
                    plot_ui.points(
                        Points::new(PlotPoints::new(points))
                            .radius(3.0)
                            .color(colors.color_for(category))
                            .name(category),
                    );
                }
            });
    }

    fn scatterplot(&mut self, chart: &ScatterChart) {
        let colors = ColorMap::new(chart.series.iter().filter_map(|s| s.name.as_deref()));
        let mut plot = Plot::new("scatter_plot")
            .height(PLOT_HEIGHT)
            .x_axis_label(chart.x_label.clone())
            .y_axis_label(chart.y_label.clone());
        if chart.color_label.is_some() {
            plot = plot.legend(Legend::default());
        }

        plot.show(self.ui, |plot_ui| {
            for series in &chart.series {
                let mut points = Points::new(PlotPoints::new(series.points.clone())).radius(3.0);
                points = match &series.name {
                    Some(name) => points.color(colors.color_for(name)).name(name),
                    None => points.color(Color32::LIGHT_BLUE),
                };
                plot_ui.points(points);
            }
        });
    }

    fn heatmap(&mut self, chart: &HeatmapChart) {
        if chart.matrix.is_empty() {
            self.ui.label("No numeric columns to correlate.");
            return;
        }
        correlation_heatmap(self.ui, "heatmap_plot", &chart.matrix);
    }
}

/// Annotated correlation matrix: row 0 at the top, one unit square per cell.
pub fn correlation_heatmap(ui: &mut Ui, id: &str, matrix: &CorrelationMatrix) {
    let n = matrix.len();
    let x_names = matrix.columns.clone();
    let y_names: Vec<String> = matrix.columns.iter().rev().cloned().collect();

    Plot::new(id)
        .height(PLOT_HEIGHT.max(40.0 * n as f32))
        .data_aspect(1.0)
        .show_grid(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .x_axis_formatter(category_formatter(x_names))
        .y_axis_formatter(category_formatter(y_names))
        .show(ui, |plot_ui| {
            for row in 0..n {
                for col in 0..n {
                    let value = matrix.get(row, col);
                    let fill = diverging(value);
                    let x = col as f64;
                    let y = (n - 1 - row) as f64;
                    let square = PlotPoints::new(vec![
                        [x - 0.5, y - 0.5],
                        [x + 0.5, y - 0.5],
                        [x + 0.5, y + 0.5],
                        [x - 0.5, y + 0.5],
                    ]);
                    plot_ui.polygon(
                        Polygon::new(square)
                            .fill_color(fill)
                            .stroke(Stroke::new(0.5, Color32::DARK_GRAY)),
                    );
                    let label = if value.is_nan() {
                        "NaN".to_string()
                    } else {
                        format!("{value:.2}")
                    };
                    plot_ui.text(
                        Text::new(PlotPoint::new(x, y), RichText::new(label).strong())
                            .color(text_color_on(fill)),
                    );
                }
            }
        });
}

/// Axis labels for integer category positions; blank elsewhere.
fn category_formatter(
    names: Vec<String>,
) -> impl Fn(egui_plot::GridMark, &std::ops::RangeInclusive<f64>) -> String + 'static {
    move |mark, _range| {
        let rounded = mark.value.round();
        if (mark.value - rounded).abs() > 1e-6 || rounded < 0.0 {
            return String::new();
        }
        names.get(rounded as usize).cloned().unwrap_or_default()
    }
}
