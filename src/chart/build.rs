use crate::config::Settings;
use crate::data::model::{CellValue, ColumnClassification, DataTable};
use crate::stats::correlation::pearson;
use crate::stats::describe::quantile_sorted;
use crate::stats::histogram::Histogram;

use super::{
    BoxGroup, BoxplotChart, Chart, HeatmapChart, HistogramChart, PlotRequest, ScatterChart,
    ScatterSeries, SwarmChart, SwarmPoint,
};

/// Label used for a missing category.
const MISSING_CATEGORY: &str = "NaN";

/// Half-width of a category lane on the x axis.
const LANE_HALF_WIDTH: f64 = 0.45;

/// Horizontal step between neighbouring swarm points.
const SWARM_STEP: f64 = 0.03;

/// Vertical extent of one swarm marker, as a fraction of the y range.
const SWARM_MARKER_FRACTION: f64 = 1.0 / 60.0;

/// Turn a request into chart data. `None` if a requested column is not in
/// `table` (a request built against a different table).
pub fn build_chart(table: &DataTable, request: &PlotRequest, settings: &Settings) -> Option<Chart> {
    let chart = match request {
        PlotRequest::Histogram { column } => {
            let values = table.column(column.name())?.numeric_values();
            Chart::Histogram(HistogramChart {
                title: format!("Histogram of {}", column.name()),
                column: column.name().to_string(),
                histogram: Histogram::compute(&values, settings.histogram_bins),
            })
        }
        PlotRequest::Boxplot { y, x } => {
            let groups = grouped_values(table, x.name(), y.name())?;
            Chart::Boxplot(BoxplotChart {
                title: format!("Boxplot of {} by {}", y.name(), x.name()),
                x_label: x.name().to_string(),
                y_label: y.name().to_string(),
                groups: groups
                    .into_iter()
                    .filter(|(_, values)| !values.is_empty())
                    .map(|(category, values)| box_group(category, values))
                    .collect(),
            })
        }
        PlotRequest::Swarmplot { y, x } => {
            let groups = grouped_values(table, x.name(), y.name())?;
            Chart::Swarmplot(swarm_chart(x.name(), y.name(), groups))
        }
        PlotRequest::Scatterplot { x, y, color } => {
            let xs = table.column(x.name())?;
            let ys = table.column(y.name())?;
            let colors = match color {
                Some(c) => Some(table.column(c.name())?),
                None => None,
            };

            let mut series: Vec<ScatterSeries> = Vec::new();
            for row in 0..table.n_rows() {
                let (Some(px), Some(py)) = (xs.cells[row].as_f64(), ys.cells[row].as_f64()) else {
                    continue;
                };
                let name = colors.map(|c| category_label(&c.cells[row]));
                match series.iter_mut().find(|s| s.name == name) {
                    Some(s) => s.points.push([px, py]),
                    None => series.push(ScatterSeries {
                        name,
                        points: vec![[px, py]],
                    }),
                }
            }

            Chart::Scatterplot(ScatterChart {
                title: format!("Scatterplot of {} vs {}", y.name(), x.name()),
                x_label: x.name().to_string(),
                y_label: y.name().to_string(),
                color_label: color.as_ref().map(|c| c.name().to_string()),
                series,
            })
        }
        PlotRequest::CorrelationHeatmap => {
            let classes = ColumnClassification::from_table(table);
            Chart::Heatmap(HeatmapChart {
                title: "Correlation Heatmap".to_string(),
                matrix: pearson(table, classes.numeric()),
            })
        }
    };
    log::trace!("Built chart '{}'", chart.title());
    Some(chart)
}

fn category_label(cell: &CellValue) -> String {
    match cell {
        CellValue::Null => MISSING_CATEGORY.to_string(),
        other => other.to_string(),
    }
}

/// Non-missing `value_col` values grouped by `category_col`, categories in
/// order of first appearance.
fn grouped_values(
    table: &DataTable,
    category_col: &str,
    value_col: &str,
) -> Option<Vec<(String, Vec<f64>)>> {
    let categories = table.column(category_col)?;
    let values = table.column(value_col)?;

    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
    for (cat, value) in categories.cells.iter().zip(&values.cells) {
        let label = category_label(cat);
        let idx = match groups.iter().position(|(name, _)| *name == label) {
            Some(idx) => idx,
            None => {
                groups.push((label, Vec::new()));
                groups.len() - 1
            }
        };
        if let Some(v) = value.as_f64() {
            groups[idx].1.push(v);
        }
    }
    Some(groups)
}

/// Quartiles plus Tukey whiskers (furthest points within 1.5 × IQR).
fn box_group(category: String, mut values: Vec<f64>) -> BoxGroup {
    values.sort_by(f64::total_cmp);
    let q1 = quantile_sorted(&values, 0.25);
    let median = quantile_sorted(&values, 0.5);
    let q3 = quantile_sorted(&values, 0.75);
    let iqr = q3 - q1;
    let low_fence = q1 - 1.5 * iqr;
    let high_fence = q3 + 1.5 * iqr;

    let inside: Vec<f64> = values
        .iter()
        .copied()
        .filter(|v| (low_fence..=high_fence).contains(v))
        .collect();
    let outliers = values
        .iter()
        .copied()
        .filter(|v| !(low_fence..=high_fence).contains(v))
        .collect();

    BoxGroup {
        category,
        lower_whisker: inside.first().copied().unwrap_or(q1),
        q1,
        median,
        q3,
        upper_whisker: inside.last().copied().unwrap_or(q3),
        outliers,
    }
}

fn swarm_chart(x_label: &str, y_label: &str, groups: Vec<(String, Vec<f64>)>) -> SwarmChart {
    let all = groups.iter().flat_map(|(_, v)| v.iter().copied());
    let (min, max) = all.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    let range = if max > min { max - min } else { 1.0 };
    let marker = range * SWARM_MARKER_FRACTION;

    let mut categories = Vec::with_capacity(groups.len());
    let mut points = Vec::new();
    for (idx, (category, values)) in groups.into_iter().enumerate() {
        for (offset, y) in swarm_offsets(values, marker) {
            points.push(SwarmPoint {
                category: idx,
                x: idx as f64 + offset,
                y,
            });
        }
        categories.push(category);
    }

    SwarmChart {
        title: format!("Swarmplot of {y_label} by {x_label}"),
        x_label: x_label.to_string(),
        y_label: y_label.to_string(),
        categories,
        points,
    }
}

/// Place points of one category so that no two within `marker` of each other
/// vertically share a horizontal slot. Slots are tried centre-out; once a
/// band is wider than the lane, points go to the outermost slot.
fn swarm_offsets(mut values: Vec<f64>, marker: f64) -> Vec<(f64, f64)> {
    values.sort_by(f64::total_cmp);
    let max_slot = (LANE_HALF_WIDTH / SWARM_STEP).floor() as i64;
    let order: Vec<i64> = std::iter::once(0)
        .chain((1..=max_slot).flat_map(|k| [k, -k]))
        .collect();

    // Highest y placed in each slot so far. Values arrive sorted, so a slot
    // is free when its last point is at least `marker` below.
    let mut last_y: Vec<Option<f64>> = vec![None; order.len()];
    let index = |slot: i64| (slot + max_slot) as usize;

    let mut placed = Vec::with_capacity(values.len());
    for y in values {
        let slot = order
            .iter()
            .copied()
            .find(|&s| last_y[index(s)].map_or(true, |py| y - py >= marker))
            .unwrap_or(max_slot);
        last_y[index(slot)] = Some(y);
        placed.push((slot as f64 * SWARM_STEP, y));
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_csv;

    fn setup(text: &str) -> (DataTable, ColumnClassification) {
        let table = read_csv(text.as_bytes()).unwrap();
        let classes = ColumnClassification::from_table(&table);
        (table, classes)
    }

    #[test]
    fn test_histogram_uses_thirty_bins() {
        let (table, classes) = setup("v\n1\n2\n3\n4\n5\n6\n7\n8\n9\n10\n");
        let request = PlotRequest::Histogram {
            column: classes.numeric_column("v").unwrap(),
        };
        let chart = build_chart(&table, &request, &Settings::default()).unwrap();
        let Chart::Histogram(h) = chart else {
            panic!("expected histogram");
        };
        assert_eq!(h.title, "Histogram of v");
        let bins = h.histogram.unwrap();
        assert_eq!(bins.counts.len(), 30);
        assert_eq!(bins.total(), 10);
    }

    #[test]
    fn test_boxplot_groups_and_outliers() {
        let (table, classes) =
            setup("g,v\na,1\na,2\na,3\na,4\na,100\nb,5\nb,6\n");
        let request = PlotRequest::Boxplot {
            y: classes.numeric_column("v").unwrap(),
            x: classes.categorical_column("g").unwrap(),
        };
        let Some(Chart::Boxplot(chart)) = build_chart(&table, &request, &Settings::default()) else {
            panic!("expected boxplot");
        };
        assert_eq!(chart.title, "Boxplot of v by g");
        assert_eq!(chart.groups.len(), 2);

        let a = &chart.groups[0];
        assert_eq!(a.category, "a");
        assert!((a.median - 3.0).abs() < 1e-12);
        assert_eq!(a.outliers, vec![100.0]);
        assert!((a.upper_whisker - 4.0).abs() < 1e-12);
        assert!((a.lower_whisker - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_swarm_points_do_not_overlap() {
        let (table, classes) = setup("g,v\nx,1\nx,1\nx,1\ny,2\ny,5\n");
        let request = PlotRequest::Swarmplot {
            y: classes.numeric_column("v").unwrap(),
            x: classes.categorical_column("g").unwrap(),
        };
        let chart = build_chart(&table, &request, &Settings::default());
        let Some(Chart::Swarmplot(chart)) = chart else {
            panic!("expected swarm plot");
        };
        assert_eq!(chart.categories, vec!["x", "y"]);
        assert_eq!(chart.points.len(), 5);

        let mut xs: Vec<f64> = chart
            .points
            .iter()
            .filter(|p| p.category == 0)
            .map(|p| p.x)
            .collect();
        xs.sort_by(f64::total_cmp);
        xs.dedup();
        assert_eq!(xs.len(), 3, "identical values must be spread apart");
        assert!(chart.points.iter().all(|p| (p.x - p.category as f64).abs() <= LANE_HALF_WIDTH));
    }

    #[test]
    fn test_swarm_many_equal_values_stay_in_lane() {
        let values = vec![7.0; 20_000];
        let placed = swarm_offsets(values, 0.1);
        assert_eq!(placed.len(), 20_000);
        assert!(placed.iter().all(|(x, y)| x.abs() <= LANE_HALF_WIDTH && *y == 7.0));

        let max_slot = (LANE_HALF_WIDTH / SWARM_STEP).floor();
        let distinct_slots = placed
            .iter()
            .map(|(x, _)| (x / SWARM_STEP).round() as i64)
            .collect::<std::collections::BTreeSet<_>>();
        assert_eq!(distinct_slots.len() as f64, 2.0 * max_slot + 1.0);
        // the overflow goes to the outermost slot
        assert!(placed.iter().skip(100).all(|(x, _)| (x - max_slot * SWARM_STEP).abs() < 1e-9));
    }

    #[test]
    fn test_scatter_series_by_color() {
        let (table, classes) = setup("x,y,g\n1,2,a\n2,3,b\n3,NA,a\n4,5,\n");
        let request = PlotRequest::Scatterplot {
            x: classes.numeric_column("x").unwrap(),
            y: classes.numeric_column("y").unwrap(),
            color: classes.categorical_column("g"),
        };
        let chart = build_chart(&table, &request, &Settings::default());
        let Some(Chart::Scatterplot(chart)) = chart else {
            panic!("expected scatter plot");
        };
        assert_eq!(chart.title, "Scatterplot of y vs x");
        let names: Vec<Option<&str>> = chart.series.iter().map(|s| s.name.as_deref()).collect();
        assert_eq!(names, vec![Some("a"), Some("b"), Some("NaN")]);
        // the row with a missing y is left out
        assert_eq!(chart.series[0].points, vec![[1.0, 2.0]]);
    }

    #[test]
    fn test_scatter_without_color_is_one_series() {
        let (table, classes) = setup("x,y\n1,2\n2,3\n");
        let request = PlotRequest::Scatterplot {
            x: classes.numeric_column("x").unwrap(),
            y: classes.numeric_column("y").unwrap(),
            color: None,
        };
        let chart = build_chart(&table, &request, &Settings::default());
        let Some(Chart::Scatterplot(chart)) = chart else {
            panic!("expected scatter plot");
        };
        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].name, None);
        assert_eq!(chart.series[0].points.len(), 2);
    }

    #[test]
    fn test_heatmap_covers_numeric_columns() {
        let (table, _) = setup("a,b,g\n1,3,x\n2,1,y\n3,2,x\n");
        let Some(Chart::Heatmap(chart)) =
            build_chart(&table, &PlotRequest::CorrelationHeatmap, &Settings::default())
        else {
            panic!("expected heatmap");
        };
        assert_eq!(chart.matrix.columns, vec!["a", "b"]);
        assert!((chart.matrix.get(0, 0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_request_from_other_table_yields_nothing() {
        let (_, classes) = setup("v\n1\n");
        let (other, _) = setup("w\n1\n");
        let request = PlotRequest::Histogram {
            column: classes.numeric_column("v").unwrap(),
        };
        assert!(build_chart(&other, &request, &Settings::default()).is_none());
    }

    #[test]
    fn test_render_dispatch() {
        #[derive(Default)]
        struct Recorder(Vec<&'static str>);
        impl super::super::ChartRenderer for Recorder {
            fn histogram(&mut self, _: &HistogramChart) {
                self.0.push("histogram");
            }
            fn boxplot(&mut self, _: &BoxplotChart) {
                self.0.push("boxplot");
            }
            fn swarmplot(&mut self, _: &SwarmChart) {
                self.0.push("swarmplot");
            }
            fn scatterplot(&mut self, _: &ScatterChart) {
                self.0.push("scatterplot");
            }
            fn heatmap(&mut self, _: &HeatmapChart) {
                self.0.push("heatmap");
            }
        }

        let (table, _) = setup("a,b\n1,2\n2,1\n");
        let request = PlotRequest::CorrelationHeatmap;
        let chart = build_chart(&table, &request, &Settings::default()).unwrap();
        let mut recorder = Recorder::default();
        chart.render_with(&mut recorder);
        assert_eq!(recorder.0, vec!["heatmap"]);
    }
}
