use std::fmt;

use crate::data::model::{CategoricalColumn, ColumnClassification, NumericColumn};

// ---------------------------------------------------------------------------
// Plot kinds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlotKind {
    Histogram,
    Boxplot,
    Swarmplot,
    Scatterplot,
    CorrelationHeatmap,
}

impl PlotKind {
    pub const ALL: [PlotKind; 5] = [
        PlotKind::Histogram,
        PlotKind::Boxplot,
        PlotKind::Swarmplot,
        PlotKind::Scatterplot,
        PlotKind::CorrelationHeatmap,
    ];

    /// Whether the table has the column classes this kind needs.
    pub fn is_available(self, classes: &ColumnClassification) -> bool {
        let has_numeric = !classes.numeric().is_empty();
        let has_categorical = !classes.categorical().is_empty();
        match self {
            PlotKind::Histogram | PlotKind::Scatterplot | PlotKind::CorrelationHeatmap => {
                has_numeric
            }
            PlotKind::Boxplot | PlotKind::Swarmplot => has_numeric && has_categorical,
        }
    }

    /// Kinds that can be offered for this classification, in menu order.
    pub fn available(classes: &ColumnClassification) -> Vec<PlotKind> {
        PlotKind::ALL
            .into_iter()
            .filter(|k| k.is_available(classes))
            .collect()
    }
}

impl fmt::Display for PlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PlotKind::Histogram => "Histogram",
            PlotKind::Boxplot => "Boxplot",
            PlotKind::Swarmplot => "Swarmplot",
            PlotKind::Scatterplot => "Scatterplot",
            PlotKind::CorrelationHeatmap => "Correlation Heatmap",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// Plot requests
// ---------------------------------------------------------------------------

/// A fully specified chart. Column handles come from a
/// [`ColumnClassification`], so every column has the class its role needs.
#[derive(Debug, Clone, PartialEq)]
pub enum PlotRequest {
    Histogram {
        column: NumericColumn,
    },
    Boxplot {
        y: NumericColumn,
        x: CategoricalColumn,
    },
    Swarmplot {
        y: NumericColumn,
        x: CategoricalColumn,
    },
    Scatterplot {
        x: NumericColumn,
        y: NumericColumn,
        color: Option<CategoricalColumn>,
    },
    CorrelationHeatmap,
}

impl PlotRequest {
    pub fn kind(&self) -> PlotKind {
        match self {
            PlotRequest::Histogram { .. } => PlotKind::Histogram,
            PlotRequest::Boxplot { .. } => PlotKind::Boxplot,
            PlotRequest::Swarmplot { .. } => PlotKind::Swarmplot,
            PlotRequest::Scatterplot { .. } => PlotKind::Scatterplot,
            PlotRequest::CorrelationHeatmap => PlotKind::CorrelationHeatmap,
        }
    }
}

// ---------------------------------------------------------------------------
// Selection state behind the plot controls
// ---------------------------------------------------------------------------

/// What the user has picked in the visualisation controls.
///
/// Column roles:
/// * `numeric`        – histogram column, box/swarm y, scatter x
/// * `second_numeric` – scatter y
/// * `category`       – box/swarm x
/// * `color`          – scatter colour (optional)
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSelection {
    pub kind: Option<PlotKind>,
    pub numeric: Option<NumericColumn>,
    pub second_numeric: Option<NumericColumn>,
    pub category: Option<CategoricalColumn>,
    pub color: Option<CategoricalColumn>,
}

impl Default for PlotSelection {
    fn default() -> Self {
        Self {
            kind: Some(PlotKind::Histogram),
            numeric: None,
            second_numeric: None,
            category: None,
            color: None,
        }
    }
}

impl PlotSelection {
    /// Bring the selection in line with a (new) classification: an
    /// unavailable kind falls back to the first available one, and column
    /// picks that are no longer valid fall back to the first valid column.
    pub fn reconcile(&mut self, classes: &ColumnClassification) {
        let available = PlotKind::available(classes);
        if !self.kind.is_some_and(|k| available.contains(&k)) {
            self.kind = available.first().copied();
        }

        let numeric = classes.numeric();
        let categorical = classes.categorical();

        self.numeric = self
            .numeric
            .as_ref()
            .and_then(|c| classes.numeric_column(c.name()))
            .or_else(|| numeric.first().cloned());
        self.second_numeric = self
            .second_numeric
            .as_ref()
            .and_then(|c| classes.numeric_column(c.name()))
            .or_else(|| numeric.get(1).or(numeric.first()).cloned());
        self.category = self
            .category
            .as_ref()
            .and_then(|c| classes.categorical_column(c.name()))
            .or_else(|| categorical.first().cloned());
        self.color = self
            .color
            .as_ref()
            .and_then(|c| classes.categorical_column(c.name()));
    }

    /// The request for the current selection, if it is complete.
    pub fn request(&self) -> Option<PlotRequest> {
        let request = match self.kind? {
            PlotKind::Histogram => PlotRequest::Histogram {
                column: self.numeric.clone()?,
            },
            PlotKind::Boxplot => PlotRequest::Boxplot {
                y: self.numeric.clone()?,
                x: self.category.clone()?,
            },
            PlotKind::Swarmplot => PlotRequest::Swarmplot {
                y: self.numeric.clone()?,
                x: self.category.clone()?,
            },
            PlotKind::Scatterplot => PlotRequest::Scatterplot {
                x: self.numeric.clone()?,
                y: self.second_numeric.clone()?,
                color: self.color.clone(),
            },
            PlotKind::CorrelationHeatmap => PlotRequest::CorrelationHeatmap,
        };
        Some(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_csv;

    fn classes(text: &str) -> ColumnClassification {
        ColumnClassification::from_table(&read_csv(text.as_bytes()).unwrap())
    }

    #[test]
    fn test_histogram_unavailable_without_numeric_columns() {
        let c = classes("name,city\nann,oslo\n");
        assert!(!PlotKind::Histogram.is_available(&c));
        assert!(PlotKind::available(&c).is_empty());

        let mut selection = PlotSelection::default();
        selection.reconcile(&c);
        assert_eq!(selection.kind, None);
        assert_eq!(selection.numeric, None);
        assert_eq!(selection.request(), None);
    }

    #[test]
    fn test_grouped_kinds_need_categorical_columns() {
        let c = classes("a,b\n1,2\n");
        assert_eq!(
            PlotKind::available(&c),
            vec![
                PlotKind::Histogram,
                PlotKind::Scatterplot,
                PlotKind::CorrelationHeatmap
            ]
        );
    }

    #[test]
    fn test_reconcile_picks_defaults() {
        let c = classes("a,b,g\n1,2,x\n");
        let mut selection = PlotSelection {
            kind: Some(PlotKind::Scatterplot),
            ..Default::default()
        };
        selection.reconcile(&c);

        assert_eq!(selection.numeric.as_ref().map(|c| c.name()), Some("a"));
        assert_eq!(selection.second_numeric.as_ref().map(|c| c.name()), Some("b"));
        assert_eq!(selection.category.as_ref().map(|c| c.name()), Some("g"));
        assert_eq!(selection.color, None);
        assert_eq!(selection.request().map(|r| r.kind()), Some(PlotKind::Scatterplot));
    }

    #[test]
    fn test_reconcile_drops_stale_columns() {
        let with_group = classes("a,g\n1,x\n");
        let mut selection = PlotSelection {
            kind: Some(PlotKind::Boxplot),
            ..Default::default()
        };
        selection.reconcile(&with_group);
        selection.color = with_group.categorical_column("g");

        let numeric_only = classes("a,b\n1,2\n");
        selection.reconcile(&numeric_only);
        assert_eq!(selection.kind, Some(PlotKind::Histogram));
        assert_eq!(selection.category, None);
        assert_eq!(selection.color, None);
    }
}
