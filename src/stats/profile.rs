use std::collections::HashSet;
use std::fmt;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::ProfileSettings;
use crate::data::model::{
    value_counts, CellValue, Column, ColumnClassification, ColumnType, DataTable,
};

use super::correlation::{pearson, CorrelationMatrix};
use super::describe::ColumnSummary;
use super::histogram::Histogram;

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileReport {
    pub title: String,
    pub overview: Overview,
    pub variables: Vec<VariableProfile>,
    pub correlations: CorrelationMatrix,
    pub alerts: Vec<Alert>,
}

impl ProfileReport {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serializing profile report")
    }

    #[cfg(test)]
    pub fn variable(&self, name: &str) -> Option<&VariableProfile> {
        self.variables.iter().find(|v| v.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub n_variables: usize,
    pub n_observations: usize,
    pub missing_cells: usize,
    pub missing_cells_pct: f64,
    pub duplicate_rows: usize,
    pub duplicate_rows_pct: f64,
    pub n_numeric: usize,
    pub n_categorical: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableProfile {
    pub name: String,
    pub dtype: ColumnType,
    /// Distinct non-missing values.
    pub distinct: usize,
    pub distinct_pct: f64,
    pub missing: usize,
    pub missing_pct: f64,
    pub details: VariableDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum VariableDetails {
    Numeric(NumericDetails),
    Categorical(CategoricalDetails),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericDetails {
    pub summary: ColumnSummary,
    pub zeros: usize,
    pub negative: usize,
    /// Adjusted Fisher–Pearson skewness; `NaN` below three values.
    pub skewness: f64,
    pub histogram: Option<Histogram>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoricalDetails {
    /// Most frequent values, highest count first.
    pub top_values: Vec<(String, usize)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AlertKind {
    Constant,
    Unique,
    HighCardinality,
    Missing,
    Zeros,
    Skewed,
    HighCorrelation,
    Duplicates,
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AlertKind::Constant => "Constant",
            AlertKind::Unique => "Unique",
            AlertKind::HighCardinality => "High cardinality",
            AlertKind::Missing => "Missing",
            AlertKind::Zeros => "Zeros",
            AlertKind::Skewed => "Skewed",
            AlertKind::HighCorrelation => "High correlation",
            AlertKind::Duplicates => "Duplicates",
        };
        f.write_str(label)
    }
}

/// A data-quality warning about one or more columns (none for table-wide alerts).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub columns: Vec<String>,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Report generation
// ---------------------------------------------------------------------------

pub fn build_report(
    table: &DataTable,
    title: &str,
    settings: &ProfileSettings,
) -> Result<ProfileReport> {
    let classes = ColumnClassification::from_table(table);
    let n_rows = table.n_rows();

    let variables: Vec<VariableProfile> = table
        .columns()
        .iter()
        .map(|col| profile_variable(col, n_rows, settings))
        .collect();

    let missing_cells = table.null_count();
    let duplicate_rows = count_duplicate_rows(table);
    let overview = Overview {
        n_variables: table.n_cols(),
        n_observations: n_rows,
        missing_cells,
        missing_cells_pct: pct(missing_cells, n_rows * table.n_cols()),
        duplicate_rows,
        duplicate_rows_pct: pct(duplicate_rows, n_rows),
        n_numeric: classes.numeric().len(),
        n_categorical: classes.categorical().len(),
    };

    let correlations = pearson(table, classes.numeric());

    let mut alerts = Vec::new();
    for var in &variables {
        variable_alerts(var, n_rows, settings, &mut alerts);
    }
    for (a, b, r) in correlations.pairs() {
        if r.abs() > settings.high_correlation_threshold {
            alerts.push(Alert {
                kind: AlertKind::HighCorrelation,
                columns: vec![a.to_string(), b.to_string()],
                message: format!("{a} is highly correlated with {b} (r = {r:.2})"),
            });
        }
    }
    if duplicate_rows > 0 {
        alerts.push(Alert {
            kind: AlertKind::Duplicates,
            columns: Vec::new(),
            message: format!(
                "Dataset has {duplicate_rows} ({:.1}%) duplicate rows",
                overview.duplicate_rows_pct
            ),
        });
    }

    log::debug!(
        "Profiled {} variables, {} observations, {} alerts",
        overview.n_variables,
        overview.n_observations,
        alerts.len()
    );

    Ok(ProfileReport {
        title: title.to_string(),
        overview,
        variables,
        correlations,
        alerts,
    })
}

fn profile_variable(col: &Column, n_rows: usize, settings: &ProfileSettings) -> VariableProfile {
    let missing = col.null_count();
    let present = n_rows - missing;
    let counts = value_counts(col);
    let distinct = counts.keys().filter(|v| !v.is_null()).count();

    let details = if col.dtype.is_numeric() {
        let values = col.numeric_values();
        VariableDetails::Numeric(NumericDetails {
            summary: ColumnSummary::from_values(&col.name, &values),
            zeros: values.iter().filter(|&&v| v == 0.0).count(),
            negative: values.iter().filter(|&&v| v < 0.0).count(),
            skewness: skewness(&values),
            histogram: Histogram::compute(&values, settings.histogram_bins),
        })
    } else {
        let mut top: Vec<(&CellValue, usize)> = counts
            .into_iter()
            .filter(|(v, _)| !v.is_null())
            .collect();
        // stable sort keeps value order among ties
        top.sort_by(|a, b| b.1.cmp(&a.1));
        VariableDetails::Categorical(CategoricalDetails {
            top_values: top
                .into_iter()
                .take(settings.top_values)
                .map(|(v, n)| (v.to_string(), n))
                .collect(),
        })
    };

    VariableProfile {
        name: col.name.clone(),
        dtype: col.dtype,
        distinct,
        distinct_pct: pct(distinct, present),
        missing,
        missing_pct: pct(missing, n_rows),
        details,
    }
}

fn variable_alerts(
    var: &VariableProfile,
    n_rows: usize,
    settings: &ProfileSettings,
    alerts: &mut Vec<Alert>,
) {
    let mut push = |kind: AlertKind, message: String| {
        alerts.push(Alert {
            kind,
            columns: vec![var.name.clone()],
            message,
        });
    };
    let name = &var.name;

    if var.distinct == 1 {
        push(AlertKind::Constant, format!("{name} has constant value"));
    } else if n_rows > 1 && var.distinct == n_rows {
        push(AlertKind::Unique, format!("{name} has unique values"));
    }
    if !var.dtype.is_numeric() && var.distinct > settings.high_cardinality_threshold {
        push(
            AlertKind::HighCardinality,
            format!("{name} has a high cardinality: {} distinct values", var.distinct),
        );
    }
    if var.missing > 0 {
        push(
            AlertKind::Missing,
            format!("{name} has {} ({:.1}%) missing values", var.missing, var.missing_pct),
        );
    }
    if let VariableDetails::Numeric(num) = &var.details {
        let zeros_fraction = if n_rows == 0 { 0.0 } else { num.zeros as f64 / n_rows as f64 };
        if zeros_fraction > settings.zeros_fraction_threshold {
            push(
                AlertKind::Zeros,
                format!("{name} has {} ({:.1}%) zeros", num.zeros, zeros_fraction * 100.0),
            );
        }
        if num.skewness.abs() > settings.skewness_threshold {
            push(
                AlertKind::Skewed,
                format!("{name} is highly skewed (\u{3b3}1 = {:.2})", num.skewness),
            );
        }
    }
}

/// Rows identical to an earlier row.
fn count_duplicate_rows(table: &DataTable) -> usize {
    let mut seen: HashSet<Vec<&CellValue>> = HashSet::with_capacity(table.n_rows());
    (0..table.n_rows())
        .filter(|&i| !seen.insert(table.row(i)))
        .count()
}

/// Adjusted Fisher–Pearson standardized moment coefficient.
fn skewness(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 3 {
        return f64::NAN;
    }
    let nf = n as f64;
    let mean = values.iter().sum::<f64>() / nf;
    let m2 = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / nf;
    let m3 = values.iter().map(|v| (v - mean).powi(3)).sum::<f64>() / nf;
    if m2 == 0.0 {
        return 0.0;
    }
    let g1 = m3 / m2.powf(1.5);
    g1 * (nf * (nf - 1.0)).sqrt() / (nf - 2.0)
}

fn pct(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}
