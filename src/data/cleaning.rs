use std::fmt;

use statrs::statistics::Statistics;

use super::model::{CellValue, Column, DataTable};

// ---------------------------------------------------------------------------
// Missing-value remediation
// ---------------------------------------------------------------------------

/// How missing values are handled before the analysis views run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CleaningPolicy {
    /// Keep the data as-is.
    #[default]
    NoOp,
    /// Remove any row that contains a missing value.
    DropRows,
    /// Replace missing numeric values with the column mean.
    /// Missing values in categorical columns are left in place.
    FillMeanNumeric,
}

impl CleaningPolicy {
    pub const ALL: [CleaningPolicy; 3] = [
        CleaningPolicy::NoOp,
        CleaningPolicy::DropRows,
        CleaningPolicy::FillMeanNumeric,
    ];

    /// Short description for the policy selector.
    pub fn description(self) -> &'static str {
        match self {
            CleaningPolicy::NoOp => "Keep the data as-is.",
            CleaningPolicy::DropRows => "Remove any row that contains a missing value.",
            CleaningPolicy::FillMeanNumeric => {
                "Replace missing numeric values with the column mean. \
                 Missing values in non-numeric columns are kept."
            }
        }
    }

    /// Message confirming the policy was applied. `None` for `NoOp`.
    pub fn acknowledgment(self) -> Option<&'static str> {
        match self {
            CleaningPolicy::NoOp => None,
            CleaningPolicy::DropRows => Some("Dropped rows with missing values."),
            CleaningPolicy::FillMeanNumeric => Some("Filled missing numeric values with mean."),
        }
    }

    /// Produce a cleaned copy of `table`. The input is never modified and the
    /// output always has the same columns and column types.
    pub fn apply(self, table: &DataTable) -> CleaningOutcome {
        match self {
            CleaningPolicy::NoOp => CleaningOutcome {
                table: table.clone(),
                skipped_columns: Vec::new(),
            },
            CleaningPolicy::DropRows => CleaningOutcome {
                table: drop_rows_with_nulls(table),
                skipped_columns: Vec::new(),
            },
            CleaningPolicy::FillMeanNumeric => fill_mean_numeric(table),
        }
    }
}

impl fmt::Display for CleaningPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CleaningPolicy::NoOp => "Do nothing",
            CleaningPolicy::DropRows => "Drop rows with missing values",
            CleaningPolicy::FillMeanNumeric => "Fill with mean (numerics only)",
        };
        f.write_str(label)
    }
}

/// Result of applying a [`CleaningPolicy`].
#[derive(Debug, Clone, PartialEq)]
pub struct CleaningOutcome {
    pub table: DataTable,
    /// Numeric columns the mean fill could not touch because they had no
    /// values to average.
    pub skipped_columns: Vec<String>,
}

fn drop_rows_with_nulls(table: &DataTable) -> DataTable {
    let keep: Vec<usize> = (0..table.n_rows())
        .filter(|&i| !table.row_has_null(i))
        .collect();
    log::debug!(
        "Dropping {} of {} rows with missing values",
        table.n_rows() - keep.len(),
        table.n_rows()
    );
    table.take_rows(&keep)
}

fn fill_mean_numeric(table: &DataTable) -> CleaningOutcome {
    let mut skipped_columns = Vec::new();
    let mut columns = Vec::with_capacity(table.n_cols());

    for col in table.columns() {
        if !col.dtype.is_numeric() || col.null_count() == 0 {
            columns.push(col.clone());
            continue;
        }

        let mean = col.numeric_values().iter().mean();
        if mean.is_nan() {
            log::warn!("Column '{}' has no values to average; leaving it unfilled", col.name);
            skipped_columns.push(col.name.clone());
            columns.push(col.clone());
            continue;
        }

        let cells = col
            .cells
            .iter()
            .map(|cell| match cell {
                CellValue::Null => CellValue::Float(mean),
                other => other.clone(),
            })
            .collect();
        columns.push(Column::new(col.name.clone(), col.dtype, cells));
    }

    CleaningOutcome {
        table: DataTable::new(columns),
        skipped_columns,
    }
}
