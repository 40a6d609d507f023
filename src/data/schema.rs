use super::model::{CellValue, ColumnType, DataTable};

// ---------------------------------------------------------------------------
// Schema summary – shape, dtypes and missing-value counts of a table
// ---------------------------------------------------------------------------

/// Derived, read-only description of a loaded table.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaSummary {
    /// (rows, columns)
    pub shape: (usize, usize),
    /// Column name → inferred type, in column order.
    pub dtypes: Vec<(String, ColumnType)>,
    /// Column name → missing-cell count, only for columns with at least one.
    pub missing_counts: Vec<(String, usize)>,
}

impl SchemaSummary {
    pub fn inspect(table: &DataTable) -> Self {
        let dtypes = table
            .columns()
            .iter()
            .map(|c| (c.name.clone(), c.dtype))
            .collect();
        let missing_counts = table
            .columns()
            .iter()
            .map(|c| (c.name.clone(), c.null_count()))
            .filter(|(_, n)| *n > 0)
            .collect();

        SchemaSummary {
            shape: (table.n_rows(), table.n_cols()),
            dtypes,
            missing_counts,
        }
    }

    pub fn missing_count(&self, column: &str) -> usize {
        self.missing_counts
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }
}

/// The first `n` rows of a table, as row-major cell references.
pub fn head(table: &DataTable, n: usize) -> Vec<Vec<&CellValue>> {
    (0..n.min(table.n_rows())).map(|i| table.row(i)).collect()
}
