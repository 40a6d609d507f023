use serde::Serialize;
use statrs::statistics::Statistics;

use crate::data::model::{ColumnClassification, DataTable};

/// Row labels of the statistics table, in display order.
pub const STAT_LABELS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Summary statistics for one numeric column. Undefined values are `NaN`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    /// Number of non-missing values.
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n − 1).
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
    pub max: f64,
}

impl ColumnSummary {
    pub fn from_values(column: &str, values: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let (min, max) = if sorted.is_empty() {
            (f64::NAN, f64::NAN)
        } else {
            (Statistics::min(sorted.iter()), Statistics::max(sorted.iter()))
        };

        ColumnSummary {
            column: column.to_string(),
            count: values.len(),
            mean: values.iter().mean(),
            std: values.iter().std_dev(),
            min,
            q25: quantile_sorted(&sorted, 0.25),
            q50: quantile_sorted(&sorted, 0.5),
            q75: quantile_sorted(&sorted, 0.75),
            max,
        }
    }

    /// Values in [`STAT_LABELS`] order.
    pub fn values(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.q25,
            self.q50,
            self.q75,
            self.max,
        ]
    }
}

/// Quantile of already-sorted data, linearly interpolating between the two
/// nearest order statistics. `NaN` for empty input.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// The statistics table: one [`ColumnSummary`] per numeric column.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DescribeTable {
    pub columns: Vec<ColumnSummary>,
}

impl DescribeTable {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, column: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.column == column)
    }
}

pub fn describe(table: &DataTable, classes: &ColumnClassification) -> DescribeTable {
    let columns = classes
        .numeric()
        .iter()
        .filter_map(|handle| table.column(handle.name()))
        .map(|col| ColumnSummary::from_values(&col.name, &col.numeric_values()))
        .collect();
    DescribeTable { columns }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_csv;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_summary_basic() {
        let values: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        let s = ColumnSummary::from_values("x", &values);

        assert_eq!(s.count, 10);
        assert!(close(s.mean, 5.5));
        assert!(close(s.std, 3.0276503540974917));
        assert!(close(s.min, 1.0));
        assert!(close(s.q25, 3.25));
        assert!(close(s.q50, 5.5));
        assert!(close(s.q75, 7.75));
        assert!(close(s.max, 10.0));
    }

    #[test]
    fn test_single_value_has_undefined_std() {
        let s = ColumnSummary::from_values("x", &[4.0]);
        assert_eq!(s.count, 1);
        assert!(close(s.mean, 4.0));
        assert!(s.std.is_nan());
        assert!(close(s.q75, 4.0));
    }

    #[test]
    fn test_empty_values_are_nan() {
        let s = ColumnSummary::from_values("x", &[]);
        assert_eq!(s.count, 0);
        assert!(s.mean.is_nan());
        assert!(s.min.is_nan());
        assert!(s.q50.is_nan());
    }

    #[test]
    fn test_describe_skips_categorical_columns() {
        let table = read_csv("a,b,c\n1,2,x\nNA,4,y\n5,NA,x\n".as_bytes()).unwrap();
        let classes = ColumnClassification::from_table(&table);
        let stats = describe(&table, &classes);

        let names: Vec<&str> = stats.columns.iter().map(|c| c.column.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        let a = stats.get("a").unwrap();
        assert_eq!(a.count, 2);
        assert!(close(a.mean, 3.0));
    }

    #[test]
    fn test_describe_without_numeric_columns_is_empty() {
        let table = read_csv("name,city\nann,oslo\nbo,rome\n".as_bytes()).unwrap();
        let classes = ColumnClassification::from_table(&table);
        assert!(describe(&table, &classes).is_empty());
    }
}
