use serde::Serialize;
use statrs::statistics::Statistics;

use crate::data::model::{DataTable, NumericColumn};

/// Pairwise Pearson correlation between numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major, `columns.len()` × `columns.len()`. `NaN` where undefined.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row][col]
    }

    /// Off-diagonal pairs `(a, b, r)` with `a` before `b`, skipping undefined ones.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str, f64)> + '_ {
        let n = self.len();
        (0..n).flat_map(move |i| {
            ((i + 1)..n).filter_map(move |j| {
                let r = self.values[i][j];
                (!r.is_nan()).then(|| (self.columns[i].as_str(), self.columns[j].as_str(), r))
            })
        })
    }
}

/// Pearson correlation over the given numeric columns, using for each pair
/// only the rows where both values are present.
pub fn pearson(table: &DataTable, columns: &[NumericColumn]) -> CorrelationMatrix {
    let series: Vec<(String, Vec<Option<f64>>)> = columns
        .iter()
        .filter_map(|handle| table.column(handle.name()))
        .map(|col| (col.name.clone(), col.cells.iter().map(|c| c.as_f64()).collect()))
        .collect();

    let n = series.len();
    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        for j in i..n {
            let r = pair_correlation(&series[i].1, &series[j].1);
            let r = if i == j && !r.is_nan() { 1.0 } else { r };
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        columns: series.into_iter().map(|(name, _)| name).collect(),
        values,
    }
}

fn pair_correlation(a: &[Option<f64>], b: &[Option<f64>]) -> f64 {
    let (xs, ys): (Vec<f64>, Vec<f64>) = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .unzip();
    if xs.len() < 2 {
        return f64::NAN;
    }

    let sx = xs.iter().std_dev();
    let sy = ys.iter().std_dev();
    if sx == 0.0 || sy == 0.0 {
        return f64::NAN;
    }
    let cov = xs.iter().covariance(ys.iter());
    (cov / (sx * sy)).clamp(-1.0, 1.0)
}
