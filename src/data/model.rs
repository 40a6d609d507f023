use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common dataframe dtypes.
/// Used as a key in `BTreeMap`s for distinct/frequency counts, so it must be `Ord`.
#[derive(Debug, Clone)]
pub enum CellValue {
    Null,
    Integer(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

// -- Manual Eq/Ord/Hash so we can count CellValue in BTreeMap --
// Equality, ordering and hashing all treat `-0.0` and `0.0` as the same value.

/// `-0.0` folded into `0.0`.
fn float_key(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else {
        v
    }
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => float_key(*a).total_cmp(&float_key(*b)),
            (Text(a), Text(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => float_key(*f).to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{}", format_float(*v)),
            CellValue::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            CellValue::Null => write!(f, "NaN"),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64` (numeric cells only).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

/// Render a float the way a dataframe preview does: up to six decimals,
/// trailing zeros trimmed, `NaN` for undefined.
pub fn format_float(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf".into() } else { "-inf".into() };
    }
    let s = format!("{v:.6}");
    let s = s.trim_end_matches('0');
    if s.ends_with('.') {
        format!("{s}0")
    } else {
        s.to_string()
    }
}

// ---------------------------------------------------------------------------
// ColumnType – the inferred primitive type of a column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    Integer,
    Float,
    Bool,
    Text,
}

impl ColumnType {
    /// Integer and float columns are numeric; everything else is categorical.
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Integer => "int64",
            ColumnType::Float => "float64",
            ColumnType::Bool => "bool",
            ColumnType::Text => "object",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Column / DataTable
// ---------------------------------------------------------------------------

/// One named, typed column. `cells.len()` equals the owning table's row count.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub dtype: ColumnType,
    pub cells: Vec<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, dtype: ColumnType, cells: Vec<CellValue>) -> Self {
        Column {
            name: name.into(),
            dtype,
            cells,
        }
    }

    /// Number of missing cells.
    pub fn null_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_null()).count()
    }

    /// Non-missing values as `f64`, in row order. Empty for non-numeric columns.
    pub fn numeric_values(&self) -> Vec<f64> {
        self.cells.iter().filter_map(CellValue::as_f64).collect()
    }
}

/// An in-memory table: rows × typed columns, stored column-major.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataTable {
    columns: Vec<Column>,
    n_rows: usize,
}

impl DataTable {
    /// Build a table from columns of equal length.
    pub fn new(columns: Vec<Column>) -> Self {
        let n_rows = columns.first().map(|c| c.cells.len()).unwrap_or(0);
        debug_assert!(columns.iter().all(|c| c.cells.len() == n_rows));
        DataTable { columns, n_rows }
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Cells of row `idx`, in column order.
    pub fn row(&self, idx: usize) -> Vec<&CellValue> {
        self.columns.iter().map(|c| &c.cells[idx]).collect()
    }

    /// Whether row `idx` has a missing cell in any column.
    pub fn row_has_null(&self, idx: usize) -> bool {
        self.columns.iter().any(|c| c.cells[idx].is_null())
    }

    /// A new table holding only the given rows (in the given order).
    pub fn take_rows(&self, indices: &[usize]) -> DataTable {
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                dtype: c.dtype,
                cells: indices.iter().map(|&i| c.cells[i].clone()).collect(),
            })
            .collect();
        DataTable {
            columns,
            n_rows: indices.len(),
        }
    }

    /// Total number of missing cells across all columns.
    pub fn null_count(&self) -> usize {
        self.columns.iter().map(Column::null_count).sum()
    }
}

// ---------------------------------------------------------------------------
// ColumnClassification – numeric vs categorical partition
// ---------------------------------------------------------------------------

/// Handle to a column known to be numeric. Only obtainable from a
/// [`ColumnClassification`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NumericColumn(String);

/// Handle to a column known to be categorical. Only obtainable from a
/// [`ColumnClassification`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CategoricalColumn(String);

impl NumericColumn {
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl CategoricalColumn {
    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Partition of a table's columns into numeric and categorical sets.
/// Every column lands in exactly one set, in table order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnClassification {
    numeric: Vec<NumericColumn>,
    categorical: Vec<CategoricalColumn>,
}

impl ColumnClassification {
    pub fn from_table(table: &DataTable) -> Self {
        let mut numeric = Vec::new();
        let mut categorical = Vec::new();
        for col in table.columns() {
            if col.dtype.is_numeric() {
                numeric.push(NumericColumn(col.name.clone()));
            } else {
                categorical.push(CategoricalColumn(col.name.clone()));
            }
        }
        ColumnClassification {
            numeric,
            categorical,
        }
    }

    pub fn numeric(&self) -> &[NumericColumn] {
        &self.numeric
    }

    pub fn categorical(&self) -> &[CategoricalColumn] {
        &self.categorical
    }

    pub fn numeric_column(&self, name: &str) -> Option<NumericColumn> {
        self.numeric.iter().find(|c| c.0 == name).cloned()
    }

    pub fn categorical_column(&self, name: &str) -> Option<CategoricalColumn> {
        self.categorical.iter().find(|c| c.0 == name).cloned()
    }
}

/// Frequency of each distinct value in a column, `Null` included.
pub fn value_counts(column: &Column) -> BTreeMap<&CellValue, usize> {
    let mut counts = BTreeMap::new();
    for cell in &column.cells {
        *counts.entry(cell).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixed_table() -> DataTable {
        DataTable::new(vec![
            Column::new(
                "a",
                ColumnType::Integer,
                vec![CellValue::Integer(1), CellValue::Integer(2)],
            ),
            Column::new(
                "b",
                ColumnType::Text,
                vec![CellValue::Text("x".into()), CellValue::Null],
            ),
            Column::new(
                "c",
                ColumnType::Float,
                vec![CellValue::Float(0.5), CellValue::Null],
            ),
            Column::new(
                "d",
                ColumnType::Bool,
                vec![CellValue::Bool(true), CellValue::Bool(false)],
            ),
        ])
    }

    #[test]
    fn test_classification_is_total_and_disjoint() {
        let table = mixed_table();
        let classes = ColumnClassification::from_table(&table);

        let numeric: Vec<&str> = classes.numeric().iter().map(|c| c.name()).collect();
        let categorical: Vec<&str> = classes.categorical().iter().map(|c| c.name()).collect();
        assert_eq!(numeric, vec!["a", "c"]);
        assert_eq!(categorical, vec!["b", "d"]);

        for name in table.column_names() {
            let in_numeric = classes.numeric_column(&name).is_some();
            let in_categorical = classes.categorical_column(&name).is_some();
            assert!(in_numeric ^ in_categorical, "{name} must be in exactly one class");
        }
    }

    #[test]
    fn test_take_rows_keeps_schema() {
        let table = mixed_table();
        let taken = table.take_rows(&[1]);
        assert_eq!(taken.n_rows(), 1);
        assert_eq!(taken.n_cols(), 4);
        assert_eq!(taken.column("b").map(|c| c.dtype), Some(ColumnType::Text));
        assert!(taken.row_has_null(0));
        assert!(!table.row_has_null(0));
    }

    #[test]
    fn test_null_counts() {
        let table = mixed_table();
        assert_eq!(table.null_count(), 2);
        assert_eq!(table.column("c").map(Column::null_count), Some(1));
        assert_eq!(table.column("c").map(Column::numeric_values), Some(vec![0.5]));
    }

    #[test]
    fn test_signed_zero_is_one_value() {
        let zero = CellValue::Float(0.0);
        let neg = CellValue::Float(-0.0);
        assert_eq!(zero, neg);
        assert_eq!(zero.cmp(&neg), std::cmp::Ordering::Equal);

        let mut seen = std::collections::HashSet::new();
        seen.insert(zero);
        assert!(!seen.insert(neg));

        let col = Column::new(
            "z",
            ColumnType::Float,
            vec![CellValue::Float(0.0), CellValue::Float(-0.0), CellValue::Float(1.0)],
        );
        let counts = value_counts(&col);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts.get(&CellValue::Float(0.0)), Some(&2));
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(3.0), "3.0");
        assert_eq!(format_float(2.5), "2.5");
        assert_eq!(format_float(1.0 / 3.0), "0.333333");
        assert_eq!(format_float(f64::NAN), "NaN");
    }

    #[test]
    fn test_dtype_display() {
        assert_eq!(ColumnType::Integer.to_string(), "int64");
        assert_eq!(ColumnType::Float.to_string(), "float64");
        assert_eq!(ColumnType::Text.to_string(), "object");
        assert!(!ColumnType::Bool.is_numeric());
    }
}
