use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use crate::error::ParseError;

use super::model::{CellValue, Column, ColumnType, DataTable};

/// Tokens read as a missing value (exact, case-sensitive match).
const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const TRUE_TOKENS: &[&str] = &["True", "TRUE", "true"];
const FALSE_TOKENS: &[&str] = &["False", "FALSE", "false"];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a table from a `.csv` file on disk.
pub fn load_file(path: &Path) -> Result<DataTable, ParseError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    if ext != "csv" {
        return Err(ParseError::UnsupportedExtension(ext));
    }

    let file = std::fs::File::open(path)?;
    let table = read_csv(std::io::BufReader::new(file))?;
    log::info!(
        "Loaded {} rows x {} columns from {}",
        table.n_rows(),
        table.n_cols(),
        path.display()
    );
    Ok(table)
}

/// Parse comma-separated text with a header row into a [`DataTable`].
///
/// Every record must have as many fields as the header. Column types are
/// inferred from the non-missing cells:
/// * all integers → `Integer` (or `Float` when the column has missing cells)
/// * all numbers  → `Float`
/// * all booleans → `Bool`
/// * anything else → `Text`
pub fn read_csv<R: Read>(reader: R) -> Result<DataTable, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(ParseError::Empty);
    }
    let names = dedupe_headers(headers.iter());

    let mut raw: Vec<Vec<Option<String>>> = vec![Vec::new(); names.len()];
    for result in reader.records() {
        let record = result?;
        for (col_idx, value) in record.iter().enumerate() {
            let cell = if NA_TOKENS.contains(&value) {
                None
            } else {
                Some(value.to_string())
            };
            raw[col_idx].push(cell);
        }
    }

    let columns = names
        .into_iter()
        .zip(raw)
        .map(|(name, cells)| infer_column(name, cells))
        .collect();

    Ok(DataTable::new(columns))
}

// ---------------------------------------------------------------------------
// Header handling
// ---------------------------------------------------------------------------

/// Blank names become `Unnamed: {i}`; repeated names get `.1`, `.2`, ...
fn dedupe_headers<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut names = Vec::new();
    for (i, header) in headers.enumerate() {
        let base = if header.trim().is_empty() {
            format!("Unnamed: {i}")
        } else {
            header.to_string()
        };
        let mut name = base.clone();
        let mut suffix = 1;
        while seen.contains(&name) {
            name = format!("{base}.{suffix}");
            suffix += 1;
        }
        seen.insert(name.clone());
        names.push(name);
    }
    names
}

// ---------------------------------------------------------------------------
// Type inference
// ---------------------------------------------------------------------------

fn infer_column(name: String, cells: Vec<Option<String>>) -> Column {
    let dtype = infer_type(&cells);
    let cells = cells
        .into_iter()
        .map(|cell| match cell {
            None => CellValue::Null,
            Some(s) => parse_cell(&s, dtype),
        })
        .collect();
    Column::new(name, dtype, cells)
}

fn infer_type(cells: &[Option<String>]) -> ColumnType {
    if cells.is_empty() {
        return ColumnType::Text;
    }
    let present: Vec<&str> = cells.iter().flatten().map(String::as_str).collect();
    if present.is_empty() {
        return ColumnType::Float;
    }
    let has_missing = present.len() < cells.len();

    if present.iter().all(|s| s.parse::<i64>().is_ok()) {
        return if has_missing {
            ColumnType::Float
        } else {
            ColumnType::Integer
        };
    }
    if present.iter().all(|s| s.parse::<f64>().is_ok()) {
        return ColumnType::Float;
    }
    if present.iter().all(|s| parse_bool(s).is_some()) {
        return ColumnType::Bool;
    }
    ColumnType::Text
}

fn parse_cell(s: &str, dtype: ColumnType) -> CellValue {
    let parsed = match dtype {
        ColumnType::Integer => s.parse::<i64>().ok().map(CellValue::Integer),
        // `f64` parsing accepts any casing of "nan"; treat those as missing
        ColumnType::Float => s.parse::<f64>().ok().map(|v| {
            if v.is_nan() {
                CellValue::Null
            } else {
                CellValue::Float(v)
            }
        }),
        ColumnType::Bool => parse_bool(s).map(CellValue::Bool),
        ColumnType::Text => None,
    };
    parsed.unwrap_or_else(|| CellValue::Text(s.to_string()))
}

fn parse_bool(s: &str) -> Option<bool> {
    if TRUE_TOKENS.contains(&s) {
        Some(true)
    } else if FALSE_TOKENS.contains(&s) {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(text: &str) -> DataTable {
        read_csv(text.as_bytes()).unwrap()
    }

    #[test]
    fn test_shape_matches_header_and_lines() {
        let table = load("a,b,c\n1,2,x\n,4,y\n5,,x\n");
        assert_eq!(table.n_cols(), 3);
        assert_eq!(table.n_rows(), 3);
        assert_eq!(table.column_names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_type_inference() {
        let table = load("i,f,t,b,gap\n1,1.5,x,true,3\n2,2,y,False,\n");
        let dtype = |n: &str| table.column(n).map(|c| c.dtype);
        assert_eq!(dtype("i"), Some(ColumnType::Integer));
        assert_eq!(dtype("f"), Some(ColumnType::Float));
        assert_eq!(dtype("t"), Some(ColumnType::Text));
        assert_eq!(dtype("b"), Some(ColumnType::Bool));
        // integers with a missing cell become floats
        assert_eq!(dtype("gap"), Some(ColumnType::Float));
        assert_eq!(
            table.column("gap").map(|c| c.cells.clone()),
            Some(vec![CellValue::Float(3.0), CellValue::Null])
        );
    }

    #[test]
    fn test_na_tokens_are_missing() {
        let table = load("a,b\nNA,x\nnull,N/A\n7,y\n");
        let a = table.column("a").unwrap();
        assert_eq!(a.null_count(), 2);
        assert_eq!(a.dtype, ColumnType::Float);
        assert_eq!(table.column("b").unwrap().null_count(), 1);
    }

    #[test]
    fn test_nan_spellings_are_missing() {
        let table = load("a\n1\nNAN\n+nan\nNan\n5\n");
        let a = table.column("a").unwrap();
        assert_eq!(a.dtype, ColumnType::Float);
        assert_eq!(a.null_count(), 3);
        assert_eq!(a.numeric_values(), vec![1.0, 5.0]);
    }

    #[test]
    fn test_mixed_numbers_and_text_stay_text() {
        let table = load("code\n1\nA2\n3\n");
        let code = table.column("code").unwrap();
        assert_eq!(code.dtype, ColumnType::Text);
        assert_eq!(code.cells[0], CellValue::Text("1".into()));
    }

    #[test]
    fn test_all_missing_column_is_float() {
        let table = load("a,b\n1,\n2,\n");
        assert_eq!(table.column("b").map(|c| c.dtype), Some(ColumnType::Float));
    }

    #[test]
    fn test_header_only_file() {
        let table = load("a,b\n");
        assert_eq!(table.n_rows(), 0);
        assert_eq!(table.n_cols(), 2);
        assert_eq!(table.column("a").map(|c| c.dtype), Some(ColumnType::Text));
    }

    #[test]
    fn test_duplicate_and_blank_headers() {
        let table = load("a,a,,a\n1,2,3,4\n");
        assert_eq!(table.column_names(), vec!["a", "a.1", "Unnamed: 2", "a.2"]);
    }

    #[test]
    fn test_inconsistent_field_count_is_error() {
        let err = read_csv("a,b\n1,2\n3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::Malformed { .. }), "{err:?}");
    }

    #[test]
    fn test_invalid_utf8_is_error() {
        let bytes: &[u8] = b"a,b\n1,\xff\xfe\n";
        let err = read_csv(bytes).unwrap_err();
        assert!(matches!(err, ParseError::Encoding { .. }), "{err:?}");
    }

    #[test]
    fn test_empty_input_is_error() {
        let err = read_csv("".as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::Empty));
    }

    #[test]
    fn test_rejects_non_csv_extension() {
        let err = load_file(Path::new("data.parquet")).unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedExtension(ext) if ext == "parquet"));
    }
}
