use thiserror::Error;

/// Reasons an uploaded file could not be turned into a table.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unsupported file type '.{0}', expected a .csv file")]
    UnsupportedExtension(String),

    #[error("could not read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("file is not valid UTF-8 text (line {line})")]
    Encoding { line: u64 },

    #[error("malformed CSV at line {line}: {message}")]
    Malformed { line: u64, message: String },

    #[error("no columns to parse from file")]
    Empty,
}

impl From<csv::Error> for ParseError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        match err.into_kind() {
            csv::ErrorKind::Io(e) => ParseError::Io(e),
            csv::ErrorKind::Utf8 { pos, .. } => ParseError::Encoding {
                line: pos.map(|p| p.line()).unwrap_or(line),
            },
            csv::ErrorKind::UnequalLengths {
                pos,
                expected_len,
                len,
            } => ParseError::Malformed {
                line: pos.map(|p| p.line()).unwrap_or(line),
                message: format!("expected {expected_len} fields, saw {len}"),
            },
            other => ParseError::Malformed {
                line,
                message: format!("{other:?}"),
            },
        }
    }
}
