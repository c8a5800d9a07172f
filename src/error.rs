use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("line {line}: column '{column}' is not a number: '{value}'")]
    InvalidNumber {
        line: u64,
        column: &'static str,
        value: String,
    },
    #[error("line {line}: column '{column}' must be finite")]
    NonFinite { line: u64, column: &'static str },
    #[error("line {line}: side must be one of top, right, bottom, left (got '{value}')")]
    InvalidSide { line: u64, value: String },
    #[error("input contains no data rows")]
    Empty,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
