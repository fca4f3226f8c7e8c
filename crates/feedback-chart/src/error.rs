use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ChartError {
    #[error("value for '{label}' must be a finite non-negative number, got {value}")]
    InvalidValue { label: String, value: f64 },

    #[error("extent must be a finite non-negative number, got {0}")]
    InvalidExtent(f64),

    #[error("series total overflows, got {0}")]
    InvalidTotal(f64),

    #[error("donut radius must be a finite positive number, got {0}")]
    InvalidRadius(f64),
}
