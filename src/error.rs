use thiserror::Error;

use crate::models::FIELD_NAMES;

#[derive(Error, Debug)]
pub enum CreditError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(
        "No valid data found: expected a header line followed by rows with {} columns ({})",
        FIELD_NAMES.len(),
        FIELD_NAMES.join(", ")
    )]
    EmptyDataset,

    #[error("No data to export: the current filters exclude every record")]
    EmptyExport,

    #[error("Invalid {dimension} filter value: {value}")]
    InvalidFilterValue { dimension: String, value: String },

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, CreditError>;
