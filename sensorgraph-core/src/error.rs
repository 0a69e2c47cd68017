use thiserror::Error;

#[derive(Debug, Error)]
pub enum SensorgraphError {
    #[error("Cannot open database '{0}': {1}")]
    StoreUnavailable(String, #[source] rusqlite::Error),

    #[error("Query for sensor '{0}' failed: {1}")]
    Query(String, #[source] rusqlite::Error),

    #[error("Bin width must be between 1 and 604800 seconds, got {0}")]
    InvalidBinWidth(i64),

    #[error("Lookback window must be a positive number of hours within the calendar, got {0}")]
    InvalidLookback(i64),

    #[error("Failed to write CSV file '{0}': {1}")]
    CsvError(String, #[source] csv::Error),

    #[error("I/O error for file '{0}': {1}")]
    FileIO(String, #[source] std::io::Error),
}
