use thiserror::Error;

/// Errors that can occur while loading data or running the dashboard.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Data error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Unknown analysis: '{0}'")]
    UnknownAnalysis(String),

    #[error("Unsupported file format: .{0}. Use .csv")]
    UnsupportedFormat(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),
}

impl From<toml::de::Error> for DashboardError {
    fn from(e: toml::de::Error) -> Self {
        DashboardError::Config(e.to_string())
    }
}
