pub mod analysis;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod io;
pub mod models;
pub mod visualization;

#[cfg(feature = "web")]
pub mod web;

pub use analysis::{AnalysisKind, Analyzer, Artifact, Chart, Section};
pub use config::{DashboardConfig, ServerConfig};
pub use dashboard::{Dashboard, LoadState, Page, PageBody};
pub use error::DashboardError;
pub use io::{load_table, TableCache, TableReader};
pub use models::{ColumnType, Table, Value};
