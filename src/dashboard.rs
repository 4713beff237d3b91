use std::sync::Arc;

use serde::Serialize;

use crate::analysis::{AnalysisKind, Analyzer, Section, TableArtifact};
use crate::config::DashboardConfig;
use crate::error::DashboardError;
use crate::models::Table;

pub const TITLE: &str = "Logistics Data Analysis Dashboard";
pub const UPLOAD_PROMPT: &str = "Please upload a CSV file to begin analysis.";

/// Outcome of loading the current upload.
#[derive(Debug, Clone)]
pub enum LoadState {
    /// Nothing uploaded yet.
    Empty,
    /// The upload could not be parsed; holds the user-facing message.
    Failed(String),
    Loaded(Arc<Table>),
}

impl LoadState {
    /// Turn a load result into a state, logging failures.
    pub fn from_result(result: Result<Arc<Table>, DashboardError>) -> Self {
        match result {
            Ok(table) => LoadState::Loaded(table),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load upload");
                LoadState::Failed(format!("Error loading data: {e}"))
            }
        }
    }

    pub fn table(&self) -> Option<&Table> {
        match self {
            LoadState::Loaded(table) => Some(table.as_ref()),
            _ => None,
        }
    }
}

/// One entry of the analysis selection control.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisOption {
    pub name: &'static str,
    /// Whether every required column is present.
    pub available: bool,
    pub missing_columns: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PageBody {
    Prompt {
        message: String,
    },
    Loaded {
        name: String,
        total_records: usize,
        preview: TableArtifact,
        options: Vec<AnalysisOption>,
        sections: Vec<Section>,
    },
}

/// The whole rendered dashboard for one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub title: String,
    pub error: Option<String>,
    pub body: PageBody,
}

impl Page {
    pub fn sections(&self) -> &[Section] {
        match &self.body {
            PageBody::Loaded { sections, .. } => sections,
            PageBody::Prompt { .. } => &[],
        }
    }
}

/// Builds pages from a load state and a selection.
///
/// Each call starts from scratch; nothing carries over between renders.
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    config: DashboardConfig,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Render the page for `load`, running `selections` in order.
    pub fn render(&self, load: &LoadState, selections: &[AnalysisKind]) -> Page {
        let error = match load {
            LoadState::Failed(message) => Some(message.clone()),
            _ => None,
        };

        let body = match load.table() {
            Some(table) => self.loaded_body(table, selections),
            None => PageBody::Prompt {
                message: UPLOAD_PROMPT.to_string(),
            },
        };

        Page {
            title: TITLE.to_string(),
            error,
            body,
        }
    }

    fn loaded_body(&self, table: &Table, selections: &[AnalysisKind]) -> PageBody {
        let analyzer = Analyzer::with_config(table, &self.config);
        let options = AnalysisKind::ALL
            .iter()
            .map(|kind| {
                let missing = kind.missing_columns(table);
                AnalysisOption {
                    name: kind.name(),
                    available: missing.is_empty(),
                    missing_columns: missing,
                }
            })
            .collect();

        tracing::debug!(table = table.name(), selected = selections.len(), "rendering dashboard");

        PageBody::Loaded {
            name: table.name().to_string(),
            total_records: table.num_rows(),
            preview: analyzer.preview(),
            options,
            sections: analyzer.run_all(selections),
        }
    }
}
