use serde::Serialize;

use super::catalog::AnalysisKind;
use super::histogram::HistogramBin;
use crate::models::{Table, Value};

/// Tabular output, optionally introduced by a caption line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableArtifact {
    pub caption: Option<String>,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl TableArtifact {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            caption: None,
            columns,
            rows,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Copy every row of `table`.
    pub fn from_table(table: &Table) -> Self {
        let columns = table
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();
        let rows = (0..table.num_rows()).filter_map(|i| table.row(i)).collect();
        Self::new(columns, rows)
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Index of a column by header.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// A single headline number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: String,
    pub value: Option<f64>,
    pub display: String,
}

impl Metric {
    pub fn count(label: impl Into<String>, n: usize) -> Self {
        Self {
            label: label.into(),
            value: Some(n as f64),
            display: n.to_string(),
        }
    }

    /// A decimal metric shown with two decimals; `None` shows as `n/a`.
    pub fn decimal(label: impl Into<String>, value: Option<f64>) -> Self {
        let display = match value {
            Some(v) => format!("{v:.2}"),
            None => "n/a".to_string(),
        };
        Self {
            label: label.into(),
            value,
            display,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
}

/// Everything a renderer needs to draw a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Chart {
    Bar {
        title: String,
        x_label: String,
        y_label: String,
        categories: Vec<String>,
        values: Vec<f64>,
    },
    Pie {
        title: String,
        labels: Vec<String>,
        values: Vec<f64>,
    },
    Histogram {
        title: String,
        x_label: String,
        bins: Vec<HistogramBin>,
    },
    Scatter {
        title: String,
        x_label: String,
        y_label: String,
        points: Vec<ScatterPoint>,
    },
}

impl Chart {
    pub fn title(&self) -> &str {
        match self {
            Chart::Bar { title, .. }
            | Chart::Pie { title, .. }
            | Chart::Histogram { title, .. }
            | Chart::Scatter { title, .. } => title,
        }
    }
}

/// A recoverable problem reported in place of a section's output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Warning {
    pub message: String,
    pub missing_columns: Vec<String>,
}

impl Warning {
    pub fn missing(columns: &[&str]) -> Self {
        let message = match columns {
            [single] => format!("{single} column not found in the dataset"),
            many => format!("{} columns not found in the dataset", many.join(" and ")),
        };
        Self {
            message,
            missing_columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// An analysis that could not be computed over the loaded data.
    pub fn failed(reason: impl std::fmt::Display) -> Self {
        Self {
            message: format!("Analysis failed: {reason}"),
            missing_columns: Vec::new(),
        }
    }
}

/// One renderable unit produced by an analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Artifact {
    Table(TableArtifact),
    Metric(Metric),
    Chart(Chart),
    Warning(Warning),
}

/// The output of one selected analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub analysis: AnalysisKind,
    pub heading: String,
    pub artifacts: Vec<Artifact>,
}

impl Section {
    pub fn warning(&self) -> Option<&Warning> {
        self.artifacts.iter().find_map(|a| match a {
            Artifact::Warning(w) => Some(w),
            _ => None,
        })
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableArtifact> {
        self.artifacts.iter().filter_map(|a| match a {
            Artifact::Table(t) => Some(t),
            _ => None,
        })
    }

    pub fn charts(&self) -> impl Iterator<Item = &Chart> {
        self.artifacts.iter().filter_map(|a| match a {
            Artifact::Chart(c) => Some(c),
            _ => None,
        })
    }

    pub fn metrics(&self) -> impl Iterator<Item = &Metric> {
        self.artifacts.iter().filter_map(|a| match a {
            Artifact::Metric(m) => Some(m),
            _ => None,
        })
    }
}
