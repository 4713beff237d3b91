use polars::prelude::*;
use serde::Serialize;

use super::artifact::TableArtifact;
use super::frequency::value_counts;
use crate::error::DashboardError;
use crate::models::{Table, Value};

/// Summary statistics for one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (n - 1); needs at least two values.
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

impl NumericSummary {
    /// Aggregate one column in a single lazy pass. Quartiles interpolate
    /// linearly between closest ranks.
    pub fn compute(table: &Table, column: &str) -> Result<Self, DashboardError> {
        let x = || col(column).cast(DataType::Float64);
        let stats = table
            .frame()
            .clone()
            .lazy()
            .select([
                x().count().cast(DataType::Float64).alias("count"),
                x().mean().alias("mean"),
                x().std(1).alias("std"),
                x().min().alias("min"),
                x().quantile(lit(0.25), QuantileMethod::Linear).alias("q25"),
                x().median().alias("median"),
                x().quantile(lit(0.75), QuantileMethod::Linear).alias("q75"),
                x().max().alias("max"),
            ])
            .collect()?;

        let get = |name: &str| -> Result<Option<f64>, DashboardError> {
            Ok(stats
                .column(name)?
                .as_materialized_series()
                .f64()?
                .get(0)
                .filter(|v| !v.is_nan()))
        };

        let count = get("count")?.unwrap_or(0.0) as usize;
        Ok(Self {
            column: column.to_string(),
            count,
            mean: get("mean")?,
            std_dev: if count >= 2 { get("std")? } else { None },
            min: get("min")?,
            q25: get("q25")?,
            median: get("median")?,
            q75: get("q75")?,
            max: get("max")?,
        })
    }
}

/// Summary for a non-numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextSummary {
    pub column: String,
    pub count: usize,
    pub unique: usize,
    pub top: Option<String>,
    pub freq: usize,
}

impl TextSummary {
    pub fn compute(table: &Table, column: &str) -> Result<Self, DashboardError> {
        let cells = table.frame().column(column)?;
        let counts = value_counts(table, column)?;
        let top = counts.first();
        Ok(Self {
            column: column.to_string(),
            count: cells.len() - cells.null_count(),
            unique: counts.len(),
            top: top.map(|c| c.value.clone()),
            freq: top.map(|c| c.count).unwrap_or(0),
        })
    }
}

const NUMERIC_ROWS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];
const TEXT_ROWS: [&str; 4] = ["count", "unique", "top", "freq"];

/// Describe a table: one column per numeric column, one row per statistic.
///
/// A table without numeric columns is summarised by count, unique, top and freq
/// over all of its columns instead.
pub fn describe(table: &Table) -> Result<TableArtifact, DashboardError> {
    let numeric = table
        .numeric_columns()
        .map(|name| NumericSummary::compute(table, name))
        .collect::<Result<Vec<_>, _>>()?;

    if numeric.is_empty() {
        let text = table
            .column_names()
            .into_iter()
            .map(|name| TextSummary::compute(table, name))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(text_artifact(&text));
    }

    let mut columns = vec!["statistic".to_string()];
    columns.extend(numeric.iter().map(|s| s.column.clone()));

    let rows = NUMERIC_ROWS
        .iter()
        .map(|stat| {
            let mut row = vec![Value::from(*stat)];
            row.extend(numeric.iter().map(|s| {
                let v = match *stat {
                    "count" => return Value::from(s.count),
                    "mean" => s.mean,
                    "std" => s.std_dev,
                    "min" => s.min,
                    "25%" => s.q25,
                    "50%" => s.median,
                    "75%" => s.q75,
                    _ => s.max,
                };
                v.map(Value::from).unwrap_or(Value::Null)
            }));
            row
        })
        .collect();

    Ok(TableArtifact::new(columns, rows))
}

fn text_artifact(summaries: &[TextSummary]) -> TableArtifact {
    let mut columns = vec!["statistic".to_string()];
    columns.extend(summaries.iter().map(|s| s.column.clone()));

    let rows = TEXT_ROWS
        .iter()
        .map(|stat| {
            let mut row = vec![Value::from(*stat)];
            row.extend(summaries.iter().map(|s| match *stat {
                "count" => Value::from(s.count),
                "unique" => Value::from(s.unique),
                "top" => s.top.clone().map(Value::Text).unwrap_or(Value::Null),
                _ => Value::from(s.freq),
            }));
            row
        })
        .collect();

    TableArtifact::new(columns, rows)
}
