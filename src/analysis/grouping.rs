use polars::prelude::*;
use serde::Serialize;

use crate::error::DashboardError;
use crate::models::{Table, Value};

/// Aggregates for one group of rows sharing a key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStats {
    pub key: Value,
    /// Mean of the numeric, non-null values; `None` when there are none.
    pub mean: Option<f64>,
    /// Rows in the group.
    pub rows: usize,
}

/// Group rows by `key` and average `value` per group.
///
/// Rows with a null key are dropped and cells of `value` that are not
/// numeric count as missing. Groups come back in ascending key order.
pub fn group_mean(table: &Table, key: &str, value: &str) -> Result<Vec<GroupStats>, DashboardError> {
    let grouped = table
        .frame()
        .clone()
        .lazy()
        .filter(col(key).is_not_null())
        .group_by([col(key)])
        .agg([
            col(value).cast(DataType::Float64).mean().alias("mean"),
            len().cast(DataType::UInt64).alias("rows"),
        ])
        .sort([key], SortMultipleOptions::default())
        .collect()?;

    let keys = grouped.column(key)?.as_materialized_series();
    let means = grouped.column("mean")?.as_materialized_series().f64()?;
    let rows = grouped.column("rows")?.as_materialized_series().u64()?;

    let mut stats = Vec::with_capacity(grouped.height());
    for i in 0..grouped.height() {
        stats.push(GroupStats {
            key: Value::from(&keys.get(i)?),
            mean: means.get(i).filter(|m| !m.is_nan()),
            rows: rows.get(i).unwrap_or(0) as usize,
        });
    }
    Ok(stats)
}
