use polars::prelude::*;
use serde::Serialize;

use crate::error::DashboardError;
use crate::models::Table;

/// Number of rows holding one distinct value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Count each distinct non-null value of a column.
///
/// Values are compared as loaded, so two spellings of the same date are two
/// values. Results are ordered by descending count; ties keep the order in
/// which values were first seen.
pub fn value_counts(table: &Table, column: &str) -> Result<Vec<ValueCount>, DashboardError> {
    let counts = table
        .frame()
        .clone()
        .lazy()
        .select([col(column)])
        .filter(col(column).is_not_null())
        .group_by_stable([col(column)])
        .agg([len().cast(DataType::UInt64).alias("count")])
        .sort(
            ["count"],
            SortMultipleOptions::default()
                .with_order_descending(true)
                .with_maintain_order(true),
        )
        .select([col(column).cast(DataType::String), col("count")])
        .collect()?;

    let values = counts.column(column)?.as_materialized_series().str()?.clone();
    let totals = counts.column("count")?.as_materialized_series().u64()?.clone();

    Ok(values
        .into_iter()
        .zip(totals.into_iter())
        .filter_map(|(value, count)| {
            Some(ValueCount {
                value: value?.to_string(),
                count: count? as usize,
            })
        })
        .collect())
}
