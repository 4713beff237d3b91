use polars::prelude::*;

use super::value::{ColumnType, Value};
use crate::error::DashboardError;

/// A named dataset backed by a polars [`DataFrame`].
///
/// Column names are unique and every column has the same length; the frame
/// enforces both.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    frame: DataFrame,
}

impl Table {
    pub fn new(name: impl Into<String>, frame: DataFrame) -> Self {
        Self {
            name: name.into(),
            frame,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn num_rows(&self) -> usize {
        self.frame.height()
    }

    pub fn num_columns(&self) -> usize {
        self.frame.width()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.frame
            .get_columns()
            .iter()
            .map(|c| c.name().as_str())
            .collect()
    }

    /// Ordered `(name, type)` pairs.
    pub fn schema(&self) -> Vec<(&str, ColumnType)> {
        self.frame
            .get_columns()
            .iter()
            .map(|c| (c.name().as_str(), ColumnType::from(c.dtype())))
            .collect()
    }

    pub fn dtype(&self, name: &str) -> Option<ColumnType> {
        self.frame
            .column(name)
            .ok()
            .map(|c| ColumnType::from(c.dtype()))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.frame.get_column_index(name).is_some()
    }

    /// Names of the columns that take part in numeric statistics.
    pub fn numeric_columns(&self) -> impl Iterator<Item = &str> {
        self.frame
            .get_columns()
            .iter()
            .filter(|c| ColumnType::from(c.dtype()).is_numeric())
            .map(|c| c.name().as_str())
    }

    /// A column cast to `f64`. Cells that do not convert become null.
    pub fn float_column(&self, name: &str) -> Result<Float64Chunked, DashboardError> {
        let series = self
            .frame
            .column(name)?
            .as_materialized_series()
            .cast(&DataType::Float64)?;
        Ok(series.f64()?.clone())
    }

    /// Numeric cells of a column in row order, skipping nulls and NaN.
    pub fn numeric_values(&self, name: &str) -> Result<Vec<f64>, DashboardError> {
        Ok(self
            .float_column(name)?
            .into_iter()
            .flatten()
            .filter(|v| !v.is_nan())
            .collect())
    }

    /// Cells of one row in column order.
    pub fn row(&self, index: usize) -> Option<Vec<Value>> {
        if index >= self.num_rows() {
            return None;
        }
        Some(
            self.frame
                .get_columns()
                .iter()
                .map(|c| {
                    c.as_materialized_series()
                        .get(index)
                        .map(|av| Value::from(&av))
                        .unwrap_or(Value::Null)
                })
                .collect(),
        )
    }

    /// A new table holding the first `n` rows.
    pub fn head(&self, n: usize) -> Table {
        Table {
            name: self.name.clone(),
            frame: self.frame.head(Some(n)),
        }
    }
}
