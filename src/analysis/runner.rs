use crate::analysis::artifact::{
    Artifact, Chart, Metric, ScatterPoint, Section, TableArtifact, Warning,
};
use crate::analysis::catalog::{
    AnalysisKind, AGENT_RATING, AREA, CATEGORY, DELIVERY_TIME, TRAFFIC, VEHICLE, WEATHER,
};
use crate::analysis::describe::describe;
use crate::analysis::frequency::value_counts;
use crate::analysis::grouping::group_mean;
use crate::analysis::histogram::Histogram;
use crate::config::DashboardConfig;
use crate::error::DashboardError;
use crate::models::{Table, Value};
use polars::prelude::ChunkAgg;

/// Bar or pie rendering for a frequency count.
#[derive(Debug, Clone, Copy)]
enum CountChart {
    Bar,
    Pie,
}

/// Runs catalog analyses against a borrowed table.
///
/// The table is never modified, so running the same analysis twice yields
/// identical sections.
pub struct Analyzer<'a> {
    table: &'a Table,
    preview_rows: usize,
    histogram_bins: Option<usize>,
}

impl<'a> Analyzer<'a> {
    /// Create an analyzer with default settings (5 preview rows, automatic bins).
    pub fn new(table: &'a Table) -> Self {
        Self::with_config(table, &DashboardConfig::default())
    }

    pub fn with_config(table: &'a Table, config: &DashboardConfig) -> Self {
        Self {
            table,
            preview_rows: config.preview_rows,
            histogram_bins: config.histogram_bins,
        }
    }

    /// Run one analysis.
    ///
    /// Missing required columns produce a warning section, and so does a
    /// computation that fails over the loaded data.
    pub fn run(&self, kind: AnalysisKind) -> Section {
        let missing = kind.missing_columns(self.table);
        let artifacts = if !missing.is_empty() {
            tracing::warn!(analysis = kind.name(), missing = ?missing, "required columns missing");
            vec![Artifact::Warning(Warning::missing(&missing))]
        } else {
            tracing::debug!(analysis = kind.name(), "running analysis");
            self.compute(kind).unwrap_or_else(|e| {
                tracing::error!(analysis = kind.name(), error = %e, "analysis failed");
                vec![Artifact::Warning(Warning::failed(e))]
            })
        };

        Section {
            analysis: kind,
            heading: kind.heading().to_string(),
            artifacts,
        }
    }

    /// Run each analysis in order.
    pub fn run_all(&self, kinds: &[AnalysisKind]) -> Vec<Section> {
        kinds.iter().map(|k| self.run(*k)).collect()
    }

    fn compute(&self, kind: AnalysisKind) -> Result<Vec<Artifact>, DashboardError> {
        let artifacts = match kind {
            AnalysisKind::ShowSchema => vec![Artifact::Table(self.schema_table())],
            AnalysisKind::BasicStatistics => vec![Artifact::Table(describe(self.table)?)],
            AnalysisKind::FirstFewRecords => vec![Artifact::Table(self.preview())],
            AnalysisKind::TotalOrdersCount => {
                vec![Artifact::Metric(Metric::count("Total Orders", self.table.num_rows()))]
            }
            AnalysisKind::OrdersByTraffic => self.count_chart(
                TRAFFIC,
                CountChart::Bar,
                "Distribution of Orders by Traffic Condition",
            )?,
            AnalysisKind::OrdersByWeather => {
                self.count_chart(WEATHER, CountChart::Pie, "Distribution of Orders by Weather")?
            }
            AnalysisKind::VehicleTypeDistribution => {
                self.count_chart(VEHICLE, CountChart::Pie, "Distribution of Vehicle Types")?
            }
            AnalysisKind::CategoryDistribution => self.count_chart(
                CATEGORY,
                CountChart::Bar,
                "Distribution of Orders by Category",
            )?,
            AnalysisKind::DeliveryTimeAnalysis => self.delivery_time()?,
            AnalysisKind::AreaWiseAnalysis => self.area_wise()?,
            AnalysisKind::AgentPerformanceAnalysis => self.agent_performance()?,
        };
        Ok(artifacts)
    }

    /// Column name and inferred type, one row per column.
    pub fn schema_table(&self) -> TableArtifact {
        let rows = self
            .table
            .schema()
            .into_iter()
            .map(|(name, dtype)| vec![Value::from(name), Value::from(dtype.to_string())])
            .collect();
        TableArtifact::new(vec!["Column".into(), "Data Type".into()], rows)
    }

    /// The first `preview_rows` rows.
    pub fn preview(&self) -> TableArtifact {
        TableArtifact::from_table(&self.table.head(self.preview_rows))
    }

    fn count_chart(
        &self,
        column: &str,
        style: CountChart,
        title: &str,
    ) -> Result<Vec<Artifact>, DashboardError> {
        let counts = value_counts(self.table, column)?;
        let labels: Vec<String> = counts.iter().map(|c| c.value.clone()).collect();
        let values: Vec<f64> = counts.iter().map(|c| c.count as f64).collect();

        let chart = match style {
            CountChart::Bar => Chart::Bar {
                title: title.to_string(),
                x_label: column.to_string(),
                y_label: "count".to_string(),
                categories: labels,
                values,
            },
            CountChart::Pie => Chart::Pie {
                title: title.to_string(),
                labels,
                values,
            },
        };
        Ok(vec![Artifact::Chart(chart)])
    }

    fn delivery_time(&self) -> Result<Vec<Artifact>, DashboardError> {
        let times = self.table.float_column(DELIVERY_TIME)?;
        let mean = times.mean();
        let values: Vec<f64> = times.into_iter().flatten().filter(|v| !v.is_nan()).collect();
        let histogram = Histogram::from_values(&values, self.histogram_bins);

        Ok(vec![
            Artifact::Metric(Metric::decimal("Average Delivery Time (min)", mean)),
            Artifact::Chart(Chart::Histogram {
                title: "Distribution of Delivery Times".to_string(),
                x_label: DELIVERY_TIME.to_string(),
                bins: histogram.bins,
            }),
        ])
    }

    fn area_wise(&self) -> Result<Vec<Artifact>, DashboardError> {
        let groups = group_mean(self.table, AREA, DELIVERY_TIME)?;

        let rows = groups
            .iter()
            .map(|g| {
                vec![
                    g.key.clone(),
                    g.mean.map(Value::from).unwrap_or(Value::Null),
                    Value::from(g.rows),
                ]
            })
            .collect();
        let table = TableArtifact::new(
            vec![
                AREA.to_string(),
                "Avg Delivery Time".to_string(),
                "Number of Orders".to_string(),
            ],
            rows,
        );

        let chart = Chart::Bar {
            title: "Average Delivery Time by Area".to_string(),
            x_label: AREA.to_string(),
            y_label: "Avg Delivery Time".to_string(),
            categories: groups.iter().map(|g| g.key.to_string()).collect(),
            values: groups.iter().map(|g| g.mean.unwrap_or(f64::NAN)).collect(),
        };

        Ok(vec![Artifact::Table(table), Artifact::Chart(chart)])
    }

    fn agent_performance(&self) -> Result<Vec<Artifact>, DashboardError> {
        let chart = Chart::Scatter {
            title: "Agent Rating vs Delivery Time".to_string(),
            x_label: AGENT_RATING.to_string(),
            y_label: DELIVERY_TIME.to_string(),
            points: self.scatter_points(AGENT_RATING, DELIVERY_TIME)?,
        };

        let rows = group_mean(self.table, AGENT_RATING, DELIVERY_TIME)?
            .into_iter()
            .map(|g| vec![g.key, g.mean.map(Value::from).unwrap_or(Value::Null)])
            .collect();
        let table = TableArtifact::new(vec![AGENT_RATING.to_string(), DELIVERY_TIME.to_string()], rows)
            .with_caption("Average Delivery Time by Agent Rating:");

        Ok(vec![Artifact::Chart(chart), Artifact::Table(table)])
    }

    /// Pairs of numeric, non-null cells in row order.
    fn scatter_points(&self, x: &str, y: &str) -> Result<Vec<ScatterPoint>, DashboardError> {
        let xs = self.table.float_column(x)?;
        let ys = self.table.float_column(y)?;
        Ok(xs
            .into_iter()
            .zip(ys.into_iter())
            .filter_map(|(a, b)| Some(ScatterPoint { x: a?, y: b? }))
            .filter(|p| !p.x.is_nan() && !p.y.is_nan())
            .collect())
    }
}
