mod artifact;
mod catalog;
mod describe;
mod frequency;
mod grouping;
mod histogram;
mod runner;

pub use artifact::{Artifact, Chart, Metric, ScatterPoint, Section, TableArtifact, Warning};
pub use catalog::{
    catalog, AnalysisKind, CatalogEntry, AGENT_RATING, AREA, CATEGORY, DELIVERY_TIME, TRAFFIC,
    VEHICLE, WEATHER,
};
pub use describe::{describe, NumericSummary, TextSummary};
pub use frequency::{value_counts, ValueCount};
pub use grouping::{group_mean, GroupStats};
pub use histogram::{sturges_bins, Histogram, HistogramBin};
pub use runner::Analyzer;
