use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::DashboardError;
use crate::models::Table;

pub const TRAFFIC: &str = "Traffic";
pub const WEATHER: &str = "Weather";
pub const VEHICLE: &str = "Vehicle";
pub const CATEGORY: &str = "Category";
pub const DELIVERY_TIME: &str = "Delivery_Time";
pub const AREA: &str = "Area";
pub const AGENT_RATING: &str = "Agent_Rating";

/// The fixed set of analyses a user can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisKind {
    ShowSchema,
    BasicStatistics,
    FirstFewRecords,
    TotalOrdersCount,
    OrdersByTraffic,
    OrdersByWeather,
    VehicleTypeDistribution,
    CategoryDistribution,
    DeliveryTimeAnalysis,
    AreaWiseAnalysis,
    AgentPerformanceAnalysis,
}

impl AnalysisKind {
    /// Every analysis, in the order offered to the user.
    pub const ALL: [AnalysisKind; 11] = [
        AnalysisKind::ShowSchema,
        AnalysisKind::BasicStatistics,
        AnalysisKind::FirstFewRecords,
        AnalysisKind::TotalOrdersCount,
        AnalysisKind::OrdersByTraffic,
        AnalysisKind::OrdersByWeather,
        AnalysisKind::VehicleTypeDistribution,
        AnalysisKind::CategoryDistribution,
        AnalysisKind::DeliveryTimeAnalysis,
        AnalysisKind::AreaWiseAnalysis,
        AnalysisKind::AgentPerformanceAnalysis,
    ];

    /// Name shown in the selection control.
    pub fn name(&self) -> &'static str {
        match self {
            AnalysisKind::ShowSchema => "Show Schema",
            AnalysisKind::BasicStatistics => "Basic Statistics",
            AnalysisKind::FirstFewRecords => "First Few Records",
            AnalysisKind::TotalOrdersCount => "Total Orders Count",
            AnalysisKind::OrdersByTraffic => "Orders by Traffic Condition",
            AnalysisKind::OrdersByWeather => "Orders by Weather",
            AnalysisKind::VehicleTypeDistribution => "Vehicle Type Distribution",
            AnalysisKind::CategoryDistribution => "Category Distribution",
            AnalysisKind::DeliveryTimeAnalysis => "Delivery Time Analysis",
            AnalysisKind::AreaWiseAnalysis => "Area-wise Analysis",
            AnalysisKind::AgentPerformanceAnalysis => "Agent Performance Analysis",
        }
    }

    /// Heading of the rendered section.
    pub fn heading(&self) -> &'static str {
        match self {
            AnalysisKind::ShowSchema => "Data Schema",
            AnalysisKind::BasicStatistics => "Basic Statistics",
            AnalysisKind::FirstFewRecords => "First Few Records",
            AnalysisKind::TotalOrdersCount => "Total Orders",
            AnalysisKind::OrdersByTraffic => "Orders by Traffic Condition",
            AnalysisKind::OrdersByWeather => "Orders by Weather Condition",
            AnalysisKind::VehicleTypeDistribution => "Vehicle Type Distribution",
            AnalysisKind::CategoryDistribution => "Order Category Distribution",
            AnalysisKind::DeliveryTimeAnalysis => "Delivery Time Analysis",
            AnalysisKind::AreaWiseAnalysis => "Area-wise Analysis",
            AnalysisKind::AgentPerformanceAnalysis => "Agent Performance Analysis",
        }
    }

    pub fn required_columns(&self) -> &'static [&'static str] {
        match self {
            AnalysisKind::ShowSchema
            | AnalysisKind::BasicStatistics
            | AnalysisKind::FirstFewRecords
            | AnalysisKind::TotalOrdersCount => &[],
            AnalysisKind::OrdersByTraffic => &[TRAFFIC],
            AnalysisKind::OrdersByWeather => &[WEATHER],
            AnalysisKind::VehicleTypeDistribution => &[VEHICLE],
            AnalysisKind::CategoryDistribution => &[CATEGORY],
            AnalysisKind::DeliveryTimeAnalysis => &[DELIVERY_TIME],
            AnalysisKind::AreaWiseAnalysis => &[AREA, DELIVERY_TIME],
            AnalysisKind::AgentPerformanceAnalysis => &[AGENT_RATING, DELIVERY_TIME],
        }
    }

    /// Required columns absent from `table`, in declaration order.
    pub fn missing_columns(&self, table: &Table) -> Vec<&'static str> {
        self.required_columns()
            .iter()
            .copied()
            .filter(|c| !table.has_column(c))
            .collect()
    }

    /// Resolve user-supplied names, keeping the first occurrence of each.
    pub fn parse_selection<S: AsRef<str>>(names: &[S]) -> Result<Vec<AnalysisKind>, DashboardError> {
        let mut selected = Vec::with_capacity(names.len());
        for name in names {
            let kind: AnalysisKind = name.as_ref().parse()?;
            if !selected.contains(&kind) {
                selected.push(kind);
            }
        }
        Ok(selected)
    }
}

impl FromStr for AnalysisKind {
    type Err = DashboardError;

    /// Names match case-insensitively, ignoring surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        AnalysisKind::ALL
            .iter()
            .copied()
            .find(|k| k.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DashboardError::UnknownAnalysis(wanted.to_string()))
    }
}

impl std::fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Serialize for AnalysisKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Catalog listing entry.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub heading: &'static str,
    pub required_columns: &'static [&'static str],
}

pub fn catalog() -> Vec<CatalogEntry> {
    AnalysisKind::ALL
        .iter()
        .map(|k| CatalogEntry {
            name: k.name(),
            heading: k.heading(),
            required_columns: k.required_columns(),
        })
        .collect()
}
