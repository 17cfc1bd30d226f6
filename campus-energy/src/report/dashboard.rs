use std::path::Path;

use energy_domain::{aggregate, BuildingWeeklyMean, DailyTotal, HourlyTotal, SortedDataset};
use serde::Serialize;

use crate::report::ReportError;

/// The three dashboard panels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardData {
    /// Campus consumption per day.
    pub daily: Vec<DailyTotal>,
    /// Average weekly usage per building.
    pub weekly_mean_by_building: Vec<BuildingWeeklyMean>,
    /// Largest hourly totals, largest first.
    pub peak_hours: Vec<HourlyTotal>,
}

impl DashboardData {
    pub fn from_dataset(ds: &SortedDataset, peak_hours: usize) -> Self {
        let hourly = aggregate::hourly_totals(ds);
        Self {
            daily: aggregate::daily_totals(ds),
            weekly_mean_by_building: aggregate::weekly_mean_by_building(ds),
            peak_hours: aggregate::top_hours(&hourly, peak_hours),
        }
    }
}

/// Turns dashboard data into an artifact at `path`.
#[async_trait::async_trait]
pub trait DashboardRenderer: Send + Sync {
    async fn render(&self, data: &DashboardData, path: &Path) -> Result<(), ReportError>;
}

/// Writes the panels as pretty-printed JSON for an external plotting step.
#[derive(Clone, Default)]
pub struct JsonDashboardRenderer;

#[async_trait::async_trait]
impl DashboardRenderer for JsonDashboardRenderer {
    async fn render(&self, data: &DashboardData, path: &Path) -> Result<(), ReportError> {
        let body = serde_json::to_vec_pretty(data)?;
        tokio::fs::write(path, body)
            .await
            .map_err(|source| ReportError::Io {
                path: path.to_path_buf(),
                source,
            })
    }
}
