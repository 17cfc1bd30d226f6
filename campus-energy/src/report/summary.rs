use std::path::Path;

use energy_domain::{aggregate, BuildingSummary, Reading, SortedDataset};

use crate::report::{format_timestamp, ReportError};

/// Scalars that make up the plain-text campus summary.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryReport {
    pub total_kwh: f64,
    pub highest: Option<BuildingSummary>,
    pub peak: Reading,
    pub daily_points: usize,
    pub weekly_points: usize,
}

impl SummaryReport {
    pub fn from_dataset(ds: &SortedDataset, summaries: &[BuildingSummary]) -> Self {
        Self {
            total_kwh: aggregate::total_consumption(ds),
            highest: aggregate::highest_consumer(summaries).cloned(),
            peak: aggregate::peak_reading(ds).clone(),
            daily_points: aggregate::daily_totals(ds).len(),
            weekly_points: aggregate::weekly_totals(ds).len(),
        }
    }

    pub fn render(&self) -> Result<String, ReportError> {
        let highest = match &self.highest {
            Some(b) => format!("{} ({:.2} kWh)", b.building, b.total),
            None => "n/a".to_string(),
        };

        Ok(format!(
            "Campus Energy Use Summary\n\
             =========================\n\
             \n\
             Total campus consumption: {total:.2} kWh\n\
             Highest consuming building: {highest}\n\
             Peak load time: {peak_ts} with {peak_kwh:.2} kWh\n\
             \n\
             Daily points: {daily}\n\
             Weekly points: {weekly}\n",
            total = self.total_kwh,
            peak_ts = format_timestamp(self.peak.timestamp)?,
            peak_kwh = self.peak.kwh,
            daily = self.daily_points,
            weekly = self.weekly_points,
        ))
    }

    /// Render and write the report to `path`, returning the rendered text.
    pub async fn write(&self, path: &Path) -> Result<String, ReportError> {
        let text = self.render()?;
        tokio::fs::write(path, &text)
            .await
            .map_err(|source| ReportError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(text)
    }
}
