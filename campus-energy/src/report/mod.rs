pub mod buildings;
pub mod dashboard;
pub mod summary;

pub use buildings::{Building, BuildingManager, MeterReading};
pub use dashboard::{DashboardData, DashboardRenderer, JsonDashboardRenderer};
pub use summary::SummaryReport;

use std::{io, path::PathBuf};

use time::{macros::format_description, PrimitiveDateTime};

#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode dashboard: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to format timestamp: {0}")]
    Format(#[from] time::error::Format),
}

/// `YYYY-MM-DD HH:MM:SS`, the layout used in reports.
pub fn format_timestamp(ts: PrimitiveDateTime) -> Result<String, ReportError> {
    Ok(ts.format(format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"))?)
}
