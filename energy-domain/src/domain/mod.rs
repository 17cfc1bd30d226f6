pub mod dataset;
pub mod reading;
pub mod summary;

pub use dataset::{Dataset, DatasetError, SortedDataset};
pub use reading::{Fragment, Reading};
pub use summary::{BuildingSummary, BuildingWeeklyMean, DailyTotal, HourlyTotal, WeeklyTotal};
