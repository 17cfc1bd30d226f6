pub mod aggregate;
pub mod domain;

pub use domain::{
    BuildingSummary, BuildingWeeklyMean, DailyTotal, Dataset, DatasetError, Fragment, HourlyTotal,
    Reading, SortedDataset, WeeklyTotal,
};
