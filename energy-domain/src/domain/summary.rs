use time::{Date, PrimitiveDateTime};

/// Campus-wide consumption for one calendar day.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DailyTotal {
    pub day: Date,
    pub kwh: f64,
}

/// Campus-wide consumption for one Monday..Sunday week, labelled by its Sunday.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WeeklyTotal {
    pub week_ending: Date,
    pub kwh: f64,
}

/// Campus-wide consumption for one clock hour.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HourlyTotal {
    pub hour: PrimitiveDateTime,
    pub kwh: f64,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BuildingSummary {
    pub building: String,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub total: f64,
    pub readings: usize,
}

/// Average of a building's weekly totals over the weeks it reported in.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BuildingWeeklyMean {
    pub building: String,
    pub mean_weekly_kwh: f64,
    pub weeks: usize,
}
