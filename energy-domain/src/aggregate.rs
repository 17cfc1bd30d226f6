//! Pure aggregations over a [`SortedDataset`].
//!
//! Buckets are only emitted for periods that contain at least one reading;
//! gaps in the series are never zero-filled.

use std::collections::BTreeMap;

use time::{Date, Duration, PrimitiveDateTime};

use crate::domain::{
    BuildingSummary, BuildingWeeklyMean, DailyTotal, HourlyTotal, Reading, SortedDataset, WeeklyTotal,
};

fn bucket_sum<'a, K, F>(readings: &'a [Reading], key: F) -> BTreeMap<K, f64>
where
    K: Ord,
    F: Fn(&'a Reading) -> K,
{
    let mut buckets = BTreeMap::new();
    for r in readings {
        *buckets.entry(key(r)).or_insert(0.0) += r.kwh;
    }
    buckets
}

/// The Sunday that closes the Monday..Sunday week containing `date`.
pub fn week_ending(date: Date) -> Date {
    let days_to_sunday = 6 - date.weekday().number_days_from_monday();
    date.checked_add(Duration::days(i64::from(days_to_sunday)))
        .unwrap_or(Date::MAX)
}

/// Truncate a timestamp to the start of its hour.
pub fn hour_start(ts: PrimitiveDateTime) -> PrimitiveDateTime {
    let into_hour = Duration::seconds(i64::from(ts.minute()) * 60 + i64::from(ts.second()))
        + Duration::nanoseconds(i64::from(ts.nanosecond()));
    ts - into_hour
}

pub fn total_consumption(ds: &SortedDataset) -> f64 {
    ds.iter().map(|r| r.kwh).sum()
}

pub fn daily_totals(ds: &SortedDataset) -> Vec<DailyTotal> {
    bucket_sum(ds.readings(), |r| r.timestamp.date())
        .into_iter()
        .map(|(day, kwh)| DailyTotal { day, kwh })
        .collect()
}

pub fn weekly_totals(ds: &SortedDataset) -> Vec<WeeklyTotal> {
    bucket_sum(ds.readings(), |r| week_ending(r.timestamp.date()))
        .into_iter()
        .map(|(week_ending, kwh)| WeeklyTotal { week_ending, kwh })
        .collect()
}

pub fn hourly_totals(ds: &SortedDataset) -> Vec<HourlyTotal> {
    bucket_sum(ds.readings(), |r| hour_start(r.timestamp))
        .into_iter()
        .map(|(hour, kwh)| HourlyTotal { hour, kwh })
        .collect()
}

/// The `n` largest hourly totals, largest first. Equal totals keep the
/// earlier hour first.
pub fn top_hours(hourly: &[HourlyTotal], n: usize) -> Vec<HourlyTotal> {
    let mut ranked = hourly.to_vec();
    ranked.sort_by(|a, b| b.kwh.total_cmp(&a.kwh).then_with(|| a.hour.cmp(&b.hour)));
    ranked.truncate(n);
    ranked
}

#[derive(Debug, Clone, Copy)]
struct Stats {
    count: usize,
    total: f64,
    min: f64,
    max: f64,
}

impl Stats {
    fn new(kwh: f64) -> Self {
        Self {
            count: 1,
            total: kwh,
            min: kwh,
            max: kwh,
        }
    }

    fn push(&mut self, kwh: f64) {
        self.count += 1;
        self.total += kwh;
        self.min = self.min.min(kwh);
        self.max = self.max.max(kwh);
    }
}

/// Per-building mean/min/max/total, ordered by building name.
pub fn building_summary(ds: &SortedDataset) -> Vec<BuildingSummary> {
    let mut groups: BTreeMap<&str, Stats> = BTreeMap::new();
    for r in ds.iter() {
        groups
            .entry(r.building.as_str())
            .and_modify(|s| s.push(r.kwh))
            .or_insert_with(|| Stats::new(r.kwh));
    }

    groups
        .into_iter()
        .map(|(building, s)| BuildingSummary {
            building: building.to_string(),
            mean: s.total / s.count as f64,
            min: s.min,
            max: s.max,
            total: s.total,
            readings: s.count,
        })
        .collect()
}

/// The building with the largest total. Ties go to the building that comes
/// first in `summaries`, which for [`building_summary`] output is name order.
pub fn highest_consumer(summaries: &[BuildingSummary]) -> Option<&BuildingSummary> {
    summaries.iter().fold(None, |best, s| match best {
        Some(b) if b.total >= s.total => Some(b),
        _ => Some(s),
    })
}

/// The reading with the largest kwh; the first one wins on ties.
pub fn peak_reading(ds: &SortedDataset) -> &Reading {
    ds.iter()
        .fold(ds.first(), |peak, r| if r.kwh > peak.kwh { r } else { peak })
}

/// Per building, the mean of that building's weekly totals.
///
/// Only weeks in which the building has at least one reading count. A week
/// with no data inside the building's reporting span is left out of the mean
/// rather than counted as zero, so a building reporting in weeks 1 and 4 is
/// averaged over two weeks, not four.
pub fn weekly_mean_by_building(ds: &SortedDataset) -> Vec<BuildingWeeklyMean> {
    let weekly = bucket_sum(ds.readings(), |r| {
        (r.building.as_str(), week_ending(r.timestamp.date()))
    });

    let mut per_building: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for ((building, _), kwh) in weekly {
        let entry = per_building.entry(building).or_insert((0.0, 0));
        entry.0 += kwh;
        entry.1 += 1;
    }

    per_building
        .into_iter()
        .map(|(building, (sum, weeks))| BuildingWeeklyMean {
            building: building.to_string(),
            mean_weekly_kwh: sum / weeks as f64,
            weeks,
        })
        .collect()
}
