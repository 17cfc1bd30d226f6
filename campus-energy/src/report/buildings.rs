//! Per-building object view of the dataset.
//!
//! This is a secondary presentation path; `aggregate::building_summary` is
//! the authoritative source for per-building totals.

use std::collections::HashMap;

use energy_domain::SortedDataset;
use time::PrimitiveDateTime;

#[derive(Debug, Clone, PartialEq)]
pub struct MeterReading {
    pub timestamp: PrimitiveDateTime,
    pub kwh: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Building {
    pub name: String,
    pub meter_readings: Vec<MeterReading>,
}

impl Building {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            meter_readings: Vec::new(),
        }
    }

    pub fn add_reading(&mut self, reading: MeterReading) {
        self.meter_readings.push(reading);
    }

    pub fn total_consumption(&self) -> f64 {
        self.meter_readings.iter().map(|r| r.kwh).sum()
    }

    pub fn generate_report(&self) -> String {
        format!(
            "Building {}: total consumption = {:.2} kWh",
            self.name,
            self.total_consumption()
        )
    }
}

/// Buildings in the order they were first seen.
#[derive(Debug, Default)]
pub struct BuildingManager {
    buildings: Vec<Building>,
    index: HashMap<String, usize>,
}

impl BuildingManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_dataset(ds: &SortedDataset) -> Self {
        let mut manager = Self::new();
        for r in ds.iter() {
            manager.add_reading(&r.building, r.timestamp, r.kwh);
        }
        manager
    }

    pub fn get_or_create_building(&mut self, name: &str) -> &mut Building {
        let idx = match self.index.get(name) {
            Some(&idx) => idx,
            None => {
                self.buildings.push(Building::new(name));
                let idx = self.buildings.len() - 1;
                self.index.insert(name.to_string(), idx);
                idx
            }
        };
        &mut self.buildings[idx]
    }

    pub fn add_reading(&mut self, building: &str, timestamp: PrimitiveDateTime, kwh: f64) {
        self.get_or_create_building(building)
            .add_reading(MeterReading { timestamp, kwh });
    }

    pub fn get(&self, name: &str) -> Option<&Building> {
        self.index.get(name).map(|&idx| &self.buildings[idx])
    }

    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    pub fn generate_all_reports(&self) -> Vec<String> {
        self.buildings.iter().map(Building::generate_report).collect()
    }
}
