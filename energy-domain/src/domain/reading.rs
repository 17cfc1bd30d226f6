use std::path::PathBuf;

use time::PrimitiveDateTime;

/// A single validated meter reading.
///
/// `building` comes from the source file name, never from file content.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Reading {
    pub timestamp: PrimitiveDateTime,
    pub kwh: f64,
    pub building: String,
}

/// The valid readings extracted from one source file, in file row order.
#[derive(Debug, Clone)]
pub struct Fragment {
    pub building: String,
    pub source: PathBuf,
    pub readings: Vec<Reading>,
}

impl Fragment {
    pub fn new<P: Into<PathBuf>>(building: impl Into<String>, source: P, readings: Vec<Reading>) -> Self {
        Self {
            building: building.into(),
            source: source.into(),
            readings,
        }
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn total_kwh(&self) -> f64 {
        self.readings.iter().map(|r| r.kwh).sum()
    }
}
