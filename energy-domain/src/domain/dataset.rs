use crate::domain::Reading;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DatasetError {
    #[error("dataset is empty")]
    Empty,
}

/// Merged readings in fragment order. Not sorted.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    readings: Vec<Reading>,
}

impl Dataset {
    pub fn new(readings: Vec<Reading>) -> Self {
        Self { readings }
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
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

    /// Sort by timestamp ascending, keeping merge order for equal timestamps.
    ///
    /// This is the only way to obtain a [`SortedDataset`], which is what every
    /// aggregation requires. Fails on an empty dataset.
    pub fn into_sorted(mut self) -> Result<SortedDataset, DatasetError> {
        if self.readings.is_empty() {
            return Err(DatasetError::Empty);
        }
        self.readings.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(SortedDataset {
            readings: self.readings,
        })
    }
}

impl From<Vec<Reading>> for Dataset {
    fn from(readings: Vec<Reading>) -> Self {
        Self::new(readings)
    }
}

/// A non-empty dataset ordered by timestamp ascending.
#[derive(Debug, Clone)]
pub struct SortedDataset {
    readings: Vec<Reading>,
}

impl SortedDataset {
    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Reading> {
        self.readings.iter()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Always false; kept for API symmetry with [`Dataset`].
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn first(&self) -> &Reading {
        &self.readings[0]
    }

    pub fn last(&self) -> &Reading {
        &self.readings[self.readings.len() - 1]
    }
}
