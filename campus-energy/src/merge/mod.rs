use energy_domain::{Dataset, Fragment};

/// Result of concatenating per-file fragments.
#[derive(Debug)]
pub enum Merged {
    /// No file contributed a single reading. Not an error.
    Empty,
    /// At least one reading, in fragment order then row order. Unsorted.
    Dataset(Dataset),
}

impl Merged {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Concatenate fragments in the order given, preserving each fragment's rows.
pub fn merge(fragments: Vec<Fragment>) -> Merged {
    let rows: usize = fragments.iter().map(Fragment::len).sum();
    if rows == 0 {
        return Merged::Empty;
    }

    let mut readings = Vec::with_capacity(rows);
    for fragment in fragments {
        readings.extend(fragment.readings);
    }
    Merged::Dataset(Dataset::new(readings))
}
