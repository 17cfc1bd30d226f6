use std::path::{Path, PathBuf};

use energy_domain::Reading;

use crate::{
    pipeline::{PipelineError, Source, SourceStream},
    validate,
};

/// CSV export of one building's meter.
///
/// Required header columns (by name):
/// - timestamp
/// - kwh
///
/// Other columns are ignored. Rows with more fields than the header are
/// skipped, as are rows whose timestamp or kwh cannot be coerced. Any other
/// read failure ends the stream with an error.
pub struct BuildingCsvFileSource {
    path: PathBuf,
    building: String,
}

impl BuildingCsvFileSource {
    pub fn new<P: Into<PathBuf>>(path: P, building: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            building: building.into(),
        }
    }

    /// Source tagged with the file stem as the building name.
    pub fn for_file<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let building = building_name(&path);
        Self { path, building }
    }

    pub fn building(&self) -> &str {
        &self.building
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// File stem of `path`, used as the building identifier.
pub fn building_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[async_trait::async_trait]
impl Source<Reading> for BuildingCsvFileSource {
    async fn stream(&self) -> SourceStream<Reading> {
        let path = self.path.clone();
        let building = self.building.clone();
        let s = async_stream::try_stream! {
            let bytes = tokio::fs::read(&path)
                .await
                .map_err(|e| PipelineError::Source(format!("failed to open CSV file: {e}")))?;
            let mut rdr = csv::ReaderBuilder::new()
                .flexible(true)
                .from_reader(bytes.as_slice());
            let headers = rdr
                .headers()
                .map_err(|e| PipelineError::Source(format!("failed to read CSV headers: {e}")))?
                .clone();

            let columns = if headers.is_empty() {
                Err(PipelineError::NoColumns)
            } else {
                validate::required_columns(&headers)
            }?;

            for result in rdr.records() {
                let record = result.map_err(|e| PipelineError::Source(format!(
                    "failed to read CSV record: {e}"
                )))?;

                if record.len() > headers.len() {
                    metrics::counter!("energy_rows_malformed_total").increment(1);
                    continue;
                }

                match validate::coerce_row(&record, columns) {
                    Some((timestamp, kwh)) => {
                        yield Reading {
                            timestamp,
                            kwh,
                            building: building.clone(),
                        };
                    }
                    None => {
                        metrics::counter!("energy_rows_dropped_total").increment(1);
                    }
                }
            }
        };

        Box::pin(s)
    }
}
