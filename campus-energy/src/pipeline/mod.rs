use std::{io, path::PathBuf, pin::Pin};

use futures::Stream;

#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("missing required columns: {missing:?}")]
    Schema { missing: Vec<&'static str> },
    #[error("No columns to parse from file")]
    NoColumns,
    #[error("{0}")]
    Source(String),
    #[error("failed to write diagnostics to {path}: {source}")]
    Diagnostics {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PipelineError {
    /// The diagnostic log line recorded when this error makes a file unusable.
    pub fn diagnostic(&self, file_name: &str) -> String {
        match self {
            Self::Schema { .. } => format!("{file_name}: Missing required columns."),
            other => format!("{file_name}: Error - {other}."),
        }
    }
}

pub type SourceStream<T> = Pin<Box<dyn Stream<Item = Result<T, PipelineError>> + Send>>;

/// A producer of validated records.
///
/// An `Err` item means the whole source is unusable; row-level rejects are
/// filtered out by the source and never surface as errors.
#[async_trait::async_trait]
pub trait Source<T>: Send + Sync {
    async fn stream(&self) -> SourceStream<T>;
}
