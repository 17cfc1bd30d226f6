pub mod config;
pub mod loader;
pub mod merge;
pub mod metrics_export;
pub mod observability;
pub mod pipeline;
pub mod report;
pub mod run;
pub mod sources;
pub mod validate;

pub use pipeline::{PipelineError, Source};
pub use run::{run, run_with_metrics, RunOutcome, RunReport};
