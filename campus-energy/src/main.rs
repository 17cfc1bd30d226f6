use anyhow::Result;
use campus_energy::{
    config::AppConfig,
    metrics_export, observability,
    report::JsonDashboardRenderer,
    run::{run_with_metrics, RunOutcome},
};

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    // Load configuration
    let cfg = AppConfig::load()?;

    if cfg.metrics.is_some() {
        metrics_export::init()?;
    }

    match run_with_metrics(&cfg, &JsonDashboardRenderer).await? {
        RunOutcome::NoData { .. } => {
            println!("No valid CSV data found.");
        }
        RunOutcome::Completed(report) => {
            for line in &report.building_reports {
                println!("{line}");
            }
            println!("{}", report.summary_text);
            println!("All tasks completed. Check output folder.");
        }
    }

    Ok(())
}
