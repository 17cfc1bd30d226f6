//! One batch run: load, merge, aggregate, write reports.

use anyhow::Context;
use energy_domain::aggregate;

use crate::{
    config::AppConfig,
    loader::{self, DiagnosticLog},
    merge::{self, Merged},
    metrics_export,
    report::{BuildingManager, DashboardData, DashboardRenderer, SummaryReport},
};

#[derive(Debug)]
pub enum RunOutcome {
    /// No file produced a usable reading. Nothing but the diagnostic log was written.
    NoData { diagnostics: DiagnosticLog },
    Completed(RunReport),
}

#[derive(Debug)]
pub struct RunReport {
    pub readings: usize,
    pub building_reports: Vec<String>,
    pub summary_text: String,
    pub diagnostics: DiagnosticLog,
}

pub async fn run<R>(cfg: &AppConfig, renderer: &R) -> anyhow::Result<RunOutcome>
where
    R: DashboardRenderer + ?Sized,
{
    tokio::fs::create_dir_all(&cfg.output.dir)
        .await
        .with_context(|| format!("failed to create output dir {}", cfg.output.dir.display()))?;

    let loaded = loader::load_directory(
        &cfg.input.data_dir,
        &cfg.output.log_path(),
        cfg.loader.workers,
    )
    .await?;
    if !loaded.diagnostics.is_empty() {
        tracing::warn!(
            skipped = loaded.diagnostics.len(),
            log = %cfg.output.log_path().display(),
            "some files were skipped"
        );
    }

    let dataset = match merge::merge(loaded.fragments) {
        Merged::Empty => {
            tracing::info!("no usable readings");
            return Ok(RunOutcome::NoData {
                diagnostics: loaded.diagnostics,
            });
        }
        Merged::Dataset(ds) => ds,
    };
    let ds = dataset.into_sorted()?;
    tracing::info!(
        readings = ds.len(),
        first = %ds.first().timestamp,
        last = %ds.last().timestamp,
        "merged dataset"
    );

    let summaries = aggregate::building_summary(&ds);
    let manager = BuildingManager::from_dataset(&ds);

    let dashboard = DashboardData::from_dataset(&ds, cfg.dashboard.peak_hours);
    renderer
        .render(&dashboard, &cfg.output.dashboard_path())
        .await?;

    let summary = SummaryReport::from_dataset(&ds, &summaries);
    let summary_text = summary.write(&cfg.output.summary_path()).await?;

    Ok(RunOutcome::Completed(RunReport {
        readings: ds.len(),
        building_reports: manager.generate_all_reports(),
        summary_text,
        diagnostics: loaded.diagnostics,
    }))
}

/// [`run`], then write the metrics textfile when configured. The textfile is
/// written for failed runs too; the run's own error takes precedence.
pub async fn run_with_metrics<R>(cfg: &AppConfig, renderer: &R) -> anyhow::Result<RunOutcome>
where
    R: DashboardRenderer + ?Sized,
{
    let outcome = run(cfg, renderer).await;

    if let Some(metrics_cfg) = &cfg.metrics {
        let written = metrics_export::write_textfile(&metrics_cfg.textfile_path)
            .await
            .with_context(|| format!("failed to write metrics to {}", metrics_cfg.textfile_path.display()));
        match (&outcome, written) {
            (Ok(_), Err(e)) => return Err(e),
            (Err(_), Err(e)) => tracing::warn!(error = %e, "metrics export failed after run error"),
            (_, Ok(())) => {}
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{InputConfig, MetricsConfig, OutputConfig},
        report::JsonDashboardRenderer,
    };
    use tempfile::TempDir;

    fn config(root: &TempDir) -> AppConfig {
        AppConfig {
            input: InputConfig {
                data_dir: root.path().join("data"),
            },
            output: OutputConfig {
                dir: root.path().join("output"),
                ..OutputConfig::default()
            },
            ..AppConfig::default()
        }
    }

    #[tokio::test]
    async fn run_without_usable_files_reports_no_data() {
        let root = TempDir::new().unwrap();
        let cfg = config(&root);
        std::fs::create_dir(&cfg.input.data_dir).unwrap();
        std::fs::write(cfg.input.data_dir.join("admin.csv"), "ts,value\n1,2\n").unwrap();

        let outcome = run(&cfg, &JsonDashboardRenderer).await.unwrap();

        match outcome {
            RunOutcome::NoData { diagnostics } => {
                assert_eq!(diagnostics.lines(), ["admin.csv: Missing required columns."]);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(
            std::fs::read_to_string(cfg.output.log_path()).unwrap(),
            "admin.csv: Missing required columns.\n"
        );
        assert!(!cfg.output.summary_path().exists());
        assert!(!cfg.output.dashboard_path().exists());
    }

    #[tokio::test]
    async fn run_writes_all_outputs() {
        let root = TempDir::new().unwrap();
        let cfg = config(&root);
        std::fs::create_dir(&cfg.input.data_dir).unwrap();
        std::fs::write(
            cfg.input.data_dir.join("library.csv"),
            "timestamp,kwh\n2024-03-05 10:00,20\n2024-03-04 10:00,10\nbad,99\n",
        )
        .unwrap();
        std::fs::write(
            cfg.input.data_dir.join("gym.csv"),
            "timestamp,kwh,meter\n2024-03-04 11:00,0,g1\n2024-03-04 12:00,5,g1\n",
        )
        .unwrap();
        std::fs::write(cfg.input.data_dir.join("broken.csv"), "").unwrap();

        let outcome = run(&cfg, &JsonDashboardRenderer).await.unwrap();

        let RunOutcome::Completed(report) = outcome else {
            panic!("expected a completed run");
        };
        assert_eq!(report.readings, 4);
        assert_eq!(
            report.building_reports,
            vec![
                "Building library: total consumption = 30.00 kWh".to_string(),
                "Building gym: total consumption = 5.00 kWh".to_string(),
            ]
        );
        assert!(report
            .summary_text
            .contains("Highest consuming building: library (30.00 kWh)"));
        assert!(report
            .summary_text
            .contains("Peak load time: 2024-03-05 10:00:00 with 20.00 kWh"));
        assert!(report.summary_text.contains("Daily points: 2"));
        assert!(report.summary_text.contains("Weekly points: 1"));

        assert_eq!(
            std::fs::read_to_string(cfg.output.summary_path()).unwrap(),
            report.summary_text
        );
        assert!(cfg.output.dashboard_path().exists());
        assert_eq!(
            std::fs::read_to_string(cfg.output.log_path()).unwrap(),
            "broken.csv: Error - No columns to parse from file.\n"
        );
    }

    #[tokio::test]
    async fn metrics_textfile_is_written_when_run_fails() {
        // Only test in this binary that installs the global recorder.
        let _ = metrics_export::init();

        let root = TempDir::new().unwrap();
        let mut cfg = config(&root);
        // A file where the output directory should be makes the run fail.
        std::fs::write(&cfg.output.dir, "not a directory").unwrap();
        let textfile = root.path().join("campus_energy.prom");
        cfg.metrics = Some(MetricsConfig {
            textfile_path: textfile.clone(),
        });

        let res = run_with_metrics(&cfg, &JsonDashboardRenderer).await;

        assert!(res.is_err());
        assert!(textfile.exists());
    }
}
