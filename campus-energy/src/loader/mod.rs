//! Directory loading: discovery, per-file ingestion and the diagnostic log.

use std::path::{Path, PathBuf};

use energy_domain::{Fragment, Reading};
use futures::{StreamExt, TryStreamExt};

use crate::{
    pipeline::{PipelineError, Source},
    sources::BuildingCsvFileSource,
};

/// Whole-file load failures, one line each, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticLog {
    lines: Vec<String>,
}

impl DiagnosticLog {
    pub fn push(&mut self, line: String) {
        self.lines.push(line);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn render(&self) -> String {
        self.lines.iter().map(|l| format!("{l}\n")).collect()
    }

    /// Write the log to `path`, replacing any previous content.
    pub async fn write_to(&self, path: &Path) -> Result<(), PipelineError> {
        tokio::fs::write(path, self.render())
            .await
            .map_err(|source| PipelineError::Diagnostics {
                path: path.to_path_buf(),
                source,
            })
    }
}

#[derive(Debug)]
pub struct LoadOutcome {
    pub fragments: Vec<Fragment>,
    pub diagnostics: DiagnosticLog,
}

/// Files in `dir` (not recursive) matching `*.csv`, sorted by name.
///
/// Symlinks are followed; anything that does not resolve to a regular file is
/// ignored. An unreadable or missing directory yields no files. Blocking.
pub fn discover_csv_files(dir: &Path) -> Vec<PathBuf> {
    let escaped = PathBuf::from(glob::Pattern::escape(&dir.to_string_lossy()));
    let pattern = escaped.join("*.csv");

    let paths = match glob::glob(&pattern.to_string_lossy()) {
        Ok(paths) => paths,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "cannot build csv pattern for data directory");
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = paths
        .filter_map(|res| match res {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable directory entry");
                None
            }
        })
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    files
}

/// Load every reading of one file, or fail for the whole file.
pub async fn load_file(path: &Path) -> Result<Fragment, PipelineError> {
    let source = BuildingCsvFileSource::for_file(path);
    let readings: Vec<Reading> = source.stream().await.try_collect().await?;
    Ok(Fragment::new(source.building(), path, readings))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Load all CSV files in `dir` and write the diagnostic log to `diagnostics_path`.
///
/// Up to `workers` files are read concurrently; fragments and diagnostic lines
/// still come out in discovery order. Per-file failures only produce
/// diagnostics; the only error returned is failing to write the log.
pub async fn load_directory(
    dir: &Path,
    diagnostics_path: &Path,
    workers: usize,
) -> Result<LoadOutcome, PipelineError> {
    let files = {
        let dir = dir.to_path_buf();
        tokio::task::spawn_blocking(move || discover_csv_files(&dir))
            .await
            .map_err(|e| PipelineError::Source(format!("csv discovery task failed: {e}")))?
    };
    tracing::info!(dir = %dir.display(), files = files.len(), "discovered csv files");

    let results: Vec<(PathBuf, Result<Fragment, PipelineError>)> = futures::stream::iter(files)
        .map(|path| async move {
            let res = load_file(&path).await;
            (path, res)
        })
        .buffered(workers.max(1))
        .collect()
        .await;

    let mut fragments = Vec::with_capacity(results.len());
    let mut diagnostics = DiagnosticLog::default();

    for (path, res) in results {
        let name = display_name(&path);
        match res {
            Ok(fragment) => {
                tracing::info!(file = %name, building = %fragment.building, rows = fragment.len(), "loaded file");
                metrics::counter!("energy_files_loaded_total").increment(1);
                metrics::counter!("energy_rows_loaded_total").increment(fragment.len() as u64);
                fragments.push(fragment);
            }
            Err(e) => {
                tracing::warn!(file = %name, error = %e, "skipping file");
                metrics::counter!("energy_files_skipped_total").increment(1);
                diagnostics.push(e.diagnostic(&name));
            }
        }
    }

    diagnostics.write_to(diagnostics_path).await?;

    Ok(LoadOutcome {
        fragments,
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, contents: &str) {
        std::fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn discovery_is_sorted_non_recursive_and_csv_only() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "b.csv", "");
        write(dir.path(), "a.csv", "");
        write(dir.path(), "notes.txt", "");
        write(dir.path(), "upper.CSV", "");
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        write(&dir.path().join("nested"), "c.csv", "");
        std::fs::create_dir(dir.path().join("dir.csv")).unwrap();

        let names: Vec<String> = discover_csv_files(dir.path())
            .iter()
            .map(|p| display_name(p))
            .collect();
        assert_eq!(names, vec!["a.csv", "b.csv"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlinked_csv_files_are_loaded() {
        let dir = TempDir::new().unwrap();
        let exports = dir.path().join("exports");
        let data = dir.path().join("data");
        std::fs::create_dir(&exports).unwrap();
        std::fs::create_dir(&data).unwrap();
        write(&exports, "library-2024.csv", "timestamp,kwh\n2024-01-01 00:00,6\n");
        std::os::unix::fs::symlink(exports.join("library-2024.csv"), data.join("library.csv")).unwrap();
        std::os::unix::fs::symlink(exports.join("gone.csv"), data.join("dangling.csv")).unwrap();
        let log = dir.path().join("log.txt");

        assert_eq!(discover_csv_files(&data), vec![data.join("library.csv")]);

        let outcome = load_directory(&data, &log, 1).await.unwrap();
        assert_eq!(outcome.fragments.len(), 1);
        assert_eq!(outcome.fragments[0].building, "library");
        assert_eq!(outcome.fragments[0].total_kwh(), 6.0);
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn discovery_escapes_pattern_characters_in_directory() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("meters [2024]");
        std::fs::create_dir(&data).unwrap();
        write(&data, "hall.csv", "");

        assert_eq!(discover_csv_files(&data), vec![data.join("hall.csv")]);
    }

    #[test]
    fn discovery_of_missing_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(discover_csv_files(&dir.path().join("missing")).is_empty());
    }

    #[tokio::test]
    async fn schema_failures_are_logged_once_and_contribute_nothing() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("data");
        std::fs::create_dir(&data).unwrap();
        write(&data, "admin.csv", "time,kwh\n2024-01-01 00:00,5\n");
        write(&data, "gym.csv", "timestamp,kwh\n2024-01-01 00:00,2\n");
        let log = dir.path().join("log.txt");

        let outcome = load_directory(&data, &log, 1).await.unwrap();

        assert_eq!(outcome.fragments.len(), 1);
        assert_eq!(outcome.fragments[0].building, "gym");
        assert_eq!(outcome.diagnostics.lines(), ["admin.csv: Missing required columns."]);
        assert_eq!(
            std::fs::read_to_string(&log).unwrap(),
            "admin.csv: Missing required columns.\n"
        );
    }

    #[tokio::test]
    async fn bad_rows_are_dropped_without_diagnostics() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "lab.csv",
            "timestamp,kwh\nnot-a-time,5\n2024-01-01 00:00,0\n2024-01-01 01:00,\n",
        );
        let log = dir.path().join("log.txt");

        let outcome = load_directory(dir.path(), &log, 2).await.unwrap();

        assert!(outcome.diagnostics.is_empty());
        assert_eq!(outcome.fragments.len(), 1);
        assert_eq!(outcome.fragments[0].len(), 1);
        assert_eq!(outcome.fragments[0].readings[0].kwh, 0.0);
        assert_eq!(std::fs::read_to_string(&log).unwrap(), "");
    }

    #[tokio::test]
    async fn unexpected_errors_are_logged_with_message() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("broken.csv"), b"timestamp,kwh\n2024-01-01 00:00,\xff\n").unwrap();
        write(dir.path(), "empty.csv", "");
        let log = dir.path().join("log.txt");

        let outcome = load_directory(dir.path(), &log, 4).await.unwrap();

        assert!(outcome.fragments.is_empty());
        assert_eq!(outcome.diagnostics.len(), 2);
        assert!(outcome.diagnostics.lines()[0].starts_with("broken.csv: Error - failed to read CSV record"));
        assert!(outcome.diagnostics.lines()[0].ends_with('.'));
        assert_eq!(
            outcome.diagnostics.lines()[1],
            "empty.csv: Error - No columns to parse from file."
        );
    }

    #[tokio::test]
    async fn fragments_keep_discovery_order_with_many_workers() {
        let dir = TempDir::new().unwrap();
        for name in ["d", "a", "c", "b"] {
            write(dir.path(), &format!("{name}.csv"), "timestamp,kwh\n2024-01-01 00:00,1\n");
        }
        let log = dir.path().join("log.txt");

        let outcome = load_directory(dir.path(), &log, 8).await.unwrap();
        let buildings: Vec<&str> = outcome.fragments.iter().map(|f| f.building.as_str()).collect();
        assert_eq!(buildings, vec!["a", "b", "c", "d"]);
    }

    #[tokio::test]
    async fn merged_total_of_loaded_files_equals_fragment_totals() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "north.csv",
            "timestamp,kwh\n2024-01-01 00:00,1.25\n2024-01-01 01:00,0\n2024-01-02 00:00,7.5\n",
        );
        write(
            dir.path(),
            "south.csv",
            "timestamp,kwh,meter\n2024-01-01 00:30,3.75,s1\nbroken,9,s1\n2024-01-03 00:00,2,s1\n",
        );
        let log = dir.path().join("log.txt");

        let outcome = load_directory(dir.path(), &log, 2).await.unwrap();
        assert_eq!(outcome.fragments.len(), 2);
        let fragment_total: f64 = outcome.fragments.iter().map(Fragment::total_kwh).sum();
        let rows: usize = outcome.fragments.iter().map(Fragment::len).sum();

        let crate::merge::Merged::Dataset(ds) = crate::merge::merge(outcome.fragments) else {
            panic!("expected a dataset");
        };
        assert_eq!(ds.len(), rows);
        assert_eq!(ds.total_kwh(), fragment_total);
        assert_eq!(ds.total_kwh(), 14.5);
    }

    #[tokio::test]
    async fn diagnostics_file_is_truncated_each_run() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("data");
        std::fs::create_dir(&data).unwrap();
        let log = dir.path().join("log.txt");
        std::fs::write(&log, "stale line\n").unwrap();

        let outcome = load_directory(&data, &log, 1).await.unwrap();

        assert!(outcome.fragments.is_empty());
        assert_eq!(std::fs::read_to_string(&log).unwrap(), "");
    }

    #[tokio::test]
    async fn unwritable_diagnostics_path_is_an_error() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("missing-dir").join("log.txt");

        let err = load_directory(dir.path(), &log, 1).await.unwrap_err();
        assert!(matches!(err, PipelineError::Diagnostics { .. }));
    }
}
