use std::path::Path;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

static PROM_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus recorder. Counters recorded before this are lost.
pub fn init() -> Result<(), BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    // Ignore error if the handle was already set; this should only be called once.
    let _ = PROM_HANDLE.set(handle);
    Ok(())
}

/// Write the current metrics in Prometheus text format, for a textfile
/// collector to pick up. No-op when [`init`] was never called.
pub async fn write_textfile(path: &Path) -> std::io::Result<()> {
    match PROM_HANDLE.get() {
        Some(handle) => tokio::fs::write(path, handle.render()).await,
        None => {
            tracing::debug!(path = %path.display(), "metrics recorder not installed, skipping export");
            Ok(())
        }
    }
}
