use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub const CONFIG_ENV: &str = "CAMPUS_ENERGY_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "campus-energy.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub data_dir: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub log_file: String,
    pub summary_file: String,
    pub dashboard_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
            log_file: "log.txt".to_string(),
            summary_file: "summary.txt".to_string(),
            dashboard_file: "dashboard.json".to_string(),
        }
    }
}

impl OutputConfig {
    pub fn log_path(&self) -> PathBuf {
        self.dir.join(&self.log_file)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.dir.join(&self.summary_file)
    }

    pub fn dashboard_path(&self) -> PathBuf {
        self.dir.join(&self.dashboard_file)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Files read concurrently. Output order does not depend on this.
    pub workers: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self { workers: 4 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub peak_hours: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self { peak_hours: 50 }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    /// Prometheus text file written at the end of the run.
    pub textfile_path: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub loader: LoaderConfig,
    pub dashboard: DashboardConfig,
    pub metrics: Option<MetricsConfig>,
}

impl AppConfig {
    /// Load from `$CAMPUS_ENERGY_CONFIG`, else `campus-energy.toml` if present,
    /// else built-in defaults.
    pub fn load() -> anyhow::Result<Self> {
        match env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(path),
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::from_file(DEFAULT_CONFIG_PATH),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config {}: {e}", path.display()))?;
        let cfg = toml::from_str(&contents)?;
        Ok(cfg)
    }
}
