use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub data: DataConfig,
    pub report: ReportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    /// Directory holding the six CSV sources
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    pub year: i32,
    #[serde(default)]
    pub month: Option<u32>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
        }
    }
}

fn default_log_dir() -> String {
    "target/logs".to_string()
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[data]
path = "ecommerce_data/"

[report]
year = 2023

[logging]
dir = "target/logs"
"#;

/// Load configuration.
///
/// Search order:
/// 1. Explicit path (fails if it cannot be read)
/// 2. config.toml next to the executable
/// 3. Embedded default config
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    if let Some(path) = explicit {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read config {}: {e}", path.display()))?;
        return parse_config(&contents);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");
            if config_path.exists() {
                let contents = std::fs::read_to_string(&config_path)?;
                return parse_config(&contents);
            }
        }
    }

    parse_config(DEFAULT_CONFIG)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    if let Some(month) = config.report.month {
        if !(1..=12).contains(&month) {
            anyhow::bail!("report.month must be between 1 and 12, got {month}");
        }
    }
    Ok(config)
}

/// Resolve the data directory. Relative paths are taken from the current
/// working directory.
pub fn resolve_data_path(config: &Config) -> anyhow::Result<PathBuf> {
    let data_path = Path::new(&config.data.path);
    if data_path.is_absolute() {
        return Ok(data_path.to_path_buf());
    }
    Ok(std::env::current_dir()?.join(data_path))
}
