use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sbtest::DEFAULT_EXECUTABLE;

pub const ENV_SBTEST_DIR: &str = "SBTEST_DIR";
pub const ENV_SBTEST_EXECUTABLE: &str = "SBTEST_EXECUTABLE";
pub const ENV_STORE_TEMPS: &str = "BICLIQUES_STORE_TEMPS";
pub const ENV_TEMP_DIR: &str = "BICLIQUES_TEMP_DIR";

/// Where the enumerator lives and where the transient files go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sbtest_dir: PathBuf,
    /// Resolved against `sbtest_dir` if relative
    pub executable: String,

    pub temp_dir: Option<PathBuf>,
    pub input_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub sizes_path: Option<PathBuf>,
    pub store_temps: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sbtest_dir: PathBuf::from("."),
            executable: DEFAULT_EXECUTABLE.to_string(),
            temp_dir: None,
            input_path: None,
            output_path: None,
            sizes_path: None,
            store_temps: false,
        }
    }
}

impl Config {
    pub fn new(sbtest_dir: impl Into<PathBuf>) -> Self {
        Self {
            sbtest_dir: sbtest_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_store_temps(mut self, store_temps: bool) -> Self {
        self.store_temps = store_temps;
        self
    }

    /// Reads the configuration from the environment; a `.env` file in the
    /// working directory is honoured.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(dir) = var(ENV_SBTEST_DIR) {
            config.sbtest_dir = PathBuf::from(dir);
        }

        if let Some(executable) = var(ENV_SBTEST_EXECUTABLE) {
            config.executable = executable;
        }

        if let Some(dir) = var(ENV_TEMP_DIR) {
            config.temp_dir = Some(PathBuf::from(dir));
        }

        if let Some(flag) = var(ENV_STORE_TEMPS) {
            config.store_temps = parse_flag(&flag).ok_or_else(|| {
                Error::InvalidInput(format!("{ENV_STORE_TEMPS} must be a boolean, got '{flag}'"))
            })?;
        }

        Ok(config)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
