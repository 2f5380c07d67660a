/// Runtime configuration.
///
/// Loaded from `meetbout.toml` in the working directory. Every field has
/// a default, so a missing file simply means "run with defaults"; a file
/// that exists but does not parse is an error and aborts the run.

use serde::Deserialize;
use std::error::Error;
use std::path::Path;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "./meetbout.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the meetbouten dataset on the Amsterdam Data API.
    pub base_url: String,
    /// Page size for the device listing. Must be large enough to return
    /// every meetbout of a street in a single page.
    pub page_size: u32,
    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the CSV file to write.
    pub path: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api: ApiConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: "https://api.data.amsterdam.nl/v1/meetbouten".to_string(),
            page_size: 100,
            timeout_secs: 30,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            path: "output.csv".to_string(),
        }
    }
}

/// Loads the configuration from `path`, falling back to defaults when
/// the file does not exist.
pub fn load_config(path: &str) -> Result<Config, Box<dyn Error>> {
    if !Path::new(path).exists() {
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
