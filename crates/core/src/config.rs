use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

/// Default chat-completions endpoint (Gemini's OpenAI-compatible surface)
pub const DEFAULT_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/openai/chat/completions";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seconds between the end of one cycle and the start of the next
    pub tick_secs: u64,

    /// Width of the CPU measurement window in milliseconds
    pub cpu_sample_ms: u64,

    /// Number of snapshots kept in the history
    pub history_len: usize,

    /// Number of top CPU consumers recorded per snapshot
    pub top_processes: usize,

    /// Paths whose disk usage is recorded
    pub disk_paths: Vec<String>,

    pub thresholds: ThresholdPolicy,

    pub reasoning: ReasoningConfig,

    /// Clear the terminal before each status line
    pub clear_screen: bool,

    /// Offer to execute proposed kill actions after operator confirmation
    pub allow_remediation: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_secs: 2,
            cpu_sample_ms: 1000,
            history_len: 12,
            top_processes: 5,
            disk_paths: vec!["/".to_string()],
            thresholds: ThresholdPolicy::default(),
            reasoning: ReasoningConfig::default(),
            clear_screen: true,
            allow_remediation: false,
        }
    }
}

/// Named limits a snapshot is checked against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdPolicy {
    pub cpu_percent: f32,
    pub memory_percent: f32,
    pub disk_percent: Option<f32>,
    pub temperature_celsius: Option<f32>,
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self {
            cpu_percent: 5.0,
            memory_percent: 80.0,
            disk_percent: None,
            temperature_celsius: None,
        }
    }
}

/// Connection settings for the reasoning service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReasoningConfig {
    pub endpoint: String,
    pub model: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub timeout_secs: u64,
    pub max_output_tokens: u32,
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            timeout_secs: 30,
            max_output_tokens: 500,
        }
    }
}

impl ReasoningConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

impl Config {
    /// Load configuration from multiple sources in order of preference:
    /// 1. CLI arguments override everything
    /// 2. JSON config file if specified
    /// 3. Default config file locations
    /// 4. Built-in defaults
    pub fn load(cli_config: Option<&CliConfig>, json_path: Option<&PathBuf>) -> Result<Self> {
        let mut config = match json_path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::load_default_config()?.unwrap_or_default(),
        };

        if let Some(cli) = cli_config {
            config.apply_cli_overrides(cli);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific JSON file
    pub fn load_from_file(path: &PathBuf) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CoreError::config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            CoreError::config(format!("Failed to parse config file {}: {}", path.display(), e))
        })
    }

    fn load_default_config() -> Result<Option<Self>> {
        Self::load_first_existing(&Self::default_config_paths())
    }

    /// Load the first path that exists. A file that exists but cannot be
    /// read or parsed is an error, never skipped.
    fn load_first_existing(paths: &[PathBuf]) -> Result<Option<Self>> {
        for path in paths {
            if !path.exists() {
                continue;
            }
            let config = Self::load_from_file(path)?;
            log::info!("Loaded configuration from {}", path.display());
            return Ok(Some(config));
        }

        Ok(None)
    }

    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("sysdiag").join("config.json"));
        }

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".sysdiag.json"));
        }

        paths.push(PathBuf::from("sysdiag.json"));

        paths
    }

    fn apply_cli_overrides(&mut self, cli: &CliConfig) {
        if let Some(cpu) = cli.cpu_threshold {
            self.thresholds.cpu_percent = cpu;
        }
        if let Some(memory) = cli.memory_threshold {
            self.thresholds.memory_percent = memory;
        }
        if let Some(history) = cli.history_len {
            self.history_len = history;
        }
        if let Some(tick) = cli.tick_secs {
            self.tick_secs = tick;
        }
        if let Some(endpoint) = &cli.endpoint {
            self.reasoning.endpoint = endpoint.clone();
        }
        if let Some(model) = &cli.model {
            self.reasoning.model = model.clone();
        }
        if cli.no_clear {
            self.clear_screen = false;
        }
        if cli.allow_remediation {
            self.allow_remediation = true;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !(1..=3600).contains(&self.tick_secs) {
            return Err(CoreError::config("Tick interval must be between 1 and 3600 seconds"));
        }

        if !(100..=10_000).contains(&self.cpu_sample_ms) {
            return Err(CoreError::config(
                "CPU sample window must be between 100 and 10000 milliseconds",
            ));
        }

        if !(1..=1024).contains(&self.history_len) {
            return Err(CoreError::config("History length must be between 1 and 1024"));
        }

        if !(1..=50).contains(&self.top_processes) {
            return Err(CoreError::config("Top process count must be between 1 and 50"));
        }

        if self.disk_paths.iter().any(|p| p.trim().is_empty()) {
            return Err(CoreError::config("Disk paths must not be empty"));
        }

        self.thresholds.validate()?;
        self.reasoning.validate()?;

        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_secs)
    }

    pub fn cpu_sample_interval(&self) -> Duration {
        Duration::from_millis(self.cpu_sample_ms)
    }
}

impl ThresholdPolicy {
    fn validate(&self) -> Result<()> {
        check_percent("CPU threshold", self.cpu_percent)?;
        check_percent("Memory threshold", self.memory_percent)?;
        if let Some(disk) = self.disk_percent {
            check_percent("Disk threshold", disk)?;
        }
        if let Some(temp) = self.temperature_celsius {
            if !(temp.is_finite() && temp > 0.0 && temp <= 200.0) {
                return Err(CoreError::config(format!(
                    "Temperature threshold must be in (0, 200] degrees, got {}",
                    temp
                )));
            }
        }
        Ok(())
    }
}

fn check_percent(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(CoreError::config(format!("{} must be between 0 and 100, got {}", name, value)))
    }
}

impl ReasoningConfig {
    fn validate(&self) -> Result<()> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(CoreError::config(format!(
                "Reasoning endpoint must be an http(s) URL, got '{}'",
                self.endpoint
            )));
        }
        if self.model.trim().is_empty() {
            return Err(CoreError::config("Reasoning model must not be empty"));
        }
        if !(1..=300).contains(&self.timeout_secs) {
            return Err(CoreError::config("Reasoning timeout must be between 1 and 300 seconds"));
        }
        if !(1..=8192).contains(&self.max_output_tokens) {
            return Err(CoreError::config("Max output tokens must be between 1 and 8192"));
        }
        Ok(())
    }
}

/// CLI configuration (temporary struct for CLI parsing)
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub cpu_threshold: Option<f32>,
    pub memory_threshold: Option<f32>,
    pub history_len: Option<usize>,
    pub tick_secs: Option<u64>,
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub no_clear: bool,
    pub allow_remediation: bool,
}
