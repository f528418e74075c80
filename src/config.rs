use anyhow::{Context, Result};
use reframe_av::{AspectRatio, OutputFormat, Resolution};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub runner: RunnerConfig,

    #[serde(default)]
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Directory converted files are written into
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RunnerConfig {
    /// Seconds to wait for ffmpeg to finish before giving up (default: 30)
    #[serde(default = "default_wait_timeout")]
    pub wait_timeout_secs: u64,

    /// Terminate ffmpeg if it is still running when the wait expires
    #[serde(default)]
    pub kill_on_timeout: bool,
}

fn default_wait_timeout() -> u64 {
    30
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            wait_timeout_secs: default_wait_timeout(),
            kill_on_timeout: false,
        }
    }
}

/// Conversion choices applied when the command line leaves them unset.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DefaultsConfig {
    #[serde(default)]
    pub resolution: Resolution,

    #[serde(default)]
    pub aspect: AspectRatio,

    #[serde(default)]
    pub format: OutputFormat,
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = ["./reframe.toml", "~/.config/reframe/config.toml"];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    if config.runner.wait_timeout_secs == 0 {
        anyhow::bail!("runner.wait_timeout_secs cannot be 0");
    }

    if config.output.dir.as_os_str().is_empty() {
        anyhow::bail!("output.dir cannot be empty");
    }

    Ok(())
}
