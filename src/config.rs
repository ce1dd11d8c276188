use crate::error::{AutostartError, Result};
use crate::identity::{DEFAULT_LAUNCH_FLAG, validate_name};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the registration name
const ENV_APP_NAME: &str = "AUTOSTART_APP_NAME";

/// Environment variable overriding the launch flag (empty disables it)
const ENV_LAUNCH_FLAG: &str = "AUTOSTART_LAUNCH_FLAG";

/// Environment variable overriding the Linux autostart directory
const ENV_AUTOSTART_DIR: &str = "AUTOSTART_DIR";

/// Configuration file structure
#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    autostart: Option<AutostartSection>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct AutostartSection {
    /// Registry value name / desktop file stem (defaults to the executable name)
    app_name: Option<String>,
    /// Trailing argument stored with the launch command
    launch_flag: Option<String>,
    /// Directory holding XDG autostart entries (Linux)
    autostart_dir: Option<PathBuf>,
}

/// Runtime autostart configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AutostartConfig {
    /// Overrides the name derived from the executable
    pub app_name: Option<String>,
    /// Appended to the stored command line; empty stores a bare path
    pub launch_flag: String,
    /// Overrides `~/.config/autostart` on Linux
    pub autostart_dir: Option<PathBuf>,
    /// Highest-priority layer that set a value (for display)
    pub source: ConfigSource,
}

impl Default for AutostartConfig {
    fn default() -> Self {
        Self {
            app_name: None,
            launch_flag: DEFAULT_LAUNCH_FLAG.to_string(),
            autostart_dir: None,
            source: ConfigSource::Default,
        }
    }
}

impl AutostartConfig {
    /// The launch flag, or `None` when disabled
    pub fn launch_flag(&self) -> Option<String> {
        let flag = self.launch_flag.trim();
        (!flag.is_empty()).then(|| flag.to_string())
    }
}

/// Where the configuration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// Using default hardcoded values
    Default,
    /// Loaded from config file
    ConfigFile,
    /// Loaded from environment variable
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::ConfigFile => write!(f, "config file"),
            ConfigSource::Environment => write!(f, "environment variable"),
        }
    }
}

/// Get the path to the configuration file
pub fn get_config_file_path() -> Option<PathBuf> {
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .map(|p| p.join("autostart-agent").join("config.toml"))
}

/// Get the path to the config file for documentation purposes
pub fn get_config_file_path_string() -> String {
    get_config_file_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "~/.config/autostart-agent/config.toml".to_string())
}

fn parse_config_file(content: &str) -> Result<ConfigFile> {
    let file: ConfigFile =
        toml::from_str(content).map_err(|e| AutostartError::Config(e.to_string()))?;

    let name = file.autostart.as_ref().and_then(|s| s.app_name.as_deref());
    if let Some(name) = name.filter(|n| !n.trim().is_empty()) {
        config_name(name)?;
    }
    Ok(file)
}

/// A configured name must be usable as a single file name
fn config_name(name: &str) -> Result<String> {
    validate_name(name).map_err(|e| AutostartError::Config(format!("app_name: {}", e)))
}

/// Load the default config file, ignoring it (with a warning) when it is
/// missing or malformed
fn load_default_config_file() -> Option<ConfigFile> {
    let path = get_config_file_path()?;

    if !path.exists() {
        return None;
    }

    match fs::read_to_string(&path) {
        Ok(content) => match parse_config_file(&content) {
            Ok(config) => {
                tracing::debug!("Loaded config from {:?}", path);
                Some(config)
            }
            Err(e) => {
                tracing::warn!("Failed to parse config file {:?}: {}", path, e);
                None
            }
        },
        Err(e) => {
            tracing::warn!("Failed to read config file {:?}: {}", path, e);
            None
        }
    }
}

/// Load configuration with priority:
/// 1. Environment variables (AUTOSTART_APP_NAME, AUTOSTART_LAUNCH_FLAG, AUTOSTART_DIR)
/// 2. Config file (~/.config/autostart-agent/config.toml)
/// 3. Default values
///
/// A malformed default file is ignored; an invalid environment value is an
/// error.
pub fn load_config() -> Result<AutostartConfig> {
    resolve(load_default_config_file(), |key| std::env::var(key).ok())
}

/// Load configuration from an explicit file. Unlike [`load_config`], a
/// missing or malformed file is an error.
pub fn load_config_from(path: &Path) -> Result<AutostartConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        AutostartError::io(format!("Failed to read config file {}", path.display()), e)
    })?;
    let file = parse_config_file(&content)?;
    tracing::debug!("Loaded config from {:?}", path);
    resolve(Some(file), |key| std::env::var(key).ok())
}

fn resolve(
    file: Option<ConfigFile>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<AutostartConfig> {
    let mut config = AutostartConfig::default();

    if let Some(section) = file.and_then(|f| f.autostart) {
        if let Some(name) = section.app_name.filter(|n| !n.trim().is_empty()) {
            config.app_name = Some(config_name(&name)?);
            config.source = ConfigSource::ConfigFile;
        }
        if let Some(flag) = section.launch_flag {
            config.launch_flag = flag;
            config.source = ConfigSource::ConfigFile;
        }
        if let Some(dir) = section.autostart_dir {
            config.autostart_dir = Some(dir);
            config.source = ConfigSource::ConfigFile;
        }
    }

    if let Some(name) = env(ENV_APP_NAME).filter(|n| !n.trim().is_empty()) {
        let name = config_name(&name)?;
        tracing::info!("Using app name from environment variable: {}", name);
        config.app_name = Some(name);
        config.source = ConfigSource::Environment;
    }
    if let Some(flag) = env(ENV_LAUNCH_FLAG) {
        config.launch_flag = flag;
        config.source = ConfigSource::Environment;
    }
    if let Some(dir) = env(ENV_AUTOSTART_DIR).filter(|d| !d.trim().is_empty()) {
        config.autostart_dir = Some(PathBuf::from(dir.trim()));
        config.source = ConfigSource::Environment;
    }

    Ok(config)
}

/// Generate example config file content
pub fn generate_example_config() -> String {
    r#"# Autostart Agent Configuration
# Place this file at: ~/.config/autostart-agent/config.toml

[autostart]
# Name used for the registry value / desktop file
# Default: the executable's file name
# app_name = "MyTool"

# Argument appended to the launch command so the app starts hidden.
# Set to "" to register a bare path. Ignored for macOS login items.
# launch_flag = "--autostart"

# Linux only: where desktop entries are written
# Default: $XDG_CONFIG_HOME/autostart or ~/.config/autostart
# autostart_dir = "/home/me/.config/autostart"
"#
    .to_string()
}
