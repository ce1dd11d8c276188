//! Autostart CLI - toggle launch-at-login for an application
//!
//! This binary can:
//! - Register an executable to start when the user logs in
//! - Remove that registration
//! - Report whether it is registered and what launch target is stored
//! - Show the configuration in effect

use anyhow::{Context, Result};
use autostart_agent::config::{generate_example_config, get_config_file_path_string};
use autostart_agent::{AppIdentity, AutostartConfig, AutostartManager};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "autostart")]
#[command(version)]
#[command(about = "Enable or disable launch at login for an application")]
#[command(long_about = "
Registers an application to launch at login using the platform's own
mechanism: the HKCU Run key on Windows, a System Events login item on
macOS, or an XDG desktop entry in ~/.config/autostart on Linux.

By default the registration targets this executable. Use --executable
to manage another program:

  autostart --executable /usr/bin/mytool enable
  autostart --executable /usr/bin/mytool status
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Executable to register (defaults to this program)
    #[arg(short, long, global = true)]
    pub executable: Option<PathBuf>,

    /// Registration name (defaults to the executable's file name)
    #[arg(short, long, global = true)]
    pub name: Option<String>,

    /// Config file to use instead of the default location
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for scripting
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the application at login
    #[command(alias = "on")]
    Enable,

    /// Stop launching the application at login
    #[command(alias = "off")]
    Disable,

    /// Show whether the application launches at login
    Status,

    /// Show configuration paths and settings
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for command output
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("autostart={},autostart_agent={}", log_level, log_level).into()
            }),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Enable => cmd_set(&cli, true),
        Commands::Disable => cmd_set(&cli, false),
        Commands::Status => cmd_status(&cli),
        Commands::Config => cmd_config(&cli),
    }
}

fn load_config(cli: &Cli) -> Result<AutostartConfig> {
    let mut config = match &cli.config {
        Some(path) => autostart_agent::load_config_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => autostart_agent::load_config().context("Failed to load config")?,
    };

    if let Some(name) = &cli.name {
        config.app_name = Some(name.clone());
    }

    Ok(config)
}

fn build_manager(cli: &Cli) -> Result<AutostartManager> {
    let config = load_config(cli)?;

    let app = match &cli.executable {
        Some(path) => {
            let path = std::path::absolute(path)
                .with_context(|| format!("Failed to resolve {}", path.display()))?;
            AppIdentity::from_executable(path)?
        }
        None => AppIdentity::current()?,
    };

    tracing::debug!(
        "Managing {} ({}) from {} config",
        app.name(),
        app.executable().display(),
        config.source
    );
    AutostartManager::from_config(app, &config).context("Invalid registration name")
}

fn cmd_set(cli: &Cli, enabled: bool) -> Result<()> {
    let manager = build_manager(cli)?;
    let action = if enabled { "enabled" } else { "disabled" };

    match manager.set_autostart(enabled) {
        Ok(()) => match cli.format {
            OutputFormat::Text => {
                println!("Autostart {} for '{}'", action, manager.application_name());
                if enabled {
                    println!("Launch target: {}", manager.application_path());
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::json!({
                    "status": action,
                    "name": manager.application_name(),
                    "launch_target": manager.application_path(),
                    "platform": manager.platform(),
                }));
            }
        },
        Err(e) => {
            match cli.format {
                OutputFormat::Text => eprintln!("Error: {}", e.user_message()),
                OutputFormat::Json => {
                    println!("{}", serde_json::json!({
                        "status": "error",
                        "reason": e.reason(),
                        "error": e.to_string(),
                    }));
                }
            }
            std::process::exit(1);
        }
    }

    Ok(())
}

fn cmd_status(cli: &Cli) -> Result<()> {
    let manager = build_manager(cli)?;

    // An unreadable store is reported as disabled, with the reason alongside
    let (enabled, read_error) = match manager.try_is_autostart() {
        Ok(enabled) => (enabled, None),
        Err(e) => (false, Some(e)),
    };

    match cli.format {
        OutputFormat::Text => {
            println!("Autostart: {}", if enabled { "enabled" } else { "disabled" });
            println!("Name:      {}", manager.application_name());
            println!("Launch:    {}", manager.application_path());
            println!("Platform:  {}", manager.platform());
            if let Some(e) = &read_error {
                println!();
                println!("Warning: could not read registration ({}): {}", e.reason(), e);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::json!({
                "enabled": enabled,
                "name": manager.application_name(),
                "launch_target": manager.application_path(),
                "platform": manager.platform(),
                "read_error": read_error.map(|e| e.to_string()),
            }));
        }
    }

    Ok(())
}

fn cmd_config(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(get_config_file_path_string);
    let autostart_dir = config
        .autostart_dir
        .as_ref()
        .map(|d| d.display().to_string());

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration");
            println!("=============");
            println!();
            println!("Config file:    {}", config_path);
            println!("Source:         {}", config.source);
            println!(
                "App name:       {}",
                config.app_name.as_deref().unwrap_or("(executable name)")
            );
            println!(
                "Launch flag:    {}",
                config.launch_flag().as_deref().unwrap_or("(none)")
            );
            println!(
                "Autostart dir:  {}",
                autostart_dir.as_deref().unwrap_or("(platform default)")
            );
            println!();
            println!("Environment variables:");
            println!("  AUTOSTART_APP_NAME    - Override registration name");
            println!("  AUTOSTART_LAUNCH_FLAG - Override launch flag (empty disables)");
            println!("  AUTOSTART_DIR         - Override Linux autostart directory");
            println!();
            println!("Example config.toml:");
            println!();
            println!("{}", generate_example_config());
        }
        OutputFormat::Json => {
            println!("{}", serde_json::json!({
                "config_file": config_path,
                "source": config.source.to_string(),
                "app_name": config.app_name,
                "launch_flag": config.launch_flag(),
                "autostart_dir": autostart_dir,
            }));
        }
    }

    Ok(())
}
