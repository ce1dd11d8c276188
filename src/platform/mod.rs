//! Per-platform autostart mechanisms.
//!
//! - Windows: `HKCU\Software\Microsoft\Windows\CurrentVersion\Run`
//! - macOS: System Events login items via `osascript`
//! - Linux: XDG desktop entry in `~/.config/autostart`
//!
//! The strategies compile on every target so their logic can be tested
//! against in-memory stores; only the OS bindings are gated.

pub mod linux;
pub mod macos;
pub mod windows;

use crate::config::AutostartConfig;
use crate::strategy::AutostartStrategy;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
    Unsupported,
}

impl Platform {
    /// Platform this binary was compiled for
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else {
            Platform::Unsupported
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Windows => write!(f, "windows"),
            Platform::MacOs => write!(f, "macos"),
            Platform::Linux => write!(f, "linux"),
            Platform::Unsupported => write!(f, "unsupported"),
        }
    }
}

#[cfg(target_os = "windows")]
pub fn native_strategy(_config: &AutostartConfig) -> Box<dyn AutostartStrategy> {
    Box::new(windows::RunKeyStrategy::new(windows::RegistryRunKey::default()))
}

#[cfg(target_os = "macos")]
pub fn native_strategy(_config: &AutostartConfig) -> Box<dyn AutostartStrategy> {
    Box::new(macos::LoginItemStrategy::new(macos::OsascriptLoginItems::default()))
}

#[cfg(target_os = "linux")]
pub fn native_strategy(config: &AutostartConfig) -> Box<dyn AutostartStrategy> {
    match &config.autostart_dir {
        Some(dir) => Box::new(linux::DesktopEntryStrategy::new(dir.clone())),
        None => Box::new(linux::DesktopEntryStrategy::from_environment()),
    }
}

#[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
pub fn native_strategy(_config: &AutostartConfig) -> Box<dyn AutostartStrategy> {
    Box::new(crate::strategy::NoopStrategy)
}
