//! Autostart Agent Library
//!
//! Registers an application to launch when the user logs in:
//! - Windows: value under `HKCU\Software\Microsoft\Windows\CurrentVersion\Run`
//! - macOS: System Events login item for the `.app` bundle
//! - Linux: XDG desktop entry in `~/.config/autostart`
//!
//! Other targets get a no-op that always reports "not registered".
//!
//! # Features
//!
//! - `mock`: in-memory registry and login-item stores for tests
//!
//! # Example
//!
//! ```no_run
//! use autostart_agent::AutostartManager;
//!
//! fn main() -> autostart_agent::Result<()> {
//!     let manager = AutostartManager::new()?;
//!     if !manager.is_autostart() {
//!         manager.set_autostart(true)?;
//!     }
//!     println!("{} -> {}", manager.application_name(), manager.application_path());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod identity;
pub mod manager;
pub mod platform;
pub mod strategy;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use config::{AutostartConfig, ConfigSource, load_config, load_config_from};
pub use error::{AutostartError, FailureReason, Result};
pub use identity::{AppIdentity, DEFAULT_LAUNCH_FLAG};
pub use manager::AutostartManager;
pub use platform::Platform;
pub use strategy::{AutostartStrategy, NoopStrategy};
