//! The launch-at-login facade used by host applications.

use crate::config::AutostartConfig;
use crate::error::Result;
use crate::identity::AppIdentity;
use crate::platform::{self, Platform};
use crate::strategy::AutostartStrategy;

/// Queries and toggles the login registration of one application.
///
/// Nothing is cached: every call reads or writes the OS store, so the
/// answer reflects changes made by other processes too.
pub struct AutostartManager {
    app: AppIdentity,
    strategy: Box<dyn AutostartStrategy>,
}

impl AutostartManager {
    /// Manager for the running executable using this platform's mechanism
    pub fn new() -> Result<Self> {
        Self::from_config(AppIdentity::current()?, &AutostartConfig::default())
    }

    /// Manager for `app` with configuration overrides applied. Fails when the
    /// configured name is not a plain file name.
    pub fn from_config(app: AppIdentity, config: &AutostartConfig) -> Result<Self> {
        let mut app = app.with_launch_flag(config.launch_flag());
        if let Some(name) = &config.app_name {
            app = app.with_name(name.clone())?;
        }
        Ok(Self::with_strategy(app, platform::native_strategy(config)))
    }

    pub fn with_strategy(app: AppIdentity, strategy: Box<dyn AutostartStrategy>) -> Self {
        Self { app, strategy }
    }

    pub fn platform(&self) -> Platform {
        self.strategy.platform()
    }

    pub fn identity(&self) -> &AppIdentity {
        &self.app
    }

    /// Whether the application is registered. Read failures count as "no".
    pub fn is_autostart(&self) -> bool {
        match self.try_is_autostart() {
            Ok(registered) => registered,
            Err(e) => {
                tracing::debug!("Could not read autostart state for {}: {}", self.app.name(), e);
                false
            }
        }
    }

    /// Like [`is_autostart`](Self::is_autostart), but reports why the read failed
    pub fn try_is_autostart(&self) -> Result<bool> {
        self.strategy.is_registered(&self.app)
    }

    /// Install or remove the registration. Enabling an enabled app rewrites
    /// it with the current path; disabling a disabled app succeeds.
    pub fn set_autostart(&self, enabled: bool) -> Result<()> {
        let result = if enabled {
            self.strategy.register(&self.app)
        } else {
            self.strategy.unregister(&self.app)
        };

        match &result {
            Ok(()) => tracing::info!(
                "Autostart {} for {}",
                if enabled { "enabled" } else { "disabled" },
                self.app.name()
            ),
            Err(e) => tracing::warn!(
                "Failed to {} autostart for {} ({}): {}",
                if enabled { "enable" } else { "disable" },
                self.app.name(),
                e.reason(),
                e
            ),
        }

        result
    }

    /// Launch target as stored by this platform
    pub fn application_path(&self) -> String {
        self.app.application_path(self.platform())
    }

    pub fn application_name(&self) -> String {
        self.app.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureReason;
    use crate::mock::{MemoryLoginItems, MemoryRunKey};
    use crate::platform::linux::DesktopEntryStrategy;
    use crate::platform::macos::LoginItemStrategy;
    use crate::platform::windows::RunKeyStrategy;
    use crate::strategy::NoopStrategy;

    fn app(path: &str) -> AppIdentity {
        AppIdentity::from_executable(path).unwrap()
    }

    fn assert_round_trip(manager: &AutostartManager) {
        assert!(!manager.is_autostart());

        manager.set_autostart(true).unwrap();
        assert!(manager.is_autostart());
        manager.set_autostart(true).unwrap();
        assert!(manager.is_autostart());

        manager.set_autostart(false).unwrap();
        assert!(!manager.is_autostart());
        manager.set_autostart(false).unwrap();
        assert!(!manager.is_autostart());
    }

    #[test]
    fn test_round_trip_windows() {
        let manager = AutostartManager::with_strategy(
            app("C:/Tools/tool.exe"),
            Box::new(RunKeyStrategy::new(MemoryRunKey::default())),
        );
        assert_round_trip(&manager);
    }

    #[test]
    fn test_round_trip_macos() {
        let manager = AutostartManager::with_strategy(
            app("/Applications/Foo.app/Contents/MacOS/foo"),
            Box::new(LoginItemStrategy::new(MemoryLoginItems::default())),
        );
        assert_round_trip(&manager);
        assert_eq!(manager.application_path(), "/Applications/Foo.app");
    }

    #[test]
    fn test_round_trip_linux() {
        let tmp = tempfile::tempdir().expect("temp");
        let manager = AutostartManager::with_strategy(
            app("/usr/bin/mytool"),
            Box::new(DesktopEntryStrategy::new(tmp.path())),
        );
        assert_round_trip(&manager);
        assert_eq!(manager.application_path(), "/usr/bin/mytool --autostart");
    }

    #[test]
    fn test_unsupported_platform_never_registers() {
        let manager =
            AutostartManager::with_strategy(app("/opt/app/MyTool"), Box::new(NoopStrategy));

        assert!(manager.set_autostart(true).is_ok());
        assert!(!manager.is_autostart());
        assert!(manager.set_autostart(false).is_ok());
        assert!(!manager.is_autostart());
        assert_eq!(manager.application_path(), "");
        assert_eq!(manager.application_name(), "MyTool");
    }

    #[test]
    fn test_read_failure_reports_not_registered() {
        let manager = AutostartManager::with_strategy(
            app("C:/Tools/tool.exe"),
            Box::new(RunKeyStrategy::new(MemoryRunKey::failing())),
        );

        assert!(!manager.is_autostart());
        assert_eq!(
            manager.try_is_autostart().unwrap_err().reason(),
            FailureReason::Permission
        );
        assert_eq!(
            manager.set_autostart(true).unwrap_err().reason(),
            FailureReason::Permission
        );
    }

    #[test]
    fn test_config_overrides_name_and_flag() {
        let tmp = tempfile::tempdir().expect("temp");
        let config = AutostartConfig {
            app_name: Some("Renamed".to_string()),
            launch_flag: String::new(),
            autostart_dir: Some(tmp.path().to_path_buf()),
            ..AutostartConfig::default()
        };
        let manager = AutostartManager::from_config(app("/opt/app/MyTool"), &config).unwrap();

        assert_eq!(manager.application_name(), "Renamed");
        assert_eq!(manager.identity().launch_flag(), None);
    }

    #[test]
    fn test_config_name_cannot_leave_autostart_dir() {
        let tmp = tempfile::tempdir().expect("temp");
        let entries = tmp.path().join("autostart");
        let config = AutostartConfig {
            app_name: Some("../escaped".to_string()),
            autostart_dir: Some(entries.clone()),
            ..AutostartConfig::default()
        };

        let result = AutostartManager::from_config(app("/opt/app/MyTool"), &config);

        assert!(matches!(result, Err(crate::error::AutostartError::Identity(_))));
        assert!(!entries.exists());
        assert!(!tmp.path().join("escaped.desktop").exists());
    }
}
