//! Identity of the application being registered: where it lives, what it is
//! called, and the launch target each platform stores.

use crate::error::{AutostartError, Result};
use crate::platform::Platform;
use std::path::{Component, Path, PathBuf};

/// Flag appended to the stored command line so the app knows it was started
/// at login and should come up hidden.
pub const DEFAULT_LAUNCH_FLAG: &str = "--autostart";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppIdentity {
    executable: PathBuf,
    name: String,
    launch_flag: Option<String>,
}

impl AppIdentity {
    /// Identity of the running executable
    pub fn current() -> Result<Self> {
        let exe = std::env::current_exe()
            .map_err(|e| AutostartError::Identity(format!("current executable path: {}", e)))?;
        Self::from_executable(exe)
    }

    /// Identity of an arbitrary executable path. The name is its file name.
    pub fn from_executable(executable: impl Into<PathBuf>) -> Result<Self> {
        let executable = executable.into();
        let name = executable
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| {
                AutostartError::Identity(format!(
                    "{} has no file name",
                    executable.display()
                ))
            })?;

        Ok(Self {
            executable,
            name,
            launch_flag: Some(DEFAULT_LAUNCH_FLAG.to_string()),
        })
    }

    /// Override the derived name (registry value name / desktop file stem).
    ///
    /// A blank name keeps the derived one; a name that is not a single file
    /// name is rejected.
    pub fn with_name(mut self, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if !name.trim().is_empty() {
            self.name = validate_name(&name)?;
        }
        Ok(self)
    }

    /// Replace the launch flag. `None` or an empty string stores a bare path.
    pub fn with_launch_flag(mut self, flag: Option<String>) -> Self {
        self.launch_flag = flag.filter(|f| !f.trim().is_empty());
        self
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn launch_flag(&self) -> Option<&str> {
        self.launch_flag.as_deref()
    }

    /// The `.app` bundle enclosing the executable:
    /// `Foo.app/Contents/MacOS/foo` resolves to `Foo.app`.
    ///
    /// Executables outside a bundle resolve to themselves.
    pub fn bundle_root(&self) -> PathBuf {
        self.executable
            .ancestors()
            .nth(3)
            .filter(|p| {
                p.extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("app"))
            })
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.executable.clone())
    }

    /// Launch target as stored by the given platform's autostart mechanism
    pub fn application_path(&self, platform: Platform) -> String {
        match platform {
            Platform::Windows => {
                let path = self.executable.to_string_lossy().replace('/', "\\");
                self.with_flag(quote_if_needed(&path))
            }
            Platform::MacOs => {
                // Login items hold a bundle path, never a command line
                let root = self.bundle_root().to_string_lossy().into_owned();
                root.trim_end_matches('/').to_string()
            }
            Platform::Linux => {
                crate::platform::linux::exec_command(&self.executable, self.launch_flag())
            }
            Platform::Unsupported => String::new(),
        }
    }

    fn with_flag(&self, command: String) -> String {
        match &self.launch_flag {
            Some(flag) => format!("{} {}", command, flag),
            None => command,
        }
    }
}

/// Check that `name` can serve as a registry value name and a file stem:
/// one path component, no separators, no `..`.
pub fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    let mut components = Path::new(name).components();
    let single = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );

    if name.is_empty()
        || !single
        || name.contains(['/', '\\', '\0'])
        || name.contains("..")
    {
        return Err(AutostartError::Identity(format!(
            "invalid application name {:?}: must be a single file name",
            name
        )));
    }
    Ok(name.to_string())
}

fn quote_if_needed(path: &str) -> String {
    if path.chars().any(char::is_whitespace) {
        format!("\"{}\"", path)
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_is_file_name_without_directories() {
        let id = AppIdentity::from_executable("/opt/app/MyTool").unwrap();
        assert_eq!(id.name(), "MyTool");
    }

    #[test]
    fn test_path_without_file_name_is_rejected() {
        assert!(AppIdentity::from_executable("/").is_err());
        assert!(AppIdentity::from_executable("").is_err());
    }

    #[test]
    fn test_name_override_ignores_blank() {
        let id = AppIdentity::from_executable("/opt/app/MyTool")
            .unwrap()
            .with_name("  ")
            .unwrap();
        assert_eq!(id.name(), "MyTool");

        let id = id.with_name(" Tool ").unwrap();
        assert_eq!(id.name(), "Tool");
    }

    #[test]
    fn test_name_override_rejects_paths() {
        let id = AppIdentity::from_executable("/opt/app/MyTool").unwrap();
        for name in ["../escaped", "a/b", "a\\b", "..", ".", "/etc/passwd", "nul\0byte"] {
            let err = id.clone().with_name(name).unwrap_err();
            assert!(
                matches!(err, AutostartError::Identity(_)),
                "{:?} should be rejected",
                name
            );
        }
        assert_eq!(validate_name("My Tool").unwrap(), "My Tool");
    }

    #[test]
    fn test_linux_path_has_launch_flag() {
        let id = AppIdentity::from_executable("/usr/bin/mytool").unwrap();
        assert_eq!(id.application_path(Platform::Linux), "/usr/bin/mytool --autostart");

        let bare = id.with_launch_flag(Some(String::new()));
        assert_eq!(bare.application_path(Platform::Linux), "/usr/bin/mytool");
    }

    #[test]
    fn test_linux_path_escapes_exec_characters() {
        let id = AppIdentity::from_executable("/opt/100%u/mytool").unwrap();
        assert_eq!(
            id.application_path(Platform::Linux),
            "/opt/100%%u/mytool --autostart"
        );
    }

    #[test]
    fn test_windows_path_uses_backslashes() {
        let id = AppIdentity::from_executable("C:/Program Files/Tool/tool.exe").unwrap();
        assert_eq!(
            id.application_path(Platform::Windows),
            "\"C:\\Program Files\\Tool\\tool.exe\" --autostart"
        );

        let id = AppIdentity::from_executable("C:/Tools/tool.exe")
            .unwrap()
            .with_launch_flag(None);
        assert_eq!(id.application_path(Platform::Windows), "C:\\Tools\\tool.exe");
    }

    #[test]
    fn test_macos_path_is_bundle_root() {
        let id =
            AppIdentity::from_executable("/Applications/Foo.app/Contents/MacOS/foo").unwrap();
        assert_eq!(id.bundle_root(), PathBuf::from("/Applications/Foo.app"));
        assert_eq!(id.application_path(Platform::MacOs), "/Applications/Foo.app");
    }

    #[test]
    fn test_shallow_executable_is_its_own_bundle_root() {
        let id = AppIdentity::from_executable("bin/foo").unwrap();
        assert_eq!(id.bundle_root(), PathBuf::from("bin/foo"));
    }

    #[test]
    fn test_unbundled_executable_is_not_walked_up() {
        let id = AppIdentity::from_executable("/usr/local/bin/mytool").unwrap();
        assert_eq!(id.bundle_root(), PathBuf::from("/usr/local/bin/mytool"));
        assert_eq!(id.application_path(Platform::MacOs), "/usr/local/bin/mytool");

        let id = AppIdentity::from_executable("/Apps/Foo.APP/Contents/MacOS/foo").unwrap();
        assert_eq!(id.bundle_root(), PathBuf::from("/Apps/Foo.APP"));
    }

    #[test]
    fn test_unsupported_platform_has_no_path() {
        let id = AppIdentity::from_executable("/usr/bin/mytool").unwrap();
        assert_eq!(id.application_path(Platform::Unsupported), "");
    }
}
