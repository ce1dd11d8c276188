use crate::error::{AutostartError, Result};
use crate::identity::AppIdentity;
use crate::platform::Platform;
use crate::strategy::AutostartStrategy;
use std::path::{Path, PathBuf};

/// Registers the app with an XDG autostart desktop entry named
/// `<app name>.desktop`.
pub struct DesktopEntryStrategy {
    dir: Option<PathBuf>,
}

impl DesktopEntryStrategy {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    /// `$XDG_CONFIG_HOME/autostart`, falling back to `$HOME/.config/autostart`
    pub fn from_environment() -> Self {
        Self {
            dir: get_autostart_dir(),
        }
    }

    pub fn autostart_dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Location of the desktop entry for `app`
    pub fn desktop_file(&self, app: &AppIdentity) -> Result<PathBuf> {
        let dir = self.dir.as_ref().ok_or_else(|| {
            AutostartError::io(
                "Failed to locate autostart directory",
                std::io::Error::new(std::io::ErrorKind::NotFound, "HOME is not set"),
            )
        })?;
        Ok(dir.join(format!("{}.desktop", app.name())))
    }
}

impl AutostartStrategy for DesktopEntryStrategy {
    fn platform(&self) -> Platform {
        Platform::Linux
    }

    fn is_registered(&self, app: &AppIdentity) -> Result<bool> {
        Ok(self.desktop_file(app)?.is_file())
    }

    fn register(&self, app: &AppIdentity) -> Result<()> {
        let desktop_file = self.desktop_file(app)?;
        remove_if_present(&desktop_file)?;

        if let Some(dir) = desktop_file.parent() {
            std::fs::create_dir_all(dir).map_err(|e| {
                AutostartError::io(
                    format!("Failed to create autostart directory {}", dir.display()),
                    e,
                )
            })?;
        }

        std::fs::write(&desktop_file, desktop_entry(app)).map_err(|e| {
            AutostartError::io(
                format!("Failed to write desktop file {}", desktop_file.display()),
                e,
            )
        })?;

        tracing::debug!("Wrote {}", desktop_file.display());
        Ok(())
    }

    fn unregister(&self, app: &AppIdentity) -> Result<()> {
        remove_if_present(&self.desktop_file(app)?)
    }
}

/// The three-line entry written for `app`
pub fn desktop_entry(app: &AppIdentity) -> String {
    format!(
        "[Desktop Entry]\nExec={}\nType=Application\n",
        app.application_path(Platform::Linux)
    )
}

/// `Exec=` value launching `executable` with an optional trailing flag.
///
/// Arguments holding reserved characters are double-quoted with `"`, `` ` ``,
/// `$` and `\` backslash-escaped inside; `%` is doubled so it is not read as a
/// field code. The result is then escaped as a desktop entry string value.
pub fn exec_command(executable: &Path, flag: Option<&str>) -> String {
    let mut command = exec_arg(&executable.to_string_lossy());
    if let Some(flag) = flag {
        command.push(' ');
        command.push_str(&exec_arg(flag));
    }
    escape_string_value(&command)
}

const EXEC_RESERVED: &[char] = &[
    ' ', '\t', '\n', '"', '\'', '\\', '>', '<', '~', '|', '&', ';', '$', '*', '?', '#', '(',
    ')', '`',
];

fn exec_arg(arg: &str) -> String {
    let arg = arg.replace('%', "%%");
    if !arg.contains(EXEC_RESERVED) {
        return arg;
    }

    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    for c in arg.chars() {
        if matches!(c, '"' | '`' | '$' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

fn escape_string_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn remove_if_present(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!("Removed {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(AutostartError::io(
            format!("Failed to remove desktop file {}", path.display()),
            e,
        )),
    }
}

fn get_autostart_dir() -> Option<PathBuf> {
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .map(|config_home| config_home.join("autostart"))
}
