use crate::error::{AutostartError, Result};
use crate::identity::AppIdentity;
use crate::platform::Platform;
use crate::strategy::AutostartStrategy;
use std::collections::BTreeSet;
use std::path::Path;
use std::process::Command;

/// The System Events login-item list, addressed by bundle path
pub trait LoginItemStore: Send + Sync {
    fn exists(&self, path: &str) -> Result<bool>;
    /// Paths of every login item, in list order
    fn paths(&self) -> Result<Vec<String>>;
    /// Removes every item with this path; none is fine
    fn remove(&self, path: &str) -> Result<()>;
    /// Appends an item at the end of the list
    fn add(&self, path: &str, hidden: bool) -> Result<()>;
}

/// Registers the app's `.app` bundle as a login item.
///
/// Enabling first deletes every item pointing at this bundle, including
/// copies of the same bundle at an older location, then appends a fresh
/// one. A crash between the two steps leaves autostart disabled.
pub struct LoginItemStrategy<S> {
    store: S,
    hidden: bool,
}

impl<S: LoginItemStore> LoginItemStrategy<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            hidden: false,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn remove_existing(&self, target: &str) -> Result<()> {
        let bundle = Path::new(target).file_name();
        let stale: BTreeSet<String> = self
            .store
            .paths()?
            .into_iter()
            .filter(|p| p == target || (bundle.is_some() && Path::new(p).file_name() == bundle))
            .collect();

        for path in &stale {
            tracing::debug!("Deleting login item {}", path);
            self.store.remove(path)?;
        }
        Ok(())
    }
}

impl<S: LoginItemStore> AutostartStrategy for LoginItemStrategy<S> {
    fn platform(&self) -> Platform {
        Platform::MacOs
    }

    fn is_registered(&self, app: &AppIdentity) -> Result<bool> {
        self.store.exists(&app.application_path(Platform::MacOs))
    }

    fn register(&self, app: &AppIdentity) -> Result<()> {
        let target = app.application_path(Platform::MacOs);
        self.remove_existing(&target)?;
        tracing::debug!("Adding login item {} (hidden: {})", target, self.hidden);
        self.store.add(&target, self.hidden)
    }

    fn unregister(&self, app: &AppIdentity) -> Result<()> {
        self.remove_existing(&app.application_path(Platform::MacOs))
    }
}

/// Login items managed by sending AppleScript to System Events.
///
/// The first call triggers the Automation permission prompt; until it is
/// granted every script fails.
#[derive(Debug, Clone)]
pub struct OsascriptLoginItems {
    program: String,
}

impl Default for OsascriptLoginItems {
    fn default() -> Self {
        Self {
            program: "osascript".to_string(),
        }
    }
}

impl OsascriptLoginItems {
    fn run(&self, lines: &[String]) -> Result<String> {
        let mut cmd = Command::new(&self.program);
        for line in lines {
            cmd.arg("-e").arg(line);
        }

        let output = cmd.output().map_err(|e| AutostartError::Spawn {
            program: self.program.clone(),
            source: e,
        })?;

        if !output.status.success() {
            return Err(AutostartError::ExternalProcess {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl LoginItemStore for OsascriptLoginItems {
    fn exists(&self, path: &str) -> Result<bool> {
        let out = self.run(&[count_script(path)])?;
        let count = parse_count(&out).ok_or_else(|| AutostartError::ExternalProcess {
            program: self.program.clone(),
            status: "exit status: 0".to_string(),
            stderr: format!("unexpected login item count: {}", out.trim()),
        })?;
        Ok(count > 0)
    }

    fn paths(&self) -> Result<Vec<String>> {
        let out = self.run(&list_script())?;
        Ok(parse_paths(&out))
    }

    fn remove(&self, path: &str) -> Result<()> {
        self.run(&[delete_script(path)]).map(|_| ())
    }

    fn add(&self, path: &str, hidden: bool) -> Result<()> {
        self.run(&[add_script(path, hidden)]).map(|_| ())
    }
}

/// Output of [`count_script`]
fn parse_count(out: &str) -> Option<usize> {
    out.trim().parse().ok()
}

/// Output of [`list_script`]: one path per line
fn parse_paths(out: &str) -> Vec<String> {
    out.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// AppleScript string literal
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

fn count_script(path: &str) -> String {
    format!(
        "tell application \"System Events\" to count (login items whose path is {})",
        quoted(path)
    )
}

fn list_script() -> Vec<String> {
    vec![
        "tell application \"System Events\" to set itemPaths to path of every login item"
            .to_string(),
        "set AppleScript's text item delimiters to linefeed".to_string(),
        "return itemPaths as text".to_string(),
    ]
}

fn delete_script(path: &str) -> String {
    format!(
        "tell application \"System Events\" to delete (login items whose path is {})",
        quoted(path)
    )
}

fn add_script(path: &str, hidden: bool) -> String {
    format!(
        "tell application \"System Events\" to make login item at end \
         with properties {{path:{}, hidden:{}}}",
        quoted(path),
        hidden
    )
}
