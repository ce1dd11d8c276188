//! In-memory stand-ins for the OS stores.
//!
//! Available to this crate's tests and, with the `mock` feature, to
//! downstream crates that want to exercise autostart toggling without
//! touching the registry or System Events.

use crate::error::{AutostartError, Result};
use crate::platform::macos::LoginItemStore;
use crate::platform::windows::RunKeyStore;
use std::collections::BTreeMap;
use std::io;
use std::sync::{Mutex, MutexGuard};

fn denied(context: &str) -> AutostartError {
    AutostartError::io(
        context,
        io::Error::new(io::ErrorKind::PermissionDenied, "access denied"),
    )
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A `Run` key held in a map
#[derive(Debug, Default)]
pub struct MemoryRunKey {
    values: Mutex<BTreeMap<String, String>>,
    failing: bool,
}

impl MemoryRunKey {
    /// A key whose every access is denied
    pub fn failing() -> Self {
        Self {
            values: Mutex::default(),
            failing: true,
        }
    }

    pub fn value(&self, name: &str) -> Option<String> {
        lock(&self.values).get(name).cloned()
    }

    pub fn len(&self) -> usize {
        lock(&self.values).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.values).is_empty()
    }
}

impl RunKeyStore for MemoryRunKey {
    fn get(&self, name: &str) -> Result<Option<String>> {
        if self.failing {
            return Err(denied("Failed to open registry key"));
        }
        Ok(self.value(name))
    }

    fn set(&self, name: &str, value: &str) -> Result<()> {
        if self.failing {
            return Err(denied("Failed to open registry key"));
        }
        lock(&self.values).insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, name: &str) -> Result<()> {
        if self.failing {
            return Err(denied("Failed to open registry key"));
        }
        lock(&self.values).remove(name);
        Ok(())
    }
}

/// A login item: bundle path and whether it launches hidden
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginItem {
    pub path: String,
    pub hidden: bool,
}

/// The System Events login-item list, in order
#[derive(Debug, Default)]
pub struct MemoryLoginItems {
    items: Mutex<Vec<LoginItem>>,
    failing: bool,
}

impl MemoryLoginItems {
    /// A list whose every access fails the way a refused Automation
    /// permission does
    pub fn failing() -> Self {
        Self {
            items: Mutex::default(),
            failing: true,
        }
    }

    pub fn with_items(paths: &[&str]) -> Self {
        let items = paths
            .iter()
            .map(|p| LoginItem {
                path: p.to_string(),
                hidden: false,
            })
            .collect();
        Self {
            items: Mutex::new(items),
            failing: false,
        }
    }

    pub fn items(&self) -> Vec<LoginItem> {
        lock(&self.items).clone()
    }

    fn check(&self) -> Result<()> {
        if self.failing {
            return Err(AutostartError::ExternalProcess {
                program: "osascript".to_string(),
                status: "exit status: 1".to_string(),
                stderr: "Not authorized to send Apple events to System Events.".to_string(),
            });
        }
        Ok(())
    }
}

impl LoginItemStore for MemoryLoginItems {
    fn exists(&self, path: &str) -> Result<bool> {
        self.check()?;
        Ok(lock(&self.items).iter().any(|i| i.path == path))
    }

    fn paths(&self) -> Result<Vec<String>> {
        self.check()?;
        Ok(lock(&self.items).iter().map(|i| i.path.clone()).collect())
    }

    fn remove(&self, path: &str) -> Result<()> {
        self.check()?;
        lock(&self.items).retain(|i| i.path != path);
        Ok(())
    }

    fn add(&self, path: &str, hidden: bool) -> Result<()> {
        self.check()?;
        lock(&self.items).push(LoginItem {
            path: path.to_string(),
            hidden,
        });
        Ok(())
    }
}
