use crate::error::Result;
use crate::identity::AppIdentity;
use crate::platform::Platform;
use crate::strategy::AutostartStrategy;

pub const RUN_KEY: &str = r"Software\Microsoft\Windows\CurrentVersion\Run";

/// String values under the per-user `Run` key, addressed by value name
pub trait RunKeyStore: Send + Sync {
    fn get(&self, name: &str) -> Result<Option<String>>;
    fn set(&self, name: &str, value: &str) -> Result<()>;
    /// Deleting a missing value succeeds
    fn delete(&self, name: &str) -> Result<()>;
}

/// Registers the app as a `Run` value named after it
pub struct RunKeyStrategy<S> {
    store: S,
}

impl<S: RunKeyStore> RunKeyStrategy<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: RunKeyStore> AutostartStrategy for RunKeyStrategy<S> {
    fn platform(&self) -> Platform {
        Platform::Windows
    }

    fn is_registered(&self, app: &AppIdentity) -> Result<bool> {
        Ok(self.store.get(app.name())?.is_some())
    }

    fn register(&self, app: &AppIdentity) -> Result<()> {
        let command = app.application_path(Platform::Windows);
        tracing::debug!("Setting Run value {} = {}", app.name(), command);
        self.store.set(app.name(), &command)
    }

    fn unregister(&self, app: &AppIdentity) -> Result<()> {
        // Keyed by name, same as register
        tracing::debug!("Deleting Run value {}", app.name());
        self.store.delete(app.name())
    }
}

/// `HKEY_CURRENT_USER\...\Run` through winreg. No elevation needed.
#[cfg(target_os = "windows")]
#[derive(Debug, Clone)]
pub struct RegistryRunKey {
    subkey: String,
}

#[cfg(target_os = "windows")]
impl RegistryRunKey {
    /// Values under another `HKEY_CURRENT_USER` subkey
    pub fn at(subkey: impl Into<String>) -> Self {
        Self {
            subkey: subkey.into(),
        }
    }
}

#[cfg(target_os = "windows")]
impl Default for RegistryRunKey {
    fn default() -> Self {
        Self::at(RUN_KEY)
    }
}

#[cfg(target_os = "windows")]
impl RunKeyStore for RegistryRunKey {
    fn get(&self, name: &str) -> Result<Option<String>> {
        use crate::error::AutostartError;
        use winreg::RegKey;
        use winreg::enums::*;
        use winreg::types::FromRegValue;

        let hkcu = RegKey::predef(HKEY_CURRENT_USER);
        let key = match hkcu.open_subkey_with_flags(&self.subkey, KEY_READ) {
            Ok(key) => key,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AutostartError::io("Failed to open registry key", e)),
        };

        // Any value type counts as present; non-string data reads as empty
        match key.get_raw_value(name) {
            Ok(raw) => Ok(Some(String::from_reg_value(&raw).unwrap_or_default())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AutostartError::io(
                format!("Failed to read registry value {}", name),
                e,
            )),
        }
    }

    fn set(&self, name: &str, value: &str) -> Result<()> {
        use crate::error::AutostartError;
        use winreg::RegKey;
        use winreg::enums::*;

        let hkcu = RegKey::predef(HKEY_CURRENT_USER);
        let (key, _) = hkcu
            .create_subkey(&self.subkey)
            .map_err(|e| AutostartError::io("Failed to open registry key", e))?;
        key.set_value(name, &value.to_string())
            .map_err(|e| AutostartError::io(format!("Failed to set registry value {}", name), e))
    }

    fn delete(&self, name: &str) -> Result<()> {
        use crate::error::AutostartError;
        use winreg::RegKey;
        use winreg::enums::*;

        let hkcu = RegKey::predef(HKEY_CURRENT_USER);
        let key = match hkcu.open_subkey_with_flags(&self.subkey, KEY_WRITE) {
            Ok(key) => key,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(AutostartError::io("Failed to open registry key", e)),
        };

        match key.delete_value(name) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AutostartError::io(
                format!("Failed to delete registry value {}", name),
                e,
            )),
        }
    }
}
