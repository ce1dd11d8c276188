use crate::error::Result;
use crate::identity::AppIdentity;
use crate::platform::Platform;

/// One platform's way of registering an application to launch at login.
///
/// Implementations never cache: every call goes to the OS store.
pub trait AutostartStrategy: Send + Sync {
    fn platform(&self) -> Platform;

    /// Whether a registration for `app` currently exists
    fn is_registered(&self, app: &AppIdentity) -> Result<bool>;

    /// Install (or rewrite) the registration for `app`
    fn register(&self, app: &AppIdentity) -> Result<()>;

    /// Remove the registration for `app`. Succeeds when none exists.
    fn unregister(&self, app: &AppIdentity) -> Result<()>;
}

/// Fallback for targets without an autostart mechanism
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopStrategy;

impl AutostartStrategy for NoopStrategy {
    fn platform(&self) -> Platform {
        Platform::Unsupported
    }

    fn is_registered(&self, _app: &AppIdentity) -> Result<bool> {
        Ok(false)
    }

    fn register(&self, app: &AppIdentity) -> Result<()> {
        tracing::debug!(
            "Autostart not supported on this platform, ignoring enable for {}",
            app.name()
        );
        Ok(())
    }

    fn unregister(&self, _app: &AppIdentity) -> Result<()> {
        Ok(())
    }
}
