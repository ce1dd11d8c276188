//! Typed failures for autostart queries and registration changes.

use serde::Serialize;
use std::io;
use thiserror::Error;

/// Autostart errors with the context needed to tell the user what went wrong
#[derive(Debug, Error)]
pub enum AutostartError {
    /// The OS refused access to the registration store
    #[error("Permission denied: {context}")]
    PermissionDenied {
        context: String,
        #[source]
        source: io::Error,
    },

    /// A key, file or directory the operation needs does not exist
    #[error("Not found: {context}")]
    NotFound {
        context: String,
        #[source]
        source: io::Error,
    },

    /// Any other I/O failure (disk full, invalid data, ...)
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// The external program could not be started at all
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The external program ran but reported failure
    #[error("{program} exited with {status}: {stderr}")]
    ExternalProcess {
        program: String,
        status: String,
        stderr: String,
    },

    /// The running executable could not be identified
    #[error("Cannot determine application identity: {0}")]
    Identity(String),

    /// The configuration file is unreadable or malformed
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Coarse failure category, for callers that only want to pick a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    Permission,
    NotFound,
    ExternalProcess,
    Other,
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::Permission => write!(f, "permission"),
            FailureReason::NotFound => write!(f, "not found"),
            FailureReason::ExternalProcess => write!(f, "external process"),
            FailureReason::Other => write!(f, "other"),
        }
    }
}

impl AutostartError {
    /// Wrap an I/O error, classifying it by its kind
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        let context = context.into();
        match source.kind() {
            io::ErrorKind::PermissionDenied => AutostartError::PermissionDenied { context, source },
            io::ErrorKind::NotFound => AutostartError::NotFound { context, source },
            _ => AutostartError::Io { context, source },
        }
    }

    pub fn reason(&self) -> FailureReason {
        match self {
            AutostartError::PermissionDenied { .. } => FailureReason::Permission,
            AutostartError::NotFound { .. } => FailureReason::NotFound,
            AutostartError::Spawn { .. } | AutostartError::ExternalProcess { .. } => {
                FailureReason::ExternalProcess
            }
            AutostartError::Io { .. }
            | AutostartError::Identity(_)
            | AutostartError::Config(_) => FailureReason::Other,
        }
    }

    /// Get user-friendly description with a hint on how to fix it
    pub fn user_message(&self) -> String {
        match self {
            AutostartError::PermissionDenied { .. } => format!(
                "{}\n\nCheck that your user account may modify its own login items.",
                self
            ),
            AutostartError::Spawn { program, .. } => format!(
                "{}\n\n'{}' must be available on PATH to manage login items.",
                self, program
            ),
            AutostartError::ExternalProcess { .. } => format!(
                "{}\n\nOn macOS, allow this program to control \"System Events\" under \
                 System Settings > Privacy & Security > Automation.",
                self
            ),
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AutostartError>;
