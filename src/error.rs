//! Central error types for the game overlay.
//!
//! All errors implement `Serialize` for Tauri IPC compatibility.

use serde::Serialize;
use thiserror::Error;

use crate::overlay::{OverlayLifecycle, SurfaceRole};

/// Main error type for overlay operations.
#[derive(Error, Debug)]
pub enum OverlayError {
    /// A surface window could not be created
    #[error("Failed to create {role} window: {reason}")]
    WindowCreation { role: SurfaceRole, reason: String },

    /// Window operation (show, hide, bounds, handle) failed
    #[error("Window error: {0}")]
    WindowError(String),

    /// Content source URL could not be resolved
    #[error("Failed to resolve content for {role}: {reason}")]
    ContentSource { role: SurfaceRole, reason: String },

    /// The compositor returned the invalid sentinel for a surface
    #[error("Compositor rejected the {role} surface")]
    RegistrationFailed { role: SurfaceRole },

    /// A surface already holds a live registration
    #[error("Surface {role} is already registered")]
    AlreadyRegistered { role: SurfaceRole },

    /// Native compositor SDK failure
    #[error("Compositor error: {0}")]
    CompositorError(String),

    /// Native compositor library could not be loaded
    #[error("Compositor SDK unavailable: {0}")]
    SdkUnavailable(String),

    /// Not every surface finished loading in time
    #[error("Timed out waiting for surfaces: {pending}")]
    ReadinessTimeout { pending: String },

    /// Every readiness sender went away before all surfaces were ready
    #[error("Surfaces were closed before they finished loading")]
    ReadinessAbandoned,

    /// The session was torn down or superseded before activation finished
    #[error("Overlay session was cancelled")]
    SessionCancelled,

    /// A session is already being created or is active
    #[error("Overlay session already in progress ({0:?})")]
    SessionInProgress(OverlayLifecycle),

    /// Lifecycle transition not allowed by the state machine
    #[error("Invalid overlay transition {from:?} -> {to:?}")]
    InvalidTransition {
        from: OverlayLifecycle,
        to: OverlayLifecycle,
    },

    /// Persistence failed
    #[error("Storage error: {0}")]
    StorageError(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Lock poisoned (mutex/rwlock)
    #[error("Lock poisoned: {context}")]
    LockPoisoned { context: String },

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

/// Implement Serialize for Tauri IPC compatibility.
/// Tauri requires errors to be serializable to send to the frontend.
impl Serialize for OverlayError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<String> for OverlayError {
    fn from(msg: String) -> Self {
        OverlayError::Other(msg)
    }
}

impl From<&str> for OverlayError {
    fn from(msg: &str) -> Self {
        OverlayError::Other(msg.to_string())
    }
}

/// Helper trait for converting mutex lock errors to OverlayError.
pub trait LockResultExt<T> {
    /// Convert a poisoned lock error to OverlayError with context.
    fn map_lock_err(self, context: &str) -> Result<T, OverlayError>;
}

impl<T> LockResultExt<T> for Result<T, std::sync::PoisonError<T>> {
    fn map_lock_err(self, context: &str) -> Result<T, OverlayError> {
        self.map_err(|_| OverlayError::LockPoisoned {
            context: context.to_string(),
        })
    }
}

/// Extension trait for adding context to Results.
///
/// # Example
/// ```ignore
/// use crate::error::{OverlayResult, ResultExt};
///
/// fn read_session(path: &Path) -> OverlayResult<String> {
///     std::fs::read_to_string(path).context("failed to read session file")
/// }
/// ```
pub trait ResultExt<T> {
    /// Add context to an error, converting it to OverlayError::Other.
    fn context(self, msg: &str) -> OverlayResult<T>;

    /// Add context lazily (only evaluated on error).
    fn with_context<F: FnOnce() -> String>(self, f: F) -> OverlayResult<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn context(self, msg: &str) -> OverlayResult<T> {
        self.map_err(|e| OverlayError::Other(format!("{}: {}", msg, e)))
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> OverlayResult<T> {
        self.map_err(|e| OverlayError::Other(format!("{}: {}", f(), e)))
    }
}

/// Extension trait for adding context to Option types.
pub trait OptionExt<T> {
    /// Convert None to OverlayError::Other with the given message.
    fn context(self, msg: &str) -> OverlayResult<T>;

    /// Convert None to OverlayError::Other with a lazily evaluated message.
    fn with_context<F: FnOnce() -> String>(self, f: F) -> OverlayResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn context(self, msg: &str) -> OverlayResult<T> {
        self.ok_or_else(|| OverlayError::Other(msg.to_string()))
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> OverlayResult<T> {
        self.ok_or_else(|| OverlayError::Other(f()))
    }
}

/// Type alias for Results using OverlayError.
pub type OverlayResult<T> = Result<T, OverlayError>;
