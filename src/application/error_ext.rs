//! Error conversion helpers for reading edit scripts and config files
//!
//! Provides an extension trait that attaches the failing action and path.

use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting foreign errors to `ApplicationResult` with context.
pub trait PathContextExt<T> {
    /// Add path context to an error.
    ///
    /// # Example
    /// ```ignore
    /// let script = std::fs::read_to_string(&path)
    ///     .with_path_context("read script", &path)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T, E> PathContextExt<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{}: {}", action, path.display()),
            source: Box::new(e),
        })
    }
}
