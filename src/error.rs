//! Crate-level error type.

use thiserror::Error;

use crate::github::{ApiError, LocatorError, LookupError};
use crate::local::OriginError;

/// Unified error surfaced by the CLI pipeline.
///
/// Each layer keeps its own precise enum; this type only gathers them so
/// `main` has a single value to print. Nothing is retried anywhere.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// Local repository discovery failed.
    #[error(transparent)]
    Origin(#[from] OriginError),

    /// An explicit pull request URL could not be parsed.
    #[error(transparent)]
    Locator(#[from] LocatorError),

    /// The branch search failed.
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// A GitHub API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Configuration could not be loaded or is inconsistent.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// Writing output failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// A render template was invalid or failed to render.
    #[error("template error: {message}")]
    Template {
        /// Detail from the template engine.
        message: String,
    },
}
