//! Error types exposed by the GitHub API layer.

use thiserror::Error;

use super::rate_limit::RateLimitInfo;

/// Errors surfaced while talking to the GitHub GraphQL API.
///
/// Every variant is fatal for the current run; no retry or backoff is
/// attempted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The token was rejected or lacks the required scope.
    #[error("GitHub rejected the request: {message}")]
    Authentication {
        /// GitHub error message returned with the 401/403 response.
        message: String,
    },

    /// The repository or pull request does not exist or is inaccessible.
    #[error("not found: {message}")]
    NotFound {
        /// Detail naming the missing resource.
        message: String,
    },

    /// The API rate limit was exhausted.
    #[error("GitHub API rate limit exceeded: {message}")]
    RateLimited {
        /// Rate limit window information when the response carried it.
        rate_limit: Option<RateLimitInfo>,
        /// Error message from GitHub.
        message: String,
    },

    /// A server-side failure or a transport-level problem.
    #[error("transient API failure: {message}")]
    Transient {
        /// Detail from the HTTP layer.
        message: String,
    },

    /// The response did not match the shape this client understands.
    #[error("unexpected API response: {message}")]
    ResponseShape {
        /// Detail describing the mismatch.
        message: String,
    },
}

/// Errors raised while parsing an explicit pull request URL.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LocatorError {
    /// The provided URL could not be parsed at all.
    #[error("pull request URL is invalid: {0}")]
    InvalidUrl(String),

    /// The pull request path is incomplete.
    #[error("pull request URL must match /owner/repo/pull/<number>")]
    MissingPathSegments,

    /// The pull request number is not a positive integer.
    #[error("pull request number must be a positive integer")]
    InvalidPullRequestNumber,

    /// The URL names a host outside the accepted set.
    #[error("host '{host}' is not an accepted forge host")]
    UnsupportedHost {
        /// The rejected hostname.
        host: String,
    },
}

/// Errors raised while searching for a branch's open pull request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    /// No open pull request has the branch as its head ref.
    #[error("no open pull request found for branch '{branch}'")]
    NoOpenPullRequest {
        /// The branch that was searched for.
        branch: String,
    },

    /// The API call itself failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}
