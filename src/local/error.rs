//! Error types for local repository introspection.

use thiserror::Error;

/// Errors raised while locating and reading repository metadata.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DiscoveryError {
    /// No `.git` entry was found walking up from the starting directory.
    #[error("not inside a Git repository")]
    NotAGitRepository,

    /// The HEAD file was missing, unreadable, or empty.
    #[error("could not parse HEAD: {message}")]
    HeadParsing {
        /// Detail describing what was wrong with the HEAD file.
        message: String,
    },

    /// The repository configuration could not be parsed.
    #[error("could not parse repository config: {message}")]
    ConfigParsing {
        /// Detail describing the offending configuration content.
        message: String,
    },

    /// Reading repository metadata from disk failed.
    #[error("I/O error reading repository metadata: {message}")]
    Io {
        /// Error detail from the underlying filesystem operation.
        message: String,
    },
}

/// Errors raised while resolving and parsing a remote URL.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteError {
    /// The configuration declares no usable remote at all.
    #[error("repository has no remotes configured")]
    NoRemoteFound,

    /// The remote host is not in the accepted set.
    #[error("remote host '{host}' is not an accepted forge host")]
    UnsupportedHost {
        /// The rejected hostname.
        host: String,
    },

    /// The remote URL matches neither supported form.
    #[error("could not parse remote URL: {url}")]
    MalformedRemoteUrl {
        /// The unparseable URL. Userinfo is stripped before the URL is
        /// stored here.
        url: String,
    },
}

/// Errors raised while assembling a branch origin from local metadata.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OriginError {
    /// Repository metadata could not be discovered or read.
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    /// The remote could not be resolved or parsed.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// HEAD is detached, so there is no branch to search for.
    #[error("HEAD is detached at {commit}; pass an explicit pull request URL")]
    DetachedHead {
        /// The commit identifier HEAD points at.
        commit: String,
    },
}
