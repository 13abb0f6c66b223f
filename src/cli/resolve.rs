//! Branch-origin detection strategies.
//!
//! When no explicit pull request URL is given, the pull request is located
//! from the repository containing the working directory. Strategies are
//! tried in order: the native metadata parser first, then a libgit2-backed
//! fallback for repository layouts the native walk does not understand.
//! Each strategy produces the same [`BranchOrigin`], feeding one API
//! search.

use std::path::Path;

use git2::Repository;

use crate::hosts::AcceptedHosts;
use crate::local::{
    self, BranchOrigin, DiscoveryError, OriginError, RemoteError, parse_remote_url,
};

/// A way of detecting the branch origin of a working directory.
pub trait OriginStrategy {
    /// Strategy name used in log events.
    fn name(&self) -> &'static str;

    /// Detects the branch origin starting from `start_dir`.
    ///
    /// # Errors
    ///
    /// Returns an [`OriginError`] describing why this strategy could not
    /// produce an origin; the caller may try the next strategy.
    fn detect(&self, start_dir: &Path) -> Result<BranchOrigin, OriginError>;
}

/// Native metadata parsing; the default strategy.
pub struct NativeOrigin {
    hosts: AcceptedHosts,
}

impl NativeOrigin {
    /// Builds the strategy for the given accepted host set.
    #[must_use]
    pub const fn new(hosts: AcceptedHosts) -> Self {
        Self { hosts }
    }
}

impl OriginStrategy for NativeOrigin {
    fn name(&self) -> &'static str {
        "native"
    }

    fn detect(&self, start_dir: &Path) -> Result<BranchOrigin, OriginError> {
        local::discover_branch_origin(start_dir, &self.hosts)
    }
}

/// libgit2-backed detection used when native parsing fails.
pub struct Git2Origin {
    hosts: AcceptedHosts,
}

impl Git2Origin {
    /// Builds the strategy for the given accepted host set.
    #[must_use]
    pub const fn new(hosts: AcceptedHosts) -> Self {
        Self { hosts }
    }
}

impl OriginStrategy for Git2Origin {
    fn name(&self) -> &'static str {
        "git2"
    }

    fn detect(&self, start_dir: &Path) -> Result<BranchOrigin, OriginError> {
        let repo = Repository::discover(start_dir).map_err(|error| {
            if error.code() == git2::ErrorCode::NotFound {
                OriginError::Discovery(DiscoveryError::NotAGitRepository)
            } else {
                OriginError::Discovery(DiscoveryError::Io {
                    message: error.message().to_owned(),
                })
            }
        })?;

        let head = repo.head().map_err(|error| {
            OriginError::Discovery(DiscoveryError::HeadParsing {
                message: error.message().to_owned(),
            })
        })?;

        if !head.is_branch() {
            let commit = head
                .target()
                .map(|oid| oid.to_string())
                .unwrap_or_default();
            return Err(OriginError::DetachedHead { commit });
        }
        let branch = head
            .shorthand()
            .map(ToOwned::to_owned)
            .ok_or_else(|| OriginError::Discovery(DiscoveryError::HeadParsing {
                message: "HEAD branch name is not valid UTF-8".to_owned(),
            }))?;

        let remote_name = select_remote_name(&repo, &branch)?;
        let remote = repo
            .find_remote(&remote_name)
            .map_err(|_| OriginError::Remote(RemoteError::NoRemoteFound))?;
        let url = remote
            .url()
            .ok_or(OriginError::Remote(RemoteError::NoRemoteFound))?;

        let info = parse_remote_url(&remote_name, url, &self.hosts)?;
        Ok(BranchOrigin::new(info, branch))
    }
}

/// Applies the tracking / `origin` / first-declared selection order.
fn select_remote_name(repo: &Repository, branch: &str) -> Result<String, OriginError> {
    let tracking = repo
        .config()
        .ok()
        .and_then(|config| config.get_string(&format!("branch.{branch}.remote")).ok())
        .filter(|name| repo.find_remote(name).is_ok());
    if let Some(name) = tracking {
        return Ok(name);
    }

    if repo.find_remote("origin").is_ok() {
        return Ok("origin".to_owned());
    }

    repo.remotes()
        .ok()
        .and_then(|names| names.get(0).map(ToOwned::to_owned))
        .ok_or(OriginError::Remote(RemoteError::NoRemoteFound))
}

/// Tries each strategy in order and returns the first origin found.
///
/// When every strategy fails, the first strategy's error is returned; it
/// describes the preferred (native) detection path.
///
/// # Errors
///
/// Returns the first [`OriginError`] encountered when no strategy
/// succeeds.
pub fn detect_branch_origin(
    start_dir: &Path,
    strategies: &[&dyn OriginStrategy],
) -> Result<BranchOrigin, OriginError> {
    let mut first_error: Option<OriginError> = None;

    for strategy in strategies {
        match strategy.detect(start_dir) {
            Ok(origin) => {
                tracing::debug!(strategy = strategy.name(), "branch origin detected");
                return Ok(origin);
            }
            Err(error) => {
                tracing::debug!(strategy = strategy.name(), %error, "origin strategy failed");
                if first_error.is_none() {
                    first_error = Some(error);
                }
            }
        }
    }

    Err(first_error
        .unwrap_or_else(|| OriginError::Discovery(DiscoveryError::NotAGitRepository)))
}
