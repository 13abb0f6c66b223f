//! Branch-origin discovery from local repository metadata.
//!
//! Ties the metadata walk, HEAD parsing, configuration parsing and remote
//! URL normalisation together: given a starting directory, produce the
//! checked-out branch and the remote it should be searched against.

use std::path::Path;

use crate::hosts::AcceptedHosts;

use super::config_file::GitConfig;
use super::error::{OriginError, RemoteError};
use super::gitdir::GitDir;
use super::head::HeadRef;
use super::remote::{RemoteInfo, parse_remote_url};

/// Remote used when a branch has no tracking configuration.
const DEFAULT_REMOTE_NAME: &str = "origin";

/// The checked-out branch together with the remote it resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchOrigin {
    remote: RemoteInfo,
    branch: String,
}

impl BranchOrigin {
    /// Builds a branch origin from an already-parsed remote and branch.
    #[must_use]
    pub const fn new(remote: RemoteInfo, branch: String) -> Self {
        Self { remote, branch }
    }

    /// The resolved remote.
    #[must_use]
    pub const fn remote(&self) -> &RemoteInfo {
        &self.remote
    }

    /// The checked-out branch name.
    #[must_use]
    pub fn branch(&self) -> &str {
        &self.branch
    }
}

/// Discovers the branch origin for the repository containing `start_dir`.
///
/// Remote selection order: the branch's configured tracking remote, then
/// `origin`, then the first remote declared with a URL.
///
/// # Errors
///
/// Returns [`OriginError::Discovery`] when the repository metadata cannot
/// be located or parsed, [`OriginError::DetachedHead`] when HEAD does not
/// name a branch, and [`OriginError::Remote`] when no usable remote exists
/// or its URL cannot be parsed against the accepted hosts.
pub fn discover_branch_origin(
    start_dir: &Path,
    accepted: &AcceptedHosts,
) -> Result<BranchOrigin, OriginError> {
    let git_dir = GitDir::discover(start_dir)?;

    let branch = match HeadRef::read(&git_dir)? {
        HeadRef::Branch { name } => name,
        HeadRef::Detached { commit } => return Err(OriginError::DetachedHead { commit }),
    };

    let config = GitConfig::load(&git_dir)?;
    let (remote_name, raw_url) =
        select_remote(&config, &branch).ok_or(RemoteError::NoRemoteFound)?;
    let remote = parse_remote_url(&remote_name, &raw_url, accepted)?;

    tracing::debug!(
        remote = remote.name(),
        host = remote.host(),
        branch = branch.as_str(),
        "resolved branch origin"
    );

    Ok(BranchOrigin::new(remote, branch))
}

/// Picks the remote to query for `branch` and returns its name and URL.
fn select_remote(config: &GitConfig, branch: &str) -> Option<(String, String)> {
    if let Some(name) = config.branch_remote(branch)
        && let Some(url) = config.remote_url(name)
    {
        return Some((name.to_owned(), url.to_owned()));
    }

    if let Some(url) = config.remote_url(DEFAULT_REMOTE_NAME) {
        return Some((DEFAULT_REMOTE_NAME.to_owned(), url.to_owned()));
    }

    config.remote_names().into_iter().find_map(|name| {
        config
            .remote_url(name)
            .map(|url| (name.to_owned(), url.to_owned()))
    })
}
