//! Current checkout state read from HEAD.

use std::fs;

use super::error::DiscoveryError;
use super::gitdir::GitDir;

/// Prefix marking a symbolic reference in HEAD.
const SYMBOLIC_REF_PREFIX: &str = "ref: ";

/// Prefix of branch references.
const BRANCH_REF_PREFIX: &str = "refs/heads/";

/// The checkout state recorded in a repository's HEAD file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadRef {
    /// HEAD points at a branch.
    Branch {
        /// Branch name without the `refs/heads/` prefix.
        name: String,
    },
    /// HEAD points directly at a commit.
    Detached {
        /// The raw commit identifier recorded in HEAD.
        commit: String,
    },
}

impl HeadRef {
    /// Reads and parses the HEAD file of the given metadata directory.
    ///
    /// A single line of the form `ref: refs/heads/<name>` yields a branch;
    /// any other non-empty content is treated as a detached commit
    /// identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::HeadParsing`] when the file is missing,
    /// unreadable, or empty.
    pub fn read(git_dir: &GitDir) -> Result<Self, DiscoveryError> {
        let head_path = git_dir.metadata_file("HEAD");
        let content = fs::read_to_string(&head_path).map_err(|error| {
            DiscoveryError::HeadParsing {
                message: format!("could not read '{}': {error}", head_path.display()),
            }
        })?;

        Self::parse(content.trim())
    }

    /// Parses the trimmed content of a HEAD file.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::HeadParsing`] for empty content or a
    /// symbolic reference that names an empty branch.
    pub fn parse(line: &str) -> Result<Self, DiscoveryError> {
        if line.is_empty() {
            return Err(DiscoveryError::HeadParsing {
                message: "HEAD is empty".to_owned(),
            });
        }

        if let Some(reference) = line.strip_prefix(SYMBOLIC_REF_PREFIX)
            && let Some(name) = reference.trim().strip_prefix(BRANCH_REF_PREFIX)
        {
            if name.is_empty() {
                return Err(DiscoveryError::HeadParsing {
                    message: "HEAD names an empty branch".to_owned(),
                });
            }
            return Ok(Self::Branch {
                name: name.to_owned(),
            });
        }

        Ok(Self::Detached {
            commit: line.to_owned(),
        })
    }

    /// Branch name, or the commit identifier when detached.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Branch { name } => name,
            Self::Detached { commit } => commit,
        }
    }

    /// Returns true when HEAD points directly at a commit.
    #[must_use]
    pub const fn is_detached(&self) -> bool {
        matches!(self, Self::Detached { .. })
    }
}
