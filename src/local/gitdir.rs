//! Location of the repository metadata directory.
//!
//! Walks upward from a starting directory looking for a `.git` entry. A
//! `.git` directory is the metadata root itself; a `.git` regular file is a
//! worktree or submodule indirection whose single `gitdir: <path>` line
//! names the real metadata directory.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::DiscoveryError;

/// Prefix of the single line inside a `.git` indirection file.
const GITDIR_PREFIX: &str = "gitdir: ";

/// Resolved absolute path to a repository's metadata directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitDir {
    path: PathBuf,
}

impl GitDir {
    /// Walks upward from `start_dir` until a `.git` entry resolves.
    ///
    /// A malformed `.git` indirection file does not stop the walk; a
    /// repository may still exist further up the tree.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::NotAGitRepository`] when the walk reaches
    /// the filesystem root without finding a `.git` entry, and
    /// [`DiscoveryError::Io`] when an existing entry cannot be read.
    pub fn discover(start_dir: &Path) -> Result<Self, DiscoveryError> {
        let mut current = absolute_start(start_dir)?;

        loop {
            let candidate = current.join(".git");
            if candidate.is_dir() {
                return Ok(Self { path: candidate });
            }
            if candidate.is_file()
                && let Some(resolved) = resolve_gitdir_file(&candidate, &current)?
            {
                return Ok(Self { path: resolved });
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Err(DiscoveryError::NotAGitRepository),
            }
        }
    }

    /// Path to the metadata directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of a file inside the metadata directory.
    #[must_use]
    pub fn metadata_file(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

/// Normalises the starting directory to an absolute path.
fn absolute_start(start_dir: &Path) -> Result<PathBuf, DiscoveryError> {
    std::path::absolute(start_dir).map_err(|error| DiscoveryError::Io {
        message: format!("could not resolve '{}': {error}", start_dir.display()),
    })
}

/// Follows the `gitdir: <path>` line of a `.git` indirection file.
///
/// Relative targets are resolved against the directory containing the
/// `.git` file. Returns `Ok(None)` when the content does not carry the
/// `gitdir:` prefix or the target is not a directory.
fn resolve_gitdir_file(
    git_file: &Path,
    base_dir: &Path,
) -> Result<Option<PathBuf>, DiscoveryError> {
    let content = fs::read_to_string(git_file).map_err(|error| DiscoveryError::Io {
        message: format!("could not read '{}': {error}", git_file.display()),
    })?;

    let Some(target) = content.trim().strip_prefix(GITDIR_PREFIX) else {
        return Ok(None);
    };

    let target_path = Path::new(target.trim());
    let resolved = if target_path.is_absolute() {
        target_path.to_path_buf()
    } else {
        base_dir.join(target_path)
    };

    if resolved.is_dir() {
        Ok(Some(resolved))
    } else {
        Ok(None)
    }
}
