//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.marginalia.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `MARGINALIA_PR_URL`, `MARGINALIA_TOKEN`,
//!    or legacy `GITHUB_TOKEN`
//! 4. **Command-line arguments** – `--pr-url`/`-u`, `--token`/`-t`, and the
//!    remaining flags
//!
//! # Configuration File
//!
//! Place `.marginalia.toml` in the current directory, home directory, or
//! XDG config directory with:
//!
//! ```toml
//! token = "ghp_example"
//! include_resolved = false
//! include_outdated = false
//! hosts = ["ghe.example.com"]
//! ```

use std::env;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::github::review_comments::CommentFilter;
use crate::hosts::AcceptedHosts;

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// - `MARGINALIA_PR_URL` or `--pr-url`: Pull request URL
/// - `MARGINALIA_TOKEN`, `GITHUB_TOKEN`, or `--token`: Authentication token
/// - `MARGINALIA_OUTPUT_FILE` or `--output-file`: Output file path
/// - `MARGINALIA_TEMPLATE_FILE` or `--template-file`: Custom template path
/// - `MARGINALIA_HOSTS` or `--hosts`: Extra accepted forge hosts
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "MARGINALIA",
    discovery(
        dotfile_name = ".marginalia.toml",
        config_file_name = "marginalia.toml",
        app_name = "marginalia"
    )
)]
pub struct MarginaliaConfig {
    /// GitHub pull request URL to fetch comments for.
    ///
    /// When absent, the pull request is auto-detected from the local
    /// repository's checked-out branch.
    #[ortho_config(cli_short = 'u')]
    pub pr_url: Option<String>,

    /// Personal access token for GitHub API authentication.
    ///
    /// Optional: without a token, requests run unauthenticated with much
    /// lower rate limits. Falls back to the legacy `GITHUB_TOKEN`
    /// environment variable.
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Include review comments whose thread has been resolved.
    ///
    /// Note: environment variable `MARGINALIA_INCLUDE_RESOLVED` is not
    /// supported because `ortho_config` does not load boolean values from
    /// the environment.
    #[ortho_config()]
    pub include_resolved: bool,

    /// Include review comments anchored to superseded diffs.
    #[ortho_config()]
    pub include_outdated: bool,

    /// Save output to a file with an auto-generated filename.
    #[ortho_config(cli_short = 'o')]
    pub output: bool,

    /// Save output to this specific file instead of stdout.
    #[ortho_config()]
    pub output_file: Option<String>,

    /// Render through this Jinja2 template file instead of the built-in
    /// Markdown layout.
    #[ortho_config()]
    pub template_file: Option<String>,

    /// Extra accepted forge hosts for GitHub Enterprise installations.
    ///
    /// The public `github.com` host is always accepted.
    #[ortho_config()]
    pub hosts: Vec<String>,
}

impl MarginaliaConfig {
    /// Resolves the token from configuration or the legacy `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// Returns `None` when no source provides a value; the run then
    /// proceeds unauthenticated.
    #[must_use]
    pub fn resolve_token(&self) -> Option<String> {
        self.token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .filter(|token| !token.trim().is_empty())
    }

    /// Filter switches for the comment fetch.
    #[must_use]
    pub const fn comment_filter(&self) -> CommentFilter {
        CommentFilter {
            include_resolved: self.include_resolved,
            include_outdated: self.include_outdated,
        }
    }

    /// The accepted forge host set including configured extras.
    #[must_use]
    pub fn accepted_hosts(&self) -> AcceptedHosts {
        AcceptedHosts::with_extra(&self.hosts)
    }
}
