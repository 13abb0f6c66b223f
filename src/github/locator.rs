//! Pull request identity and URL parsing.

use url::Url;

use crate::hosts::AcceptedHosts;

use super::error::LocatorError;

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    pub(crate) fn new(value: &str) -> Result<Self, LocatorError> {
        if value.is_empty() {
            return Err(LocatorError::MissingPathSegments);
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryName(String);

impl RepositoryName {
    pub(crate) fn new(value: &str) -> Result<Self, LocatorError> {
        if value.is_empty() {
            return Err(LocatorError::MissingPathSegments);
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Pull request number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PullRequestNumber(u64);

impl PullRequestNumber {
    pub(crate) const fn new(value: u64) -> Result<Self, LocatorError> {
        if value == 0 {
            return Err(LocatorError::InvalidPullRequestNumber);
        }
        Ok(Self(value))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Canonical pull request identity used for all comment fetches.
///
/// Immutable once constructed, either by parsing a user-supplied URL or by
/// the branch search composing it from a resolved remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    host: String,
    owner: RepositoryOwner,
    repository: RepositoryName,
    number: PullRequestNumber,
    url: String,
}

impl PullRequestRef {
    /// Parses a pull request URL in the form
    /// `https://<host>/<owner>/<repo>/pull/<number>`.
    ///
    /// Trailing path segments (such as `/files`) are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`LocatorError::InvalidUrl`] when parsing fails,
    /// [`LocatorError::UnsupportedHost`] when the host is not accepted,
    /// [`LocatorError::MissingPathSegments`] when the path is not
    /// `/owner/repo/pull/<number>`, and
    /// [`LocatorError::InvalidPullRequestNumber`] when the final segment is
    /// not a positive integer.
    pub fn parse(input: &str, accepted: &AcceptedHosts) -> Result<Self, LocatorError> {
        let parsed =
            Url::parse(input).map_err(|error| LocatorError::InvalidUrl(error.to_string()))?;

        let host = parsed
            .host_str()
            .ok_or_else(|| LocatorError::InvalidUrl("URL must include a host".to_owned()))?;
        if !accepted.contains(host) {
            return Err(LocatorError::UnsupportedHost {
                host: host.to_owned(),
            });
        }

        let mut segments = parsed
            .path_segments()
            .ok_or(LocatorError::MissingPathSegments)?;

        let owner_segment = segments.next().ok_or(LocatorError::MissingPathSegments)?;
        let repository_segment = segments.next().ok_or(LocatorError::MissingPathSegments)?;
        let marker = segments.next().ok_or(LocatorError::MissingPathSegments)?;
        let number_segment = segments.next().ok_or(LocatorError::MissingPathSegments)?;

        if marker != "pull" || number_segment.is_empty() {
            return Err(LocatorError::MissingPathSegments);
        }

        let owner = RepositoryOwner::new(owner_segment)?;
        let repository = RepositoryName::new(repository_segment)?;
        let number = number_segment
            .parse::<u64>()
            .map_err(|_| LocatorError::InvalidPullRequestNumber)
            .and_then(PullRequestNumber::new)?;

        Ok(Self::compose(host, owner, repository, number))
    }

    /// Composes a reference from parts resolved elsewhere.
    ///
    /// # Errors
    ///
    /// Returns [`LocatorError::MissingPathSegments`] when owner or
    /// repository is empty and [`LocatorError::InvalidPullRequestNumber`]
    /// when the number is zero.
    pub fn from_parts(
        host: &str,
        owner: &str,
        repository: &str,
        number: u64,
    ) -> Result<Self, LocatorError> {
        let validated_owner = RepositoryOwner::new(owner)?;
        let validated_repository = RepositoryName::new(repository)?;
        let validated_number = PullRequestNumber::new(number)?;
        Ok(Self::compose(
            host,
            validated_owner,
            validated_repository,
            validated_number,
        ))
    }

    fn compose(
        host: &str,
        owner: RepositoryOwner,
        repository: RepositoryName,
        number: PullRequestNumber,
    ) -> Self {
        let url = format!(
            "https://{host}/{}/{}/pull/{}",
            owner.as_str(),
            repository.as_str(),
            number.get()
        );
        Self {
            host: host.to_owned(),
            owner,
            repository,
            number,
            url,
        }
    }

    /// Hostname of the forge.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &str {
        self.owner.as_str()
    }

    /// Repository name.
    #[must_use]
    pub const fn repository(&self) -> &str {
        self.repository.as_str()
    }

    /// Pull request number.
    #[must_use]
    pub const fn number(&self) -> u64 {
        self.number.get()
    }

    /// Canonical HTML URL for the pull request.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Derives the GraphQL endpoint URL for a forge host.
///
/// The public host routes to `api.github.com`; enterprise installations
/// serve GraphQL under `/api/graphql` on the forge host itself.
#[must_use]
pub fn graphql_endpoint_for_host(host: &str) -> String {
    if host.eq_ignore_ascii_case("github.com") {
        "https://api.github.com/graphql".to_owned()
    } else {
        format!("https://{host}/api/graphql")
    }
}
