//! Gateway seam over the GraphQL API.
//!
//! The trait-based design keeps the CLI pipeline testable with mocks while
//! the [`GraphqlGateway`] implementation performs real HTTP requests.

use crate::local::RemoteInfo;

use super::error::{ApiError, LookupError};
use super::graphql::{AccessToken, GraphqlClient};
use super::locator::PullRequestRef;
use super::models::ReviewCommentBatch;
use super::pull_requests;
use super::review_comments::{self, CommentFilter};

/// Gateway over the forge API used by the CLI pipeline.
#[cfg_attr(test, mockall::automock)]
pub trait ReviewCommentGateway {
    /// Finds the open pull request whose head is `branch`.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::NoOpenPullRequest`] when nothing matches and
    /// [`LookupError::Api`] for API failures.
    fn find_open_pull_request(
        &self,
        remote: &RemoteInfo,
        branch: &str,
    ) -> Result<PullRequestRef, LookupError>;

    /// Fetches all review comments for the pull request.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] of the first failing page.
    fn fetch_review_comments(
        &self,
        pull_request: &PullRequestRef,
        filter: &CommentFilter,
    ) -> Result<ReviewCommentBatch, ApiError>;
}

/// Gateway backed by the blocking GraphQL client.
pub struct GraphqlGateway {
    client: GraphqlClient,
}

impl GraphqlGateway {
    /// Builds a gateway for the given forge host and optional token.
    ///
    /// # Errors
    ///
    /// Propagates [`GraphqlClient::for_host`] failures.
    pub fn for_host(host: &str, token: Option<&AccessToken>) -> Result<Self, ApiError> {
        Ok(Self {
            client: GraphqlClient::for_host(host, token)?,
        })
    }

    /// Builds a gateway posting to an explicit endpoint URL.
    ///
    /// Useful for enterprise endpoints resolved out of band and for tests
    /// pointing at an HTTP double.
    ///
    /// # Errors
    ///
    /// Propagates [`GraphqlClient::new`] failures.
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        token: Option<&AccessToken>,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            client: GraphqlClient::new(endpoint, token)?,
        })
    }
}

impl ReviewCommentGateway for GraphqlGateway {
    fn find_open_pull_request(
        &self,
        remote: &RemoteInfo,
        branch: &str,
    ) -> Result<PullRequestRef, LookupError> {
        pull_requests::find_open_pull_request(&self.client, remote, branch)
    }

    fn fetch_review_comments(
        &self,
        pull_request: &PullRequestRef,
        filter: &CommentFilter,
    ) -> Result<ReviewCommentBatch, ApiError> {
        review_comments::fetch_review_comments(&self.client, pull_request, filter)
    }
}
