//! Open pull request search by head branch.

use serde_json::json;

use crate::local::RemoteInfo;

use super::error::{ApiError, LookupError};
use super::graphql::GraphqlClient;
use super::locator::PullRequestRef;
use super::models::ApiPullRequestCandidate;

/// Query for open pull requests whose head ref is the given branch.
const FIND_OPEN_PULL_REQUEST_QUERY: &str = r"
query($owner: String!, $name: String!, $branch: String!) {
  repository(owner: $owner, name: $name) {
    pullRequests(states: [OPEN], headRefName: $branch, first: 10) {
      nodes {
        number
        headRefName
        updatedAt
      }
    }
  }
}
";

/// Finds the open pull request whose head is `branch`.
///
/// When more than one open pull request matches, the most recently updated
/// one wins; the tie-break is logged at debug level.
///
/// # Errors
///
/// Returns [`LookupError::NoOpenPullRequest`] when no open pull request
/// has the branch as its head ref, and [`LookupError::Api`] for any API
/// failure, including an unknown repository.
pub fn find_open_pull_request(
    client: &GraphqlClient,
    remote: &RemoteInfo,
    branch: &str,
) -> Result<PullRequestRef, LookupError> {
    let data = client.execute(
        FIND_OPEN_PULL_REQUEST_QUERY,
        json!({
            "owner": remote.owner(),
            "name": remote.repository(),
            "branch": branch,
        }),
    )?;

    let nodes = data
        .pointer("/repository/pullRequests/nodes")
        .filter(|value| !value.is_null())
        .cloned()
        .ok_or_else(|| ApiError::NotFound {
            message: format!(
                "repository {}/{} not found",
                remote.owner(),
                remote.repository()
            ),
        })?;

    let candidates: Vec<ApiPullRequestCandidate> =
        serde_json::from_value(nodes).map_err(|error| ApiError::ResponseShape {
            message: format!("could not decode pull request nodes: {error}"),
        })?;

    let mut matching: Vec<ApiPullRequestCandidate> = candidates
        .into_iter()
        .filter(|candidate| candidate.head_ref_name == branch)
        .collect();

    if matching.is_empty() {
        return Err(LookupError::NoOpenPullRequest {
            branch: branch.to_owned(),
        });
    }
    if matching.len() > 1 {
        tracing::debug!(
            candidates = matching.len(),
            branch,
            "multiple open pull requests match; picking the most recently updated"
        );
    }

    matching.sort_by_key(|candidate| candidate.updated_at);
    let chosen = matching.pop().ok_or_else(|| ApiError::ResponseShape {
        message: "pull request candidates vanished during selection".to_owned(),
    })?;

    let pull_request = PullRequestRef::from_parts(
        remote.host(),
        remote.owner(),
        remote.repository(),
        chosen.number,
    )
    .map_err(|error| ApiError::ResponseShape {
        message: format!("search returned an invalid pull request: {error}"),
    })?;

    tracing::debug!(number = pull_request.number(), "found open pull request");
    Ok(pull_request)
}
