//! Data models for pull request review comments.
//!
//! Types prefixed with `Api` are deserialisation targets for the GraphQL
//! response shape; they convert into the public domain types consumed by
//! the rest of the crate.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::pagination::PageInfo;

/// A review comment anchored to a pull request diff.
///
/// Sourced verbatim from the API and never mutated after construction.
/// Ordering follows the thread order the API returns; comments are not
/// re-sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewComment {
    /// Author login; absent when the account has been deleted.
    pub author: Option<String>,
    /// Comment body text.
    pub body: String,
    /// File path the comment is attached to.
    pub file_path: String,
    /// Line number in the diff, when the comment is still anchored.
    pub line: Option<u32>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp, when the comment was edited.
    pub updated_at: Option<DateTime<Utc>>,
    /// Diff hunk context for this comment.
    pub diff_hunk: String,
    /// Whether the containing thread has been resolved.
    pub is_resolved: bool,
    /// Whether the comment is anchored to a superseded diff version.
    pub is_outdated: bool,
}

impl ReviewComment {
    /// Builds a domain comment from its API form and thread-level flags.
    pub(super) fn from_api(
        comment: ApiThreadComment,
        thread_resolved: bool,
        thread_outdated: bool,
    ) -> Self {
        Self {
            author: comment.author.and_then(|actor| actor.login),
            body: comment.body,
            file_path: comment.path,
            line: comment.line,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
            diff_hunk: comment.diff_hunk,
            is_resolved: thread_resolved,
            is_outdated: thread_outdated || comment.outdated,
        }
    }
}

/// All surviving review comments of one pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewCommentBatch {
    /// Pull request title, when the API supplied one.
    pub title: Option<String>,
    /// Comments in API thread order.
    pub comments: Vec<ReviewComment>,
}

/// Pull request payload of one review-threads page.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ApiPullRequestThreads {
    pub(super) title: Option<String>,
    pub(super) review_threads: ApiThreadConnection,
}

/// One page of the review-threads connection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ApiThreadConnection {
    pub(super) page_info: PageInfo,
    #[serde(default)]
    pub(super) nodes: Vec<ApiReviewThread>,
}

/// A review thread with its resolution state and comments.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ApiReviewThread {
    #[serde(default)]
    pub(super) is_resolved: bool,
    #[serde(default)]
    pub(super) is_outdated: bool,
    pub(super) comments: ApiCommentConnection,
}

/// The comments of one review thread.
#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiCommentConnection {
    #[serde(default)]
    pub(super) nodes: Vec<ApiThreadComment>,
}

/// A single comment node inside a review thread.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ApiThreadComment {
    pub(super) author: Option<ApiActor>,
    pub(super) body: String,
    pub(super) path: String,
    pub(super) line: Option<u32>,
    pub(super) created_at: DateTime<Utc>,
    pub(super) updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub(super) diff_hunk: String,
    #[serde(default)]
    pub(super) outdated: bool,
}

/// Actor node carrying the author login.
#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiActor {
    pub(super) login: Option<String>,
}

/// Open pull request candidate returned by the branch search.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ApiPullRequestCandidate {
    pub(super) number: u64,
    pub(super) head_ref_name: String,
    pub(super) updated_at: Option<DateTime<Utc>>,
}
