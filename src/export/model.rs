//! Serialisable view of a fetched pull request for rendering.

use serde::Serialize;

use crate::github::{PullRequestRef, ReviewComment, ReviewCommentBatch};

/// A review comment prepared for rendering.
///
/// Timestamps are pre-formatted as RFC 3339 strings so renderers do not
/// need to know about `chrono`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ExportedComment {
    /// Author login, when the account still exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// File path the comment is attached to.
    pub file_path: String,
    /// Line number in the diff, when still anchored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// Comment body text.
    pub body: String,
    /// Diff hunk context.
    pub diff_hunk: String,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
    /// Last update timestamp (RFC 3339), when edited.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Whether the containing thread has been resolved.
    pub is_resolved: bool,
    /// Whether the comment is anchored to a superseded diff.
    pub is_outdated: bool,
}

impl From<&ReviewComment> for ExportedComment {
    fn from(comment: &ReviewComment) -> Self {
        Self {
            author: comment.author.clone(),
            file_path: comment.file_path.clone(),
            line: comment.line,
            body: comment.body.clone(),
            diff_hunk: comment.diff_hunk.clone(),
            created_at: comment.created_at.to_rfc3339(),
            updated_at: comment.updated_at.map(|stamp| stamp.to_rfc3339()),
            is_resolved: comment.is_resolved,
            is_outdated: comment.is_outdated,
        }
    }
}

/// The whole document handed to a renderer.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ExportDocument {
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repository: String,
    /// Pull request number.
    pub number: u64,
    /// Canonical pull request URL.
    pub url: String,
    /// Pull request title, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Comments in API thread order.
    pub comments: Vec<ExportedComment>,
}

impl ExportDocument {
    /// Assembles the document from the resolved reference and fetch result.
    #[must_use]
    pub fn new(pull_request: &PullRequestRef, batch: &ReviewCommentBatch) -> Self {
        Self {
            owner: pull_request.owner().to_owned(),
            repository: pull_request.repository().to_owned(),
            number: pull_request.number(),
            url: pull_request.url().to_owned(),
            title: batch.title.clone(),
            comments: batch.comments.iter().map(ExportedComment::from).collect(),
        }
    }
}
