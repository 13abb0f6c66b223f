//! Paginated retrieval of review comments.
//!
//! The fetch is a small state machine: issue the first page with an empty
//! cursor, decode and filter each received page, advance the cursor while
//! the response reports another page, and stop when it does not. Failure
//! on any page aborts the whole fetch; comments accumulated from earlier
//! pages are never returned alongside an error.

use serde_json::json;

use super::error::ApiError;
use super::graphql::GraphqlClient;
use super::locator::PullRequestRef;
use super::models::{ApiPullRequestThreads, ReviewComment, ReviewCommentBatch};

/// Filter switches applied while pages are decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommentFilter {
    /// Keep comments whose thread has been resolved.
    pub include_resolved: bool,
    /// Keep comments anchored to superseded diffs.
    pub include_outdated: bool,
}

impl CommentFilter {
    /// Returns true when the comment survives this filter.
    #[must_use]
    pub const fn keeps(&self, comment: &ReviewComment) -> bool {
        if comment.is_resolved && !self.include_resolved {
            return false;
        }
        if comment.is_outdated && !self.include_outdated {
            return false;
        }
        true
    }
}

/// Query for one page of review threads, including the title so the
/// formatter can name the document.
const REVIEW_THREADS_QUERY: &str = r"
query($owner: String!, $name: String!, $number: Int!, $cursor: String) {
  repository(owner: $owner, name: $name) {
    pullRequest(number: $number) {
      title
      reviewThreads(first: 50, after: $cursor) {
        pageInfo {
          endCursor
          hasNextPage
        }
        nodes {
          isResolved
          isOutdated
          comments(first: 100) {
            nodes {
              author { login }
              body
              path
              line
              createdAt
              updatedAt
              diffHunk
              outdated
            }
          }
        }
      }
    }
  }
}
";

/// Fetches every page of review threads and returns surviving comments.
///
/// Pages are requested strictly sequentially and the whole result is
/// materialised before return. An empty result is not an error.
///
/// # Errors
///
/// Returns the classified [`ApiError`] of the first failing page request;
/// nothing accumulated so far is returned with it.
pub fn fetch_review_comments(
    client: &GraphqlClient,
    pull_request: &PullRequestRef,
    filter: &CommentFilter,
) -> Result<ReviewCommentBatch, ApiError> {
    let mut batch = ReviewCommentBatch::default();
    let mut cursor: Option<String> = None;
    let mut dropped = 0usize;

    loop {
        let page = fetch_thread_page(client, pull_request, cursor.as_deref())?;

        if batch.title.is_none() {
            batch.title = page.title;
        }

        for thread in page.review_threads.nodes {
            for api_comment in thread.comments.nodes {
                let comment =
                    ReviewComment::from_api(api_comment, thread.is_resolved, thread.is_outdated);
                if filter.keeps(&comment) {
                    batch.comments.push(comment);
                } else {
                    dropped += 1;
                }
            }
        }

        let page_info = page.review_threads.page_info;
        if page_info.is_last_page() {
            break;
        }
        let next_cursor = page_info.end_cursor.ok_or_else(|| ApiError::ResponseShape {
            message: "page reports a next page but carries no cursor".to_owned(),
        })?;
        cursor = Some(next_cursor);
    }

    tracing::debug!(
        kept = batch.comments.len(),
        dropped,
        url = pull_request.url(),
        "review comment fetch complete"
    );
    Ok(batch)
}

/// Issues one page request and decodes the pull request payload.
fn fetch_thread_page(
    client: &GraphqlClient,
    pull_request: &PullRequestRef,
    cursor: Option<&str>,
) -> Result<ApiPullRequestThreads, ApiError> {
    let data = client.execute(
        REVIEW_THREADS_QUERY,
        json!({
            "owner": pull_request.owner(),
            "name": pull_request.repository(),
            "number": pull_request.number(),
            "cursor": cursor,
        }),
    )?;

    let payload = data
        .pointer("/repository/pullRequest")
        .filter(|value| !value.is_null())
        .cloned()
        .ok_or_else(|| ApiError::NotFound {
            message: format!("pull request {} not found", pull_request.url()),
        })?;

    serde_json::from_value(payload).map_err(|error| ApiError::ResponseShape {
        message: format!("could not decode review threads: {error}"),
    })
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};

    use super::{CommentFilter, ReviewComment};

    fn comment(is_resolved: bool, is_outdated: bool) -> ReviewComment {
        ReviewComment {
            author: Some("alice".to_owned()),
            body: "body".to_owned(),
            file_path: "src/lib.rs".to_owned(),
            line: Some(3),
            created_at: "2025-01-01T00:00:00Z"
                .parse::<DateTime<Utc>>()
                .expect("timestamp should parse"),
            updated_at: None,
            diff_hunk: String::new(),
            is_resolved,
            is_outdated,
        }
    }

    #[test]
    fn default_filter_drops_resolved_and_outdated() {
        let filter = CommentFilter::default();
        assert!(filter.keeps(&comment(false, false)));
        assert!(!filter.keeps(&comment(true, false)));
        assert!(!filter.keeps(&comment(false, true)));
        assert!(!filter.keeps(&comment(true, true)));
    }

    #[test]
    fn include_flags_keep_their_category() {
        let resolved_only = CommentFilter {
            include_resolved: true,
            include_outdated: false,
        };
        assert!(resolved_only.keeps(&comment(true, false)));
        assert!(!resolved_only.keeps(&comment(true, true)));

        let both = CommentFilter {
            include_resolved: true,
            include_outdated: true,
        };
        assert!(both.keeps(&comment(true, true)));
    }
}
