//! GitHub GraphQL API access.
//!
//! This module parses pull request URLs, searches for the open pull
//! request belonging to a branch, and retrieves review comments page by
//! page. Failures are mapped into precise error variants so callers can
//! act on the failure class without inspecting HTTP internals.

pub mod error;
pub mod gateway;
pub mod graphql;
pub mod locator;
pub mod models;
pub mod pagination;
pub mod pull_requests;
pub mod rate_limit;
pub mod review_comments;

pub use error::{ApiError, LocatorError, LookupError};
pub use gateway::{GraphqlGateway, ReviewCommentGateway};
pub use graphql::{AccessToken, GraphqlClient};
pub use locator::{PullRequestRef, graphql_endpoint_for_host};
pub use models::{ReviewComment, ReviewCommentBatch};
pub use pagination::PageInfo;
pub use pull_requests::find_open_pull_request;
pub use rate_limit::RateLimitInfo;
pub use review_comments::{CommentFilter, fetch_review_comments};

#[cfg(test)]
pub use gateway::MockReviewCommentGateway;
