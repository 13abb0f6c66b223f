//! Marginalia fetches the review comments of a GitHub pull request and
//! renders them as a Markdown document.
//!
//! The pull request is named either by an explicit URL or located from the
//! local repository: the `.git` metadata is parsed natively to find the
//! checked-out branch and its remote, and the forge API is searched for
//! the matching open pull request. Review threads are then fetched page by
//! page over GraphQL, filtered, and handed to a renderer. Every stage
//! surfaces typed failures so callers can react to the failure class.

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod github;
pub mod hosts;
pub mod local;

pub use config::MarginaliaConfig;
pub use error::Error;
pub use github::{
    AccessToken, ApiError, CommentFilter, GraphqlGateway, LookupError, PullRequestRef,
    ReviewComment, ReviewCommentBatch, ReviewCommentGateway,
};
pub use hosts::AcceptedHosts;
pub use local::{BranchOrigin, RemoteInfo};
