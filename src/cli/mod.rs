//! CLI pipeline: resolve the pull request, fetch comments, render, write.
//!
//! The pipeline is strictly sequential. Resolution either parses the
//! configured URL or walks the detection strategies in [`resolve`]; the
//! fetch goes through the [`ReviewCommentGateway`] seam so the stages stay
//! testable without a network.

pub mod output;
pub mod resolve;

use std::path::Path;

use crate::config::MarginaliaConfig;
use crate::error::Error;
use crate::export::{self, ExportDocument};
use crate::github::{
    AccessToken, CommentFilter, GraphqlGateway, PullRequestRef, ReviewCommentGateway,
};
use crate::hosts::AcceptedHosts;

use resolve::{Git2Origin, NativeOrigin, OriginStrategy, detect_branch_origin};

/// Runs the whole pipeline for the given configuration.
///
/// # Errors
///
/// Propagates any [`Error`] from resolution, fetching, rendering, or
/// output.
pub fn run(config: &MarginaliaConfig) -> Result<(), Error> {
    run_from(config, Path::new("."))
}

/// Runs the pipeline with an explicit starting directory.
///
/// The directory only matters for auto-detection; an explicit URL skips
/// repository discovery entirely.
///
/// # Errors
///
/// Propagates any [`Error`] from resolution, fetching, rendering, or
/// output.
pub fn run_from(config: &MarginaliaConfig, start_dir: &Path) -> Result<(), Error> {
    let hosts = config.accepted_hosts();
    let token = config.resolve_token().and_then(AccessToken::new);
    if token.is_none() {
        tracing::warn!(
            "no GitHub token configured; unauthenticated requests are limited to ~60/hour"
        );
    }

    let (gateway, pull_request) =
        resolve_pull_request(config, start_dir, &hosts, token.as_ref())?;
    let document = fetch_document(&gateway, &pull_request, &config.comment_filter())?;
    let rendered = render(config, &document)?;

    let target = output::OutputTarget::choose(
        config.output,
        config.output_file.as_deref(),
        &pull_request,
    );
    target.write(&rendered)
}

/// Resolves the pull request and builds a gateway for its host.
fn resolve_pull_request(
    config: &MarginaliaConfig,
    start_dir: &Path,
    hosts: &AcceptedHosts,
    token: Option<&AccessToken>,
) -> Result<(GraphqlGateway, PullRequestRef), Error> {
    if let Some(url) = config.pr_url.as_deref() {
        let pull_request = PullRequestRef::parse(url, hosts)?;
        let gateway = GraphqlGateway::for_host(pull_request.host(), token)?;
        return Ok((gateway, pull_request));
    }

    let native = NativeOrigin::new(hosts.clone());
    let fallback = Git2Origin::new(hosts.clone());
    let strategies: [&dyn OriginStrategy; 2] = [&native, &fallback];
    let origin = detect_branch_origin(start_dir, &strategies)?;

    let gateway = GraphqlGateway::for_host(origin.remote().host(), token)?;
    let pull_request = gateway.find_open_pull_request(origin.remote(), origin.branch())?;
    Ok((gateway, pull_request))
}

/// Fetches the comments and assembles the render document.
fn fetch_document<G: ReviewCommentGateway>(
    gateway: &G,
    pull_request: &PullRequestRef,
    filter: &CommentFilter,
) -> Result<ExportDocument, Error> {
    let batch = gateway.fetch_review_comments(pull_request, filter)?;
    Ok(ExportDocument::new(pull_request, &batch))
}

/// Renders the document with the built-in layout or a custom template.
fn render(config: &MarginaliaConfig, document: &ExportDocument) -> Result<Vec<u8>, Error> {
    let mut buffer = Vec::new();
    match config.template_file.as_deref() {
        Some(path) => {
            let template =
                std::fs::read_to_string(path).map_err(|error| Error::Configuration {
                    message: format!("could not read template '{path}': {error}"),
                })?;
            export::write_template(&mut buffer, document, &template)?;
        }
        None => export::write_markdown(&mut buffer, document)?,
    }
    Ok(buffer)
}
