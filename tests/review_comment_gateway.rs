//! Integration tests for the GraphQL gateway against an HTTP double.
//!
//! The gateway itself is synchronous; the tokio runtime here only hosts
//! the wiremock server.

use marginalia::github::{
    AccessToken, ApiError, CommentFilter, GraphqlGateway, LookupError, PullRequestRef,
    ReviewCommentGateway,
};
use marginalia::hosts::AcceptedHosts;
use marginalia::local::parse_remote_url;

use serde_json::{Value, json};
use tokio::runtime::Runtime;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

const GRAPHQL_PATH: &str = "/api/graphql";

struct GatewayFixture {
    runtime: Runtime,
    server: MockServer,
    gateway: GraphqlGateway,
}

impl GatewayFixture {
    fn start() -> Self {
        let runtime = Runtime::new().expect("runtime should start");
        let server = runtime.block_on(MockServer::start());
        let endpoint = format!("{}{GRAPHQL_PATH}", server.uri());
        let token = AccessToken::new("test-token");
        let gateway =
            GraphqlGateway::with_endpoint(endpoint, token.as_ref()).expect("gateway should build");
        Self {
            runtime,
            server,
            gateway,
        }
    }

    fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.server));
    }
}

fn pull_request() -> PullRequestRef {
    PullRequestRef::from_parts("github.com", "octocat", "Hello-World", 42)
        .expect("reference should build")
}

fn comment_node(author: &str, body: &str, outdated: bool) -> Value {
    json!({
        "author": { "login": author },
        "body": body,
        "path": "src/main.rs",
        "line": 10,
        "createdAt": "2025-01-01T00:00:00Z",
        "updatedAt": null,
        "diffHunk": "@@ -1,5 +1,6 @@",
        "outdated": outdated
    })
}

fn thread_node(resolved: bool, comments: Vec<Value>) -> Value {
    json!({
        "isResolved": resolved,
        "isOutdated": false,
        "comments": { "nodes": comments }
    })
}

fn thread_page(threads: Vec<Value>, end_cursor: Option<&str>, has_next: bool) -> Value {
    json!({
        "data": {
            "repository": {
                "pullRequest": {
                    "title": "Add frobnication",
                    "reviewThreads": {
                        "pageInfo": { "endCursor": end_cursor, "hasNextPage": has_next },
                        "nodes": threads
                    }
                }
            }
        }
    })
}

/// Matches the page request carrying the given cursor variable.
fn page_with_cursor(cursor: Option<&str>) -> MockBuilder {
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_partial_json(json!({ "variables": { "cursor": cursor } })))
}

#[test]
fn fetch_walks_every_page_and_filters_resolved_comments() {
    let fixture = GatewayFixture::start();

    fixture.mount(
        page_with_cursor(None)
            .respond_with(ResponseTemplate::new(200).set_body_json(thread_page(
                vec![thread_node(
                    false,
                    vec![
                        comment_node("alice", "first", false),
                        comment_node("bob", "second", false),
                    ],
                )],
                Some("c1"),
                true,
            )))
            .expect(1),
    );
    fixture.mount(
        page_with_cursor(Some("c1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(thread_page(
                vec![
                    thread_node(false, vec![comment_node("carol", "third", false)]),
                    thread_node(true, vec![comment_node("dave", "resolved nit", false)]),
                ],
                Some("c2"),
                true,
            )))
            .expect(1),
    );
    fixture.mount(
        page_with_cursor(Some("c2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(thread_page(
                vec![thread_node(false, vec![comment_node("erin", "fourth", false)])],
                None,
                false,
            )))
            .expect(1),
    );

    let batch = fixture
        .gateway
        .fetch_review_comments(&pull_request(), &CommentFilter::default())
        .expect("fetch should succeed");

    assert_eq!(batch.title.as_deref(), Some("Add frobnication"));
    let bodies: Vec<&str> = batch
        .comments
        .iter()
        .map(|comment| comment.body.as_str())
        .collect();
    assert_eq!(bodies, vec!["first", "second", "third", "fourth"]);
}

#[test]
fn include_flags_keep_resolved_and_outdated_comments() {
    let fixture = GatewayFixture::start();

    fixture.mount(
        page_with_cursor(None).respond_with(ResponseTemplate::new(200).set_body_json(
            thread_page(
                vec![
                    thread_node(true, vec![comment_node("alice", "resolved", false)]),
                    thread_node(false, vec![comment_node("bob", "outdated", true)]),
                ],
                None,
                false,
            ),
        )),
    );

    let filter = CommentFilter {
        include_resolved: true,
        include_outdated: true,
    };
    let batch = fixture
        .gateway
        .fetch_review_comments(&pull_request(), &filter)
        .expect("fetch should succeed");

    assert_eq!(batch.comments.len(), 2);
    assert!(batch.comments.iter().any(|comment| comment.is_resolved));
    assert!(batch.comments.iter().any(|comment| comment.is_outdated));
}

#[test]
fn empty_result_is_not_an_error() {
    let fixture = GatewayFixture::start();

    fixture.mount(
        page_with_cursor(None).respond_with(
            ResponseTemplate::new(200).set_body_json(thread_page(vec![], None, false)),
        ),
    );

    let batch = fixture
        .gateway
        .fetch_review_comments(&pull_request(), &CommentFilter::default())
        .expect("fetch should succeed");
    assert!(batch.comments.is_empty());
}

#[test]
fn authentication_failure_aborts_without_partial_results() {
    let fixture = GatewayFixture::start();

    fixture.mount(
        page_with_cursor(None).respond_with(ResponseTemplate::new(200).set_body_json(
            thread_page(
                vec![thread_node(false, vec![comment_node("alice", "first", false)])],
                Some("c1"),
                true,
            ),
        )),
    );
    fixture.mount(
        page_with_cursor(Some("c1")).respond_with(
            ResponseTemplate::new(403).set_body_json(json!({
                "message": "Resource not accessible by personal access token"
            })),
        ),
    );

    let error = fixture
        .gateway
        .fetch_review_comments(&pull_request(), &CommentFilter::default())
        .expect_err("fetch should fail");

    assert!(matches!(error, ApiError::Authentication { .. }));
}

#[test]
fn unauthorized_maps_to_authentication_error() {
    let fixture = GatewayFixture::start();

    fixture.mount(
        page_with_cursor(None).respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Bad credentials" })),
        ),
    );

    let error = fixture
        .gateway
        .fetch_review_comments(&pull_request(), &CommentFilter::default())
        .expect_err("fetch should fail");

    let ApiError::Authentication { message } = error else {
        panic!("expected Authentication, got {error:?}");
    };
    assert!(message.contains("Bad credentials"));
}

#[test]
fn rate_limit_response_carries_reset_time() {
    let fixture = GatewayFixture::start();

    fixture.mount(
        page_with_cursor(None).respond_with(
            ResponseTemplate::new(403)
                .insert_header("x-ratelimit-limit", "60")
                .insert_header("x-ratelimit-remaining", "0")
                .insert_header("x-ratelimit-reset", "1700000000")
                .set_body_json(json!({ "message": "API rate limit exceeded for 1.2.3.4" })),
        ),
    );

    let error = fixture
        .gateway
        .fetch_review_comments(&pull_request(), &CommentFilter::default())
        .expect_err("fetch should fail");

    let ApiError::RateLimited {
        rate_limit,
        message,
    } = error
    else {
        panic!("expected RateLimited, got {error:?}");
    };
    let info = rate_limit.expect("rate limit info should be populated");
    assert_eq!(info.reset_at(), 1_700_000_000);
    assert!(info.is_exhausted());
    assert!(message.contains("rate limit"));
}

#[test]
fn missing_pull_request_maps_to_not_found() {
    let fixture = GatewayFixture::start();

    fixture.mount(
        page_with_cursor(None).respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "repository": { "pullRequest": null } }
        }))),
    );

    let error = fixture
        .gateway
        .fetch_review_comments(&pull_request(), &CommentFilter::default())
        .expect_err("fetch should fail");
    assert!(matches!(error, ApiError::NotFound { .. }));
}

#[test]
fn graphql_not_found_error_maps_to_not_found() {
    let fixture = GatewayFixture::start();

    fixture.mount(
        page_with_cursor(None).respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{
                "type": "NOT_FOUND",
                "message": "Could not resolve to a Repository with the name 'octocat/gone'."
            }]
        }))),
    );

    let error = fixture
        .gateway
        .fetch_review_comments(&pull_request(), &CommentFilter::default())
        .expect_err("fetch should fail");
    assert!(matches!(error, ApiError::NotFound { .. }));
}

#[test]
fn server_error_maps_to_transient() {
    let fixture = GatewayFixture::start();

    fixture.mount(
        page_with_cursor(None)
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway")),
    );

    let error = fixture
        .gateway
        .fetch_review_comments(&pull_request(), &CommentFilter::default())
        .expect_err("fetch should fail");
    assert!(matches!(error, ApiError::Transient { .. }));
}

#[test]
fn non_json_body_maps_to_response_shape() {
    let fixture = GatewayFixture::start();

    fixture.mount(
        page_with_cursor(None)
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>")),
    );

    let error = fixture
        .gateway
        .fetch_review_comments(&pull_request(), &CommentFilter::default())
        .expect_err("fetch should fail");
    assert!(matches!(error, ApiError::ResponseShape { .. }));
}

#[test]
fn unauthenticated_gateway_still_fetches() {
    let runtime = Runtime::new().expect("runtime should start");
    let server = runtime.block_on(MockServer::start());
    let endpoint = format!("{}{GRAPHQL_PATH}", server.uri());
    let gateway = GraphqlGateway::with_endpoint(endpoint, None).expect("gateway should build");

    runtime.block_on(
        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(thread_page(vec![], None, false)),
            )
            .mount(&server),
    );

    let batch = gateway
        .fetch_review_comments(&pull_request(), &CommentFilter::default())
        .expect("fetch should succeed");
    assert!(batch.comments.is_empty());
}

#[test]
fn branch_search_picks_most_recently_updated_candidate() {
    let fixture = GatewayFixture::start();

    fixture.mount(
        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .and(body_partial_json(
                json!({ "variables": { "branch": "feature-x" } }),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "repository": {
                        "pullRequests": {
                            "nodes": [
                                {
                                    "number": 7,
                                    "headRefName": "feature-x",
                                    "updatedAt": "2025-01-01T00:00:00Z"
                                },
                                {
                                    "number": 9,
                                    "headRefName": "feature-x",
                                    "updatedAt": "2025-03-01T00:00:00Z"
                                },
                                {
                                    "number": 8,
                                    "headRefName": "other-branch",
                                    "updatedAt": "2025-04-01T00:00:00Z"
                                }
                            ]
                        }
                    }
                }
            }))),
    );

    let remote = parse_remote_url(
        "origin",
        "https://github.com/octocat/Hello-World.git",
        &AcceptedHosts::default(),
    )
    .expect("remote should parse");

    let found = fixture
        .gateway
        .find_open_pull_request(&remote, "feature-x")
        .expect("search should succeed");

    assert_eq!(found.number(), 9);
    assert_eq!(found.url(), "https://github.com/octocat/Hello-World/pull/9");
}

#[test]
fn branch_search_without_matches_is_no_open_pull_request() {
    let fixture = GatewayFixture::start();

    fixture.mount(
        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "repository": { "pullRequests": { "nodes": [] } } }
            }))),
    );

    let remote = parse_remote_url(
        "origin",
        "https://github.com/octocat/Hello-World.git",
        &AcceptedHosts::default(),
    )
    .expect("remote should parse");

    let error = fixture
        .gateway
        .find_open_pull_request(&remote, "feature-x")
        .expect_err("search should fail");

    assert!(matches!(
        error,
        LookupError::NoOpenPullRequest { branch } if branch == "feature-x"
    ));
}

#[test]
fn branch_search_surfaces_authentication_failures_distinctly() {
    let fixture = GatewayFixture::start();

    fixture.mount(
        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "message": "Bad credentials" })),
            ),
    );

    let remote = parse_remote_url(
        "origin",
        "https://github.com/octocat/Hello-World.git",
        &AcceptedHosts::default(),
    )
    .expect("remote should parse");

    let error = fixture
        .gateway
        .find_open_pull_request(&remote, "feature-x")
        .expect_err("search should fail");

    assert!(matches!(
        error,
        LookupError::Api(ApiError::Authentication { .. })
    ));
}
