//! Blocking GraphQL transport with response classification.
//!
//! One [`GraphqlClient`] is built per run for the resolved forge host. It
//! issues strictly sequential POST requests and maps every failure mode
//! onto [`ApiError`]: HTTP status classes, rate-limit signals (status or
//! payload), transport failures, and malformed response bodies. No retry
//! or backoff is performed and no timeout is set beyond the transport
//! default.

use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::{Value, json};

use super::error::ApiError;
use super::locator::graphql_endpoint_for_host;
use super::rate_limit::RateLimitInfo;

/// User agent sent with every API request.
const API_USER_AGENT: &str = concat!("marginalia/", env!("CARGO_PKG_VERSION"));

/// Access token wrapper enforcing a non-blank value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a token, trimming surrounding whitespace.
    ///
    /// Returns `None` for a blank value: the tool then proceeds
    /// unauthenticated, subject to the lower anonymous rate limits.
    #[must_use]
    pub fn new(token: impl AsRef<str>) -> Option<Self> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_owned()))
        }
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

/// Blocking GraphQL client bound to one forge host.
pub struct GraphqlClient {
    http: Client,
    endpoint: String,
}

impl GraphqlClient {
    /// Builds a client for the given forge host and optional token.
    ///
    /// # Errors
    ///
    /// Propagates [`Self::new`] failures.
    pub fn for_host(host: &str, token: Option<&AccessToken>) -> Result<Self, ApiError> {
        Self::new(graphql_endpoint_for_host(host), token)
    }

    /// Builds a client posting to an explicit endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Authentication`] when the token cannot be sent
    /// as a header value and [`ApiError::Transient`] when the HTTP client
    /// cannot be constructed.
    pub fn new(endpoint: impl Into<String>, token: Option<&AccessToken>) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(access_token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", access_token.value()))
                .map_err(|_| ApiError::Authentication {
                    message: "token contains characters that cannot be sent in a header"
                        .to_owned(),
                })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = Client::builder()
            .user_agent(API_USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|error| ApiError::Transient {
                message: format!("could not build HTTP client: {error}"),
            })?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    /// Endpoint URL the client posts to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Executes one GraphQL request and returns the `data` payload.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] classified from the HTTP status, the
    /// GraphQL `errors` array, or a body that is not the expected shape.
    pub fn execute(&self, query: &str, variables: Value) -> Result<Value, ApiError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .map_err(|error| ApiError::Transient {
                message: format!("request to {} failed: {error}", self.endpoint),
            })?;

        let status = response.status();
        let rate_limit = rate_limit_from_headers(response.headers());
        let body = response.text().map_err(|error| ApiError::Transient {
            message: format!("could not read response body: {error}"),
        })?;

        if !status.is_success() {
            return Err(classify_http_failure(status, rate_limit, &body));
        }

        let payload: Value =
            serde_json::from_str(&body).map_err(|error| ApiError::ResponseShape {
                message: format!("response is not valid JSON: {error}"),
            })?;

        if let Some(errors) = payload
            .get("errors")
            .and_then(Value::as_array)
            .filter(|entries| !entries.is_empty())
        {
            return Err(classify_graphql_errors(errors, rate_limit));
        }

        payload
            .get("data")
            .filter(|data| !data.is_null())
            .cloned()
            .ok_or_else(|| ApiError::ResponseShape {
                message: "response carries neither data nor errors".to_owned(),
            })
    }
}

/// Reads the `X-RateLimit-*` headers when the response carries them.
fn rate_limit_from_headers(headers: &HeaderMap) -> Option<RateLimitInfo> {
    let read_number = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<u64>().ok())
    };

    let reset_at = read_number("x-ratelimit-reset")?;
    let limit = read_number("x-ratelimit-limit")
        .and_then(|value| u32::try_from(value).ok())
        .unwrap_or(0);
    let remaining = read_number("x-ratelimit-remaining")
        .and_then(|value| u32::try_from(value).ok())
        .unwrap_or(0);

    Some(RateLimitInfo::new(limit, remaining, reset_at))
}

/// Maps a non-2xx HTTP status onto the error taxonomy.
fn classify_http_failure(
    status: StatusCode,
    rate_limit: Option<RateLimitInfo>,
    body: &str,
) -> ApiError {
    let message = extract_api_message(body).unwrap_or_else(|| format!("HTTP {status}"));

    let forbidden_by_rate_limit = status == StatusCode::FORBIDDEN
        && (message.to_lowercase().contains("rate limit")
            || rate_limit.as_ref().is_some_and(RateLimitInfo::is_exhausted));

    if status == StatusCode::TOO_MANY_REQUESTS || forbidden_by_rate_limit {
        return ApiError::RateLimited {
            rate_limit,
            message,
        };
    }

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Authentication {
            message: format!("GitHub returned {status}: {message}"),
        },
        StatusCode::NOT_FOUND => ApiError::NotFound {
            message: format!("GitHub returned {status}: {message}"),
        },
        _ if status.is_server_error() => ApiError::Transient {
            message: format!("GitHub returned {status}: {message}"),
        },
        _ => ApiError::ResponseShape {
            message: format!("unexpected status {status}: {message}"),
        },
    }
}

/// Maps the GraphQL `errors` array onto the error taxonomy.
fn classify_graphql_errors(errors: &[Value], rate_limit: Option<RateLimitInfo>) -> ApiError {
    let joined = errors
        .iter()
        .filter_map(|entry| entry.get("message").and_then(Value::as_str))
        .collect::<Vec<_>>()
        .join("; ");
    let message = if joined.is_empty() {
        "GraphQL query failed".to_owned()
    } else {
        joined
    };

    let kinds: Vec<&str> = errors
        .iter()
        .filter_map(|entry| entry.get("type").and_then(Value::as_str))
        .collect();

    if kinds.iter().any(|kind| *kind == "RATE_LIMITED") {
        return ApiError::RateLimited {
            rate_limit,
            message,
        };
    }
    if kinds.iter().any(|kind| *kind == "NOT_FOUND") {
        return ApiError::NotFound { message };
    }
    if kinds
        .iter()
        .any(|kind| *kind == "FORBIDDEN" || *kind == "INSUFFICIENT_SCOPES")
    {
        return ApiError::Authentication { message };
    }

    ApiError::ResponseShape {
        message: format!("GraphQL errors: {message}"),
    }
}

/// Pulls the `message` field out of an API error body.
fn extract_api_message(body: &str) -> Option<String> {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return None;
    };
    value
        .get("message")
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{
        AccessToken, ApiError, RateLimitInfo, classify_graphql_errors, classify_http_failure,
        extract_api_message,
    };
    use reqwest::StatusCode;

    #[test]
    fn access_token_rejects_blank_values() {
        assert!(AccessToken::new("").is_none());
        assert!(AccessToken::new("   ").is_none());
        let token = AccessToken::new("  ghp_abc  ").expect("token should wrap");
        assert_eq!(token.value(), "ghp_abc");
    }

    #[test]
    fn unauthorized_maps_to_authentication() {
        let error = classify_http_failure(
            StatusCode::UNAUTHORIZED,
            None,
            "{\"message\": \"Bad credentials\"}",
        );
        assert!(matches!(
            error,
            ApiError::Authentication { message } if message.contains("Bad credentials")
        ));
    }

    #[test]
    fn forbidden_with_rate_limit_message_maps_to_rate_limited() {
        let error = classify_http_failure(
            StatusCode::FORBIDDEN,
            Some(RateLimitInfo::new(60, 0, 1_700_000_000)),
            "{\"message\": \"API rate limit exceeded for user\"}",
        );
        let ApiError::RateLimited {
            rate_limit,
            message,
        } = error
        else {
            panic!("expected RateLimited");
        };
        assert_eq!(
            rate_limit.expect("rate limit info should be carried").reset_at(),
            1_700_000_000
        );
        assert!(message.contains("rate limit"));
    }

    #[test]
    fn too_many_requests_maps_to_rate_limited() {
        let error = classify_http_failure(StatusCode::TOO_MANY_REQUESTS, None, "{}");
        assert!(matches!(error, ApiError::RateLimited { .. }));
    }

    #[test]
    fn not_found_and_server_errors_are_distinguished() {
        assert!(matches!(
            classify_http_failure(StatusCode::NOT_FOUND, None, "{}"),
            ApiError::NotFound { .. }
        ));
        assert!(matches!(
            classify_http_failure(StatusCode::BAD_GATEWAY, None, "{}"),
            ApiError::Transient { .. }
        ));
        assert!(matches!(
            classify_http_failure(StatusCode::IM_A_TEAPOT, None, "{}"),
            ApiError::ResponseShape { .. }
        ));
    }

    #[test]
    fn graphql_error_types_steer_classification() {
        let rate_limited = classify_graphql_errors(
            &[json!({ "type": "RATE_LIMITED", "message": "API rate limit exceeded" })],
            None,
        );
        assert!(matches!(rate_limited, ApiError::RateLimited { .. }));

        let not_found = classify_graphql_errors(
            &[json!({ "type": "NOT_FOUND", "message": "Could not resolve to a Repository" })],
            None,
        );
        assert!(matches!(not_found, ApiError::NotFound { .. }));

        let unknown = classify_graphql_errors(&[json!({ "message": "something else" })], None);
        assert!(matches!(unknown, ApiError::ResponseShape { .. }));
    }

    #[test]
    fn extract_api_message_reads_message_field() {
        assert_eq!(
            extract_api_message("{\"message\": \"Bad credentials\"}"),
            Some("Bad credentials".to_owned())
        );
        assert_eq!(extract_api_message("not json"), None);
    }
}
