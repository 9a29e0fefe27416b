//! REST client for the signal service.
//!
//! Maps transport failures, non-success statuses, and unparseable bodies
//! onto the shared error taxonomy. Response interpretation is pure so the
//! mapping rules are unit-testable without a server.

use common::config::ClientConfig;
use common::{Error, HealthState, LuckyResponse, Result, SearchResult, Signal};
use serde::de::DeserializeOwned;
use std::error::Error as StdError;
use std::time::Duration;
use tracing::{debug, warn};

/// Header carrying the upstream API key on keyed routes.
pub const API_KEY_HEADER: &str = "X-Api-Key";

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn format_reqwest_error(err: &reqwest::Error) -> String {
    // Keep chained causes so network failures (DNS/TLS/socket) are visible.
    let mut message = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        let cause_msg = cause.to_string();
        if !cause_msg.is_empty() && !message.contains(&cause_msg) {
            message.push_str(": ");
            message.push_str(&cause_msg);
        }
        source = cause.source();
    }

    message
}

fn summarize_response_body(raw: &str) -> String {
    const MAX_CHARS: usize = 500;
    let compact = raw.replace(['\n', '\r'], " ");
    if compact.chars().count() > MAX_CHARS {
        let truncated: String = compact.chars().take(MAX_CHARS).collect();
        format!("{}…", truncated)
    } else {
        compact
    }
}

/// Map a completed HTTP exchange onto a typed result.
///
/// A non-success status carries the code and a summarized body; the body is
/// never parsed in that case. A success status with a body that fails to
/// parse is a malformed response, never a silently defaulted value.
fn interpret_response<T: DeserializeOwned>(status: u16, body: &str) -> Result<T> {
    if !(200..300).contains(&status) {
        return Err(Error::Upstream {
            status,
            body: summarize_response_body(body),
        });
    }

    serde_json::from_str(body)
        .map_err(|e| Error::Malformed(format!("{}: {}", e, summarize_response_body(body))))
}

/// Async REST client for the signal service.
#[derive(Debug, Clone)]
pub struct SignalRestClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl SignalRestClient {
    /// Build a client from configuration. The per-request timeout applies
    /// to every operation; the health check layers its own budget on top.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .timeout(Duration::from_secs(config.timing.request_timeout_secs))
            .build()
            .map_err(|e| Error::Transport(format_reqwest_error(&e)))?;

        let trimmed = config.api_key.trim();
        let api_key = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };

        Ok(Self {
            client,
            base_url: normalize_base_url(&config.base_url),
            api_key,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path_and_query: &str, keyed: bool) -> Result<T> {
        let url = format!("{}{}", self.base_url, path_and_query);
        debug!("GET {}", url);

        let mut request = self.client.get(&url);
        if keyed {
            if let Some(key) = &self.api_key {
                request = request.header(API_KEY_HEADER, key);
            }
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Transport(format_reqwest_error(&e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(format_reqwest_error(&e)))?;

        let outcome = interpret_response(status, &body);
        if let Err(e) = &outcome {
            warn!("GET {} failed: {}", url, e);
        }
        outcome
    }

    /// Resolve a normalized query against `/search`.
    pub async fn search(&self, query: &str) -> Result<SearchResult> {
        self.get_json(&format!("/search?q={}", urlencoding::encode(query)), true)
            .await
    }

    /// Fetch the trading signal for a resolved symbol.
    pub async fn signal(&self, symbol: &str) -> Result<Signal> {
        self.get_json(&format!("/signal/{}", urlencoding::encode(symbol)), true)
            .await
    }

    /// Fetch a randomized batch of picks. Independent of any resolution.
    pub async fn lucky(&self) -> Result<LuckyResponse> {
        self.get_json("/lucky", true).await
    }

    /// Fetch upstream health. This route never carries the API key.
    pub async fn health(&self) -> Result<HealthState> {
        self.get_json("/health", false).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::QueryKind;

    #[test]
    fn test_normalize_base_url_strips_trailing_slash() {
        assert_eq!(normalize_base_url("http://api.example/"), "http://api.example");
        assert_eq!(normalize_base_url("  http://api.example  "), "http://api.example");
        assert_eq!(normalize_base_url("http://api.example"), "http://api.example");
    }

    #[test]
    fn test_non_success_status_maps_to_upstream_error() {
        let outcome: Result<SearchResult> = interpret_response(502, "bad gateway");
        match outcome {
            Err(Error::Upstream { status, body }) => {
                assert_eq!(status, 502);
                assert_eq!(body, "bad gateway");
            }
            other => panic!("expected upstream error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_error_body_is_not_parsed() {
        // A body that would parse as the expected type still surfaces the
        // status code when the status is non-success.
        let body = r#"{"query":"A","normalized":"A","type":"ticker"}"#;
        let outcome: Result<SearchResult> = interpret_response(404, body);
        assert_eq!(outcome.unwrap_err().status(), Some(404));
    }

    #[test]
    fn test_success_with_bad_body_is_malformed() {
        let outcome: Result<SearchResult> = interpret_response(200, "<html>oops</html>");
        assert!(matches!(outcome, Err(Error::Malformed(_))));

        let missing_fields: Result<SearchResult> = interpret_response(200, "{}");
        assert!(matches!(missing_fields, Err(Error::Malformed(_))));
    }

    #[test]
    fn test_success_parses_expected_shape() {
        let body = r#"{"query":"TESLA","normalized":"TSLA","type":"company","suggestions":["TSLA"]}"#;
        let result: SearchResult = interpret_response(200, body).unwrap();
        assert_eq!(result.kind, QueryKind::Company);
        assert_eq!(result.suggestions, vec!["TSLA"]);
    }

    #[test]
    fn test_any_2xx_counts_as_success() {
        let body = r#"{"status":"ok"}"#;
        let health: HealthState = interpret_response(201, body).unwrap();
        assert_eq!(health.status, "ok");
    }

    #[test]
    fn test_summarize_truncates_long_bodies() {
        let long = "x".repeat(2000);
        let summary = summarize_response_body(&long);
        assert!(summary.chars().count() <= 501);
        assert!(summary.ends_with('…'));
    }

    #[test]
    fn test_summarize_flattens_newlines() {
        assert_eq!(summarize_response_body("a\nb\r\nc"), "a b  c");
    }
}
