//! Wire types consumed from the signal service.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the upstream interpreted a search query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    Ticker,
    Company,
}

/// Outcome of resolving a free-text query against `/search`.
///
/// At most one `SearchResult` is live at a time; it is owned by the
/// interaction that produced it and replaced at the start of every new
/// request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The exact string submitted upstream (post-normalization).
    pub query: String,
    /// Canonical symbol form as returned by the upstream service. For a
    /// ticker query this is itself a usable trading symbol.
    pub normalized: String,
    /// Whether the query denoted a ticker or a company.
    #[serde(rename = "type")]
    pub kind: QueryKind,
    /// Candidate symbols for an ambiguous company; order is significant,
    /// first is the best match and the preferred fallback.
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Directional recommendation for a single symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalAction {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for SignalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SignalAction::Buy => "BUY",
            SignalAction::Sell => "SELL",
            SignalAction::Hold => "HOLD",
        })
    }
}

/// Trading signal for a resolved symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    /// The symbol the signal applies to.
    pub symbol: String,
    pub action: SignalAction,
    /// Confidence/strength value. Sign and range are upstream-defined;
    /// the client treats it as an opaque displayable number.
    pub score: f64,
    /// Human-readable justifications, in display order.
    #[serde(default)]
    pub reasons: Vec<String>,
}

/// A batch of signals plus a disclaimer.
///
/// Pick symbols are unique per upstream guarantee; the client tolerates
/// violations without deduplicating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LuckyResponse {
    #[serde(default)]
    pub picks: Vec<Signal>,
    /// Advisory text, purely informational.
    #[serde(default)]
    pub note: String,
}

/// Upstream health snapshot. Transient, display-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthState {
    /// Free-text upstream status; a missing field is not an error.
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub server_time: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

fn default_status() -> String {
    "unknown".into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_result_wire_shape() {
        let body = r#"{
            "query": "TESLA",
            "normalized": "TSLA",
            "type": "company",
            "suggestions": ["TSLA", "TSLA34"]
        }"#;
        let result: SearchResult = serde_json::from_str(body).unwrap();
        assert_eq!(result.kind, QueryKind::Company);
        assert_eq!(result.suggestions, vec!["TSLA", "TSLA34"]);
    }

    #[test]
    fn test_search_result_suggestions_default_empty() {
        let body = r#"{"query": "AAPL", "normalized": "AAPL", "type": "ticker"}"#;
        let result: SearchResult = serde_json::from_str(body).unwrap();
        assert_eq!(result.kind, QueryKind::Ticker);
        assert!(result.suggestions.is_empty());
    }

    #[test]
    fn test_signal_action_uppercase_on_wire() {
        let body = r#"{"symbol": "TSLA", "action": "HOLD", "score": 0, "reasons": ["demo"]}"#;
        let signal: Signal = serde_json::from_str(body).unwrap();
        assert_eq!(signal.action, SignalAction::Hold);
        assert_eq!(signal.score, 0.0);
        assert_eq!(signal.action.to_string(), "HOLD");
    }

    #[test]
    fn test_signal_reasons_default_empty() {
        let body = r#"{"symbol": "MSFT", "action": "BUY", "score": 1.5}"#;
        let signal: Signal = serde_json::from_str(body).unwrap();
        assert!(signal.reasons.is_empty());
    }

    #[test]
    fn test_lucky_response_note_default() {
        let body = r#"{"picks": [{"symbol": "NVDA", "action": "SELL", "score": -2.25}]}"#;
        let lucky: LuckyResponse = serde_json::from_str(body).unwrap();
        assert_eq!(lucky.picks.len(), 1);
        assert_eq!(lucky.picks[0].action, SignalAction::Sell);
        assert!(lucky.note.is_empty());
    }

    #[test]
    fn test_health_status_defaults_to_unknown() {
        let health: HealthState = serde_json::from_str("{}").unwrap();
        assert_eq!(health.status, "unknown");
        assert!(health.server_time.is_none());
        assert!(health.version.is_none());
    }

    #[test]
    fn test_health_metadata_parsed_when_present() {
        let body = r#"{"status": "ok", "server_time": "2024-05-01T09:30:00Z", "version": "1.4.2"}"#;
        let health: HealthState = serde_json::from_str(body).unwrap();
        assert_eq!(health.status, "ok");
        assert_eq!(health.server_time.as_deref(), Some("2024-05-01T09:30:00Z"));
        assert_eq!(health.version.as_deref(), Some("1.4.2"));
    }

    #[test]
    fn test_unknown_upstream_fields_ignored() {
        let body = r#"{"query": "AAPL", "normalized": "AAPL", "type": "ticker", "exchange": "NASDAQ"}"#;
        let result: SearchResult = serde_json::from_str(body).unwrap();
        assert_eq!(result.normalized, "AAPL");
    }
}
