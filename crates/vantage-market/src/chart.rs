//! Chart directives embedded in agent answers
//!
//! The prompt asks the model to close with a JSON object such as
//! `{"action": "update_chart", "symbol": "TCS.NS"}`, either inside a
//! ```` ```json ```` fence or inline. Nothing forces it to, so the directive
//! is parsed and validated here and reported separately from the text.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// The only action the frontend understands
pub const UPDATE_CHART: &str = "update_chart";

static FENCED_JSON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```").expect("Invalid regex")
});

static INLINE_ACTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)\{[^{}]*"action"\s*:\s*"update_chart"[^{}]*\}"#).expect("Invalid regex")
});

/// A validated request to refresh the chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartDirective {
    pub action: String,
    pub symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
}

/// Find the first well-formed chart directive in `text`
///
/// Fenced blocks are tried before inline objects. Extra keys such as a
/// `data` array are ignored; a missing or blank symbol disqualifies the
/// candidate.
pub fn extract_directive(text: &str) -> Option<ChartDirective> {
    let fenced = FENCED_JSON
        .captures_iter(text)
        .filter_map(|c| c.get(1).map(|m| m.as_str()));
    let inline = INLINE_ACTION.find_iter(text).map(|m| m.as_str());

    fenced.chain(inline).find_map(parse_candidate)
}

fn parse_candidate(raw: &str) -> Option<ChartDirective> {
    let mut directive: ChartDirective = serde_json::from_str(raw).ok()?;
    if directive.action != UPDATE_CHART {
        return None;
    }
    directive.symbol = directive.symbol.trim().to_uppercase();
    if directive.symbol.is_empty() {
        return None;
    }
    Some(directive)
}
