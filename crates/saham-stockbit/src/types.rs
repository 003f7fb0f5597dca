//! Wire types for Stockbit API responses.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::parse::parse_value;

/// Accept a JSON number, a formatted numeric string or null.
fn flexible_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().unwrap_or_default(),
        Value::String(s) => parse_value(&s),
        _ => 0.0,
    })
}

/// Envelope of every Stockbit response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Server message.
    #[serde(default)]
    pub message: String,
    /// Payload.
    pub data: T,
}

/// Payload of the password login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginData {
    /// Bearer token.
    pub access_token: String,
    /// Token used to obtain a new bearer token.
    #[serde(default)]
    pub refresh_token: String,
}

/// A token wrapper in the refresh payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenValue {
    /// Token string.
    pub token: String,
}

/// Payload of the token refresh endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshData {
    /// New bearer token.
    pub access: TokenValue,
    /// New refresh token.
    pub refresh: TokenValue,
}

/// Size statistics block of key statistics, as formatted strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyStatsSummary {
    /// Market capitalisation, e.g. `"1,234.5 B"`.
    #[serde(default)]
    pub market_cap: String,
    /// Enterprise value.
    #[serde(default)]
    pub enterprise_value: String,
    /// Shares outstanding.
    #[serde(default)]
    pub current_share_outstanding: String,
}

/// A named figure of key statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinItem {
    /// Label, e.g. `"Current Ratio (Quarter)"`.
    #[serde(default)]
    pub name: String,
    /// Formatted value, e.g. `"1.25"`, `"12.3%"` or `"-"`.
    #[serde(default)]
    pub value: String,
}

/// Wrapper around one [`FinItem`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinNameResult {
    /// The figure.
    #[serde(default)]
    pub fitem: FinItem,
}

/// One thematic group of key statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinItemGroup {
    /// Group title, e.g. `"Solvency"`.
    #[serde(default)]
    pub keystats_name: String,
    /// Figures of the group.
    #[serde(default)]
    pub fin_name_results: Vec<FinNameResult>,
}

/// Payload of the key-statistics endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyStatsData {
    /// Size statistics.
    #[serde(default)]
    pub stats: KeyStatsSummary,
    /// Thematic groups.
    #[serde(default)]
    pub closure_fin_items_results: Vec<FinItemGroup>,
}

impl KeyStatsData {
    /// Every figure across all groups, in response order.
    pub fn items(&self) -> impl Iterator<Item = &FinItem> {
        self.closure_fin_items_results
            .iter()
            .flat_map(|group| group.fin_name_results.iter().map(|r| &r.fitem))
    }
}

/// An auto-rejection limit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceLimit {
    /// Formatted limit price, e.g. `"10,250"`.
    #[serde(default, deserialize_with = "flexible_f64")]
    pub value: f64,
}

/// Payload of the orderbook endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Orderbook {
    /// Last traded price.
    #[serde(default, deserialize_with = "flexible_f64")]
    pub lastprice: f64,
    /// Change from previous close.
    #[serde(default, deserialize_with = "flexible_f64")]
    pub change: f64,
    /// Percentage change from previous close.
    #[serde(default, deserialize_with = "flexible_f64")]
    pub percentage_change: f64,
    /// Foreign buy.
    #[serde(default, deserialize_with = "flexible_f64")]
    pub fbuy: f64,
    /// Foreign sell.
    #[serde(default, deserialize_with = "flexible_f64")]
    pub fsell: f64,
    /// Traded volume.
    #[serde(default, deserialize_with = "flexible_f64")]
    pub volume: f64,
    /// Average price.
    #[serde(default, deserialize_with = "flexible_f64")]
    pub average: f64,
    /// Close price.
    #[serde(default, deserialize_with = "flexible_f64")]
    pub close: f64,
    /// Session high.
    #[serde(default, deserialize_with = "flexible_f64")]
    pub high: f64,
    /// Session low.
    #[serde(default, deserialize_with = "flexible_f64")]
    pub low: f64,
    /// Session open.
    #[serde(default, deserialize_with = "flexible_f64")]
    pub open: f64,
    /// Upper auto-rejection limit.
    #[serde(default)]
    pub ara: PriceLimit,
    /// Lower auto-rejection limit.
    #[serde(default)]
    pub arb: PriceLimit,
    /// Number of trades.
    #[serde(default, deserialize_with = "flexible_f64")]
    pub frequency: f64,
}

/// One post of a symbol stream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamPost {
    /// Post body.
    #[serde(default)]
    pub content: String,
    /// Sentiment rate in `[-1, 1]`.
    #[serde(default, deserialize_with = "flexible_f64")]
    pub sentiment_rate: f64,
    /// Category label.
    #[serde(default)]
    pub category: String,
    /// Publication time, `YYYY-MM-DD HH:MM:SS` (UTC) or RFC 3339.
    #[serde(default)]
    pub created_at: String,
}

/// Payload of the stream endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamData {
    /// Posts, newest first.
    #[serde(default)]
    pub stream: Vec<StreamPost>,
}
