//! Shared types for the prediction-market tool server.
//!
//! Markets arrive from the upstream API as loosely-typed JSON, so records
//! stay as `serde_json::Value` and every field lookup is fallible. The
//! strongly-typed parts are the edges: which tool was called, what shape
//! the upstream payload had, and what went wrong.

use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Market data
// ---------------------------------------------------------------------------

/// One market's attribute mapping. Only JSON objects carry fields; any other
/// value is treated as an opaque record and formats with fallbacks.
pub type MarketRecord = Value;

/// Markets in the order the upstream returned them.
pub type MarketList = Vec<MarketRecord>;

/// Arguments supplied with a tool call.
pub type ArgumentBag = Map<String, Value>;

/// Display value used when a record lacks a field.
pub const NOT_AVAILABLE: &str = "N/A";

/// Look up a field on a record, treating `null` the same as absent.
pub fn field<'a>(record: &'a MarketRecord, key: &str) -> Option<&'a Value> {
    record.as_object()?.get(key).filter(|v| !v.is_null())
}

/// Render a field for display, falling back to `default` when absent.
pub fn display_field(record: &MarketRecord, key: &str, default: &str) -> String {
    field(record, key).map_or_else(|| default.to_string(), display_value)
}

/// Strings render bare; everything else as compact JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Upstream payload
// ---------------------------------------------------------------------------

/// The list-markets endpoint answers with a bare list, a JSON document
/// serialized into a string, or an object wrapping the list under `data`.
/// Which one arrives is not under our control.
#[derive(Debug, Clone, PartialEq)]
pub enum RawPayload {
    List(Vec<Value>),
    Text(String),
    Object(Map<String, Value>),
    /// Numbers, booleans and null. Never a valid market list.
    Other(Value),
}

impl From<Value> for RawPayload {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => RawPayload::List(items),
            Value::String(text) => RawPayload::Text(text),
            Value::Object(map) => RawPayload::Object(map),
            other => RawPayload::Other(other),
        }
    }
}

// ---------------------------------------------------------------------------
// Tools
// ---------------------------------------------------------------------------

/// The closed set of tools this server exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    GetMarketInfo,
    ListMarkets,
    GetMarketPrices,
    GetMarketHistory,
}

impl ToolName {
    /// Catalog order.
    pub const ALL: [ToolName; 4] = [
        ToolName::GetMarketInfo,
        ToolName::ListMarkets,
        ToolName::GetMarketPrices,
        ToolName::GetMarketHistory,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ToolName::GetMarketInfo => "get-market-info",
            ToolName::ListMarkets => "list-markets",
            ToolName::GetMarketPrices => "get-market-prices",
            ToolName::GetMarketHistory => "get-market-history",
        }
    }

    /// Whether the tool needs a `market_id` argument.
    pub fn requires_market_id(self) -> bool {
        !matches!(self, ToolName::ListMarkets)
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ToolError::UnknownTool(s.to_string()))
    }
}

/// Allowed values for `get-market-history`'s `timeframe` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timeframe {
    OneDay,
    #[default]
    SevenDays,
    ThirtyDays,
    All,
}

impl Timeframe {
    pub const ALL: [Timeframe; 4] = [
        Timeframe::OneDay,
        Timeframe::SevenDays,
        Timeframe::ThirtyDays,
        Timeframe::All,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Timeframe::OneDay => "1d",
            Timeframe::SevenDays => "7d",
            Timeframe::ThirtyDays => "30d",
            Timeframe::All => "all",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timeframe::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ToolError::InvalidArgument {
                field: "timeframe",
                reason: "must be one of 1d, 7d, 30d, all".to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Everything that can stop a tool call short of a formatted answer.
///
/// The `Display` text is exactly what the caller receives; there is no
/// separate structured error channel.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolError {
    #[error("Missing arguments for the request")]
    MissingArguments,

    #[error("Missing {0} parameter")]
    MissingArgument(&'static str),

    #[error("Invalid {field} parameter: {reason}")]
    InvalidArgument { field: &'static str, reason: String },

    #[error("Error executing tool: {0}")]
    UpstreamConfiguration(String),

    #[error("Error executing tool: {0}")]
    UpstreamCall(String),

    #[error("Error: Invalid response format from API")]
    InvalidResponseFormat,

    #[error("Error: Unexpected response format from API")]
    UnexpectedResponseFormat,

    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
