//! Argument validation.
//!
//! Turns a raw argument bag into a typed, defaulted `ToolRequest` before any
//! upstream call is made.

use serde_json::Value;

use crate::types::{ArgumentBag, Timeframe, ToolError, ToolName};

pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 100;
pub const DEFAULT_OFFSET: usize = 0;

/// A validated tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolRequest {
    MarketInfo { market_id: String },
    ListMarkets(ListQuery),
    MarketPrices { market_id: String },
    /// `timeframe` is checked but the upstream has no history window to pass
    /// it to, so it does not change the result.
    MarketHistory { market_id: String, timeframe: Timeframe },
}

impl ToolRequest {
    pub fn tool(&self) -> ToolName {
        match self {
            ToolRequest::MarketInfo { .. } => ToolName::GetMarketInfo,
            ToolRequest::ListMarkets(_) => ToolName::ListMarkets,
            ToolRequest::MarketPrices { .. } => ToolName::GetMarketPrices,
            ToolRequest::MarketHistory { .. } => ToolName::GetMarketHistory,
        }
    }
}

/// Filtering and paging options for `list-markets`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// Compared case-insensitively against each record's `status`.
    pub status: Option<String>,
    pub offset: usize,
    pub limit: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            status: None,
            offset: DEFAULT_OFFSET,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Validate `args` for `tool`.
pub fn validate(tool: ToolName, args: &ArgumentBag) -> Result<ToolRequest, ToolError> {
    match tool {
        ToolName::GetMarketInfo => Ok(ToolRequest::MarketInfo {
            market_id: market_id(args)?,
        }),
        ToolName::GetMarketPrices => Ok(ToolRequest::MarketPrices {
            market_id: market_id(args)?,
        }),
        ToolName::GetMarketHistory => {
            let market_id = market_id(args)?;
            let timeframe = match optional_string(args, "timeframe")? {
                Some(s) => s.parse()?,
                None => Timeframe::default(),
            };
            Ok(ToolRequest::MarketHistory {
                market_id,
                timeframe,
            })
        }
        ToolName::ListMarkets => {
            let status = optional_string(args, "status")?.filter(|s| !s.is_empty());
            let offset = optional_integer(args, "offset", 0, usize::MAX)?.unwrap_or(DEFAULT_OFFSET);
            let limit = optional_integer(args, "limit", 1, MAX_LIMIT)?.unwrap_or(DEFAULT_LIMIT);
            Ok(ToolRequest::ListMarkets(ListQuery {
                status,
                offset,
                limit,
            }))
        }
    }
}

/// `market_id` must be present and non-empty. It is passed upstream as
/// given, surrounding whitespace included. Numeric ids are accepted in
/// their decimal form.
fn market_id(args: &ArgumentBag) -> Result<String, ToolError> {
    let id = match args.get("market_id") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(_) => {
            return Err(ToolError::InvalidArgument {
                field: "market_id",
                reason: "must be a string".to_string(),
            })
        }
    };
    id.filter(|s| !s.is_empty())
        .ok_or(ToolError::MissingArgument("market_id"))
}

fn optional_string(args: &ArgumentBag, key: &'static str) -> Result<Option<String>, ToolError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ToolError::InvalidArgument {
            field: key,
            reason: "must be a string".to_string(),
        }),
    }
}

/// Integers may arrive as JSON numbers or as digit strings; some clients
/// stringify every argument.
fn optional_integer(
    args: &ArgumentBag,
    key: &'static str,
    min: usize,
    max: usize,
) -> Result<Option<usize>, ToolError> {
    let invalid = || ToolError::InvalidArgument {
        field: key,
        reason: if max == usize::MAX {
            format!("must be an integer >= {min}")
        } else {
            format!("must be an integer between {min} and {max}")
        },
    };

    let raw: i128 = match args.get(key) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => {
            if let Some(v) = n.as_u64() {
                v.into()
            } else if let Some(v) = n.as_i64() {
                v.into()
            } else {
                return Err(invalid());
            }
        }
        Some(Value::String(s)) => s.trim().parse().map_err(|_| invalid())?,
        Some(_) => return Err(invalid()),
    };

    if raw < min as i128 || raw > max as i128 {
        return Err(invalid());
    }
    Ok(Some(raw as usize))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
