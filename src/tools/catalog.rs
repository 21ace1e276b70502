//! Static tool declarations advertised through `tools/list`.

use serde::Serialize;
use serde_json::{json, Value};

use crate::tools::validate::{DEFAULT_LIMIT, DEFAULT_OFFSET, MAX_LIMIT};
use crate::types::{Timeframe, ToolName};

#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// All tools, in a stable order.
pub fn catalog() -> Vec<ToolDefinition> {
    ToolName::ALL.into_iter().map(definition).collect()
}

pub fn definition(tool: ToolName) -> ToolDefinition {
    let (description, input_schema) = match tool {
        ToolName::GetMarketInfo => (
            "Get detailed information about a specific prediction market",
            market_id_schema(json!({})),
        ),
        ToolName::ListMarkets => (
            "Get a list of prediction markets with optional filters",
            json!({
                "type": "object",
                "properties": {
                    "status": {
                        "type": "string",
                        "description": "Filter by market status (e.g., active, resolved)",
                        "enum": ["active", "resolved"],
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Number of markets to return (default: 10)",
                        "default": DEFAULT_LIMIT,
                        "minimum": 1,
                        "maximum": MAX_LIMIT,
                    },
                    "offset": {
                        "type": "integer",
                        "description": "Number of markets to skip (for pagination)",
                        "default": DEFAULT_OFFSET,
                        "minimum": 0,
                    },
                },
            }),
        ),
        ToolName::GetMarketPrices => (
            "Get current prices and trading information for a market",
            market_id_schema(json!({})),
        ),
        ToolName::GetMarketHistory => (
            "Get historical price and volume data for a market",
            market_id_schema(json!({
                "timeframe": {
                    "type": "string",
                    "description": "Time period for historical data",
                    "enum": Timeframe::ALL.map(Timeframe::as_str),
                    "default": Timeframe::default().as_str(),
                },
            })),
        ),
    };

    ToolDefinition {
        name: tool.as_str(),
        description,
        input_schema,
    }
}

/// Object schema with a required `market_id` plus `extra` properties.
fn market_id_schema(extra: Value) -> Value {
    let mut properties = json!({
        "market_id": {"type": "string", "description": "Market ID or slug"},
    });
    if let (Some(props), Value::Object(extra)) = (properties.as_object_mut(), extra) {
        props.extend(extra);
    }
    json!({
        "type": "object",
        "properties": properties,
        "required": ["market_id"],
    })
}
