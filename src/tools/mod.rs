//! Tool dispatch.
//!
//! A call moves through validate → invoke → normalize → filter → format.
//! Each stage returns `Result<_, ToolError>`; the dispatcher converts the
//! first failure into the text the caller sees. At most one upstream call
//! is made per invocation, and only after validation succeeds.

pub mod catalog;
pub mod format;
pub mod normalize;
pub mod paginate;
pub mod validate;

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::platforms::MarketClient;
use crate::types::{ToolError, ToolName};
use validate::ToolRequest;

/// A single text content item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextContent {
    #[serde(rename = "type")]
    pub content_type: &'static str,
    pub text: String,
}

/// What a tool call returns to the transport. Always exactly one text item,
/// whether the call succeeded or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolOutput {
    pub content: Vec<TextContent>,
}

impl ToolOutput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![TextContent {
                content_type: "text",
                text: text.into(),
            }],
        }
    }

    /// The text of the single content item.
    pub fn as_text(&self) -> &str {
        self.content.first().map(|c| c.text.as_str()).unwrap_or_default()
    }
}

/// Routes tool calls to the market client. Holds no mutable state, so one
/// instance can serve concurrent calls.
#[derive(Clone)]
pub struct ToolDispatcher {
    client: Arc<dyn MarketClient>,
}

impl ToolDispatcher {
    pub fn new(client: Arc<dyn MarketClient>) -> Self {
        Self { client }
    }

    /// Run one tool call. Never fails: errors come back as text.
    pub async fn dispatch(&self, name: &str, arguments: Option<Value>) -> ToolOutput {
        match self.run(name, arguments).await {
            Ok(text) => {
                info!(tool = name, bytes = text.len(), "Tool call complete");
                ToolOutput::text(text)
            }
            Err(err @ ToolError::UnknownTool(_)) => {
                warn!(tool = name, "Unknown tool requested");
                ToolOutput::text(err.to_string())
            }
            Err(err) => {
                warn!(tool = name, error = ?err, "Tool call failed");
                ToolOutput::text(err.to_string())
            }
        }
    }

    async fn run(&self, name: &str, arguments: Option<Value>) -> Result<String, ToolError> {
        let args = match arguments {
            None | Some(Value::Null) => return Err(ToolError::MissingArguments),
            Some(Value::Object(map)) => map,
            Some(_) => {
                return Err(ToolError::InvalidArgument {
                    field: "arguments",
                    reason: "must be an object".to_string(),
                })
            }
        };

        let tool: ToolName = name.parse()?;
        let request = validate::validate(tool, &args)?;
        debug!(tool = %tool, request = ?request, "Arguments validated");

        self.execute(request).await
    }

    /// Invoke the upstream for a validated request and format the result.
    pub async fn execute(&self, request: ToolRequest) -> Result<String, ToolError> {
        debug!(tool = %request.tool(), "Calling upstream");
        match request {
            ToolRequest::MarketInfo { market_id } => {
                let record = self.client.fetch_market(&market_id).await?;
                Ok(format::format_market_info(&record))
            }
            ToolRequest::MarketPrices { market_id } => {
                let record = self.client.fetch_market(&market_id).await?;
                Ok(format::format_market_prices(&record))
            }
            ToolRequest::MarketHistory {
                market_id,
                timeframe,
            } => {
                debug!(%market_id, %timeframe, "Timeframe accepted; upstream returns full record");
                let record = self.client.fetch_market(&market_id).await?;
                Ok(format::format_market_history(&record))
            }
            ToolRequest::ListMarkets(query) => {
                let payload = self.client.fetch_markets().await?;
                let markets = normalize::normalize_market_list(payload)?;
                let total = markets.len();
                let page = paginate::paginate(markets, &query);
                debug!(
                    total,
                    returned = page.len(),
                    status = ?query.status,
                    offset = query.offset,
                    limit = query.limit,
                    "Market listing paginated"
                );
                Ok(format::format_market_list(&page))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
