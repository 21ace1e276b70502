//! Upstream market data.
//!
//! Defines the `MarketClient` trait the tool dispatcher calls into, and the
//! Polymarket CLOB implementation used in production.

pub mod polymarket;

use async_trait::async_trait;

use crate::types::{MarketRecord, RawPayload, ToolError};

/// Failures raised by a market client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Missing KEY or FUNDER. Set them in your environment (see env.local).")]
    MissingCredentials,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },
}

impl ClientError {
    /// Configuration problems are fatal to the call but not to the process.
    pub fn is_configuration(&self) -> bool {
        matches!(self, ClientError::MissingCredentials)
    }
}

impl From<ClientError> for ToolError {
    fn from(err: ClientError) -> Self {
        if err.is_configuration() {
            ToolError::UpstreamConfiguration(err.to_string())
        } else {
            ToolError::UpstreamCall(err.to_string())
        }
    }
}

/// Read-only access to a prediction-market API.
///
/// Each method is a single pass-through call: no caching, no retries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketClient: Send + Sync {
    /// Fetch one market by condition id or slug. The record shape is
    /// whatever the upstream returns.
    async fn fetch_market(&self, market_id: &str) -> Result<MarketRecord, ClientError>;

    /// Fetch the market listing. The payload shape is not fixed.
    async fn fetch_markets(&self) -> Result<RawPayload, ClientError>;

    /// Client name for logging.
    fn name(&self) -> &str;
}
