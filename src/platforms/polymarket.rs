//! Polymarket CLOB integration.
//!
//! CLOB API: https://clob.polymarket.com
//!
//! Only the read endpoints are used: `/markets` for the listing and
//! `/markets/{condition_id}` for a single market. The listing is observed to
//! come back either as a bare array or as `{"data": [...], "next_cursor": ..}`,
//! and occasionally as a string; the raw shape is handed to the caller.
//!
//! Wallet credentials are still required before any call is made, matching
//! how the server is deployed alongside trading tooling.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use super::{ClientError, MarketClient};
use crate::config::{ClobConfig, ClobCredentials};
use crate::types::{MarketRecord, RawPayload};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

const PLATFORM_NAME: &str = "polymarket-clob";

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct ClobClient {
    http: Client,
    host: String,
    credentials: Option<ClobCredentials>,
}

impl ClobClient {
    pub fn new(cfg: &ClobConfig, credentials: Option<ClobCredentials>) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;

        let host = cfg.resolve_host().trim_end_matches('/').to_string();
        info!(
            host = %host,
            chain_id = cfg.chain_id,
            signature_type = cfg.signature_type,
            credentials = credentials.is_some(),
            "CLOB client configured"
        );

        Ok(Self {
            http,
            host,
            credentials,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    fn market_url(&self, market_id: &str) -> String {
        format!("{}/markets/{}", self.host, urlencoding::encode(market_id))
    }

    fn markets_url(&self) -> String {
        format!("{}/markets", self.host)
    }

    fn require_credentials(&self) -> Result<&ClobCredentials, ClientError> {
        self.credentials.as_ref().ok_or(ClientError::MissingCredentials)
    }

    /// GET `url` and return the body text of a successful response.
    async fn get_text(&self, url: &str) -> Result<String, ClientError> {
        let resp = self.http.get(url).send().await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }

        Ok(resp.text().await?)
    }
}

/// Decode a listing body. Anything that is not JSON stays as text so the
/// normalizer can report the format problem.
pub fn classify_listing_body(body: String) -> RawPayload {
    match serde_json::from_str::<Value>(&body) {
        Ok(value) => RawPayload::from(value),
        Err(_) => RawPayload::Text(body),
    }
}

/// Decode a single-market body. A body that is not JSON is returned as a
/// string value; the formatters decide how to show it.
pub fn decode_market_body(body: String) -> MarketRecord {
    match serde_json::from_str::<Value>(&body) {
        Ok(value) => value,
        Err(_) => Value::String(body),
    }
}

// ---------------------------------------------------------------------------
// MarketClient trait implementation
// ---------------------------------------------------------------------------

#[async_trait]
impl MarketClient for ClobClient {
    async fn fetch_market(&self, market_id: &str) -> Result<MarketRecord, ClientError> {
        // The key only gates access; read endpoints are not signed.
        let creds = self.require_credentials()?;
        debug!(market_id, funder = %creds.funder, "Fetching market from CLOB");

        let body = self.get_text(&self.market_url(market_id)).await?;
        Ok(decode_market_body(body))
    }

    async fn fetch_markets(&self) -> Result<RawPayload, ClientError> {
        let creds = self.require_credentials()?;
        debug!(funder = %creds.funder, "Fetching market listing from CLOB");

        let body = self.get_text(&self.markets_url()).await?;
        let payload = classify_listing_body(body);
        debug!(shape = payload_shape(&payload), "CLOB listing received");
        Ok(payload)
    }

    fn name(&self) -> &str {
        PLATFORM_NAME
    }
}

fn payload_shape(payload: &RawPayload) -> &'static str {
    match payload {
        RawPayload::List(_) => "list",
        RawPayload::Text(_) => "text",
        RawPayload::Object(_) => "object",
        RawPayload::Other(_) => "other",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
