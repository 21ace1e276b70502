//! Response normalization.
//!
//! Coerces the list-markets payload into a canonical `MarketList`. Two
//! unwraps are applied in order: a string is decoded as JSON, then an object
//! is unwrapped to its `data` member. Whatever is left must be a list.

use serde_json::Value;

use crate::types::{MarketList, RawPayload, ToolError};

/// Key under which the upstream wraps paginated listings.
const DATA_KEY: &str = "data";

pub fn normalize_market_list(payload: RawPayload) -> Result<MarketList, ToolError> {
    let payload = match payload {
        RawPayload::Text(text) => {
            let decoded: Value =
                serde_json::from_str(&text).map_err(|_| ToolError::InvalidResponseFormat)?;
            RawPayload::from(decoded)
        }
        other => other,
    };

    match payload {
        RawPayload::List(items) => Ok(items),
        RawPayload::Object(mut map) => match map.remove(DATA_KEY) {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(ToolError::UnexpectedResponseFormat),
        },
        // A string that decoded to another string is not unwrapped again.
        RawPayload::Text(_) | RawPayload::Other(_) => Err(ToolError::UnexpectedResponseFormat),
    }
}
