//! Text rendering for tool results.
//!
//! One function per tool. Every field has a literal fallback so a sparse or
//! oddly-shaped record still renders; nothing here can fail.

use rust_decimal::prelude::*;
use serde_json::Value;

use crate::types::{display_field, display_value, field, MarketRecord, NOT_AVAILABLE};

pub const SEPARATOR: &str = "---";
pub const NO_MARKET_INFO: &str = "No market information available";
pub const NO_MARKETS: &str = "No markets available";
pub const NO_HISTORY: &str = "No historical data available";
pub const UNKNOWN_MARKET: &str = "Unknown Market";

/// Number of trailing history points shown.
pub const HISTORY_WINDOW: usize = 5;

/// Labelled fields of a listing block, in display order. `Volume` is
/// rendered separately as currency.
const LIST_FIELDS: [(&str, &str); 15] = [
    ("Condition ID", "condition_id"),
    ("Description", "description"),
    ("Category", "category"),
    ("Tokens", "question"),
    // Repeats the active flag under this label.
    ("Question", "active"),
    ("Rewards", "rewards"),
    ("Active", "active"),
    ("Closed", "closed"),
    ("Slug", "market_slug"),
    ("Min Incentive size", "min_incentive_size"),
    ("Max Incentive size", "max_incentive_spread"),
    ("End date", "end_date_iso"),
    ("Start time", "game_start_time"),
    ("Min order size", "minimum_order_size"),
    ("Max tick size", "minimum_tick_size"),
];

// ---------------------------------------------------------------------------
// Per-tool formatters
// ---------------------------------------------------------------------------

pub fn format_market_info(record: &MarketRecord) -> String {
    if !record.is_object() {
        return NO_MARKET_INFO.to_string();
    }

    format!(
        "Condition ID: {}\nTitle: {}\nStatus: {}\nResolution Date: {}\n{SEPARATOR}",
        display_field(record, "condition_id", NOT_AVAILABLE),
        display_field(record, "title", NOT_AVAILABLE),
        display_field(record, "status", NOT_AVAILABLE),
        display_field(record, "resolution_date", NOT_AVAILABLE),
    )
}

pub fn format_market_list(markets: &[MarketRecord]) -> String {
    if markets.is_empty() {
        return NO_MARKETS.to_string();
    }

    let mut blocks = Vec::with_capacity(markets.len() + 1);
    blocks.push("Available Markets:\n".to_string());
    blocks.extend(markets.iter().map(market_block));
    blocks.join("\n")
}

fn market_block(market: &MarketRecord) -> String {
    let mut block = String::new();
    for (label, key) in LIST_FIELDS {
        block.push_str(&format!("{label}: {}\n", display_field(market, key, NOT_AVAILABLE)));
    }
    block.push_str(&format!("Volume: {}\n{SEPARATOR}\n", format_volume(field(market, "volume"))));
    block
}

/// Non-record payloads are echoed back as-is.
pub fn format_market_prices(record: &MarketRecord) -> String {
    if !record.is_object() {
        return display_value(record);
    }

    let header = format!(
        "Current Market Prices for {}\n",
        display_field(record, "title", UNKNOWN_MARKET)
    );
    let price = format!(
        "Current Price: {}\n{SEPARATOR}\n",
        display_field(record, "current_price", NOT_AVAILABLE)
    );
    [header, price].join("\n")
}

/// The market record doubles as the history container: points are read from
/// its `history` list.
pub fn format_market_history(record: &MarketRecord) -> String {
    if !record.is_object() {
        return NO_HISTORY.to_string();
    }

    let mut parts = vec![format!(
        "Historical Data for {}\n",
        display_field(record, "title", UNKNOWN_MARKET)
    )];

    let points = field(record, "history")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let start = points.len().saturating_sub(HISTORY_WINDOW);

    parts.extend(points[start..].iter().map(|point| {
        format!(
            "Time: {}\nPrice: {}\n{SEPARATOR}\n",
            display_field(point, "timestamp", NOT_AVAILABLE),
            display_field(point, "price", NOT_AVAILABLE),
        )
    }));
    parts.join("\n")
}

// ---------------------------------------------------------------------------
// Currency
// ---------------------------------------------------------------------------

/// Render a volume as `$1,234.50`. Values that do not parse as a number are
/// shown raw after the `$`. A missing volume counts as zero.
pub fn format_volume(volume: Option<&Value>) -> String {
    let parsed = match volume {
        None => Some(format_usd(Decimal::ZERO)),
        Some(Value::Bool(b)) => Some(format_usd(if *b { Decimal::ONE } else { Decimal::ZERO })),
        Some(Value::Number(n)) => parse_amount(&n.to_string()),
        Some(Value::String(s)) => parse_amount(s.trim()),
        Some(_) => None,
    };

    match parsed {
        Some(amount) => format!("${amount}"),
        None => format!("${}", volume.map(display_value).unwrap_or_default()),
    }
}

/// Exact decimal when it fits, otherwise a finite float for magnitudes
/// beyond `Decimal::MAX`.
fn parse_amount(s: &str) -> Option<String> {
    Decimal::from_str(s)
        .ok()
        .or_else(|| Decimal::from_scientific(s).ok())
        .map(format_usd)
        .or_else(|| {
            s.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(format_usd_f64)
        })
}

/// Two decimal places (banker's rounding) with comma thousands separators.
pub fn format_usd(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    group_thousands(&format!("{:.2}", rounded.abs()), negative)
}

fn format_usd_f64(amount: f64) -> String {
    let text = format!("{:.2}", amount.abs());
    let negative = amount.is_sign_negative() && text != "0.00";
    group_thousands(&text, negative)
}

fn group_thousands(text: &str, negative: bool) -> String {
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
