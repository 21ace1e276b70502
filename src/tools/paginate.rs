//! Status filtering and offset/limit paging for `list-markets`.

use crate::tools::validate::ListQuery;
use crate::types::{field, MarketList, MarketRecord};

/// Apply `query` to `markets`, preserving upstream order.
pub fn paginate(markets: MarketList, query: &ListQuery) -> MarketList {
    let wanted = query.status.as_deref().map(str::to_lowercase);

    markets
        .into_iter()
        .filter(|m| wanted.as_deref().map_or(true, |w| status_matches(m, w)))
        .skip(query.offset)
        .take(query.limit)
        .collect()
}

/// Non-object records have no readable status and never match.
fn status_matches(record: &MarketRecord, wanted_lower: &str) -> bool {
    if !record.is_object() {
        return false;
    }
    let status = field(record, "status").and_then(|v| v.as_str()).unwrap_or("");
    status.to_lowercase() == wanted_lower
}
