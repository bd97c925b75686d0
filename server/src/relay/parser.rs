use serde_json::Value;

use super::RelayEvent;

// Field spellings observed across upstream connector versions.
const LIKE_TOTAL_FIELDS: &[&str] = &["totalLikeCount", "total_like_count", "totalLike", "total"];
const GIFT_VALUE_FIELDS: &[&str] =
    &["diamondCount", "diamond_count", "diamonds", "coins", "cost", "price"];

/// Parser boundary for the live-event relay: collapses whatever shape the
/// upstream source produces into the two canonical event kinds. All field
/// heuristics live here; anything unrecognized maps to `None`.
pub fn parse_event(payload: &Value) -> Option<RelayEvent> {
    let kind = payload.get("type")?.as_str()?;
    // Relay servers wrap the interesting part in "data"; flat shapes carry
    // the fields at the top level.
    let data = payload.get("data").unwrap_or(payload);

    match kind {
        "like" => {
            let total = first_u64(data, LIKE_TOTAL_FIELDS)?;
            Some(RelayEvent::Like { total_like_count: total })
        }
        "gift" => {
            let diamonds = first_u64(data, GIFT_VALUE_FIELDS);
            let tier = first_u64(data, &["tier"]).map(|tier| tier as u32);
            if diamonds.is_none() && tier.is_none() {
                return None;
            }
            Some(RelayEvent::Gift { diamonds, tier })
        }
        _ => None,
    }
}

fn first_u64(data: &Value, fields: &[&str]) -> Option<u64> {
    fields.iter().find_map(|field| data.get(field).and_then(Value::as_u64))
}
