use std::collections::BTreeMap;

use serde_json::{Map, Value as JsonValue};

use super::model::{HeritageRecord, RecordId};
use super::regions::match_region;

// ---------------------------------------------------------------------------
// Record validation
// ---------------------------------------------------------------------------

/// Keep the candidates that form valid heritage records, in input order.
///
/// A candidate is dropped when it is not an object, when `id`, `name`,
/// `locations` or `details` is missing or empty, or when none of its
/// locations names a known region. Malformed input is never an error.
pub fn validate_records(raw: &[JsonValue]) -> Vec<HeritageRecord> {
    raw.iter().filter_map(validate_record).collect()
}

/// Validate a single candidate, deriving its region.
pub fn validate_record(candidate: &JsonValue) -> Option<HeritageRecord> {
    let obj = candidate.as_object()?;

    let id = record_id(obj.get("id")?)?;
    let name = non_empty_str(obj.get("name")?)?.to_string();

    let locations: Vec<String> = obj
        .get("locations")?
        .as_array()?
        .iter()
        .filter_map(JsonValue::as_str)
        .map(str::to_string)
        .collect();
    if locations.is_empty() {
        return None;
    }

    let raw_details = obj.get("details")?.as_object()?;
    if raw_details.is_empty() {
        return None;
    }
    let details = details_map(raw_details);

    let region = locations.iter().find_map(|loc| match_region(loc))?;

    let images = obj
        .get("images")
        .and_then(JsonValue::as_array)
        .map(|urls| {
            urls.iter()
                .filter_map(JsonValue::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let last_edited = obj
        .get("last_edited")
        .and_then(JsonValue::as_str)
        .map(str::to_string);

    Some(HeritageRecord {
        id,
        name,
        locations,
        details,
        images,
        last_edited,
        region,
    })
}

fn record_id(val: &JsonValue) -> Option<RecordId> {
    match val {
        JsonValue::String(s) if !s.is_empty() => Some(RecordId::Text(s.clone())),
        JsonValue::Number(n) => n.as_i64().map(RecordId::Number),
        _ => None,
    }
}

fn non_empty_str(val: &JsonValue) -> Option<&str> {
    val.as_str().filter(|s| !s.is_empty())
}

/// Flatten detail values to text. Strings are kept verbatim, other scalars
/// and nested values use their JSON rendering, nulls are dropped.
fn details_map(obj: &Map<String, JsonValue>) -> BTreeMap<String, String> {
    obj.iter()
        .filter_map(|(key, val)| {
            let text = match val {
                JsonValue::Null => return None,
                JsonValue::String(s) => s.clone(),
                other => other.to_string(),
            };
            Some((key.clone(), text))
        })
        .collect()
}
