#[cfg(test)]
#[path = "plan_test.rs"]
mod tests;

use serde_json::Map;
use serde_json::Value;

/// The nested plan schema the client recognizes in assistant messages and
/// renders as structured sections instead of raw text.
///
/// A message qualifies as a plan when it is valid JSON carrying at least one
/// of the three recognized top-level keys. Missing keys stay `None`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlanDocument {
    pub plan_summary: Option<Map<String, Value>>,
    pub room_details: Option<Map<String, Value>>,
    pub elevation_details: Option<Map<String, Value>>,
}

fn take_section(data: &Map<String, Value>, key: &str) -> Option<Map<String, Value>> {
    if let Some(Value::Object(map)) = data.get(key) {
        return Some(map.clone());
    }

    return None;
}

impl PlanDocument {
    /// Attempts a strict JSON parse of `text`. A parse failure is a normal
    /// negative result, not an error.
    pub fn try_parse(text: &str) -> Option<PlanDocument> {
        let value = serde_json::from_str::<Value>(text).ok()?;
        let data = value.as_object()?;

        let has_plan_keys = ["plan_summary", "room_details", "elevation_details"]
            .iter()
            .any(|key| return data.contains_key(*key));
        if !has_plan_keys {
            return None;
        }

        return Some(PlanDocument {
            plan_summary: take_section(data, "plan_summary"),
            room_details: take_section(data, "room_details"),
            elevation_details: take_section(data, "elevation_details"),
        });
    }
}
