#[cfg(test)]
#[path = "normalizer_test.rs"]
mod tests;

use serde_json::Map;
use serde_json::Value;

/// Emitted when a payload produces no displayable blocks, so the transcript
/// never receives an empty assistant message.
pub const FALLBACK_MESSAGE: &str = "Processing completed successfully.";

// Checked in priority order. The first container present wins.
const RESULT_CONTAINERS: [&str; 4] = [
    "workflow_responses",
    "analysis_results",
    "boq_results",
    "chat_responses",
];

// Checked in priority order per step. The first key present wins.
const METADATA_KEYS: [&str; 3] = ["boq_data", "analysis_data", "interview_data"];

// Bookkeeping fields the backend attaches to every data block.
const EXCLUDED_KEYS: [&str; 4] = ["timestamp", "user_id", "session_id", "workflow_type"];

pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut boundary = true;

    for ch in text.chars() {
        if ch.is_alphabetic() {
            if boundary {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            boundary = false;
        } else {
            out.push(ch);
            boundary = true;
        }
    }

    return out;
}

pub fn humanize_key(key: &str) -> String {
    return title_case(&key.replace('_', " "));
}

pub fn display_value(value: &Value) -> String {
    if let Value::String(text) = value {
        return text.to_string();
    }

    return value.to_string();
}

/// Formats an arbitrary data mapping into readable text, following the
/// mapping's own insertion order.
pub fn flatten(data: &Map<String, Value>) -> String {
    let mut parts: Vec<String> = vec![];

    for (key, value) in data {
        if EXCLUDED_KEYS.contains(&key.as_str()) {
            continue;
        }

        let formatted_key = humanize_key(key);
        match value {
            Value::Object(nested) => {
                parts.push(format!("**{formatted_key}:**"));
                for (sub_key, sub_value) in nested {
                    parts.push(format!(
                        "  • {}: {}",
                        humanize_key(sub_key),
                        display_value(sub_value)
                    ));
                }
            }
            Value::Array(items) => {
                parts.push(format!("**{formatted_key}:**"));
                for item in items {
                    parts.push(format!("  • {}", display_value(item)));
                }
            }
            _ => {
                parts.push(format!("**{formatted_key}:** {}", display_value(value)));
            }
        }
    }

    return parts.join("\n");
}

fn extract_metadata_block(step: &Value, blocks: &mut Vec<String>) {
    let metadata = match step.get("metadata") {
        Some(Value::Object(map)) => map,
        _ => return,
    };

    let data = METADATA_KEYS.iter().find_map(|key| {
        return metadata.get(*key);
    });

    match data {
        Some(Value::Object(map)) => {
            if let Some(Value::String(content)) = map.get("content") {
                blocks.push(content.to_string());
            } else {
                blocks.push(flatten(map));
            }
        }
        Some(Value::String(text)) => {
            blocks.push(text.to_string());
        }
        _ => {}
    }
}

/// Flattens whichever response shape the backend used into an ordered list
/// of displayable text blocks. Never returns an empty list.
pub fn normalize(payload: &Value) -> Vec<String> {
    let mut blocks: Vec<String> = vec![];

    let steps = RESULT_CONTAINERS.iter().find_map(|key| {
        return payload.get(*key).and_then(|container| {
            return container.as_array();
        });
    });

    if let Some(steps) = steps {
        for step in steps {
            if let Some(Value::String(content)) = step.get("content") {
                if !content.is_empty() {
                    blocks.push(content.to_string());
                }
            }

            extract_metadata_block(step, &mut blocks);
        }
    }

    if blocks.is_empty() {
        blocks.push(FALLBACK_MESSAGE.to_string());
    }

    return blocks;
}
