#[cfg(test)]
#[path = "plan_render_test.rs"]
mod tests;

use serde_json::Map;
use serde_json::Value;

use super::display_value;
use super::humanize_key;
use super::title_case;
use crate::domain::models::PlanDocument;

/// Flattens one level of nested mappings in the plan summary into labeled
/// rows. Shared between the on-screen rendering and the PDF export.
pub fn summary_rows(summary: &Map<String, Value>) -> Vec<(String, String)> {
    let mut rows: Vec<(String, String)> = vec![];

    for (key, value) in summary {
        if let Value::Object(nested) = value {
            for (sub_key, sub_value) in nested {
                rows.push((
                    format!("{} - {}", humanize_key(key), title_case(sub_key)),
                    display_value(sub_value),
                ));
            }
        } else {
            rows.push((humanize_key(key), display_value(value)));
        }
    }

    return rows;
}

fn render_detail_section(name: &str, details: &Value, lines: &mut Vec<String>) {
    lines.push(format!("{}:", humanize_key(name)));

    let details = match details.as_object() {
        Some(map) if !map.is_empty() => map,
        _ => {
            lines.push("  No details provided.".to_string());
            return;
        }
    };

    for (key, value) in details {
        if key == "features" {
            if let Value::Array(features) = value {
                lines.push("  Features:".to_string());
                for feature in features {
                    lines.push(format!("    - {}", display_value(feature)));
                }
                continue;
            }
        }

        lines.push(format!("  {}: {}", humanize_key(key), display_value(value)));
    }
}

/// Renders a plan as structured sections with a table of contents listing
/// only the sections actually present, in fixed order.
pub fn render_plan(plan: &PlanDocument) -> String {
    let mut toc: Vec<&str> = vec![];
    if plan.plan_summary.is_some() {
        toc.push("Plan Summary");
    }
    if plan.room_details.is_some() {
        toc.push("Room Details");
    }
    if plan.elevation_details.is_some() {
        toc.push("Elevation Details");
    }

    let mut lines: Vec<String> = vec!["## Table of Contents".to_string()];
    for entry in &toc {
        lines.push(format!(" - {entry}"));
    }

    if let Some(summary) = &plan.plan_summary {
        lines.push("".to_string());
        lines.push("### Plan Summary".to_string());
        for (label, value) in summary_rows(summary) {
            lines.push(format!("{label}: {value}"));
        }
    }

    if let Some(rooms) = &plan.room_details {
        lines.push("".to_string());
        lines.push("### Room Details".to_string());
        for (room, details) in rooms {
            render_detail_section(room, details, &mut lines);
        }
    }

    if let Some(elevations) = &plan.elevation_details {
        lines.push("".to_string());
        lines.push("### Elevation Details".to_string());
        for (side, details) in elevations {
            render_detail_section(side, details, &mut lines);
        }
    }

    return lines.join("\n");
}
