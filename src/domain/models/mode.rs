#[cfg(test)]
#[path = "mode_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;

/// Client-side hint selecting which backend capability handles a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum WorkflowMode {
    Auto,
    Analyze,
    Boq,
    Chat,
}

impl WorkflowMode {
    pub fn parse(text: &str) -> Result<WorkflowMode> {
        for mode in WorkflowMode::iter() {
            if mode.to_string() == text {
                return Ok(mode);
            }
        }

        bail!(format!("No workflow mode named {text}"))
    }

    /// Chat is text-only. Every other mode forwards staged attachments.
    pub fn allows_attachments(&self) -> bool {
        return *self != WorkflowMode::Chat;
    }

    pub fn description(&self) -> &'static str {
        match self {
            WorkflowMode::Auto => return "Smart routing based on your input",
            WorkflowMode::Analyze => return "File analysis only",
            WorkflowMode::Boq => return "BOQ generation workflow",
            WorkflowMode::Chat => return "Text-only conversation",
        }
    }
}
