#[cfg(test)]
#[path = "transcript_test.rs"]
mod tests;

use crate::domain::models::Author;
use crate::domain::models::Message;
use crate::domain::models::PlanDocument;

/// The ordered list of user/assistant message blocks shown in the chat UI.
/// Append-only during a session; cleared on new-session or cleanup.
#[derive(Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn messages(&self) -> &[Message] {
        return &self.messages;
    }

    /// Scans from the newest entry backward and returns the first assistant
    /// message that parses as plan JSON. Recomputed on every export request,
    /// never cached.
    pub fn latest_plan(&self) -> Option<PlanDocument> {
        for message in self.messages.iter().rev() {
            if message.author != Author::Assistant {
                continue;
            }

            if let Some(plan) = PlanDocument::try_parse(&message.text) {
                return Some(plan);
            }
        }

        return None;
    }
}
