#[cfg(test)]
#[path = "identity_test.rs"]
mod tests;

use uuid::Uuid;

use crate::configuration::Config;
use crate::configuration::ConfigKey;

/// Owns the user/session identifier pair for one UI session. Identifiers are
/// opaque strings, either supplied explicitly or generated once and kept for
/// the lifetime of the process.
#[derive(Default)]
pub struct Identity {
    user_id: String,
    session_id: String,
}

impl Identity {
    pub fn create_id() -> String {
        return Uuid::new_v4().to_string();
    }

    /// Seeds the identity pair from the `--user-id`/`--session-id` flags or
    /// config file, when set.
    pub fn from_config() -> Identity {
        return Identity {
            user_id: Config::get(ConfigKey::UserId),
            session_id: Config::get(ConfigKey::SessionId),
        };
    }

    /// An explicit override wins for the current request. A user override is
    /// not stored; a session override is. With no override, the stored value
    /// is reused, or a fresh identifier is generated and stored.
    pub fn resolve(&mut self, user_override: &str, session_override: &str) -> (String, String) {
        let user_id = if !user_override.is_empty() {
            user_override.to_string()
        } else {
            if self.user_id.is_empty() {
                self.user_id = Identity::create_id();
            }
            self.user_id.to_string()
        };

        let session_id = if !session_override.is_empty() {
            self.session_id = session_override.to_string();
            self.session_id.to_string()
        } else {
            if self.session_id.is_empty() {
                self.session_id = Identity::create_id();
            }
            self.session_id.to_string()
        };

        return (user_id, session_id);
    }

    pub fn set_user(&mut self, user_id: &str) {
        self.user_id = user_id.to_string();
    }

    pub fn set_session(&mut self, session_id: &str) {
        self.session_id = session_id.to_string();
    }

    /// Regenerates the session id only. The caller clears the transcript.
    pub fn new_session(&mut self) -> String {
        self.session_id = Identity::create_id();
        return self.session_id.to_string();
    }
}
