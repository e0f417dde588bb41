use serde::{Deserialize, Serialize};

use super::{MovieId, MovieQueue};

/// Everything kept for one browser session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    /// Recommendation currently on screen
    #[serde(default)]
    pub now_showing: Option<MovieId>,
    #[serde(default)]
    pub queue: MovieQueue,
    /// One-shot notices, cleared once rendered
    #[serde(default)]
    pub messages: Vec<String>,
}

impl SessionData {
    pub fn flash(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn take_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }
}
