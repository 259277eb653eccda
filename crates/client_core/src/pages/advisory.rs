//! Chat-style advisory screen.

use serde::Serialize;
use shared::protocol::ChatEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuickAction {
    pub label: &'static str,
    pub prompt: &'static str,
}

pub const QUICK_ACTIONS: [QuickAction; 4] = [
    QuickAction {
        label: "Crop Planning",
        prompt: "Help me plan my crop for the next season",
    },
    QuickAction {
        label: "Fertilizer Advice",
        prompt: "What fertilizer should I use for wheat?",
    },
    QuickAction {
        label: "Market Selling",
        prompt: "When is the best time to sell my harvest?",
    },
    QuickAction {
        label: "General Query",
        prompt: "",
    },
];

#[derive(Debug)]
pub struct ChatPage {
    pub transcript: Vec<ChatEntry>,
    pub draft: String,
    pub awaiting_replies: usize,
}

impl ChatPage {
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            transcript: vec![ChatEntry::assistant(greeting)],
            draft: String::new(),
            awaiting_replies: 0,
        }
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Pre-fills the draft; an empty prompt leaves it untouched.
    pub fn apply_quick_action(&mut self, prompt: &str) -> bool {
        if prompt.is_empty() {
            return false;
        }
        self.draft = prompt.to_string();
        true
    }

    /// Appends the user turn and clears the draft. Whitespace-only input appends
    /// nothing.
    pub fn push_user(&mut self, text: &str) -> Option<ChatEntry> {
        if text.trim().is_empty() {
            return None;
        }
        let entry = ChatEntry::user(text);
        self.transcript.push(entry.clone());
        self.draft.clear();
        self.awaiting_replies += 1;
        Some(entry)
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) -> ChatEntry {
        let entry = ChatEntry::assistant(content);
        self.transcript.push(entry.clone());
        self.awaiting_replies = self.awaiting_replies.saturating_sub(1);
        entry
    }

    pub fn reply_failed(&mut self) {
        self.awaiting_replies = self.awaiting_replies.saturating_sub(1);
    }

    pub fn snapshot(&self) -> ChatSnapshot {
        ChatSnapshot {
            transcript: self.transcript.clone(),
            draft: self.draft.clone(),
            awaiting_replies: self.awaiting_replies,
            quick_actions: QUICK_ACTIONS.to_vec(),
            can_send: !self.draft.trim().is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatSnapshot {
    pub transcript: Vec<ChatEntry>,
    pub draft: String,
    pub awaiting_replies: usize,
    pub quick_actions: Vec<QuickAction>,
    pub can_send: bool,
}
