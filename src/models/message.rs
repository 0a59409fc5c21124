use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    /// "you" for outgoing messages, otherwise the peer's user id
    #[serde(rename = "from", alias = "sender")]
    pub sender: String,
    pub text: String,
    #[serde(rename = "at", alias = "timestamp")]
    pub timestamp: i64,
}

impl Message {
    pub fn is_outgoing(&self) -> bool {
        self.sender == super::YOU
    }
}

/// peer user id -> conversation, oldest first
pub type MessageStore = BTreeMap<String, Vec<Message>>;
