use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{lenient, unknown_time, validation},
    error::Result,
};

/// A contact-form submission from the public site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: String,
    pub message: String,
    #[serde(default, deserialize_with = "lenient::flag::deserialize")]
    pub read: bool,
    #[serde(default, deserialize_with = "lenient::flag::deserialize")]
    pub replied: bool,
    #[serde(default, deserialize_with = "lenient::text::deserialize")]
    pub reply_content: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_timestamp::deserialize")]
    pub replied_at: Option<DateTime<Utc>>,
    #[serde(default = "unknown_time", deserialize_with = "lenient::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "unknown_time", deserialize_with = "lenient::timestamp::deserialize")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct MessageInput {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct MessageCounts {
    pub total: usize,
    pub unread: usize,
    pub replied: usize,
}

impl MessageInput {
    pub fn validate(&self) -> Result<()> {
        validation::require("name", &self.name)?;
        validation::require_email("email", &self.email)?;
        validation::require("subject", &self.subject)?;
        validation::require("message", &self.message)
    }
}

impl Message {
    pub fn from_input(id: String, input: MessageInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name,
            email: input.email,
            subject: input.subject,
            message: input.message,
            read: false,
            replied: false,
            reply_content: None,
            replied_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl MessageCounts {
    pub fn from_slice(messages: &[Message]) -> Self {
        Self {
            total: messages.len(),
            unread: messages.iter().filter(|m| !m.read).count(),
            replied: messages.iter().filter(|m| m.replied).count(),
        }
    }
}
