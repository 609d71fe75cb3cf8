pub mod admin;
pub mod announcement;
pub mod department;
pub mod event;
pub mod gallery;
pub mod message;
pub mod teacher;
pub mod lenient;
pub mod validation;

pub use admin::*;
pub use announcement::*;
pub use department::*;
pub use event::*;
pub use gallery::*;
pub use message::*;
pub use teacher::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// File metadata attached to announcements and events. Only the descriptor is
/// stored; uploads themselves are out of scope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Attachment {
    pub name: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub size: u64,
    pub url: Option<String>,
}

/// Placeholder for timestamps missing from records written by older versions.
pub fn unknown_time() -> DateTime<Utc> {
    DateTime::<Utc>::default()
}

/// Case-insensitive substring match; `needle` must already be lowercase.
pub(crate) fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

pub(crate) fn normalized_search(search: &Option<String>) -> Option<String> {
    search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}
