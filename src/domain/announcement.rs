use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    domain::{contains_ci, lenient, normalized_search, unknown_time, validation, Attachment},
    error::{AppError, Result},
};

pub const AUDIENCE_ALL: &str = "All";

pub const ANNOUNCEMENT_CATEGORIES: &[&str] = &[
    "academic", "event", "sports", "clubs", "holiday", "emergency", "general",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default = "default_audience")]
    pub target_audience: Vec<String>,
    #[serde(default)]
    pub status: AnnouncementStatus,
    #[serde(default, deserialize_with = "lenient::optional_timestamp::deserialize")]
    pub publish_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::optional_timestamp::deserialize")]
    pub expiry_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default = "default_true")]
    pub notify_users: bool,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default, deserialize_with = "lenient::text::deserialize")]
    pub recurrence_pattern: Option<String>,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub read_confirmations: Vec<Value>,
    #[serde(default = "first_version")]
    pub version: u32,
    #[serde(default)]
    pub previous_versions: Vec<AnnouncementRevision>,
    #[serde(default, deserialize_with = "lenient::optional_timestamp::deserialize")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::optional_timestamp::deserialize")]
    pub archived_at: Option<DateTime<Utc>>,
    #[serde(default = "unknown_time", deserialize_with = "lenient::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "unknown_time", deserialize_with = "lenient::timestamp::deserialize")]
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementStatus {
    #[default]
    Draft,
    Pending,
    Published,
    Archived,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    Important,
    #[default]
    Regular,
    Informational,
}

/// Snapshot of an announcement taken just before an edit replaced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementRevision {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default = "unknown_time", deserialize_with = "lenient::timestamp::deserialize")]
    pub updated_at: DateTime<Utc>,
    #[serde(default = "first_version")]
    pub version: u32,
}

/// Form data for creating or replacing an announcement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AnnouncementInput {
    pub title: String,
    pub content: String,
    pub category: String,
    pub priority: Priority,
    pub target_audience: Vec<String>,
    pub status: Option<AnnouncementStatus>,
    pub publish_date: Option<DateTime<Utc>>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub attachments: Vec<Attachment>,
    pub featured: bool,
    pub notify_users: bool,
    pub is_recurring: bool,
    pub recurrence_pattern: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnouncementFilter {
    pub category: Option<String>,
    pub priority: Option<Priority>,
    pub audience: Option<String>,
    pub status: Option<AnnouncementStatus>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct AnnouncementStats {
    pub total: usize,
    pub published: usize,
    pub draft: usize,
    pub pending: usize,
    pub critical: usize,
}

fn default_category() -> String {
    "general".to_string()
}

fn default_audience() -> Vec<String> {
    vec![AUDIENCE_ALL.to_string()]
}

fn default_true() -> bool {
    true
}

fn first_version() -> u32 {
    1
}

impl Default for AnnouncementInput {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            category: default_category(),
            priority: Priority::default(),
            target_audience: default_audience(),
            status: None,
            publish_date: None,
            expiry_date: None,
            tags: Vec::new(),
            attachments: Vec::new(),
            featured: false,
            notify_users: true,
            is_recurring: false,
            recurrence_pattern: None,
        }
    }
}

impl AnnouncementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnouncementStatus::Draft => "draft",
            AnnouncementStatus::Pending => "pending",
            AnnouncementStatus::Published => "published",
            AnnouncementStatus::Archived => "archived",
        }
    }

    /// Archived is terminal; everything else moves forward through review.
    pub fn can_transition_to(self, next: AnnouncementStatus) -> bool {
        use AnnouncementStatus::*;
        matches!(
            (self, next),
            (Draft, Pending)
                | (Draft, Published)
                | (Pending, Published)
                | (Pending, Draft)
                | (Draft | Pending | Published, Archived)
        )
    }
}

impl Announcement {
    /// Past its expiry date and not archived. Such records are pruned on read.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.status != AnnouncementStatus::Archived
            && self.expiry_date.is_some_and(|expiry| expiry < now)
    }

    pub fn revision(&self) -> AnnouncementRevision {
        AnnouncementRevision {
            id: self.id.clone(),
            title: self.title.clone(),
            content: self.content.clone(),
            updated_at: self.updated_at,
            version: self.version,
        }
    }

    /// Builds a fresh record from submitted form data.
    pub fn from_input(id: String, input: AnnouncementInput, now: DateTime<Utc>) -> Self {
        let status = input.status.unwrap_or_default();
        let published_at = (status == AnnouncementStatus::Published).then_some(now);
        let mut announcement = Self {
            id,
            title: String::new(),
            content: String::new(),
            category: default_category(),
            priority: Priority::default(),
            target_audience: default_audience(),
            status,
            publish_date: None,
            expiry_date: None,
            tags: Vec::new(),
            attachments: Vec::new(),
            featured: false,
            notify_users: true,
            is_recurring: false,
            recurrence_pattern: None,
            views: 0,
            read_confirmations: Vec::new(),
            version: 1,
            previous_versions: Vec::new(),
            published_at,
            archived_at: None,
            created_at: now,
            updated_at: now,
            extra: Map::new(),
        };
        announcement.apply_input(input, now);
        announcement
    }

    /// Overwrites the editable fields. Bookkeeping (id, timestamps, views,
    /// version history) is left to the caller.
    pub fn apply_input(&mut self, input: AnnouncementInput, now: DateTime<Utc>) {
        let status = input.status.unwrap_or(self.status);
        let publish_date = input
            .publish_date
            .or_else(|| (status == AnnouncementStatus::Published).then_some(now));

        self.title = input.title;
        self.content = input.content;
        self.category = if input.category.trim().is_empty() {
            default_category()
        } else {
            input.category
        };
        self.priority = input.priority;
        self.target_audience = input.target_audience;
        self.status = status;
        self.publish_date = publish_date;
        self.expiry_date = input.expiry_date;
        self.tags = input
            .tags
            .into_iter()
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect();
        self.attachments = input.attachments;
        self.featured = input.featured;
        self.notify_users = input.notify_users;
        self.is_recurring = input.is_recurring;
        self.recurrence_pattern = input.recurrence_pattern.filter(|p| !p.trim().is_empty());
    }
}

impl AnnouncementInput {
    /// `unchanged_publish_date` is the date already on the record being
    /// edited; keeping it is allowed even once it lies in the past.
    pub fn validate(&self, now: DateTime<Utc>, unchanged_publish_date: Option<DateTime<Utc>>) -> Result<()> {
        validation::require("title", &self.title)?;
        validation::require("content", &self.content)?;

        if let Some(publish) = self.publish_date {
            if publish < now && Some(publish) != unchanged_publish_date {
                return Err(AppError::Validation("publishDate cannot be in the past".to_string()));
            }
            if let Some(expiry) = self.expiry_date {
                if expiry <= publish {
                    return Err(AppError::Validation(
                        "expiryDate must be after publishDate".to_string(),
                    ));
                }
            }
        }

        Ok(())
    }
}

impl AnnouncementFilter {
    pub fn matches(&self, announcement: &Announcement, search: Option<&str>) -> bool {
        if let Some(category) = &self.category {
            if &announcement.category != category {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if announcement.priority != priority {
                return false;
            }
        }
        if let Some(audience) = &self.audience {
            let targeted = announcement
                .target_audience
                .iter()
                .any(|a| a == audience || a == AUDIENCE_ALL);
            if !targeted {
                return false;
            }
        }
        if let Some(status) = self.status {
            if announcement.status != status {
                return false;
            }
        }
        if let Some(needle) = search {
            if !contains_ci(&announcement.title, needle) && !contains_ci(&announcement.content, needle) {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, announcements: Vec<Announcement>) -> Vec<Announcement> {
        let search = normalized_search(&self.search);
        announcements
            .into_iter()
            .filter(|a| self.matches(a, search.as_deref()))
            .collect()
    }
}

impl AnnouncementStats {
    pub fn from_slice(announcements: &[Announcement]) -> Self {
        announcements.iter().fold(
            Self { total: announcements.len(), ..Self::default() },
            |mut stats, a| {
                match a.status {
                    AnnouncementStatus::Published => stats.published += 1,
                    AnnouncementStatus::Draft => stats.draft += 1,
                    AnnouncementStatus::Pending => stats.pending += 1,
                    AnnouncementStatus::Archived => {}
                }
                if a.priority == Priority::Critical {
                    stats.critical += 1;
                }
                stats
            },
        )
    }
}
