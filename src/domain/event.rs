use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    domain::{contains_ci, lenient, normalized_search, unknown_time, validation, Attachment},
    error::{AppError, Result},
};

pub const EVENT_CATEGORIES: &[&str] = &[
    "academic", "sports", "cultural", "parent-teacher", "holiday",
    "exam", "workshop", "field-trip", "ceremony", "other",
];

pub const GRADE_OPTIONS: &[&str] = &[
    "Pre-K", "K", "1st", "2nd", "3rd", "4th", "5th", "6th",
    "7th", "8th", "9th", "10th", "11th", "12th",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(alias = "eventDate", deserialize_with = "lenient::timestamp::deserialize")]
    pub start_time: DateTime<Utc>,
    #[serde(default, deserialize_with = "lenient::optional_timestamp::deserialize")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_event_type")]
    pub event_type: String,
    #[serde(default, deserialize_with = "lenient::text::deserialize")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient::text::deserialize")]
    pub room: Option<String>,
    #[serde(default, deserialize_with = "lenient::text::deserialize")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::text::deserialize")]
    pub dress_code: Option<String>,
    #[serde(default, deserialize_with = "lenient::text::deserialize")]
    pub requirements: Option<String>,
    #[serde(default, deserialize_with = "lenient::text::deserialize")]
    pub contact_person: Option<String>,
    #[serde(default, deserialize_with = "lenient::text::deserialize")]
    pub contact_email: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag::deserialize")]
    pub registration_required: bool,
    #[serde(default, deserialize_with = "lenient::optional_timestamp::deserialize")]
    pub registration_deadline: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::text::deserialize")]
    pub fee: Option<String>,
    #[serde(default, deserialize_with = "lenient::count::deserialize")]
    pub max_participants: Option<u32>,
    #[serde(default, deserialize_with = "lenient::flag::deserialize")]
    pub permission_slip_required: bool,
    #[serde(default, deserialize_with = "lenient::flag::deserialize")]
    pub parent_attendance: bool,
    #[serde(default, deserialize_with = "lenient::flag::deserialize")]
    pub transportation_provided: bool,
    #[serde(default)]
    pub priority: EventPriority,
    #[serde(default = "default_visibility")]
    pub visibility: String,
    #[serde(default)]
    pub target_grades: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default, deserialize_with = "lenient::flag::deserialize")]
    pub is_recurring: bool,
    #[serde(default, deserialize_with = "lenient::text::deserialize")]
    pub recurrence_pattern: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_timestamp::deserialize")]
    pub recurrence_end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: EventStatus,
    #[serde(default = "unknown_time", deserialize_with = "lenient::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "unknown_time", deserialize_with = "lenient::timestamp::deserialize")]
    pub updated_at: DateTime<Utc>,
    /// Keys this model does not know, written back unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Persisted status. Only cancellation is stored; everything else is derived
/// from the clock, see [`Event::display_status`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Upcoming,
    Cancelled,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DisplayStatus {
    Upcoming,
    Ongoing,
    Past,
    Cancelled,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventPriority {
    Urgent,
    High,
    #[default]
    Normal,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum EventSort {
    #[default]
    Date,
    DateDesc,
    Title,
    Priority,
    Category,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub status: Option<DisplayStatus>,
}

/// Counts by display status at a given instant.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct EventStats {
    pub total: usize,
    pub upcoming: usize,
    pub ongoing: usize,
    pub past: usize,
    pub cancelled: usize,
}

/// Form data for creating or replacing an event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct EventInput {
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub category: String,
    pub event_type: String,
    pub location: Option<String>,
    pub room: Option<String>,
    pub image_url: Option<String>,
    pub dress_code: Option<String>,
    pub requirements: Option<String>,
    pub contact_person: Option<String>,
    pub contact_email: Option<String>,
    pub registration_required: bool,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub fee: Option<String>,
    pub max_participants: Option<u32>,
    pub permission_slip_required: bool,
    pub parent_attendance: bool,
    pub transportation_provided: bool,
    pub priority: EventPriority,
    pub visibility: String,
    pub target_grades: Vec<String>,
    pub attachments: Vec<Attachment>,
    pub is_recurring: bool,
    pub recurrence_pattern: Option<String>,
    pub recurrence_end_date: Option<DateTime<Utc>>,
}

fn default_category() -> String {
    "academic".to_string()
}

fn default_event_type() -> String {
    "general".to_string()
}

fn default_visibility() -> String {
    "public".to_string()
}

impl Default for EventInput {
    fn default() -> Self {
        // New events default to 09:00-11:00 the following day.
        let start = (Utc::now() + chrono::Duration::days(1))
            .date_naive()
            .and_hms_opt(9, 0, 0)
            .map(|naive| naive.and_utc())
            .unwrap_or_else(Utc::now);
        Self {
            title: String::new(),
            description: String::new(),
            start_time: start,
            end_time: start + chrono::Duration::hours(2),
            category: default_category(),
            event_type: default_event_type(),
            location: None,
            room: None,
            image_url: None,
            dress_code: None,
            requirements: None,
            contact_person: None,
            contact_email: None,
            registration_required: false,
            registration_deadline: None,
            fee: None,
            max_participants: None,
            permission_slip_required: false,
            parent_attendance: false,
            transportation_provided: false,
            priority: EventPriority::default(),
            visibility: default_visibility(),
            target_grades: Vec::new(),
            attachments: Vec::new(),
            is_recurring: false,
            recurrence_pattern: None,
            recurrence_end_date: None,
        }
    }
}

impl EventInput {
    pub fn validate(&self) -> Result<()> {
        validation::require("title", &self.title)?;
        validation::require("description", &self.description)?;

        if self.end_time <= self.start_time {
            return Err(AppError::Validation("endTime must be after startTime".to_string()));
        }

        if self.registration_required {
            if let Some(deadline) = self.registration_deadline {
                if deadline > self.start_time {
                    return Err(AppError::Validation(
                        "registrationDeadline must be before the event starts".to_string(),
                    ));
                }
            }
        }

        validation::optional_email("contactEmail", self.contact_email.as_deref())?;
        validation::optional_http_url("imageUrl", self.image_url.as_deref())?;
        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Upcoming => "upcoming",
            EventStatus::Cancelled => "cancelled",
        }
    }
}

impl EventPriority {
    fn rank(self) -> u8 {
        match self {
            EventPriority::Urgent => 0,
            EventPriority::High => 1,
            EventPriority::Normal => 2,
        }
    }
}

impl Event {
    pub fn from_input(id: String, input: EventInput, now: DateTime<Utc>) -> Self {
        let mut event = Self {
            id,
            title: String::new(),
            description: String::new(),
            start_time: input.start_time,
            end_time: None,
            category: default_category(),
            event_type: default_event_type(),
            location: None,
            room: None,
            image_url: None,
            dress_code: None,
            requirements: None,
            contact_person: None,
            contact_email: None,
            registration_required: false,
            registration_deadline: None,
            fee: None,
            max_participants: None,
            permission_slip_required: false,
            parent_attendance: false,
            transportation_provided: false,
            priority: EventPriority::default(),
            visibility: default_visibility(),
            target_grades: Vec::new(),
            attachments: Vec::new(),
            is_recurring: false,
            recurrence_pattern: None,
            recurrence_end_date: None,
            status: EventStatus::Upcoming,
            created_at: now,
            updated_at: now,
            extra: Map::new(),
        };
        event.apply_input(input);
        event
    }

    /// Overwrites the editable fields; id, status and timestamps are untouched.
    pub fn apply_input(&mut self, input: EventInput) {
        self.title = input.title;
        self.description = input.description;
        self.start_time = input.start_time;
        self.end_time = Some(input.end_time);
        self.category = input.category;
        self.event_type = input.event_type;
        self.location = non_blank(input.location);
        self.room = non_blank(input.room);
        self.image_url = non_blank(input.image_url);
        self.dress_code = non_blank(input.dress_code);
        self.requirements = non_blank(input.requirements);
        self.contact_person = non_blank(input.contact_person);
        self.contact_email = non_blank(input.contact_email);
        self.registration_required = input.registration_required;
        self.registration_deadline = input.registration_deadline;
        self.fee = non_blank(input.fee);
        self.max_participants = input.max_participants;
        self.permission_slip_required = input.permission_slip_required;
        self.parent_attendance = input.parent_attendance;
        self.transportation_provided = input.transportation_provided;
        self.priority = input.priority;
        self.visibility = input.visibility;
        self.target_grades = input.target_grades;
        self.attachments = input.attachments;
        self.is_recurring = input.is_recurring;
        self.recurrence_pattern = non_blank(input.recurrence_pattern);
        self.recurrence_end_date = input.recurrence_end_date;
    }

    /// Events without an end time end when they start.
    pub fn effective_end(&self) -> DateTime<Utc> {
        self.end_time.unwrap_or(self.start_time)
    }

    pub fn display_status(&self, now: DateTime<Utc>) -> DisplayStatus {
        if self.status == EventStatus::Cancelled {
            DisplayStatus::Cancelled
        } else if now < self.start_time {
            DisplayStatus::Upcoming
        } else if now <= self.effective_end() {
            DisplayStatus::Ongoing
        } else {
            DisplayStatus::Past
        }
    }
}

impl EventFilter {
    pub fn matches(&self, event: &Event, search: Option<&str>, now: DateTime<Utc>) -> bool {
        if let Some(needle) = search {
            let hit = contains_ci(&event.title, needle)
                || contains_ci(&event.description, needle)
                || event.location.as_deref().is_some_and(|l| contains_ci(l, needle));
            if !hit {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if &event.category != category {
                return false;
            }
        }
        if let Some(status) = self.status {
            if event.display_status(now) != status {
                return false;
            }
        }
        true
    }
}

impl EventStats {
    pub fn from_slice(events: &[Event], now: DateTime<Utc>) -> Self {
        let mut stats = EventStats {
            total: events.len(),
            ..Default::default()
        };
        for event in events {
            match event.display_status(now) {
                DisplayStatus::Upcoming => stats.upcoming += 1,
                DisplayStatus::Ongoing => stats.ongoing += 1,
                DisplayStatus::Past => stats.past += 1,
                DisplayStatus::Cancelled => stats.cancelled += 1,
            }
        }
        stats
    }
}

impl EventSort {
    pub fn compare(self, a: &Event, b: &Event) -> Ordering {
        match self {
            EventSort::Date => a.start_time.cmp(&b.start_time),
            EventSort::DateDesc => b.start_time.cmp(&a.start_time),
            EventSort::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            EventSort::Priority => a.priority.rank().cmp(&b.priority.rank()),
            EventSort::Category => a.category.cmp(&b.category),
        }
    }
}

/// Filters then stably sorts. Pure; repositories call this after loading.
pub fn query_events(events: Vec<Event>, filter: &EventFilter, sort: EventSort, now: DateTime<Utc>) -> Vec<Event> {
    let search = normalized_search(&filter.search);
    let mut hits: Vec<Event> = events
        .into_iter()
        .filter(|e| filter.matches(e, search.as_deref(), now))
        .collect();
    hits.sort_by(|a, b| sort.compare(a, b));
    hits
}
