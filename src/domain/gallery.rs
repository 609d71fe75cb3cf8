use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{lenient, unknown_time, validation},
    error::Result,
};

/// A captioned image shown on the public gallery page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItem {
    pub id: String,
    pub image_url: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default = "unknown_time", deserialize_with = "lenient::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "unknown_time", deserialize_with = "lenient::timestamp::deserialize")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct GalleryItemInput {
    pub image_url: String,
    pub caption: String,
}

impl GalleryItemInput {
    pub fn validate(&self) -> Result<()> {
        validation::require("caption", &self.caption)?;
        validation::require_http_url("imageUrl", &self.image_url)
    }
}

impl GalleryItem {
    pub fn from_input(id: String, input: GalleryItemInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            image_url: input.image_url,
            caption: input.caption,
            created_at: now,
            updated_at: now,
        }
    }
}
