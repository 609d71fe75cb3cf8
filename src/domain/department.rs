use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{lenient, unknown_time, validation},
    error::Result,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "unknown_time", deserialize_with = "lenient::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "unknown_time", deserialize_with = "lenient::timestamp::deserialize")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct DepartmentInput {
    pub name: String,
    pub description: String,
}

impl DepartmentInput {
    pub fn validate(&self) -> Result<()> {
        validation::require("name", &self.name)?;
        validation::require("description", &self.description)
    }
}

impl Department {
    pub fn from_input(id: String, input: DepartmentInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name,
            description: input.description,
            created_at: now,
            updated_at: now,
        }
    }
}
